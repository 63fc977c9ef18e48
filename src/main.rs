use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use country_registry::{
    AppState,
    bootstrap::CountryCodeLoader,
    config::Config,
    database::{self, PgCountryRepository, PgPersonRepository},
    router::build_router,
};
use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'country_registry';")
                    .await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    database::migrate(&pool)
        .await
        .expect("Failed to run database migrations");

    let state = AppState::new(
        config.clone(),
        Arc::new(PgCountryRepository::new(pool.clone())),
        Arc::new(PgPersonRepository::new(pool)),
    );

    if config.country_codes_bootstrap {
        match CountryCodeLoader::new(config.country_codes_url.clone(), config.bootstrap_timeout()) {
            Ok(loader) => {
                state.countries.load_country_codes(&loader).await;
            }
            Err(e) => tracing::warn!("Country code loader unavailable: {}", e),
        }
    }

    let app = build_router(state.clone());

    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to 0.0.0.0");
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app,
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Failed to start server");

    state.cache.clear_all();
    tracing::info!("Cache cleared, shutting down");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

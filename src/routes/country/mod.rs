mod handler;
mod model;

pub use handler::{
    create_countries,
    create_country,
    delete_countries,
    delete_country,
    find_all,
    find_by_id,
    get_code_by_country,
    get_country_by_code,
    update_countries,
    update_country,
};

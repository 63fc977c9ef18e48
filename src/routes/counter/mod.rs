mod handler;

pub use handler::{all_counts, count, reset};

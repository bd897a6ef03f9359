pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::{athlete_routes, discipline_routes};

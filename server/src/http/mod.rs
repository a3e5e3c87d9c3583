pub mod reply;
pub mod routes;

pub use routes::routes;

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;

pub use extract::{ApiJson, PageParams, QueryParams};
pub use routes::{create_router, install};

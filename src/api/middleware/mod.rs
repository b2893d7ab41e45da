pub mod panic;
pub mod problem;
pub mod trace_id;

pub use panic::{panic_to_failure, record_panic_locations};
pub use problem::{no_route_fallback, problem_middleware};
pub use trace_id::trace_id_middleware;

//! Response envelopes for successful requests

pub mod paged;
pub mod response;

pub use paged::{PagedResponse, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
pub use response::{ApiResponse, EnvelopeParts};

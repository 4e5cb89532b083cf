pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;

pub use middleware::Principal;
pub use response::{ApiError, AppJson};
pub use routes::{authority_router, resource_router};

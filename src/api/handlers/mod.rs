mod internal;
mod resources;
mod sessions;

pub use internal::{invalidate_session, notify_user_created};
pub use resources::{health, purge_revocations, whoami};
pub use sessions::{login, logout, refresh, LoginRequest, RefreshRequest, TokenResponse};

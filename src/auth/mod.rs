pub mod auth_manager;
pub mod error;
pub mod models;
pub mod request_config;
pub mod session_manager;
pub mod session_storage;
pub mod token;

pub use auth_manager::{AuthApi, HttpAuthApi};
pub use error::{AuthFailure, SessionError};
pub use models::*;
pub use request_config::RequestConfig;
pub use session_manager::{RestoreOutcome, SessionManager};
pub use session_storage::{FileTokenStore, MemoryTokenStore, TokenStore, JWT_KEY};
pub use token::{decode_claims, MalformedTokenError, TokenClaims};

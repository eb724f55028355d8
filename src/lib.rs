pub mod api;
pub mod auth;
pub mod routing;
pub mod settings;

pub use api::{ApiResult, CourierClient, Message, MessageService, User};
pub use auth::{AuthFailure, Session, SessionManager};
pub use routing::{route_for, Route};

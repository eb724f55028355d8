pub mod cache;
pub mod client;
pub mod messages;
pub mod models;

pub use cache::{QueryCache, QueryKey};
pub use client::CourierClient;
pub use messages::{EditOutcome, MessageService};
pub use models::*;

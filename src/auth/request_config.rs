use std::sync::Arc;
use tokio::sync::RwLock;

/// Default headers shared between the session manager and the HTTP client.
///
/// Cloning hands out another handle to the same settings.
#[derive(Clone, Default)]
pub struct RequestConfig {
    bearer: Arc<RwLock<Option<String>>>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_bearer(&self, token: &str) {
        *self.bearer.write().await = Some(token.to_string());
    }

    pub async fn clear_authorization(&self) {
        *self.bearer.write().await = None;
    }

    /// Value for the `Authorization` header, if one is configured.
    pub async fn authorization(&self) -> Option<String> {
        self.bearer
            .read()
            .await
            .as_ref()
            .map(|token| format!("Bearer {}", token))
    }
}

impl std::fmt::Debug for RequestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let has_authorization = self
            .bearer
            .try_read()
            .map(|bearer| bearer.is_some())
            .unwrap_or(false);
        f.debug_struct("RequestConfig")
            .field("has_authorization", &has_authorization)
            .finish()
    }
}

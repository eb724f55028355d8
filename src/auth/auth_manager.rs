use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

use super::models::*;
use crate::api::client::response_error;
use crate::api::models::{ApiResult, User};

/// Remote authentication calls the session manager depends on.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `data` carries the raw token on success.
    async fn login(&self, email: &str, password: &str) -> ApiResult<String>;
    async fn register(&self, email: &str, password: &str, name: &str) -> ApiResult<User>;
}

pub struct HttpAuthApi {
    client: Client,
    server_name: String,
}

impl HttpAuthApi {
    pub fn new(server_name: &str) -> Self {
        Self::with_client(Client::new(), server_name)
    }

    pub fn with_client(client: Client, server_name: &str) -> Self {
        Self {
            client,
            server_name: server_name.trim_end_matches('/').to_string(),
        }
    }

    async fn call_login(&self, email: &str, password: &str) -> Result<String> {
        let url = format!("{}/auth/login", self.server_name);
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self.client.post(&url).json(&body).send().await?;

        if response.status().is_success() {
            let login_response: LoginResponse = response.json().await?;
            Ok(login_response.token)
        } else {
            Err(response_error(response).await)
        }
    }

    async fn call_register(&self, email: &str, password: &str, name: &str) -> Result<User> {
        let url = format!("{}/auth/register", self.server_name);
        let body = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        };

        let response = self.client.post(&url).json(&body).send().await?;

        if response.status().is_success() {
            let user: User = response.json().await?;
            Ok(user)
        } else {
            Err(response_error(response).await)
        }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, email: &str, password: &str) -> ApiResult<String> {
        log::info!("Logging in as {}", email);
        self.call_login(email, password).await.into()
    }

    async fn register(&self, email: &str, password: &str, name: &str) -> ApiResult<User> {
        log::info!("Registering account for {}", email);
        self.call_register(email, password, name).await.into()
    }
}

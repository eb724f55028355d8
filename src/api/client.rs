use anyhow::{anyhow, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;

use super::models::*;
use crate::auth::RequestConfig;

#[derive(Clone)]
pub struct CourierClient {
    client: Client,
    server_name: String,
    request_config: RequestConfig,
}

impl CourierClient {
    pub fn new(server_name: &str, request_config: RequestConfig) -> Self {
        Self {
            client: Client::new(),
            server_name: server_name.trim_end_matches('/').to_string(),
            request_config,
        }
    }

    pub fn with_timeout(
        server_name: &str,
        request_config: RequestConfig,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            server_name: server_name.trim_end_matches('/').to_string(),
            request_config,
        })
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    pub fn request_config(&self) -> &RequestConfig {
        &self.request_config
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.server_name, endpoint)
    }

    async fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.request_config.authorization().await {
            Some(value) => builder.header(AUTHORIZATION, value),
            None => builder,
        }
    }

    async fn send_json<T>(&self, builder: RequestBuilder, endpoint: &str) -> Result<T>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let response = self.authorize(builder).await.send().await?;

        if response.status().is_success() {
            let response_text = response.text().await?;
            log::debug!("API response for {}: {}", endpoint, response_text);
            let data: T = serde_json::from_str(&response_text)?;
            Ok(data)
        } else {
            Err(response_error(response).await)
        }
    }

    pub async fn authenticated_get<T>(&self, endpoint: &str) -> Result<T>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let builder = self.client.get(self.url(endpoint));
        self.send_json(builder, endpoint).await
    }

    pub async fn authenticated_post<T, B>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        T: for<'de> serde::Deserialize<'de>,
        B: serde::Serialize,
    {
        let builder = self.client.post(self.url(endpoint)).json(body);
        self.send_json(builder, endpoint).await
    }

    pub async fn authenticated_put<T, B>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        T: for<'de> serde::Deserialize<'de>,
        B: serde::Serialize,
    {
        let builder = self.client.put(self.url(endpoint)).json(body);
        self.send_json(builder, endpoint).await
    }

    /// DELETE endpoints may answer with an empty body, so only the status counts.
    pub async fn authenticated_delete(&self, endpoint: &str) -> Result<()> {
        let builder = self.client.delete(self.url(endpoint));
        let response = self.authorize(builder).await.send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(response_error(response).await)
        }
    }

    // Messages
    pub async fn fetch_messages(&self) -> ApiResult<Vec<Message>> {
        self.authenticated_get("/messages").await.into()
    }

    pub async fn fetch_message(&self, id: i64) -> ApiResult<Message> {
        let endpoint = format!("/messages/{}", id);
        self.authenticated_get(&endpoint).await.into()
    }

    pub async fn create_message(&self, request: &CreateMessageRequest) -> ApiResult<Message> {
        self.authenticated_post("/messages", request).await.into()
    }

    pub async fn update_message(
        &self,
        id: i64,
        request: &UpdateMessageRequest,
    ) -> ApiResult<Message> {
        let endpoint = format!("/messages/{}", id);
        self.authenticated_put(&endpoint, request).await.into()
    }

    pub async fn delete_message(&self, id: i64) -> ApiResult<()> {
        let endpoint = format!("/messages/{}", id);
        self.authenticated_delete(&endpoint).await.into()
    }

    // Profile
    pub async fn fetch_profile(&self) -> ApiResult<User> {
        self.authenticated_get("/users/me").await.into()
    }

    pub async fn upload_avatar(&self, bytes: Vec<u8>, file_name: &str, mime: &str) -> ApiResult<User> {
        self.call_upload_avatar(bytes, file_name, mime).await.into()
    }

    async fn call_upload_avatar(&self, bytes: Vec<u8>, file_name: &str, mime: &str) -> Result<User> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = reqwest::multipart::Form::new().part("avatar", part);

        let builder = self.client.post(self.url("/users/me/avatar")).multipart(form);
        self.send_json(builder, "/users/me/avatar").await
    }
}

/// Turns a non-2xx response into an error carrying the server's message.
pub(crate) async fn response_error(response: Response) -> anyhow::Error {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.message.or(body.error))
        .or_else(|| {
            let trimmed = text.trim();
            (!trimmed.is_empty() && !trimmed.starts_with('{')).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| format!("Request failed with status {}", status));

    log::warn!("API request failed ({}): {}", status, message);
    anyhow!(message)
}

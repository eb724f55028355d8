#![allow(dead_code)]

use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use courier_client::api::{ApiResult, User};
use courier_client::auth::{AuthApi, MemoryTokenStore, RequestConfig, SessionManager};

/// HS256 token carrying `claims`, signed with a key the client never sees.
pub fn make_token(claims: serde_json::Value) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"server-side-secret"),
    )
    .expect("token encodes")
}

pub fn token_for(user_id: i64) -> String {
    make_token(serde_json::json!({ "id": user_id, "iat": 1_700_000_000 }))
}

/// Auth API that answers every call with canned results.
pub struct StubAuthApi {
    login_result: ApiResult<String>,
    register_result: ApiResult<User>,
    login_calls: AtomicUsize,
    register_calls: AtomicUsize,
}

impl StubAuthApi {
    pub fn new(login_result: ApiResult<String>) -> Self {
        Self {
            login_result,
            register_result: ApiResult::ok(User {
                id: 1,
                email: "a@a.com".to_string(),
                name: "Alice".to_string(),
                avatar: None,
            }),
            login_calls: AtomicUsize::new(0),
            register_calls: AtomicUsize::new(0),
        }
    }

    pub fn accepting(token: String) -> Self {
        Self::new(ApiResult::ok(token))
    }

    pub fn rejecting(message: &str) -> Self {
        Self::new(ApiResult::err(message))
    }

    pub fn with_register_result(mut self, result: ApiResult<User>) -> Self {
        self.register_result = result;
        self
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn register_calls(&self) -> usize {
        self.register_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthApi for StubAuthApi {
    async fn login(&self, _email: &str, _password: &str) -> ApiResult<String> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login_result.clone()
    }

    async fn register(&self, _email: &str, _password: &str, _name: &str) -> ApiResult<User> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        self.register_result.clone()
    }
}

pub struct Harness {
    pub api: Arc<StubAuthApi>,
    pub store: Arc<MemoryTokenStore>,
    pub request_config: RequestConfig,
    pub manager: SessionManager,
}

impl Harness {
    pub fn new(api: StubAuthApi) -> Self {
        Self::with_store(api, Arc::new(MemoryTokenStore::new()))
    }

    pub fn with_store(api: StubAuthApi, store: Arc<MemoryTokenStore>) -> Self {
        let api = Arc::new(api);
        let request_config = RequestConfig::new();
        let manager = SessionManager::new(api.clone(), store.clone(), request_config.clone());
        Self {
            api,
            store,
            request_config,
            manager,
        }
    }
}

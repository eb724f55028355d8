use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// In-memory view of who is logged in.
///
/// `user_id` is only ever set together with `raw_token`, and only after the
/// token decoded. `initialized` flips to true once the startup restore has
/// run and stays true for the life of the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub raw_token: Option<String>,
    pub user_id: Option<i64>,
    pub initialized: bool,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.raw_token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_session_is_not_authenticated() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert!(!session.initialized);
        assert_eq!(session.user_id, None);
    }

    #[test]
    fn login_request_serializes_credentials() {
        let request = LoginRequest {
            email: "a@a.com".to_string(),
            password: "secret".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["email"], "a@a.com");
        assert_eq!(value["password"], "secret");
    }
}

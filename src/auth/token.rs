use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedTokenError {
    #[error("token is not a header.payload.signature structure")]
    InvalidStructure,
    #[error("token segment is not valid base64url: {0}")]
    InvalidBase64(String),
    #[error("token is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("token payload has no integer `id` claim")]
    MissingSubject,
}

impl From<jsonwebtoken::errors::Error> for MalformedTokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidToken => Self::InvalidStructure,
            ErrorKind::Base64(_) => Self::InvalidBase64(err.to_string()),
            ErrorKind::Json(_) | ErrorKind::Utf8(_) => Self::InvalidJson(err.to_string()),
            _ => Self::InvalidStructure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: i64,
    pub iat: Option<i64>,
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Informational only; nothing rejects an expired token client-side.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
    }
}

/// Parses the token without checking signature, expiry or audience.
fn unverified() -> Validation {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}

/// Reads the claims out of a `header.payload.signature` token.
///
/// The signature is never checked; the server does that.
pub fn decode_claims(token: &str) -> Result<TokenClaims, MalformedTokenError> {
    let data = decode::<serde_json::Map<String, serde_json::Value>>(
        token,
        &DecodingKey::from_secret(&[]),
        &unverified(),
    )?;

    let has_subject = data
        .claims
        .get("id")
        .map(|id| id.is_i64() || id.is_u64())
        .unwrap_or(false);
    if !has_subject {
        return Err(MalformedTokenError::MissingSubject);
    }

    serde_json::from_value(serde_json::Value::Object(data.claims))
        .map_err(|e| MalformedTokenError::InvalidJson(e.to_string()))
}

/// Short, non-reversible label for a token in log lines.
pub(crate) fn fingerprint(token: &str) -> String {
    let head: String = token.chars().take(8).collect();
    format!("{}..({} chars)", head, token.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    // {"alg":"HS256","typ":"JWT"}
    const HEADER: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";

    fn signed(claims: serde_json::Value) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-secret")).unwrap()
    }

    #[test]
    fn decodes_subject_and_times() {
        let token = signed(serde_json::json!({ "id": 42, "iat": 1700000000, "exp": 1700003600 }));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.id, 42);
        assert_eq!(claims.iat, Some(1_700_000_000));
        assert_eq!(
            claims.expires_at().map(|t| t.timestamp()),
            Some(1_700_003_600)
        );
    }

    #[test]
    fn ignores_signature_and_expiry() {
        let token = signed(serde_json::json!({ "id": 7, "exp": 1 }));
        let (unsigned, _) = token.rsplit_once('.').unwrap();
        let claims = decode_claims(&format!("{}.not-the-signature", unsigned)).unwrap();
        assert_eq!(claims.id, 7);
        assert_eq!(claims.exp, Some(1));
    }

    #[test]
    fn rejects_token_without_segments() {
        assert_eq!(decode_claims(""), Err(MalformedTokenError::InvalidStructure));
        assert_eq!(
            decode_claims("not-a-jwt"),
            Err(MalformedTokenError::InvalidStructure)
        );
        assert_eq!(decode_claims("a.b"), Err(MalformedTokenError::InvalidStructure));
    }

    #[test]
    fn rejects_garbage_segments() {
        assert!(matches!(
            decode_claims("a.!!!.b"),
            Err(MalformedTokenError::InvalidBase64(_))
        ));
        assert!(matches!(
            decode_claims(&format!("{}.!!!.sig", HEADER)),
            Err(MalformedTokenError::InvalidBase64(_))
        ));
        // "hello"
        assert!(matches!(
            decode_claims(&format!("{}.aGVsbG8.sig", HEADER)),
            Err(MalformedTokenError::InvalidJson(_))
        ));
        assert!(matches!(
            decode_claims(&format!("{}..sig", HEADER)),
            Err(MalformedTokenError::InvalidJson(_))
        ));
    }

    #[test]
    fn requires_integer_id() {
        let token = signed(serde_json::json!({ "sub": "42" }));
        assert_eq!(decode_claims(&token), Err(MalformedTokenError::MissingSubject));
        let token = signed(serde_json::json!({ "id": "42" }));
        assert_eq!(decode_claims(&token), Err(MalformedTokenError::MissingSubject));
    }

    #[test]
    fn fingerprint_hides_most_of_the_token() {
        let label = fingerprint("abcdefghijklmnop");
        assert_eq!(label, "abcdefgh..(16 chars)");
    }
}

//! Token extraction for the login endpoint, which has answered with
//! several body shapes over time.

use serde_json::Value;

use crate::error::LoginError;

const TOKEN_FIELDS: [&str; 3] = ["token", "jwt", "accessToken"];

/// The shape a login body was recognised as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginToken {
    NamedField(String),
    SingleKey(String),
    RawText(String),
}

impl LoginToken {
    /// Tries named fields, then a single-key object, then raw text.
    pub fn parse(body: &str) -> Result<Self, LoginError> {
        let parsed = match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_json(value)?,
            Err(_) => LoginToken::RawText(body.trim().to_string()),
        };
        if parsed.token().is_empty() {
            return Err(LoginError::EmptyToken);
        }
        Ok(parsed)
    }

    fn from_json(value: Value) -> Result<Self, LoginError> {
        match value {
            Value::Object(map) => {
                for field in TOKEN_FIELDS {
                    if let Some(Value::String(token)) = map.get(field) {
                        if !token.is_empty() {
                            return Ok(LoginToken::NamedField(token.clone()));
                        }
                    }
                }
                if map.len() != 1 {
                    return Err(LoginError::UnrecognizedShape);
                }
                match map.into_iter().next() {
                    Some((_, Value::String(token))) => Ok(LoginToken::SingleKey(token)),
                    Some((_, Value::Number(number))) => {
                        Ok(LoginToken::SingleKey(number.to_string()))
                    }
                    _ => Err(LoginError::UnrecognizedShape),
                }
            }
            Value::String(token) => Ok(LoginToken::RawText(token.trim().to_string())),
            _ => Err(LoginError::UnrecognizedShape),
        }
    }

    pub fn token(&self) -> &str {
        match self {
            LoginToken::NamedField(t) | LoginToken::SingleKey(t) | LoginToken::RawText(t) => t,
        }
    }

    pub fn into_token(self) -> String {
        match self {
            LoginToken::NamedField(t) | LoginToken::SingleKey(t) | LoginToken::RawText(t) => t,
        }
    }
}

pub fn extract_token(body: &str) -> Result<String, LoginError> {
    LoginToken::parse(body).map(LoginToken::into_token)
}

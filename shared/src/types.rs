use lambda_http::http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::UserError;
use crate::store::Document;

// ========== USER ==========
/// Document written on creation. Updates merge arbitrary extra fields on top.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub ctime: i64, // ms since epoch
    pub username: String,
    pub email: String,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, email: impl Into<String>, ctime: i64) -> Self {
        Self {
            ctime,
            username: username.into(),
            email: email.into(),
        }
    }

    pub fn into_document(self) -> Document {
        let mut doc = Document::new();
        doc.insert("ctime".to_string(), Value::from(self.ctime));
        doc.insert("username".to_string(), Value::String(self.username));
        doc.insert("email".to_string(), Value::String(self.email));
        doc
    }
}

// ========== REQUEST / RESPONSE ==========
/// Transport-independent view of an incoming call
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    pub method: Method,
    pub body: Document,
    pub query: HashMap<String, String>,
}

impl HandlerRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            body: Document::new(),
            query: HashMap::new(),
        }
    }

    pub fn with_body(mut self, body: Document) -> Self {
        self.body = body;
        self
    }

    /// Accepts any JSON value; anything but an object becomes an empty body.
    pub fn with_json_body(self, body: Value) -> Self {
        match body {
            Value::Object(map) => self.with_body(map),
            _ => self.with_body(Document::new()),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

/// Wire payload: `{"data": ...}` on success, `{"err": "..."}` on failure
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Payload {
    Data(Value),
    Err(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: StatusCode,
    pub payload: Payload,
}

impl HandlerResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            status: StatusCode::OK,
            payload: Payload::Data(data),
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match &self.payload {
            Payload::Data(data) => Some(data),
            Payload::Err(_) => None,
        }
    }

    pub fn err(&self) -> Option<&str> {
        match &self.payload {
            Payload::Err(message) => Some(message),
            Payload::Data(_) => None,
        }
    }
}

impl From<UserError> for HandlerResponse {
    fn from(err: UserError) -> Self {
        Self {
            status: err.status_code(),
            payload: Payload::Err(err.to_string()),
        }
    }
}

impl From<Result<Value, UserError>> for HandlerResponse {
    fn from(result: Result<Value, UserError>) -> Self {
        match result {
            Ok(data) => HandlerResponse::ok(data),
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_serializes_as_data_or_err() {
        let ok = serde_json::to_value(Payload::Data(json!("OK"))).unwrap();
        assert_eq!(ok, json!({"data": "OK"}));

        let err = serde_json::to_value(Payload::Err("Username is empty.".into())).unwrap();
        assert_eq!(err, json!({"err": "Username is empty."}));
    }

    #[test]
    fn test_non_object_body_becomes_empty() {
        let req = HandlerRequest::new(Method::POST).with_json_body(json!(["username"]));
        assert!(req.body.is_empty());
    }

    #[test]
    fn test_record_document_has_exactly_three_fields() {
        let doc = UserRecord::new("test-user", "test-user@gmail.com", 42).into_document();
        assert_eq!(
            Value::Object(doc),
            json!({"ctime": 42, "username": "test-user", "email": "test-user@gmail.com"})
        );
    }
}

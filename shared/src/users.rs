use lambda_http::http::Method;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::Config;
use crate::email::is_valid_email;
use crate::error::{ErrorKind, UserError};
use crate::store::{Document, DocumentStore, SetOptions};
use crate::types::{HandlerRequest, HandlerResponse, UserRecord};

/// CRUD over user documents keyed by username
pub struct UserRecordHandler {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl UserRecordHandler {
    pub fn new(store: Arc<dyn DocumentStore>, config: &Config) -> Self {
        Self {
            store,
            collection: config.collection.clone(),
        }
    }

    /// Dispatch on method: POST creates or updates, DELETE removes,
    /// anything else is a lookup by `id`.
    pub async fn handle(&self, request: HandlerRequest) -> HandlerResponse {
        tracing::info!("Users handler invoked - Method: {}", request.method);

        let result = match request.method {
            Method::POST => self.upsert_user(request.body).await,
            Method::DELETE => {
                self.delete_user(request.query.get("username").map(String::as_str))
                    .await
            }
            _ => self.get_user(request.query.get("id").map(String::as_str)).await,
        };

        if let Err(err) = &result {
            match err.kind() {
                ErrorKind::StoreFailure => tracing::error!("Store failure: {}", err),
                kind => tracing::warn!("Request rejected ({:?}): {}", kind, err),
            }
        }

        result.into()
    }

    /// Create a user, or merge fields into one when `update` is set
    pub async fn upsert_user(&self, mut body: Document) -> Result<Value, UserError> {
        let update = body.get("update").is_some_and(is_truthy);

        let username = match body.get("username") {
            Some(Value::String(username)) if !username.is_empty() => username.clone(),
            _ => return Err(UserError::validation("Username required.")),
        };

        let email_value = body.get("email");
        if !email_value.is_some_and(is_truthy) && !update {
            return Err(UserError::validation("Email address required."));
        }

        // Runs even for updates, so an update without an email is rejected here
        let email = match email_value.and_then(Value::as_str) {
            Some(email) if is_valid_email(Some(email)) => email.to_string(),
            _ => {
                return Err(UserError::validation(format!(
                    "Your email address, {}, is invalid.",
                    template_text(email_value)
                )))
            }
        };

        // Not transactional: a concurrent create can slip in between
        // this check and the write below
        let existing = self.store.get(&self.collection, &username).await?;
        if existing.is_some() && !update {
            return Err(UserError::Conflict(username));
        }

        let write = if update {
            body.remove("update");
            self.store
                .set(&self.collection, &username, body, SetOptions::merge())
                .await?
        } else {
            let ctime = chrono::Utc::now().timestamp_millis();
            let record = UserRecord::new(username.clone(), email, ctime);
            self.store
                .set(
                    &self.collection,
                    &username,
                    record.into_document(),
                    SetOptions::replace(),
                )
                .await?
        };

        match write.write_time {
            Some(write_time) => {
                tracing::info!("User {} written at {}", username, write_time.to_rfc3339());
                Ok(json!("OK"))
            }
            None => Err(UserError::Store(
                "Write time not present from database.".to_string(),
            )),
        }
    }

    /// Delete a user by username. Missing users delete fine.
    pub async fn delete_user(&self, username: Option<&str>) -> Result<Value, UserError> {
        let username = match username {
            Some(username) if !username.is_empty() => username.trim(),
            _ => return Err(UserError::validation("Username is empty.")),
        };

        // Whitespace-only names never address a document
        if username.is_empty() {
            return Err(UserError::validation("Username is empty."));
        }

        self.store.delete(&self.collection, username).await?;
        tracing::info!("User {} deleted", username);

        Ok(json!("OK"))
    }

    /// Fetch a user document by id (the username)
    pub async fn get_user(&self, id: Option<&str>) -> Result<Value, UserError> {
        let id = match id {
            Some(id) if !id.is_empty() => id.trim(),
            _ => return Err(UserError::validation("No ID is present to query.")),
        };

        if id.is_empty() {
            return Err(UserError::validation("ID is empty."));
        }

        match self.store.get(&self.collection, id).await? {
            Some(doc) => Ok(Value::Object(doc)),
            None => Err(UserError::NotFound(format!(
                "Unable to find the document for {}.",
                id
            ))),
        }
    }
}

/// JavaScript truthiness of a JSON value
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// How a value reads when interpolated into a message
fn template_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

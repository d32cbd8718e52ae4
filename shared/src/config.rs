use std::env;

const DEFAULT_TABLE_NAME: &str = "api-users";
const DEFAULT_COLLECTION: &str = "users";

/// Runtime configuration, read once at cold start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub table_name: String,
    pub collection: String,
    /// Local DynamoDB endpoint override (e.g. http://localhost:8000)
    pub endpoint_url: Option<String>,
}

impl Config {
    pub fn new(table_name: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            collection: collection.into(),
            endpoint_url: None,
        }
    }

    /// Load configuration from TABLE_NAME, COLLECTION and DYNAMODB_ENDPOINT
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            table_name: non_empty("TABLE_NAME").unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            collection: non_empty("COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            endpoint_url: non_empty("DYNAMODB_ENDPOINT"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_NAME, DEFAULT_COLLECTION)
    }
}

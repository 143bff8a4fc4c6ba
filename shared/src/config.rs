use std::env;

/// Table used when `TABLE_NAME` is not set.
pub const DEFAULT_TABLE_NAME: &str = "Users";

#[derive(Debug, Clone)]
pub struct Config {
    pub table_name: String,
}

impl Config {
    /// Reads settings from the Lambda environment. AWS credentials and region
    /// are resolved separately by `aws_config`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let table_name = lookup("TABLE_NAME")
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string());
        Self { table_name }
    }
}

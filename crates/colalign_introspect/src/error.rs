/// Errors produced while reading schema metadata.
#[derive(Debug, thiserror::Error)]
pub enum IntrospectError {
    #[error("failed to connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        source: postgres::Error,
    },

    #[error("failed to {action}: {source}")]
    Query {
        action: String,
        source: postgres::Error,
    },

    #[error("table `{table}` not found in schema `{schema}`")]
    TableNotFound { schema: String, table: String },
}

impl IntrospectError {
    pub fn query(action: impl Into<String>, source: postgres::Error) -> Self {
        Self::Query {
            action: action.into(),
            source,
        }
    }
}

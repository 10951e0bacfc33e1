//! Database connection settings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::EnvLookup;

/// PostgreSQL connection and the schema to analyze
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: Option<String>,

    /// Schema whose tables are analyzed
    pub schema: String,

    /// Seconds to wait for the server before giving up
    pub connect_timeout_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "postgres".to_string(),
            user: "postgres".to_string(),
            password: None,
            schema: "public".to_string(),
            connect_timeout_secs: 5,
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("schema", &self.schema)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl ConnectionConfig {
    #[inline]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub(crate) fn apply_env(&mut self, lookup: EnvLookup<'_>) {
        if let Some(host) = lookup("COLALIGN_DB_HOST") {
            self.host = host;
        }

        if let Some(val) = lookup("COLALIGN_DB_PORT")
            && let Ok(port) = val.parse()
        {
            self.port = port;
        }

        if let Some(dbname) = lookup("COLALIGN_DB_NAME") {
            self.dbname = dbname;
        }

        if let Some(user) = lookup("COLALIGN_DB_USER") {
            self.user = user;
        }

        if let Some(password) = lookup("COLALIGN_DB_PASSWORD") {
            self.password = Some(password);
        }

        if let Some(schema) = lookup("COLALIGN_SCHEMA") {
            self.schema = schema;
        }
    }
}

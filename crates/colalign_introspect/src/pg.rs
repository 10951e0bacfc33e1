use colalign_config::ConnectionConfig;
use postgres::{Client, Config, NoTls};
use tracing::{debug, info};

use crate::error::IntrospectError;
use crate::query::{
    COLUMNS_QUERY, ESTIMATED_ROWS_QUERY, TABLES_QUERY, estimate_to_rows, exact_row_count_query,
    parse_nullable,
};
use crate::{ColumnRecord, RowCountMode, SchemaSource};

/// [`SchemaSource`] backed by a blocking PostgreSQL connection.
pub struct PostgresSource {
    client: Client,
}

impl PostgresSource {
    pub fn connect(config: &ConnectionConfig) -> Result<Self, IntrospectError> {
        let mut pg = Config::new();
        pg.host(&config.host)
            .port(config.port)
            .dbname(&config.dbname)
            .user(&config.user)
            .connect_timeout(config.connect_timeout());
        if let Some(password) = &config.password {
            pg.password(password);
        }

        let connect_err = |source| IntrospectError::Connect {
            host: config.host.clone(),
            port: config.port,
            source,
        };
        let mut client = pg.connect(NoTls).map_err(connect_err)?;
        client.simple_query("SELECT 1").map_err(connect_err)?;

        info!(
            host = %config.host,
            port = config.port,
            database = %config.dbname,
            "connected"
        );
        Ok(Self { client })
    }
}

impl SchemaSource for PostgresSource {
    fn list_tables(&mut self, schema: &str) -> Result<Vec<String>, IntrospectError> {
        let action = || format!("list tables of schema `{schema}`");
        let rows = self
            .client
            .query(TABLES_QUERY, &[&schema])
            .map_err(|err| IntrospectError::query(action(), err))?;

        rows.iter()
            .map(|row| {
                row.try_get::<_, String>(0)
                    .map_err(|err| IntrospectError::query(action(), err))
            })
            .collect()
    }

    fn list_columns(
        &mut self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnRecord>, IntrospectError> {
        let action = || format!("read columns of `{schema}.{table}`");
        let rows = self
            .client
            .query(COLUMNS_QUERY, &[&schema, &table])
            .map_err(|err| IntrospectError::query(action(), err))?;

        rows.iter()
            .map(|row| {
                let record = ColumnRecord {
                    ordinal_position: row.try_get(0)?,
                    name: row.try_get(1)?,
                    data_type: row.try_get(2)?,
                    nullable: parse_nullable(row.try_get::<_, &str>(3)?),
                };
                Ok::<_, postgres::Error>(record)
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| IntrospectError::query(action(), err))
    }

    fn row_count(
        &mut self,
        schema: &str,
        table: &str,
        mode: RowCountMode,
    ) -> Result<u64, IntrospectError> {
        let action = || format!("count rows of `{schema}.{table}`");
        let count = match mode {
            RowCountMode::Exact => {
                let row = self
                    .client
                    .query_one(exact_row_count_query(schema, table).as_str(), &[])
                    .map_err(|err| IntrospectError::query(action(), err))?;
                let count: i64 = row
                    .try_get(0)
                    .map_err(|err| IntrospectError::query(action(), err))?;
                u64::try_from(count).unwrap_or(0)
            }
            RowCountMode::Estimate => {
                let row = self
                    .client
                    .query_opt(ESTIMATED_ROWS_QUERY, &[&schema, &table])
                    .map_err(|err| IntrospectError::query(action(), err))?;
                match row {
                    Some(row) => {
                        let estimate: f64 = row
                            .try_get(0)
                            .map_err(|err| IntrospectError::query(action(), err))?;
                        estimate_to_rows(estimate)
                    }
                    None => 0,
                }
            }
        };

        debug!(schema, table, ?mode, count, "counted rows");
        Ok(count)
    }
}

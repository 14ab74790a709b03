use std::ops::Deref;
use std::str::FromStr;

use callee_result::Error;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{ConnectOptions, Connection, Executor, MySqlPool};

/// Table holding every imported or inserted number
pub static TABLE: &str = "city_numbers";

static SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS city_numbers (
    id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
    city VARCHAR(255) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL,
    number_value VARCHAR(255) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL,
    price DOUBLE NOT NULL,
    UNIQUE KEY city_number (city, number_value)
)
"#;

database_derived!(
    /// MySQL implementation
    pub struct MySqlDb(pub MySqlPool);
);

impl Deref for MySqlDb {
    type Target = MySqlPool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl MySqlDb {
    /// Open a bounded connection pool, creating the schema if it is missing
    pub async fn connect(
        uri: &str,
        database_name: Option<&str>,
        pool_size: u32,
    ) -> Result<MySqlDb, String> {
        let mut options = MySqlConnectOptions::from_str(uri)
            .map_err(|err| format!("Invalid MySQL URI: {err}"))?;

        if let Some(database_name) = database_name {
            let mut connection = options
                .connect()
                .await
                .map_err(|err| format!("Failed to init db connection: {err}"))?;

            connection
                .execute(format!("CREATE DATABASE IF NOT EXISTS `{database_name}`").as_str())
                .await
                .map_err(|err| format!("Failed to create database {database_name}: {err}"))?;

            let _ = connection.close().await;
            options = options.database(database_name);
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(pool_size)
            .connect_with(options)
            .await
            .map_err(|err| format!("Failed to init db connection: {err}"))?;

        let db = MySqlDb(pool);
        db.create_tables()
            .await
            .map_err(|err| format!("Failed to create tables: {err}"))?;

        info!("Connected to MySQL with a pool of {pool_size} connections.");
        Ok(db)
    }

    /// Create the tables this service relies on
    pub async fn create_tables(&self) -> Result<(), sqlx::Error> {
        sqlx::query(SCHEMA).execute(&self.0).await.map(|_| ())
    }

    /// Remove every row, used to reset test databases
    pub async fn truncate(&self) -> Result<(), sqlx::Error> {
        sqlx::query("TRUNCATE TABLE city_numbers")
            .execute(&self.0)
            .await
            .map(|_| ())
    }
}

/// Translate a driver error into a storage error, logging the detail
pub(crate) fn map_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Error {
    move |err| match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            create_error!(DuplicateKey)
        }
        err => {
            error!("{operation} on {TABLE} failed: {err}");
            create_database_error!(operation, TABLE)
        }
    }
}

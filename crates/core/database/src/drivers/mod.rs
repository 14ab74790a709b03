#[cfg(feature = "mysql")]
mod mysql;
mod reference;

use callee_config::config;
use rand::Rng;

#[cfg(feature = "mysql")]
pub use self::mysql::*;
pub use self::reference::*;

/// Database information to use to create a client
pub enum DatabaseInfo {
    /// Auto-detect the database in use
    Auto,
    /// Auto-detect the database in use and create an empty testing database
    Test(String),
    /// Use the mock database
    Reference,
    /// Connect to MySQL
    #[cfg(feature = "mysql")]
    MySql {
        uri: String,
        database_name: Option<String>,
        pool_size: u32,
    },
}

/// Database
#[derive(Clone)]
pub enum Database {
    /// Mock database
    Reference(ReferenceDb),
    /// MySQL database
    #[cfg(feature = "mysql")]
    MySql(MySqlDb),
}

impl DatabaseInfo {
    /// Create a database client from the given database information
    #[async_recursion]
    pub async fn connect(self) -> Result<Database, String> {
        let config = config().await;

        match self {
            DatabaseInfo::Auto => {
                if std::env::var("TEST_DB").is_ok() {
                    DatabaseInfo::Test(format!(
                        "callee_test_{}",
                        rand::thread_rng().gen_range(1_000_000..10_000_000)
                    ))
                    .connect()
                    .await
                } else if !config.database.mysql.is_empty() {
                    #[cfg(feature = "mysql")]
                    return DatabaseInfo::MySql {
                        uri: config.database.mysql,
                        database_name: None,
                        pool_size: config.database.pool_size,
                    }
                    .connect()
                    .await;

                    #[cfg(not(feature = "mysql"))]
                    return Err("MySQL not enabled.".to_string());
                } else {
                    DatabaseInfo::Reference.connect().await
                }
            }
            DatabaseInfo::Test(database_name) => {
                match std::env::var("TEST_DB")
                    .unwrap_or_else(|_| "REFERENCE".to_string())
                    .as_str()
                {
                    "REFERENCE" => DatabaseInfo::Reference.connect().await,
                    "MYSQL" => {
                        #[cfg(feature = "mysql")]
                        return DatabaseInfo::MySql {
                            uri: config.database.mysql,
                            database_name: Some(test_database_name(&database_name)),
                            pool_size: config.database.pool_size,
                        }
                        .connect()
                        .await;

                        #[cfg(not(feature = "mysql"))]
                        return Err("MySQL not enabled.".to_string());
                    }
                    _ => unreachable!("must specify REFERENCE or MYSQL"),
                }
            }
            DatabaseInfo::Reference => Ok(Database::Reference(Default::default())),
            #[cfg(feature = "mysql")]
            DatabaseInfo::MySql {
                uri,
                database_name,
                pool_size,
            } => MySqlDb::connect(&uri, database_name.as_deref(), pool_size)
                .await
                .map(Database::MySql),
        }
    }
}

impl Database {
    /// Remove every row held by this database
    pub async fn drop_database(&self) {
        match self {
            Database::Reference(db) => db.city_numbers.lock().await.clear(),
            #[cfg(feature = "mysql")]
            Database::MySql(db) => db
                .truncate()
                .await
                .expect("Failed to clear test database."),
        }
    }
}

/// MySQL identifiers are limited to 64 characters of a restricted set
fn test_database_name(name: &str) -> String {
    let sanitised: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    let start = sanitised.len().saturating_sub(64);
    sanitised[start..].to_string()
}

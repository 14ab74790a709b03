use cached::proc_macro::cached;
use config::{Config, Environment, File, FileFormat};
use futures_locks::RwLock;
use once_cell::sync::Lazy;
use serde::Deserialize;

static CONFIG_BUILDER: Lazy<RwLock<Config>> = Lazy::new(|| {
    RwLock::new({
        let mut builder = Config::builder().add_source(File::from_str(
            include_str!("../Callee.toml"),
            FileFormat::Toml,
        ));

        if std::path::Path::new("Callee.toml").exists() {
            builder = builder.add_source(File::new("Callee.toml", FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("CALLEE")
                .separator("__")
                .try_parsing(true),
        );

        builder.build().unwrap()
    })
});

#[derive(Deserialize, Debug, Clone)]
pub struct Database {
    pub mysql: String,
    pub pool_size: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Api {
    pub port: u16,
    pub static_dir: String,
    pub body_limit: usize,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Features {
    pub page_size: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub database: Database,
    pub api: Api,
    pub features: Features,
}

pub async fn read() -> Config {
    CONFIG_BUILDER.read().await.clone()
}

#[cached(time = 30)]
pub async fn config() -> Settings {
    read().await.try_deserialize::<Settings>().unwrap()
}

/// Configure logging and common Rust variables
pub fn setup_logging(service: &'static str, version: &'static str) {
    dotenv::dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting {service} [version {version}]");
}

/// Configure logging for a service binary
#[macro_export]
macro_rules! configure {
    ($application: ident) => {
        $crate::setup_logging(stringify!($application), env!("CARGO_PKG_VERSION"));
    };
}

#[cfg(test)]
mod tests {
    use crate::config;

    #[tokio::test]
    async fn defaults_are_loaded() {
        let config = config().await;
        assert_eq!(config.api.port, 3000);
        assert_eq!(config.database.pool_size, 5);
        assert_eq!(config.features.page_size, 10);
    }
}

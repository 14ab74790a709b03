mod city_numbers;

pub use city_numbers::*;

#[cfg(feature = "mysql")]
use crate::MySqlDb;
use crate::{Database, ReferenceDb};

pub trait AbstractDatabase: Sync + Send + city_numbers::AbstractCityNumbers {}

impl AbstractDatabase for ReferenceDb {}

#[cfg(feature = "mysql")]
impl AbstractDatabase for MySqlDb {}

impl std::ops::Deref for Database {
    type Target = dyn AbstractDatabase;

    fn deref(&self) -> &Self::Target {
        match &self {
            Database::Reference(dummy) => dummy,
            #[cfg(feature = "mysql")]
            Database::MySql(mysql) => mysql,
        }
    }
}

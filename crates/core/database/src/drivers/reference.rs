use std::sync::Arc;

use futures::lock::Mutex;

use crate::NumberEntry;

database_derived!(
    /// Reference implementation
    #[derive(Default)]
    pub struct ReferenceDb {
        /// Rows of `city_numbers` as (city, entry), kept in insertion order
        pub city_numbers: Arc<Mutex<Vec<(String, NumberEntry)>>>,
    }
);

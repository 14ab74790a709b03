use callee_result::Result;

use crate::{CityNumber, NumberEntry, SortDirection};

#[cfg(feature = "mysql")]
mod mysql;
mod reference;

#[async_trait]
pub trait AbstractCityNumbers: Sync + Send {
    /// Insert a single number, failing with `DuplicateKey` if the city already has it
    async fn insert_city_number(&self, number: &CityNumber) -> Result<()>;

    /// Insert many numbers at once, skipping any that already exist
    ///
    /// Returns the number of rows actually persisted.
    async fn insert_city_numbers_ignoring_duplicates(&self, numbers: &[CityNumber])
        -> Result<u64>;

    /// Count all numbers stored for a city
    async fn count_city_numbers(&self, city: &str) -> Result<u64>;

    /// Fetch a window of a city's numbers ordered by price
    async fn fetch_city_numbers(
        &self,
        city: &str,
        sort: SortDirection,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<NumberEntry>>;
}

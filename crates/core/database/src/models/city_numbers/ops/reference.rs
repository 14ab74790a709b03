use callee_result::Result;

use crate::ReferenceDb;
use crate::{CityNumber, NumberEntry, SortDirection};

use super::AbstractCityNumbers;

/// Convert to the stored representation
fn into_row(number: &CityNumber) -> Result<(String, NumberEntry)> {
    Ok((
        number.city.clone(),
        NumberEntry {
            number_value: number.number_value.to_string(),
            price: number.price.to_price()?,
        },
    ))
}

fn exists(rows: &[(String, NumberEntry)], city: &str, number_value: &str) -> bool {
    rows.iter()
        .any(|(c, entry)| c == city && entry.number_value == number_value)
}

#[async_trait]
impl AbstractCityNumbers for ReferenceDb {
    /// Insert a single number, failing with `DuplicateKey` if the city already has it
    async fn insert_city_number(&self, number: &CityNumber) -> Result<()> {
        let row = into_row(number)?;
        let mut rows = self.city_numbers.lock().await;
        if exists(&rows, &row.0, &row.1.number_value) {
            Err(create_error!(DuplicateKey))
        } else {
            rows.push(row);
            Ok(())
        }
    }

    /// Insert many numbers at once, skipping any that already exist
    async fn insert_city_numbers_ignoring_duplicates(
        &self,
        numbers: &[CityNumber],
    ) -> Result<u64> {
        let new_rows = numbers.iter().map(into_row).collect::<Result<Vec<_>>>()?;

        let mut rows = self.city_numbers.lock().await;
        let mut inserted = 0;
        for row in new_rows {
            if !exists(&rows, &row.0, &row.1.number_value) {
                rows.push(row);
                inserted += 1;
            }
        }

        Ok(inserted)
    }

    /// Count all numbers stored for a city
    async fn count_city_numbers(&self, city: &str) -> Result<u64> {
        let rows = self.city_numbers.lock().await;
        Ok(rows.iter().filter(|(c, _)| c == city).count() as u64)
    }

    /// Fetch a window of a city's numbers ordered by price
    async fn fetch_city_numbers(
        &self,
        city: &str,
        sort: SortDirection,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<NumberEntry>> {
        let rows = self.city_numbers.lock().await;
        let mut entries: Vec<NumberEntry> = rows
            .iter()
            .filter(|(c, _)| c == city)
            .map(|(_, entry)| entry.clone())
            .collect();

        // Stable sort keeps insertion order between equal prices
        match sort {
            SortDirection::Asc => entries.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortDirection::Desc => entries.sort_by(|a, b| b.price.total_cmp(&a.price)),
        }

        Ok(entries
            .into_iter()
            .skip(offset.try_into().unwrap_or(usize::MAX))
            .take(limit as usize)
            .collect())
    }
}

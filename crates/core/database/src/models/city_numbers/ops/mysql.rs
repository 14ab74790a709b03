use callee_result::Result;
use sqlx::{MySql, QueryBuilder};

use crate::drivers::{map_error, TABLE};
use crate::MySqlDb;
use crate::{CityNumber, NumberEntry, SortDirection};

use super::AbstractCityNumbers;

/// MySQL allows at most 65535 placeholders per statement, three per row
const MAX_ROWS_PER_STATEMENT: usize = 65_535 / 3;

/// Build a multi-row `INSERT IGNORE` for the given rows
fn insert_ignore_query<'a>(rows: &'a [(&'a str, String, f64)]) -> QueryBuilder<'a, MySql> {
    let mut builder: QueryBuilder<MySql> = QueryBuilder::new(format!(
        "INSERT IGNORE INTO {TABLE} (city, number_value, price) "
    ));

    builder.push_values(rows, |mut row, (city, number_value, price)| {
        row.push_bind(*city)
            .push_bind(number_value.as_str())
            .push_bind(*price);
    });

    builder
}

#[async_trait]
impl AbstractCityNumbers for MySqlDb {
    /// Insert a single number, failing with `DuplicateKey` if the city already has it
    async fn insert_city_number(&self, number: &CityNumber) -> Result<()> {
        sqlx::query("INSERT INTO city_numbers (city, number_value, price) VALUES (?, ?, ?)")
            .bind(&number.city)
            .bind(number.number_value.to_string())
            .bind(number.price.to_price()?)
            .execute(&self.0)
            .await
            .map(|_| ())
            .map_err(map_error("insert"))
    }

    /// Insert many numbers at once, skipping any that already exist
    async fn insert_city_numbers_ignoring_duplicates(
        &self,
        numbers: &[CityNumber],
    ) -> Result<u64> {
        let rows = numbers
            .iter()
            .map(|number| {
                Ok((
                    number.city.as_str(),
                    number.number_value.to_string(),
                    number.price.to_price()?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        if rows.is_empty() {
            return Ok(0);
        }

        // A single statement is atomic on its own
        if rows.len() <= MAX_ROWS_PER_STATEMENT {
            return insert_ignore_query(&rows)
                .build()
                .execute(&self.0)
                .await
                .map(|result| result.rows_affected())
                .map_err(map_error("insert_ignore"));
        }

        let mut transaction = self.begin().await.map_err(map_error("begin"))?;
        let mut inserted = 0;

        for chunk in rows.chunks(MAX_ROWS_PER_STATEMENT) {
            inserted += insert_ignore_query(chunk)
                .build()
                .execute(&mut *transaction)
                .await
                .map_err(map_error("insert_ignore"))?
                .rows_affected();
        }

        transaction.commit().await.map_err(map_error("commit"))?;
        Ok(inserted)
    }

    /// Count all numbers stored for a city
    async fn count_city_numbers(&self, city: &str) -> Result<u64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM city_numbers WHERE city = ?")
            .bind(city)
            .fetch_one(&self.0)
            .await
            .map(|total| total as u64)
            .map_err(map_error("count"))
    }

    /// Fetch a window of a city's numbers ordered by price, then by insertion
    async fn fetch_city_numbers(
        &self,
        city: &str,
        sort: SortDirection,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<NumberEntry>> {
        let query = format!(
            "SELECT number_value, price FROM {TABLE} WHERE city = ? ORDER BY price {}, id ASC LIMIT ? OFFSET ?",
            sort.as_sql()
        );

        sqlx::query_as::<_, NumberEntry>(&query)
            .bind(city)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.0)
            .await
            .map_err(map_error("find"))
    }
}

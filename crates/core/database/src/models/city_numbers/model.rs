use std::fmt;

use callee_result::Result;

use crate::Database;

auto_derived!(
    /// Value of a spreadsheet cell or JSON field, which may be numeric or text
    #[serde(untagged)]
    pub enum CellValue {
        Number(f64),
        Text(String),
    }

    /// Number recorded against a city
    pub struct CityNumber {
        /// City this number is grouped under
        pub city: String,
        /// The number itself, stored as given
        pub number_value: CellValue,
        /// Price associated with the number
        pub price: CellValue,
    }

    /// Stored number as returned by lookups
    #[cfg_attr(feature = "mysql", derive(sqlx::FromRow))]
    pub struct NumberEntry {
        pub number_value: String,
        pub price: f64,
    }

    /// One page of a city's numbers
    pub struct NumberPage {
        /// Entries on this page
        pub entries: Vec<NumberEntry>,
        /// Number of entries across all pages
        pub total: u64,
    }
);

/// Order in which lookups return prices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Only an explicit `desc` sorts descending
    pub fn from_query(value: Option<&str>) -> SortDirection {
        match value {
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl CellValue {
    /// Whether this value would be treated as missing (empty text, zero or NaN)
    pub fn is_falsy(&self) -> bool {
        match self {
            CellValue::Number(value) => *value == 0.0 || value.is_nan(),
            CellValue::Text(value) => value.is_empty(),
        }
    }

    /// Interpret this value as a price
    pub fn to_price(&self) -> Result<f64> {
        let price = match self {
            CellValue::Number(value) => Some(*value),
            CellValue::Text(value) => value.trim().parse::<f64>().ok(),
        };

        price
            .filter(|price| price.is_finite())
            .ok_or_else(|| create_database_error!("coerce_price", "city_numbers"))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Integral numbers are written without a fractional part
            CellValue::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            CellValue::Number(value) => write!(f, "{value}"),
            CellValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl NumberPage {
    /// Number of pages needed to show every entry
    pub fn total_pages(&self, page_size: u32) -> u64 {
        self.total.div_ceil(u64::from(page_size.max(1)))
    }
}

impl CityNumber {
    /// Insert a single number for a city
    pub async fn create(
        db: &Database,
        city: String,
        number_value: CellValue,
        price: CellValue,
    ) -> Result<CityNumber> {
        let number = CityNumber {
            city,
            number_value,
            price,
        };

        db.insert_city_number(&number).await?;
        Ok(number)
    }

    /// Insert spreadsheet rows for a city, skipping numbers it already has
    ///
    /// Returns the number of rows actually persisted.
    pub async fn import(
        db: &Database,
        city: &str,
        rows: Vec<(CellValue, CellValue)>,
    ) -> Result<u64> {
        let numbers: Vec<CityNumber> = rows
            .into_iter()
            .map(|(number_value, price)| CityNumber {
                city: city.to_string(),
                number_value,
                price,
            })
            .collect();

        db.insert_city_numbers_ignoring_duplicates(&numbers).await
    }

    /// Fetch one page of a city's numbers along with the total count
    ///
    /// Pages start at 1, pages past the end are empty.
    pub async fn paginate(
        db: &Database,
        city: &str,
        page: u32,
        sort: SortDirection,
        page_size: u32,
    ) -> Result<NumberPage> {
        let total = db.count_city_numbers(city).await?;
        let offset = u64::from(page.saturating_sub(1)) * u64::from(page_size);
        let entries = db
            .fetch_city_numbers(city, sort, page_size, offset)
            .await?;

        Ok(NumberPage { entries, total })
    }
}

use axum_typed_multipart::{FieldData, TryFromMultipart};
use callee_database::{CellValue, NumberEntry, NumberPage};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use utoipa::ToSchema;

/// Successful root response
#[derive(Serialize, Debug, ToSchema)]
pub struct RootResponse {
    pub ledger: &'static str,
    pub version: &'static str,
}

/// Error response body
#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorResponse {
    /// Human readable reason
    pub error: String,
}

/// Request body for spreadsheet upload
#[derive(ToSchema, TryFromMultipart)]
pub struct UploadPayload {
    /// City to import the numbers into
    pub city: Option<String>,
    /// Spreadsheet whose first sheet holds a header row followed by (number, price) rows
    #[schema(value_type = Option<String>, format = Binary)]
    #[form_data(limit = "unlimited")] // handled by axum
    pub file: Option<FieldData<NamedTempFile>>,
}

/// Successful upload response
#[derive(Serialize, Debug, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    /// Rows submitted for insert, numbers the city already had are included
    pub inserted: usize,
}

/// Request body for adding a single number
#[derive(Deserialize, Debug, ToSchema)]
pub struct AddNumberPayload {
    /// City, numeric cities are stored as their text
    #[schema(value_type = Option<String>)]
    pub city: Option<CellValue>,
    /// Number, either numeric or text
    #[schema(value_type = Option<String>)]
    pub number: Option<CellValue>,
    /// Price, numeric or numeric text
    #[schema(value_type = Option<f64>)]
    pub price: Option<CellValue>,
}

/// Acknowledgement without payload
#[derive(Serialize, Debug, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Page of numbers for a city
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NumbersResponse {
    /// Pairs of `number_value` and `price`
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<NumberEntry>,
    /// Number of entries across all pages
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
}

impl NumbersResponse {
    /// Response for a lookup without a city
    pub fn empty() -> NumbersResponse {
        NumbersResponse {
            data: vec![],
            total: 0,
            page: None,
            total_pages: None,
        }
    }

    pub fn from_page(page: u32, page_size: u32, result: NumberPage) -> NumbersResponse {
        NumbersResponse {
            total_pages: Some(result.total_pages(page_size)),
            page: Some(page),
            total: result.total,
            data: result.entries,
        }
    }
}

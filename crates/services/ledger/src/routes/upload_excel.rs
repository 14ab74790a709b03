use axum::{extract::State, Json};
use axum_typed_multipart::{TypedMultipart, TypedMultipartError};
use callee_database::{CityNumber, Database};
use callee_result::{create_error, report_error, report_internal_error, Error, Result};
use callee_sheets::read_number_rows;
use tempfile::NamedTempFile;

use crate::types::{ErrorResponse, UploadPayload, UploadResponse};

/// Import the numbers of a spreadsheet held in a temporary file
///
/// The file is deleted before this returns, whatever the outcome.
/// Returns the number of rows submitted for insert.
pub async fn import_spreadsheet(db: &Database, city: &str, file: NamedTempFile) -> Result<usize> {
    let rows = tokio::task::spawn_blocking(move || {
        let bytes = report_internal_error!(std::fs::read(file.path()))?;
        read_number_rows(bytes)
    })
    .await
    .unwrap_or_else(|err| {
        Err(create_error!(SpreadsheetError {
            reason: err.to_string()
        }))
    });

    let rows = report_error!(rows, ImportFailed)?;
    if rows.is_empty() {
        return Err(create_error!(NoValidData));
    }

    let submitted = rows.len();
    let persisted = report_error!(CityNumber::import(db, city, rows).await, ImportFailed)?;

    tracing::info!(
        "Imported {persisted} of {submitted} numbers for {city}, {} skipped as duplicates",
        submitted as u64 - persisted
    );

    Ok(submitted)
}

/// Upload a spreadsheet of numbers
///
/// The first row of the first sheet is treated as a header. Each following row
/// supplies a number in column A and its price in column B, rows missing either
/// are skipped. Numbers the city already has are left untouched.
#[utoipa::path(
    post,
    path = "/api/upload-excel",
    tag = "Numbers",
    request_body(content_type = "multipart/form-data", content = UploadPayload),
    responses(
        (status = 200, description = "Rows were submitted for insert", body = UploadResponse),
        (status = 400, description = "Missing city or file, or no usable rows", body = ErrorResponse),
        (status = 500, description = "Import failed", body = ErrorResponse)
    )
)]
pub async fn upload_excel(
    State(db): State<Database>,
    payload: std::result::Result<TypedMultipart<UploadPayload>, TypedMultipartError>,
) -> Result<Json<UploadResponse>> {
    let (city, file) = match payload {
        Ok(TypedMultipart(UploadPayload {
            city: Some(city),
            file: Some(file),
        })) if !city.is_empty() => (city, file),
        _ => return Err(missing_city_or_file()),
    };

    import_spreadsheet(&db, &city, file.contents)
        .await
        .map(|inserted| {
            Json(UploadResponse {
                success: true,
                inserted,
            })
        })
}

fn missing_city_or_file() -> Error {
    create_error!(InvalidInput {
        reason: "city and file required".to_string()
    })
}

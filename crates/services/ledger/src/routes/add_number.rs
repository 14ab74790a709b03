use axum::{extract::rejection::JsonRejection, extract::State, Json};
use callee_database::{CityNumber, Database};
use callee_result::{create_error, ErrorType, Result};

use crate::types::{AddNumberPayload, ErrorResponse, SuccessResponse};

/// Add a single number
///
/// Each number may only be recorded once per city.
#[utoipa::path(
    post,
    path = "/api/add-number",
    tag = "Numbers",
    request_body = AddNumberPayload,
    responses(
        (status = 200, description = "Number was added", body = SuccessResponse),
        (status = 400, description = "Missing city, number or price", body = ErrorResponse),
        (status = 409, description = "City already has this number", body = ErrorResponse),
        (status = 500, description = "Insert failed", body = ErrorResponse)
    )
)]
pub async fn add_number(
    State(db): State<Database>,
    payload: std::result::Result<Json<AddNumberPayload>, JsonRejection>,
) -> Result<Json<SuccessResponse>> {
    let (city, number, price) = match payload {
        Ok(Json(AddNumberPayload {
            city: Some(city),
            number: Some(number),
            price: Some(price),
        })) if !city.is_falsy() && !number.is_falsy() => (city.to_string(), number, price),
        _ => {
            return Err(create_error!(InvalidInput {
                reason: "Invalid input".to_string()
            }))
        }
    };

    CityNumber::create(&db, city, number, price)
        .await
        .map(|_| Json(SuccessResponse { success: true }))
        .map_err(|err| match err.error_type {
            ErrorType::DuplicateKey => create_error!(DuplicateNumber),
            _ => {
                tracing::error!("{err}");
                create_error!(InsertFailed)
            }
        })
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::json;

    use crate::test::TestHarness;

    #[tokio::test]
    async fn added_number_is_visible() {
        let harness = TestHarness::new().await;
        let (status, body) = harness
            .post_json(
                "/api/add-number",
                json!({ "city": "Pune", "number": 9820011111u64, "price": 120.5 }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));

        let (_, body) = harness.get("/api/numbers?city=Pune").await;
        assert_eq!(body["total"], 1);
        assert_eq!(
            body["data"],
            json!([{ "number_value": "9820011111", "price": 120.5 }])
        );
    }

    #[tokio::test]
    async fn duplicate_number_conflicts() {
        let harness = TestHarness::new().await;
        let payload = json!({ "city": "Pune", "number": "A-100", "price": 10 });

        let (status, _) = harness.post_json("/api/add-number", payload.clone()).await;
        assert_eq!(status, StatusCode::OK);

        for _ in 0..2 {
            let (status, body) = harness.post_json("/api/add-number", payload.clone()).await;
            assert_eq!(status, StatusCode::CONFLICT);
            assert_eq!(body, json!({ "error": "Number already exists for this city" }));
        }

        let (status, _) = harness
            .post_json(
                "/api/add-number",
                json!({ "city": "Delhi", "number": "A-100", "price": 10 }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_fields_are_invalid() {
        let harness = TestHarness::new().await;
        let invalid = [
            json!({ "number": "1", "price": 1 }),
            json!({ "city": "", "number": "1", "price": 1 }),
            json!({ "city": "Pune", "price": 1 }),
            json!({ "city": "Pune", "number": "", "price": 1 }),
            json!({ "city": "Pune", "number": 0, "price": 1 }),
            json!({ "city": "Pune", "number": "1" }),
            json!({ "city": "Pune", "number": "1", "price": null }),
            json!({ "city": "Pune", "number": true, "price": 1 }),
        ];

        for payload in invalid {
            let (status, body) = harness.post_json("/api/add-number", payload).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({ "error": "Invalid input" }));
        }

        let (status, body) = harness
            .send(
                Request::post("/api/add-number")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"city\":"))
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid input" }));
    }

    #[tokio::test]
    async fn numeric_city_is_stored_as_text() {
        let harness = TestHarness::new().await;
        let (status, body) = harness
            .post_json(
                "/api/add-number",
                json!({ "city": 42, "number": "A-1", "price": 3 }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));

        let (_, body) = harness.get("/api/numbers?city=42").await;
        assert_eq!(body["total"], 1);

        let (status, _) = harness
            .post_json(
                "/api/add-number",
                json!({ "city": 0, "number": "A-1", "price": 3 }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn zero_price_is_accepted() {
        let harness = TestHarness::new().await;
        let (status, _) = harness
            .post_json(
                "/api/add-number",
                json!({ "city": "Pune", "number": "free", "price": 0 }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn unreadable_price_is_an_insert_failure() {
        let harness = TestHarness::new().await;
        let (status, body) = harness
            .post_json(
                "/api/add-number",
                json!({ "city": "Pune", "number": "1", "price": "cheap" }),
            )
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Insert failed" }));
    }
}

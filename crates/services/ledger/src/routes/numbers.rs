use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use callee_config::config;
use callee_database::{CityNumber, Database, SortDirection};
use callee_result::{create_error, report_error, Result};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::types::{ErrorResponse, NumbersResponse};

#[derive(Deserialize, IntoParams)]
pub struct NumbersQueryParams {
    /// City to look up, without it the result is empty
    pub city: Option<String>,
    /// Page to fetch, starting at 1
    pub page: Option<String>,
    /// `desc` to sort by descending price, ascending otherwise
    pub sort: Option<String>,
}

/// Read a page number the way a lenient integer parse would
///
/// Leading digits are used and anything that is not a positive integer means page 1.
fn parse_page(value: Option<&str>) -> u32 {
    value
        .map(|value| {
            value
                .trim_start()
                .chars()
                .take_while(char::is_ascii_digit)
                .collect::<String>()
        })
        .and_then(|digits| digits.parse::<u32>().ok())
        .filter(|page| *page > 0)
        .unwrap_or(1)
}

/// Look up numbers for a city
///
/// Results are paginated and ordered by price, numbers with equal prices keep
/// the order they were added in.
#[utoipa::path(
    get,
    path = "/api/numbers",
    tag = "Numbers",
    params(NumbersQueryParams),
    responses(
        (status = 200, description = "Page of numbers", body = NumbersResponse),
        (status = 500, description = "Lookup failed", body = ErrorResponse)
    )
)]
pub async fn numbers(
    State(db): State<Database>,
    params: std::result::Result<Query<NumbersQueryParams>, QueryRejection>,
) -> Result<Json<NumbersResponse>> {
    let Query(params) = params.map_err(|_| {
        create_error!(InvalidInput {
            reason: "Invalid input".to_string()
        })
    })?;

    let Some(city) = params.city.filter(|city| !city.is_empty()) else {
        return Ok(Json(NumbersResponse::empty()));
    };

    let page = parse_page(params.page.as_deref());
    let sort = SortDirection::from_query(params.sort.as_deref());
    let page_size = config().await.features.page_size;

    let result = report_error!(
        CityNumber::paginate(&db, &city, page, sort, page_size).await,
        QueryFailed
    )?;

    Ok(Json(NumbersResponse::from_page(page, page_size, result)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use callee_database::{CellValue, CityNumber};
    use serde_json::{json, Value};

    use super::parse_page;
    use crate::test::TestHarness;

    async fn seed(harness: &TestHarness, city: &str, count: usize) {
        let rows = (0..count)
            .map(|i| {
                (
                    CellValue::Text(format!("98200{i:05}")),
                    CellValue::Number(((i * 7) % 13) as f64),
                )
            })
            .collect();

        CityNumber::import(&harness.db, city, rows).await.unwrap();
    }

    fn prices(body: &Value) -> Vec<f64> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["price"].as_f64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn pages_through_results() {
        let harness = TestHarness::new().await;
        seed(&harness, "Mumbai", 25).await;

        for (page, rows) in [(1, 10), (2, 10), (3, 5), (4, 0)] {
            let (status, body) = harness
                .get(&format!("/api/numbers?city=Mumbai&page={page}"))
                .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["data"].as_array().unwrap().len(), rows);
            assert_eq!(body["total"], 25);
            assert_eq!(body["page"], page);
            assert_eq!(body["totalPages"], 3);
        }
    }

    #[tokio::test]
    async fn sorts_by_price() {
        let harness = TestHarness::new().await;
        seed(&harness, "Mumbai", 10).await;

        let (_, body) = harness.get("/api/numbers?city=Mumbai&sort=desc").await;
        let descending = prices(&body);
        assert!(descending.windows(2).all(|pair| pair[0] >= pair[1]));

        for uri in [
            "/api/numbers?city=Mumbai",
            "/api/numbers?city=Mumbai&sort=asc",
            "/api/numbers?city=Mumbai&sort=sideways",
        ] {
            let (_, body) = harness.get(uri).await;
            let ascending = prices(&body);
            assert_eq!(ascending.len(), 10);
            assert!(ascending.windows(2).all(|pair| pair[0] <= pair[1]));
        }
    }

    #[tokio::test]
    async fn missing_city_is_empty() {
        let harness = TestHarness::new().await;
        seed(&harness, "Mumbai", 3).await;

        for uri in [
            "/api/numbers",
            "/api/numbers?page=2&sort=desc",
            "/api/numbers?city=",
        ] {
            let (status, body) = harness.get(uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({ "data": [], "total": 0 }));
        }
    }

    #[tokio::test]
    async fn unknown_page_defaults_to_first() {
        let harness = TestHarness::new().await;
        seed(&harness, "Mumbai", 12).await;

        let (_, body) = harness.get("/api/numbers?city=Mumbai&page=zero").await;
        assert_eq!(body["page"], 1);
        assert_eq!(body["data"].as_array().unwrap().len(), 10);
    }

    #[test]
    fn page_parsing() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("3")), 3);
        assert_eq!(parse_page(Some(" 4")), 4);
        assert_eq!(parse_page(Some("2abc")), 2);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-2")), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("99999999999")), 1);
    }
}

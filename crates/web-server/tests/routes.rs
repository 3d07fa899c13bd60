use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use core_types::{County, Indicator, Observation};
use database::{seed::COUNTIES, DbError, StatsStore};
use rstest::{fixture, rstest};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;
use tower::ServiceExt;

/// In-memory stand-in for PostgreSQL that counts every call it receives.
#[derive(Default)]
struct MemoryStore {
    counties: Vec<County>,
    indicators: Vec<Indicator>,
    observations: Vec<Observation>,
    failing: bool,
    calls: AtomicUsize,
}

impl MemoryStore {
    fn check(&self) -> Result<(), DbError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(DbError::ConnectionConfigError("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl StatsStore for MemoryStore {
    async fn list_counties(&self) -> Result<Vec<County>, DbError> {
        self.check()?;
        Ok(self.counties.clone())
    }

    async fn get_county(&self, id: i32) -> Result<County, DbError> {
        self.check()?;
        self.counties
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(DbError::NotFound)
    }

    async fn list_indicators(&self) -> Result<Vec<Indicator>, DbError> {
        self.check()?;
        Ok(self.indicators.clone())
    }

    async fn get_observations(
        &self,
        indicator_code: &str,
        year: i32,
    ) -> Result<Vec<Observation>, DbError> {
        self.check()?;
        Ok(self
            .observations
            .iter()
            .filter(|o| o.indicator_code == indicator_code && o.year == year)
            .cloned()
            .collect())
    }
}

/// A store whose queries never complete, like a PostgreSQL session stuck on a lock.
struct StalledStore;

#[async_trait]
impl StatsStore for StalledStore {
    async fn list_counties(&self) -> Result<Vec<County>, DbError> {
        std::future::pending().await
    }

    async fn get_county(&self, _id: i32) -> Result<County, DbError> {
        std::future::pending().await
    }

    async fn list_indicators(&self) -> Result<Vec<Indicator>, DbError> {
        std::future::pending().await
    }

    async fn get_observations(&self, _code: &str, _year: i32) -> Result<Vec<Observation>, DbError> {
        std::future::pending().await
    }
}

fn observation(code: &str, county: Option<&County>, year: i32, value: rust_decimal::Decimal) -> Observation {
    Observation {
        indicator_code: code.to_string(),
        county_id: county.map(|c| c.id),
        county_name: county.map(|c| c.name.clone()),
        year,
        value,
    }
}

#[fixture]
fn store() -> Arc<MemoryStore> {
    let counties: Vec<County> = COUNTIES[..3].iter().map(|c| c.to_county()).collect();
    let observations = vec![
        observation("HH_SIZE", None, 2019, dec!(3.9)),
        observation("HH_SIZE", Some(&counties[0]), 2019, dec!(3.1)),
        observation("HH_SIZE", Some(&counties[1]), 2009, dec!(4.7)),
        observation("HH_SIZE_URBAN", None, 2019, dec!(2.9)),
    ];
    Arc::new(MemoryStore {
        counties,
        indicators: vec![
            Indicator {
                id: 1,
                code: "POP_TOTAL".to_string(),
                name: "Total population".to_string(),
                unit: "persons".to_string(),
            },
            Indicator {
                id: 2,
                code: "HH_SIZE".to_string(),
                name: "Average household size".to_string(),
                unit: "persons".to_string(),
            },
        ],
        observations,
        ..Default::default()
    })
}

fn app(store: &Arc<MemoryStore>) -> Router {
    web_server::build_router(store.clone(), Duration::from_secs(5))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[rstest]
#[tokio::test]
async fn county_by_id_returns_envelope(store: Arc<MemoryStore>) {
    let (status, body) = get(app(&store), "/counties/1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["name"], "Mombasa");
    assert_eq!(body["data"]["code"], "001");
    assert_eq!(body["data"]["former_province"], "Coast");
    assert!(body["data"]["area_sq_km"].is_number());
    assert_eq!(body["data"]["area_sq_km"].to_string(), "212.5");
    assert!(body.get("meta").is_none());
}

#[rstest]
#[tokio::test]
async fn unknown_county_is_404(store: Arc<MemoryStore>) {
    let (status, body) = get(app(&store), "/counties/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "County 999 not found");
}

#[rstest]
#[case("/counties/abc")]
#[case("/counties/1.5")]
#[case("/counties/99999999999")]
#[tokio::test]
async fn non_numeric_county_id_is_400_without_store_call(
    store: Arc<MemoryStore>,
    #[case] uri: &str,
) {
    let (status, body) = get(app(&store), uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("county id"));
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[rstest]
#[tokio::test]
async fn county_list_is_ordered_and_repeatable(store: Arc<MemoryStore>) {
    let (status, first) = get(app(&store), "/counties").await;
    let (_, second) = get(app(&store), "/counties").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = first["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(first, second);
}

#[rstest]
#[tokio::test]
async fn indicators_are_all_returned(store: Arc<MemoryStore>) {
    let (status, body) = get(app(&store), "/indicators").await;

    assert_eq!(status, StatusCode::OK);
    let codes: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["POP_TOTAL", "HH_SIZE"]);
}

#[rstest]
#[tokio::test]
async fn data_without_rows_is_empty_with_meta(store: Arc<MemoryStore>) {
    let (status, body) = get(app(&store), "/data?indicator=POP_TOTAL&year=2019").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "data": [], "meta": { "indicator": "POP_TOTAL", "year": 2019 } })
    );
}

#[rstest]
#[tokio::test]
async fn data_matches_code_and_year_exactly(store: Arc<MemoryStore>) {
    let (status, body) = get(app(&store), "/data?indicator=HH_SIZE&year=2019").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(row["indicator_code"], "HH_SIZE");
        assert_eq!(row["year"], 2019);
    }
    assert!(rows[0]["county_id"].is_null());
    assert_eq!(rows[1]["county_name"], "Mombasa");
    assert!(rows[1]["value"].is_number());
    assert_eq!(rows[1]["value"].to_string(), "3.1");
}

#[rstest]
#[case("/data?indicator=HH_SIZE&indicator=POP_TOTAL&year=2019")]
#[case("/data?indicator=HH_SIZE&year=2019&year=abc")]
#[case("/data?page=2&indicator=HH_SIZE&year=2019")]
#[tokio::test]
async fn repeated_data_params_use_the_first_value(store: Arc<MemoryStore>, #[case] uri: &str) {
    let (status, body) = get(app(&store), uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"], json!({ "indicator": "HH_SIZE", "year": 2019 }));
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[rstest]
#[case("/data?year=2019")]
#[case("/data?indicator=&year=2019")]
#[case("/data?indicator=POP_TOTAL")]
#[case("/data?indicator=POP_TOTAL&year=abc")]
#[case("/data?indicator=POP_TOTAL&year=1899")]
#[case("/data?indicator=POP_TOTAL&year=2101")]
#[tokio::test]
async fn invalid_data_params_are_400_without_store_call(
    store: Arc<MemoryStore>,
    #[case] uri: &str,
) {
    let (status, body) = get(app(&store), uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[rstest]
#[case("/counties")]
#[case("/counties/1")]
#[case("/indicators")]
#[case("/data?indicator=POP_TOTAL&year=2019")]
#[tokio::test]
async fn store_failures_are_opaque_500s(#[case] uri: &str) {
    let store = Arc::new(MemoryStore {
        failing: true,
        ..Default::default()
    });

    let (status, body) = get(app(&store), uri).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "An internal database error occurred");
    assert!(!body.to_string().contains("connection refused"));
}

#[rstest]
#[case("/counties")]
#[case("/counties/1")]
#[case("/indicators")]
#[case("/data?indicator=POP_TOTAL&year=2019")]
#[tokio::test]
async fn stalled_store_queries_end_in_500(#[case] uri: &str) {
    let app = web_server::build_router(Arc::new(StalledStore), Duration::from_millis(50));

    let (status, body) = tokio::time::timeout(Duration::from_secs(3), get(app, uri))
        .await
        .expect("request should finish once the query limit passes");

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "An internal database error occurred");
}

#[rstest]
#[tokio::test]
async fn versioned_prefix_serves_the_same_resources(store: Arc<MemoryStore>) {
    let (root_status, root) = get(app(&store), "/counties/2").await;
    let (api_status, api) = get(app(&store), "/api/v1/counties/2").await;

    assert_eq!(root_status, StatusCode::OK);
    assert_eq!(api_status, StatusCode::OK);
    assert_eq!(root, api);
}

#[rstest]
#[tokio::test]
async fn unknown_route_lists_registered_routes(store: Arc<MemoryStore>) {
    let (status, body) = get(app(&store), "/regions").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found");
    assert_eq!(body["requested_method"], "GET");
    assert_eq!(body["requested_path"], "/regions");
    let routes: Vec<&str> = body["available_routes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r.as_str().unwrap())
        .collect();
    assert!(routes.contains(&"GET /counties/:id"));
    assert!(routes.contains(&"GET /api/v1/data"));
    assert_eq!(routes.len(), web_server::registered_routes().len());
}

#[rstest]
#[tokio::test]
async fn health_check_answers_ok(store: Arc<MemoryStore>) {
    let response = app(&store)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

use crate::{
    envelope::{DataMeta, Envelope},
    error::AppError,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use core_types::{parse_county_id, parse_year, County, CoreError, Indicator, Observation};
use database::DbError;
use serde::Serialize;

/// Raw `/data` query string. Both fields are optional here so that a missing
/// value is reported as a validation error rather than an extractor rejection.
#[derive(Debug, Default)]
pub struct DataParams {
    pub indicator: Option<String>,
    pub year: Option<String>,
}

impl DataParams {
    /// Collects the recognised keys from decoded query pairs. A repeated key
    /// keeps its first value and unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "indicator" if params.indicator.is_none() => params.indicator = Some(value),
                "year" if params.year.is_none() => params.year = Some(value),
                _ => {}
            }
        }
        params
    }

    /// Returns the indicator code and year, or the first problem found.
    pub fn validate(self) -> Result<(String, i32), AppError> {
        let indicator = self
            .indicator
            .filter(|code| !code.is_empty())
            .ok_or_else(|| CoreError::MissingParameter("indicator".to_string()))?;
        let year = self
            .year
            .filter(|year| !year.is_empty())
            .ok_or_else(|| CoreError::MissingParameter("year".to_string()))?;
        let year = parse_year(&year)?;
        Ok((indicator, year))
    }
}

/// # GET /counties
pub async fn list_counties(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<County>>>, AppError> {
    let counties = state.store.list_counties().await?;
    Ok(Json(Envelope::new(counties)))
}

/// # GET /counties/:id
/// The id arrives as a raw string so a non-numeric value is a 400 with our
/// own error body and never reaches the store.
pub async fn get_county(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Envelope<County>>, AppError> {
    let id = parse_county_id(&raw_id)?;
    let county = state.store.get_county(id).await.map_err(|e| match e {
        DbError::NotFound => AppError::NotFound(format!("County {id} not found")),
        other => other.into(),
    })?;
    Ok(Json(Envelope::new(county)))
}

/// # GET /indicators
pub async fn list_indicators(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<Indicator>>>, AppError> {
    let indicators = state.store.list_indicators().await?;
    Ok(Json(Envelope::new(indicators)))
}

/// # GET /data?indicator=POP_TOTAL&year=2019
pub async fn get_data(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Envelope<Vec<Observation>, DataMeta>>, AppError> {
    let (indicator, year) = DataParams::from_pairs(pairs).validate()?;
    let observations = state.store.get_observations(&indicator, year).await?;
    tracing::debug!(%indicator, year, rows = observations.len(), "Fetched observations.");
    Ok(Json(Envelope::with_meta(
        observations,
        DataMeta { indicator, year },
    )))
}

#[derive(Debug, Serialize)]
struct RouteNotFound<'a> {
    error: &'static str,
    requested_method: String,
    requested_path: String,
    available_routes: &'a [String],
}

/// Fallback for unmatched routes: a 404 listing everything that is registered.
pub async fn not_found(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> impl IntoResponse {
    let body = RouteNotFound {
        error: "not found",
        requested_method: method.to_string(),
        requested_path: uri.path().to_string(),
        available_routes: &state.routes[..],
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

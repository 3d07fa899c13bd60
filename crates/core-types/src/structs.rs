use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// An administrative county. Seeded once and never modified through the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct County {
    pub id: i32,
    pub name: String,
    /// Zero-padded three digit code, e.g. "001" for Mombasa.
    pub code: String,
    /// The pre-2013 province the county belonged to.
    pub former_province: Option<String>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub area_sq_km: Decimal,
}

/// A statistical measure such as total population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Indicator {
    pub id: i32,
    /// Short token identifying the measure, e.g. "POP_TOTAL".
    pub code: String,
    pub name: String,
    pub unit: String,
}

/// A single indicator value for one year.
///
/// `county_id` is `None` for national figures that are not scoped to a county.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Observation {
    pub indicator_code: String,
    pub county_id: Option<i32>,
    pub county_name: Option<String>,
    pub year: i32,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub value: Decimal,
}

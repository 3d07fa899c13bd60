use crate::error::CoreError;

/// Earliest year accepted by the data endpoint.
pub const MIN_YEAR: i32 = 1900;
/// Latest year accepted by the data endpoint.
pub const MAX_YEAR: i32 = 2100;

/// Parses a county identifier taken from a URL path segment.
pub fn parse_county_id(raw: &str) -> Result<i32, CoreError> {
    raw.parse::<i32>()
        .map_err(|_| CoreError::InvalidInput("county id".to_string(), raw.to_string()))
}

/// Parses a year query parameter and checks it lies in `[MIN_YEAR, MAX_YEAR]`.
pub fn parse_year(raw: &str) -> Result<i32, CoreError> {
    let year = raw
        .parse::<i32>()
        .map_err(|_| CoreError::InvalidInput("year".to_string(), raw.to_string()))?;

    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(CoreError::InvalidInput(
            "year".to_string(),
            format!("{year} is outside {MIN_YEAR}..={MAX_YEAR}"),
        ));
    }

    Ok(year)
}

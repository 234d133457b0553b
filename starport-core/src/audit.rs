//! Field-level audit checks for candidate ship records.

use chrono::{Datelike, NaiveDateTime};

use crate::error::{Result, StarportError};

/// Maximum length for name and planet fields.
pub const MAX_LABEL_LEN: usize = 50;
/// Earliest accepted production year.
pub const MIN_PROD_YEAR: i32 = 2800;
/// Latest accepted production year.
pub const MAX_PROD_YEAR: i32 = 3019;
/// Minimum accepted speed.
pub const MIN_SPEED: f64 = 0.01;
/// Maximum accepted speed.
pub const MAX_SPEED: f64 = 0.99;
/// Minimum accepted crew size.
pub const MIN_CREW_SIZE: i32 = 1;
/// Maximum accepted crew size.
pub const MAX_CREW_SIZE: i32 = 9999;

fn audit_label(field: &str, value: &str) -> Result<()> {
    if value.is_empty() || value.chars().count() > MAX_LABEL_LEN {
        return Err(StarportError::Validation(format!(
            "{field} must be 1-{MAX_LABEL_LEN} characters"
        )));
    }
    Ok(())
}

/// Check the ship name length.
pub fn audit_name(name: &str) -> Result<()> {
    audit_label("name", name)
}

/// Check the planet name length.
pub fn audit_planet(planet: &str) -> Result<()> {
    audit_label("planet", planet)
}

/// Check that the production year falls in the accepted range.
pub fn audit_prod_date(prod_date: NaiveDateTime) -> Result<()> {
    let year = prod_date.year();
    if !(MIN_PROD_YEAR..=MAX_PROD_YEAR).contains(&year) {
        return Err(StarportError::Validation(format!(
            "prodDate year must be {MIN_PROD_YEAR}-{MAX_PROD_YEAR}, got {year}"
        )));
    }
    Ok(())
}

/// Check the speed range.
pub fn audit_speed(speed: f64) -> Result<()> {
    if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
        return Err(StarportError::Validation(format!(
            "speed must be {MIN_SPEED}-{MAX_SPEED}, got {speed}"
        )));
    }
    Ok(())
}

/// Check the crew size range.
pub fn audit_crew_size(crew_size: i32) -> Result<()> {
    if !(MIN_CREW_SIZE..=MAX_CREW_SIZE).contains(&crew_size) {
        return Err(StarportError::Validation(format!(
            "crewSize must be {MIN_CREW_SIZE}-{MAX_CREW_SIZE}, got {crew_size}"
        )));
    }
    Ok(())
}

/// Parse and validate a raw ship identifier.
///
/// Rejects the empty string, the literal `"0"` (an unset-id sentinel, not a
/// range check) and anything that is not a non-negative integer.
pub fn audit_id(raw: &str) -> Result<i64> {
    if raw.is_empty() || raw == "0" {
        return Err(StarportError::Validation(format!("invalid id: {raw:?}")));
    }
    let id: i64 = raw
        .parse()
        .map_err(|_| StarportError::Validation(format!("id is not an integer: {raw:?}")))?;
    if id < 0 {
        return Err(StarportError::Validation(format!(
            "id must not be negative: {id}"
        )));
    }
    Ok(id)
}

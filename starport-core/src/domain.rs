//! Domain entities for Starport.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::StarportError;

/// Ship hull classification.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShipType {
    /// Cargo and personnel transport.
    Transport,
    /// Military vessel.
    Military,
    /// Merchant vessel.
    Merchant,
}

impl ShipType {
    /// Stable uppercase label, as persisted and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipType::Transport => "TRANSPORT",
            ShipType::Military => "MILITARY",
            ShipType::Merchant => "MERCHANT",
        }
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipType {
    type Err = StarportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("TRANSPORT") {
            Ok(ShipType::Transport)
        } else if value.eq_ignore_ascii_case("MILITARY") {
            Ok(ShipType::Military)
        } else if value.eq_ignore_ascii_case("MERCHANT") {
            Ok(ShipType::Merchant)
        } else {
            Err(StarportError::Validation(format!(
                "unknown ship type: {value}"
            )))
        }
    }
}

/// A registered ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    /// Storage-assigned identifier, immutable after creation.
    pub id: i64,
    /// Ship name, 1-50 characters.
    pub name: String,
    /// Home planet, 1-50 characters.
    pub planet: String,
    /// Hull classification.
    pub ship_type: ShipType,
    /// Production timestamp; only the year is meaningful.
    pub prod_date: NaiveDateTime,
    /// Whether the ship has seen prior use.
    pub is_used: bool,
    /// Cruise speed, 0.01-0.99.
    pub speed: f64,
    /// Crew complement, 1-9999.
    pub crew_size: i32,
    /// Derived rating, rounded to two decimals.
    pub rating: f64,
}

/// A validated ship ready for insertion, before an id is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShip {
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Hull classification.
    pub ship_type: ShipType,
    /// Production timestamp.
    pub prod_date: NaiveDateTime,
    /// Whether the ship has seen prior use.
    pub is_used: bool,
    /// Cruise speed.
    pub speed: f64,
    /// Crew complement.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

/// Caller-supplied ship fields for create and update.
///
/// Every field is optional: create rejects missing required fields, update
/// treats absent fields as "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipInput {
    /// Ship name.
    pub name: Option<String>,
    /// Home planet.
    pub planet: Option<String>,
    /// Hull classification.
    pub ship_type: Option<ShipType>,
    /// Production timestamp.
    pub prod_date: Option<NaiveDateTime>,
    /// Whether the ship has seen prior use.
    pub is_used: Option<bool>,
    /// Cruise speed.
    pub speed: Option<f64>,
    /// Crew complement.
    pub crew_size: Option<i32>,
}

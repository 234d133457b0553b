//! Query filters, ordering and pagination for ship listings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Ship, ShipType};
use crate::error::StarportError;

/// Default page size for listings.
pub const DEFAULT_PAGE_SIZE: i64 = 3;

/// Optional query parameters combined into one conjunctive filter.
///
/// Every absent parameter contributes no constraint; an empty filter matches
/// every ship. Range bounds are inclusive on both ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipFilter {
    /// Substring match on the ship name.
    pub name: Option<String>,
    /// Substring match on the planet.
    pub planet: Option<String>,
    /// Exact hull classification match.
    pub ship_type: Option<ShipType>,
    /// Lower production-date bound, epoch milliseconds.
    pub after: Option<i64>,
    /// Upper production-date bound, epoch milliseconds.
    pub before: Option<i64>,
    /// Usage flag equality.
    pub is_used: Option<bool>,
    /// Lower speed bound.
    pub min_speed: Option<f64>,
    /// Upper speed bound.
    pub max_speed: Option<f64>,
    /// Lower crew size bound.
    pub min_crew_size: Option<i32>,
    /// Upper crew size bound.
    pub max_crew_size: Option<i32>,
    /// Lower rating bound.
    pub min_rating: Option<f64>,
    /// Upper rating bound.
    pub max_rating: Option<f64>,
}

impl ShipFilter {
    /// Whether the filter has no active constraints.
    pub fn is_empty(&self) -> bool {
        *self == ShipFilter::default()
    }

    /// Evaluate the conjunction of all active constraints against one ship.
    ///
    /// This is the reference semantics; the SQL pushdown in the server's
    /// store must agree with it.
    pub fn matches(&self, ship: &Ship) -> bool {
        if let Some(name) = &self.name
            && !ship.name.contains(name.as_str())
        {
            return false;
        }
        if let Some(planet) = &self.planet
            && !ship.planet.contains(planet.as_str())
        {
            return false;
        }
        if let Some(ship_type) = self.ship_type
            && ship.ship_type != ship_type
        {
            return false;
        }
        let prod_millis = ship.prod_date.and_utc().timestamp_millis();
        if let Some(after) = self.after
            && prod_millis < after
        {
            return false;
        }
        if let Some(before) = self.before
            && prod_millis > before
        {
            return false;
        }
        if let Some(is_used) = self.is_used
            && ship.is_used != is_used
        {
            return false;
        }
        in_range(ship.speed, self.min_speed, self.max_speed)
            && in_range(ship.crew_size, self.min_crew_size, self.max_crew_size)
            && in_range(ship.rating, self.min_rating, self.max_rating)
    }
}

fn in_range<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
    if let Some(min) = min
        && value < min
    {
        return false;
    }
    if let Some(max) = max
        && value > max
    {
        return false;
    }
    true
}

/// Sort column for ship listings.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShipOrder {
    /// Order by identifier.
    #[default]
    Id,
    /// Order by speed.
    Speed,
    /// Order by production date.
    Date,
    /// Order by rating.
    Rating,
}

impl ShipOrder {
    /// Stable uppercase label, as accepted in query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipOrder::Id => "ID",
            ShipOrder::Speed => "SPEED",
            ShipOrder::Date => "DATE",
            ShipOrder::Rating => "RATING",
        }
    }
}

impl fmt::Display for ShipOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipOrder {
    type Err = StarportError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("ID") {
            Ok(ShipOrder::Id)
        } else if value.eq_ignore_ascii_case("SPEED") {
            Ok(ShipOrder::Speed)
        } else if value.eq_ignore_ascii_case("DATE") {
            Ok(ShipOrder::Date)
        } else if value.eq_ignore_ascii_case("RATING") {
            Ok(ShipOrder::Rating)
        } else {
            Err(StarportError::Validation(format!(
                "unknown sort order: {value}"
            )))
        }
    }
}

/// Zero-based page selection for ship listings.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page_number: i64,
    /// Records per page.
    pub page_size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Offset of the first record on this page.
    pub fn offset(&self) -> i64 {
        self.page_number * self.page_size
    }
}

//! Database models for the Starport server.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use starport_core::{NewShip, Ship, ShipType, StarportError};

use crate::schema::ships;

#[derive(Debug, Clone, Queryable, Identifiable, Selectable, AsChangeset)]
#[diesel(table_name = ships)]
/// Ship database record.
pub struct ShipRow {
    /// Ship identifier.
    pub id: i64,
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Hull classification label.
    pub ship_type: String,
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

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ships)]
/// Insertable ship record; the id is assigned by the database.
pub struct NewShipRow {
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Hull classification label.
    pub ship_type: String,
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

impl TryFrom<ShipRow> for Ship {
    type Error = StarportError;

    fn try_from(row: ShipRow) -> Result<Self, Self::Error> {
        let ship_type: ShipType = row.ship_type.parse().map_err(|_| {
            StarportError::Storage(format!(
                "row {} holds unknown ship_type label {:?}",
                row.id, row.ship_type
            ))
        })?;
        Ok(Ship {
            id: row.id,
            name: row.name,
            planet: row.planet,
            ship_type,
            prod_date: row.prod_date,
            is_used: row.is_used,
            speed: row.speed,
            crew_size: row.crew_size,
            rating: row.rating,
        })
    }
}

impl From<&NewShip> for NewShipRow {
    fn from(ship: &NewShip) -> Self {
        Self {
            name: ship.name.clone(),
            planet: ship.planet.clone(),
            ship_type: ship.ship_type.as_str().to_string(),
            prod_date: ship.prod_date,
            is_used: ship.is_used,
            speed: ship.speed,
            crew_size: ship.crew_size,
            rating: ship.rating,
        }
    }
}

impl From<&Ship> for ShipRow {
    fn from(ship: &Ship) -> Self {
        Self {
            id: ship.id,
            name: ship.name.clone(),
            planet: ship.planet.clone(),
            ship_type: ship.ship_type.as_str().to_string(),
            prod_date: ship.prod_date,
            is_used: ship.is_used,
            speed: ship.speed,
            crew_size: ship.crew_size,
            rating: ship.rating,
        }
    }
}

//! Storage abstraction for ship records.

use crate::domain::{NewShip, Ship};
use crate::error::Result;
use crate::filter::{PageRequest, ShipFilter, ShipOrder};

/// Abstraction over ship persistence for testability.
///
/// Implementations are expected to execute each call as a single storage
/// transaction; this layer adds no locking of its own.
#[cfg_attr(test, mockall::automock)]
pub trait ShipStore {
    /// Insert a new ship and return it with its assigned id.
    fn insert(&self, ship: &NewShip) -> Result<Ship>;
    /// Persist every field of an existing ship.
    fn update(&self, ship: &Ship) -> Result<Ship>;
    /// Fetch a ship by id.
    fn find_by_id(&self, id: i64) -> Result<Option<Ship>>;
    /// Whether a ship with this id exists.
    fn exists_by_id(&self, id: i64) -> Result<bool>;
    /// Remove a ship permanently.
    fn delete_by_id(&self, id: i64) -> Result<()>;
    /// Fetch one page of ships matching the filter, in the given order.
    fn find_page(&self, filter: &ShipFilter, order: ShipOrder, page: &PageRequest)
    -> Result<Vec<Ship>>;
    /// Count all ships matching the filter.
    fn count(&self, filter: &ShipFilter) -> Result<u64>;
}

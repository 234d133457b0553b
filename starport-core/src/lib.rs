#![deny(missing_docs)]
//! Starport core library.
//!
//! This crate contains the domain types, validation rules, rating formula and
//! the storage-agnostic ship record service that power the Starport registry.

pub mod audit;
pub mod domain;
pub mod error;
pub mod filter;
pub mod rating;
pub mod service;
pub mod store;

pub use audit::audit_id;
pub use domain::{NewShip, Ship, ShipInput, ShipType};
pub use error::{Result, StarportError};
pub use filter::{DEFAULT_PAGE_SIZE, PageRequest, ShipFilter, ShipOrder};
pub use rating::compute_rating;
pub use service::ShipService;
pub use store::ShipStore;

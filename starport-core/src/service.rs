//! Ship record service orchestrating validation, rating and storage.

use crate::audit;
use crate::domain::{NewShip, Ship, ShipInput};
use crate::error::{Result, StarportError};
use crate::filter::{PageRequest, ShipFilter, ShipOrder};
use crate::rating::compute_rating;
use crate::store::ShipStore;

/// CRUD service over a [`ShipStore`] collaborator.
#[derive(Debug, Clone)]
pub struct ShipService<S> {
    store: S,
}

fn required(field: &str) -> StarportError {
    StarportError::Validation(format!("{field} is required"))
}

impl<S: ShipStore> ShipService<S> {
    /// Build a service around the given storage collaborator.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate a candidate ship, compute its rating and persist it.
    pub fn create(&self, input: ShipInput) -> Result<Ship> {
        let name = input.name.ok_or_else(|| required("name"))?;
        let planet = input.planet.ok_or_else(|| required("planet"))?;
        let ship_type = input.ship_type.ok_or_else(|| required("shipType"))?;
        let prod_date = input.prod_date.ok_or_else(|| required("prodDate"))?;
        let speed = input.speed.ok_or_else(|| required("speed"))?;
        let crew_size = input.crew_size.ok_or_else(|| required("crewSize"))?;

        audit::audit_name(&name)?;
        audit::audit_planet(&planet)?;
        audit::audit_prod_date(prod_date)?;
        audit::audit_speed(speed)?;
        audit::audit_crew_size(crew_size)?;

        let is_used = input.is_used.unwrap_or(false);
        let rating = compute_rating(speed, is_used, prod_date);
        self.store.insert(&NewShip {
            name,
            planet,
            ship_type,
            prod_date,
            is_used,
            speed,
            crew_size,
            rating,
        })
    }

    /// Fetch a ship by id.
    pub fn get(&self, id: i64) -> Result<Ship> {
        self.store.find_by_id(id)?.ok_or(StarportError::NotFound)
    }

    /// Apply the supplied fields to an existing ship and recompute its rating.
    ///
    /// Every supplied field is validated before any is applied, so a failed
    /// update persists none of its changes.
    pub fn update(&self, id: i64, input: ShipInput) -> Result<Ship> {
        let mut ship = self.get(id)?;

        if let Some(name) = &input.name {
            audit::audit_name(name)?;
        }
        if let Some(planet) = &input.planet {
            audit::audit_planet(planet)?;
        }
        if let Some(prod_date) = input.prod_date {
            audit::audit_prod_date(prod_date)?;
        }
        if let Some(speed) = input.speed {
            audit::audit_speed(speed)?;
        }
        if let Some(crew_size) = input.crew_size {
            audit::audit_crew_size(crew_size)?;
        }

        if let Some(name) = input.name {
            ship.name = name;
        }
        if let Some(planet) = input.planet {
            ship.planet = planet;
        }
        if let Some(ship_type) = input.ship_type {
            ship.ship_type = ship_type;
        }
        if let Some(prod_date) = input.prod_date {
            ship.prod_date = prod_date;
        }
        if let Some(is_used) = input.is_used {
            ship.is_used = is_used;
        }
        if let Some(speed) = input.speed {
            ship.speed = speed;
        }
        if let Some(crew_size) = input.crew_size {
            ship.crew_size = crew_size;
        }

        ship.rating = compute_rating(ship.speed, ship.is_used, ship.prod_date);
        self.store.update(&ship)
    }

    /// Remove a ship permanently.
    pub fn delete(&self, id: i64) -> Result<()> {
        if !self.store.exists_by_id(id)? {
            return Err(StarportError::NotFound);
        }
        self.store.delete_by_id(id)
    }

    /// Fetch one page of ships matching the filter.
    pub fn list(
        &self,
        filter: &ShipFilter,
        order: ShipOrder,
        page: &PageRequest,
    ) -> Result<Vec<Ship>> {
        self.store.find_page(filter, order, page)
    }

    /// Count all ships matching the filter.
    pub fn count(&self, filter: &ShipFilter) -> Result<u64> {
        self.store.count(filter)
    }

    /// Parse and validate a raw id string.
    pub fn parse_id(&self, raw: &str) -> Result<i64> {
        audit::audit_id(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::ShipService;
    use crate::domain::{NewShip, Ship, ShipInput, ShipType};
    use crate::error::StarportError;
    use crate::filter::{PageRequest, ShipFilter, ShipOrder};
    use crate::store::MockShipStore;
    use chrono::{NaiveDate, NaiveDateTime};

    fn prod_date(year: i32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, 1, 1)
            .expect("valid date")
            .and_hms_opt(0, 0, 0)
            .expect("valid time")
    }

    fn vostok_input() -> ShipInput {
        ShipInput {
            name: Some("Vostok".to_string()),
            planet: Some("Earth".to_string()),
            ship_type: Some(ShipType::Transport),
            prod_date: Some(prod_date(3000)),
            is_used: Some(false),
            speed: Some(0.5),
            crew_size: Some(100),
        }
    }

    fn stored(new: &NewShip, id: i64) -> Ship {
        Ship {
            id,
            name: new.name.clone(),
            planet: new.planet.clone(),
            ship_type: new.ship_type,
            prod_date: new.prod_date,
            is_used: new.is_used,
            speed: new.speed,
            crew_size: new.crew_size,
            rating: new.rating,
        }
    }

    fn existing_vostok() -> Ship {
        Ship {
            id: 7,
            name: "Vostok".to_string(),
            planet: "Earth".to_string(),
            ship_type: ShipType::Transport,
            prod_date: prod_date(3000),
            is_used: false,
            speed: 0.2,
            crew_size: 100,
            rating: 0.8,
        }
    }

    #[test]
    fn create_computes_rating_and_persists() {
        let mut store = MockShipStore::new();
        store
            .expect_insert()
            .withf(|new| new.rating == 2.0 && new.name == "Vostok" && !new.is_used)
            .returning(|new| Ok(stored(new, 1)));

        let service = ShipService::new(store);
        let ship = service.create(vostok_input()).expect("create succeeds");

        assert_eq!(ship.id, 1);
        assert_eq!(ship.rating, 2.0);
    }

    #[test]
    fn create_halves_rating_for_used_ship() {
        let mut store = MockShipStore::new();
        store
            .expect_insert()
            .withf(|new| new.rating == 1.0 && new.is_used)
            .returning(|new| Ok(stored(new, 2)));

        let service = ShipService::new(store);
        let input = ShipInput {
            is_used: Some(true),
            ..vostok_input()
        };
        let ship = service.create(input).expect("create succeeds");

        assert_eq!(ship.rating, 1.0);
    }

    #[test]
    fn create_defaults_is_used_to_false() {
        let mut store = MockShipStore::new();
        store
            .expect_insert()
            .withf(|new| !new.is_used)
            .returning(|new| Ok(stored(new, 3)));

        let service = ShipService::new(store);
        let input = ShipInput {
            is_used: None,
            ..vostok_input()
        };

        assert!(!service.create(input).expect("create succeeds").is_used);
    }

    #[test]
    fn create_rejects_missing_required_fields() {
        let service = ShipService::new(MockShipStore::new());

        let missing_variants = [
            ShipInput {
                name: None,
                ..vostok_input()
            },
            ShipInput {
                planet: None,
                ..vostok_input()
            },
            ShipInput {
                ship_type: None,
                ..vostok_input()
            },
            ShipInput {
                prod_date: None,
                ..vostok_input()
            },
            ShipInput {
                speed: None,
                ..vostok_input()
            },
            ShipInput {
                crew_size: None,
                ..vostok_input()
            },
        ];
        for input in missing_variants {
            let error = service.create(input).expect_err("must fail");
            assert!(matches!(error, StarportError::Validation(_)));
        }
    }

    #[test]
    fn create_rejects_out_of_range_fields() {
        let service = ShipService::new(MockShipStore::new());

        let invalid_variants = [
            ShipInput {
                name: Some(String::new()),
                ..vostok_input()
            },
            ShipInput {
                planet: Some("p".repeat(51)),
                ..vostok_input()
            },
            ShipInput {
                prod_date: Some(prod_date(2799)),
                ..vostok_input()
            },
            ShipInput {
                speed: Some(1.5),
                ..vostok_input()
            },
            ShipInput {
                crew_size: Some(10000),
                ..vostok_input()
            },
        ];
        for input in invalid_variants {
            let error = service.create(input).expect_err("must fail");
            assert!(matches!(error, StarportError::Validation(_)));
        }
    }

    #[test]
    fn get_returns_stored_ship() {
        let mut store = MockShipStore::new();
        store
            .expect_find_by_id()
            .withf(|id| *id == 7)
            .returning(|_| Ok(Some(existing_vostok())));

        let service = ShipService::new(store);
        assert_eq!(service.get(7).expect("get succeeds").name, "Vostok");
    }

    #[test]
    fn get_missing_id_is_not_found() {
        let mut store = MockShipStore::new();
        store.expect_find_by_id().returning(|_| Ok(None));

        let service = ShipService::new(store);
        assert_eq!(service.get(99).expect_err("must fail"), StarportError::NotFound);
    }

    #[test]
    fn update_applies_only_supplied_fields_and_recomputes_rating() {
        let mut store = MockShipStore::new();
        store
            .expect_find_by_id()
            .returning(|_| Ok(Some(existing_vostok())));
        store.expect_update().returning(|ship| Ok(ship.clone()));

        let service = ShipService::new(store);
        let input = ShipInput {
            speed: Some(0.5),
            ..ShipInput::default()
        };
        let ship = service.update(7, input).expect("update succeeds");

        assert_eq!(ship.speed, 0.5);
        assert_eq!(ship.name, "Vostok");
        assert_eq!(ship.crew_size, 100);
        assert!(!ship.is_used);
        // 80 * 0.5 / (3019 - 3000 + 1)
        assert_eq!(ship.rating, 2.0);
    }

    #[test]
    fn update_missing_id_is_not_found() {
        let mut store = MockShipStore::new();
        store.expect_find_by_id().returning(|_| Ok(None));

        let service = ShipService::new(store);
        let error = service
            .update(99, ShipInput::default())
            .expect_err("must fail");
        assert_eq!(error, StarportError::NotFound);
    }

    #[test]
    fn update_with_invalid_field_persists_nothing() {
        let mut store = MockShipStore::new();
        store
            .expect_find_by_id()
            .returning(|_| Ok(Some(existing_vostok())));
        // No update expectation: persisting here would fail the test.

        let service = ShipService::new(store);
        let input = ShipInput {
            name: Some("Voskhod".to_string()),
            speed: Some(1.5),
            ..ShipInput::default()
        };
        let error = service.update(7, input).expect_err("must fail");

        assert!(matches!(error, StarportError::Validation(_)));
    }

    #[test]
    fn delete_removes_existing_ship() {
        let mut store = MockShipStore::new();
        store.expect_exists_by_id().returning(|_| Ok(true));
        store
            .expect_delete_by_id()
            .withf(|id| *id == 7)
            .times(1)
            .returning(|_| Ok(()));

        let service = ShipService::new(store);
        service.delete(7).expect("delete succeeds");
    }

    #[test]
    fn delete_missing_id_is_not_found() {
        let mut store = MockShipStore::new();
        store.expect_exists_by_id().returning(|_| Ok(false));

        let service = ShipService::new(store);
        assert_eq!(service.delete(99).expect_err("must fail"), StarportError::NotFound);
    }

    #[test]
    fn list_delegates_filter_order_and_page() {
        let mut store = MockShipStore::new();
        store
            .expect_find_page()
            .withf(|filter, order, page| {
                filter.min_speed == Some(0.5)
                    && *order == ShipOrder::Rating
                    && page.page_number == 1
                    && page.page_size == 10
            })
            .returning(|_, _, _| Ok(vec![existing_vostok()]));

        let service = ShipService::new(store);
        let filter = ShipFilter {
            min_speed: Some(0.5),
            ..ShipFilter::default()
        };
        let page = PageRequest {
            page_number: 1,
            page_size: 10,
        };
        let ships = service
            .list(&filter, ShipOrder::Rating, &page)
            .expect("list succeeds");

        assert_eq!(ships.len(), 1);
    }

    #[test]
    fn count_delegates_filter() {
        let mut store = MockShipStore::new();
        store
            .expect_count()
            .withf(|filter| filter.is_used == Some(true))
            .returning(|_| Ok(4));

        let service = ShipService::new(store);
        let filter = ShipFilter {
            is_used: Some(true),
            ..ShipFilter::default()
        };

        assert_eq!(service.count(&filter).expect("count succeeds"), 4);
    }

    #[test]
    fn parse_id_validates_raw_strings() {
        let service = ShipService::new(MockShipStore::new());

        assert_eq!(service.parse_id("42").expect("valid id"), 42);
        assert!(service.parse_id("0").is_err());
        assert!(service.parse_id("abc").is_err());
    }
}

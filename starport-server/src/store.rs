//! Diesel-backed implementation of the ship storage trait.

use chrono::{DateTime, NaiveDateTime};
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::result::OptionalExtension;

use starport_core::{
    NewShip, PageRequest, Result, Ship, ShipFilter, ShipOrder, ShipStore, StarportError,
};

use crate::db::DbPool;
use crate::models::{NewShipRow, ShipRow};
use crate::schema::ships;

/// PostgreSQL ship store backed by a connection pool.
#[derive(Clone)]
pub struct PgShipStore {
    pool: DbPool,
}

impl PgShipStore {
    /// Build a store around the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>> {
        self.pool.get().map_err(storage_err)
    }
}

fn storage_err(err: impl std::fmt::Display) -> StarportError {
    StarportError::Storage(err.to_string())
}

// Filter bounds arrive as epoch milliseconds; values outside the
// representable timestamp range saturate so the comparison still holds.
fn millis_to_timestamp(millis: i64) -> NaiveDateTime {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.naive_utc())
        .unwrap_or(if millis < 0 {
            NaiveDateTime::MIN
        } else {
            NaiveDateTime::MAX
        })
}

/// Push every active filter constraint down into the SQL query.
///
/// Generic over the boxed selection so the same conjunction serves both row
/// loads and counts. Must agree with [`ShipFilter::matches`], the reference
/// semantics.
fn apply_filter<ST>(
    mut query: ships::BoxedQuery<'static, Pg, ST>,
    filter: &ShipFilter,
) -> ships::BoxedQuery<'static, Pg, ST> {
    if let Some(name) = &filter.name {
        query = query.filter(ships::name.like(format!("%{name}%")));
    }
    if let Some(planet) = &filter.planet {
        query = query.filter(ships::planet.like(format!("%{planet}%")));
    }
    if let Some(ship_type) = filter.ship_type {
        query = query.filter(ships::ship_type.eq(ship_type.as_str()));
    }
    if let Some(after) = filter.after {
        query = query.filter(ships::prod_date.ge(millis_to_timestamp(after)));
    }
    if let Some(before) = filter.before {
        query = query.filter(ships::prod_date.le(millis_to_timestamp(before)));
    }
    if let Some(is_used) = filter.is_used {
        query = query.filter(ships::is_used.eq(is_used));
    }
    if let Some(min_speed) = filter.min_speed {
        query = query.filter(ships::speed.ge(min_speed));
    }
    if let Some(max_speed) = filter.max_speed {
        query = query.filter(ships::speed.le(max_speed));
    }
    if let Some(min_crew_size) = filter.min_crew_size {
        query = query.filter(ships::crew_size.ge(min_crew_size));
    }
    if let Some(max_crew_size) = filter.max_crew_size {
        query = query.filter(ships::crew_size.le(max_crew_size));
    }
    if let Some(min_rating) = filter.min_rating {
        query = query.filter(ships::rating.ge(min_rating));
    }
    if let Some(max_rating) = filter.max_rating {
        query = query.filter(ships::rating.le(max_rating));
    }
    query
}

impl ShipStore for PgShipStore {
    fn insert(&self, ship: &NewShip) -> Result<Ship> {
        let mut conn = self.conn()?;
        let row = diesel::insert_into(ships::table)
            .values(NewShipRow::from(ship))
            .get_result::<ShipRow>(&mut conn)
            .map_err(storage_err)?;
        Ship::try_from(row)
    }

    fn update(&self, ship: &Ship) -> Result<Ship> {
        let mut conn = self.conn()?;
        let row = diesel::update(ships::table.find(ship.id))
            .set(&ShipRow::from(ship))
            .get_result::<ShipRow>(&mut conn)
            .map_err(storage_err)?;
        Ship::try_from(row)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ship>> {
        let mut conn = self.conn()?;
        let row = ships::table
            .find(id)
            .first::<ShipRow>(&mut conn)
            .optional()
            .map_err(storage_err)?;
        row.map(Ship::try_from).transpose()
    }

    fn exists_by_id(&self, id: i64) -> Result<bool> {
        let mut conn = self.conn()?;
        diesel::select(diesel::dsl::exists(
            ships::table.filter(ships::id.eq(id)),
        ))
        .get_result(&mut conn)
        .map_err(storage_err)
    }

    fn delete_by_id(&self, id: i64) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::delete(ships::table.find(id))
            .execute(&mut conn)
            .map_err(storage_err)?;
        Ok(())
    }

    fn find_page(
        &self,
        filter: &ShipFilter,
        order: ShipOrder,
        page: &PageRequest,
    ) -> Result<Vec<Ship>> {
        let mut conn = self.conn()?;
        let query = apply_filter(ships::table.into_boxed(), filter);
        let query = match order {
            ShipOrder::Id => query.order(ships::id.asc()),
            ShipOrder::Speed => query.order(ships::speed.asc()),
            ShipOrder::Date => query.order(ships::prod_date.asc()),
            ShipOrder::Rating => query.order(ships::rating.asc()),
        };
        let rows = query
            .offset(page.offset())
            .limit(page.page_size)
            .load::<ShipRow>(&mut conn)
            .map_err(storage_err)?;
        rows.into_iter().map(Ship::try_from).collect()
    }

    fn count(&self, filter: &ShipFilter) -> Result<u64> {
        let mut conn = self.conn()?;
        let counting = ships::table
            .select(diesel::dsl::count_star())
            .into_boxed();
        let total: i64 = apply_filter(counting, filter)
            .get_result(&mut conn)
            .map_err(storage_err)?;
        Ok(total.max(0) as u64)
    }
}

//! HTTP handlers for the Starport server.

use actix_web::{HttpResponse, Responder, delete, get, post, web};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};

use starport_core::{
    PageRequest, Ship, ShipFilter, ShipInput, ShipOrder, ShipService, ShipType, StarportError,
};

use crate::openapi::ApiDoc;
use crate::store::PgShipStore;

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Ship record service over the PostgreSQL store.
    pub service: ShipService<PgShipStore>,
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

/// Ship representation returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipResponse {
    /// Ship identifier.
    pub id: i64,
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Hull classification.
    pub ship_type: ShipType,
    /// Production date, epoch milliseconds.
    pub prod_date: i64,
    /// Whether the ship has seen prior use.
    pub is_used: bool,
    /// Cruise speed.
    pub speed: f64,
    /// Crew complement.
    pub crew_size: i32,
    /// Derived rating, two decimals.
    pub rating: f64,
}

impl From<Ship> for ShipResponse {
    fn from(ship: Ship) -> Self {
        Self {
            id: ship.id,
            name: ship.name,
            planet: ship.planet,
            ship_type: ship.ship_type,
            prod_date: ship.prod_date.and_utc().timestamp_millis(),
            is_used: ship.is_used,
            speed: ship.speed,
            crew_size: ship.crew_size,
            rating: ship.rating,
        }
    }
}

/// Request payload for creating or updating a ship.
///
/// Create rejects missing required fields; update leaves absent fields
/// unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ShipPayload {
    /// Ship name, 1-50 characters.
    pub name: Option<String>,
    /// Home planet, 1-50 characters.
    pub planet: Option<String>,
    /// Hull classification.
    pub ship_type: Option<ShipType>,
    /// Production date, epoch milliseconds; year must be 2800-3019.
    pub prod_date: Option<i64>,
    /// Whether the ship has seen prior use; defaults to false on create.
    pub is_used: Option<bool>,
    /// Cruise speed, 0.01-0.99.
    pub speed: Option<f64>,
    /// Crew complement, 1-9999.
    pub crew_size: Option<i32>,
}

fn millis_to_prod_date(millis: i64) -> Result<NaiveDateTime, StarportError> {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| StarportError::Validation(format!("prodDate out of range: {millis}")))
}

impl TryFrom<ShipPayload> for ShipInput {
    type Error = StarportError;

    fn try_from(payload: ShipPayload) -> Result<Self, Self::Error> {
        let prod_date = payload.prod_date.map(millis_to_prod_date).transpose()?;
        Ok(ShipInput {
            name: payload.name,
            planet: payload.planet,
            ship_type: payload.ship_type,
            prod_date,
            is_used: payload.is_used,
            speed: payload.speed,
            crew_size: payload.crew_size,
        })
    }
}

/// Query parameters for ship listing and counting.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct ShipQuery {
    /// Substring filter on the ship name.
    pub name: Option<String>,
    /// Substring filter on the planet.
    pub planet: Option<String>,
    /// Exact hull classification filter.
    pub ship_type: Option<ShipType>,
    /// Lower production-date bound, epoch milliseconds.
    pub after: Option<i64>,
    /// Upper production-date bound, epoch milliseconds.
    pub before: Option<i64>,
    /// Usage flag filter.
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
    /// Sort column, defaults to ID. Listing only.
    pub order: Option<ShipOrder>,
    /// Zero-based page index, defaults to 0. Listing only.
    pub page_number: Option<i64>,
    /// Records per page, defaults to 3. Listing only.
    pub page_size: Option<i64>,
}

impl ShipQuery {
    fn filter(&self) -> ShipFilter {
        ShipFilter {
            name: self.name.clone(),
            planet: self.planet.clone(),
            ship_type: self.ship_type,
            after: self.after,
            before: self.before,
            is_used: self.is_used,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            min_crew_size: self.min_crew_size,
            max_crew_size: self.max_crew_size,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
        }
    }

    fn page(&self) -> PageRequest {
        let default = PageRequest::default();
        PageRequest {
            page_number: self.page_number.unwrap_or(default.page_number),
            page_size: self.page_size.unwrap_or(default.page_size),
        }
    }

    fn order(&self) -> ShipOrder {
        self.order.unwrap_or_default()
    }
}

fn error_response(err: &StarportError) -> HttpResponse {
    let body = ErrorResponse {
        message: err.to_string(),
    };
    match err {
        StarportError::Validation(_) => HttpResponse::BadRequest().json(body),
        StarportError::NotFound => HttpResponse::NotFound().json(body),
        StarportError::Storage(_) => HttpResponse::InternalServerError().json(body),
    }
}

fn blocking_failure(err: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        message: format!("task failed: {err}"),
    })
}

#[utoipa::path(
    post,
    path = "/ships",
    request_body = ShipPayload,
    responses(
        (status = 200, description = "Created ship", body = ShipResponse),
        (status = 400, description = "Invalid ship fields", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships")]
/// Create a ship.
pub async fn ship_create(
    state: web::Data<AppState>,
    payload: web::Json<ShipPayload>,
) -> impl Responder {
    let service = state.service.clone();
    let payload = payload.into_inner();
    let result = web::block(move || {
        let input = ShipInput::try_from(payload)?;
        service.create(input)
    })
    .await;

    match result {
        Ok(Ok(ship)) => {
            log::info!("registered ship {} ({})", ship.id, ship.name);
            HttpResponse::Ok().json(ShipResponse::from(ship))
        }
        Ok(Err(err)) => error_response(&err),
        Err(err) => blocking_failure(err),
    }
}

#[utoipa::path(
    get,
    path = "/ships",
    params(ShipQuery),
    responses(
        (status = 200, description = "Matching page of ships", body = [ShipResponse])
    ),
    tag = "ships"
)]
#[get("/rest/ships")]
/// List ships matching the filters, paginated and sorted.
pub async fn ship_list(
    state: web::Data<AppState>,
    query: web::Query<ShipQuery>,
) -> impl Responder {
    let service = state.service.clone();
    let query = query.into_inner();
    let result = web::block(move || service.list(&query.filter(), query.order(), &query.page()))
        .await;

    match result {
        Ok(Ok(ships)) => HttpResponse::Ok().json(
            ships
                .into_iter()
                .map(ShipResponse::from)
                .collect::<Vec<_>>(),
        ),
        Ok(Err(err)) => error_response(&err),
        Err(err) => blocking_failure(err),
    }
}

#[utoipa::path(
    get,
    path = "/ships/count",
    params(ShipQuery),
    responses(
        (status = 200, description = "Total count of matching ships", body = u64)
    ),
    tag = "ships"
)]
#[get("/rest/ships/count")]
/// Count all ships matching the filters.
pub async fn ship_count(
    state: web::Data<AppState>,
    query: web::Query<ShipQuery>,
) -> impl Responder {
    let service = state.service.clone();
    let query = query.into_inner();
    let result = web::block(move || service.count(&query.filter())).await;

    match result {
        Ok(Ok(total)) => HttpResponse::Ok().json(total),
        Ok(Err(err)) => error_response(&err),
        Err(err) => blocking_failure(err),
    }
}

#[utoipa::path(
    get,
    path = "/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "The ship", body = ShipResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "No such ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/{id}")]
/// Fetch a ship by id.
pub async fn ship_get(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match state.service.parse_id(&path.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };
    let service = state.service.clone();
    let result = web::block(move || service.get(id)).await;

    match result {
        Ok(Ok(ship)) => HttpResponse::Ok().json(ShipResponse::from(ship)),
        Ok(Err(err)) => error_response(&err),
        Err(err) => blocking_failure(err),
    }
}

#[utoipa::path(
    post,
    path = "/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    request_body = ShipPayload,
    responses(
        (status = 200, description = "Updated ship", body = ShipResponse),
        (status = 400, description = "Invalid id or ship fields", body = ErrorResponse),
        (status = 404, description = "No such ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships/{id}")]
/// Apply the supplied fields to an existing ship.
pub async fn ship_update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<ShipPayload>,
) -> impl Responder {
    let id = match state.service.parse_id(&path.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };
    let service = state.service.clone();
    let payload = payload.into_inner();
    let result = web::block(move || {
        let input = ShipInput::try_from(payload)?;
        service.update(id, input)
    })
    .await;

    match result {
        Ok(Ok(ship)) => HttpResponse::Ok().json(ShipResponse::from(ship)),
        Ok(Err(err)) => error_response(&err),
        Err(err) => blocking_failure(err),
    }
}

#[utoipa::path(
    delete,
    path = "/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship deleted"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "No such ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[delete("/rest/ships/{id}")]
/// Delete a ship permanently.
pub async fn ship_delete(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match state.service.parse_id(&path.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };
    let service = state.service.clone();
    let result = web::block(move || service.delete(id)).await;

    match result {
        Ok(Ok(())) => {
            log::info!("deleted ship {id}");
            HttpResponse::Ok().finish()
        }
        Ok(Err(err)) => error_response(&err),
        Err(err) => blocking_failure(err),
    }
}

#[utoipa::path(
    get,
    path = "/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/rest/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

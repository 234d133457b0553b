//! OpenAPI specification for the Starport server.

use utoipa::OpenApi;

use starport_core::{ShipOrder, ShipType};

use crate::routes::{ErrorResponse, ShipPayload, ShipResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::ship_create,
        crate::routes::ship_list,
        crate::routes::ship_count,
        crate::routes::ship_get,
        crate::routes::ship_update,
        crate::routes::ship_delete,
        crate::routes::openapi_json
    ),
    components(
        schemas(
            ShipResponse,
            ShipPayload,
            ShipType,
            ShipOrder,
            ErrorResponse
        )
    ),
    tags(
        (name = "ships", description = "Ship registry"),
        (name = "system", description = "System endpoints")
    )
)]
/// OpenAPI specification for the Starport server.
pub struct ApiDoc;

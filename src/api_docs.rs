use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::auth::register,
        api::auth::login,
        api::auth::refresh,
        api::units::list_units,
        api::units::create_unit,
        // Add other endpoints here as we document them
    ),
    tags(
        (name = "coursenotes", description = "Course notes API")
    )
)]
pub struct ApiDoc;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tally API",
        version = "0.1.0",
        description = "Back-office API for a point-of-sale operation: employees, categories, and products."
    ),
    paths(
        crate::routes::health,
        crate::routes::auth::token,
        crate::routes::auth::refresh,
        crate::routes::auth::me,
        crate::routes::categories::create,
        crate::routes::categories::list,
        crate::routes::categories::get,
        crate::routes::categories::update,
        crate::routes::categories::delete,
        crate::routes::products::create,
        crate::routes::products::list,
        crate::routes::products::get,
        crate::routes::products::update,
        crate::routes::products::delete,
        crate::routes::users::create,
        crate::routes::users::list,
        crate::routes::users::get,
        crate::routes::users::update,
        crate::routes::users::deactivate,
        crate::routes::users::reactivate,
    ),
    components(schemas(
        crate::dto::TokenRequest,
        crate::dto::TokenResponse,
        crate::dto::RefreshRequest,
        crate::dto::UserRequest,
        crate::dto::UserResponse,
        crate::dto::UserListResponse,
        crate::dto::CategoryRequest,
        crate::dto::CategoryResponse,
        crate::dto::ProductRequest,
        crate::dto::ProductResponse,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "auth", description = "Login, token refresh, and identity"),
        (name = "users", description = "Employee management (admin only)"),
        (name = "categories", description = "Product category management"),
        (name = "products", description = "Product management"),
        (name = "system", description = "Health and system status"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Adds Bearer token security scheme to the OpenAPI spec.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Access token obtained from POST /v1/token.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

//! OpenAPI documentation configuration

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Combined OpenAPI documentation for the Storefront API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "Catalog, categories, moderated product reviews and the contact inbox",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/products", api = domain_products::ProductsApiDoc),
        (path = "/api/categories", api = domain_products::CategoriesApiDoc),
        (path = "/api/reviews", api = domain_reviews::ApiDoc),
        (path = "/api/messages", api = domain_messages::ApiDoc)
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Categories", description = "Category management endpoints"),
        (name = "Reviews", description = "Review submission and moderation endpoints"),
        (name = "Messages", description = "Contact form and support inbox endpoints")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by write endpoints.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

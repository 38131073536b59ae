pub mod actions;
pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod resource;
pub mod routes;
pub mod seed;
pub mod state;
pub mod store;
pub mod utils;

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::openapi::path::{
    HttpMethod, OperationBuilder, ParameterBuilder, ParameterIn,
};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityRequirement, SecurityScheme};
use utoipa::openapi::{Required, ResponseBuilder};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::routes::v1::ResourceDoc;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Backoffice API",
        version = "1.0.0",
        description = "Admin and commerce backoffice: generic CRUD over every managed resource"
    ),
    paths(
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::auth::oauth_redirect,
        handlers::health::health,
    ),
    components(schemas(
        error::ErrorBody,
        models::shared::TargetPayload,
        models::shared::StatusPayload,
        backoffice_common::Affected,
    )),
    tags(
        (name = "Auth", description = "Sign-in, sign-out and the current user"),
        (name = "Health", description = "Diagnostics"),
    ),
    modifiers(&SecurityAddon, &ResourcePaths),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Documents the generic routes of every mounted resource.
struct ResourcePaths;

impl ResourcePaths {
    fn operation(doc: &ResourceDoc, id: &str, summary: String, ok: &str) -> OperationBuilder {
        OperationBuilder::new()
            .tag(doc.name)
            .operation_id(Some(format!("{id}_{}", doc.name)))
            .summary(Some(summary))
            .response("200", ResponseBuilder::new().description(ok).build())
            .response("401", ResponseBuilder::new().description("TOKEN_MISSING, TOKEN_INVALID").build())
            .response("403", ResponseBuilder::new().description("PERMISSION_DENIED").build())
            .security(SecurityRequirement::new("jwt", Vec::<String>::new()))
    }

    fn json_body() -> Option<utoipa::openapi::request_body::RequestBody> {
        Some(
            RequestBodyBuilder::new()
                .description(Some("JSON object"))
                .required(Some(Required::True))
                .build(),
        )
    }

    fn id_param() -> utoipa::openapi::path::Parameter {
        ParameterBuilder::new()
            .name("id")
            .parameter_in(ParameterIn::Path)
            .required(Required::True)
            .description(Some("Internal key (digits) or uid"))
            .build()
    }
}

impl Modify for ResourcePaths {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        for doc in routes::v1::resources().into_iter().map(|m| m.doc) {
            let base = format!("/api/v1{}", doc.path);
            let item = format!("{base}/{{id}}");

            let list = Self::operation(&doc, "list", format!("List {}", doc.name), "CursorPage")
                .parameter(
                    ParameterBuilder::new()
                        .name("cursor")
                        .parameter_in(ParameterIn::Query)
                        .description(Some("Opaque next_cursor from the previous page")),
                )
                .parameter(
                    ParameterBuilder::new()
                        .name("limit")
                        .parameter_in(ParameterIn::Query)
                        .description(Some("Page size, 1-100, default 20")),
                )
                .parameter(
                    ParameterBuilder::new()
                        .name("search")
                        .parameter_in(ParameterIn::Query),
                );
            openapi
                .paths
                .add_path_operation(&base, vec![HttpMethod::Get], list.build());

            let create = Self::operation(&doc, "create", format!("Create {}", doc.name), "Envelope")
                .request_body(Self::json_body())
                .response("400", ResponseBuilder::new().description("VALIDATION_ERROR").build())
                .response("409", ResponseBuilder::new().description("CONFLICT").build());
            openapi
                .paths
                .add_path_operation(&base, vec![HttpMethod::Post], create.build());

            let delete = Self::operation(&doc, "delete", format!("Delete {}", doc.name), "Envelope with affected count")
                .request_body(Self::json_body())
                .response("400", ResponseBuilder::new().description("MISSING_FIELDS").build());
            openapi
                .paths
                .add_path_operation(&base, vec![HttpMethod::Delete], delete.build());

            let show = Self::operation(&doc, "show", format!("Get one {}", doc.name), "Row")
                .parameter(Self::id_param())
                .response("404", ResponseBuilder::new().description("NOT_FOUND").build());
            openapi
                .paths
                .add_path_operation(&item, vec![HttpMethod::Get], show.build());

            let update = Self::operation(&doc, "update", format!("Replace {}", doc.name), "Envelope")
                .parameter(Self::id_param())
                .request_body(Self::json_body())
                .response("400", ResponseBuilder::new().description("VALIDATION_ERROR").build())
                .response("404", ResponseBuilder::new().description("NOT_FOUND").build());
            openapi
                .paths
                .add_path_operation(&item, vec![HttpMethod::Put], update.build());

            if doc.has_status {
                let status = Self::operation(&doc, "status", format!("Change {} status", doc.name), "Envelope with affected count")
                    .request_body(Self::json_body())
                    .response("400", ResponseBuilder::new().description("MISSING_FIELDS, VALIDATION_ERROR").build());
                openapi.paths.add_path_operation(
                    format!("{base}/status"),
                    vec![HttpMethod::Post],
                    status.build(),
                );
            }
        }
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(config.max_age))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let api = ApiDoc::openapi();
    let cors = cors_layer(&state.config.server.cors);

    axum::Router::new()
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api))
}

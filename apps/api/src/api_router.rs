use atrium_core::AppError;
use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::pages::TENANT_HEADER;
use crate::middleware::{self, RouteGuard};
use crate::state::AppState;

mod route_table;

use route_table::route_table;


/// Builds the HTTP router with every declared route behind the policy gate.
pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let mut router = Router::new();
    for declaration in route_table() {
        tracing::debug!(
            method = ?declaration.method,
            path = declaration.path,
            access = ?declaration.access,
            "registering route"
        );

        let guard = RouteGuard::new(app_state.policy_gate.clone(), declaration.access);
        router = router.route(
            declaration.path,
            declaration
                .handler
                .route_layer(from_fn_with_state(guard, middleware::enforce_route_access)),
        );
    }

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static(TENANT_HEADER),
        ]);

    Ok(router
        .layer(from_fn_with_state(
            app_state.clone(),
            middleware::authenticate_bearer,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}

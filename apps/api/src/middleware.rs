use atrium_application::{GateDecision, PolicyGate, RouteAccess};
use atrium_domain::AdminIdentity;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiResult;
use crate::state::AppState;

/// Attaches the [`AdminIdentity`] of a valid bearer token to the request.
///
/// Requests without a usable token pass through unchanged; the policy gate
/// decides whether the route needs one.
pub async fn authenticate_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = bearer_token(request.headers()).and_then(|token| {
        state
            .auth_service
            .authenticate(token)
            .inspect_err(|error| tracing::debug!(error = %error, "ignoring bearer token"))
            .ok()
    });

    if let Some(identity) = identity {
        request.extensions_mut().insert(identity);
    }

    next.run(request).await
}

/// Access rule of one route together with the gate that enforces it.
#[derive(Clone)]
pub struct RouteGuard {
    gate: PolicyGate,
    access: RouteAccess,
}

impl RouteGuard {
    pub fn new(gate: PolicyGate, access: RouteAccess) -> Self {
        Self { gate, access }
    }
}

pub async fn enforce_route_access(
    State(guard): State<RouteGuard>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = request.extensions().get::<AdminIdentity>().cloned();

    match guard.gate.evaluate(&guard.access, identity.as_ref()).await? {
        GateDecision::Public => {}
        GateDecision::Allowed(ability) => {
            request.extensions_mut().insert(ability);
        }
    }

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

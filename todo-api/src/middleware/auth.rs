/// Bearer-token authentication layer
///
/// Validates the `Authorization` header on protected routes and stores the
/// resulting [`AuthContext`] in request extensions. Any failure ends the
/// request with 401 before the handler runs.

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use todo_shared::auth::middleware::authenticate;
use tracing::{debug, warn};

pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let context = authenticate(req.headers(), &state.tokens).map_err(|err| {
        warn!(path = %req.uri().path(), error = %err, "Rejected request");
        ApiError::from(err)
    })?;

    debug!(user_id = %context.user_id, "Authenticated request");
    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}

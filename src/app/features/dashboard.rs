use axum::{
    extract::State,
    response::Redirect,
    routing::get,
    Router,
};

use crate::app::{
    authz::{dashboard, guard},
    error::AppError,
    identity::IdentityRef,
    AppState,
};

/// GET /app — Send the principal to their role's default landing page.
pub async fn show(
    identity: IdentityRef,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let user = guard::resolve(&state.db, identity.as_deref()).await?;
    // Routing convenience only; a stored symbol that fails to parse still
    // lands somewhere harmless.
    Ok(Redirect::to(dashboard::landing_path_for_symbol(
        &user.organization_role,
    )))
}

/// Dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/app", get(show))
}

//! Role gates.
//!
//! Two forms of the same check:
//! 1. `require_*` functions for `middleware::from_fn_with_state`, used on
//!    whole routers
//! 2. `Require*` extractors, used on single handlers whose router is gated
//!    more loosely

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use scholaris_auth::Role;
use scholaris_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Fails with `403` unless `auth_user` holds one of `allowed`.
pub fn ensure_role(auth_user: &AuthUser, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&auth_user.role()) {
        return Ok(());
    }

    let names: Vec<&str> = allowed.iter().map(Role::as_str).collect();
    Err(AppError::forbidden(anyhow::anyhow!(
        "Access denied. Required role: {}",
        names.join(" or ")
    )))
}

pub async fn require_roles(
    state: &AppState,
    req: Request,
    next: Next,
    allowed: &[Role],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, state).await?;
    ensure_role(&auth_user, allowed)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Admin-only routers.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    require_roles(&state, req, next, &[Role::Admin])
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

/// Routers open to admins and teachers.
pub async fn require_staff(State(state): State<AppState>, req: Request, next: Next) -> Response {
    require_roles(&state, req, next, &[Role::Admin, Role::Teacher])
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

/// Any authenticated user.
pub async fn require_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    require_roles(&state, req, next, &Role::ALL)
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

/// Handler extractor for admin-only operations.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        ensure_role(&auth_user, &[Role::Admin])?;
        Ok(RequireAdmin(auth_user))
    }
}

/// Handler extractor for operations open to admins and teachers.
#[derive(Debug, Clone)]
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        ensure_role(&auth_user, &[Role::Admin, Role::Teacher])?;
        Ok(RequireStaff(auth_user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scholaris_auth::Claims;

    fn user(role: Role) -> AuthUser {
        AuthUser(Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            username: "u".to_string(),
            role,
            exp: 9999999999,
            iat: 1234567890,
        })
    }

    #[test]
    fn allows_listed_roles() {
        assert!(ensure_role(&user(Role::Admin), &[Role::Admin]).is_ok());
        assert!(ensure_role(&user(Role::Teacher), &[Role::Admin, Role::Teacher]).is_ok());
    }

    #[test]
    fn forbids_other_roles() {
        let err = ensure_role(&user(Role::Student), &[Role::Admin, Role::Teacher]).unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
        assert_eq!(err.message(), "Access denied. Required role: admin or teacher");
    }
}

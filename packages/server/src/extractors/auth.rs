use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;
use crate::guard::AccessScope;
use crate::state::AppState;
use crate::store::FarmerProfile;
use crate::utils::jwt::{self, Role};

/// Authenticated caller extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication.
/// Role checks happen via `require_farmer()` / `require_admin()` in the handler body.
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
    pub name: String,
    pub email: String,
}

impl AuthUser {
    pub fn require_farmer(&self) -> Result<(), AppError> {
        self.require_role(Role::Farmer)
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        self.require_role(Role::Admin)
    }

    fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }

    /// Records this caller may read or delete.
    pub fn scope(&self) -> AccessScope {
        match self.role {
            Role::Admin => AccessScope::Unrestricted,
            Role::Farmer => AccessScope::Owner(self.user_id),
        }
    }

    /// Directory entry for this caller, as asserted by the token.
    pub fn profile(&self) -> FarmerProfile {
        FarmerProfile {
            id: self.user_id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims = jwt::verify(token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::TokenInvalid)?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
            name: claims.name,
            email: claims.email,
        })
    }
}

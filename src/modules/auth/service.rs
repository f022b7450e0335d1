use sqlx::PgPool;
use tracing::{instrument, warn};
use uuid::Uuid;

use scholaris_auth::create_access_token;
use scholaris_config::JwtConfig;
use scholaris_core::{AppError, verify_password};
use scholaris_observability::{track_login_failure, track_login_success};

use crate::modules::auth::model::{LoginRequest, LoginResponse, UserCredentials, UserInfo};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto, jwt_config), fields(username = %dto.username))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let user = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, username, password, role FROM users WHERE username = $1",
        )
        .bind(dto.username.trim())
        .fetch_optional(db)
        .await?;

        let Some(user) = user else {
            track_login_failure("unknown_user");
            warn!("login attempt for unknown user");
            return Err(AppError::unauthorized(anyhow::anyhow!(INVALID_CREDENTIALS)));
        };

        if !verify_password(&dto.password, &user.password)? {
            track_login_failure("bad_password");
            warn!(user_id = %user.id, "login attempt with wrong password");
            return Err(AppError::unauthorized(anyhow::anyhow!(INVALID_CREDENTIALS)));
        }

        let access_token =
            create_access_token(user.id.into_inner(), &user.username, user.role, jwt_config)?;
        track_login_success(user.role.as_str());

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_config.access_token_expiry,
            user: UserInfo {
                id: user.id,
                username: user.username,
                role: user.role,
            },
        })
    }

    #[instrument(skip(db))]
    pub async fn get_current_user(db: &PgPool, user_id: Uuid) -> Result<UserInfo, AppError> {
        sqlx::query_as::<_, UserInfo>("SELECT id, username, role FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }
}

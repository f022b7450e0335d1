use scholaris_config::{CorsConfig, JwtConfig, SchoolConfig};
use scholaris_documents::SchoolHeader;
use sqlx::PgPool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub school_config: SchoolConfig,
}

impl AppState {
    /// Builds state around an existing pool, reading the rest from the environment.
    pub fn with_pool(db: PgPool) -> Self {
        Self {
            db,
            jwt_config: JwtConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            school_config: SchoolConfig::from_env(),
        }
    }

    /// The letterhead printed on generated documents.
    pub fn school_header(&self) -> SchoolHeader {
        SchoolHeader {
            name: self.school_config.name.clone(),
            address: self.school_config.address.clone(),
            cif: self.school_config.cif.clone(),
        }
    }
}

/// Connects to the database, applies migrations and loads configuration.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db = scholaris_db::init_db_pool().await?;
    scholaris_db::run_migrations(&db).await?;
    Ok(AppState::with_pool(db))
}

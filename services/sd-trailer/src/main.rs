//! sd-trailer 服务入口

use dealer_bootstrap::Infrastructure;
use dealer_errors::AppError;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 不存在时忽略
    dotenvy::dotenv().ok();

    dealer_bootstrap::run("config", |infra: Infrastructure| async move {
        let pool = infra.postgres_pool();

        if infra.config().database.run_migrations {
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {}", e)))?;
            info!("Database migrations applied");
        }

        let state = sd_trailer::build_state(infra.config(), pool)?;
        info!("Handlers initialized");
        Ok(sd_trailer::api::router(state))
    })
    .await
}

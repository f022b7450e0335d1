use dotenvy::dotenv;
use tracing::{error, info};

use scholaris::router::init_router;
use scholaris::state::init_app_state;
use scholaris_config::ServerConfig;
use scholaris_observability::{init_tracing, shutdown_tracer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let server = ServerConfig::from_env();

    let state = match init_app_state().await {
        Ok(state) => state,
        Err(err) => {
            error!(error = %err, "failed to initialise application state");
            shutdown_tracer().await;
            return Err(err);
        }
    };

    #[cfg(feature = "observability")]
    if let Some(handle) = scholaris_observability::init_metrics() {
        let metrics_addr = server.metrics_addr();
        tokio::spawn(async move {
            match tokio::net::TcpListener::bind(metrics_addr).await {
                Ok(listener) => {
                    info!(%metrics_addr, "metrics endpoint listening");
                    if let Err(err) =
                        axum::serve(listener, scholaris_observability::metrics_app(handle)).await
                    {
                        error!(error = %err, "metrics server stopped");
                    }
                }
                Err(err) => error!(error = %err, %metrics_addr, "failed to bind metrics endpoint"),
            }
        });
    }

    let app = init_router(state);
    let api_addr = server.api_addr();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;

    info!(address = %api_addr, "server running");
    info!("Swagger UI available at http://{}/swagger-ui", api_addr);
    info!("Scalar UI available at http://{}/scalar", api_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    shutdown_tracer().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }
}

use std::sync::Arc;

use pilotai::api::DynAPI;
use pilotai::config::Config;
use pilotai::engine::Engine;
use pilotai::error::Error;
use pilotai::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let addr = config.addr;

    let engine = Arc::new(Engine::new(config).await?);

    serve(engine.clone() as DynAPI, addr, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(?err, "failed to listen for shutdown signal");
            futures::future::pending::<()>().await;
        }
    })
    .await?;

    engine.shutdown().await;

    Ok(())
}

use pinbridge_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration; missing Pinata credentials stop here
    let config = Config::from_env()?;

    // Telemetry, staging area, Pinata credential check, routes
    let (_state, router) = pinbridge_api::setup::initialize_app(config.clone()).await?;

    pinbridge_api::setup::server::start_server(&config, router).await?;

    Ok(())
}

use survey_service::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    let state = AppState::from_config(config.clone());

    Server::new(config).serve(router(state)).await
}

use slloze_server::{Config, Server, ServerState, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Environment and logging
    dotenv::dotenv().ok();
    let config = Config::from_env();
    slloze_server::init_logger_with_file(
        std::env::var("LOG_LEVEL").ok().as_deref(),
        config.log_dir.as_deref(),
    );

    print_banner();

    tracing::info!("Slloze server starting...");

    // Initialize server state (wires the HTTP resource gateway)
    let state = ServerState::initialize(&config)?;

    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}

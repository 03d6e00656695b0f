use mdpad::{build_router, logger::Logger, AppState, Config, EditorError};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), EditorError> {
    if let Err(e) = Logger::init() {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let config = Config::from_env()?;
    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Set MDPAD_ROOT to an existing directory, or start mdpad from the directory to serve.");
            return Err(e);
        }
    };
    let root = state.root_dir.clone();
    let app = build_router(state);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    println!("✓ Server started at http://localhost:{}", config.port);
    println!("✓ Serving markdown files from: {}", root.display());
    println!("✓ Press Ctrl+C to stop the server");
    log::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("✓ Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

use std::sync::Arc;

use clap::Parser;

use mike::http::{self, auth::SessionStore, state::AppState};
use mike::media::LibraryRoot;
use mike::{cli, config};

async fn wait_for_shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = cli::Args::parse();

    let file_config = config::find_config_file(args.config.as_deref()).and_then(|path| {
        match config::load_config(&path) {
            Ok(cfg) => {
                tracing::debug!("Loaded config from {}", path.display());
                Some(cfg)
            }
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    });

    let config = config::Config::resolve(file_config, &args).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    let music_root = LibraryRoot::discover(&config.music_path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    let assets_root = match LibraryRoot::discover(&config.assets_path) {
        Ok(root) => Some(root),
        Err(e) => {
            tracing::warn!("Static assets disabled: {}", e);
            None
        }
    };

    let sessions = Arc::new(SessionStore::new(config.session_ttl));
    for token in &config.session_tokens {
        sessions.provision(token.clone()).await;
    }

    tracing::info!("Music library: {}", music_root.path().display());
    if let Some(root) = &assets_root {
        tracing::info!("Static assets: {}", root.path().display());
    }

    let state = AppState::on_disk(music_root, &config.mount, assets_root, sessions);
    let app = http::build_router(state);

    let host = if config.localhost { "127.0.0.1" } else { "0.0.0.0" };
    let addr = format!("{}:{}", host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("error: failed to bind {}: {}", addr, e);
            std::process::exit(1);
        });
    tracing::info!("Listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await
    {
        tracing::error!("HTTP server error: {}", e);
        std::process::exit(1);
    }
    tracing::info!("Goodbye.");
}

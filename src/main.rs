use anyhow::Result;
use clap::Parser;

use docs_lookup::cli::{self, Cli, Commands};
use docs_lookup::stdio::DocsServer;

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so RUST_LOG and clap env fallbacks can see it
    let dotenv = dotenvy::dotenv();

    // Initialize logging (stderr; stdout carries the MCP stream)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Ok(path) = dotenv {
        log::debug!("Loaded environment from {}", path.display());
    }

    // Parse CLI arguments
    let cli = Cli::parse();

    let catalog = cli::resolve_catalog(cli.catalog.as_deref())?;

    // Handle list-libraries flag
    if cli.list_libraries {
        println!("Available libraries:");
        for (library, domain) in catalog.iter() {
            println!("  - {library}: {domain}");
        }
        return Ok(());
    }

    let lookup = cli.build_lookup(catalog)?;

    // Handle subcommands before starting the stdio server
    if let Some(Commands::Lookup { library, query }) = &cli.command {
        let envelope = lookup.get_doc(&query.join(" "), library).await;
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    if cli.serper_api_key.is_none() {
        log::warn!("SERPER_API_KEY is not set; every get_doc call will fail until it is provided");
    }

    // Create cancellation token for graceful shutdown
    let shutdown_token = tokio_util::sync::CancellationToken::new();

    // Spawn cross-platform signal handler
    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        wait_for_interrupt().await;
        log::debug!("Received interrupt signal, shutting down");
        signal_token.cancel();
    });

    DocsServer::new(lookup).serve_stdio(shutdown_token).await
}

/// Resolves on SIGTERM or SIGINT. A signal that cannot be hooked is logged
/// and never fires.
#[cfg(unix)]
async fn wait_for_interrupt() {
    use tokio::signal::unix::{SignalKind, signal};

    let listen = |kind: SignalKind, name: &'static str| async move {
        match signal(kind) {
            Ok(mut stream) => {
                let _ = stream.recv().await;
            }
            Err(e) => {
                log::warn!("Cannot listen for {name}: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = listen(SignalKind::terminate(), "SIGTERM") => {}
        _ = listen(SignalKind::interrupt(), "SIGINT") => {}
    }
}

#[cfg(windows)]
async fn wait_for_interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

use anyhow::Context;
use clap::Parser;
use milkgrade::dashboard::{AppState, create_router};
use milkgrade::{ArtifactCache, logging};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

/// Serve the milk quality dashboard.
#[derive(Parser, Debug)]
#[command(name = "milkgrade", version)]
struct Cli {
    /// Artifact written by milkgrade-train
    #[arg(long, env = "MILKGRADE_ARTIFACT", default_value = "milk_model.msgpack")]
    artifact: PathBuf,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "MILKGRADE_PORT", default_value_t = 8501)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    let cache = ArtifactCache::new(&cli.artifact);
    let artifact = cache
        .get()
        .with_context(|| format!("could not load model artifact {}", cli.artifact.display()))?;
    info!(
        accuracy = artifact.metrics.accuracy,
        classes = ?artifact.encoder.classes(),
        "model ready"
    );

    let app = create_router(AppState::new(cache));
    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    info!("Starting dashboard on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

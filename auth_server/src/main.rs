//! The server-side collaborator of the authentication relay: issues challenge
//! nonces and interprets signed authentication tokens.

use std::sync::Arc;

/// Serve nonce and authentication requests over websocket.
#[derive(Debug, clap::Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Address to bind to.
    #[clap(long, default_value = "0.0.0.0")]
    bind: String,

    /// Port to listen on.
    #[clap(long, default_value_t = comms::DEFAULT_SERVER_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to stdout (if you run with `RUST_LOG=debug`).
    tracing_subscriber::fmt::init();

    use clap::Parser as _;
    let args = Args::parse();

    use anyhow::Context as _;
    let bind = format!("{}:{}", args.bind, args.port)
        .parse()
        .context("bind address")?;

    // Token signatures are validated by an external validator; here we only
    // enforce the nonce binding.
    let verifier = Arc::new(comms::NonceBoundVerifier);

    comms::serve(bind, verifier).await
}

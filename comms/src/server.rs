use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt as _, StreamExt as _};
use tokio::net::{TcpListener, TcpStream};
use tungstenite::Message;

use crate::session::{Session, TokenVerifier};

/// Accept websocket clients forever, answering their nonce and
/// authentication requests. Each client gets its own [`Session`].
pub async fn serve(bind: SocketAddr, verifier: Arc<dyn TokenVerifier>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&bind).await?;
    tracing::info!("Listening on {}://{bind}", crate::PROTOCOL);

    loop {
        let (tcp_stream, peer) = listener.accept().await?;
        tokio::spawn(handle_connection(tcp_stream, peer, verifier.clone()));
    }
}

async fn handle_connection(tcp_stream: TcpStream, peer: SocketAddr, verifier: Arc<dyn TokenVerifier>) {
    if let Err(err) = run_connection(tcp_stream, peer, verifier.as_ref()).await {
        tracing::warn!("Closing connection to {peer}: {err:?}");
    }
}

async fn run_connection(
    tcp_stream: TcpStream,
    peer: SocketAddr,
    verifier: &dyn TokenVerifier,
) -> anyhow::Result<()> {
    let ws_stream = tokio_tungstenite::accept_async(tcp_stream).await?;
    tracing::info!("New client connected: {peer}");

    let (mut tx, mut rx) = ws_stream.split();
    let mut session = Session::default();

    while let Some(msg) = rx.next().await {
        match msg? {
            Message::Binary(data) => {
                let msg = crate::decode_client_msg(&data)?;
                let reply = session.on_msg(msg, verifier);
                tx.send(Message::Binary(crate::encode_server_msg(&reply)))
                    .await?;
            }
            Message::Ping(data) => {
                tx.send(Message::Pong(data)).await?;
            }
            Message::Close(_) => {
                tracing::info!("Client {peer} disconnected");
                break;
            }
            other => {
                tracing::warn!("Unexpected message from {peer}: {other:?}");
            }
        }
    }

    Ok(())
}

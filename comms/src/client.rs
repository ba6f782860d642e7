use std::ops::ControlFlow;

use ewebsock::{WsEvent, WsMessage, WsSender};

use auth_types::{ClientMsg, ServerMsg};

use crate::decode_server_msg;

/// What the connection callback receives.
#[derive(Clone, Debug)]
pub enum ServerEvent {
    Opened,
    Msg(ServerMsg),
    Closed,
}

/// Represents a connection to the server.
/// Disconnects on drop.
#[must_use]
pub struct Connection(WsSender);

impl Connection {
    /// Connect the client to the auth server.
    pub fn viewer_to_server(
        url: String,
        on_event: impl Fn(ServerEvent) -> ControlFlow<()> + Send + 'static,
    ) -> crate::Result<Self> {
        tracing::info!("Connecting to {url:?}…");
        let sender = ewebsock::ws_connect(
            url,
            Box::new(move |event: WsEvent| match event {
                WsEvent::Opened => {
                    tracing::info!("Connection established");
                    on_event(ServerEvent::Opened)
                }
                WsEvent::Message(message) => match message {
                    WsMessage::Binary(binary) => match decode_server_msg(&binary) {
                        Ok(msg) => on_event(ServerEvent::Msg(msg)),
                        Err(err) => {
                            tracing::error!("Failed to parse message: {err:?}");
                            ControlFlow::Break(())
                        }
                    },
                    WsMessage::Text(text) => {
                        tracing::warn!("Unexpected text message: {text:?}");
                        ControlFlow::Continue(())
                    }
                    WsMessage::Unknown(text) => {
                        tracing::warn!("Unknown message: {text:?}");
                        ControlFlow::Continue(())
                    }
                    WsMessage::Ping(_data) => {
                        tracing::warn!("Unexpected PING");
                        ControlFlow::Continue(())
                    }
                    WsMessage::Pong(_data) => {
                        tracing::warn!("Unexpected PONG");
                        ControlFlow::Continue(())
                    }
                },
                WsEvent::Error(error) => {
                    tracing::error!("Connection error: {error}");
                    ControlFlow::Break(())
                }
                WsEvent::Closed => {
                    tracing::info!("Connection to server closed.");
                    let _ = on_event(ServerEvent::Closed);
                    ControlFlow::Break(())
                }
            }),
        )
        .map_err(|err| anyhow::format_err!("ewebsock: {err}"))?;

        Ok(Self(sender))
    }

    pub fn send(&mut self, msg: &ClientMsg) {
        self.0.send(WsMessage::Binary(crate::encode_client_msg(msg)));
    }
}

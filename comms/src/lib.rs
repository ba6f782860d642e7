//! Websocket communication between the eID login client and the auth server.
//!
//! The wire format is a 4-byte magic prefix followed by a bincode-encoded
//! [`ClientMsg`] or [`ServerMsg`].

#[cfg(feature = "client")]
mod client;

#[cfg(feature = "client")]
pub use client::{Connection, ServerEvent};

#[cfg(all(feature = "server", not(target_arch = "wasm32")))]
mod server;

#[cfg(all(feature = "server", not(target_arch = "wasm32")))]
pub use server::serve;

// The server-side collaborator never runs in the browser.
#[cfg(not(target_arch = "wasm32"))]
mod session;

#[cfg(not(target_arch = "wasm32"))]
pub use session::{IssuedNonces, NonceBoundVerifier, Session, TokenVerifier};

use auth_types::{ClientMsg, ServerMsg};

pub type Result<T> = anyhow::Result<T>;

pub const DEFAULT_SERVER_PORT: u16 = 9742;

/// Web-socket protocol (`ws` or, with the `tls` feature, `wss`).
#[cfg(not(feature = "tls"))]
pub const PROTOCOL: &str = "ws";
#[cfg(feature = "tls")]
pub const PROTOCOL: &str = "wss";

pub fn default_server_url() -> String {
    format!("{PROTOCOL}://127.0.0.1:{DEFAULT_SERVER_PORT}")
}

// The trailing digit is the wire format version.
const PREFIX: [u8; 4] = *b"EID0";

fn encode<T: serde::Serialize>(msg: &T) -> Vec<u8> {
    use bincode::Options as _;
    let mut bytes = PREFIX.to_vec();
    bincode::DefaultOptions::new()
        .serialize_into(&mut bytes, msg)
        .unwrap();
    bytes
}

fn decode<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
    let payload = data
        .strip_prefix(&PREFIX)
        .ok_or_else(|| anyhow::format_err!("Message didn't start with the correct prefix"))?;

    use anyhow::Context as _;
    use bincode::Options as _;
    bincode::DefaultOptions::new()
        .deserialize(payload)
        .context("bincode")
}

pub fn encode_client_msg(msg: &ClientMsg) -> Vec<u8> {
    encode(msg)
}

pub fn decode_client_msg(data: &[u8]) -> Result<ClientMsg> {
    decode(data)
}

pub fn encode_server_msg(msg: &ServerMsg) -> Vec<u8> {
    encode(msg)
}

pub fn decode_server_msg(data: &[u8]) -> Result<ServerMsg> {
    decode(data)
}

#[test]
fn test_encode_decode() {
    use auth_types::*;

    let client_msgs = vec![
        ClientMsg {
            request_id: RequestId(1),
            kind: ClientMsgKind::GetNonce,
        },
        ClientMsg {
            request_id: RequestId(2),
            kind: ClientMsgKind::Authenticate {
                token: AuthToken("signed-token".into()),
            },
        },
    ];
    for msg in &client_msgs {
        assert_eq!(&decode_client_msg(&encode_client_msg(msg)).unwrap(), msg);
    }

    let server_msgs = vec![
        ServerMsg {
            request_id: RequestId(1),
            kind: ServerMsgKind::Nonce {
                nonce: Nonce("BYueTAWmOmNXCeSvxZD1".into()),
            },
        },
        ServerMsg {
            request_id: RequestId(2),
            kind: ServerMsgKind::AuthResult { ok: false },
        },
    ];
    for msg in &server_msgs {
        assert_eq!(&decode_server_msg(&encode_server_msg(msg)).unwrap(), msg);
    }

    assert!(decode_server_msg(b"XYZ0garbage").is_err());
}

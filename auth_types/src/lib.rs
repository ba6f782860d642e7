//! Types shared between the eID login client and the auth server.
//!
//! The client and server talk request/response over a persistent websocket
//! channel; every message carries a [`RequestId`] so the reply can be matched
//! to the request that caused it.

mod error;

pub use error::AuthenticatorError;

/// Single-use challenge value issued by the server.
///
/// The authenticator signs it, which prevents replay of an old token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Nonce(pub String);

impl Nonce {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Signed authentication token produced by the external authenticator.
///
/// Opaque to the client: it is produced by the eID component and consumed
/// once by the server.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct AuthToken(pub String);

impl AuthToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Correlates a request with its response over the channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A message from client to server.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ClientMsg {
    pub request_id: RequestId,
    pub kind: ClientMsgKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ClientMsgKind {
    /// Request a fresh challenge nonce.
    GetNonce,

    /// Submit a signed authentication token for the server to interpret.
    Authenticate { token: AuthToken },
}

/// A message from server to client.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ServerMsg {
    pub request_id: RequestId,
    pub kind: ServerMsgKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ServerMsgKind {
    /// A fresh challenge nonce, valid for one authentication attempt.
    Nonce { nonce: Nonce },

    /// Whether the submitted token was accepted.
    AuthResult { ok: bool },
}

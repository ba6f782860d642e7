//! The server-side half of the authentication relay.
//!
//! A [`Session`] answers the two requests a client can make: issue a fresh
//! challenge nonce, and interpret a signed authentication token. It is pure
//! request-in/response-out so the server transport stays a thin shell.

use auth_types::{AuthToken, ClientMsg, ClientMsgKind, Nonce, ServerMsg, ServerMsgKind};

const NONCE_LEN: usize = 32;

/// A client that keeps requesting nonces without ever authenticating must
/// not grow the session without bound; past this the oldest nonce is retired.
const MAX_OUTSTANDING_NONCES: usize = 32;

/// Nonces issued to a client but not yet consumed by an authentication.
///
/// Each nonce is single-use: the first token that proves possession of it
/// retires it.
#[derive(Default)]
pub struct IssuedNonces(Vec<Nonce>);

impl IssuedNonces {
    pub fn issue(&mut self) -> Nonce {
        use rand::Rng as _;
        let nonce = Nonce(
            rand::thread_rng()
                .sample_iter(rand::distributions::Alphanumeric)
                .take(NONCE_LEN)
                .map(char::from)
                .collect(),
        );
        if self.0.len() >= MAX_OUTSTANDING_NONCES {
            self.0.remove(0);
        }
        self.0.push(nonce.clone());
        nonce
    }

    /// Retires and returns the first outstanding nonce for which `f` is true.
    pub fn consume(&mut self, f: impl Fn(&Nonce) -> bool) -> Option<Nonce> {
        let index = self.0.iter().position(f)?;
        Some(self.0.remove(index))
    }

    pub fn outstanding(&self) -> usize {
        self.0.len()
    }
}

/// Decides whether a submitted token is acceptable.
///
/// The shipped implementation is [`NonceBoundVerifier`]; real cryptographic
/// validation of the token signature happens in an external validator and is
/// out of scope here.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &AuthToken, issued: &mut IssuedNonces) -> bool;
}

/// Accepts any token that embeds an outstanding nonce, consuming that nonce.
pub struct NonceBoundVerifier;

impl TokenVerifier for NonceBoundVerifier {
    fn verify(&self, token: &AuthToken, issued: &mut IssuedNonces) -> bool {
        issued
            .consume(|nonce| token.as_str().contains(nonce.as_str()))
            .is_some()
    }
}

/// Per-client session state.
#[derive(Default)]
pub struct Session {
    issued: IssuedNonces,
}

impl Session {
    pub fn on_msg(&mut self, msg: ClientMsg, verifier: &dyn TokenVerifier) -> ServerMsg {
        let ClientMsg { request_id, kind } = msg;
        let kind = match kind {
            ClientMsgKind::GetNonce => {
                let nonce = self.issued.issue();
                tracing::debug!("Issued a nonce (request {request_id})");
                ServerMsgKind::Nonce { nonce }
            }
            ClientMsgKind::Authenticate { token } => {
                let ok = verifier.verify(&token, &mut self.issued);
                if ok {
                    tracing::info!("Accepted authentication token (request {request_id})");
                } else {
                    tracing::warn!("Rejected authentication token (request {request_id})");
                }
                ServerMsgKind::AuthResult { ok }
            }
        };
        ServerMsg { request_id, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth_types::RequestId;

    fn get_nonce(session: &mut Session, request_id: u64) -> Nonce {
        let reply = session.on_msg(
            ClientMsg {
                request_id: RequestId(request_id),
                kind: ClientMsgKind::GetNonce,
            },
            &NonceBoundVerifier,
        );
        assert_eq!(reply.request_id, RequestId(request_id));
        match reply.kind {
            ServerMsgKind::Nonce { nonce } => nonce,
            other => panic!("expected a nonce, got {other:?}"),
        }
    }

    fn authenticate(session: &mut Session, request_id: u64, token: &str) -> bool {
        let reply = session.on_msg(
            ClientMsg {
                request_id: RequestId(request_id),
                kind: ClientMsgKind::Authenticate {
                    token: AuthToken(token.to_owned()),
                },
            },
            &NonceBoundVerifier,
        );
        assert_eq!(reply.request_id, RequestId(request_id));
        match reply.kind {
            ServerMsgKind::AuthResult { ok } => ok,
            other => panic!("expected an auth result, got {other:?}"),
        }
    }

    #[test]
    fn nonce_bound_token_is_accepted_once() {
        let mut session = Session::default();
        let nonce = get_nonce(&mut session, 1);
        let token = format!("webeid:{}:signature", nonce.as_str());

        assert!(authenticate(&mut session, 2, &token));

        // The nonce is single-use:
        assert!(!authenticate(&mut session, 3, &token));
    }

    #[test]
    fn unrelated_token_is_rejected() {
        let mut session = Session::default();
        let _nonce = get_nonce(&mut session, 1);
        assert!(!authenticate(&mut session, 2, "webeid:stale:signature"));
        assert_eq!(session.issued.outstanding(), 1);
    }

    #[test]
    fn outstanding_nonces_are_capped() {
        let mut session = Session::default();
        let first = get_nonce(&mut session, 0);

        for request_id in 1..=MAX_OUTSTANDING_NONCES as u64 {
            get_nonce(&mut session, request_id);
        }
        assert_eq!(session.issued.outstanding(), MAX_OUTSTANDING_NONCES);

        // Issuing past the cap retired the oldest nonce:
        let token = format!("webeid:{}:signature", first.as_str());
        assert!(!authenticate(&mut session, 99, &token));
    }

    #[test]
    fn nonces_are_unique_per_request() {
        let mut session = Session::default();
        let a = get_nonce(&mut session, 1);
        let b = get_nonce(&mut session, 2);
        assert_ne!(a, b);
        assert_eq!(session.issued.outstanding(), 2);
    }
}

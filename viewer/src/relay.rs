//! The three-step authentication relay:
//!
//! 1. request a challenge nonce from the server,
//! 2. have the external authenticator sign it,
//! 3. submit the signed token and interpret the acknowledgment.
//!
//! [`AuthRelay`] is a plain state machine: events in, [`Effect`]s out. The
//! app interprets the effects (sends messages, invokes the authenticator,
//! shows notices). Attempts are never deduplicated: every click starts an
//! independent attempt, so rapid clicks simply overlap.

use auth_types::{
    AuthToken, AuthenticatorError, ClientMsg, ClientMsgKind, Nonce, RequestId, ServerMsg,
    ServerMsgKind,
};

use crate::authenticator::AuthenticateOptions;
use crate::notifications::{AUTH_FAILED_NOTICE, EXTENSION_UNAVAILABLE_NOTICE};

/// Identifies one authentication attempt (one click).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AttemptId(u64);

impl std::fmt::Display for AttemptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// What the app must do in response to a relay event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    SendToServer(ClientMsg),
    InvokeAuthenticator {
        attempt: AttemptId,
        nonce: Nonce,
        options: AuthenticateOptions,
    },
    /// Show a user-facing notice.
    Notify(String),
    /// The server accepted the token.
    SignedIn,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AttemptState {
    AwaitingNonce,
    Authenticating,
    AwaitingAck,
}

struct Attempt {
    id: AttemptId,
    state: AttemptState,
    /// The server request this attempt is waiting on, if any.
    pending_request: Option<RequestId>,
}

pub struct AuthRelay {
    /// Two-letter language hint passed to the authenticator.
    lang: String,
    attempts: Vec<Attempt>,
    next_attempt_id: u64,
    next_request_id: u64,
}

impl AuthRelay {
    pub fn new(lang: String) -> Self {
        Self {
            lang,
            attempts: Vec::new(),
            next_attempt_id: 0,
            next_request_id: 0,
        }
    }

    /// The user activated the sign-in control.
    pub fn on_click(&mut self) -> Vec<Effect> {
        let id = AttemptId(self.next_attempt_id);
        self.next_attempt_id += 1;
        let request_id = self.fresh_request_id();

        tracing::debug!("Sign-in clicked: attempt {id} started (lang: {})", self.lang);

        self.attempts.push(Attempt {
            id,
            state: AttemptState::AwaitingNonce,
            pending_request: Some(request_id),
        });

        vec![Effect::SendToServer(ClientMsg {
            request_id,
            kind: ClientMsgKind::GetNonce,
        })]
    }

    /// A response arrived over the live connection.
    pub fn on_server_msg(&mut self, msg: ServerMsg) -> Vec<Effect> {
        let Some(index) = self
            .attempts
            .iter()
            .position(|attempt| attempt.pending_request == Some(msg.request_id))
        else {
            tracing::warn!("Response to unknown request {}", msg.request_id);
            return vec![];
        };
        let id = self.attempts[index].id;
        let state = self.attempts[index].state;

        match (state, msg.kind) {
            (AttemptState::AwaitingNonce, ServerMsgKind::Nonce { nonce }) => {
                if nonce.as_str().is_empty() {
                    self.attempts.remove(index);
                    tracing::error!(
                        "Authentication failed! Error: server returned no nonce (attempt {id})"
                    );
                    return vec![];
                }
                tracing::debug!("Received nonce for attempt {id}");

                let attempt = &mut self.attempts[index];
                attempt.state = AttemptState::Authenticating;
                attempt.pending_request = None;

                vec![Effect::InvokeAuthenticator {
                    attempt: id,
                    nonce,
                    options: AuthenticateOptions {
                        lang: self.lang.clone(),
                    },
                }]
            }
            (AttemptState::AwaitingAck, ServerMsgKind::AuthResult { ok }) => {
                self.attempts.remove(index);
                if ok {
                    tracing::info!("Attempt {id} authenticated");
                    vec![Effect::SignedIn]
                } else {
                    tracing::warn!("Server rejected the authentication token (attempt {id})");
                    vec![Effect::Notify(AUTH_FAILED_NOTICE.to_owned())]
                }
            }
            (_, kind) => {
                self.attempts.remove(index);
                tracing::error!(
                    "Authentication failed! Error: unexpected reply {kind:?} (attempt {id})"
                );
                vec![]
            }
        }
    }

    /// The external authenticator finished (or failed).
    pub fn on_token(
        &mut self,
        attempt: AttemptId,
        result: Result<AuthToken, AuthenticatorError>,
    ) -> Vec<Effect> {
        let Some(index) = self.attempts.iter().position(|candidate| {
            candidate.id == attempt && candidate.state == AttemptState::Authenticating
        }) else {
            tracing::warn!("Authenticator result for unknown attempt {attempt}");
            return vec![];
        };

        match result {
            Ok(token) => {
                let request_id = self.fresh_request_id();
                tracing::debug!("Authenticator produced a token for attempt {attempt}");

                let pending = &mut self.attempts[index];
                pending.state = AttemptState::AwaitingAck;
                pending.pending_request = Some(request_id);

                vec![Effect::SendToServer(ClientMsg {
                    request_id,
                    kind: ClientMsgKind::Authenticate { token },
                })]
            }
            Err(err) => {
                self.attempts.remove(index);
                tracing::debug!("Error code: {}", err.code());
                tracing::error!("Authentication failed! Error: {err} (attempt {attempt})");

                // Only this one failure kind gets a user-facing notice;
                // everything else is logged only.
                if err == AuthenticatorError::ExtensionUnavailable {
                    vec![Effect::Notify(EXTENSION_UNAVAILABLE_NOTICE.to_owned())]
                } else {
                    vec![]
                }
            }
        }
    }

    /// Number of attempts currently in flight.
    pub fn in_flight(&self) -> usize {
        self.attempts.len()
    }

    fn fresh_request_id(&mut self) -> RequestId {
        let id = RequestId(self.next_request_id);
        self.next_request_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relay() -> AuthRelay {
        AuthRelay::new("en".to_owned())
    }

    /// Extracts the single `SendToServer` message, panicking on anything else.
    fn sent(effects: Vec<Effect>) -> ClientMsg {
        match effects.as_slice() {
            [Effect::SendToServer(msg)] => msg.clone(),
            other => panic!("expected exactly one outgoing message, got {other:?}"),
        }
    }

    fn nonce_reply(request_id: RequestId, nonce: &str) -> ServerMsg {
        ServerMsg {
            request_id,
            kind: ServerMsgKind::Nonce {
                nonce: Nonce(nonce.to_owned()),
            },
        }
    }

    fn ack(request_id: RequestId, ok: bool) -> ServerMsg {
        ServerMsg {
            request_id,
            kind: ServerMsgKind::AuthResult { ok },
        }
    }

    /// Drives one attempt up to the point where the authenticator runs.
    fn click_and_get_nonce(relay: &mut AuthRelay) -> AttemptId {
        let request = sent(relay.on_click());
        assert_eq!(request.kind, ClientMsgKind::GetNonce);

        let effects = relay.on_server_msg(nonce_reply(request.request_id, "BYueTAWmOmNX"));
        match effects.as_slice() {
            [Effect::InvokeAuthenticator {
                attempt, options, ..
            }] => {
                assert_eq!(options.lang, "en");
                *attempt
            }
            other => panic!("expected an authenticator invocation, got {other:?}"),
        }
    }

    #[test]
    fn happy_path_shows_no_notice() {
        let mut relay = relay();
        let attempt = click_and_get_nonce(&mut relay);

        let submit = sent(relay.on_token(attempt, Ok(AuthToken("signed".into()))));
        assert!(matches!(
            submit.kind,
            ClientMsgKind::Authenticate { .. }
        ));

        let effects = relay.on_server_msg(ack(submit.request_id, true));
        assert_eq!(effects, vec![Effect::SignedIn]);
        assert_eq!(relay.in_flight(), 0);
    }

    #[test]
    fn extension_unavailable_shows_specific_notice_and_stops() {
        let mut relay = relay();
        let attempt = click_and_get_nonce(&mut relay);

        let effects = relay.on_token(attempt, Err(AuthenticatorError::ExtensionUnavailable));
        assert_eq!(
            effects,
            vec![Effect::Notify(EXTENSION_UNAVAILABLE_NOTICE.to_owned())]
        );

        // The attempt is gone; no token is ever submitted.
        assert_eq!(relay.in_flight(), 0);
    }

    #[test]
    fn other_authenticator_errors_are_logged_only() {
        for err in [
            AuthenticatorError::UserCancelled,
            AuthenticatorError::ActionTimeout,
            AuthenticatorError::NativeFatal,
            AuthenticatorError::Unknown,
        ] {
            let mut relay = relay();
            let attempt = click_and_get_nonce(&mut relay);
            assert_eq!(relay.on_token(attempt, Err(err)), vec![]);
            assert_eq!(relay.in_flight(), 0);
        }
    }

    #[test]
    fn negative_ack_shows_generic_notice() {
        let mut relay = relay();
        let attempt = click_and_get_nonce(&mut relay);
        let submit = sent(relay.on_token(attempt, Ok(AuthToken("signed".into()))));

        let effects = relay.on_server_msg(ack(submit.request_id, false));
        assert_eq!(effects, vec![Effect::Notify(AUTH_FAILED_NOTICE.to_owned())]);
    }

    #[test]
    fn empty_nonce_fails_the_attempt_without_notice() {
        let mut relay = relay();
        let request = sent(relay.on_click());

        let effects = relay.on_server_msg(nonce_reply(request.request_id, ""));
        assert_eq!(effects, vec![]);
        assert_eq!(relay.in_flight(), 0);
    }

    #[test]
    fn overlapping_attempts_are_independent() {
        let mut relay = relay();

        // Two clicks before anything resolves:
        let first = sent(relay.on_click());
        let second = sent(relay.on_click());
        assert_ne!(first.request_id, second.request_id);
        assert_eq!(relay.in_flight(), 2);

        // Resolve them out of order:
        let second_attempt = match relay
            .on_server_msg(nonce_reply(second.request_id, "nonce-b"))
            .as_slice()
        {
            [Effect::InvokeAuthenticator { attempt, nonce, .. }] => {
                assert_eq!(nonce.as_str(), "nonce-b");
                *attempt
            }
            other => panic!("unexpected effects: {other:?}"),
        };

        // The second attempt fails; the first is unaffected.
        relay.on_token(second_attempt, Err(AuthenticatorError::UserCancelled));
        assert_eq!(relay.in_flight(), 1);

        let first_attempt = match relay
            .on_server_msg(nonce_reply(first.request_id, "nonce-a"))
            .as_slice()
        {
            [Effect::InvokeAuthenticator { attempt, nonce, .. }] => {
                assert_eq!(nonce.as_str(), "nonce-a");
                *attempt
            }
            other => panic!("unexpected effects: {other:?}"),
        };
        let submit = sent(relay.on_token(first_attempt, Ok(AuthToken("tok:nonce-a".into()))));
        let effects = relay.on_server_msg(ack(submit.request_id, true));
        assert_eq!(effects, vec![Effect::SignedIn]);
        assert_eq!(relay.in_flight(), 0);
    }

    #[test]
    fn every_message_gets_a_fresh_request_id() {
        let mut relay = relay();
        let request = sent(relay.on_click());

        let effects = relay.on_server_msg(nonce_reply(request.request_id, "BYueTAWmOmNX"));
        let attempt = match effects.as_slice() {
            [Effect::InvokeAuthenticator { attempt, .. }] => *attempt,
            other => panic!("unexpected effects: {other:?}"),
        };
        let submit = sent(relay.on_token(attempt, Ok(AuthToken("signed".into()))));

        // The token submission must not reuse the nonce request's id.
        assert_ne!(submit.request_id, request.request_id);
    }

    #[test]
    fn unknown_request_id_is_ignored() {
        let mut relay = relay();
        let _ = relay.on_click();
        assert_eq!(relay.on_server_msg(ack(RequestId(999), true)), vec![]);
        assert_eq!(relay.in_flight(), 1);
    }

    #[test]
    fn mismatched_reply_kind_drops_the_attempt() {
        let mut relay = relay();
        let request = sent(relay.on_click());

        // An ack where a nonce was expected:
        let effects = relay.on_server_msg(ack(request.request_id, true));
        assert_eq!(effects, vec![]);
        assert_eq!(relay.in_flight(), 0);
    }

    #[test]
    fn stale_authenticator_result_is_ignored() {
        let mut relay = relay();
        let attempt = click_and_get_nonce(&mut relay);
        relay.on_token(attempt, Err(AuthenticatorError::UserCancelled));

        // A second (late) completion for the same attempt:
        assert_eq!(
            relay.on_token(attempt, Ok(AuthToken("late".into()))),
            vec![]
        );
    }
}

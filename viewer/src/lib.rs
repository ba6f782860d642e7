//! The eID login client: an [`egui`] app that signs the user in with their
//! eID card via the external Web eID authenticator, over a persistent
//! websocket connection to the auth server.

mod app;
mod authenticator;
mod locale;
mod misc;
mod notifications;
mod relay;
mod ui;

#[cfg(target_arch = "wasm32")]
mod web;

pub use app::App;
pub use authenticator::{AuthenticateOptions, Authenticator, TokenReply};

#[cfg(not(target_arch = "wasm32"))]
pub use authenticator::{ExtensionUnavailableAuthenticator, FakeAuthenticator};

#[cfg(target_arch = "wasm32")]
pub use authenticator::WebEidAuthenticator;

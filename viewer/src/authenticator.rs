//! The external authenticator boundary.
//!
//! All eID cryptography lives outside this crate, in the Web eID browser
//! extension and its native component. The client only hands over the nonce
//! and gets back a signed token (or one of the closed set of
//! [`AuthenticatorError`] kinds).

use auth_types::{AuthToken, AuthenticatorError, Nonce};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticateOptions {
    /// Two-letter language hint for the authenticator dialogs.
    pub lang: String,
}

/// Called exactly once with the outcome, possibly from another thread.
pub type TokenReply = Box<dyn FnOnce(Result<AuthToken, AuthenticatorError>) + Send>;

/// Ask the external eID component to sign a challenge nonce.
pub trait Authenticator {
    fn authenticate(&self, nonce: Nonce, options: AuthenticateOptions, reply: TokenReply);
}

// ----------------------------------------------------------------------------

/// Binds the Web eID javascript library (loaded by the page as
/// `window.webeid`) through `wasm-bindgen`.
#[cfg(target_arch = "wasm32")]
pub struct WebEidAuthenticator;

#[cfg(target_arch = "wasm32")]
mod web_eid {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen(js_namespace = ["window", "webeid"])]
    extern "C" {
        /// `webeid.authenticate(nonce, {lang}) -> Promise<token>`
        #[wasm_bindgen(catch)]
        pub async fn authenticate(nonce: &str, options: &JsValue) -> Result<JsValue, JsValue>;
    }
}

#[cfg(target_arch = "wasm32")]
impl Authenticator for WebEidAuthenticator {
    fn authenticate(&self, nonce: Nonce, options: AuthenticateOptions, reply: TokenReply) {
        use wasm_bindgen::JsValue;

        wasm_bindgen_futures::spawn_local(async move {
            let js_options = js_sys::Object::new();
            if js_sys::Reflect::set(
                &js_options,
                &JsValue::from_str("lang"),
                &JsValue::from_str(&options.lang),
            )
            .is_err()
            {
                reply(Err(AuthenticatorError::Unknown));
                return;
            }

            let result = match web_eid::authenticate(nonce.as_str(), &js_options).await {
                // The library resolves with a token object; the server gets
                // it verbatim as JSON.
                Ok(value) => match js_sys::JSON::stringify(&value) {
                    Ok(json) => Ok(AuthToken(String::from(json))),
                    Err(_) => Err(AuthenticatorError::Unknown),
                },
                Err(err) => {
                    let code = js_sys::Reflect::get(&err, &JsValue::from_str("code"))
                        .ok()
                        .and_then(|code| code.as_string());
                    Err(match code {
                        Some(code) => AuthenticatorError::from_code(&code),
                        None => AuthenticatorError::Unknown,
                    })
                }
            };
            reply(result);
        });
    }
}

// ----------------------------------------------------------------------------

/// There is no browser extension outside the web build.
#[cfg(not(target_arch = "wasm32"))]
pub struct ExtensionUnavailableAuthenticator;

#[cfg(not(target_arch = "wasm32"))]
impl Authenticator for ExtensionUnavailableAuthenticator {
    fn authenticate(&self, _nonce: Nonce, _options: AuthenticateOptions, reply: TokenReply) {
        reply(Err(AuthenticatorError::ExtensionUnavailable));
    }
}

/// Fabricates a token embedding the nonce, so the full relay loop can be
/// exercised locally without an eID card (`--fake-auth`).
#[cfg(not(target_arch = "wasm32"))]
pub struct FakeAuthenticator;

#[cfg(not(target_arch = "wasm32"))]
impl Authenticator for FakeAuthenticator {
    fn authenticate(&self, nonce: Nonce, options: AuthenticateOptions, reply: TokenReply) {
        std::thread::Builder::new()
            .name("fake_authenticator".to_owned())
            .spawn(move || {
                // Simulate the user fumbling with the card reader.
                std::thread::sleep(std::time::Duration::from_millis(300));
                tracing::debug!("Fake-signing nonce (lang: {})", options.lang);
                reply(Ok(AuthToken(format!("fake-token:{}", nonce.as_str()))));
            })
            .expect("Failed to spawn thread");
    }
}

//! Web (wasm) entry point, called from the hosting page.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WebHandle {
    runner: eframe::WebRunner,
}

#[wasm_bindgen]
impl WebHandle {
    #[allow(clippy::new_without_default)]
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();

        Self {
            runner: eframe::WebRunner::new(),
        }
    }

    /// Start the app in the given canvas.
    #[wasm_bindgen]
    pub async fn start(&self, canvas_id: &str) -> Result<(), JsValue> {
        self.runner
            .start(
                canvas_id,
                eframe::WebOptions::default(),
                Box::new(|cc| {
                    let app = crate::App::new(
                        cc.egui_ctx.clone(),
                        comms::default_server_url(),
                        Box::new(crate::WebEidAuthenticator),
                    )
                    .expect("Failed to connect to the auth server");
                    Box::new(app)
                }),
            )
            .await
    }
}

//! User-facing notices, shown as small dismissable windows.

/// Shown when the authenticator reports that the extension is missing.
pub const EXTENSION_UNAVAILABLE_NOTICE: &str = "Web eID extension not available";

/// Shown when the server rejects an authentication token.
pub const AUTH_FAILED_NOTICE: &str = "Unexpected problem occurred";

pub struct Notice {
    pub text: String,
}

#[derive(Default)]
pub struct Notifications {
    notices: Vec<Notice>,
}

impl Notifications {
    pub fn add(&mut self, text: impl Into<String>) {
        self.notices.push(Notice { text: text.into() });
    }

    pub fn ui(&mut self, egui_ctx: &egui::Context) {
        let mut dismissed = None;

        for (index, notice) in self.notices.iter().enumerate() {
            egui::Window::new("Notice")
                .id(egui::Id::new(("notice", index)))
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 24.0 * index as f32])
                .collapsible(false)
                .resizable(false)
                .show(egui_ctx, |ui| {
                    ui.label(&notice.text);
                    if ui.button("OK").clicked() {
                        dismissed = Some(index);
                    }
                });
        }

        if let Some(index) = dismissed {
            self.notices.remove(index);
        }
    }
}

use std::ops::ControlFlow;
use std::sync::mpsc::{Receiver, Sender};

use chrono::Utc;

use auth_types::{AuthToken, AuthenticatorError};
use comms::{Connection, ServerEvent};

use crate::authenticator::Authenticator;
use crate::notifications::Notifications;
use crate::relay::{AttemptId, AuthRelay, Effect};

enum Event {
    Server(ServerEvent),
    Token {
        attempt: AttemptId,
        result: Result<AuthToken, AuthenticatorError>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConnectionState {
    Connecting,
    Connected,
    Closed,
}

pub struct App {
    rx: Receiver<Event>,
    tx: Sender<Event>,
    egui_ctx: egui::Context,

    connection: Connection,
    connection_state: ConnectionState,

    relay: AuthRelay,
    authenticator: Box<dyn Authenticator>,
    notifications: Notifications,

    /// RFC 3339. Set when the server accepts a token; re-read on every repaint
    /// by the time-ago label.
    signed_in_at: Option<String>,
}

impl App {
    pub fn new(
        egui_ctx: egui::Context,
        url: String,
        authenticator: Box<dyn Authenticator>,
    ) -> anyhow::Result<Self> {
        let (tx, rx) = std::sync::mpsc::channel();

        let connection = {
            let tx = tx.clone();
            let egui_ctx = egui_ctx.clone();
            Connection::viewer_to_server(url, move |event| {
                if tx.send(Event::Server(event)).is_ok() {
                    egui_ctx.request_repaint(); // wake up the ui thread
                    ControlFlow::Continue(())
                } else {
                    ControlFlow::Break(())
                }
            })?
        };

        Ok(Self {
            rx,
            tx,
            egui_ctx,
            connection,
            connection_state: ConnectionState::Connecting,
            relay: AuthRelay::new(crate::locale::language_hint()),
            authenticator,
            notifications: Default::default(),
            signed_in_at: None,
        })
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SendToServer(msg) => self.connection.send(&msg),
                Effect::InvokeAuthenticator {
                    attempt,
                    nonce,
                    options,
                } => {
                    let tx = self.tx.clone();
                    let egui_ctx = self.egui_ctx.clone();
                    self.authenticator.authenticate(
                        nonce,
                        options,
                        Box::new(move |result| {
                            if tx.send(Event::Token { attempt, result }).is_ok() {
                                egui_ctx.request_repaint();
                            }
                        }),
                    );
                }
                Effect::Notify(text) => self.notifications.add(text),
                Effect::SignedIn => self.signed_in_at = Some(Utc::now().to_rfc3339()),
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, egui_ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                Event::Server(ServerEvent::Opened) => {
                    self.connection_state = ConnectionState::Connected;
                }
                Event::Server(ServerEvent::Closed) => {
                    self.connection_state = ConnectionState::Closed;
                }
                Event::Server(ServerEvent::Msg(msg)) => {
                    let effects = self.relay.on_server_msg(msg);
                    self.apply(effects);
                }
                Event::Token { attempt, result } => {
                    let effects = self.relay.on_token(attempt, result);
                    self.apply(effects);
                }
            }
        }

        egui::CentralPanel::default().show(egui_ctx, |ui| {
            ui.heading("eID login");
            ui.add_space(8.0);

            match self.connection_state {
                ConnectionState::Connecting => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Connecting…");
                    });
                }
                ConnectionState::Connected => {
                    ui.label("Connected");
                }
                ConnectionState::Closed => {
                    ui.colored_label(ui.visuals().error_fg_color, "Connection closed");
                }
            }

            ui.add_space(8.0);

            if ui.button("Sign in with eID").clicked() {
                let effects = self.relay.on_click();
                self.apply(effects);
            }

            if self.relay.in_flight() > 0 {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(format!("Authenticating ({} in flight)…", self.relay.in_flight()));
                });
            }

            if let Some(signed_in_at) = self.signed_in_at.clone() {
                ui.horizontal(|ui| {
                    ui.label("Signed in");
                    crate::ui::time_ago_label(ui, &signed_in_at);
                });
            }
        });

        self.notifications.ui(egui_ctx);
    }
}

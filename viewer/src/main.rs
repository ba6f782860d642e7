/// Run the eID login client connected to the auth server over websocket.
#[derive(Debug, clap::Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Url of the auth server websocket endpoint.
    #[clap(default_value_t = comms::default_server_url())]
    url: String,

    /// Fabricate tokens instead of asking the Web eID extension.
    /// For local development only.
    #[clap(long)]
    fake_auth: bool,
}

fn main() -> eframe::Result<()> {
    // Log to stdout (if you run with `RUST_LOG=debug`).
    tracing_subscriber::fmt::init();

    use clap::Parser as _;
    let args = Args::parse();

    let mut url = args.url;
    if !url.contains("://") {
        url = format!("{}://{url}", comms::PROTOCOL);
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([420.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        "eID login",
        native_options,
        Box::new(move |cc| {
            let authenticator: Box<dyn viewer::Authenticator> = if args.fake_auth {
                Box::new(viewer::FakeAuthenticator)
            } else {
                Box::new(viewer::ExtensionUnavailableAuthenticator)
            };
            let app = viewer::App::new(cc.egui_ctx.clone(), url, authenticator)
                .expect("Failed to connect to the auth server");
            Box::new(app)
        }),
    )
}

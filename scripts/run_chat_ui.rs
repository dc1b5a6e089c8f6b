//! AwaasChat entry point.
//!
//! Default mode serves the web UI (embedded chat page, `/api/chat` proxy,
//! `/api/upload`); `--terminal` runs the interactive terminal client against
//! an already-running UI server instead.

use awaas_adaptor_terminal::{TerminalAdaptor, TerminalConfig};
use awaas_adaptor_web::{ChatUiConfig, ChatUiServer};
use awaas_core::{init_logging, load_env};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level filter when RUST_LOG is unset
    #[arg(long, env = "AWAAS_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Bind host for the web UI
    #[arg(long, env = "AWAAS_UI_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Bind port for the web UI
    #[arg(long, env = "AWAAS_UI_PORT", default_value_t = 3000)]
    port: u16,

    /// Backend gateway base URL
    #[arg(long, env = "AWAAS_BACKEND_URL", default_value = "http://localhost:8000")]
    backend_url: String,

    /// Run the terminal chat client instead of the web server
    #[arg(long)]
    terminal: bool,

    /// Terminal mode: interface language code
    #[arg(long, default_value = "en")]
    language: String,

    /// Terminal mode: speak replies through the local synthesizer
    #[arg(long)]
    speak: bool,

    /// Terminal mode: UI server to talk to
    #[arg(long, default_value = "http://localhost:3000")]
    api_url: String,
}

fn main() -> awaas_core::Result<()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build tokio runtime");
    rt.block_on(async move {
        let _ = load_env();
        let cli = Cli::parse();
        std::env::set_var("AWAAS_LOG_LEVEL", &cli.log_level);
        init_logging();

        if cli.terminal {
            let mut adaptor = TerminalAdaptor::new(TerminalConfig {
                api_url: cli.api_url,
                language: cli.language,
                speak: cli.speak,
            });
            return adaptor.start().await;
        }

        let server = ChatUiServer::new(ChatUiConfig {
            host: cli.host,
            port: cli.port,
            backend_url: cli.backend_url,
        });
        tracing::info!(
            "Starting AwaasChat UI (backend gateway: {})",
            server.config.backend_url
        );
        server.start().await
    })
}

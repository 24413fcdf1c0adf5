//! Nigela Beta Widget - terminal signup client.
//!
//! # Usage
//!
//! ```bash
//! # One-shot submission
//! nigela-widget --email food.lover@example.com
//!
//! # Interactive: one email per line, Ctrl-D to quit
//! nigela-widget
//!
//! # Point at a non-default endpoint
//! nigela-widget --endpoint http://localhost:3000/signup
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::Parser;

use nigela_beta_widget::config::WidgetConfig;
use nigela_beta_widget::status::TerminalStatus;
use nigela_beta_widget::transport::HttpTransport;
use nigela_beta_widget::widget::SignupWidget;

#[derive(Parser)]
#[command(name = "nigela-widget")]
#[command(author, version, about = "Nigela beta signup client")]
struct Cli {
    /// Email to submit; reads emails from stdin when omitted
    #[arg(short, long)]
    email: Option<String>,

    /// Signup endpoint, overriding WIDGET_ENDPOINT_URL
    #[arg(long)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nigela_beta_widget=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = match cli.endpoint {
        Some(endpoint) => {
            let _ = dotenvy::dotenv();
            WidgetConfig::build(&endpoint, 30)
        }
        None => WidgetConfig::from_env(),
    }
    .expect("Failed to load configuration");

    let transport = HttpTransport::new(config.endpoint_url.clone(), config.request_timeout)
        .expect("Failed to build HTTP transport");

    let widget = SignupWidget::new(config, Arc::new(transport), Arc::new(TerminalStatus));

    match cli.email {
        Some(email) => {
            widget.submit(&email).await;
        }
        None => {
            for line in std::io::stdin().lines() {
                let line = line.expect("Failed to read stdin");
                let email = line.trim();
                if email.is_empty() {
                    continue;
                }
                widget.submit(email).await;
            }
        }
    }
}

//! # Ruleta — who cooks this month
//!
//! Usage:
//!   ruleta                                   # Serve API + frontend on 0.0.0.0:8000
//!   ruleta serve --port 8080 --data-dir ~/ruleta
//!   ruleta notify --name Ana --email ana@example.com --month Marzo

use anyhow::Result;
use clap::{Parser, Subcommand};
use ruleta_core::{Person, RuletaConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ruleta", version, about = "🎡 Ruleta — monthly cooking roulette")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, default_value = "ruleta.toml")]
    config: String,

    /// Data directory holding participants.json and assignments.json
    #[arg(long)]
    data_dir: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port
        #[arg(short, long)]
        port: Option<u16>,

        /// Frontend build directory (index.html + assets/)
        #[arg(long)]
        frontend_dir: Option<String>,
    },
    /// Send an assignment email to one person
    Notify {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Month name used in the message, e.g. "Marzo"
        #[arg(long)]
        month: String,
    },
}

fn expand_path(p: &str) -> String {
    shellexpand::tilde(p).to_string()
}

fn load_config(cli: &Cli) -> Result<RuletaConfig> {
    let mut config = RuletaConfig::load_from(&PathBuf::from(expand_path(&cli.config)))?;
    config.apply_env();

    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = dir.clone();
    }
    if let Some(Command::Serve {
        host,
        port,
        frontend_dir,
    }) = &cli.command
    {
        if let Some(host) = host {
            config.gateway.host = host.clone();
        }
        if let Some(port) = port {
            config.gateway.port = *port;
        }
        if let Some(dir) = frontend_dir {
            config.gateway.frontend_dir = dir.clone();
        }
    }

    config.storage.data_dir = expand_path(&config.storage.data_dir);
    config.gateway.frontend_dir = expand_path(&config.gateway.frontend_dir);
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "ruleta=debug,ruleta_gateway=debug,ruleta_store=debug,ruleta_engine=debug,ruleta_notify=debug,tower_http=debug"
    } else {
        "ruleta=info,ruleta_gateway=info,ruleta_store=info,ruleta_engine=info,ruleta_notify=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config = load_config(&cli)?;

    match cli.command {
        Some(Command::Notify { name, email, month }) => {
            let mailer = ruleta_notify::Mailer::new(config.smtp.clone());
            let person = Person::new(name, Some(email));
            if mailer.send_assignment_email(&person, &month).await {
                println!("✅ Email sent to {}", person.name);
                Ok(())
            } else {
                anyhow::bail!("email to {} was not sent", person.name)
            }
        }
        Some(Command::Serve { .. }) | None => {
            tracing::info!("🎡 Ruleta v{}", env!("CARGO_PKG_VERSION"));
            tracing::info!("   📂 Data dir:     {}", config.storage.data_dir);
            tracing::info!("   🖥️  Frontend dir: {}", config.gateway.frontend_dir);
            if config.smtp.credentials().is_none() {
                tracing::info!("   📧 Email:        disabled (SMTP_USER/SMTP_PASSWORD not set)");
            }
            ruleta_gateway::start(Arc::new(config)).await
        }
    }
}

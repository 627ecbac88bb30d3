//! Folio command line
//!
//! ```bash
//! # Serve the mock REST API
//! folio serve-api --addr 127.0.0.1:3000
//!
//! # Render the home page from a static file server
//! folio browse --base-url http://127.0.0.1:8080/
//!
//! # Render another route and print the container markup
//! folio browse --base-url http://127.0.0.1:8080/ --route about --html
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use folio::backend::MockBackend;
use folio::{RouteOutcome, Site, SiteConfig};

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Headless portfolio site runtime and mock API", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the mock REST backend
    ServeApi {
        /// Address to bind to
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: String,
    },
    /// Load a route and print what the container shows
    Browse {
        /// Where `pages/` and its stylesheets are served from
        #[arg(long)]
        base_url: Option<String>,

        /// Route to load instead of the default one
        #[arg(long)]
        route: Option<String>,

        /// JSON file with a (partial) site configuration
        #[arg(long)]
        config: Option<String>,

        /// Skip the simulated API latency
        #[arg(long)]
        no_delay: bool,

        /// Print container markup instead of its text
        #[arg(long)]
        html: bool,
    },
}

fn load_config(path: Option<&str>) -> anyhow::Result<SiteConfig> {
    match path {
        Some(path) => {
            let src = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path))?;
            Ok(SiteConfig::from_json(&src)?)
        }
        None => Ok(SiteConfig::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.command {
        Command::ServeApi { addr } => {
            let backend = MockBackend::new()?;
            let server = MockBackend::bind(&addr)?;
            log::info!("Mock API listening on {}", addr);
            tokio::task::spawn_blocking(move || backend.serve(&server)).await?;
        }
        Command::Browse {
            base_url,
            route,
            config,
            no_delay,
            html,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(base_url) = base_url {
                config.base_url = base_url;
            }
            if no_delay {
                config.api.delays = folio::SimulatedDelays::none();
            }
            let site = Site::new(config)?;
            let outcome = match route {
                Some(route) => site.load_route(&route).await,
                None => site.start().await,
            };
            if outcome != RouteOutcome::Rendered {
                log::warn!("route finished as {:?}", outcome);
            }
            if html {
                println!("{}", site.container_html());
            } else {
                println!("{}", site.container_text().trim());
            }
        }
    }
    Ok(())
}

use std::path::PathBuf;

use actix_web::{middleware, web, App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use endpoints::*;

use crate::github::GithubClient;
use crate::settings::{QueryDefaults, Settings};

mod endpoints;
mod data;
pub mod api;
mod github;
mod settings;

#[derive(Parser)]
#[command(author, version, about = "Contributor leaderboard over a repository's recent public events", long_about = None)]
struct Cli {
	/// Settings file (toml, yaml or json)
	#[arg(short, long, env = "REPO_ACTIVITY_CONFIG")]
	config: Option<PathBuf>,

	/// Listen address, overrides the settings file
	#[arg(long)]
	host: Option<String>,

	/// Listen port, overrides the settings file
	#[arg(short, long)]
	port: Option<u16>,

	/// Enable debug logging
	#[arg(short, long)]
	verbose: bool,
}

pub struct AppState {
	pub github: GithubClient,
	pub defaults: QueryDefaults,
	pub max_page_size: u32,
}

impl AppState {
	pub fn new(settings: &Settings) -> Result<Self> {
		Ok(Self {
			github: GithubClient::new(&settings.upstream)?,
			defaults: settings.defaults.clone(),
			max_page_size: settings.upstream.max_page_size,
		})
	}
}

#[actix_web::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	let level = if cli.verbose { "debug" } else { "info" };
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
		.with_target(false)
		.init();

	let mut settings = Settings::load(cli.config.as_deref())?;
	if let Some(host) = cli.host {
		settings.server.host = host;
	}
	if let Some(port) = cli.port {
		settings.server.port = port;
	}

	let state = web::Data::new(AppState::new(&settings)?);

	info!(
		host = %settings.server.host,
		port = settings.server.port,
		upstream = %settings.upstream.base_url,
		"starting server"
	);

	HttpServer::new(move || {
		App::new()
			.app_data(state.clone())
			.wrap(middleware::Logger::default())
			.service(github_activity)
	}).bind((settings.server.host.as_str(), settings.server.port))
		.with_context(|| format!("Failed to bind {}:{}", settings.server.host, settings.server.port))?
		.run()
		.await
		.context("Server stopped unexpectedly")
}

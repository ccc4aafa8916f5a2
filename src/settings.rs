use std::path::Path;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "REPO_ACTIVITY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub server: ServerSettings,
	pub upstream: UpstreamSettings,
	pub defaults: QueryDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
}

impl Default for ServerSettings {
	fn default() -> Self {
		Self {
			host: "127.0.0.1".to_string(),
			port: 8080,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
	pub base_url: String,
	pub timeout_ms: u64,
	pub user_agent: String,
	/// Upper bound for `per_page`, GitHub itself caps it at 100.
	pub max_page_size: u32,
}

impl Default for UpstreamSettings {
	fn default() -> Self {
		Self {
			base_url: "https://api.github.com".to_string(),
			timeout_ms: 10_000,
			user_agent: "repo-activity".to_string(),
			max_page_size: 100,
		}
	}
}

/// Values used for query parameters the caller leaves out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDefaults {
	pub owner: String,
	pub repo: String,
	pub size: u32,
	pub sort: String,
}

impl Default for QueryDefaults {
	fn default() -> Self {
		Self {
			owner: "rails".to_string(),
			repo: "rails".to_string(),
			size: 100,
			sort: "PushEvent".to_string(),
		}
	}
}

impl Settings {
	/// Built-in defaults, then the optional file, then `REPO_ACTIVITY__*` variables.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		let mut builder = Config::builder()
			.add_source(Config::try_from(&Settings::default()).context("Failed to encode default settings")?);

		if let Some(path) = path {
			builder = builder.add_source(File::from(path).required(true));
		}

		let settings: Settings = builder
			.add_source(Environment::with_prefix(ENV_PREFIX).prefix_separator("__").separator("__"))
			.build()
			.context("Failed to read configuration")?
			.try_deserialize()
			.context("Invalid configuration")?;

		settings.validate()?;
		Ok(settings)
	}

	fn validate(&self) -> Result<()> {
		if self.upstream.base_url.trim().is_empty() {
			bail!("upstream.base_url must not be empty");
		}
		if self.upstream.max_page_size == 0 {
			bail!("upstream.max_page_size must be at least 1");
		}
		if self.upstream.timeout_ms == 0 {
			bail!("upstream.timeout_ms must be at least 1");
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;

	#[test]
	fn defaults_match_historical_query() {
		let settings = Settings::load(None).unwrap();
		assert_eq!(settings.defaults, QueryDefaults {
			owner: "rails".to_string(),
			repo: "rails".to_string(),
			size: 100,
			sort: "PushEvent".to_string(),
		});
		assert_eq!(settings.upstream.base_url, "https://api.github.com");
		assert_eq!(settings.upstream.max_page_size, 100);
	}

	#[test]
	fn file_overrides_defaults() {
		let path = std::env::temp_dir().join(format!("repo-activity-{}.toml", std::process::id()));
		let mut file = std::fs::File::create(&path).unwrap();
		writeln!(file, "[defaults]\nowner = \"tokio-rs\"\nrepo = \"tokio\"\n\n[upstream]\nmax_page_size = 50").unwrap();
		drop(file);

		let settings = Settings::load(Some(&path)).unwrap();
		std::fs::remove_file(&path).unwrap();

		assert_eq!(settings.defaults.owner, "tokio-rs");
		assert_eq!(settings.defaults.repo, "tokio");
		assert_eq!(settings.defaults.sort, "PushEvent");
		assert_eq!(settings.upstream.max_page_size, 50);
		assert_eq!(settings.server.port, 8080);
	}

	#[test]
	fn missing_file_is_an_error() {
		let path = std::env::temp_dir().join("repo-activity-does-not-exist.toml");
		assert!(Settings::load(Some(&path)).is_err());
	}

	#[test]
	fn zero_page_size_is_rejected() {
		let mut settings = Settings::default();
		settings.upstream.max_page_size = 0;
		assert!(settings.validate().is_err());
	}
}

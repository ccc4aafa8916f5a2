use std::fmt::{Display, Formatter};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::data::Event;
use crate::settings::UpstreamSettings;

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Why a page of events could not be fetched.
#[derive(Debug)]
pub enum FetchError {
	Timeout,
	Transport(reqwest::Error),
	Status(StatusCode),
	Decode(reqwest::Error),
}

impl FetchError {
	/// The upstream never answered, as opposed to answering with something unusable.
	pub fn is_unreachable(&self) -> bool {
		matches!(self, FetchError::Timeout | FetchError::Transport(_))
	}

	fn from_body(err: reqwest::Error) -> Self {
		if err.is_decode() {
			FetchError::Decode(err)
		} else {
			FetchError::Transport(err)
		}
	}
}

impl Display for FetchError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			FetchError::Timeout => write!(f, "upstream timed out"),
			FetchError::Transport(err) => write!(f, "upstream unreachable: {}", err),
			FetchError::Status(status) => write!(f, "upstream answered {}", status),
			FetchError::Decode(err) => write!(f, "malformed upstream response: {}", err),
		}
	}
}

impl std::error::Error for FetchError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			FetchError::Transport(err) | FetchError::Decode(err) => Some(err),
			_ => None,
		}
	}
}

/// Unauthenticated client for the public events API. Cheap to clone, clones share the pool.
#[derive(Clone, Debug)]
pub struct GithubClient {
	client: Client,
	base_url: Url,
	timeout: Duration,
}

impl GithubClient {
	pub fn new(settings: &UpstreamSettings) -> Result<Self> {
		let base_url = Url::parse(&settings.base_url)
			.with_context(|| format!("Invalid upstream url {}", settings.base_url))?;
		if base_url.cannot_be_a_base() {
			bail!("Upstream url {} cannot carry a path", settings.base_url);
		}

		let mut headers = HeaderMap::new();
		headers.insert(USER_AGENT, HeaderValue::from_str(&settings.user_agent).context("Invalid user agent")?);
		headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

		let timeout = Duration::from_millis(settings.timeout_ms);
		let client = Client::builder()
			.default_headers(headers)
			.build()
			.context("Failed to build HTTP client")?;

		Ok(Self { client, base_url, timeout })
	}

	pub fn events_url(&self, owner: &str, repo: &str, size: u32) -> Url {
		let mut url = self.base_url.clone();
		if let Ok(mut segments) = url.path_segments_mut() {
			segments.pop_if_empty().extend(&["repos", owner, repo, "events"]);
		}
		url.query_pairs_mut().append_pair("per_page", &size.to_string());
		url
	}

	/// Fetches a single page of events. The deadline covers connecting, the headers and the body.
	pub async fn fetch_events(&self, owner: &str, repo: &str, size: u32) -> Result<Vec<Event>, FetchError> {
		let url = self.events_url(owner, repo, size);
		match tokio::time::timeout(self.timeout, self.get_events(url)).await {
			Ok(result) => result,
			Err(_) => Err(FetchError::Timeout),
		}
	}

	async fn get_events(&self, url: Url) -> Result<Vec<Event>, FetchError> {
		let response = self.client.get(url)
			.send()
			.await
			.map_err(FetchError::Transport)?;

		if let Some(remaining) = response.headers().get(RATE_LIMIT_REMAINING).and_then(|v| v.to_str().ok()) {
			debug!(remaining, "upstream rate limit");
		}

		let status = response.status();
		if !status.is_success() {
			return Err(FetchError::Status(status));
		}

		response.json::<Vec<Event>>()
			.await
			.map_err(FetchError::from_body)
	}
}

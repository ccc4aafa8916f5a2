use serde::{de, Deserialize, Deserializer, Serialize};

use crate::settings::QueryDefaults;

/// Raw `/api/github` query string, every parameter optional.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct GithubApiRequest {
	pub owner: Option<String>,
	pub repo: Option<String>,
	#[serde(default, deserialize_with = "blank_as_none")]
	pub size: Option<u32>,
	pub sort: Option<String>,
}

/// Query with defaults applied and the page size bounded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityQuery {
	pub owner: String,
	pub repo: String,
	pub size: u32,
	pub sort: String,
}

/// `size=` counts as absent, any other text has to be a valid number.
fn blank_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
	match Option::<String>::deserialize(deserializer)? {
		Some(value) if !value.is_empty() => value.parse().map(Some).map_err(de::Error::custom),
		_ => Ok(None),
	}
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.is_empty())
}

impl ActivityQuery {
	pub fn resolve(request: GithubApiRequest, defaults: &QueryDefaults, max_page_size: u32) -> Self {
		Self {
			owner: non_empty(request.owner).unwrap_or_else(|| defaults.owner.clone()),
			repo: non_empty(request.repo).unwrap_or_else(|| defaults.repo.clone()),
			size: request.size.unwrap_or(defaults.size).clamp(1, max_page_size.max(1)),
			sort: non_empty(request.sort).unwrap_or_else(|| defaults.sort.clone()),
		}
	}
}

use serde::{Deserialize, Serialize};

/// A single public activity record as returned by `GET /repos/{owner}/{repo}/events`.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Event {
	pub actor: Actor,
	#[serde(rename = "type")]
	pub kind: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Actor {
	#[serde(alias = "name")]
	pub login: String,
}

impl Event {
	#[cfg(test)]
	pub fn new(author: &str, kind: &str) -> Self {
		Self {
			actor: Actor { login: author.to_string() },
			kind: kind.to_string(),
		}
	}
	
	pub fn author(&self) -> &str {
		&self.actor.login
	}
}

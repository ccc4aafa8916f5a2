use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::data::Event;

pub type EventCounts = BTreeMap<String, u32>;

/// Per-author event type counts for one fetched page.
#[derive(Default, Debug, Clone)]
pub struct UserActivity {
	users: HashMap<String, EventCounts>,
}

impl UserActivity {
	pub fn from_events(events: &[Event]) -> Self {
		let mut activity = Self::default();
		for event in events {
			activity.record(event);
		}
		activity
	}

	pub fn record(&mut self, event: &Event) {
		*self.users
			.entry(event.author().to_string())
			.or_default()
			.entry(event.kind.clone())
			.or_insert(0) += 1;
	}

	pub fn len(&self) -> usize {
		self.users.len()
	}

	pub fn is_empty(&self) -> bool {
		self.users.is_empty()
	}

	/// Number of events seen across all authors.
	pub fn total(&self) -> u64 {
		self.users.values()
			.flat_map(|counts| counts.values())
			.map(|count| *count as u64)
			.sum()
	}

	pub fn into_summaries(self) -> Vec<UserSummary> {
		self.users.into_iter()
			.map(|(name, events)| UserSummary { name, events })
			.collect()
	}

	pub fn ranked_by(self, kind: &str) -> Vec<UserSummary> {
		let mut users = self.into_summaries();
		sort_by_event(&mut users, kind);
		users
	}
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct UserSummary {
	pub name: String,
	pub events: EventCounts,
}

impl UserSummary {
	pub fn count(&self, kind: &str) -> u32 {
		self.events.get(kind).copied().unwrap_or(0)
	}

	fn rank(&self, other: &Self, kind: &str) -> Ordering {
		other.count(kind).cmp(&self.count(kind))
			.then_with(|| self.name.cmp(&other.name))
	}
}

/// Descending by the count of `kind`, equal counts ordered by name.
pub fn sort_by_event(users: &mut [UserSummary], kind: &str) {
	users.sort_by(|l, r| l.rank(r, kind));
}

#[cfg(test)]
mod tests {
	use super::*;

	fn events(pairs: &[(&str, &str)]) -> Vec<Event> {
		pairs.iter().map(|(author, kind)| Event::new(author, kind)).collect()
	}

	fn leaderboard(events: &[Event], kind: &str) -> Vec<UserSummary> {
		UserActivity::from_events(events).ranked_by(kind)
	}

	#[test]
	fn counts_every_event_once() {
		let events = events(&[
			("a", "PushEvent"),
			("a", "PushEvent"),
			("a", "IssuesEvent"),
			("b", "WatchEvent"),
			("c", "PushEvent"),
			("b", "WatchEvent"),
		]);
		let activity = UserActivity::from_events(&events);

		assert_eq!(activity.len(), 3);
		assert_eq!(activity.total(), events.len() as u64);

		let users = activity.into_summaries();
		let a = users.iter().find(|u| u.name == "a").unwrap();
		assert_eq!(a.count("PushEvent"), 2);
		assert_eq!(a.count("IssuesEvent"), 1);
		assert_eq!(a.events.values().sum::<u32>(), 3);
	}

	#[test]
	fn missing_sort_key_counts_as_zero() {
		let users = leaderboard(&events(&[("b", "WatchEvent"), ("a", "PushEvent")]), "PushEvent");

		let expected = vec![
			UserSummary { name: "a".to_string(), events: BTreeMap::from([("PushEvent".to_string(), 1)]) },
			UserSummary { name: "b".to_string(), events: BTreeMap::from([("WatchEvent".to_string(), 1)]) },
		];
		assert_eq!(users, expected);
	}

	#[test]
	fn sorted_descending_with_name_tie_break() {
		let users = leaderboard(&events(&[
			("zed", "PushEvent"),
			("amy", "PushEvent"),
			("bob", "PushEvent"),
			("bob", "PushEvent"),
			("cat", "ForkEvent"),
		]), "PushEvent");

		let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
		assert_eq!(names, vec!["bob", "amy", "zed", "cat"]);
		for pair in users.windows(2) {
			assert!(pair[0].count("PushEvent") >= pair[1].count("PushEvent"));
		}
	}

	#[test]
	fn keeps_all_event_types_in_summary() {
		let users = leaderboard(&events(&[("a", "PushEvent"), ("a", "WatchEvent")]), "ForkEvent");
		assert_eq!(users.len(), 1);
		assert_eq!(users[0].events.len(), 2);
		assert_eq!(users[0].count("ForkEvent"), 0);
	}

	#[test]
	fn empty_page_gives_empty_leaderboard() {
		assert!(leaderboard(&[], "PushEvent").is_empty());
		assert!(UserActivity::from_events(&[]).is_empty());
	}

	#[test]
	fn serializes_as_name_and_events() {
		let users = leaderboard(&events(&[("a", "PushEvent")]), "PushEvent");
		assert_eq!(
			serde_json::to_value(&users).unwrap(),
			serde_json::json!([{"name": "a", "events": {"PushEvent": 1}}])
		);
	}
}

use bson::{doc, DateTime, Document};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Lifecycle;

/// A post written by an author.
///
/// The four counters are derived from interactions and comments and are only
/// ever changed through atomic increments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
	#[serde(rename = "_id")]
	pub id: Uuid,
	pub author: Uuid,
	pub title: String,
	pub body: String,
	#[serde(default)]
	pub hidden: bool,
	#[serde(rename = "deletedAt", default)]
	pub lifecycle: Lifecycle,
	#[serde(default)]
	pub views_count: i64,
	#[serde(default)]
	pub likes_count: i64,
	#[serde(default)]
	pub dislikes_count: i64,
	#[serde(default)]
	pub comments_count: i64,
	pub created_at: DateTime,
	pub updated_at: DateTime,
}

#[derive(Debug, Clone)]
pub struct NewPost {
	pub author: Uuid,
	pub title: String,
	pub body: String,
	pub hidden: bool,
}

impl NewPost {
	pub(crate) fn into_post(self, now: DateTime) -> Post {
		Post {
			id: Uuid::new_v4(),
			author: self.author,
			title: self.title,
			body: self.body,
			hidden: self.hidden,
			lifecycle: Lifecycle::Active,
			views_count: 0,
			likes_count: 0,
			dislikes_count: 0,
			comments_count: 0,
			created_at: now,
			updated_at: now,
		}
	}
}

#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
	pub title: Option<String>,
	pub body: Option<String>,
	pub hidden: Option<bool>,
}

impl PostUpdate {
	/// The `$set` body for the fields present in this update.
	pub fn into_set(self) -> Document {
		let mut set = doc! {};

		if let Some(title) = self.title {
			set.insert("title", title);
		}

		if let Some(body) = self.body {
			set.insert("body", body);
		}

		if let Some(hidden) = self.hidden {
			set.insert("hidden", hidden);
		}

		set
	}
}

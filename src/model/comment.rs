use bson::{doc, DateTime, Document};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Lifecycle;

/// A comment on a post, optionally replying to another comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
	#[serde(rename = "_id")]
	pub id: Uuid,
	pub user: Uuid,
	pub post: Uuid,
	/// `None` for root comments.
	#[serde(default)]
	pub parent_comment: Option<Uuid>,
	#[serde(rename = "deletedAt", default)]
	pub lifecycle: Lifecycle,
	pub body: String,
	#[serde(default)]
	pub tldr: Option<String>,
	#[serde(default)]
	pub likes_count: i64,
	#[serde(default)]
	pub dislikes_count: i64,
	pub created_at: DateTime,
	pub updated_at: DateTime,
}

#[derive(Debug, Clone)]
pub struct NewComment {
	pub user: Uuid,
	pub post: Uuid,
	pub parent_comment: Option<Uuid>,
	pub body: String,
	pub tldr: Option<String>,
}

impl NewComment {
	pub(crate) fn into_comment(self, now: DateTime) -> Comment {
		Comment {
			id: Uuid::new_v4(),
			user: self.user,
			post: self.post,
			parent_comment: self.parent_comment,
			lifecycle: Lifecycle::Active,
			body: self.body,
			tldr: self.tldr,
			likes_count: 0,
			dislikes_count: 0,
			created_at: now,
			updated_at: now,
		}
	}
}

#[derive(Debug, Clone, Default)]
pub struct CommentUpdate {
	pub body: Option<String>,
	pub tldr: Option<String>,
}

impl CommentUpdate {
	pub fn into_set(self) -> Document {
		let mut set = doc! {};

		if let Some(body) = self.body {
			set.insert("body", body);
		}

		if let Some(tldr) = self.tldr {
			set.insert("tldr", tldr);
		}

		set
	}
}

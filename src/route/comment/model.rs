pub use crate::route::model::{IdInput, Paginate};

use chrono::{DateTime, Utc};
use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::model as stored;

/// A single comment on a post.
#[model]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
	/// The unique identifier of the comment.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The user that wrote the comment.
	#[serde(skip_deserializing)]
	pub user: Uuid,
	#[serde(skip_deserializing)]
	pub post: Uuid,
	/// The comment this one replies to, which must be a live comment of the
	/// same post. Absent for root comments.
	pub parent_comment: Option<Uuid>,
	#[validate(length(min = 1))]
	pub body: String,
	/// A short summary of the body.
	#[validate(length(max = 64))]
	pub tldr: Option<String>,
	#[serde(skip_deserializing)]
	pub likes_count: i64,
	#[serde(skip_deserializing)]
	pub dislikes_count: i64,
	#[serde(skip_deserializing, rename = "dateCreated")]
	pub created_at: DateTime<Utc>,
	#[serde(skip_deserializing, rename = "dateUpdated")]
	pub updated_at: DateTime<Utc>,
}

impl From<stored::Comment> for Comment {
	fn from(comment: stored::Comment) -> Self {
		Self {
			id: comment.id,
			user: comment.user,
			post: comment.post,
			parent_comment: comment.parent_comment,
			body: comment.body,
			tldr: comment.tldr,
			likes_count: comment.likes_count,
			dislikes_count: comment.dislikes_count,
			created_at: comment.created_at.to_chrono(),
			updated_at: comment.updated_at.to_chrono(),
		}
	}
}

/// Path of a single comment under its post.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct CommentPath {
	/// The post id.
	pub id: Uuid,
	pub comment_id: Uuid,
}

impl From<UpdateCommentInput> for stored::CommentUpdate {
	fn from(input: UpdateCommentInput) -> Self {
		Self {
			body: input.body,
			tldr: input.tldr.flatten(),
		}
	}
}

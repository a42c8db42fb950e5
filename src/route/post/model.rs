pub use crate::route::model::{IdInput, Paginate};

use chrono::{DateTime, Utc};
use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::model as stored;

/// A single post, written by an author.
#[model]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The user that wrote the post.
	#[serde(skip_deserializing)]
	pub author: Uuid,
	/// The title of the post.
	#[validate(length(min = 4, max = 56))]
	pub title: String,
	/// The content of the post.
	#[validate(length(min = 1))]
	pub body: String,
	/// Hidden posts are left out of the public listing.
	#[serde(default)]
	pub hidden: bool,
	#[serde(skip_deserializing)]
	pub views_count: i64,
	#[serde(skip_deserializing)]
	pub likes_count: i64,
	#[serde(skip_deserializing)]
	pub dislikes_count: i64,
	/// The number of live comments on the post.
	#[serde(skip_deserializing)]
	pub comments_count: i64,
	/// The creation time of the post.
	#[serde(skip_deserializing, rename = "dateCreated")]
	pub created_at: DateTime<Utc>,
	#[serde(skip_deserializing, rename = "dateUpdated")]
	pub updated_at: DateTime<Utc>,
}

impl From<stored::Post> for Post {
	fn from(post: stored::Post) -> Self {
		Self {
			id: post.id,
			author: post.author,
			title: post.title,
			body: post.body,
			hidden: post.hidden,
			views_count: post.views_count,
			likes_count: post.likes_count,
			dislikes_count: post.dislikes_count,
			comments_count: post.comments_count,
			created_at: post.created_at.to_chrono(),
			updated_at: post.updated_at.to_chrono(),
		}
	}
}

impl From<UpdatePostInput> for stored::PostUpdate {
	fn from(input: UpdatePostInput) -> Self {
		Self {
			title: input.title,
			body: input.body,
			hidden: input.hidden,
		}
	}
}

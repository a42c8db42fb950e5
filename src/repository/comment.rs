use std::sync::Arc;

use async_trait::async_trait;
use bson::{DateTime, Document};

use crate::{
	model::{Comment, CommentUpdate, CounterField, Lifecycle, NewComment},
	pagination::Paginator,
	store::{Collection, Store},
};

use super::{by_id, Counted, Error, PostRepository, Records};

/// Comments, keeping their post's `commentsCount` in step.
#[derive(Clone)]
pub struct CommentRepository {
	records: Records<Comment>,
	posts: PostRepository,
}

impl CommentRepository {
	pub fn new(store: Arc<dyn Store>, posts: PostRepository) -> Self {
		Self {
			records: Records::new(store, Collection::Comments),
			posts,
		}
	}

	/// Inserts the comment, then increments the post's `commentsCount`.
	pub async fn create(&self, comment: NewComment) -> Result<Comment, Error> {
		let comment = comment.into_comment(DateTime::now());

		self.records.insert(&comment).await?;
		self.posts
			.increment_count(by_id(comment.post), CounterField::Comments, 1)
			.await?;

		tracing::info!(comment = %comment.id, post = %comment.post, "created comment");

		Ok(comment)
	}

	pub async fn find_one(&self, filter: Document) -> Result<Option<Comment>, Error> {
		self.records.find_one(filter).await
	}

	/// Newest first.
	pub async fn find_all(
		&self,
		filter: Document,
		paginator: Paginator,
	) -> Result<Vec<Comment>, Error> {
		self.records.find_all(filter, paginator, true).await
	}

	pub async fn update(&self, filter: Document, update: CommentUpdate) -> Result<(), Error> {
		self.records.set(filter, update.into_set()).await?;
		Ok(())
	}

	/// Soft-deletes the first active comment matching `filter`, then
	/// decrements its post's `commentsCount`.
	///
	/// The decrement is only issued when this call moved the comment to
	/// deleted, so repeated deletes take exactly one comment off the count.
	pub async fn delete(&self, mut filter: Document) -> Result<bool, Error> {
		filter.insert(Lifecycle::FIELD, Lifecycle::active());

		let Some(comment) = self.records.find_one(filter).await? else {
			return Ok(false);
		};

		if !self.records.soft_delete(by_id(comment.id)).await? {
			return Ok(false);
		}

		self.posts
			.increment_count(by_id(comment.post), CounterField::Comments, -1)
			.await?;

		tracing::info!(comment = %comment.id, post = %comment.post, "deleted comment");

		Ok(true)
	}
}

#[async_trait]
impl Counted for CommentRepository {
	async fn increment_count(
		&self,
		filter: Document,
		field: CounterField,
		delta: i64,
	) -> Result<(), Error> {
		self.records.increment(filter, field, delta).await?;
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_create_increments_post() {
		let repositories = repositories();
		let author = user(&repositories, "ada").await;
		let post = post(&repositories, author.id).await;

		let root = comment(&repositories, author.id, post.id, None).await;
		let reply = comment(&repositories, author.id, post.id, Some(root.id)).await;

		assert_eq!(root.parent_comment, None);
		assert_eq!(reply.parent_comment, Some(root.id));
		assert_eq!(reload_post(&repositories, post.id).await.comments_count, 2);
	}

	#[tokio::test]
	async fn test_delete_decrements_only_parent_post() {
		let repositories = repositories();
		let author = user(&repositories, "ada").await;
		let post = post(&repositories, author.id).await;
		let other = post_titled(&repositories, author.id, "Another post").await;

		let mut comments = Vec::new();

		for _ in 0..3 {
			comments.push(comment(&repositories, author.id, post.id, None).await);
		}

		comment(&repositories, author.id, other.id, None).await;

		assert!(repositories
			.comments
			.delete(by_id(comments[1].id))
			.await
			.unwrap());

		assert_eq!(reload_post(&repositories, post.id).await.comments_count, 2);
		assert_eq!(reload_post(&repositories, other.id).await.comments_count, 1);

		let deleted = repositories
			.comments
			.find_one(by_id(comments[1].id))
			.await
			.unwrap()
			.unwrap();

		assert!(deleted.lifecycle.is_deleted());
	}

	#[tokio::test]
	async fn test_delete_twice_decrements_once() {
		let repositories = repositories();
		let author = user(&repositories, "ada").await;
		let post = post(&repositories, author.id).await;
		let comment = comment(&repositories, author.id, post.id, None).await;

		assert!(repositories.comments.delete(by_id(comment.id)).await.unwrap());
		assert!(!repositories.comments.delete(by_id(comment.id)).await.unwrap());

		assert_eq!(reload_post(&repositories, post.id).await.comments_count, 0);
	}

	#[tokio::test]
	async fn test_delete_missing_is_noop() {
		let repositories = repositories();

		assert!(!repositories
			.comments
			.delete(by_id(Uuid::new_v4()))
			.await
			.unwrap());
	}

	#[tokio::test]
	async fn test_comments_count_matches_live_comments() {
		let repositories = repositories();
		let author = user(&repositories, "ada").await;
		let post = post(&repositories, author.id).await;

		let mut comments = Vec::new();

		for _ in 0..5 {
			comments.push(comment(&repositories, author.id, post.id, None).await);
		}

		for comment in comments.iter().step_by(2) {
			repositories.comments.delete(by_id(comment.id)).await.unwrap();
		}

		let live = repositories
			.comments
			.find_all(
				bson::doc! { "post": id(post.id), "deletedAt": Lifecycle::active() },
				Paginator::default(),
			)
			.await
			.unwrap();

		let post = reload_post(&repositories, post.id).await;

		assert_eq!(live.len(), 2);
		assert_eq!(post.comments_count, 2);
	}

	#[tokio::test]
	async fn test_update_body_and_tldr() {
		let repositories = repositories();
		let author = user(&repositories, "ada").await;
		let post = post(&repositories, author.id).await;
		let comment = comment(&repositories, author.id, post.id, None).await;

		repositories
			.comments
			.update(
				by_id(comment.id),
				CommentUpdate {
					tldr: Some("short".into()),
					..Default::default()
				},
			)
			.await
			.unwrap();

		let found = repositories
			.comments
			.find_one(by_id(comment.id))
			.await
			.unwrap()
			.unwrap();

		assert_eq!(found.tldr.as_deref(), Some("short"));
		assert_eq!(found.body, comment.body);
	}
}

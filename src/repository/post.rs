use std::sync::Arc;

use async_trait::async_trait;
use bson::{DateTime, Document};

use crate::{
	model::{CounterField, NewPost, Post, PostUpdate},
	pagination::Paginator,
	store::{Collection, Store},
};

use super::{Counted, Error, Records};

#[derive(Clone)]
pub struct PostRepository {
	records: Records<Post>,
}

impl PostRepository {
	pub fn new(store: Arc<dyn Store>) -> Self {
		Self {
			records: Records::new(store, Collection::Posts),
		}
	}

	pub async fn create(&self, post: NewPost) -> Result<Post, Error> {
		let post = post.into_post(DateTime::now());

		self.records.insert(&post).await?;
		tracing::info!(post = %post.id, author = %post.author, "created post");

		Ok(post)
	}

	pub async fn find_one(&self, filter: Document) -> Result<Option<Post>, Error> {
		self.records.find_one(filter).await
	}

	/// Newest first.
	pub async fn find_all(&self, filter: Document, paginator: Paginator) -> Result<Vec<Post>, Error> {
		self.records.find_all(filter, paginator, true).await
	}

	pub async fn update(&self, filter: Document, update: PostUpdate) -> Result<(), Error> {
		self.records.set(filter, update.into_set()).await?;
		Ok(())
	}

	/// Soft-deletes the first active post matching `filter`. Counters are left
	/// as they are.
	pub async fn delete(&self, filter: Document) -> Result<bool, Error> {
		self.records.soft_delete(filter).await
	}
}

#[async_trait]
impl Counted for PostRepository {
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
	async fn test_create_starts_at_zero() {
		let repositories = repositories();
		let author = user(&repositories, "ada").await;
		let post = post(&repositories, author.id).await;

		assert_eq!(post.views_count, 0);
		assert_eq!(post.likes_count, 0);
		assert_eq!(post.dislikes_count, 0);
		assert_eq!(post.comments_count, 0);
		assert_eq!(post.lifecycle, Lifecycle::Active);
	}

	#[tokio::test]
	async fn test_find_all_newest_first() {
		let repositories = repositories();
		let author = user(&repositories, "ada").await;
		let first = post(&repositories, author.id).await;
		let second = post(&repositories, author.id).await;

		let posts = repositories
			.posts
			.find_all(bson::doc! {}, Paginator::default())
			.await
			.unwrap();

		let ids = posts.iter().map(|p| p.id).collect::<Vec<_>>();

		assert_eq!(ids, vec![second.id, first.id]);
	}

	#[tokio::test]
	async fn test_find_one_missing_is_none() {
		let repositories = repositories();

		let found = repositories
			.posts
			.find_one(by_id(Uuid::new_v4()))
			.await
			.unwrap();

		assert!(found.is_none());
	}

	#[tokio::test]
	async fn test_update_only_present_fields() {
		let repositories = repositories();
		let author = user(&repositories, "ada").await;
		let post = post(&repositories, author.id).await;

		repositories
			.posts
			.update(
				by_id(post.id),
				PostUpdate {
					hidden: Some(true),
					..Default::default()
				},
			)
			.await
			.unwrap();

		let found = reload_post(&repositories, post.id).await;

		assert!(found.hidden);
		assert_eq!(found.title, post.title);
		assert_eq!(found.body, post.body);
	}

	#[tokio::test]
	async fn test_soft_delete_keeps_record() {
		let repositories = repositories();
		let author = user(&repositories, "ada").await;
		let post = post(&repositories, author.id).await;

		assert!(repositories.posts.delete(by_id(post.id)).await.unwrap());
		assert!(!repositories.posts.delete(by_id(post.id)).await.unwrap());

		let found = reload_post(&repositories, post.id).await;

		assert!(found.lifecycle.is_deleted());
	}

	#[tokio::test]
	async fn test_increment_count() {
		let repositories = repositories();
		let author = user(&repositories, "ada").await;
		let post = post(&repositories, author.id).await;

		for field in CounterField::ALL {
			repositories
				.posts
				.increment_count(by_id(post.id), field, 2)
				.await
				.unwrap();
		}

		repositories
			.posts
			.increment_count(by_id(post.id), CounterField::Likes, -1)
			.await
			.unwrap();

		let found = reload_post(&repositories, post.id).await;

		assert_eq!(found.views_count, 2);
		assert_eq!(found.likes_count, 1);
		assert_eq!(found.dislikes_count, 2);
		assert_eq!(found.comments_count, 2);
	}

	#[tokio::test]
	async fn test_increment_by_parsed_name() {
		let repositories = repositories();
		let author = user(&repositories, "ada").await;
		let post = post(&repositories, author.id).await;

		for name in ["title", "sharesCount", "viewscount"] {
			assert_eq!(
				name.parse::<CounterField>(),
				Err(InvalidField(name.into()))
			);
		}

		let field = "viewsCount".parse::<CounterField>().unwrap();

		repositories
			.posts
			.increment_count(by_id(post.id), field, 1)
			.await
			.unwrap();

		let found = reload_post(&repositories, post.id).await;

		assert_eq!(found.views_count, 1);
		assert_eq!(found.title, post.title);
	}
}

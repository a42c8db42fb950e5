//! Per-entity repositories over a [`Store`].
//!
//! Every write here is a single-document atomic operation. Multi-step
//! sequences (insert then increment, re-type then adjust two counters,
//! soft delete then decrement the parent post) are not atomic as a whole:
//! if a later step fails or the future is dropped, earlier steps stay
//! applied and the derived counter is left stale. Nothing repairs that.

mod comment;
mod interaction;
mod post;
mod user;

pub use comment::CommentRepository;
pub use interaction::{InteractionRepository, Upserted};
pub use post::PostRepository;
pub use user::UserRepository;

use std::{marker::PhantomData, sync::Arc};

use async_trait::async_trait;
use bson::{doc, DateTime, Document};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::{
	model::{self, CounterField, Lifecycle},
	pagination::Paginator,
	store::{self, Collection, FindOptions, Store},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("duplicate key in {collection}: {message}")]
	DuplicateKey {
		collection: &'static str,
		message: String,
	},
	#[error("failed to encode document: {0}")]
	Encode(#[from] bson::ser::Error),
	#[error("failed to decode document: {0}")]
	Decode(#[from] bson::de::Error),
	#[error("store error: {0}")]
	Store(store::Error),
}

impl From<store::Error> for Error {
	fn from(error: store::Error) -> Self {
		match error {
			store::Error::DuplicateKey {
				collection,
				message,
			} => Self::DuplicateKey {
				collection,
				message,
			},
			error => Self::Store(error),
		}
	}
}

/// Filter matching a single document by id.
pub fn by_id(id: Uuid) -> Document {
	doc! { "_id": model::id(id) }
}

/// An entity with atomically incrementable counters.
///
/// Interactions dispatch to one implementation per [`model::TargetKind`].
/// Only a [`CounterField`] can be incremented, so a field named at runtime
/// has to parse into one before anything is written.
#[async_trait]
pub trait Counted: Send + Sync {
	async fn increment_count(
		&self,
		filter: Document,
		field: CounterField,
		delta: i64,
	) -> Result<(), Error>;
}

/// Typed access to one collection.
pub(crate) struct Records<T> {
	store: Arc<dyn Store>,
	collection: Collection,
	marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Records<T> {
	fn clone(&self) -> Self {
		Self {
			store: Arc::clone(&self.store),
			collection: self.collection,
			marker: PhantomData,
		}
	}
}

impl<T> Records<T>
where
	T: Serialize + DeserializeOwned,
{
	pub fn new(store: Arc<dyn Store>, collection: Collection) -> Self {
		Self {
			store,
			collection,
			marker: PhantomData,
		}
	}

	pub async fn insert(&self, record: &T) -> Result<(), Error> {
		let document = bson::to_document(record)?;

		self.store.insert_one(self.collection, document).await?;
		Ok(())
	}

	pub async fn find_one(&self, filter: Document) -> Result<Option<T>, Error> {
		let document = self.store.find_one(self.collection, filter).await?;

		Ok(document.map(bson::from_document).transpose()?)
	}

	pub async fn find_all(
		&self,
		filter: Document,
		paginator: Paginator,
		newest_first: bool,
	) -> Result<Vec<T>, Error> {
		let options = FindOptions {
			newest_first,
			skip: paginator.offset(),
			limit: Some(paginator.limit()),
		};

		self.store
			.find_many(self.collection, filter, options)
			.await?
			.into_iter()
			.map(|document| bson::from_document(document).map_err(Error::from))
			.collect()
	}

	/// Applies `$set` with the given fields and a fresh `updatedAt`, unless
	/// the caller already set one. An empty set writes nothing.
	pub async fn set(&self, filter: Document, mut set: Document) -> Result<u64, Error> {
		if set.is_empty() {
			return Ok(0);
		}

		if !set.contains_key("updatedAt") {
			set.insert("updatedAt", DateTime::now());
		}

		Ok(self
			.store
			.update_one(self.collection, filter, doc! { "$set": set })
			.await?)
	}

	pub async fn increment(
		&self,
		filter: Document,
		field: CounterField,
		delta: i64,
	) -> Result<u64, Error> {
		let mut inc = Document::new();

		inc.insert(field.as_str(), delta);

		let matched = self
			.store
			.update_one(self.collection, filter, doc! { "$inc": inc })
			.await?;

		if matched == 0 {
			tracing::warn!(
				monotonic_counter.unmatched_counter_updates = 1_u64,
				collection = self.collection.name(),
				%field,
				delta,
				"counter update matched no document"
			);
		} else {
			tracing::debug!(collection = self.collection.name(), %field, delta, "counter updated");
		}

		Ok(matched)
	}

	/// Moves the first active match to [`Lifecycle::Deleted`]. Returns whether
	/// a document changed state.
	pub async fn soft_delete(&self, mut filter: Document) -> Result<bool, Error> {
		let now = DateTime::now();

		filter.insert(Lifecycle::FIELD, Lifecycle::active());

		let matched = self
			.store
			.update_one(
				self.collection,
				filter,
				doc! { "$set": { "deletedAt": now, "updatedAt": now } },
			)
			.await?;

		Ok(matched == 1)
	}

	pub async fn remove(&self, filter: Document) -> Result<u64, Error> {
		Ok(self.store.delete_one(self.collection, filter).await?)
	}
}

/// All repositories, sharing one store.
#[derive(Clone)]
pub struct Repositories {
	pub users: UserRepository,
	pub posts: PostRepository,
	pub comments: CommentRepository,
	pub interactions: InteractionRepository,
}

impl Repositories {
	pub fn new(store: Arc<dyn Store>) -> Self {
		let users = UserRepository::new(Arc::clone(&store));
		let posts = PostRepository::new(Arc::clone(&store));
		let comments = CommentRepository::new(Arc::clone(&store), posts.clone());
		let interactions = InteractionRepository::new(store, posts.clone(), comments.clone());

		Self {
			users,
			posts,
			comments,
			interactions,
		}
	}
}

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use async_trait::async_trait;
use bson::Document;

/// An error raised by a [`Store`] backend.
///
/// Unique index violations are reported separately from every other
/// failure so that callers can map them to a conflict.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("duplicate key in {collection}: {message}")]
	DuplicateKey {
		collection: &'static str,
		message: String,
	},
	#[error("unsupported update operator {0}")]
	UnsupportedOperator(String),
	#[error("cannot increment non-numeric field {0}")]
	NotNumeric(String),
	#[error("mongodb error: {0}")]
	Mongo(#[from] mongodb::error::Error),
}

/// The four collections the backend stores documents in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
	Users,
	Posts,
	Comments,
	Interactions,
}

/// A single index definition.
///
/// Keys prefixed with `-` are descending.
#[derive(Debug, Clone, Copy)]
pub struct Index {
	pub keys: &'static [&'static str],
	pub unique: bool,
}

const fn index(keys: &'static [&'static str]) -> Index {
	Index {
		keys,
		unique: false,
	}
}

const fn unique(keys: &'static [&'static str]) -> Index {
	Index { keys, unique: true }
}

impl Collection {
	pub const ALL: [Self; 4] = [Self::Users, Self::Posts, Self::Comments, Self::Interactions];

	pub fn name(self) -> &'static str {
		match self {
			Self::Users => "users",
			Self::Posts => "posts",
			Self::Comments => "comments",
			Self::Interactions => "interactions",
		}
	}

	pub fn indexes(self) -> &'static [Index] {
		match self {
			Self::Users => &[unique(&["name"]), unique(&["email"])],
			Self::Posts => &[
				index(&["author"]),
				index(&["deletedAt", "hidden"]),
				index(&["-createdAt"]),
			],
			Self::Comments => &[
				index(&["user"]),
				index(&["post"]),
				index(&["post", "parentComment"]),
				index(&["post", "deletedAt"]),
				index(&["post", "parentComment", "-createdAt"]),
			],
			// A user holds at most one interaction of each type per target.
			Self::Interactions => &[
				unique(&["user", "target", "targetType", "type"]),
				index(&["user", "target", "targetType"]),
				index(&["target", "targetType", "type"]),
				index(&["user", "type", "-createdAt"]),
			],
		}
	}
}

/// Sorting and pagination for [`Store::find_many`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FindOptions {
	/// Order by `createdAt` descending. Otherwise the order is unspecified.
	pub newest_first: bool,
	pub skip: u64,
	pub limit: Option<u64>,
}

/// A document store offering only single-document atomic writes.
///
/// Filters are equality documents. Updates are `$set` and `$inc`
/// documents applied atomically to the first matching document.
#[async_trait]
pub trait Store: Send + Sync + 'static {
	async fn insert_one(&self, collection: Collection, document: Document) -> Result<(), Error>;

	async fn find_one(
		&self,
		collection: Collection,
		filter: Document,
	) -> Result<Option<Document>, Error>;

	async fn find_many(
		&self,
		collection: Collection,
		filter: Document,
		options: FindOptions,
	) -> Result<Vec<Document>, Error>;

	/// Returns the number of documents matched (0 or 1).
	async fn update_one(
		&self,
		collection: Collection,
		filter: Document,
		update: Document,
	) -> Result<u64, Error>;

	/// Returns the number of documents removed (0 or 1).
	async fn delete_one(&self, collection: Collection, filter: Document) -> Result<u64, Error>;

	async fn ensure_indexes(&self) -> Result<(), Error>;
}

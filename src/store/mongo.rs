use async_trait::async_trait;
use bson::Document;
use futures::TryStreamExt;
use mongodb::{
	error::{ErrorKind, WriteFailure},
	options::{FindOptions as MongoFindOptions, IndexOptions},
	Client, Database, IndexModel,
};

use super::{Collection, Error, FindOptions, Index, Store};

/// Server error code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

/// A [`Store`] backed by a MongoDB database.
#[derive(Clone)]
pub struct MongoStore {
	database: Database,
}

impl MongoStore {
	pub async fn connect(uri: &str, database: &str) -> Result<Self, Error> {
		let client = Client::with_uri_str(uri).await?;

		Ok(Self {
			database: client.database(database),
		})
	}

	fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
		self.database.collection(collection.name())
	}
}

fn write_error(collection: Collection, error: mongodb::error::Error) -> Error {
	if let ErrorKind::Write(WriteFailure::WriteError(write)) = error.kind.as_ref() {
		if write.code == DUPLICATE_KEY {
			return Error::DuplicateKey {
				collection: collection.name(),
				message: write.message.clone(),
			};
		}
	}

	Error::Mongo(error)
}

fn index_model(index: &Index) -> IndexModel {
	let mut keys = Document::new();

	for key in index.keys {
		match key.strip_prefix('-') {
			Some(key) => keys.insert(key, -1),
			None => keys.insert(*key, 1),
		};
	}

	IndexModel::builder()
		.keys(keys)
		.options(IndexOptions::builder().unique(index.unique).build())
		.build()
}

#[async_trait]
impl Store for MongoStore {
	async fn insert_one(&self, collection: Collection, document: Document) -> Result<(), Error> {
		self.collection(collection)
			.insert_one(document, None)
			.await
			.map_err(|e| write_error(collection, e))?;

		Ok(())
	}

	async fn find_one(
		&self,
		collection: Collection,
		filter: Document,
	) -> Result<Option<Document>, Error> {
		Ok(self.collection(collection).find_one(filter, None).await?)
	}

	async fn find_many(
		&self,
		collection: Collection,
		filter: Document,
		options: FindOptions,
	) -> Result<Vec<Document>, Error> {
		let mut find = MongoFindOptions::default();

		find.skip = Some(options.skip);
		find.limit = options
			.limit
			.map(|limit| i64::try_from(limit).unwrap_or(i64::MAX));

		if options.newest_first {
			find.sort = Some(bson::doc! { "createdAt": -1 });
		}

		let cursor = self.collection(collection).find(filter, find).await?;

		Ok(cursor.try_collect().await?)
	}

	async fn update_one(
		&self,
		collection: Collection,
		filter: Document,
		update: Document,
	) -> Result<u64, Error> {
		let result = self
			.collection(collection)
			.update_one(filter, update, None)
			.await
			.map_err(|e| write_error(collection, e))?;

		Ok(result.matched_count)
	}

	async fn delete_one(&self, collection: Collection, filter: Document) -> Result<u64, Error> {
		let result = self.collection(collection).delete_one(filter, None).await?;

		Ok(result.deleted_count)
	}

	async fn ensure_indexes(&self) -> Result<(), Error> {
		for collection in Collection::ALL {
			let models = collection.indexes().iter().map(index_model);

			self.collection(collection)
				.create_indexes(models, None)
				.await?;

			tracing::info!(collection = collection.name(), "created indexes");
		}

		Ok(())
	}
}

use std::{cmp::Reverse, collections::HashMap};

use async_trait::async_trait;
use bson::{Bson, Document};
use tokio::sync::Mutex;

use super::{Collection, Error, FindOptions, Store};

/// A process-local [`Store`].
///
/// Every operation holds the lock for its whole duration, so each call is
/// atomic with respect to every other call, just like a single-document
/// write on a real server. Nothing spans two calls.
#[derive(Debug, Default)]
pub struct MemoryStore {
	collections: Mutex<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

/// Equality match on every filter key. `null` also matches a missing field.
fn matches(document: &Document, filter: &Document) -> bool {
	filter
		.iter()
		.all(|(key, expected)| match (document.get(key), expected) {
			(None | Some(Bson::Null), Bson::Null) => true,
			(Some(actual), expected) => actual == expected,
			(None, _) => false,
		})
}

fn key_of(document: &Document, keys: &[&str]) -> Vec<Bson> {
	keys.iter()
		.map(|key| {
			document
				.get(key.trim_start_matches('-'))
				.cloned()
				.unwrap_or(Bson::Null)
		})
		.collect()
}

/// Checks `candidate` against `_id` and every unique index of `collection`,
/// ignoring the document at position `replacing`.
fn check_unique(
	collection: Collection,
	documents: &[Document],
	candidate: &Document,
	replacing: Option<usize>,
) -> Result<(), Error> {
	let unique = collection
		.indexes()
		.iter()
		.filter(|index| index.unique)
		.map(|index| index.keys)
		.chain([&["_id"][..]]);

	for keys in unique {
		let key = key_of(candidate, keys);
		let taken = documents
			.iter()
			.enumerate()
			.any(|(position, other)| Some(position) != replacing && key_of(other, keys) == key);

		if taken {
			return Err(Error::DuplicateKey {
				collection: collection.name(),
				message: format!("index {} already holds {key:?}", keys.join("_")),
			});
		}
	}

	Ok(())
}

fn as_integer(value: &Bson) -> Option<i64> {
	match value {
		Bson::Int32(value) => Some(i64::from(*value)),
		Bson::Int64(value) => Some(*value),
		_ => None,
	}
}

fn apply(document: &mut Document, update: &Document) -> Result<(), Error> {
	for (operator, fields) in update {
		let Bson::Document(fields) = fields else {
			return Err(Error::UnsupportedOperator(operator.clone()));
		};

		match operator.as_str() {
			"$set" => {
				for (key, value) in fields {
					document.insert(key.clone(), value.clone());
				}
			}
			"$inc" => {
				for (key, delta) in fields {
					let current = match document.get(key) {
						None => Some(0),
						Some(value) => as_integer(value),
					};

					let next = current
						.zip(as_integer(delta))
						.map(|(current, delta)| current + delta)
						.ok_or_else(|| Error::NotNumeric(key.clone()))?;

					document.insert(key.clone(), next);
				}
			}
			other => return Err(Error::UnsupportedOperator(other.to_owned())),
		}
	}

	Ok(())
}

fn created_at(document: &Document) -> i64 {
	document
		.get_datetime("createdAt")
		.map_or(i64::MIN, |at| at.timestamp_millis())
}

#[async_trait]
impl Store for MemoryStore {
	async fn insert_one(&self, collection: Collection, document: Document) -> Result<(), Error> {
		let mut collections = self.collections.lock().await;
		let documents = collections.entry(collection).or_default();

		check_unique(collection, documents, &document, None)?;
		documents.push(document);

		Ok(())
	}

	async fn find_one(
		&self,
		collection: Collection,
		filter: Document,
	) -> Result<Option<Document>, Error> {
		let collections = self.collections.lock().await;

		Ok(collections
			.get(&collection)
			.and_then(|documents| documents.iter().find(|d| matches(d, &filter)))
			.cloned())
	}

	async fn find_many(
		&self,
		collection: Collection,
		filter: Document,
		options: FindOptions,
	) -> Result<Vec<Document>, Error> {
		let collections = self.collections.lock().await;
		let Some(documents) = collections.get(&collection) else {
			return Ok(Vec::new());
		};

		// Later inserts first, so equal timestamps still read newest first.
		let mut found = documents
			.iter()
			.rev()
			.filter(|d| matches(d, &filter))
			.collect::<Vec<_>>();

		if options.newest_first {
			found.sort_by_key(|d| Reverse(created_at(d)));
		}

		let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
		let limit = options
			.limit
			.map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));

		Ok(found.into_iter().skip(skip).take(limit).cloned().collect())
	}

	async fn update_one(
		&self,
		collection: Collection,
		filter: Document,
		update: Document,
	) -> Result<u64, Error> {
		let mut collections = self.collections.lock().await;
		let documents = collections.entry(collection).or_default();

		let Some(position) = documents.iter().position(|d| matches(d, &filter)) else {
			return Ok(0);
		};

		let mut updated = documents[position].clone();

		apply(&mut updated, &update)?;
		check_unique(collection, documents, &updated, Some(position))?;
		documents[position] = updated;

		Ok(1)
	}

	async fn delete_one(&self, collection: Collection, filter: Document) -> Result<u64, Error> {
		let mut collections = self.collections.lock().await;
		let documents = collections.entry(collection).or_default();

		match documents.iter().position(|d| matches(d, &filter)) {
			Some(position) => {
				documents.remove(position);
				Ok(1)
			}
			None => Ok(0),
		}
	}

	async fn ensure_indexes(&self) -> Result<(), Error> {
		Ok(())
	}
}

use std::sync::Arc;

use bson::{DateTime, Document};

use crate::{
	model::{NewUser, User, UserUpdate},
	pagination::Paginator,
	store::{Collection, Store},
};

use super::{Error, Records};

#[derive(Clone)]
pub struct UserRepository {
	records: Records<User>,
}

impl UserRepository {
	pub fn new(store: Arc<dyn Store>) -> Self {
		Self {
			records: Records::new(store, Collection::Users),
		}
	}

	/// Fails with [`Error::DuplicateKey`] if the name or email is taken.
	pub async fn create(&self, user: NewUser) -> Result<User, Error> {
		let user = user.into_user(DateTime::now());

		self.records.insert(&user).await?;
		tracing::info!(user = %user.id, "created user");

		Ok(user)
	}

	pub async fn find_one(&self, filter: Document) -> Result<Option<User>, Error> {
		self.records.find_one(filter).await
	}

	/// Users are listed in storage order.
	pub async fn find_all(&self, filter: Document, paginator: Paginator) -> Result<Vec<User>, Error> {
		self.records.find_all(filter, paginator, false).await
	}

	pub async fn update(&self, filter: Document, update: UserUpdate) -> Result<(), Error> {
		self.records.set(filter, update.into_set()).await?;
		Ok(())
	}
}

use chrono::{DateTime, Utc};
use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub use crate::model::Role;
pub use crate::route::model::{IdInput, Paginate};

use crate::model;

/// A single user.
#[model]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct User {
	/// The unique identifier of the user.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The unique display name of the user.
	#[validate(length(min = 1, max = 64))]
	pub name: String,
	/// The user's unique email address.
	#[validate(email)]
	pub email: String,
	/// The plain password, only ever received.
	#[serde(skip_serializing)]
	#[validate(length(min = 8, max = 128))]
	#[allow(dead_code)]
	pub password: String,
	/// Defaults to `reader`.
	#[serde(default)]
	pub role: Role,
	#[serde(skip_deserializing)]
	pub is_active: bool,
	#[serde(skip_deserializing)]
	pub is_email_verified: bool,
	/// The creation time of the user.
	#[serde(skip_deserializing, rename = "dateCreated")]
	pub created_at: DateTime<Utc>,
	#[serde(skip_deserializing, rename = "dateUpdated")]
	pub updated_at: DateTime<Utc>,
}

impl From<model::User> for User {
	fn from(user: model::User) -> Self {
		Self {
			id: user.id,
			name: user.name,
			email: user.email,
			password: String::new(),
			role: user.role,
			is_active: user.is_active,
			is_email_verified: user.is_email_verified,
			created_at: user.created_at.to_chrono(),
			updated_at: user.updated_at.to_chrono(),
		}
	}
}

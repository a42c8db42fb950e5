use bson::{doc, DateTime, Document};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	Author,
	#[default]
	Reader,
}

impl Role {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Author => "author",
			Self::Reader => "reader",
		}
	}
}

/// A registered user. Names and emails are unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	#[serde(rename = "_id")]
	pub id: Uuid,
	pub name: String,
	pub email: String,
	/// Argon2 PHC string.
	pub password_hash: String,
	#[serde(default)]
	pub role: Role,
	pub is_active: bool,
	pub is_email_verified: bool,
	pub created_at: DateTime,
	pub updated_at: DateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
	/// Pre-generated so the password can be salted with it.
	pub id: Option<Uuid>,
	pub name: String,
	pub email: String,
	pub password_hash: String,
	pub role: Option<Role>,
}

impl NewUser {
	pub(crate) fn into_user(self, now: DateTime) -> User {
		User {
			id: self.id.unwrap_or_else(Uuid::new_v4),
			name: self.name,
			email: self.email,
			password_hash: self.password_hash,
			role: self.role.unwrap_or_default(),
			is_active: true,
			is_email_verified: false,
			created_at: now,
			updated_at: now,
		}
	}
}

#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
	pub name: Option<String>,
	pub email: Option<String>,
	pub role: Option<Role>,
	pub is_active: Option<bool>,
	pub password_hash: Option<String>,
}

impl UserUpdate {
	pub fn into_set(self) -> Document {
		let mut set = doc! {};

		if let Some(name) = self.name {
			set.insert("name", name);
		}

		if let Some(email) = self.email {
			set.insert("email", email);
		}

		if let Some(role) = self.role {
			set.insert("role", role.as_str());
		}

		if let Some(is_active) = self.is_active {
			set.insert("isActive", is_active);
		}

		if let Some(password_hash) = self.password_hash {
			set.insert("passwordHash", password_hash);
		}

		set
	}
}

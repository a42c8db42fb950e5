use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{error, repository, AppState};

pub mod model;
pub mod route;

/// An error that can occur while managing users.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown user {0}")]
	UnknownUser(Uuid),
	#[error("name or email already taken")]
	NameOrEmailTaken,
	#[error("password hashing failed")]
	Hash(argon2::password_hash::Error),
}

pub type RouteError = error::RouteError<Error>;

/// Maps unique index violations on `name` or `email` to [`Error::NameOrEmailTaken`].
fn taken(error: repository::Error) -> RouteError {
	match error {
		repository::Error::DuplicateKey { .. } => Error::NameOrEmailTaken.into(),
		error => error.into(),
	}
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_users, get_users_docs).post_with(register, register_docs),
		)
		.api_route(
			"/me",
			get_with(get_me, get_me_docs)
				.patch_with(update_me, update_me_docs)
				.delete_with(delete_me, delete_me_docs),
		)
		.api_route("/:id", get_with(get_user, get_user_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownUser(..) => StatusCode::NOT_FOUND,
			Self::NameOrEmailTaken => StatusCode::CONFLICT,
			Self::Hash(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownUser(user) => vec![error::Message::new("unknown_user").detail("user", user)],
			Self::NameOrEmailTaken => vec![error::Message::new("name_or_email_taken")],
			Self::Hash(..) => Vec::new(),
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_register_flow() {
		let (server, repositories) = app();
		let id = register(&server, "ada").await;

		let stored = repositories
			.users
			.find_one(by_id(id))
			.await
			.unwrap()
			.unwrap();

		assert!(stored.is_active);
		assert_eq!(stored.role, Role::Reader);
		assert!(stored.password_hash.starts_with("$argon2"));

		let (name, value) = actor(id);
		let response = server.get("/users/me").add_header(name, value).await;
		let body = response.json::<Value>();

		assert_eq!(body["success"], true);
		assert_eq!(body["data"]["email"], "ada@example.com");
		assert!(body["data"].get("passwordHash").is_none());
		assert!(body["data"].get("password").is_none());
	}

	#[tokio::test]
	async fn test_register_duplicate() {
		let (server, _) = app();

		register(&server, "ada").await;

		let response = server
			.post("/users")
			.json(&json!({
				"name": "ada",
				"email": "other@example.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 409);

		let body = response.json::<Value>();

		assert_eq!(body["success"], false);
		assert_eq!(body["errors"][0]["content"], "name_or_email_taken");
	}

	#[tokio::test]
	async fn test_register_validation() {
		let (server, _) = app();

		let response = server
			.post("/users")
			.json(&json!({
				"name": "ada",
				"email": "not an email",
				"password": "short",
			}))
			.await;

		assert_eq!(response.status_code(), 400);

		let body = response.json::<Value>();
		let mut fields = body["errors"]
			.as_array()
			.unwrap()
			.iter()
			.map(|error| error["field"].as_str().unwrap().to_owned())
			.collect::<Vec<_>>();

		fields.sort();

		assert_eq!(fields, ["email", "password"]);
	}

	#[tokio::test]
	async fn test_update_me() {
		let (server, _) = app();
		let id = register(&server, "ada").await;

		let (name, value) = actor(id);
		let response = server
			.patch("/users/me")
			.add_header(name, value)
			.json(&json!({ "role": "author" }))
			.await;

		assert_eq!(response.status_code(), 200);

		let body = response.json::<Value>();

		assert_eq!(body["data"]["role"], "author");
		assert_eq!(body["data"]["name"], "ada");
	}

	#[tokio::test]
	async fn test_update_password() {
		let (server, repositories) = app();
		let id = register(&server, "ada").await;
		let before = repositories
			.users
			.find_one(by_id(id))
			.await
			.unwrap()
			.unwrap();

		let (name, value) = actor(id);
		let response = server
			.patch("/users/me")
			.add_header(name.clone(), value.clone())
			.json(&json!({ "password": "short" }))
			.await;

		assert_eq!(response.status_code(), 400);

		let response = server
			.patch("/users/me")
			.add_header(name, value)
			.json(&json!({ "password": "correct horse battery" }))
			.await;

		assert_eq!(response.status_code(), 200);

		let after = repositories
			.users
			.find_one(by_id(id))
			.await
			.unwrap()
			.unwrap();

		assert!(after.password_hash.starts_with("$argon2"));
		assert_ne!(after.password_hash, before.password_hash);
		assert_eq!(after.name, before.name);
	}

	#[tokio::test]
	async fn test_delete_me_deactivates() {
		let (server, repositories) = app();
		let id = register(&server, "ada").await;

		register(&server, "grace").await;

		let (name, value) = actor(id);
		let response = server
			.delete("/users/me")
			.add_header(name.clone(), value.clone())
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["success"], true);

		let stored = repositories
			.users
			.find_one(by_id(id))
			.await
			.unwrap()
			.unwrap();

		assert!(!stored.is_active);

		let response = server.get("/users/me").add_header(name.clone(), value.clone()).await;

		assert_eq!(response.status_code(), 401);

		let response = server.delete("/users/me").add_header(name, value).await;

		assert_eq!(response.status_code(), 401);
		assert_eq!(server.get(&format!("/users/{id}")).await.status_code(), 404);

		let names = server.get("/users").await.json::<Value>()["data"]
			.as_array()
			.unwrap()
			.iter()
			.map(|user| user["name"].as_str().unwrap().to_owned())
			.collect::<Vec<_>>();

		assert_eq!(names, ["grace"]);
	}

	#[tokio::test]
	async fn test_update_me_taken() {
		let (server, _) = app();
		let id = register(&server, "ada").await;

		register(&server, "grace").await;

		let (name, value) = actor(id);
		let response = server
			.patch("/users/me")
			.add_header(name, value)
			.json(&json!({ "email": "grace@example.com" }))
			.await;

		assert_eq!(response.status_code(), 409);
	}

	#[tokio::test]
	async fn test_get_user() {
		let (server, _) = app();
		let id = register(&server, "ada").await;

		let response = server.get(&format!("/users/{id}")).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["data"]["id"], id.to_string());

		let response = server.get(&format!("/users/{}", Uuid::new_v4())).await;

		assert_eq!(response.status_code(), 404);
	}

	#[tokio::test]
	async fn test_get_users() {
		let (server, _) = app();

		for name in ["ada", "grace", "edsger"] {
			register(&server, name).await;
		}

		let response = server.get("/users").add_query_param("size", 2).await;

		assert_eq!(response.json::<Value>()["data"].as_array().unwrap().len(), 2);
	}
}

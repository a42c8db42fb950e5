use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::{request, StatusCode},
};
use bson::doc;
use uuid::Uuid;

use crate::{
	error::{self, RouteError},
	model::{self, User},
	openapi::SECURITY_SCHEME_ACTOR,
	repository::Repositories,
};

/// The header naming the acting user. Authentication happens upstream.
pub const ACTOR_HEADER: &str = "x-user-id";

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("missing {ACTOR_HEADER} header")]
	MissingActor,
	#[error("malformed {ACTOR_HEADER} header")]
	MalformedActor,
	#[error("unknown or inactive user")]
	UnknownActor,
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		StatusCode::UNAUTHORIZED
	}
}

/// The active user a request acts on behalf of.
///
/// If the header is missing, a [`Error::MissingActor`] is returned.
/// If it does not name an active user, a [`Error::UnknownActor`] is returned.
///
/// ```rust
/// async fn route(actor: Actor) {
///   println!("{:?}", actor.user);
/// }
/// ```
#[derive(Debug)]
pub struct Actor {
	pub user: User,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Actor
where
	Repositories: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = RouteError<Error>;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let header = parts
			.headers
			.get(ACTOR_HEADER)
			.ok_or(Error::MissingActor)?;

		let id = header
			.to_str()
			.ok()
			.and_then(|value| Uuid::parse_str(value.trim()).ok())
			.ok_or(Error::MalformedActor)?;

		let repositories = Repositories::from_ref(state);
		let user = repositories
			.users
			.find_one(doc! { "_id": model::id(id), "isActive": true })
			.await?
			.ok_or(Error::UnknownActor)?;

		Ok(Self { user })
	}
}

impl OperationInput for Actor {
	/// Adds the actor header requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.push(
			[(SECURITY_SCHEME_ACTOR.to_string(), Vec::new())]
				.into_iter()
				.collect(),
		);
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_missing_actor() {
		let (server, _) = app();

		let response = server.get("/users/me").await;

		assert_eq!(response.status_code(), 401);
		assert_eq!(response.json::<Value>()["success"], false);
	}

	#[tokio::test]
	async fn test_malformed_actor() {
		let (server, _) = app();

		let response = server
			.get("/users/me")
			.add_header(
				axum::http::HeaderName::from_static(crate::extract::ACTOR_HEADER),
				axum::http::HeaderValue::from_static("not-a-uuid"),
			)
			.await;

		assert_eq!(response.status_code(), 401);
	}

	#[tokio::test]
	async fn test_inactive_actor() {
		let (server, repositories) = app();
		let id = register(&server, "ada").await;

		repositories
			.users
			.update(
				by_id(id),
				UserUpdate {
					is_active: Some(false),
					..Default::default()
				},
			)
			.await
			.unwrap();

		let (name, value) = actor(id);
		let response = server.get("/users/me").add_header(name, value).await;

		assert_eq!(response.status_code(), 401);
	}

	#[tokio::test]
	async fn test_known_actor() {
		let (server, _) = app();
		let id = register(&server, "ada").await;

		let (name, value) = actor(id);
		let response = server.get("/users/me").add_header(name, value).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["data"]["name"], "ada");
	}
}

use argon2::{
	password_hash::{PasswordHasher, SaltString},
	Argon2,
};
use axum::extract::State;
use bson::doc;
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Actor, Json, Path, Query},
	model::{self as stored, NewUser, UserUpdate},
	openapi::tag,
	repository::{by_id, Repositories},
	response::Envelope,
	AppState,
};

use super::{model, taken, Error, RouteError};

/// Hashes a password with Argon2 into a PHC string, salted with the user's id.
fn hash_password(
	hasher: &Argon2,
	password: &str,
	id: &Uuid,
) -> Result<String, argon2::password_hash::Error> {
	let salt = SaltString::encode_b64(id.as_bytes())?;

	Ok(hasher.hash_password(password.as_bytes(), &salt)?.to_string())
}

/// Reloads a user after a write, which must still exist.
async fn reload(repositories: &Repositories, id: Uuid) -> Result<model::User, RouteError> {
	let user = repositories
		.users
		.find_one(by_id(id))
		.await?
		.ok_or(Error::UnknownUser(id))?;

	Ok(user.into())
}

/// Register account
/// Registers a new, active user. Names and emails must be unique.
#[route(tag = tag::USER, response(status = 200, description = "Registered successfully.", shape = "Json<Envelope<model::User>>"))]
pub async fn register(
	State(state): State<AppState>,
	Json(input): Json<model::CreateUserInput>,
) -> Result<Json<Envelope<model::User>>, RouteError> {
	let id = Uuid::new_v4();
	let password_hash = hash_password(&state.hasher, &input.password, &id).map_err(Error::Hash)?;

	let user = state
		.repositories
		.users
		.create(NewUser {
			id: Some(id),
			name: input.name,
			email: input.email,
			password_hash,
			role: Some(input.role),
		})
		.await
		.map_err(taken)?;

	tracing::info!(user = %user.id, "registered user");

	Ok(Json(Envelope::ok(user.into(), "User registered")))
}

/// Get users
/// Returns a paginated list of active users.
#[route(tag = tag::USER)]
pub async fn get_users(
	State(repositories): State<Repositories>,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<Envelope<Vec<model::User>>>, RouteError> {
	let users = repositories
		.users
		.find_all(doc! { "isActive": true }, paginate.into())
		.await?;

	Ok(Json(Envelope::ok(
		users.into_iter().map(model::User::from).collect(),
		"Users fetched",
	)))
}

/// Get user
/// Returns a single active user by their unique id.
#[route(tag = tag::USER)]
pub async fn get_user(
	State(repositories): State<Repositories>,
	Path(model::IdInput { id }): Path<model::IdInput>,
) -> Result<Json<Envelope<model::User>>, RouteError> {
	let user = repositories
		.users
		.find_one(doc! { "_id": stored::id(id), "isActive": true })
		.await?
		.ok_or(Error::UnknownUser(id))?;

	Ok(Json(Envelope::ok(user.into(), "User fetched")))
}

/// Get own user
/// Returns the acting user.
#[route(tag = tag::USER)]
pub async fn get_me(actor: Actor) -> Json<Envelope<model::User>> {
	Json(Envelope::ok(actor.user.into(), "User fetched"))
}

/// Update own user
/// Updates the acting user's name, email, role or password.
#[route(tag = tag::USER)]
pub async fn update_me(
	State(state): State<AppState>,
	actor: Actor,
	Json(input): Json<model::UpdateUserInput>,
) -> Result<Json<Envelope<model::User>>, RouteError> {
	let id = actor.user.id;

	if !input.is_empty() {
		let password_hash = input
			.password
			.map(|password| hash_password(&state.hasher, &password, &id))
			.transpose()
			.map_err(Error::Hash)?;

		let update = UserUpdate {
			name: input.name,
			email: input.email,
			role: input.role,
			password_hash,
			..Default::default()
		};

		state
			.repositories
			.users
			.update(by_id(id), update)
			.await
			.map_err(taken)?;
	}

	let user = reload(&state.repositories, id).await?;

	Ok(Json(Envelope::ok(user, "User updated")))
}

/// Deactivate own user
/// Deactivates the acting user. The account is kept, but can no longer act
/// and is left out of user listings.
#[route(tag = tag::USER)]
pub async fn delete_me(
	State(repositories): State<Repositories>,
	actor: Actor,
) -> Result<Json<Envelope<()>>, RouteError> {
	let update = UserUpdate {
		is_active: Some(false),
		..Default::default()
	};

	repositories
		.users
		.update(by_id(actor.user.id), update)
		.await?;

	tracing::info!(user = %actor.user.id, "deactivated user");

	Ok(Json(Envelope::ok((), "User deactivated")))
}

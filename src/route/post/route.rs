use axum::extract::State;
use bson::{doc, Document};
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Actor, Json, Path, Query},
	model::{self as stored, Lifecycle, NewPost},
	openapi::tag,
	repository::Repositories,
	response::Envelope,
};

use super::{model, Error, RouteError};

/// Matches a live post by id, optionally owned by `author`.
fn live(id: Uuid, author: Option<Uuid>) -> Document {
	let mut filter = doc! { "_id": stored::id(id) };

	filter.insert(Lifecycle::FIELD, Lifecycle::active());

	if let Some(author) = author {
		filter.insert("author", stored::id(author));
	}

	filter
}

fn envelope(posts: Vec<stored::Post>) -> Envelope<Vec<model::Post>> {
	Envelope::ok(posts.into_iter().map(model::Post::from).collect(), "Posts fetched")
}

/// Get own posts
/// Returns a paginated response of your live posts, hidden ones included, newest first.
#[route(tag = tag::POST)]
pub async fn get_user_posts(
	State(repositories): State<Repositories>,
	actor: Actor,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<Envelope<Vec<model::Post>>>, RouteError> {
	let mut filter = doc! { "author": stored::id(actor.user.id) };

	filter.insert(Lifecycle::FIELD, Lifecycle::active());

	let posts = repositories.posts.find_all(filter, paginate.into()).await?;

	Ok(Json(envelope(posts)))
}

/// Get all posts
/// Returns a paginated response of all live, visible posts, newest first.
#[route(tag = tag::POST)]
pub async fn get_posts(
	State(repositories): State<Repositories>,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<Envelope<Vec<model::Post>>>, RouteError> {
	let mut filter = doc! { "hidden": false };

	filter.insert(Lifecycle::FIELD, Lifecycle::active());

	let posts = repositories.posts.find_all(filter, paginate.into()).await?;

	Ok(Json(envelope(posts)))
}

/// Get single post
/// Returns a single live post by its unique id.
#[route(tag = tag::POST, error(status = 404, description = "The post does not exist or was deleted."))]
pub async fn get_post(
	State(repositories): State<Repositories>,
	Path(model::IdInput { id }): Path<model::IdInput>,
) -> Result<Json<Envelope<model::Post>>, RouteError> {
	let post = repositories
		.posts
		.find_one(live(id, None))
		.await?
		.ok_or(Error::UnknownPost(id))?;

	Ok(Json(Envelope::ok(post.into(), "Post fetched")))
}

/// Create post
/// Creates a new post written by the acting user.
#[route(tag = tag::POST)]
pub async fn create_post(
	State(repositories): State<Repositories>,
	actor: Actor,
	Json(input): Json<model::CreatePostInput>,
) -> Result<Json<Envelope<model::Post>>, RouteError> {
	let post = repositories
		.posts
		.create(NewPost {
			author: actor.user.id,
			title: input.title,
			body: input.body,
			hidden: input.hidden,
		})
		.await?;

	Ok(Json(Envelope::ok(post.into(), "Post created")))
}

/// Update post
/// Updates one of your live posts by its unique id.
#[route(tag = tag::POST, error(status = 404, description = "The post does not exist or is not yours."))]
pub async fn update_post(
	State(repositories): State<Repositories>,
	actor: Actor,
	Path(model::IdInput { id }): Path<model::IdInput>,
	Json(input): Json<model::UpdatePostInput>,
) -> Result<Json<Envelope<model::Post>>, RouteError> {
	let filter = live(id, Some(actor.user.id));

	if !input.is_empty() {
		repositories.posts.update(filter.clone(), input.into()).await?;
	}

	let post = repositories
		.posts
		.find_one(filter)
		.await?
		.ok_or(Error::UnknownPost(id))?;

	Ok(Json(Envelope::ok(post.into(), "Post updated")))
}

/// Delete post
/// Soft-deletes one of your posts by its unique id.
#[route(tag = tag::POST, error(status = 404, description = "The post does not exist, is not yours or was already deleted."))]
pub async fn delete_post(
	State(repositories): State<Repositories>,
	actor: Actor,
	Path(model::IdInput { id }): Path<model::IdInput>,
) -> Result<Json<Envelope<()>>, RouteError> {
	let mut filter = doc! { "_id": stored::id(id) };

	filter.insert("author", stored::id(actor.user.id));

	if !repositories.posts.delete(filter).await? {
		return Err(Error::UnknownPost(id).into());
	}

	tracing::info!(post = %id, "deleted post");

	Ok(Json(Envelope::ok((), "Post deleted")))
}

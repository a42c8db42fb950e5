use axum::extract::State;
use bson::{doc, Document};
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Actor, Json, Path, Query},
	model::{self as stored, Lifecycle, NewComment},
	openapi::tag,
	repository::Repositories,
	response::Envelope,
};

use super::{model, Error, RouteError};

/// Matches live comments of `post`.
fn live(post: Uuid) -> Document {
	let mut filter = doc! { "post": stored::id(post) };

	filter.insert(Lifecycle::FIELD, Lifecycle::active());
	filter
}

async fn ensure_post(repositories: &Repositories, post: Uuid) -> Result<(), RouteError> {
	let mut filter = doc! { "_id": stored::id(post) };

	filter.insert(Lifecycle::FIELD, Lifecycle::active());

	repositories
		.posts
		.find_one(filter)
		.await?
		.ok_or(Error::UnknownPost(post))?;

	Ok(())
}

fn envelope(comments: Vec<stored::Comment>) -> Envelope<Vec<model::Comment>> {
	Envelope::ok(
		comments.into_iter().map(model::Comment::from).collect(),
		"Comments fetched",
	)
}

/// Get comments
/// Returns a paginated response of the live comments on a post, newest first.
#[route(tag = tag::COMMENT)]
pub async fn get_comments(
	State(repositories): State<Repositories>,
	Path(model::IdInput { id }): Path<model::IdInput>,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<Envelope<Vec<model::Comment>>>, RouteError> {
	let comments = repositories
		.comments
		.find_all(live(id), paginate.into())
		.await?;

	Ok(Json(envelope(comments)))
}

/// Get replies
/// Returns a paginated response of the live replies to a comment, newest first.
#[route(tag = tag::COMMENT)]
pub async fn get_replies(
	State(repositories): State<Repositories>,
	Path(path): Path<model::CommentPath>,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<Envelope<Vec<model::Comment>>>, RouteError> {
	let mut filter = live(path.id);

	filter.insert("parentComment", stored::id(path.comment_id));

	let comments = repositories
		.comments
		.find_all(filter, paginate.into())
		.await?;

	Ok(Json(envelope(comments)))
}

/// Get single comment
/// Returns a single live comment of a post.
#[route(tag = tag::COMMENT, error(status = 404, description = "The comment does not exist or was deleted."))]
pub async fn get_comment(
	State(repositories): State<Repositories>,
	Path(path): Path<model::CommentPath>,
) -> Result<Json<Envelope<model::Comment>>, RouteError> {
	let mut filter = live(path.id);

	filter.insert("_id", stored::id(path.comment_id));

	let comment = repositories
		.comments
		.find_one(filter)
		.await?
		.ok_or(Error::UnknownComment(path.comment_id))?;

	Ok(Json(Envelope::ok(comment.into(), "Comment fetched")))
}

/// Create comment
/// Comments on a live post, or replies to one of its live comments.
#[route(
	tag = tag::COMMENT,
	error(status = 404, description = "The post does not exist or was deleted."),
	error(status = 400, description = "The parent comment is not a live comment of the post.")
)]
pub async fn create_comment(
	State(repositories): State<Repositories>,
	actor: Actor,
	Path(model::IdInput { id }): Path<model::IdInput>,
	Json(input): Json<model::CreateCommentInput>,
) -> Result<Json<Envelope<model::Comment>>, RouteError> {
	ensure_post(&repositories, id).await?;

	if let Some(parent) = input.parent_comment {
		let mut filter = live(id);

		filter.insert("_id", stored::id(parent));

		repositories
			.comments
			.find_one(filter)
			.await?
			.ok_or(Error::UnknownParent(parent))?;
	}

	let comment = repositories
		.comments
		.create(NewComment {
			user: actor.user.id,
			post: id,
			parent_comment: input.parent_comment,
			body: input.body,
			tldr: input.tldr,
		})
		.await?;

	Ok(Json(Envelope::ok(comment.into(), "Comment created")))
}

/// Update comment
/// Updates the body or summary of one of your live comments. Replies stay
/// under the comment they were written for.
#[route(
	tag = tag::COMMENT,
	error(status = 404, description = "The comment does not exist or is not yours."),
	error(status = 400, description = "The update tries to move the comment.")
)]
pub async fn update_comment(
	State(repositories): State<Repositories>,
	actor: Actor,
	Path(path): Path<model::CommentPath>,
	Json(input): Json<model::UpdateCommentInput>,
) -> Result<Json<Envelope<model::Comment>>, RouteError> {
	if let Some(parent) = input.parent_comment.flatten() {
		return Err(Error::FixedParent(parent).into());
	}

	let mut filter = live(path.id);

	filter.insert("_id", stored::id(path.comment_id));
	filter.insert("user", stored::id(actor.user.id));

	if !input.is_empty() {
		repositories
			.comments
			.update(filter.clone(), input.into())
			.await?;
	}

	let comment = repositories
		.comments
		.find_one(filter)
		.await?
		.ok_or(Error::UnknownComment(path.comment_id))?;

	Ok(Json(Envelope::ok(comment.into(), "Comment updated")))
}

/// Delete comment
/// Soft-deletes one of your comments and takes it off the post's comment count.
#[route(tag = tag::COMMENT, error(status = 404, description = "The comment does not exist, is not yours or was already deleted."))]
pub async fn delete_comment(
	State(repositories): State<Repositories>,
	actor: Actor,
	Path(path): Path<model::CommentPath>,
) -> Result<Json<Envelope<()>>, RouteError> {
	let filter = doc! {
		"_id": stored::id(path.comment_id),
		"post": stored::id(path.id),
		"user": stored::id(actor.user.id),
	};

	if !repositories.comments.delete(filter).await? {
		return Err(Error::UnknownComment(path.comment_id).into());
	}

	Ok(Json(Envelope::ok((), "Comment deleted")))
}

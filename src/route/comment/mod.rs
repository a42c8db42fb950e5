use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(Uuid),
	#[error("unknown comment {0}")]
	UnknownComment(Uuid),
	#[error("parent comment {0} is not a live comment of this post")]
	UnknownParent(Uuid),
	#[error("a comment cannot be moved under {0}")]
	FixedParent(Uuid),
}

pub type RouteError = error::RouteError<Error>;

/// Mounted under `/posts`, next to the post routes.
pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/:id/comments",
			get_with(get_comments, get_comments_docs).post_with(create_comment, create_comment_docs),
		)
		.api_route(
			"/:id/comments/:comment_id",
			get_with(get_comment, get_comment_docs)
				.patch_with(update_comment, update_comment_docs)
				.delete_with(delete_comment, delete_comment_docs),
		)
		.api_route(
			"/:id/comments/:comment_id/replies",
			get_with(get_replies, get_replies_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) | Self::UnknownComment(..) => StatusCode::NOT_FOUND,
			Self::UnknownParent(..) | Self::FixedParent(..) => StatusCode::BAD_REQUEST,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownPost(post) => vec![error::Message::new("unknown_post").detail("post", post)],
			Self::UnknownComment(comment) => {
				vec![error::Message::new("unknown_comment").detail("comment", comment)]
			}
			Self::UnknownParent(comment) => vec![error::Message::new("unknown_parent")
				.field("parentComment")
				.detail("comment", comment)],
			Self::FixedParent(comment) => vec![error::Message::new("fixed_parent")
				.field("parentComment")
				.detail("comment", comment)],
		}
	}
}

use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{error, model::TargetKind, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown target {id}")]
	UnknownTarget { kind: TargetKind, id: Uuid },
	#[error("no matching interaction on {0}")]
	UnknownInteraction(Uuid),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			post_with(create_interaction, create_interaction_docs)
				.put_with(upsert_interaction, upsert_interaction_docs)
				.delete_with(delete_interaction, delete_interaction_docs),
		)
		.api_route("/me", get_with(get_user_interactions, get_user_interactions_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		StatusCode::NOT_FOUND
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownTarget { kind, id } => vec![error::Message::new("unknown_target")
				.field("target")
				.detail("targetType", kind)
				.detail("target", id)],
			Self::UnknownInteraction(target) => {
				vec![error::Message::new("unknown_interaction").detail("target", target)]
			}
		}
	}
}

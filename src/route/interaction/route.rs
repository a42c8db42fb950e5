use axum::extract::State;
use bson::doc;
use macros::route;

use crate::{
	extract::{Actor, Json, Query},
	model::{self as stored, Lifecycle, NewInteraction, Target, TargetKind},
	openapi::tag,
	repository::{Repositories, Upserted},
	response::Envelope,
};

use super::{model, Error, RouteError};

/// Fails unless the target is a live post or comment.
async fn ensure_target(repositories: &Repositories, target: Target) -> Result<(), RouteError> {
	let mut filter = doc! { "_id": stored::id(target.id) };

	filter.insert(Lifecycle::FIELD, Lifecycle::active());

	let exists = match target.kind {
		TargetKind::Post => repositories.posts.find_one(filter).await?.is_some(),
		TargetKind::Comment => repositories.comments.find_one(filter).await?.is_some(),
	};

	if !exists {
		return Err(Error::UnknownTarget {
			kind: target.kind,
			id: target.id,
		}
		.into());
	}

	Ok(())
}

/// Get own interactions
/// Returns a paginated response of your interactions, newest first.
#[route(tag = tag::INTERACTION)]
pub async fn get_user_interactions(
	State(repositories): State<Repositories>,
	actor: Actor,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<Envelope<Vec<model::Interaction>>>, RouteError> {
	let interactions = repositories
		.interactions
		.find_all(doc! { "user": stored::id(actor.user.id) }, paginate.into())
		.await?;

	Ok(Json(Envelope::ok(
		interactions.into_iter().map(model::Interaction::from).collect(),
		"Interactions fetched",
	)))
}

/// Create interaction
/// Records a like, dislike or view on a live post or comment and bumps the matching counter.
#[route(
	tag = tag::INTERACTION,
	error(status = 404, description = "The target does not exist or was deleted."),
	error(status = 409, description = "You already hold an interaction of this type on the target.")
)]
pub async fn create_interaction(
	State(repositories): State<Repositories>,
	actor: Actor,
	Json(input): Json<model::InteractionInput>,
) -> Result<Json<Envelope<model::Interaction>>, RouteError> {
	let target = input.target();

	ensure_target(&repositories, target).await?;

	let interaction = repositories
		.interactions
		.create(NewInteraction {
			user: actor.user.id,
			target,
			kind: input.kind,
		})
		.await?;

	Ok(Json(Envelope::ok(interaction.into(), "Interaction created")))
}

/// Set interaction
/// Creates your interaction with a target, or switches its type. Repeating the same type changes nothing.
#[route(tag = tag::INTERACTION, error(status = 404, description = "The target does not exist or was deleted."))]
pub async fn upsert_interaction(
	State(repositories): State<Repositories>,
	actor: Actor,
	Json(input): Json<model::InteractionInput>,
) -> Result<Json<Envelope<model::Interaction>>, RouteError> {
	let target = input.target();

	ensure_target(&repositories, target).await?;

	let upserted = repositories
		.interactions
		.upsert(NewInteraction {
			user: actor.user.id,
			target,
			kind: input.kind,
		})
		.await?;

	let message = match upserted {
		Upserted::Created(..) => "Interaction created",
		Upserted::Unchanged(..) => "Interaction unchanged",
		Upserted::Retyped { .. } => "Interaction updated",
	};

	Ok(Json(Envelope::ok(upserted.into_interaction().into(), message)))
}

/// Delete interaction
/// Removes your interaction with a target and decrements the matching counter.
#[route(tag = tag::INTERACTION, error(status = 404, description = "You hold no matching interaction on the target."))]
pub async fn delete_interaction(
	State(repositories): State<Repositories>,
	actor: Actor,
	Query(query): Query<model::InteractionQuery>,
) -> Result<Json<Envelope<model::Interaction>>, RouteError> {
	let mut filter = query.target().filter();

	filter.insert("user", stored::id(actor.user.id));

	if let Some(kind) = query.kind {
		filter.insert("type", kind.as_str());
	}

	let interaction = repositories
		.interactions
		.delete(filter)
		.await?
		.ok_or(Error::UnknownInteraction(query.target))?;

	Ok(Json(Envelope::ok(interaction.into(), "Interaction deleted")))
}

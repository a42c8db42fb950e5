use aide::{
	openapi::{ApiKeyLocation, SecurityScheme, Tag},
	transform::TransformOpenApi,
};

use crate::{
	error::{self, Failure},
	extract::{Json, ACTOR_HEADER},
};

pub const SECURITY_SCHEME_ACTOR: &str = "Actor";

pub mod tag {
	pub const HEALTH: &str = "Health";
	pub const USER: &str = "User";
	pub const POST: &str = "Post";
	pub const COMMENT: &str = "Comment";
	pub const INTERACTION: &str = "Interaction";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Trie Open API")
		.summary("Posts, threaded comments and interaction counters")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::HEALTH.into(),
			description: Some("Service health".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::USER.into(),
			description: Some("User registration and profiles".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::POST.into(),
			description: Some("Post management".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::COMMENT.into(),
			description: Some("Threaded comments on posts".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::INTERACTION.into(),
			description: Some("Likes, dislikes and views".into()),
			..Default::default()
		})
		.security_scheme(
			SECURITY_SCHEME_ACTOR,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Header,
				name: ACTOR_HEADER.into(),
				description: Some("The id of the acting user, set by the authentication proxy".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<Failure<'static>>, _>(|res| {
			res.example(Failure::new(
				"error message",
				vec![error::Message::new("error_code")
					.field("optional field")
					.detail("key", "value")],
			))
		})
}

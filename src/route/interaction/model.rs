pub use crate::route::model::Paginate;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub use crate::model::{InteractionType, TargetKind};

use crate::model::{self as stored, Target};

fn validate_kind(kind: &InteractionType) -> Result<(), ValidationError> {
	if *kind == InteractionType::Other {
		return Err(ValidationError::new("type must be like, dislike or view"));
	}

	Ok(())
}

/// A like, dislike or view by a user on a post or comment.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
	pub id: Uuid,
	pub user: Uuid,
	/// The post or comment interacted with.
	pub target: Uuid,
	pub target_type: TargetKind,
	#[serde(rename = "type")]
	pub kind: InteractionType,
	#[serde(rename = "dateCreated")]
	pub created_at: DateTime<Utc>,
	#[serde(rename = "dateUpdated")]
	pub updated_at: DateTime<Utc>,
}

impl From<stored::Interaction> for Interaction {
	fn from(interaction: stored::Interaction) -> Self {
		Self {
			id: interaction.id,
			user: interaction.user,
			target: interaction.target,
			target_type: interaction.target_type,
			kind: interaction.kind,
			created_at: interaction.created_at.to_chrono(),
			updated_at: interaction.updated_at.to_chrono(),
		}
	}
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InteractionInput {
	pub target: Uuid,
	pub target_type: TargetKind,
	#[serde(rename = "type")]
	#[validate(custom(function = "validate_kind"))]
	pub kind: InteractionType,
}

impl InteractionInput {
	pub fn target(&self) -> Target {
		Target {
			kind: self.target_type,
			id: self.target,
		}
	}
}

/// Selects the acting user's interaction with a target to remove. Without a
/// `type`, any type matches.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InteractionQuery {
	pub target: Uuid,
	pub target_type: TargetKind,
	#[serde(rename = "type")]
	pub kind: Option<InteractionType>,
}

impl InteractionQuery {
	pub fn target(&self) -> Target {
		Target {
			kind: self.target_type,
			id: self.target,
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_unknown_type_is_rejected() {
		let input: InteractionInput = serde_json::from_value(serde_json::json!({
			"target": Uuid::new_v4(),
			"targetType": "Post",
			"type": "share",
		}))
		.unwrap();

		assert_eq!(input.kind, InteractionType::Other);
		assert!(input.validate().is_err());
	}

	#[test]
	fn test_known_type_is_accepted() {
		let input: InteractionInput = serde_json::from_value(serde_json::json!({
			"target": Uuid::new_v4(),
			"targetType": "Comment",
			"type": "dislike",
		}))
		.unwrap();

		assert!(input.validate().is_ok());
		assert_eq!(input.target().kind, TargetKind::Comment);
	}
}

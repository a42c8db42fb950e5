use bson::{DateTime, Document};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::CounterField;

/// What a user did to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
	Like,
	Dislike,
	View,
	/// Any unrecognised stored type. Maps to no counter.
	#[serde(other)]
	#[schemars(skip)]
	Other,
}

impl InteractionType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Like => "like",
			Self::Dislike => "dislike",
			Self::View => "view",
			Self::Other => "other",
		}
	}

	/// The counter on the target that tracks interactions of this type.
	pub fn counter_field(self) -> Option<CounterField> {
		match self {
			Self::Like => Some(CounterField::Likes),
			Self::Dislike => Some(CounterField::Dislikes),
			Self::View => Some(CounterField::Views),
			Self::Other => None,
		}
	}
}

/// The kinds of entity that carry interaction counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum TargetKind {
	Post,
	Comment,
}

impl TargetKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Post => "Post",
			Self::Comment => "Comment",
		}
	}
}

/// A post or comment, identified by kind and id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
	pub kind: TargetKind,
	pub id: Uuid,
}

impl Target {
	pub fn post(id: Uuid) -> Self {
		Self {
			kind: TargetKind::Post,
			id,
		}
	}

	pub fn comment(id: Uuid) -> Self {
		Self {
			kind: TargetKind::Comment,
			id,
		}
	}

	/// Filter on an interaction's `target` and `targetType`.
	pub fn filter(self) -> Document {
		bson::doc! {
			"target": super::id(self.id),
			"targetType": self.kind.as_str(),
		}
	}
}

/// A single like, dislike or view by a user on a target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
	#[serde(rename = "_id")]
	pub id: Uuid,
	pub user: Uuid,
	pub target: Uuid,
	pub target_type: TargetKind,
	#[serde(rename = "type")]
	pub kind: InteractionType,
	pub created_at: DateTime,
	pub updated_at: DateTime,
}

impl Interaction {
	pub fn target(&self) -> Target {
		Target {
			kind: self.target_type,
			id: self.target,
		}
	}
}

#[derive(Debug, Clone, Copy)]
pub struct NewInteraction {
	pub user: Uuid,
	pub target: Target,
	pub kind: InteractionType,
}

impl NewInteraction {
	pub(crate) fn into_interaction(self, now: DateTime) -> Interaction {
		Interaction {
			id: Uuid::new_v4(),
			user: self.user,
			target: self.target.id,
			target_type: self.target.kind,
			kind: self.kind,
			created_at: now,
			updated_at: now,
		}
	}

	/// Filter on the `(user, target, targetType)` tuple, ignoring the type.
	pub fn owner_filter(&self) -> Document {
		let mut filter = self.target.filter();

		filter.insert("user", super::id(self.user));
		filter
	}
}

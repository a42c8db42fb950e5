use bson::{Bson, DateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Soft-delete state of a post or comment.
///
/// Stored as the single nullable `deletedAt` field: `null` (or absent)
/// means active. The only transition is `Active -> Deleted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
	#[default]
	Active,
	Deleted {
		at: DateTime,
	},
}

impl Lifecycle {
	pub const FIELD: &'static str = "deletedAt";

	pub fn is_deleted(self) -> bool {
		matches!(self, Self::Deleted { .. })
	}

	pub fn deleted_at(self) -> Option<DateTime> {
		match self {
			Self::Active => None,
			Self::Deleted { at } => Some(at),
		}
	}

	/// The filter value selecting active documents only.
	pub fn active() -> Bson {
		Bson::Null
	}
}

impl Serialize for Lifecycle {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.deleted_at().serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for Lifecycle {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		Ok(Option::<DateTime>::deserialize(deserializer)?
			.map_or(Self::Active, |at| Self::Deleted { at }))
	}
}

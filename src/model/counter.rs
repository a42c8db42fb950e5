use std::{fmt, str::FromStr};

/// The denormalized counters that may be incremented on posts and comments.
///
/// This is the complete allow-list. Any other field name fails to parse with
/// [`InvalidField`], before anything is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterField {
	Views,
	Likes,
	Dislikes,
	Comments,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid field for increment: {0}")]
pub struct InvalidField(pub String);

impl CounterField {
	pub const ALL: [Self; 4] = [Self::Views, Self::Likes, Self::Dislikes, Self::Comments];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Views => "viewsCount",
			Self::Likes => "likesCount",
			Self::Dislikes => "dislikesCount",
			Self::Comments => "commentsCount",
		}
	}
}

impl FromStr for CounterField {
	type Err = InvalidField;

	fn from_str(field: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|counter| counter.as_str() == field)
			.ok_or_else(|| InvalidField(field.to_owned()))
	}
}

impl fmt::Display for CounterField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

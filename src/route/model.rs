use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::pagination::{Paginator, MAX_PAGE_SIZE};

/// These can be removed when [`serde`] supports
/// literal defaults: <https://github.com/serde-rs/serde/issues/368>
#[inline]
fn one() -> i64 {
	1
}

#[inline]
#[allow(clippy::cast_possible_wrap)]
fn max_page_size() -> i64 {
	MAX_PAGE_SIZE as i64
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct Paginate {
	/// The page number to return (1-indexed). Pages below 1 return the first page.
	#[serde(default = "one")]
	pub page: i64,
	/// The number of items to return per page, clamped to 1 through 12.
	#[serde(default = "max_page_size")]
	pub size: i64,
}

impl From<Paginate> for Paginator {
	fn from(paginate: Paginate) -> Self {
		Paginator::new(paginate.page, paginate.size)
	}
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct IdInput {
	pub id: Uuid,
}

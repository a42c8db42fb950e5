/// The largest page a listing may return.
pub const MAX_PAGE_SIZE: u64 = 12;

/// A normalized `limit`/`offset` pair for listing queries.
///
/// Built from a 1-indexed page number and a page size. Pages below 1 are
/// coerced to 1 and sizes are clamped to `1..=MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
	page: u64,
	limit: u64,
}

impl Paginator {
	pub fn new(page: i64, limit: i64) -> Self {
		let page = u64::try_from(page.max(1)).unwrap_or(1);
		let limit = u64::try_from(limit).unwrap_or(1).clamp(1, MAX_PAGE_SIZE);

		Self { page, limit }
	}

	pub fn limit(&self) -> u64 {
		self.limit
	}

	pub fn offset(&self) -> u64 {
		(self.page - 1).saturating_mul(self.limit)
	}
}

impl Default for Paginator {
	fn default() -> Self {
		Self::new(1, i64::try_from(MAX_PAGE_SIZE).unwrap_or(i64::MAX))
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_paginate_clamps() {
		let paginator = Paginator::new(0, 50);

		assert_eq!(paginator.limit(), 12);
		assert_eq!(paginator.offset(), 0);

		let paginator = Paginator::new(-4, -1);

		assert_eq!(paginator.limit(), 1);
		assert_eq!(paginator.offset(), 0);
	}

	#[test]
	fn test_paginate_offset() {
		let mut paginator = Paginator::new(1, 10);

		assert_eq!(paginator.offset(), 0);

		paginator = Paginator::new(2, 10);

		assert_eq!(paginator.offset(), 10);

		paginator = Paginator::new(3, 5);

		assert_eq!(paginator.offset(), 10);
		assert_eq!(paginator.limit(), 5);
	}

	#[test]
	fn test_paginate_default() {
		let paginator = Paginator::default();

		assert_eq!(paginator, Paginator::new(1, 12));
		assert_eq!(paginator.offset(), 0);
	}
}

use std::borrow::Cow;

use schemars::JsonSchema;
use serde::Serialize;

/// The success envelope wrapped around every response body.
///
/// ```json
/// { "success": true, "data": { ... }, "message": "post created" }
/// ```
#[derive(Debug, Serialize, JsonSchema)]
pub struct Envelope<T> {
	pub success: bool,
	pub data: T,
	pub message: Cow<'static, str>,
}

impl<T> Envelope<T> {
	pub fn ok(data: T, message: impl Into<Cow<'static, str>>) -> Self {
		Self {
			success: true,
			data,
			message: message.into(),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_envelope_shape() {
		let envelope = Envelope::ok(vec![1, 2], "listed");

		assert_eq!(
			serde_json::to_value(&envelope).unwrap(),
			serde_json::json!({ "success": true, "data": [1, 2], "message": "listed" })
		);
	}

	#[test]
	fn test_unit_data_is_null() {
		let envelope = Envelope::ok((), "deleted");

		assert_eq!(serde_json::to_value(&envelope).unwrap()["data"], serde_json::Value::Null);
	}
}

use aide::axum::{routing::get_with, ApiRouter};
use macros::route;

use crate::{extract::Json, openapi::tag, response::Envelope, AppState};

pub fn routes() -> ApiRouter<AppState> {
	ApiRouter::new().api_route("/", get_with(health, health_docs))
}

/// Health check
/// Reports that the service is up.
#[route(tag = tag::HEALTH)]
pub async fn health() -> Json<Envelope<()>> {
	Json(Envelope::ok((), "OK"))
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_health() {
		let (server, _) = app();

		let response = server.get("/health").await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(
			response.json::<Value>(),
			json!({ "success": true, "data": null, "message": "OK" })
		);
	}
}

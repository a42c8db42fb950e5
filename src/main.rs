#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod model;
mod openapi;
mod pagination;
mod repository;
mod response;
mod route;
mod store;
mod trace;

use std::{sync::Arc, time::Duration};

use aide::{axum::ApiRouter, openapi::OpenApi};
use argon2::Argon2;
use axum::{
	extract::Request,
	http::{header, HeaderName, HeaderValue, Method},
	routing::get,
	Extension, Router, ServiceExt,
};
use tower::{Layer, ServiceBuilder};
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	normalize_path::NormalizePathLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

use crate::{
	config::Config,
	extract::ACTOR_HEADER,
	repository::Repositories,
	store::{MemoryStore, MongoStore, Store},
};

pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as the repositories or a hash configuration (if it's expensive to create).
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub repositories: Repositories,
	pub hasher: Argon2<'static>,
}

/// Only `frontend` may make credentialed cross-origin requests.
fn cors(frontend: HeaderValue) -> CorsLayer {
	CorsLayer::new()
		.allow_origin(frontend)
		.allow_credentials(true)
		.allow_methods([
			Method::GET,
			Method::POST,
			Method::PUT,
			Method::PATCH,
			Method::DELETE,
			Method::OPTIONS,
		])
		.allow_headers([
			header::ORIGIN,
			header::CONTENT_TYPE,
			header::AUTHORIZATION,
			HeaderName::from_static(ACTOR_HEADER),
		])
		.expose_headers([header::CONTENT_LENGTH])
		.max_age(Duration::from_secs(99 * 60 * 60))
}

/// Builds the full application, documentation included.
pub fn router(state: State, frontend: HeaderValue) -> Router {
	let mut api = OpenApi::default();

	ApiRouter::new()
		.nest("/health", route::health::routes())
		.nest("/users", route::user::routes())
		.nest("/posts", route::post::routes().merge(route::comment::routes()))
		.nest("/interactions", route::interaction::routes())
		.route("/docs/api.json", get(route::docs::serve_docs))
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new())
				.layer(cors(frontend)),
		)
		.with_state(state)
}

async fn connect(config: &Config) -> Result<Arc<dyn Store>, store::Error> {
	let store: Arc<dyn Store> = if config.uses_memory_store() {
		tracing::warn!("using the in-memory store, data will not persist");
		Arc::new(MemoryStore::new())
	} else {
		Arc::new(MongoStore::connect(&config.mongo_uri, &config.db_name).await?)
	};

	store.ensure_indexes().await?;
	Ok(store)
}

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();

	let config = match Config::load() {
		Ok(config) => config,
		Err(error) => {
			eprintln!("invalid configuration: {error}");
			std::process::exit(1);
		}
	};

	let _guard = trace::init_tracing_subscriber(config.otel_export)
		.expect("failed to initialize tracing");

	let store = connect(&config).await.expect("failed to connect to database");

	let state = State {
		repositories: Repositories::new(store),
		hasher: Argon2::default(),
	};

	let app = NormalizePathLayer::trim_trailing_slash().layer(router(state, config.frontend_url));

	let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on port {}", config.port);

	axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
		.await
		.expect("server error");
}

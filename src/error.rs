use std::borrow::Cow;

use aide::OperationOutput;
use axum::{
	body::Body,
	extract::rejection,
	http::{Response, StatusCode},
	response::IntoResponse,
};
use schemars::JsonSchema;
use serde::Serialize;

use crate::repository;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single error shown to the client.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'a> {
	pub content: Cow<'a, str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'a, str>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Cow<'a, Map>>,
}

impl<'a> Message<'a> {
	pub fn new(content: impl Into<Cow<'a, str>>) -> Self {
		Self {
			content: content.into(),
			field: None,
			details: None,
		}
	}

	pub fn field(mut self, field: impl Into<Cow<'a, str>>) -> Self {
		self.field = Some(field.into());
		self
	}

	pub fn detail(mut self, key: &str, value: impl Serialize) -> Self {
		self.details
			.get_or_insert_with(|| Cow::Owned(Map::new()))
			.to_mut()
			.insert(key.into(), serde_json::to_value(value).unwrap_or_default());
		self
	}
}

/// The failure envelope: `{ success: false, message, errors? }`.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Failure<'a> {
	pub success: bool,
	pub message: Cow<'a, str>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub errors: Vec<Message<'a>>,
}

impl<'a> Failure<'a> {
	pub fn new(message: impl Into<Cow<'a, str>>, errors: Vec<Message<'a>>) -> Self {
		Self {
			success: false,
			message: message.into(),
			errors,
		}
	}

	pub fn respond(self, status: StatusCode) -> Response<Body> {
		(status, axum::Json(self)).into_response()
	}
}

/// Errors shared by every route: malformed input and repository failures.
///
/// The Display trait is not sent to the client for internal errors, so it
/// can show sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] rejection::JsonRejection),
	#[error("query error: {0}")]
	Query(#[from] rejection::QueryRejection),
	#[error("path error: {0}")]
	Path(#[from] rejection::PathRejection),
	#[error("repository error: {0}")]
	Repository(#[from] repository::Error),
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::Validation(errors) => {
				let errors = errors
					.field_errors()
					.into_iter()
					.flat_map(|(field, errors)| {
						errors.iter().map(move |error| {
							Message::new(error.code.clone()).field(field.to_string())
						})
					})
					.collect();

				Failure::new("validation failed", errors).respond(StatusCode::BAD_REQUEST)
			}
			Self::Json(error) => Failure::new(error.body_text(), Vec::new()).respond(error.status()),
			Self::Query(error) => Failure::new(error.body_text(), Vec::new()).respond(error.status()),
			Self::Path(error) => Failure::new(error.body_text(), Vec::new()).respond(error.status()),
			Self::Repository(repository::Error::DuplicateKey { .. }) => {
				Failure::new("already exists", Vec::new()).respond(StatusCode::CONFLICT)
			}
			Self::Repository(error) => {
				tracing::error!(%error, "request failed");

				Failure::new("internal server error", Vec::new())
					.respond(StatusCode::INTERNAL_SERVER_ERROR)
			}
		}
	}
}

/// A route-specific error that knows how it is presented.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;

	fn errors(&self) -> Vec<Message<'_>> {
		Vec::new()
	}
}

/// The error type returned by handlers: either the route's own error or an
/// [`AppError`].
#[derive(Debug)]
pub enum RouteError<E> {
	Route(E),
	App(AppError),
}

impl<E: ErrorShape> From<E> for RouteError<E> {
	fn from(error: E) -> Self {
		Self::Route(error)
	}
}

impl<E> From<AppError> for RouteError<E> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<E> From<repository::Error> for RouteError<E> {
	fn from(error: repository::Error) -> Self {
		Self::App(AppError::Repository(error))
	}
}

impl<E: ErrorShape> IntoResponse for RouteError<E> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::Route(error) => {
				Failure::new(error.to_string(), error.errors()).respond(error.status())
			}
			Self::App(error) => error.into_response(),
		}
	}
}

impl<E> OperationOutput for RouteError<E> {
	type Inner = Failure<'static>;
}

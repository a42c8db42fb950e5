use axum::http::HeaderValue;

/// Selects the in-memory store instead of MongoDB.
pub const MEMORY_URI: &str = "memory://";

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0} must be set")]
	Missing(&'static str),
	#[error("{key} is invalid: {message}")]
	Invalid { key: &'static str, message: String },
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
	pub port: u16,
	pub db_name: String,
	pub mongo_uri: String,
	/// The only origin allowed by CORS.
	pub frontend_url: HeaderValue,
	pub otel_export: bool,
}

impl Config {
	/// Reads the configuration from the environment. Call after loading `.env`.
	pub fn load() -> Result<Self, Error> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
		let required = |key: &'static str| {
			lookup(key)
				.filter(|value| !value.is_empty())
				.ok_or(Error::Missing(key))
		};

		let port = required("PORT")?.parse().map_err(|error: std::num::ParseIntError| Error::Invalid {
			key: "PORT",
			message: error.to_string(),
		})?;

		let frontend_url = HeaderValue::try_from(required("FRONTEND_URL")?).map_err(|error| Error::Invalid {
			key: "FRONTEND_URL",
			message: error.to_string(),
		})?;

		let otel_export = match lookup("OTEL_EXPORT").as_deref() {
			None | Some("" | "false" | "0") => false,
			Some("true" | "1") => true,
			Some(other) => {
				return Err(Error::Invalid {
					key: "OTEL_EXPORT",
					message: format!("expected true or false, got {other}"),
				})
			}
		};

		Ok(Self {
			port,
			db_name: required("DB_NAME")?,
			mongo_uri: required("MONGO_URI")?,
			frontend_url,
			otel_export,
		})
	}

	pub fn uses_memory_store(&self) -> bool {
		self.mongo_uri.starts_with(MEMORY_URI)
	}
}

#[cfg(test)]
mod test {
	use std::collections::HashMap;

	use super::*;

	fn load(pairs: &[(&str, &str)]) -> Result<Config, Error> {
		let vars = pairs
			.iter()
			.map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
			.collect::<HashMap<_, _>>();

		Config::from_lookup(|key| vars.get(key).cloned())
	}

	const VALID: &[(&str, &str)] = &[
		("PORT", "8080"),
		("DB_NAME", "trie"),
		("MONGO_URI", "mongodb://localhost:27017"),
		("FRONTEND_URL", "http://localhost:5173"),
	];

	#[test]
	fn test_load_valid() {
		let config = load(VALID).unwrap();

		assert_eq!(config.port, 8080);
		assert_eq!(config.db_name, "trie");
		assert!(!config.otel_export);
		assert!(!config.uses_memory_store());
	}

	#[test]
	fn test_missing_variable() {
		let error = load(&VALID[1..]).unwrap_err();

		assert!(matches!(error, Error::Missing("PORT")));
	}

	#[test]
	fn test_empty_counts_as_missing() {
		let mut pairs = VALID.to_vec();

		pairs[1] = ("DB_NAME", "");

		assert!(matches!(load(&pairs), Err(Error::Missing("DB_NAME"))));
	}

	#[test]
	fn test_invalid_port() {
		let mut pairs = VALID.to_vec();

		pairs[0] = ("PORT", "eighty");

		assert!(matches!(load(&pairs), Err(Error::Invalid { key: "PORT", .. })));
	}

	#[test]
	fn test_memory_store_and_export() {
		let mut pairs = VALID.to_vec();

		pairs[2] = ("MONGO_URI", "memory://");
		pairs.push(("OTEL_EXPORT", "true"));

		let config = load(&pairs).unwrap();

		assert!(config.uses_memory_store());
		assert!(config.otel_export);
	}
}

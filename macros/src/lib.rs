mod model;
mod route;

use proc_macro::TokenStream;

/// Creates a new documentation function for the route, named after the original function with the suffix `_docs`.
///
/// The first doc line is the summary and the rest the description. `tag`, `response` and
/// `error` arguments may be repeated; `error` documents a failure envelope for a status.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}

/// Creates two request structs for an API model: `CreateXInput` and `UpdateXInput`.
/// Fields with #[serde(skip_deserializing)] or #[serde(skip)] are left out of both,
/// and all other fields are copied verbatim (including attributes). Every field of
/// `UpdateXInput` is optional, and it gets an `is_empty` method.
#[proc_macro_attribute]
pub fn model(_args: TokenStream, input: TokenStream) -> TokenStream {
	model::from_input(input)
}

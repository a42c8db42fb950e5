//! Stored entities.
//!
//! These mirror the documents in the store one-to-one. Route modules expose
//! their own API shapes built from these.

mod comment;
mod counter;
mod interaction;
mod lifecycle;
mod post;
mod user;

pub use comment::{Comment, CommentUpdate, NewComment};
pub use counter::{CounterField, InvalidField};
pub use interaction::{Interaction, InteractionType, NewInteraction, Target, TargetKind};
pub use lifecycle::Lifecycle;
pub use post::{NewPost, Post, PostUpdate};
pub use user::{NewUser, Role, User, UserUpdate};

use bson::Bson;
use uuid::Uuid;

/// Identifiers are stored as hyphenated strings, which is how [`Uuid`]
/// serializes into BSON. Filters must use the same representation.
pub fn id(id: Uuid) -> Bson {
	Bson::String(id.to_string())
}

pub mod comment;
pub mod docs;
pub mod health;
pub mod interaction;
pub mod model;
pub mod post;
pub mod user;

//! Blog entity types.
//!
//! Each unit struct declares a REST resource through [`Model`](api_query::Model); the
//! matching `*Data` struct is a typed view decoded from an entity's attributes with
//! [`decode`].

mod comment;
mod post;
mod user;

pub use comment::{Comment, CommentData};
pub use post::{Post, PostData};
pub use user::{User, UserData};

use api_query::{Entity, Model};
use serde::de::DeserializeOwned;

/// Decodes an entity (relations included) into a typed view.
pub fn decode<M: Model, T: DeserializeOwned>(entity: &Entity<M>) -> serde_json::Result<T> {
    serde_json::from_value(entity.to_value())
}

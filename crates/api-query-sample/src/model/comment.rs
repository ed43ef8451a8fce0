use api_query::Model;
use serde::{Deserialize, Serialize};

/// Comments, served from `/posts/{id}/comments`.
pub struct Comment;

impl Model for Comment {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentData {
    pub id: Option<u64>,
    pub text: String,
    #[serde(default)]
    pub post_id: Option<u64>,
}

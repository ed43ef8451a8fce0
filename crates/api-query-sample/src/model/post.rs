use api_query::{Model, Relation};
use serde::{Deserialize, Serialize};

use super::{Comment, CommentData, User, UserData};

/// Blog posts, served from `/posts` and nested under `/users/{id}/posts`.
///
/// An embedded `user` hydrates into `Entity<User>` and embedded `comments` into
/// `Entity<Comment>`s.
pub struct Post;

impl Model for Post {
    fn relations() -> Vec<Relation> {
        vec![
            Relation::to::<User>("user"),
            Relation::to::<Comment>("comments"),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostData {
    pub id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub user: Option<UserData>,
    #[serde(default)]
    pub comments: Vec<CommentData>,
}

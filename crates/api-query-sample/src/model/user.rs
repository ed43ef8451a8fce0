use api_query::Model;
use serde::{Deserialize, Serialize};

/// Authors, served from `/users`.
pub struct User;

impl Model for User {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    pub id: Option<u64>,
    pub name: String,
    pub email: String,
}

//! # System Wiring
//!
//! [`BlogSystem`] builds the pieces every entity needs: one backend and one
//! [`Connection`] pointing at it. Entities are created from the connection:
//!
//! ```rust,ignore
//! let system = BlogSystem::new();
//!
//! let mut user = Entity::<User>::new(&system.connection)?;
//! user.set("name", "Alice");
//! let user = user.save().await?;
//!
//! let posts = Post::include(&system.connection, ["user"])?.get().await?;
//! ```
//!
//! The backend is swappable: [`BlogSystem::with_executor`] wraps every request in a
//! custom [`RequestExecutor`], e.g. to attach credentials.

use api_query::{Connection, RequestExecutor};
use tracing::info;

use crate::server::InMemoryApi;

pub const BASE_URL: &str = "http://blog.local/api";

/// The wired sample application.
pub struct BlogSystem {
    /// Shared configuration handed to every entity.
    pub connection: Connection,

    /// Handle on the backend, for inspection.
    pub api: InMemoryApi,
}

impl BlogSystem {
    pub fn new() -> Self {
        let api = InMemoryApi::new(BASE_URL);
        let connection = Connection::http(BASE_URL, api.clone());
        info!(base_url = BASE_URL, "Blog system ready");

        Self { connection, api }
    }

    /// Routes every request through `executor`.
    pub fn with_executor<E>(mut self, executor: E) -> Self
    where
        E: RequestExecutor + 'static,
    {
        self.connection = self.connection.with_executor(executor);
        self
    }
}

impl Default for BlogSystem {
    fn default() -> Self {
        Self::new()
    }
}

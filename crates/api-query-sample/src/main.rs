//! # API Query Sample
//!
//! A small blog client built on `api-query`, running against an in-memory backend.
//!
//! ## 🚀 Core Components
//!
//! - **[model]**: Entity types ([`User`], [`Post`], [`Comment`]) and their typed views.
//! - **[server]**: [`InMemoryApi`](api_query_sample::server::InMemoryApi), the backend.
//! - **[lifecycle]**: [`BlogSystem`], which wires the backend into a [`Connection`](api_query::Connection).
//!
//! ## 📚 Quick Start
//!
//! The entry point demonstrates:
//! 1.  Creating a [`User`].
//! 2.  Creating a [`Post`] nested under that user with `for_`.
//! 3.  Attaching a [`Comment`] and reading everything back with `include`.

use api_query::tracing::setup_tracing;
use api_query::{Entity, Query};
use api_query_sample::lifecycle::BlogSystem;
use api_query_sample::model::{decode, Comment, Post, PostData, User};
use serde_json::json;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    info!("Starting blog sample");

    let system = BlogSystem::new();
    let connection = &system.connection;

    let span = tracing::info_span!("user_creation");
    let user = async {
        let mut user = Entity::<User>::new(connection)?;
        user.set("name", "Alice");
        user.set("email", "alice@example.com");
        user.save().await
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    info!(user_id = ?user.id(), "User created successfully");

    let span = tracing::info_span!("post_creation");
    let post = async {
        let mut post = Entity::<Post>::new(connection)?;
        post.set("title", "Hello, REST");
        post.for_([&user])?.save().await
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    info!(post_id = ?post.id(), "Post created successfully");

    let comments = post.has_many::<Comment>().map_err(|e| e.to_string())?;
    for text in ["First!", "Nice post"] {
        comments
            .attach(json!({ "text": text }))
            .await
            .map_err(|e| e.to_string())?;
    }

    let span = tracing::info_span!("listing");
    let listing = async {
        Post::include(connection, ["user", "comments"])?
            .order_by(["-id"])
            .get()
            .await
    }
    .instrument(span)
    .await;

    match listing {
        Ok(posts) => {
            info!(total = ?posts.envelope().and_then(|e| e.get("meta")), "Posts fetched");
            for post in &posts {
                match decode::<Post, PostData>(post) {
                    Ok(data) => info!(
                        title = %data.title,
                        author = ?data.user.map(|u| u.name),
                        comments = data.comments.len(),
                        "Post"
                    ),
                    Err(e) => error!(error = %e, "Unexpected post shape"),
                }
            }
        }
        Err(e) => error!(error = %e, "Listing failed"),
    }

    let mut edited = post.clone();
    edited.set("title", "Hello again, REST");
    let edited = edited.patch().await.map_err(|e| e.to_string())?;
    info!(title = ?edited.attr("title"), "Post patched");

    edited.delete().await.map_err(|e| e.to_string())?;
    info!(remaining = system.api.count("posts").await, "Post deleted");

    info!("Sample completed successfully");
    Ok(())
}

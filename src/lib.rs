//! # tweetstream-rs
//!
//! An async Rust client for the Twitter public sampled stream.
//!
//! The crate covers the whole life of a stream session: exchanging consumer
//! keys for an application bearer token, opening the streaming endpoint with
//! server-side filter parameters, decoding the unbounded response body into
//! typed records as it arrives, and closing the session.
//!
//! ## Features
//!
//! - **Authentication**: OAuth2 client-credentials exchange, performed once per client
//! - **Filters**: Deterministic query rendering for field selection, expansions and time windows
//! - **Incremental decoding**: Newline-delimited JSON read one chunk at a time, keep-alive aware
//! - **Type Safety**: Records decode into any `serde` type, with a default [`models::Tweet`]
//! - **Async-first**: Built on `reqwest` and Tokio; no background tasks
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tweetstream_rs::{ClientConfig, FilterSpec, StreamClient};
//! use tweetstream_rs::models::Tweet;
//!
//! #[tokio::main]
//! async fn main() -> tweetstream_rs::Result<()> {
//!     // Exchange the consumer keys for a bearer token
//!     let client = StreamClient::connect(
//!         ClientConfig::new("consumer-key", "consumer-secret"),
//!     ).await?;
//!
//!     // Open a filtered stream
//!     let mut session = client.stream().await?;
//!     session.filter(
//!         &FilterSpec::new()
//!             .with_tweet_fields(["created_at", "lang"])
//!             .with_expansions(["author_id"]),
//!     ).await?;
//!
//!     // Read a few batches
//!     for _ in 0..10 {
//!         let tweets: Vec<Tweet> = session.next().await?;
//!         for tweet in tweets {
//!             println!("{}: {}", tweet.id, tweet.text);
//!         }
//!     }
//!
//!     session.close().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod streaming;

// Re-export primary types at crate root for convenience
pub use auth::Credential;
pub use client::{ClientConfig, StreamClient};
pub use error::{Error, Result};
pub use streaming::{FilterSpec, RecordDecoder, SessionCookie, SessionState, StreamSession};

/// Prelude module for convenient imports.
///
/// ```rust
/// use tweetstream_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::auth::Credential;
    pub use crate::client::{ClientConfig, StreamClient};
    pub use crate::error::{Error, Result};
    pub use crate::models::{StreamRecord, Tweet, User};
    pub use crate::streaming::{
        FilterSpec, RecordDecoder, SessionConfig, SessionCookie, SessionState, StreamSession,
    };
}

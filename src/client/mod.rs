//! Client and configuration for the streaming API.
//!
//! [`StreamClient`] is the composition root: it owns the configuration,
//! derives the bearer credential once, and creates stream sessions.
//!
//! # Example
//!
//! ```no_run
//! use tweetstream_rs::{ClientConfig, StreamClient};
//!
//! # async fn example() -> tweetstream_rs::Result<()> {
//! let client = StreamClient::connect(ClientConfig::new("key", "secret")).await?;
//! let mut session = client.stream().await?;
//! let raw = session.sample().await?;
//! println!("{} bytes sampled", raw.len());
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;

pub use config::{ClientConfig, DEFAULT_STREAM_URL, DEFAULT_TOKEN_URL};
pub use http::StreamClient;
pub(crate) use http::ClientInner;

//! Sampled-stream sessions and incremental record decoding.
//!
//! A [`StreamSession`] owns one authenticated connection to the streaming
//! endpoint. [`FilterSpec`] describes the server-side filter applied when the
//! session is opened, and [`RecordDecoder`] turns the unbounded response
//! body into typed records one read at a time.
//!
//! # Filtered stream
//!
//! ```no_run
//! use futures_util::StreamExt;
//! use tweetstream_rs::streaming::FilterSpec;
//! use tweetstream_rs::models::Tweet;
//!
//! # async fn example(client: tweetstream_rs::StreamClient) -> tweetstream_rs::Result<()> {
//! let mut session = client.stream().await?;
//! session
//!     .filter(&FilterSpec::new().with_tweet_fields(["created_at", "lang"]))
//!     .await?;
//!
//! {
//!     let mut records = session.records::<Tweet>()?;
//!     while let Some(record) = records.next().await {
//!         match record {
//!             Ok(tweet) => println!("{}", tweet.text),
//!             Err(e) => eprintln!("skipping payload: {e}"),
//!         }
//!     }
//! }
//!
//! session.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # One-shot sample
//!
//! ```no_run
//! # async fn example(client: tweetstream_rs::StreamClient) -> tweetstream_rs::Result<()> {
//! let mut session = client.stream().await?;
//! let body = session.sample().await?;
//! println!("{}", String::from_utf8_lossy(&body));
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

mod cookie;
mod decoder;
mod filter;
mod session;

pub use cookie::{SessionCookie, PERSONALIZATION_COOKIE};
pub use decoder::{ByteStream, RecordDecoder, DEFAULT_MAX_FRAME_LEN};
pub use filter::FilterSpec;
pub use session::{SessionConfig, SessionState, StreamSession};

//! Record types decoded from the stream.
//!
//! The stream decoder is generic over any `serde::de::DeserializeOwned`
//! type; these are the defaults:
//!
//! - [`tweet`] - The tweet schema (`Tweet`, `User`, `Entities`, ...)
//! - [`envelope`] - The v2 `{"data": ..., "includes": ...}` wrapper

#[allow(missing_docs)]
pub mod tweet;
pub mod envelope;

pub use tweet::*;
pub use envelope::*;

//! Incremental decoding of newline-delimited JSON records.

use std::collections::VecDeque;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use crate::{Error, Result};

/// Boxed source of body chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Decoder over the live body of an open stream.
///
/// The body is an unbounded sequence of JSON payloads separated by
/// newlines. Each call to [`next`](Self::next) performs one decode cycle:
/// it reads at most one chunk from the connection and returns every record
/// that became complete. Blank lines are keep-alives and are skipped.
///
/// An empty result means "nothing pending", not end of stream. The end of
/// the body is reported as [`Error::StreamDisconnected`].
///
/// A payload that grows past the frame limit without a newline is dropped
/// and reported as [`Error::FrameTooLarge`]; bytes up to the next newline
/// are discarded and decoding resumes after it.
pub struct RecordDecoder {
    source: ByteStream,
    buffer: Vec<u8>,
    /// Prefix of `buffer` known to contain no newline
    scanned: usize,
    max_frame_len: usize,
    discarding: bool,
    finished: bool,
}

/// Default upper bound for a single buffered frame.
pub const DEFAULT_MAX_FRAME_LEN: usize = 1024 * 1024;

impl RecordDecoder {
    /// Create a decoder over any chunk source.
    ///
    /// # Example
    ///
    /// ```
    /// use bytes::Bytes;
    /// use futures_util::stream;
    /// use tweetstream_rs::streaming::RecordDecoder;
    ///
    /// # async fn example() -> tweetstream_rs::Result<()> {
    /// let chunks = vec![Ok(Bytes::from_static(b"{\"id\":1}\n{\"id\":2}\n"))];
    /// let mut decoder = RecordDecoder::new(stream::iter(chunks));
    ///
    /// let records: Vec<serde_json::Value> = decoder.next().await?;
    /// assert_eq!(records.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new<S>(source: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Self {
            source: Box::pin(source),
            buffer: Vec::new(),
            scanned: 0,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            discarding: false,
            finished: false,
        }
    }

    /// Set the largest frame buffered while waiting for its newline.
    pub fn with_max_frame_len(mut self, max_frame_len: usize) -> Self {
        self.max_frame_len = max_frame_len.max(1);
        self
    }

    /// Wrap the body of a successful stream response.
    pub(crate) fn from_response(response: reqwest::Response) -> Self {
        Self::new(response.bytes_stream().map(|chunk| chunk.map_err(Error::from)))
    }

    /// Number of buffered bytes not yet decoded.
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` once the body has ended and every frame was consumed.
    pub fn is_finished(&self) -> bool {
        self.finished && self.buffer.is_empty()
    }

    /// Run one decode cycle.
    ///
    /// A malformed frame yields [`Error::Decode`]; the frame is dropped and
    /// the decoder stays usable. When good records precede a malformed frame
    /// in the same cycle, the records are returned first and the error is
    /// reported by the following call.
    pub async fn next<R: DeserializeOwned>(&mut self) -> Result<Vec<R>> {
        if !self.has_complete_frame() {
            if self.finished {
                return Err(Error::StreamDisconnected);
            }

            match self.source.next().await {
                Some(Ok(chunk)) => {
                    trace!(len = chunk.len(), "Received chunk");
                    self.push_chunk(&chunk)?;
                }
                Some(Err(e)) => return Err(e),
                None => {
                    debug!(pending = self.buffer.len(), "Stream body ended");
                    self.finished = true;
                    if self.buffer.is_empty() {
                        return Err(Error::StreamDisconnected);
                    }
                }
            }
        }

        let mut records = Vec::new();
        while let Some(frame) = self.take_frame() {
            if is_keep_alive(&frame) {
                trace!("Keep-alive");
                continue;
            }

            match decode_frame::<R>(&frame) {
                Ok(batch) => records.extend(batch),
                Err(e) if records.is_empty() => {
                    warn!(error = %e, len = frame.len(), "Failed to decode stream payload");
                    return Err(e);
                }
                Err(_) => {
                    self.requeue(frame);
                    break;
                }
            }
        }

        Ok(records)
    }

    /// Lazy sequence of records over repeated decode cycles.
    ///
    /// Decode errors are yielded as items and reading continues; the
    /// sequence ends after the body ends or a transport error is yielded.
    pub fn records<'a, R>(&'a mut self) -> BoxStream<'a, Result<R>>
    where
        R: DeserializeOwned + Send + 'a,
    {
        stream::unfold(
            (self, VecDeque::new(), false),
            |(decoder, mut pending, done)| async move {
                loop {
                    if let Some(record) = pending.pop_front() {
                        return Some((Ok(record), (decoder, pending, done)));
                    }
                    if done {
                        return None;
                    }
                    match decoder.next::<R>().await {
                        Ok(batch) => pending.extend(batch),
                        Err(Error::StreamDisconnected) => return None,
                        Err(e) => {
                            let fatal = e.is_transport_error();
                            return Some((Err(e), (decoder, pending, fatal)));
                        }
                    }
                }
            },
        )
        .boxed()
    }

    fn push_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        let mut chunk = chunk;
        if self.discarding {
            match chunk.iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    chunk = &chunk[pos + 1..];
                    self.discarding = false;
                    debug!("Resynchronized after oversized frame");
                }
                None => return Ok(()),
            }
        }

        self.buffer.extend_from_slice(chunk);
        if self.newline_position().is_none() && self.buffer.len() > self.max_frame_len {
            let len = self.buffer.len();
            warn!(len, limit = self.max_frame_len, "Dropping oversized stream payload");
            self.buffer.clear();
            self.scanned = 0;
            self.discarding = true;
            return Err(Error::FrameTooLarge {
                len,
                limit: self.max_frame_len,
            });
        }
        Ok(())
    }

    /// Searches only the bytes appended since the last scan.
    fn newline_position(&mut self) -> Option<usize> {
        match self.buffer[self.scanned..].iter().position(|&b| b == b'\n') {
            Some(offset) => Some(self.scanned + offset),
            None => {
                self.scanned = self.buffer.len();
                None
            }
        }
    }

    fn has_complete_frame(&mut self) -> bool {
        self.newline_position().is_some() || (self.finished && !self.buffer.is_empty())
    }

    fn take_frame(&mut self) -> Option<Vec<u8>> {
        if let Some(pos) = self.newline_position() {
            let mut frame: Vec<u8> = self.buffer.drain(..=pos).collect();
            frame.pop();
            self.scanned = 0;
            Some(frame)
        } else if self.finished && !self.buffer.is_empty() {
            self.scanned = 0;
            Some(std::mem::take(&mut self.buffer))
        } else {
            None
        }
    }

    fn requeue(&mut self, mut frame: Vec<u8>) {
        frame.push(b'\n');
        frame.extend_from_slice(&self.buffer);
        self.buffer = frame;
        self.scanned = 0;
    }
}

impl std::fmt::Debug for RecordDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordDecoder")
            .field("pending_bytes", &self.buffer.len())
            .field("max_frame_len", &self.max_frame_len)
            .field("discarding", &self.discarding)
            .field("finished", &self.finished)
            .finish()
    }
}

fn is_keep_alive(frame: &[u8]) -> bool {
    frame.iter().all(u8::is_ascii_whitespace)
}

/// A frame holds either one record or a JSON array of records.
fn decode_frame<R: DeserializeOwned>(frame: &[u8]) -> Result<Vec<R>> {
    let frame = frame.trim_ascii();
    if frame.first() == Some(&b'[') {
        Ok(serde_json::from_slice::<Vec<R>>(frame)?)
    } else {
        Ok(vec![serde_json::from_slice::<R>(frame)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Rec {
        id: u32,
    }

    fn decoder_over(chunks: &[&'static str]) -> RecordDecoder {
        let chunks: Vec<Result<Bytes>> = chunks
            .iter()
            .map(|c| Ok(Bytes::from_static(c.as_bytes())))
            .collect();
        RecordDecoder::new(stream::iter(chunks))
    }

    #[tokio::test]
    async fn test_empty_array_is_not_an_error() {
        let mut decoder = decoder_over(&["[]\n"]);
        let records: Vec<Rec> = decoder.next().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_array_frame_yields_all_records() {
        let mut decoder = decoder_over(&["[{\"id\":1},{\"id\":2}]\n"]);
        let records: Vec<Rec> = decoder.next().await.unwrap();
        assert_eq!(records, vec![Rec { id: 1 }, Rec { id: 2 }]);
    }

    #[tokio::test]
    async fn test_malformed_frame_keeps_decoder_usable() {
        let mut decoder = decoder_over(&["{\n", "{\"id\":7}\n"]);

        let err = decoder.next::<Rec>().await.unwrap_err();
        assert!(err.is_decode_error());

        let records: Vec<Rec> = decoder.next().await.unwrap();
        assert_eq!(records, vec![Rec { id: 7 }]);
    }

    #[tokio::test]
    async fn test_partial_reads_are_reassembled() {
        let mut decoder = decoder_over(&["{\"i", "d\":4", "2}\n"]);

        assert!(decoder.next::<Rec>().await.unwrap().is_empty());
        assert!(decoder.next::<Rec>().await.unwrap().is_empty());
        assert_eq!(decoder.next::<Rec>().await.unwrap(), vec![Rec { id: 42 }]);
        assert_eq!(decoder.pending_bytes(), 0);
    }

    #[tokio::test]
    async fn test_keep_alives_are_skipped() {
        let mut decoder = decoder_over(&["\r\n", "\r\n{\"id\":3}\r\n"]);

        assert!(decoder.next::<Rec>().await.unwrap().is_empty());
        assert_eq!(decoder.next::<Rec>().await.unwrap(), vec![Rec { id: 3 }]);
    }

    #[tokio::test]
    async fn test_records_before_bad_frame_are_kept() {
        let mut decoder = decoder_over(&["{\"id\":1}\nnot json\n{\"id\":2}\n"]);

        assert_eq!(decoder.next::<Rec>().await.unwrap(), vec![Rec { id: 1 }]);
        assert!(decoder.next::<Rec>().await.unwrap_err().is_decode_error());
        assert_eq!(decoder.next::<Rec>().await.unwrap(), vec![Rec { id: 2 }]);
    }

    #[tokio::test]
    async fn test_end_of_body_is_disconnect() {
        let mut decoder = decoder_over(&["{\"id\":1}"]);

        // unterminated trailing frame is decoded once the body ends
        assert!(decoder.next::<Rec>().await.unwrap().is_empty());
        assert_eq!(decoder.next::<Rec>().await.unwrap(), vec![Rec { id: 1 }]);
        assert!(decoder.is_finished());
        assert!(matches!(
            decoder.next::<Rec>().await,
            Err(Error::StreamDisconnected)
        ));
    }

    #[tokio::test]
    async fn test_transport_error_is_propagated() {
        let chunks: Vec<Result<Bytes>> = vec![Err(Error::StreamDisconnected)];
        let mut decoder = RecordDecoder::new(stream::iter(chunks));
        assert!(decoder.next::<Rec>().await.unwrap_err().is_transport_error());
    }

    #[tokio::test]
    async fn test_oversized_frame_is_dropped_and_decoding_resumes() {
        let mut decoder = decoder_over(&["abcdef", "gh", "ij\n{\"id\":1}\n"]).with_max_frame_len(4);

        let err = decoder.next::<Rec>().await.unwrap_err();
        assert!(matches!(err, Error::FrameTooLarge { len: 6, limit: 4 }));
        assert!(err.is_decode_error());
        assert_eq!(decoder.pending_bytes(), 0);

        // tail of the oversized frame is discarded up to its newline
        assert!(decoder.next::<Rec>().await.unwrap().is_empty());
        assert_eq!(decoder.next::<Rec>().await.unwrap(), vec![Rec { id: 1 }]);
    }

    #[tokio::test]
    async fn test_terminated_frame_over_limit_is_decoded() {
        let mut decoder = decoder_over(&["{\"id\":12345}\n"]).with_max_frame_len(4);
        assert_eq!(decoder.next::<Rec>().await.unwrap(), vec![Rec { id: 12345 }]);
    }

    #[tokio::test]
    async fn test_many_small_chunks_are_reassembled() {
        let chunks: Vec<Result<Bytes>> = "{\"id\":9}\n"
            .bytes()
            .map(|b| Ok(Bytes::copy_from_slice(&[b])))
            .collect();
        let mut decoder = RecordDecoder::new(stream::iter(chunks));

        let mut records = Vec::new();
        while records.is_empty() {
            records = decoder.next::<Rec>().await.unwrap();
        }
        assert_eq!(records, vec![Rec { id: 9 }]);
        assert_eq!(decoder.pending_bytes(), 0);
    }

    #[tokio::test]
    async fn test_records_stream() {
        let mut decoder = decoder_over(&["{\"id\":1}\n[{\"id\":2},{\"id\":3}]\n", "bad\n", "\r\n{\"id\":4}\n"]);

        let items: Vec<Result<Rec>> = decoder.records().collect().await;
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].as_ref().unwrap(), &Rec { id: 1 });
        assert_eq!(items[2].as_ref().unwrap(), &Rec { id: 3 });
        assert!(items[3].as_ref().unwrap_err().is_decode_error());
        assert_eq!(items[4].as_ref().unwrap(), &Rec { id: 4 });
    }
}

//! Stream filter parameters and their query-string rendering.

use chrono::{DateTime, SecondsFormat, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// RFC 3986 unreserved characters, plus `,` which separates field lists.
const QUERY_VALUE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b',');

/// Server-side filter applied when a stream session is opened.
///
/// Every field is optional; empty lists and `None` values produce no query
/// parameter at all.
///
/// # Example
///
/// ```
/// use tweetstream_rs::FilterSpec;
///
/// let filter = FilterSpec::new()
///     .with_tweet_fields(["created_at", "lang"])
///     .with_expansions(["author_id"])
///     .with_backfill_minutes(2);
///
/// assert_eq!(
///     filter.query_string(),
///     "backfill_minutes=2&expansions=author_id&tweet.fields=created_at,lang"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// `tweet.fields`
    pub tweet_fields: Vec<String>,
    /// `expansions`
    pub expansions: Vec<String>,
    /// `media.fields`
    pub media_fields: Vec<String>,
    /// `poll.fields`
    pub poll_fields: Vec<String>,
    /// `place.fields`
    pub place_fields: Vec<String>,
    /// `user.fields`
    pub user_fields: Vec<String>,
    /// Minutes of missed records to replay on connect
    pub backfill_minutes: Option<u32>,
    /// Oldest record timestamp to deliver
    pub start_time: Option<DateTime<Utc>>,
    /// Newest record timestamp to deliver
    pub end_time: Option<DateTime<Utc>>,
}

impl FilterSpec {
    /// Create an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tweet fields to include in each record.
    pub fn with_tweet_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tweet_fields = collect(fields);
        self
    }

    /// Set the expansions to include in each record.
    pub fn with_expansions<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expansions = collect(fields);
        self
    }

    /// Set the media fields to include in each record.
    pub fn with_media_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.media_fields = collect(fields);
        self
    }

    /// Set the poll fields to include in each record.
    pub fn with_poll_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.poll_fields = collect(fields);
        self
    }

    /// Set the place fields to include in each record.
    pub fn with_place_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.place_fields = collect(fields);
        self
    }

    /// Set the user fields to include in each record.
    pub fn with_user_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.user_fields = collect(fields);
        self
    }

    /// Replay up to `minutes` of records missed during a disconnect.
    pub fn with_backfill_minutes(mut self, minutes: u32) -> Self {
        self.backfill_minutes = Some(minutes);
        self
    }

    /// Only deliver records created at or after `start`.
    pub fn with_start_time(mut self, start: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self
    }

    /// Only deliver records created at or before `end`.
    pub fn with_end_time(mut self, end: DateTime<Utc>) -> Self {
        self.end_time = Some(end);
        self
    }

    /// Returns `true` if the filter renders no parameters.
    pub fn is_empty(&self) -> bool {
        self.params().is_empty()
    }

    /// Render the filter as a query string, without a leading `?`.
    ///
    /// Parameters are sorted by name and list values keep the caller's
    /// order, so equal filters always render byte-identical strings.
    pub fn query_string(&self) -> String {
        self.params()
            .into_iter()
            .map(|(name, value)| {
                format!("{}={}", name, utf8_percent_encode(&value, QUERY_VALUE_SET))
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Append the rendered query to `endpoint`.
    pub(crate) fn apply_to(&self, endpoint: &str) -> String {
        let query = self.query_string();
        if query.is_empty() {
            endpoint.to_string()
        } else if endpoint.ends_with('?') || endpoint.ends_with('&') {
            format!("{}{}", endpoint, query)
        } else if endpoint.contains('?') {
            format!("{}&{}", endpoint, query)
        } else {
            format!("{}?{}", endpoint, query)
        }
    }

    // Sorted by parameter name.
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(minutes) = self.backfill_minutes {
            params.push(("backfill_minutes", minutes.to_string()));
        }
        if let Some(end) = self.end_time {
            params.push(("end_time", rfc3339(end)));
        }
        push_list(&mut params, "expansions", &self.expansions);
        push_list(&mut params, "media.fields", &self.media_fields);
        push_list(&mut params, "place.fields", &self.place_fields);
        push_list(&mut params, "poll.fields", &self.poll_fields);
        if let Some(start) = self.start_time {
            params.push(("start_time", rfc3339(start)));
        }
        push_list(&mut params, "tweet.fields", &self.tweet_fields);
        push_list(&mut params, "user.fields", &self.user_fields);

        params
    }
}

fn collect<I, S>(fields: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fields.into_iter().map(Into::into).collect()
}

fn push_list(params: &mut Vec<(&'static str, String)>, name: &'static str, values: &[String]) {
    if !values.is_empty() {
        params.push((name, values.join(",")));
    }
}

fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

//! Tweet record schema.
//!
//! These structs mirror the provider's payloads. Every field is defaulted so
//! that payloads carrying only a subset of fields (as selected through
//! [`FilterSpec`](crate::FilterSpec)) still decode.

use serde::{Deserialize, Serialize};

/// A tweet as delivered on the stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tweet {
    /// Tweet ID
    pub id: String,
    /// Tweet text
    pub text: String,
    /// Whether the text was truncated
    pub truncated: bool,
    /// Parsed entities of the text
    pub entities: Entities,
    /// Native media entities
    pub extended_entities: Entities,
    /// Client that posted the tweet
    pub source: String,
    /// ID of the tweet this replies to
    pub in_reply_to_status_id: Option<String>,
    /// ID of the user this replies to
    pub in_reply_to_user_id: Option<String>,
    /// Screen name of the user this replies to
    pub in_reply_to_screen_name: Option<String>,
    /// Author
    pub user: User,
    /// Geographic location
    pub coordinates: Option<Coordinates>,
    /// Tagged place
    pub place: Option<Place>,
    /// Contributor user IDs
    pub contributors: Option<Vec<i64>>,
    /// Whether this is a quote tweet
    pub is_quote_status: bool,
    /// Number of retweets
    pub retweet_count: u64,
    /// Number of likes
    pub favorite_count: u64,
    /// Liked by the authenticating user
    pub favorited: bool,
    /// Retweeted by the authenticating user
    pub retweeted: bool,
    /// Flagged as possibly sensitive
    pub possibly_sensitive: bool,
    /// BCP 47 language tag
    pub lang: Option<String>,
    /// Display range within `text`
    pub display_text_range: Vec<u32>,
    /// Full payload of tweets longer than the legacy limit
    pub extended_tweet: Option<ExtendedTweet>,
    /// ID of the quoted tweet
    pub quoted_status_id: Option<String>,
    /// ID of the quoted tweet, as a string
    pub quoted_status_id_str: Option<String>,
    /// The quoted tweet
    pub quoted_status: Option<Box<Tweet>>,
    /// Permalink of the quoted tweet
    pub quoted_status_permalink: Option<QuotedPermalink>,
    /// The original tweet, for retweets
    pub retweeted_status: Option<Box<Tweet>>,
    /// The authenticating user's retweet of this tweet
    pub current_user_retweet: Option<CurrentUserRetweet>,
}

impl Tweet {
    /// Returns `true` if this tweet is a retweet.
    pub fn is_retweet(&self) -> bool {
        self.retweeted_status.is_some()
    }

    /// The complete text, preferring the extended payload when present.
    pub fn full_text(&self) -> &str {
        self.extended_tweet
            .as_ref()
            .map(|ext| ext.full_text.as_str())
            .filter(|text| !text.is_empty())
            .unwrap_or(&self.text)
    }
}

/// Point coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    /// `[longitude, latitude]`
    pub coordinates: Vec<f64>,
    /// Geometry type, usually `Point`
    #[serde(rename = "type")]
    pub kind: String,
}

/// Extended payload of a long tweet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendedTweet {
    /// Untruncated text
    pub full_text: String,
    /// Display range within `full_text`
    pub display_text_range: Vec<u32>,
    /// Parsed entities of `full_text`
    pub entities: Entities,
    /// Native media entities
    pub extended_entities: Entities,
}

/// Permalink of a quoted tweet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotedPermalink {
    /// Short URL
    pub url: String,
    /// Expanded URL
    pub expanded: String,
    /// Display form
    pub display: String,
}

/// Reference to the authenticating user's retweet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentUserRetweet {
    /// Retweet ID
    pub id: i64,
}

/// Entities parsed out of tweet text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entities {
    /// `#hashtags`
    pub hashtags: Vec<Hashtag>,
    /// Links
    pub urls: Vec<UrlEntity>,
    /// `@mentions`
    #[serde(rename = "user_mentions")]
    pub mentions: Vec<Mention>,
    /// Attached media
    pub media: Vec<Media>,
    /// `$cashtags`
    pub symbols: Vec<Symbol>,
    /// Attached polls
    pub polls: Vec<Poll>,
}

/// A hashtag entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hashtag {
    /// Start/end offsets in the text
    pub indices: Vec<u32>,
    /// Tag without the leading `#`
    pub text: String,
}

/// A cashtag entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Symbol {
    /// Start/end offsets in the text
    pub indices: Vec<u32>,
    /// Symbol without the leading `$`
    pub text: String,
}

/// A link entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlEntity {
    pub indices: Vec<u32>,
    pub url: String,
    pub display_url: String,
    pub expanded_url: String,
    pub unwound_url: Option<String>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub images: Vec<Image>,
    pub video: Option<Video>,
    pub audio: Option<Audio>,
    pub statuses: Vec<i64>,
    pub preview_image: Option<Image>,
}

/// A user mention entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mention {
    pub indices: Vec<u32>,
    pub name: String,
    pub id: i64,
    pub id_str: String,
    pub screen_name: String,
}

/// An attached photo, video or GIF.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Media {
    pub id: i64,
    pub id_str: String,
    pub indices: Vec<u32>,
    pub media_url: String,
    pub media_url_https: String,
    pub url: String,
    pub display_url: String,
    pub expanded_url: String,
    /// `photo`, `video` or `animated_gif`
    #[serde(rename = "type")]
    pub kind: String,
    pub sizes: Sizes,
    pub features: Option<Features>,
    pub video_info: Option<VideoInfo>,
}

/// A poll attached to a tweet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Poll {
    pub id: i64,
    pub options: Vec<PollOption>,
    pub duration_minutes: u32,
    pub end_datetime: String,
    pub voting_status: String,
    pub is_expired: bool,
}

/// One choice of a poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollOption {
    pub position: u32,
    pub label: String,
    pub votes: u64,
}

/// A preview image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Video metadata of a link card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Video {
    pub id: i64,
    pub id_str: String,
    pub duration_ms: u64,
    pub aspect_ratio: Vec<u32>,
    pub url: String,
    pub media_url: String,
    pub media_url_https: String,
    pub preview_image: Option<Image>,
}

/// Audio metadata of a link card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Audio {
    pub id: i64,
    pub id_str: String,
    pub duration_ms: u64,
    pub content_type: String,
    pub url: String,
}

/// Available renditions of a media item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sizes {
    pub thumb: Size,
    pub small: Size,
    pub medium: Size,
    pub large: Size,
}

/// One rendition size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Size {
    pub w: u32,
    pub h: u32,
    /// `fit` or `crop`
    pub resize: String,
}

/// Detected features of a media item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub small: Option<Size>,
    pub medium: Option<Size>,
    pub large: Option<Size>,
    pub orig: Option<Size>,
}

/// Playback information of a video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoInfo {
    pub aspect_ratio: Vec<u32>,
    pub duration_millis: u64,
    pub variants: Vec<Variant>,
}

/// One encoding of a video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Variant {
    pub bitrate: Option<u64>,
    pub content_type: String,
    pub url: String,
}

/// A tweet author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub id_str: String,
    pub name: String,
    pub screen_name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub protected: bool,
    pub verified: bool,
    pub followers_count: u64,
    pub friends_count: u64,
    pub listed_count: u64,
    pub favourites_count: u64,
    pub statuses_count: u64,
    pub created_at: String,
    pub lang: Option<String>,
    pub geo_enabled: bool,
    pub profile_image_url_https: Option<String>,
    pub profile_banner_url: Option<String>,
    pub default_profile: bool,
    pub default_profile_image: bool,
    pub withheld_in_countries: Vec<String>,
    pub withheld_scope: Option<String>,
}

/// A named location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Place {
    pub id: String,
    pub url: String,
    pub place_type: String,
    pub name: String,
    pub full_name: String,
    pub country: String,
    pub country_code: String,
    pub bounding_box: Option<BoundingBox>,
}

/// Polygon enclosing a place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundingBox {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<Vec<Vec<f64>>>,
}

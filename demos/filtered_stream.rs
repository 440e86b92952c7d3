//! Filtered stream example.
//!
//! This example opens the sampled stream with field selection and a short
//! backfill window, then prints tweets as they arrive.
//!
//! Run with: cargo run --example filtered_stream

use chrono::{Duration, Utc};
use tweetstream_rs::models::Tweet;
use tweetstream_rs::{ClientConfig, Error, FilterSpec, StreamClient};

#[tokio::main]
async fn main() -> tweetstream_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Get credentials from environment variables
    let consumer_key = std::env::var("TWITTER_CONSUMER_KEY")
        .expect("TWITTER_CONSUMER_KEY environment variable required");
    let consumer_secret = std::env::var("TWITTER_CONSUMER_SECRET")
        .expect("TWITTER_CONSUMER_SECRET environment variable required");

    let client = StreamClient::connect(ClientConfig::new(consumer_key, consumer_secret)).await?;

    let filter = FilterSpec::new()
        .with_tweet_fields(["created_at", "lang", "author_id"])
        .with_expansions(["author_id"])
        .with_user_fields(["username"])
        .with_start_time(Utc::now() - Duration::minutes(5))
        .with_backfill_minutes(2);

    println!("Opening stream with query: {}", filter.query_string());

    let mut session = client.stream().await?;
    session.filter(&filter).await?;

    println!("\nStreaming tweets (stops after 50)...\n");

    let mut count = 0;
    while count < 50 {
        match session.next::<Tweet>().await {
            Ok(tweets) => {
                for tweet in tweets {
                    count += 1;
                    println!(
                        "[{}] {} ({})",
                        count,
                        tweet.full_text(),
                        tweet.lang.as_deref().unwrap_or("?")
                    );
                }
            }
            Err(e) if e.is_decode_error() => {
                eprintln!("Skipping malformed payload: {e}");
            }
            Err(Error::StreamDisconnected) => {
                println!("Server ended the stream");
                break;
            }
            Err(e) => return Err(e),
        }
    }

    session.close().await?;
    println!("\nDone!");
    Ok(())
}

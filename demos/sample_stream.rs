//! One-shot sample example.
//!
//! This example exchanges the consumer keys for a bearer token and reads the
//! unfiltered sample endpoint once, printing the raw body.
//!
//! Run with: cargo run --example sample_stream

use tweetstream_rs::{ClientConfig, StreamClient};

#[tokio::main]
async fn main() -> tweetstream_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Get credentials from environment variables
    let consumer_key = std::env::var("TWITTER_CONSUMER_KEY")
        .expect("TWITTER_CONSUMER_KEY environment variable required");
    let consumer_secret = std::env::var("TWITTER_CONSUMER_SECRET")
        .expect("TWITTER_CONSUMER_SECRET environment variable required");

    println!("Exchanging consumer keys for a bearer token...");

    let client = StreamClient::connect(ClientConfig::new(consumer_key, consumer_secret)).await?;

    println!("Authenticated!");

    let mut session = client.stream().await?;
    let body = session.sample().await?;

    println!("\nReceived {} bytes:\n", body.len());
    println!("{}", String::from_utf8_lossy(&body));

    session.close().await?;
    println!("\nDone!");
    Ok(())
}

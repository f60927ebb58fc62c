//! Liquid Cache demo
//!
//! Walks through the cache operations against a cache built from the
//! environment configuration, logging each step.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use liquid_cache::{Cache, CacheConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "liquid_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    info!(
        "Configuration loaded: max_size={}B, max_entry_size={}B, default_ttl={}s, purge_interval={}s",
        config.max_size, config.max_entry_size, config.default_ttl, config.purge_interval
    );

    let mut cache: Cache<String> = Cache::new(config).context("failed to create cache")?;

    if cache.set("hello", "world".to_string(), None) {
        let entry = cache.get("hello", false).context("hello was just stored")?;
        info!("Stored hello; configured TTL is {}s", entry.ttl);
    }

    if cache.has_key("hello") {
        info!("Cache has key hello");
    }

    let silent = cache.get("hello", true).context("hello missing")?;
    info!("Silent read of hello: {}", silent.value);

    cache.set("test", "123".to_string(), Some(10));
    let test = cache.get("test", false).context("test missing")?;
    info!("Stored test with TTL {}s, size {}B", test.ttl, test.size);
    info!("Total cache size is {}B", cache.total_size());

    info!("Items in the cache: {}", cache.items());
    cache.reset();
    info!("Items after reset: {}", cache.items());

    info!(stats = ?cache.stats(), "Final statistics");
    cache.shutdown().await;

    Ok(())
}

use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::core::normalize;
use crate::models::StudentPreferences;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Multi-tier cache manager for match results
///
/// Implements L1 (in-memory) and L2 (Redis) caching strategy.
/// L1 is fastest but limited in size, L2 is shared across instances.
/// Matching is deterministic over the tutor pool, so entries stay valid
/// until a tutor changes; writers call [`CacheManager::invalidate_matches`].
///
/// Match keys carry the pool generation read before the pool was fetched.
/// A result computed from a pool that changed mid-request is stored under a
/// generation nobody reads any more.
pub struct CacheManager {
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
    l1_cache: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl CacheManager {
    /// Create a new cache manager
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = redis::aio::ConnectionManager::new(client).await?;

        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
            l1_cache,
            ttl_secs,
        })
    }

    /// Get a value from cache (L1 first, then L2)
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(bytes) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let mut conn = self.redis.lock().await;
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        if let Some(json) = value {
            tracing::trace!("L2 cache hit: {}", key);

            // Populate L1 cache
            self.l1_cache.insert(key.to_string(), json.as_bytes().to_vec()).await;

            return Ok(serde_json::from_str(&json)?);
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Set a value in cache (both L1 and L2)
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        self.l1_cache.insert(key.to_string(), json.as_bytes().to_vec()).await;

        let mut conn = self.redis.lock().await;
        redis::cmd("SETEX")
            .arg(key)
            .arg(self.ttl_secs)
            .arg(json)
            .query_async::<()>(&mut *conn)
            .await?;
        drop(conn);

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Invalidate all cache entries matching a pattern
    pub async fn invalidate_pattern(&self, pattern: &str) -> Result<(), CacheError> {
        // L1 has no pattern lookup, clear it entirely
        self.l1_cache.invalidate_all();

        let mut conn = self.redis.lock().await;
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut *conn)
            .await?;

        if !keys.is_empty() {
            redis::cmd("DEL")
                .arg(keys)
                .query_async::<()>(&mut *conn)
                .await?;
        }

        tracing::debug!("Invalidated cache pattern: {}", pattern);
        Ok(())
    }

    /// Current tutor pool generation, 0 before the first change
    pub async fn generation(&self) -> Result<u64, CacheError> {
        let mut conn = self.redis.lock().await;
        let value: Option<u64> = redis::cmd("GET")
            .arg(CacheKey::GENERATION)
            .query_async(&mut *conn)
            .await?;

        Ok(value.unwrap_or(0))
    }

    /// Move to a new pool generation and drop every cached match result
    pub async fn invalidate_matches(&self) -> Result<(), CacheError> {
        let mut conn = self.redis.lock().await;
        let generation: u64 = redis::cmd("INCR")
            .arg(CacheKey::GENERATION)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        tracing::debug!("Tutor pool generation is now {}", generation);

        self.invalidate_pattern(CacheKey::MATCHES_PATTERN).await
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    pub const MATCHES_PATTERN: &'static str = "matches:*";

    /// Pool generation counter, outside the match pattern so clearing
    /// matches never resets it
    pub const GENERATION: &'static str = "match-generation";

    /// Build a cache key for match results
    ///
    /// Preferences are normalized first, so requests that the engine treats
    /// identically share an entry.
    pub fn matches(generation: u64, preferences: &StudentPreferences) -> String {
        format!(
            "matches:{}:{}|{}|{}",
            generation,
            normalize(&preferences.learning_topic),
            normalize(&preferences.preferred_language),
            normalize(&preferences.time_of_day)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preferences(topic: &str, language: &str, time: &str) -> StudentPreferences {
        StudentPreferences {
            learning_topic: topic.to_string(),
            preferred_language: language.to_string(),
            time_of_day: time.to_string(),
        }
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_cache_set_get() {
        let cache = CacheManager::new("redis://127.0.0.1:6379", 1000, 60)
            .await
            .expect("Failed to create cache");

        let generation = cache.generation().await.unwrap();
        let key = CacheKey::matches(generation, &preferences("Math", "English", "Evening"));
        let value = vec!["tutor-a".to_string()];

        cache.set(&key, &value).await.unwrap();
        let result: Vec<String> = cache.get(&key).await.unwrap();
        assert_eq!(result, value);

        cache.invalidate_matches().await.unwrap();
        assert!(cache.get::<Vec<String>>(&key).await.is_err());
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_result_stored_after_invalidation_is_not_served() {
        let cache = CacheManager::new("redis://127.0.0.1:6379", 1000, 60)
            .await
            .expect("Failed to create cache");
        let prefs = preferences("Chemistry", "Hindi", "Morning");

        // Read before fetching the pool
        let before = cache.generation().await.unwrap();

        // A tutor changes while the ranking is being computed
        cache.invalidate_matches().await.unwrap();

        let stale = vec!["ranking-from-old-pool".to_string()];
        cache.set(&CacheKey::matches(before, &prefs), &stale).await.unwrap();

        let after = cache.generation().await.unwrap();
        assert!(after > before);
        assert!(cache.get::<Vec<String>>(&CacheKey::matches(after, &prefs)).await.is_err());
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(
            CacheKey::matches(3, &preferences("Math", "English", "Evening")),
            "matches:3:math|english|evening"
        );
        assert_eq!(
            CacheKey::matches(0, &preferences("  MATH ", "english", "evening ")),
            CacheKey::matches(0, &preferences("math", "English", "Evening"))
        );
        assert!(CacheKey::matches(0, &preferences("a", "b", "c")).starts_with("matches:"));
    }

    #[test]
    fn test_generation_changes_key() {
        let prefs = preferences("Math", "English", "Evening");
        assert_ne!(CacheKey::matches(1, &prefs), CacheKey::matches(2, &prefs));
        assert!(!CacheKey::GENERATION.starts_with("matches:"));
    }
}

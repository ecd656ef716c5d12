//! Redis semantic cache implementation
//!
//! Backed by RediSearch vector similarity (the `FT.*` command family).
//! Entries are stored as hashes under a namespace prefix with the
//! embedding serialized as little-endian f32 bytes, and expiry is
//! delegated to Redis key TTLs.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, Value};

use crate::domain::{
    CachedImage, DomainError, SemanticCache, SemanticCacheStats, SemanticSearchParams,
    SemanticSearchResult,
};

/// Configuration for the Redis semantic cache
#[derive(Debug, Clone)]
pub struct RedisSemanticCacheConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Key prefix for cache entries and the search index
    pub namespace: String,
    /// Expected embedding vector length
    pub dimensions: usize,
}

impl Default for RedisSemanticCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            namespace: "semantic:image".to_string(),
            dimensions: 1536,
        }
    }
}

impl RedisSemanticCacheConfig {
    /// Creates a new configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the key namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the embedding dimensions
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }
}

/// Redis semantic cache implementation
///
/// Hit and miss counters are tracked per instance; entry counts and
/// expiry come from Redis itself. Evictions are delegated to key
/// expiry and therefore reported as zero.
pub struct RedisSemanticCache {
    connection: ConnectionManager,
    config: RedisSemanticCacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl fmt::Debug for RedisSemanticCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisSemanticCache")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisSemanticCache {
    /// Creates a new Redis semantic cache and ensures the vector index exists
    pub async fn new(config: RedisSemanticCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str()).map_err(|e| {
            DomainError::cache_unavailable(format!("Failed to create Redis client: {}", e))
        })?;

        let connection = ConnectionManager::new(client).await.map_err(|e| {
            DomainError::cache_unavailable(format!("Failed to connect to Redis: {}", e))
        })?;

        let cache = Self {
            connection,
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        };

        cache.ensure_index().await?;

        Ok(cache)
    }

    /// Creates a Redis semantic cache with default configuration
    pub async fn with_url(url: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(RedisSemanticCacheConfig::new(url)).await
    }

    fn index_name(&self) -> String {
        format!("{}:index", self.config.namespace)
    }

    fn entry_key(&self, id: &str) -> String {
        format!("{}:{}", self.config.namespace, id)
    }

    fn check_dimensions(&self, len: usize) -> Result<(), DomainError> {
        if len != self.config.dimensions {
            return Err(DomainError::cache_unavailable(format!(
                "Embedding dimension mismatch: expected {}, got {}",
                self.config.dimensions, len
            )));
        }
        Ok(())
    }

    async fn ensure_index(&self) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        let result = redis::cmd("FT.CREATE")
            .arg(self.index_name())
            .arg("ON")
            .arg("HASH")
            .arg("PREFIX")
            .arg(1)
            .arg(format!("{}:", self.config.namespace))
            .arg("SCHEMA")
            .arg("embedding")
            .arg("VECTOR")
            .arg("FLAT")
            .arg(6)
            .arg("TYPE")
            .arg("FLOAT32")
            .arg("DIM")
            .arg(self.config.dimensions)
            .arg("DISTANCE_METRIC")
            .arg("COSINE")
            .query_async::<()>(&mut conn)
            .await;

        match result {
            Ok(()) => Ok(()),
            // A pre-existing index from an earlier start is fine
            Err(e) if e.to_string().contains("Index already exists") => Ok(()),
            Err(e) => Err(DomainError::cache_unavailable(format!(
                "Failed to create vector index: {}",
                e
            ))),
        }
    }

    async fn scan_keys(&self) -> Result<Vec<String>, DomainError> {
        let mut conn = self.connection.clone();
        let pattern = format!("{}:*", self.config.namespace);

        let mut keys = Vec::new();
        let mut cursor: u64 = 0;

        loop {
            let (new_cursor, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    DomainError::cache_unavailable(format!("Failed to scan keys: {}", e))
                })?;

            keys.extend(batch);

            cursor = new_cursor;
            if cursor == 0 {
                break;
            }
        }

        Ok(keys)
    }
}

#[async_trait]
impl SemanticCache for RedisSemanticCache {
    async fn search(
        &self,
        embedding: &[f32],
        params: &SemanticSearchParams,
    ) -> Result<Vec<SemanticSearchResult>, DomainError> {
        self.check_dimensions(embedding.len())?;

        let mut conn = self.connection.clone();
        let limit = params.limit.max(1);
        let query = format!("*=>[KNN {} @embedding $vec AS score]", limit);

        let reply: Value = redis::cmd("FT.SEARCH")
            .arg(self.index_name())
            .arg(&query)
            .arg("PARAMS")
            .arg(2)
            .arg("vec")
            .arg(encode_embedding(embedding))
            .arg("SORTBY")
            .arg("score")
            .arg("ASC")
            .arg("LIMIT")
            .arg(0)
            .arg(limit)
            .arg("DIALECT")
            .arg(2)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                DomainError::cache_unavailable(format!("Vector search failed: {}", e))
            })?;

        parse_search_reply(reply, params.min_similarity)
    }

    async fn store(&self, entry: CachedImage) -> Result<(), DomainError> {
        self.check_dimensions(entry.embedding().len())?;

        let mut conn = self.connection.clone();
        let key = self.entry_key(entry.id());

        redis::cmd("HSET")
            .arg(&key)
            .arg("id")
            .arg(entry.id())
            .arg("prompt")
            .arg(entry.prompt())
            .arg("url")
            .arg(entry.url())
            .arg("created_at")
            .arg(entry.created_at())
            .arg("expires_at")
            .arg(entry.expires_at())
            .arg("hit_count")
            .arg(entry.hit_count())
            .arg("embedding")
            .arg(encode_embedding(entry.embedding()))
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| {
                DomainError::cache_unavailable(format!("Failed to store entry: {}", e))
            })?;

        redis::cmd("EXPIREAT")
            .arg(&key)
            .arg(entry.expires_at())
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| {
                DomainError::cache_unavailable(format!("Failed to set entry expiry: {}", e))
            })?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let keys = self.scan_keys().await?;

        if !keys.is_empty() {
            let mut conn = self.connection.clone();
            redis::cmd("DEL")
                .arg(&keys)
                .query_async::<()>(&mut conn)
                .await
                .map_err(|e| {
                    DomainError::cache_unavailable(format!("Failed to delete keys: {}", e))
                })?;
        }

        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);

        Ok(())
    }

    async fn stats(&self) -> Result<SemanticCacheStats, DomainError> {
        Ok(SemanticCacheStats {
            total_entries: self.size().await?,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: 0,
        })
    }

    async fn size(&self) -> Result<usize, DomainError> {
        Ok(self.scan_keys().await?.len())
    }

    async fn record_hit(&self, id: &str) -> Result<(), DomainError> {
        self.hits.fetch_add(1, Ordering::Relaxed);

        let mut conn = self.connection.clone();
        let key = self.entry_key(id);

        // Guard so a hit on an entry that just expired does not
        // resurrect it as a stub hash
        let exists: bool = redis::cmd("EXISTS")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                DomainError::cache_unavailable(format!("Failed to check entry: {}", e))
            })?;

        if exists {
            redis::cmd("HINCRBY")
                .arg(&key)
                .arg("hit_count")
                .arg(1)
                .query_async::<()>(&mut conn)
                .await
                .map_err(|e| {
                    DomainError::cache_unavailable(format!("Failed to record hit: {}", e))
                })?;
        }

        Ok(())
    }

    async fn record_miss(&self) -> Result<(), DomainError> {
        self.misses.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Serialize an embedding as little-endian f32 bytes
fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for value in embedding {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

fn decode_embedding(bytes: &[u8]) -> Result<Vec<f32>, DomainError> {
    if bytes.len() % 4 != 0 {
        return Err(DomainError::cache_unavailable(
            "Embedding payload length is not a multiple of 4",
        ));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::BulkString(bytes) => Some(String::from_utf8_lossy(bytes).to_string()),
        Value::SimpleString(s) => Some(s.clone()),
        Value::Int(i) => Some(i.to_string()),
        _ => None,
    }
}

fn value_to_bytes(value: &Value) -> Option<&[u8]> {
    match value {
        Value::BulkString(bytes) => Some(bytes),
        _ => None,
    }
}

/// Collect a flat `[field, value, field, value, ...]` reply into a map
fn fields_to_map(value: &Value) -> Option<HashMap<String, &Value>> {
    let Value::Array(items) = value else {
        return None;
    };

    let mut map = HashMap::new();
    let mut iter = items.iter();

    while let (Some(field), Some(field_value)) = (iter.next(), iter.next()) {
        map.insert(value_to_string(field)?, field_value);
    }

    Some(map)
}

fn parse_document(fields: &Value) -> Result<(CachedImage, f32), DomainError> {
    let map = fields_to_map(fields).ok_or_else(|| {
        DomainError::cache_unavailable("Malformed search reply: expected field array")
    })?;

    let get_string = |name: &str| -> Result<String, DomainError> {
        map.get(name)
            .copied()
            .and_then(value_to_string)
            .ok_or_else(|| {
                DomainError::cache_unavailable(format!(
                    "Malformed search reply: missing '{}'",
                    name
                ))
            })
    };

    let distance: f32 = get_string("score")?.parse().map_err(|_| {
        DomainError::cache_unavailable("Malformed search reply: unparseable score")
    })?;

    let embedding = map
        .get("embedding")
        .copied()
        .and_then(value_to_bytes)
        .ok_or_else(|| {
            DomainError::cache_unavailable("Malformed search reply: missing 'embedding'")
        })
        .and_then(decode_embedding)?;

    let created_at = get_string("created_at")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    let expires_at = get_string("expires_at")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(u64::MAX);
    let hit_count = get_string("hit_count")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);

    let entry = CachedImage::from_parts(
        get_string("id")?,
        embedding,
        get_string("prompt")?,
        get_string("url")?,
        created_at,
        expires_at,
        hit_count,
    );

    Ok((entry, distance))
}

/// Parse an `FT.SEARCH` reply of `[total, key, fields, key, fields, ...]`
///
/// KNN distances come back sorted ascending, which is similarity
/// descending after the `1 - distance` conversion.
fn parse_search_reply(
    reply: Value,
    min_similarity: f32,
) -> Result<Vec<SemanticSearchResult>, DomainError> {
    let Value::Array(items) = reply else {
        return Err(DomainError::cache_unavailable(
            "Malformed search reply: expected array",
        ));
    };

    let mut iter = items.into_iter();

    // Leading element is the total match count
    if iter.next().is_none() {
        return Ok(Vec::new());
    }

    let mut results = Vec::new();

    while let (Some(_key), Some(fields)) = (iter.next(), iter.next()) {
        let (entry, distance) = parse_document(&fields)?;
        let similarity = 1.0 - distance;

        if entry.is_expired() || similarity < min_similarity {
            continue;
        }

        results.push(SemanticSearchResult::new(entry, similarity));
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn bulk(s: &str) -> Value {
        Value::BulkString(s.as_bytes().to_vec())
    }

    fn document_fields(id: &str, score: &str, embedding: &[f32]) -> Value {
        Value::Array(vec![
            bulk("score"),
            bulk(score),
            bulk("id"),
            bulk(id),
            bulk("prompt"),
            bulk("a red bicycle"),
            bulk("url"),
            bulk("https://example/img1.png"),
            bulk("created_at"),
            bulk("1700000000"),
            bulk("expires_at"),
            bulk(&format!("{}", u64::MAX)),
            bulk("hit_count"),
            bulk("0"),
            bulk("embedding"),
            Value::BulkString(encode_embedding(embedding)),
        ])
    }

    #[test]
    fn test_encode_decode_embedding() {
        let embedding = vec![0.25f32, -1.5, 3.75];
        let bytes = encode_embedding(&embedding);

        assert_eq!(bytes.len(), 12);
        assert_eq!(decode_embedding(&bytes).unwrap(), embedding);
    }

    #[test]
    fn test_decode_rejects_truncated_payload() {
        let result = decode_embedding(&[0u8, 1, 2]);
        assert!(matches!(result, Err(DomainError::CacheUnavailable { .. })));
    }

    #[test]
    fn test_parse_search_reply() {
        let reply = Value::Array(vec![
            Value::Int(1),
            bulk("semantic:image:abc"),
            document_fields("abc", "0.05", &[1.0, 0.0]),
        ]);

        let results = parse_search_reply(reply, 0.9).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entry.id(), "abc");
        assert_eq!(results[0].entry.url(), "https://example/img1.png");
        assert!((results[0].similarity - 0.95).abs() < 0.001);
    }

    #[test]
    fn test_parse_search_reply_empty() {
        let reply = Value::Array(vec![Value::Int(0)]);
        let results = parse_search_reply(reply, 0.9).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_parse_filters_below_threshold() {
        let reply = Value::Array(vec![
            Value::Int(2),
            bulk("semantic:image:close"),
            document_fields("close", "0.01", &[1.0, 0.0]),
            bulk("semantic:image:far"),
            document_fields("far", "0.40", &[0.0, 1.0]),
        ]);

        let results = parse_search_reply(reply, 0.95).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entry.id(), "close");
    }

    #[test]
    fn test_parse_skips_expired_entries() {
        let expired_fields = Value::Array(vec![
            bulk("score"),
            bulk("0.01"),
            bulk("id"),
            bulk("old"),
            bulk("prompt"),
            bulk("a red bicycle"),
            bulk("url"),
            bulk("https://example/old.png"),
            bulk("created_at"),
            bulk("1000"),
            bulk("expires_at"),
            bulk("1001"),
            bulk("hit_count"),
            bulk("0"),
            bulk("embedding"),
            Value::BulkString(encode_embedding(&[1.0, 0.0])),
        ]);

        let reply = Value::Array(vec![Value::Int(1), bulk("semantic:image:old"), expired_fields]);

        let results = parse_search_reply(reply, 0.5).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_reply() {
        let result = parse_search_reply(Value::Okay, 0.9);
        assert!(matches!(result, Err(DomainError::CacheUnavailable { .. })));
    }

    #[test]
    fn test_parse_rejects_document_without_url() {
        let fields = Value::Array(vec![
            bulk("score"),
            bulk("0.01"),
            bulk("id"),
            bulk("abc"),
            bulk("embedding"),
            Value::BulkString(encode_embedding(&[1.0, 0.0])),
        ]);

        let reply = Value::Array(vec![Value::Int(1), bulk("semantic:image:abc"), fields]);

        let result = parse_search_reply(reply, 0.5);
        assert!(matches!(result, Err(DomainError::CacheUnavailable { .. })));
    }

    #[test]
    fn test_config_builders() {
        let config = RedisSemanticCacheConfig::new("redis://localhost:6380")
            .with_namespace("test:images")
            .with_dimensions(4);

        assert_eq!(config.url, "redis://localhost:6380");
        assert_eq!(config.namespace, "test:images");
        assert_eq!(config.dimensions, 4);
    }

    // The tests below require a running Redis Stack instance
    // Run with: cargo test -- --ignored

    fn get_test_config(namespace: &str) -> RedisSemanticCacheConfig {
        RedisSemanticCacheConfig::new("redis://127.0.0.1:6379")
            .with_namespace(namespace)
            .with_dimensions(4)
    }

    fn create_entry(id: &str, embedding: Vec<f32>) -> CachedImage {
        CachedImage::new(
            id,
            embedding,
            format!("prompt for {}", id),
            format!("https://example/{}.png", id),
            Duration::from_secs(60),
        )
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_store_and_search() {
        let cache = RedisSemanticCache::new(get_test_config("test:semimg:search"))
            .await
            .unwrap();
        cache.clear().await.unwrap();

        cache
            .store(create_entry("entry-1", vec![1.0, 0.0, 0.0, 0.0]))
            .await
            .unwrap();

        let params = SemanticSearchParams::new(0.9);
        let results = cache
            .search(&[1.0, 0.0, 0.0, 0.0], &params)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entry.id(), "entry-1");
        assert!(results[0].similarity > 0.99);

        cache.clear().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_threshold_filters_dissimilar() {
        let cache = RedisSemanticCache::new(get_test_config("test:semimg:threshold"))
            .await
            .unwrap();
        cache.clear().await.unwrap();

        cache
            .store(create_entry("orthogonal", vec![0.0, 1.0, 0.0, 0.0]))
            .await
            .unwrap();

        let params = SemanticSearchParams::new(0.95);
        let results = cache
            .search(&[1.0, 0.0, 0.0, 0.0], &params)
            .await
            .unwrap();

        assert!(results.is_empty());

        cache.clear().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_clear_and_size() {
        let cache = RedisSemanticCache::new(get_test_config("test:semimg:clear"))
            .await
            .unwrap();
        cache.clear().await.unwrap();

        cache
            .store(create_entry("entry-1", vec![1.0, 0.0, 0.0, 0.0]))
            .await
            .unwrap();
        cache
            .store(create_entry("entry-2", vec![0.0, 1.0, 0.0, 0.0]))
            .await
            .unwrap();

        assert_eq!(cache.size().await.unwrap(), 2);

        cache.clear().await.unwrap();
        assert_eq!(cache.size().await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_record_hit() {
        let cache = RedisSemanticCache::new(get_test_config("test:semimg:hits"))
            .await
            .unwrap();
        cache.clear().await.unwrap();

        cache
            .store(create_entry("entry-1", vec![1.0, 0.0, 0.0, 0.0]))
            .await
            .unwrap();

        cache.record_hit("entry-1").await.unwrap();
        cache.record_miss().await.unwrap();

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);

        cache.clear().await.unwrap();
    }
}

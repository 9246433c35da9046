/// Read-through caching over [`Cache`](crate::db::Cache).
///
/// Returns the cached value for `$key` when present. Otherwise awaits
/// `$block`, queues its value for a background write with `$ttl` seconds to
/// live, and returns it. Both the lookup and `$block` propagate errors with
/// `?`, so the macro must be used inside a function returning `AppResult`.
///
/// # Example
/// ```rust,ignore
/// let reading: WeatherReading = cached!(self.cache, CacheKey::Weather(loc), 1800, async {
///     self.fetch_current(loc).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        if let Some(hit) = $cache.get(&key).await? {
            tracing::debug!(key = %key, "Cache hit");
            Ok(hit)
        } else {
            tracing::debug!(key = %key, "Cache miss");
            let value = $block.await?;
            $cache.set_in_background(&key, &value, $ttl);
            Ok(value)
        }
    }};
}

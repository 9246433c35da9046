pub mod postgres;
pub mod redis;
pub mod repository;

pub use postgres::{create_pool, run_migrations, PgWardrobeRepository};
pub use redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
#[cfg(test)]
pub use repository::MockWardrobeRepository;
pub use repository::{InMemoryWardrobeRepository, WardrobeRepository};

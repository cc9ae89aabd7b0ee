mod access_token_cache_redis;

pub use access_token_cache_redis::*;

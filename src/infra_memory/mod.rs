mod access_token_cache_memory;
mod session_store_memory;

pub use access_token_cache_memory::*;
pub use session_store_memory::*;

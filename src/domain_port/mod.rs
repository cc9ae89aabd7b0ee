mod access_token_cache;
mod identity_provider;
mod session_store;

pub use access_token_cache::*;
pub use identity_provider::*;
pub use session_store::*;

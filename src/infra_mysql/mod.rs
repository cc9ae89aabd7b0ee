mod identity_provider_mysql;
mod session_store_mysql;

pub use identity_provider_mysql::*;
pub use session_store_mysql::*;

mod util;

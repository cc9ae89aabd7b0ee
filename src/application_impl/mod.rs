mod auth_service_impl;
mod identity_provider_fake;
mod token_codec_rs256;

pub use auth_service_impl::*;
pub use identity_provider_fake::*;
pub use token_codec_rs256::*;

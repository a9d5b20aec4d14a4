mod access_token_codec;
mod auth_service_impl;
mod credential_hasher_argon2;
mod refresh_token_minter;
mod store_timeout;
mod token_service_impl;

pub mod token_codec;

pub use access_token_codec::*;
pub use auth_service_impl::*;
pub use credential_hasher_argon2::*;
pub use refresh_token_minter::*;
pub use store_timeout::*;
pub use token_service_impl::*;

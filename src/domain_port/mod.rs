// store

mod refresh_token_repo;

pub use refresh_token_repo::*;

// repo

mod credential_repo;

pub use credential_repo::*;

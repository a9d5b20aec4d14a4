mod credential_repo_memory;
mod refresh_token_repo_memory;

pub use credential_repo_memory::*;
pub use refresh_token_repo_memory::*;

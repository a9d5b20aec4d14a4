mod secret;
mod token;
mod user;

pub use secret::*;
pub use token::*;
pub use user::*;

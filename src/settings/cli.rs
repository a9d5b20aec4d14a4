use super::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "parley", version, about = "Token and credential operations for parley")]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Hash a password with the configured Argon2id cost
    HashPassword { password: String },
    VerifyPassword { password: String, hash: String },
    /// Issue an access/refresh pair for a subject
    Issue { subject: String },
    /// Validate either kind of token
    Validate { token: String },
    ValidateAccess { token: String },
    ValidateRefresh { token: String },
    ExtractSubject { token: String },
    /// Exchange a refresh token for a new access token
    Refresh { token: String },
    Revoke { token: String },
    Register {
        identifier: String,
        display_name: String,
        password: String,
    },
    Login { identifier: String, password: String },
}

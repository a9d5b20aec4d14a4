use parley::app::App;
use parley::application_port::*;
use parley::domain_model::UserId;
use parley::logger::*;
use parley::settings::*;
use serde_json::{Value, json};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    debug!(?project_settings);
    logger.reload_from_config(&LogConfig::from(&project_settings.log))?;

    let app = App::try_new(&project_settings).await?;
    let result = run(&app, cli.command).await;
    app.shutdown().await;

    println!("{}", serde_json::to_string_pretty(&result?)?);
    Ok(())
}

async fn run(app: &App, command: Command) -> anyhow::Result<Value> {
    let out = match command {
        Command::HashPassword { password } => {
            let hash = app.credential_hasher.hash_password(&password).await?;
            json!({ "hash": hash })
        }
        Command::VerifyPassword { password, hash } => {
            let ok = app.credential_hasher.verify_password(&password, &hash).await;
            json!({ "ok": ok })
        }
        Command::Issue { subject } => {
            let tokens = app.token_service.issue_token_pair(&UserId(subject)).await?;
            serde_json::to_value(&tokens)?
        }
        Command::Validate { token } => {
            let valid = app.token_service.validate_token(&token).await?;
            json!({ "valid": valid })
        }
        Command::ValidateAccess { token } => {
            let valid = app.token_service.validate_access_token(&token).await;
            json!({ "valid": valid })
        }
        Command::ValidateRefresh { token } => {
            let valid = app.token_service.validate_refresh_token(&token).await?;
            json!({ "valid": valid })
        }
        Command::ExtractSubject { token } => match app.token_service.extract_subject(&token).await {
            Some(subject) => json!({ "ok": true, "subject": subject }),
            None => json!({ "ok": false }),
        },
        Command::Refresh { token } => match app.token_service.refresh_access_token(&token).await? {
            Some(access) => json!({ "ok": true, "access": access }),
            None => json!({ "ok": false }),
        },
        Command::Revoke { token } => {
            app.token_service.revoke_refresh_token(&token).await?;
            json!({ "revoked": true })
        }
        Command::Register {
            identifier,
            display_name,
            password,
        } => {
            let result = app
                .auth_service
                .register(RegisterInput {
                    identifier,
                    display_name,
                    password,
                })
                .await?;
            serde_json::to_value(&result)?
        }
        Command::Login {
            identifier,
            password,
        } => {
            let result = app
                .auth_service
                .login(LoginInput {
                    identifier,
                    password,
                })
                .await?;
            serde_json::to_value(&result)?
        }
    };
    Ok(out)
}

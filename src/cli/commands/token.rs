use clap::Subcommand;
use serde_json::json;

use crate::auth::TokenService;
use crate::cli::{open_database, utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database::UserRepository;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue a bearer token for an existing user")]
    Issue {
        #[arg(help = "User id")]
        user_id: i64,
    },
}

pub async fn handle(cmd: TokenCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { user_id } => {
            let pool = open_database(config).await?;
            let user = UserRepository::new(pool)
                .find_by_id(user_id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("User {} not found", user_id))?;

            let tokens = TokenService::from_config(&config.security);
            let token = tokens.issue(user.id)?;

            match output_format {
                OutputFormat::Text => println!("{}", token),
                OutputFormat::Json => output_success(
                    &output_format,
                    &format!("Issued token for {}", user.email),
                    Some(json!({
                        "token": token,
                        "user_id": user.id,
                        "expires_in_hours": tokens.ttl().num_hours(),
                    })),
                )?,
            }
            Ok(())
        }
    }
}

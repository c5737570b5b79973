//! Token command - mints owner JWTs for local development

use clap::Args;

use crate::config::AppConfig;
use crate::domain::api_key::OwnerId;
use crate::infrastructure::auth::MAX_TOKEN_HOURS;

#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Owner identity to put in the `sub` claim
    #[arg(long)]
    pub owner: String,

    /// Token lifetime in hours (defaults to auth.token_expiration_hours)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_TOKEN_HOURS))]
    pub hours: Option<u64>,
}

/// Print a signed owner token to stdout
pub fn run(args: TokenArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let token = mint_token(&config, &args)?;

    println!("{}", token);

    Ok(())
}

fn mint_token(config: &AppConfig, args: &TokenArgs) -> anyhow::Result<String> {
    if config.auth.jwt_secret.is_none() {
        anyhow::bail!("auth.jwt_secret or the JWT_SECRET environment variable is required");
    }

    let owner = OwnerId::new(args.owner.clone())?;
    let hours = args.hours.unwrap_or(config.auth.token_expiration_hours);
    let jwt = crate::create_jwt_service(config);

    Ok(jwt.generate_with_expiration(&owner, hours)?)
}

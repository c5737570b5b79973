//! CLI module for the API key dashboard
//!
//! Subcommands:
//! - `serve`: run the HTTP server
//! - `migrate`: apply database migrations and exit
//! - `token`: mint a development owner token

pub mod migrate;
pub mod serve;
pub mod token;

use clap::{Parser, Subcommand};

/// API key dashboard backend
#[derive(Parser)]
#[command(name = "api-key-dashboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Mint an owner JWT for local development
    Token(token::TokenArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_command() {
        let cli = Cli::try_parse_from(["api-key-dashboard", "token", "--owner", "user-1"]).unwrap();

        match cli.command {
            Command::Token(args) => {
                assert_eq!(args.owner, "user-1");
                assert!(args.hours.is_none());
            }
            _ => panic!("expected token command"),
        }
    }

    #[test]
    fn test_parse_token_hours_range() {
        let cli = Cli::try_parse_from([
            "api-key-dashboard",
            "token",
            "--owner",
            "user-1",
            "--hours",
            "48",
        ])
        .unwrap();

        match cli.command {
            Command::Token(args) => assert_eq!(args.hours, Some(48)),
            _ => panic!("expected token command"),
        }

        for hours in ["0", "87601", "18446744073709551615"] {
            assert!(
                Cli::try_parse_from([
                    "api-key-dashboard",
                    "token",
                    "--owner",
                    "user-1",
                    "--hours",
                    hours,
                ])
                .is_err(),
                "--hours {} should be rejected",
                hours
            );
        }
    }

    #[test]
    fn test_parse_serve_and_migrate() {
        assert!(matches!(
            Cli::try_parse_from(["api-key-dashboard", "serve"]).unwrap().command,
            Command::Serve
        ));
        assert!(matches!(
            Cli::try_parse_from(["api-key-dashboard", "migrate"]).unwrap().command,
            Command::Migrate
        ));
        assert!(Cli::try_parse_from(["api-key-dashboard", "token"]).is_err());
    }
}

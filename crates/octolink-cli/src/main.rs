//! octolink CLI - GitHub OAuth from the terminal.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use octolink_cli::commands::{self, ExchangeArgs, LoginUrlArgs, RefreshArgs};
use octolink_cli::config::ProjectConfig;
use octolink_cli::{env, exit_codes};
use octolink_github::{HttpConnection, OauthClient};

/// octolink CLI
#[derive(Parser)]
#[command(name = "octolink")]
#[command(about = "GitHub OAuth login, device flow and token renewal", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output in JSON format
    #[arg(long, short = 'j', global = true)]
    json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// API base address (overrides OCTOLINK_BASE_URL and .octolink.yaml)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Print the URL that starts the web application flow
    LoginUrl {
        /// OAuth app client id
        #[arg(long)]
        client_id: Option<String>,
        /// Redirect URI registered for the app
        #[arg(long)]
        redirect_uri: Option<String>,
        /// Suggested account to sign in with
        #[arg(long)]
        login: Option<String>,
        /// Scope to request (repeatable)
        #[arg(long = "scope")]
        scopes: Vec<String>,
        /// Opaque value echoed back to the redirect URI
        #[arg(long)]
        state: Option<String>,
        /// Whether users may sign up during the flow
        #[arg(long)]
        allow_signup: Option<bool>,
    },
    /// Exchange an authorization code for an access token
    Exchange {
        /// OAuth app client id
        #[arg(long)]
        client_id: Option<String>,
        /// OAuth app client secret
        #[arg(long)]
        client_secret: Option<String>,
        /// Code received on the redirect URI
        #[arg(long)]
        code: String,
        /// Redirect URI used for the login URL
        #[arg(long)]
        redirect_uri: Option<String>,
    },
    /// Authorize through the device flow and print the token
    Device {
        /// OAuth app client id
        #[arg(long)]
        client_id: Option<String>,
        /// Scope to request (repeatable)
        #[arg(long = "scope")]
        scopes: Vec<String>,
    },
    /// Renew an expiring access token
    Refresh {
        /// OAuth app client id
        #[arg(long)]
        client_id: Option<String>,
        /// OAuth app client secret
        #[arg(long)]
        client_secret: Option<String>,
        /// Refresh token issued with the previous access token
        #[arg(long)]
        refresh_token: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    let json = cli.json;
    if let Err(error) = run(cli).await {
        exit_codes::exit_with_error(&error, json);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let project = ProjectConfig::discover()?;
    let base_url = env::resolve(cli.base_url, env::get_base_url_from_env(), None);
    let connection = HttpConnection::new(project.connection_config(base_url.as_deref())?)
        .context("Failed to build HTTP client")?;
    let client = OauthClient::new(connection);

    let output = match cli.command {
        Commands::LoginUrl {
            client_id,
            redirect_uri,
            login,
            scopes,
            state,
            allow_signup,
        } => {
            let args = LoginUrlArgs {
                client_id: client_id_for(client_id, &project)?,
                redirect_uri,
                login,
                scopes,
                state,
                allow_signup,
            };
            commands::login_url(&client, &project, args, cli.json)?
        }
        Commands::Exchange {
            client_id,
            client_secret,
            code,
            redirect_uri,
        } => {
            let args = ExchangeArgs {
                client_id: client_id_for(client_id, &project)?,
                client_secret: client_secret_for(client_secret)?,
                code,
                redirect_uri,
            };
            commands::exchange(&client, &project, args, cli.json).await?
        }
        Commands::Device { client_id, scopes } => {
            let client_id = client_id_for(client_id, &project)?;
            commands::device(&client, &project, client_id, scopes, cli.json).await?
        }
        Commands::Refresh {
            client_id,
            client_secret,
            refresh_token,
        } => {
            let args = RefreshArgs {
                client_id: client_id_for(client_id, &project)?,
                client_secret: client_secret_for(client_secret)?,
                refresh_token,
            };
            commands::refresh(&client, args, cli.json).await?
        }
    };

    println!("{}", output);
    Ok(())
}

fn client_id_for(flag: Option<String>, project: &ProjectConfig) -> Result<String> {
    commands::require_client_id(flag, env::get_client_id_from_env(), project)
}

fn client_secret_for(flag: Option<String>) -> Result<String> {
    commands::require_client_secret(flag, env::get_client_secret_from_env())
}

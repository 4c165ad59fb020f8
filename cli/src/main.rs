//! `portal-cli`: sign in and inspect fiduciary records from a terminal.
//!
//! Drives the same session controller as the browser client, with the
//! session kept in a JSON file and HTTP over `reqwest`.

mod file_storage;
mod transport;


use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use portal::{ApiClient, ApiConfig, ApiError, AuthError, SessionController, UserKind};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::file_storage::FileStorage;
use crate::transport::ReqwestTransport;

type CliSession = SessionController<FileStorage, ReqwestTransport>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not signed in; run `portal-cli login` first")]
    NotSignedIn,
    #[error("session expired; run `portal-cli login` again")]
    SessionExpired,
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("http client setup failed: {0}")]
    Client(#[from] reqwest::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "portal-cli", about = "Consent portal session and records CLI")]
struct Cli {
    #[arg(long, env = "PORTAL_API_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "PORTAL_API_PREFIX")]
    api_prefix: Option<String>,

    #[arg(long, env = "PORTAL_REQUEST_TIMEOUT_SECS")]
    timeout_secs: Option<String>,

    #[arg(long, env = "PORTAL_SESSION_FILE", default_value = ".portal-session.json")]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn config(&self) -> ApiConfig {
        ApiConfig::from_values(self.base_url.as_deref(), self.api_prefix.as_deref(), self.timeout_secs.as_deref())
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session.
    Login(LoginArgs),
    /// Sign out and forget the stored session.
    Logout,
    /// Print the signed-in identity.
    Whoami,
    Purposes(ListCommand),
    ConsentForms(ListCommand),
    Dsr(ListCommand),
    Grievances(ListCommand),
    AuditLogs(ListCommand),
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,

    #[arg(long, env = "PORTAL_PASSWORD", hide_env_values = true)]
    password: String,

    /// `user` or `fiduciary`.
    #[arg(long, default_value = "user")]
    kind: UserKind,
}

#[derive(Args, Debug)]
struct ListCommand {
    #[command(subcommand)]
    command: ListSubcommand,
}

#[derive(Subcommand, Debug)]
enum ListSubcommand {
    List,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginSummary<'a> {
    kind: UserKind,
    landing_path: &'a str,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    let session = SessionController::new(
        FileStorage::new(&cli.session_file),
        ApiClient::new(ReqwestTransport::new(&config)?, &config),
    );
    run(&session, cli.command).await
}

async fn run(session: &CliSession, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login(args) => {
            let landing_path = session.login(&args.email, &args.password, args.kind).await?;
            print_json(&LoginSummary { kind: args.kind, landing_path })
        }
        Command::Logout => {
            session.logout().await;
            eprintln!("signed out");
            Ok(())
        }
        Command::Whoami => {
            restore(session).await?;
            let state = session.state();
            let identity = state.identity().ok_or(CliError::NotSignedIn)?;
            print_json(identity)
        }
        Command::Purposes(ListCommand { command: ListSubcommand::List }) => {
            let token = restore(session).await?;
            let records = authorized(session, &token, session.api().list_purposes(&token).await)?;
            print_json(&records)
        }
        Command::ConsentForms(ListCommand { command: ListSubcommand::List }) => {
            let token = restore(session).await?;
            let records = authorized(session, &token, session.api().list_consent_forms(&token).await)?;
            print_json(&records)
        }
        Command::Dsr(ListCommand { command: ListSubcommand::List }) => {
            let token = restore(session).await?;
            let records = authorized(session, &token, session.api().list_dsr_requests(&token).await)?;
            print_json(&records)
        }
        Command::Grievances(ListCommand { command: ListSubcommand::List }) => {
            let token = restore(session).await?;
            let records = authorized(session, &token, session.api().list_grievances(&token).await)?;
            print_json(&records)
        }
        Command::AuditLogs(ListCommand { command: ListSubcommand::List }) => {
            let token = restore(session).await?;
            let records = authorized(session, &token, session.api().list_audit_logs(&token).await)?;
            print_json(&records)
        }
    }
}

/// Verify the stored session with the backend and return its token.
async fn restore(session: &CliSession) -> Result<String, CliError> {
    session.initialize().await;
    let state = session.state();
    if let Some(error) = state.error.filter(|_| state.check_failed) {
        tracing::warn!(%error, "stored session rejected");
        return Err(CliError::SessionExpired);
    }
    session.credentials().map(|(_, token)| token).ok_or(CliError::NotSignedIn)
}

/// A 401 drops the stored session before reporting.
fn authorized<T>(session: &CliSession, token: &str, result: Result<T, ApiError>) -> Result<T, CliError> {
    result.map_err(|e| {
        if session.handle_unauthorized(&e, token, "").is_some() { CliError::SessionExpired } else { CliError::Api(e) }
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

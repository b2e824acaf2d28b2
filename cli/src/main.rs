mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::{Args, Parser, Subcommand};
use session::config::DEFAULT_API_URL;
use session::guard::{self, ACCESS_DENIED_MESSAGE};
use session::store::FileBackend;
use session::validation::RegistrationForm;
use session::{
    Access, ApiClient, ApiError, AuthSession, ClientConfig, Role, SessionState, SessionStore, UnauthorizedHook,
    UserDirectory, admin,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not signed in; run `authdash login <username>`")]
    NotSignedIn,
    #[error("{}", ACCESS_DENIED_MESSAGE)]
    AccessDenied,
    #[error("session is still loading")]
    Loading,
    #[error("{0}")]
    Invalid(#[from] session::validation::ValidationError),
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "authdash", about = "Sign in to the auth backend and manage users")]
struct Cli {
    #[arg(long, env = "AUTH_API_URL", default_value = DEFAULT_API_URL)]
    base_url: String,

    /// File holding the bearer token between runs.
    #[arg(long, env = "AUTH_TOKEN_FILE", default_value = ".authdash-token")]
    token_file: PathBuf,

    /// Print JSON instead of tables.
    #[arg(long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        username: String,
        #[arg(long, env = "AUTH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register {
        username: String,
        email: String,
        #[arg(long, env = "AUTH_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to `--password` when omitted.
        #[arg(long)]
        confirm: Option<String>,
    },
    Logout,
    Whoami,
    Users(UsersCommand),
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List,
    Role { user_id: i64, role: Role },
    Delete { user_id: i64 },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let session = open_session(&cli)?;
    session.bootstrap().await;

    match cli.command {
        Command::Login { username, password } => {
            session
                .login(&username, &password)
                .await
                .map_err(|e| session_failure(&session, e))?;
            print_profile(&session, cli.json)
        }
        Command::Register { username, email, password, confirm } => {
            let form = RegistrationForm {
                confirm_password: confirm.unwrap_or_else(|| password.clone()),
                username,
                email,
                password,
            };
            form.validate()?;
            session
                .register(&form.username, &form.email, &form.password)
                .await
                .map_err(|e| session_failure(&session, e))?;
            print_profile(&session, cli.json)
        }
        Command::Logout => {
            session.logout();
            println!("signed out");
            Ok(())
        }
        Command::Whoami => print_profile(&session, cli.json),
        Command::Users(users) => run_users(&session, users, cli.json).await,
    }
}

fn open_session(cli: &Cli) -> Result<AuthSession, CliError> {
    let store = Arc::new(SessionStore::new(FileBackend::new(&cli.token_file)));
    let config = ClientConfig {
        timeouts: ClientConfig::from_env().timeouts,
        ..ClientConfig::with_base_url(&cli.base_url)
    };
    let had_session = AtomicBool::new(store.has_token());
    let on_unauthorized: UnauthorizedHook = Arc::new(move || {
        if let Some(notice) = render::expired_notice(had_session.swap(false, Ordering::SeqCst)) {
            eprintln!("{notice}");
        }
    });
    let api = ApiClient::new(config, store, on_unauthorized)?;
    Ok(AuthSession::new(api))
}

/// Terminal rendering of the access guard.
fn require(session: &AuthSession, role: Role) -> Result<SessionState, CliError> {
    let state = session.state();
    match guard::check(&state, role) {
        Access::Granted => Ok(state),
        Access::Loading => Err(CliError::Loading),
        Access::RedirectToLogin => Err(CliError::NotSignedIn),
        Access::Denied => Err(CliError::AccessDenied),
    }
}

fn session_failure(session: &AuthSession, err: ApiError) -> CliError {
    match session.state().error() {
        Some(message) => CliError::Rejected(message.to_owned()),
        None => CliError::Api(err),
    }
}

fn print_profile(session: &AuthSession, json: bool) -> Result<(), CliError> {
    let state = require(session, Role::User)?;
    let Some(user) = state.user() else {
        return Err(CliError::NotSignedIn);
    };
    if json {
        println!("{}", serde_json::to_string_pretty(user)?);
    } else {
        println!("{}", render::profile(user));
    }
    Ok(())
}

async fn run_users(session: &AuthSession, users: UsersCommand, json: bool) -> Result<(), CliError> {
    let state = require(session, Role::Admin)?;
    let mut directory = UserDirectory::new(state.user().map(|u| u.id));
    directory
        .refresh(session.api())
        .await
        .map_err(|e| CliError::Rejected(e.message_or(admin::FETCH_FAILED)))?;

    match users.command {
        UsersSubcommand::List => {
            if json {
                println!("{}", serde_json::to_string_pretty(directory.users())?);
            } else {
                println!("{}", render::user_table(&directory));
            }
        }
        UsersSubcommand::Role { user_id, role } => {
            directory
                .change_role(session.api(), user_id, role)
                .await
                .map_err(|e| CliError::Rejected(e.message_or(admin::ROLE_UPDATE_FAILED)))?;
            println!("{}", admin::ROLE_UPDATED);
        }
        UsersSubcommand::Delete { user_id } => {
            directory
                .delete(session.api(), user_id)
                .await
                .map_err(|e| CliError::Rejected(e.message_or(admin::DELETE_FAILED)))?;
            println!("{}", admin::USER_DELETED);
        }
    }
    Ok(())
}

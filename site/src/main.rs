use clap::{Parser, Subcommand};
use axum::{ServiceExt, extract::Request};
use site::api::{AppState, app_service};
use site::auth::Auth;
use site::config::Config;
use site::entity::user::Role;
use site::store::Store;
use std::path::PathBuf;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "site", about = "Rommelaere Rénov site backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Insert the starter content into empty tables
    Seed,
    /// Dump all public content as JSON
    Export {
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Manage login accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new account
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue)]
        admin: bool,
    },
    /// Overwrite the password of an existing account
    ResetPassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Init structured logging (respects RUST_LOG; defaults to info)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Load .env if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env();

    // A missing or unreachable database is not fatal: the site still serves.
    let store = Store::connect(config.database_url.as_deref()).await;

    match cli.command {
        None | Some(Commands::Serve) => serve(store, config).await?,
        Some(Commands::Seed) => {
            require_database(&store)?;
            let report = site::seed::seed(&store).await?;
            tracing::info!(
                services = report.services,
                projects = report.projects,
                project_images = report.project_images,
                about_sections = report.about_sections,
                team_members = report.team_members,
                contact_info = report.contact_info,
                "Seed complete"
            );
        }
        Some(Commands::Export { out }) => {
            require_database(&store)?;
            let doc = site::seed::export(&store).await?;
            let json = serde_json::to_string_pretty(&doc)?;
            match out {
                Some(path) => {
                    tokio::fs::write(&path, json).await?;
                    tracing::info!(path = %path.display(), "Content exported");
                }
                None => println!("{json}"),
            }
        }
        Some(Commands::User { action }) => {
            require_database(&store)?;
            handle_user_action(Auth::new(store), action).await?;
        }
    }

    Ok(())
}

fn require_database(store: &Store) -> Result<(), Box<dyn std::error::Error>> {
    if !store.is_available() {
        return Err("this command needs a reachable database; check DATABASE_URL".into());
    }
    Ok(())
}

async fn serve(store: Store, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(store, config);
    let config = state.config.clone();

    // First-run admin account
    if state.store.is_available() {
        if let Err(e) = state
            .auth
            .ensure_admin(
                &config.admin_email,
                &config.admin_password,
                config.uses_default_admin_password(),
            )
            .await
        {
            tracing::error!(error = %e, "Failed to bootstrap admin account");
        }
    } else {
        tracing::warn!("Database unavailable; admin login disabled until it is configured.");
    }

    let listener = bind_with_fallback(&config.host, config.port, config.port_attempts).await?;
    let addr = listener.local_addr()?;
    tracing::info!(addr = %addr, "Site online");

    let app = ServiceExt::<Request>::into_make_service(app_service(state));
    axum::serve(listener, app).await?;
    Ok(())
}

/// Bind `host:port`, moving on to the next port while the current one is taken.
async fn bind_with_fallback(
    host: &str,
    port: u16,
    attempts: u16,
) -> Result<TcpListener, Box<dyn std::error::Error>> {
    let mut last_err = None;
    for offset in 0..attempts.max(1) {
        let Some(candidate) = port.checked_add(offset) else {
            break;
        };
        match TcpListener::bind((host, candidate)).await {
            Ok(listener) => {
                if offset > 0 {
                    tracing::warn!(requested = port, port = candidate, "Requested port busy; using fallback");
                }
                return Ok(listener);
            }
            Err(e) => {
                tracing::debug!(port = candidate, error = %e, "Port unavailable");
                last_err = Some(e);
            }
        }
    }
    Err(format!(
        "no free port in {port}..{} on {host}: {}",
        port.saturating_add(attempts),
        last_err.map(|e| e.to_string()).unwrap_or_default()
    )
    .into())
}

async fn handle_user_action(auth: Auth, action: UserAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        UserAction::Create {
            email,
            password,
            name,
            admin,
        } => {
            let role = if admin { Role::Admin } else { Role::User };
            let user = auth.create_user(&email, &password, name, role).await?;
            tracing::info!(id = user.id, email = %email, role = ?role, "Created user");
        }
        UserAction::ResetPassword { email, password } => {
            auth.reset_password(&email, &password).await?;
            tracing::info!(email = %email, "Password reset");
        }
    }
    Ok(())
}

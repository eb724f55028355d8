use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use courier_client::api::{CourierClient, EditOutcome, Message, MessageService};
use courier_client::auth::{
    AuthFailure, FileTokenStore, HttpAuthApi, RequestConfig, RestoreOutcome, SessionManager,
    TokenStore,
};
use courier_client::routing::{route_for, Route};
use courier_client::settings::SettingsManager;

const PASSWORD_ENV: &str = "COURIER_PASSWORD";

#[derive(Parser)]
#[command(name = "courier", version, about = "Messaging client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and remember the session
    Login { email: String },
    /// Create an account (does not log in)
    Register { email: String, name: String },
    Logout,
    /// Show the current session
    Whoami,
    #[command(subcommand)]
    Messages(MessagesCommand),
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Subcommand)]
enum MessagesCommand {
    List,
    Show { id: i64 },
    Send { content: String },
    Edit { id: i64, content: String },
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum ProfileCommand {
    Show,
    /// Upload a new avatar image
    Avatar { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    let settings = SettingsManager::new()?;

    let request_config = RequestConfig::new();
    let store: Arc<dyn TokenStore> = match settings.token_store_dir() {
        Some(dir) => Arc::new(FileTokenStore::in_dir(dir)),
        None => Arc::new(FileTokenStore::default_location()?),
    };
    let auth_api = Arc::new(HttpAuthApi::new(settings.server_url()));
    let session_manager = SessionManager::new(auth_api, store, request_config.clone());

    if session_manager.restore().await == RestoreOutcome::Discarded {
        log::info!("Stored session could not be read and was cleared");
    }

    let client = CourierClient::with_timeout(
        settings.server_url(),
        request_config,
        settings.request_timeout(),
    )?;
    let messages = MessageService::new(client, settings.cache_enabled());

    run(cli.command, &session_manager, &messages).await
}

async fn run(command: Command, session_manager: &SessionManager, messages: &MessageService) -> Result<()> {
    match command {
        Command::Login { email } => {
            if route_for(&session_manager.session(), false) == Some(Route::Messages) {
                log::info!("Replacing the current session");
            }
            let password = read_password()?;
            match session_manager.login(&email, &password).await {
                Ok(_) => match session_manager.session().user_id {
                    Some(user_id) => println!("Logged in as user {}", user_id),
                    None => bail!("Server issued a token that could not be read"),
                },
                Err(failure) => return Err(report_failure(failure)),
            }
        }
        Command::Register { email, name } => {
            let password = read_password()?;
            match session_manager.register(&email, &password, &name).await {
                Ok(_) => println!("Account created for {}. Log in to continue.", email),
                Err(failure) => return Err(report_failure(failure)),
            }
        }
        Command::Logout => {
            session_manager.logout().await;
            messages.clear().await;
            println!("Logged out");
        }
        Command::Whoami => {
            let session = session_manager.session();
            match session.user_id {
                Some(user_id) => println!("User {}", user_id),
                None => println!("Not logged in"),
            }
        }
        Command::Messages(command) => {
            let user_id = require_session(session_manager)?;
            run_messages(command, user_id, messages).await?;
        }
        Command::Profile(command) => {
            require_session(session_manager)?;
            run_profile(command, messages.client()).await?;
        }
    }
    Ok(())
}

async fn run_messages(command: MessagesCommand, user_id: i64, messages: &MessageService) -> Result<()> {
    match command {
        MessagesCommand::List => {
            let list = messages.list_messages().await.into_result().map_err(|e| anyhow!(e))?;
            if list.is_empty() {
                println!("No messages");
            }
            for message in &list {
                print_message(message, user_id);
            }
        }
        MessagesCommand::Show { id } => {
            let message = messages.get_message(id).await.into_result().map_err(|e| anyhow!(e))?;
            print_message(&message, user_id);
        }
        MessagesCommand::Send { content } => {
            let message = messages
                .send_message(&content)
                .await
                .into_result()
                .map_err(|e| anyhow!("Failed to send message: {}", e))?;
            println!("Message #{} sent", message.id);
        }
        MessagesCommand::Edit { id, content } => {
            ensure_owner(messages, id, user_id).await?;
            let outcome = messages
                .edit_message(id, &content)
                .await
                .into_result()
                .map_err(|e| anyhow!("Failed to update message: {}", e))?;
            match outcome {
                EditOutcome::Unchanged => println!("Nothing to update"),
                EditOutcome::Updated(message) => println!("Message #{} updated", message.id),
            }
        }
        MessagesCommand::Delete { id } => {
            ensure_owner(messages, id, user_id).await?;
            messages
                .remove_message(id)
                .await
                .into_result()
                .map_err(|e| anyhow!("Failed to delete message: {}", e))?;
            println!("Message #{} deleted", id);
        }
    }
    Ok(())
}

async fn run_profile(command: ProfileCommand, client: &CourierClient) -> Result<()> {
    let user = match command {
        ProfileCommand::Show => client.fetch_profile().await,
        ProfileCommand::Avatar { path } => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Could not read {}", path.display()))?;
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("avatar")
                .to_string();
            client.upload_avatar(bytes, &file_name, image_mime(&path)).await
        }
    }
    .into_result()
    .map_err(|e| anyhow!(e))?;

    println!("{} <{}> (#{})", user.name, user.email, user.id);
    if let Some(avatar) = user.avatar {
        println!("Avatar: {}", avatar);
    }
    Ok(())
}

fn require_session(session_manager: &SessionManager) -> Result<i64> {
    let session = session_manager.session();
    if route_for(&session, true) == Some(Route::Login) {
        bail!("Not logged in. Run `courier login <email>` first.");
    }
    session.user_id.ok_or_else(|| anyhow!("Not logged in"))
}

async fn ensure_owner(messages: &MessageService, id: i64, user_id: i64) -> Result<()> {
    let message = messages.get_message(id).await.into_result().map_err(|e| anyhow!(e))?;
    if !message.is_owned_by(Some(user_id)) {
        bail!("Message #{} belongs to another user", id);
    }
    Ok(())
}

fn print_message(message: &Message, user_id: i64) {
    let marker = if message.is_owned_by(Some(user_id)) { "*" } else { " " };
    println!(
        "{} #{:<5} {}  {}",
        marker,
        message.id,
        message.created_at.format("%Y-%m-%d %H:%M"),
        message.content
    );
}

/// Prints the `{"error":true,"message":...}` shape and returns the failure as the command's error.
fn report_failure(failure: AuthFailure) -> anyhow::Error {
    match serde_json::to_string(&failure) {
        Ok(json) => println!("{}", json),
        Err(e) => log::warn!("Could not render failure: {}", e),
    }
    anyhow::Error::new(failure)
}

fn image_mime(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

fn read_password() -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }

    let password = rpassword::prompt_password("Password: ")
        .context("Failed to read password")?;
    Ok(password)
}

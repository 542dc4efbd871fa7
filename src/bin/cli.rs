use clap::{Parser, Subcommand};
use profilehub::{
    config::AppConfig,
    db,
    repositories::user_repository::SqliteUserRepository,
    services::{
        user_service::{SignupRequest, UpdatePasswordRequest, UserService},
        UploadService,
    },
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "profilehub-cli")]
#[command(about = "CLI tool for managing ProfileHub accounts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user, applying the same rules as the signup form
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// User name
        #[arg(short, long)]
        username: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// List all users
    List {
        /// Maximum number of users to display
        #[arg(short, long, default_value_t = 100)]
        limit: i64,

        /// Offset for pagination
        #[arg(short = 'o', long, default_value_t = 0)]
        offset: i64,
    },

    /// Delete a user
    Delete {
        /// Email address of the user to delete
        #[arg(short, long)]
        email: String,
    },

    /// Set a new password for a user
    SetPassword {
        /// Email address of the user
        #[arg(short, long)]
        email: String,

        /// New password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

fn get_password(prompt: &str) -> anyhow::Result<String> {
    Ok(rpassword::prompt_password(format!("{}: ", prompt))?)
}

fn confirm_password(prompt: &str) -> anyhow::Result<(String, String)> {
    let password = get_password(prompt)?;
    let confirm = get_password("Confirm password")?;
    Ok((password, confirm))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let pool = db::create_pool().await?;
    db::migrate(&pool).await?;

    let user_repository = Arc::new(SqliteUserRepository::new(pool));
    let user_service = UserService::new(user_repository);

    match cli.command {
        Commands::User { command } => match command {
            UserCommands::Create {
                email,
                username,
                password,
            } => {
                let (password, password_confirm) = match password {
                    Some(pw) => (pw.clone(), pw),
                    None => confirm_password("Password")?,
                };

                let request = SignupRequest {
                    email,
                    username,
                    password,
                    password_confirm,
                };

                let user = user_service
                    .register(request)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

                println!("User created");
                println!("  ID: {}", user.id);
                println!("  Email: {}", user.email);
                println!("  Username: {}", user.username);
            }

            UserCommands::List { limit, offset } => {
                let users = user_service.list_users(Some(limit), Some(offset)).await?;
                if users.is_empty() {
                    println!("No users found.");
                } else {
                    println!(
                        "{:<5} {:<32} {:<20} {:<20}",
                        "ID", "Email", "Username", "Created"
                    );
                    println!("{}", "-".repeat(80));
                    for user in users {
                        println!(
                            "{:<5} {:<32} {:<20} {:<20}",
                            user.id,
                            user.email,
                            user.username,
                            user.created_at.as_deref().unwrap_or("N/A")
                        );
                    }
                }
            }

            UserCommands::Delete { email } => {
                let user = user_service
                    .find_user_by_email(&email)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("User '{}' not found", email))?;

                let removed = user_service.delete_user(user.id).await?;
                let uploads = UploadService::new(AppConfig::from_env()?.upload_dir);
                if let Err(e) = uploads.remove_picture(&removed.profile_pic).await {
                    eprintln!("Warning: could not remove {}: {}", removed.profile_pic, e);
                }
                println!("User '{}' deleted", email);
            }

            UserCommands::SetPassword { email, password } => {
                let user = user_service
                    .find_user_by_email(&email)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("User '{}' not found", email))?;

                let (new_password, password_confirm) = match password {
                    Some(pw) => (pw.clone(), pw),
                    None => confirm_password("New password")?,
                };

                let request = UpdatePasswordRequest {
                    user_id: user.id,
                    new_password,
                    new_password_confirm: Some(password_confirm),
                };

                user_service.update_password(request).await?;
                println!("Password updated for '{}'", email);
            }
        },
    }

    Ok(())
}

use clap::Subcommand;
use serde_json::json;

use crate::app::AppContext;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::views::{LoginView, Route};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to server")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Page to continue to after login")]
        redirect: Option<String>,
    },

    #[command(about = "Logout (drops the local session)")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Refresh authentication token")]
    Refresh,

    #[command(about = "Show current user information")]
    Whoami,

    #[command(about = "Register new user")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },
}

pub async fn handle(cmd: AuthCommands, ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    let auth = ctx.auth_api();

    match cmd {
        AuthCommands::Login {
            username,
            password,
            redirect,
        } => {
            let mut view = LoginView::for_route(auth, &Route::Login { redirect });
            view.username = username;
            view.password = value_or_prompt(password, "Password: ")?;

            match view.submit().await {
                Some((user, target)) => output_success(
                    &output_format,
                    &format!("Logged in as {}", user.username),
                    Some(json!({ "user": user, "redirect": target })),
                ),
                None => {
                    let message = view.error.unwrap_or_default();
                    output_error(&output_format, &message, Some("LOGIN_FAILED"))?;
                    Err(anyhow::anyhow!(message))
                }
            }
        }
        AuthCommands::Logout => {
            auth.logout()?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let logged_in = auth.is_logged_in();
            let user = auth.current_user();

            match output_format {
                OutputFormat::Json => output_json("status", &json!({
                    "authenticated": logged_in,
                    "user": user,
                    "server": ctx.http.url(""),
                })),
                OutputFormat::Text => {
                    match (logged_in, user) {
                        (true, Some(user)) => println!("Logged in as {} ({})", user.username, user.email),
                        (true, None) => println!("Logged in (no user profile stored)"),
                        _ => println!("Not logged in"),
                    }
                    println!("Server: {}", ctx.http.url(""));
                    Ok(())
                }
            }
        }
        AuthCommands::Refresh => {
            let token = auth.refresh_token().await?;
            output_success(
                &output_format,
                "Token refreshed",
                Some(json!({ "token_length": token.len() })),
            )
        }
        AuthCommands::Whoami => match auth.current_user() {
            Some(user) => match output_format {
                OutputFormat::Json => output_json("user", &user),
                OutputFormat::Text => {
                    println!("{:<12} {}", "ID", user.id);
                    println!("{:<12} {}", "USERNAME", user.username);
                    println!("{:<12} {}", "EMAIL", user.email);
                    println!("{:<12} {}", "ADMIN", user.is_admin);
                    println!("{:<12} {}", "CREATED", user.created_at.format("%Y-%m-%d %H:%M"));
                    Ok(())
                }
            },
            None => Err(anyhow::anyhow!("Not logged in. Use 'mediahub auth login <username>' first")),
        },
        AuthCommands::Register {
            username,
            email,
            password,
        } => {
            let password = value_or_prompt(password, "Password: ")?;
            let user = auth.register(&username, &email, &password).await?;
            output_success(
                &output_format,
                &format!("User '{}' registered, login to continue", user.username),
                Some(json!({ "user": user })),
            )
        }
    }
}

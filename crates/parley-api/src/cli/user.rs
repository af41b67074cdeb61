//! User management CLI commands: create, list.

use anyhow::{Result, bail};
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Password;

use parley_types::auth::NewAuthUser;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum UserCommand {
    /// Register a user. Prompts for the password unless --password is given.
    Create {
        email: String,

        /// Plaintext password (script mode; prefer the prompt).
        #[arg(long, env = "PARLEY_USER_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        #[arg(long, default_value = "")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,

        /// Defaults to the email.
        #[arg(long, default_value = "")]
        username: String,

        #[arg(long)]
        superuser: bool,

        #[arg(long)]
        staff: bool,
    },

    /// List registered users.
    #[command(alias = "ls")]
    List,
}

pub async fn run(state: &AppState, action: UserCommand, json: bool) -> Result<()> {
    match action {
        UserCommand::Create {
            email,
            password,
            first_name,
            last_name,
            username,
            superuser,
            staff,
        } => {
            let password = match password {
                Some(p) => p,
                None => Password::new()
                    .with_prompt(format!("Password for {}", style(&email).bold()))
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()?,
            };
            if password.is_empty() {
                bail!("password must not be empty");
            }

            let new_user = NewAuthUser {
                email,
                password,
                first_name,
                last_name,
                username,
                is_superuser: superuser,
                is_staff: staff,
            };
            create_user(state, &new_user, json).await
        }
        UserCommand::List => list_users(state, json).await,
    }
}

async fn create_user(state: &AppState, new_user: &NewAuthUser, json: bool) -> Result<()> {
    let user = state.auth_service.create_auth_user(new_user).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        println!(
            "  {} User '{}' created (id {})",
            style("✓").green().bold(),
            style(&user.email).cyan(),
            user.id
        );
    }
    Ok(())
}

async fn list_users(state: &AppState, json: bool) -> Result<()> {
    let users = state.auth_service.get_all_auth_users().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&users)?);
        return Ok(());
    }

    if users.is_empty() {
        println!();
        println!(
            "  {} No users yet. Create one with: {}",
            style("i").blue().bold(),
            style("parley user create you@example.com").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Email").fg(Color::White),
        Cell::new("Username").fg(Color::White),
        Cell::new("Flags").fg(Color::White),
        Cell::new("Joined").fg(Color::White),
    ]);

    for user in &users {
        let mut flags = Vec::new();
        if user.is_superuser {
            flags.push("superuser");
        }
        if user.is_staff {
            flags.push("staff");
        }
        if !user.is_active {
            flags.push("inactive");
        }

        table.add_row(vec![
            Cell::new(user.id),
            Cell::new(&user.email).fg(Color::Cyan),
            Cell::new(&user.username),
            Cell::new(flags.join(", ")),
            Cell::new(user.date_joined.format("%Y-%m-%d").to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} user{}",
        style(users.len()).bold(),
        if users.len() == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}

//! Chat model registry CLI commands.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Password;

use parley_types::model::{ChatModel, CreateChatModelParams};

use crate::state::AppState;

#[derive(Subcommand)]
pub enum ModelCommand {
    /// List registered models with masked keys.
    #[command(alias = "ls")]
    List,

    /// Register an upstream model endpoint.
    Add {
        /// Unique model name, e.g. `gpt-4o`.
        name: String,

        /// Completion endpoint URL.
        #[arg(long)]
        url: String,

        /// Display label (defaults to the name).
        #[arg(long)]
        label: Option<String>,

        /// Header carrying the key, e.g. `Authorization`.
        #[arg(long, default_value = "Authorization")]
        auth_header: String,

        /// API key (script mode; prompted otherwise, empty for none).
        #[arg(long, env = "PARLEY_MODEL_KEY", hide_env_values = true)]
        key: Option<String>,

        /// Make this the default model.
        #[arg(long)]
        default: bool,
    },

    /// Make a model the default, clearing the flag everywhere else.
    SetDefault { name: String },

    /// Replace a model's API key.
    RotateKey {
        name: String,

        #[arg(long, env = "PARLEY_MODEL_KEY", hide_env_values = true)]
        key: Option<String>,
    },

    /// Remove a model.
    #[command(alias = "rm")]
    Delete { name: String },
}

fn read_key(name: &str, key: Option<String>) -> Result<String> {
    match key {
        Some(k) => Ok(k),
        None => Ok(Password::new()
            .with_prompt(format!("API key for {}", style(name).bold()))
            .allow_empty_password(true)
            .interact()?),
    }
}

pub async fn run(state: &AppState, action: ModelCommand, json: bool) -> Result<()> {
    match action {
        ModelCommand::List => list_models(state, json).await,
        ModelCommand::Add {
            name,
            url,
            label,
            auth_header,
            key,
            default,
        } => {
            let api_auth_key = read_key(&name, key)?;
            let params = CreateChatModelParams {
                label: label.unwrap_or_else(|| name.clone()),
                name,
                is_default: default,
                url,
                api_auth_header: auth_header,
                api_auth_key,
            };
            let model = state.model_service.create_chat_model(&params).await?;
            print_model(&model, "registered", json)
        }
        ModelCommand::SetDefault { name } => {
            let model = state.model_service.set_default_chat_model(&name).await?;
            print_model(&model, "is now the default", json)
        }
        ModelCommand::RotateKey { name, key } => {
            let model = state.model_service.chat_model_by_name(&name).await?;
            let api_auth_key = read_key(&name, key)?;
            let model = state
                .model_service
                .update_chat_model_key(model.id, &api_auth_key)
                .await?;
            print_model(&model, "key rotated", json)
        }
        ModelCommand::Delete { name } => {
            let model = state.model_service.chat_model_by_name(&name).await?;
            state.model_service.delete_chat_model(model.id).await?;
            if json {
                println!("{}", serde_json::json!({ "deleted": true, "name": name }));
            } else {
                println!(
                    "  {} Model '{}' deleted",
                    style("✓").green().bold(),
                    style(&name).bold()
                );
            }
            Ok(())
        }
    }
}

fn print_model(model: &ChatModel, what: &str, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "id": model.id,
                "name": model.name,
                "is_default": model.is_default,
                "api_auth_key": model.masked_key(),
            })
        );
    } else {
        println!(
            "  {} Model '{}' {} ({})",
            style("✓").green().bold(),
            style(&model.name).cyan(),
            what,
            model.masked_key()
        );
    }
    Ok(())
}

async fn list_models(state: &AppState, json: bool) -> Result<()> {
    let models = state.model_service.list_chat_models().await?;

    if json {
        let masked: Vec<serde_json::Value> = models
            .iter()
            .map(|m| {
                serde_json::json!({
                    "id": m.id,
                    "name": m.name,
                    "label": m.label,
                    "is_default": m.is_default,
                    "url": m.url,
                    "api_auth_header": m.api_auth_header,
                    "api_auth_key": m.masked_key(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&masked)?);
        return Ok(());
    }

    if models.is_empty() {
        println!();
        println!(
            "  {} No chat models registered. Add one with: {}",
            style("i").blue().bold(),
            style("parley model add gpt-4o --url https://api.openai.com/v1/chat/completions").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Label").fg(Color::White),
        Cell::new("URL").fg(Color::White),
        Cell::new("Key").fg(Color::White),
        Cell::new("Default").fg(Color::White),
    ]);

    for model in &models {
        let default_cell = if model.is_default {
            Cell::new("● default").fg(Color::Green)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            Cell::new(&model.name).fg(Color::Cyan),
            Cell::new(&model.label),
            Cell::new(&model.url).fg(Color::DarkGrey),
            Cell::new(format!("{}: {}", model.api_auth_header, model.masked_key())),
            default_cell,
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

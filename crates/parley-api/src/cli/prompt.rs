//! Prompt CLI commands: add, list, edit, delete.

use anyhow::Result;
use clap::Subcommand;
use console::style;
use uuid::Uuid;

use parley_types::chat::{CreateChatPromptParams, MessageRole, UpdateChatPromptByUuidParams};

use crate::state::AppState;

#[derive(Subcommand)]
pub enum PromptCommand {
    /// Add an instruction turn to a session.
    Add {
        session_uuid: String,

        content: String,

        #[arg(long, default_value = "system")]
        role: MessageRole,
    },

    /// List a session's prompts in order.
    #[command(alias = "ls")]
    List { session_uuid: String },

    /// Replace a prompt's content.
    Edit { uuid: String, content: String },

    /// Delete a prompt.
    #[command(alias = "rm")]
    Delete { uuid: String },
}

pub async fn run(state: &AppState, action: PromptCommand, json: bool) -> Result<()> {
    match action {
        PromptCommand::Add {
            session_uuid,
            content,
            role,
        } => {
            let prompt = state
                .prompt_service
                .create_chat_prompt(&CreateChatPromptParams {
                    chat_session_uuid: session_uuid,
                    uuid: Uuid::now_v7().to_string(),
                    role,
                    content,
                    token_count: 0,
                })
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&prompt)?);
            } else {
                println!(
                    "  {} Prompt {} added",
                    style("✓").green().bold(),
                    style(&prompt.uuid).cyan()
                );
            }
        }
        PromptCommand::List { session_uuid } => {
            let prompts = state
                .prompt_service
                .get_chat_prompts_by_session_uuid(&session_uuid)
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&prompts)?);
            } else if prompts.is_empty() {
                println!("  {} No prompts in {}", style("i").blue().bold(), session_uuid);
            } else {
                println!();
                for (i, prompt) in prompts.iter().enumerate() {
                    println!(
                        "  {} {} {}",
                        style(format!("{}.", i + 1)).bold(),
                        style(prompt.role).magenta(),
                        style(&prompt.uuid).dim()
                    );
                    println!("     {}", prompt.content);
                }
                println!();
            }
        }
        PromptCommand::Edit { uuid, content } => {
            let prompt = state
                .prompt_service
                .update_chat_prompt_by_uuid(&UpdateChatPromptByUuidParams {
                    uuid,
                    content,
                    token_count: 0,
                })
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&prompt)?);
            } else {
                println!(
                    "  {} Prompt {} updated",
                    style("✓").green().bold(),
                    style(&prompt.uuid).cyan()
                );
            }
        }
        PromptCommand::Delete { uuid } => {
            state.prompt_service.delete_chat_prompt_by_uuid(&uuid).await?;
            if json {
                println!("{}", serde_json::json!({ "deleted": true, "uuid": uuid }));
            } else {
                println!("  {} Prompt {} deleted", style("✓").green().bold(), uuid);
            }
        }
    }
    Ok(())
}

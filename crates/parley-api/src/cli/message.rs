//! Message CLI commands.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use uuid::Uuid;

use parley_types::chat::{ChatMessage, MessageRole, UpdateChatMessageByUuidParams};

use crate::state::AppState;

#[derive(Subcommand)]
pub enum MessageCommand {
    /// Append a message to a session.
    Add {
        session_uuid: String,

        content: String,

        /// user, assistant, or system.
        #[arg(long, default_value = "user")]
        role: MessageRole,

        /// Message UUID (generated when omitted).
        #[arg(long)]
        uuid: Option<String>,
    },

    /// Show the last N messages of a session, plus pinned ones.
    Last {
        session_uuid: String,

        #[arg(short = 'n', long, default_value_t = 10)]
        count: i32,
    },

    /// Pin or unpin a message so it stays in the context window.
    Pin {
        uuid: String,

        #[arg(long)]
        off: bool,
    },

    /// Delete one message.
    #[command(alias = "rm")]
    Delete { uuid: String },

    /// Delete every message in a session.
    Clear { session_uuid: String },

    /// Count messages across all sessions of a user.
    Count { email: String },
}

pub async fn run(state: &AppState, action: MessageCommand, json: bool) -> Result<()> {
    match action {
        MessageCommand::Add {
            session_uuid,
            content,
            role,
            uuid,
        } => {
            let uuid = uuid.unwrap_or_else(|| Uuid::now_v7().to_string());
            let message = state
                .message_service
                .add_message(&session_uuid, &uuid, role, &content, serde_json::Value::Null)
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&message)?);
            } else {
                println!(
                    "  {} Added {} message {}",
                    style("✓").green().bold(),
                    message.role,
                    style(&message.uuid).cyan()
                );
            }
        }
        MessageCommand::Last { session_uuid, count } => {
            let messages = state
                .message_service
                .get_last_n_chat_messages(&session_uuid, count)
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&messages)?);
            } else {
                print_messages(&messages);
            }
        }
        MessageCommand::Pin { uuid, off } => {
            let message = state.message_service.get_chat_message_by_uuid(&uuid).await?;
            let updated = state
                .message_service
                .update_chat_message_by_uuid(&UpdateChatMessageByUuidParams {
                    uuid: message.uuid,
                    content: message.content,
                    token_count: message.token_count,
                    is_pin: !off,
                })
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&updated)?);
            } else {
                println!(
                    "  {} Message {} {}",
                    style("✓").green().bold(),
                    style(&updated.uuid).cyan(),
                    if updated.is_pin { "pinned" } else { "unpinned" }
                );
            }
        }
        MessageCommand::Delete { uuid } => {
            state.message_service.delete_chat_message_by_uuid(&uuid).await?;
            if json {
                println!("{}", serde_json::json!({ "deleted": true, "uuid": uuid }));
            } else {
                println!("  {} Message {} deleted", style("✓").green().bold(), uuid);
            }
        }
        MessageCommand::Clear { session_uuid } => {
            let removed = state
                .message_service
                .delete_chat_messages_by_session(&session_uuid)
                .await?;
            if json {
                println!("{}", serde_json::json!({ "removed": removed }));
            } else {
                println!(
                    "  {} Removed {} message{} from {}",
                    style("✓").green().bold(),
                    removed,
                    if removed == 1 { "" } else { "s" },
                    style(&session_uuid).cyan()
                );
            }
        }
        MessageCommand::Count { email } => {
            let user = state.auth_service.get_auth_user_by_email(&email).await?;
            let count = state.message_service.get_chat_messages_count(user.id).await?;
            if json {
                println!("{}", serde_json::json!({ "user_id": user.id, "count": count }));
            } else {
                println!("  {} has {} message(s)", style(&user.email).cyan(), style(count).bold());
            }
        }
    }
    Ok(())
}

fn print_messages(messages: &[ChatMessage]) {
    if messages.is_empty() {
        println!();
        println!("  {} No messages", style("i").blue().bold());
        println!();
        return;
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("When").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Content").fg(Color::White),
        Cell::new("UUID").fg(Color::White),
    ]);

    for message in messages {
        let role = match message.role {
            MessageRole::User => Cell::new("user").fg(Color::Green),
            MessageRole::Assistant => Cell::new("assistant").fg(Color::Cyan),
            MessageRole::System => Cell::new("system").fg(Color::Magenta),
        };
        let content = if message.is_pin {
            format!("📌 {}", message.content)
        } else {
            message.content.clone()
        };
        table.add_row(vec![
            Cell::new(message.created_at.format("%Y-%m-%d %H:%M:%S").to_string())
                .fg(Color::DarkGrey),
            role,
            Cell::new(content),
            Cell::new(&message.uuid).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
}

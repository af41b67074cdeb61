//! Session CLI commands: create a session, print its history.

use anyhow::Result;
use clap::Subcommand;
use console::style;
use uuid::Uuid;

use parley_core::repository::session::ChatSessionRepository;
use parley_types::chat::CreateChatSessionParams;
use parley_types::history::SimpleChatMessage;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Open a new session owned by a user.
    Create {
        /// Owner's email.
        email: String,

        #[arg(long, default_value = "")]
        topic: String,

        /// Session UUID (generated when omitted).
        #[arg(long)]
        uuid: Option<String>,
    },

    /// Print a session's history: prompts first, then one page of messages.
    History {
        session_uuid: String,

        #[arg(long, default_value_t = 1)]
        page: i32,

        /// Defaults to `[history].default_page_size`.
        #[arg(long)]
        page_size: Option<i32>,
    },
}

pub async fn run(state: &AppState, action: SessionCommand, json: bool) -> Result<()> {
    match action {
        SessionCommand::Create { email, topic, uuid } => {
            let user = state.auth_service.get_auth_user_by_email(&email).await?;
            let session = state
                .session_repo
                .create(&CreateChatSessionParams {
                    uuid: uuid.unwrap_or_else(|| Uuid::now_v7().to_string()),
                    user_id: user.id,
                    topic,
                })
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&session)?);
            } else {
                println!(
                    "  {} Session {} created for {}",
                    style("✓").green().bold(),
                    style(&session.uuid).cyan(),
                    user.email
                );
            }
            Ok(())
        }
        SessionCommand::History {
            session_uuid,
            page,
            page_size,
        } => {
            let page_size = page_size.unwrap_or(state.config.history.default_page_size);
            let history = state
                .message_service
                .get_chat_history_by_session(&session_uuid, page, page_size)
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else {
                print_history(&session_uuid, &history);
            }
            Ok(())
        }
    }
}

fn print_history(session_uuid: &str, history: &[SimpleChatMessage]) {
    println!();
    if history.is_empty() {
        println!(
            "  {} Session {} has no history",
            style("i").blue().bold(),
            style(session_uuid).cyan()
        );
        println!();
        return;
    }

    for entry in history {
        let speaker = match (entry.is_prompt, entry.inversion) {
            (true, _) => style("prompt").magenta().bold(),
            (false, true) => style("you").green().bold(),
            (false, false) => style("bot").cyan().bold(),
        };
        println!(
            "  {} {}  {}",
            speaker,
            style(&entry.date_time).dim(),
            style(&entry.uuid).dim()
        );
        for line in entry.text.lines() {
            println!("    {line}");
        }
        println!();
    }
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{
    AppContext, cmd_ask, cmd_chat, cmd_config_get, cmd_config_set, cmd_config_show, cmd_tool,
    cmd_tools,
};
use crate::config::Config;
use crate::error::Result;

#[derive(Parser)]
#[command(name = "jira-assistant")]
#[command(about = "Manage Jira issues and sprints by chatting")]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config dir, or $JIRA_ASSISTANT_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print replies at once instead of typing them out
    #[arg(long, global = true)]
    pub no_typing: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat (default)
    Chat,

    /// Send a single request and print the reply
    Ask {
        /// Request text, e.g. "what's the status of PROJ-12?"
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Run one tool directly with JSON arguments
    Tool {
        /// Tool name, see `jira-assistant tools`
        name: String,

        /// Arguments as a JSON object, e.g. '{"issue_id":"PROJ-1"}'
        #[arg(long)]
        args: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the available tools
    Tools {
        /// Output the tool definitions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration (secrets masked)
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value
    Get {
        /// Configuration key, e.g. jira.server
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Configuration key, e.g. jira.server or llm.api_key
        key: String,
        /// Value to set
        value: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> Result<()> {
        let typing = !self.no_typing;

        match self.command.unwrap_or(Commands::Chat) {
            Commands::Chat => cmd_chat(&AppContext::load(self.config, typing)?).await,
            Commands::Ask { text } => {
                cmd_ask(&AppContext::load(self.config, typing)?, &text.join(" ")).await
            }
            Commands::Tool { name, args, json } => {
                cmd_tool(
                    &AppContext::load(self.config, typing)?,
                    &name,
                    args.as_deref(),
                    json,
                )
                .await
            }
            Commands::Tools { json } => cmd_tools(json),
            Commands::Config { action } => {
                let path = self.config.unwrap_or_else(Config::default_path);
                match action {
                    ConfigAction::Show { json } => cmd_config_show(&path, json),
                    ConfigAction::Get { key, json } => cmd_config_get(&path, &key, json),
                    ConfigAction::Set { key, value, json } => {
                        cmd_config_set(&path, &key, &value, json)
                    }
                }
            }
        }
    }
}

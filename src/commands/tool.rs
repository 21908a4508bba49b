use std::sync::Arc;

use owo_colors::OwoColorize;
use serde_json::{Value, json};

use super::{AppContext, CommandOutput};
use crate::error::{AssistantError, Result};
use crate::tools::{ToolCall, definitions, format};

/// Run one tool directly, bypassing the model
pub async fn cmd_tool(ctx: &AppContext, name: &str, args: Option<&str>, as_json: bool) -> Result<()> {
    let arguments: Value = match args {
        Some(raw) => serde_json::from_str(raw).map_err(|e| AssistantError::InvalidToolArguments {
            tool: name.to_string(),
            message: format!("--args is not valid JSON: {e}"),
        })?,
        None => json!({}),
    };
    let call = ToolCall::parse(name, arguments)?;

    let model = ctx.model()?;
    let tools = ctx.tool_set(Arc::clone(&model))?;
    let message = tools.execute(&call).await;

    CommandOutput::new(json!({
        "tool": call.name(),
        "success": !format::is_failure(&message),
        "message": message,
    }))
    .with_text(message)
    .print(as_json)
}

/// List the tools the model can choose from
pub fn cmd_tools(as_json: bool) -> Result<()> {
    let defs = definitions();

    let text = defs
        .iter()
        .map(|d| format!("{}\n  {}", d.name.cyan(), d.description))
        .collect::<Vec<_>>()
        .join("\n");

    CommandOutput::new(serde_json::to_value(&defs)?)
        .with_text(text)
        .print(as_json)
}

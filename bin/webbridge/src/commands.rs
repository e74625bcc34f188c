use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use webbridge_core::Config;
use webbridge_messaging::{accept_connection, create_listener, ListenerOptions, SocketSender};
use webbridge_tools::{ToolContext, ToolRegistry};

/// One stdin line: `{"tool": "click", "arguments": {"element": "Submit"}}`.
#[derive(Deserialize)]
struct Invocation {
    tool: String,
    #[serde(default)]
    arguments: Value,
}

pub async fn serve(
    port: Option<u16>,
    host: Option<String>,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = Config::load_or_default(config_path.as_deref())?;
    if let Some(p) = port {
        config.server.port = p;
    }
    if let Some(h) = host {
        config.server.host = h;
    }

    let opts = ListenerOptions {
        evict: config.server.evict_port,
        max_wait: Duration::from_millis(config.server.bind_max_wait_ms),
        ..Default::default()
    };
    let listener = create_listener(&config.server.host, config.server.port, opts).await?;

    info!("Waiting for browser extension to connect");
    let ws = accept_connection(&listener).await?;
    let channel = Arc::new(SocketSender::new(ws));

    let registry = ToolRegistry::with_defaults(&config);
    let ctx = ToolContext::new(channel, config);
    info!(tools = registry.tool_names().len(), "Bridge ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = handle_line(&registry, ctx.clone(), line).await;
        stdout.write_all(response.to_string().as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}

/// Failures are local to one invocation and never end the loop.
async fn handle_line(registry: &ToolRegistry, ctx: ToolContext, line: &str) -> Value {
    let invocation: Invocation = match serde_json::from_str(line) {
        Ok(inv) => inv,
        Err(e) => {
            warn!(error = %e, "Unparseable invocation line");
            return json!({"error": format!("Invalid invocation: {}", e)});
        }
    };

    match registry.execute(&invocation.tool, ctx, invocation.arguments).await {
        Ok(content) => json!({"content": content}),
        Err(e) => {
            warn!(tool = %invocation.tool, error = %e, "Tool invocation failed");
            json!({"error": e.to_string()})
        }
    }
}

pub fn tools_list(as_json: bool) -> anyhow::Result<()> {
    let registry = ToolRegistry::with_defaults(&Config::default());
    let schemas = registry.get_tool_schemas();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&schemas)?);
        return Ok(());
    }

    println!();
    println!("🔧 Registered commands ({} total)", schemas.len());
    println!();
    for schema in &schemas {
        let name = schema["name"].as_str().unwrap_or("");
        let desc = schema["description"].as_str().unwrap_or("");
        let required = schema["inputSchema"]["required"]
            .as_array()
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|f| f.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        if required.is_empty() {
            println!("  {:<18} {}", name, desc);
        } else {
            println!("  {:<18} {} (args: {})", name, desc, required);
        }
    }
    println!();

    Ok(())
}

//! `scout chat` — Interactive or single-message chat mode.

use scout_agent::{AgentStep, Orchestrator, ToolInvoker, TurnRenderer, build_system_prompt};
use scout_checkpoint::{FileCheckpointer, InMemoryCheckpointer};
use scout_config::AppConfig;
use scout_core::checkpoint::CheckpointBackend;
use scout_core::event::EventBus;
use scout_core::message::{Message, ThreadId};
use scout_core::provider::Provider;
use scout_providers::OpenAiCompatProvider;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

pub async fn run(message: Option<String>, thread: String) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early — give a clear error
    let Some(api_key) = config.api_key.clone() else {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    SCOUT_API_KEY      (generic)");
        eprintln!("    OPENROUTER_API_KEY (recommended)");
        eprintln!("    OPENAI_API_KEY     (for OpenAI direct)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        eprintln!("  Get an OpenRouter key at: https://openrouter.ai/keys");
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    };

    let workspace_root = config.workspace_root();
    std::fs::create_dir_all(&workspace_root)
        .map_err(|e| format!("Failed to create workspace at {}: {e}", workspace_root.display()))?;

    // Build the model capability
    let provider: Arc<dyn Provider> = Arc::new(match &config.api_base {
        Some(base) => OpenAiCompatProvider::new("custom", base, api_key),
        None => OpenAiCompatProvider::openrouter(api_key),
    });

    // Bootstrap check: an unreachable model endpoint is fatal for the
    // whole session — surfaced to the operator, not retried.
    match provider.health_check().await {
        Ok(true) => {}
        Ok(false) => return Err("Model endpoint refused the health check.".into()),
        Err(e) => return Err(format!("Cannot reach model endpoint: {e}").into()),
    }

    // Build the capability-set, sandboxed to the workspace
    let tools = Arc::new(scout_tools::default_registry(workspace_root.clone()));
    let system_prompt = build_system_prompt(&workspace_root, &tools);

    let event_bus = Arc::new(EventBus::default());
    let step = AgentStep::new(
        provider,
        &config.default_model,
        config.default_temperature,
        system_prompt,
        tools.definitions(),
        event_bus.clone(),
    )
    .with_max_tokens(config.default_max_tokens);
    let invoker = ToolInvoker::new(tools.clone(), event_bus);

    let checkpointer: Arc<dyn CheckpointBackend> = match config.checkpoint.backend.as_str() {
        "memory" => Arc::new(InMemoryCheckpointer::new()),
        _ => Arc::new(FileCheckpointer::new(config.threads_dir())),
    };

    let orchestrator =
        Orchestrator::new(step, invoker, checkpointer).with_step_budget(config.agent.step_budget);
    let thread_id = ThreadId::from(&thread);

    if let Some(msg) = message {
        // Single message mode: any non-tool error is fatal for the run
        stream_turn(&orchestrator, &thread_id, Message::user(&msg)).await?;
        println!();
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║          Scout — Interactive Mode            ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Model:      {}", config.default_model);
    println!("  Workspace:  {}", workspace_root.display());
    println!("  Thread:     {thread}");
    println!("  Tools:      {} filesystem tools loaded", tools.len());
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let stdin = tokio::io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = reader.lines();

    print!("  You > ");
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();

        if matches!(line.as_str(), "exit" | "quit" | "/exit" | "/quit" | ":q") {
            break;
        }

        if !line.is_empty() {
            match stream_turn(&orchestrator, &thread_id, Message::user(&line)).await {
                Ok(()) => {
                    println!();
                    println!();
                }
                Err(e) => {
                    // Fatal for this invocation only; the thread survives
                    eprintln!();
                    eprintln!("  [Error] {e}");
                    println!();
                }
            }
        }

        print!("  You > ");
        std::io::stdout().flush()?;
    }

    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}

/// Run one turn while rendering its event stream to stdout.
async fn stream_turn(
    orchestrator: &Orchestrator,
    thread_id: &ThreadId,
    input: Message,
) -> Result<(), scout_core::Error> {
    let (tx, mut rx) = mpsc::channel(64);

    let turn = async {
        let result = orchestrator.run_turn(thread_id, input, Some(&tx)).await;
        drop(tx); // close the channel so the renderer drains and stops
        result
    };

    let render = async {
        let mut renderer = TurnRenderer::new();
        let mut stdout = std::io::stdout();
        while let Some(event) = rx.recv().await {
            if let Some(fragment) = renderer.render(&event) {
                let _ = write!(stdout, "{fragment}");
                let _ = stdout.flush();
            }
        }
    };

    let (result, ()) = tokio::join!(turn, render);
    result.map(|_| ())
}

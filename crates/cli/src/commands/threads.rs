//! `scout threads` — Inspect or clear persisted conversation threads.

use scout_checkpoint::FileCheckpointer;
use scout_config::AppConfig;
use scout_core::checkpoint::CheckpointBackend;
use scout_core::message::ThreadId;

pub async fn run(clear: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let backend = FileCheckpointer::new(config.threads_dir());

    if let Some(thread) = clear {
        let deleted = backend.delete(&ThreadId::from(&thread)).await?;
        if deleted {
            println!("Deleted thread '{thread}'.");
        } else {
            println!("No checkpoint found for thread '{thread}'.");
        }
        return Ok(());
    }

    let mut threads = backend.list_threads().await?;
    threads.sort_by(|a, b| a.0.cmp(&b.0));

    if threads.is_empty() {
        println!("No persisted threads yet. Start one with: scout chat");
        return Ok(());
    }

    println!("Persisted threads ({}):", threads.len());
    for thread in threads {
        match backend.load(&thread).await {
            Ok(Some(state)) => println!(
                "  {} — {} messages, error count {}",
                thread, state.messages.len(), state.error_count
            ),
            Ok(None) => println!("  {thread} — (missing)"),
            Err(e) => println!("  {thread} — unreadable: {e}"),
        }
    }

    Ok(())
}

//! `scout onboard` — First-time setup.

use scout_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");
    let config = AppConfig::default();
    let workspace_dir = config.workspace_root();

    println!("Scout — First-Time Setup");
    println!("========================\n");

    // Create directories
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if !workspace_dir.exists() {
        std::fs::create_dir_all(&workspace_dir)?;
        println!("✅ Created workspace directory: {}", workspace_dir.display());
    }

    // Workspace skeleton the prompt's layout rules refer to
    for sub in ["inputs/data", "inputs/questions", "runs", "docs"] {
        let dir = workspace_dir.join(sub);
        if !dir.exists() {
            std::fs::create_dir_all(&dir)?;
            println!("✅ Created {}", dir.display());
        }
    }

    // Create config file
    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        let default_toml = AppConfig::default_toml();
        std::fs::write(&config_path, &default_toml)?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Edit {} and add your API key", config_path.display());
        println!("   2. Drop project data under {}", workspace_dir.join("inputs").display());
        println!("   3. Run: scout chat\n");
    }

    println!("🎉 Setup complete! Run `scout chat` to start chatting.\n");

    Ok(())
}

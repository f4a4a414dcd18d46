//! `chorus onboard` — First-time setup.

use chorus_config::AppConfig;
use chorus_memory::FileStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");
    let store_dir = FileStore::default_dir();

    println!("🎼 Chorus — First-Time Setup");
    println!("============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if !store_dir.exists() {
        std::fs::create_dir_all(&store_dir)?;
        println!("✅ Created snapshot directory: {}", store_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Add an API key (or set OPENAI_API_KEY)");
        println!("   2. Add more [[capabilities]] entries to compare backends");
        println!("   3. Run: chorus ask\n");
    }

    println!("🎉 Setup complete! Run `chorus ask` to start.\n");

    Ok(())
}

//! `chorus capabilities` — List configured generation backends.

use super::load_config;

pub async fn run(check: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let capabilities = chorus_providers::build_capabilities(&config);

    println!("🤖 Configured Capabilities");
    println!("==========================");
    if capabilities.is_empty() {
        println!();
        println!("  None. Add a [[capabilities]] entry to");
        println!("    {}", chorus_config::AppConfig::config_dir().join("config.toml").display());
        return Ok(());
    }

    println!();
    println!("  {:<3} {:<16} {:<14} {:<28} {:>8} {:>6}", "#", "Name", "Provider", "Model", "Timeout", "Conf");
    for (i, cap) in capabilities.iter().enumerate() {
        println!(
            "  {:<3} {:<16} {:<14} {:<28} {:>7}s {:>6.2}",
            i,
            cap.tag,
            cap.provider.name(),
            cap.model,
            cap.timeout.as_secs(),
            cap.confidence
        );
    }

    if check {
        println!();
        for cap in &capabilities {
            match cap.provider.health_check().await {
                Ok(true) => println!("  ✅ {} reachable", cap.tag),
                Ok(false) => println!("  ⚠ {} responded but reports unhealthy", cap.tag),
                Err(e) => println!("  ❌ {}: {e}", cap.tag),
            }
        }
    }
    Ok(())
}

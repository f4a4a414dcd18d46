//! `chorus usage` — Model pricing and cost estimates.

use chorus_config::AppConfig;
use chorus_telemetry::{ModelPricing, PricingTable};

use super::load_config;

fn pricing_table(config: &AppConfig) -> PricingTable {
    let table = PricingTable::with_defaults()
        .with_default_model(config.telemetry.default_pricing_model.clone());
    for (model, price) in &config.telemetry.custom_pricing {
        table.set(model.clone(), ModelPricing::new(price.input_per_m, price.output_per_m));
    }
    table
}

/// List available model pricing.
pub fn pricing() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let table = pricing_table(&config);

    println!("💰 Model Pricing (per 1M tokens)");
    println!("─────────────────────────────────────────────────────");
    println!("{:<40} {:>10} {:>10}", "Model", "Input", "Output");
    println!("{:<40} {:>10} {:>10}", "─────", "─────", "──────");

    for name in table.models() {
        if let Some(p) = table.get(&name) {
            println!("{:<40} ${:>8.3} ${:>8.3}", name, p.input_per_m, p.output_per_m);
        }
    }
    println!();
    println!("  Unknown models are priced as {}", table.default_model());
    Ok(())
}

/// Estimate cost for a total token count, split evenly between input and output.
pub fn estimate(model: &str, tokens: u32) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let estimate = pricing_table(&config).estimate(model, tokens);

    println!("💵 Cost estimate for {model}");
    println!("   Input tokens:   {}", estimate.input_tokens);
    println!("   Output tokens:  {}", estimate.output_tokens);
    match (&estimate.priced_as, estimate.fallback) {
        (Some(key), true) => println!("   Priced as:      {key} (model not in table)"),
        (Some(key), false) if key != model => println!("   Priced as:      {key}"),
        (None, _) => println!("   ⚠ No pricing available"),
        _ => {}
    }
    println!("   Estimated cost: ${:.6}", estimate.cost_usd);
    Ok(())
}

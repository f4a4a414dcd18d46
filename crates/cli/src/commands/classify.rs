//! `chorus classify` — Print the classification record as JSON.

pub fn run(text: &str, context_turns: usize) -> Result<(), Box<dyn std::error::Error>> {
    let record = chorus_engine::classify(text, context_turns);
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

//! `chorus knowledge` — Knowledge index commands.

use chorus_config::AppConfig;
use chorus_core::classification::TopicDomain;
use chorus_memory::{FileStore, IndexSettings, KnowledgeIndex, NewKnowledge, SearchRequest};

use super::{KNOWLEDGE_KEY, load_config, snapshot_store};

/// The configured index, replaced by the saved snapshot when one exists.
async fn open(config: &AppConfig, store: &FileStore) -> Result<KnowledgeIndex, Box<dyn std::error::Error>> {
    let settings = IndexSettings {
        similarity_floor: config.knowledge.similarity_floor,
        vector_top_k: config.knowledge.vector_top_k,
    };
    let index = if config.knowledge.seed_corpus {
        KnowledgeIndex::with_seed_corpus(settings)
    } else {
        KnowledgeIndex::new(settings)
    };
    index.restore(store, KNOWLEDGE_KEY).await?;
    Ok(index)
}

pub async fn search(query: &str, limit: usize, domain: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let index = open(&config, &snapshot_store(&config)).await?;

    let mut request = SearchRequest::new(query).with_limit(limit);
    if let Some(domain) = domain {
        request = request.with_domain(TopicDomain::parse(domain));
    }
    let found = index.search(&request);

    println!("🔍 Searching knowledge for: \"{query}\"");
    println!();
    if found.results.is_empty() {
        println!("   No entries found.");
        return Ok(());
    }
    for (i, scored) in found.results.iter().enumerate() {
        let entry = &scored.entry;
        println!("  {:>2}. [score: {:.2}] {} ({})", i + 1, scored.score, entry.title, entry.domain);
        let preview: String = entry.body.chars().take(80).collect();
        println!("      {preview}");
        if !entry.tags.is_empty() {
            println!("      tags: {}", entry.tags.join(", "));
        }
    }
    println!();
    println!("   {} of {} candidates shown", found.results.len(), found.total_candidates);
    Ok(())
}

pub async fn add(
    title: &str,
    body: &str,
    domain: Option<&str>,
    tags: Option<&str>,
    quality: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let store = snapshot_store(&config);
    let index = open(&config, &store).await?;

    let mut new = NewKnowledge::new(title, body).with_quality(quality);
    if let Some(domain) = domain {
        new = new.with_domain(TopicDomain::parse(domain));
    }
    if let Some(tags) = tags {
        new = new.with_tags(tags.split(',').map(str::trim).filter(|t| !t.is_empty()));
    }

    let entry = index.add(new)?;
    let saved = index.snapshot(&store, KNOWLEDGE_KEY).await?;
    println!("✅ Added \"{}\" ({})", entry.title, entry.id);
    println!("   Index saved to {} ({saved} entries)", store.dir().display());
    Ok(())
}

pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let index = open(&config, &snapshot_store(&config)).await?;

    println!("📚 Knowledge entries ({})", index.len());
    println!("─────────────────────────────────────────────────────");
    for entry in index.list() {
        println!(
            "  {:<36} {:<12} q={:.2}  {}",
            entry.id, entry.domain, entry.quality, entry.title
        );
    }
    Ok(())
}

pub async fn stats() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let index = open(&config, &snapshot_store(&config)).await?;
    let stats = index.stats();

    println!("🧠 Knowledge Statistics");
    println!("=======================");
    println!("  Entries:       {}", stats.entries);
    println!("  Indexed terms: {}", stats.terms);
    for (domain, count) in &stats.by_domain {
        println!("    {domain:<14} {count}");
    }
    Ok(())
}

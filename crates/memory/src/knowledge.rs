//! Knowledge index: a small in-memory corpus with keyword and
//! feature-vector search.
//!
//! Search unions two candidate sets:
//! - keyword hits from an inverted index of lowercased terms (>2 chars)
//!   drawn from title, body and tags
//! - entries whose feature vector is above the similarity floor against the
//!   query's vector (top `vector_top_k` kept)
//!
//! Each candidate then gets a composite score (title ×3, body ×1, tag ×2,
//! domain hint +2, quality, recency +0.5, expertise +1) and the list is
//! sorted and truncated.
//!
//! Mutations take the write lock and are visible to the next search.
//! Searches share the read lock; usage counters are atomics.

use chorus_core::classification::TopicDomain;
use chorus_core::error::KnowledgeError;
use chorus_core::event::{DomainEvent, EventBus};
use chorus_core::text::index_terms;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::features::feature_vector;
use crate::store::KeyValueStore;
use crate::vector::rank_by_similarity;

const RECENT_WINDOW_DAYS: i64 = 30;

/// One document in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub domain: TopicDomain,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Curated quality in [0, 1]
    pub quality: f64,

    /// Derived from title, body and tags; recomputed on load
    #[serde(skip)]
    pub vector: Vec<f32>,

    #[serde(default)]
    pub access_count: u64,
    #[serde(default)]
    pub last_accessed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl KnowledgeEntry {
    fn searchable_text(&self) -> String {
        format!("{} {} {}", self.title, self.body, self.tags.join(" "))
    }
}

/// Input for [`KnowledgeIndex::add`].
#[derive(Debug, Clone)]
pub struct NewKnowledge {
    pub title: String,
    pub body: String,
    pub domain: TopicDomain,
    pub tags: Vec<String>,
    pub quality: f64,
}

impl NewKnowledge {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            domain: TopicDomain::General,
            tags: Vec::new(),
            quality: 0.5,
        }
    }

    pub fn with_domain(mut self, domain: TopicDomain) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = quality;
        self
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeUpdate {
    pub title: Option<String>,
    pub body: Option<String>,
    pub domain: Option<TopicDomain>,
    pub tags: Option<Vec<String>>,
    pub quality: Option<f64>,
}

/// A search over the index.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub text: String,
    pub domain_hint: Option<TopicDomain>,
    /// Lowercased expertise values from the user's preferences
    pub expertise: Vec<String>,
    pub limit: usize,
}

impl SearchRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            domain_hint: None,
            expertise: Vec::new(),
            limit: 5,
        }
    }

    pub fn with_domain(mut self, domain: TopicDomain) -> Self {
        self.domain_hint = Some(domain);
        self
    }

    pub fn with_expertise(mut self, expertise: Vec<String>) -> Self {
        self.expertise = expertise.into_iter().map(|e| e.to_lowercase()).collect();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredEntry {
    pub entry: KnowledgeEntry,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub results: Vec<ScoredEntry>,
    /// Size of the keyword ∪ vector candidate set before truncation
    pub total_candidates: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub entries: usize,
    pub terms: usize,
    pub by_domain: BTreeMap<String, usize>,
}

/// Tunables for similarity search.
#[derive(Debug, Clone, Copy)]
pub struct IndexSettings {
    pub similarity_floor: f32,
    pub vector_top_k: usize,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            similarity_floor: 0.1,
            vector_top_k: 20,
        }
    }
}

struct Slot {
    entry: KnowledgeEntry,
    title_terms: HashSet<String>,
    body_terms: HashSet<String>,
    tag_terms: HashSet<String>,
    access_count: AtomicU64,
    /// Unix millis of the last search hit, 0 = never
    last_accessed_ms: AtomicI64,
}

impl Slot {
    fn new(mut entry: KnowledgeEntry) -> Self {
        entry.vector = feature_vector(&entry.searchable_text());
        let last_ms = entry.last_accessed.map_or(0, |t| t.timestamp_millis());
        Self {
            title_terms: index_terms(&entry.title).into_iter().collect(),
            body_terms: index_terms(&entry.body).into_iter().collect(),
            tag_terms: entry.tags.iter().flat_map(|t| index_terms(t)).collect(),
            access_count: AtomicU64::new(entry.access_count),
            last_accessed_ms: AtomicI64::new(last_ms),
            entry,
        }
    }

    fn terms(&self) -> impl Iterator<Item = &String> {
        self.title_terms
            .iter()
            .chain(self.body_terms.iter())
            .chain(self.tag_terms.iter())
    }

    fn touch(&self, now: DateTime<Utc>) {
        self.access_count.fetch_add(1, Ordering::Relaxed);
        self.last_accessed_ms
            .store(now.timestamp_millis(), Ordering::Relaxed);
    }

    fn snapshot(&self) -> KnowledgeEntry {
        let mut entry = self.entry.clone();
        entry.access_count = self.access_count.load(Ordering::Relaxed);
        let ms = self.last_accessed_ms.load(Ordering::Relaxed);
        entry.last_accessed = (ms != 0)
            .then(|| DateTime::<Utc>::from_timestamp_millis(ms))
            .flatten();
        entry
    }

    fn score(&self, terms: &[String], request: &SearchRequest, now: DateTime<Utc>) -> f64 {
        let mut score = 0.0;
        for term in terms {
            if self.title_terms.contains(term) {
                score += 3.0;
            }
            if self.body_terms.contains(term) {
                score += 1.0;
            }
            if self.tag_terms.contains(term) {
                score += 2.0;
            }
        }
        if request.domain_hint == Some(self.entry.domain) {
            score += 2.0;
        }
        score += self.entry.quality;
        if now - self.entry.updated_at < Duration::days(RECENT_WINDOW_DAYS) {
            score += 0.5;
        }
        let expert_tag = self
            .entry
            .tags
            .iter()
            .any(|tag| request.expertise.contains(&tag.to_lowercase()));
        if expert_tag {
            score += 1.0;
        }
        score
    }
}

#[derive(Default)]
struct IndexState {
    slots: BTreeMap<String, Slot>,
    inverted: HashMap<String, BTreeSet<String>>,
}

impl IndexState {
    fn index_slot(&mut self, id: &str) {
        let Some(slot) = self.slots.get(id) else {
            return;
        };
        for term in slot.terms() {
            self.inverted
                .entry(term.clone())
                .or_default()
                .insert(id.to_string());
        }
    }

    fn unindex_slot(&mut self, id: &str) {
        let Some(slot) = self.slots.get(id) else {
            return;
        };
        for term in slot.terms() {
            if let Some(ids) = self.inverted.get_mut(term) {
                ids.remove(id);
                if ids.is_empty() {
                    self.inverted.remove(term);
                }
            }
        }
    }

    fn rebuild(&mut self) {
        self.inverted.clear();
        let ids: Vec<String> = self.slots.keys().cloned().collect();
        for id in &ids {
            self.index_slot(id);
        }
    }
}

/// The shared knowledge index.
pub struct KnowledgeIndex {
    state: RwLock<IndexState>,
    settings: IndexSettings,
    events: Option<Arc<EventBus>>,
}

impl Default for KnowledgeIndex {
    fn default() -> Self {
        Self::new(IndexSettings::default())
    }
}

impl KnowledgeIndex {
    pub fn new(settings: IndexSettings) -> Self {
        Self {
            state: RwLock::new(IndexState::default()),
            settings,
            events: None,
        }
    }

    /// An index pre-populated with the built-in seed corpus.
    pub fn with_seed_corpus(settings: IndexSettings) -> Self {
        let index = Self::new(settings);
        for entry in crate::seed::seed_entries() {
            let title = entry.title.clone();
            if let Err(e) = index.add(entry) {
                warn!(title = %title, error = %e, "Skipping invalid seed entry");
            }
        }
        index
    }

    /// Publish `KnowledgeChanged` events to this bus.
    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn settings(&self) -> IndexSettings {
        self.settings
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, IndexState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, IndexState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, operation: &str, entry_id: &str) {
        if let Some(events) = &self.events {
            events.publish(DomainEvent::KnowledgeChanged {
                operation: operation.into(),
                entry_id: entry_id.into(),
                timestamp: Utc::now(),
            });
        }
    }

    /// Add an entry; returns it with its assigned id and derived vector.
    pub fn add(&self, new: NewKnowledge) -> Result<KnowledgeEntry, KnowledgeError> {
        validate(&new.title, &new.body, new.quality)?;

        let now = Utc::now();
        let entry = KnowledgeEntry {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            body: new.body,
            domain: new.domain,
            tags: new.tags,
            quality: new.quality,
            vector: Vec::new(),
            access_count: 0,
            last_accessed: None,
            created_at: now,
            updated_at: now,
        };
        let id = entry.id.clone();

        let stored = {
            let mut state = self.write();
            let slot = Slot::new(entry);
            let stored = slot.snapshot();
            state.slots.insert(id.clone(), slot);
            state.index_slot(&id);
            stored
        };

        debug!(entry_id = %id, title = %stored.title, "Knowledge entry added");
        self.publish("add", &id);
        Ok(stored)
    }

    /// Apply a partial update; the vector and inverted index are recomputed.
    pub fn update(&self, id: &str, update: KnowledgeUpdate) -> Result<KnowledgeEntry, KnowledgeError> {
        let stored = {
            let mut state = self.write();
            let current = state
                .slots
                .get(id)
                .map(Slot::snapshot)
                .ok_or_else(|| KnowledgeError::NotFound(id.to_string()))?;

            let mut entry = current;
            if let Some(title) = update.title {
                entry.title = title;
            }
            if let Some(body) = update.body {
                entry.body = body;
            }
            if let Some(domain) = update.domain {
                entry.domain = domain;
            }
            if let Some(tags) = update.tags {
                entry.tags = tags;
            }
            if let Some(quality) = update.quality {
                entry.quality = quality;
            }
            validate(&entry.title, &entry.body, entry.quality)?;
            entry.updated_at = Utc::now();

            state.unindex_slot(id);
            let slot = Slot::new(entry);
            let stored = slot.snapshot();
            state.slots.insert(id.to_string(), slot);
            state.index_slot(id);
            stored
        };

        debug!(entry_id = %id, "Knowledge entry updated");
        self.publish("update", id);
        Ok(stored)
    }

    /// Remove an entry and rebuild the inverted index from scratch.
    pub fn delete(&self, id: &str) -> Result<KnowledgeEntry, KnowledgeError> {
        let removed = {
            let mut state = self.write();
            let slot = state
                .slots
                .remove(id)
                .ok_or_else(|| KnowledgeError::NotFound(id.to_string()))?;
            state.rebuild();
            slot.snapshot()
        };

        debug!(entry_id = %id, "Knowledge entry deleted, index rebuilt");
        self.publish("delete", id);
        Ok(removed)
    }

    pub fn get(&self, id: &str) -> Option<KnowledgeEntry> {
        self.read().slots.get(id).map(Slot::snapshot)
    }

    /// All entries, ordered by id.
    pub fn list(&self) -> Vec<KnowledgeEntry> {
        self.read().slots.values().map(Slot::snapshot).collect()
    }

    pub fn len(&self) -> usize {
        self.read().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().slots.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        let state = self.read();
        let mut by_domain = BTreeMap::new();
        for slot in state.slots.values() {
            *by_domain
                .entry(slot.entry.domain.as_str().to_string())
                .or_insert(0) += 1;
        }
        IndexStats {
            entries: state.slots.len(),
            terms: state.inverted.len(),
            by_domain,
        }
    }

    /// Keyword ∪ similarity search with composite ranking.
    ///
    /// Returned entries have their access counters bumped.
    pub fn search(&self, request: &SearchRequest) -> SearchResults {
        let now = Utc::now();
        let state = self.read();

        let mut terms: Vec<String> = Vec::new();
        for term in index_terms(&request.text) {
            if !terms.contains(&term) {
                terms.push(term);
            }
        }

        let mut candidates: BTreeSet<&str> = BTreeSet::new();
        for term in &terms {
            if let Some(ids) = state.inverted.get(term) {
                candidates.extend(ids.iter().map(String::as_str));
            }
        }

        let query_vector = feature_vector(&request.text);
        let similar = rank_by_similarity(
            &query_vector,
            state
                .slots
                .iter()
                .map(|(id, slot)| (id.as_str(), slot.entry.vector.as_slice())),
            self.settings.similarity_floor,
            self.settings.vector_top_k,
        );
        for (id, _) in &similar {
            if let Some((key, _)) = state.slots.get_key_value(id.as_str()) {
                candidates.insert(key.as_str());
            }
        }

        let total_candidates = candidates.len();
        let mut scored: Vec<(&Slot, f64)> = candidates
            .into_iter()
            .filter_map(|id| state.slots.get(id))
            .map(|slot| (slot, slot.score(&terms, request, now)))
            .collect();

        // stable: equal scores keep id order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(request.limit);

        let results = scored
            .into_iter()
            .map(|(slot, score)| {
                slot.touch(now);
                ScoredEntry {
                    entry: slot.snapshot(),
                    score,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            query = %request.text,
            candidates = total_candidates,
            returned = results.len(),
            "Knowledge search"
        );

        SearchResults {
            results,
            total_candidates,
        }
    }

    /// Persist every entry (with counters) under `key`.
    pub async fn snapshot(&self, store: &dyn KeyValueStore, key: &str) -> Result<usize, KnowledgeError> {
        let entries = self.list();
        let count = entries.len();
        let value = serde_json::to_value(&entries)
            .map_err(|e| KnowledgeError::Storage(e.to_string()))?;
        store
            .put(key, value)
            .await
            .map_err(|e| KnowledgeError::Storage(e.to_string()))?;
        info!(key, entries = count, store = store.name(), "Knowledge index snapshot written");
        Ok(count)
    }

    /// Replace the index contents with the snapshot under `key`.
    ///
    /// Returns the number of entries loaded, or `None` if no snapshot exists
    /// (the index is left untouched).
    pub async fn restore(&self, store: &dyn KeyValueStore, key: &str) -> Result<Option<usize>, KnowledgeError> {
        let Some(value) = store
            .get(key)
            .await
            .map_err(|e| KnowledgeError::Storage(e.to_string()))?
        else {
            return Ok(None);
        };

        let entries: Vec<KnowledgeEntry> =
            serde_json::from_value(value).map_err(|e| KnowledgeError::Storage(e.to_string()))?;
        let count = entries.len();

        {
            let mut state = self.write();
            state.slots = entries
                .into_iter()
                .map(|entry| (entry.id.clone(), Slot::new(entry)))
                .collect();
            state.rebuild();
        }

        info!(key, entries = count, store = store.name(), "Knowledge index restored");
        Ok(Some(count))
    }
}

fn validate(title: &str, body: &str, quality: f64) -> Result<(), KnowledgeError> {
    if title.trim().is_empty() {
        return Err(KnowledgeError::InvalidEntry("title must not be empty".into()));
    }
    if body.trim().is_empty() {
        return Err(KnowledgeError::InvalidEntry("body must not be empty".into()));
    }
    if !(0.0..=1.0).contains(&quality) {
        return Err(KnowledgeError::InvalidEntry(format!(
            "quality must be in [0, 1], got {quality}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn rust_entry() -> NewKnowledge {
        NewKnowledge::new(
            "Ownership in Rust",
            "Every value has a single owner; borrowing lends access without moving it.",
        )
        .with_domain(TopicDomain::Programming)
        .with_tags(["rust", "memory"])
        .with_quality(0.9)
    }

    #[test]
    fn add_then_search_exact_title() {
        let index = KnowledgeIndex::default();
        let added = index.add(rust_entry()).unwrap();

        let results = index.search(&SearchRequest::new("Ownership in Rust"));
        let hit = results
            .results
            .iter()
            .find(|r| r.entry.id == added.id)
            .expect("added entry should be found");
        assert!(hit.score > 0.0);
        assert!(results.total_candidates >= 1);
    }

    #[test]
    fn composite_score_components() {
        let index = KnowledgeIndex::default();
        index.add(rust_entry()).unwrap();

        // "ownership" title ×3, "rust" title ×3 + tag ×2, quality 0.9, recent 0.5
        let plain = index.search(&SearchRequest::new("ownership rust"));
        assert!((plain.results[0].score - 9.4).abs() < 1e-9);

        let hinted = index.search(
            &SearchRequest::new("ownership rust")
                .with_domain(TopicDomain::Programming)
                .with_expertise(vec!["Rust".into()]),
        );
        assert!((hinted.results[0].score - 12.4).abs() < 1e-9);
    }

    #[test]
    fn search_unions_keyword_and_vector_candidates() {
        let index = KnowledgeIndex::default();
        index.add(rust_entry()).unwrap();
        index
            .add(
                NewKnowledge::new("Caching layers", "A cache in front of a database cuts latency.")
                    .with_domain(TopicDomain::Technical),
            )
            .unwrap();

        // "caches" is not an indexed term, but it hits the "cache" feature
        let results = index.search(&SearchRequest::new("caches"));
        assert_eq!(results.total_candidates, 1);
        assert_eq!(results.results[0].entry.title, "Caching layers");
        assert!((results.results[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn search_truncates_to_limit_and_reports_total() {
        let index = KnowledgeIndex::default();
        for i in 0..4 {
            index
                .add(NewKnowledge::new(format!("Rust note {i}"), "rust details"))
                .unwrap();
        }
        let results = index.search(&SearchRequest::new("rust").with_limit(2));
        assert_eq!(results.results.len(), 2);
        assert_eq!(results.total_candidates, 4);
    }

    #[test]
    fn search_bumps_access_counters() {
        let index = KnowledgeIndex::default();
        let added = index.add(rust_entry()).unwrap();
        assert_eq!(added.access_count, 0);

        index.search(&SearchRequest::new("ownership"));
        index.search(&SearchRequest::new("ownership"));

        let entry = index.get(&added.id).unwrap();
        assert_eq!(entry.access_count, 2);
        assert!(entry.last_accessed.is_some());
    }

    #[test]
    fn update_is_reflected_in_search() {
        let index = KnowledgeIndex::default();
        let added = index.add(rust_entry()).unwrap();

        index
            .update(
                &added.id,
                KnowledgeUpdate {
                    title: Some("Borrow checker basics".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        let entry = index.get(&added.id).unwrap();
        assert_eq!(entry.title, "Borrow checker basics");
        assert_eq!(entry.tags, vec!["rust", "memory"]);

        let by_new = index.search(&SearchRequest::new("checker"));
        assert_eq!(by_new.results.len(), 1);
        let by_old = index.search(&SearchRequest::new("ownership"));
        assert!(by_old.results.is_empty());
    }

    #[test]
    fn delete_rebuilds_index() {
        let index = KnowledgeIndex::default();
        let a = index.add(rust_entry()).unwrap();
        index
            .add(NewKnowledge::new("Rust async", "Futures are lazy in rust"))
            .unwrap();

        let removed = index.delete(&a.id).unwrap();
        assert_eq!(removed.id, a.id);
        assert!(index.get(&a.id).is_none());

        let results = index.search(&SearchRequest::new("ownership"));
        assert!(results.results.is_empty());
        assert_eq!(index.search(&SearchRequest::new("rust")).results.len(), 1);

        assert!(matches!(index.delete(&a.id), Err(KnowledgeError::NotFound(_))));
    }

    #[test]
    fn invalid_entries_rejected() {
        let index = KnowledgeIndex::default();
        assert!(index.add(NewKnowledge::new("", "body")).is_err());
        assert!(index.add(NewKnowledge::new("t", "  ")).is_err());
        assert!(index.add(NewKnowledge::new("t", "b").with_quality(1.5)).is_err());
        assert!(index.is_empty());
    }

    #[test]
    fn stats_count_domains_and_terms() {
        let index = KnowledgeIndex::default();
        index.add(rust_entry()).unwrap();
        index.add(NewKnowledge::new("Market sizing", "Estimate revenue")).unwrap();

        let stats = index.stats();
        assert_eq!(stats.entries, 2);
        assert!(stats.terms > 5);
        assert_eq!(stats.by_domain.get("programming"), Some(&1));
        assert_eq!(stats.by_domain.get("general"), Some(&1));
    }

    #[test]
    fn seed_corpus_is_searchable() {
        let index = KnowledgeIndex::with_seed_corpus(IndexSettings::default());
        assert_eq!(index.len(), crate::seed::seed_entries().len(), "every seed entry loads");
        assert!(!index.search(&SearchRequest::new("rust ownership")).results.is_empty());
    }

    #[tokio::test]
    async fn mutations_publish_events() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let index = KnowledgeIndex::default().with_events(bus.clone());

        let added = index.add(rust_entry()).unwrap();
        let event = rx.recv().await.unwrap();
        match event.as_ref() {
            DomainEvent::KnowledgeChanged { operation, entry_id, .. } => {
                assert_eq!(operation, "add");
                assert_eq!(entry_id, &added.id);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn snapshot_and_restore_round_trip() {
        let store = InMemoryStore::new();
        let index = KnowledgeIndex::default();
        let added = index.add(rust_entry()).unwrap();
        index.search(&SearchRequest::new("ownership"));

        assert_eq!(index.snapshot(&store, "knowledge").await.unwrap(), 1);

        let restored = KnowledgeIndex::default();
        assert_eq!(restored.restore(&store, "knowledge").await.unwrap(), Some(1));

        let entry = restored.get(&added.id).unwrap();
        assert_eq!(entry.title, added.title);
        assert_eq!(entry.access_count, 1);
        assert_eq!(entry.vector, added.vector);
        assert_eq!(restored.search(&SearchRequest::new("ownership")).results.len(), 1);
    }

    #[tokio::test]
    async fn restore_missing_snapshot_leaves_index() {
        let store = InMemoryStore::new();
        let index = KnowledgeIndex::default();
        index.add(rust_entry()).unwrap();
        assert_eq!(index.restore(&store, "absent").await.unwrap(), None);
        assert_eq!(index.len(), 1);
    }
}

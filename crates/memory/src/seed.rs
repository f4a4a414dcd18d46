//! Built-in seed corpus, loaded when `knowledge.seed_corpus` is on.

use chorus_core::classification::TopicDomain;

use crate::knowledge::NewKnowledge;

pub fn seed_entries() -> Vec<NewKnowledge> {
    vec![
        NewKnowledge::new(
            "Rust ownership and borrowing",
            "Each value in Rust has a single owner. References borrow a value without taking \
             ownership; the borrow checker enforces one mutable or many shared references at a time.",
        )
        .with_domain(TopicDomain::Programming)
        .with_tags(["rust", "memory", "borrowing"])
        .with_quality(0.95),
        NewKnowledge::new(
            "Async runtimes",
            "An async runtime polls futures to completion. Work-stealing schedulers spread tasks \
             across threads; blocking calls inside async code starve the executor.",
        )
        .with_domain(TopicDomain::Programming)
        .with_tags(["async", "concurrency", "tokio"])
        .with_quality(0.85),
        NewKnowledge::new(
            "Algorithmic complexity",
            "Big-O notation describes how cost grows with input size. Nested loops over the same \
             data are usually quadratic; hashing turns many lookups into constant time.",
        )
        .with_domain(TopicDomain::Programming)
        .with_tags(["algorithm", "performance"])
        .with_quality(0.9),
        NewKnowledge::new(
            "Caching strategies",
            "A cache keeps hot data close to the consumer. Write-through, write-back and \
             cache-aside trade consistency against latency; eviction policies bound memory use.",
        )
        .with_domain(TopicDomain::Technical)
        .with_tags(["cache", "latency", "database"])
        .with_quality(0.85),
        NewKnowledge::new(
            "The scientific method",
            "Form a hypothesis, design an experiment, collect evidence, and check whether the \
             results are reproducible before drawing a conclusion.",
        )
        .with_domain(TopicDomain::Science)
        .with_tags(["experiment", "evidence"])
        .with_quality(0.9),
        NewKnowledge::new(
            "Energy conservation",
            "Energy is neither created nor destroyed in a closed system; it changes form between \
             kinetic, potential, thermal and chemical energy.",
        )
        .with_domain(TopicDomain::Science)
        .with_tags(["physics", "energy"])
        .with_quality(0.8),
        NewKnowledge::new(
            "Unit economics",
            "Customer acquisition cost and lifetime value decide whether growth is profitable. \
             Revenue that grows slower than cost signals a broken strategy.",
        )
        .with_domain(TopicDomain::Business)
        .with_tags(["revenue", "strategy", "startup"])
        .with_quality(0.8),
        NewKnowledge::new(
            "Managing stress",
            "Stress responses are normal. Naming the emotion, sleep, and breaking problems into \
             small steps reduce anxiety; persistent symptoms deserve professional support.",
        )
        .with_domain(TopicDomain::Psychology)
        .with_tags(["stress", "anxiety", "wellbeing"])
        .with_quality(0.75),
        NewKnowledge::new(
            "Story structure",
            "Most stories move through setup, confrontation and resolution. A character who \
             wants something and meets resistance creates tension.",
        )
        .with_domain(TopicDomain::Creative)
        .with_tags(["story", "writing"])
        .with_quality(0.7),
        NewKnowledge::new(
            "Ethics frameworks",
            "Consequentialism judges actions by outcomes, deontology by duties, and virtue ethics \
             by character. Each gives a different meaning to a moral choice.",
        )
        .with_domain(TopicDomain::Philosophy)
        .with_tags(["ethics", "moral"])
        .with_quality(0.8),
        NewKnowledge::new(
            "Spaced repetition",
            "Reviewing material at growing intervals helps a student learn and retain it longer \
             than cramming before an exam.",
        )
        .with_domain(TopicDomain::Education)
        .with_tags(["learning", "study"])
        .with_quality(0.75),
        NewKnowledge::new(
            "Contract basics",
            "A contract needs offer, acceptance and consideration. Terms that are ambiguous are \
             often read against the party that drafted them.",
        )
        .with_domain(TopicDomain::Law)
        .with_tags(["contract", "legal"])
        .with_quality(0.7),
    ]
}

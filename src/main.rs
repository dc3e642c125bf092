use std::time::Instant;

use sense_redux::{
    collect_prototypes, index::query::q, AdaptiveFilterBuilder, IdfSalience, InMemoryIndex, ReductionConfig,
    TermFrequencyVector, TermVectorSource,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

// デモ用の小さなコーパス: 語彙を 3 つの話題に分けて決定的に文書を生成する
const TOPICS: [&[&str]; 3] = [
    &["ocean", "tide", "reef", "kelp", "salt", "wave", "coral", "current"],
    &["desert", "dune", "cactus", "heat", "sand", "mirage", "oasis", "camel"],
    &["forest", "moss", "fern", "oak", "root", "canopy", "leaf", "bark"],
];
const DOCS_PER_TOPIC: usize = 400;

fn synthetic_corpus() -> Vec<TermFrequencyVector> {
    let mut seed = 0x9E37_79B9_7F4A_7C15u64;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };
    let mut docs = Vec::with_capacity(TOPICS.len() * DOCS_PER_TOPIC);
    for topic in TOPICS {
        for _ in 0..DOCS_PER_TOPIC {
            // 話題の語を 4 つ + 他話題の語を 1 つ混ぜる
            let mut pairs: Vec<(&str, u32)> = (0..4)
                .map(|_| (topic[next() as usize % topic.len()], (next() % 5 + 1) as u32))
                .collect();
            let other = TOPICS[next() as usize % TOPICS.len()];
            pairs.push((other[next() as usize % other.len()], 1));
            if let Ok(tf) = TermFrequencyVector::from_pairs(pairs) {
                docs.push(tf);
            }
        }
    }
    docs
}

fn main() -> sense_redux::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut index = InMemoryIndex::new();
    for doc in synthetic_corpus() {
        index.add_document(doc);
    }
    info!(documents = index.doc_num(), "corpus indexed");

    // フィルタ構築
    let query = TermFrequencyVector::from_pairs([("ocean", 4.0), ("tide", 3.0), ("reef", 2.0), ("sand", 1.0)])?;
    let builder = AdaptiveFilterBuilder::new(ReductionConfig::new().with_threshold(100));
    let salience = IdfSalience::new(&index);

    let start = Instant::now();
    let filter = builder.build(&query, &salience, &index)?;
    let candidates = builder.candidate_set(&query, &[], &salience, &index)?;
    println!("filter: {}", filter);
    println!("clauses: {}, stats: {:?}", filter.len(), filter.stats());
    println!("candidates: {} ({:?})", candidates.len(), start.elapsed());

    // カテゴリモデル構築 -> 候補のスコアリング
    let prototypes = collect_prototypes(&index, &index, &q::and([q::term("ocean"), q::term("tide")]), 10)?;
    let model = prototypes.build_model()?;
    println!(
        "category: {} examples, {} terms, rank {}",
        model.num_examples(),
        model.dictionary().len(),
        model.rank()
    );

    let start = Instant::now();
    let vectors = candidates
        .iter()
        .map(|&doc| index.term_vector(doc))
        .collect::<sense_redux::Result<Vec<_>>>()?;
    let scores = model.categorize_batch(&vectors);
    let mut ranked: Vec<(usize, f64)> = candidates.iter().copied().zip(scores).collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    println!("categorized {} candidates in {:?}", ranked.len(), start.elapsed());
    for (doc, score) in ranked.iter().take(5) {
        println!("  doc {:>5}  distance {:.4}", doc, score);
    }
    Ok(())
}

use proptest::prelude::*;
use search_core::{DocumentStatus, ExecutionPolicy, SearchServer};
use std::collections::BTreeMap;

const VOCABULARY: [&str; 10] = ["alpha", "beta", "gamma", "delta", "eps", "zeta", "eta", "theta", "iota", "kappa"];

fn build(docs: &[(Vec<usize>, i32)]) -> SearchServer {
    let mut server = SearchServer::new(["eta"]).unwrap();
    for (id, (words, rating)) in docs.iter().enumerate() {
        let text: Vec<&str> = words.iter().map(|&w| VOCABULARY[w]).collect();
        server.add_document(id as i32, &text.join(" "), DocumentStatus::Actual, &[*rating]).unwrap();
    }
    server
}

fn corpus_strategy() -> impl Strategy<Value = Vec<(Vec<usize>, i32)>> {
    prop::collection::vec((prop::collection::vec(0..VOCABULARY.len(), 1..8), -10..10i32), 1..40)
}

fn query_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec((0..VOCABULARY.len(), prop::bool::weighted(0.2)), 1..6).prop_map(|words| {
        let mut plus = Vec::new();
        let mut minus = Vec::new();
        for (w, is_minus) in words {
            if is_minus {
                minus.push(w);
            } else {
                plus.push(w);
            }
        }
        // a word requested both ways is rejected, keep the query well-formed
        minus.retain(|w| !plus.contains(w));
        plus.iter()
            .map(|&w| VOCABULARY[w].to_string())
            .chain(minus.iter().map(|&w| format!("-{}", VOCABULARY[w])))
            .collect::<Vec<_>>()
            .join(" ")
    })
}

proptest! {
    #[test]
    fn results_are_ordered_and_capped(docs in corpus_strategy(), query in query_strategy()) {
        let server = build(&docs);
        for policy in [ExecutionPolicy::Sequential, ExecutionPolicy::Parallel] {
            let hits = server.find_top_documents_with_policy(policy, &query).unwrap();
            prop_assert!(hits.len() <= 5);
            for pair in hits.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(b.relevance <= a.relevance + 1e-6);
                prop_assert!(a.rating >= b.rating || a.relevance > b.relevance);
            }
        }
    }

    #[test]
    fn minus_words_never_leak(docs in corpus_strategy(), query in query_strategy()) {
        let server = build(&docs);
        let minus: Vec<&str> = query.split(' ').filter_map(|w| w.strip_prefix('-')).collect();
        for hit in server.find_top_documents(&query).unwrap() {
            let freqs = server.word_frequencies(hit.id);
            prop_assert!(minus.iter().all(|m| !freqs.contains_key(*m)));
        }
    }

    #[test]
    fn sequential_matches_parallel(docs in corpus_strategy(), query in query_strategy()) {
        let server = build(&docs);
        let seq = server.find_top_documents_with_policy(ExecutionPolicy::Sequential, &query).unwrap();
        let par = server.find_top_documents_with_policy(ExecutionPolicy::Parallel, &query).unwrap();
        prop_assert_eq!(seq.len(), par.len());
        let par_by_id: BTreeMap<i32, (f64, i32)> = par.iter().map(|d| (d.id, (d.relevance, d.rating))).collect();
        for doc in &seq {
            // Ties at the top-K cut may pick different documents; relevance must still line up.
            match par_by_id.get(&doc.id) {
                Some(&(relevance, rating)) => {
                    prop_assert!((relevance - doc.relevance).abs() < 1e-6);
                    prop_assert_eq!(rating, doc.rating);
                }
                None => {
                    let tied = par.iter().any(|p| (p.relevance - doc.relevance).abs() < 1e-6 && p.rating == doc.rating);
                    prop_assert!(tied);
                }
            }
        }
    }

    #[test]
    fn removal_leaves_no_trace(docs in corpus_strategy(), victim in any::<prop::sample::Index>(), parallel in any::<bool>()) {
        let mut server = build(&docs);
        let id = victim.index(docs.len()) as i32;
        let policy = if parallel { ExecutionPolicy::Parallel } else { ExecutionPolicy::Sequential };
        server.remove_document_with_policy(policy, id).unwrap();
        prop_assert!(server.word_frequencies(id).is_empty());
        prop_assert!(!server.index_references(id));
        prop_assert!(!server.document_ids().any(|d| d == id));
        prop_assert_eq!(server.document_count(), docs.len() - 1);
    }
}

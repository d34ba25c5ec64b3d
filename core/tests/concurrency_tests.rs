use parking_lot::RwLock;
use rayon::prelude::*;
use search_core::process_queries::process_queries;
use search_core::{ConcurrentMap, DocumentStatus, ExecutionPolicy, SearchServer};
use std::sync::Arc;
use std::thread;

#[test]
fn concurrent_increments_of_one_key_are_exact() {
    const WORKERS: u64 = 8;
    const INCREMENTS: u64 = 10_000;
    const VALUE: u64 = 3;
    const KEY: u32 = 7;

    let map: Arc<ConcurrentMap<u32, u64>> = Arc::new(ConcurrentMap::new(10));
    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                for i in 0..INCREMENTS {
                    if i % WORKERS == worker {
                        *map.access(KEY) += VALUE;
                    } else {
                        *map.access(KEY + 1 + (i % 13) as u32) += 1;
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let result = map.build_ordinary_map();
    assert_eq!(result[&KEY], VALUE * INCREMENTS);
    let others: u64 = result.iter().filter(|(&k, _)| k != KEY).map(|(_, &v)| v).sum();
    assert_eq!(others, WORKERS * INCREMENTS - INCREMENTS);
}

#[test]
fn rayon_scattered_keys_sum_up() {
    let map: ConcurrentMap<i32, i64> = ConcurrentMap::new(7);
    (0..100_000i64).into_par_iter().for_each(|i| {
        *map.access((i % 1000) as i32) += i;
    });
    let result = map.build_ordinary_map();
    assert_eq!(result.len(), 1000);
    assert_eq!(result.values().sum::<i64>(), (0..100_000i64).sum::<i64>());
}

fn corpus() -> SearchServer {
    let mut server = SearchServer::from_stop_words_text("and with in on the").unwrap();
    let vocabulary = [
        "rat", "cat", "dog", "pet", "funny", "nasty", "curly", "hair", "collar", "tail", "fluffy", "white",
    ];
    for id in 0..300 {
        let words: Vec<&str> = (0..(3 + id % 7)).map(|k| vocabulary[(id * 7 + k * k) % vocabulary.len()]).collect();
        let text = words.join(" and ");
        let status = if id % 11 == 0 { DocumentStatus::Banned } else { DocumentStatus::Actual };
        server.add_document(id as i32, &text, status, &[id as i32 % 9, 3]).unwrap();
    }
    server
}

#[test]
fn batch_queries_run_against_one_index() {
    let server = corpus();
    let queries: Vec<String> = vec!["funny pet", "curly -hair", "cat dog -rat", "nothing here", "white collar tail"]
        .into_iter()
        .map(String::from)
        .collect();
    let batch = process_queries(&server, &queries).unwrap();
    for (query, hits) in queries.iter().zip(batch) {
        assert_eq!(hits, server.find_top_documents(query).unwrap());
    }
}

#[test]
fn sequential_and_parallel_rank_the_same_documents() {
    let server = corpus();
    for query in ["funny pet", "curly -hair", "cat dog -rat fluffy", "white collar tail -cat", "rat rat pet"] {
        let seq = server.find_top_documents_with_policy(ExecutionPolicy::Sequential, query).unwrap();
        let par = server.find_top_documents_with_policy(ExecutionPolicy::Parallel, query).unwrap();
        assert_eq!(seq.len(), par.len(), "{query}");
        for (s, p) in seq.iter().zip(&par) {
            assert!((s.relevance - p.relevance).abs() < 1e-6, "{query}: {s} vs {p}");
            assert_eq!(s.rating, p.rating);
        }
    }
}

#[test]
fn readers_share_engine_behind_rwlock() {
    let engine = Arc::new(RwLock::new(corpus()));
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let guard = engine.read();
                guard.find_top_documents_with_policy(ExecutionPolicy::Parallel, "funny nasty pet").unwrap()
            })
        })
        .collect();
    let results: Vec<_> = readers.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));

    engine.write().remove_document_with_policy(ExecutionPolicy::Parallel, 1).unwrap();
    assert_eq!(engine.read().document_count(), 299);
}

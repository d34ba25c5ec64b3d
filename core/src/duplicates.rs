use crate::server::SearchServer;
use crate::DocId;
use std::collections::BTreeSet;

/// Remove every document whose set of distinct words equals that of a
/// lower-id document. Term frequencies are ignored. Returns the ids actually
/// removed, in ascending order.
pub fn remove_duplicates(server: &mut SearchServer) -> Vec<DocId> {
    find_duplicates(server)
        .into_iter()
        .filter(|&id| match server.remove_document(id) {
            Ok(()) => {
                tracing::info!(id, "Found duplicate document id {id}");
                true
            }
            Err(err) => {
                tracing::warn!(id, %err, "duplicate not removed");
                false
            }
        })
        .collect()
}

/// Ids that [`remove_duplicates`] would remove, without touching the server.
pub fn find_duplicates(server: &SearchServer) -> Vec<DocId> {
    let mut seen: BTreeSet<BTreeSet<&str>> = BTreeSet::new();
    let mut duplicates = Vec::new();
    for id in server {
        let words: BTreeSet<&str> = server.word_frequencies(id).keys().map(|w| w.as_str()).collect();
        if !seen.insert(words) {
            duplicates.push(id);
        }
    }
    duplicates
}

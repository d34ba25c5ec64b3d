use crate::document::Document;
use crate::error::Result;
use crate::server::SearchServer;
use rayon::prelude::*;

/// Run independent queries concurrently; results keep the input order.
/// The first failing query's error is returned.
pub fn process_queries<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Vec<Document>>>
where
    S: AsRef<str> + Sync,
{
    queries.par_iter().map(|q| server.find_top_documents(q.as_ref())).collect()
}

/// Same as [`process_queries`], flattened query by query.
pub fn process_queries_joined<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Document>>
where
    S: AsRef<str> + Sync,
{
    Ok(process_queries(server, queries)?.into_iter().flatten().collect())
}

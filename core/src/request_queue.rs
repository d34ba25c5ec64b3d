//! Request telemetry: counts empty-result queries over a sliding window of
//! the last [`NO_RESULT_WINDOW`] requests.

use crate::config::NO_RESULT_WINDOW;
use crate::document::{Document, DocumentStatus};
use crate::error::Result;
use crate::execution::ExecutionPolicy;
use crate::server::SearchServer;
use crate::{DocId, Rating};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy)]
struct QueryResult {
    request_time: u64,
    found_docs: usize,
}

pub struct RequestQueue<'a> {
    server: &'a SearchServer,
    requests: VecDeque<QueryResult>,
    no_result_requests: usize,
    current_time: u64,
}

impl<'a> RequestQueue<'a> {
    pub fn new(server: &'a SearchServer) -> Self {
        Self { server, requests: VecDeque::new(), no_result_requests: 0, current_time: 0 }
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        self.add_find_request_with_policy(ExecutionPolicy::Sequential, raw_query)
    }

    pub fn add_find_request_by_status(&mut self, raw_query: &str, status: DocumentStatus) -> Result<Vec<Document>> {
        self.add_find_request_by_status_with_policy(ExecutionPolicy::Sequential, raw_query, status)
    }

    pub fn add_find_request_by<P>(&mut self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, Rating) -> bool + Sync,
    {
        self.add_find_request_by_with_policy(ExecutionPolicy::Sequential, raw_query, predicate)
    }

    pub fn add_find_request_with_policy(&mut self, policy: ExecutionPolicy, raw_query: &str) -> Result<Vec<Document>> {
        self.add_find_request_by_status_with_policy(policy, raw_query, DocumentStatus::Actual)
    }

    pub fn add_find_request_by_status_with_policy(
        &mut self,
        policy: ExecutionPolicy,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.add_find_request_by_with_policy(policy, raw_query, move |_, s, _| s == status)
    }

    /// Run the query and count it; a rejected query is not recorded.
    pub fn add_find_request_by_with_policy<P>(
        &mut self,
        policy: ExecutionPolicy,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, Rating) -> bool + Sync,
    {
        let result = self.server.find_top_documents_by_with_policy(policy, raw_query, predicate)?;
        self.record(result.len());
        Ok(result)
    }

    /// Empty-result requests among the last window of requests.
    pub fn no_result_requests(&self) -> usize { self.no_result_requests }

    /// Register the outcome of a request made outside this queue.
    pub fn record(&mut self, result_size: usize) {
        self.current_time += 1;
        if result_size == 0 {
            self.no_result_requests += 1;
        }
        while let Some(front) = self.requests.front() {
            if self.current_time - front.request_time < NO_RESULT_WINDOW {
                break;
            }
            if front.found_docs == 0 {
                self.no_result_requests -= 1;
            }
            self.requests.pop_front();
        }
        self.requests.push_back(QueryResult { request_time: self.current_time, found_docs: result_size });
    }
}

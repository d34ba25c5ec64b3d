//! In-memory TF-IDF document search engine.
//!
//! Documents are stored once in an append-only text log; the inverted index
//! only holds views into that text. Queries run either sequentially or in
//! parallel on rayon, the latter accumulating relevance in a lock-sharded map.

pub mod concurrent_map;
pub mod config;
pub mod document;
pub mod duplicates;
pub mod error;
pub mod execution;
pub mod index;
pub mod paginator;
pub mod process_queries;
pub mod query;
pub mod ranking;
pub mod request_queue;
pub mod server;
pub mod storage;
pub mod tokenizer;

pub use concurrent_map::ConcurrentMap;
pub use config::SearchConfig;
pub use document::{Document, DocumentStatus};
pub use error::{Result, SearchError};
pub use execution::ExecutionPolicy;
pub use index::Word;
pub use server::{MatchedDocument, SearchServer};

pub type DocId = i32;
pub type Rating = i32;

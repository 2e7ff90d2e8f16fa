//! Recent analysis history
//!
//! - **types**: `Sentiment`, `Source`, `AnalysisRecord`, `NewAnalysis`
//! - **persist**: durable key-value slot the history is mirrored to
//! - **store**: the bounded, newest-first `RecentHistoryStore`
//! - **export**: JSON and CSV renderings for download
//! - **error**: error types
//!
//! # Example
//!
//! ```rust,no_run
//! use sentiscope::history::{FileStorage, NewAnalysis, RecentHistoryStore, Sentiment, Source};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut store = RecentHistoryStore::open(FileStorage::new("./data", "recentAnalyses"));
//!
//!     store.add(NewAnalysis::new("what a great day", Sentiment::Positive, Source::Single))?;
//!
//!     for record in store.list() {
//!         println!("{} [{}] {}", record.timestamp, record.sentiment, record.text);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod export;
pub mod persist;
pub mod store;
pub mod types;

pub use error::{HistoryError, HistoryResult};
pub use export::{export, ExportFormat};
pub use persist::{FileStorage, HistoryStorage, MemoryStorage, DEFAULT_STORAGE_KEY};
pub use store::{RecentHistoryStore, HISTORY_CAPACITY};
pub use types::{AnalysisRecord, NewAnalysis, Sentiment, Source};

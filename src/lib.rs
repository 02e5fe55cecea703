//! # Reasoning Store
//!
//! A session-scoped, in-memory store for structured reasoning records:
//! chain-of-thought steps, decision analyses, debugging sessions,
//! diagram/visual-reasoning operations, and their siblings.
//!
//! ## Features
//!
//! - **Typed item store**: one generic store mapping opaque ids to
//!   `(category, payload)` pairs over a closed set of ten categories
//! - **Branch/revision index**: global sequence ordering with
//!   insertion-ordered branch and revision groupings for thought chains
//! - **Diagram reconstruction**: visual operations folded into materialized
//!   per-diagram element state, with complexity and similarity queries
//! - **Keyword search**: per-category inverted indices with OR-semantics
//!   over query terms
//! - **Session lifecycle**: touch-on-every-call inactivity eviction via a
//!   single watcher task per session, idempotent cleanup, and a registry
//!   guarding concurrent session creation
//! - **Versioned export/import**: envelope-wrapped payloads that round-trip
//!   per-category content without preserving ids
//!
//! ## Example
//!
//! ```ignore
//! use reasoning_store::config::SessionConfig;
//! use reasoning_store::session::SessionRegistry;
//! use reasoning_store::store::ThoughtData;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = SessionRegistry::new(SessionConfig::default());
//!     let session = registry.get_or_create("sess-1").await;
//!
//!     let outcome = session
//!         .add_thought(ThoughtData::new("Check the cache first", 1, 3, true))
//!         .await?;
//!     assert!(outcome.is_accepted());
//!
//!     let thoughts = session.get_thoughts().await?;
//!     assert_eq!(thoughts.len(), 1);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Configuration management and logging setup.
pub mod config;
/// Error types and result aliases.
pub mod error;
/// Session orchestration: lifecycle, facades, export/import, registry.
pub mod session;
/// Category tags, payload records, and the store/index structures.
pub mod store;

pub use config::{Config, SessionConfig};
pub use error::{AppError, AppResult, SessionError, SessionResult};
pub use session::{AddOutcome, Export, ReasoningSession, SessionRegistry, SessionStats};
pub use store::{Category, Payload, TypedItemStore};

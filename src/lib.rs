//! Knowledge Hub - curated tool and AI app directory
//!
//! The core is two pure functions:
//! - [`matcher::matches`]: case-insensitive substring-or-subsequence name match
//! - [`recommend::Recommender::recommend`]: keyword rules to tool suggestions
//!
//! Around it sit the catalog, a chat conversation, a local key-value store,
//! a mock login gate, the submission queue and an optional dispatch webhook.

pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod matcher;
pub mod notify;
pub mod recommend;
pub mod session;
pub mod storage;
pub mod submission;

pub use catalog::{filter_by_name, Catalog, CatalogEntry, EntryKind};
pub use error::{HubError, HubResult};
pub use matcher::{matches, normalize};
pub use recommend::{KeywordRule, Recommendation, Recommender};

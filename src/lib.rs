//! ReelSync - Movie Library Identification and Remote Sync
//!
//! ReelSync maps locally-held movie directories to canonical entries in a
//! local catalog mirror and reconciles the resulting records with a shared
//! remote store over HTTP.
//!
//! The two cores are the identity resolution pipeline ([`resolver`]: sidecar
//! cache, fuzzy lookup, interactive fallback) and the reconciliation engine
//! ([`remote`]: idempotent bulk upserts under `ReplaceExisting` / `InsertOnly`
//! policies). Everything else feeds them: the filesystem [`scanner`], the
//! [`catalog`] store and its TSV import, and the [`merge`] of local and
//! canonical data.

pub mod app;
pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod remote;
pub mod resolver;
pub mod scanner;

pub use app::run_app;

//! Kubernetes client for informer
//!
//! This crate builds the shared cluster client and lists namespaces, pods
//! and ingresses as plain name lists.

mod bootstrap;
mod lister;

pub use bootstrap::{BootstrapError, BootstrapOptions, connect, load_config};
pub use lister::{KubeLister, ResourceLister};

// Re-export types that are used in our public API
pub use informer_types::{ListError, ResourceKind, Scope};

//! Shared types for informer
//!
//! This crate contains the request-scoped values passed between the
//! Kubernetes listers and the HTTP layer.

use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;

/// Boxed error used as the cause of a failed list call
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

// ============================================================================
// Kubernetes Resource Types
// ============================================================================

/// Resource kinds that informer knows how to list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Namespace,
    Pod,
    Ingress,
}

impl ResourceKind {
    /// Plural, lowercase name as used by the Kubernetes API paths
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Namespace => "namespaces",
            ResourceKind::Pod => "pods",
            ResourceKind::Ingress => "ingresses",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

/// Where a list call was scoped
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    Cluster,
    Namespace(String),
}

impl Scope {
    pub fn namespaced(namespace: impl Into<String>) -> Self {
        Scope::Namespace(namespace.into())
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Cluster => f.write_str("cluster"),
            Scope::Namespace(ns) => write!(f, "namespace '{}'", ns),
        }
    }
}

/// Pods and ingresses of a single namespace
///
/// Assembled from two independent list calls, so the two lists are not an
/// atomic snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NamespaceDetail {
    pub namespace: String,
    pub pods: Vec<String>,
    /// Serialized as `ingresess`; existing clients depend on that key.
    #[serde(rename = "ingresess")]
    pub ingresses: Vec<String>,
}

impl NamespaceDetail {
    pub fn new(namespace: String, pods: Vec<String>, ingresses: Vec<String>) -> Self {
        Self {
            namespace,
            pods,
            ingresses,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// A list call against the cluster failed
#[derive(Debug, thiserror::Error)]
#[error("failed to list {kind} in {scope}: {source}")]
pub struct ListError {
    pub kind: ResourceKind,
    pub scope: Scope,
    #[source]
    pub source: BoxError,
}

impl ListError {
    pub fn new(kind: ResourceKind, scope: Scope, source: impl Into<BoxError>) -> Self {
        Self {
            kind,
            scope,
            source: source.into(),
        }
    }
}

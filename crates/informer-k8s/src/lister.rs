//! Name listers for namespaces, pods and ingresses

use std::fmt::Debug;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Namespace, Pod};
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::ListParams;
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use tracing::debug;

use informer_types::{ListError, ResourceKind, Scope};

/// Read-only listing of cluster resources as plain names
///
/// Each call issues one unfiltered list against its scope and returns names
/// in the order the API returned them.
#[async_trait]
pub trait ResourceLister: Send + Sync {
    async fn list_namespaces(&self) -> Result<Vec<String>, ListError>;

    async fn list_pods(&self, namespace: &str) -> Result<Vec<String>, ListError>;

    async fn list_ingresses(&self, namespace: &str) -> Result<Vec<String>, ListError>;
}

/// `ResourceLister` backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeLister {
    client: Client,
}

impl KubeLister {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn names<K>(
        api: Api<K>,
        kind: ResourceKind,
        scope: Scope,
    ) -> Result<Vec<String>, ListError>
    where
        K: Resource + Clone + DeserializeOwned + Debug,
    {
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|e| ListError::new(kind, scope.clone(), e))?;

        let names = object_names(list.items);
        debug!(%kind, %scope, count = names.len(), "listed resources");
        Ok(names)
    }
}

#[async_trait]
impl ResourceLister for KubeLister {
    async fn list_namespaces(&self) -> Result<Vec<String>, ListError> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        Self::names(namespaces, ResourceKind::Namespace, Scope::Cluster).await
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<String>, ListError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        Self::names(pods, ResourceKind::Pod, Scope::namespaced(namespace)).await
    }

    async fn list_ingresses(&self, namespace: &str) -> Result<Vec<String>, ListError> {
        let ingresses: Api<Ingress> = Api::namespaced(self.client.clone(), namespace);
        Self::names(ingresses, ResourceKind::Ingress, Scope::namespaced(namespace)).await
    }
}

/// Project listed objects down to their names, keeping order
fn object_names<K: Resource>(items: Vec<K>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.meta().name.clone().unwrap_or_default())
        .collect()
}

//! Cluster client bootstrap
//!
//! In-cluster service-account credentials are tried first, then a local
//! kubeconfig file.

use std::path::PathBuf;

use kube::config::{KubeConfigOptions, Kubeconfig, KubeconfigError};
use kube::{Client, Config};
use tracing::{debug, info};

/// Where to look for cluster credentials
#[derive(Clone, Debug)]
pub struct BootstrapOptions {
    /// Kubeconfig used when in-cluster discovery is skipped or fails
    pub kubeconfig: PathBuf,
    /// Try the mounted service-account credentials first
    pub in_cluster: bool,
}

impl BootstrapOptions {
    /// `~/.kube/config`, or a relative `.kube/config` when no home directory is known
    pub fn default_kubeconfig() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_default()
            .join(".kube")
            .join("config")
    }
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            kubeconfig: Self::default_kubeconfig(),
            in_cluster: true,
        }
    }
}

/// Startup failure to obtain credentials or build the client
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("failed to read kubeconfig {}: {source}", path.display())]
    ReadKubeconfig {
        path: PathBuf,
        #[source]
        source: KubeconfigError,
    },

    #[error("failed to load kubernetes configuration from {}: {source}", path.display())]
    LoadKubeconfig {
        path: PathBuf,
        #[source]
        source: KubeconfigError,
    },

    #[error("failed to create kubernetes client: {0}")]
    CreateClient(#[source] kube::Error),
}

/// Resolve a client configuration from the cluster environment or the kubeconfig file
pub async fn load_config(options: &BootstrapOptions) -> Result<Config, BootstrapError> {
    if options.in_cluster {
        match Config::incluster() {
            Ok(config) => {
                debug!(cluster_url = %config.cluster_url, "using in-cluster configuration");
                return Ok(config);
            }
            Err(e) => {
                info!(error = %e, "not running inside a cluster, trying local kubeconfig");
            }
        }
    }

    let path = &options.kubeconfig;
    let kubeconfig =
        Kubeconfig::read_from(path).map_err(|source| BootstrapError::ReadKubeconfig {
            path: path.clone(),
            source,
        })?;

    let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|source| BootstrapError::LoadKubeconfig {
            path: path.clone(),
            source,
        })?;

    debug!(
        kubeconfig = %path.display(),
        cluster_url = %config.cluster_url,
        "using local kubeconfig"
    );
    Ok(config)
}

/// Build the shared cluster client
pub async fn connect(options: &BootstrapOptions) -> Result<Client, BootstrapError> {
    let config = load_config(options).await?;
    Client::try_from(config).map_err(BootstrapError::CreateClient)
}

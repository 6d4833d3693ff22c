//! `ClusterObserver` backed by a real Kubernetes control plane.
//!
//! Credential resolution tries the in-cluster service account first,
//! then falls back to a user kubeconfig at `~/.kube/config` (spec.md
//! §6), mirroring the `pykube.KubeConfig.from_service_account` /
//! `from_file` fallback the original implementation used.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Node as KubeNode, Pod as KubePod};
use kube::api::{Api, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use log::{debug, warn};

use crate::clients::ClusterObserver;
use crate::core::node::NodeDto;
use crate::core::pod::PodDto;
use crate::error::AutoscalerError;

pub struct KubeClusterObserver {
    client: Client,
}

impl KubeClusterObserver {
    /// Builds a client, trying the in-cluster service account first and
    /// falling back to `~/.kube/config` on failure.
    pub async fn new() -> Result<Self, AutoscalerError> {
        let config = match Config::incluster() {
            Ok(config) => {
                debug!("using in-cluster service account credentials");
                config
            }
            Err(err) => {
                warn!(
                    "in-cluster credentials unavailable ({err}), falling back to ~/.kube/config"
                );
                let kubeconfig_path = dirs::home_dir()
                    .map(|home| home.join(".kube").join("config"))
                    .ok_or_else(|| {
                        AutoscalerError::ExternalUnavailable(
                            "could not resolve home directory for ~/.kube/config".to_string(),
                        )
                    })?;
                let kubeconfig = Kubeconfig::read_from(&kubeconfig_path)
                    .map_err(|err| AutoscalerError::ExternalUnavailable(err.to_string()))?;
                Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                    .await
                    .map_err(|err| AutoscalerError::ExternalUnavailable(err.to_string()))?
            }
        };

        let client = Client::try_from(config)
            .map_err(|err| AutoscalerError::ExternalUnavailable(err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ClusterObserver for KubeClusterObserver {
    async fn list_nodes(&self) -> Result<Vec<NodeDto>, AutoscalerError> {
        let api: Api<KubeNode> = Api::all(self.client.clone());
        let nodes = api.list(&ListParams::default()).await?;
        Ok(nodes.items.iter().map(NodeDto::from_kube_node).collect())
    }

    async fn list_pods(&self) -> Result<Vec<PodDto>, AutoscalerError> {
        let api: Api<KubePod> = Api::all(self.client.clone());
        let pods = api.list(&ListParams::default()).await?;
        Ok(pods.items.iter().map(PodDto::from_kube_pod).collect())
    }
}

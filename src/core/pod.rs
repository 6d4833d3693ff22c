//! Pod requests (half of C4's input): typed DTO plus the domain model
//! used by the usage aggregator.

use k8s_openapi::api::core::v1::Pod as KubePod;
use serde::{Deserialize, Serialize};

use crate::core::resources::{parse_resource, ResourceVector};
use crate::error::AutoscalerError;

const DEFAULT_MEMORY_BYTES: f64 = 50.0 * 1024.0 * 1024.0; // 50 MiB

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl PodPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, PodPhase::Succeeded | PodPhase::Failed)
    }

    fn from_str(raw: &str) -> Self {
        match raw {
            "Pending" => PodPhase::Pending,
            "Running" => PodPhase::Running,
            "Succeeded" => PodPhase::Succeeded,
            "Failed" => PodPhase::Failed,
            _ => PodPhase::Unknown,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContainerRequestDto {
    pub cpu: Option<String>,
    pub memory: Option<String>,
}

/// Schema-free pod facts lifted off the cluster API's wire object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PodDto {
    pub name: String,
    pub phase: String,
    pub node_name: Option<String>,
    pub container_requests: Vec<ContainerRequestDto>,
}

impl PodDto {
    pub fn from_kube_pod(pod: &KubePod) -> Self {
        let name = pod.metadata.name.clone().unwrap_or_default();
        let phase = pod
            .status
            .as_ref()
            .and_then(|status| status.phase.clone())
            .unwrap_or_default();
        let node_name = pod.spec.as_ref().and_then(|spec| spec.node_name.clone());
        let container_requests = pod
            .spec
            .as_ref()
            .map(|spec| {
                spec.containers
                    .iter()
                    .map(|container| {
                        let requests = container
                            .resources
                            .as_ref()
                            .and_then(|resources| resources.requests.as_ref());
                        ContainerRequestDto {
                            cpu: requests
                                .and_then(|r| r.get("cpu"))
                                .map(|q| q.0.clone()),
                            memory: requests
                                .and_then(|r| r.get("memory"))
                                .map(|q| q.0.clone()),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name,
            phase,
            node_name,
            container_requests,
        }
    }
}

/// A pod's resolved resource demand: the sum over containers of declared
/// requests, plus the node it's bound to (if any) and its phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PodRequest {
    pub name: String,
    pub node_name: Option<String>,
    pub phase: PodPhase,
    pub requests: ResourceVector,
}

/// Parses a `PodDto` into a `PodRequest`. Per container, a missing `cpu`
/// request defaults to 0 and a missing `memory` request defaults to 50
/// MiB; every pod additionally counts as `pods: 1` regardless of phase
/// (terminal pods are dropped by the caller, not here, since this
/// function has no opinion on aggregation).
pub fn parse_pod(dto: &PodDto) -> Result<PodRequest, AutoscalerError> {
    let mut requests = ResourceVector::new();
    requests.set("pods", 1.0);

    for container in &dto.container_requests {
        let cpu = match &container.cpu {
            Some(raw) => parse_resource(raw)?,
            None => 0.0,
        };
        let memory = match &container.memory {
            Some(raw) => parse_resource(raw)?,
            None => DEFAULT_MEMORY_BYTES,
        };
        requests.add("cpu", cpu);
        requests.add("memory", memory);
    }

    Ok(PodRequest {
        name: dto.name.clone(),
        node_name: dto.node_name.clone(),
        phase: PodPhase::from_str(&dto.phase),
        requests,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(cpu: Option<&str>, memory: Option<&str>) -> ContainerRequestDto {
        ContainerRequestDto {
            cpu: cpu.map(str::to_string),
            memory: memory.map(str::to_string),
        }
    }

    #[test]
    fn default_memory_when_unspecified() {
        let dto = PodDto {
            name: "p1".to_string(),
            phase: "Running".to_string(),
            node_name: Some("n1".to_string()),
            container_requests: vec![container(Some("1m"), None)],
        };
        let pod = parse_pod(&dto).unwrap();
        assert_eq!(pod.requests.cpu(), 0.001);
        assert_eq!(pod.requests.memory(), DEFAULT_MEMORY_BYTES);
        assert_eq!(pod.requests.pods(), 1.0);
    }

    #[test]
    fn sums_multiple_containers() {
        let dto = PodDto {
            name: "p1".to_string(),
            phase: "Running".to_string(),
            node_name: None,
            container_requests: vec![
                container(Some("1"), Some("1Gi")),
                container(Some("500m"), Some("512Mi")),
            ],
        };
        let pod = parse_pod(&dto).unwrap();
        assert_eq!(pod.requests.cpu(), 1.5);
        assert_eq!(
            pod.requests.memory(),
            1024f64.powi(3) + 512.0 * 1024f64.powi(2)
        );
    }

    #[test]
    fn terminal_phases_are_recognized() {
        assert!(PodPhase::from_str("Succeeded").is_terminal());
        assert!(PodPhase::from_str("Failed").is_terminal());
        assert!(!PodPhase::from_str("Running").is_terminal());
        assert!(!PodPhase::from_str("Pending").is_terminal());
    }
}

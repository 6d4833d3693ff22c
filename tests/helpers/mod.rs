//! Hand-written in-memory doubles for the two external collaborator
//! traits, used by `tests/scenarios.rs`. No mocking crate: the pack
//! writes its own fakes (see `ALU-Schumacher-AUDITOR`'s `KapiCollector`
//! tests), and the traits here are small enough that a fake is simpler
//! than a generated mock.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use fleet_autoscaler::clients::{ClusterObserver, ScalingGroupClient};
use fleet_autoscaler::core::asg::{AsgDto, AsgInstanceDto};
use fleet_autoscaler::core::node::NodeDto;
use fleet_autoscaler::core::pod::{ContainerRequestDto, PodDto};
use fleet_autoscaler::error::AutoscalerError;

pub struct FakeCluster {
    pub nodes: Vec<NodeDto>,
    pub pods: Vec<PodDto>,
}

#[async_trait]
impl ClusterObserver for FakeCluster {
    async fn list_nodes(&self) -> Result<Vec<NodeDto>, AutoscalerError> {
        Ok(self.nodes.clone())
    }

    async fn list_pods(&self) -> Result<Vec<PodDto>, AutoscalerError> {
        Ok(self.pods.clone())
    }
}

pub struct FakeScalingGroups {
    pub instances: Vec<AsgInstanceDto>,
    pub groups: Vec<AsgDto>,
    pub set_calls: Mutex<Vec<(String, i64)>>,
}

impl FakeScalingGroups {
    pub fn empty() -> Self {
        Self {
            instances: vec![],
            groups: vec![],
            set_calls: Mutex::new(vec![]),
        }
    }
}

#[async_trait]
impl ScalingGroupClient for FakeScalingGroups {
    async fn describe_instances(&self) -> Result<Vec<AsgInstanceDto>, AutoscalerError> {
        Ok(self.instances.clone())
    }

    async fn describe_groups(&self) -> Result<Vec<AsgDto>, AutoscalerError> {
        Ok(self.groups.clone())
    }

    async fn set_desired_capacity(
        &self,
        asg_name: &str,
        desired: i64,
    ) -> Result<(), AutoscalerError> {
        self.set_calls
            .lock()
            .unwrap()
            .push((asg_name.to_string(), desired));
        Ok(())
    }
}

pub fn node(name: &str, instance_id: &str, zone: &str, cpu: &str, memory: &str, pods: &str) -> NodeDto {
    NodeDto {
        name: name.to_string(),
        labels: HashMap::from([(
            "failure-domain.beta.kubernetes.io/zone".to_string(),
            zone.to_string(),
        )]),
        capacity: HashMap::from([
            ("cpu".to_string(), cpu.to_string()),
            ("memory".to_string(), memory.to_string()),
            ("pods".to_string(), pods.to_string()),
        ]),
        external_id: instance_id.to_string(),
    }
}

pub fn pod(name: &str, node_name: &str, cpu: &str) -> PodDto {
    PodDto {
        name: name.to_string(),
        phase: "Running".to_string(),
        node_name: Some(node_name.to_string()),
        container_requests: vec![ContainerRequestDto {
            cpu: Some(cpu.to_string()),
            memory: None,
        }],
    }
}

pub fn asg_instance(instance_id: &str, asg_name: &str, zone: &str) -> AsgInstanceDto {
    AsgInstanceDto {
        instance_id: instance_id.to_string(),
        asg_name: asg_name.to_string(),
        zone: zone.to_string(),
    }
}

pub fn asg(name: &str, desired: i64, min: i64, max: i64) -> AsgDto {
    AsgDto {
        name: name.to_string(),
        desired_capacity: desired,
        min_size: min,
        max_size: max,
    }
}

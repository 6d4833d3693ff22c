//! External collaborator interfaces (spec.md §6, §9 "Test seams").
//!
//! The reconciler depends on these traits, not on `kube` or
//! `aws-sdk-autoscaling` directly, so tests can supply in-memory doubles
//! without any network.

pub mod aws_client;
pub mod kube_client;

use async_trait::async_trait;

use crate::core::asg::{AsgDto, AsgInstanceDto};
use crate::core::node::NodeDto;
use crate::core::pod::PodDto;
use crate::error::AutoscalerError;

/// Observes the live workload and fleet from the cluster control plane.
#[async_trait]
pub trait ClusterObserver: Send + Sync {
    async fn list_nodes(&self) -> Result<Vec<NodeDto>, AutoscalerError>;
    async fn list_pods(&self) -> Result<Vec<PodDto>, AutoscalerError>;
}

/// Observes and mutates cloud scaling-group state.
#[async_trait]
pub trait ScalingGroupClient: Send + Sync {
    async fn describe_instances(&self) -> Result<Vec<AsgInstanceDto>, AutoscalerError>;
    async fn describe_groups(&self) -> Result<Vec<AsgDto>, AutoscalerError>;
    async fn set_desired_capacity(
        &self,
        asg_name: &str,
        desired: i64,
    ) -> Result<(), AutoscalerError>;
}

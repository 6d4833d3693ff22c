//! Reconciliation loop (C8): wires the observe -> decide -> act pipeline
//! end to end for a single pass, in the fetch order spec.md §5 requires
//! (nodes, then scaling-group membership, then pods) so that pod-to-group
//! resolution always sees a fleet snapshot at least as fresh as the one
//! it is aggregating demand against.

use std::time::Instant;

use log::{error, info};

use crate::applier::apply_resizes;
use crate::clients::{ClusterObserver, ScalingGroupClient};
use crate::core::asg::join_fleet;
use crate::core::node::build_inventory;
use crate::core::pod::parse_pod;
use crate::core::resources::ResourceVector;
use crate::core::usage::aggregate_usage;
use crate::error::AutoscalerError;
use crate::metrics::MetricsCollector;

/// Buffer policy applied uniformly to every scaling group (spec.md §4.5).
pub struct BufferPolicy {
    pub percentage: ResourceVector,
    pub fixed: ResourceVector,
}

/// Runs exactly one observe/decide/act pass. Any component error aborts
/// the pass (not the process): it is logged, counted in `metrics`, and
/// returned so the caller can decide whether to keep looping.
pub async fn run_once(
    observer: &dyn ClusterObserver,
    scaling_client: &dyn ScalingGroupClient,
    buffer: &BufferPolicy,
    dry_run: bool,
    metrics: &mut MetricsCollector,
) -> Result<(), AutoscalerError> {
    let started_at = Instant::now();

    let result = run_pass(observer, scaling_client, buffer, dry_run, metrics).await;

    match &result {
        Ok(()) => {
            let elapsed = started_at.elapsed().as_secs_f64();
            metrics.record_pass(elapsed);
            info!("reconciliation pass completed in {elapsed:.3}s");
        }
        Err(err) => {
            metrics.record_pass_error();
            error!("reconciliation pass aborted: {err}");
        }
    }

    result
}

async fn run_pass(
    observer: &dyn ClusterObserver,
    scaling_client: &dyn ScalingGroupClient,
    buffer: &BufferPolicy,
    dry_run: bool,
    metrics: &mut MetricsCollector,
) -> Result<(), AutoscalerError> {
    let node_dtos = observer.list_nodes().await?;
    let inventory = build_inventory(&node_dtos)?;

    let instances = scaling_client.describe_instances().await?;
    let fleet = join_fleet(&inventory, &instances);

    let pod_dtos = observer.list_pods().await?;
    let pods = pod_dtos
        .iter()
        .map(parse_pod)
        .collect::<Result<Vec<_>, _>>()?;
    let usage = aggregate_usage(&pods, &inventory, &instances);

    let required =
        crate::solver::required_sizes(&fleet, &usage, &buffer.percentage, &buffer.fixed)?;

    let groups = scaling_client.describe_groups().await?;
    apply_resizes(&required, &groups, scaling_client, dry_run, metrics).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::asg::{AsgDto, AsgInstanceDto};
    use crate::core::node::NodeDto;
    use crate::core::pod::{ContainerRequestDto, PodDto};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeObserver {
        nodes: Vec<NodeDto>,
        pods: Vec<PodDto>,
    }

    #[async_trait]
    impl ClusterObserver for FakeObserver {
        async fn list_nodes(&self) -> Result<Vec<NodeDto>, AutoscalerError> {
            Ok(self.nodes.clone())
        }
        async fn list_pods(&self) -> Result<Vec<PodDto>, AutoscalerError> {
            Ok(self.pods.clone())
        }
    }

    struct FakeScalingClient {
        instances: Vec<AsgInstanceDto>,
        groups: Vec<AsgDto>,
        set_calls: Mutex<Vec<(String, i64)>>,
    }

    #[async_trait]
    impl ScalingGroupClient for FakeScalingClient {
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

    fn node_dto(name: &str, instance_id: &str, cpu: &str) -> NodeDto {
        NodeDto {
            name: name.to_string(),
            labels: HashMap::new(),
            capacity: HashMap::from([
                ("cpu".to_string(), cpu.to_string()),
                ("memory".to_string(), "1Gi".to_string()),
                ("pods".to_string(), "10".to_string()),
            ]),
            external_id: instance_id.to_string(),
        }
    }

    fn pod_dto(name: &str, node_name: &str, cpu: &str) -> PodDto {
        PodDto {
            name: name.to_string(),
            phase: "Running".to_string(),
            node_name: Some(node_name.to_string()),
            container_requests: vec![ContainerRequestDto {
                cpu: Some(cpu.to_string()),
                memory: Some("1Mi".to_string()),
            }],
        }
    }

    fn no_buffer() -> BufferPolicy {
        BufferPolicy {
            percentage: ResourceVector::new(),
            fixed: ResourceVector::new(),
        }
    }

    #[tokio::test]
    async fn idle_fleet_with_no_demand_issues_no_resize() {
        let observer = FakeObserver {
            nodes: vec![node_dto("n1", "i-1", "1")],
            pods: vec![],
        };
        let scaling = FakeScalingClient {
            instances: vec![AsgInstanceDto {
                instance_id: "i-1".to_string(),
                asg_name: "a1".to_string(),
                zone: "z1".to_string(),
            }],
            groups: vec![AsgDto {
                name: "a1".to_string(),
                desired_capacity: 1,
                min_size: 1,
                max_size: 5,
            }],
            set_calls: Mutex::new(vec![]),
        };
        let mut metrics = MetricsCollector::new();
        run_once(&observer, &scaling, &no_buffer(), false, &mut metrics)
            .await
            .unwrap();
        assert!(scaling.set_calls.lock().unwrap().is_empty());
        assert_eq!(metrics.total_passes, 1);
    }

    #[tokio::test]
    async fn demand_above_capacity_triggers_scale_up() {
        let observer = FakeObserver {
            nodes: vec![node_dto("n1", "i-1", "1")],
            pods: vec![pod_dto("p1", "n1", "1")],
        };
        let scaling = FakeScalingClient {
            instances: vec![AsgInstanceDto {
                instance_id: "i-1".to_string(),
                asg_name: "a1".to_string(),
                zone: "z1".to_string(),
            }],
            groups: vec![AsgDto {
                name: "a1".to_string(),
                desired_capacity: 1,
                min_size: 1,
                max_size: 5,
            }],
            set_calls: Mutex::new(vec![]),
        };
        let mut metrics = MetricsCollector::new();
        run_once(&observer, &scaling, &no_buffer(), false, &mut metrics)
            .await
            .unwrap();
        let calls = scaling.set_calls.lock().unwrap();
        assert_eq!(calls.as_slice(), [("a1".to_string(), 2)]);
        assert_eq!(metrics.total_scale_ups, 1);
    }

    #[tokio::test]
    async fn dry_run_computes_but_never_calls_set_desired_capacity() {
        let observer = FakeObserver {
            nodes: vec![node_dto("n1", "i-1", "1")],
            pods: vec![pod_dto("p1", "n1", "1")],
        };
        let scaling = FakeScalingClient {
            instances: vec![AsgInstanceDto {
                instance_id: "i-1".to_string(),
                asg_name: "a1".to_string(),
                zone: "z1".to_string(),
            }],
            groups: vec![AsgDto {
                name: "a1".to_string(),
                desired_capacity: 1,
                min_size: 1,
                max_size: 5,
            }],
            set_calls: Mutex::new(vec![]),
        };
        let mut metrics = MetricsCollector::new();
        run_once(&observer, &scaling, &no_buffer(), true, &mut metrics)
            .await
            .unwrap();
        assert!(scaling.set_calls.lock().unwrap().is_empty());
        assert_eq!(metrics.total_scale_ups, 1);
    }

    #[tokio::test]
    async fn invalid_node_quantity_aborts_the_pass_and_is_counted() {
        let mut bad_node = node_dto("n1", "i-1", "1");
        bad_node
            .capacity
            .insert("cpu".to_string(), "garbage".to_string());
        let observer = FakeObserver {
            nodes: vec![bad_node],
            pods: vec![],
        };
        let scaling = FakeScalingClient {
            instances: vec![],
            groups: vec![],
            set_calls: Mutex::new(vec![]),
        };
        let mut metrics = MetricsCollector::new();
        let result = run_once(&observer, &scaling, &no_buffer(), false, &mut metrics).await;
        assert!(result.is_err());
        assert_eq!(metrics.total_pass_errors, 1);
        assert_eq!(metrics.total_passes, 0);
    }
}

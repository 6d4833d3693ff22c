//! Usage aggregator (C4): sums pod resource requests per `(asg, zone)`,
//! skipping terminal pods and folding unplaceable demand into the
//! sentinel group.

use std::collections::HashMap;

use crate::core::asg::AsgInstanceDto;
use crate::core::group::{GroupKey, UsageMap};
use crate::core::node::NodeInfo;
use crate::core::pod::PodRequest;

/// Resolves a pod's node assignment to a `GroupKey` using the node
/// inventory and scaling-group membership. A pod is assigned to
/// `GroupKey::Unknown` if it is unscheduled, its node is not in the
/// inventory, or its node has no scaling-group match.
fn resolve_group(
    pod: &PodRequest,
    nodes: &HashMap<String, NodeInfo>,
    membership: &HashMap<&str, &AsgInstanceDto>,
) -> GroupKey {
    let Some(node_name) = &pod.node_name else {
        return GroupKey::Unknown;
    };
    let Some(node) = nodes.get(node_name) else {
        return GroupKey::Unknown;
    };
    match membership.get(node.instance_id.as_str()) {
        Some(instance) => GroupKey::known(instance.asg_name.clone(), instance.zone.clone()),
        None => GroupKey::Unknown,
    }
}

/// Sums every non-terminal pod's resource requests into a `UsageMap`,
/// keyed by the group its node resolves to (or the sentinel group).
pub fn aggregate_usage(
    pods: &[PodRequest],
    nodes: &HashMap<String, NodeInfo>,
    instances: &[AsgInstanceDto],
) -> UsageMap {
    let membership: HashMap<&str, &AsgInstanceDto> = instances
        .iter()
        .map(|instance| (instance.instance_id.as_str(), instance))
        .collect();

    let mut usage: UsageMap = HashMap::new();
    for pod in pods {
        if pod.phase.is_terminal() {
            continue;
        }
        let key = resolve_group(pod, nodes, &membership);
        usage.entry(key).or_default().merge_add(&pod.requests);
    }
    usage
}

//! ASG join (C3): attach scaling-group membership to nodes and group
//! them by `(asg, zone)`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::group::{FleetSnapshot, GroupKey};
use crate::core::node::NodeInfo;

/// One entry of `describe_auto_scaling_instances` (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AsgInstanceDto {
    pub instance_id: String,
    pub asg_name: String,
    pub zone: String,
}

/// One entry of `describe_auto_scaling_groups` (spec.md §6), observed
/// just before the resize applier acts on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AsgDto {
    pub name: String,
    pub desired_capacity: i64,
    pub min_size: i64,
    pub max_size: i64,
}

/// Joins the node inventory with cloud scaling-group membership, grouping
/// matched nodes by `(asg, zone)`. Nodes whose `instance_id` has no
/// matching scaling-group entry are dropped: they are not managed by
/// this controller and must not influence size decisions.
pub fn join_fleet(
    nodes: &HashMap<String, NodeInfo>,
    instances: &[AsgInstanceDto],
) -> FleetSnapshot {
    let membership: HashMap<&str, &AsgInstanceDto> = instances
        .iter()
        .map(|instance| (instance.instance_id.as_str(), instance))
        .collect();

    let mut snapshot: FleetSnapshot = HashMap::new();
    for node in nodes.values() {
        if let Some(instance) = membership.get(node.instance_id.as_str()) {
            let key = GroupKey::known(instance.asg_name.clone(), instance.zone.clone());
            snapshot.entry(key).or_default().push(node.clone());
        }
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resources::ResourceVector;

    fn node(name: &str, instance_id: &str) -> NodeInfo {
        NodeInfo {
            name: name.to_string(),
            region: "r1".to_string(),
            zone: "z1".to_string(),
            instance_id: instance_id.to_string(),
            instance_type: "x1".to_string(),
            capacity: ResourceVector::new(),
        }
    }

    #[test]
    fn matched_nodes_are_grouped_by_asg_and_zone() {
        let mut nodes = HashMap::new();
        nodes.insert("n1".to_string(), node("n1", "i-1"));
        let instances = vec![AsgInstanceDto {
            instance_id: "i-1".to_string(),
            asg_name: "myasg".to_string(),
            zone: "myaz".to_string(),
        }];
        let snapshot = join_fleet(&nodes, &instances);
        let key = GroupKey::known("myasg", "myaz");
        assert_eq!(snapshot.get(&key).unwrap().len(), 1);
    }

    #[test]
    fn unmatched_nodes_are_dropped() {
        let mut nodes = HashMap::new();
        nodes.insert("n1".to_string(), node("n1", "i-unmatched"));
        let snapshot = join_fleet(&nodes, &[]);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn empty_inputs_yield_empty_snapshot() {
        assert!(join_fleet(&HashMap::new(), &[]).is_empty());
    }
}

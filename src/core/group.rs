//! Group key and the two snapshot maps keyed by it (spec.md §3, §9).
//!
//! `GroupKey` is a tagged enum rather than a `("unknown", "unknown")`
//! string tuple, per spec.md §9's explicit direction.

use std::collections::HashMap;

use crate::core::node::NodeInfo;
use crate::core::resources::ResourceVector;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    Known { asg: String, zone: String },
    Unknown,
}

impl GroupKey {
    pub fn known(asg: impl Into<String>, zone: impl Into<String>) -> Self {
        GroupKey::Known {
            asg: asg.into(),
            zone: zone.into(),
        }
    }
}

/// `(asg, zone) -> nodes currently in that group`, built by the ASG join
/// (C3). Nodes with no scaling-group match never appear here.
pub type FleetSnapshot = HashMap<GroupKey, Vec<NodeInfo>>;

/// `(asg, zone) -> summed resource demand`, built by the usage
/// aggregator (C4).
pub type UsageMap = HashMap<GroupKey, ResourceVector>;

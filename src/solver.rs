//! Required-size solver (C6) — the heart of the controller.
//!
//! For every live `(asg, zone)` group, computes the minimum node count
//! that covers buffered demand (plus conservatively-distributed sentinel
//! demand) with one-node headroom, then sums per-zone results into a
//! per-ASG required size.

use std::collections::HashMap;

use crate::buffer::apply_buffer;
use crate::core::group::{FleetSnapshot, GroupKey, UsageMap};
use crate::core::resources::ResourceVector;
use crate::error::AutoscalerError;

/// Computes `asg_name -> required_node_count` from a fleet snapshot, a
/// usage map, and buffer policy. Sentinel demand (`GroupKey::Unknown`) is
/// replicated additively into every live group, per spec.md §4.6's
/// conservative default.
pub fn required_sizes(
    fleet: &FleetSnapshot,
    usage: &UsageMap,
    buffer_percentage: &ResourceVector,
    buffer_fixed: &ResourceVector,
) -> Result<HashMap<String, u64>, AutoscalerError> {
    let zero = ResourceVector::new();
    let sentinel_demand = usage.get(&GroupKey::Unknown).unwrap_or(&zero);

    let mut sizes: HashMap<String, u64> = HashMap::new();

    for (key, nodes) in fleet.iter() {
        let GroupKey::Known { asg, .. } = key else {
            continue;
        };
        let Some(representative) = nodes.first() else {
            continue;
        };

        let mut demand = usage.get(key).cloned().unwrap_or_default();
        demand.merge_add(sentinel_demand);

        let needed = apply_buffer(&demand, buffer_percentage, buffer_fixed);

        let required_for_group = required_for_one_group(&needed, &representative.capacity)?;

        *sizes.entry(asg.clone()).or_insert(0) += required_for_group;
    }

    Ok(sizes)
}

/// `required[r] = ceil(needed[r] / cap[r]) + 1` when `needed[r] > 0`,
/// else 0; the group's required size is the max across resources.
/// `cap[r] == 0` with `needed[r] > 0` is `InvalidCapacity`.
fn required_for_one_group(
    needed: &ResourceVector,
    capacity: &ResourceVector,
) -> Result<u64, AutoscalerError> {
    let mut required = 0u64;
    for (resource, need) in needed.iter() {
        if *need <= 0.0 {
            continue;
        }
        let cap = capacity.get(resource);
        if cap <= 0.0 {
            return Err(AutoscalerError::InvalidCapacity {
                resource: resource.clone(),
                capacity: cap,
                needed: *need,
            });
        }
        let headroom_required = (need / cap).ceil() as u64 + 1;
        required = required.max(headroom_required);
    }
    Ok(required)
}

//! Resize applier (C7): clamps each ASG's required size to its live
//! `[MinSize, MaxSize]`, compares to its current `DesiredCapacity`, and
//! issues `set_desired_capacity` only when that changes anything.
//!
//! Idempotent by construction: re-invoking immediately with the same
//! inputs always recomputes the same clamped value, which then equals
//! the (now-updated) `DesiredCapacity` and short-circuits as a no-op.

use std::collections::HashMap;

use log::{info, warn};

use crate::clients::ScalingGroupClient;
use crate::core::asg::AsgDto;
use crate::error::AutoscalerError;
use crate::metrics::MetricsCollector;

enum ResizePlan {
    NoOp,
    Set { clamped: i64, constrained: bool },
}

/// Clamps `desired_new` to `bounds`, then decides whether a write is
/// needed. A clamp that lands back on the current desired capacity is a
/// no-op even if it differs from `desired_new` (spec.md §4.7 steps 3-4
/// are checked in that order).
fn plan_resize(desired_new: i64, bounds: &AsgDto) -> ResizePlan {
    let clamped = desired_new.clamp(bounds.min_size, bounds.max_size);
    if clamped == bounds.desired_capacity {
        return ResizePlan::NoOp;
    }
    ResizePlan::Set {
        clamped,
        constrained: clamped != desired_new,
    }
}

/// Applies every required size against its ASG's live bounds. An ASG
/// named by the solver but absent from `groups` (e.g. deleted between
/// the membership and group-bounds calls) is skipped with a warning,
/// not treated as a pass-level failure — the next pass will pick it up
/// once cloud state settles.
pub async fn apply_resizes(
    required: &HashMap<String, u64>,
    groups: &[AsgDto],
    client: &dyn ScalingGroupClient,
    dry_run: bool,
    metrics: &mut MetricsCollector,
) -> Result<(), AutoscalerError> {
    let bounds_by_name: HashMap<&str, &AsgDto> =
        groups.iter().map(|group| (group.name.as_str(), group)).collect();

    for (asg_name, desired_new) in required {
        let Some(bounds) = bounds_by_name.get(asg_name.as_str()) else {
            warn!("ASG {asg_name:?} has required size but no observed bounds, skipping");
            continue;
        };

        match plan_resize(*desired_new as i64, bounds) {
            ResizePlan::NoOp => {}
            ResizePlan::Set {
                clamped,
                constrained,
            } => {
                if constrained {
                    warn!(
                        "desired size for {asg_name:?} constrained from {desired_new} to {clamped} by [{}, {}]",
                        bounds.min_size, bounds.max_size
                    );
                    metrics.total_constrained_resizes += 1;
                }

                if clamped > bounds.desired_capacity {
                    metrics.total_scale_ups += 1;
                } else {
                    metrics.total_scale_downs += 1;
                }

                if dry_run {
                    info!(
                        "dry-run: would set {asg_name:?} desired capacity {} -> {clamped}",
                        bounds.desired_capacity
                    );
                } else {
                    info!(
                        "setting {asg_name:?} desired capacity {} -> {clamped}",
                        bounds.desired_capacity
                    );
                    client.set_desired_capacity(asg_name, clamped).await?;
                }
            }
        }
    }

    Ok(())
}

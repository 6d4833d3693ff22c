//! Buffer policy (C5): per-resource percentage + fixed headroom applied
//! to demand before sizing.

use crate::core::resources::ResourceVector;

/// `buffered[r] = v[r] * (1 + percentage[r] / 100) + fixed[r]` for every
/// resource present in `v`. Resources absent from `percentage`/`fixed`
/// default to 0% / 0. Returns a new vector; inputs are unchanged.
pub fn apply_buffer(
    v: &ResourceVector,
    percentage: &ResourceVector,
    fixed: &ResourceVector,
) -> ResourceVector {
    let mut buffered = ResourceVector::new();
    for (resource, value) in v.iter() {
        let pct = percentage.get(resource);
        let fix = fixed.get(resource);
        buffered.set(resource.clone(), value * (1.0 + pct / 100.0) + fix);
    }
    buffered
}

//! Location label resolution. No geocoding provider is in scope; a
//! mention's `declared_location` is the only location signal available,
//! so resolution is a deterministic pass-through rather than an inferred
//! guess (§9 Open Question resolution #4).

use govint_types::Mention;

/// Normalize `mention.declared_location` into `location_label` with a
/// fixed confidence of 1.0, or leave both `None` when nothing was
/// declared. Idempotent.
pub fn resolve_location(mention: &mut Mention) {
    match mention.declared_location.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(declared) => {
            let normalized: String = declared.split_whitespace().collect::<Vec<_>>().join(" ");
            mention.location_label = Some(normalized);
            mention.location_confidence = Some(1.0);
        }
        None => {
            mention.location_label = None;
            mention.location_confidence = None;
        }
    }
}

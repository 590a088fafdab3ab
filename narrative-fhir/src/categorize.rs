use narrative_core::{Bundle, CategorizedResources};

/// Split bundle entries into buckets, keeping source order within each bucket.
/// Entries without a resource are skipped.
pub fn categorize(bundle: &Bundle) -> CategorizedResources {
    let mut resources = CategorizedResources::default();
    for resource in bundle.entries.iter().filter_map(|entry| entry.resource.clone()) {
        resources.insert(resource);
    }
    resources
}

/// Number of entries in the bundle, including entries without a resource.
pub fn count_resources(bundle: &Bundle) -> usize {
    bundle.entries.len()
}

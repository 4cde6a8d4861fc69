//! Recognizing kind clusters from kube context names.
//!
//! kind >= 0.6 names contexts `kind-<cluster>`, older releases used
//! `<cluster>@kind`.

const CONTEXT_PREFIX: &str = "kind-";
const LEGACY_CONTEXT_SUFFIX: &str = "@kind";

/// Whether the kube context points at a kind cluster
pub fn is_kind_cluster(kube_context: &str) -> bool {
    kube_context.ends_with(LEGACY_CONTEXT_SUFFIX) || kube_context.starts_with(CONTEXT_PREFIX)
}

/// Cluster name to pass to `kind load --name`
pub fn kind_cluster_name(kube_context: &str) -> &str {
    if let Some(name) = kube_context.strip_suffix(LEGACY_CONTEXT_SUFFIX) {
        return name;
    }
    kube_context
        .strip_prefix(CONTEXT_PREFIX)
        .unwrap_or(kube_context)
}

/// Cluster name for a kind context, `None` for any other context
pub fn detect(kube_context: &str) -> Option<&str> {
    is_kind_cluster(kube_context).then(|| kind_cluster_name(kube_context))
}

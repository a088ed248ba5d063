//! `selectBackend(task)` — the four-step policy spec.md §4.7 names.

use scrape_core::{BackendKind, Task};

/// Steps 1-4 of `selectBackend`. Step 2 and step 4 need facts the policy
/// function itself has no way to look up (circuit state, quota
/// remaining), so the caller — [`crate::handler::OrchestratorHandler`] —
/// passes them in rather than this function reaching into C1/C3 itself.
pub fn select_backend(task: &Task, use_metered_first: bool, circuit_open: bool, quota_available: bool) -> BackendKind {
    // Step 1: explicit metered source, or the global override.
    if task.is_metered() || use_metered_first {
        return degrade_if_needed(BackendKind::MeteredApi, task, quota_available);
    }

    let native = BackendKind::native_for(&task.source).unwrap_or(BackendKind::CompanyPage);

    // Step 2: native domain's circuit is open, fall back to metered.
    if circuit_open {
        return degrade_if_needed(BackendKind::MeteredApi, task, quota_available);
    }

    // Step 3: the source's native backend kind.
    native
}

/// Step 4: metered chosen but quota exhausted — degrade to `rss` or
/// `company_page` depending on what the source would natively resolve to.
fn degrade_if_needed(chosen: BackendKind, task: &Task, quota_available: bool) -> BackendKind {
    if chosen != BackendKind::MeteredApi || quota_available {
        return chosen;
    }
    quota_fallback_backend(task)
}

/// The backend a task falls back to once `C3.tryAcquire` has actually
/// refused it (spec.md §4.7 step 4, §7: "the orchestrator attempts a
/// different backend kind"). Shared between the pre-flight snapshot check
/// in `select_backend` (`quota_available` from `remaining > 0`, which
/// can't see the free-tier high-value gate) and
/// [`crate::handler::OrchestratorHandler`]'s post-refusal reroute, which
/// catches every refusal reason `tryAcquire` can return.
pub fn quota_fallback_backend(task: &Task) -> BackendKind {
    match BackendKind::native_for(&task.source) {
        Some(BackendKind::Rss) => BackendKind::Rss,
        _ => BackendKind::CompanyPage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(source: &str) -> Task {
        Task::new("t1", source, 5)
    }

    #[test]
    fn explicit_metered_source_selects_metered_api() {
        assert_eq!(select_backend(&task("metered_api"), false, false, true), BackendKind::MeteredApi);
    }

    #[test]
    fn global_override_routes_everything_through_metered_api() {
        assert_eq!(select_backend(&task("rss"), true, false, true), BackendKind::MeteredApi);
    }

    #[test]
    fn open_circuit_falls_back_to_metered_api() {
        assert_eq!(select_backend(&task("government"), false, true, true), BackendKind::MeteredApi);
    }

    #[test]
    fn closed_circuit_uses_the_native_backend() {
        assert_eq!(select_backend(&task("rss"), false, false, true), BackendKind::Rss);
    }

    #[test]
    fn unrecognized_source_defaults_to_company_page() {
        assert_eq!(select_backend(&task("acme-careers"), false, false, true), BackendKind::CompanyPage);
    }

    #[test]
    fn exhausted_quota_degrades_metered_to_rss_when_source_is_rss_native() {
        assert_eq!(select_backend(&task("rss"), true, false, false), BackendKind::Rss);
    }

    #[test]
    fn exhausted_quota_degrades_metered_to_company_page_otherwise() {
        assert_eq!(select_backend(&task("metered_api"), false, false, false), BackendKind::CompanyPage);
    }
}

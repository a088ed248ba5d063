//! `domainFor(source, url)` (spec.md §4.7 step 1) — the key C1 and C2 key
//! their per-target state on.
//!
//! `original_source/.../orchestrator.py`'s `_get_domain` is a hardcoded
//! `domain_mapping` dict from source tag to hostname (`linkedin` →
//! `linkedin.com`, `indeed` → `indeed.com`, `glassdoor` → `glassdoor.com`,
//! `serpapi` → `serpapi.com`), falling back to the source tag itself for
//! anything unrecognized. That mapping is carried over here for the named
//! job boards; sources that carry a concrete URL (company pages, browser-
//! driven backends) resolve to the URL's host instead, which the Python
//! never did — it only ever dispatched by board name, never by arbitrary
//! URL.

use scrape_core::Task;

/// Named job boards with a fixed hostname, mirroring the source's
/// `domain_mapping` table.
fn named_board_domain(source: &str) -> Option<&'static str> {
    match source {
        "linkedin" => Some("linkedin.com"),
        "indeed" => Some("indeed.com"),
        "glassdoor" => Some("glassdoor.com"),
        _ => None,
    }
}

/// Resolves the domain key for `task`, given the fixed tag the metered
/// backend shares across every query (`metered_domain`, since it has no
/// hostname of its own to extract).
pub fn resolve_domain(task: &Task, metered_domain: &str) -> String {
    if let Some(fixed) = named_board_domain(&task.source) {
        return fixed.to_string();
    }
    if task.source == "metered_api" || task.source == "serpapi" {
        return metered_domain.to_string();
    }
    if let Some(host) = task.url.as_deref().and_then(host_of) {
        return host;
    }
    task.source.clone()
}

fn host_of(raw: &str) -> Option<String> {
    url::Url::parse(raw).ok().and_then(|u| u.host_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_boards_map_to_fixed_hostnames() {
        let task = Task::new("t1", "linkedin", 5);
        assert_eq!(resolve_domain(&task, "serpapi.com"), "linkedin.com");
    }

    #[test]
    fn metered_source_maps_to_the_configured_metered_domain() {
        let task = Task::new("t1", "metered_api", 5);
        assert_eq!(resolve_domain(&task, "serpapi.com"), "serpapi.com");
    }

    #[test]
    fn url_bearing_task_resolves_to_the_url_host() {
        let task = Task::new("t1", "company_page", 5).with_url("https://acme.example/careers");
        assert_eq!(resolve_domain(&task, "serpapi.com"), "acme.example");
    }

    #[test]
    fn unknown_source_without_url_falls_back_to_the_source_tag() {
        let task = Task::new("t1", "government", 5);
        assert_eq!(resolve_domain(&task, "serpapi.com"), "government");
    }
}

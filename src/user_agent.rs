//! Shared User-Agent strings for download and rendering traffic.
//!
//! Media origins commonly reject empty or library-default agents, so asset
//! requests go out with a browser-like header unless the caller overrides it.

/// Browser User-Agent sent with every asset request by default.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Returns the User-Agent to use, preferring a non-blank override.
#[must_use]
pub(crate) fn effective_user_agent(override_ua: Option<&str>) -> String {
    override_ua
        .map(str::trim)
        .filter(|ua| !ua.is_empty())
        .unwrap_or(BROWSER_USER_AGENT)
        .to_string()
}

/// Prefixes a resource segment (`/databases`, `/groups`, ...) with the API
/// version and, when one is configured, the organization scope.
///
/// ```
/// use turso_platform_http::scoped_path;
///
/// assert_eq!(scoped_path(Some("acme"), "/groups"), "/v1/organizations/acme/groups");
/// assert_eq!(scoped_path(None, "/groups"), "/v1/groups");
/// ```
pub fn scoped_path(organization: Option<&str>, segment: &str) -> String {
    match organization {
        Some(org) if !org.is_empty() => format!("/v1/organizations/{org}{segment}"),
        _ => format!("/v1{segment}"),
    }
}

#[cfg(test)]
mod tests {
    use super::scoped_path;

    #[test]
    fn organization_prefix_when_configured() {
        for org in ["acme", "my-org", "a"] {
            assert_eq!(
                scoped_path(Some(org), "/databases"),
                format!("/v1/organizations/{org}/databases")
            );
        }
    }

    #[test]
    fn bare_prefix_without_organization() {
        assert_eq!(scoped_path(None, "/databases"), "/v1/databases");
        assert_eq!(scoped_path(Some(""), "/invoices"), "/v1/invoices");
    }

    #[test]
    fn nested_segment_is_kept_verbatim() {
        assert_eq!(
            scoped_path(Some("acme"), "/databases/db1/instances"),
            "/v1/organizations/acme/databases/db1/instances"
        );
    }
}

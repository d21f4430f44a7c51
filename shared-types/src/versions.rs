use crate::error::InterfaceError;

/// The only record version this operator speaks.
pub const SCHEMA_VERSION: &str = "v1";

/// Result of checking a consumer's advertised versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionCheck {
    /// The consumer listed a version we publish.
    Compatible(String),
    /// The consumer listed nothing; it gets the current version.
    Unlisted,
    /// The consumer listed only versions we do not publish.
    Incompatible(Vec<String>),
}

/// Render a version list the way it is stored in a databag (a YAML sequence).
pub fn encode_supported_versions(versions: &[&str]) -> Result<String, InterfaceError> {
    serde_yaml::to_string(versions).map_err(|e| InterfaceError::MalformedVersions(e.to_string()))
}

/// Parse `_supported_versions`. Any YAML sequence of strings is accepted,
/// block (`- v1`) or flow (`[v1, v2]`).
pub fn parse_supported_versions(raw: &str) -> Result<Vec<String>, InterfaceError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_yaml::from_str::<Option<Vec<String>>>(raw)
        .map(Option::unwrap_or_default)
        .map_err(|e| InterfaceError::MalformedVersions(e.to_string()))
}

/// Decide whether a consumer can receive our record.
pub fn negotiate(remote: Option<&str>) -> Result<VersionCheck, InterfaceError> {
    let Some(raw) = remote else {
        return Ok(VersionCheck::Unlisted);
    };

    let versions = parse_supported_versions(raw)?;
    if versions.is_empty() {
        return Ok(VersionCheck::Unlisted);
    }

    if versions.iter().any(|v| v == SCHEMA_VERSION) {
        Ok(VersionCheck::Compatible(SCHEMA_VERSION.to_string()))
    } else {
        Ok(VersionCheck::Incompatible(versions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode_supported_versions(&["v1"]).unwrap(), "- v1\n");
        assert_eq!(
            encode_supported_versions(&["v1", "v2"]).unwrap(),
            "- v1\n- v2\n"
        );
    }

    #[test]
    fn test_parse_yaml_list() {
        assert_eq!(
            parse_supported_versions("- v1\n- 'v2'\n").unwrap(),
            vec!["v1".to_string(), "v2".to_string()]
        );
    }

    #[test]
    fn test_parse_flow_list() {
        assert_eq!(
            parse_supported_versions(r#"["v2", "v1"]"#).unwrap(),
            vec!["v2".to_string(), "v1".to_string()]
        );
    }

    #[test]
    fn test_parse_unquoted_flow_list() {
        assert_eq!(
            negotiate(Some("[v1, v2]")).unwrap(),
            VersionCheck::Compatible("v1".to_string())
        );
    }

    #[test]
    fn test_parse_ignores_comments() {
        assert_eq!(
            parse_supported_versions("- v1 # current\n# - v0\n").unwrap(),
            vec!["v1".to_string()]
        );
        assert_eq!(
            negotiate(Some("- v1 # current\n")).unwrap(),
            VersionCheck::Compatible("v1".to_string())
        );
    }

    #[test]
    fn test_parse_explicit_null_is_unlisted() {
        assert_eq!(negotiate(Some("~")).unwrap(), VersionCheck::Unlisted);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_supported_versions("v1").is_err());
        assert!(parse_supported_versions("[v1").is_err());
        assert!(parse_supported_versions("versions: [v1]").is_err());
    }

    #[test]
    fn test_negotiate() {
        assert_eq!(negotiate(None).unwrap(), VersionCheck::Unlisted);
        assert_eq!(negotiate(Some("")).unwrap(), VersionCheck::Unlisted);
        assert_eq!(
            negotiate(Some("- v1\n")).unwrap(),
            VersionCheck::Compatible("v1".to_string())
        );
        assert_eq!(
            negotiate(Some("- v2\n")).unwrap(),
            VersionCheck::Incompatible(vec!["v2".to_string()])
        );
    }
}

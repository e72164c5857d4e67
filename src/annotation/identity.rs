//! Identifier extraction
//!
//! Concepts and agents arrive as URIs. Identity is the trailing path
//! segment; the URI around it is surface syntax.

use uuid::Uuid;

/// Trailing path segment of an identifier. A bare identifier is returned
/// unchanged; a URI ending in `/` has an empty trailing segment.
pub fn trailing_segment(id: &str) -> &str {
    let trimmed = id.trim();
    match trimmed.rfind('/') {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}

/// Canonical concept identifier. UUID segments are lowercased so every
/// spelling of the same UUID names one node.
pub fn concept_id(id: &str) -> String {
    let segment = trailing_segment(id);
    if is_uuid(segment) {
        segment.to_lowercase()
    } else {
        segment.to_string()
    }
}

pub fn is_uuid(s: &str) -> bool {
    Uuid::parse_str(s).is_ok()
}

/// Annotating agent identifier.
///
/// URIs yield their trailing segment only when it is a UUID; any other URI
/// yields an empty identifier. A bare token with no path is kept as-is.
pub fn agent_id(agent_role: &str) -> String {
    let trimmed = agent_role.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let segment = trailing_segment(trimmed);
    if is_uuid(segment) {
        return segment.to_lowercase();
    }
    if trimmed.contains('/') || trimmed.contains(':') {
        return String::new();
    }
    trimmed.to_string()
}

/// Render a stored identifier back to its URI form when it is a UUID
pub fn to_uri(prefix: &str, id: &str) -> String {
    if !id.is_empty() && is_uuid(id) {
        format!("{}{}", prefix, id)
    } else {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGENT_UUID: &str = "0edd3c31-1fd0-4ef6-9230-8d545be3880a";

    #[test]
    fn test_trailing_segment() {
        assert_eq!(trailing_segment("http://api.ft.com/things/abc"), "abc");
        assert_eq!(trailing_segment("concept-A"), "concept-A");
        assert_eq!(trailing_segment(" concept-A "), "concept-A");
        assert_eq!(trailing_segment("http://api.ft.com/things/"), "");
        assert_eq!(trailing_segment(""), "");
    }

    #[test]
    fn test_concept_uuid_case_folded() {
        assert_eq!(
            concept_id("http://api.ft.com/things/2CCA9E2A-2248-3E48-ABC1-93D718B91BBE"),
            "2cca9e2a-2248-3e48-abc1-93d718b91bbe"
        );
        assert_eq!(concept_id("http://api.ft.com/things/Concept-A"), "Concept-A");
        assert_eq!(concept_id("http://api.ft.com/things/"), "");
    }

    #[test]
    fn test_agent_from_uri() {
        let uri = format!("http://api.ft.com/things/{}", AGENT_UUID);
        assert_eq!(agent_id(&uri), AGENT_UUID);
    }

    #[test]
    fn test_agent_uri_without_uuid_is_anonymous() {
        assert_eq!(agent_id("http://api.ft.com/things/not-a-uuid"), "");
        assert_eq!(agent_id(""), "");
    }

    #[test]
    fn test_bare_agent_kept() {
        assert_eq!(agent_id("agent-X"), "agent-X");
    }

    #[test]
    fn test_to_uri_only_for_uuids() {
        let prefix = "http://api.ft.com/things/";
        assert_eq!(to_uri(prefix, AGENT_UUID), format!("{}{}", prefix, AGENT_UUID));
        assert_eq!(to_uri(prefix, "concept-A"), "concept-A");
        assert_eq!(to_uri(prefix, ""), "");
    }
}

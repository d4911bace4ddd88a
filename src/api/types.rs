// Data-transfer shapes mirrored verbatim from the compliance API.
//
// These structs deserialize the JSON the server sends and are displayed
// as-is. The client never derives, validates beyond presence, or persists
// them; the server owns every field.

use chrono::DateTime;
use serde::Deserialize;

/// A single free-text compliance requirement belonging to a policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Rule {
    pub rule_id: String,
    pub rule_text: String,
}

/// A named compliance-rule framework with an uploaded source document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Policy {
    pub policy_id: String,
    pub title: String,
    pub category: String,
    pub extension: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
    /// Upload timestamp as the server formats it. Parsed opportunistically
    /// for display; shown raw when it isn't RFC 3339.
    #[serde(default)]
    pub uploaded_at: String,
}

impl Policy {
    /// Human-friendly upload date (`YYYY-MM-DD HH:MM`), falling back to the
    /// server's raw string when it doesn't parse as RFC 3339.
    pub fn uploaded_at_display(&self) -> String {
        match DateTime::parse_from_rfc3339(&self.uploaded_at) {
            Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            Err(_) => self.uploaded_at.clone(),
        }
    }
}

/// A customer file analyzed against a policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Document {
    pub document_id: String,
    pub title: String,
    #[serde(default)]
    pub policy_title: String,
    #[serde(default)]
    pub path: String,
    pub extension: String,
    #[serde(default)]
    pub violations: Vec<String>,
    pub is_compliant: bool,
    pub is_human_review_required: bool,
    pub compliance_percentage: u32,
}

/// Standard `{ data, message }` envelope around every response body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default)]
    pub message: String,
}

/// One page of the policy list, as returned by `GET /policies`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PoliciesPage {
    #[serde(default)]
    pub policies: Vec<Policy>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

/// One page of the document list, as returned by `GET /documents`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocumentsPage {
    #[serde(default)]
    pub documents: Vec<Document>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_policy_with_rules() {
        let json = r#"{
            "policy_id": "pol_1",
            "title": "GDPR Framework",
            "category": "Privacy",
            "extension": "pdf",
            "rules": [
                { "rule_id": "r1", "rule_text": "Data must be encrypted at rest." },
                { "rule_id": "r2", "rule_text": "Consent must be explicit." }
            ],
            "uploaded_at": "2025-03-14T09:26:53Z"
        }"#;
        let policy: Policy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.policy_id, "pol_1");
        assert_eq!(policy.category, "Privacy");
        assert_eq!(policy.rules.len(), 2);
        assert_eq!(policy.rules[1].rule_text, "Consent must be explicit.");
    }

    #[test]
    fn deserialize_policy_without_rules_defaults_to_empty() {
        let json = r#"{
            "policy_id": "pol_2",
            "title": "SOC 2",
            "category": "Security",
            "extension": "docx",
            "uploaded_at": "2025-01-01T00:00:00Z"
        }"#;
        let policy: Policy = serde_json::from_str(json).unwrap();
        assert!(policy.rules.is_empty());
    }

    #[test]
    fn uploaded_at_display_formats_rfc3339() {
        let mut policy: Policy = serde_json::from_str(
            r#"{"policy_id":"p","title":"t","category":"c","extension":"pdf",
                "uploaded_at":"2025-03-14T09:26:53Z"}"#,
        )
        .unwrap();
        assert_eq!(policy.uploaded_at_display(), "2025-03-14 09:26");

        policy.uploaded_at = "last tuesday".to_string();
        assert_eq!(policy.uploaded_at_display(), "last tuesday");
    }

    #[test]
    fn deserialize_document_full() {
        let json = r#"{
            "document_id": "doc_9",
            "title": "msa-acme.pdf",
            "policy_title": "GDPR Framework",
            "path": "/uploads/msa-acme.pdf",
            "extension": "pdf",
            "violations": ["Clause 4 lacks a data-retention limit."],
            "is_compliant": false,
            "is_human_review_required": true,
            "compliance_percentage": 72
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.document_id, "doc_9");
        assert_eq!(doc.violations.len(), 1);
        assert!(!doc.is_compliant);
        assert!(doc.is_human_review_required);
        assert_eq!(doc.compliance_percentage, 72);
    }

    #[test]
    fn deserialize_document_ignores_unknown_fields() {
        // The server also sends violation_percentage; the client doesn't use it.
        let json = r#"{
            "document_id": "doc_1",
            "title": "ok.txt",
            "policy_title": "SOC 2",
            "path": "/uploads/ok.txt",
            "extension": "txt",
            "violations": [],
            "is_compliant": true,
            "is_human_review_required": false,
            "compliance_percentage": 100,
            "violation_percentage": 0
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert!(doc.is_compliant);
        assert!(doc.violations.is_empty());
    }

    #[test]
    fn deserialize_policies_page_envelope() {
        let json = r#"{
            "data": {
                "policies": [
                    { "policy_id": "p1", "title": "A", "category": "Cat",
                      "extension": "pdf", "rules": [], "uploaded_at": "2025-05-01T12:00:00Z" }
                ],
                "page": 2,
                "page_size": 10,
                "total": 13
            },
            "message": "ok"
        }"#;
        let resp: ApiResponse<PoliciesPage> = serde_json::from_str(json).unwrap();
        assert_eq!(resp.data.page, 2);
        assert_eq!(resp.data.page_size, 10);
        assert_eq!(resp.data.total, 13);
        assert_eq!(resp.data.policies.len(), 1);
        assert_eq!(resp.message, "ok");
    }

    #[test]
    fn deserialize_documents_page_empty() {
        let json = r#"{
            "data": { "documents": [], "page": 1, "page_size": 10, "total": 0 },
            "message": ""
        }"#;
        let resp: ApiResponse<DocumentsPage> = serde_json::from_str(json).unwrap();
        assert!(resp.data.documents.is_empty());
        assert_eq!(resp.data.total, 0);
    }
}

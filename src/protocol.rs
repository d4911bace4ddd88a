// Message types shared between the app orchestrator, the TUI, and the
// spawned request tasks.
//
// Three channels:
//   UserCommand: TUI -> app (user intent that needs a network call)
//   UiUpdate:    app -> TUI (state the render loop should reflect)
//   ApiEvent:    request task -> app (completed HTTP call results)

use std::path::PathBuf;

use crate::api::client::ApiError;
use crate::api::types::{DocumentsPage, PoliciesPage};

// ---------------------------------------------------------------------------
// View enums
// ---------------------------------------------------------------------------

/// Dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabId {
    Policies,
    Upload,
    Documents,
}

impl TabId {
    pub fn label(self) -> &'static str {
        match self {
            TabId::Policies => "Policies",
            TabId::Upload => "Upload",
            TabId::Documents => "Documents",
        }
    }
}

/// Result of the periodic `GET /health` probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// No probe has completed yet.
    Unknown,
    Healthy,
    Unreachable,
}

/// Whether a locally stored API key is active.
///
/// Demo mode is the unauthenticated state, subject to server-side rate
/// limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Demo,
    Keyed,
}

/// Lifecycle of a paginated list fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Severity of a transient notice line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A dismissible one-line message (the toast analog).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Client-side view of a server-reported page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            page: 1,
            page_size: 10,
            total: 0,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        Pagination {
            page: page.max(1),
            page_size: page_size.max(1),
            total,
        }
    }

    /// Number of pages needed to show `total` items.
    pub fn total_pages(&self) -> u32 {
        if self.total == 0 {
            return 1;
        }
        self.total.div_ceil(self.page_size as u64) as u32
    }

    /// Previous is disabled at page 1.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Next is disabled at the last page.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// The 1-based item range shown on this page, e.g. "11 to 13 of 13".
    pub fn range_label(&self) -> String {
        if self.total == 0 {
            return "0 of 0".to_string();
        }
        let first = (self.page as u64 - 1) * self.page_size as u64 + 1;
        let last = (self.page as u64 * self.page_size as u64).min(self.total);
        format!("{first} to {last} of {}", self.total)
    }
}

// ---------------------------------------------------------------------------
// UserCommand (TUI -> app)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    FetchPolicies { page: u32 },
    FetchDocuments { page: u32 },
    UploadDocument { path: PathBuf, policy_id: String },
    UploadPolicy {
        path: PathBuf,
        title: String,
        category: String,
    },
    DeleteDocument { document_id: String },
    DeletePolicy { policy_id: String },
    DeleteRule {
        policy_id: String,
        rule_id: String,
    },
    UpdateRule {
        policy_id: String,
        rule_id: String,
        rule_text: String,
    },
    SaveApiKey { key: String },
    ClearApiKey,
    Quit,
}

// ---------------------------------------------------------------------------
// UiUpdate (app -> TUI)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    PoliciesLoading,
    Policies(Box<PoliciesPage>),
    PoliciesFailed(String),

    DocumentsLoading,
    Documents(Box<DocumentsPage>),
    DocumentsFailed(String),

    Health(HealthStatus),
    Auth(AuthMode),

    UploadStarted,
    /// Document upload accepted; the TUI switches to the Documents tab.
    DocumentUploaded,
    PolicyUploaded,
    UploadFailed(String),

    /// A mutating call hit HTTP 429; open the rate-limit dialog.
    RateLimited(String),

    /// A delete is in flight for the given id; disable its action.
    DeleteStarted(String),
    DeleteFinished(String),

    Notice(Notice),
}

// ---------------------------------------------------------------------------
// ApiEvent (request task -> app)
// ---------------------------------------------------------------------------

/// Completed HTTP calls, reported back to the orchestrator.
///
/// List results carry the generation counter that was current when the
/// fetch was spawned; the orchestrator discards results from stale
/// generations (the abort-before-refetch analog).
#[derive(Debug)]
pub enum ApiEvent {
    Health { healthy: bool },
    Policies {
        result: Result<PoliciesPage, ApiError>,
        generation: u64,
    },
    Documents {
        result: Result<DocumentsPage, ApiError>,
        generation: u64,
    },
    DocumentUploaded { result: Result<String, ApiError> },
    PolicyUploaded { result: Result<String, ApiError> },
    DocumentDeleted {
        document_id: String,
        result: Result<(), ApiError>,
    },
    PolicyDeleted {
        policy_id: String,
        result: Result<(), ApiError>,
    },
    RuleDeleted {
        policy_id: String,
        rule_id: String,
        result: Result<(), ApiError>,
    },
    RuleUpdated {
        policy_id: String,
        result: Result<(), ApiError>,
    },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

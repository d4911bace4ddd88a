// Form state for the two upload flows.
//
// The document form lives on the Upload tab: a file path plus a policy
// chosen from the loaded policy list. The policy form is a modal opened
// from the Policies tab: title, category, and file path. Submission is
// gated on completeness; the server does the real validation.

use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Document upload form
// ---------------------------------------------------------------------------

/// Which part of the document form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFocus {
    FilePath,
    PolicySelect,
}

/// State of the Upload tab's document form.
#[derive(Debug, Clone)]
pub struct UploadForm {
    /// Path to the local file, typed by the user.
    pub path: String,
    /// Index into the loaded policy list, if one is selected.
    pub policy_index: Option<usize>,
    pub focus: UploadFocus,
    /// True while the path field is capturing keystrokes.
    pub editing_path: bool,
}

impl Default for UploadForm {
    fn default() -> Self {
        UploadForm {
            path: String::new(),
            policy_index: None,
            focus: UploadFocus::FilePath,
            editing_path: false,
        }
    }
}

impl UploadForm {
    /// Submission requires both a file and a selected policy.
    pub fn can_submit(&self) -> bool {
        !self.path.trim().is_empty() && self.policy_index.is_some()
    }

    pub fn file_path(&self) -> PathBuf {
        PathBuf::from(self.path.trim())
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            UploadFocus::FilePath => UploadFocus::PolicySelect,
            UploadFocus::PolicySelect => UploadFocus::FilePath,
        };
    }

    /// Move the policy selection, clamped to the list length.
    pub fn select_next(&mut self, policy_count: usize) {
        if policy_count == 0 {
            self.policy_index = None;
            return;
        }
        self.policy_index = Some(match self.policy_index {
            None => 0,
            Some(i) => (i + 1).min(policy_count - 1),
        });
    }

    pub fn select_prev(&mut self) {
        self.policy_index = self.policy_index.map(|i| i.saturating_sub(1));
    }

    pub fn reset(&mut self) {
        *self = UploadForm::default();
    }
}

// ---------------------------------------------------------------------------
// Policy creation form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyFocus {
    Title,
    Category,
    FilePath,
}

impl PolicyFocus {
    pub fn next(self) -> Self {
        match self {
            PolicyFocus::Title => PolicyFocus::Category,
            PolicyFocus::Category => PolicyFocus::FilePath,
            PolicyFocus::FilePath => PolicyFocus::Title,
        }
    }
}

/// State of the "new policy" modal.
#[derive(Debug, Clone)]
pub struct PolicyForm {
    pub title: String,
    pub category: String,
    pub path: String,
    pub focus: PolicyFocus,
}

impl Default for PolicyForm {
    fn default() -> Self {
        PolicyForm {
            title: String::new(),
            category: String::new(),
            path: String::new(),
            focus: PolicyFocus::Title,
        }
    }
}

impl PolicyForm {
    /// All three fields are required.
    pub fn can_submit(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.category.trim().is_empty()
            && !self.path.trim().is_empty()
    }

    pub fn file_path(&self) -> PathBuf {
        PathBuf::from(self.path.trim())
    }

    pub fn field_mut(&mut self) -> &mut String {
        match self.focus {
            PolicyFocus::Title => &mut self.title,
            PolicyFocus::Category => &mut self.category,
            PolicyFocus::FilePath => &mut self.path,
        }
    }
}

// ---------------------------------------------------------------------------
// Extension check
// ---------------------------------------------------------------------------

/// Whether the path's extension is in the accepted list (case-insensitive).
/// A path with no extension is rejected.
pub fn extension_allowed(path: &Path, accepted: &[String]) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(e) => format!(".{}", e.to_lowercase()),
        None => return false,
    };
    accepted.iter().any(|a| a.to_lowercase() == ext)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted() -> Vec<String> {
        vec![
            ".pdf".to_string(),
            ".doc".to_string(),
            ".docx".to_string(),
            ".txt".to_string(),
        ]
    }

    #[test]
    fn upload_form_requires_both_fields() {
        let mut form = UploadForm::default();
        assert!(!form.can_submit(), "empty form must not submit");

        form.path = "/tmp/contract.pdf".to_string();
        assert!(!form.can_submit(), "file alone must not submit");

        form.policy_index = Some(0);
        assert!(form.can_submit());
    }

    #[test]
    fn upload_form_policy_alone_does_not_submit() {
        let mut form = UploadForm::default();
        form.policy_index = Some(2);
        assert!(!form.can_submit());
    }

    #[test]
    fn upload_form_whitespace_path_does_not_submit() {
        let mut form = UploadForm::default();
        form.path = "   ".to_string();
        form.policy_index = Some(0);
        assert!(!form.can_submit());
    }

    #[test]
    fn upload_form_selection_clamps_to_list() {
        let mut form = UploadForm::default();
        form.select_next(3);
        assert_eq!(form.policy_index, Some(0));
        form.select_next(3);
        form.select_next(3);
        form.select_next(3);
        assert_eq!(form.policy_index, Some(2), "must clamp at last entry");
        form.select_prev();
        assert_eq!(form.policy_index, Some(1));
    }

    #[test]
    fn upload_form_selection_on_empty_list_is_none() {
        let mut form = UploadForm::default();
        form.select_next(0);
        assert_eq!(form.policy_index, None);
    }

    #[test]
    fn upload_form_prev_at_start_stays() {
        let mut form = UploadForm::default();
        form.select_next(3);
        form.select_prev();
        assert_eq!(form.policy_index, Some(0));
    }

    #[test]
    fn upload_form_reset_clears_everything() {
        let mut form = UploadForm {
            path: "/tmp/a.pdf".to_string(),
            policy_index: Some(1),
            focus: UploadFocus::PolicySelect,
            editing_path: true,
        };
        form.reset();
        assert!(form.path.is_empty());
        assert_eq!(form.policy_index, None);
        assert!(!form.editing_path);
    }

    #[test]
    fn policy_form_requires_all_fields() {
        let mut form = PolicyForm::default();
        assert!(!form.can_submit());

        form.title = "GDPR".to_string();
        form.category = "Privacy".to_string();
        assert!(!form.can_submit(), "missing file path");

        form.path = "/tmp/gdpr.pdf".to_string();
        assert!(form.can_submit());
    }

    #[test]
    fn policy_form_focus_cycles() {
        assert_eq!(PolicyFocus::Title.next(), PolicyFocus::Category);
        assert_eq!(PolicyFocus::Category.next(), PolicyFocus::FilePath);
        assert_eq!(PolicyFocus::FilePath.next(), PolicyFocus::Title);
    }

    #[test]
    fn policy_form_field_mut_tracks_focus() {
        let mut form = PolicyForm::default();
        form.field_mut().push('a');
        form.focus = form.focus.next();
        form.field_mut().push('b');
        assert_eq!(form.title, "a");
        assert_eq!(form.category, "b");
    }

    #[test]
    fn extension_allowed_accepts_listed() {
        assert!(extension_allowed(Path::new("report.pdf"), &accepted()));
        assert!(extension_allowed(Path::new("notes.txt"), &accepted()));
        assert!(extension_allowed(Path::new("/a/b/c.docx"), &accepted()));
    }

    #[test]
    fn extension_allowed_is_case_insensitive() {
        assert!(extension_allowed(Path::new("REPORT.PDF"), &accepted()));
    }

    #[test]
    fn extension_allowed_rejects_unlisted_and_missing() {
        assert!(!extension_allowed(Path::new("image.png"), &accepted()));
        assert!(!extension_allowed(Path::new("Makefile"), &accepted()));
    }
}

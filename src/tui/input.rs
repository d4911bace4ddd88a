// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (tab switching,
// cursor movement, dialog state).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{Mode, ViewState};
use crate::protocol::{TabId, UserCommand};

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to
/// the app orchestrator (fetches, uploads, deletes, quit). Returns `None`
/// when the key press was handled locally by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress; ignoring
    // non-Press events prevents double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode (escape hatch)
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    match view_state.mode.clone() {
        Mode::Normal => handle_normal(key_event, view_state),
        Mode::ConfirmQuit => handle_confirm_quit(key_event, view_state),
        Mode::KeyEntry { buffer } => handle_key_entry(key_event, view_state, buffer),
        Mode::RateLimited { message, buffer } => {
            handle_rate_limited(key_event, view_state, message, buffer)
        }
        Mode::PolicyForm => handle_policy_form(key_event, view_state),
        Mode::RuleEdit {
            policy_id,
            rule_id,
            buffer,
        } => handle_rule_edit(key_event, view_state, policy_id, rule_id, buffer),
        Mode::ConfirmDeletePolicy { policy_id, .. } => {
            handle_confirm(key_event, view_state, UserCommand::DeletePolicy { policy_id })
        }
        Mode::ConfirmDeleteDocument { document_id, .. } => handle_confirm(
            key_event,
            view_state,
            UserCommand::DeleteDocument { document_id },
        ),
        Mode::ConfirmDeleteRule { policy_id, rule_id } => handle_confirm(
            key_event,
            view_state,
            UserCommand::DeleteRule { policy_id, rule_id },
        ),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Path field capture on the Upload tab comes before normal dispatch,
    // so typed characters land in the form instead of triggering keys.
    if view_state.active_tab == TabId::Upload && view_state.upload_form.editing_path {
        return handle_path_entry(key_event, view_state);
    }

    match key_event.code {
        // Tab switching
        KeyCode::Char('1') => {
            view_state.active_tab = TabId::Policies;
            None
        }
        KeyCode::Char('2') => {
            view_state.active_tab = TabId::Upload;
            None
        }
        KeyCode::Char('3') => {
            view_state.active_tab = TabId::Documents;
            None
        }

        // Cursor movement
        KeyCode::Up | KeyCode::Char('k') => {
            move_cursor_up(view_state);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_cursor_down(view_state);
            None
        }

        // Pagination (list tabs only)
        KeyCode::Left | KeyCode::Char('h') => page_back(view_state),
        KeyCode::Right | KeyCode::Char('l') => page_forward(view_state),

        // Refresh the active tab's list
        KeyCode::Char('r') => match view_state.active_tab {
            TabId::Policies | TabId::Upload => Some(UserCommand::FetchPolicies {
                page: view_state.policies_pagination.page,
            }),
            TabId::Documents => Some(UserCommand::FetchDocuments {
                page: view_state.documents_pagination.page,
            }),
        },

        // API key dialog
        KeyCode::Char('a') => {
            view_state.mode = Mode::KeyEntry {
                buffer: String::new(),
            };
            None
        }

        // Dismiss the notice line
        KeyCode::Esc => {
            view_state.notice = None;
            None
        }

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.mode = Mode::ConfirmQuit;
            None
        }

        _ => match view_state.active_tab {
            TabId::Policies => handle_policies_tab(key_event, view_state),
            TabId::Upload => handle_upload_tab(key_event, view_state),
            TabId::Documents => handle_documents_tab(key_event, view_state),
        },
    }
}

fn handle_policies_tab(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        // New policy modal
        KeyCode::Char('n') => {
            view_state.policy_form = Default::default();
            view_state.mode = Mode::PolicyForm;
            None
        }

        // Delete the selected policy
        KeyCode::Char('d') => {
            if let Some(policy) = view_state.selected_policy() {
                if !view_state.deleting.contains(&policy.policy_id) {
                    view_state.mode = Mode::ConfirmDeletePolicy {
                        policy_id: policy.policy_id.clone(),
                        title: policy.title.clone(),
                    };
                }
            }
            None
        }

        // Rule cursor within the selected policy
        KeyCode::Char('[') => {
            view_state.rule_cursor = view_state.rule_cursor.saturating_sub(1);
            None
        }
        KeyCode::Char(']') => {
            let rule_count = view_state
                .selected_policy()
                .map(|p| p.rules.len())
                .unwrap_or(0);
            if rule_count > 0 && view_state.rule_cursor + 1 < rule_count {
                view_state.rule_cursor += 1;
            }
            None
        }

        // Edit the selected rule's text
        KeyCode::Char('e') => {
            if let Some(policy) = view_state.selected_policy() {
                if let Some(rule) = policy.rules.get(view_state.rule_cursor) {
                    view_state.mode = Mode::RuleEdit {
                        policy_id: policy.policy_id.clone(),
                        rule_id: rule.rule_id.clone(),
                        buffer: rule.rule_text.clone(),
                    };
                }
            }
            None
        }

        // Delete the selected rule
        KeyCode::Char('x') => {
            if let Some(policy) = view_state.selected_policy() {
                if let Some(rule) = policy.rules.get(view_state.rule_cursor) {
                    if !view_state.deleting.contains(&rule.rule_id) {
                        view_state.mode = Mode::ConfirmDeleteRule {
                            policy_id: policy.policy_id.clone(),
                            rule_id: rule.rule_id.clone(),
                        };
                    }
                }
            }
            None
        }

        _ => None,
    }
}

fn handle_upload_tab(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        // Start typing into the file path field
        KeyCode::Char('i') => {
            view_state.upload_form.focus = super::forms::UploadFocus::FilePath;
            view_state.upload_form.editing_path = true;
            None
        }

        KeyCode::Tab => {
            view_state.upload_form.toggle_focus();
            None
        }

        // Submit, gated on a file with an accepted extension and a
        // selected policy
        KeyCode::Char('s') | KeyCode::Enter => {
            if view_state.uploading || !view_state.upload_form.can_submit() {
                return None;
            }
            let path = view_state.upload_form.file_path();
            if !super::forms::extension_allowed(&path, &view_state.accepted_extensions) {
                return None;
            }
            let index = view_state.upload_form.policy_index?;
            let policy = view_state.policies.get(index)?;
            Some(UserCommand::UploadDocument {
                path,
                policy_id: policy.policy_id.clone(),
            })
        }

        _ => None,
    }
}

fn handle_documents_tab(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('d') => {
            if let Some(document) = view_state.selected_document() {
                if !view_state.deleting.contains(&document.document_id) {
                    view_state.mode = Mode::ConfirmDeleteDocument {
                        document_id: document.document_id.clone(),
                        title: document.title.clone(),
                    };
                }
            }
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Cursor and pagination helpers
// ---------------------------------------------------------------------------

fn move_cursor_up(view_state: &mut ViewState) {
    match view_state.active_tab {
        TabId::Policies => {
            view_state.policy_cursor = view_state.policy_cursor.saturating_sub(1);
            view_state.rule_cursor = 0;
        }
        TabId::Documents => {
            view_state.document_cursor = view_state.document_cursor.saturating_sub(1);
        }
        TabId::Upload => {
            view_state.upload_form.select_prev();
        }
    }
}

fn move_cursor_down(view_state: &mut ViewState) {
    match view_state.active_tab {
        TabId::Policies => {
            if !view_state.policies.is_empty()
                && view_state.policy_cursor + 1 < view_state.policies.len()
            {
                view_state.policy_cursor += 1;
                view_state.rule_cursor = 0;
            }
        }
        TabId::Documents => {
            if !view_state.documents.is_empty()
                && view_state.document_cursor + 1 < view_state.documents.len()
            {
                view_state.document_cursor += 1;
            }
        }
        TabId::Upload => {
            let count = view_state.policies.len();
            view_state.upload_form.select_next(count);
        }
    }
}

/// Previous page, if the active list has one. No-op on page 1.
fn page_back(view_state: &mut ViewState) -> Option<UserCommand> {
    match view_state.active_tab {
        TabId::Policies => {
            let p = &view_state.policies_pagination;
            p.has_prev().then(|| UserCommand::FetchPolicies { page: p.page - 1 })
        }
        TabId::Documents => {
            let p = &view_state.documents_pagination;
            p.has_prev().then(|| UserCommand::FetchDocuments { page: p.page - 1 })
        }
        TabId::Upload => None,
    }
}

/// Next page, if the active list has one. No-op on the last page.
fn page_forward(view_state: &mut ViewState) -> Option<UserCommand> {
    match view_state.active_tab {
        TabId::Policies => {
            let p = &view_state.policies_pagination;
            p.has_next().then(|| UserCommand::FetchPolicies { page: p.page + 1 })
        }
        TabId::Documents => {
            let p = &view_state.documents_pagination;
            p.has_next().then(|| UserCommand::FetchDocuments { page: p.page + 1 })
        }
        TabId::Upload => None,
    }
}

// ---------------------------------------------------------------------------
// Dialog modes
// ---------------------------------------------------------------------------

/// Quit confirmation: `y`/`q` confirm, `n`/Esc cancel, everything else blocked.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.mode = Mode::Normal;
            None
        }
        _ => None, // Block all other input
    }
}

/// Generic delete confirmation: `y`/Enter confirm, `n`/Esc cancel.
fn handle_confirm(
    key_event: KeyEvent,
    view_state: &mut ViewState,
    command: UserCommand,
) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            view_state.mode = Mode::Normal;
            Some(command)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.mode = Mode::Normal;
            None
        }
        _ => None,
    }
}

/// API key dialog. Enter with a key saves it; Enter with an empty buffer
/// removes the stored key.
fn handle_key_entry(
    key_event: KeyEvent,
    view_state: &mut ViewState,
    mut buffer: String,
) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.mode = Mode::Normal;
            None
        }
        KeyCode::Enter => {
            view_state.mode = Mode::Normal;
            let key = buffer.trim().to_string();
            if key.is_empty() {
                Some(UserCommand::ClearApiKey)
            } else {
                Some(UserCommand::SaveApiKey { key })
            }
        }
        KeyCode::Backspace => {
            buffer.pop();
            view_state.mode = Mode::KeyEntry { buffer };
            None
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            view_state.mode = Mode::KeyEntry { buffer };
            None
        }
        _ => None,
    }
}

/// Rate-limit dialog. Esc dismisses; entering a key saves it and closes
/// the dialog. Enter with an empty buffer just dismisses.
fn handle_rate_limited(
    key_event: KeyEvent,
    view_state: &mut ViewState,
    message: String,
    mut buffer: String,
) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.mode = Mode::Normal;
            None
        }
        KeyCode::Enter => {
            view_state.mode = Mode::Normal;
            let key = buffer.trim().to_string();
            if key.is_empty() {
                None
            } else {
                Some(UserCommand::SaveApiKey { key })
            }
        }
        KeyCode::Backspace => {
            buffer.pop();
            view_state.mode = Mode::RateLimited { message, buffer };
            None
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            view_state.mode = Mode::RateLimited { message, buffer };
            None
        }
        _ => None,
    }
}

/// Path field capture on the Upload tab.
fn handle_path_entry(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc | KeyCode::Enter => {
            view_state.upload_form.editing_path = false;
            None
        }
        KeyCode::Backspace => {
            view_state.upload_form.path.pop();
            None
        }
        KeyCode::Char(c) => {
            view_state.upload_form.path.push(c);
            None
        }
        _ => None,
    }
}

/// New-policy modal: Tab cycles fields, Enter submits when complete.
fn handle_policy_form(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.mode = Mode::Normal;
            None
        }
        KeyCode::Tab => {
            view_state.policy_form.focus = view_state.policy_form.focus.next();
            None
        }
        KeyCode::Enter => {
            if view_state.uploading || !view_state.policy_form.can_submit() {
                return None;
            }
            Some(UserCommand::UploadPolicy {
                path: view_state.policy_form.file_path(),
                title: view_state.policy_form.title.trim().to_string(),
                category: view_state.policy_form.category.trim().to_string(),
            })
        }
        KeyCode::Backspace => {
            view_state.policy_form.field_mut().pop();
            None
        }
        KeyCode::Char(c) => {
            view_state.policy_form.field_mut().push(c);
            None
        }
        _ => None,
    }
}

/// Rule text editor: Enter saves, Esc cancels.
fn handle_rule_edit(
    key_event: KeyEvent,
    view_state: &mut ViewState,
    policy_id: String,
    rule_id: String,
    mut buffer: String,
) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.mode = Mode::Normal;
            None
        }
        KeyCode::Enter => {
            let text = buffer.trim().to_string();
            if text.is_empty() {
                return None;
            }
            view_state.mode = Mode::Normal;
            Some(UserCommand::UpdateRule {
                policy_id,
                rule_id,
                rule_text: text,
            })
        }
        KeyCode::Backspace => {
            buffer.pop();
            view_state.mode = Mode::RuleEdit {
                policy_id,
                rule_id,
                buffer,
            };
            None
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            view_state.mode = Mode::RuleEdit {
                policy_id,
                rule_id,
                buffer,
            };
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

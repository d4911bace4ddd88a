// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors relevant parts of the application
// state. The app orchestrator pushes `UiUpdate` messages over an mpsc channel;
// the TUI applies them to `ViewState` and re-renders at ~30 fps.

pub mod forms;
pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashSet;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::api::types::{Document, Policy};
use crate::config::Config;
use crate::protocol::{
    AuthMode, FetchStatus, HealthStatus, Notice, NoticeLevel, Pagination, TabId, UiUpdate,
    UserCommand,
};

use layout::build_layout;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Modal input state. `Normal` is the dashboard; every other variant is a
/// dialog that captures keystrokes until confirmed or dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// API key entry dialog. Enter with a key saves it; Enter with an
    /// empty buffer removes the stored key.
    KeyEntry { buffer: String },
    /// Rate-limit dialog opened when a mutation hits HTTP 429. Carries
    /// its own key entry buffer so the user can unblock in place.
    RateLimited { message: String, buffer: String },
    /// The "new policy" form modal.
    PolicyForm,
    /// Inline editor for a rule's text.
    RuleEdit {
        policy_id: String,
        rule_id: String,
        buffer: String,
    },
    ConfirmDeletePolicy { policy_id: String, title: String },
    ConfirmDeleteDocument { document_id: String, title: String },
    ConfirmDeleteRule { policy_id: String, rule_id: String },
    ConfirmQuit,
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
///
/// Updated incrementally via `UiUpdate` messages from the app orchestrator.
/// The `render_frame` function reads this struct to draw the dashboard.
pub struct ViewState {
    pub active_tab: TabId,
    pub mode: Mode,

    pub health: HealthStatus,
    pub auth: AuthMode,
    pub server_label: String,

    pub policies: Vec<Policy>,
    pub policies_pagination: Pagination,
    pub policies_status: FetchStatus,
    /// Cursor into the loaded policy page.
    pub policy_cursor: usize,
    /// Cursor into the selected policy's rule list.
    pub rule_cursor: usize,

    pub documents: Vec<Document>,
    pub documents_pagination: Pagination,
    pub documents_status: FetchStatus,
    pub document_cursor: usize,

    pub upload_form: forms::UploadForm,
    pub policy_form: forms::PolicyForm,
    /// True while an upload request is in flight; the submit key is
    /// ignored until it resolves.
    pub uploading: bool,
    pub upload_error: Option<String>,

    /// Ids with a delete in flight; their delete keys are ignored.
    pub deleting: HashSet<String>,

    pub notice: Option<Notice>,

    pub page_size: u32,
    pub accepted_extensions: Vec<String>,
    pub max_size_mb: u32,
}

impl ViewState {
    pub fn new(config: &Config) -> Self {
        let pagination = Pagination::new(1, config.ui.page_size, 0);
        ViewState {
            active_tab: TabId::Policies,
            mode: Mode::Normal,
            health: HealthStatus::Unknown,
            auth: AuthMode::Demo,
            server_label: config.server.base_url.clone(),
            policies: Vec::new(),
            policies_pagination: pagination,
            policies_status: FetchStatus::Idle,
            policy_cursor: 0,
            rule_cursor: 0,
            documents: Vec::new(),
            documents_pagination: pagination,
            documents_status: FetchStatus::Idle,
            document_cursor: 0,
            upload_form: forms::UploadForm::default(),
            policy_form: forms::PolicyForm::default(),
            uploading: false,
            upload_error: None,
            deleting: HashSet::new(),
            notice: None,
            page_size: config.ui.page_size,
            accepted_extensions: config.upload.accepted_extensions.clone(),
            max_size_mb: config.upload.max_size_mb,
        }
    }

    pub fn selected_policy(&self) -> Option<&Policy> {
        self.policies.get(self.policy_cursor)
    }

    pub fn selected_document(&self) -> Option<&Document> {
        self.documents.get(self.document_cursor)
    }
}

#[cfg(test)]
impl Default for ViewState {
    fn default() -> Self {
        use crate::config::{CredentialsConfig, ServerConfig, UiConfig, UploadConfig};
        ViewState::new(&Config {
            server: ServerConfig {
                base_url: "http://localhost:3000".to_string(),
                api_version: "v1".to_string(),
            },
            ui: UiConfig {
                page_size: 10,
                health_check_interval_secs: 30,
            },
            upload: UploadConfig {
                accepted_extensions: vec![
                    ".pdf".to_string(),
                    ".doc".to_string(),
                    ".docx".to_string(),
                    ".txt".to_string(),
                ],
                max_size_mb: 10,
            },
            credentials: CredentialsConfig::default(),
            credentials_path: std::path::PathBuf::from("credentials.toml"),
        })
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::PoliciesLoading => {
            state.policies_status = FetchStatus::Loading;
        }
        UiUpdate::Policies(page) => {
            state.policies_pagination = Pagination::new(page.page, page.page_size, page.total);
            state.policies = page.policies;
            state.policies_status = FetchStatus::Loaded;
            if state.policy_cursor >= state.policies.len() {
                state.policy_cursor = state.policies.len().saturating_sub(1);
            }
            state.rule_cursor = 0;
            // The upload form's selection indexes into this list.
            if let Some(i) = state.upload_form.policy_index {
                if i >= state.policies.len() {
                    state.upload_form.policy_index = None;
                }
            }
        }
        UiUpdate::PoliciesFailed(message) => {
            state.policies_status = FetchStatus::Failed(message);
        }

        UiUpdate::DocumentsLoading => {
            state.documents_status = FetchStatus::Loading;
        }
        UiUpdate::Documents(page) => {
            state.documents_pagination = Pagination::new(page.page, page.page_size, page.total);
            state.documents = page.documents;
            state.documents_status = FetchStatus::Loaded;
            if state.document_cursor >= state.documents.len() {
                state.document_cursor = state.documents.len().saturating_sub(1);
            }
        }
        UiUpdate::DocumentsFailed(message) => {
            state.documents_status = FetchStatus::Failed(message);
        }

        UiUpdate::Health(status) => {
            state.health = status;
        }
        UiUpdate::Auth(mode) => {
            state.auth = mode;
        }

        UiUpdate::UploadStarted => {
            state.uploading = true;
            state.upload_error = None;
        }
        UiUpdate::DocumentUploaded => {
            state.uploading = false;
            state.upload_form.reset();
            // Show the fresh analysis results.
            state.active_tab = TabId::Documents;
        }
        UiUpdate::PolicyUploaded => {
            state.uploading = false;
            state.policy_form = forms::PolicyForm::default();
            if state.mode == Mode::PolicyForm {
                state.mode = Mode::Normal;
            }
        }
        UiUpdate::UploadFailed(message) => {
            state.uploading = false;
            state.upload_error = Some(message);
        }

        UiUpdate::RateLimited(message) => {
            state.mode = Mode::RateLimited {
                message,
                buffer: String::new(),
            };
        }

        UiUpdate::DeleteStarted(id) => {
            state.deleting.insert(id);
        }
        UiUpdate::DeleteFinished(id) => {
            state.deleting.remove(&id);
        }

        UiUpdate::Notice(notice) => {
            state.notice = Some(notice);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::status_bar::render_tabs(frame, layout.tab_bar, state);

    match state.active_tab {
        TabId::Policies => widgets::policies::render(frame, layout.main_panel, state),
        TabId::Upload => widgets::upload::render(frame, layout.main_panel, state),
        TabId::Documents => widgets::documents::render(frame, layout.main_panel, state),
    }

    render_notice_bar(frame, layout.notice_bar, state);
    widgets::help_bar::render(frame, layout.help_bar, state);

    // Modal dialogs draw over the dashboard.
    widgets::dialogs::render(frame, frame.area(), state);
}

fn render_notice_bar(frame: &mut Frame, area: ratatui::layout::Rect, state: &ViewState) {
    let Some(notice) = &state.notice else {
        return;
    };
    let color = match notice.level {
        NoticeLevel::Info => Color::Cyan,
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Error => Color::Red,
    };
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        format!(" {}", notice.text),
        Style::default().fg(color),
    )]));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    config: Config,
) -> anyhow::Result<()> {
    // 1. Initialize terminal
    let mut terminal = ratatui::init();

    // 2. Set panic hook to restore terminal on crash.
    //    We capture the original hook and chain ours before it.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    // 3. Create ViewState
    let mut view_state = ViewState::new(&config);

    // 4. Create crossterm EventStream for async keyboard input
    let mut event_stream = EventStream::new();

    // 5. Create render interval (~30fps)
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // 6. Main loop
    loop {
        tokio::select! {
            // UI updates from the app orchestrator
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => {
                        apply_ui_update(&mut view_state, ui_update);
                    }
                    None => {
                        // Channel closed: app is shutting down
                        break;
                    }
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(command) = input::handle_key(key_event, &mut view_state) {
                            let is_quit = command == UserCommand::Quit;
                            let _ = cmd_tx.send(command).await;
                            if is_quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse events, resize events, etc. -- ignore
                    }
                    Some(Err(_)) => {
                        // Input error -- break out
                        break;
                    }
                    None => {
                        // Stream ended
                        break;
                    }
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    // 7. Restore terminal
    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

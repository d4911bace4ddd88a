// Application state and orchestration logic.
//
// The central event loop that coordinates user commands from the TUI,
// completed HTTP calls from spawned request tasks, and the periodic health
// probe. Owns the API client and the key store, and pushes UiUpdate
// messages to the TUI render loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::client::{ApiClient, ApiError};
use crate::config::Config;
use crate::keystore::KeyStore;
use crate::protocol::{ApiEvent, AuthMode, HealthStatus, Notice, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    /// API client shared with spawned request tasks.
    pub api: Arc<ApiClient>,
    pub keystore: KeyStore,
    /// Monotonically increasing counter identifying the current policy-list
    /// fetch. Incremented each time a new fetch is spawned; results from
    /// stale generations are discarded in `handle_api_event`, so a rapid
    /// page change can never clobber the list with an older response.
    pub policies_generation: u64,
    /// Same, for the document list.
    pub documents_generation: u64,
    /// Page currently shown per list, so post-mutation refetches stay put.
    pub policies_page: u32,
    pub documents_page: u32,
    pub health: HealthStatus,
}

impl AppState {
    pub fn new(config: Config, api: ApiClient, keystore: KeyStore) -> Self {
        AppState {
            config,
            api: Arc::new(api),
            keystore,
            policies_generation: 0,
            documents_generation: 0,
            policies_page: 1,
            documents_page: 1,
            health: HealthStatus::Unknown,
        }
    }

    pub fn auth_mode(&self) -> AuthMode {
        if self.api.has_api_key() {
            AuthMode::Keyed
        } else {
            AuthMode::Demo
        }
    }

    // -- request task spawning ----------------------------------------------

    fn spawn_health_check(&self, api_tx: &mpsc::Sender<ApiEvent>) {
        let api = self.api.clone();
        let tx = api_tx.clone();
        tokio::spawn(async move {
            let healthy = api.check_health().await.is_ok();
            let _ = tx.send(ApiEvent::Health { healthy }).await;
        });
    }

    fn spawn_fetch_policies(&mut self, page: u32, api_tx: &mpsc::Sender<ApiEvent>) {
        self.policies_generation += 1;
        self.policies_page = page;
        let generation = self.policies_generation;
        let page_size = self.config.ui.page_size;
        let api = self.api.clone();
        let tx = api_tx.clone();
        tokio::spawn(async move {
            let result = api.get_policies(page, page_size).await;
            let _ = tx.send(ApiEvent::Policies { result, generation }).await;
        });
    }

    fn spawn_fetch_documents(&mut self, page: u32, api_tx: &mpsc::Sender<ApiEvent>) {
        self.documents_generation += 1;
        self.documents_page = page;
        let generation = self.documents_generation;
        let page_size = self.config.ui.page_size;
        let api = self.api.clone();
        let tx = api_tx.clone();
        tokio::spawn(async move {
            let result = api.get_documents(page, page_size).await;
            let _ = tx.send(ApiEvent::Documents { result, generation }).await;
        });
    }

    // -- command handling ---------------------------------------------------

    pub async fn handle_command(
        &mut self,
        command: UserCommand,
        api_tx: &mpsc::Sender<ApiEvent>,
        ui_tx: &mpsc::Sender<UiUpdate>,
    ) {
        match command {
            UserCommand::FetchPolicies { page } => {
                let _ = ui_tx.send(UiUpdate::PoliciesLoading).await;
                self.spawn_fetch_policies(page, api_tx);
            }
            UserCommand::FetchDocuments { page } => {
                let _ = ui_tx.send(UiUpdate::DocumentsLoading).await;
                self.spawn_fetch_documents(page, api_tx);
            }
            UserCommand::UploadDocument { path, policy_id } => {
                info!("uploading document {} against policy {}", path.display(), policy_id);
                let _ = ui_tx.send(UiUpdate::UploadStarted).await;
                let api = self.api.clone();
                let tx = api_tx.clone();
                tokio::spawn(async move {
                    let result = api.upload_document(&path, &policy_id).await;
                    let _ = tx.send(ApiEvent::DocumentUploaded { result }).await;
                });
            }
            UserCommand::UploadPolicy {
                path,
                title,
                category,
            } => {
                info!("uploading policy `{title}` ({category}) from {}", path.display());
                let _ = ui_tx.send(UiUpdate::UploadStarted).await;
                let api = self.api.clone();
                let tx = api_tx.clone();
                tokio::spawn(async move {
                    let result = api.upload_policy(&path, &title, &category).await;
                    let _ = tx.send(ApiEvent::PolicyUploaded { result }).await;
                });
            }
            UserCommand::DeleteDocument { document_id } => {
                let _ = ui_tx
                    .send(UiUpdate::DeleteStarted(document_id.clone()))
                    .await;
                let api = self.api.clone();
                let tx = api_tx.clone();
                tokio::spawn(async move {
                    let result = api.delete_document(&document_id).await;
                    let _ = tx
                        .send(ApiEvent::DocumentDeleted {
                            document_id,
                            result,
                        })
                        .await;
                });
            }
            UserCommand::DeletePolicy { policy_id } => {
                let _ = ui_tx.send(UiUpdate::DeleteStarted(policy_id.clone())).await;
                let api = self.api.clone();
                let tx = api_tx.clone();
                tokio::spawn(async move {
                    let result = api.delete_policy(&policy_id).await;
                    let _ = tx.send(ApiEvent::PolicyDeleted { policy_id, result }).await;
                });
            }
            UserCommand::DeleteRule { policy_id, rule_id } => {
                let _ = ui_tx.send(UiUpdate::DeleteStarted(rule_id.clone())).await;
                let api = self.api.clone();
                let tx = api_tx.clone();
                tokio::spawn(async move {
                    let result = api.delete_rule(&policy_id, &rule_id).await;
                    let _ = tx
                        .send(ApiEvent::RuleDeleted {
                            policy_id,
                            rule_id,
                            result,
                        })
                        .await;
                });
            }
            UserCommand::UpdateRule {
                policy_id,
                rule_id,
                rule_text,
            } => {
                let api = self.api.clone();
                let tx = api_tx.clone();
                tokio::spawn(async move {
                    let result = api.update_rule(&policy_id, &rule_id, &rule_text).await;
                    let _ = tx.send(ApiEvent::RuleUpdated { policy_id, result }).await;
                });
            }
            UserCommand::SaveApiKey { key } => {
                match self.keystore.save(&key) {
                    Ok(()) => {
                        self.api.set_api_key(key);
                        let _ = ui_tx.send(UiUpdate::Auth(self.auth_mode())).await;
                        let _ = ui_tx
                            .send(UiUpdate::Notice(Notice::success(
                                "API key saved successfully",
                            )))
                            .await;
                        // Retry with the new key: reload both lists in place.
                        let _ = ui_tx.send(UiUpdate::PoliciesLoading).await;
                        self.spawn_fetch_policies(self.policies_page, api_tx);
                        let _ = ui_tx.send(UiUpdate::DocumentsLoading).await;
                        self.spawn_fetch_documents(self.documents_page, api_tx);
                    }
                    Err(e) => {
                        warn!("failed to persist API key: {e}");
                        let _ = ui_tx
                            .send(UiUpdate::Notice(Notice::error(format!(
                                "Failed to save API key: {e}"
                            ))))
                            .await;
                    }
                }
            }
            UserCommand::ClearApiKey => match self.keystore.clear() {
                Ok(()) => {
                    self.api.clear_api_key();
                    let _ = ui_tx.send(UiUpdate::Auth(self.auth_mode())).await;
                    let _ = ui_tx
                        .send(UiUpdate::Notice(Notice::info(
                            "API key removed, using demo mode",
                        )))
                        .await;
                }
                Err(e) => {
                    warn!("failed to remove API key: {e}");
                    let _ = ui_tx
                        .send(UiUpdate::Notice(Notice::error(format!(
                            "Failed to remove API key: {e}"
                        ))))
                        .await;
                }
            },
            // Quit is consumed by the run loop before reaching here.
            UserCommand::Quit => {}
        }
    }

    // -- API event handling -------------------------------------------------

    pub async fn handle_api_event(
        &mut self,
        event: ApiEvent,
        api_tx: &mpsc::Sender<ApiEvent>,
        ui_tx: &mpsc::Sender<UiUpdate>,
    ) {
        match event {
            ApiEvent::Health { healthy } => {
                let status = if healthy {
                    HealthStatus::Healthy
                } else {
                    HealthStatus::Unreachable
                };
                if status != self.health {
                    info!("health status changed: {:?} -> {:?}", self.health, status);
                }
                self.health = status;
                let _ = ui_tx.send(UiUpdate::Health(status)).await;
            }

            ApiEvent::Policies { result, generation } => {
                if generation != self.policies_generation {
                    debug!(generation, current = self.policies_generation, "discarding stale policy list");
                    return;
                }
                match result {
                    Ok(page) => {
                        let _ = ui_tx.send(UiUpdate::Policies(Box::new(page))).await;
                    }
                    Err(e) => {
                        warn!("policy list fetch failed: {e}");
                        let _ = ui_tx.send(UiUpdate::PoliciesFailed(e.to_string())).await;
                    }
                }
            }

            ApiEvent::Documents { result, generation } => {
                if generation != self.documents_generation {
                    debug!(generation, current = self.documents_generation, "discarding stale document list");
                    return;
                }
                match result {
                    Ok(page) => {
                        let _ = ui_tx.send(UiUpdate::Documents(Box::new(page))).await;
                    }
                    Err(e) => {
                        warn!("document list fetch failed: {e}");
                        let _ = ui_tx.send(UiUpdate::DocumentsFailed(e.to_string())).await;
                    }
                }
            }

            ApiEvent::DocumentUploaded { result } => match result {
                Ok(message) => {
                    let text = if message.is_empty() {
                        "Customer document uploaded; analysis will begin shortly".to_string()
                    } else {
                        message
                    };
                    let _ = ui_tx.send(UiUpdate::DocumentUploaded).await;
                    let _ = ui_tx.send(UiUpdate::Notice(Notice::success(text))).await;
                    // Land on the first page of the refreshed document list.
                    let _ = ui_tx.send(UiUpdate::DocumentsLoading).await;
                    self.spawn_fetch_documents(1, api_tx);
                }
                Err(e) => self.report_upload_error(e, ui_tx).await,
            },

            ApiEvent::PolicyUploaded { result } => match result {
                Ok(message) => {
                    let text = if message.is_empty() {
                        "Policy framework created".to_string()
                    } else {
                        message
                    };
                    let _ = ui_tx.send(UiUpdate::PolicyUploaded).await;
                    let _ = ui_tx.send(UiUpdate::Notice(Notice::success(text))).await;
                    let _ = ui_tx.send(UiUpdate::PoliciesLoading).await;
                    self.spawn_fetch_policies(self.policies_page, api_tx);
                }
                Err(e) => self.report_upload_error(e, ui_tx).await,
            },

            ApiEvent::DocumentDeleted {
                document_id,
                result,
            } => {
                let _ = ui_tx.send(UiUpdate::DeleteFinished(document_id)).await;
                match result {
                    Ok(()) => {
                        let _ = ui_tx
                            .send(UiUpdate::Notice(Notice::success("Document deleted")))
                            .await;
                        let _ = ui_tx.send(UiUpdate::DocumentsLoading).await;
                        self.spawn_fetch_documents(self.documents_page, api_tx);
                    }
                    Err(e) => self.report_mutation_error("delete document", e, ui_tx).await,
                }
            }

            ApiEvent::PolicyDeleted { policy_id, result } => {
                let _ = ui_tx.send(UiUpdate::DeleteFinished(policy_id)).await;
                match result {
                    Ok(()) => {
                        let _ = ui_tx
                            .send(UiUpdate::Notice(Notice::success(
                                "Policy and its rules deleted",
                            )))
                            .await;
                        let _ = ui_tx.send(UiUpdate::PoliciesLoading).await;
                        self.spawn_fetch_policies(self.policies_page, api_tx);
                    }
                    Err(e) => self.report_mutation_error("delete policy", e, ui_tx).await,
                }
            }

            ApiEvent::RuleDeleted {
                policy_id, rule_id, result,
            } => {
                let _ = ui_tx.send(UiUpdate::DeleteFinished(rule_id)).await;
                match result {
                    Ok(()) => {
                        debug!("rule deleted from policy {policy_id}");
                        let _ = ui_tx
                            .send(UiUpdate::Notice(Notice::success("Rule deleted")))
                            .await;
                        let _ = ui_tx.send(UiUpdate::PoliciesLoading).await;
                        self.spawn_fetch_policies(self.policies_page, api_tx);
                    }
                    Err(e) => self.report_mutation_error("delete rule", e, ui_tx).await,
                }
            }

            ApiEvent::RuleUpdated { policy_id, result } => match result {
                Ok(()) => {
                    debug!("rule updated on policy {policy_id}");
                    let _ = ui_tx
                        .send(UiUpdate::Notice(Notice::success("Rule updated")))
                        .await;
                    let _ = ui_tx.send(UiUpdate::PoliciesLoading).await;
                    self.spawn_fetch_policies(self.policies_page, api_tx);
                }
                Err(e) => self.report_mutation_error("update rule", e, ui_tx).await,
            },
        }
    }

    /// Upload failures feed the upload panel; 429 additionally opens the
    /// rate-limit dialog instead of reading as a generic failure.
    async fn report_upload_error(&self, error: ApiError, ui_tx: &mpsc::Sender<UiUpdate>) {
        warn!("upload failed: {error}");
        if error.is_rate_limit() {
            let _ = ui_tx.send(UiUpdate::RateLimited(error.to_string())).await;
            let _ = ui_tx
                .send(UiUpdate::UploadFailed(
                    "Rate limit reached. Please add your API key to continue.".to_string(),
                ))
                .await;
        } else {
            let _ = ui_tx.send(UiUpdate::UploadFailed(error.to_string())).await;
        }
    }

    /// Non-upload mutation failures surface as a notice; 429 opens the
    /// rate-limit dialog.
    async fn report_mutation_error(
        &self,
        action: &str,
        error: ApiError,
        ui_tx: &mpsc::Sender<UiUpdate>,
    ) {
        warn!("{action} failed: {error}");
        if error.is_rate_limit() {
            let _ = ui_tx.send(UiUpdate::RateLimited(error.to_string())).await;
        } else {
            let _ = ui_tx
                .send(UiUpdate::Notice(Notice::error(format!(
                    "Failed to {action}: {error}"
                ))))
                .await;
        }
    }
}

// ---------------------------------------------------------------------------
// Main app loop
// ---------------------------------------------------------------------------

/// Run the orchestrator loop until the TUI sends `Quit` or hangs up.
///
/// Kicks off the initial page-1 fetches for both lists, then multiplexes
/// user commands, completed request tasks, and the periodic health probe.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    let (api_tx, mut api_rx) = mpsc::channel::<ApiEvent>(256);

    // Initial load: report auth mode and fetch page 1 of both lists. The
    // first health probe comes from the interval's immediate first tick.
    let _ = ui_tx.send(UiUpdate::Auth(state.auth_mode())).await;
    let _ = ui_tx.send(UiUpdate::PoliciesLoading).await;
    state.spawn_fetch_policies(1, &api_tx);
    let _ = ui_tx.send(UiUpdate::DocumentsLoading).await;
    state.spawn_fetch_documents(1, &api_tx);

    let mut health_tick = tokio::time::interval(Duration::from_secs(
        state.config.ui.health_check_interval_secs,
    ));
    health_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            command = cmd_rx.recv() => {
                match command {
                    None | Some(UserCommand::Quit) => break,
                    Some(command) => state.handle_command(command, &api_tx, &ui_tx).await,
                }
            }

            Some(event) = api_rx.recv() => {
                state.handle_api_event(event, &api_tx, &ui_tx).await;
            }

            _ = health_tick.tick() => {
                state.spawn_health_check(&api_tx);
            }
        }
    }

    info!("app loop shut down");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::PoliciesPage;
    use crate::config::{CredentialsConfig, ServerConfig, UiConfig, UploadConfig};

    fn test_config(dir: &std::path::Path) -> Config {
        Config {
            server: ServerConfig {
                base_url: "http://localhost:1".to_string(),
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
            credentials_path: dir.join("credentials.toml"),
        }
    }

    fn test_state(dir: &std::path::Path, api_key: Option<&str>) -> AppState {
        let config = test_config(dir);
        let api = ApiClient::new(
            config.server.base_url.clone(),
            config.server.api_version.clone(),
            api_key.map(|k| k.to_string()),
        );
        let keystore = KeyStore::new(&config.credentials_path);
        AppState::new(config, api, keystore)
    }

    fn channels() -> (
        mpsc::Sender<ApiEvent>,
        mpsc::Receiver<ApiEvent>,
        mpsc::Sender<UiUpdate>,
        mpsc::Receiver<UiUpdate>,
    ) {
        let (api_tx, api_rx) = mpsc::channel(64);
        let (ui_tx, ui_rx) = mpsc::channel(64);
        (api_tx, api_rx, ui_tx, ui_rx)
    }

    fn empty_policies_page(page: u32) -> PoliciesPage {
        PoliciesPage {
            policies: vec![],
            page,
            page_size: 10,
            total: 0,
        }
    }

    #[test]
    fn auth_mode_reflects_key_presence() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path(), None);
        assert_eq!(state.auth_mode(), AuthMode::Demo);

        let keyed = test_state(tmp.path(), Some("gsk_abc"));
        assert_eq!(keyed.auth_mode(), AuthMode::Keyed);
    }

    #[tokio::test]
    async fn stale_policy_results_are_discarded() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = test_state(tmp.path(), None);
        let (api_tx, _api_rx, ui_tx, mut ui_rx) = channels();

        // Two fetches in quick succession: generation 1 then 2.
        state.spawn_fetch_policies(1, &api_tx);
        state.spawn_fetch_policies(2, &api_tx);
        assert_eq!(state.policies_generation, 2);

        // A late result from generation 1 must be dropped.
        state
            .handle_api_event(
                ApiEvent::Policies {
                    result: Ok(empty_policies_page(1)),
                    generation: 1,
                },
                &api_tx,
                &ui_tx,
            )
            .await;
        assert!(ui_rx.try_recv().is_err(), "stale result reached the UI");

        // The current generation goes through.
        state
            .handle_api_event(
                ApiEvent::Policies {
                    result: Ok(empty_policies_page(2)),
                    generation: 2,
                },
                &api_tx,
                &ui_tx,
            )
            .await;
        match ui_rx.try_recv().unwrap() {
            UiUpdate::Policies(page) => assert_eq!(page.page, 2),
            other => panic!("expected Policies update, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn rate_limited_upload_opens_dialog_not_generic_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = test_state(tmp.path(), None);
        let (api_tx, _api_rx, ui_tx, mut ui_rx) = channels();

        state
            .handle_api_event(
                ApiEvent::DocumentUploaded {
                    result: Err(ApiError::RateLimited {
                        message: "demo quota exhausted".to_string(),
                    }),
                },
                &api_tx,
                &ui_tx,
            )
            .await;

        match ui_rx.try_recv().unwrap() {
            UiUpdate::RateLimited(message) => {
                assert!(message.contains("demo quota exhausted"));
            }
            other => panic!("expected RateLimited first, got: {other:?}"),
        }
        match ui_rx.try_recv().unwrap() {
            UiUpdate::UploadFailed(message) => {
                assert!(message.contains("add your API key"));
            }
            other => panic!("expected UploadFailed, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_429_upload_failure_is_generic() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = test_state(tmp.path(), None);
        let (api_tx, _api_rx, ui_tx, mut ui_rx) = channels();

        state
            .handle_api_event(
                ApiEvent::DocumentUploaded {
                    result: Err(ApiError::Status {
                        status: 500,
                        message: "text extraction failed".to_string(),
                    }),
                },
                &api_tx,
                &ui_tx,
            )
            .await;

        match ui_rx.try_recv().unwrap() {
            UiUpdate::UploadFailed(message) => {
                assert!(message.contains("text extraction failed"));
            }
            other => panic!("expected UploadFailed, got: {other:?}"),
        }
        assert!(ui_rx.try_recv().is_err(), "no dialog for non-429 failures");
    }

    #[tokio::test]
    async fn successful_document_upload_refreshes_document_list() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = test_state(tmp.path(), None);
        let (api_tx, _api_rx, ui_tx, mut ui_rx) = channels();

        state.documents_page = 3;
        let generation_before = state.documents_generation;

        state
            .handle_api_event(
                ApiEvent::DocumentUploaded {
                    result: Ok(String::new()),
                },
                &api_tx,
                &ui_tx,
            )
            .await;

        assert_eq!(ui_rx.try_recv().unwrap(), UiUpdate::DocumentUploaded);
        match ui_rx.try_recv().unwrap() {
            UiUpdate::Notice(notice) => assert!(notice.text.contains("uploaded")),
            other => panic!("expected Notice, got: {other:?}"),
        }
        assert_eq!(ui_rx.try_recv().unwrap(), UiUpdate::DocumentsLoading);

        // Refetch targets page 1 with a fresh generation.
        assert_eq!(state.documents_page, 1);
        assert_eq!(state.documents_generation, generation_before + 1);
    }

    #[tokio::test]
    async fn delete_finished_is_reported_even_on_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = test_state(tmp.path(), None);
        let (api_tx, _api_rx, ui_tx, mut ui_rx) = channels();

        state
            .handle_api_event(
                ApiEvent::DocumentDeleted {
                    document_id: "doc_5".to_string(),
                    result: Err(ApiError::Status {
                        status: 404,
                        message: "not found".to_string(),
                    }),
                },
                &api_tx,
                &ui_tx,
            )
            .await;

        assert_eq!(
            ui_rx.try_recv().unwrap(),
            UiUpdate::DeleteFinished("doc_5".to_string())
        );
        match ui_rx.try_recv().unwrap() {
            UiUpdate::Notice(notice) => {
                assert_eq!(notice.level, crate::protocol::NoticeLevel::Error);
                assert!(notice.text.contains("not found"));
            }
            other => panic!("expected error Notice, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn save_api_key_switches_mode_and_reloads_lists() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = test_state(tmp.path(), None);
        let (api_tx, _api_rx, ui_tx, mut ui_rx) = channels();

        assert_eq!(state.auth_mode(), AuthMode::Demo);

        state
            .handle_command(
                UserCommand::SaveApiKey {
                    key: "gsk_new_key".to_string(),
                },
                &api_tx,
                &ui_tx,
            )
            .await;

        assert_eq!(state.auth_mode(), AuthMode::Keyed);
        assert_eq!(state.keystore.load().as_deref(), Some("gsk_new_key"));

        assert_eq!(ui_rx.try_recv().unwrap(), UiUpdate::Auth(AuthMode::Keyed));
        match ui_rx.try_recv().unwrap() {
            UiUpdate::Notice(notice) => assert!(notice.text.contains("saved")),
            other => panic!("expected Notice, got: {other:?}"),
        }
        assert_eq!(ui_rx.try_recv().unwrap(), UiUpdate::PoliciesLoading);
        assert_eq!(ui_rx.try_recv().unwrap(), UiUpdate::DocumentsLoading);
    }

    #[tokio::test]
    async fn clear_api_key_reverts_to_demo_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = test_state(tmp.path(), Some("gsk_active"));
        state.keystore.save("gsk_active").unwrap();
        let (api_tx, _api_rx, ui_tx, mut ui_rx) = channels();

        state
            .handle_command(UserCommand::ClearApiKey, &api_tx, &ui_tx)
            .await;

        assert_eq!(state.auth_mode(), AuthMode::Demo);
        assert!(state.keystore.load().is_none());

        assert_eq!(ui_rx.try_recv().unwrap(), UiUpdate::Auth(AuthMode::Demo));
        match ui_rx.try_recv().unwrap() {
            UiUpdate::Notice(notice) => assert!(notice.text.contains("demo mode")),
            other => panic!("expected Notice, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn health_events_update_status() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = test_state(tmp.path(), None);
        let (api_tx, _api_rx, ui_tx, mut ui_rx) = channels();

        assert_eq!(state.health, HealthStatus::Unknown);

        state
            .handle_api_event(ApiEvent::Health { healthy: true }, &api_tx, &ui_tx)
            .await;
        assert_eq!(state.health, HealthStatus::Healthy);
        assert_eq!(
            ui_rx.try_recv().unwrap(),
            UiUpdate::Health(HealthStatus::Healthy)
        );

        state
            .handle_api_event(ApiEvent::Health { healthy: false }, &api_tx, &ui_tx)
            .await;
        assert_eq!(state.health, HealthStatus::Unreachable);
    }
}

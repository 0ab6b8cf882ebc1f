//! Download trigger handler

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::blob::{Blob, ObjectUrlGuard, ObjectUrlRegistry};
use crate::endpoint::{DownloadEndpoint, DownloadRequest};
use crate::phase::TriggerPhase;
use crate::saver::{FileSaver, SaveAnchor, SavedFile};
use crate::ui::{StatusArea, StatusMessages, TriggerControl, TriggerLabels, UrlField};

pub const DEFAULT_FILE_NAME: &str = "instagram_video.mp4";

/// How a single invocation ended
#[derive(Debug, Clone)]
pub enum TriggerOutcome {
    /// Field was empty or whitespace; nothing was sent
    EmptyInput,
    /// Another invocation still owns the control
    AlreadyRunning,
    /// Endpoint answered with a non-2xx status
    Rejected { status: u16 },
    /// Request never produced a response
    TransportFailed { message: String },
    /// Response arrived but the save step failed
    SaveFailed { message: String },
    Saved(SavedFile),
}

impl TriggerOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, TriggerOutcome::Saved(_))
    }
}

/// Why a sent request did not end in a saved file
enum AttemptFailure {
    Rejected(u16),
    Transport(String),
    Save(String),
}

/// Clears the in-flight flag when the attempt settles
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct DownloadTrigger {
    endpoint: Arc<dyn DownloadEndpoint>,
    saver: Arc<dyn FileSaver>,
    registry: ObjectUrlRegistry,
    file_name: String,
    messages: StatusMessages,
    labels: TriggerLabels,
    in_flight: AtomicBool,
    phase: RwLock<TriggerPhase>,
}

impl DownloadTrigger {
    pub fn new(endpoint: Arc<dyn DownloadEndpoint>, saver: Arc<dyn FileSaver>) -> Self {
        Self {
            endpoint,
            saver,
            registry: ObjectUrlRegistry::new(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            messages: StatusMessages::default(),
            labels: TriggerLabels::default(),
            in_flight: AtomicBool::new(false),
            phase: RwLock::new(TriggerPhase::Idle),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_messages(mut self, messages: StatusMessages) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_labels(mut self, labels: TriggerLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn phase(&self) -> TriggerPhase {
        *self.phase.read()
    }

    pub fn registry(&self) -> &ObjectUrlRegistry {
        &self.registry
    }

    pub fn labels(&self) -> &TriggerLabels {
        &self.labels
    }

    /// Run one download attempt against the given UI elements.
    ///
    /// The field is re-read on every call. Apart from the empty-input and
    /// already-running exits, the control always ends enabled with
    /// `labels.idle`; front ends render their initial label from the same
    /// value so the restored label is the original one.
    pub async fn trigger(
        &self,
        field: &dyn UrlField,
        control: &dyn TriggerControl,
        status: &dyn StatusArea,
    ) -> TriggerOutcome {
        let input = field.value();
        let url = input.trim();

        if url.is_empty() {
            status.set_text(&self.messages.empty_input);
            return TriggerOutcome::EmptyInput;
        }

        let Some(_guard) = self.try_begin() else {
            tracing::warn!(url = %url, "Download already in progress, ignoring trigger");
            return TriggerOutcome::AlreadyRunning;
        };

        self.set_phase(TriggerPhase::Fetching);
        control.set_enabled(false);
        control.set_label(&self.labels.busy);
        status.set_text(&self.messages.fetching);

        tracing::info!(url = %url, "Requesting download");

        let (phase, message, outcome) = match self.fetch_and_save(url).await {
            Ok(saved) => (
                TriggerPhase::Succeeded,
                &self.messages.started,
                TriggerOutcome::Saved(saved),
            ),
            Err(AttemptFailure::Rejected(status)) => (
                TriggerPhase::Failed,
                &self.messages.rejected,
                TriggerOutcome::Rejected { status },
            ),
            Err(AttemptFailure::Transport(message)) => (
                TriggerPhase::Failed,
                &self.messages.network_error,
                TriggerOutcome::TransportFailed { message },
            ),
            Err(AttemptFailure::Save(message)) => (
                TriggerPhase::Failed,
                &self.messages.save_error,
                TriggerOutcome::SaveFailed { message },
            ),
        };

        self.set_phase(phase);
        status.set_text(message);
        control.set_enabled(true);
        control.set_label(&self.labels.idle);
        self.set_phase(TriggerPhase::Idle);

        outcome
    }

    async fn fetch_and_save(&self, url: &str) -> Result<SavedFile, AttemptFailure> {
        let request = DownloadRequest::new(url);

        let response = match self.endpoint.post_download(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(url = %url, error = %e, "Download request failed");
                return Err(AttemptFailure::Transport(e.to_string()));
            }
        };

        if !response.is_success() {
            tracing::warn!(url = %url, status = response.status, "Endpoint rejected download");
            return Err(AttemptFailure::Rejected(response.status));
        }

        let object_url = self
            .registry
            .create_object_url(Blob::new(response.body, response.content_type));
        let _revoke = ObjectUrlGuard {
            registry: &self.registry,
            url: object_url.clone(),
        };

        let anchor = SaveAnchor {
            href: object_url,
            download: self.file_name.clone(),
        };

        self.click(&anchor).await.map_err(|e| {
            tracing::error!(file_name = %anchor.download, error = %e, "Save failed");
            AttemptFailure::Save(e.to_string())
        })
    }

    async fn click(&self, anchor: &SaveAnchor) -> crate::Result<SavedFile> {
        let blob = self.registry.resolve(&anchor.href)?;
        self.saver.save(anchor, &blob).await
    }

    fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                flag: &self.in_flight,
            })
    }

    fn set_phase(&self, target: TriggerPhase) {
        let mut phase = self.phase.write();
        let current = *phase;
        if !current.can_transition_to(target) {
            tracing::warn!(from = %current, to = %target, "Unexpected trigger phase transition");
        }
        *phase = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::EndpointResponse;
    use crate::error::TriggerError;
    use async_trait::async_trait;
    use bytes::Bytes;
    use chrono::Utc;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct FakeControl {
        enabled: Mutex<Option<bool>>,
        label: Mutex<Option<String>>,
        labels_seen: Mutex<Vec<String>>,
        toggles: Mutex<usize>,
    }

    impl FakeControl {
        /// Control as rendered before the first click
        fn new(label: &str) -> Self {
            Self {
                labels_seen: Mutex::new(vec![label.to_string()]),
                ..Default::default()
            }
        }
    }

    impl TriggerControl for FakeControl {
        fn set_enabled(&self, enabled: bool) {
            *self.enabled.lock() = Some(enabled);
            *self.toggles.lock() += 1;
        }

        fn set_label(&self, label: &str) {
            *self.label.lock() = Some(label.to_string());
            self.labels_seen.lock().push(label.to_string());
        }
    }

    #[derive(Default)]
    struct FakeStatus {
        history: Mutex<Vec<String>>,
    }

    impl FakeStatus {
        fn last(&self) -> Option<String> {
            self.history.lock().last().cloned()
        }
    }

    impl StatusArea for FakeStatus {
        fn set_text(&self, text: &str) {
            self.history.lock().push(text.to_string());
        }
    }

    enum Reply {
        Status(u16, &'static [u8]),
        Refused,
    }

    #[derive(Default)]
    struct FakeEndpoint {
        replies: Mutex<VecDeque<Reply>>,
        requests: Mutex<Vec<DownloadRequest>>,
        gate: Option<Arc<Notify>>,
    }

    impl FakeEndpoint {
        fn replying(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl DownloadEndpoint for FakeEndpoint {
        async fn post_download(
            &self,
            request: &DownloadRequest,
        ) -> crate::Result<EndpointResponse> {
            self.requests.lock().push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let reply = self.replies.lock().pop_front();
            match reply {
                Some(Reply::Status(status, body)) => Ok(EndpointResponse {
                    status,
                    content_type: Some("video/mp4".to_string()),
                    body: Bytes::from_static(body),
                }),
                Some(Reply::Refused) | None => Err(TriggerError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                ))),
            }
        }
    }

    #[derive(Default)]
    struct FakeSaver {
        saves: Mutex<Vec<(SaveAnchor, Blob)>>,
        fail: bool,
    }

    #[async_trait]
    impl FileSaver for FakeSaver {
        async fn save(&self, anchor: &SaveAnchor, blob: &Blob) -> crate::Result<SavedFile> {
            if self.fail {
                return Err(TriggerError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only",
                )));
            }
            self.saves.lock().push((anchor.clone(), blob.clone()));
            Ok(SavedFile {
                path: PathBuf::from("/downloads").join(&anchor.download),
                file_name: anchor.download.clone(),
                size: blob.len() as u64,
                sha256: String::new(),
                saved_at: Utc::now(),
            })
        }
    }

    fn trigger_with(endpoint: Arc<FakeEndpoint>, saver: Arc<FakeSaver>) -> DownloadTrigger {
        DownloadTrigger::new(endpoint, saver)
    }

    fn assert_restored(control: &FakeControl) {
        assert_eq!(*control.enabled.lock(), Some(true));
        assert_eq!(control.label.lock().as_deref(), Some("Download"));
    }

    #[tokio::test]
    async fn test_empty_input_sends_nothing() {
        let endpoint = Arc::new(FakeEndpoint::default());
        let saver = Arc::new(FakeSaver::default());
        let trigger = trigger_with(endpoint.clone(), saver.clone());

        for input in ["", "   ", "\t\n"] {
            let control = FakeControl::default();
            let status = FakeStatus::default();

            let outcome = trigger.trigger(&input, &control, &status).await;

            assert!(matches!(outcome, TriggerOutcome::EmptyInput));
            assert_eq!(status.last().as_deref(), Some("⚠️ Paste an Instagram link"));
            // Control is never touched on the early exit
            assert_eq!(*control.toggles.lock(), 0);
            assert!(control.label.lock().is_none());
        }

        assert!(endpoint.requests.lock().is_empty());
        assert!(saver.saves.lock().is_empty());
    }

    #[tokio::test]
    async fn test_success_saves_fixed_file_name() {
        let endpoint = Arc::new(FakeEndpoint::replying(vec![Reply::Status(200, &[0x00, 0x01])]));
        let saver = Arc::new(FakeSaver::default());
        let trigger = trigger_with(endpoint.clone(), saver.clone());
        let control = FakeControl::default();
        let status = FakeStatus::default();

        let outcome = trigger
            .trigger(&"https://instagram.com/p/abc", &control, &status)
            .await;

        assert!(outcome.is_saved());

        let requests = endpoint.requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://instagram.com/p/abc");

        let saves = saver.saves.lock();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].0.download, "instagram_video.mp4");
        assert!(saves[0].0.href.starts_with("blob:"));
        assert_eq!(&saves[0].1.bytes[..], &[0x00, 0x01]);

        assert_eq!(
            *status.history.lock(),
            vec!["⏳ Fetching video...".to_string(), "✅ Download started".to_string()]
        );
        assert_restored(&control);
        assert_eq!(trigger.phase(), TriggerPhase::Idle);
        // Object URL released once the save returned
        assert_eq!(trigger.registry().live_count(), 0);
    }

    #[tokio::test]
    async fn test_non_2xx_skips_save() {
        let endpoint = Arc::new(FakeEndpoint::replying(vec![Reply::Status(500, b"boom")]));
        let saver = Arc::new(FakeSaver::default());
        let trigger = trigger_with(endpoint.clone(), saver.clone());
        let control = FakeControl::default();
        let status = FakeStatus::default();

        let outcome = trigger
            .trigger(&"https://instagram.com/p/abc", &control, &status)
            .await;

        assert!(matches!(outcome, TriggerOutcome::Rejected { status: 500 }));
        assert!(saver.saves.lock().is_empty());
        assert_eq!(status.last().as_deref(), Some("❌ Failed to download"));
        assert_restored(&control);
        assert_eq!(trigger.registry().live_count(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_restores_control() {
        let endpoint = Arc::new(FakeEndpoint::replying(vec![Reply::Refused]));
        let saver = Arc::new(FakeSaver::default());
        let trigger = trigger_with(endpoint, saver.clone());
        let control = FakeControl::default();
        let status = FakeStatus::default();

        let outcome = trigger
            .trigger(&"https://instagram.com/p/abc", &control, &status)
            .await;

        assert!(matches!(outcome, TriggerOutcome::TransportFailed { .. }));
        assert!(saver.saves.lock().is_empty());
        assert_eq!(status.last().as_deref(), Some("❌ Network error, try again"));
        assert_restored(&control);
        assert_eq!(trigger.phase(), TriggerPhase::Idle);
    }

    #[tokio::test]
    async fn test_save_failure_releases_object_url() {
        let endpoint = Arc::new(FakeEndpoint::replying(vec![Reply::Status(200, &[1, 2, 3])]));
        let saver = Arc::new(FakeSaver {
            fail: true,
            ..Default::default()
        });
        let trigger = trigger_with(endpoint, saver);
        let control = FakeControl::default();
        let status = FakeStatus::default();

        let outcome = trigger
            .trigger(&"https://instagram.com/p/abc", &control, &status)
            .await;

        assert!(matches!(outcome, TriggerOutcome::SaveFailed { .. }));
        assert_eq!(status.last().as_deref(), Some("❌ Could not save the video"));
        assert_restored(&control);
        assert_eq!(trigger.registry().live_count(), 0);
    }

    #[tokio::test]
    async fn test_repeated_triggers_are_independent() {
        let endpoint = Arc::new(FakeEndpoint::replying(vec![
            Reply::Status(200, &[0x00, 0x01]),
            Reply::Status(200, &[0x00, 0x01]),
        ]));
        let saver = Arc::new(FakeSaver::default());
        let trigger = trigger_with(endpoint.clone(), saver.clone());
        let control = FakeControl::default();
        let status = FakeStatus::default();
        let url = "https://instagram.com/p/abc".to_string();

        assert!(trigger.trigger(&url, &control, &status).await.is_saved());
        assert!(trigger.trigger(&url, &control, &status).await.is_saved());

        assert_eq!(endpoint.requests.lock().len(), 2);
        let saves = saver.saves.lock();
        assert_eq!(saves.len(), 2);
        assert_ne!(saves[0].0.href, saves[1].0.href);
        assert_eq!(trigger.registry().live_count(), 0);
    }

    #[tokio::test]
    async fn test_reentrant_trigger_is_rejected() {
        let gate = Arc::new(Notify::new());
        let endpoint = Arc::new(FakeEndpoint {
            replies: Mutex::new(vec![Reply::Status(200, &[7])].into()),
            requests: Mutex::new(Vec::new()),
            gate: Some(gate.clone()),
        });
        let saver = Arc::new(FakeSaver::default());
        let trigger = trigger_with(endpoint.clone(), saver.clone());
        let control = FakeControl::default();
        let status = FakeStatus::default();

        let (first, second, _) = tokio::join!(
            trigger.trigger(&"https://instagram.com/p/abc", &control, &status),
            trigger.trigger(&"https://instagram.com/p/abc", &control, &status),
            async { gate.notify_one() },
        );

        assert!(first.is_saved());
        assert!(matches!(second, TriggerOutcome::AlreadyRunning));
        assert_eq!(endpoint.requests.lock().len(), 1);
        assert_eq!(saver.saves.lock().len(), 1);
        assert_restored(&control);

        // Guard released, a fresh click goes through again
        gate.notify_one();
        let outcome = trigger
            .trigger(&"https://instagram.com/p/abc", &control, &status)
            .await;
        assert!(matches!(outcome, TriggerOutcome::TransportFailed { .. }));
        assert_eq!(endpoint.requests.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_configured_idle_label_is_restored() {
        let endpoint = Arc::new(FakeEndpoint::replying(vec![Reply::Status(404, b"")]));
        let saver = Arc::new(FakeSaver::default());
        let trigger = trigger_with(endpoint, saver).with_labels(TriggerLabels {
            idle: "Grab".to_string(),
            busy: "Grabbing...".to_string(),
        });
        let control = FakeControl::new(&trigger.labels().idle);
        let status = FakeStatus::default();

        let outcome = trigger
            .trigger(&"https://instagram.com/p/abc", &control, &status)
            .await;

        assert!(matches!(outcome, TriggerOutcome::Rejected { status: 404 }));
        assert_eq!(
            *control.labels_seen.lock(),
            vec!["Grab".to_string(), "Grabbing...".to_string(), "Grab".to_string()]
        );
        assert_eq!(*control.enabled.lock(), Some(true));
    }

    #[tokio::test]
    async fn test_custom_file_name_and_trimmed_url() {
        let endpoint = Arc::new(FakeEndpoint::replying(vec![Reply::Status(201, &[1])]));
        let saver = Arc::new(FakeSaver::default());
        let trigger = trigger_with(endpoint.clone(), saver.clone()).with_file_name("reel.mp4");
        let control = FakeControl::default();
        let status = FakeStatus::default();

        let outcome = trigger
            .trigger(&"  https://instagram.com/reel/xyz  ", &control, &status)
            .await;

        assert!(outcome.is_saved());
        assert_eq!(endpoint.requests.lock()[0].url, "https://instagram.com/reel/xyz");
        assert_eq!(saver.saves.lock()[0].0.download, "reel.mp4");
    }
}

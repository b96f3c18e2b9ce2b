//! Frame-processing pipeline: a capture/matching worker thread and a
//! controller loop that owns prompting and rendering.
//!
//! The worker pulls frames, runs the external encoder and resolves each
//! detection against the registry; it never blocks on a prompt. Anything
//! interactive is marshaled to the controller over an mpsc channel, the
//! worker moving straight on to the next frame. Registry and caches are
//! shared across the two contexts behind explicit locks.

use crate::collaborators::{FaceEncoder, FrameSource, Prompter, Renderer};
use crate::dedup::{PromptSuppression, SessionSeen};
use crate::ledger::{AttendanceLedger, LedgerError};
use crate::matcher::Matcher;
use crate::registry::{Registry, RegistryError};
use crate::types::{Embedding, Frame, Region};
use parking_lot::{Mutex, RwLock};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::mpsc;

/// Label rendered for a face with no registry match.
pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("registry: {0}")]
    Registry(#[from] RegistryError),
    #[error("ledger: {0}")]
    Ledger(#[from] LedgerError),
}

/// Settings shared by the worker and the controller.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Single distance tolerance used by the matcher and both
    /// approximate-membership caches.
    pub tolerance: f32,
    /// Identity whose recognition triggers an immediate attendance write.
    pub self_name: String,
    /// How long a prompt suppresses re-prompting of the same face.
    pub prompt_ttl: Duration,
    /// Where the registry is persisted after a successful registration.
    pub registry_path: PathBuf,
}

/// State shared between the worker and controller contexts.
///
/// The registry is read per probe by the worker and appended to by the
/// controller on registration; both caches and the ledger are touched from
/// both sides. Each sits behind its own lock.
pub struct SharedState {
    pub registry: RwLock<Registry>,
    pub session_seen: Mutex<SessionSeen>,
    pub prompts: Mutex<PromptSuppression>,
    pub ledger: Mutex<AttendanceLedger>,
}

impl SharedState {
    pub fn new(registry: Registry, ledger: AttendanceLedger, config: &PipelineConfig) -> Self {
        Self {
            registry: RwLock::new(registry),
            session_seen: Mutex::new(SessionSeen::new(config.tolerance)),
            prompts: Mutex::new(PromptSuppression::new(config.tolerance, config.prompt_ttl)),
            ledger: Mutex::new(ledger),
        }
    }
}

/// Messages marshaled from the worker to the controller context.
pub enum ControlMsg {
    /// A processed frame with per-face labels. `None` means region only:
    /// the face is already resolved this session or currently prompted.
    Frame {
        frame: Frame,
        labels: Vec<(Region, Option<String>)>,
    },
    /// Interactive-registration request for an unmatched face.
    Register { embedding: Embedding },
}

/// Background capture-and-match worker.
pub struct Worker<S, E, M> {
    source: S,
    encoder: E,
    matcher: M,
    shared: Arc<SharedState>,
    tx: mpsc::Sender<ControlMsg>,
    run_flag: Arc<AtomicBool>,
    config: PipelineConfig,
}

impl<S, E, M> Worker<S, E, M>
where
    S: FrameSource,
    E: FaceEncoder,
    M: Matcher,
{
    pub fn new(
        source: S,
        encoder: E,
        matcher: M,
        shared: Arc<SharedState>,
        tx: mpsc::Sender<ControlMsg>,
        run_flag: Arc<AtomicBool>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            source,
            encoder,
            matcher,
            shared,
            tx,
            run_flag,
            config,
        }
    }

    /// Frame loop. Exits when the run flag clears, the stream ends, a read
    /// fails, or the controller goes away. The in-flight frame always
    /// completes; the capture device is released when the worker drops.
    pub fn run(mut self) {
        tracing::info!("worker started");
        while self.run_flag.load(Ordering::SeqCst) {
            let frame = match self.source.read() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    tracing::info!("capture stream ended");
                    break;
                }
                Err(e) => {
                    tracing::error!(error = %e, "frame read failed; recognition stopped");
                    break;
                }
            };
            if !self.process_frame(frame, Instant::now()) {
                tracing::info!("controller gone; stopping worker");
                break;
            }
        }
        tracing::info!("worker exiting");
    }

    /// Handle one frame. Returns false once the controller is unreachable.
    fn process_frame(&mut self, frame: Frame, now: Instant) -> bool {
        let detections = match self.encoder.detect_and_encode(&frame) {
            Ok(detections) => detections,
            Err(e) => {
                tracing::warn!(error = %e, "detection failed for frame");
                Vec::new()
            }
        };

        let mut labels = Vec::with_capacity(detections.len());
        for detection in detections {
            // Already resolved this session: region only.
            if self.shared.session_seen.lock().contains(&detection.embedding) {
                labels.push((detection.region, None));
                continue;
            }
            // Prompt outstanding (or recently declined): region only.
            if self
                .shared
                .prompts
                .lock()
                .contains(&detection.embedding, now)
            {
                labels.push((detection.region, None));
                continue;
            }

            let matched = {
                let registry = self.shared.registry.read();
                self.matcher
                    .resolve(&detection.embedding, &registry, self.config.tolerance)
                    .map(str::to_owned)
            };

            match matched {
                Some(name) => {
                    self.shared
                        .session_seen
                        .lock()
                        .add(detection.embedding.clone());
                    if name == self.config.self_name {
                        if let Err(e) = self.shared.ledger.lock().log_attendance(&name, now) {
                            tracing::error!(name = %name, error = %e, "attendance write failed");
                        }
                    }
                    labels.push((detection.region, Some(name)));
                }
                None => {
                    let request = ControlMsg::Register {
                        embedding: detection.embedding,
                    };
                    if !self.send(request) {
                        return false;
                    }
                    labels.push((detection.region, Some(UNKNOWN_LABEL.to_string())));
                }
            }
        }

        self.send(ControlMsg::Frame { frame, labels })
    }

    /// Non-blocking send toward the controller. The worker must never wait
    /// on prompt or render work, so when the queue is full the message is
    /// dropped — a suppressed face reappears next frame and a fresh
    /// request goes out then. Returns false once the controller is gone.
    fn send(&self, msg: ControlMsg) -> bool {
        match self.tx.try_send(msg) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::debug!("controller queue full; dropping message");
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    pub fn spawn(self) -> std::thread::JoinHandle<()>
    where
        S: Send + 'static,
        E: Send + 'static,
        M: Send + 'static,
    {
        std::thread::Builder::new()
            .name("rollcall-worker".into())
            .spawn(move || self.run())
            .expect("failed to spawn worker thread")
    }
}

/// Controller loop: sole owner of prompting and rendering.
pub struct Controller<P, R> {
    rx: mpsc::Receiver<ControlMsg>,
    shared: Arc<SharedState>,
    prompter: P,
    renderer: R,
    config: PipelineConfig,
}

impl<P, R> Controller<P, R>
where
    P: Prompter,
    R: Renderer,
{
    pub fn new(
        rx: mpsc::Receiver<ControlMsg>,
        shared: Arc<SharedState>,
        prompter: P,
        renderer: R,
        config: PipelineConfig,
    ) -> Self {
        Self {
            rx,
            shared,
            prompter,
            renderer,
            config,
        }
    }

    /// Drain messages until every sender is gone.
    pub fn run(mut self) {
        while let Some(msg) = self.rx.blocking_recv() {
            self.handle(msg, Instant::now());
        }
        tracing::info!("controller exiting");
    }

    fn handle(&mut self, msg: ControlMsg, now: Instant) {
        match msg {
            ControlMsg::Frame { frame, labels } => {
                for (region, label) in &labels {
                    self.renderer.draw(&frame, region, label.as_deref());
                }
                self.renderer.display(&frame);
            }
            ControlMsg::Register { embedding } => {
                if let Err(e) = self.handle_registration(embedding, now) {
                    tracing::error!(error = %e, "registration failed");
                }
            }
        }
    }

    /// Interactive-registration handler.
    ///
    /// Requests can queue up while a prompt is outstanding, so both caches
    /// are re-checked here before the suppression entry is recorded — and
    /// it is recorded before the prompt resolves, so repeats of the same
    /// face are suppressed while the user types.
    fn handle_registration(
        &mut self,
        embedding: Embedding,
        now: Instant,
    ) -> Result<(), PipelineError> {
        if self.shared.session_seen.lock().contains(&embedding) {
            return Ok(());
        }
        {
            let mut prompts = self.shared.prompts.lock();
            if prompts.contains(&embedding, now) {
                return Ok(());
            }
            prompts.record(embedding.clone(), now);
        }

        let name = match self.prompter.ask("Enter your name:") {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            // Declined: no mutation; the suppression entry ages out on its own.
            _ => return Ok(()),
        };

        self.shared
            .registry
            .write()
            .register(embedding.clone(), &name);
        self.shared.session_seen.lock().add(embedding);
        self.shared.ledger.lock().log_attendance(&name, now)?;
        self.shared
            .registry
            .read()
            .persist(&self.config.registry_path)?;

        tracing::info!(name = %name, "registered new identity");
        Ok(())
    }

    pub fn spawn(self) -> std::thread::JoinHandle<()>
    where
        P: Send + 'static,
        R: Send + 'static,
    {
        std::thread::Builder::new()
            .name("rollcall-controller".into())
            .spawn(move || self.run())
            .expect("failed to spawn controller thread")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{CaptureError, EncoderError};
    use crate::dedup::PROMPT_TTL;
    use crate::matcher::FirstMatch;
    use crate::types::Detection;
    use std::collections::VecDeque;

    struct ScriptedSource {
        frames: VecDeque<Frame>,
    }

    impl FrameSource for ScriptedSource {
        fn read(&mut self) -> Result<Option<Frame>, CaptureError> {
            Ok(self.frames.pop_front())
        }
    }

    struct ScriptedEncoder {
        per_frame: VecDeque<Vec<Detection>>,
    }

    impl FaceEncoder for ScriptedEncoder {
        fn detect_and_encode(&mut self, _frame: &Frame) -> Result<Vec<Detection>, EncoderError> {
            Ok(self.per_frame.pop_front().unwrap_or_default())
        }

        fn encode(&mut self, _frame: &Frame) -> Result<Option<Embedding>, EncoderError> {
            Ok(None)
        }
    }

    struct ScriptedPrompter {
        replies: VecDeque<Option<String>>,
        asked: usize,
    }

    impl Prompter for ScriptedPrompter {
        fn ask(&mut self, _prompt: &str) -> Option<String> {
            self.asked += 1;
            self.replies.pop_front().flatten()
        }
    }

    struct RecordingRenderer {
        drawn: Vec<Option<String>>,
        displayed: usize,
    }

    impl Renderer for RecordingRenderer {
        fn draw(&mut self, _frame: &Frame, _region: &Region, label: Option<&str>) {
            self.drawn.push(label.map(str::to_owned));
        }

        fn display(&mut self, _frame: &Frame) {
            self.displayed += 1;
        }
    }

    fn frame() -> Frame {
        Frame {
            data: vec![0; 4],
            width: 2,
            height: 2,
        }
    }

    fn detection(v: f32) -> Detection {
        Detection {
            region: Region {
                x: 0,
                y: 0,
                width: 2,
                height: 2,
            },
            embedding: Embedding::new(vec![v, 0.0]),
        }
    }

    struct Fixture {
        shared: Arc<SharedState>,
        config: PipelineConfig,
        ledger_path: PathBuf,
        _dir: tempfile::TempDir,
    }

    fn fixture(known: &[(&str, f32)]) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let registry_path = dir.path().join("faces.bin");
        let ledger_path = dir.path().join("attendance.csv");

        let config = PipelineConfig {
            tolerance: 0.6,
            self_name: "justin".to_string(),
            prompt_ttl: PROMPT_TTL,
            registry_path,
        };

        let mut registry = Registry::default();
        for (name, v) in known {
            registry.register(Embedding::new(vec![*v, 0.0]), name);
        }
        let ledger = AttendanceLedger::new(ledger_path.clone(), Duration::from_secs(300));

        Fixture {
            shared: Arc::new(SharedState::new(registry, ledger, &config)),
            config,
            ledger_path,
            _dir: dir,
        }
    }

    fn worker_for(
        fx: &Fixture,
        detections: Vec<Vec<Detection>>,
        tx: mpsc::Sender<ControlMsg>,
    ) -> Worker<ScriptedSource, ScriptedEncoder, FirstMatch> {
        Worker::new(
            ScriptedSource {
                frames: VecDeque::new(),
            },
            ScriptedEncoder {
                per_frame: detections.into(),
            },
            FirstMatch,
            fx.shared.clone(),
            tx,
            Arc::new(AtomicBool::new(true)),
            fx.config.clone(),
        )
    }

    fn controller_for(
        fx: &Fixture,
        rx: mpsc::Receiver<ControlMsg>,
        replies: Vec<Option<String>>,
    ) -> Controller<ScriptedPrompter, RecordingRenderer> {
        Controller::new(
            rx,
            fx.shared.clone(),
            ScriptedPrompter {
                replies: replies.into(),
                asked: 0,
            },
            RecordingRenderer {
                drawn: Vec::new(),
                displayed: 0,
            },
            fx.config.clone(),
        )
    }

    fn ledger_rows(path: &std::path::Path) -> Vec<String> {
        match std::fs::read_to_string(path) {
            Ok(s) => s.lines().skip(1).map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }

    #[test]
    fn test_known_self_identity_logs_attendance_once() {
        let fx = fixture(&[("justin", 1.0)]);
        let (tx, mut rx) = mpsc::channel(16);
        let mut worker = worker_for(&fx, vec![vec![detection(1.1)]], tx);

        let t0 = Instant::now();
        assert!(worker.process_frame(frame(), t0));

        let rows = ledger_rows(&fx.ledger_path);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].starts_with("justin,"));

        // The frame message carries the matched label, no Register request.
        match rx.try_recv().unwrap() {
            ControlMsg::Frame { labels, .. } => {
                assert_eq!(labels[0].1.as_deref(), Some("justin"));
            }
            _ => panic!("expected frame message"),
        }
        assert!(rx.try_recv().is_err());
        assert!(fx
            .shared
            .session_seen
            .lock()
            .contains(&Embedding::new(vec![1.1, 0.0])));
    }

    #[test]
    fn test_session_seen_face_skips_matching_and_logging() {
        let fx = fixture(&[("justin", 1.0)]);
        let (tx, mut rx) = mpsc::channel(16);
        let mut worker = worker_for(
            &fx,
            vec![vec![detection(1.1)], vec![detection(1.15)]],
            tx,
        );

        let t0 = Instant::now();
        worker.process_frame(frame(), t0);
        worker.process_frame(frame(), t0 + Duration::from_millis(40));

        // Still exactly one ledger row.
        assert_eq!(ledger_rows(&fx.ledger_path).len(), 1);

        let _first = rx.try_recv().unwrap();
        match rx.try_recv().unwrap() {
            ControlMsg::Frame { labels, .. } => {
                // Second appearance renders region only.
                assert_eq!(labels[0].1, None);
            }
            _ => panic!("expected frame message"),
        }
    }

    #[test]
    fn test_non_self_match_renders_name_without_ledger_write() {
        let fx = fixture(&[("alex", 3.0)]);
        let (tx, mut rx) = mpsc::channel(16);
        let mut worker = worker_for(&fx, vec![vec![detection(3.1)]], tx);

        worker.process_frame(frame(), Instant::now());

        assert!(ledger_rows(&fx.ledger_path).is_empty());
        match rx.try_recv().unwrap() {
            ControlMsg::Frame { labels, .. } => {
                assert_eq!(labels[0].1.as_deref(), Some("alex"));
            }
            _ => panic!("expected frame message"),
        }
    }

    #[test]
    fn test_unknown_face_requests_registration_and_labels_unknown() {
        let fx = fixture(&[]);
        let (tx, mut rx) = mpsc::channel(16);
        let mut worker = worker_for(&fx, vec![vec![detection(5.0)]], tx);

        worker.process_frame(frame(), Instant::now());

        match rx.try_recv().unwrap() {
            ControlMsg::Register { embedding } => {
                assert_eq!(embedding, Embedding::new(vec![5.0, 0.0]));
            }
            _ => panic!("expected register message"),
        }
        match rx.try_recv().unwrap() {
            ControlMsg::Frame { labels, .. } => {
                assert_eq!(labels[0].1.as_deref(), Some(UNKNOWN_LABEL));
            }
            _ => panic!("expected frame message"),
        }
    }

    #[test]
    fn test_registration_with_supplied_name() {
        let fx = fixture(&[]);
        let (_tx, rx) = mpsc::channel(16);
        let mut controller = controller_for(&fx, rx, vec![Some("Alex".to_string())]);

        let embedding = Embedding::new(vec![5.0, 0.0]);
        controller
            .handle_registration(embedding.clone(), Instant::now())
            .unwrap();

        assert_eq!(controller.prompter.asked, 1);
        assert_eq!(fx.shared.registry.read().len(), 1);
        assert!(fx.shared.session_seen.lock().contains(&embedding));

        let rows = ledger_rows(&fx.ledger_path);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].starts_with("Alex,"));

        // Persisted blob reflects the registration.
        let reloaded = Registry::load_file(&fx.config.registry_path).unwrap();
        let (name, stored) = reloaded.iter().next().unwrap();
        assert_eq!(name, "Alex");
        assert_eq!(stored, &embedding);
    }

    #[test]
    fn test_declined_prompt_mutates_nothing_and_suppresses() {
        let fx = fixture(&[]);
        let (_tx, rx) = mpsc::channel(16);
        let mut controller = controller_for(&fx, rx, vec![None, Some("Alex".to_string())]);

        let embedding = Embedding::new(vec![5.0, 0.0]);
        let t0 = Instant::now();
        controller
            .handle_registration(embedding.clone(), t0)
            .unwrap();

        assert!(fx.shared.registry.read().is_empty());
        assert!(fx.shared.session_seen.lock().is_empty());
        assert!(ledger_rows(&fx.ledger_path).is_empty());
        assert!(!fx.config.registry_path.exists());

        // Within the TTL the same face is not re-prompted...
        controller
            .handle_registration(embedding.clone(), t0 + Duration::from_secs(4))
            .unwrap();
        assert_eq!(controller.prompter.asked, 1);

        // ...after it lapses, prompting resumes.
        controller
            .handle_registration(embedding, t0 + Duration::from_secs(6))
            .unwrap();
        assert_eq!(controller.prompter.asked, 2);
        assert_eq!(fx.shared.registry.read().len(), 1);
    }

    #[test]
    fn test_empty_reply_is_a_decline() {
        let fx = fixture(&[]);
        let (_tx, rx) = mpsc::channel(16);
        let mut controller = controller_for(&fx, rx, vec![Some("   ".to_string())]);

        controller
            .handle_registration(Embedding::new(vec![5.0, 0.0]), Instant::now())
            .unwrap();

        assert!(fx.shared.registry.read().is_empty());
        assert!(ledger_rows(&fx.ledger_path).is_empty());
    }

    #[test]
    fn test_queued_duplicate_requests_prompt_once() {
        // Two requests for the same face race in before the first resolves;
        // the controller's re-check collapses them into one prompt.
        let fx = fixture(&[]);
        let (_tx, rx) = mpsc::channel(16);
        let mut controller = controller_for(&fx, rx, vec![Some("Alex".to_string())]);

        let t0 = Instant::now();
        controller
            .handle_registration(Embedding::new(vec![5.0, 0.0]), t0)
            .unwrap();
        controller
            .handle_registration(Embedding::new(vec![5.05, 0.0]), t0)
            .unwrap();

        assert_eq!(controller.prompter.asked, 1);
        assert_eq!(fx.shared.registry.read().len(), 1);
    }

    #[test]
    fn test_registered_face_not_reprompted_after_session_seen() {
        let fx = fixture(&[]);
        let (_tx, rx) = mpsc::channel(16);
        let mut controller = controller_for(&fx, rx, vec![Some("Alex".to_string())]);

        let t0 = Instant::now();
        controller
            .handle_registration(Embedding::new(vec![5.0, 0.0]), t0)
            .unwrap();
        // Even long after the suppression TTL, SessionSeen is terminal.
        controller
            .handle_registration(Embedding::new(vec![5.0, 0.0]), t0 + Duration::from_secs(60))
            .unwrap();

        assert_eq!(controller.prompter.asked, 1);
    }

    #[test]
    fn test_prompted_face_rendered_region_only_by_worker() {
        let fx = fixture(&[]);
        let (tx, mut rx) = mpsc::channel(16);
        let mut worker = worker_for(&fx, vec![vec![detection(5.0)], vec![detection(5.1)]], tx);

        let t0 = Instant::now();
        worker.process_frame(frame(), t0);
        // Simulate the controller recording the suppression entry.
        fx.shared
            .prompts
            .lock()
            .record(Embedding::new(vec![5.0, 0.0]), t0);

        worker.process_frame(frame(), t0 + Duration::from_secs(1));

        let _register = rx.try_recv().unwrap();
        let _first_frame = rx.try_recv().unwrap();
        match rx.try_recv().unwrap() {
            ControlMsg::Frame { labels, .. } => assert_eq!(labels[0].1, None),
            _ => panic!("expected frame message"),
        }
        // No second Register request while the prompt is live.
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_frame_message_renders_all_faces() {
        let fx = fixture(&[]);
        let (_tx, rx) = mpsc::channel(16);
        let mut controller = controller_for(&fx, rx, vec![]);

        controller.handle(
            ControlMsg::Frame {
                frame: frame(),
                labels: vec![
                    (detection(0.0).region, Some("justin".to_string())),
                    (detection(0.0).region, None),
                ],
            },
            Instant::now(),
        );

        assert_eq!(controller.renderer.displayed, 1);
        assert_eq!(
            controller.renderer.drawn,
            vec![Some("justin".to_string()), None]
        );
    }

    struct CountingSource {
        frames: VecDeque<Frame>,
        reads: Arc<std::sync::atomic::AtomicUsize>,
    }

    impl FrameSource for CountingSource {
        fn read(&mut self) -> Result<Option<Frame>, CaptureError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.frames.pop_front())
        }
    }

    fn counting_worker(
        fx: &Fixture,
        frames: Vec<Frame>,
        tx: mpsc::Sender<ControlMsg>,
        run_flag: Arc<AtomicBool>,
    ) -> (
        Worker<CountingSource, ScriptedEncoder, FirstMatch>,
        Arc<std::sync::atomic::AtomicUsize>,
    ) {
        let reads = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let worker = Worker::new(
            CountingSource {
                frames: frames.into(),
                reads: reads.clone(),
            },
            ScriptedEncoder {
                per_frame: VecDeque::new(),
            },
            FirstMatch,
            fx.shared.clone(),
            tx,
            run_flag,
            fx.config.clone(),
        );
        (worker, reads)
    }

    #[test]
    fn test_worker_stops_at_end_of_stream() {
        let fx = fixture(&[]);
        let (tx, _rx) = mpsc::channel(16);
        let (worker, reads) =
            counting_worker(&fx, vec![frame()], tx, Arc::new(AtomicBool::new(true)));

        worker.run();

        // One successful read, then the end-of-stream read.
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_worker_honors_run_flag() {
        let fx = fixture(&[]);
        let (tx, _rx) = mpsc::channel(16);
        let (worker, reads) =
            counting_worker(&fx, vec![frame()], tx, Arc::new(AtomicBool::new(false)));

        worker.run();

        // Flag observed before any read.
        assert_eq!(reads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failed_read_terminates_loop() {
        struct FailingSource;
        impl FrameSource for FailingSource {
            fn read(&mut self) -> Result<Option<Frame>, CaptureError> {
                Err(CaptureError::CaptureFailed("gone".into()))
            }
        }

        let fx = fixture(&[]);
        let (tx, _rx) = mpsc::channel(16);
        let worker = Worker::new(
            FailingSource,
            ScriptedEncoder {
                per_frame: VecDeque::new(),
            },
            FirstMatch,
            fx.shared.clone(),
            tx,
            Arc::new(AtomicBool::new(true)),
            fx.config.clone(),
        );
        // Returns instead of spinning.
        worker.run();
    }
}

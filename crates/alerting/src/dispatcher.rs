//! Alert dispatcher
//!
//! Hands alert requests to a single playback worker through a one-slot
//! inbox. A new request always preempts whatever is sounding or pending, so
//! the latest alert wins and nothing queues behind a long clip. The session
//! lock only covers flag and inbox transitions, never the playback itself.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};

use crate::clip::{ClipId, ClipLibrary};
use crate::sink::{AudioSink, StopFlag};
use crate::AlertError;

/// Alert routes the dispatcher can sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    DriverShort,
    DriverLong,
    PassengerLong,
}

impl AlertKind {
    /// Clip currently mapped to this route
    pub fn clip(&self) -> ClipId {
        match self {
            AlertKind::DriverShort => ClipId::Short,
            // Driver and passenger share a clip until they get separate speakers
            AlertKind::DriverLong | AlertKind::PassengerLong => ClipId::Long,
        }
    }
}

#[derive(Debug)]
struct PlaybackRequest {
    kind: AlertKind,
    generation: u64,
    stop: StopFlag,
}

/// State behind the session lock
#[derive(Debug, Default)]
struct Session {
    /// Something is pending or sounding
    active: bool,
    /// Latest request not yet picked up by the worker
    inbox: Option<PlaybackRequest>,
    /// Stop flag of the newest request
    current: Option<StopFlag>,
    /// Generation of the newest request
    generation: u64,
    shutdown: bool,
}

struct Shared {
    session: Mutex<Session>,
    wake: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Non-blocking alert playback front end
pub struct AlertDispatcher {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl AlertDispatcher {
    /// Start the playback worker for `library` on `sink`
    pub fn new(library: ClipLibrary, sink: Arc<dyn AudioSink>) -> Result<Self, AlertError> {
        let shared = Arc::new(Shared {
            session: Mutex::new(Session::default()),
            wake: Condvar::new(),
        });

        info!(
            "Starting alert dispatcher on '{}' with {} clip(s)",
            sink.name(),
            library.len()
        );

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("alert-playback".into())
            .spawn(move || run_worker(worker_shared, library, sink))?;

        Ok(Self {
            shared,
            worker: Some(worker),
        })
    }

    /// Short chime for the driver
    pub fn play_driver_short(&self) {
        self.request(AlertKind::DriverShort);
    }

    /// Long alarm on the driver route
    pub fn play_driver_long(&self) {
        self.request(AlertKind::DriverLong);
    }

    /// Long alarm on the passenger route (e.g. bus cabin speaker)
    pub fn play_passenger_long(&self) {
        self.request(AlertKind::PassengerLong);
    }

    /// Preempt any current session and hand `kind` to the worker
    pub fn request(&self, kind: AlertKind) {
        let mut session = self.shared.lock();
        if session.shutdown {
            return;
        }

        if session.active {
            if let Some(previous) = session.current.take() {
                debug!("Preempting active alert for {:?}", kind);
                previous.raise();
            }
        }

        let stop = StopFlag::new();
        session.generation += 1;
        session.active = true;
        session.current = Some(stop.clone());
        session.inbox = Some(PlaybackRequest {
            kind,
            generation: session.generation,
            stop,
        });
        drop(session);

        self.shared.wake.notify_one();
    }

    /// Halt any pending or sounding alert
    pub fn stop(&self) {
        let mut session = self.shared.lock();
        session.inbox = None;
        if let Some(current) = session.current.take() {
            current.raise();
        }
        session.active = false;
        debug!("Alert playback stopped");
    }

    /// Check if an alert is pending or sounding
    pub fn is_playing(&self) -> bool {
        self.shared.lock().active
    }
}

impl Drop for AlertDispatcher {
    fn drop(&mut self) {
        {
            let mut session = self.shared.lock();
            session.shutdown = true;
            session.inbox = None;
            if let Some(current) = session.current.take() {
                current.raise();
            }
            session.active = false;
        }
        self.shared.wake.notify_all();

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Alert playback worker panicked");
            }
        }
    }
}

fn run_worker(shared: Arc<Shared>, library: ClipLibrary, sink: Arc<dyn AudioSink>) {
    loop {
        let request = {
            let mut session = shared.lock();
            loop {
                if session.shutdown {
                    debug!("Alert playback worker exiting");
                    return;
                }
                if let Some(request) = session.inbox.take() {
                    break request;
                }
                session = shared
                    .wake
                    .wait(session)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };

        match sound(&library, sink.as_ref(), &request) {
            Ok(()) => {}
            Err(AlertError::ToneUnsupported) => {
                debug!("No clip or tone available for {:?}", request.kind);
            }
            Err(e) => error!("Error playing {:?} alert: {}", request.kind, e),
        }

        // A newer request owns the flag if one arrived meanwhile
        let mut session = shared.lock();
        if session.generation == request.generation {
            session.active = false;
            session.current = None;
        }
    }
}

fn sound(
    library: &ClipLibrary,
    sink: &dyn AudioSink,
    request: &PlaybackRequest,
) -> Result<(), AlertError> {
    if request.stop.is_raised() {
        return Ok(());
    }

    let clip_id = request.kind.clip();
    match library.get(clip_id) {
        Some(clip) => {
            debug!("Playing {} clip for {:?}", clip_id.name(), request.kind);
            sink.play(&clip, &request.stop)
        }
        None => {
            warn!(
                "No {} clip loaded, falling back to tone for {:?}",
                clip_id.name(),
                request.kind
            );
            sink.tone(clip_id.fallback_tone(), &request.stop)
        }
    }
}

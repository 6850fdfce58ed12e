//! Cooperative host loop
//!
//! Pointer moves, display frames and lifecycle signals all arrive on one
//! task, so no two mutations of a session ever overlap. The loop starts the
//! session immediately or once the host reports it is ready, runs a decay
//! tick per frame, and tears the session down on unload.

pub mod config;
pub mod reader;

pub use config::{FrameSource, RuntimeConfig, DEFAULT_FRAME_PERIOD_MS};
pub use reader::spawn_line_reader;

use crate::session::{SessionState, TrailSession, TrailStats};
use crate::surface::RenderSurface;
use crate::trail::FrameDecision;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};

/// Capacity of the host event queue used by [`spawn`]
const EVENT_QUEUE_CAPACITY: usize = 256;

/// Errors from driving a spawned trail
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Trail task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Signals delivered by the host document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostEvent {
    /// The document became interactive
    Ready,
    /// Pointer moved to viewport coordinates `(x, y)`
    PointerMove { x: f64, y: f64 },
    /// One display refresh, for [`FrameSource::External`]
    Frame,
    /// The document is about to unload
    Unload,
}

/// What happened while the loop ran
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeReport {
    pub pointer_moves: u64,
    pub frames: u64,
    /// Events that arrived while the trail was not listening
    pub ignored_events: u64,
    pub state: SessionState,
    pub stats: TrailStats,
}

/// Frame timer, absent when frames come from the host
struct FrameClock {
    interval: Option<Interval>,
}

impl FrameClock {
    fn new(source: &FrameSource) -> Self {
        let interval = source.period().map(|period| {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });
        Self { interval }
    }

    fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    async fn next_frame(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending().await,
        }
    }
}

/// Drive `session` from `events` until unload
///
/// A closed event stream counts as unload. The torn-down session is handed
/// back together with a report.
pub async fn run<S: RenderSurface>(
    mut session: TrailSession<S>,
    config: RuntimeConfig,
    mut events: mpsc::Receiver<HostEvent>,
) -> (TrailSession<S>, RuntimeReport) {
    let mut report = RuntimeReport {
        pointer_moves: 0,
        frames: 0,
        ignored_events: 0,
        state: session.state(),
        stats: session.stats(),
    };

    if config.document_ready {
        session.start();
    } else {
        tracing::debug!("Document not ready, deferring pixel trail start");
    }

    let mut clock = FrameClock::new(&config.frame_source);

    loop {
        tokio::select! {
            biased;

            // Frames are polled first so a pointer flood cannot stall decay
            _ = clock.next_frame(), if clock.is_armed() && session.is_active() => {
                report.frames += 1;
                if session.tick() == FrameDecision::Stop {
                    break;
                }
            }

            event = events.recv() => {
                let Some(event) = event else {
                    tracing::debug!("Host event stream closed");
                    session.stop();
                    break;
                };
                match event {
                    HostEvent::Ready => session.start(),
                    HostEvent::PointerMove { x, y } => {
                        if session.is_active() {
                            report.pointer_moves += 1;
                            session.pointer_move(x, y);
                        } else {
                            report.ignored_events += 1;
                        }
                    }
                    HostEvent::Frame => {
                        if clock.is_armed() || !session.is_active() {
                            report.ignored_events += 1;
                        } else {
                            report.frames += 1;
                            if session.tick() == FrameDecision::Stop {
                                break;
                            }
                        }
                    }
                    HostEvent::Unload => {
                        session.stop();
                        break;
                    }
                }
            }
        }
    }

    report.state = session.state();
    report.stats = session.stats();
    (session, report)
}

/// Handle to a trail running on its own task
pub struct TrailHandle<S: RenderSurface> {
    events: mpsc::Sender<HostEvent>,
    task: JoinHandle<(TrailSession<S>, RuntimeReport)>,
}

/// Spawn [`run`] on the current tokio runtime
pub fn spawn<S>(session: TrailSession<S>, config: RuntimeConfig) -> TrailHandle<S>
where
    S: RenderSurface + Send + 'static,
{
    let (events, rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
    let task = tokio::spawn(run(session, config, rx));
    TrailHandle { events, task }
}

impl<S: RenderSurface> TrailHandle<S> {
    /// Deliver a host event
    ///
    /// Returns `false` if the trail has already shut down; the event is dropped.
    pub async fn send(&self, event: HostEvent) -> bool {
        self.events.send(event).await.is_ok()
    }

    pub async fn pointer_move(&self, x: f64, y: f64) -> bool {
        self.send(HostEvent::PointerMove { x, y }).await
    }

    /// Tear the trail down and wait for its task to finish
    pub async fn stop(self) -> RuntimeResult<(TrailSession<S>, RuntimeReport)> {
        // The task may already be gone after an earlier unload
        let _ = self.events.send(HostEvent::Unload).await;
        Ok(self.task.await?)
    }
}

//! The background animation loop.
//!
//! One task owns the [`Simulation`]. Every frame period it drains pending
//! [`InputEvent`]s into a [`FrameInput`], runs a single update pass and
//! publishes the rendered [`Frame`] on a watch channel. Nothing else touches
//! the particles, so input can never land in the middle of a pass.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{debug, info};

use super::frame::Frame;
use super::input::{FrameInput, InputEvent};
use super::particle::Viewport;
use super::season::Season;
use super::simulation::Simulation;

/// Roughly 60 frames per second.
pub const DEFAULT_FRAME_PERIOD: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundSettings {
    /// Initial viewport; resize events change it later.
    pub viewport: Viewport,
    pub frame_period: Duration,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            viewport: Viewport {
                width: 1280.0,
                height: 800.0,
            },
            frame_period: DEFAULT_FRAME_PERIOD,
        }
    }
}

/// Owner of a running animation loop.
///
/// Dropping the handle cancels the loop and closes its input channel.
pub struct BackgroundHandle {
    season: Season,
    settings: BackgroundSettings,
    input: mpsc::UnboundedSender<InputEvent>,
    frames: watch::Receiver<Arc<Frame>>,
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl BackgroundHandle {
    /// Start a loop for `season`. Must be called inside a tokio runtime.
    pub fn spawn(season: Season, settings: BackgroundSettings) -> Self {
        let sim = Simulation::new(season, settings.viewport);
        let (frames_tx, frames) = watch::channel(Arc::new(sim.render()));
        let (input, events) = mpsc::unbounded_channel();
        let (cancel, stop) = oneshot::channel();

        info!(
            season = %season,
            particles = sim.particles().len(),
            frame_ms = settings.frame_period.as_millis() as u64,
            "Starting background animation"
        );

        let task = tokio::spawn(run_loop(
            sim,
            settings.frame_period,
            events,
            frames_tx,
            stop,
        ));

        Self {
            season,
            settings,
            input,
            frames,
            cancel: Some(cancel),
            task: Some(task),
        }
    }

    pub fn season(&self) -> Season {
        self.season
    }

    /// Queue an input event for the next frame. Returns `false` once the loop
    /// has stopped.
    pub fn send(&self, event: InputEvent) -> bool {
        self.input.send(event).is_ok()
    }

    /// The most recently published frame.
    pub fn latest_frame(&self) -> Arc<Frame> {
        self.frames.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the loop and wait for it to exit.
    pub async fn shutdown(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    /// Tear down the current loop, then start a fresh one for `season` with
    /// the same settings.
    pub async fn restart(&mut self, season: Season) {
        self.shutdown().await;
        *self = Self::spawn(season, self.settings);
    }
}

impl Drop for BackgroundHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_loop(
    mut sim: Simulation,
    frame_period: Duration,
    mut events: mpsc::UnboundedReceiver<InputEvent>,
    frames: watch::Sender<Arc<Frame>>,
    mut stop: oneshot::Receiver<()>,
) {
    let mut ticker = interval(frame_period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let started = Instant::now();
    let mut input = FrameInput::default();

    loop {
        tokio::select! {
            _ = &mut stop => break,
            _ = ticker.tick() => {
                let now = started.elapsed();
                while let Ok(event) = events.try_recv() {
                    match event {
                        InputEvent::Resize { width, height } => {
                            sim.resize(Viewport { width, height });
                        }
                        other => input.apply(&other, now),
                    }
                }

                sim.tick(&input, now);
                frames.send_replace(Arc::new(sim.render()));
            }
        }
    }

    debug!(season = %sim.season(), ticks = sim.ticks(), "Background animation stopped");
}

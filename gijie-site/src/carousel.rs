//! Pickup carousel driver
//!
//! Owns one `Carousel` state machine inside a tokio task and the three
//! timers it needs (auto-advance, resume-after-pause, scroll settle). HTTP
//! handlers talk to the task through a command channel; connected clients
//! observe it through a broadcast channel that feeds the SSE stream.

use std::time::Duration;

use gijie_common::carousel::{
    Carousel, CarouselEffect, CarouselInput, CarouselPhase, CarouselTiming, ScrollGeometry,
};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

const COMMAND_CAPACITY: usize = 32;
const EVENT_CAPACITY: usize = 100;

/// Driver errors
#[derive(Debug, Error)]
pub enum CarouselError {
    /// The driver task is gone
    #[error("carousel driver stopped")]
    Stopped,

    #[error(transparent)]
    Invalid(#[from] gijie_common::Error),
}

/// Point-in-time view of the carousel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselSnapshot {
    pub codes: Vec<String>,
    pub active: usize,
    pub phase: CarouselPhase,
    pub visible: bool,
    pub auto_advance: bool,
}

/// Events pushed to observers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CarouselEvent {
    /// State after an input was applied
    State(CarouselSnapshot),
    /// Scroll-center this item
    ScrollTo { index: usize, code: String },
    /// Carousel closed; timers cleared
    Closed,
}

impl CarouselEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            CarouselEvent::State(_) => "state",
            CarouselEvent::ScrollTo { .. } => "scroll",
            CarouselEvent::Closed => "closed",
        }
    }
}

enum Command {
    Input(CarouselInput, oneshot::Sender<CarouselSnapshot>),
    Scroll(ScrollGeometry, oneshot::Sender<CarouselSnapshot>),
    Snapshot(oneshot::Sender<CarouselSnapshot>),
    Reset(Carousel, Vec<String>, oneshot::Sender<CarouselSnapshot>),
}

/// Cloneable handle to the driver task
#[derive(Debug, Clone)]
pub struct CarouselHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<CarouselEvent>,
    timing: CarouselTiming,
}

impl CarouselHandle {
    /// Spawn the driver over the given pickup codes
    pub fn spawn(codes: Vec<String>, timing: CarouselTiming) -> Result<Self, CarouselError> {
        let carousel = Carousel::new(codes.len(), timing)?;
        let (commands, rx) = mpsc::channel(COMMAND_CAPACITY);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let driver = Driver::new(carousel, codes, events.clone());
        tokio::spawn(driver.run(rx));
        info!("Carousel driver started");

        Ok(Self {
            commands,
            events,
            timing,
        })
    }

    /// Apply one input and return the resulting state
    pub async fn send(&self, input: CarouselInput) -> Result<CarouselSnapshot, CarouselError> {
        self.request(|reply| Command::Input(input, reply)).await
    }

    /// Report a scroll; the active index is recomputed once scrolling settles
    pub async fn report_scroll(
        &self,
        geometry: ScrollGeometry,
    ) -> Result<CarouselSnapshot, CarouselError> {
        self.request(|reply| Command::Scroll(geometry, reply)).await
    }

    pub async fn snapshot(&self) -> Result<CarouselSnapshot, CarouselError> {
        self.request(Command::Snapshot).await
    }

    /// Replace the carousel with a fresh one over new codes (after a reload)
    pub async fn reset(&self, codes: Vec<String>) -> Result<CarouselSnapshot, CarouselError> {
        let carousel = Carousel::new(codes.len(), self.timing)?;
        self.request(|reply| Command::Reset(carousel, codes, reply))
            .await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CarouselEvent> {
        self.events.subscribe()
    }

    async fn request(
        &self,
        build: impl FnOnce(oneshot::Sender<CarouselSnapshot>) -> Command,
    ) -> Result<CarouselSnapshot, CarouselError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| CarouselError::Stopped)?;
        rx.await.map_err(|_| CarouselError::Stopped)
    }
}

struct Driver {
    carousel: Carousel,
    codes: Vec<String>,
    events: broadcast::Sender<CarouselEvent>,
    next_tick: Option<Instant>,
    resume_at: Option<Instant>,
    settle_at: Option<Instant>,
    pending_scroll: Option<ScrollGeometry>,
}

impl Driver {
    fn new(carousel: Carousel, codes: Vec<String>, events: broadcast::Sender<CarouselEvent>) -> Self {
        let mut driver = Self {
            carousel,
            codes,
            events,
            next_tick: None,
            resume_at: None,
            settle_at: None,
            pending_scroll: None,
        };
        driver.sync_tick();
        driver
    }

    async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                _ = sleep_until_some(self.next_tick) => {
                    self.next_tick = None;
                    self.apply(CarouselInput::Tick);
                }
                _ = sleep_until_some(self.resume_at) => {
                    self.resume_at = None;
                    self.apply(CarouselInput::ResumeElapsed);
                }
                _ = sleep_until_some(self.settle_at) => {
                    self.settle_at = None;
                    if let Some(geometry) = self.pending_scroll.take() {
                        self.apply(CarouselInput::ScrollSettled(geometry));
                    }
                }
            }
        }
        info!("Carousel driver stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Input(input, reply) => {
                self.apply(input);
                let _ = reply.send(self.snapshot());
            }
            Command::Scroll(geometry, reply) => {
                if self.carousel.phase() != CarouselPhase::Disposed {
                    self.pending_scroll = Some(geometry);
                    self.settle_at = Some(Instant::now() + self.carousel.timing().scroll_settle);
                }
                let _ = reply.send(self.snapshot());
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            Command::Reset(carousel, codes, reply) => {
                debug!("Carousel reset with {} items", codes.len());
                self.carousel = carousel;
                self.codes = codes;
                self.clear_timers();
                self.sync_tick();
                let snapshot = self.snapshot();
                self.emit(CarouselEvent::State(snapshot.clone()));
                let _ = reply.send(snapshot);
            }
        }
    }

    fn apply(&mut self, input: CarouselInput) {
        let effects = self.carousel.handle(input);
        for effect in effects {
            match effect {
                CarouselEffect::ScrollTo(index) => {
                    let code = self.codes.get(index).cloned().unwrap_or_default();
                    self.emit(CarouselEvent::ScrollTo { index, code });
                }
                CarouselEffect::ScheduleResume(delay) => {
                    self.resume_at = Some(Instant::now() + delay);
                }
                CarouselEffect::RestartAutoAdvance => {
                    self.next_tick = None;
                }
                CarouselEffect::ClearTimers => {
                    self.clear_timers();
                    self.emit(CarouselEvent::Closed);
                }
            }
        }
        self.sync_tick();
        self.emit(CarouselEvent::State(self.snapshot()));
    }

    /// Start the interval when auto-advance should run, stop it otherwise
    fn sync_tick(&mut self) {
        if !self.carousel.auto_advance_running() {
            self.next_tick = None;
        } else if self.next_tick.is_none() {
            self.next_tick = Some(Instant::now() + self.carousel.timing().auto_advance);
        }
    }

    fn clear_timers(&mut self) {
        self.next_tick = None;
        self.resume_at = None;
        self.settle_at = None;
        self.pending_scroll = None;
    }

    fn snapshot(&self) -> CarouselSnapshot {
        CarouselSnapshot {
            codes: self.codes.clone(),
            active: self.carousel.active(),
            phase: self.carousel.phase(),
            visible: self.carousel.is_visible(),
            auto_advance: self.carousel.auto_advance_running(),
        }
    }

    fn emit(&self, event: CarouselEvent) {
        // No receivers is fine
        if self.events.send(event).is_err() {
            debug!("No carousel observers connected");
        }
    }
}

async fn sleep_until_some(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

/// Convenience for handlers that want a timeout on the reply
pub async fn snapshot_within(
    handle: &CarouselHandle,
    limit: Duration,
) -> Result<CarouselSnapshot, CarouselError> {
    match tokio::time::timeout(limit, handle.snapshot()).await {
        Ok(result) => result,
        Err(_) => {
            warn!("Carousel driver did not answer within {:?}", limit);
            Err(CarouselError::Stopped)
        }
    }
}

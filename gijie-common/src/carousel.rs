//! Pickup carousel state machine
//!
//! Pure transition logic over a bounded item list with one active index.
//! Timers live outside: the machine reports effects (scroll, schedule resume,
//! clear timers) and the driver owns the actual clocks.
//!
//! Phases:
//! - `IdleAuto`: auto-advance running (while visible)
//! - `Paused`: user interacted; resume scheduled
//! - `Disposed`: closed; every input is ignored

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Upper bound on carousel items
pub const MAX_CAROUSEL_ITEMS: usize = 3;

/// Timer settings for the carousel driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselTiming {
    /// Interval between auto-advance ticks
    pub auto_advance: Duration,
    /// Delay after a user gesture before auto-advance resumes
    pub resume_after: Duration,
    /// Quiet period after the last scroll report before the active index is recomputed
    pub scroll_settle: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarouselPhase {
    IdleAuto,
    Paused,
    Disposed,
}

/// User gestures that pause auto-advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    PointerDown,
    TouchStart,
    Wheel,
    KeyDown,
}

/// Horizontal extent of one item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemGeometry {
    pub left: f64,
    pub width: f64,
}

impl ItemGeometry {
    pub fn center(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

/// Layout snapshot reported after scrolling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollGeometry {
    pub container_left: f64,
    pub container_width: f64,
    pub items: Vec<ItemGeometry>,
}

/// Index of the item whose center is closest to the container center
///
/// Ties go to the first item encountered. `None` when there are no items.
pub fn nearest_center(geometry: &ScrollGeometry) -> Option<usize> {
    let target = geometry.container_left + geometry.container_width / 2.0;
    let mut best: Option<(usize, f64)> = None;

    for (i, item) in geometry.items.iter().enumerate() {
        let distance = (item.center() - target).abs();
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((i, distance)),
        }
    }

    best.map(|(i, _)| i)
}

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum CarouselInput {
    /// Auto-advance interval elapsed
    Tick,
    /// Pointer down, touch start, wheel or key down
    Gesture(Gesture),
    /// Resume delay elapsed
    ResumeElapsed,
    /// Page visibility changed
    Visibility(bool),
    /// Dot indicator clicked
    DotClicked(usize),
    /// Scrolling settled with this layout
    ScrollSettled(ScrollGeometry),
    /// Close button pressed
    Close,
}

/// Side effects the driver must carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselEffect {
    /// Scroll-center the item at this index
    ScrollTo(usize),
    /// (Re)start the resume timer with this delay
    ScheduleResume(Duration),
    /// Restart the auto-advance interval from now
    RestartAutoAdvance,
    /// Stop every timer; the carousel is gone
    ClearTimers,
}

/// Carousel state
#[derive(Debug, Clone, PartialEq)]
pub struct Carousel {
    len: usize,
    active: usize,
    phase: CarouselPhase,
    visible: bool,
    timing: CarouselTiming,
}

impl Carousel {
    /// New carousel over `len` items, starting at index 0 in `IdleAuto`
    pub fn new(len: usize, timing: CarouselTiming) -> Result<Self> {
        if len > MAX_CAROUSEL_ITEMS {
            return Err(Error::InvalidInput(format!(
                "carousel holds at most {} items, got {}",
                MAX_CAROUSEL_ITEMS, len
            )));
        }
        Ok(Self {
            len,
            active: 0,
            phase: CarouselPhase::IdleAuto,
            visible: true,
            timing,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn phase(&self) -> CarouselPhase {
        self.phase
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn timing(&self) -> &CarouselTiming {
        &self.timing
    }

    /// Should the auto-advance interval be ticking right now?
    pub fn auto_advance_running(&self) -> bool {
        self.phase == CarouselPhase::IdleAuto && self.visible && self.len > 1
    }

    /// Apply one input and return the effects to perform
    pub fn handle(&mut self, input: CarouselInput) -> Vec<CarouselEffect> {
        if self.phase == CarouselPhase::Disposed {
            return Vec::new();
        }

        let effects = match input {
            CarouselInput::Close => {
                self.phase = CarouselPhase::Disposed;
                vec![CarouselEffect::ClearTimers]
            }
            CarouselInput::Tick => {
                if self.auto_advance_running() {
                    self.active = (self.active + 1) % self.len;
                    vec![CarouselEffect::ScrollTo(self.active)]
                } else {
                    Vec::new()
                }
            }
            CarouselInput::Gesture(_) => self.pause(),
            CarouselInput::DotClicked(index) => {
                if index < self.len {
                    self.active = index;
                    let mut effects = vec![CarouselEffect::ScrollTo(index)];
                    effects.extend(self.pause());
                    effects
                } else {
                    Vec::new()
                }
            }
            CarouselInput::ResumeElapsed => {
                if self.phase == CarouselPhase::Paused {
                    self.phase = CarouselPhase::IdleAuto;
                    vec![CarouselEffect::RestartAutoAdvance]
                } else {
                    Vec::new()
                }
            }
            CarouselInput::Visibility(visible) => {
                let was_visible = self.visible;
                self.visible = visible;
                if visible && !was_visible && self.phase == CarouselPhase::IdleAuto {
                    vec![CarouselEffect::RestartAutoAdvance]
                } else {
                    Vec::new()
                }
            }
            CarouselInput::ScrollSettled(geometry) => {
                if let Some(index) = nearest_center(&geometry).filter(|i| *i < self.len) {
                    self.active = index;
                }
                Vec::new()
            }
        };

        debug!(
            "Carousel now {:?} at index {} ({} effects)",
            self.phase,
            self.active,
            effects.len()
        );
        effects
    }

    fn pause(&mut self) -> Vec<CarouselEffect> {
        self.phase = CarouselPhase::Paused;
        vec![CarouselEffect::ScheduleResume(self.timing.resume_after)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> CarouselTiming {
        CarouselTiming {
            auto_advance: Duration::from_millis(5000),
            resume_after: Duration::from_millis(8000),
            scroll_settle: Duration::from_millis(150),
        }
    }

    fn geometry(centers: &[f64]) -> ScrollGeometry {
        ScrollGeometry {
            container_left: 0.0,
            container_width: 300.0,
            items: centers
                .iter()
                .map(|c| ItemGeometry { left: c - 50.0, width: 100.0 })
                .collect(),
        }
    }

    #[test]
    fn test_tick_wraps_around() {
        let mut carousel = Carousel::new(3, timing()).unwrap();
        carousel.handle(CarouselInput::DotClicked(2));
        carousel.handle(CarouselInput::ResumeElapsed);
        assert_eq!(carousel.active(), 2);

        let effects = carousel.handle(CarouselInput::Tick);
        assert_eq!(carousel.active(), 0);
        assert_eq!(effects, vec![CarouselEffect::ScrollTo(0)]);
    }

    #[test]
    fn test_gesture_pauses_and_schedules_resume() {
        let mut carousel = Carousel::new(3, timing()).unwrap();
        let effects = carousel.handle(CarouselInput::Gesture(Gesture::Wheel));
        assert_eq!(carousel.phase(), CarouselPhase::Paused);
        assert_eq!(
            effects,
            vec![CarouselEffect::ScheduleResume(Duration::from_millis(8000))]
        );

        // Ticks are ignored while paused
        assert!(carousel.handle(CarouselInput::Tick).is_empty());
        assert_eq!(carousel.active(), 0);

        let effects = carousel.handle(CarouselInput::ResumeElapsed);
        assert_eq!(carousel.phase(), CarouselPhase::IdleAuto);
        assert_eq!(effects, vec![CarouselEffect::RestartAutoAdvance]);
    }

    #[test]
    fn test_dot_click_scrolls_and_pauses() {
        let mut carousel = Carousel::new(3, timing()).unwrap();
        let effects = carousel.handle(CarouselInput::DotClicked(1));
        assert_eq!(carousel.active(), 1);
        assert_eq!(carousel.phase(), CarouselPhase::Paused);
        assert_eq!(effects[0], CarouselEffect::ScrollTo(1));

        assert!(carousel.handle(CarouselInput::DotClicked(7)).is_empty());
        assert_eq!(carousel.active(), 1);
    }

    #[test]
    fn test_hidden_page_suspends_ticks() {
        let mut carousel = Carousel::new(2, timing()).unwrap();
        carousel.handle(CarouselInput::Visibility(false));
        assert!(!carousel.auto_advance_running());
        assert!(carousel.handle(CarouselInput::Tick).is_empty());

        let effects = carousel.handle(CarouselInput::Visibility(true));
        assert_eq!(effects, vec![CarouselEffect::RestartAutoAdvance]);
        assert_eq!(
            carousel.handle(CarouselInput::Tick),
            vec![CarouselEffect::ScrollTo(1)]
        );
    }

    #[test]
    fn test_close_disposes_and_ignores_everything_after() {
        let mut carousel = Carousel::new(3, timing()).unwrap();
        assert_eq!(
            carousel.handle(CarouselInput::Close),
            vec![CarouselEffect::ClearTimers]
        );
        assert_eq!(carousel.phase(), CarouselPhase::Disposed);
        assert!(carousel.handle(CarouselInput::Tick).is_empty());
        assert!(carousel.handle(CarouselInput::Gesture(Gesture::KeyDown)).is_empty());
        assert!(carousel.handle(CarouselInput::Close).is_empty());
        assert!(!carousel.auto_advance_running());
    }

    #[test]
    fn test_scroll_settle_picks_nearest_center() {
        let mut carousel = Carousel::new(3, timing()).unwrap();
        carousel.handle(CarouselInput::ScrollSettled(geometry(&[-100.0, 140.0, 400.0])));
        assert_eq!(carousel.active(), 1);
        assert_eq!(carousel.phase(), CarouselPhase::IdleAuto);
    }

    #[test]
    fn test_nearest_center_ties_go_to_first() {
        assert_eq!(nearest_center(&geometry(&[100.0, 200.0])), Some(0));
        assert_eq!(nearest_center(&geometry(&[])), None);
    }

    #[test]
    fn test_single_item_does_not_advance() {
        let mut carousel = Carousel::new(1, timing()).unwrap();
        assert!(!carousel.auto_advance_running());
        assert!(carousel.handle(CarouselInput::Tick).is_empty());
    }

    #[test]
    fn test_too_many_items_rejected() {
        assert!(Carousel::new(4, timing()).is_err());
        assert!(Carousel::new(0, timing()).unwrap().is_empty());
    }
}

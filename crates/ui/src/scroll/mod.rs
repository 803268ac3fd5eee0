//! Autoscroll that follows new content without fighting the user.
//!
//! The controller is either engaged (following the bottom) or disengaged. Scrolling up
//! disengages immediately and cancels pending work; reaching the bottom threshold or an
//! explicit [`ScrollController::force_engage`] engages again. Scroll requests are throttled
//! and only act while engaged at the moment they run.

mod throttle;

pub use throttle::Throttle;

use parley_core::ScrollConfig;
use std::time::{Duration, Instant};

pub const DEFAULT_BOTTOM_THRESHOLD: u32 = 3;
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(80);

/// Position of a scrollable region, in rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    pub offset: u32,
    pub content_height: u32,
    pub viewport_height: u32,
}

impl ScrollMetrics {
    pub fn new(offset: u32, content_height: u32, viewport_height: u32) -> Self {
        Self { offset, content_height, viewport_height }
    }

    pub fn distance_from_bottom(&self) -> u32 {
        self.content_height.saturating_sub(self.offset).saturating_sub(self.viewport_height)
    }
}

/// A view the controller can move
pub trait ScrollTarget {
    fn metrics(&self) -> ScrollMetrics;

    /// Jump so the last row of content is visible
    fn scroll_to_bottom(&mut self);
}

#[derive(Debug)]
pub struct ScrollController {
    engaged: bool,
    threshold: u32,
    last_offset: u32,
    throttle: Throttle,
    torn_down: bool,
}

impl Default for ScrollController {
    fn default() -> Self {
        Self::new(DEFAULT_BOTTOM_THRESHOLD, DEFAULT_THROTTLE)
    }
}

impl From<&ScrollConfig> for ScrollController {
    fn from(config: &ScrollConfig) -> Self {
        Self::new(config.bottom_threshold, Duration::from_millis(config.throttle_ms))
    }
}

impl ScrollController {
    /// Starts engaged
    pub fn new(threshold: u32, interval: Duration) -> Self {
        Self { engaged: true, threshold, last_offset: 0, throttle: Throttle::new(interval), torn_down: false }
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Update engagement from the region's current position
    pub fn observe(&mut self, metrics: ScrollMetrics) -> bool {
        let scrolled_up = metrics.offset < self.last_offset;
        self.last_offset = metrics.offset;

        if scrolled_up {
            if self.engaged {
                tracing::trace!(offset = metrics.offset, "autoscroll disengaged");
            }
            self.engaged = false;
            self.throttle.cancel();
        } else if metrics.distance_from_bottom() <= self.threshold {
            self.engaged = true;
        }
        self.engaged
    }

    /// Throttled scroll to bottom. Returns `true` if `target` was moved now.
    pub fn request_scroll_to_bottom(&mut self, now: Instant, target: &mut impl ScrollTarget) -> bool {
        if self.torn_down {
            return false;
        }
        if self.throttle.call(now) { self.scroll(target) } else { false }
    }

    /// Run a due trailing scroll. Returns `true` if `target` was moved.
    pub fn poll(&mut self, now: Instant, target: &mut impl ScrollTarget) -> bool {
        if self.torn_down {
            return false;
        }
        if self.throttle.poll(now) { self.scroll(target) } else { false }
    }

    /// When [`ScrollController::poll`] should next be called
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.torn_down { None } else { self.throttle.next_deadline() }
    }

    /// Follow new content again, e.g. after the user sends a message
    pub fn force_engage(&mut self) {
        self.engaged = true;
    }

    /// Cancel pending work; later requests do nothing
    pub fn teardown(&mut self) {
        self.throttle.cancel();
        self.torn_down = true;
    }

    fn scroll(&mut self, target: &mut impl ScrollTarget) -> bool {
        if !self.engaged {
            return false;
        }
        target.scroll_to_bottom();
        self.last_offset = target.metrics().offset;
        true
    }
}

impl Drop for ScrollController {
    fn drop(&mut self) {
        self.throttle.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct FakeView {
        metrics: ScrollMetrics,
        scrolls: usize,
    }

    impl FakeView {
        fn new(offset: u32, content_height: u32, viewport_height: u32) -> Self {
            Self { metrics: ScrollMetrics::new(offset, content_height, viewport_height), scrolls: 0 }
        }
    }

    impl ScrollTarget for FakeView {
        fn metrics(&self) -> ScrollMetrics {
            self.metrics
        }

        fn scroll_to_bottom(&mut self) {
            self.metrics.offset = self.metrics.content_height.saturating_sub(self.metrics.viewport_height);
            self.scrolls += 1;
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_distance_from_bottom() {
        assert_eq!(ScrollMetrics::new(0, 100, 20).distance_from_bottom(), 80);
        assert_eq!(ScrollMetrics::new(80, 100, 20).distance_from_bottom(), 0);
        assert_eq!(ScrollMetrics::new(0, 10, 20).distance_from_bottom(), 0);
    }

    #[test]
    fn test_starts_engaged() {
        let controller = ScrollController::default();
        assert!(controller.is_engaged());
        assert_eq!(controller.threshold(), 3);
    }

    #[test]
    fn test_from_config() {
        let config = ScrollConfig { bottom_threshold: 3, throttle_ms: 16 };
        let controller = ScrollController::from(&config);
        assert_eq!(controller.threshold(), 3);
    }

    #[test]
    fn test_scrolling_down_to_threshold_engages() {
        let mut controller = ScrollController::default();
        controller.observe(ScrollMetrics::new(500, 1000, 100));
        controller.observe(ScrollMetrics::new(400, 1000, 100));
        assert!(!controller.is_engaged());

        for offset in [600, 700, 800, 850, 896] {
            controller.observe(ScrollMetrics::new(offset, 1000, 100));
            assert!(!controller.is_engaged());
        }
        controller.observe(ScrollMetrics::new(897, 1000, 100));
        assert!(controller.is_engaged());
    }

    #[test]
    fn test_increasing_offsets_keep_engaged() {
        let mut controller = ScrollController::default();
        for offset in [0, 100, 400, 880] {
            controller.observe(ScrollMetrics::new(offset, 1000, 100));
        }
        assert!(controller.is_engaged());
    }

    #[test]
    fn test_scroll_up_disengages_even_near_bottom() {
        let mut controller = ScrollController::default();
        controller.observe(ScrollMetrics::new(900, 1000, 100));
        controller.observe(ScrollMetrics::new(899, 1000, 100));
        assert!(!controller.is_engaged());
    }

    #[test]
    fn test_scroll_up_cancels_pending_scroll() {
        let mut controller = ScrollController::default();
        let mut view = FakeView::new(900, 1000, 100);
        let start = Instant::now();
        controller.observe(view.metrics());

        assert!(controller.request_scroll_to_bottom(start, &mut view));
        view.metrics.content_height = 1200;
        assert!(!controller.request_scroll_to_bottom(start + ms(10), &mut view));
        assert!(controller.next_deadline().is_some());

        view.metrics.offset = 600;
        controller.observe(view.metrics());
        assert!(!controller.is_engaged());
        assert_eq!(controller.next_deadline(), None);

        assert!(!controller.poll(start + ms(200), &mut view));
        assert_eq!(view.metrics.offset, 600);
        assert_eq!(view.scrolls, 1);
    }

    #[test]
    fn test_throttled_requests_fire_leading_and_trailing() {
        let mut controller = ScrollController::default();
        let mut view = FakeView::new(0, 50, 20);
        let start = Instant::now();

        assert!(controller.request_scroll_to_bottom(start, &mut view));
        for step in 1..10 {
            view.metrics.content_height += 5;
            assert!(!controller.request_scroll_to_bottom(start + ms(step * 5), &mut view));
        }
        assert_eq!(view.scrolls, 1);

        let deadline = controller.next_deadline().unwrap();
        assert!(controller.poll(deadline, &mut view));
        assert_eq!(view.scrolls, 2);
        assert_eq!(view.metrics.distance_from_bottom(), 0);
    }

    #[test]
    fn test_request_while_disengaged_does_nothing() {
        let mut controller = ScrollController::default();
        let mut view = FakeView::new(500, 1000, 100);
        controller.observe(view.metrics());
        view.metrics.offset = 100;
        controller.observe(view.metrics());

        assert!(!controller.request_scroll_to_bottom(Instant::now(), &mut view));
        assert_eq!(view.scrolls, 0);
    }

    #[test]
    fn test_engagement_checked_when_trailing_runs() {
        let mut controller = ScrollController::default();
        let mut view = FakeView::new(0, 30, 20);
        let start = Instant::now();

        controller.request_scroll_to_bottom(start, &mut view);
        controller.request_scroll_to_bottom(start + ms(10), &mut view);
        controller.engaged = false;

        assert!(!controller.poll(start + ms(80), &mut view));
        assert_eq!(view.scrolls, 1);
    }

    #[test]
    fn test_force_engage() {
        let mut controller = ScrollController::default();
        let mut view = FakeView::new(500, 1000, 100);
        controller.observe(view.metrics());
        view.metrics.offset = 0;
        controller.observe(view.metrics());
        assert!(!controller.is_engaged());

        controller.force_engage();
        assert!(controller.is_engaged());
        assert!(controller.request_scroll_to_bottom(Instant::now(), &mut view));
        assert_eq!(view.metrics.offset, 900);
    }

    #[test]
    fn test_scrolling_records_new_offset() {
        let mut controller = ScrollController::default();
        let mut view = FakeView::new(0, 1000, 100);
        controller.request_scroll_to_bottom(Instant::now(), &mut view);

        view.metrics.offset = 850;
        controller.observe(view.metrics());
        assert!(!controller.is_engaged());
    }

    #[test]
    fn test_teardown_cancels_and_blocks() {
        let mut controller = ScrollController::default();
        let mut view = FakeView::new(0, 30, 20);
        let start = Instant::now();
        controller.request_scroll_to_bottom(start, &mut view);
        controller.request_scroll_to_bottom(start + ms(10), &mut view);

        controller.teardown();
        assert_eq!(controller.next_deadline(), None);
        assert!(!controller.poll(start + ms(100), &mut view));
        assert!(!controller.request_scroll_to_bottom(start + ms(200), &mut view));
        assert_eq!(view.scrolls, 1);
    }
}

//! Periodic reload of dashboard data
//!
//! [`RefreshScheduler`] owns at most one running periodic task. Starting it
//! again replaces the running task; stopping an idle scheduler does nothing.
//! Ticks come from a [`Ticker`], in the browser a `setInterval` timer.
//!
//! Once the user has used [`RefreshScheduler::toggle`], [`RefreshScheduler::auto_start`]
//! no longer overrides that choice.

use gloo_timers::callback::Interval;
use std::rc::Rc;

/// Interval used by [`RefreshScheduler::start_default`]
pub const DEFAULT_INTERVAL_MS: u32 = 30_000;

/// Source of periodic ticks. Dropping the returned handle cancels the ticks.
pub trait Ticker {
    type Handle;

    fn every(&self, interval_ms: u32, tick: Box<dyn FnMut()>) -> Self::Handle;
}

/// Browser `setInterval` via gloo
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalTicker;

impl Ticker for IntervalTicker {
    type Handle = Interval;

    fn every(&self, interval_ms: u32, tick: Box<dyn FnMut()>) -> Interval {
        Interval::new(interval_ms, tick)
    }
}

struct ActiveRefresh<H> {
    interval_ms: u32,
    _handle: H,
}

pub struct RefreshScheduler<T: Ticker = IntervalTicker> {
    ticker: T,
    reload: Rc<dyn Fn()>,
    active: Option<ActiveRefresh<T::Handle>>,
    user_toggled: bool,
}

impl<T: Ticker> RefreshScheduler<T> {
    pub fn new(ticker: T, reload: impl Fn() + 'static) -> Self {
        Self {
            ticker,
            reload: Rc::new(reload),
            active: None,
            user_toggled: false,
        }
    }

    /// Reload every `interval_ms`, cancelling the previous task first
    pub fn start(&mut self, interval_ms: u32) {
        self.active = None;

        let reload = Rc::clone(&self.reload);
        let handle = self.ticker.every(
            interval_ms,
            Box::new(move || {
                log::info!("Auto-refreshing dashboard data...");
                reload();
            }),
        );

        self.active = Some(ActiveRefresh {
            interval_ms,
            _handle: handle,
        });
        log::debug!("Auto-refresh started: every {} ms", interval_ms);
    }

    pub fn start_default(&mut self) {
        self.start(DEFAULT_INTERVAL_MS);
    }

    pub fn stop(&mut self) {
        if self.active.take().is_some() {
            log::debug!("Auto-refresh stopped");
        }
    }

    /// User switch: stops a running refresh, otherwise starts one.
    /// Returns whether refresh is now running.
    pub fn toggle(&mut self, interval_ms: u32) -> bool {
        self.user_toggled = true;
        if self.is_active() {
            self.stop();
        } else {
            self.start(interval_ms);
        }
        self.is_active()
    }

    /// Page-load start, skipped once the user has toggled refresh
    pub fn auto_start(&mut self, interval_ms: u32) -> bool {
        if self.user_toggled {
            log::debug!("Auto-refresh start skipped: user choice kept");
            return false;
        }
        self.start(interval_ms);
        true
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn interval_ms(&self) -> Option<u32> {
        self.active.as_ref().map(|active| active.interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    struct FakeTimer {
        interval_ms: u32,
        alive: Rc<Cell<bool>>,
        tick: Box<dyn FnMut()>,
    }

    struct FakeHandle(Rc<Cell<bool>>);

    impl Drop for FakeHandle {
        fn drop(&mut self) {
            self.0.set(false);
        }
    }

    #[derive(Clone, Default)]
    struct FakeTicker {
        timers: Rc<RefCell<Vec<FakeTimer>>>,
    }

    impl FakeTicker {
        fn scheduled(&self) -> usize {
            self.timers.borrow().len()
        }

        fn live(&self) -> Vec<u32> {
            self.timers
                .borrow()
                .iter()
                .filter(|t| t.alive.get())
                .map(|t| t.interval_ms)
                .collect()
        }

        fn fire(&self) {
            for timer in self.timers.borrow_mut().iter_mut() {
                if timer.alive.get() {
                    (timer.tick)();
                }
            }
        }
    }

    impl Ticker for FakeTicker {
        type Handle = FakeHandle;

        fn every(&self, interval_ms: u32, tick: Box<dyn FnMut()>) -> FakeHandle {
            let alive = Rc::new(Cell::new(true));
            self.timers.borrow_mut().push(FakeTimer {
                interval_ms,
                alive: Rc::clone(&alive),
                tick,
            });
            FakeHandle(alive)
        }
    }

    fn scheduler() -> (RefreshScheduler<FakeTicker>, FakeTicker, Rc<Cell<u32>>) {
        let ticker = FakeTicker::default();
        let reloads = Rc::new(Cell::new(0));
        let counter = Rc::clone(&reloads);
        let scheduler = RefreshScheduler::new(ticker.clone(), move || {
            counter.set(counter.get() + 1)
        });
        (scheduler, ticker, reloads)
    }

    #[test]
    fn test_start_twice_keeps_one_timer() {
        let (mut scheduler, ticker, _) = scheduler();

        scheduler.start(60_000);
        scheduler.start(15_000);

        assert_eq!(ticker.scheduled(), 2);
        assert_eq!(ticker.live(), vec![15_000]);
        assert_eq!(scheduler.interval_ms(), Some(15_000));
    }

    #[test]
    fn test_ticks_reload_only_through_live_timer() {
        let (mut scheduler, ticker, reloads) = scheduler();

        scheduler.start(1_000);
        scheduler.start(2_000);
        ticker.fire();
        ticker.fire();

        assert_eq!(reloads.get(), 2);
    }

    #[test]
    fn test_stop_on_idle_is_noop() {
        let (mut scheduler, ticker, _) = scheduler();

        scheduler.stop();

        assert!(!scheduler.is_active());
        assert_eq!(ticker.scheduled(), 0);
    }

    #[test]
    fn test_stop_cancels_timer() {
        let (mut scheduler, ticker, reloads) = scheduler();

        scheduler.start_default();
        assert_eq!(scheduler.interval_ms(), Some(DEFAULT_INTERVAL_MS));

        scheduler.stop();
        ticker.fire();

        assert!(!scheduler.is_active());
        assert!(ticker.live().is_empty());
        assert_eq!(reloads.get(), 0);

        scheduler.stop();
        assert!(!scheduler.is_active());
    }

    #[test]
    fn test_dropping_scheduler_cancels_timer() {
        let (mut scheduler, ticker, _) = scheduler();
        scheduler.start(5_000);
        drop(scheduler);
        assert!(ticker.live().is_empty());
    }

    #[test]
    fn test_auto_start_without_user_choice() {
        let (mut scheduler, ticker, _) = scheduler();

        assert!(scheduler.auto_start(60_000));
        assert_eq!(ticker.live(), vec![60_000]);
    }

    #[test]
    fn test_auto_start_keeps_user_stop() {
        let (mut scheduler, ticker, _) = scheduler();

        // started, then stopped by the user before the page-load start fires
        assert!(scheduler.toggle(60_000));
        assert!(!scheduler.toggle(60_000));

        assert!(!scheduler.auto_start(60_000));
        assert!(!scheduler.is_active());
        assert!(ticker.live().is_empty());
    }

    #[test]
    fn test_auto_start_keeps_user_start() {
        let (mut scheduler, ticker, _) = scheduler();

        assert!(scheduler.toggle(15_000));
        assert!(!scheduler.auto_start(60_000));

        assert_eq!(ticker.scheduled(), 1);
        assert_eq!(scheduler.interval_ms(), Some(15_000));
    }
}

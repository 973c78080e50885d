//! Host collaborators: the display surface and the periodic scheduler.
//!
//! The engine never owns a timer or a screen. It writes markup into a
//! `TextSurface` and registers tasks with a `Scheduler`; the host decides
//! when tasks fire. Everything runs on one thread.

use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::Duration;

use crate::types::TextStyle;

// ---------------------------------------------------------------------------
// Display surface
// ---------------------------------------------------------------------------

/// Something that shows one string of colour markup.
pub trait TextSurface {
    fn text(&self) -> &str;
    fn set_text(&mut self, text: String);
    fn style(&self) -> &TextStyle;
    fn set_style(&mut self, style: TextStyle);
}

/// Surface handle shared between the caller and scheduled tasks.
pub type SharedSurface = Rc<RefCell<dyn TextSurface>>;

/// In-memory surface that remembers every text it was given.
#[derive(Debug, Clone, Default)]
pub struct BufferSurface {
    text: String,
    style: TextStyle,
    history: Vec<String>,
}

impl BufferSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<RefCell<BufferSurface>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Every value passed to `set_text`, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl TextSurface for BufferSurface {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.history.push(text.clone());
        self.text = text;
    }

    fn style(&self) -> &TextStyle {
        &self.style
    }

    fn set_style(&mut self, style: TextStyle) {
        self.style = style;
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// A scheduled callback. Returning `Break` tells the scheduler to drop it.
pub type Task = Box<dyn FnMut() -> ControlFlow<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

pub trait Scheduler {
    /// Run `task` after `delay`, then every `interval` if one is given.
    fn schedule(&mut self, delay: Duration, interval: Option<Duration>, task: Task) -> TaskHandle;

    /// Drop a task. Unknown or finished handles are ignored.
    fn cancel(&mut self, handle: TaskHandle);

    fn is_pending(&self, handle: TaskHandle) -> bool;
}

struct Entry {
    handle: TaskHandle,
    due: Duration,
    interval: Option<Duration>,
    task: Task,
}

/// Deterministic scheduler driven by an explicit virtual clock.
///
/// Nothing fires until `advance` is called; tasks then run in due order, ties
/// broken by registration order.
#[derive(Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn is_idle(&self) -> bool {
        self.entries.is_empty()
    }

    /// Time until the earliest pending task, if any.
    pub fn next_due_in(&self) -> Option<Duration> {
        self.entries
            .iter()
            .map(|e| e.due.saturating_sub(self.now))
            .min()
    }

    /// Move the clock forward by `dt`, firing every task that falls due.
    /// Returns the number of task invocations.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let until = self.now + dt;
        let mut fired = 0;

        while let Some(pos) = self.next_due_before(until) {
            let mut entry = self.entries.remove(pos);
            self.now = self.now.max(entry.due);
            fired += 1;

            let flow = (entry.task)();
            if let (ControlFlow::Continue(()), Some(interval)) = (flow, entry.interval) {
                entry.due += interval.max(Duration::from_nanos(1));
                self.entries.push(entry);
            }
        }

        self.now = until;
        fired
    }

    /// Advance in `step` increments until no task is pending, for at most
    /// `max_steps` steps. Returns whether the scheduler went idle.
    pub fn run_until_idle(&mut self, step: Duration, max_steps: usize) -> bool {
        for _ in 0..max_steps {
            if self.is_idle() {
                return true;
            }
            self.advance(step);
        }
        self.is_idle()
    }

    fn next_due_before(&self, until: Duration) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= until)
            .min_by_key(|(_, e)| (e.due, e.handle.0))
            .map(|(pos, _)| pos)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, interval: Option<Duration>, task: Task) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            due: self.now + delay,
            interval,
            task,
        });
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        self.entries.retain(|e| e.handle != handle);
    }

    fn is_pending(&self, handle: TaskHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn counter_task(count: &Rc<Cell<u32>>, stop_at: u32) -> Task {
        let count = Rc::clone(count);
        Box::new(move || {
            count.set(count.get() + 1);
            if count.get() >= stop_at {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
    }

    #[test]
    fn one_shot_fires_once_after_delay() {
        let mut sched = ManualScheduler::new();
        let count = Rc::new(Cell::new(0));
        let h = sched.schedule(Duration::from_millis(50), None, counter_task(&count, 99));

        assert_eq!(sched.advance(Duration::from_millis(49)), 0);
        assert!(sched.is_pending(h));
        assert_eq!(sched.advance(Duration::from_millis(1)), 1);
        assert_eq!(count.get(), 1);
        assert!(!sched.is_pending(h));
    }

    #[test]
    fn periodic_task_repeats_until_break() {
        let mut sched = ManualScheduler::new();
        let count = Rc::new(Cell::new(0));
        sched.schedule(Duration::ZERO, Some(Duration::from_millis(10)), counter_task(&count, 3));

        sched.advance(Duration::from_millis(15));
        assert_eq!(count.get(), 2);
        assert!(sched.run_until_idle(Duration::from_millis(10), 10));
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn cancel_stops_a_task() {
        let mut sched = ManualScheduler::new();
        let count = Rc::new(Cell::new(0));
        let h = sched.schedule(Duration::ZERO, Some(Duration::from_millis(1)), counter_task(&count, 99));
        sched.advance(Duration::from_millis(2));
        sched.cancel(h);
        let seen = count.get();
        sched.advance(Duration::from_millis(10));
        assert_eq!(count.get(), seen);
        assert!(sched.is_idle());
        sched.cancel(h);
    }

    #[test]
    fn tasks_fire_in_due_order() {
        let mut sched = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (name, ms) in [("late", 30u64), ("early", 10), ("mid", 20)] {
            let log = Rc::clone(&log);
            sched.schedule(
                Duration::from_millis(ms),
                None,
                Box::new(move || {
                    log.borrow_mut().push(name);
                    ControlFlow::Break(())
                }),
            );
        }
        sched.advance(Duration::from_millis(100));
        assert_eq!(*log.borrow(), vec!["early", "mid", "late"]);
        assert_eq!(sched.now(), Duration::from_millis(100));
    }

    #[test]
    fn buffer_surface_records_history() {
        let mut surface = BufferSurface::new();
        surface.set_text("a".into());
        surface.set_text("b".into());
        assert_eq!(surface.text(), "b");
        assert_eq!(surface.history(), &["a".to_string(), "b".to_string()]);
    }
}

//! Fire-once timers on a virtual clock.
//!
//! Effects never read the wall clock. The host feeds frame deltas into [`Timers::advance`], which
//! returns the payloads whose deadline has passed. A fired timer is removed; nothing recurs. This
//! keeps every effect deterministic under test and makes cancellation a plain data operation.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Clone, Debug)]
struct Pending<T> {
    id: TimerId,
    deadline: f32,
    payload: T,
}

#[derive(Clone, Debug)]
pub struct Timers<T> {
    now: f32,
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> Timers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds elapsed on this timer set's clock.
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Schedules `payload` to fire `delay` seconds from now. Negative or non-finite delays fire on
    /// the next [`advance`](Self::advance).
    pub fn schedule(&mut self, delay: f32, payload: T) -> TimerId {
        let delay = if delay.is_finite() { delay.max(0.0) } else { 0.0 };
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            deadline: self.now + delay,
            payload,
        });
        id
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        before != self.pending.len()
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Cancels everything and rewinds the clock to zero.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.now = 0.0;
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advances the clock by `dt` seconds and returns due payloads in deadline order. Timers with
    /// equal deadlines fire in the order they were scheduled.
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        if dt.is_finite() && dt > 0.0 {
            self.now += dt;
        }
        let now = self.now;
        let mut due: Vec<Pending<T>> = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].deadline <= now {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| {
            a.deadline
                .total_cmp(&b.deadline)
                .then_with(|| a.id.cmp(&b.id))
        });
        due.into_iter().map(|p| p.payload).collect()
    }
}

/// Trailing-edge debounce: fires once after `quiet` seconds without a new poke.
#[derive(Clone, Copy, Debug)]
pub struct Debounce {
    quiet: f32,
    remaining: Option<f32>,
}

impl Debounce {
    pub fn new(quiet: f32) -> Self {
        Self {
            quiet: quiet.max(0.0),
            remaining: None,
        }
    }

    pub fn poke(&mut self) {
        self.remaining = Some(self.quiet);
    }

    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    /// Returns `true` exactly once, when the quiet period elapses.
    pub fn advance(&mut self, dt: f32) -> bool {
        let Some(remaining) = self.remaining.as_mut() else {
            return false;
        };
        *remaining -= dt.max(0.0);
        if *remaining <= 0.0 {
            self.remaining = None;
            return true;
        }
        false
    }
}

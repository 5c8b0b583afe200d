//! Staged text reveal: turns a target string into per-character animation state.
//!
//! A reveal starts at maximum entropy (random glyph, scattered offset, zero opacity) and ends with
//! every character equal to its source character at full opacity and zero offset. Characters lock
//! one by one, either on a virtual-clock schedule ([`RevealMachine::advance`]) or after a number
//! of discrete scramble ticks ([`RevealMachine::tick`]).
//!
//! Whitespace is never scrambled: it is settled from the start.
//!
//! Calling [`RevealMachine::trigger`] again cancels every outstanding lock timer before the new
//! text is laid out, so an interrupted reveal can never finish with stale characters.

use crate::math;
use crate::math::Vec2;
use crate::props;
use crate::timer::Timers;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

pub const DEFAULT_CHARSET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!<>-_\\/[]{}=+*^?#";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealPhase {
    /// Triggered, nothing has progressed yet.
    Hidden,
    /// Time is passing but no character has locked.
    Scrambling,
    /// Some, but not all, characters have locked.
    Locking,
    /// Every character shows its source value.
    Settled,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RevealOrder {
    #[default]
    Forward,
    Reverse,
    Random,
    CenterOut,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharCell {
    pub target: char,
    pub glyph: char,
    pub offset: Vec2,
    pub opacity: f32,
    pub settled: bool,
}

impl CharCell {
    fn settled(target: char) -> Self {
        Self {
            target,
            glyph: target,
            offset: Vec2::ZERO,
            opacity: 1.0,
            settled: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RevealOptions {
    /// Seconds between consecutive characters locking.
    pub stagger: f32,
    /// Seconds before the first character locks.
    pub base_duration: f32,
    /// Discrete scramble ticks before a character locks in tick mode.
    pub scramble_cycles: u32,
    /// Seconds between glyph re-rolls while scrambling in time mode.
    pub cycle_seconds: f32,
    /// Initial offset magnitude, in cells.
    pub scatter: f32,
    pub order: RevealOrder,
    pub charset: String,
    pub seed: u64,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            stagger: 0.05,
            base_duration: 0.4,
            scramble_cycles: 8,
            cycle_seconds: 0.05,
            scatter: 0.0,
            order: RevealOrder::Forward,
            charset: DEFAULT_CHARSET.to_string(),
            seed: 0x5eed,
        }
    }
}

impl RevealOptions {
    pub fn normalized(self) -> Self {
        let d = Self::default();
        let charset = if self.charset.chars().any(|c| !c.is_whitespace()) {
            self.charset
        } else {
            d.charset.clone()
        };
        Self {
            stagger: props::non_negative_or(self.stagger, d.stagger),
            base_duration: props::non_negative_or(self.base_duration, d.base_duration),
            scramble_cycles: if self.scramble_cycles == 0 {
                d.scramble_cycles
            } else {
                self.scramble_cycles
            },
            cycle_seconds: props::positive_or(self.cycle_seconds, d.cycle_seconds),
            scatter: props::non_negative_or(self.scatter, d.scatter),
            charset,
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LockTimer {
    generation: u64,
    index: usize,
}

#[derive(Debug)]
pub struct RevealMachine {
    options: RevealOptions,
    charset: Vec<char>,
    text: String,
    cells: Vec<CharCell>,
    /// Seconds from trigger at which each character locks.
    lock_at: Vec<f32>,
    /// Scramble ticks each character has received in tick mode.
    ticks: Vec<u32>,
    scatter_from: Vec<Vec2>,
    timers: Timers<LockTimer>,
    generation: u64,
    elapsed: f32,
    cycle_acc: f32,
    rng: StdRng,
}

impl RevealMachine {
    pub fn new(options: RevealOptions) -> Self {
        let options = options.normalized();
        let charset: Vec<char> = options.charset.chars().filter(|c| !c.is_whitespace()).collect();
        let rng = StdRng::seed_from_u64(options.seed);
        Self {
            options,
            charset,
            text: String::new(),
            cells: Vec::new(),
            lock_at: Vec::new(),
            ticks: Vec::new(),
            scatter_from: Vec::new(),
            timers: Timers::new(),
            generation: 0,
            elapsed: 0.0,
            cycle_acc: 0.0,
            rng,
        }
    }

    pub fn options(&self) -> &RevealOptions {
        &self.options
    }

    /// Starts a reveal of `text`, discarding any reveal in flight.
    pub fn trigger(&mut self, text: &str) {
        self.timers.reset();
        self.generation = self.generation.wrapping_add(1);
        self.text = text.to_string();
        self.elapsed = 0.0;
        self.cycle_acc = 0.0;

        let chars: Vec<char> = text.chars().collect();
        let n = chars.len();
        let order = self.lock_order(&chars);

        self.cells.clear();
        self.lock_at = vec![0.0; n];
        self.ticks = vec![0; n];
        self.scatter_from = Vec::with_capacity(n);

        for &c in &chars {
            if c.is_whitespace() {
                self.cells.push(CharCell::settled(c));
                self.scatter_from.push(Vec2::ZERO);
                continue;
            }
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let dist = self.options.scatter * self.rng.random_range(0.5..=1.0f32);
            let from = Vec2::from_angle(angle) * dist;
            self.scatter_from.push(from);
            let glyph = self.random_glyph();
            self.cells.push(CharCell {
                target: c,
                glyph,
                offset: from,
                opacity: 0.0,
                settled: false,
            });
        }

        let mut rank = 0usize;
        for &i in &order {
            if self.cells[i].settled {
                continue;
            }
            let at = self.options.base_duration + self.options.stagger * rank as f32;
            self.lock_at[i] = at;
            self.timers.schedule(
                at,
                LockTimer {
                    generation: self.generation,
                    index: i,
                },
            );
            rank += 1;
        }
    }

    fn lock_order(&mut self, chars: &[char]) -> Vec<usize> {
        let n = chars.len();
        let mut order: Vec<usize> = (0..n).collect();
        match self.options.order {
            RevealOrder::Forward => {}
            RevealOrder::Reverse => order.reverse(),
            RevealOrder::Random => order.shuffle(&mut self.rng),
            RevealOrder::CenterOut => {
                let mid = (n as f32 - 1.0) / 2.0;
                order.sort_by(|a, b| {
                    let da = (*a as f32 - mid).abs();
                    let db = (*b as f32 - mid).abs();
                    da.total_cmp(&db).then_with(|| a.cmp(b))
                });
            }
        }
        order
    }

    fn random_glyph(&mut self) -> char {
        if self.charset.is_empty() {
            return '?';
        }
        let i = self.rng.random_range(0..self.charset.len());
        self.charset[i]
    }

    fn lock(&mut self, index: usize) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = CharCell::settled(cell.target);
        }
    }

    /// Advances the virtual clock: fires due lock timers, re-rolls scrambling glyphs every
    /// `cycle_seconds` and eases offsets/opacity of unlocked characters toward rest.
    pub fn advance(&mut self, dt: f32) {
        if self.is_settled() {
            return;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt;
        for fired in self.timers.advance(dt) {
            if fired.generation == self.generation {
                self.lock(fired.index);
            }
        }

        self.cycle_acc += dt;
        let reroll = self.cycle_acc >= self.options.cycle_seconds;
        if reroll {
            self.cycle_acc = 0.0;
        }
        for i in 0..self.cells.len() {
            if self.cells[i].settled {
                continue;
            }
            let p = self.progress(i);
            let eased = math::ease_out_cubic(p);
            let from = self.scatter_from[i];
            let glyph = if reroll {
                self.random_glyph()
            } else {
                self.cells[i].glyph
            };
            let cell = &mut self.cells[i];
            cell.offset = from * (1.0 - eased);
            cell.opacity = math::clamp01(eased);
            cell.glyph = glyph;
        }
    }

    /// One discrete scramble step: every unlocked character gets a new glyph, and characters that
    /// have been scrambled `scramble_cycles` times lock.
    pub fn tick(&mut self) {
        let cycles = self.options.scramble_cycles;
        for i in 0..self.cells.len() {
            if self.cells[i].settled {
                continue;
            }
            self.ticks[i] += 1;
            if self.ticks[i] >= cycles {
                self.lock(i);
                continue;
            }
            let glyph = self.random_glyph();
            let fraction = self.ticks[i] as f32 / cycles as f32;
            let from = self.scatter_from[i];
            let cell = &mut self.cells[i];
            cell.glyph = glyph;
            cell.opacity = math::clamp01(fraction);
            cell.offset = from * (1.0 - fraction);
        }
        if self.is_settled() {
            self.timers.cancel_all();
        }
    }

    /// Jumps straight to the terminal state.
    pub fn settle(&mut self) {
        self.timers.cancel_all();
        for i in 0..self.cells.len() {
            self.lock(i);
        }
        self.elapsed = self.elapsed.max(self.deadline());
    }

    /// Cancels outstanding lock timers without changing what is displayed.
    pub fn cancel(&mut self) {
        self.timers.cancel_all();
    }

    /// Progress of character `index` toward its lock time, in [0, 1].
    pub fn progress(&self, index: usize) -> f32 {
        let Some(cell) = self.cells.get(index) else {
            return 0.0;
        };
        if cell.settled {
            return 1.0;
        }
        let at = self.lock_at.get(index).copied().unwrap_or(0.0);
        if at <= 0.0 {
            return 1.0;
        }
        math::clamp01(self.elapsed / at)
    }

    /// Upper bound on the time to reach [`RevealPhase::Settled`]: `stagger * count + base_duration`.
    pub fn deadline(&self) -> f32 {
        self.options.stagger * self.cells.len() as f32 + self.options.base_duration
    }

    pub fn phase(&self) -> RevealPhase {
        let locked = self.cells.iter().filter(|c| c.settled).count();
        if locked == self.cells.len() {
            return RevealPhase::Settled;
        }
        let any_scrambled_locked = self
            .cells
            .iter()
            .zip(&self.lock_at)
            .any(|(c, &at)| c.settled && at > 0.0)
            || self.ticks.iter().zip(&self.cells).any(|(&t, c)| c.settled && t > 0);
        if any_scrambled_locked {
            RevealPhase::Locking
        } else if self.elapsed > 0.0 || self.ticks.iter().any(|&t| t > 0) {
            RevealPhase::Scrambling
        } else {
            RevealPhase::Hidden
        }
    }

    pub fn is_settled(&self) -> bool {
        self.cells.iter().all(|c| c.settled)
    }

    pub fn cells(&self) -> &[CharCell] {
        &self.cells
    }

    /// The source text of the current reveal.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// What is displayed right now.
    pub fn displayed(&self) -> String {
        self.cells.iter().map(|c| c.glyph).collect()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> RevealMachine {
        RevealMachine::new(RevealOptions {
            stagger: 0.1,
            base_duration: 0.2,
            scatter: 3.0,
            ..RevealOptions::default()
        })
    }

    #[test]
    fn starts_hidden_with_max_entropy() {
        let mut m = machine();
        m.trigger("HELLO");
        assert_eq!(m.phase(), RevealPhase::Hidden);
        assert!(m.cells().iter().all(|c| c.opacity == 0.0 && !c.settled));
    }

    #[test]
    fn settles_within_deadline_and_matches_source() {
        let mut m = machine();
        let text = "HELLO  WORLD";
        m.trigger(text);
        let deadline = m.deadline();
        let mut t = 0.0;
        while t <= deadline + 1e-3 {
            m.advance(1.0 / 60.0);
            t += 1.0 / 60.0;
        }
        assert_eq!(m.phase(), RevealPhase::Settled);
        assert_eq!(m.displayed(), text);
        assert!(
            m.cells()
                .iter()
                .all(|c| c.opacity == 1.0 && c.offset == Vec2::ZERO)
        );
        assert_eq!(m.pending_timers(), 0);
    }

    #[test]
    fn spaces_are_never_scrambled() {
        let mut m = machine();
        m.trigger("A B");
        assert!(m.cells()[1].settled);
        for _ in 0..3 {
            m.tick();
            assert_eq!(m.cells()[1].glyph, ' ');
        }
    }

    #[test]
    fn tick_mode_settles_after_configured_cycles() {
        let mut m = RevealMachine::new(RevealOptions {
            scramble_cycles: 6,
            ..RevealOptions::default()
        });
        m.trigger("AB");
        for _ in 0..5 {
            m.tick();
        }
        assert!(!m.is_settled());
        m.tick();
        assert!(m.is_settled());
        assert_eq!(m.displayed(), "AB");
    }

    #[test]
    fn retrigger_cancels_stale_timers() {
        let mut m = machine();
        m.trigger("HELLO");
        m.advance(0.25);
        assert_eq!(m.phase(), RevealPhase::Locking);
        m.trigger("WORLD!");
        assert_eq!(m.pending_timers(), 6);
        for _ in 0..120 {
            m.advance(1.0 / 60.0);
        }
        assert_eq!(m.displayed(), "WORLD!");
        assert_eq!(m.text(), "WORLD!");
    }

    #[test]
    fn phases_progress_in_order() {
        let mut m = machine();
        m.trigger("ABC");
        m.advance(0.1);
        assert_eq!(m.phase(), RevealPhase::Scrambling);
        m.advance(0.15);
        assert_eq!(m.phase(), RevealPhase::Locking);
        m.advance(1.0);
        assert_eq!(m.phase(), RevealPhase::Settled);
    }

    #[test]
    fn empty_and_blank_text_is_settled() {
        let mut m = machine();
        m.trigger("");
        assert_eq!(m.phase(), RevealPhase::Settled);
        m.trigger("   ");
        assert!(m.is_settled());
        assert_eq!(m.displayed(), "   ");
    }

    #[test]
    fn settle_jumps_to_terminal_state() {
        let mut m = machine();
        m.trigger("abc def");
        m.settle();
        assert_eq!(m.displayed(), "abc def");
        assert_eq!(m.pending_timers(), 0);
    }

    #[test]
    fn center_out_locks_middle_first() {
        let mut m = RevealMachine::new(RevealOptions {
            order: RevealOrder::CenterOut,
            stagger: 0.1,
            base_duration: 0.1,
            ..RevealOptions::default()
        });
        m.trigger("abcde");
        m.advance(0.1);
        assert!(m.cells()[2].settled);
        assert!(!m.cells()[0].settled);
    }
}

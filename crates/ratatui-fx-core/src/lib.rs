//! `ratatui-fx-core` is the engine behind the `ratatui-fx` effect catalog.
//!
//! Every effect in the catalog has the same shape: an input sampler, a state buffer owned by the
//! effect, a per-frame updater, a painter and a lifecycle guard. This crate provides the shared
//! pieces so individual effects only contribute their force function and paint step.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: your app owns the terminal, the clock and the draw call.
//! - Deterministic: effects read time only through [`effect::FrameCtx`] and randomness only
//!   through seeded generators, so tests can replay them exactly.
//! - Tiny-area safe: zero-sized areas never panic or produce NaN state.
//! - Never fails at the widget level: bad configuration is coerced in [`props`].
//!
//! Useful entry points:
//! - [`host::EffectHost`]: mount/unmount, reduced motion, resize rebuilds, pointer filtering.
//! - [`physics::Swarm`]: pointer-reactive bodies with spring return and damping.
//! - [`reveal::RevealMachine`]: staged scramble/lock text reveals.
//! - [`canvas::FxCanvas`]: alpha-ramp painter targeting a ratatui buffer.
pub mod color;
pub mod error;
pub mod math;
pub mod theme;

pub mod input;
pub mod keymap;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod props;
pub mod timer;

pub mod physics;
pub mod reveal;

pub mod canvas;
pub mod render;

pub mod effect;
pub mod host;

//! `ratatui-fx` is a catalog of decorative, pointer-reactive effects for ratatui: backgrounds,
//! cards, buttons, loaders, text effects and navigation widgets.
//!
//! Every effect implements [`Effect`] and is normally driven by an [`EffectHost`], which handles
//! mounting, reduced motion, resizes and mouse filtering. Effects can be built directly from their
//! `*Options` structs or by slug through the [`registry::Catalog`]:
//!
//! ```
//! use ratatui_fx::Props;
//! use ratatui_fx::registry::Catalog;
//!
//! let catalog = Catalog::builtin();
//! let effect = catalog.instantiate("sand-particles", &Props::new().with("count", 200));
//! assert!(effect.is_ok());
//! ```

pub use ratatui_fx_core as core;

pub use ratatui_fx_core::color::Rgb;
pub use ratatui_fx_core::effect::Effect;
pub use ratatui_fx_core::effect::FrameCtx;
pub use ratatui_fx_core::effect::FxEnv;
pub use ratatui_fx_core::error::FxError;
pub use ratatui_fx_core::host::EffectHost;
pub use ratatui_fx_core::host::Mode;
pub use ratatui_fx_core::props::Props;
pub use ratatui_fx_core::theme::FxTheme;

pub mod effects;
pub mod registry;

//! Full-area backgrounds. Most of them are thin paint layers over the shared physics engine.

pub mod aurora;
pub mod constellation;
pub mod fireflies;
pub mod flicker_grid;
pub mod gravity_lens;
pub mod liquid_grid;
pub mod matrix_rain;
pub mod plasma;
pub mod ripple_pond;
pub mod sand;
pub mod starfield;

pub use aurora::Aurora;
pub use constellation::Constellation;
pub use fireflies::Fireflies;
pub use flicker_grid::FlickerGrid;
pub use gravity_lens::GravityLens;
pub use liquid_grid::LiquidGrid;
pub use matrix_rain::MatrixRain;
pub use plasma::Plasma;
pub use ripple_pond::RipplePond;
pub use sand::SandParticles;
pub use starfield::Starfield;

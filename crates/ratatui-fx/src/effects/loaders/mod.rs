//! Indeterminate progress indicators. Loaders are purely time driven; under reduced motion they
//! hold a single representative pose.

pub mod helix;
pub mod orbit;
pub mod pulse_bars;

pub use helix::HelixLoader;
pub use orbit::OrbitLoader;
pub use pulse_bars::PulseBars;

//! The effect catalog: a read-only mapping from stable slugs to constructors, display metadata and
//! the effect's own source text.
//!
//! [`Catalog::builtin`] populates the mapping once. Nothing is constructed until
//! [`Catalog::instantiate`] (or an entry's `build`) is called.

use crate::effects::backgrounds;
use crate::effects::buttons;
use crate::effects::cards;
use crate::effects::loaders;
use crate::effects::navigation;
use crate::effects::text;
use ratatui_fx_core::effect::Effect;
use ratatui_fx_core::error::FxError;
use ratatui_fx_core::props::Props;
use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Background,
    Card,
    Button,
    Loader,
    Text,
    Navigation,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Background,
        Category::Card,
        Category::Button,
        Category::Loader,
        Category::Text,
        Category::Navigation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Background => "Backgrounds",
            Category::Card => "Cards",
            Category::Button => "Buttons",
            Category::Loader => "Loaders",
            Category::Text => "Text",
            Category::Navigation => "Navigation",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub type BuildFn = fn(&Props) -> Box<dyn Effect>;

#[derive(Clone, Copy)]
pub struct CatalogEntry {
    pub slug: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub description: &'static str,
    /// Source of the module implementing the effect, for documentation views.
    pub source: &'static str,
    pub build: BuildFn,
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("slug", &self.slug)
            .field("name", &self.name)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

macro_rules! entry {
    ($slug:literal, $name:literal, $cat:ident, $desc:literal, $path:literal, $ty:path) => {
        CatalogEntry {
            slug: $slug,
            name: $name,
            category: Category::$cat,
            description: $desc,
            source: include_str!($path),
            build: |p| Box::new(<$ty>::from_props(p)),
        }
    };
}

#[derive(Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_slug: HashMap<&'static str, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every effect shipped with the crate, in display order.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for entry in builtin_entries() {
            catalog.register(entry);
        }
        catalog
    }

    /// Adds `entry`. A slug that is already registered is rejected (and trips a debug assertion).
    pub fn register(&mut self, entry: CatalogEntry) -> bool {
        if self.by_slug.contains_key(entry.slug) {
            debug_assert!(false, "duplicate effect slug: {}", entry.slug);
            tracing::warn!(slug = entry.slug, "duplicate effect slug rejected");
            return false;
        }
        self.by_slug.insert(entry.slug, self.entries.len());
        self.entries.push(entry);
        true
    }

    pub fn get(&self, slug: &str) -> Option<&CatalogEntry> {
        self.by_slug.get(slug).map(|&i| &self.entries[i])
    }

    pub fn instantiate(&self, slug: &str, props: &Props) -> Result<Box<dyn Effect>, FxError> {
        let entry = self
            .get(slug)
            .ok_or_else(|| FxError::UnknownEffect(slug.to_string()))?;
        tracing::debug!(slug, "instantiating effect");
        Ok((entry.build)(props))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    /// Position of `slug` in display order.
    pub fn position(&self, slug: &str) -> Option<usize> {
        self.by_slug.get(slug).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn builtin_entries() -> Vec<CatalogEntry> {
    vec![
        entry!(
            "sand-particles",
            "Sand Particles",
            Background,
            "Grains that scatter from the pointer and drift back home.",
            "effects/backgrounds/sand.rs",
            backgrounds::SandParticles
        ),
        entry!(
            "liquid-grid",
            "Liquid Grid",
            Background,
            "A dot lattice that bulges away from the pointer like a liquid surface.",
            "effects/backgrounds/liquid_grid.rs",
            backgrounds::LiquidGrid
        ),
        entry!(
            "gravity-lens",
            "Gravity Lens",
            Background,
            "A lattice pulled toward the pointer as if by a heavy mass.",
            "effects/backgrounds/gravity_lens.rs",
            backgrounds::GravityLens
        ),
        entry!(
            "constellation",
            "Constellation",
            Background,
            "Drifting stars that link up near the pointer.",
            "effects/backgrounds/constellation.rs",
            backgrounds::Constellation
        ),
        entry!(
            "starfield",
            "Starfield",
            Background,
            "Stars streaming outward from the pointer at warp speed.",
            "effects/backgrounds/starfield.rs",
            backgrounds::Starfield
        ),
        entry!(
            "fireflies",
            "Fireflies",
            Background,
            "Glowing motes that wander, gather around the pointer and fade out.",
            "effects/backgrounds/fireflies.rs",
            backgrounds::Fireflies
        ),
        entry!(
            "flicker-grid",
            "Flicker Grid",
            Background,
            "A grid of squares flickering at random, brighter near the pointer.",
            "effects/backgrounds/flicker_grid.rs",
            backgrounds::FlickerGrid
        ),
        entry!(
            "ripple-pond",
            "Ripple Pond",
            Background,
            "Rings spreading from clicks and falling rain.",
            "effects/backgrounds/ripple_pond.rs",
            backgrounds::RipplePond
        ),
        entry!(
            "matrix-rain",
            "Matrix Rain",
            Background,
            "Falling glyph streams that slow and glow under the pointer.",
            "effects/backgrounds/matrix_rain.rs",
            backgrounds::MatrixRain
        ),
        entry!(
            "plasma",
            "Plasma",
            Background,
            "Interfering sine fields warped around the pointer.",
            "effects/backgrounds/plasma.rs",
            backgrounds::Plasma
        ),
        entry!(
            "aurora",
            "Aurora",
            Background,
            "Slow curtains of light that bend toward the pointer.",
            "effects/backgrounds/aurora.rs",
            backgrounds::Aurora
        ),
        entry!(
            "spotlight-card",
            "Spotlight Card",
            Card,
            "A card lit by a soft spotlight that trails the pointer.",
            "effects/cards/spotlight.rs",
            cards::SpotlightCard
        ),
        entry!(
            "tilt-card",
            "Tilt Card",
            Card,
            "A card that tilts toward the pointer with shading and parallax.",
            "effects/cards/tilt.rs",
            cards::TiltCard
        ),
        entry!(
            "border-beam",
            "Border Beam",
            Card,
            "A comet of light running around the card border.",
            "effects/cards/border_beam.rs",
            cards::BorderBeam
        ),
        entry!(
            "magnetic-button",
            "Magnetic Button",
            Button,
            "A button that leans toward the pointer and springs back.",
            "effects/buttons/magnetic.rs",
            buttons::MagneticButton
        ),
        entry!(
            "ripple-button",
            "Ripple Button",
            Button,
            "A ripple spreading from the exact click position.",
            "effects/buttons/ripple.rs",
            buttons::RippleButton
        ),
        entry!(
            "burst-button",
            "Burst Button",
            Button,
            "Confetti sparks thrown out on every click.",
            "effects/buttons/burst.rs",
            buttons::BurstButton
        ),
        entry!(
            "shimmer-button",
            "Shimmer Button",
            Button,
            "A band of light sweeping across the button face.",
            "effects/buttons/shimmer.rs",
            buttons::ShimmerButton
        ),
        entry!(
            "orbit-loader",
            "Orbit Loader",
            Loader,
            "Dots chasing each other around an orbit.",
            "effects/loaders/orbit.rs",
            loaders::OrbitLoader
        ),
        entry!(
            "pulse-bars",
            "Pulse Bars",
            Loader,
            "Equalizer bars pulsing out of phase.",
            "effects/loaders/pulse_bars.rs",
            loaders::PulseBars
        ),
        entry!(
            "helix-loader",
            "Helix Loader",
            Loader,
            "Two strands twisting around each other.",
            "effects/loaders/helix.rs",
            loaders::HelixLoader
        ),
        entry!(
            "scramble-text",
            "Scramble Text",
            Text,
            "Characters cycle through random glyphs before locking in.",
            "effects/text/scramble.rs",
            text::ScrambleText
        ),
        entry!(
            "typewriter",
            "Typewriter",
            Text,
            "Phrases typed, held and deleted one after another.",
            "effects/text/typewriter.rs",
            text::Typewriter
        ),
        entry!(
            "decrypt-text",
            "Decrypt Text",
            Text,
            "Noise that decrypts into the text on a timed schedule.",
            "effects/text/decrypt.rs",
            text::DecryptText
        ),
        entry!(
            "shatter-text",
            "Shatter Text",
            Text,
            "Scattered pieces that reassemble into the text and flash.",
            "effects/text/shatter.rs",
            text::ShatterText
        ),
        entry!(
            "connect-text",
            "Connect Text",
            Text,
            "Letters linked by threads as they are pulled into line.",
            "effects/text/connect.rs",
            text::ConnectText
        ),
        entry!(
            "pressure-wave",
            "Pressure Wave",
            Text,
            "Click waves that push letters aside before they spring back.",
            "effects/text/pressure_wave.rs",
            text::PressureWave
        ),
        entry!(
            "gradient-text",
            "Gradient Text",
            Text,
            "A looping color gradient sliding through the letters.",
            "effects/text/gradient.rs",
            text::GradientText
        ),
        entry!(
            "dock-magnify",
            "Dock Magnify",
            Navigation,
            "Dock items that grow and rise under the pointer.",
            "effects/navigation/dock_magnify.rs",
            navigation::DockMagnify
        ),
        entry!(
            "tab-indicator",
            "Tab Indicator",
            Navigation,
            "An underline that glides between tabs.",
            "effects/navigation/tab_indicator.rs",
            navigation::TabIndicator
        ),
    ]
}

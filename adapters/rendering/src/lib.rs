#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Desert Command adapters.
//!
//! Presentation structs describe what a frame should show, [`FrameInput`]
//! describes what the adapter observed, and the pick helpers translate a
//! pointer position back into either a unit identifier or a ground point.
//! Concrete backends implement [`RenderingBackend`] and stay interchangeable
//! at composition time.

use anyhow::Result as AnyResult;
use desert_command_core::{UnitId, Vec3};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Night-sky backdrop drawn behind the scene.
pub const CLEAR_COLOR: Color = Color::from_rgb_u8(0x1d, 0x23, 0x30);

/// Sand tone used for the ground fill.
pub const DESERT_SAND: Color = Color::from_rgb_u8(0xc9, 0xa9, 0x6a);

/// Warm glow used for the selection ring.
pub const SELECTION_GLOW: Color = Color::from_rgb_u8(0xf5, 0xe2, 0x9f);

/// Body colors assigned to units round-robin by roster index.
pub const UNIT_PALETTE: [Color; 2] = [
    Color::from_rgb_u8(0x4a, 0x89, 0xe8),
    Color::from_rgb_u8(0xe8, 0x6a, 0x4a),
];

/// Picks the body color for the unit at the provided roster index.
#[must_use]
pub const fn unit_color(index: usize) -> Color {
    UNIT_PALETTE[index % UNIT_PALETTE.len()]
}

/// World-space radius of a unit's body circle.
pub const UNIT_BODY_RADIUS: f32 = 0.45;

/// World-space radius of the selection ring drawn around a selected unit.
pub const SELECTION_RING_RADIUS: f32 = 0.85;

/// World-space radius inside which a pointer press counts as hitting a unit.
/// Wider than the body so small units stay clickable.
pub const UNIT_PICK_RADIUS: f32 = 0.9;

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position projected onto the ground plane, if a cursor exists.
    pub cursor_world_space: Option<Vec2>,
    /// Whether the adapter detected the primary pointer press this frame.
    /// The press resolves to a selection or a move order through
    /// [`resolve_pointer_target`].
    pub primary_action: bool,
}

/// Square desert ground that hosts the units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundPresentation {
    /// Half the side length of the ground plane in world units.
    pub half_extent: f32,
    /// Margin between the reachable region and the ground edge.
    pub padding: f32,
    /// Fill color for the ground plane.
    pub fill: Color,
    /// Color for the reachable-region boundary line.
    pub boundary: Color,
}

impl GroundPresentation {
    /// Creates a new ground descriptor with the desert palette.
    ///
    /// Returns an error when the half extent is not positive.
    pub fn new(half_extent: f32, padding: f32) -> std::result::Result<Self, RenderingError> {
        if half_extent <= 0.0 {
            return Err(RenderingError::InvalidGroundExtent { half_extent });
        }

        Ok(Self {
            half_extent,
            padding: padding.clamp(0.0, half_extent),
            fill: DESERT_SAND,
            boundary: DESERT_SAND.lighten(0.35),
        })
    }

    /// Half extent of the region move orders can reach.
    #[must_use]
    pub fn reachable_extent(&self) -> f32 {
        self.half_extent - self.padding
    }

    /// Clamps a world-space point onto the ground plane.
    #[must_use]
    pub fn clamp_world_position(&self, position: Vec2) -> Vec2 {
        position.clamp(
            Vec2::splat(-self.half_extent),
            Vec2::splat(self.half_extent),
        )
    }
}

/// Visual state of a single unit for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitPresentation {
    /// Identifier the pick helpers resolve back to.
    pub id: UnitId,
    /// Position on the ground plane (world x/z).
    pub position: Vec2,
    /// Heading in radians on the ground plane; `None` for a degenerate
    /// zero-length facing, in which case the previous orientation is kept.
    pub heading_radians: Option<f32>,
    /// Whether the selection ring should be shown.
    pub selected: bool,
    /// Body color assigned at composition time.
    pub color: Color,
}

impl UnitPresentation {
    /// Creates a new unit descriptor.
    #[must_use]
    pub fn new(
        id: UnitId,
        position: Vec2,
        heading_radians: Option<f32>,
        selected: bool,
        color: Color,
    ) -> Self {
        Self {
            id,
            position,
            heading_radians,
            selected,
            color,
        }
    }
}

/// Derives the ground-plane heading of a facing vector.
///
/// The heading is measured from the +x axis toward +z. A facing without a
/// horizontal component yields `None` so renderers keep the previous
/// orientation, matching how a zero facing leaves a unit's visual untouched.
#[must_use]
pub fn heading_from_facing(facing: Vec3) -> Option<f32> {
    if facing.x == 0.0 && facing.z == 0.0 {
        return None;
    }
    Some(facing.z.atan2(facing.x))
}

/// Everything a backend needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Ground plane hosting the units.
    pub ground: GroundPresentation,
    /// Units to draw, in deterministic roster order.
    pub units: Vec<UnitPresentation>,
}

impl Scene {
    /// Creates a new scene from its parts.
    #[must_use]
    pub fn new(ground: GroundPresentation, units: Vec<UnitPresentation>) -> Self {
        Self { ground, units }
    }
}

/// Initial package handed to a backend when it starts running.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title for the backend's window, if it opens one.
    pub window_title: String,
    /// Backdrop color cleared before each frame.
    pub clear_color: Color,
    /// Scene drawn on the first frame and mutated per frame afterwards.
    pub scene: Scene,
}

/// Top-down camera mapping the ground plane onto the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    center: Vec2,
    pixels_per_unit: f32,
}

impl Camera {
    /// Narrowest zoom accepted by [`Camera::zoom_by`].
    pub const MIN_PIXELS_PER_UNIT: f32 = 4.0;

    /// Widest zoom accepted by [`Camera::zoom_by`].
    pub const MAX_PIXELS_PER_UNIT: f32 = 48.0;

    /// Creates a camera looking at the world origin.
    ///
    /// Returns an error when the scale is not positive.
    pub fn centered(pixels_per_unit: f32) -> std::result::Result<Self, RenderingError> {
        if pixels_per_unit <= 0.0 {
            return Err(RenderingError::InvalidCameraScale { pixels_per_unit });
        }

        Ok(Self {
            center: Vec2::ZERO,
            pixels_per_unit,
        })
    }

    /// World point at the middle of the screen.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Current scale in pixels per world unit.
    #[must_use]
    pub const fn pixels_per_unit(&self) -> f32 {
        self.pixels_per_unit
    }

    /// Projects a world-space ground point into screen space.
    #[must_use]
    pub fn world_to_screen(&self, world: Vec2, screen_size: Vec2) -> Vec2 {
        (world - self.center) * self.pixels_per_unit + screen_size * 0.5
    }

    /// Projects a screen point back onto the ground plane.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2, screen_size: Vec2) -> Vec2 {
        (screen - screen_size * 0.5) / self.pixels_per_unit + self.center
    }

    /// Moves the camera by a world-space delta, keeping the view on the
    /// ground plane.
    pub fn pan(&mut self, delta: Vec2, ground: &GroundPresentation) {
        self.look_at(self.center + delta, ground);
    }

    /// Points the camera at a world-space center, clamped onto the ground.
    pub fn look_at(&mut self, center: Vec2, ground: &GroundPresentation) {
        self.center = ground.clamp_world_position(center);
    }

    /// Scales the zoom by a factor, clamped to the supported range.
    pub fn zoom_by(&mut self, factor: f32) {
        self.pixels_per_unit = (self.pixels_per_unit * factor)
            .clamp(Self::MIN_PIXELS_PER_UNIT, Self::MAX_PIXELS_PER_UNIT);
    }
}

/// What a pointer press resolved to.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerTarget {
    /// The press landed on a unit's body circle.
    Unit(UnitId),
    /// The press landed on open ground at the contained world point.
    Ground(Vec3),
}

/// Resolves the unit under the cursor, preferring the nearest body circle.
///
/// This is the explicit picked-identifier mapping that replaces scene-graph
/// metadata tagging: the scene's unit list is the single source of truth for
/// what is clickable.
#[must_use]
pub fn pick_unit(scene: &Scene, cursor_world: Vec2) -> Option<UnitId> {
    let mut best: Option<(&UnitPresentation, f32)> = None;
    for unit in &scene.units {
        let distance = unit.position.distance(cursor_world);
        if distance > UNIT_PICK_RADIUS {
            continue;
        }
        match best {
            Some((_, best_distance)) if best_distance <= distance => {}
            _ => best = Some((unit, distance)),
        }
    }
    best.map(|(unit, _)| unit.id.clone())
}

/// Resolves a pointer press into either a unit or a ground point.
#[must_use]
pub fn resolve_pointer_target(scene: &Scene, cursor_world: Vec2) -> PointerTarget {
    match pick_unit(scene, cursor_world) {
        Some(unit_id) => PointerTarget::Unit(unit_id),
        None => PointerTarget::Ground(Vec3::ground(cursor_world.x, cursor_world.y)),
    }
}

/// Contract implemented by concrete rendering backends.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, and may mutate the scene
    /// before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Validation failures raised by presentation constructors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderingError {
    /// The ground must cover a positive area.
    InvalidGroundExtent {
        /// Provided half extent that failed validation.
        half_extent: f32,
    },
    /// The camera scale must be positive.
    InvalidCameraScale {
        /// Provided scale that failed validation.
        pixels_per_unit: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGroundExtent { half_extent } => {
                write!(formatter, "ground half extent must be positive, got {half_extent}")
            }
            Self::InvalidCameraScale { pixels_per_unit } => {
                write!(formatter, "camera scale must be positive, got {pixels_per_unit}")
            }
        }
    }
}

impl Error for RenderingError {}

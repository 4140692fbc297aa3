#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Desert Command experience.

use desert_command_world::{
    query::{self, UnitView},
    World, WorldBounds,
};

/// Produces data required to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner(&self, world: &World) -> &'static str {
        query::welcome_banner(world)
    }

    /// Exposes the playable bounds required for rendering the ground.
    #[must_use]
    pub fn bounds(&self, world: &World) -> WorldBounds {
        query::bounds(world)
    }

    /// Exposes the units currently inhabiting the world for presentation
    /// purposes.
    #[must_use]
    pub fn units(&self, world: &World) -> UnitView {
        query::unit_view(world)
    }
}

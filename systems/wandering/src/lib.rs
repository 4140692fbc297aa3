#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wandering system that keeps idle units roaming.
//!
//! The wandering scene variant has no player issuing orders; instead this
//! system reacts to the world's event stream and proposes a fresh random
//! destination whenever a unit sits idle. The currently selected unit is
//! left alone so a player command always overrides the wander loop.

use desert_command_core::{Command, Event, Vec3};
use desert_command_world::{query::UnitView, WorldBounds};

const WANDER_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Pure system that reacts to world events and emits wander orders.
#[derive(Clone, Debug)]
pub struct Wandering {
    rng_state: u64,
}

impl Wandering {
    /// Creates a wandering system with an explicit seed so replays are
    /// reproducible.
    #[must_use]
    pub const fn with_seed(seed: u64) -> Self {
        Self { rng_state: seed }
    }

    /// Consumes world events and the unit view to emit wander commands.
    ///
    /// Destinations are drawn uniformly from the reachable region described
    /// by `bounds`, so the world's clamping never alters them.
    pub fn handle(
        &mut self,
        events: &[Event],
        units: &UnitView,
        bounds: WorldBounds,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for unit in units.iter() {
            if unit.move_target.is_some() || unit.selected {
                continue;
            }

            let target = self.next_destination(bounds);
            out.push(Command::OrderUnit {
                unit_id: unit.id.clone(),
                target,
            });
        }
    }

    fn next_destination(&mut self, bounds: WorldBounds) -> Vec3 {
        let x = self.next_coordinate(bounds);
        let z = self.next_coordinate(bounds);
        Vec3::ground(x, z)
    }

    fn next_coordinate(&mut self, bounds: WorldBounds) -> f32 {
        self.rng_state = next_random(self.rng_state);
        let fraction = (self.rng_state >> 40) as f32 / (1u64 << 24) as f32;
        bounds.min_reach() + fraction * (bounds.max_reach() - bounds.min_reach())
    }
}

impl Default for Wandering {
    fn default() -> Self {
        Self::with_seed(WANDER_SEED)
    }
}

fn next_random(state: u64) -> u64 {
    state.wrapping_mul(636_413_622_384_679_3005).wrapping_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use desert_command_world::{query, World};
    use std::time::Duration;

    fn time_advanced() -> Vec<Event> {
        vec![Event::TimeAdvanced {
            dt: Duration::from_millis(100),
        }]
    }

    #[test]
    fn emits_no_orders_without_a_tick() {
        let world = World::new();
        let mut wandering = Wandering::default();
        let mut commands = Vec::new();

        wandering.handle(
            &[],
            &query::unit_view(&world),
            query::bounds(&world),
            &mut commands,
        );

        assert!(commands.is_empty());
    }

    #[test]
    fn orders_every_idle_unit_once_per_tick() {
        let world = World::new();
        let mut wandering = Wandering::default();
        let mut commands = Vec::new();

        wandering.handle(
            &time_advanced(),
            &query::unit_view(&world),
            query::bounds(&world),
            &mut commands,
        );

        assert_eq!(commands.len(), 2);
        assert!(commands
            .iter()
            .all(|command| matches!(command, Command::OrderUnit { .. })));
    }

    #[test]
    fn destinations_stay_inside_the_reachable_region() {
        let world = World::new();
        let bounds = query::bounds(&world);
        let mut wandering = Wandering::default();

        for _ in 0..50 {
            let mut commands = Vec::new();
            wandering.handle(
                &time_advanced(),
                &query::unit_view(&world),
                bounds,
                &mut commands,
            );

            for command in commands {
                let Command::OrderUnit { target, .. } = command else {
                    panic!("unexpected command kind");
                };
                assert!(target.x >= bounds.min_reach() && target.x <= bounds.max_reach());
                assert!(target.z >= bounds.min_reach() && target.z <= bounds.max_reach());
                assert_eq!(target.y, 0.0);
            }
        }
    }

    #[test]
    fn same_seed_replays_identically() {
        let world = World::new();
        let bounds = query::bounds(&world);
        let mut first = Wandering::with_seed(7);
        let mut second = Wandering::with_seed(7);
        let mut first_commands = Vec::new();
        let mut second_commands = Vec::new();

        for _ in 0..10 {
            first.handle(
                &time_advanced(),
                &query::unit_view(&world),
                bounds,
                &mut first_commands,
            );
            second.handle(
                &time_advanced(),
                &query::unit_view(&world),
                bounds,
                &mut second_commands,
            );
        }

        assert_eq!(first_commands, second_commands);
    }

    #[test]
    fn different_seeds_diverge() {
        let world = World::new();
        let bounds = query::bounds(&world);
        let mut first = Wandering::with_seed(1);
        let mut second = Wandering::with_seed(2);
        let mut first_commands = Vec::new();
        let mut second_commands = Vec::new();

        first.handle(
            &time_advanced(),
            &query::unit_view(&world),
            bounds,
            &mut first_commands,
        );
        second.handle(
            &time_advanced(),
            &query::unit_view(&world),
            bounds,
            &mut second_commands,
        );

        assert_ne!(first_commands, second_commands);
    }
}

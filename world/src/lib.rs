#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Desert Command.
//!
//! The world owns the unit roster and is the only place unit state mutates.
//! Adapters and systems submit [`Command`] values through [`apply`]; the
//! world executes them synchronously, records the resulting [`Event`] values,
//! and exposes read-only snapshots through the [`query`] module.

use desert_command_core::{Command, Event, PlayerId, UnitId, Vec3, WELCOME_BANNER};

const DEFAULT_MOVE_SPEED: f32 = 6.0;
const DEFAULT_ARRIVAL_THRESHOLD: f32 = 0.6;
const DEFAULT_HALF_EXTENT: f32 = 30.0;
const DEFAULT_PADDING: f32 = 4.0;

/// Tuning applied when units seek their move targets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionConfig {
    speed: f32,
    arrival_threshold: f32,
}

impl MotionConfig {
    /// Creates a new motion configuration.
    #[must_use]
    pub const fn new(speed: f32, arrival_threshold: f32) -> Self {
        Self {
            speed,
            arrival_threshold,
        }
    }

    /// Seek speed measured in world units per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Distance below which a unit counts as having arrived.
    #[must_use]
    pub const fn arrival_threshold(&self) -> f32 {
        self.arrival_threshold
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MOVE_SPEED, DEFAULT_ARRIVAL_THRESHOLD)
    }
}

/// Square playable region that commanded destinations are clamped into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldBounds {
    half_extent: f32,
    padding: f32,
}

impl WorldBounds {
    /// Creates new bounds from a half extent and an edge padding.
    ///
    /// A padding larger than the half extent collapses the reachable region
    /// to the world center.
    #[must_use]
    pub fn new(half_extent: f32, padding: f32) -> Self {
        Self {
            half_extent,
            padding: padding.min(half_extent),
        }
    }

    /// Half the side length of the square playable region.
    #[must_use]
    pub const fn half_extent(&self) -> f32 {
        self.half_extent
    }

    /// Margin kept between destinations and the region edge.
    #[must_use]
    pub const fn padding(&self) -> f32 {
        self.padding
    }

    /// Smallest reachable coordinate on the x and z axes.
    #[must_use]
    pub const fn min_reach(&self) -> f32 {
        -self.half_extent + self.padding
    }

    /// Largest reachable coordinate on the x and z axes.
    #[must_use]
    pub const fn max_reach(&self) -> f32 {
        self.half_extent - self.padding
    }

    /// Clamps a commanded destination into the reachable region.
    ///
    /// Both horizontal components are clamped and the result always lies on
    /// the ground plane regardless of the input height.
    #[must_use]
    pub fn clamp_destination(&self, target: Vec3) -> Vec3 {
        let min = self.min_reach();
        let max = self.max_reach();
        Vec3::ground(target.x.clamp(min, max), target.z.clamp(min, max))
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self::new(DEFAULT_HALF_EXTENT, DEFAULT_PADDING)
    }
}

#[derive(Clone, Debug)]
struct Unit {
    id: UnitId,
    position: Vec3,
    facing: Vec3,
    move_target: Option<Vec3>,
    selected: bool,
    owner: PlayerId,
}

impl Unit {
    fn new(id: UnitId, position: Vec3, facing: Vec3, owner: PlayerId) -> Self {
        Self {
            id,
            position,
            facing,
            move_target: None,
            selected: false,
            owner,
        }
    }
}

/// Represents the authoritative Desert Command world state.
#[derive(Clone, Debug)]
pub struct World {
    banner: &'static str,
    units: Vec<Unit>,
    motion: MotionConfig,
    bounds: WorldBounds,
}

impl World {
    /// Creates a new world with the reference roster and default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MotionConfig::default(), WorldBounds::default())
    }

    /// Creates a new world with explicit motion tuning and bounds.
    #[must_use]
    pub fn with_config(motion: MotionConfig, bounds: WorldBounds) -> Self {
        Self {
            banner: WELCOME_BANNER,
            units: initial_units(),
            motion,
            bounds,
        }
    }

    fn unit_mut(&mut self, unit_id: &UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|unit| &unit.id == unit_id)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Units present at construction. The roster is fixed for the lifetime of
/// the world: units are never added or removed afterwards.
fn initial_units() -> Vec<Unit> {
    let owner = PlayerId::new("player-1");
    vec![
        Unit::new(
            UnitId::new("unit-1"),
            Vec3::ground(-5.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            owner.clone(),
        ),
        Unit::new(
            UnitId::new("unit-2"),
            Vec3::ground(5.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            owner,
        ),
    ]
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureMotion {
            speed,
            arrival_threshold,
        } => {
            world.motion = MotionConfig::new(speed, arrival_threshold);
        }
        Command::ConfigureBounds {
            half_extent,
            padding,
        } => {
            world.bounds = WorldBounds::new(half_extent, padding);
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });

            let dt_seconds = dt.as_secs_f32();
            let speed = world.motion.speed();
            let threshold = world.motion.arrival_threshold();

            for unit in world.units.iter_mut() {
                let Some(target) = unit.move_target else {
                    continue;
                };

                let displacement = target.subtract(unit.position);
                let distance = displacement.length();

                if distance <= threshold {
                    unit.move_target = None;
                    out_events.push(Event::UnitArrived {
                        unit_id: unit.id.clone(),
                        position: unit.position,
                    });
                    continue;
                }

                // Plain Euler stepping: a large enough dt carries the unit
                // past its target, and arrival is only re-evaluated on the
                // next tick.
                let from = unit.position;
                let step = displacement.normalized().scale(speed * dt_seconds);
                unit.position = from.add(step);
                unit.facing = unit.position.horizontal_to(target);

                if dt_seconds > 0.0 {
                    out_events.push(Event::UnitMoved {
                        unit_id: unit.id.clone(),
                        from,
                        to: unit.position,
                    });
                }
            }
        }
        Command::SelectUnit { unit_id } => {
            let mut matched = None;
            for unit in world.units.iter_mut() {
                unit.selected = unit_id.as_ref() == Some(&unit.id);
                if unit.selected {
                    matched = Some(unit.id.clone());
                }
            }
            out_events.push(Event::SelectionChanged { unit_id: matched });
        }
        Command::MoveSelectedUnits { target } => {
            let clamped = world.bounds.clamp_destination(target);
            for unit in world.units.iter_mut().filter(|unit| unit.selected) {
                unit.move_target = Some(clamped);
                out_events.push(Event::MoveOrdered {
                    unit_id: unit.id.clone(),
                    target: clamped,
                });
            }
        }
        Command::OrderUnit { unit_id, target } => {
            let clamped = world.bounds.clamp_destination(target);
            if let Some(unit) = world.unit_mut(&unit_id) {
                unit.move_target = Some(clamped);
                out_events.push(Event::MoveOrdered {
                    unit_id,
                    target: clamped,
                });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{MotionConfig, World, WorldBounds};
    use desert_command_core::{PlayerId, UnitId, Vec3};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides the motion tuning currently in force.
    #[must_use]
    pub fn motion_config(world: &World) -> MotionConfig {
        world.motion
    }

    /// Provides the bounds that destinations are clamped into.
    #[must_use]
    pub fn bounds(world: &World) -> WorldBounds {
        world.bounds
    }

    /// Identifier of the currently selected unit, if any.
    #[must_use]
    pub fn selected_unit(world: &World) -> Option<UnitId> {
        world
            .units
            .iter()
            .find(|unit| unit.selected)
            .map(|unit| unit.id.clone())
    }

    /// Captures a read-only view of the units inhabiting the world.
    #[must_use]
    pub fn unit_view(world: &World) -> UnitView {
        let mut snapshots: Vec<UnitSnapshot> = world
            .units
            .iter()
            .map(|unit| UnitSnapshot {
                id: unit.id.clone(),
                position: unit.position,
                facing: unit.facing,
                move_target: unit.move_target,
                selected: unit.selected,
                owner: unit.owner.clone(),
            })
            .collect();
        snapshots.sort_by(|a, b| a.id.cmp(&b.id));
        UnitView { snapshots }
    }

    /// Read-only snapshot describing all units within the world.
    #[derive(Clone, Debug)]
    pub struct UnitView {
        snapshots: Vec<UnitSnapshot>,
    }

    impl UnitView {
        /// Iterator over the captured unit snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
            self.snapshots.iter()
        }

        /// Number of units captured by the view.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Returns `true` when the view contains no units.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Looks up a snapshot by unit identifier.
        #[must_use]
        pub fn get(&self, unit_id: &UnitId) -> Option<&UnitSnapshot> {
            self.snapshots.iter().find(|snapshot| &snapshot.id == unit_id)
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<UnitSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single unit's state used for queries.
    #[derive(Clone, Debug, PartialEq)]
    pub struct UnitSnapshot {
        /// Unique identifier assigned to the unit.
        pub id: UnitId,
        /// Current world-space location.
        pub position: Vec3,
        /// Direction the unit faces; not necessarily normalized.
        pub facing: Vec3,
        /// Outstanding destination, present while the unit seeks.
        pub move_target: Option<Vec3>,
        /// Whether the unit is the current exclusive selection.
        pub selected: bool,
        /// Player that controls the unit.
        pub owner: PlayerId,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn snapshot(world: &World, id: &str) -> query::UnitSnapshot {
        query::unit_view(world)
            .get(&UnitId::new(id))
            .cloned()
            .expect("unit should exist")
    }

    fn select(world: &mut World, id: &str) {
        let mut events = Vec::new();
        apply(
            world,
            Command::SelectUnit {
                unit_id: Some(UnitId::new(id)),
            },
            &mut events,
        );
    }

    fn order_selected(world: &mut World, target: Vec3) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::MoveSelectedUnits { target }, &mut events);
        events
    }

    fn tick(world: &mut World, dt: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::Tick { dt }, &mut events);
        events
    }

    #[test]
    fn initial_roster_matches_reference_scenario() {
        let world = World::new();
        let view = query::unit_view(&world);
        assert_eq!(view.len(), 2);

        let first = snapshot(&world, "unit-1");
        assert_eq!(first.position, Vec3::ground(-5.0, 0.0));
        assert_eq!(first.facing, Vec3::new(1.0, 0.0, 0.0));
        assert!(first.move_target.is_none());
        assert!(!first.selected);
        assert_eq!(first.owner, PlayerId::new("player-1"));

        let second = snapshot(&world, "unit-2");
        assert_eq!(second.position, Vec3::ground(5.0, 0.0));
        assert_eq!(second.facing, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn tick_leaves_idle_units_untouched() {
        let mut world = World::new();
        let before = query::unit_view(&world).into_vec();

        let events = tick(&mut world, Duration::from_millis(500));

        assert_eq!(query::unit_view(&world).into_vec(), before);
        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: Duration::from_millis(500)
            }]
        );
    }

    #[test]
    fn selection_is_exclusive() {
        let mut world = World::new();
        select(&mut world, "unit-2");

        assert!(!snapshot(&world, "unit-1").selected);
        assert!(snapshot(&world, "unit-2").selected);
        assert_eq!(query::selected_unit(&world), Some(UnitId::new("unit-2")));

        select(&mut world, "unit-1");
        assert!(snapshot(&world, "unit-1").selected);
        assert!(!snapshot(&world, "unit-2").selected);
    }

    #[test]
    fn selecting_none_deselects_all() {
        let mut world = World::new();
        select(&mut world, "unit-1");

        let mut events = Vec::new();
        apply(&mut world, Command::SelectUnit { unit_id: None }, &mut events);

        assert!(!snapshot(&world, "unit-1").selected);
        assert!(!snapshot(&world, "unit-2").selected);
        assert_eq!(events, vec![Event::SelectionChanged { unit_id: None }]);
    }

    #[test]
    fn selecting_unknown_id_deselects_all() {
        let mut world = World::new();
        select(&mut world, "unit-1");
        select(&mut world, "no-such-id");

        assert!(!snapshot(&world, "unit-1").selected);
        assert!(!snapshot(&world, "unit-2").selected);
        assert_eq!(query::selected_unit(&world), None);
    }

    #[test]
    fn move_order_clamps_target_into_bounds() {
        let mut world = World::new();
        select(&mut world, "unit-1");

        let events = order_selected(&mut world, Vec3::new(1000.0, 5.0, -1000.0));

        let expected = Vec3::ground(26.0, -26.0);
        assert_eq!(snapshot(&world, "unit-1").move_target, Some(expected));
        assert!(snapshot(&world, "unit-2").move_target.is_none());
        assert_eq!(
            events,
            vec![Event::MoveOrdered {
                unit_id: UnitId::new("unit-1"),
                target: expected,
            }]
        );
    }

    #[test]
    fn move_order_without_selection_is_a_no_op() {
        let mut world = World::new();
        let events = order_selected(&mut world, Vec3::ground(3.0, 3.0));

        assert!(events.is_empty());
        assert!(snapshot(&world, "unit-1").move_target.is_none());
        assert!(snapshot(&world, "unit-2").move_target.is_none());
    }

    #[test]
    fn seek_moves_strictly_closer_along_the_direct_line() {
        let mut world = World::new();
        select(&mut world, "unit-1");
        let _ = order_selected(&mut world, Vec3::ground(0.0, 0.0));

        let before = snapshot(&world, "unit-1");
        let target = before.move_target.expect("order should be outstanding");
        let distance_before = before.position.distance_to(target);

        let events = tick(&mut world, Duration::from_millis(100));

        let after = snapshot(&world, "unit-1");
        let distance_after = after.position.distance_to(target);
        assert!(distance_after < distance_before);
        let expected_step = (6.0_f32 * 0.1).min(distance_before);
        assert!((distance_before - distance_after - expected_step).abs() < 1e-5);
        assert!(events.iter().any(|event| matches!(
            event,
            Event::UnitMoved { unit_id, .. } if unit_id == &UnitId::new("unit-1")
        )));
    }

    #[test]
    fn facing_tracks_remaining_target_direction_on_the_ground_plane() {
        let mut world = World::new();
        select(&mut world, "unit-1");
        let _ = order_selected(&mut world, Vec3::ground(0.0, 10.0));

        let _ = tick(&mut world, Duration::from_millis(100));

        let after = snapshot(&world, "unit-1");
        let target = after.move_target.expect("still seeking");
        assert_eq!(after.facing, after.position.horizontal_to(target));
        assert_eq!(after.facing.y, 0.0);
    }

    #[test]
    fn arrival_clears_target_without_snapping_position() {
        let mut world = World::new();
        select(&mut world, "unit-1");
        // Destination within the arrival threshold of the starting position.
        let _ = order_selected(&mut world, Vec3::ground(-4.5, 0.0));

        let before = snapshot(&world, "unit-1");
        let events = tick(&mut world, Duration::from_millis(100));
        let after = snapshot(&world, "unit-1");

        assert!(after.move_target.is_none());
        assert_eq!(after.position, before.position);
        assert_eq!(after.facing, before.facing);
        assert!(events.iter().any(|event| matches!(
            event,
            Event::UnitArrived { unit_id, .. } if unit_id == &UnitId::new("unit-1")
        )));
    }

    #[test]
    fn zero_dt_tick_does_not_move_units() {
        let mut world = World::new();
        select(&mut world, "unit-1");
        let _ = order_selected(&mut world, Vec3::ground(0.0, 0.0));

        let before = snapshot(&world, "unit-1").position;
        let events = tick(&mut world, Duration::ZERO);
        let after = snapshot(&world, "unit-1");

        assert_eq!(after.position, before);
        assert_eq!(after.move_target, Some(Vec3::ground(0.0, 0.0)));
        assert_eq!(events, vec![Event::TimeAdvanced { dt: Duration::ZERO }]);
    }

    #[test]
    fn oversized_step_overshoots_without_clamping_to_target() {
        let mut world = World::new();
        select(&mut world, "unit-1");
        // Target one unit away; a one second tick steps six units.
        let _ = order_selected(&mut world, Vec3::ground(-4.0, 0.0));

        let _ = tick(&mut world, Duration::from_secs(1));

        let after = snapshot(&world, "unit-1");
        assert_eq!(after.position, Vec3::ground(1.0, 0.0));
        assert_eq!(after.move_target, Some(Vec3::ground(-4.0, 0.0)));
        // Facing flips back toward the target left behind.
        assert!(after.facing.x < 0.0);
    }

    #[test]
    fn order_unit_ignores_selection_and_clamps() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::OrderUnit {
                unit_id: UnitId::new("unit-2"),
                target: Vec3::new(-99.0, 3.0, 99.0),
            },
            &mut events,
        );

        let expected = Vec3::ground(-26.0, 26.0);
        assert_eq!(snapshot(&world, "unit-2").move_target, Some(expected));
        assert!(snapshot(&world, "unit-1").move_target.is_none());
        assert_eq!(
            events,
            vec![Event::MoveOrdered {
                unit_id: UnitId::new("unit-2"),
                target: expected,
            }]
        );
    }

    #[test]
    fn order_unit_with_unknown_id_is_a_no_op() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::OrderUnit {
                unit_id: UnitId::new("no-such-id"),
                target: Vec3::ground(1.0, 1.0),
            },
            &mut events,
        );

        assert!(events.is_empty());
        assert!(snapshot(&world, "unit-1").move_target.is_none());
        assert!(snapshot(&world, "unit-2").move_target.is_none());
    }

    #[test]
    fn configured_motion_changes_integration() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureMotion {
                speed: 1.0,
                arrival_threshold: 0.1,
            },
            &mut events,
        );
        select(&mut world, "unit-1");
        let _ = order_selected(&mut world, Vec3::ground(0.0, 0.0));

        let before = snapshot(&world, "unit-1").position;
        let _ = tick(&mut world, Duration::from_secs(1));
        let after = snapshot(&world, "unit-1").position;

        assert!((before.distance_to(after) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn configured_bounds_change_destination_clamping() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureBounds {
                half_extent: 10.0,
                padding: 2.0,
            },
            &mut events,
        );
        select(&mut world, "unit-1");
        let _ = order_selected(&mut world, Vec3::ground(100.0, -100.0));

        assert_eq!(
            snapshot(&world, "unit-1").move_target,
            Some(Vec3::ground(8.0, -8.0))
        );
    }

    #[test]
    fn scripted_scenario_converges_within_tick_budget() {
        let mut world = World::new();
        select(&mut world, "unit-1");
        let _ = order_selected(&mut world, Vec3::ground(0.0, 0.0));

        let mut arrived = false;
        for _ in 0..20 {
            let events = tick(&mut world, Duration::from_millis(100));
            if events
                .iter()
                .any(|event| matches!(event, Event::UnitArrived { .. }))
            {
                arrived = true;
                break;
            }
        }

        assert!(arrived, "unit should arrive within the tick budget");
        let unit = snapshot(&world, "unit-1");
        assert!(unit.move_target.is_none());
        assert!(unit.position.distance_to(Vec3::ZERO) <= 0.6);
    }
}

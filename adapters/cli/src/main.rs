#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Desert Command experience.
//!
//! This binary is the composition root: it builds the authoritative world,
//! optionally attaches the wandering system, and either drives the scripted
//! reference scenario headlessly or hands control to the macroquad backend.

use anyhow::{bail, Result};
use clap::Parser;
use desert_command_core::{Command, Event, UnitId, Vec3};
use desert_command_rendering::{
    heading_from_facing, resolve_pointer_target, unit_color, GroundPresentation, PointerTarget,
    Presentation, RenderingBackend, Scene, UnitPresentation, CLEAR_COLOR,
};
use desert_command_rendering_macroquad::MacroquadBackend;
use desert_command_system_bootstrap::Bootstrap;
use desert_command_system_wandering::Wandering;
use desert_command_world::{self as world, query, World};
use glam::Vec2;
use std::time::Duration;

/// Arguments accepted by the Desert Command launcher.
#[derive(Debug, Parser)]
#[command(name = "desert-command", about = "Minimal RTS prototype")]
struct Args {
    /// Run the scripted reference scenario without opening a window.
    #[arg(long)]
    headless: bool,

    /// Attach the wandering system so idle units roam on their own.
    #[arg(long)]
    wander: bool,

    /// Seed for the wandering system; drawn randomly when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of simulated ticks in headless mode.
    #[arg(long, default_value_t = 200)]
    ticks: u32,

    /// Simulated milliseconds per headless tick.
    #[arg(long, default_value_t = 100)]
    dt_ms: u64,

    /// Draw a frames-per-second readout in the window.
    #[arg(long)]
    show_fps: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let world = World::new();
    let bootstrap = Bootstrap::default();
    println!("{}", bootstrap.welcome_banner(&world));

    let wandering = args.wander.then(|| {
        let seed = args.seed.unwrap_or_else(rand::random);
        println!("wandering with seed {seed}");
        Wandering::with_seed(seed)
    });

    if args.headless {
        run_headless(
            world,
            wandering,
            args.ticks,
            Duration::from_millis(args.dt_ms),
        )
    } else {
        run_windowed(world, wandering, args.show_fps)
    }
}

/// Drives the reference scenario: select `unit-1`, order it to the world
/// center, and tick until it arrives.
fn run_headless(
    mut world: World,
    mut wandering: Option<Wandering>,
    tick_budget: u32,
    dt: Duration,
) -> Result<()> {
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SelectUnit {
            unit_id: Some(UnitId::new("unit-1")),
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::MoveSelectedUnits {
            target: Vec3::ZERO,
        },
        &mut events,
    );
    report_events(0, &events);

    for tick in 1..=tick_budget {
        events.clear();
        world::apply(&mut world, Command::Tick { dt }, &mut events);
        pump_wandering(&mut world, wandering.as_mut(), &mut events);
        report_events(tick, &events);

        let arrived = events.iter().any(|event| {
            matches!(event, Event::UnitArrived { unit_id, .. } if unit_id.as_str() == "unit-1")
        });
        if arrived {
            for unit in query::unit_view(&world).iter() {
                println!(
                    "{} rests at ({:.2}, {:.2})",
                    unit.id.as_str(),
                    unit.position.x,
                    unit.position.z
                );
            }
            return Ok(());
        }
    }

    bail!("unit-1 did not arrive within {tick_budget} ticks");
}

/// Opens the macroquad window and runs the interactive scene.
fn run_windowed(mut world: World, mut wandering: Option<Wandering>, show_fps: bool) -> Result<()> {
    let bounds = query::bounds(&world);
    let ground = GroundPresentation::new(bounds.half_extent(), bounds.padding())?;
    let mut scene = Scene::new(ground, Vec::new());
    populate_scene(&world, &mut scene);

    let presentation = Presentation {
        window_title: String::from("Desert Command"),
        clear_color: CLEAR_COLOR,
        scene: scene.clone(),
    };

    let backend = MacroquadBackend::new().with_vsync(true).with_show_fps(show_fps);
    backend.run(presentation, move |dt, input, scene| {
        let mut events = Vec::new();

        // Resolve the pointer against the scene the player saw last frame.
        if input.primary_action {
            if let Some(cursor_world) = input.cursor_world_space {
                let command = match resolve_pointer_target(scene, cursor_world) {
                    PointerTarget::Unit(unit_id) => Command::SelectUnit {
                        unit_id: Some(unit_id),
                    },
                    PointerTarget::Ground(target) => Command::MoveSelectedUnits { target },
                };
                world::apply(&mut world, command, &mut events);
            }
        }

        world::apply(&mut world, Command::Tick { dt }, &mut events);
        pump_wandering(&mut world, wandering.as_mut(), &mut events);

        populate_scene(&world, scene);
    })
}

/// Lets the wandering system react to this frame's events, applying whatever
/// orders it proposes.
fn pump_wandering(world: &mut World, wandering: Option<&mut Wandering>, events: &mut Vec<Event>) {
    let Some(wandering) = wandering else {
        return;
    };

    let mut commands = Vec::new();
    wandering.handle(
        events,
        &query::unit_view(world),
        query::bounds(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, events);
    }
}

/// Rebuilds the scene's unit list from the authoritative view, keeping the
/// previous heading when a unit's facing has no horizontal component.
fn populate_scene(world: &World, scene: &mut Scene) {
    let view = query::unit_view(world);
    let mut units = Vec::with_capacity(view.len());

    for (index, unit) in view.iter().enumerate() {
        let heading = heading_from_facing(unit.facing).or_else(|| {
            scene
                .units
                .iter()
                .find(|existing| existing.id == unit.id)
                .and_then(|existing| existing.heading_radians)
        });
        units.push(UnitPresentation::new(
            unit.id.clone(),
            Vec2::new(unit.position.x, unit.position.z),
            heading,
            unit.selected,
            unit_color(index),
        ));
    }

    scene.units = units;
}

fn report_events(tick: u32, events: &[Event]) {
    for event in events {
        match event {
            Event::SelectionChanged { unit_id } => match unit_id {
                Some(unit_id) => println!("tick {tick}: selected {}", unit_id.as_str()),
                None => println!("tick {tick}: selection cleared"),
            },
            Event::MoveOrdered { unit_id, target } => println!(
                "tick {tick}: {} ordered to ({:.2}, {:.2})",
                unit_id.as_str(),
                target.x,
                target.z
            ),
            Event::UnitArrived { unit_id, position } => println!(
                "tick {tick}: {} arrived at ({:.2}, {:.2})",
                unit_id.as_str(),
                position.x,
                position.z
            ),
            Event::TimeAdvanced { .. } | Event::UnitMoved { .. } => {}
        }
    }
}

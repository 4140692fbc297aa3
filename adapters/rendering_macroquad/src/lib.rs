#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Desert Command.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature. Consumers that need sound playback can opt back
//! in by enabling `macroquad/audio` in their own `Cargo.toml` dependency
//! specification.
//!
//! The adapter draws the scene top-down: the world's x/z ground plane maps
//! straight onto the screen through the shared [`Camera`]. Input follows the
//! prototype's one-button scheme — the primary press either selects a unit
//! or orders the selection, while middle/right dragging and pointer edge
//! scrolling pan the camera.

mod settings;

pub use settings::ViewerSettings;

use anyhow::{Context, Result};
use desert_command_rendering::{
    Camera, Color, FrameInput, Presentation, RenderingBackend, Scene, SELECTION_GLOW,
    SELECTION_RING_RADIUS, UNIT_BODY_RADIUS,
};
use glam::Vec2;
use macroquad::input::{
    is_key_pressed, is_mouse_button_down, is_mouse_button_pressed, mouse_position, mouse_wheel,
    KeyCode, MouseButton,
};
use std::time::Duration;

const DEFAULT_PIXELS_PER_UNIT: f32 = 14.0;
const ZOOM_STEP: f32 = 1.1;
const BOUNDARY_THICKNESS: f32 = 2.0;
const RING_THICKNESS: f32 = 3.0;
const HEADING_MARK_LENGTH: f32 = 1.6;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the render loop.
    quit_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        Self { quit_requested }
    }
}

/// Direction the camera should edge-scroll for a cursor near the screen rim.
///
/// Returns a component-wise direction in {-1, 0, 1}; zero when the cursor
/// sits inside the threshold band on both axes.
#[must_use]
pub fn edge_pan_direction(cursor: Vec2, screen_size: Vec2, threshold: f32) -> Vec2 {
    let mut direction = Vec2::ZERO;

    if cursor.x <= threshold {
        direction.x -= 1.0;
    } else if cursor.x >= screen_size.x - threshold {
        direction.x += 1.0;
    }

    if cursor.y <= threshold {
        direction.y -= 1.0;
    } else if cursor.y >= screen_size.y - threshold {
        direction.y += 1.0;
    }

    direction
}

#[derive(Clone, Copy, Debug)]
struct DragAnchor {
    cursor: Vec2,
    camera_center: Vec2,
}

#[derive(Clone, Copy, Debug, Default)]
struct DragState {
    anchor: Option<DragAnchor>,
}

impl DragState {
    fn update(&mut self, cursor: Vec2, camera: &Camera) -> Option<Vec2> {
        let pan_held =
            is_mouse_button_down(MouseButton::Middle) || is_mouse_button_down(MouseButton::Right);

        if !pan_held {
            self.anchor = None;
            return None;
        }

        let anchor = self.anchor.get_or_insert(DragAnchor {
            cursor,
            camera_center: camera.center(),
        });

        let delta_screen = cursor - anchor.cursor;
        Some(anchor.camera_center - delta_screen / camera.pixels_per_unit())
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average once a second elapsed.
    fn record_frame(&mut self, dt: Duration) -> Option<f32> {
        self.elapsed += dt;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = if seconds <= f32::EPSILON {
            0.0
        } else {
            self.frames as f32 / seconds
        };
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    settings: Option<ViewerSettings>,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            settings: None,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend draws a frames-per-second readout.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Overrides the viewer settings instead of reading the settings file.
    #[must_use]
    pub fn with_settings(mut self, settings: ViewerSettings) -> Self {
        self.settings = Some(settings);
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            settings,
        } = self;

        let settings = match settings {
            Some(settings) => settings,
            None => ViewerSettings::from_default_path()
                .context("failed to load viewer settings")?
                .unwrap_or_default(),
        };

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut camera = Camera::centered(DEFAULT_PIXELS_PER_UNIT)
            .context("failed to initialise the scene camera")?;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: settings.window_width,
            window_height: settings.window_height,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let background = to_macroquad_color(clear_color);
            let mut scene = scene;
            let mut drag_state = DragState::default();
            let mut fps_counter = FpsCounter::default();
            let mut fps_readout = None;

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_size = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let dt_seconds = macroquad::time::get_frame_time().max(0.0);
                let frame_dt = Duration::from_secs_f32(dt_seconds);

                let (cursor_x, cursor_y) = mouse_position();
                let cursor_screen = Vec2::new(cursor_x, cursor_y);

                let (_, wheel_y) = mouse_wheel();
                if wheel_y > 0.0 {
                    camera.zoom_by(ZOOM_STEP);
                } else if wheel_y < 0.0 {
                    camera.zoom_by(1.0 / ZOOM_STEP);
                }

                if let Some(center) = drag_state.update(cursor_screen, &camera) {
                    camera.look_at(center, &scene.ground);
                } else {
                    let direction =
                        edge_pan_direction(cursor_screen, screen_size, settings.edge_pan_threshold);
                    if direction != Vec2::ZERO {
                        let pan_world = direction * settings.edge_pan_speed * dt_seconds
                            / camera.pixels_per_unit();
                        camera.pan(pan_world, &scene.ground);
                    }
                }

                let dragging = drag_state.anchor.is_some();
                let frame_input = FrameInput {
                    cursor_world_space: Some(camera.screen_to_world(cursor_screen, screen_size)),
                    primary_action: !dragging && is_mouse_button_pressed(MouseButton::Left),
                };

                update_scene(frame_dt, frame_input, &mut scene);

                draw_scene(&scene, &camera, screen_size);

                if show_fps {
                    if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                        fps_readout = Some(per_second);
                    }
                    if let Some(per_second) = fps_readout {
                        macroquad::text::draw_text(
                            &format!("{per_second:.0} fps"),
                            16.0,
                            24.0,
                            20.0,
                            macroquad::color::WHITE,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_scene(scene: &Scene, camera: &Camera, screen_size: Vec2) {
    let ground = &scene.ground;
    let pixels_per_unit = camera.pixels_per_unit();

    let top_left = camera.world_to_screen(
        Vec2::new(-ground.half_extent, -ground.half_extent),
        screen_size,
    );
    let side = 2.0 * ground.half_extent * pixels_per_unit;
    macroquad::shapes::draw_rectangle(
        top_left.x,
        top_left.y,
        side,
        side,
        to_macroquad_color(ground.fill),
    );

    let reach = ground.reachable_extent();
    let boundary_top_left = camera.world_to_screen(Vec2::new(-reach, -reach), screen_size);
    let boundary_side = 2.0 * reach * pixels_per_unit;
    macroquad::shapes::draw_rectangle_lines(
        boundary_top_left.x,
        boundary_top_left.y,
        boundary_side,
        boundary_side,
        BOUNDARY_THICKNESS,
        to_macroquad_color(ground.boundary),
    );

    for unit in &scene.units {
        let center = camera.world_to_screen(unit.position, screen_size);

        if unit.selected {
            macroquad::shapes::draw_circle_lines(
                center.x,
                center.y,
                SELECTION_RING_RADIUS * pixels_per_unit,
                RING_THICKNESS,
                to_macroquad_color(SELECTION_GLOW),
            );
        }

        macroquad::shapes::draw_circle(
            center.x,
            center.y,
            UNIT_BODY_RADIUS * pixels_per_unit,
            to_macroquad_color(unit.color),
        );

        if let Some(heading) = unit.heading_radians {
            let tip = unit.position
                + Vec2::new(heading.cos(), heading.sin()) * UNIT_BODY_RADIUS * HEADING_MARK_LENGTH;
            let tip_screen = camera.world_to_screen(tip, screen_size);
            macroquad::shapes::draw_line(
                center.x,
                center.y,
                tip_screen.x,
                tip_screen.y,
                BOUNDARY_THICKNESS,
                to_macroquad_color(unit.color.lighten(0.4)),
            );
        }
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

//! Solar-system map: fly a ship among orbiting planets.
//!
//! Purely cosmetic; nothing on the map can be reached or collided with.
//! World coordinates put the Sun at the origin with y growing downward, the
//! same way the canvas does, and the camera always centres on the ship.

use crate::canvas::{Canvas, CanvasSet};
use crate::constants::{
    NAV_MAX_ZOOM, NAV_MINIMAP_MARGIN, NAV_MINIMAP_SIZE, NAV_MIN_ZOOM, NAV_SHIP_RADIUS,
    NAV_SHIP_SPEED, NAV_SHIP_START, NAV_SUN_RADIUS, NAV_ZOOM_STEP, WINDOW_TITLE,
};
use crate::levels::{LevelInput, PendingInput};
use crate::menu::GameState;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// One planet on its circular orbit.
#[derive(Debug, Clone, Copy)]
pub struct OrbitingBody {
    pub name: &'static str,
    pub distance: f32,
    pub radius: f32,
    /// Radians per tick.
    pub speed: f32,
    pub color: Color,
}

const fn body(
    name: &'static str,
    distance: f32,
    radius: f32,
    speed: f32,
    rgb: [u8; 3],
) -> OrbitingBody {
    OrbitingBody {
        name,
        distance,
        radius,
        speed,
        color: Color::srgb(
            rgb[0] as f32 / 255.0,
            rgb[1] as f32 / 255.0,
            rgb[2] as f32 / 255.0,
        ),
    }
}

pub const BODIES: [OrbitingBody; 8] = [
    body("Mercury", 1500.0, 20.0, 0.0005, [169, 169, 169]),
    body("Venus", 3000.0, 35.0, 0.0004, [255, 140, 0]),
    body("Earth", 4500.0, 40.0, 0.0003, [0, 0, 255]),
    body("Mars", 6000.0, 30.0, 0.00025, [255, 0, 0]),
    body("Jupiter", 9000.0, 70.0, 0.0002, [255, 165, 0]),
    body("Saturn", 12000.0, 60.0, 0.00015, [210, 180, 140]),
    body("Uranus", 15000.0, 50.0, 0.0001, [0, 255, 255]),
    body("Neptune", 18000.0, 50.0, 0.00008, [0, 0, 128]),
];

const SUN_COLOR: Color = Color::srgb(1.0, 1.0, 0.0);
const MINIMAP_BG: Color = Color::srgb(100.0 / 255.0, 120.0 / 255.0, 140.0 / 255.0);
const MAP_CAPTION: &str = "Space Rangers · Solar System";

/// Ship, zoom and orbit angles of the map.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SolarMap {
    pub ship: Vec2,
    pub zoom: f32,
    pub angles: [f32; BODIES.len()],
    /// Window size the map is drawn into.
    window: Vec2,
}

impl Default for SolarMap {
    fn default() -> Self {
        Self::new(Vec2::new(
            crate::constants::WINDOW_WIDTH as f32,
            crate::constants::WINDOW_HEIGHT as f32,
        ))
    }
}

impl SolarMap {
    pub fn new(window: Vec2) -> Self {
        Self {
            ship: Vec2::from_array(NAV_SHIP_START),
            zoom: 1.0,
            angles: [0.0; BODIES.len()],
            window,
        }
    }

    /// One fixed step: fly, zoom, and advance every orbit.
    pub fn tick(&mut self, input: &LevelInput) {
        let mut step = Vec2::ZERO;
        if input.held(KeyCode::ArrowLeft) {
            step.x -= NAV_SHIP_SPEED;
        }
        if input.held(KeyCode::ArrowRight) {
            step.x += NAV_SHIP_SPEED;
        }
        if input.held(KeyCode::ArrowUp) {
            step.y -= NAV_SHIP_SPEED;
        }
        if input.held(KeyCode::ArrowDown) {
            step.y += NAV_SHIP_SPEED;
        }
        self.ship += step;

        if input.scroll > 0.0 {
            self.zoom = (self.zoom + NAV_ZOOM_STEP).min(NAV_MAX_ZOOM);
        } else if input.scroll < 0.0 {
            self.zoom = (self.zoom - NAV_ZOOM_STEP).max(NAV_MIN_ZOOM);
        }

        for (angle, body) in self.angles.iter_mut().zip(BODIES.iter()) {
            *angle += body.speed;
        }
    }

    /// World position of planet `index` at its current angle.
    pub fn body_position(&self, index: usize) -> Vec2 {
        Vec2::from_angle(self.angles[index]) * BODIES[index].distance
    }

    /// Window position of a world point.
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        self.window / 2.0 + (world - self.ship) * self.zoom
    }

    fn minimap_origin(&self) -> Vec2 {
        Vec2::new(
            self.window.x - NAV_MINIMAP_SIZE - NAV_MINIMAP_MARGIN,
            NAV_MINIMAP_MARGIN,
        )
    }

    /// Window position of a world point on the minimap, scaled so the
    /// outermost orbit touches its edge.
    pub fn to_minimap(&self, world: Vec2) -> Vec2 {
        let outermost = BODIES
            .iter()
            .map(|b| b.distance)
            .fold(0.0_f32, f32::max);
        let scale = NAV_MINIMAP_SIZE / (2.0 * outermost);
        self.minimap_origin() + Vec2::splat(NAV_MINIMAP_SIZE / 2.0) + world * scale
    }

    fn on_screen(&self, at: Vec2, radius: f32) -> bool {
        at.x + radius >= 0.0
            && at.y + radius >= 0.0
            && at.x - radius <= self.window.x
            && at.y - radius <= self.window.y
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        canvas.fill_rect(0.0, 0.0, self.window.x, self.window.y, Color::BLACK);

        let sun = self.to_screen(Vec2::ZERO);
        let sun_radius = NAV_SUN_RADIUS * self.zoom;
        if self.on_screen(sun, sun_radius) {
            canvas.fill_circle(sun, sun_radius, SUN_COLOR);
        }
        for (i, body) in BODIES.iter().enumerate() {
            let at = self.to_screen(self.body_position(i));
            let radius = body.radius * self.zoom;
            if self.on_screen(at, radius) {
                canvas.fill_circle(at, radius, body.color);
            }
        }
        canvas.fill_circle(self.window / 2.0, NAV_SHIP_RADIUS * self.zoom, Color::WHITE);

        // Minimap
        let origin = self.minimap_origin();
        canvas.fill_rect(origin.x, origin.y, NAV_MINIMAP_SIZE, NAV_MINIMAP_SIZE, MINIMAP_BG);
        canvas.fill_circle(self.to_minimap(Vec2::ZERO), 5.0, SUN_COLOR);
        for (i, body) in BODIES.iter().enumerate() {
            let dot = (body.radius / 10.0).floor().max(1.0);
            canvas.fill_circle(self.to_minimap(self.body_position(i)), dot, body.color);
        }
        let ship = self.to_minimap(self.ship);
        let bounds = Rect::from_corners(origin, origin + Vec2::splat(NAV_MINIMAP_SIZE));
        if bounds.contains(ship) {
            canvas.fill_circle(ship, 3.0, Color::WHITE);
        }

        canvas.text(
            format!("Zoom: {:.1}x", self.zoom),
            Vec2::new(10.0, 10.0),
            22.0,
            Color::WHITE,
        );
        canvas.text(
            "Arrows fly  ·  wheel zooms  ·  ESC main menu",
            Vec2::new(10.0, self.window.y - 34.0),
            20.0,
            Color::srgb(0.6, 0.6, 0.7),
        );
    }
}

pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SolarMap>()
            .add_systems(OnEnter(GameState::Navigation), enter_navigation)
            .add_systems(
                FixedUpdate,
                tick_navigation.run_if(in_state(GameState::Navigation)),
            )
            .add_systems(
                Update,
                (
                    navigation_back.run_if(in_state(GameState::Navigation)),
                    draw_navigation
                        .in_set(CanvasSet::Draw)
                        .run_if(in_state(GameState::Navigation)),
                ),
            )
            .add_systems(OnExit(GameState::Navigation), leave_navigation);
    }
}

pub fn enter_navigation(
    mut map: ResMut<SolarMap>,
    mut pending: ResMut<PendingInput>,
    config: Res<crate::config::GameConfig>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    *map = SolarMap::new(config.window_size());
    pending.reset();
    if let Ok(mut window) = windows.single_mut() {
        window.title = MAP_CAPTION.to_string();
    }
    info!("Solar-system map opened at {:?}", map.ship);
}

pub fn tick_navigation(mut map: ResMut<SolarMap>, mut pending: ResMut<PendingInput>) {
    let input = pending.take();
    map.tick(&input);
}

/// ESC or BACKSPACE returns to the title screen.
pub fn navigation_back(
    keys: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keys.any_just_pressed([KeyCode::Escape, KeyCode::Backspace]) {
        next_state.set(GameState::MainMenu);
    }
}

pub fn draw_navigation(map: Res<SolarMap>, mut canvas: ResMut<Canvas>) {
    map.draw(&mut canvas);
}

pub fn leave_navigation(mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = windows.single_mut() {
        window.title = WINDOW_TITLE.to_string();
    }
}

pub mod camera;
pub mod config;
pub mod detector;
pub mod error;
pub mod grid;
pub mod hud;
pub mod life;
pub mod shape;
pub mod state;

pub use error::{Error, Result};

pub mod prelude {
    use bevy::{color::Color, math::Vec2};

    pub const GRID_WIDTH: usize = 80;
    pub const GRID_HEIGHT: usize = 60;
    pub const SEED_DENSITY: f32 = 0.3;
    pub const SHAPES_DIR: &str = "assets/shapes";

    /// one generation every 6 frames at 60 Hz
    pub const GENERATION_INTERVAL_MS: u64 = 100;
    pub const BG_COLOR: Color = Color::BLACK;

    pub const BOARD_POS: Vec2 = Vec2::ZERO;
    pub const BORDER_WIDTH_PX: f32 = 2.0;
    pub const BORDER_COLOR: Color = Color::WHITE;

    pub const CELL_SIZE_PX: Vec2 = Vec2::splat(10.0);
    pub const CELL_SCALE: Vec2 = Vec2::splat(0.9);
    pub const CELL_ALIVE_COLOR: Color = Color::srgb(0.0, 0.89, 0.19);
    pub const CELL_DEAD_COLOR: Color = Color::srgb(0.04, 0.04, 0.04);

    pub const TITLE_COLOR: Color = Color::srgb(0.0, 0.89, 0.19);
    pub const TIMER_COLOR: Color = Color::srgb(0.99, 0.98, 0.0);
    pub const HINT_COLOR: Color = Color::srgb(0.51, 0.51, 0.51);
}

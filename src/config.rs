//! Runtime settings: compile-time defaults from [`crate::prelude`], overridable
//! through `BITBLOOM_*` environment variables.

use std::{fmt::Display, path::PathBuf, str::FromStr};

use bevy::{log::warn, prelude::Resource};

use crate::prelude::*;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Settings {
    pub grid_width: usize,
    pub grid_height: usize,
    /// probability of a cell starting alive in a new game
    pub density: f32,
    pub shapes_dir: PathBuf,
    /// fixed RNG seed, random when `None`
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            density: SEED_DENSITY,
            shapes_dir: PathBuf::from(SHAPES_DIR),
            seed: None,
        }
    }
}

impl Settings {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `BITBLOOM_*` key.
    /// Values that do not parse, or zero grid dimensions, keep the default.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(width) = parse_var(&lookup, "BITBLOOM_GRID_WIDTH") {
            settings.grid_width = nonzero("BITBLOOM_GRID_WIDTH", width, settings.grid_width);
        }
        if let Some(height) = parse_var(&lookup, "BITBLOOM_GRID_HEIGHT") {
            settings.grid_height = nonzero("BITBLOOM_GRID_HEIGHT", height, settings.grid_height);
        }
        if let Some(density) = parse_var(&lookup, "BITBLOOM_DENSITY") {
            settings.density = density;
        }
        if let Some(dir) = lookup("BITBLOOM_SHAPES_DIR") {
            settings.shapes_dir = PathBuf::from(dir);
        }
        settings.seed = parse_var(&lookup, "BITBLOOM_SEED");

        settings
    }

    /// RNG for seeding new games, deterministic when a seed is configured.
    pub fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("ignoring {key}={raw:?}: {err}");
            None
        }
    }
}

fn nonzero(key: &str, value: usize, default: usize) -> usize {
    if value == 0 {
        warn!("ignoring {key}=0, keeping {default}");
        default
    } else {
        value
    }
}

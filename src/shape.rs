//! Named boolean masks with an attachable reaction.

use std::{fmt, path::Path};

use bevy::{math::IVec2, utils::synccell::SyncCell};

use crate::error::{Error, Result};

/// Behaviour invoked with the center of a matched shape.
///
/// Any `FnMut(IVec2)` closure that can be sent across threads is a reaction.
pub trait Reaction: Send {
    fn react(&mut self, center: IVec2);
}

impl<F> Reaction for F
where
    F: FnMut(IVec2) + Send,
{
    fn react(&mut self, center: IVec2) {
        self(center)
    }
}

/// An immutable rectangular pattern of live and dead cells.
pub struct Shape {
    name: String,
    width: usize,
    height: usize,
    /// row-major, `width * height` cells
    mask: Vec<bool>,
    /// only ever run through `&mut self`, so it need not be `Sync`
    reaction: Option<SyncCell<Box<dyn Reaction>>>,
}

impl Shape {
    /// Builds a shape from mask rows. Height is the row count, width the length of the
    /// first row; no rows at all gives a 0x0 shape.
    ///
    /// Every row must have the same length as the first one.
    pub fn new(name: impl Into<String>, rows: Vec<Vec<bool>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != width)
        {
            return Err(Error::RaggedMask {
                row,
                expected: width,
                found,
            });
        }

        Ok(Self {
            name: name.into(),
            width,
            height,
            mask: rows.into_iter().flatten().collect(),
            reaction: None,
        })
    }

    /// Parses the plain text shape format.
    ///
    /// The first line is the display name. Every following line is a row made of its
    /// `0` (dead) and `1` (alive) characters; all other characters are dropped. Lines
    /// without any `0`/`1` are skipped.
    pub fn from_text(source: &str) -> Result<Self> {
        let mut lines = source.lines();
        let name = lines.next().unwrap_or_default().trim();

        let rows: Vec<Vec<bool>> = lines
            .map(|line| {
                line.chars()
                    .filter_map(|c| match c {
                        '0' => Some(false),
                        '1' => Some(true),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
            })
            .filter(|row| !row.is_empty())
            .collect();

        if rows.is_empty() {
            return Err(Error::EmptyShape);
        }
        Self::new(name, rows)
    }

    /// Reads and parses a shape source file. Bytes that are not valid UTF-8 are
    /// replaced rather than rejected; they never count as cells anyway.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_text(&String::from_utf8_lossy(&bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Reads a mask cell, `false` outside the mask.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) if x < self.width && y < self.height => self.mask[y * self.width + x],
            _ => false,
        }
    }

    /// Replaces the current reaction, if any.
    pub fn attach_reaction(&mut self, reaction: impl Reaction + 'static) {
        self.reaction = Some(SyncCell::new(Box::new(reaction)));
    }

    pub fn has_reaction(&self) -> bool {
        self.reaction.is_some()
    }

    /// Runs the reaction with `center`. Does nothing when none is attached.
    pub fn trigger(&mut self, center: IVec2) {
        if let Some(reaction) = self.reaction.as_mut() {
            reaction.get().react(center);
        }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("reaction", &self.has_reaction())
            .finish()
    }
}

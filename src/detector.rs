//! Exhaustive sliding-window search for registered shapes.

use std::path::Path;

use bevy::{
    log::debug,
    math::{ivec2, IVec2},
};

use crate::{grid::Grid, shape::Shape};

/// Ordered registry of shapes, scanned against a [`Grid`].
///
/// Registry order is the order reactions fire in; within a shape, anchors are
/// visited row by row.
#[derive(Debug, Default)]
pub struct ShapeDetector {
    shapes: Vec<Shape>,
}

impl ShapeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every regular file in `dir` that parses as a shape and returns how many
    /// were added. Subdirectories are not descended into; files that fail to load are
    /// skipped. Entries are visited in file name order.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> usize {
        let dir = dir.as_ref();
        let mut paths = match std::fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file())
                .collect::<Vec<_>>(),
            Err(err) => {
                debug!("cannot read shape directory {}: {err}", dir.display());
                return 0;
            }
        };
        paths.sort();

        let before = self.shapes.len();
        for path in paths {
            match Shape::load(&path) {
                Ok(shape) => {
                    debug!("loaded shape {:?} from {}", shape.name(), path.display());
                    self.shapes.push(shape);
                }
                Err(err) => debug!("skipping {}: {err}", path.display()),
            }
        }
        self.shapes.len() - before
    }

    /// Appends a shape. `None` is ignored.
    pub fn add(&mut self, shape: impl Into<Option<Shape>>) {
        if let Some(shape) = shape.into() {
            self.shapes.push(shape);
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }

    /// First registered shape with the given display name.
    pub fn shape_mut(&mut self, name: &str) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|shape| shape.name() == name)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Whether every cell of `shape`, anchored with its top-left corner at `(x, y)`,
    /// equals the grid cell underneath. Dead mask cells must be dead in the grid too.
    pub fn matches_at(grid: &Grid, shape: &Shape, x: i32, y: i32) -> bool {
        let (width, height) = (shape.width() as i32, shape.height() as i32);

        (0..height)
            .flat_map(|sy| (0..width).map(move |sx| ivec2(sx, sy)))
            .all(|s| {
                // coordinates past i32 are off the grid, hence dead
                let alive = x
                    .checked_add(s.x)
                    .zip(y.checked_add(s.y))
                    .is_some_and(|(gx, gy)| grid.get(gx, gy));
                alive == shape.get(s.x, s.y)
            })
    }

    /// Scans every shape over every anchor where it fits inside `grid` and triggers
    /// its reaction with the match center at each hit. Overlapping hits all fire.
    ///
    /// Returns the number of matches.
    pub fn detect_and_trigger(&mut self, grid: &Grid) -> usize {
        let mut matches = 0;

        for shape in self.shapes.iter_mut() {
            let (Some(max_x), Some(max_y)) = (
                grid.width().checked_sub(shape.width()),
                grid.height().checked_sub(shape.height()),
            ) else {
                continue;
            };
            let half = IVec2::new(shape.width() as i32 / 2, shape.height() as i32 / 2);

            for y in 0..=max_y as i32 {
                for x in 0..=max_x as i32 {
                    if Self::matches_at(grid, shape, x, y) {
                        shape.trigger(ivec2(x, y) + half);
                        matches += 1;
                    }
                }
            }
        }

        if matches > 0 {
            debug!("shape scan found {matches} matches");
        }
        matches
    }
}

#[cfg(test)]
mod test {
    use std::{
        fs,
        sync::{Arc, Mutex},
    };

    use super::*;

    type Hits = Arc<Mutex<Vec<(String, IVec2)>>>;

    fn recording(name: &str, rows: Vec<Vec<bool>>, hits: &Hits) -> Shape {
        let mut shape = Shape::new(name, rows).unwrap();
        let hits = hits.clone();
        let label = name.to_string();
        shape.attach_reaction(move |center: IVec2| {
            hits.lock().unwrap().push((label.clone(), center));
        });
        shape
    }

    fn grid_with(width: usize, height: usize, alive: &[(i32, i32)]) -> Grid {
        let mut grid = Grid::new(width, height).unwrap();
        for &(x, y) in alive {
            grid.set(x, y, true);
        }
        grid
    }

    fn centers(hits: &Hits) -> Vec<IVec2> {
        hits.lock().unwrap().iter().map(|(_, c)| *c).collect()
    }

    #[test]
    fn single_cell_matches_only_live_cells() {
        let hits = Hits::default();
        let mut detector = ShapeDetector::new();
        detector.add(recording("dot", vec![vec![true]], &hits));

        let grid = grid_with(4, 3, &[(1, 0), (3, 2)]);
        assert_eq!(2, detector.detect_and_trigger(&grid));
        assert_eq!(vec![ivec2(1, 0), ivec2(3, 2)], centers(&hits));
    }

    #[test]
    fn dead_mask_cells_must_be_dead() {
        let shape = Shape::new("void", vec![vec![false; 2]; 2]).unwrap();
        let grid = grid_with(4, 4, &[(3, 3)]);

        assert!(ShapeDetector::matches_at(&grid, &shape, 0, 0));
        assert!(ShapeDetector::matches_at(&grid, &shape, 1, 1));
        assert!(!ShapeDetector::matches_at(&grid, &shape, 2, 2));
        assert!(!ShapeDetector::matches_at(&grid, &shape, 2, 3));
    }

    #[test]
    fn live_mask_cells_must_be_alive() {
        let shape = Shape::new("pair", vec![vec![true, true]]).unwrap();
        let grid = grid_with(3, 1, &[(0, 0)]);
        assert!(!ShapeDetector::matches_at(&grid, &shape, 0, 0));
    }

    #[test]
    fn anchors_at_coordinate_limits_read_dead() {
        let grid = grid_with(4, 4, &[(0, 0)]);
        let void = Shape::new("void", vec![vec![false; 2]]).unwrap();
        let pair = Shape::new("pair", vec![vec![true; 2]]).unwrap();
        let column = Shape::new("column", vec![vec![false]; 2]).unwrap();

        assert!(ShapeDetector::matches_at(&grid, &void, i32::MAX, 0));
        assert!(!ShapeDetector::matches_at(&grid, &pair, i32::MAX, 0));
        assert!(ShapeDetector::matches_at(&grid, &column, 0, i32::MAX));
        assert!(ShapeDetector::matches_at(&grid, &void, i32::MIN, i32::MIN));
    }

    #[test]
    fn centers_use_floor_division() {
        let hits = Hits::default();
        let mut detector = ShapeDetector::new();
        // lone 3x3 pattern with only its middle alive
        let mut rows = vec![vec![false; 3]; 3];
        rows[1][1] = true;
        detector.add(recording("pip", rows, &hits));
        detector.detect_and_trigger(&grid_with(3, 3, &[(1, 1)]));
        assert_eq!(vec![ivec2(1, 1)], centers(&hits));

        let hits = Hits::default();
        let mut detector = ShapeDetector::new();
        detector.add(recording("block", vec![vec![true; 2]; 2], &hits));
        let grid = grid_with(8, 8, &[(5, 5), (6, 5), (5, 6), (6, 6)]);
        detector.detect_and_trigger(&grid);
        assert_eq!(vec![ivec2(6, 6)], centers(&hits));
    }

    #[test]
    fn oversized_shape_never_fires() {
        let hits = Hits::default();
        let mut detector = ShapeDetector::new();
        detector.add(recording("wide", vec![vec![false; 5]], &hits));
        detector.add(recording("tall", vec![vec![false]; 4], &hits));

        let grid = grid_with(4, 3, &[]);
        assert_eq!(0, detector.detect_and_trigger(&grid));
        assert!(hits.lock().unwrap().is_empty());
    }

    #[test]
    fn fires_in_registry_then_row_major_order() {
        let hits = Hits::default();
        let mut detector = ShapeDetector::new();
        detector.add(recording("dot", vec![vec![true]], &hits));
        detector.add(recording("hole", vec![vec![false]], &hits));

        let grid = grid_with(2, 2, &[(1, 0), (0, 1)]);
        detector.detect_and_trigger(&grid);

        let got = hits.lock().unwrap().clone();
        let expected = [
            ("dot", ivec2(1, 0)),
            ("dot", ivec2(0, 1)),
            ("hole", ivec2(0, 0)),
            ("hole", ivec2(1, 1)),
        ]
        .map(|(name, c)| (name.to_string(), c));
        assert_eq!(expected.to_vec(), got);
    }

    #[test]
    fn overlapping_matches_all_fire() {
        let hits = Hits::default();
        let mut detector = ShapeDetector::new();
        detector.add(recording("void", vec![vec![false; 2]; 2], &hits));
        detector.add(recording("single", vec![vec![false]], &hits));

        let grid = grid_with(3, 2, &[]);
        assert_eq!(2 + 6, detector.detect_and_trigger(&grid));
        assert_eq!(8, hits.lock().unwrap().len());
    }

    #[test]
    fn unreacting_shapes_still_count_matches() {
        let mut detector = ShapeDetector::new();
        detector.add(Shape::new("dot", vec![vec![true]]).unwrap());
        assert_eq!(1, detector.detect_and_trigger(&grid_with(2, 2, &[(0, 0)])));
    }

    #[test]
    fn add_ignores_none() {
        let mut detector = ShapeDetector::new();
        detector.add(None::<Shape>);
        assert!(detector.is_empty());
        detector.add(Shape::from_text("dot\n1").ok());
        detector.add(Shape::from_text("nothing\n").ok());
        assert_eq!(1, detector.len());
    }

    #[test]
    fn shape_mut_finds_by_name() {
        let mut detector = ShapeDetector::new();
        detector.add(Shape::new("dot", vec![vec![true]]).unwrap());
        detector.add(Shape::new("block", vec![vec![true; 2]; 2]).unwrap());

        let block = detector.shape_mut("block").unwrap();
        block.attach_reaction(|_: IVec2| {});
        assert!(detector.shapes()[1].has_reaction());
        assert!(detector.shape_mut("glider").is_none());
    }

    #[test]
    fn load_dir_keeps_parseable_files_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b_block"), "Block\n11\n11\n").unwrap();
        fs::write(dir.path().join("a_blinker.txt"), "Blinker\n111\n").unwrap();
        fs::write(dir.path().join("c_empty"), "Nothing here\n\n  \n").unwrap();
        fs::write(dir.path().join("d_ragged"), "Ragged\n11\n1\n").unwrap();
        fs::create_dir(dir.path().join("e_nested")).unwrap();
        fs::write(dir.path().join("e_nested").join("glider"), "Glider\n010\n001\n111\n").unwrap();

        let mut detector = ShapeDetector::new();
        assert_eq!(2, detector.load_dir(dir.path()));
        let names: Vec<_> = detector.shapes().iter().map(Shape::name).collect();
        assert_eq!(vec!["Blinker", "Block"], names);
    }

    #[test]
    fn load_dir_on_missing_directory_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut detector = ShapeDetector::new();
        assert_eq!(0, detector.load_dir(dir.path().join("missing")));
        assert!(detector.is_empty());
    }
}

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use bevy::math::{ivec2, IVec2};
use bitbloom::{detector::ShapeDetector, grid::Grid, shape::Shape};

fn shapes_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/shapes")
}

fn loaded_detector() -> ShapeDetector {
    let mut detector = ShapeDetector::new();
    assert_eq!(4, detector.load_dir(shapes_dir()));
    detector
}

#[test]
fn loads_every_shipped_shape_in_file_order() {
    let detector = loaded_detector();
    let names: Vec<_> = detector.shapes().iter().map(Shape::name).collect();
    assert_eq!(vec!["Beehive", "Blinker", "Block", "Glider"], names);
    assert!(detector.shapes().iter().all(|shape| !shape.has_reaction()));
}

#[test]
fn glider_is_spotted_again_after_a_full_period() {
    let mut detector = loaded_detector();
    let hits: Arc<Mutex<Vec<IVec2>>> = Arc::default();
    let sink = hits.clone();
    detector
        .shape_mut("Glider")
        .unwrap()
        .attach_reaction(move |center: IVec2| sink.lock().unwrap().push(center));

    let mut grid = Grid::new(16, 16).unwrap();
    for (x, y) in [(2, 1), (3, 2), (1, 3), (2, 3), (3, 3)] {
        grid.set(x + 2, y + 2, true);
    }

    detector.detect_and_trigger(&grid);
    for _ in 0..4 {
        grid.advance();
    }
    detector.detect_and_trigger(&grid);

    assert_eq!(vec![ivec2(4, 4), ivec2(5, 5)], *hits.lock().unwrap());
}

#[test]
fn blinker_only_matches_its_horizontal_phase() {
    let mut detector = loaded_detector();
    let hits: Arc<Mutex<Vec<IVec2>>> = Arc::default();
    let sink = hits.clone();
    detector
        .shape_mut("Blinker")
        .unwrap()
        .attach_reaction(move |center: IVec2| sink.lock().unwrap().push(center));

    let mut grid = Grid::new(9, 9).unwrap();
    for x in 3..=5 {
        grid.set(x, 4, true);
    }

    for _ in 0..3 {
        detector.detect_and_trigger(&grid);
        grid.advance();
    }

    assert_eq!(vec![ivec2(4, 4), ivec2(4, 4)], *hits.lock().unwrap());
}

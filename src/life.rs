use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use bevy::{
    ecs::system::SystemState,
    input::common_conditions::input_just_pressed,
    math::{uvec2, vec2},
    picking::pointer::PointerButton,
    prelude::*,
};

use crate::{
    config::Settings,
    detector::ShapeDetector,
    grid::Grid,
    prelude::*,
    shape::Reaction,
    state::GameState,
};

pub struct LifePlugin;

impl Plugin for LifePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Session>()
            .init_resource::<SightingSink>()
            .add_event::<ShapeSpotted>()
            .insert_resource(Time::<Fixed>::from_duration(Duration::from_millis(
                GENERATION_INTERVAL_MS,
            )))
            .add_systems(
                OnEnter(GameState::Load),
                (load_meshes_and_materials, load_cell_board, load_shapes).chain(),
            )
            .add_systems(OnEnter(GameState::Menu), clear_grid)
            .add_systems(OnEnter(GameState::Running), start_new_game)
            .add_systems(
                FixedUpdate,
                (advance_generation, detect_shapes)
                    .chain()
                    .run_if(in_state(GameState::Running)),
            )
            .add_systems(
                Update,
                (
                    (tick_session, check_extinction)
                        .chain()
                        .run_if(in_state(GameState::Running)),
                    tally_sightings,
                    paint_cells.run_if(resource_changed::<Life>),
                    start_game.run_if(
                        input_just_pressed(KeyCode::Enter)
                            .and(in_state(GameState::Menu).or(in_state(GameState::Won))),
                    ),
                    back_to_menu.run_if(
                        input_just_pressed(KeyCode::Escape)
                            .and(in_state(GameState::Running).or(in_state(GameState::Won))),
                    ),
                    quit_game.run_if(
                        input_just_pressed(KeyCode::Escape).and(in_state(GameState::Menu)),
                    ),
                ),
            );
    }
}

// ——> SYSTEMS

/// initialize board geometry, cell meshes and materials
fn load_meshes_and_materials(
    world: &mut World,
    params: &mut SystemState<(
        ResMut<Assets<Mesh>>,
        ResMut<Assets<ColorMaterial>>,
        Res<Life>,
    )>,
) {
    let (mut meshes, mut materials, life) = params.get_mut(world);
    let board = Board::new(uvec2(life.grid.width() as u32, life.grid.height() as u32));

    let cell_materials = CellMaterials {
        cell: meshes.add(Rectangle::from_size(board.cell_size)),
        border_vert: meshes.add(Rectangle::new(
            BORDER_WIDTH_PX,
            board.pixel_size().y + 2.0 * BORDER_WIDTH_PX,
        )),
        border_horiz: meshes.add(Rectangle::new(
            board.pixel_size().x + 2.0 * BORDER_WIDTH_PX,
            BORDER_WIDTH_PX,
        )),
        border: materials.add(ColorMaterial::from_color(BORDER_COLOR)),
        alive: materials.add(ColorMaterial::from_color(CELL_ALIVE_COLOR)),
        dead: materials.add(ColorMaterial::from_color(CELL_DEAD_COLOR)),
    };

    world.insert_resource(board);
    world.insert_resource(cell_materials);
}

/// spawn one entity per grid cell plus the board border
fn load_cell_board(
    world: &mut World,
    params: &mut SystemState<(Res<CellMaterials>, Res<Board>)>,
) {
    let (mats, board) = params.get_mut(world);
    let board = *board;
    let mats = (*mats).clone();

    let cells_to_spawn = (0..board.size.y)
        .flat_map(|y| (0..board.size.x).map(move |x| uvec2(x, y)))
        .map(|cell_coord| {
            (
                Cell,
                CellCoord(cell_coord),
                Mesh2d(mats.cell.clone()),
                MeshMaterial2d(mats.dead.clone()),
                Transform::from_translation(board.cell_coord_to_translation(cell_coord))
                    .with_scale(board.cell_scale.extend(1.0)),
            )
        })
        .collect::<Vec<_>>();
    world.spawn_batch(cells_to_spawn);

    // cell placement, by clicking or by dragging across cells
    world.add_observer(place_cell_on_press);
    world.add_observer(place_cell_on_drag);

    let half = board.pixel_size() * 0.5 + Vec2::splat(BORDER_WIDTH_PX * 0.5);
    let borders = [
        (mats.border_vert.clone(), vec2(-half.x, 0.0)),
        (mats.border_vert.clone(), vec2(half.x, 0.0)),
        (mats.border_horiz.clone(), vec2(0.0, half.y)),
        (mats.border_horiz.clone(), vec2(0.0, -half.y)),
    ]
    .map(|(mesh, offset)| {
        (
            Border,
            Mesh2d(mesh),
            MeshMaterial2d(mats.border.clone()),
            Transform::from_translation((board.center + offset).extend(0.0)),
        )
    });
    world.spawn_batch(borders);
}

/// load shape sources and make every shape report its sightings
fn load_shapes(
    mut life: ResMut<Life>,
    settings: Res<Settings>,
    sink: Res<SightingSink>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let loaded = life.detector.load_dir(&settings.shapes_dir);
    if loaded == 0 {
        warn!("no shapes found in {}", settings.shapes_dir.display());
    } else {
        info!("loaded {loaded} shapes from {}", settings.shapes_dir.display());
    }

    for shape in life.detector.shapes_mut() {
        let reaction = sink.reaction_for(shape.name());
        shape.attach_reaction(reaction);
    }

    next_state.set(GameState::Menu);
}

fn place_cell_on_press(
    trigger: Trigger<Pointer<Down>>,
    cells: Query<&CellCoord, With<Cell>>,
    life: ResMut<Life>,
    state: Res<State<GameState>>,
) {
    if trigger.event().button == PointerButton::Primary {
        place_cell(trigger.entity(), cells, life, state);
    }
}

fn place_cell_on_drag(
    trigger: Trigger<Pointer<DragOver>>,
    cells: Query<&CellCoord, With<Cell>>,
    life: ResMut<Life>,
    state: Res<State<GameState>>,
) {
    if trigger.event().button == PointerButton::Primary {
        place_cell(trigger.entity(), cells, life, state);
    }
}

fn place_cell(
    entity: Entity,
    cells: Query<&CellCoord, With<Cell>>,
    mut life: ResMut<Life>,
    state: Res<State<GameState>>,
) {
    if matches!(state.get(), GameState::Running) {
        if let Ok(coord) = cells.get(entity) {
            life.grid.set(coord.x as i32, coord.y as i32, true);
        }
    }
}

fn clear_grid(mut life: ResMut<Life>) {
    life.grid.clear();
}

fn start_new_game(mut life: ResMut<Life>, settings: Res<Settings>, mut session: ResMut<Session>) {
    let Life { grid, rng, .. } = &mut *life;
    grid.clear();
    grid.seed_random(rng, settings.density);
    *session = Session::default();
    info!("new game with {} live cells", grid.alive_count());
}

fn advance_generation(mut life: ResMut<Life>) {
    life.grid.advance();
}

fn detect_shapes(
    mut life: ResMut<Life>,
    sink: Res<SightingSink>,
    mut spotted: EventWriter<ShapeSpotted>,
) {
    let Life { grid, detector, .. } = &mut *life;
    detector.detect_and_trigger(grid);
    spotted.send_batch(sink.drain());
}

fn tick_session(time: Res<Time>, mut session: ResMut<Session>) {
    session.elapsed += time.delta_secs();
}

fn check_extinction(
    life: Res<Life>,
    mut session: ResMut<Session>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if life.grid.alive_count() == 0 {
        session.final_time = session.elapsed;
        info!("all cells eliminated after {:.2}s", session.final_time);
        next_state.set(GameState::Won);
    }
}

fn tally_sightings(mut spotted: EventReader<ShapeSpotted>, mut session: ResMut<Session>) {
    for sighting in spotted.read() {
        debug!("spotted {} at {}", sighting.shape, sighting.center);
        session.spotted += 1;
    }
}

fn paint_cells(
    life: Res<Life>,
    mats: Res<CellMaterials>,
    mut cells: Query<(&CellCoord, &mut MeshMaterial2d<ColorMaterial>), With<Cell>>,
) {
    for (coord, mut material) in cells.iter_mut() {
        let target = if life.grid.get(coord.x as i32, coord.y as i32) {
            &mats.alive
        } else {
            &mats.dead
        };
        if material.0 != *target {
            material.0 = target.clone();
        }
    }
}

fn start_game(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::Running);
}

fn back_to_menu(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::Menu);
}

fn quit_game(mut exit: EventWriter<AppExit>) {
    info!("leaving BitBloom");
    exit.send(AppExit::Success);
}

// ——> COMPONENTS

#[derive(Component)]
#[require(CellCoord, Mesh2d)]
struct Cell;

#[derive(Component, Debug, Default, Clone, Copy, Deref)]
struct CellCoord(UVec2);

#[derive(Component)]
#[require(Mesh2d)]
struct Border;

// ——> EVENTS

/// A registered shape was found on the board during a scan.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ShapeSpotted {
    pub shape: String,
    /// match center in grid coordinates
    pub center: IVec2,
}

// ——> RESOURCES

/// The simulation state: the cell field, the shapes scanned against it and the
/// random source used to seed new games.
#[derive(Resource)]
pub struct Life {
    pub grid: Grid,
    pub detector: ShapeDetector,
    rng: fastrand::Rng,
}

impl Life {
    pub fn new(settings: &Settings) -> crate::Result<Self> {
        Ok(Self {
            grid: Grid::new(settings.grid_width, settings.grid_height)?,
            detector: ShapeDetector::new(),
            rng: settings.rng(),
        })
    }
}

/// Per-game bookkeeping shown on the HUD.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct Session {
    /// seconds played in the current game
    pub elapsed: f32,
    /// `elapsed` at the moment the board went extinct
    pub final_time: f32,
    pub spotted: u32,
}

/// Collects sightings from shape reactions until the next drain.
#[derive(Resource, Clone, Default)]
struct SightingSink(Arc<Mutex<Vec<ShapeSpotted>>>);

impl SightingSink {
    fn reaction_for(&self, shape: &str) -> impl Reaction + 'static {
        let sink = self.0.clone();
        let shape = shape.to_string();
        move |center: IVec2| {
            if let Ok(mut sightings) = sink.lock() {
                sightings.push(ShapeSpotted {
                    shape: shape.clone(),
                    center,
                });
            }
        }
    }

    fn drain(&self) -> Vec<ShapeSpotted> {
        self.0
            .lock()
            .map(|mut sightings| std::mem::take(&mut *sightings))
            .unwrap_or_default()
    }
}

/// hold handles for meshes and materials
#[derive(Resource, Clone)]
struct CellMaterials {
    cell: Handle<Mesh>,
    border_vert: Handle<Mesh>,
    border_horiz: Handle<Mesh>,
    border: Handle<ColorMaterial>,
    alive: Handle<ColorMaterial>,
    dead: Handle<ColorMaterial>,
}

#[derive(Resource, Clone, Copy)]
struct Board {
    /// the center of the board
    center: Vec2,
    /// the amount of cells on each axis
    size: UVec2,
    /// the size of each individual cell
    cell_size: Vec2,
    /// scale of each individual cell (should be 0.0 - 1.0)
    cell_scale: Vec2,
}

impl Board {
    fn new(size: UVec2) -> Self {
        Self {
            center: BOARD_POS,
            size,
            cell_size: CELL_SIZE_PX,
            cell_scale: CELL_SCALE,
        }
    }

    /// computes full size of the board in pixels
    #[inline]
    fn pixel_size(&self) -> Vec2 {
        self.size.as_vec2() * self.cell_size
    }

    /// Grid rows grow downwards, world y grows upwards.
    #[inline]
    fn cell_coord_to_translation(&self, cell_coord: UVec2) -> Vec3 {
        let top_left = self.center + self.pixel_size() * vec2(-0.5, 0.5);
        let offset = (cell_coord.as_vec2() * self.cell_size + self.cell_size * 0.5) * vec2(1.0, -1.0);
        (top_left + offset).extend(10.0)
    }
}

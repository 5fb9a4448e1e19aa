use bevy::{math::vec2, prelude::*, window::PrimaryWindow};
use bevy_pancam::{PanCam, PanCamPlugin};

use crate::{config::Settings, prelude::*, state::GameState};

/// room around the board for the HUD rows
const UI_MARGIN_PX: Vec2 = Vec2::new(40.0, 120.0);

pub struct CamPlugin;

impl Plugin for CamPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PanCamPlugin)
            .insert_resource(ClearColor(BG_COLOR))
            .add_systems(Startup, fit_window)
            .add_systems(OnEnter(GameState::Load), spawn_cam)
            .add_systems(OnEnter(GameState::Running), recenter_cam);
    }
}

// Init
fn fit_window(settings: Res<Settings>, mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    let size = vec2(settings.grid_width as f32, settings.grid_height as f32) * CELL_SIZE_PX
        + UI_MARGIN_PX;
    for mut window in windows.iter_mut() {
        window.resolution.set(size.x, size.y);
    }
}

fn spawn_cam(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        PanCam {
            grab_buttons: vec![MouseButton::Right, MouseButton::Middle],
            ..default()
        },
        OrthographicProjection {
            scaling_mode: bevy::render::camera::ScalingMode::WindowSize,
            scale: 1.0,
            near: -1000.0,
            far: 1000.0,
            ..OrthographicProjection::default_2d()
        },
        Transform::from_translation(BOARD_POS.extend(0.0)),
        Msaa::Off,
    ));
}

/// put the board back in view when a new game starts
fn recenter_cam(
    mut cam_query: Query<(&mut Transform, &mut OrthographicProjection), With<Camera2d>>,
) {
    for (mut transform, mut projection) in cam_query.iter_mut() {
        transform.translation = BOARD_POS.extend(transform.translation.z);
        projection.scale = 1.0;
    }
}

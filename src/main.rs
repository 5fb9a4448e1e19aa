use bevy::{
    diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin},
    prelude::*,
};
use bitbloom::{
    camera::CamPlugin,
    config::Settings,
    hud::HudPlugin,
    life::{Life, LifePlugin},
    state::GameState,
};

fn main() -> bitbloom::Result<()> {
    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(ImagePlugin::default_nearest())
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "BitBloom".into(),
                    resizable: true,
                    focused: true,
                    mode: bevy::window::WindowMode::Windowed,
                    ..default()
                }),
                ..default()
            }),
    );

    // read after DefaultPlugins so config warnings reach the log
    let settings = Settings::from_env();
    let life = Life::new(&settings)?;

    app.add_plugins(MeshPickingPlugin)
        .add_plugins((FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin::default()))
        .init_state::<GameState>()
        .enable_state_scoped_entities::<GameState>()
        .insert_resource(settings)
        .insert_resource(life)
        .add_plugins((CamPlugin, LifePlugin, HudPlugin))
        .run();

    Ok(())
}

use bevy::prelude::*;

use crate::{
    life::{Life, Session},
    prelude::*,
    state::GameState,
};

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Menu), spawn_menu)
            .add_systems(OnEnter(GameState::Running), spawn_game_hud)
            .add_systems(OnEnter(GameState::Won), spawn_win_screen)
            .add_systems(Update, refresh_game_hud.run_if(in_state(GameState::Running)));
    }
}

/// Which live value a HUD text shows.
#[derive(Component, Debug, Clone, Copy)]
enum HudField {
    Alive,
    Timer,
    Spotted,
}

/// Formats seconds as `MM:SS.cc`.
pub fn format_time(secs: f32) -> String {
    let whole = secs.max(0.0) as u32;
    let centis = ((secs.max(0.0) - whole as f32) * 100.0) as u32;
    format!("{:02}:{:02}.{:02}", whole / 60, whole % 60, centis)
}

/// Text spanning the window width, centred, `top` pixels from the top edge.
fn banner(text: impl Into<String>, font_size: f32, color: Color, top: f32) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(color),
        TextLayout::new_with_justify(JustifyText::Center),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(top),
            width: Val::Percent(100.0),
            ..default()
        },
    )
}

fn spawn_menu(mut commands: Commands, life: Res<Life>) {
    commands.spawn((
        banner("BitBloom", 60.0, TITLE_COLOR, 100.0),
        StateScoped(GameState::Menu),
    ));
    commands.spawn((
        banner("Eliminate all living cells!", 20.0, Color::WHITE, 180.0),
        StateScoped(GameState::Menu),
    ));
    commands.spawn((
        banner(
            format!("{} shapes on the watch list", life.detector.len()),
            18.0,
            HINT_COLOR,
            220.0,
        ),
        StateScoped(GameState::Menu),
    ));
    commands.spawn((
        banner("Enter: Play | ESC: Exit", 30.0, Color::WHITE, 270.0),
        StateScoped(GameState::Menu),
    ));
}

fn spawn_game_hud(mut commands: Commands) {
    for (field, node) in [
        (
            HudField::Alive,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(12.0),
                left: Val::Px(10.0),
                ..default()
            },
        ),
        (
            HudField::Timer,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(12.0),
                width: Val::Percent(100.0),
                ..default()
            },
        ),
        (
            HudField::Spotted,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(12.0),
                right: Val::Px(10.0),
                ..default()
            },
        ),
    ] {
        let color = match field {
            HudField::Timer => TIMER_COLOR,
            _ => Color::WHITE,
        };
        commands.spawn((
            Text::default(),
            TextFont {
                font_size: 24.0,
                ..default()
            },
            TextColor(color),
            TextLayout::new_with_justify(JustifyText::Center),
            node,
            field,
            StateScoped(GameState::Running),
        ));
    }

    commands.spawn((
        Text::new("Left Click: Place Cell | Right Drag: Pan | ESC: Menu"),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(HINT_COLOR),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        StateScoped(GameState::Running),
    ));
}

fn refresh_game_hud(life: Res<Life>, session: Res<Session>, mut texts: Query<(&HudField, &mut Text)>) {
    for (field, mut text) in texts.iter_mut() {
        **text = match field {
            HudField::Alive => format!("Alive Cells: {}", life.grid.alive_count()),
            HudField::Timer => format_time(session.elapsed),
            HudField::Spotted => format!("Shapes Spotted: {}", session.spotted),
        };
    }
}

fn spawn_win_screen(mut commands: Commands, session: Res<Session>) {
    commands.spawn((
        banner("YOU WIN!", 60.0, TITLE_COLOR, 120.0),
        StateScoped(GameState::Won),
    ));
    commands.spawn((
        banner("All cells eliminated!", 30.0, Color::WHITE, 200.0),
        StateScoped(GameState::Won),
    ));
    commands.spawn((
        banner(
            format!("Your Time: {}", format_time(session.final_time)),
            36.0,
            TIMER_COLOR,
            250.0,
        ),
        StateScoped(GameState::Won),
    ));
    commands.spawn((
        banner(
            format!("Shapes Spotted: {}", session.spotted),
            24.0,
            Color::WHITE,
            300.0,
        ),
        StateScoped(GameState::Won),
    ));
    commands.spawn((
        banner("Enter: Play Again | ESC: Main Menu", 24.0, HINT_COLOR, 360.0),
        StateScoped(GameState::Won),
    ));
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn formats_minutes_seconds_centis() {
        assert_eq!("00:00.00", format_time(0.0));
        assert_eq!("00:05.25", format_time(5.25));
        assert_eq!("01:01.50", format_time(61.5));
        assert_eq!("10:00.00", format_time(600.0));
        assert_eq!("00:00.00", format_time(-3.0));
    }
}

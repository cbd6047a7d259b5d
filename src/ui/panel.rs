use crate::engine::loading::launch_options::LaunchOptions;
use crate::tools::actions::{ActionSource, ViewerAction, ViewerActionEvent};
use crate::tools::origin::OriginMode;
use crate::ui::readout::ReadoutField;
use bevy::prelude::*;

const BUTTON_NORMAL: Color = Color::srgb(0.22, 0.24, 0.28);
const BUTTON_HOVERED: Color = Color::srgb(0.26, 0.28, 0.32);
const BUTTON_PRESSED: Color = Color::srgb(0.18, 0.20, 0.24);
const BUTTON_DISABLED: Color = Color::srgb(0.14, 0.14, 0.16);

#[derive(Component, Clone, Copy)]
pub struct ActionButton(pub ViewerAction);

/// Spawns the readout panel: point/distance/origin lines, status line, and the
/// action buttons. Origin rows and buttons only exist when the origin
/// workflow is enabled.
pub fn spawn_viewer_ui(commands: &mut Commands, options: &LaunchOptions) {
    commands
        .spawn((
            Name::new("ReadoutPanel"),
            BackgroundColor(Color::srgba(0.08, 0.09, 0.11, 0.72)),
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(12.0),
                left: Val::Px(12.0),
                padding: UiRect::all(Val::Px(12.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(6.0),
                ..default()
            },
        ))
        .with_children(|parent| {
            spawn_readout_line(parent, ReadoutField::PointA);
            spawn_readout_line(parent, ReadoutField::PointB);
            spawn_readout_line(parent, ReadoutField::Distance);
            if options.origin_workflow {
                spawn_readout_line(parent, ReadoutField::Origin);
            }
            spawn_readout_line(parent, ReadoutField::Status);

            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    column_gap: Val::Px(8.0),
                    margin: UiRect::top(Val::Px(6.0)),
                    ..default()
                })
                .with_children(|row| {
                    spawn_action_button(row, ViewerAction::ResetMeasurement, "Reset measurement");
                    if options.origin_workflow {
                        spawn_action_button(row, ViewerAction::SetOrigin, "Set origin");
                        spawn_action_button(row, ViewerAction::ResetOrigin, "Reset origin");
                    }
                });
        });
}

fn spawn_readout_line(parent: &mut ChildSpawnerCommands, field: ReadoutField) {
    parent.spawn((
        field,
        Text::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgb(0.92, 0.92, 0.92)),
    ));
}

fn spawn_action_button(parent: &mut ChildSpawnerCommands, action: ViewerAction, label: &str) {
    parent
        .spawn((
            Button,
            ActionButton(action),
            BackgroundColor(BUTTON_NORMAL),
            Node {
                padding: UiRect::axes(Val::Px(10.0), Val::Px(6.0)),
                ..default()
            },
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(label),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 1.0, 1.0)),
            ));
        });
}

/// Button presses become viewer action events; hover feedback matches the
/// rest of the panel.
pub fn handle_button_interactions(
    mut interactions: Query<
        (&Interaction, &ActionButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    origin_mode: Res<OriginMode>,
    mut actions: EventWriter<ViewerActionEvent>,
) {
    for (interaction, button, mut bg) in &mut interactions {
        if button_disabled(button.0, &origin_mode) {
            *bg = BackgroundColor(BUTTON_DISABLED);
            continue;
        }
        match *interaction {
            Interaction::Pressed => {
                *bg = BackgroundColor(BUTTON_PRESSED);
                actions.write(ViewerActionEvent {
                    action: button.0,
                    source: ActionSource::Ui,
                });
            }
            Interaction::Hovered => *bg = BackgroundColor(BUTTON_HOVERED),
            Interaction::None => *bg = BackgroundColor(BUTTON_NORMAL),
        }
    }
}

/// Grey out the measurement-reset button while an origin click is pending.
pub fn update_button_enabled_state(
    origin_mode: Res<OriginMode>,
    mut buttons: Query<(&ActionButton, &mut BackgroundColor), With<Button>>,
) {
    if !origin_mode.is_changed() {
        return;
    }
    for (button, mut bg) in &mut buttons {
        *bg = BackgroundColor(if button_disabled(button.0, &origin_mode) {
            BUTTON_DISABLED
        } else {
            BUTTON_NORMAL
        });
    }
}

fn button_disabled(action: ViewerAction, origin_mode: &OriginMode) -> bool {
    action == ViewerAction::ResetMeasurement && origin_mode.is_setting()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_measurement_disabled_only_while_setting_origin() {
        let setting = OriginMode::SettingOrigin { previous: None };
        let confirmed = OriginMode::OriginSet {
            origin: Vec3::ZERO,
        };
        assert!(button_disabled(ViewerAction::ResetMeasurement, &setting));
        assert!(!button_disabled(ViewerAction::ResetMeasurement, &confirmed));
        assert!(!button_disabled(ViewerAction::SetOrigin, &setting));
        assert!(!button_disabled(ViewerAction::ResetOrigin, &setting));
    }
}

use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::window::PresentMode;

mod constants;
mod engine;
mod rpc;
mod tools;
mod ui;

use engine::camera::orbit_camera::{OrbitCamera, camera_controller};
use engine::loading::launch_options::LaunchOptions;
use engine::loading::model_loader::{
    ModelLoader, begin_model_load, prepare_model_scene, watch_load_state,
};
use rpc::web_rpc::WebRpcPlugin;
use tools::actions::{
    ViewerActionEvent, handle_action_keyboard_shortcuts, handle_viewer_actions,
};
use tools::markers::{MarkerSet, SpawnMarkerEvent, spawn_requested_markers};
use tools::measure::{MeasureState, surface_click_system};
use tools::origin::OriginMode;
use ui::panel::{handle_button_interactions, update_button_enabled_state};
use ui::readout::{StatusLine, update_readout};

fn main() {
    let mut app = create_app();

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            app.run();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.run();
    }
}

fn create_app() -> App {
    let options = LaunchOptions::detect();

    let mut app = App::new();
    app.add_plugins(create_default_plugins())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(WebRpcPlugin)
        .insert_resource(OriginMode::initial(options.origin_workflow))
        .insert_resource(options)
        .init_resource::<OrbitCamera>()
        .init_resource::<ModelLoader>()
        .init_resource::<MeasureState>()
        .init_resource::<MarkerSet>()
        .init_resource::<StatusLine>()
        .add_event::<ViewerActionEvent>()
        .add_event::<SpawnMarkerEvent>()
        .add_systems(Startup, (setup, begin_model_load))
        .add_systems(
            Update,
            (
                camera_controller,
                watch_load_state,
                prepare_model_scene,
                surface_click_system,
                spawn_requested_markers,
                handle_action_keyboard_shortcuts,
                handle_button_interactions,
                handle_viewer_actions,
                update_button_enabled_state,
                update_readout,
                fps_text_update_system,
            ),
        );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            canvas: Some("#bevy".into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Model Measure Viewer".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}

#[derive(Component)]
struct FpsText;

fn setup(mut commands: Commands, options: Res<LaunchOptions>, orbit: Res<OrbitCamera>) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(orbit.eye_position()).looking_at(orbit.focus_point, Vec3::Y),
    ));

    spawn_lighting(&mut commands);
    ui::panel::spawn_viewer_ui(&mut commands, &options);
    spawn_fps_ui(&mut commands);
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));

    // Fill light so unlit faces of the model stay inspectable
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        ..default()
    });
}

fn spawn_fps_ui(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                text.0 = format!("FPS: {value:.1}");
            }
        }
    }
}

use crate::engine::camera::orbit_camera::cursor_ray;
use crate::engine::loading::model_loader::{ModelLoader, ModelSurface};
use crate::rpc::web_rpc::{WebRpcInterface, measurement_payload};
use crate::tools::markers::{MarkerKind, SpawnMarkerEvent};
use crate::tools::origin::OriginMode;
use crate::ui::readout::StatusLine;
use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings, RayCastVisibility};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

pub const MAX_MEASURE_POINTS: usize = 2;

pub const POINTS_FULL_WARNING: &str =
    "Two points already selected. Reset the measurement to pick new ones.";
pub const ORIGIN_REQUIRED_WARNING: &str = "Set an origin before measuring.";

/// Up to two surface points, insertion ordered (first = point A, second = point B).
/// Points are captured in world space after the model has been recentred and
/// never mutated afterwards; a reset discards the whole set.
#[derive(Resource, Default)]
pub struct MeasureState {
    points: Vec<Vec3>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureRejection {
    /// A third click while both points are present is rejected, not appended.
    PointsFull,
    /// The origin workflow requires a confirmed origin before measuring.
    OriginNotSet,
}

impl MeasureRejection {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::PointsFull => "points_full",
            Self::OriginNotSet => "origin_not_set",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::PointsFull => POINTS_FULL_WARNING,
            Self::OriginNotSet => ORIGIN_REQUIRED_WARNING,
        }
    }
}

impl MeasureState {
    pub fn try_add_point(&mut self, point: Vec3) -> Result<usize, MeasureRejection> {
        if self.points.len() >= MAX_MEASURE_POINTS {
            return Err(MeasureRejection::PointsFull);
        }
        self.points.push(point);
        Ok(self.points.len())
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Euclidean distance between the two stored points. Always computed from
    /// the raw world-space points; any origin offset cancels in the difference.
    pub fn distance(&self) -> Option<f32> {
        match self.points.as_slice() {
            [a, b] => Some(a.distance(*b)),
            _ => None,
        }
    }
}

/// Left click on the model surface either records a measurement point or
/// confirms the origin, depending on the current mode. A click that misses the
/// model is a no-op, as is any click before the model is ready.
///
/// The raycaster reads the mesh store, so marker spheres are requested via
/// `SpawnMarkerEvent` rather than created here.
pub fn surface_click_system(
    mut measure: ResMut<MeasureState>,
    mut origin_mode: ResMut<OriginMode>,
    mut marker_requests: EventWriter<SpawnMarkerEvent>,
    mut ray_cast: MeshRayCast,
    mut status: ResMut<StatusLine>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    loader: Res<ModelLoader>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    surfaces: Query<(), With<ModelSurface>>,
    buttons: Query<&Interaction, With<Button>>,
) {
    if !loader.ready {
        return;
    }
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    // Clicks on the UI panel never reach the model
    if buttons.iter().any(|i| *i != Interaction::None) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, cam_xform)) = cameras.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Some(ray) = cursor_ray(camera, cam_xform, cursor_pos) else {
        return;
    };

    // Nearest intersection with the loaded model only; markers and other scene
    // entities are excluded from the cast.
    let filter = |entity: Entity| surfaces.contains(entity);
    let settings = MeshRayCastSettings::default()
        .with_filter(&filter)
        .with_visibility(RayCastVisibility::Any);
    let Some((_, hit)) = ray_cast.cast_ray(ray, &settings).first() else {
        return;
    };
    let hit_point = hit.point;
    let camera_distance = cam_xform.translation().distance(hit_point);

    match *origin_mode {
        OriginMode::SettingOrigin { .. } => {
            marker_requests.write(SpawnMarkerEvent {
                position: hit_point,
                camera_distance,
                kind: MarkerKind::Origin,
            });
            origin_mode.confirm(hit_point);
            status.clear();
            info!("Origin set at {:?}", hit_point);
            rpc_interface.send_notification(
                "origin_changed",
                serde_json::json!({
                    "origin": [hit_point.x, hit_point.y, hit_point.z],
                    "confirmed": true,
                }),
            );
            // The relative frame just changed; refresh the displayed points too
            rpc_interface.send_notification(
                "measurement_changed",
                measurement_payload(&measure, &origin_mode),
            );
        }
        OriginMode::OriginSet { .. } => match measure.try_add_point(hit_point) {
            Ok(count) => {
                marker_requests.write(SpawnMarkerEvent {
                    position: hit_point,
                    camera_distance,
                    kind: MarkerKind::Measure,
                });
                status.clear();
                info!("Measurement point {} at {:?}", count, hit_point);
                rpc_interface.send_notification(
                    "measurement_changed",
                    measurement_payload(&measure, &origin_mode),
                );
            }
            Err(rejection) => {
                warn!("Measurement click rejected: {}", rejection.reason());
                status.set(rejection.message());
                rpc_interface.send_notification(
                    "measurement_rejected",
                    serde_json::json!({
                        "reason": rejection.reason(),
                        "message": rejection.message(),
                    }),
                );
            }
        },
        OriginMode::AwaitingOrigin => {
            let rejection = MeasureRejection::OriginNotSet;
            status.set(rejection.message());
            rpc_interface.send_notification(
                "measurement_rejected",
                serde_json::json!({
                    "reason": rejection.reason(),
                    "message": rejection.message(),
                }),
            );
        }
    }
}

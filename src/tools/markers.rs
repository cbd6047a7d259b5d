use crate::constants::render_settings::{
    MARKER_MIN_RADIUS, MARKER_RADIUS_FACTOR, MEASURE_MARKER_COLOUR, ORIGIN_MARKER_COLOUR,
};
use bevy::prelude::*;

#[derive(Component)]
pub struct MeasureMarker;

#[derive(Component)]
pub struct OriginMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Measure,
    Origin,
}

/// Request to place a marker sphere at a clicked surface point.
///
/// Marker creation runs in its own system that owns the mesh/material asset
/// stores; click handling only queues requests, so it can hold the raycaster
/// (which reads the mesh store) without an access conflict.
#[derive(Event)]
pub struct SpawnMarkerEvent {
    pub position: Vec3,
    pub camera_distance: f32,
    pub kind: MarkerKind,
}

pub fn spawn_requested_markers(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut markers: ResMut<MarkerSet>,
    mut requests: EventReader<SpawnMarkerEvent>,
) {
    for request in requests.read() {
        match request.kind {
            MarkerKind::Measure => markers.add_measure(
                &mut commands,
                &mut meshes,
                &mut materials,
                request.position,
                request.camera_distance,
            ),
            MarkerKind::Origin => markers.replace_origin(
                &mut commands,
                &mut meshes,
                &mut materials,
                request.position,
                request.camera_distance,
            ),
        }
    }
}

/// Owned list of marker entities so every logical point has exactly one visual
/// counterpart. Measurement markers accumulate (up to the point cap); the
/// origin marker is singular and replaced on every new origin.
#[derive(Resource, Default)]
pub struct MarkerSet {
    measure: Vec<Entity>,
    origin: Option<Entity>,
}

impl MarkerSet {
    pub fn add_measure(
        &mut self,
        commands: &mut Commands,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
        position: Vec3,
        camera_distance: f32,
    ) {
        let entity = spawn_marker(
            commands,
            meshes,
            materials,
            position,
            camera_distance,
            MEASURE_MARKER_COLOUR,
        );
        commands.entity(entity).insert(MeasureMarker);
        self.measure.push(entity);
    }

    pub fn replace_origin(
        &mut self,
        commands: &mut Commands,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
        position: Vec3,
        camera_distance: f32,
    ) {
        if let Some(entity) = self.origin.take() {
            commands.entity(entity).despawn();
        }
        let entity = spawn_marker(
            commands,
            meshes,
            materials,
            position,
            camera_distance,
            ORIGIN_MARKER_COLOUR,
        );
        commands.entity(entity).insert(OriginMarker);
        self.origin = Some(entity);
    }

    /// Remove every measurement marker. Safe to call with none present.
    pub fn clear_measure(&mut self, commands: &mut Commands) {
        for entity in self.measure.drain(..) {
            commands.entity(entity).despawn();
        }
    }

    /// Remove the origin marker if one exists.
    pub fn clear_origin(&mut self, commands: &mut Commands) {
        if let Some(entity) = self.origin.take() {
            commands.entity(entity).despawn();
        }
    }

    pub fn measure_count(&self) -> usize {
        self.measure.len()
    }
}

/// Scale markers with viewing distance so they read the same at any zoom,
/// clamped so far-away points never vanish.
pub fn marker_radius(camera_distance: f32) -> f32 {
    (camera_distance * MARKER_RADIUS_FACTOR).max(MARKER_MIN_RADIUS)
}

fn spawn_marker(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    position: Vec3,
    camera_distance: f32,
    colour: Color,
) -> Entity {
    commands
        .spawn((
            Mesh3d(meshes.add(Sphere::new(marker_radius(camera_distance)))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: colour,
                unlit: true,
                ..default()
            })),
            Transform::from_translation(position),
        ))
        .id()
}

use crate::engine::camera::orbit_camera::OrbitCamera;
use crate::engine::loading::launch_options::LaunchOptions;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::ui::readout::StatusLine;
use bevy::asset::LoadState;
use bevy::gltf::GltfAssetLabel;
use bevy::prelude::*;
use bevy::render::primitives::Aabb;

/// Root entity of the loaded glTF scene. The recentring offset is applied here.
#[derive(Component)]
pub struct ModelRoot;

/// Mesh entities belonging to the loaded model; the only raycast targets.
#[derive(Component)]
pub struct ModelSurface;

#[derive(Resource, Default)]
pub struct ModelLoader {
    pub scene: Option<Handle<Scene>>,
    pub root: Option<Entity>,
    /// Model spawned, recentred, and accepting clicks.
    pub ready: bool,
    pub failed: bool,
}

/// Kick off the glTF scene load and spawn its root.
pub fn begin_model_load(
    mut commands: Commands,
    mut loader: ResMut<ModelLoader>,
    asset_server: Res<AssetServer>,
    options: Res<LaunchOptions>,
) {
    info!("Loading model: {}", options.model_path);
    let handle: Handle<Scene> =
        asset_server.load(GltfAssetLabel::Scene(0).from_asset(options.model_path.clone()));
    let root = commands
        .spawn((
            SceneRoot(handle.clone()),
            Transform::default(),
            Visibility::default(),
            ModelRoot,
        ))
        .id();
    loader.scene = Some(handle);
    loader.root = Some(root);
}

/// Surface a load failure naming the attempted file. The viewer stays
/// interactive; no retry is attempted.
pub fn watch_load_state(
    mut loader: ResMut<ModelLoader>,
    asset_server: Res<AssetServer>,
    options: Res<LaunchOptions>,
    mut status: ResMut<StatusLine>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if loader.ready || loader.failed {
        return;
    }
    let Some(handle) = loader.scene.as_ref() else {
        return;
    };
    if let Some(LoadState::Failed(load_error)) = asset_server.get_load_state(handle.id()) {
        loader.failed = true;
        error!("Failed to load {}: {}", options.model_path, load_error);
        status.set(format!("Failed to load model: {}", options.model_path));
        rpc_interface.send_notification(
            "model_load_failed",
            serde_json::json!({ "file": options.model_path }),
        );
    }
}

/// Once the scene hierarchy exists: tag every sub-mesh as a raycast target,
/// merge the mesh bounds, recentre the model on the world origin, and frame
/// the orbit camera on it.
pub fn prepare_model_scene(
    mut commands: Commands,
    mut loader: ResMut<ModelLoader>,
    mut orbit: ResMut<OrbitCamera>,
    children: Query<&Children>,
    mesh_bounds: Query<(&GlobalTransform, &Aabb), With<Mesh3d>>,
    untagged: Query<Entity, (With<Mesh3d>, Without<ModelSurface>)>,
    mut roots: Query<&mut Transform, With<ModelRoot>>,
    options: Res<LaunchOptions>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if loader.ready || loader.failed {
        return;
    }
    let Some(root) = loader.root else {
        return;
    };

    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    let mut mesh_count = 0usize;

    for entity in children.iter_descendants(root) {
        if untagged.contains(entity) {
            commands.entity(entity).insert(ModelSurface);
        }
        let Ok((xform, aabb)) = mesh_bounds.get(entity) else {
            continue;
        };
        for corner in aabb_corners(aabb) {
            let world = xform.transform_point(corner);
            min = min.min(world);
            max = max.max(world);
        }
        mesh_count += 1;
    }

    // Scene not spawned yet, or bounds not computed yet
    if mesh_count == 0 {
        return;
    }

    let centre = (min + max) * 0.5;
    let size = max - min;
    if let Ok(mut transform) = roots.get_mut(root) {
        transform.translation = -centre;
    }
    orbit.frame_bounds(Vec3::ZERO, size);

    loader.ready = true;
    info!(
        "Model ready: {} ({} meshes, size {:.2})",
        options.model_path,
        mesh_count,
        size.length()
    );
    rpc_interface.send_notification(
        "viewer_ready",
        serde_json::json!({ "file": options.model_path, "mesh_count": mesh_count }),
    );
}

fn aabb_corners(aabb: &Aabb) -> [Vec3; 8] {
    let c = Vec3::from(aabb.center);
    let h = Vec3::from(aabb.half_extents);
    [
        c + Vec3::new(-h.x, -h.y, -h.z),
        c + Vec3::new(h.x, -h.y, -h.z),
        c + Vec3::new(-h.x, h.y, -h.z),
        c + Vec3::new(h.x, h.y, -h.z),
        c + Vec3::new(-h.x, -h.y, h.z),
        c + Vec3::new(h.x, -h.y, h.z),
        c + Vec3::new(-h.x, h.y, h.z),
        c + Vec3::new(h.x, h.y, h.z),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec3A;

    #[test]
    fn corners_span_the_box() {
        let aabb = Aabb {
            center: Vec3A::new(1.0, 2.0, 3.0),
            half_extents: Vec3A::new(0.5, 1.0, 1.5),
        };
        let corners = aabb_corners(&aabb);
        let min = corners.iter().copied().reduce(Vec3::min).unwrap();
        let max = corners.iter().copied().reduce(Vec3::max).unwrap();
        assert_eq!(min, Vec3::new(0.5, 1.0, 1.5));
        assert_eq!(max, Vec3::new(1.5, 3.0, 4.5));
    }
}

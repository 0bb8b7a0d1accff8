use approx::assert_abs_diff_eq;
use scene_rig::*;
use std::path::PathBuf;

fn shared() -> SharedSimulation {
    PhysicsWorld::new(1.0 / 60.0).into_shared()
}

fn temp_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("scene_rig_{}_{name}.json", std::process::id()))
}

fn populated_scene() -> Scene {
    let mut scene = Scene::new(shared());
    scene.add_box(
        Transform::new(
            Vec3::new(1.5, -2.25, 3.0),
            Quat::from_euler(glam::EulerRot::XYZ, 0.3, -1.1, 2.0),
            Vec3::new(0.5, 2.0, 1.25),
        ),
        Vec4::new(0.9, 0.1, 0.3, 0.75),
        2.5,
    );
    let driven = scene.add_cylinder(
        Transform::new(Vec3::ZERO, Quat::IDENTITY, Vec3::new(0.3, 4.0, 0.3)),
        Vec4::new(0.0, 1.0, 0.5, 1.0),
        1.0,
    );
    scene.get_mut(driven).unwrap().set_motion_path(Some(
        MotionPath::new(
            vec![Vec3::ZERO, Vec3::new(0.0, 1.0, 0.1), Vec3::new(2.0, 1.0, -0.7)],
            0.35,
        )
        .with_looping(true),
    ));
    scene.add_box(Transform::default(), Vec4::ONE, 0.0);
    scene
}

fn assert_same_layout(a: &Scene, b: &Scene) {
    assert_eq!(a.len(), b.len());
    for (left, right) in a.iter().zip(b.iter()) {
        assert_eq!(left.shape_kind(), right.shape_kind());
        assert_abs_diff_eq!(left.translation(), right.translation(), epsilon = 1e-6);
        assert_abs_diff_eq!(left.orientation(), right.orientation(), epsilon = 1e-6);
        assert_abs_diff_eq!(left.scale(), right.scale(), epsilon = 1e-6);
        assert_abs_diff_eq!(left.true_color(), right.true_color(), epsilon = 1e-6);
        assert_abs_diff_eq!(left.mass(), right.mass(), epsilon = 1e-6);
        match (left.motion_path(), right.motion_path()) {
            (None, None) => {}
            (Some(l), Some(r)) => {
                assert_abs_diff_eq!(l.speed(), r.speed(), epsilon = 1e-6);
                assert_eq!(l.points().len(), r.points().len());
                for (p, q) in l.points().iter().zip(r.points()) {
                    assert_abs_diff_eq!(*p, *q, epsilon = 1e-6);
                }
                assert_eq!(l.is_looping(), r.is_looping());
                assert_eq!(r.cursor(), 0.0);
            }
            other => panic!("path presence differs: {other:?}"),
        }
    }
}

#[test]
fn json_round_trip_preserves_layout() {
    let scene = populated_scene();
    let text = scene.to_json_string().expect("serialize");
    let restored = Scene::from_json_str(shared(), &text).expect("deserialize");
    assert_same_layout(&scene, &restored);
}

#[test]
fn round_trip_resets_cursor() {
    let mut scene = populated_scene();
    scene.update(1.0);
    assert!(scene.get(1).unwrap().motion_path().unwrap().cursor() > 0.0);

    let restored = Scene::from_json_str(shared(), &scene.to_json_string().unwrap()).unwrap();
    assert_eq!(restored.get(1).unwrap().motion_path().unwrap().cursor(), 0.0);
}

#[test]
fn save_and_load_through_a_file() {
    let scene = populated_scene();
    let file = temp_file("round_trip");

    scene.save(&file).expect("save");
    let restored = Scene::load(shared(), &file).expect("load");
    std::fs::remove_file(&file).ok();

    assert_same_layout(&scene, &restored);
}

#[test]
fn missing_file_means_no_scene() {
    let result = Scene::load(shared(), temp_file("does_not_exist"));
    assert!(matches!(result, Err(SceneError::Io(_))));
}

#[test]
fn malformed_json_is_reported() {
    let result = Scene::from_json_str(shared(), "{ \"objects\": [ { \"type\": ");
    assert!(matches!(result, Err(SceneError::Parse(_))));
}

#[test]
fn failed_save_leaves_nothing_behind() {
    let dir = temp_file("missing_dir");
    let file = dir.join("scene.json");

    let result = populated_scene().save(&file);

    assert!(matches!(result, Err(SceneError::Io(_))));
    assert!(!file.exists());
}

#[test]
fn rig_keeps_current_scene_when_load_fails() {
    let mut rig = SceneRig::new(1.0 / 60.0);
    rig.scene_mut()
        .add_box(Transform::default(), Vec4::ONE, 1.0);

    assert!(rig.load(temp_file("also_missing")).is_err());
    assert_eq!(rig.scene().len(), 1);
}

#[test]
fn rig_load_replaces_scene_and_releases_old_bodies() {
    let file = temp_file("rig_reload");
    populated_scene().save(&file).unwrap();

    let mut rig = SceneRig::new(1.0 / 60.0);
    rig.scene_mut()
        .add_box(Transform::default(), Vec4::ONE, 1.0);
    rig.load(&file).unwrap();
    std::fs::remove_file(&file).ok();

    assert_eq!(rig.scene().len(), 3);
    assert_eq!(rig.world().borrow().body_count(), 3);
}

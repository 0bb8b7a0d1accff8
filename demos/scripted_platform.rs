use scene_rig::*;

fn main() {
    let dt = 1.0 / 60.0;
    let mut rig = SceneRig::new(dt);

    rig.scene_mut().add_box(
        Transform::new(Vec3::new(0.0, -1.0, 0.0), Quat::IDENTITY, Vec3::new(10.0, 0.5, 10.0)),
        Vec4::new(0.4, 0.4, 0.4, 1.0),
        0.0,
    );
    let platform = rig.scene_mut().add_box(
        Transform::new(Vec3::ZERO, Quat::IDENTITY, Vec3::new(1.0, 0.2, 1.0)),
        Vec4::new(0.2, 0.6, 1.0, 1.0),
        5.0,
    );
    let path = MotionPath::new(
        vec![
            Vec3::ZERO,
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::new(4.0, 1.0, 2.0),
            Vec3::new(0.0, 0.0, 0.0),
        ],
        0.5,
    )
    .with_looping(true);
    if let Some(object) = rig.scene_mut().get_mut(platform) {
        object.set_motion_path(Some(path));
    }

    for frame in 0..240 {
        rig.frame(dt);
        if frame % 60 == 0 {
            if let Some(object) = rig.scene().get(platform) {
                println!(
                    "t = {:.1}s platform at {:?} (force {:?})",
                    frame as f32 * dt,
                    object.translation(),
                    object.last_force()
                );
            }
        }
    }

    match rig.scene().to_json_string() {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("failed to serialize scene: {err}"),
    }
}

//! End-to-end checks of an editor session across the geometry, registry,
//! persistence and editor crates.

use glam::{Mat4, Quat, Vec2, Vec3};
use lain_assets::ModelCatalog;
use lain_common::{Aabb, EntityId, ModelType, Ray, Transform};
use lain_ecs::EntityRegistry;
use lain_editor::{
    CursorMode, EditorConfig, EditorMode, LevelEditor, PickOptions, PickPolicy, pick,
};
use lain_geom::{Viewport, cursor_ray, project_to_screen, ray_intersects_aabb};
use lain_input::{Action, EditorModeRequest, InputState, Key};
use lain_persist::LevelFormat;

fn session(levels: &std::path::Path, format: LevelFormat) -> LevelEditor {
    let config = EditorConfig {
        levels_dir: levels.to_path_buf(),
        save_format: format,
        ..EditorConfig::default()
    };
    LevelEditor::new(config, ModelCatalog::with_builtin_shapes())
}

#[test]
fn ray_box_reference_cases() {
    let unit = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
    assert!(ray_intersects_aabb(&Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z), &unit));
    assert!(!ray_intersects_aabb(&Ray::new(Vec3::splat(5.0), Vec3::ONE), &unit));
    for dir in [Vec3::X, Vec3::NEG_Y, Vec3::new(0.3, -0.2, 0.9)] {
        assert!(ray_intersects_aabb(&Ray::new(Vec3::new(0.2, -0.4, 0.9), dir), &unit));
    }
    // Parallel to the X slab and outside it.
    assert!(!ray_intersects_aabb(&Ray::new(Vec3::new(2.0, 0.0, -5.0), Vec3::Z), &unit));
}

#[test]
fn projected_point_unprojects_onto_its_ray() {
    let viewport = Viewport::new(1024.0, 768.0);
    let eye = Vec3::new(3.0, 4.0, 12.0);
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
    let projection = Mat4::perspective_rh_gl(60f32.to_radians(), viewport.aspect(), 0.1, 500.0);

    for target in [Vec3::ZERO, Vec3::new(-2.0, 1.0, 3.0), Vec3::new(4.0, -1.0, -6.0)] {
        let screen = project_to_screen(target, viewport, &view, &projection).unwrap();
        let ray = cursor_ray(screen, viewport, &view, &projection, eye).unwrap();
        let expected = (target - eye).normalize();
        assert!(ray.direction.dot(expected) > 0.9999, "{target:?}");
    }
}

#[test]
fn picking_is_deterministic() {
    let mut reg = EntityRegistry::new();
    let a = reg.add_entity(Transform::default());
    reg.add_aabb(a, Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0)));
    let b = reg.add_entity(Transform::from_position(Vec3::new(10.0, 0.0, 0.0)));
    reg.add_aabb(b, Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0)));

    let ray = Ray::new(Vec3::new(10.0, 0.0, -20.0), Vec3::Z);
    for policy in [PickPolicy::FirstHit, PickPolicy::NearestHit] {
        let options = PickOptions {
            policy,
            exclude_selected: false,
        };
        let first = pick(&reg, &ray, &options, None);
        assert_eq!(first, Some(b));
        assert_eq!(pick(&reg, &ray, &options, first), first);
    }
}

#[test]
fn physics_update_encloses_transformed_corners() {
    let local = Aabb::new(Vec3::new(-1.0, 0.0, -2.0), Vec3::new(3.0, 1.0, 2.0));
    let mut reg = EntityRegistry::new();
    let id = reg.add_entity(Transform::default());
    reg.add_aabb(id, local);

    let turned = Transform {
        rotation: Quat::from_euler(glam::EulerRot::YXZ, 0.7, -0.3, 0.2),
        position: Vec3::new(2.0, -1.0, 5.0),
        scale: Vec3::new(1.5, 0.5, 2.0),
    };
    reg.set_transform(id, turned);
    reg.update();
    let world = reg.collision_shapes(id)[0];
    let m = turned.model_matrix();
    for corner in local.corners() {
        let p = m.transform_point3(corner);
        assert!(p.cmpge(world.min - Vec3::splat(1e-4)).all());
        assert!(p.cmple(world.max + Vec3::splat(1e-4)).all());
    }

    let shifted = Transform {
        position: Vec3::new(1.0, 2.0, 3.0),
        scale: Vec3::splat(2.0),
        ..Transform::default()
    };
    reg.set_transform(id, shifted);
    reg.update();
    let world = reg.collision_shapes(id)[0];
    assert_eq!(world.min, local.min * 2.0 + Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(world.max, local.max * 2.0 + Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn save_load_round_trip_in_both_formats() {
    for format in [LevelFormat::Legacy, LevelFormat::Versioned] {
        let tmp = tempfile::tempdir().unwrap();
        let mut ed = session(tmp.path(), format);
        let placements = [
            (ModelType::Maze, Vec3::new(0.0, 0.0, 0.0)),
            (ModelType::Ball, Vec3::new(3.0, 1.0, -2.0)),
            (ModelType::Maze, Vec3::new(-8.0, 0.0, 4.0)),
        ];
        for (model, position) in placements {
            ed.apply(Action::AddEntity(model)).unwrap();
            ed.apply(Action::SetSelectedTransform(Transform {
                rotation: Quat::from_rotation_y(0.5),
                position,
                scale: Vec3::ONE,
            }))
            .unwrap();
        }
        let before: Vec<_> = ed
            .registry()
            .ids()
            .map(|id| {
                (
                    *ed.registry().transform(id),
                    ed.registry().physics(id).len(),
                    ed.registry().render(id).model,
                )
            })
            .collect();

        ed.apply(Action::SaveLevel("round_trip".into())).unwrap();
        ed.apply(Action::RemoveAll).unwrap();
        assert!(ed.registry().is_empty());
        ed.apply(Action::LoadLevel("round_trip".into())).unwrap();

        let after: Vec<_> = ed
            .registry()
            .ids()
            .map(|id| {
                (
                    *ed.registry().transform(id),
                    ed.registry().physics(id).len(),
                    ed.registry().render(id).model,
                )
            })
            .collect();
        assert_eq!(after, before, "{format}");

        let (_, detected) = ed.store().load_with_format("round_trip").unwrap();
        assert_eq!(detected, format);
    }
}

#[test]
fn switching_to_move_while_moving_changes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let mut ed = session(tmp.path(), LevelFormat::Versioned);
    let id = ed.add_entity(ModelType::Ball).unwrap();
    ed.camera_mut().teleport(Vec3::new(1.0, 2.0, 3.0));
    let camera = ed.camera().clone();

    ed.apply(Action::SwitchMode(EditorModeRequest::Move)).unwrap();
    let mut input = InputState::new();
    input.set_key(Key::F2, true);
    ed.process_input(&input);

    assert_eq!(ed.mode(), EditorMode::Move);
    assert_eq!(ed.cursor_mode(), CursorMode::Locked);
    assert_eq!(ed.selected(), Some(id));
    assert_eq!(*ed.camera(), camera);
}

#[test]
fn removal_cascades_through_every_registry() {
    let tmp = tempfile::tempdir().unwrap();
    let mut ed = session(tmp.path(), LevelFormat::Versioned);
    let ids: Vec<EntityId> = (0..3)
        .map(|_| ed.add_entity(ModelType::Maze).unwrap())
        .collect();
    ed.apply(Action::Select(ids[1])).unwrap();
    ed.apply(Action::RemoveSelected).unwrap();

    let reg = ed.registry();
    assert!(!reg.contains(ids[1]));
    assert!(reg.get_transform(ids[1]).is_none());
    assert!(reg.get_physics(ids[1]).is_none());
    assert!(reg.get_render(ids[1]).is_none());
    assert_eq!(reg.ids().collect::<Vec<_>>(), vec![ids[0], ids[2]]);
    assert_eq!(reg.shape_count(), 4);
    assert_eq!(ed.render().items.len(), 2);

    // Ids are never reused.
    let next = ed.add_entity(ModelType::Ball).unwrap();
    assert!(next > ids[2]);
}

#[test]
fn centre_click_after_flying_selects_entity_ahead() {
    let tmp = tempfile::tempdir().unwrap();
    let mut ed = session(tmp.path(), LevelFormat::Versioned);
    let target = ed.add_entity(ModelType::Ball).unwrap();
    ed.apply(Action::SetSelectedTransform(Transform::from_position(Vec3::new(15.0, 0.0, 0.0))))
        .unwrap();
    ed.apply(Action::Deselect).unwrap();

    let mut input = InputState::new();
    input.set_key(Key::W, true);
    for _ in 0..30 {
        ed.process_input(&input);
        ed.update(1.0 / 60.0);
        input.begin_frame();
    }
    assert!(ed.camera().position.x > 0.0 && ed.camera().position.x < 14.0);

    ed.apply(Action::SwitchMode(EditorModeRequest::Edit)).unwrap();
    let centre: Vec2 = ed.viewport().center();
    assert_eq!(ed.pick_at(centre), Some(target));
    assert_eq!(ed.selected(), Some(target));
}

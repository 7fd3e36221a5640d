//! End-to-end interpolation runs over full scene documents.
//!
//! Run with: cargo test --test interpolate_scenes

use serde_json::{json, Value};

use scenestep::steps::Offset;
use scenestep::walk::{StepSequence, Target};

fn run(scene: Value, offset: f64, target: Target) -> Vec<(usize, Value)> {
    StepSequence::new(scene, Offset::new(offset).unwrap(), target)
        .expect("sequence should build")
        .map(|produced| (produced.step, produced.scene))
        .collect()
}

#[test]
fn object_scene_steps_toward_final_transform() {
    let scene = json!({
        "objects": [
            {
                "type": "sphere",
                "color": [200, 120, 40],
                "transform": [
                    {"position": [10, -5, 0]}
                ]
            }
        ]
    });

    let produced = run(scene, 3.0, Target::ObjectTransforms);
    assert_eq!(produced.len(), 3);

    let position = |i: usize| &produced[i].1["objects"][0]["transform"][0]["position"];
    assert_eq!(position(0), &json!([3.0, -3.0, 0]));
    assert_eq!(position(1), &json!([6.0, -5, 0]));
    assert_eq!(position(2), &json!([9.0, -5, 0]));

    // Steps are tagged 1..=N in order
    let steps: Vec<usize> = produced.iter().map(|(step, _)| *step).collect();
    assert_eq!(steps, vec![1, 2, 3]);
}

#[test]
fn all_zero_lookat_produces_no_scenes() {
    let scene = json!({
        "camera": {
            "transform": [
                {"lookat": {"x": 0}}
            ]
        }
    });

    let produced = run(scene, 2.5, Target::CameraLookat);
    assert!(produced.is_empty());
}

#[test]
fn object_without_transform_passes_through_every_step() {
    let scene = json!({
        "objects": [
            {"type": "sphere", "transform": [{"angle": 9}]},
            {"type": "plane", "color": [255, 255, 255]}
        ]
    });
    let original = scene.clone();

    let produced = run(scene, 3.0, Target::ObjectTransforms);
    assert_eq!(produced.len(), 3);
    for (_, step_scene) in &produced {
        assert_eq!(step_scene["objects"][1], original["objects"][1]);
    }
}

#[test]
fn final_step_restores_exactly_divisible_values() {
    let scene = json!({
        "objects": [
            {"transform": [{"position": [9, -6, 3]}]}
        ]
    });
    let original = scene.clone();

    let produced = run(scene, 3.0, Target::ObjectTransforms);
    assert_eq!(produced.len(), 3);

    // 9 / 3 divides evenly, so the last step carries the original values,
    // integer representation included.
    let (_, last) = produced.last().unwrap();
    assert_eq!(
        serde_json::to_string(&last["objects"][0]).unwrap(),
        serde_json::to_string(&original["objects"][0]).unwrap()
    );
}

#[test]
fn lookat_run_leaves_objects_untouched() {
    let scene = json!({
        "camera": {
            "fov": 60,
            "transform": [
                {"lookat": {"x": [6, 0, -3], "dist": 2}}
            ]
        },
        "objects": [
            {"type": "sphere", "transform": [{"position": [50, 50, 50]}]}
        ]
    });
    let original = scene.clone();

    let produced = run(scene, 3.0, Target::CameraLookat);
    // Largest lookat magnitude is 6; object transforms play no part.
    assert_eq!(produced.len(), 2);

    let lookat = |i: usize| &produced[i].1["camera"]["transform"][0]["lookat"];
    assert_eq!(lookat(0)["x"], json!([3.0, 0, -3]));
    assert_eq!(lookat(0)["dist"], json!(2));
    assert_eq!(lookat(1)["x"], json!([6, 0, -3]));

    for (_, step_scene) in &produced {
        assert_eq!(step_scene["objects"], original["objects"]);
        assert_eq!(step_scene["camera"]["fov"], original["camera"]["fov"]);
    }
}

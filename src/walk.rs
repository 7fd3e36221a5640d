//! Scene walking: locate the targeted transform parameters inside a scene
//! document and drive the step core over them.
//!
//! Two targets exist. `ObjectTransforms` steps every entry of every object's
//! `transform` list; `CameraLookat` steps only the `lookat` mapping of the
//! camera's first transform entry. Everything else in the document is
//! carried through each produced scene untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::steps::{self, Offset, ParamValue, SceneStepError};

/// Which parameter set inside the scene document a run interpolates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Target {
    /// Every entry in every object's `transform` list. Objects without a
    /// `transform` key pass through untouched.
    ObjectTransforms,
    /// The `lookat` mapping of the camera's first transform entry. All
    /// other camera and object transforms are left alone.
    CameraLookat,
}

impl Target {
    /// Collect every targeted parameter, validating shape along the way.
    ///
    /// Fails on a missing structural location or on a parameter value that
    /// is neither a number nor an array of numbers.
    pub fn collect_params(&self, scene: &Value) -> Result<Vec<ParamValue>, SceneStepError> {
        let mut params = Vec::new();
        match self {
            Target::ObjectTransforms => {
                for entry in object_transform_entries(scene)? {
                    for value in entry.values() {
                        params.push(ParamValue::from_json(value)?);
                    }
                }
            }
            Target::CameraLookat => {
                for value in camera_lookat(scene)?.values() {
                    params.push(ParamValue::from_json(value)?);
                }
            }
        }
        Ok(params)
    }

    /// Replace every targeted parameter in `scene` with its clamped value
    /// at `step_index`. The document must already have passed
    /// `collect_params`.
    fn project_into(&self, scene: &mut Value, offset: Offset, step_index: usize) {
        match self {
            Target::ObjectTransforms => {
                let Some(objects) = scene.get_mut("objects").and_then(Value::as_array_mut)
                else {
                    return;
                };
                for object in objects {
                    let Some(transform) =
                        object.get_mut("transform").and_then(Value::as_array_mut)
                    else {
                        continue;
                    };
                    for entry in transform {
                        if let Some(entry) = entry.as_object_mut() {
                            for value in entry.values_mut() {
                                project_value(value, offset, step_index);
                            }
                        }
                    }
                }
            }
            Target::CameraLookat => {
                let lookat = scene
                    .get_mut("camera")
                    .and_then(|camera| camera.get_mut("transform"))
                    .and_then(Value::as_array_mut)
                    .and_then(|transform| transform.first_mut())
                    .and_then(|entry| entry.get_mut("lookat"))
                    .and_then(Value::as_object_mut);
                if let Some(lookat) = lookat {
                    for value in lookat.values_mut() {
                        project_value(value, offset, step_index);
                    }
                }
            }
        }
    }
}

/// The `transform` entry maps of every object that has a transform list.
fn object_transform_entries(scene: &Value) -> Result<Vec<&Map<String, Value>>, SceneStepError> {
    let objects = scene
        .get("objects")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            SceneStepError::MalformedScene("no `objects` array at the document root".to_string())
        })?;

    let mut entries = Vec::new();
    for (index, object) in objects.iter().enumerate() {
        let object = object.as_object().ok_or_else(|| {
            SceneStepError::MalformedScene(format!("object {} is not a mapping", index))
        })?;
        let Some(transform) = object.get("transform") else {
            continue;
        };
        let transform = transform.as_array().ok_or_else(|| {
            SceneStepError::MalformedScene(format!("object {} `transform` is not a list", index))
        })?;
        for entry in transform {
            let entry = entry.as_object().ok_or_else(|| {
                SceneStepError::MalformedScene(format!(
                    "object {} has a non-mapping transform entry",
                    index
                ))
            })?;
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// The camera's `lookat` mapping at `camera.transform[0].lookat`.
fn camera_lookat(scene: &Value) -> Result<&Map<String, Value>, SceneStepError> {
    scene
        .get("camera")
        .and_then(|camera| camera.get("transform"))
        .and_then(Value::as_array)
        .and_then(|transform| transform.first())
        .and_then(|entry| entry.get("lookat"))
        .and_then(Value::as_object)
        .ok_or_else(|| {
            SceneStepError::MalformedScene(
                "no `camera.transform[0].lookat` mapping".to_string(),
            )
        })
}

/// Clamp one parameter node in place.
///
/// The original JSON number node is kept whenever the step limit already
/// covers the value, so integers stay integers once a parameter has
/// arrived at its final value.
fn project_value(value: &mut Value, offset: Offset, step_index: usize) {
    let limit = offset.value() * step_index as f64;
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_f64() {
                if v.abs() > limit {
                    *value = Value::from(steps::clamp_toward(v, limit));
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                project_value(item, offset, step_index);
            }
        }
        _ => {}
    }
}

/// One interpolation step's full scene document, tagged with its 1-based
/// step index.
#[derive(Debug, Clone, PartialEq)]
pub struct ProducedScene {
    pub step: usize,
    pub scene: Value,
}

/// Iterator over all produced scenes of a run.
///
/// Construction validates the targeted parameter set and fixes the step
/// count from the original, unclamped values. Iteration then deep-clones
/// the source document once per step and projects the targeted parameters
/// inside the clone; the source itself is never modified.
#[derive(Debug, Clone)]
pub struct StepSequence {
    scene: Value,
    offset: Offset,
    target: Target,
    max_steps: usize,
    next_step: usize,
}

impl StepSequence {
    pub fn new(scene: Value, offset: Offset, target: Target) -> Result<Self, SceneStepError> {
        let params = target.collect_params(&scene)?;
        let max_steps = steps::estimate_max_steps(&params, offset);
        Ok(Self {
            scene,
            offset,
            target,
            max_steps,
            next_step: 1,
        })
    }

    /// Total number of steps this run produces. Zero when every targeted
    /// parameter is already at zero.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// The unmodified source document.
    pub fn source(&self) -> &Value {
        &self.scene
    }
}

impl Iterator for StepSequence {
    type Item = ProducedScene;

    fn next(&mut self) -> Option<ProducedScene> {
        if self.next_step > self.max_steps {
            return None;
        }
        let step = self.next_step;
        self.next_step += 1;

        let mut scene = self.scene.clone();
        self.target.project_into(&mut scene, self.offset, step);
        Some(ProducedScene { step, scene })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.max_steps + 1).saturating_sub(self.next_step);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for StepSequence {}

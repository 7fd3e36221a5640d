//! Step estimation and sign-preserving clamp projection.
//!
//! The interpolation core: transform parameters hold their final authored
//! values, and a run steps every parameter from zero toward that value by a
//! fixed per-step offset. This module answers two questions: how many steps
//! does a run need, and what is a parameter's value at a given step.

use std::fmt;

use serde_json::Value;

/// Error produced by step estimation and projection.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneStepError {
    /// The per-step offset was zero, negative, or not finite.
    InvalidOffset(f64),
    /// An expected location is missing from the scene document, or a
    /// transform parameter is neither a number nor an array of numbers.
    MalformedScene(String),
}

impl fmt::Display for SceneStepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneStepError::InvalidOffset(value) => {
                write!(f, "offset must be a positive finite number, got {}", value)
            }
            SceneStepError::MalformedScene(message) => {
                write!(f, "malformed scene: {}", message)
            }
        }
    }
}

impl std::error::Error for SceneStepError {}

/// Validated per-step offset. Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offset(f64);

impl Offset {
    /// Validate a raw offset. Zero, negative, NaN and infinite values are
    /// rejected before any estimation or projection can run against them.
    pub fn new(value: f64) -> Result<Self, SceneStepError> {
        if value.is_finite() && value > 0.0 {
            Ok(Offset(value))
        } else {
            Err(SceneStepError::InvalidOffset(value))
        }
    }

    /// The raw offset value.
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// A single transform parameter: either a scalar or an ordered vector of
/// scalars (e.g. an `[x, y, z]` triple). Both shapes step under the same
/// clamp rule, element-wise for vectors.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl ParamValue {
    /// Read a parameter from its JSON representation.
    ///
    /// Anything other than a number or an array of numbers is rejected.
    pub fn from_json(value: &Value) -> Result<Self, SceneStepError> {
        match value {
            Value::Number(n) => number_component(n).map(ParamValue::Scalar),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Number(n) => number_component(n),
                    other => Err(SceneStepError::MalformedScene(format!(
                        "vector parameter contains a non-numeric element: {}",
                        other
                    ))),
                })
                .collect::<Result<Vec<f64>, _>>()
                .map(ParamValue::Vector),
            other => Err(SceneStepError::MalformedScene(format!(
                "parameter must be a number or an array of numbers, got {}",
                other
            ))),
        }
    }

    /// All scalar components of this parameter, in order.
    pub fn components(&self) -> &[f64] {
        match self {
            ParamValue::Scalar(v) => std::slice::from_ref(v),
            ParamValue::Vector(vs) => vs,
        }
    }
}

fn number_component(n: &serde_json::Number) -> Result<f64, SceneStepError> {
    n.as_f64().ok_or_else(|| {
        SceneStepError::MalformedScene(format!("parameter value {} is out of f64 range", n))
    })
}

/// Clamp a final value toward zero at the given magnitude limit.
///
/// Positive values are capped at `limit`, non-positive values at `-limit`.
/// The result never overshoots the final value and keeps its sign; once
/// `limit` covers the value's magnitude the value itself comes back.
pub fn clamp_toward(value: f64, limit: f64) -> f64 {
    if value > 0.0 {
        value.min(limit)
    } else {
        value.max(-limit)
    }
}

/// Number of steps needed so that stepping by `offset` reaches or exceeds
/// every parameter's magnitude.
///
/// This is the truncation of the largest `|value| / offset` ratio across
/// all components. An empty or all-zero parameter set needs no steps.
pub fn estimate_max_steps<'a, I>(params: I, offset: Offset) -> usize
where
    I: IntoIterator<Item = &'a ParamValue>,
{
    let mut max_ratio = 0.0_f64;
    for param in params {
        for component in param.components() {
            let ratio = component.abs() / offset.value();
            if ratio > max_ratio {
                max_ratio = ratio;
            }
        }
    }
    max_ratio as usize
}

/// Project a parameter's value at the given step.
///
/// Every component is clamped to a magnitude of `offset * step_index`,
/// element-wise for vectors. Returns a new parameter; the input is left
/// untouched so the same final-value parameter serves every step of a run.
pub fn project_step(param: &ParamValue, offset: Offset, step_index: usize) -> ParamValue {
    let limit = offset.value() * step_index as f64;
    match param {
        ParamValue::Scalar(v) => ParamValue::Scalar(clamp_toward(*v, limit)),
        ParamValue::Vector(vs) => {
            ParamValue::Vector(vs.iter().map(|&v| clamp_toward(v, limit)).collect())
        }
    }
}

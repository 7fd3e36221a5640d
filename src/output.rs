//! Writing produced scenes to disk.
//!
//! Output naming follows the source scene: `ball.json` produces `ball_1.json`,
//! `ball_2.json`, ... in the output directory. Files are pretty-printed with
//! four-space indentation to match hand-authored scene files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::walk::ProducedScene;

/// File name stem of the source scene, used for all derived output names.
fn scene_stem(scene_path: &Path) -> &str {
    scene_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("scene")
}

/// Path of the step file for `step`, derived from the source scene path.
pub fn step_path(scene_path: &Path, output_dir: &Path, step: usize) -> PathBuf {
    output_dir.join(format!("{}_{}.json", scene_stem(scene_path), step))
}

/// Path of the run metadata file, derived from the source scene path.
pub fn metadata_path(scene_path: &Path, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}_metadata.json", scene_stem(scene_path)))
}

/// Write one produced scene as pretty-printed JSON.
pub fn write_scene(path: &Path, produced: &ProducedScene) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    produced.scene.serialize(&mut serializer)?;
    writer.flush()
}

//! Collaborator interfaces the export core consumes.
//!
//! The exporter never walks a scene graph itself: the host supplies objects,
//! evaluated meshes, world transforms, and scene-time control through these
//! traits, and receives the set of externally referenced files back once the
//! export completes.

use std::collections::BTreeSet;
use std::path::PathBuf;

use glam::Mat4;

use crate::error::Result;
use crate::types::Mesh;

/// How an object's mesh should be evaluated for export.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluationSettings {
    /// Apply the object's modifier stack before export.
    pub apply_modifiers: bool,
    /// Evaluate modifiers at render quality rather than viewport quality.
    pub render_quality: bool,
}

/// A single renderable object as seen by the exporter.
pub trait SceneObject {
    /// The object's container name.
    fn name(&self) -> &str;

    /// The name of the object's geometry data block. Often equal to
    /// `name()`; when it differs both names appear in the output record.
    fn data_name(&self) -> &str;

    /// Whether this object is a dependent/instanced child of another
    /// exported object. Such objects are skipped to avoid double export.
    fn is_instanced_child(&self) -> bool;

    /// The object's world transform.
    fn world_transform(&self) -> Mat4;

    /// Produce this object's polygon mesh for the current scene time.
    ///
    /// Fails when the object has no renderable geometry this frame; the
    /// exporter recovers by skipping the object.
    fn evaluate_mesh(&self, settings: &EvaluationSettings) -> Result<Mesh>;

    /// External resource files (textures and the like) this object
    /// references. Collected across all objects and handed to the
    /// [`ReferenceFileCopier`] after the last frame.
    fn referenced_files(&self) -> Vec<PathBuf> {
        Vec::new()
    }
}

/// Supplies the set of objects to export.
pub trait SceneProvider {
    type Object: SceneObject;

    /// Enumerate exportable objects, in a stable order. With
    /// `selection_only` set, only currently-selected objects are returned.
    fn enumerate_objects(&self, selection_only: bool) -> Vec<&Self::Object>;
}

/// Controls scene time for animated exports.
pub trait FrameController {
    /// Inclusive (start, end) frame range of the scene.
    fn frame_range(&self) -> (i32, i32);

    fn current_frame(&self) -> i32;

    fn set_current_frame(&mut self, frame: i32);
}

/// Copies externally referenced files next to the export, invoked once
/// after all frames complete.
pub trait ReferenceFileCopier {
    fn copy_referenced_files(&self, paths: &BTreeSet<PathBuf>) -> Result<()>;
}

/// A copier that ignores all referenced files.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReferenceCopier;

impl ReferenceFileCopier for NullReferenceCopier {
    fn copy_referenced_files(&self, _paths: &BTreeSet<PathBuf>) -> Result<()> {
        Ok(())
    }
}

//! # Derg Export
//!
//! A Rust library for exporting polygon mesh scenes to the derg
//! interchange format.
//!
//! ## Overview
//!
//! The library takes an in-memory polygon mesh scene (n-gon faces,
//! per-corner split normals and UVs, named vertex-group weights) and
//! produces a line-oriented `.derg` file: one deduplicated, globally
//! indexed face stream per frame. Output is deterministic and
//! byte-reproducible for identical input.
//!
//! ## Quick Start
//!
//! ```ignore
//! use derg_export::{ExportConfig, Exporter, NullReferenceCopier};
//!
//! // Scene, frame control, and reference copying come from the host
//! // through the `scene` traits.
//! let exporter = Exporter::with_config(ExportConfig::default());
//! let stats = exporter.export(&scene, &mut frames, &NullReferenceCopier, path)?;
//! println!("wrote {} files", stats.files.len());
//! ```
//!
//! ## Pipeline
//!
//! Per object: triangulation (before any transform, so tessellation matches
//! the authored topology), global transform and orientation normalization
//! (winding and normals flip under mirroring transforms), attribute
//! deduplication into per-mesh tables, vertex-group resolution, and record
//! emission against file-wide index counters.

pub mod error;
pub mod export;
pub mod scene;
pub mod transform;
pub mod triangulate;
pub mod types;

// Re-export main types for convenience
pub use error::{ExportError, Result};
pub use export::{ExportConfig, ExportStats, Exporter, GroupingMode, IndexAllocator};
pub use scene::{
    EvaluationSettings, FrameController, NullReferenceCopier, ReferenceFileCopier, SceneObject,
    SceneProvider,
};
pub use transform::apply_transform;
pub use triangulate::triangulate;
pub use types::{AxisDirection, Corner, Face, Mesh, VertexGroup};

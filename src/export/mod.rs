//! Derg export pipeline: configuration and the per-frame orchestrator.
//!
//! The orchestrator drives, once per (object, frame) pair: triangulation,
//! transform normalization, attribute deduplication, vertex-group
//! resolution, and record emission, with a single global index space per
//! output file.

pub mod counters;
pub mod dedup;
pub mod groups;
pub mod writer;

pub use counters::IndexAllocator;
pub use dedup::DedupTable;
pub use writer::{CornerIndices, RecordWriter};

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use glam::{Mat4, Vec3};

use crate::error::{ExportError, Result};
use crate::scene::{
    EvaluationSettings, FrameController, ReferenceFileCopier, SceneObject, SceneProvider,
};
use crate::transform::apply_transform;
use crate::triangulate::triangulate;
use crate::types::{axis_conversion_matrix, AxisDirection, Mesh};

/// How emitted geometry is grouped in the output file. The two modes are
/// mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingMode {
    /// One `g <object>` record per object; vertex groups are ignored.
    Objects,
    /// One `o <object>` record per object, with `g` markers whenever the
    /// dominant vertex group changes between consecutive faces.
    VertexGroups,
}

/// Export configuration, passed to the orchestrator at construction.
/// Components never read ambient option state.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Apply object modifier stacks before export.
    pub apply_modifiers: bool,
    /// Evaluate modifiers at render quality.
    pub apply_modifiers_render: bool,
    /// Output grouping mode.
    pub grouping: GroupingMode,
    /// Export only currently-selected objects.
    pub selection_only: bool,
    /// Export the scene's whole frame range instead of the current frame.
    pub animation: bool,
    /// Uniform scale applied to all geometry. Must be positive and finite.
    pub global_scale: f32,
    /// Exported forward direction.
    pub axis_forward: AxisDirection,
    /// Exported up direction.
    pub axis_up: AxisDirection,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            apply_modifiers: true,
            apply_modifiers_render: false,
            grouping: GroupingMode::VertexGroups,
            selection_only: false,
            animation: false,
            global_scale: 1.0,
            axis_forward: AxisDirection::NegZ,
            axis_up: AxisDirection::Y,
        }
    }
}

impl ExportConfig {
    /// Reject invalid configurations before any processing begins.
    pub fn validate(&self) -> Result<()> {
        if !(self.global_scale.is_finite() && self.global_scale > 0.0) {
            return Err(ExportError::InvalidConfig(format!(
                "global scale must be positive and finite, got {}",
                self.global_scale
            )));
        }
        if axis_conversion_matrix(self.axis_forward, self.axis_up).is_none() {
            return Err(ExportError::InvalidConfig(format!(
                "forward ({:?}) and up ({:?}) must lie on different axes",
                self.axis_forward, self.axis_up
            )));
        }
        Ok(())
    }

    /// The configured scale and axis-remap rotation as one 4x4 matrix.
    /// Per-object world transforms multiply onto this at the call site.
    fn global_matrix(&self) -> Result<Mat4> {
        self.validate()?;
        let rotation = axis_conversion_matrix(self.axis_forward, self.axis_up)
            .expect("validated above");
        Ok(Mat4::from_scale(Vec3::splat(self.global_scale)) * Mat4::from_mat3(rotation))
    }

    fn evaluation_settings(&self) -> EvaluationSettings {
        EvaluationSettings {
            apply_modifiers: self.apply_modifiers,
            render_quality: self.apply_modifiers_render,
        }
    }
}

/// Summary of a completed export.
#[derive(Debug, Default)]
pub struct ExportStats {
    /// Output files written, one per frame.
    pub files: Vec<PathBuf>,
    /// Objects emitted across all frames (skipped objects excluded).
    pub objects_written: usize,
    /// Triangles emitted across all frames.
    pub faces_written: usize,
}

/// Restores the scene's original frame when the export scope ends,
/// successfully or not.
struct FrameRestore<'a, F: FrameController> {
    frames: &'a mut F,
    original: i32,
}

impl<F: FrameController> Drop for FrameRestore<'_, F> {
    fn drop(&mut self) {
        self.frames.set_current_frame(self.original);
    }
}

/// The export orchestrator.
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    pub fn new() -> Self {
        Self::with_config(ExportConfig::default())
    }

    pub fn with_config(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Export the scene to `path`, one file per frame.
    ///
    /// A mesh evaluation failure skips that object and continues. An I/O
    /// failure aborts the current and remaining frames; files written for
    /// prior frames remain valid. The scene's current frame is restored on
    /// completion or failure.
    pub fn export<S, F, C>(
        &self,
        scene: &S,
        frames: &mut F,
        copier: &C,
        path: &Path,
    ) -> Result<ExportStats>
    where
        S: SceneProvider,
        F: FrameController,
        C: ReferenceFileCopier,
    {
        let global_matrix = self.config.global_matrix()?;
        let settings = self.config.evaluation_settings();

        let original_frame = frames.current_frame();
        let frame_list: Vec<i32> = if self.config.animation {
            let (start, end) = frames.frame_range();
            (start..=end).collect()
        } else {
            vec![original_frame]
        };

        let mut stats = ExportStats::default();
        let mut copy_set: BTreeSet<PathBuf> = BTreeSet::new();
        let guard = FrameRestore {
            frames,
            original: original_frame,
        };

        for frame in frame_list {
            guard.frames.set_current_frame(frame);

            let file_path = if self.config.animation {
                frame_path(path, frame)
            } else {
                path.to_path_buf()
            };

            let file =
                File::create(&file_path).map_err(|e| ExportError::io(&file_path, e))?;
            let mut writer = RecordWriter::new(BufWriter::new(file));
            let mut allocator = IndexAllocator::new();

            for object in scene.enumerate_objects(self.config.selection_only) {
                if object.is_instanced_child() {
                    continue;
                }
                let mesh = match object.evaluate_mesh(&settings) {
                    Ok(mesh) => mesh,
                    Err(e) => {
                        log::warn!("skipping object '{}': {}", object.name(), e);
                        continue;
                    }
                };
                let matrix = global_matrix * object.world_transform();
                let faces = self
                    .write_object(object, mesh, matrix, &mut writer, &mut allocator)
                    .map_err(|e| ExportError::io(&file_path, e))?;
                if let Some(faces) = faces {
                    stats.objects_written += 1;
                    stats.faces_written += faces;
                }
                for reference in object.referenced_files() {
                    copy_set.insert(reference);
                }
            }

            // Flush before the next frame's file is opened; no two frames'
            // files are ever open concurrently.
            writer.finish().map_err(|e| ExportError::io(&file_path, e))?;
            stats.files.push(file_path);
        }

        drop(guard);
        copier.copy_referenced_files(&copy_set)?;
        Ok(stats)
    }

    /// Run one object through the geometry pipeline and emit its records.
    /// Returns the number of triangles written, or `None` when the object
    /// had nothing to emit. The allocator is committed only after the full
    /// emission succeeds.
    fn write_object<O: SceneObject, W: Write>(
        &self,
        object: &O,
        mut mesh: Mesh,
        matrix: Mat4,
        writer: &mut RecordWriter<W>,
        allocator: &mut IndexAllocator,
    ) -> io::Result<Option<usize>> {
        triangulate(&mut mesh);
        apply_transform(&mut mesh, matrix);

        if mesh.is_empty() {
            return Ok(None);
        }

        // Deduplication pass: local indices in first-occurrence order, one
        // face record per triangle, dominant group per face.
        let mut vertex_table: DedupTable<[i64; 3], [f32; 3]> = DedupTable::new();
        let mut uv_table: DedupTable<(u32, [i64; 2]), [f32; 2]> = DedupTable::new();
        let mut normal_table: DedupTable<[i64; 3], [f32; 3]> = DedupTable::new();

        struct LocalFace {
            corners: Vec<(u32, Option<u32>, Option<u32>)>,
            group: Option<usize>,
        }
        let mut local_faces = Vec::with_capacity(mesh.faces.len());

        for face in &mesh.faces {
            let corners = face
                .corners
                .iter()
                .map(|corner| {
                    let position = mesh.positions[corner.vertex as usize];
                    let v = vertex_table.intern(dedup::vec3_key(position), position);
                    let vt = mesh.has_uvs.then(|| {
                        uv_table.intern(dedup::uv_key(corner.vertex, corner.uv), corner.uv)
                    });
                    let vn = mesh
                        .has_normals
                        .then(|| normal_table.intern(dedup::vec3_key(corner.normal), corner.normal));
                    (v, vt, vn)
                })
                .collect();
            let group = match self.config.grouping {
                GroupingMode::VertexGroups => groups::resolve_face_group(&mesh, face),
                GroupingMode::Objects => None,
            };
            local_faces.push(LocalFace { corners, group });
        }

        // Emission: name, vertices, UVs, normals, then faces with
        // run-length-suppressed group markers.
        let record_name = writer::object_record_name(object.name(), object.data_name());
        match self.config.grouping {
            GroupingMode::Objects => writer.write_group(&record_name)?,
            GroupingMode::VertexGroups => writer.write_object(&record_name)?,
        }

        for &position in vertex_table.values() {
            writer.write_vertex(position)?;
        }
        for &uv in uv_table.values() {
            writer.write_uv(uv)?;
        }
        for &normal in normal_table.values() {
            writer.write_normal(normal)?;
        }

        let base_vertex = allocator.base_vertex_offset();
        let base_uv = allocator.base_uv_offset();
        let base_normal = allocator.base_normal_offset();

        let emit_markers = self.config.grouping == GroupingMode::VertexGroups
            && !mesh.groups.is_empty();
        let mut current_group: Option<Option<usize>> = None;

        for face in &local_faces {
            if emit_markers && current_group != Some(face.group) {
                current_group = Some(face.group);
                let name = match face.group {
                    Some(index) => mesh.groups[index].name.as_str(),
                    None => groups::UNGROUPED,
                };
                writer.write_group(&writer::name_compat(name))?;
            }

            let corners: Vec<CornerIndices> = face
                .corners
                .iter()
                .map(|&(v, vt, vn)| CornerIndices {
                    vertex: base_vertex + v as usize + 1,
                    uv: vt.map(|i| base_uv + i as usize + 1),
                    normal: vn.map(|i| base_normal + i as usize + 1),
                })
                .collect();
            writer.write_face(&corners)?;
        }

        allocator.commit(vertex_table.len(), uv_table.len(), normal_table.len());
        Ok(Some(local_faces.len()))
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a frame's file path by inserting a zero-padded frame number
/// before the extension, so animated exports never overwrite the base path.
fn frame_path(base: &Path, frame: i32) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = base
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    base.with_file_name(format!("{}_{:06}{}", stem, frame, ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::NullReferenceCopier;
    use crate::types::{Corner, Face, VertexGroup};
    use std::fs;

    struct MockObject {
        name: String,
        data_name: String,
        selected: bool,
        instanced_child: bool,
        transform: Mat4,
        mesh: Option<Mesh>,
    }

    impl MockObject {
        fn new(name: &str, mesh: Mesh) -> Self {
            Self {
                name: name.to_string(),
                data_name: name.to_string(),
                selected: false,
                instanced_child: false,
                transform: Mat4::IDENTITY,
                mesh: Some(mesh),
            }
        }

        fn failing(name: &str) -> Self {
            Self {
                name: name.to_string(),
                data_name: name.to_string(),
                selected: false,
                instanced_child: false,
                transform: Mat4::IDENTITY,
                mesh: None,
            }
        }
    }

    impl SceneObject for MockObject {
        fn name(&self) -> &str {
            &self.name
        }
        fn data_name(&self) -> &str {
            &self.data_name
        }
        fn is_instanced_child(&self) -> bool {
            self.instanced_child
        }
        fn world_transform(&self) -> Mat4 {
            self.transform
        }
        fn evaluate_mesh(&self, _settings: &EvaluationSettings) -> Result<Mesh> {
            self.mesh
                .clone()
                .ok_or_else(|| ExportError::MeshEvaluation("no renderable geometry".into()))
        }
    }

    struct MockScene {
        objects: Vec<MockObject>,
    }

    impl SceneProvider for MockScene {
        type Object = MockObject;
        fn enumerate_objects(&self, selection_only: bool) -> Vec<&MockObject> {
            self.objects
                .iter()
                .filter(|o| !selection_only || o.selected)
                .collect()
        }
    }

    struct MockFrames {
        current: i32,
        range: (i32, i32),
    }

    impl FrameController for MockFrames {
        fn frame_range(&self) -> (i32, i32) {
            self.range
        }
        fn current_frame(&self) -> i32 {
            self.current
        }
        fn set_current_frame(&mut self, frame: i32) {
            self.current = frame;
        }
    }

    fn quad_mesh() -> Mesh {
        let mut mesh = Mesh::new();
        for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]] {
            mesh.add_vertex(p);
        }
        mesh.add_face(Face::from_vertices(&[0, 1, 2, 3]));
        mesh
    }

    fn identity_config() -> ExportConfig {
        // Y-forward/Z-up leaves coordinates untouched, which keeps the
        // emitted values easy to assert on.
        ExportConfig {
            axis_forward: AxisDirection::Y,
            axis_up: AxisDirection::Z,
            ..ExportConfig::default()
        }
    }

    fn export_to_string(scene: &MockScene, config: ExportConfig, name: &str) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut frames = MockFrames {
            current: 1,
            range: (1, 1),
        };
        Exporter::with_config(config)
            .export(scene, &mut frames, &NullReferenceCopier, &path)
            .unwrap();
        fs::read_to_string(&path).unwrap()
    }

    #[test]
    fn test_bare_quad_scenario() {
        let scene = MockScene {
            objects: vec![MockObject::new("Quad", quad_mesh())],
        };
        let content = export_to_string(&scene, identity_config(), "bare_quad.derg");

        let v_lines: Vec<&str> = content.lines().filter(|l| l.starts_with("v ")).collect();
        let vt_lines: Vec<&str> = content.lines().filter(|l| l.starts_with("vt ")).collect();
        let vn_lines: Vec<&str> = content.lines().filter(|l| l.starts_with("vn ")).collect();
        let f_lines: Vec<&str> = content.lines().filter(|l| l.starts_with("f ")).collect();

        assert_eq!(v_lines.len(), 4);
        assert_eq!(vt_lines.len(), 0);
        assert_eq!(vn_lines.len(), 0);
        assert_eq!(f_lines.len(), 2);
        for line in f_lines {
            let indices: Vec<usize> = line[2..]
                .split(' ')
                .map(|t| {
                    assert!(!t.contains('/'));
                    t.parse().unwrap()
                })
                .collect();
            assert_eq!(indices.len(), 3);
            for index in indices {
                assert!((1..=4).contains(&index));
            }
        }
    }

    #[test]
    fn test_deterministic_output() {
        let scene = MockScene {
            objects: vec![MockObject::new("Quad", quad_mesh())],
        };
        let a = export_to_string(&scene, identity_config(), "determinism_a.derg");
        let b = export_to_string(&scene, identity_config(), "determinism_b.derg");
        assert_eq!(a, b);
    }

    #[test]
    fn test_index_continuity_across_objects() {
        let scene = MockScene {
            objects: vec![
                MockObject::new("First", quad_mesh()),
                MockObject::new("Second", quad_mesh()),
            ],
        };
        let content = export_to_string(&scene, identity_config(), "continuity.derg");

        let max_index: Vec<usize> = content
            .lines()
            .filter(|l| l.starts_with("f "))
            .map(|l| l[2..].split(' ').map(|t| t.parse::<usize>().unwrap()).max().unwrap())
            .collect();
        assert_eq!(max_index.len(), 4);
        // First object uses 1..=4, second 5..=8: no gaps, no reuse.
        assert_eq!(*max_index.iter().max().unwrap(), 8);
        let all: Vec<usize> = content
            .lines()
            .filter(|l| l.starts_with("f "))
            .flat_map(|l| l[2..].split(' ').map(|t| t.parse::<usize>().unwrap()))
            .collect();
        assert!(all.iter().take(6).all(|&i| i <= 4));
        assert!(all.iter().skip(6).all(|&i| (5..=8).contains(&i)));
    }

    #[test]
    fn test_mirror_reverses_face_corner_order() {
        let mut mesh = quad_mesh();
        mesh.has_normals = true;
        for face in &mut mesh.faces {
            for corner in &mut face.corners {
                corner.normal = [0.0, 0.0, 1.0];
            }
        }

        let plain = MockScene {
            objects: vec![MockObject::new("M", mesh.clone())],
        };
        let mut mirrored_object = MockObject::new("M", mesh);
        mirrored_object.transform = Mat4::from_scale(Vec3::new(-1.0, 1.0, 1.0));
        let mirrored = MockScene {
            objects: vec![mirrored_object],
        };

        let a = export_to_string(&plain, identity_config(), "winding_a.derg");
        let b = export_to_string(&mirrored, identity_config(), "winding_b.derg");

        // Resolve face corners back to positions: local indices are
        // renumbered by first occurrence, so compare geometry, not indices.
        let face_positions = |s: &str| -> Vec<Vec<[f32; 3]>> {
            let verts: Vec<[f32; 3]> = s
                .lines()
                .filter(|l| l.starts_with("v "))
                .map(|l| {
                    let t: Vec<f32> =
                        l[2..].split(' ').map(|x| x.parse().unwrap()).collect();
                    [t[0], t[1], t[2]]
                })
                .collect();
            s.lines()
                .filter(|l| l.starts_with("f "))
                .map(|l| {
                    l[2..]
                        .split(' ')
                        .map(|c| {
                            let v: usize = c.split('/').next().unwrap().parse().unwrap();
                            verts[v - 1]
                        })
                        .collect()
                })
                .collect()
        };

        let fa = face_positions(&a);
        let fb = face_positions(&b);
        assert_eq!(fa.len(), fb.len());
        for (plain_face, mirrored_face) in fa.iter().zip(fb.iter()) {
            // Undo the mirror, then the corner ring must read backwards.
            let unmirrored: Vec<[f32; 3]> = mirrored_face
                .iter()
                .map(|p| [-p[0], p[1], p[2]])
                .collect();
            let mut reversed = plain_face.clone();
            reversed.reverse();
            assert_eq!(unmirrored, reversed);
        }

        // All emitted normals are negated in the mirrored export.
        let normals = |s: &str| -> Vec<String> {
            s.lines().filter(|l| l.starts_with("vn ")).map(str::to_string).collect()
        };
        assert_eq!(normals(&a), vec!["vn 0.0000 0.0000 1.0000"]);
        assert_eq!(normals(&b), vec!["vn -0.0000 -0.0000 -1.0000"]);
    }

    #[test]
    fn test_animation_file_naming_and_frame_restore() {
        let scene = MockScene {
            objects: vec![MockObject::new("Quad", quad_mesh())],
        };
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("scene.derg");
        let mut frames = MockFrames {
            current: 2,
            range: (1, 3),
        };

        let config = ExportConfig {
            animation: true,
            ..identity_config()
        };
        let stats = Exporter::with_config(config)
            .export(&scene, &mut frames, &NullReferenceCopier, &base)
            .unwrap();

        let expected: Vec<PathBuf> = (1..=3)
            .map(|f| {
                base.with_file_name(format!(
                    "{}_{:06}.derg",
                    base.file_stem().unwrap().to_string_lossy(),
                    f
                ))
            })
            .collect();
        assert_eq!(stats.files, expected);
        for path in &expected {
            assert!(path.exists());
        }
        assert!(!base.exists());
        assert_eq!(frames.current, 2);
    }

    #[test]
    fn test_evaluation_failure_skips_object() {
        let scene = MockScene {
            objects: vec![
                MockObject::failing("Broken"),
                MockObject::new("Quad", quad_mesh()),
            ],
        };
        let content = export_to_string(&scene, identity_config(), "skip.derg");

        assert!(!content.contains("Broken"));
        assert!(content.contains("o Quad"));
    }

    #[test]
    fn test_instanced_child_excluded() {
        let mut child = MockObject::new("Child", quad_mesh());
        child.instanced_child = true;
        let scene = MockScene {
            objects: vec![child, MockObject::new("Quad", quad_mesh())],
        };
        let content = export_to_string(&scene, identity_config(), "instanced.derg");

        assert!(!content.contains("Child"));
        assert!(content.contains("o Quad"));
    }

    #[test]
    fn test_selection_only_filter() {
        let mut selected = MockObject::new("Picked", quad_mesh());
        selected.selected = true;
        let scene = MockScene {
            objects: vec![MockObject::new("Other", quad_mesh()), selected],
        };
        let config = ExportConfig {
            selection_only: true,
            ..identity_config()
        };
        let content = export_to_string(&scene, config, "selection.derg");

        assert!(content.contains("o Picked"));
        assert!(!content.contains("Other"));
    }

    #[test]
    fn test_group_markers_run_length_suppressed() {
        let mut mesh = Mesh::new();
        for p in [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [2.0, 0.0, 0.0],
            [2.0, 1.0, 0.0],
            [3.0, 0.0, 0.0],
        ] {
            mesh.add_vertex(p);
        }
        mesh.add_face(Face::from_vertices(&[0, 1, 2]));
        mesh.add_face(Face::from_vertices(&[1, 3, 2]));
        mesh.add_face(Face::from_vertices(&[3, 5, 4]));
        mesh.groups = vec![
            VertexGroup::new("left arm")
                .with_weight(0, 1.0)
                .with_weight(1, 1.0)
                .with_weight(2, 1.0),
            VertexGroup::new("right arm")
                .with_weight(3, 1.0)
                .with_weight(4, 1.0)
                .with_weight(5, 1.0),
        ];

        let scene = MockScene {
            objects: vec![MockObject::new("Body", mesh)],
        };
        let content = export_to_string(&scene, identity_config(), "groups.derg");

        let markers: Vec<&str> = content.lines().filter(|l| l.starts_with("g ")).collect();
        // Faces 1 and 2 share "left arm": one marker each for the two runs.
        assert_eq!(markers, vec!["g left_arm", "g right_arm"]);
    }

    #[test]
    fn test_group_by_object_mode() {
        let mut mesh = quad_mesh();
        mesh.groups = vec![VertexGroup::new("arm").with_weight(0, 1.0)];
        let scene = MockScene {
            objects: vec![MockObject::new("Quad", mesh)],
        };
        let config = ExportConfig {
            grouping: GroupingMode::Objects,
            ..identity_config()
        };
        let content = export_to_string(&scene, config, "by_object.derg");

        assert!(content.starts_with("g Quad\n"));
        // No vertex-group markers in this mode.
        assert_eq!(content.lines().filter(|l| l.starts_with("g ")).count(), 1);
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let scene = MockScene { objects: vec![] };
        let mut frames = MockFrames {
            current: 1,
            range: (1, 1),
        };
        let config = ExportConfig {
            global_scale: 0.0,
            ..ExportConfig::default()
        };
        let result = Exporter::with_config(config).export(
            &scene,
            &mut frames,
            &NullReferenceCopier,
            &dir.path().join("invalid.derg"),
        );
        assert!(matches!(result, Err(ExportError::InvalidConfig(_))));
    }

    #[test]
    fn test_io_failure_reports_path_and_restores_frame() {
        let scene = MockScene {
            objects: vec![MockObject::new("Quad", quad_mesh())],
        };
        let mut frames = MockFrames {
            current: 7,
            range: (1, 3),
        };
        let config = ExportConfig {
            animation: true,
            ..identity_config()
        };
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("missing_dir").join("scene.derg");

        let result =
            Exporter::with_config(config).export(&scene, &mut frames, &NullReferenceCopier, &bad);

        match result {
            Err(ExportError::Io { path, .. }) => {
                assert!(path.to_string_lossy().contains("scene_000001.derg"))
            }
            other => panic!("expected I/O error, got {:?}", other),
        }
        assert_eq!(frames.current, 7);
    }

    #[test]
    fn test_frame_path_padding() {
        assert_eq!(
            frame_path(Path::new("scene.derg"), 1),
            PathBuf::from("scene_000001.derg")
        );
        assert_eq!(
            frame_path(Path::new("out/take two.derg"), 42),
            PathBuf::from("out/take two_000042.derg")
        );
    }

    #[test]
    fn test_dedup_shares_positions_within_mesh() {
        // Two triangles sharing an edge: 4 unique positions, not 6.
        let mut mesh = Mesh::new();
        for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]] {
            mesh.add_vertex(p);
        }
        mesh.add_face(Face::from_vertices(&[0, 1, 2]));
        mesh.add_face(Face::from_vertices(&[0, 2, 3]));
        let scene = MockScene {
            objects: vec![MockObject::new("Tris", mesh)],
        };
        let content = export_to_string(&scene, identity_config(), "dedup.derg");
        assert_eq!(content.lines().filter(|l| l.starts_with("v ")).count(), 4);
    }

    #[test]
    fn test_uv_not_shared_across_vertices() {
        // Both corners carry UV (0.5, 0.5) but belong to different
        // vertices, so two vt records are emitted.
        let mut mesh = Mesh::new();
        mesh.has_uvs = true;
        for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]] {
            mesh.add_vertex(p);
        }
        mesh.add_face(Face::new(vec![
            Corner::new(0).with_uv([0.5, 0.5]),
            Corner::new(1).with_uv([0.5, 0.5]),
            Corner::new(2).with_uv([0.0, 0.0]),
        ]));
        let scene = MockScene {
            objects: vec![MockObject::new("Uv", mesh)],
        };
        let content = export_to_string(&scene, identity_config(), "uv_split.derg");
        assert_eq!(content.lines().filter(|l| l.starts_with("vt ")).count(), 3);
    }

    #[test]
    fn test_differing_data_name_concatenated() {
        let mut object = MockObject::new("My Cube", quad_mesh());
        object.data_name = "Mesh 001".to_string();
        let scene = MockScene {
            objects: vec![object],
        };
        let content = export_to_string(&scene, identity_config(), "names.derg");
        assert!(content.starts_with("o My_Cube_Mesh_001\n"));
    }
}

//! Derg Export CLI
//!
//! Export JSON scene descriptions to the derg interchange format.

use clap::{Parser, Subcommand};
use derg_export::{
    AxisDirection, Corner, EvaluationSettings, ExportConfig, Exporter, Face, FrameController,
    GroupingMode, Mesh, ReferenceFileCopier, SceneObject, SceneProvider, VertexGroup,
};
use glam::Mat4;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "derg-export")]
#[command(author, version, about = "Export mesh scenes to the derg format", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a JSON scene file to .derg
    Export {
        /// Input JSON scene file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export selected objects only
        #[arg(long)]
        selection_only: bool,

        /// Export the scene's whole frame range, one file per frame
        #[arg(long)]
        animation: bool,

        /// Skip modifier evaluation
        #[arg(long)]
        no_modifiers: bool,

        /// Evaluate modifiers at render quality
        #[arg(long)]
        render_modifiers: bool,

        /// Global scale factor
        #[arg(long, default_value = "1.0")]
        scale: f32,

        /// Forward axis (x, y, z, -x, -y, -z)
        #[arg(long, default_value = "-z", value_parser = parse_axis)]
        forward: AxisDirection,

        /// Up axis (x, y, z, -x, -y, -z)
        #[arg(long, default_value = "y", value_parser = parse_axis)]
        up: AxisDirection,

        /// Group output by object instead of by vertex group
        #[arg(long)]
        group_by_object: bool,
    },

    /// Show information about a JSON scene file
    Info {
        /// Input JSON scene file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn parse_axis(s: &str) -> Result<AxisDirection, String> {
    AxisDirection::parse(s).ok_or_else(|| format!("Invalid axis: '{}'. Use x, y, z, -x, -y, -z", s))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            selection_only,
            animation,
            no_modifiers,
            render_modifiers,
            scale,
            forward,
            up,
            group_by_object,
        } => {
            let config = ExportConfig {
                apply_modifiers: !no_modifiers,
                apply_modifiers_render: render_modifiers,
                grouping: if group_by_object {
                    GroupingMode::Objects
                } else {
                    GroupingMode::VertexGroups
                },
                selection_only,
                animation,
                global_scale: scale,
                axis_forward: forward,
                axis_up: up,
            };
            export_scene(&input, &output, config)?;
        }
        Commands::Info { input } => {
            show_scene_info(&input)?;
        }
    }

    Ok(())
}

fn export_scene(
    input_path: &Path,
    output_path: &Path,
    config: ExportConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading scene from {:?}...", input_path);
    let scene_file = load_scene_file(input_path)?;
    println!("  Loaded {} objects", scene_file.objects.len());

    let scene = JsonScene::from_file(&scene_file)?;
    let mut frames = JsonFrames {
        current: scene_file.current_frame,
        range: (scene_file.frame_start, scene_file.frame_end),
    };
    let copier = DirectoryCopier {
        destination: output_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };

    let exporter = Exporter::with_config(config);
    let stats = exporter.export(&scene, &mut frames, &copier, output_path)?;

    println!(
        "Exported {} objects, {} triangles",
        stats.objects_written, stats.faces_written
    );
    for file in &stats.files {
        println!("  Wrote {:?}", file);
    }

    Ok(())
}

fn show_scene_info(input_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading scene from {:?}...", input_path);
    let scene_file = load_scene_file(input_path)?;

    println!("\nScene Info:");
    println!(
        "  Frames: {}..={} (current {})",
        scene_file.frame_start, scene_file.frame_end, scene_file.current_frame
    );
    println!("  Objects: {}", scene_file.objects.len());
    for entry in &scene_file.objects {
        let mesh = build_mesh(&entry.mesh)?;
        println!(
            "    {} - {} vertices, {} faces, {} groups{}",
            entry.name,
            mesh.vertex_count(),
            mesh.face_count(),
            mesh.groups.len(),
            if entry.selected { " (selected)" } else { "" }
        );
    }

    Ok(())
}

fn load_scene_file(path: &Path) -> Result<SceneFile, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let scene = serde_json::from_str(&content).map_err(derg_export::ExportError::Json)?;
    Ok(scene)
}

// JSON scene format

#[derive(serde::Deserialize)]
struct SceneFile {
    #[serde(default = "default_frame")]
    frame_start: i32,
    #[serde(default = "default_frame")]
    frame_end: i32,
    #[serde(default = "default_frame")]
    current_frame: i32,
    objects: Vec<ObjectEntry>,
}

fn default_frame() -> i32 {
    1
}

#[derive(serde::Deserialize)]
struct ObjectEntry {
    name: String,
    /// Geometry-data name; defaults to the object name.
    data_name: Option<String>,
    #[serde(default)]
    selected: bool,
    #[serde(default)]
    instanced_child: bool,
    /// Row-major 4x4 world transform; identity when omitted.
    transform: Option<[[f32; 4]; 4]>,
    mesh: MeshEntry,
    #[serde(default)]
    references: Vec<PathBuf>,
}

#[derive(serde::Deserialize)]
struct MeshEntry {
    positions: Vec<[f32; 3]>,
    faces: Vec<FaceEntry>,
    #[serde(default)]
    groups: Vec<GroupEntry>,
}

#[derive(serde::Deserialize)]
struct FaceEntry {
    vertices: Vec<u32>,
    uvs: Option<Vec<[f32; 2]>>,
    normals: Option<Vec<[f32; 3]>>,
}

#[derive(serde::Deserialize)]
struct GroupEntry {
    name: String,
    weights: Vec<(u32, f32)>,
}

fn build_mesh(entry: &MeshEntry) -> Result<Mesh, String> {
    let mut mesh = Mesh::new();
    mesh.positions = entry.positions.clone();
    mesh.has_uvs = entry.faces.iter().any(|f| f.uvs.is_some());
    mesh.has_normals = entry.faces.iter().any(|f| f.normals.is_some());

    for (index, face) in entry.faces.iter().enumerate() {
        let count = face.vertices.len();
        if count < 3 {
            return Err(format!("face {} has fewer than 3 vertices", index));
        }
        if let Some(uvs) = &face.uvs {
            if uvs.len() != count {
                return Err(format!("face {} has {} UVs for {} corners", index, uvs.len(), count));
            }
        }
        if let Some(normals) = &face.normals {
            if normals.len() != count {
                return Err(format!(
                    "face {} has {} normals for {} corners",
                    index,
                    normals.len(),
                    count
                ));
            }
        }
        if let Some(&v) = face.vertices.iter().find(|&&v| v as usize >= mesh.positions.len()) {
            return Err(format!("face {} references missing vertex {}", index, v));
        }

        let corners = (0..count)
            .map(|i| {
                let mut corner = Corner::new(face.vertices[i]);
                if let Some(uvs) = &face.uvs {
                    corner = corner.with_uv(uvs[i]);
                }
                if let Some(normals) = &face.normals {
                    corner = corner.with_normal(normals[i]);
                }
                corner
            })
            .collect();
        mesh.add_face(Face::new(corners));
    }

    for group in &entry.groups {
        let mut vertex_group = VertexGroup::new(&group.name);
        for &(vertex, weight) in &group.weights {
            vertex_group.weights.insert(vertex, weight);
        }
        mesh.groups.push(vertex_group);
    }

    Ok(mesh)
}

// Scene trait implementations backed by the JSON file

struct JsonObject {
    name: String,
    data_name: String,
    selected: bool,
    instanced_child: bool,
    transform: Mat4,
    mesh: Mesh,
    references: Vec<PathBuf>,
}

impl SceneObject for JsonObject {
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

    fn evaluate_mesh(&self, _settings: &EvaluationSettings) -> derg_export::Result<Mesh> {
        // JSON scenes carry pre-evaluated geometry, so modifier settings
        // have nothing left to apply.
        Ok(self.mesh.clone())
    }

    fn referenced_files(&self) -> Vec<PathBuf> {
        self.references.clone()
    }
}

struct JsonScene {
    objects: Vec<JsonObject>,
}

impl JsonScene {
    fn from_file(file: &SceneFile) -> Result<Self, Box<dyn std::error::Error>> {
        let mut objects = Vec::with_capacity(file.objects.len());
        for entry in &file.objects {
            let mesh = build_mesh(&entry.mesh)
                .map_err(|e| format!("object '{}': {}", entry.name, e))?;
            let transform = entry
                .transform
                .map(|rows| Mat4::from_cols_array_2d(&rows).transpose())
                .unwrap_or(Mat4::IDENTITY);
            objects.push(JsonObject {
                name: entry.name.clone(),
                data_name: entry.data_name.clone().unwrap_or_else(|| entry.name.clone()),
                selected: entry.selected,
                instanced_child: entry.instanced_child,
                transform,
                mesh,
                references: entry.references.clone(),
            });
        }
        Ok(Self { objects })
    }
}

impl SceneProvider for JsonScene {
    type Object = JsonObject;

    fn enumerate_objects(&self, selection_only: bool) -> Vec<&JsonObject> {
        self.objects
            .iter()
            .filter(|o| !selection_only || o.selected)
            .collect()
    }
}

struct JsonFrames {
    current: i32,
    range: (i32, i32),
}

impl FrameController for JsonFrames {
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

/// Copies referenced resource files next to the exported output.
struct DirectoryCopier {
    destination: PathBuf,
}

impl ReferenceFileCopier for DirectoryCopier {
    fn copy_referenced_files(&self, paths: &BTreeSet<PathBuf>) -> derg_export::Result<()> {
        for source in paths {
            let Some(file_name) = source.file_name() else {
                continue;
            };
            let target = self.destination.join(file_name);
            if target == *source {
                continue;
            }
            fs::copy(source, &target).map_err(|e| {
                derg_export::ExportError::ReferenceCopy(format!(
                    "{:?} -> {:?}: {}",
                    source, target, e
                ))
            })?;
        }
        Ok(())
    }
}

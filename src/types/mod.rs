//! Shared mesh types used throughout the library.

mod axis;

pub use axis::{axis_conversion_matrix, AxisDirection};

use std::collections::HashMap;

/// One vertex's appearance within one specific face (a "loop" in modeling
/// terms), carrying its own split normal and UV independent of other faces
/// sharing the same vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    /// Index into the mesh's vertex position array.
    pub vertex: u32,
    /// Texture coordinates. Meaningful only when `Mesh::has_uvs` is set.
    pub uv: [f32; 2],
    /// Split normal. Meaningful only when `Mesh::has_normals` is set.
    pub normal: [f32; 3],
}

impl Corner {
    pub fn new(vertex: u32) -> Self {
        Self {
            vertex,
            uv: [0.0, 0.0],
            normal: [0.0, 0.0, 0.0],
        }
    }

    pub fn with_uv(mut self, uv: [f32; 2]) -> Self {
        self.uv = uv;
        self
    }

    pub fn with_normal(mut self, normal: [f32; 3]) -> Self {
        self.normal = normal;
        self
    }
}

/// A polygonal face: an ordered ring of corners, at least 3.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub corners: Vec<Corner>,
}

impl Face {
    pub fn new(corners: Vec<Corner>) -> Self {
        Self { corners }
    }

    /// Build a face from bare vertex indices (no UVs or normals).
    pub fn from_vertices(vertices: &[u32]) -> Self {
        Self {
            corners: vertices.iter().map(|&v| Corner::new(v)).collect(),
        }
    }

    /// Number of distinct vertex indices referenced by this face.
    pub fn distinct_vertex_count(&self) -> usize {
        let mut seen: Vec<u32> = self.corners.iter().map(|c| c.vertex).collect();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }
}

/// A named per-vertex weight assignment, used to select a dominant group
/// per face during export.
#[derive(Debug, Clone, Default)]
pub struct VertexGroup {
    pub name: String,
    /// Vertex index to weight in [0, 1].
    pub weights: HashMap<u32, f32>,
}

impl VertexGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weights: HashMap::new(),
        }
    }

    pub fn with_weight(mut self, vertex: u32, weight: f32) -> Self {
        self.weights.insert(vertex, weight);
        self
    }
}

/// A polygon mesh: positions, n-gon faces with per-corner attributes, and
/// named vertex groups. Groups are kept in declaration order; that order is
/// the tie-break order for face group assignment.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Polygonal faces, each with >= 3 corners.
    pub faces: Vec<Face>,
    /// Named vertex groups, in declaration order.
    pub groups: Vec<VertexGroup>,
    /// Whether corners carry meaningful UVs.
    pub has_uvs: bool,
    /// Whether corners carry meaningful split normals.
    pub has_normals: bool,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex position and return its index.
    pub fn add_vertex(&mut self, position: [f32; 3]) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        index
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// A mesh with neither vertices nor faces has nothing to emit.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.faces.is_empty()
    }
}

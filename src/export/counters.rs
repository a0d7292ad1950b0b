//! Global index allocation across objects within one output file.

/// Running per-attribute counts that turn per-mesh local dedup indices into
/// a single flat index space for the whole file.
///
/// Protocol: read the base offsets before processing an object, then call
/// [`commit`](IndexAllocator::commit) exactly once after that object's
/// attributes have all been emitted. Offsets are read-then-committed in
/// strict per-object sequence, so no two objects' index ranges overlap.
#[derive(Debug, Default)]
pub struct IndexAllocator {
    vertices: usize,
    uvs: usize,
    normals: usize,
}

impl IndexAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertices written to the file before the current object.
    pub fn base_vertex_offset(&self) -> usize {
        self.vertices
    }

    /// UVs written to the file before the current object.
    pub fn base_uv_offset(&self) -> usize {
        self.uvs
    }

    /// Normals written to the file before the current object.
    pub fn base_normal_offset(&self) -> usize {
        self.normals
    }

    /// Advance the counters past a fully emitted object.
    pub fn commit(&mut self, local_vertices: usize, local_uvs: usize, local_normals: usize) {
        self.vertices += local_vertices;
        self.uvs += local_uvs;
        self.normals += local_normals;
    }
}

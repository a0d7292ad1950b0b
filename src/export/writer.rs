//! Record emission in the derg line grammar.
//!
//! The stream is append-only: no record is rewritten once emitted. Within
//! one object the order is fixed: name record, vertices, UVs, normals, then
//! group markers interleaved with faces.

use std::io::{self, Write};

/// Replace characters the derg grammar cannot carry in a name token.
pub fn name_compat(name: &str) -> String {
    name.replace(' ', "_")
}

/// Build the name token for an object record: the container name alone when
/// it matches the geometry-data name, otherwise both joined with an
/// underscore.
pub fn object_record_name(name: &str, data_name: &str) -> String {
    if name == data_name {
        name_compat(name)
    } else {
        format!("{}_{}", name_compat(name), name_compat(data_name))
    }
}

/// Global 1-based indices for one emitted face corner. The UV and normal
/// slots are omitted from the record when the mesh lacks those layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CornerIndices {
    pub vertex: usize,
    pub uv: Option<usize>,
    pub normal: Option<usize>,
}

/// Writes derg records to an output stream.
pub struct RecordWriter<W: Write> {
    out: W,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// `o <name>` object record.
    pub fn write_object(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out, "o {}", name)
    }

    /// `g <name>` record, used both for group-by-object naming and for
    /// vertex-group markers.
    pub fn write_group(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out, "g {}", name)
    }

    /// `v <x> <y> <z>` vertex position record, 6 decimal places.
    pub fn write_vertex(&mut self, position: [f32; 3]) -> io::Result<()> {
        writeln!(
            self.out,
            "v {:.6} {:.6} {:.6}",
            position[0], position[1], position[2]
        )
    }

    /// `vt <u> <v>` UV record, 6 decimal places.
    pub fn write_uv(&mut self, uv: [f32; 2]) -> io::Result<()> {
        writeln!(self.out, "vt {:.6} {:.6}", uv[0], uv[1])
    }

    /// `vn <x> <y> <z>` normal record, 4 decimal places.
    pub fn write_normal(&mut self, normal: [f32; 3]) -> io::Result<()> {
        writeln!(self.out, "vn {:.4} {:.4} {:.4}", normal[0], normal[1], normal[2])
    }

    /// `f` record for one triangle.
    pub fn write_face(&mut self, corners: &[CornerIndices]) -> io::Result<()> {
        write!(self.out, "f")?;
        for corner in corners {
            match (corner.uv, corner.normal) {
                (Some(uv), Some(normal)) => {
                    write!(self.out, " {}/{}/{}", corner.vertex, uv, normal)?
                }
                (None, Some(normal)) => write!(self.out, " {}//{}", corner.vertex, normal)?,
                (Some(uv), None) => write!(self.out, " {}/{}", corner.vertex, uv)?,
                (None, None) => write!(self.out, " {}", corner.vertex)?,
            }
        }
        writeln!(self.out)
    }

    /// Flush and hand back the underlying stream.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

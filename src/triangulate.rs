//! N-gon face triangulation.
//!
//! Runs before any transform is applied: ear choices for concave or
//! non-planar polygons are defined on the authored topology, and applying
//! the transform first could change which tessellation is picked.
//! Triangulation only regroups existing corners; it never introduces new
//! vertices, UVs, or normals.

use glam::Vec3;

use crate::types::{Face, Mesh};

/// Replace every face of the mesh with triangles covering the same area and
/// boundary. Faces with fewer than 3 distinct vertices are dropped with a
/// warning.
pub fn triangulate(mesh: &mut Mesh) {
    let faces = std::mem::take(&mut mesh.faces);
    let mut triangles = Vec::with_capacity(faces.len() * 2);

    for face in faces {
        if face.distinct_vertex_count() < 3 {
            log::warn!(
                "dropping degenerate face with {} distinct vertices",
                face.distinct_vertex_count()
            );
            continue;
        }
        if face.corners.len() == 3 {
            triangles.push(face);
        } else {
            triangulate_face(&mesh.positions, face, &mut triangles);
        }
    }

    mesh.faces = triangles;
}

/// Ear-clip one n-gon (n > 3) into triangles, appending to `out`.
fn triangulate_face(positions: &[[f32; 3]], face: Face, out: &mut Vec<Face>) {
    let corners = face.corners;
    let points: Vec<[f32; 2]> = project(positions, corners.iter().map(|c| c.vertex));

    let mut ring: Vec<usize> = (0..corners.len()).collect();
    while ring.len() > 3 {
        let Some(ear) = find_ear(&points, &ring) else {
            // No clippable ear (collinear runs, self-intersection): fan the
            // remaining ring so every corner is still covered.
            for i in 1..ring.len() - 1 {
                out.push(Face::new(vec![
                    corners[ring[0]],
                    corners[ring[i]],
                    corners[ring[i + 1]],
                ]));
            }
            return;
        };

        let prev = ring[(ear + ring.len() - 1) % ring.len()];
        let next = ring[(ear + 1) % ring.len()];
        out.push(Face::new(vec![
            corners[prev],
            corners[ring[ear]],
            corners[next],
        ]));
        ring.remove(ear);
    }

    out.push(Face::new(vec![
        corners[ring[0]],
        corners[ring[1]],
        corners[ring[2]],
    ]));
}

/// Project the polygon onto the plane that drops its dominant normal axis,
/// keeping the projected winding counter-clockwise.
fn project(positions: &[[f32; 3]], vertices: impl Iterator<Item = u32>) -> Vec<[f32; 2]> {
    let pts: Vec<Vec3> = vertices
        .map(|v| Vec3::from_array(positions[v as usize]))
        .collect();

    // Newell's method: robust for concave and slightly non-planar polygons.
    let mut normal = Vec3::ZERO;
    for i in 0..pts.len() {
        let a = pts[i];
        let b = pts[(i + 1) % pts.len()];
        normal += Vec3::new(
            (a.y - b.y) * (a.z + b.z),
            (a.z - b.z) * (a.x + b.x),
            (a.x - b.x) * (a.y + b.y),
        );
    }

    let n = normal.abs();
    let dominant = if n.x > n.y && n.x > n.z {
        0
    } else if n.y > n.z {
        1
    } else {
        2
    };
    let (u, v) = match dominant {
        0 => (1, 2),
        1 => (2, 0),
        _ => (0, 1),
    };
    // A negative dominant component mirrors the projection; swap axes to
    // keep the ring counter-clockwise.
    let flip = normal[dominant] < 0.0;

    pts.iter()
        .map(|p| {
            if flip {
                [p[v], p[u]]
            } else {
                [p[u], p[v]]
            }
        })
        .collect()
}

/// Find a convex corner of the ring whose triangle contains no other ring
/// point.
fn find_ear(points: &[[f32; 2]], ring: &[usize]) -> Option<usize> {
    let len = ring.len();
    for i in 0..len {
        let a = points[ring[(i + len - 1) % len]];
        let b = points[ring[i]];
        let c = points[ring[(i + 1) % len]];

        if cross2(a, b, c) <= 0.0 {
            continue; // reflex or collinear corner
        }

        let blocked = ring.iter().enumerate().any(|(j, &rj)| {
            j != (i + len - 1) % len
                && j != i
                && j != (i + 1) % len
                && point_in_triangle(points[rj], a, b, c)
        });
        if !blocked {
            return Some(i);
        }
    }
    None
}

fn cross2(o: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

// Boundary points count as inside: a reflex vertex sitting exactly on an
// ear's diagonal must still block that ear.
fn point_in_triangle(p: [f32; 2], a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> bool {
    let d0 = cross2(a, b, p);
    let d1 = cross2(b, c, p);
    let d2 = cross2(c, a, p);
    d0 >= 0.0 && d1 >= 0.0 && d2 >= 0.0
}

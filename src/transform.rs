//! Global transform application and orientation normalization.
//!
//! Runs after triangulation and before deduplication: dedup keys are
//! computed on the final transformed coordinates.

use glam::{Mat3, Mat4, Vec3};

use crate::types::Mesh;

/// Apply a 4x4 affine transform to every vertex position and every split
/// normal of the mesh.
///
/// When the transform's determinant is negative (a mirroring transform),
/// every face's winding order is reversed and every normal negated so the
/// mesh's apparent outward direction is preserved. The determinant test is
/// an explicit precomputed branch so the flip is independently testable.
pub fn apply_transform(mesh: &mut Mesh, matrix: Mat4) {
    let normal_matrix = Mat3::from_mat4(matrix);
    let mirrored = matrix.determinant() < 0.0;

    for position in &mut mesh.positions {
        *position = matrix.transform_point3(Vec3::from_array(*position)).to_array();
    }

    if mesh.has_normals {
        for face in &mut mesh.faces {
            for corner in &mut face.corners {
                let n = normal_matrix * Vec3::from_array(corner.normal);
                corner.normal = n.normalize_or_zero().to_array();
            }
        }
    }

    if mirrored {
        for face in &mut mesh.faces {
            // Corners carry their own attributes, so reversing the ring
            // keeps each normal and UV attached to its vertex.
            face.corners.reverse();
            for corner in &mut face.corners {
                corner.normal = [-corner.normal[0], -corner.normal[1], -corner.normal[2]];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Corner, Face};

    fn test_mesh() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.has_normals = true;
        for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
            mesh.add_vertex(p);
        }
        mesh.add_face(Face::new(
            (0..3u32)
                .map(|i| Corner::new(i).with_normal([0.0, 0.0, 1.0]))
                .collect(),
        ));
        mesh
    }

    #[test]
    fn test_positions_transformed() {
        let mut mesh = test_mesh();
        apply_transform(
            &mut mesh,
            Mat4::from_scale(Vec3::splat(2.0)) * Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)),
        );

        assert_eq!(mesh.positions[0], [2.0, 0.0, 0.0]);
        assert_eq!(mesh.positions[1], [4.0, 0.0, 0.0]);
    }

    #[test]
    fn test_normals_renormalized() {
        let mut mesh = test_mesh();
        apply_transform(&mut mesh, Mat4::from_scale(Vec3::splat(3.0)));

        for corner in &mesh.faces[0].corners {
            let n = Vec3::from_array(corner.normal);
            assert!((n.length() - 1.0).abs() < 1e-6);
            assert!(n.z > 0.99);
        }
    }

    #[test]
    fn test_positive_determinant_keeps_winding() {
        let mut mesh = test_mesh();
        let before: Vec<u32> = mesh.faces[0].corners.iter().map(|c| c.vertex).collect();
        apply_transform(&mut mesh, Mat4::from_rotation_y(1.2));
        let after: Vec<u32> = mesh.faces[0].corners.iter().map(|c| c.vertex).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_mirror_flips_winding_and_normals() {
        let mut mesh = test_mesh();
        // Mirror across the XY plane: determinant is negative.
        let mirror = Mat4::from_scale(Vec3::new(1.0, 1.0, -1.0));
        assert!(mirror.determinant() < 0.0);

        apply_transform(&mut mesh, mirror);

        let order: Vec<u32> = mesh.faces[0].corners.iter().map(|c| c.vertex).collect();
        assert_eq!(order, vec![2, 1, 0]);
        for corner in &mesh.faces[0].corners {
            // Mirrored to -Z by the matrix, then negated by the flip.
            assert!(corner.normal[2] > 0.99);
        }
    }
}

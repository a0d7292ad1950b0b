//! Face-to-vertex-group assignment by majority accumulated weight.

use crate::types::{Face, Mesh};

/// Resolve the dominant vertex group for a face: sum, over the face's
/// vertices, the weight each vertex holds in each group, and pick the group
/// with the maximum total. Ties break toward the earliest group in the
/// mesh's declaration order.
///
/// Returns the winning group's index into `mesh.groups`, or `None` when the
/// mesh defines no groups or none of them touch this face's vertices
/// (the caller emits the ungrouped sentinel).
pub fn resolve_face_group(mesh: &Mesh, face: &Face) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;

    for (index, group) in mesh.groups.iter().enumerate() {
        let mut total = 0.0f32;
        let mut touches = false;
        for corner in &face.corners {
            if let Some(&weight) = group.weights.get(&corner.vertex) {
                total += weight;
                touches = true;
            }
        }
        if !touches {
            continue;
        }
        // Strict comparison keeps the earlier group on ties.
        match best {
            Some((_, best_total)) if total <= best_total => {}
            _ => best = Some((index, total)),
        }
    }

    best.map(|(index, _)| index)
}

/// Sentinel group name for faces outside every vertex group.
pub const UNGROUPED: &str = "(null)";

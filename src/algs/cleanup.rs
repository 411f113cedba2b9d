//! Post-edit mesh cleanup: vertex welding and culling.
//!
//! Batch operators leave behind duplicate vertices (several replacement
//! vertices created at the same position) and orphaned vertices (endpoints of
//! deleted faces). [`weld`] merges vertices that coincide within a tolerance,
//! [`cull_vertices`] drops vertices no face references. Neither touches face
//! keys.
//!
//! Coincident vertices are found with a uniform spatial hash whose cell size
//! equals the weld tolerance, so every candidate within tolerance lies in one
//! of the 27 cells around a vertex.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use itertools::Itertools;

use crate::geometry::metrics::distance_squared;
use crate::geometry::Point3;
use crate::mesh_error::MeshPatternError;
use crate::topology::mesh::PolyMesh;
use crate::topology::point::{FaceId, VertexId};

/// Default distance under which two vertices are considered coincident.
pub const DEFAULT_WELD_TOLERANCE: f64 = 1e-6;

/// Options for [`weld`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeldOptions {
    /// Maximum distance between two vertices that get merged.
    pub tolerance: f64,
}

impl Default for WeldOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_WELD_TOLERANCE,
        }
    }
}

impl WeldOptions {
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn validate(&self) -> Result<(), MeshPatternError> {
        if self.tolerance.is_finite() && self.tolerance > 0.0 {
            Ok(())
        } else {
            Err(MeshPatternError::InvalidTolerance(self.tolerance))
        }
    }
}

/// What a [`weld`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeldReport {
    /// Merged-away vertex → surviving representative.
    pub merged: BTreeMap<VertexId, VertexId>,
    /// Faces whose loop was rewritten.
    pub rewritten_faces: Vec<FaceId>,
    /// Rewritten faces that were pinched and lost their smaller sub-loops.
    pub trimmed_faces: Vec<FaceId>,
    /// Faces that collapsed below three vertices or clashed with a
    /// neighbour, and were removed.
    pub removed_faces: Vec<FaceId>,
}

/// What a [`clean`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub weld: WeldReport,
    pub culled_vertices: usize,
}

/// Merge vertices lying within `options.tolerance` of each other.
///
/// Each cluster keeps its lowest-keyed vertex (and that vertex's position);
/// the other members are substituted in every face loop and deleted.
/// Consecutive repeats created by the substitution are dropped from the loop.
/// A loop pinched at a vertex it now visits twice is cut there into sub-loops;
/// the largest keeps the face key and the others are dropped (see
/// [`WeldReport::trimmed_faces`]), so weld never creates faces. A face that
/// falls below three vertices, or whose rewritten loop would claim a directed
/// edge already in use, is removed and listed in [`WeldReport::removed_faces`].
///
/// Only an invalid tolerance is an error; the mesh is then left untouched.
pub fn weld(mesh: &mut PolyMesh, options: &WeldOptions) -> Result<WeldReport, MeshPatternError> {
    options.validate()?;
    let merged = coincident_vertices(mesh, options.tolerance);
    if merged.is_empty() {
        return Ok(WeldReport::default());
    }

    let mut rewritten: Vec<(FaceId, Vec<VertexId>)> = Vec::new();
    for face in mesh.faces() {
        let Some(lp) = mesh.face_vertices(face) else {
            continue;
        };
        if !lp.iter().any(|v| merged.contains_key(v)) {
            continue;
        }
        let mapped = lp.iter().map(|v| *merged.get(v).unwrap_or(v)).collect();
        rewritten.push((face, dedup_cyclic(mapped)));
    }

    let mut work = mesh.clone();
    for (face, _) in &rewritten {
        work.delete_face(*face);
    }

    let mut report = WeldReport::default();
    for (face, lp) in rewritten {
        let mut parts: Vec<_> = split_pinched(lp)
            .into_iter()
            .filter(|part| part.len() >= 3)
            .collect();
        let Some(main) = parts.iter().position_max_by_key(|part| part.len()) else {
            log::warn!("weld: face {face} degenerated, removed");
            report.removed_faces.push(face);
            continue;
        };
        let kept = parts.swap_remove(main);
        match work.add_face_with_key(face, kept) {
            Ok(k) => report.rewritten_faces.push(k),
            Err(e) => {
                log::warn!("weld: face {face} removed: {e}");
                report.removed_faces.push(face);
                continue;
            }
        }
        if !parts.is_empty() {
            log::warn!("weld: face {face} pinched, dropped {} sub-loops", parts.len());
            report.trimmed_faces.push(face);
        }
    }
    for &v in merged.keys() {
        work.delete_vertex(v)?;
    }

    log::debug!(
        "weld: merged {} vertices, rewrote {} faces",
        merged.len(),
        report.rewritten_faces.len()
    );
    report.merged = merged;
    *mesh = work;
    Ok(report)
}

/// Remove every vertex that no face references. Returns how many were removed.
pub fn cull_vertices(mesh: &mut PolyMesh) -> usize {
    let orphans: Vec<VertexId> = mesh
        .vertices()
        .filter(|&v| mesh.vertex_faces(v).is_empty())
        .collect();
    for &v in &orphans {
        // Orphans have an empty star, so deletion cannot fail.
        let _ = mesh.delete_vertex(v);
    }
    if !orphans.is_empty() {
        log::debug!("cull: removed {} unreferenced vertices", orphans.len());
    }
    orphans.len()
}

/// [`weld`] followed by [`cull_vertices`].
pub fn clean(mesh: &mut PolyMesh, options: &WeldOptions) -> Result<CleanupReport, MeshPatternError> {
    let weld = weld(mesh, options)?;
    let culled_vertices = cull_vertices(mesh);
    Ok(CleanupReport {
        weld,
        culled_vertices,
    })
}

/// Map every vertex that has a lower-keyed vertex within `tolerance` to that
/// representative. Representatives themselves are not in the map.
fn coincident_vertices(mesh: &PolyMesh, tolerance: f64) -> BTreeMap<VertexId, VertexId> {
    let inv = 1.0 / tolerance;
    let tol2 = tolerance * tolerance;
    let mut cells: HashMap<(i64, i64, i64), Vec<(VertexId, Point3)>> = HashMap::new();
    let mut merged = BTreeMap::new();

    for v in mesh.vertices() {
        let Some(p) = mesh.vertex_position(v) else {
            continue;
        };
        let key = cell_key(p, inv);
        let mut representative: Option<VertexId> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let neighbour = (
                        key.0.saturating_add(dx),
                        key.1.saturating_add(dy),
                        key.2.saturating_add(dz),
                    );
                    let Some(reps) = cells.get(&neighbour) else {
                        continue;
                    };
                    for &(r, q) in reps {
                        if distance_squared(p, q) <= tol2
                            && representative.is_none_or(|best| r < best)
                        {
                            representative = Some(r);
                        }
                    }
                }
            }
        }
        match representative {
            Some(r) => {
                merged.insert(v, r);
            }
            None => cells.entry(key).or_default().push((v, p)),
        }
    }

    merged
}

#[inline]
fn cell_key(p: Point3, inv: f64) -> (i64, i64, i64) {
    (floor_sat_i64(p[0] * inv), floor_sat_i64(p[1] * inv), floor_sat_i64(p[2] * inv))
}

#[inline]
fn floor_sat_i64(x: f64) -> i64 {
    if !x.is_finite() {
        return if x.is_sign_positive() { i64::MAX } else { i64::MIN };
    }
    // `as` saturates; step down for negative non-integers.
    let i = x as i64;
    i - ((i as f64 > x) as i64)
}

/// Cut a loop at every vertex it visits twice, after dropping consecutive
/// repeats. Parts may come back shorter than three vertices.
fn split_pinched(lp: Vec<VertexId>) -> Vec<Vec<VertexId>> {
    let lp = dedup_cyclic(lp);
    for j in 1..lp.len() {
        if let Some(i) = lp[..j].iter().position(|&v| v == lp[j]) {
            let inner = lp[i..j].to_vec();
            let outer = lp[..i].iter().chain(&lp[j..]).copied().collect();
            let mut parts = split_pinched(outer);
            parts.extend(split_pinched(inner));
            return parts;
        }
    }
    vec![lp]
}

/// Drop cyclically consecutive duplicates from a loop.
pub(crate) fn dedup_cyclic(mut lp: Vec<VertexId>) -> Vec<VertexId> {
    lp.dedup();
    while lp.len() > 1 && lp.first() == lp.last() {
        lp.pop();
    }
    lp
}

//! Convex hull of a 3D point set.
//!
//! Incremental beneath-beyond construction seeded by a maximal tetrahedron.
//! Facets are triangles oriented counter-clockwise when seen from outside,
//! so that surface area and enclosed volume follow directly from them.
//!
//! Points lying within a small tolerance of an existing facet plane are
//! treated as inside. A point that lies on a face or an edge of the final
//! hull may still be used by a facet, but only extreme points (corners) are
//! reported as hull vertices, whatever the insertion order.

use std::collections::{BTreeMap, HashSet};

use glam::DVec3;
use porescope_core::{PointSet, PorescopeError, Result};

/// Plane tolerance relative to the bounding-box diagonal of the input.
const RELATIVE_TOLERANCE: f64 = 1e-10;

/// Unit normals closer than this are treated as parallel.
const NORMAL_TOLERANCE: f64 = 1e-6;

/// Convex hull of a point set.
///
/// Facets and vertices index into the point set the hull was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexHull {
    facets: Vec<[usize; 3]>,
    vertices: Vec<usize>,
    surface_area: f64,
    volume: f64,
    point_count: usize,
}

impl ConvexHull {
    /// Returns the triangular facets.
    #[must_use]
    pub fn facets(&self) -> &[[usize; 3]] {
        &self.facets
    }

    /// Returns the number of facets.
    #[must_use]
    pub fn num_facets(&self) -> usize {
        self.facets.len()
    }

    /// Returns the extreme points of the hull, ascending.
    ///
    /// Points in the interior of a hull face or edge are not included, even
    /// when a facet triangle uses them.
    #[must_use]
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// Returns the number of extreme points.
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the total facet area.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.surface_area
    }

    /// Returns the enclosed volume.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Returns the size of the point set the hull was built from.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Share of input points that are extreme points of the hull.
    #[must_use]
    pub fn vertex_usage_ratio(&self) -> f64 {
        if self.point_count == 0 {
            0.0
        } else {
            self.vertices.len() as f64 / self.point_count as f64
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Facet {
    verts: [usize; 3],
    normal: DVec3,
    offset: f64,
}

impl Facet {
    /// Builds a facet whose normal points away from `interior`.
    fn new(mut verts: [usize; 3], points: &[DVec3], interior: DVec3) -> Self {
        let [a, b, c] = verts.map(|i| points[i]);
        let mut normal = (b - a).cross(c - a);
        if normal.dot(interior - a) > 0.0 {
            verts.swap(1, 2);
            normal = -normal;
        }
        let normal = normal.normalize_or_zero();
        Self {
            verts,
            normal,
            offset: normal.dot(a),
        }
    }

    fn distance(&self, p: DVec3) -> f64 {
        self.normal.dot(p) - self.offset
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.verts;
        [(a, b), (b, c), (c, a)]
    }
}

/// Computes the convex hull of `points`.
///
/// # Errors
///
/// Returns [`PorescopeError::DegenerateGeometry`] if there are fewer than four
/// points or if all points are coincident, collinear or coplanar.
pub fn compute_hull(points: &PointSet) -> Result<ConvexHull> {
    let pts = points.points();
    let n = pts.len();
    if n < 4 {
        return Err(PorescopeError::degenerate(n, "a hull needs at least 4 points"));
    }
    if pts.iter().any(|p| !p.is_finite()) {
        return Err(PorescopeError::degenerate(n, "non-finite coordinates"));
    }

    let tolerance = points.extent() * RELATIVE_TOLERANCE;
    let seed = initial_tetrahedron(pts, tolerance)?;
    let interior = seed.iter().map(|&i| pts[i]).sum::<DVec3>() / 4.0;

    let [i0, i1, i2, i3] = seed;
    let mut facets: Vec<Facet> = [[i0, i1, i2], [i0, i1, i3], [i0, i2, i3], [i1, i2, i3]]
        .into_iter()
        .map(|verts| Facet::new(verts, pts, interior))
        .collect();

    for (index, &p) in pts.iter().enumerate() {
        if seed.contains(&index) {
            continue;
        }

        let visible: Vec<bool> = facets.iter().map(|f| f.distance(p) > tolerance).collect();
        if !visible.contains(&true) {
            continue;
        }

        // Directed edges of the visible region; an edge whose reverse is not
        // part of the region lies on the horizon.
        let region_edges: Vec<(usize, usize)> = facets
            .iter()
            .zip(&visible)
            .filter(|(_, &v)| v)
            .flat_map(|(f, _)| f.edges())
            .collect();
        let lookup: HashSet<(usize, usize)> = region_edges.iter().copied().collect();
        let horizon: Vec<(usize, usize)> = region_edges
            .into_iter()
            .filter(|&(a, b)| !lookup.contains(&(b, a)))
            .collect();

        let mut keep = visible.iter().map(|v| !v);
        facets.retain(|_| keep.next().unwrap_or(true));
        facets.extend(
            horizon
                .into_iter()
                .map(|(a, b)| Facet::new([a, b, index], pts, interior)),
        );
    }

    let mut surface_area = 0.0;
    let mut volume = 0.0;
    for facet in &facets {
        let [a, b, c] = facet.verts.map(|i| pts[i]);
        surface_area += 0.5 * (b - a).cross(c - a).length();
        volume += (a - interior).dot((b - interior).cross(c - interior)) / 6.0;
    }

    let vertices = extreme_vertices(&facets);

    log::trace!(
        "hull of {} points: {} facets, {} vertices",
        n,
        facets.len(),
        vertices.len()
    );

    Ok(ConvexHull {
        facets: facets.iter().map(|f| f.verts).collect(),
        vertices,
        surface_area,
        volume: volume.abs(),
        point_count: n,
    })
}

/// Facet vertices whose incident facet normals span all three dimensions.
///
/// A vertex on a flat face sees one normal direction and a vertex inside an
/// edge sees two, so neither is a corner of the hull.
fn extreme_vertices(facets: &[Facet]) -> Vec<usize> {
    let mut incident: BTreeMap<usize, Vec<DVec3>> = BTreeMap::new();
    for facet in facets {
        // Zero-area slivers carry no direction.
        if facet.normal == DVec3::ZERO {
            continue;
        }
        for &v in &facet.verts {
            incident.entry(v).or_default().push(facet.normal);
        }
    }
    incident
        .into_iter()
        .filter(|(_, normals)| normals_span_space(normals))
        .map(|(v, _)| v)
        .collect()
}

fn normals_span_space(normals: &[DVec3]) -> bool {
    let Some(&first) = normals.first() else {
        return false;
    };
    let Some(axis) = normals
        .iter()
        .map(|&n| first.cross(n))
        .find(|c| c.length() > NORMAL_TOLERANCE)
    else {
        return false;
    };
    let axis = axis.normalize();
    normals.iter().any(|&n| axis.dot(n).abs() > NORMAL_TOLERANCE)
}

/// Picks four affinely independent points spanning as much volume as possible.
fn initial_tetrahedron(pts: &[DVec3], tolerance: f64) -> Result<[usize; 4]> {
    let n = pts.len();

    // Most distant pair among the axis extremes.
    let mut extremes = [0_usize; 6];
    for (i, p) in pts.iter().enumerate() {
        for axis in 0..3 {
            if p[axis] < pts[extremes[2 * axis]][axis] {
                extremes[2 * axis] = i;
            }
            if p[axis] > pts[extremes[2 * axis + 1]][axis] {
                extremes[2 * axis + 1] = i;
            }
        }
    }
    let mut best = (extremes[0], extremes[1], 0.0);
    for (k, &a) in extremes.iter().enumerate() {
        for &b in &extremes[k + 1..] {
            let d = pts[a].distance(pts[b]);
            if d > best.2 {
                best = (a, b, d);
            }
        }
    }
    let (i0, i1, span) = best;
    if span <= tolerance {
        return Err(PorescopeError::degenerate(n, "all points coincide"));
    }

    let axis = (pts[i1] - pts[i0]).normalize();
    let (i2, line_dist) = farthest(pts, |p| (p - pts[i0]).cross(axis).length());
    if line_dist <= tolerance {
        return Err(PorescopeError::degenerate(n, "all points are collinear"));
    }

    let normal = (pts[i1] - pts[i0]).cross(pts[i2] - pts[i0]).normalize();
    let (i3, plane_dist) = farthest(pts, |p| normal.dot(p - pts[i0]).abs());
    if plane_dist <= tolerance {
        return Err(PorescopeError::degenerate(n, "all points are coplanar"));
    }

    Ok([i0, i1, i2, i3])
}

/// Returns the index maximizing `measure` and the maximum value.
fn farthest(pts: &[DVec3], measure: impl Fn(DVec3) -> f64) -> (usize, f64) {
    pts.iter()
        .enumerate()
        .map(|(i, &p)| (i, measure(p)))
        .fold((0, f64::NEG_INFINITY), |best, cur| {
            if cur.1 > best.1 {
                cur
            } else {
                best
            }
        })
}

//! Point helpers for face loops embedded in 3D.
//!
//! Positions are plain `[f64; 3]` arrays. Planar input from the
//! parameterization stage is stored with `z = 0`.

/// A position in 3D.
pub type Point3 = [f64; 3];

/// Midpoint of the segment `a b`.
#[inline]
pub fn midpoint(a: Point3, b: Point3) -> Point3 {
    [
        0.5 * (a[0] + b[0]),
        0.5 * (a[1] + b[1]),
        0.5 * (a[2] + b[2]),
    ]
}

/// Arithmetic mean of a set of points; `None` for an empty set.
pub fn centroid(points: &[Point3]) -> Option<Point3> {
    if points.is_empty() {
        return None;
    }
    let mut c = [0.0; 3];
    for p in points {
        c[0] += p[0];
        c[1] += p[1];
        c[2] += p[2];
    }
    let n = points.len() as f64;
    Some([c[0] / n, c[1] / n, c[2] / n])
}

/// Squared Euclidean distance.
#[inline]
pub fn distance_squared(a: Point3, b: Point3) -> f64 {
    let d = sub(a, b);
    dot(d, d)
}

/// Euclidean distance.
#[inline]
pub fn distance(a: Point3, b: Point3) -> f64 {
    distance_squared(a, b).sqrt()
}

/// Unsigned area of a (possibly non-planar) polygon, computed as the
/// magnitude of its vector area.
pub fn polygon_area(points: &[Point3]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut area = [0.0; 3];
    for i in 0..points.len() {
        let c = cross(points[i], points[(i + 1) % points.len()]);
        area[0] += c[0];
        area[1] += c[1];
        area[2] += c[2];
    }
    0.5 * norm(area)
}

fn sub(a: Point3, b: Point3) -> Point3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: Point3, b: Point3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: Point3, b: Point3) -> Point3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: Point3) -> f64 {
    dot(a, a).sqrt()
}

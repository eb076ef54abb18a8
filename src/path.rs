/// Euclidean distance between two points
pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    (dx * dx + dy * dy).sqrt()
}

/// Distance from `point` to the closest point on the segment `[a, b]`
///
/// The projection of `point` onto the line is clamped to the segment, so
/// points beyond either end measure against that endpoint. A degenerate
/// segment (`a == b`) measures against `a`.
pub fn segment_distance(point: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let ab = (b.0 - a.0, b.1 - a.1);
    let ap = (point.0 - a.0, point.1 - a.1);

    let ab_len_sq = ab.0 * ab.0 + ab.1 * ab.1;

    if ab_len_sq < f32::EPSILON {
        return distance(point, a);
    }

    // Project onto the line, clamped to the segment
    let t = ((ap.0 * ab.0 + ap.1 * ab.1) / ab_len_sq).clamp(0.0, 1.0);
    let closest = (a.0 + t * ab.0, a.1 + t * ab.1);

    distance(point, closest)
}

/// Generate SVG path command for a straight cable between two points
///
/// # Returns
/// SVG path command string (e.g., "M 10 20 L 140 80")
pub fn generate_cable_path(start: (f32, f32), end: (f32, f32)) -> String {
    format!("M {} {} L {} {}", start.0, start.1, end.0, end.1)
}

/// Translate a point by a delta
pub fn offset_point(point: (f32, f32), delta: (f32, f32)) -> (f32, f32) {
    (point.0 + delta.0, point.1 + delta.1)
}

//! Grid geometry: line tracing, radial regions, cone predicates.

use arrayvec::ArrayVec;

use crate::config::KitConfig;
use crate::env::MapOracle;
use crate::state::Position;

/// Cells of a traced beam path, origin first.
pub type BeamPath = ArrayVec<Position, { KitConfig::MAX_BEAM_CELLS }>;

/// Integer line from `start` to `end` (Bresenham), inclusive of both ends.
///
/// The trace stops after [`KitConfig::MAX_BEAM_STEPS`] steps even if `end`
/// was not reached.
pub fn trace_line(start: Position, end: Position) -> BeamPath {
    let mut path = BeamPath::new();
    let dx = (end.x - start.x).abs();
    let dy = (end.y - start.y).abs();
    let sx = if start.x < end.x { 1 } else { -1 };
    let sy = if start.y < end.y { 1 } else { -1 };
    let mut err = dx - dy;
    let mut current = start;

    loop {
        path.push(current);
        if current == end || path.len() == path.capacity() {
            break;
        }
        let e2 = err * 2;
        if e2 > -dy {
            err -= dy;
            current.x += sx;
        }
        if e2 < dx {
            err += dx;
            current.y += sy;
        }
    }
    path
}

/// Every cell within `radius` of `center`, nearest first.
///
/// Cells outside the map are included; callers filter with
/// [`MapOracle::contains`].
pub fn radial_cells(center: Position, radius: f32) -> Vec<Position> {
    if !(radius >= 0.0) {
        return Vec::new();
    }
    let reach = radius.floor() as i32;
    let limit = (radius as f64) * (radius as f64);
    let mut cells = Vec::with_capacity(((2 * reach + 1) * (2 * reach + 1)) as usize);
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let cell = Position::new(center.x + dx, center.y + dy);
            if center.distance_squared(cell) as f64 <= limit {
                cells.push(cell);
            }
        }
    }
    cells.sort_by_key(|cell| center.distance_squared(*cell));
    cells
}

/// Angle in degrees between the vectors `origin -> a` and `origin -> b`.
///
/// A zero-length vector has no direction and yields 0.
pub fn angle_between(origin: Position, a: Position, b: Position) -> f32 {
    let (ax, ay) = ((a.x - origin.x) as f64, (a.y - origin.y) as f64);
    let (bx, by) = ((b.x - origin.x) as f64, (b.y - origin.y) as f64);
    let norms = ((ax * ax + ay * ay) * (bx * bx + by * by)).sqrt();
    if norms == 0.0 {
        return 0.0;
    }
    let cos = ((ax * bx + ay * by) / norms).clamp(-1.0, 1.0);
    cos.acos().to_degrees() as f32
}

/// Tolerance applied to cone edges so exact diagonals are not lost to rounding.
const ANGLE_EPSILON: f32 = 1e-3;

/// Whether `cell` lies within `half_angle` degrees of the aim direction.
pub fn within_cone(origin: Position, aim: Position, cell: Position, half_angle: f32) -> bool {
    angle_between(origin, aim, cell) <= half_angle + ANGLE_EPSILON
}

/// Unobstructed sight from `from` to `to`.
///
/// Every traced cell after `from` must be see-through, the destination
/// included.
pub fn line_of_sight(map: &(impl MapOracle + ?Sized), from: Position, to: Position) -> bool {
    trace_line(from, to)
        .iter()
        .skip(1)
        .all(|cell| map.contains(*cell) && !map.blocks_sight(*cell))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_trace_yields_every_cell_in_order() {
        let path = trace_line(Position::new(0, 0), Position::new(5, 0));
        let expected: Vec<_> = (0..=5).map(|x| Position::new(x, 0)).collect();
        assert_eq!(path.as_slice(), expected.as_slice());
    }

    #[test]
    fn degenerate_trace_yields_single_cell() {
        let path = trace_line(Position::new(3, 3), Position::new(3, 3));
        assert_eq!(path.as_slice(), &[Position::new(3, 3)]);
    }

    #[test]
    fn diagonal_and_reverse_traces() {
        let path = trace_line(Position::new(0, 0), Position::new(3, 3));
        assert_eq!(path.len(), 4);
        assert_eq!(path[2], Position::new(2, 2));

        let back = trace_line(Position::new(4, 2), Position::new(0, 0));
        assert_eq!(back.first(), Some(&Position::new(4, 2)));
        assert_eq!(back.last(), Some(&Position::new(0, 0)));
    }

    #[test]
    fn long_trace_is_capped() {
        let path = trace_line(Position::new(0, 0), Position::new(10_000, 3));
        assert_eq!(path.len(), KitConfig::MAX_BEAM_CELLS);
        assert_eq!(path[0], Position::new(0, 0));
    }

    #[test]
    fn radial_cells_are_sorted_and_bounded() {
        let center = Position::new(10, 10);
        let cells = radial_cells(center, 2.0);
        assert_eq!(cells[0], center);
        assert!(cells.iter().all(|c| center.distance_to(*c) <= 2.0));
        // 1 + 4 + 4 + 4 cells at distance 0, 1, sqrt(2), 2
        assert_eq!(cells.len(), 13);
        assert!(radial_cells(center, f32::NAN).is_empty());
    }

    #[test]
    fn cone_edges() {
        let origin = Position::new(0, 0);
        let aim = Position::new(5, 0);
        assert!(within_cone(origin, aim, Position::new(3, 3), 45.0));
        assert!(within_cone(origin, aim, Position::new(4, 1), 45.0));
        assert!(!within_cone(origin, aim, Position::new(3, 4), 45.0));
        assert!(!within_cone(origin, aim, Position::new(-2, 0), 45.0));
        assert!(within_cone(origin, aim, origin, 45.0));
        // 46.1 and 43.8 degrees
        assert!(!within_cone(origin, aim, Position::new(100, 104), 45.0));
        assert!(within_cone(origin, aim, Position::new(100, 96), 45.0));
    }
}

//! Line geometry along bus routes.
//!
//! Builds polylines from route coordinates, cuts the portion travelled
//! between two points, and measures geodesic lengths in a requested unit.
//! Coordinates map to `geo` points as `x = lng`, `y = lat`.

use geo::{Closest, ClosestPoint, Coord, Distance, Haversine, Length, Line, LineString, Point};

use crate::domain::{Coordinates, DistanceUnit, EARTH_RADIUS_METERS};

/// Errors from geometry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// Area units cannot measure a line.
    #[error("{0} is not a unit of length")]
    NotALengthUnit(DistanceUnit),
}

/// Converts a position to a `geo` point.
pub fn point(position: Coordinates) -> Point<f64> {
    Point::new(position.lng, position.lat)
}

/// Builds a polyline from an ordered coordinate list.
pub fn line_string(coordinates: &[Coordinates]) -> LineString<f64> {
    coordinates
        .iter()
        .map(|c| Coord { x: c.lng, y: c.lat })
        .collect()
}

/// Converts a polyline back to coordinates.
pub fn to_coordinates(line: &LineString<f64>) -> Vec<Coordinates> {
    line.coords().map(|c| Coordinates::new(c.y, c.x)).collect()
}

/// A point on a polyline closest to some query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePosition {
    /// Index of the segment (`coords[index]..coords[index + 1]`) the point lies on.
    pub index: usize,
    pub point: Point<f64>,
    /// Geodesic distance in metres from the query point.
    pub offset_meters: f64,
}

/// Finds the point on `line` nearest to `target`.
///
/// Returns `None` for a line with no coordinates.
pub fn nearest_point_on_line(line: &LineString<f64>, target: Point<f64>) -> Option<LinePosition> {
    match line.0.len() {
        0 => None,
        1 => {
            let point = Point(line.0[0]);
            Some(LinePosition {
                index: 0,
                point,
                offset_meters: Haversine.distance(target, point),
            })
        }
        _ => line
            .lines()
            .enumerate()
            .map(|(index, segment)| {
                let point = closest_on_segment(&segment, &target);
                LinePosition {
                    index,
                    point,
                    offset_meters: Haversine.distance(target, point),
                }
            })
            .min_by(|a, b| a.offset_meters.total_cmp(&b.offset_meters)),
    }
}

fn closest_on_segment(segment: &Line<f64>, target: &Point<f64>) -> Point<f64> {
    match segment.closest_point(target) {
        Closest::Intersection(p) | Closest::SinglePoint(p) => p,
        Closest::Indeterminate => Point(segment.start),
    }
}

/// Cuts the part of `line` between the projections of `start` and `stop`.
///
/// The result runs in the line's own direction regardless of which of the two
/// points comes first along it. Its first and last coordinates are the
/// projected points, with every vertex of `line` strictly between them in
/// the middle.
pub fn line_slice(start: Point<f64>, stop: Point<f64>, line: &LineString<f64>) -> LineString<f64> {
    let (Some(from), Some(to)) = (
        nearest_point_on_line(line, start),
        nearest_point_on_line(line, stop),
    ) else {
        return LineString::from(vec![start.0, stop.0]);
    };

    let (first, last) = if from.index <= to.index {
        (from, to)
    } else {
        (to, from)
    };

    let mut coords = Vec::with_capacity(last.index - first.index + 2);
    coords.push(first.point.0);
    coords.extend_from_slice(&line.0[first.index + 1..=last.index]);
    coords.push(last.point.0);

    LineString::from(coords)
}

/// Geodesic distance between two points in `unit`.
pub fn distance(a: Point<f64>, b: Point<f64>, unit: DistanceUnit) -> Result<f64, GeometryError> {
    meters_to_unit(Haversine.distance(a, b), unit)
}

/// Geodesic length of a polyline in `unit`.
pub fn length(line: &LineString<f64>, unit: DistanceUnit) -> Result<f64, GeometryError> {
    meters_to_unit(Haversine.length(line), unit)
}

fn meters_to_unit(meters: f64, unit: DistanceUnit) -> Result<f64, GeometryError> {
    let per_radian = unit
        .per_radian()
        .ok_or(GeometryError::NotALengthUnit(unit))?;
    Ok(meters / EARTH_RADIUS_METERS * per_radian)
}

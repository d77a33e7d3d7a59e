//! Post-processing of routed waypoints before they are walked

use super::geometry;
use crate::common::types::Coordinate;
use log::debug;

/// Thin out a routed path in place.
///
/// Whenever two consecutive waypoints are closer than `min_spacing`, the earlier one of the
/// pair is dropped, so clusters collapse toward the destination side. Passes repeat until no
/// consecutive pair is too close. Afterwards a leading waypoint equal to `current` is removed,
/// since routing providers echo the origin as waypoint zero.
pub fn filter_waypoints(path: &mut Vec<Coordinate>, current: Coordinate, min_spacing: f64) {
    debug!(
        "Filtering {} waypoints, minimum spacing {:.3}m",
        path.len(),
        min_spacing
    );

    loop {
        let mut keep = vec![true; path.len()];
        let mut dropped = false;
        for (i, pair) in path.windows(2).enumerate() {
            let dist = geometry::distance(pair[0], pair[1]);
            debug!("WP{}-{}: {} - {}, dist: {:.3}", i, i + 1, pair[0], pair[1], dist);
            if dist < min_spacing {
                keep[i] = false;
                dropped = true;
            }
        }
        if !dropped {
            break;
        }
        let mut flags = keep.into_iter();
        path.retain(|_| flags.next().unwrap_or(true));
    }

    if path.first() == Some(&current) {
        path.remove(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::geometry::project;

    fn line(origin: Coordinate, gaps: &[f64]) -> Vec<Coordinate> {
        let mut points = vec![origin];
        let mut last = origin;
        for &gap in gaps {
            last = project(last, gap, 90.0);
            points.push(last);
        }
        points
    }

    fn assert_spaced(path: &[Coordinate], min_spacing: f64) {
        for pair in path.windows(2) {
            assert!(geometry::distance(pair[0], pair[1]) >= min_spacing);
        }
    }

    #[test]
    fn drops_the_earlier_point_of_a_close_pair() {
        let origin = Coordinate::new(48.8566, 2.3522);
        let raw = line(origin, &[20.0, 0.5, 20.0]);
        let mut path = raw.clone();

        filter_waypoints(&mut path, Coordinate::new(0.0, 0.0), 1.0);

        assert_eq!(path, vec![raw[0], raw[2], raw[3]]);
    }

    #[test]
    fn collapses_clusters_toward_the_destination() {
        let origin = Coordinate::new(48.8566, 2.3522);
        let raw = line(origin, &[0.3, 0.3, 0.3, 15.0]);
        let mut path = raw.clone();

        filter_waypoints(&mut path, Coordinate::new(0.0, 0.0), 1.0);

        assert_eq!(path, vec![raw[3], raw[4]]);
    }

    #[test]
    fn keeps_spacing_after_removals() {
        let origin = Coordinate::new(35.6762, 139.6503);
        let raw = line(origin, &[1.2, 0.6, 0.6, 3.0, 0.9, 0.2, 8.0]);
        let mut path = raw.clone();

        filter_waypoints(&mut path, Coordinate::new(0.0, 0.0), 1.5);

        assert_spaced(&path, 1.5);
        assert_eq!(path.last(), raw.last());
    }

    #[test]
    fn removes_echoed_origin() {
        let origin = Coordinate::new(-22.9068, -43.1729);
        let mut path = line(origin, &[30.0, 30.0]);
        let current = Coordinate::with_altitude(origin.latitude, origin.longitude, 8.0);

        filter_waypoints(&mut path, current, 1.0);

        assert_eq!(path.len(), 2);
        assert_ne!(path[0], current);
    }

    #[test]
    fn empty_path_stays_empty() {
        let mut path = Vec::new();
        filter_waypoints(&mut path, Coordinate::new(1.0, 1.0), 1.3);
        assert!(path.is_empty());
    }
}

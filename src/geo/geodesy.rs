use crate::foundation::core::{BoundingBox, Coordinate};

/// Sphere radius in meters. Equatorial radius, not the mean radius.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Great-circle destination from `origin` after `distance_m` along `bearing_deg`.
///
/// The result is rounded to 4 decimal places (about 11 m at the equator).
pub fn destination_point(origin: Coordinate, distance_m: f64, bearing_deg: f64) -> Coordinate {
    let bearing = bearing_deg.to_radians();
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();
    let delta = distance_m / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    Coordinate::new(round4(lat2.to_degrees()), round4(lon2.to_degrees()))
}

/// Haversine distance in meters on the same sphere as [`destination_point`].
pub fn haversine_distance_m(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Box of `width_km` x `height_km` centered on `center`.
///
/// Near the poles large extents produce degenerate boxes; this is not corrected.
pub fn bounding_box(center: Coordinate, width_km: f64, height_km: f64) -> BoundingBox {
    let half_width_m = width_km * 1000.0 / 2.0;
    let half_height_m = height_km * 1000.0 / 2.0;

    let south = destination_point(center, half_height_m, 180.0).lat;
    let west = destination_point(center, half_width_m, 270.0).lon;
    let north = destination_point(center, half_height_m, 0.0).lat;
    let east = destination_point(center, half_width_m, 90.0).lon;

    BoundingBox::new(south, west, north, east)
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_is_identity() {
        let p = Coordinate::new(48.1374, 11.5755);
        assert_eq!(destination_point(p, 0.0, 123.0), p);
    }

    #[test]
    fn one_degree_north_on_equator() {
        let d = EARTH_RADIUS_M * 1.0f64.to_radians();
        let p = destination_point(Coordinate::new(0.0, 0.0), d, 0.0);
        assert_eq!(p, Coordinate::new(1.0, 0.0));
    }

    #[test]
    fn north_round_trip_matches_haversine() {
        let starts = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(47.3769, 8.5417),
            Coordinate::new(-33.8688, 151.2093),
            Coordinate::new(64.1466, -21.9426),
        ];
        for start in starts {
            for d in [1_000.0, 75_000.0, 500_000.0] {
                let end = destination_point(start, d, 0.0);
                let back = haversine_distance_m(start, end);
                assert!(
                    (back - d).abs() < 15.0,
                    "start={start:?} d={d} back={back}"
                );
            }
        }
    }

    #[test]
    fn bounding_box_is_ordered_up_to_1000km() {
        let centers = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(52.52, 13.405),
            Coordinate::new(-41.2865, 174.7762),
            Coordinate::new(70.0, -150.0),
        ];
        for c in centers {
            for (w, h) in [(1.0, 1.0), (150.0, 84.0), (575.0, 323.0), (1000.0, 562.0)] {
                let b = bounding_box(c, w, h);
                assert!(b.south < b.north, "{c:?} {w}x{h} -> {b:?}");
                assert!(b.west < b.east, "{c:?} {w}x{h} -> {b:?}");
                assert!(b.south < c.lat && c.lat < b.north);
                assert!(b.west < c.lon && c.lon < b.east);
            }
        }
    }

    #[test]
    fn bounding_box_is_symmetric_on_equator() {
        let b = bounding_box(Coordinate::new(0.0, 0.0), 200.0, 100.0);
        assert_eq!(b.south, -b.north);
        assert_eq!(b.west, -b.east);
        let half_h = haversine_distance_m(Coordinate::new(0.0, 0.0), Coordinate::new(b.north, 0.0));
        assert!((half_h - 50_000.0).abs() < 15.0);
    }
}

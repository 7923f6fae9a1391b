//! Local approximation of the scoring service.
//!
//! A guess is worth up to 5000 points and loses value exponentially with its
//! distance to the correct location.

use crate::{Location, Points};

/// Mean earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0088;

pub const MAX_POINTS: Points = 5000;

/// Great-circle distance between two locations, in kilometers.
pub fn distance_km(a: Location, b: Location) -> f64 {
    let (lat_a, lat_b) = (a.lat.to_radians(), b.lat.to_radians());
    let d_lat = lat_b - lat_a;
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Points for a guess that was `distance_km` away from the correct location.
pub fn score(distance_km: f64) -> Points {
    let raw = 4999.91 * 0.998036_f64.powf(distance_km.max(0.0));
    (raw.round() as Points).min(MAX_POINTS)
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    quickcheck! {
        fn score_never_increases_with_distance(a: u16, b: u16) -> bool {
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            score(f64::from(near)) >= score(f64::from(far))
        }

        fn distance_is_symmetric(a: Location, b: Location) -> bool {
            (distance_km(a, b) - distance_km(b, a)).abs() < 1e-6
        }
    }

    #[test]
    fn newport_to_cleveland() {
        let newport = Location::new(41.49008, -71.312796);
        let cleveland = Location::new(41.499498, -81.695391);
        // The geodesic distance is 866.455 km; haversine is within a few km.
        assert!((distance_km(newport, cleveland) - 866.455).abs() < 5.0);
    }

    #[test]
    fn perfect_guess_scores_max() {
        assert_eq!(score(0.0), MAX_POINTS);
        let here = Location::new(50.0, 14.0);
        assert_eq!(score(distance_km(here, here)), MAX_POINTS);
    }

    #[test]
    fn far_guess_scores_nothing() {
        assert_eq!(score(20_000.0), 0);
    }

    #[test]
    fn score_at_known_distance() {
        // 4999.91 * 0.998036^100 is about 4107.6
        assert_eq!(score(100.0), 4108);
    }
}

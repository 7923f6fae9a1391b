use serde::{Deserialize, Serialize};

/// A point on the globe, in degrees.
///
/// On the wire this is always the two-element array `[lat, lon]`, for both
/// the problem and the guess exchanges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether this is a real geographic coordinate pair.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl From<[f64; 2]> for Location {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<Location> for [f64; 2] {
    fn from(location: Location) -> Self {
        [location.lat, location.lon]
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_latitude_first() {
        let json = serde_json::to_string(&Location::new(48.85, 2.35)).unwrap();
        assert_eq!(json, "[48.85,2.35]");
        let back: Location = serde_json::from_str("[-33.9, 151.2]").unwrap();
        assert_eq!(back, Location::new(-33.9, 151.2));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(Location::new(90.0, -180.0).is_valid());
        assert!(!Location::new(90.5, 0.0).is_valid());
        assert!(!Location::new(0.0, 181.0).is_valid());
        assert!(!Location::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn wrong_arity_does_not_deserialize() {
        assert!(serde_json::from_str::<Location>("[1.0]").is_err());
        assert!(serde_json::from_str::<Location>("{\"lat\": 1.0, \"lon\": 2.0}").is_err());
    }
}

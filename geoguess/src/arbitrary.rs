use crate::Location;

impl quickcheck::Arbitrary for Location {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        // Millidegree resolution keeps every generated pair in range
        let lat = f64::from(u32::arbitrary(g) % 180_001) / 1000.0 - 90.0;
        let lon = f64::from(u32::arbitrary(g) % 360_001) / 1000.0 - 180.0;
        Location::new(lat, lon)
    }
}

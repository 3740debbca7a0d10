/// Bounding box in geographic degrees, `(lng, lat)` order like GeoJSON.
///
/// Used by CPU picking as a cheap pre-filter before the exact
/// point-in-polygon test. No antimeridian splitting: a ring that crosses the
/// date line produces a wide box, which is conservative (never rejects a
/// contained point).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LonLatBounds {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl LonLatBounds {
    pub fn empty() -> Self {
        Self {
            min_lng: f64::INFINITY,
            min_lat: f64::INFINITY,
            max_lng: f64::NEG_INFINITY,
            max_lat: f64::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_lng > self.max_lng || self.min_lat > self.max_lat
    }

    pub fn expand(&mut self, lng: f64, lat: f64) {
        self.min_lng = self.min_lng.min(lng);
        self.min_lat = self.min_lat.min(lat);
        self.max_lng = self.max_lng.max(lng);
        self.max_lat = self.max_lat.max(lat);
    }

    pub fn contains(&self, lng: f64, lat: f64) -> bool {
        lng >= self.min_lng && lng <= self.max_lng && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Bounds over every `(lng, lat)` pair in every ring.
    pub fn from_rings<'a, I, R>(rings: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = &'a (f64, f64)>,
    {
        let mut b = Self::empty();
        for ring in rings {
            for &(lng, lat) in ring {
                b.expand(lng, lat);
            }
        }
        b
    }
}

#[cfg(test)]
mod tests {
    use super::LonLatBounds;

    #[test]
    fn empty_contains_nothing() {
        let b = LonLatBounds::empty();
        assert!(b.is_empty());
        assert!(!b.contains(0.0, 0.0));
    }

    #[test]
    fn expand_and_contains() {
        let mut b = LonLatBounds::empty();
        b.expand(-10.0, 5.0);
        b.expand(20.0, -3.0);
        assert!(b.contains(0.0, 0.0));
        assert!(b.contains(-10.0, -3.0));
        assert!(!b.contains(21.0, 0.0));
        assert!(!b.contains(0.0, 6.0));
    }

    #[test]
    fn from_rings_covers_all_rings() {
        let outer = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        let hole = [(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0)];
        let b = LonLatBounds::from_rings([outer.iter(), hole.iter()]);
        assert_eq!(b.min_lng, 0.0);
        assert_eq!(b.max_lng, 10.0);
        assert_eq!(b.min_lat, 0.0);
        assert_eq!(b.max_lat, 10.0);
    }
}

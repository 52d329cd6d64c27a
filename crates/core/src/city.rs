//! Cities and the nearest-city lookup
//!
//! The candidate set is small (seeded per deployment), so the lookup is
//! a linear scan using one distance function: haversine.

use serde::{Deserialize, Serialize};
use zaintza_shared_types::CityId;

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_active: bool,
}

impl City {
    pub fn new(id: CityId, name: String, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name,
            latitude,
            longitude,
            is_active: true,
        }
    }
}

/// Great-circle distance between two coordinates, in kilometres
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// The active city nearest to the given coordinates
pub fn nearest_city(cities: &[City], latitude: f64, longitude: f64) -> Option<&City> {
    cities
        .iter()
        .filter(|c| c.is_active)
        .min_by(|a, b| {
            let da = haversine_km(latitude, longitude, a.latitude, a.longitude);
            let db = haversine_km(latitude, longitude, b.latitude, b.longitude);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cities() -> Vec<City> {
        vec![
            City::new(CityId::new(), "Bilbao".to_string(), 43.2630, -2.9350),
            City::new(CityId::new(), "Donostia".to_string(), 43.3183, -1.9812),
            City::new(CityId::new(), "Vitoria-Gasteiz".to_string(), 42.8467, -2.6716),
        ]
    }

    #[test]
    fn test_haversine_known_distance() {
        // Bilbao to Donostia is roughly 78 km great-circle
        let d = haversine_km(43.2630, -2.9350, 43.3183, -1.9812);
        assert!((d - 78.0).abs() < 3.0, "got {}", d);
    }

    #[test]
    fn test_haversine_zero_for_same_point() {
        assert!(haversine_km(43.0, -2.0, 43.0, -2.0) < 1e-9);
    }

    #[test]
    fn test_nearest_city() {
        let cities = cities();
        // A point in Getxo, just north of Bilbao
        let nearest = nearest_city(&cities, 43.3569, -3.0110).unwrap();
        assert_eq!(nearest.name, "Bilbao");
    }

    #[test]
    fn test_nearest_skips_inactive() {
        let mut cities = cities();
        cities[0].is_active = false;
        let nearest = nearest_city(&cities, 43.3569, -3.0110).unwrap();
        assert_ne!(nearest.name, "Bilbao");
    }

    #[test]
    fn test_nearest_empty_set() {
        assert!(nearest_city(&[], 43.0, -2.0).is_none());
    }
}

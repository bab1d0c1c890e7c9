//! Nearby-store ranking.
//!
//! The storefront asks the browser for the shopper's position and lists
//! stores closest first. Distances are great-circle (Haversine) on a
//! spherical earth, which is accurate to well under a percent at city scale.

use core::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoordinatesError {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

/// Radius filter that is negative, infinite or NaN.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("radius must be a finite, non-negative number of kilometres, got {0}")]
pub struct RadiusError(pub f64);

/// Error loading a nearby-store directory file.
#[derive(Debug, Error)]
pub enum StoreDirectoryError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// A validated latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinates {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = CoordinatesError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl Coordinates {
    /// # Errors
    ///
    /// Returns an error if either value is out of range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinatesError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinatesError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinatesError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.latitude, self.longitude)
    }
}

/// Great-circle distance between two points, in kilometres.
#[must_use]
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_lat = lat2 - lat1;
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Anything with a position.
pub trait Located {
    fn coordinates(&self) -> Coordinates;
}

/// An item paired with its distance from the origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<T> {
    #[serde(flatten)]
    pub item: T,
    pub distance_km: f64,
}

/// Rank `items` by distance from `origin`, closest first.
///
/// The sort is stable: equally distant items keep their input order.
pub fn sort_by_distance<T, I>(origin: Coordinates, items: I) -> Vec<Ranked<T>>
where
    T: Located,
    I: IntoIterator<Item = T>,
{
    let mut ranked: Vec<Ranked<T>> = items
        .into_iter()
        .map(|item| {
            let distance_km = haversine_km(origin, item.coordinates());
            Ranked { item, distance_km }
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

/// Drop everything farther than `radius_km` from an already ranked list.
#[must_use]
pub fn within_km<T>(ranked: Vec<Ranked<T>>, radius_km: f64) -> Vec<Ranked<T>> {
    ranked
        .into_iter()
        .take_while(|r| r.distance_km <= radius_km)
        .collect()
}

/// Rank `items` from `origin`, keeping only those within `radius_km` if given.
///
/// # Errors
///
/// Returns an error if the radius is negative or not finite.
pub fn nearby<T, I>(
    origin: Coordinates,
    items: I,
    radius_km: Option<f64>,
) -> Result<Vec<Ranked<T>>, RadiusError>
where
    T: Located,
    I: IntoIterator<Item = T>,
{
    if let Some(radius) = radius_km.filter(|r| !r.is_finite() || *r < 0.0) {
        return Err(RadiusError(radius));
    }
    let ranked = sort_by_distance(origin, items);
    Ok(match radius_km {
        Some(radius) => within_km(ranked, radius),
        None => ranked,
    })
}

/// A store as listed in the nearby-store directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreLocation {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(flatten)]
    pub position: Coordinates,
}

impl Located for StoreLocation {
    fn coordinates(&self) -> Coordinates {
        self.position
    }
}

/// Read a JSON array of store locations.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid store list.
pub fn load_store_directory(path: &Path) -> Result<Vec<StoreLocation>, StoreDirectoryError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| StoreDirectoryError::Read {
        path: display.clone(),
        source,
    })?;
    let stores: Vec<StoreLocation> =
        serde_json::from_str(&raw).map_err(|source| StoreDirectoryError::Parse {
            path: display,
            source,
        })?;
    tracing::info!(count = stores.len(), "Loaded store directory");
    Ok(stores)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(lat: f64, lng: f64) -> Coordinates {
        Coordinates::new(lat, lng).unwrap()
    }

    fn store(id: i64, lat: f64, lng: f64) -> StoreLocation {
        StoreLocation {
            id,
            name: format!("Toko {id}"),
            address: None,
            position: at(lat, lng),
        }
    }

    #[test]
    fn test_coordinates_validation() {
        assert!(Coordinates::new(-6.2, 106.8).is_ok());
        assert_eq!(
            Coordinates::new(91.0, 0.0),
            Err(CoordinatesError::Latitude(91.0))
        );
        assert_eq!(
            Coordinates::new(0.0, -180.5),
            Err(CoordinatesError::Longitude(-180.5))
        );
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_haversine_zero_and_known_distance() {
        let jakarta = at(-6.2088, 106.8456);
        assert!(haversine_km(jakarta, jakarta).abs() < 1e-9);

        // Jakarta to Bandung is roughly 116 km as the crow flies.
        let bandung = at(-6.9175, 107.6191);
        let d = haversine_km(jakarta, bandung);
        assert!((110.0..125.0).contains(&d), "got {d}");
        assert!((haversine_km(bandung, jakarta) - d).abs() < 1e-9);
    }

    #[test]
    fn test_antipodes_do_not_overflow() {
        let d = haversine_km(at(0.0, 0.0), at(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_sort_by_distance_ascending() {
        let origin = at(-6.2, 106.8);
        let ranked = sort_by_distance(
            origin,
            vec![store(1, -7.0, 110.0), store(2, -6.21, 106.81), store(3, -6.5, 107.0)],
        );
        let ids: Vec<i64> = ranked.iter().map(|r| r.item.id).collect();
        assert_eq!(ids, [2, 3, 1]);
        assert!(ranked.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let origin = at(0.0, 0.0);
        let ranked = sort_by_distance(origin, vec![store(1, 1.0, 0.0), store(2, -1.0, 0.0)]);
        let ids: Vec<i64> = ranked.iter().map(|r| r.item.id).collect();
        assert_eq!(ids, [1, 2]);
    }

    #[test]
    fn test_within_km() {
        let origin = at(-6.2, 106.8);
        let ranked = sort_by_distance(origin, vec![store(1, -6.21, 106.81), store(2, -7.0, 110.0)]);
        let near = within_km(ranked, 50.0);
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].item.id, 1);
    }

    #[test]
    fn test_nearby_radius_validation() {
        let origin = at(-6.2, 106.8);
        let stores = || vec![store(1, -6.21, 106.81), store(2, -7.0, 110.0)];

        assert_eq!(nearby(origin, stores(), None).unwrap().len(), 2);
        assert_eq!(nearby(origin, stores(), Some(50.0)).unwrap().len(), 1);
        assert_eq!(nearby(origin, stores(), Some(0.0)).unwrap().len(), 0);
        for bad in [-1.0, f64::INFINITY, f64::NAN] {
            assert!(nearby(origin, stores(), Some(bad)).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_load_store_directory() {
        let path = std::env::temp_dir().join(format!("lapak-geo-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[{"id": 1, "name": "Toko Menteng", "latitude": -6.195, "longitude": 106.84}]"#,
        )
        .unwrap();
        let loaded = load_store_directory(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.unwrap()[0].name, "Toko Menteng");

        assert!(matches!(
            load_store_directory(Path::new("/nonexistent/stores.json")),
            Err(StoreDirectoryError::Read { .. })
        ));
    }

    #[test]
    fn test_store_location_json() {
        let json = r#"{"id": 9, "name": "Toko Sembako", "latitude": -6.3, "longitude": 106.9}"#;
        let parsed: StoreLocation = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.position, at(-6.3, 106.9));

        let bad = r#"{"id": 9, "name": "x", "latitude": 100.0, "longitude": 0.0}"#;
        assert!(serde_json::from_str::<StoreLocation>(bad).is_err());
    }
}

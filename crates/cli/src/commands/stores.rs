//! Nearby-store ranking over a directory file.

use std::io::{self, Write};
use std::path::Path;

use lapak_core::geo::{
    Coordinates, CoordinatesError, RadiusError, StoreDirectoryError, load_store_directory,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoresError {
    #[error(transparent)]
    Directory(#[from] StoreDirectoryError),

    #[error("Invalid position: {0}")]
    Position(#[from] CoordinatesError),

    #[error(transparent)]
    Radius(#[from] RadiusError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// List stores in `file` closest first.
///
/// # Errors
///
/// Returns an error if loading, ranking or output fails.
pub fn nearby(
    file: &Path,
    lat: f64,
    lng: f64,
    radius_km: Option<f64>,
    out: &mut impl Write,
) -> Result<(), StoresError> {
    let origin = Coordinates::new(lat, lng)?;
    let stores = load_store_directory(file)?;
    let total = stores.len();
    let ranked = lapak_core::geo::nearby(origin, stores, radius_km)?;
    tracing::info!(total, listed = ranked.len(), "Ranked stores");

    for entry in &ranked {
        write!(out, "{:>9.2} km  {} (#{})", entry.distance_km, entry.item.name, entry.item.id)?;
        if let Some(address) = &entry.item.address {
            write!(out, "  {address}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DIRECTORY: &str = r#"[
        {"id": 1, "name": "Toko Bandung", "latitude": -6.9175, "longitude": 107.6191},
        {"id": 2, "name": "Toko Menteng", "address": "Jl. Cikini 5", "latitude": -6.1950, "longitude": 106.8400},
        {"id": 3, "name": "Toko Depok", "latitude": -6.4025, "longitude": 106.7942}
    ]"#;

    fn with_directory<F: FnOnce(&Path)>(f: F) {
        let path = std::env::temp_dir().join(format!(
            "lapak-stores-{}-{:?}.json",
            std::process::id(),
            std::thread::current().id()
        ));
        std::fs::write(&path, DIRECTORY).unwrap();
        f(&path);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_nearby_lists_closest_first() {
        with_directory(|path| {
            let mut out = Vec::new();
            nearby(path, -6.2088, 106.8456, None, &mut out).unwrap();
            let text = String::from_utf8(out).unwrap();
            let names: Vec<&str> = text
                .lines()
                .map(|line| line.split("km  ").nth(1).unwrap())
                .collect();
            assert!(names[0].starts_with("Toko Menteng"));
            assert!(names[1].starts_with("Toko Depok"));
            assert!(names[2].starts_with("Toko Bandung"));
        });
    }

    #[test]
    fn test_nearby_rejects_bad_input() {
        with_directory(|path| {
            let mut out = Vec::new();
            for radius in [-1.0, f64::INFINITY] {
                assert!(matches!(
                    nearby(path, -6.2, 106.8, Some(radius), &mut out),
                    Err(StoresError::Radius(_))
                ));
            }
            assert!(matches!(
                nearby(path, 95.0, 106.8, None, &mut out),
                Err(StoresError::Position(_))
            ));
            assert!(out.is_empty());
        });
    }

    #[test]
    fn test_nearby_with_radius() {
        with_directory(|path| {
            let mut out = Vec::new();
            nearby(path, -6.2088, 106.8456, Some(50.0), &mut out).unwrap();

            let text = String::from_utf8(out).unwrap();
            let lines: Vec<&str> = text.lines().collect();
            assert_eq!(lines.len(), 2);
            assert!(lines[0].contains("Toko Menteng (#2)  Jl. Cikini 5"));
            assert!(lines[1].contains("Toko Depok (#3)"));
        });
    }

    #[test]
    fn test_missing_file() {
        let mut out = Vec::new();
        assert!(matches!(
            nearby(Path::new("/nonexistent/stores.json"), 0.0, 0.0, None, &mut out),
            Err(StoresError::Directory(StoreDirectoryError::Read { .. }))
        ));
    }
}

//! Static city coordinate lookup and great-circle distances.

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// (city, latitude, longitude) in decimal degrees.
const CITY_COORDINATES: &[(&str, f64, f64)] = &[
    ("Amsterdam", 52.3676, 4.9041),
    ("Barcelona", 41.3874, 2.1686),
    ("Berlin", 52.5200, 13.4050),
    ("Brussels", 50.8503, 4.3517),
    ("Copenhagen", 55.6761, 12.5683),
    ("Hamburg", 53.5511, 9.9937),
    ("Lisbon", 38.7223, -9.1393),
    ("London", 51.5074, -0.1278),
    ("Madrid", 40.4168, -3.7038),
    ("Munich", 48.1351, 11.5820),
    ("Paris", 48.8566, 2.3522),
    ("Prague", 50.0755, 14.4378),
    ("Rome", 41.9028, 12.4964),
    ("Stockholm", 59.3293, 18.0686),
    ("Vienna", 48.2082, 16.3738),
    ("Warsaw", 52.2297, 21.0122),
];

/// Latitude and longitude of a known city.
pub fn coordinates(city: &str) -> Option<(f64, f64)> {
    CITY_COORDINATES
        .iter()
        .find(|(name, _, _)| *name == city)
        .map(|(_, lat, lon)| (*lat, *lon))
}

/// Names of every city in the lookup table, alphabetically.
pub fn known_cities() -> impl Iterator<Item = &'static str> {
    CITY_COORDINATES.iter().map(|(name, _, _)| *name)
}

/// Haversine distance between two known cities.
pub fn distance_km(from: &str, to: &str) -> Option<f64> {
    let (lat1, lon1) = coordinates(from)?;
    let (lat2, lon2) = coordinates(to)?;

    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    Some(2.0 * EARTH_RADIUS_KM * a.sqrt().asin())
}

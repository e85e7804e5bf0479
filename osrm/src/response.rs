use anyhow::Result;
use geojson::{Geometry, Value};
use serde::Deserialize;

use crate::LonLat;

/// Parses the body of a `route/v1` response requested with `geometries=geojson`, returning the
/// path of the first route.
pub fn parse_response(body: &str) -> Result<Vec<LonLat>> {
    let response: Response = serde_json::from_str(body)?;
    if response.code != "Ok" {
        match response.message {
            Some(msg) => bail!("OSRM error {}: {}", response.code, msg),
            None => bail!("OSRM error {}", response.code),
        }
    }
    let route = match response.routes.into_iter().next() {
        Some(route) => route,
        None => bail!("No routes found"),
    };
    info!(
        "Got a route {:.0}m long, estimated {:.0}s",
        route.distance, route.duration
    );

    let coordinates = match route.geometry.value {
        Value::LineString(coordinates) => coordinates,
        _ => bail!("Route geometry isn't a LineString"),
    };
    let mut path = Vec::new();
    for pos in coordinates {
        if pos.len() < 2 {
            bail!("Route has a position with {} values", pos.len());
        }
        path.push(LonLat::new(pos[0], pos[1]));
    }
    Ok(path)
}

/// Reads a response previously saved to disk, for working offline.
pub fn load_response_file(path: &str) -> Result<Vec<LonLat>> {
    let body = fs_err::read_to_string(path)?;
    parse_response(&body)
}

#[derive(Deserialize)]
struct Response {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Deserialize)]
struct Route {
    geometry: Geometry,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_route_is_used() {
        let body = r#"{
            "code": "Ok",
            "routes": [
                {
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[78.495095, 17.406554], [78.4951, 17.4071], [78.45031, 17.42895]]
                    },
                    "distance": 6842.1,
                    "duration": 720.4
                },
                {
                    "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]},
                    "distance": 1.0,
                    "duration": 1.0
                }
            ],
            "waypoints": []
        }"#;
        let path = parse_response(body).unwrap();
        assert_eq!(
            path,
            vec![
                LonLat::new(78.495095, 17.406554),
                LonLat::new(78.4951, 17.4071),
                LonLat::new(78.45031, 17.42895),
            ]
        );
    }

    #[test]
    fn no_routes() {
        let err = parse_response(r#"{"code": "Ok", "routes": []}"#).unwrap_err();
        assert_eq!(err.to_string(), "No routes found");

        let err = parse_response(r#"{"code": "Ok"}"#).unwrap_err();
        assert_eq!(err.to_string(), "No routes found");
    }

    #[test]
    fn error_code() {
        let err = parse_response(
            r#"{"code": "NoRoute", "message": "Impossible route between points"}"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "OSRM error NoRoute: Impossible route between points"
        );
    }

    #[test]
    fn wrong_geometry() {
        let body = r#"{
            "code": "Ok",
            "routes": [{"geometry": {"type": "Point", "coordinates": [1.0, 2.0]}}]
        }"#;
        assert!(parse_response(body).is_err());
    }

    #[test]
    fn garbage() {
        assert!(parse_response("<html>502 Bad Gateway</html>").is_err());
    }
}

//! Decoder for the encoded polyline format used by the Directions API.

use crate::entities::Coordinates;
use crate::error::Error;

const PRECISION: f64 = 1e5;

/// Values are 32-bit, so at most 7 five-bit chunks.
const MAX_SHIFT: u32 = 30;

pub fn decode(encoded: &str) -> Result<Vec<Coordinates>, Error> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut latitude: i64 = 0;
    let mut longitude: i64 = 0;
    let mut points = vec![];

    while index < bytes.len() {
        latitude = latitude
            .checked_add(next_value(bytes, &mut index)?)
            .ok_or_else(Error::upstream_error)?;
        longitude = longitude
            .checked_add(next_value(bytes, &mut index)?)
            .ok_or_else(Error::upstream_error)?;

        points.push(Coordinates::new(
            latitude as f64 / PRECISION,
            longitude as f64 / PRECISION,
        ));
    }

    Ok(points)
}

fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, Error> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let byte = *bytes.get(*index).ok_or_else(Error::upstream_error)?;
        *index += 1;

        if !(63..=127).contains(&byte) || shift > MAX_SHIFT {
            return Err(Error::upstream_error());
        }

        let chunk = (byte - 63) as i64;
        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
    }

    if result & 1 == 1 {
        Ok(!(result >> 1))
    } else {
        Ok(result >> 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Coordinates, latitude: f64, longitude: f64) {
        assert!((actual.latitude - latitude).abs() < 1e-9, "{:?}", actual);
        assert!((actual.longitude - longitude).abs() < 1e-9, "{:?}", actual);
    }

    #[test]
    fn decodes_reference_polyline() {
        let points = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();

        assert_eq!(points.len(), 3);
        assert_close(points[0], 38.5, -120.2);
        assert_close(points[1], 40.7, -120.95);
        assert_close(points[2], 43.252, -126.453);
    }

    #[test]
    fn empty_input_is_an_empty_line() {
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn oversized_values_are_rejected() {
        assert!(decode(&"____________C".repeat(8)).is_err());
        assert!(decode("________C?").is_err());
    }

    #[test]
    fn truncated_input_is_rejected() {
        assert!(decode("_p~iF~ps|").is_err());
        assert!(decode("_p~iF").is_err());
    }
}

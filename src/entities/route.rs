use geo_types::{coord, Point, Rect};
use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub polyline: Vec<Coordinates>,
    pub distance_km: f64,
    pub duration_min: f64,
    pub viewport: Option<Viewport>,
}

impl RouteInfo {
    pub fn new(polyline: Vec<Coordinates>, distance_meters: u64, duration_seconds: u64) -> Self {
        let viewport = Viewport::fit(&polyline).map(|viewport| viewport.padded(0.1));

        Self {
            polyline,
            distance_km: distance_meters as f64 / 1000.0,
            duration_min: duration_seconds as f64 / 60.0,
            viewport,
        }
    }
}

/// Map region a screen should show so that the whole route is visible.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub south_west: Coordinates,
    pub north_east: Coordinates,
}

impl Viewport {
    pub fn fit(points: &[Coordinates]) -> Option<Self> {
        let mut points = points.iter().copied().map(Point::<f64>::from);
        let first = points.next()?;

        let (min, max) = points.fold((first.0, first.0), |(min, max), point| {
            (
                coord! { x: min.x.min(point.x()), y: min.y.min(point.y()) },
                coord! { x: max.x.max(point.x()), y: max.y.max(point.y()) },
            )
        });

        Some(Rect::new(min, max).into())
    }

    /// Grows each side by `ratio` of the span, so markers are not on the edge.
    pub fn padded(&self, ratio: f64) -> Self {
        let rect = self.rect();
        let dx = rect.width() * ratio;
        let dy = rect.height() * ratio;

        Rect::new(
            coord! { x: rect.min().x - dx, y: rect.min().y - dy },
            coord! { x: rect.max().x + dx, y: rect.max().y + dy },
        )
        .into()
    }

    pub fn center(&self) -> Coordinates {
        Point::from(self.rect().center()).into()
    }

    fn rect(&self) -> Rect<f64> {
        Rect::new(
            Point::from(self.south_west).0,
            Point::from(self.north_east).0,
        )
    }
}

impl From<Rect<f64>> for Viewport {
    fn from(rect: Rect<f64>) -> Self {
        Self {
            south_west: Point::from(rect.min()).into(),
            north_east: Point::from(rect.max()).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_bounds_every_point() {
        let points = vec![
            Coordinates::new(-23.555, -46.645),
            Coordinates::new(-23.561, -46.656),
            Coordinates::new(-23.558, -46.669),
        ];

        let viewport = Viewport::fit(&points).unwrap();

        assert_eq!(viewport.south_west, Coordinates::new(-23.561, -46.669));
        assert_eq!(viewport.north_east, Coordinates::new(-23.555, -46.645));
    }

    #[test]
    fn fit_of_nothing_is_none() {
        assert_eq!(Viewport::fit(&[]), None);
    }

    #[test]
    fn padding_keeps_the_center() {
        let viewport = Viewport::fit(&[Coordinates::new(0.0, 0.0), Coordinates::new(2.0, 4.0)])
            .unwrap();
        let padded = viewport.padded(0.5);

        assert_eq!(padded.south_west, Coordinates::new(-1.0, -2.0));
        assert_eq!(padded.north_east, Coordinates::new(3.0, 6.0));
        assert_eq!(padded.center(), viewport.center());
    }

    #[test]
    fn route_info_converts_units() {
        let route = RouteInfo::new(vec![Coordinates::new(1.0, 1.0)], 7_800, 1_500);

        assert_eq!(route.distance_km, 7.8);
        assert_eq!(route.duration_min, 25.0);
        assert!(route.viewport.is_some());
    }
}

use crate::core::bounds::PixelMargin;
use crate::core::constants::ATTRIBUTION_MARGIN;
use crate::core::geo::LatLngRect;
use crate::layers::base::Overlay;

/// Union of the geographic bounds of all overlays, or `None` when there are
/// no overlays.
pub fn aggregate_bounds(overlays: &[Box<dyn Overlay>]) -> Option<LatLngRect> {
    overlays
        .iter()
        .map(|o| o.bounds())
        .reduce(|acc, b| acc.union(&b))
}

/// Component-wise maximum of every overlay's pixel margin.
///
/// When no attribution will be drawn, the bottom margin is at least
/// [`ATTRIBUTION_MARGIN`] so the corner stays free for one.
pub fn aggregate_margin(overlays: &[Box<dyn Overlay>], attribution_drawn: bool) -> PixelMargin {
    let floor = if attribution_drawn {
        PixelMargin::ZERO
    } else {
        PixelMargin::new(0, 0, 0, ATTRIBUTION_MARGIN)
    };
    overlays
        .iter()
        .fold(floor, |acc, o| acc.max(&o.extra_pixel_bounds()))
}

/// Ordered collection of overlays; drawing happens in insertion order.
#[derive(Debug, Default)]
pub struct OverlaySet {
    overlays: Vec<Box<dyn Overlay>>,
}

impl OverlaySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, overlay: Box<dyn Overlay>) {
        log::trace!("adding {} overlay", overlay.kind());
        self.overlays.push(overlay);
    }

    pub fn clear(&mut self) {
        self.overlays.clear();
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn as_slice(&self) -> &[Box<dyn Overlay>] {
        &self.overlays
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Overlay> {
        self.overlays.iter().map(|o| o.as_ref())
    }

    pub fn bounds(&self) -> Option<LatLngRect> {
        aggregate_bounds(&self.overlays)
    }

    pub fn margin(&self, attribution_drawn: bool) -> PixelMargin {
        aggregate_margin(&self.overlays, attribution_drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::{parse_lat_lngs, LatLng};
    use crate::layers::line::Line;
    use crate::layers::marker::Marker;

    fn marker(lat: f64, lng: f64) -> Box<dyn Overlay> {
        Box::new(Marker::new(LatLng::new(lat, lng).unwrap()))
    }

    #[test]
    fn test_empty_aggregates() {
        assert!(aggregate_bounds(&[]).is_none());
        assert_eq!(aggregate_margin(&[], true), PixelMargin::ZERO);
        assert_eq!(aggregate_margin(&[], false), PixelMargin::new(0, 0, 0, 12));
    }

    #[test]
    fn test_bounds_union() {
        let overlays = vec![marker(47.0, 7.0), marker(48.0, 8.0)];
        let b = aggregate_bounds(&overlays).unwrap();
        assert_eq!(
            b,
            LatLngRect::from_point_pair(
                LatLng::new(47.0, 7.0).unwrap(),
                LatLng::new(48.0, 8.0).unwrap()
            )
        );
    }

    #[test]
    fn test_margin_max() {
        let line = Line::styled(parse_lat_lngs("48,8 47.5,7.5").unwrap(), [0, 0, 0, 255], 4).unwrap();
        let overlays: Vec<Box<dyn Overlay>> = vec![marker(47.0, 7.0), Box::new(line)];
        assert_eq!(aggregate_margin(&overlays, true), PixelMargin::new(10, 10, 10, 4));
        assert_eq!(aggregate_margin(&overlays, false), PixelMargin::new(10, 10, 10, 12));
    }

    #[test]
    fn test_overlay_set() {
        let mut set = OverlaySet::new();
        assert!(set.is_empty());
        assert!(set.bounds().is_none());
        set.add(marker(47.0, 7.0));
        set.add(marker(48.0, 8.0));
        assert_eq!(set.len(), 2);
        assert_eq!(set.bounds(), aggregate_bounds(set.as_slice()));
        assert_eq!(set.margin(true), PixelMargin::new(10, 10, 10, 0));
        assert_eq!(set.iter().count(), 2);
        set.clear();
        assert!(set.is_empty());
    }
}

use crate::models::Location;

/// Margin, in degrees, kept around the markers when fitting the viewport.
pub const MAP_FIT_PADDING: f64 = 5.0;
pub const DEFAULT_CENTER: (f64, f64) = (0.0, 0.0);
pub const DEFAULT_ZOOM: f64 = 1.0;

const WORLD_LON: f64 = 180.0;
const WORLD_LAT: f64 = 90.0;
const POPUP_LIFT: f64 = 0.06;

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub address: String,
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bounds {
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        points.into_iter().fold(None, |acc, (lon, lat)| {
            Some(match acc {
                None => Bounds {
                    min_lon: lon,
                    min_lat: lat,
                    max_lon: lon,
                    max_lat: lat,
                },
                Some(b) => Bounds {
                    min_lon: b.min_lon.min(lon),
                    min_lat: b.min_lat.min(lat),
                    max_lon: b.max_lon.max(lon),
                    max_lat: b.max_lat.max(lat),
                },
            })
        })
    }

    #[cfg(test)]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        (self.min_lon..=self.max_lon).contains(&lon) && (self.min_lat..=self.max_lat).contains(&lat)
    }
}

/// Visible region of the map, in canvas coordinates (lon on x, lat on y).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl Viewport {
    pub fn centered(center: (f64, f64), zoom: f64) -> Self {
        let zoom = zoom.max(1.0);
        let (lon, lat) = center;
        let half_w = WORLD_LON / zoom;
        let half_h = WORLD_LAT / zoom;
        Self {
            x_bounds: [lon - half_w, lon + half_w],
            y_bounds: [lat - half_h, lat + half_h],
        }
    }

    fn fitted(bounds: Bounds, padding: f64) -> Self {
        Self {
            x_bounds: [
                (bounds.min_lon - padding).max(-WORLD_LON),
                (bounds.max_lon + padding).min(WORLD_LON),
            ],
            y_bounds: [
                (bounds.min_lat - padding).max(-WORLD_LAT),
                (bounds.max_lat + padding).min(WORLD_LAT),
            ],
        }
    }

    fn height(&self) -> f64 {
        self.y_bounds[1] - self.y_bounds[0]
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::centered(DEFAULT_CENTER, DEFAULT_ZOOM)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub marker: usize,
    pub address: String,
    /// Canvas point the label is drawn at, just above the marker.
    pub anchor: (f64, f64),
}

/// One map canvas with its markers and at most one popup.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    mounted: bool,
    markers: Vec<Marker>,
    viewport: Viewport,
    popup: Option<Popup>,
    selected: Option<usize>,
}

impl MapView {
    pub fn mount() -> Self {
        Self {
            mounted: true,
            markers: Vec::new(),
            viewport: Viewport::default(),
            popup: None,
            selected: None,
        }
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
        self.markers.clear();
        self.popup = None;
        self.selected = None;
        self.viewport = Viewport::default();
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Replaces the markers with one per location that has usable
    /// coordinates. Returns how many were placed.
    pub fn set_markers(&mut self, locations: &[Location]) -> usize {
        self.popup = None;
        self.markers = locations
            .iter()
            .filter_map(|location| match location.coordinates() {
                Some((lon, lat)) => Some(Marker {
                    address: location.address.clone(),
                    lon,
                    lat,
                }),
                None => {
                    tracing::warn!(
                        address = %location.address,
                        lon = ?location.lon,
                        lat = ?location.lat,
                        "invalid coordinates for location, skipping marker"
                    );
                    None
                }
            })
            .collect();
        self.selected = if self.markers.is_empty() { None } else { Some(0) };
        self.markers.len()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker_bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.markers.iter().map(|m| (m.lon, m.lat)))
    }

    pub fn fit_to(&mut self, bounds: Bounds, padding: f64) {
        self.viewport = Viewport::fitted(bounds, padding);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.markers.len();
        if len == 0 {
            self.selected = None;
            return;
        }
        let current = self.selected.unwrap_or(0) as isize;
        self.selected = Some((current + delta).rem_euclid(len as isize) as usize);
    }

    /// Opens the popup for `index`, closing any popup already open.
    pub fn open_popup(&mut self, index: usize) -> Option<&Popup> {
        self.close_popup();
        let marker = self.markers.get(index)?;
        let lift = self.viewport.height() * POPUP_LIFT;
        self.popup = Some(Popup {
            marker: index,
            address: marker.address.clone(),
            anchor: (marker.lon, marker.lat + lift),
        });
        self.selected = Some(index);
        self.popup.as_ref()
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }
}

/// Discards `previous` and draws a fresh map for `locations`.
pub fn render_map(previous: Option<MapView>, locations: &[Location]) -> MapView {
    if let Some(mut old) = previous {
        old.unmount();
    }

    let mut view = MapView::mount();
    let placed = view.set_markers(locations);
    if let Some(bounds) = view.marker_bounds() {
        view.fit_to(bounds, MAP_FIT_PADDING);
    }
    tracing::debug!(placed, total = locations.len(), "map rendered");
    view
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(address: &str, lon: Option<f64>, lat: Option<f64>) -> Location {
        Location {
            address: address.to_string(),
            lon,
            lat,
        }
    }

    #[test]
    fn only_valid_locations_get_markers() {
        let locations = vec![
            location("london-uk", Some(-0.12), Some(51.5)),
            location("nowhere", None, Some(10.0)),
            location("osaka-japan", Some(135.5), Some(34.7)),
            location("broken", Some(f64::INFINITY), Some(1.0)),
        ];

        let view = render_map(None, &locations);
        let addresses: Vec<_> = view.markers().iter().map(|m| m.address.as_str()).collect();
        assert_eq!(addresses, ["london-uk", "osaka-japan"]);

        let viewport = view.viewport();
        assert_eq!(viewport.x_bounds, [-0.12 - MAP_FIT_PADDING, 135.5 + MAP_FIT_PADDING]);
        assert_eq!(viewport.y_bounds, [34.7 - MAP_FIT_PADDING, 51.5 + MAP_FIT_PADDING]);

        let bounds = view.marker_bounds().unwrap();
        for marker in view.markers() {
            assert!(bounds.contains(marker.lon, marker.lat));
        }
    }

    #[test]
    fn no_valid_locations_keeps_default_viewport() {
        let locations = vec![location("a", None, None), location("b", Some(1.0), None)];
        let view = render_map(None, &locations);
        assert!(view.markers().is_empty());
        assert_eq!(view.viewport(), Viewport::default());
        assert_eq!(view.selected(), None);
    }

    #[test]
    fn zero_coordinates_are_a_real_point() {
        let view = render_map(None, &[location("null-island", Some(0.0), Some(0.0))]);
        assert_eq!(view.markers().len(), 1);
        assert_eq!((view.markers()[0].lon, view.markers()[0].lat), (0.0, 0.0));
        assert_eq!(view.viewport().x_bounds, [-MAP_FIT_PADDING, MAP_FIT_PADDING]);
        assert_eq!(view.viewport().y_bounds, [-MAP_FIT_PADDING, MAP_FIT_PADDING]);
    }

    #[test]
    fn fitted_viewport_is_clamped_to_world() {
        let view = render_map(None, &[location("edge", Some(179.0), Some(-89.0))]);
        assert_eq!(view.viewport().x_bounds[1], 180.0);
        assert_eq!(view.viewport().y_bounds[0], -90.0);
    }

    #[test]
    fn only_one_popup_is_open_at_a_time() {
        let locations = vec![
            location("london-uk", Some(-0.12), Some(51.5)),
            location("paris-france", Some(2.35), Some(48.85)),
        ];
        let mut view = render_map(None, &locations);

        view.open_popup(0);
        let popup = view.open_popup(1).cloned().unwrap();
        assert_eq!(popup.address, "paris-france");
        assert_eq!(popup.marker, 1);
        assert!(popup.anchor.1 > 48.85);
        assert_eq!(view.popup(), Some(&popup));

        view.close_popup();
        assert!(view.popup().is_none());
        assert!(view.open_popup(5).is_none());
    }

    #[test]
    fn rerender_discards_previous_state() {
        let mut first = render_map(None, &[location("a", Some(1.0), Some(1.0))]);
        first.open_popup(0);

        let second = render_map(Some(first), &[location("b", Some(2.0), Some(2.0))]);
        assert!(second.is_mounted());
        assert!(second.popup().is_none());
        assert_eq!(second.markers().len(), 1);
        assert_eq!(second.markers()[0].address, "b");
    }

    #[test]
    fn selection_wraps_around_markers() {
        let mut view = render_map(
            None,
            &[
                location("a", Some(1.0), Some(1.0)),
                location("b", Some(2.0), Some(2.0)),
            ],
        );
        assert_eq!(view.selected(), Some(0));
        view.move_selection(-1);
        assert_eq!(view.selected(), Some(1));
        view.move_selection(1);
        assert_eq!(view.selected(), Some(0));
    }

    #[test]
    fn unmount_clears_markers() {
        let mut view = render_map(None, &[location("a", Some(1.0), Some(1.0))]);
        view.unmount();
        assert!(!view.is_mounted());
        assert!(view.markers().is_empty());
    }
}

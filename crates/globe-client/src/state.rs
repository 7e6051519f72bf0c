//! Application state shared by the globe and the map.
//!
//! The renderer and the map widget are external; they read positions and
//! rotations from [`GlobeState`] and feed user input back through
//! [`crate::events`]. Nothing here touches a scene graph.

use std::fmt;

use geoproject::{
    CameraRotation, CartesianPoint, DeviceOrientation, GeoPoint, GeoProjector, GlobeRotation,
    globe_rotation_towards, haversine_distance_km,
};
use glam::DVec2;

use crate::countries::Country;
use crate::departements::Departement;
use crate::error::{Error, Result};
use crate::routes::Route;

/// Height of the user's marker above the globe surface.
pub const USER_MARKER_HEIGHT: f64 = 0.04;
/// Height of country flag markers above the globe surface.
pub const COUNTRY_MARKER_HEIGHT: f64 = 0.02;
/// Spin applied per frame while auto-rotating, in radians.
pub const AUTO_ROTATE_STEP: f64 = 0.001;
/// Drag rotation per pointer pixel, in radians.
pub const DRAG_ROTATION_SPEED: f64 = 0.005;
/// Squared pointer distance, in pixels, before a press counts as a drag.
pub const DRAG_THRESHOLD_SQ: f64 = 16.0;

/// Map zoom after selecting a country on the globe.
pub const COUNTRY_ZOOM: u8 = 5;
/// Map zoom after clicking bare globe surface.
pub const SURFACE_ZOOM: u8 = 8;
/// Map zoom after a geolocation fix.
pub const USER_ZOOM: u8 = 10;

/// Where the map goes back to when cleared (Nice).
pub const HOME_CENTER: GeoPoint = GeoPoint::new_unchecked(43.7102, 7.2620);
/// Map zoom when cleared.
pub const HOME_ZOOM: u8 = 13;

/// Meters per second to kilometers per hour.
const MPS_TO_KMH: f64 = 3.6;

/// A geolocation result.
///
/// Only `position` is guaranteed; every other reading is optional on the
/// platforms that report it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserFix {
    /// Reported position.
    pub position: GeoPoint,
    /// Accuracy radius in meters.
    pub accuracy_m: Option<f64>,
    /// Altitude above the WGS84 ellipsoid in meters.
    pub altitude_m: Option<f64>,
    /// Altitude accuracy in meters.
    pub altitude_accuracy_m: Option<f64>,
    /// Ground speed in meters per second.
    pub speed_mps: Option<f64>,
    /// Direction of travel in degrees clockwise from true north.
    pub heading_deg: Option<f64>,
}

impl UserFix {
    /// A fix with a position and nothing else.
    #[must_use]
    pub const fn new(position: GeoPoint) -> Self {
        Self {
            position,
            accuracy_m: None,
            altitude_m: None,
            altitude_accuracy_m: None,
            speed_mps: None,
            heading_deg: None,
        }
    }

    /// Set the accuracy radius.
    #[must_use]
    pub const fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }

    /// Ground speed in km/h.
    #[must_use]
    pub fn speed_kmh(&self) -> Option<f64> {
        self.speed_mps.map(|mps| mps * MPS_TO_KMH)
    }
}

/// Circle around the user's fix whose radius is the reported accuracy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecisionCircle {
    /// Circle center.
    pub center: GeoPoint,
    /// Radius in meters.
    pub radius_m: f64,
}

/// Why a geolocation request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationError {
    /// The user refused to share their location.
    PermissionDenied,
    /// No position source was available.
    PositionUnavailable,
    /// The request took too long.
    Timeout,
    /// Any other failure.
    Unknown,
}

impl fmt::Display for GeolocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::PermissionDenied => "permission denied",
            Self::PositionUnavailable => "position unavailable",
            Self::Timeout => "request timed out",
            Self::Unknown => "unknown error",
        };
        f.write_str(message)
    }
}

/// A point drawn on the globe.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Label shown in popups.
    pub label: String,
    /// Geographic position.
    pub geo: GeoPoint,
    /// Position in globe space, already lifted above the surface.
    pub position: CartesianPoint,
    /// Whether the marker should be drawn.
    pub visible: bool,
}

/// Center and zoom the map widget should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    /// Map center.
    pub center: GeoPoint,
    /// Slippy-map zoom level.
    pub zoom: u8,
}

/// The most recent thing the user picked.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// A country marker, by index into [`GlobeState::countries`].
    Country {
        /// Index of the country.
        index: usize,
        /// Country name.
        name: String,
    },
    /// A bare point on the globe surface.
    Globe(GeoPoint),
    /// A point on the map widget.
    Map(GeoPoint),
}

/// What a click on the globe canvas hit, as reported by the renderer's ray cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickTarget {
    /// A country marker, by index.
    Country(usize),
    /// The globe surface at this point in globe space.
    Surface(CartesianPoint),
    /// Nothing.
    Miss,
}

/// Pointer drag bookkeeping for rotating the globe by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct DragTracker {
    active: bool,
    anchor: DVec2,
    moved: bool,
    /// Set when a drag ends so the click that follows the release is ignored.
    just_dragged: bool,
}

/// Everything the globe and map views render from.
#[derive(Debug, Clone)]
pub struct GlobeState {
    projector: GeoProjector,
    /// Current rotation of the globe mesh.
    pub globe_rotation: GlobeRotation,
    /// Whether the globe spins on each tick.
    pub auto_rotate: bool,
    /// Camera rotation from the device orientation sensor, if any.
    pub camera_rotation: Option<CameraRotation>,
    /// Last geolocation fix.
    pub user_fix: Option<UserFix>,
    /// Last geolocation failure, cleared by the next fix.
    pub geolocation_error: Option<GeolocationError>,
    /// Marker for the user's position.
    pub user_marker: Option<Marker>,
    /// Loaded countries.
    pub countries: Vec<Country>,
    /// Flag markers, index-aligned with `countries`.
    pub country_markers: Vec<Marker>,
    /// Last selection.
    pub last_selection: Option<Selection>,
    /// Requested map view.
    pub map_view: Option<MapView>,
    /// Whether the user marker is shown.
    pub show_user: bool,
    /// Whether country markers are shown.
    pub show_countries: bool,
    /// Whether continuous position updates are requested.
    pub watching: bool,
    /// Accuracy circle drawn on the map.
    pub precision_circle: Option<PrecisionCircle>,
    /// Driving route drawn on the map.
    pub route: Option<Route>,
    /// Département outlines drawn on the map.
    pub departements: Vec<Departement>,
    drag: DragTracker,
}

impl Default for GlobeState {
    fn default() -> Self {
        Self::new(GeoProjector::UNIT)
    }
}

impl GlobeState {
    /// Create an empty state for a globe of the given size.
    #[must_use]
    pub fn new(projector: GeoProjector) -> Self {
        Self {
            projector,
            globe_rotation: GlobeRotation::default(),
            auto_rotate: false,
            camera_rotation: None,
            user_fix: None,
            geolocation_error: None,
            user_marker: None,
            countries: Vec::new(),
            country_markers: Vec::new(),
            last_selection: None,
            map_view: None,
            show_user: true,
            show_countries: true,
            watching: false,
            precision_circle: None,
            route: None,
            departements: Vec::new(),
            drag: DragTracker::default(),
        }
    }

    /// The projector used to place markers.
    #[must_use]
    pub fn projector(&self) -> GeoProjector {
        self.projector
    }

    /// Whether a pointer drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.active
    }

    /// Advance one frame.
    pub fn tick(&mut self) {
        if self.auto_rotate {
            self.globe_rotation.y += AUTO_ROTATE_STEP;
        }
    }

    /// Turn the globe so `point` faces the camera. Stops auto-rotation.
    pub fn rotate_towards(&mut self, point: GeoPoint) {
        self.auto_rotate = false;
        self.globe_rotation = globe_rotation_towards(point);
    }

    /// Record a geolocation fix and place the user marker.
    pub fn apply_geolocation(&mut self, fix: UserFix) {
        tracing::info!(position = %fix.position, accuracy_m = ?fix.accuracy_m, "geolocation fix");

        self.user_marker = Some(Marker {
            label: "You".to_string(),
            geo: fix.position,
            position: self.projector.project(fix.position, USER_MARKER_HEIGHT),
            visible: self.show_user,
        });
        self.user_fix = Some(fix);
        self.geolocation_error = None;
        self.rotate_towards(fix.position);
        self.map_view = Some(MapView {
            center: fix.position,
            zoom: USER_ZOOM,
        });
    }

    /// Ask the platform for continuous position updates.
    ///
    /// Each update still arrives as a separate fix.
    pub fn start_watching(&mut self) {
        if !self.watching {
            tracing::info!("watching position");
            self.watching = true;
        }
    }

    /// Stop continuous position updates.
    pub fn stop_watching(&mut self) {
        if self.watching {
            tracing::info!("stopped watching position");
            self.watching = false;
        }
    }

    /// Draw the accuracy circle around the current fix.
    pub fn add_precision_circle(&mut self) -> Result<PrecisionCircle> {
        let fix = self.user_fix.ok_or_else(|| Error::InvalidData {
            context: "precision circle",
            detail: "no position yet".to_string(),
        })?;
        let radius_m = fix.accuracy_m.ok_or_else(|| Error::InvalidData {
            context: "precision circle",
            detail: "fix has no accuracy".to_string(),
        })?;

        let circle = PrecisionCircle {
            center: fix.position,
            radius_m,
        };
        self.precision_circle = Some(circle);
        Ok(circle)
    }

    /// Replace the route shown on the map.
    pub fn load_route(&mut self, route: Route) {
        tracing::info!(
            distance_km = route.distance_km,
            duration_min = route.duration_min,
            "route loaded"
        );
        self.route = Some(route);
    }

    /// Replace the département outlines shown on the map.
    pub fn load_departements(&mut self, departements: Vec<Departement>) {
        tracing::info!(count = departements.len(), "departements loaded");
        self.departements = departements;
    }

    /// Remove everything drawn on the map and recenter it on [`HOME_CENTER`].
    ///
    /// Stops watching and forgets the user's fix. Country markers stay.
    pub fn clear_map(&mut self) {
        self.stop_watching();
        self.user_fix = None;
        self.user_marker = None;
        self.geolocation_error = None;
        self.precision_circle = None;
        self.route = None;
        self.departements.clear();
        self.last_selection = None;
        self.map_view = Some(MapView {
            center: HOME_CENTER,
            zoom: HOME_ZOOM,
        });
    }

    /// Record a failed geolocation request.
    pub fn apply_geolocation_error(&mut self, error: GeolocationError) {
        tracing::warn!("geolocation failed: {error}");
        self.geolocation_error = Some(error);
    }

    /// Replace the loaded countries and their markers.
    pub fn load_countries(&mut self, countries: Vec<Country>) {
        self.country_markers = countries
            .iter()
            .map(|country| Marker {
                label: country.name.clone(),
                geo: country.position,
                position: self
                    .projector
                    .project(country.position, COUNTRY_MARKER_HEIGHT),
                visible: self.show_countries,
            })
            .collect();
        self.countries = countries;
        self.last_selection = None;
        tracing::info!(count = self.countries.len(), "countries loaded");
    }

    fn country(&self, index: usize) -> Result<&Country> {
        self.countries.get(index).ok_or_else(|| Error::InvalidData {
            context: "country index",
            detail: format!("{index} out of range for {} countries", self.countries.len()),
        })
    }

    /// Handle a click on the globe canvas.
    ///
    /// Returns the selected position, or `None` if the click was ignored
    /// (it ended a drag, or missed the globe).
    pub fn click_globe(&mut self, target: ClickTarget) -> Result<Option<GeoPoint>> {
        if self.drag.just_dragged {
            self.drag.just_dragged = false;
            tracing::debug!("ignoring click that ended a drag");
            return Ok(None);
        }

        match target {
            ClickTarget::Country(index) => {
                let country = self.country(index)?;
                let position = country.position;
                let name = country.name.clone();
                self.map_view = Some(MapView {
                    center: position,
                    zoom: COUNTRY_ZOOM,
                });
                self.rotate_towards(position);
                tracing::info!(%name, "country selected on globe");
                self.last_selection = Some(Selection::Country { index, name });
                Ok(Some(position))
            }
            ClickTarget::Surface(hit) => {
                let position = self.projector.unproject(hit)?;
                self.map_view = Some(MapView {
                    center: position,
                    zoom: SURFACE_ZOOM,
                });
                self.rotate_towards(position);
                tracing::info!(%position, "globe surface clicked");
                self.last_selection = Some(Selection::Globe(position));
                Ok(Some(position))
            }
            ClickTarget::Miss => Ok(None),
        }
    }

    /// Handle a click on bare map.
    pub fn click_map(&mut self, position: GeoPoint) {
        self.rotate_towards(position);
        self.last_selection = Some(Selection::Map(position));
    }

    /// Handle a click on a country marker in the map widget.
    pub fn select_country_on_map(&mut self, index: usize) -> Result<()> {
        let country = self.country(index)?;
        let position = country.position;
        let name = country.name.clone();
        self.rotate_towards(position);
        self.last_selection = Some(Selection::Country { index, name });
        Ok(())
    }

    /// Start a drag at `at` (pointer position in pixels).
    pub fn pointer_down(&mut self, at: DVec2) {
        self.drag = DragTracker {
            active: true,
            anchor: at,
            moved: false,
            just_dragged: false,
        };
        self.auto_rotate = false;
    }

    /// Rotate the globe if the pointer moved far enough since the last anchor.
    pub fn pointer_move(&mut self, at: DVec2) {
        if !self.drag.active {
            return;
        }
        let delta = at - self.drag.anchor;
        if delta.length_squared() > DRAG_THRESHOLD_SQ {
            self.drag.moved = true;
            self.globe_rotation = self
                .globe_rotation
                .rotated(delta.y * DRAG_ROTATION_SPEED, delta.x * DRAG_ROTATION_SPEED);
            self.drag.anchor = at;
        }
    }

    /// End the current drag.
    pub fn pointer_up(&mut self) {
        self.drag.active = false;
        if self.drag.moved {
            self.drag.just_dragged = true;
        }
    }

    /// Apply a device orientation reading to the camera.
    pub fn apply_orientation(&mut self, reading: DeviceOrientation) {
        if let Some(rotation) = reading.camera_rotation() {
            self.camera_rotation = Some(rotation);
        }
    }

    /// Show or hide the user marker.
    pub fn set_show_user(&mut self, show: bool) {
        self.show_user = show;
        if let Some(marker) = &mut self.user_marker {
            marker.visible = show;
        }
    }

    /// Show or hide every country marker.
    pub fn set_show_countries(&mut self, show: bool) {
        self.show_countries = show;
        for marker in &mut self.country_markers {
            marker.visible = show;
        }
    }

    /// Put the globe back in its initial orientation.
    pub fn reset_view(&mut self) {
        self.globe_rotation = GlobeRotation::default();
        self.auto_rotate = false;
    }

    /// Great-circle distance from the user's fix, if there is one.
    #[must_use]
    pub fn distance_to_user_km(&self, point: GeoPoint) -> Option<f64> {
        self.user_fix
            .map(|fix| haversine_distance_km(fix.position, point))
    }
}

//! Input events and handler dispatch.
//!
//! Every user or platform input is a [`GlobeEvent`]. [`EventBus::dispatch`]
//! applies the event to [`GlobeState`] and then notifies the handlers
//! registered for its [`EventKind`]. Handlers for the same kind run in no
//! particular order.

use std::collections::HashMap;

use geoproject::{DeviceOrientation, GeoPoint};
use glam::DVec2;

use crate::countries::Country;
use crate::departements::Departement;
use crate::error::Result;
use crate::routes::Route;
use crate::state::{ClickTarget, GeolocationError, GlobeState, UserFix};

/// An input delivered to the globe controller.
#[derive(Debug, Clone, PartialEq)]
pub enum GlobeEvent {
    /// The geolocation service reported a position.
    GeolocationFix(UserFix),
    /// The geolocation service failed.
    GeolocationError(GeolocationError),
    /// The country dataset finished loading.
    CountriesLoaded(Vec<Country>),
    /// The globe canvas was clicked.
    GlobeClick(ClickTarget),
    /// Bare map was clicked.
    MapClick(GeoPoint),
    /// A country marker on the map was clicked, by index.
    CountrySelected(usize),
    /// Pointer pressed on the globe canvas, in pixels.
    PointerDown(DVec2),
    /// Pointer moved over the globe canvas, in pixels.
    PointerMove(DVec2),
    /// Pointer released.
    PointerUp,
    /// Device orientation sensor reading.
    DeviceOrientation(DeviceOrientation),
    /// Auto-rotation checkbox changed.
    AutoRotateToggled(bool),
    /// "Show my position" checkbox changed.
    ShowUserToggled(bool),
    /// "Show countries" checkbox changed.
    ShowCountriesToggled(bool),
    /// Reset button pressed.
    ResetView,
    /// A frame is about to render.
    Tick,
    /// Continuous position updates requested.
    WatchStarted,
    /// Continuous position updates stopped.
    WatchStopped,
    /// "Precision circle" button pressed.
    PrecisionCircleRequested,
    /// A driving route finished loading.
    RouteLoaded(Route),
    /// Département outlines finished loading.
    DepartementsLoaded(Vec<Departement>),
    /// "Clear map" button pressed.
    ClearMap,
}

/// Payload-free name of a [`GlobeEvent`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`GlobeEvent::GeolocationFix`].
    GeolocationFix,
    /// [`GlobeEvent::GeolocationError`].
    GeolocationError,
    /// [`GlobeEvent::CountriesLoaded`].
    CountriesLoaded,
    /// [`GlobeEvent::GlobeClick`].
    GlobeClick,
    /// [`GlobeEvent::MapClick`].
    MapClick,
    /// [`GlobeEvent::CountrySelected`].
    CountrySelected,
    /// [`GlobeEvent::PointerDown`].
    PointerDown,
    /// [`GlobeEvent::PointerMove`].
    PointerMove,
    /// [`GlobeEvent::PointerUp`].
    PointerUp,
    /// [`GlobeEvent::DeviceOrientation`].
    DeviceOrientation,
    /// [`GlobeEvent::AutoRotateToggled`].
    AutoRotateToggled,
    /// [`GlobeEvent::ShowUserToggled`].
    ShowUserToggled,
    /// [`GlobeEvent::ShowCountriesToggled`].
    ShowCountriesToggled,
    /// [`GlobeEvent::ResetView`].
    ResetView,
    /// [`GlobeEvent::Tick`].
    Tick,
    /// [`GlobeEvent::WatchStarted`].
    WatchStarted,
    /// [`GlobeEvent::WatchStopped`].
    WatchStopped,
    /// [`GlobeEvent::PrecisionCircleRequested`].
    PrecisionCircleRequested,
    /// [`GlobeEvent::RouteLoaded`].
    RouteLoaded,
    /// [`GlobeEvent::DepartementsLoaded`].
    DepartementsLoaded,
    /// [`GlobeEvent::ClearMap`].
    ClearMap,
}

impl GlobeEvent {
    /// The kind of this event.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::GeolocationFix(_) => EventKind::GeolocationFix,
            Self::GeolocationError(_) => EventKind::GeolocationError,
            Self::CountriesLoaded(_) => EventKind::CountriesLoaded,
            Self::GlobeClick(_) => EventKind::GlobeClick,
            Self::MapClick(_) => EventKind::MapClick,
            Self::CountrySelected(_) => EventKind::CountrySelected,
            Self::PointerDown(_) => EventKind::PointerDown,
            Self::PointerMove(_) => EventKind::PointerMove,
            Self::PointerUp => EventKind::PointerUp,
            Self::DeviceOrientation(_) => EventKind::DeviceOrientation,
            Self::AutoRotateToggled(_) => EventKind::AutoRotateToggled,
            Self::ShowUserToggled(_) => EventKind::ShowUserToggled,
            Self::ShowCountriesToggled(_) => EventKind::ShowCountriesToggled,
            Self::ResetView => EventKind::ResetView,
            Self::Tick => EventKind::Tick,
            Self::WatchStarted => EventKind::WatchStarted,
            Self::WatchStopped => EventKind::WatchStopped,
            Self::PrecisionCircleRequested => EventKind::PrecisionCircleRequested,
            Self::RouteLoaded(_) => EventKind::RouteLoaded,
            Self::DepartementsLoaded(_) => EventKind::DepartementsLoaded,
            Self::ClearMap => EventKind::ClearMap,
        }
    }

    /// Apply this event to `state`.
    pub fn apply(&self, state: &mut GlobeState) -> Result<()> {
        match self {
            Self::GeolocationFix(fix) => state.apply_geolocation(*fix),
            Self::GeolocationError(error) => state.apply_geolocation_error(*error),
            Self::CountriesLoaded(countries) => state.load_countries(countries.clone()),
            Self::GlobeClick(target) => {
                state.click_globe(*target)?;
            }
            Self::MapClick(position) => state.click_map(*position),
            Self::CountrySelected(index) => state.select_country_on_map(*index)?,
            Self::PointerDown(at) => state.pointer_down(*at),
            Self::PointerMove(at) => state.pointer_move(*at),
            Self::PointerUp => state.pointer_up(),
            Self::DeviceOrientation(reading) => state.apply_orientation(*reading),
            Self::AutoRotateToggled(on) => state.auto_rotate = *on,
            Self::ShowUserToggled(show) => state.set_show_user(*show),
            Self::ShowCountriesToggled(show) => state.set_show_countries(*show),
            Self::ResetView => state.reset_view(),
            Self::Tick => state.tick(),
            Self::WatchStarted => state.start_watching(),
            Self::WatchStopped => state.stop_watching(),
            Self::PrecisionCircleRequested => {
                state.add_precision_circle()?;
            }
            Self::RouteLoaded(route) => state.load_route(route.clone()),
            Self::DepartementsLoaded(departements) => {
                state.load_departements(departements.clone());
            }
            Self::ClearMap => state.clear_map(),
        }
        Ok(())
    }
}

/// A callback run after an event has been applied.
pub type Handler = Box<dyn FnMut(&GlobeState, &GlobeEvent) + Send>;

/// Routes events to the state and to registered handlers.
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventKind, Vec<Handler>>,
}

impl EventBus {
    /// Create a bus with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of `kind`.
    pub fn on<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&GlobeState, &GlobeEvent) + Send + 'static,
    {
        self.handlers.entry(kind).or_default().push(Box::new(handler));
    }

    /// Number of handlers registered for `kind`.
    #[must_use]
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Apply `event` to `state`, then run its handlers.
    ///
    /// If applying the event fails, the state is left as the failing
    /// operation left it and no handlers run.
    pub fn dispatch(&mut self, state: &mut GlobeState, event: &GlobeEvent) -> Result<()> {
        let kind = event.kind();
        if let Err(e) = event.apply(state) {
            tracing::warn!(?kind, "event rejected: {e}");
            return Err(e);
        }

        if let Some(handlers) = self.handlers.get_mut(&kind) {
            tracing::trace!(?kind, handlers = handlers.len(), "dispatching");
            for handler in handlers {
                handler(&*state, event);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use geoproject::CartesianPoint;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_handlers_see_updated_state() {
        let mut state = GlobeState::default();
        let mut bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        bus.on(EventKind::MapClick, move |state, _| {
            sink.lock().unwrap().push(state.globe_rotation);
        });

        let point = GeoPoint::new_unchecked(10.0, 20.0);
        bus.dispatch(&mut state, &GlobeEvent::MapClick(point)).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], geoproject::globe_rotation_towards(point));
    }

    #[test]
    fn test_only_matching_kind_runs() {
        let mut state = GlobeState::default();
        let mut bus = EventBus::new();
        let count = Arc::new(Mutex::new(0));

        for _ in 0..2 {
            let count = Arc::clone(&count);
            bus.on(EventKind::Tick, move |_, _| *count.lock().unwrap() += 1);
        }
        assert_eq!(bus.handler_count(EventKind::Tick), 2);
        assert_eq!(bus.handler_count(EventKind::ResetView), 0);

        bus.dispatch(&mut state, &GlobeEvent::ResetView).unwrap();
        assert_eq!(*count.lock().unwrap(), 0);

        bus.dispatch(&mut state, &GlobeEvent::Tick).unwrap();
        assert_eq!(*count.lock().unwrap(), 2);
    }

    #[test]
    fn test_failed_event_skips_handlers() {
        let mut state = GlobeState::default();
        let mut bus = EventBus::new();
        let called = Arc::new(Mutex::new(false));

        let flag = Arc::clone(&called);
        bus.on(EventKind::GlobeClick, move |_, _| *flag.lock().unwrap() = true);

        let event = GlobeEvent::GlobeClick(ClickTarget::Surface(CartesianPoint::ZERO));
        let result = bus.dispatch(&mut state, &event);
        assert!(matches!(result, Err(Error::Projection(_))));
        assert!(!*called.lock().unwrap());
    }

    #[test]
    fn test_drag_sequence_through_bus() {
        let mut state = GlobeState::default();
        let mut bus = EventBus::new();

        for event in [
            GlobeEvent::AutoRotateToggled(true),
            GlobeEvent::PointerDown(DVec2::new(0.0, 0.0)),
            GlobeEvent::PointerMove(DVec2::new(40.0, 0.0)),
            GlobeEvent::PointerUp,
            GlobeEvent::Tick,
        ] {
            bus.dispatch(&mut state, &event).unwrap();
        }

        assert!(!state.auto_rotate);
        assert!((state.globe_rotation.y - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(GlobeEvent::Tick.kind(), EventKind::Tick);
        assert_eq!(
            GlobeEvent::CountriesLoaded(Vec::new()).kind(),
            EventKind::CountriesLoaded
        );
        assert_eq!(
            GlobeEvent::GeolocationError(GeolocationError::Timeout).kind(),
            EventKind::GeolocationError
        );
    }

    #[test]
    fn test_watch_and_clear_through_bus() {
        let mut state = GlobeState::default();
        let mut bus = EventBus::new();
        let stops = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&stops);
        bus.on(EventKind::ClearMap, move |state, _| {
            sink.lock().unwrap().push(state.watching);
        });

        let fix = UserFix::new(GeoPoint::new_unchecked(43.7, 7.26)).with_accuracy(12.0);
        for event in [
            GlobeEvent::WatchStarted,
            GlobeEvent::GeolocationFix(fix),
            GlobeEvent::PrecisionCircleRequested,
        ] {
            bus.dispatch(&mut state, &event).unwrap();
        }
        assert!(state.watching);
        assert_eq!(state.precision_circle.unwrap().radius_m, 12.0);

        bus.dispatch(&mut state, &GlobeEvent::ClearMap).unwrap();
        assert_eq!(*stops.lock().unwrap(), vec![false]);
        assert_eq!(state.user_fix, None);
        assert_eq!(state.precision_circle, None);
    }

    #[test]
    fn test_precision_circle_without_fix_is_rejected() {
        let mut state = GlobeState::default();
        let mut bus = EventBus::new();
        let result = bus.dispatch(&mut state, &GlobeEvent::PrecisionCircleRequested);
        assert!(matches!(result, Err(Error::InvalidData { .. })));
    }

    #[test]
    fn test_route_and_departements_loaded() {
        let mut state = GlobeState::default();
        let mut bus = EventBus::new();
        let route = Route {
            distance_km: 199.8,
            duration_min: 136,
            path: vec![GeoPoint::new_unchecked(43.3, 5.37), GeoPoint::new_unchecked(43.7, 7.26)],
        };

        bus.dispatch(&mut state, &GlobeEvent::RouteLoaded(route.clone()))
            .unwrap();
        bus.dispatch(&mut state, &GlobeEvent::DepartementsLoaded(Vec::new()))
            .unwrap();
        assert_eq!(state.route, Some(route));
        assert_eq!(
            GlobeEvent::DepartementsLoaded(Vec::new()).kind(),
            EventKind::DepartementsLoaded
        );
    }
}

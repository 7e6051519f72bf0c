//! Headless controller for a globe view linked to a 2D map.
//!
//! The renderer and the map widget live outside this crate. They feed user
//! and platform input in as [`GlobeEvent`]s and draw from [`GlobeState`],
//! which owns every piece of shared application state. Coordinate math is
//! delegated to [`geoproject`].
//!
//! # Example
//!
//! ```
//! use geoproject::GeoPoint;
//! use globe_client::{EventBus, EventKind, GlobeEvent, GlobeState, UserFix};
//!
//! let mut state = GlobeState::default();
//! let mut bus = EventBus::new();
//! bus.on(EventKind::GeolocationFix, |state, _| {
//!     assert!(state.user_marker.is_some());
//! });
//!
//! let fix = UserFix::new(GeoPoint::new(43.7102, 7.2620)?).with_accuracy(30.0);
//! bus.dispatch(&mut state, &GlobeEvent::GeolocationFix(fix))?;
//! bus.dispatch(&mut state, &GlobeEvent::PrecisionCircleRequested)?;
//! assert_eq!(state.precision_circle.map(|c| c.radius_m), Some(30.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod countries;
pub mod departements;
mod error;
pub mod events;
mod http;
pub mod launch_params;
pub mod routes;
pub mod state;

pub use countries::{Country, CountryClient, decode_countries};
pub use departements::{Departement, DepartementClient, decode_departements};
pub use error::{Error, Result};
pub use events::{EventBus, EventKind, GlobeEvent};
pub use routes::{Route, RouteClient, decode_route};
pub use state::{
    ClickTarget, GeolocationError, GlobeState, MapView, Marker, PrecisionCircle, Selection,
    UserFix,
};

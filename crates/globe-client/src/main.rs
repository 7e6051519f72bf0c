//! Command-line front end for the globe projector.
//!
//! Prints marker positions, inverse projections and great-circle
//! distances, and can drive the globe controller from the live country,
//! route and département datasets.

use std::process::ExitCode;

use geoproject::{GeoPoint, GeoProjector, forward, haversine_distance_km, inverse};
use globe_client::launch_params::{self, Command};
use globe_client::{
    CountryClient, DepartementClient, EventBus, EventKind, GlobeEvent, GlobeState, Result,
    RouteClient, UserFix,
};
use glam::DVec3;

fn print_projection(point: GeoPoint, position: DVec3) {
    println!(
        "{point} -> x={:.6} y={:.6} z={:.6}",
        position.x, position.y, position.z
    );
}

fn run_countries(
    countries: Vec<globe_client::Country>,
    limit: Option<usize>,
    from: Option<GeoPoint>,
    radius: f64,
) -> Result<()> {
    let mut state = GlobeState::new(GeoProjector::new(radius));
    let mut bus = EventBus::new();
    bus.on(EventKind::CountriesLoaded, |state, _| {
        tracing::info!(markers = state.country_markers.len(), "markers placed");
    });

    if let Some(position) = from {
        bus.dispatch(&mut state, &GlobeEvent::GeolocationFix(UserFix::new(position)))?;
    }
    bus.dispatch(&mut state, &GlobeEvent::CountriesLoaded(countries))?;

    let shown = limit.unwrap_or(state.countries.len());
    for (country, marker) in state.countries.iter().zip(&state.country_markers).take(shown) {
        let p = marker.position;
        match state.distance_to_user_km(country.position) {
            Some(km) => println!(
                "{:<32} {} -> ({:.4}, {:.4}, {:.4})  {km:.2} km",
                country.name, country.position, p.x, p.y, p.z
            ),
            None => println!(
                "{:<32} {} -> ({:.4}, {:.4}, {:.4})",
                country.name, country.position, p.x, p.y, p.z
            ),
        }
    }
    Ok(())
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Project {
            lat,
            lon,
            radius,
            height,
        } => {
            if radius + height <= 0.0 {
                tracing::warn!(radius, height, "radius + height is not positive");
            }
            let point = GeoPoint::new_unchecked(lat, lon);
            print_projection(point, forward(lat, lon, radius, height));
        }
        Command::Unproject { x, y, z } => {
            let point = inverse(DVec3::new(x, y, z))?;
            println!("{point}");
        }
        Command::Distance { from, to } => {
            let km = haversine_distance_km(from, to);
            println!("{from} -> {to}: {km:.2} km");
        }
        Command::Countries {
            limit,
            from,
            radius,
            base_url,
        } => {
            let client = CountryClient::new()?.with_base_url(base_url);
            let countries = client.fetch_all().await?;
            run_countries(countries, limit, from, radius)?;
        }
        Command::Route { from, to, base_url } => {
            let client = RouteClient::new()?.with_base_url(base_url);
            let route = client.fetch_route(from, to).await?;
            println!(
                "{from} -> {to}: {:.2} km, {} min, {} points",
                route.distance_km,
                route.duration_min,
                route.path.len()
            );
        }
        Command::Departements { url } => {
            let client = DepartementClient::new()?.with_url(url);
            let mut state = GlobeState::default();
            let mut bus = EventBus::new();
            bus.dispatch(
                &mut state,
                &GlobeEvent::DepartementsLoaded(client.fetch_all().await?),
            )?;
            for departement in &state.departements {
                let rings = departement.rings.len();
                println!("{:<4} {:<32} {rings} ring(s)", departement.code, departement.name);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    let params = launch_params::parse();
    tracing::debug!(?params, "starting");

    match run(params.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

//! `locate` and `nearby` command handlers.

use pasaley_core::{format_km, rank, AppConfig, Coordinate, ReferencePoint, ReferenceSource};
use pasaley_db::{StoreRepository, StoreRow};
use pasaley_locate::{resolve_or_default, AcquisitionPolicy, ConfiguredProvider};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NearbyArgs {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: Option<f64>,
    pub locate: bool,
    pub limit: usize,
}

/// One printed row of the nearby listing.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StoreLine {
    pub distance: String,
    pub name: String,
    pub address: String,
}

impl StoreLine {
    fn new(store: &StoreRow, distance_km: f64) -> Self {
        Self {
            distance: format_km(distance_km),
            name: store.name.clone(),
            address: store.address.clone().unwrap_or_default(),
        }
    }
}

fn source_label(source: ReferenceSource) -> &'static str {
    match source {
        ReferenceSource::Supplied => "supplied",
        ReferenceSource::Located => "located",
        ReferenceSource::Default => "default",
    }
}

async fn locate_or_default(config: &AppConfig) -> anyhow::Result<ReferencePoint> {
    let provider = ConfiguredProvider::from_app_config(config)?;
    let policy = AcquisitionPolicy::from_app_config(config);
    tracing::debug!(provider = provider.kind(), "acquiring reference point");

    let resolution = resolve_or_default(&provider, &policy, config.default_reference).await;
    if let Some(err) = &resolution.failure {
        eprintln!("{}", err.user_message());
    }
    Ok(resolution.reference)
}

pub(crate) async fn run_locate(config: &AppConfig) -> anyhow::Result<()> {
    let reference = locate_or_default(config).await?;
    println!(
        "{} ({})",
        reference.coordinate,
        source_label(reference.source)
    );
    Ok(())
}

pub(crate) fn validate_radius(radius_km: f64) -> anyhow::Result<f64> {
    if radius_km.is_finite() && radius_km >= 0.0 {
        Ok(radius_km)
    } else {
        anyhow::bail!("--radius-km must be a non-negative number, got {radius_km}")
    }
}

pub(crate) async fn resolve_reference(
    config: &AppConfig,
    args: &NearbyArgs,
) -> anyhow::Result<ReferencePoint> {
    match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => Ok(ReferencePoint {
            coordinate: Coordinate::new(lat, lng)?,
            source: ReferenceSource::Supplied,
        }),
        _ if args.locate => locate_or_default(config).await,
        _ => Ok(ReferencePoint::supplied_or(None, config.default_reference)),
    }
}

/// Render the listing as aligned columns: distance, name, address.
pub(crate) fn render_lines(lines: &[StoreLine]) -> String {
    let name_width = lines
        .iter()
        .map(|l| l.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("STORE".len());

    let mut out = format!("{:<10}{:<name_width$}  ADDRESS\n", "DISTANCE", "STORE");
    for line in lines {
        out.push_str(
            format!("{:<10}{:<name_width$}  {}", line.distance, line.name, line.address)
                .trim_end(),
        );
        out.push('\n');
    }
    out
}

pub(crate) async fn run_nearby(config: &AppConfig, args: &NearbyArgs) -> anyhow::Result<()> {
    let radius_km = validate_radius(args.radius_km.unwrap_or(config.default_radius_km))?;
    let reference = resolve_reference(config, args).await?;

    let pool = crate::db::connect(config).await?;
    let repo = pasaley_db::PgStoreRepository::new(pool);
    let stores = repo.list_active_stores().await?;

    let ranked = rank(reference.coordinate, &stores, radius_km);
    tracing::debug!(
        fetched = stores.len(),
        matched = ranked.len(),
        radius_km,
        "ranked nearby stores"
    );

    println!(
        "stores within {radius_km} km of {} ({})",
        reference.coordinate,
        source_label(reference.source)
    );

    if ranked.is_empty() {
        println!("no stores found; try a larger --radius-km or run `db seed`");
        return Ok(());
    }

    let lines: Vec<StoreLine> = ranked
        .iter()
        .take(args.limit)
        .map(|r| StoreLine::new(r.item, r.distance_km))
        .collect();
    print!("{}", render_lines(&lines));

    if ranked.len() > lines.len() {
        println!("... and {} more", ranked.len() - lines.len());
    }

    Ok(())
}

#[cfg(test)]
#[path = "nearby_test.rs"]
mod tests;

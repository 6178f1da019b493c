use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use geoatlas_lib::{
    classify, defaults_for, point_to_tile, resolve_coverage_capped, tile_to_bounds,
    ArcGisGeocoder, ArtifactAssembler, CategoryCache, GeoPoint, Geocoder, HttpCategorySource,
    LocationGranularity, MapStyle, RenderSpec, DEFAULT_MAX_COVERAGE_TILES,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Map tile math and static map rendering utilities")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the tile containing a coordinate at a zoom level.
    Tile {
        /// Latitude in decimal degrees.
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in decimal degrees.
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Zoom level (0-22).
        #[arg(long)]
        zoom: u8,
        /// Basemap style for the tile URL.
        #[arg(long, default_value = "navigation")]
        style: String,
    },
    /// Resolve the tile set covering a bounding box.
    Coverage {
        /// Western edge longitude (may exceed east across the antimeridian).
        #[arg(long, allow_negative_numbers = true)]
        west: f64,
        /// Southern edge latitude.
        #[arg(long, allow_negative_numbers = true)]
        south: f64,
        /// Eastern edge longitude.
        #[arg(long, allow_negative_numbers = true)]
        east: f64,
        /// Northern edge latitude.
        #[arg(long, allow_negative_numbers = true)]
        north: f64,
        /// Zoom level (0-22).
        #[arg(long)]
        zoom: u8,
        /// Maximum number of tiles to allow.
        #[arg(long, default_value_t = DEFAULT_MAX_COVERAGE_TILES)]
        max_tiles: usize,
    },
    /// Render a static map for a place name or coordinate pair.
    Render {
        /// Free-text place name to geocode.
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        location: Option<String>,
        /// Center latitude (requires --lon).
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Center longitude (requires --lat).
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
        /// Zoom level; defaults by location granularity.
        #[arg(long)]
        zoom: Option<i32>,
        /// Basemap style name; defaults by location granularity.
        #[arg(long)]
        style: Option<String>,
        /// Emit the full artifact bundle as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// List the supported basemap styles.
    Styles,
    /// List place categories, optionally filtered by level or parent.
    Categories {
        /// Exact hierarchy level (1 = roots).
        #[arg(long)]
        level: Option<u32>,
        /// Parent category id.
        #[arg(long)]
        parent: Option<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Tile {
            lat,
            lon,
            zoom,
            style,
        } => handle_tile(lat, lon, zoom, &style),
        Command::Coverage {
            west,
            south,
            east,
            north,
            zoom,
            max_tiles,
        } => handle_coverage(west, south, east, north, zoom, max_tiles),
        Command::Render {
            location,
            lat,
            lon,
            zoom,
            style,
            json,
        } => handle_render(location.as_deref(), lat, lon, zoom, style.as_deref(), json),
        Command::Styles => handle_styles(),
        Command::Categories { level, parent } => handle_categories(level, parent.as_deref()),
    }
}

fn handle_tile(lat: f64, lon: f64, zoom: u8, style: &str) -> Result<()> {
    let style = style.parse::<MapStyle>().context("invalid style")?;
    let point = GeoPoint::new(lat, lon).context("invalid coordinate")?;
    let tile = point_to_tile(point, zoom).context("failed to project coordinate")?;
    let bounds = tile_to_bounds(tile);

    println!("Tile: z={} x={} y={}", tile.z, tile.x, tile.y);
    println!(
        "Bounds: west={:.6} south={:.6} east={:.6} north={:.6}",
        bounds.west, bounds.south, bounds.east, bounds.north
    );
    println!("URL: {}", ArtifactAssembler::default().tile_url(style, tile));
    Ok(())
}

fn handle_coverage(
    west: f64,
    south: f64,
    east: f64,
    north: f64,
    zoom: u8,
    max_tiles: usize,
) -> Result<()> {
    let bbox = geoatlas_lib::BoundingBox::new(west, south, east, north)
        .context("invalid bounding box")?;
    let tiles =
        resolve_coverage_capped(bbox, zoom, max_tiles).context("failed to resolve coverage")?;

    println!("{} tiles at zoom {}", tiles.len(), zoom);
    for tile in tiles {
        println!("- z={} x={} y={}", tile.z, tile.x, tile.y);
    }
    Ok(())
}

fn handle_render(
    location: Option<&str>,
    lat: Option<f64>,
    lon: Option<f64>,
    zoom: Option<i32>,
    style: Option<&str>,
    json: bool,
) -> Result<()> {
    let style_override = style
        .map(|raw| raw.parse::<MapStyle>())
        .transpose()
        .context("invalid style")?;

    let (center, granularity, label, score) = match (lat, lon) {
        (Some(lat), Some(lon)) => {
            let point = GeoPoint::new(lat, lon).context("invalid coordinate")?;
            (point, LocationGranularity::Unknown, None, None)
        }
        _ => {
            let query = location
                .context("either --location or --lat/--lon is required")?
                .trim()
                .to_string();
            let geocoder = ArcGisGeocoder::new(api_key()).context("failed to build geocoder")?;
            let resolved = geocoder
                .geocode(&query)
                .context("geocoding request failed")?
                .with_context(|| format!("no geocoding results for '{query}'"))?;
            (
                resolved.point,
                classify(&resolved.location_type),
                Some(resolved.formatted_address),
                Some(resolved.score),
            )
        }
    };

    let defaults = defaults_for(granularity);
    let spec = RenderSpec {
        center,
        zoom: zoom.unwrap_or(defaults.zoom as i32),
        style: style_override.unwrap_or(defaults.style),
        label,
        score,
    };
    let bundle = ArtifactAssembler::default().assemble(&spec);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&bundle).context("failed to serialize bundle")?
        );
        return Ok(());
    }

    println!("{}", bundle.summary);
    if let Some(url) = bundle.tile_url {
        println!("Tile URL: {url}");
    }
    for (name, url) in bundle.provider_urls {
        println!("- {name}: {url}");
    }
    Ok(())
}

fn handle_styles() -> Result<()> {
    println!("{} supported styles:", MapStyle::ALL.len());
    for style in MapStyle::ALL {
        println!("- {} ({:?})", style, style.category());
    }
    Ok(())
}

fn handle_categories(level: Option<u32>, parent: Option<&str>) -> Result<()> {
    let source = HttpCategorySource::new(api_key()).context("failed to build category source")?;
    let cache = CategoryCache::new();
    cache.ensure_loaded(&source);
    if cache.is_degraded() {
        anyhow::bail!("category vocabulary could not be loaded");
    }

    let categories = cache.query(level, parent);
    println!("{} categories", categories.len());
    for category in categories {
        match category.parent_category_id {
            Some(parent_id) => println!(
                "- [{}] {} (level {}, parent {})",
                category.category_id, category.label, category.level, parent_id
            ),
            None => println!(
                "- [{}] {} (level {})",
                category.category_id, category.label, category.level
            ),
        }
    }
    Ok(())
}

fn api_key() -> Option<String> {
    std::env::var("ARCGIS_API_KEY").ok()
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

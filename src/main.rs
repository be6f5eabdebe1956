use clap::{Parser, Subcommand};
use photo_portfolio::file_type::FileCategory;
use photo_portfolio::filter::{self, FilterSpec};
use photo_portfolio::loader::{AutoSource, HttpSource, IndexLoader};
use photo_portfolio::preview::{Key, PreviewState};
use photo_portfolio::types::MetadataKey;
use photo_portfolio::{config, masonry, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photo-portfolio")]
#[command(about = "Browse a photo gallery described by a JSON Lines index")]
#[command(long_about = "\
Browse a photo gallery described by a JSON Lines index

The index has one JSON object per line:

  {\"name\":\"sunrise.jpg\",\"path\":\"photos/sunrise.jpg\",\"width\":6000,\"height\":4000,
   \"type\":\"image/jpeg\",\"lens\":\"XF23mmF2 R WR\",\"aperture\":2,\"iso\":160}

Recognized fields: name, path, size, date, capture_date, hash, type, extension,
thumbnail, width, height, plus the metadata fields orientation, lens, lens_make,
focal_length, focal_length_35mm, aperture, shutter_speed, iso,
exposure_compensation, flash, white_balance, metering_mode.

Blank lines are skipped. Lines that are not valid JSON, or that have neither a
path nor a thumbnail, are skipped with a warning on stderr. RUST_LOG replaces
the default 'photo_portfolio=info' filter; RUST_LOG=off silences logging.

The index locator is a local path or an http(s):// URL.

Run 'photo-portfolio gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show load statistics, file types and metadata facets
    Summary {
        /// Index path or URL
        locator: String,
    },
    /// List the photos matching a set of filters
    Filter {
        /// Index path or URL
        locator: String,
        /// Case-insensitive text matched against filename and metadata
        #[arg(long, default_value = "")]
        search: String,
        /// File type: image, raw, audio, video or other
        #[arg(long = "type")]
        category: Option<FileCategory>,
        /// Exact metadata constraint, e.g. --meta iso=400 (repeatable)
        #[arg(long = "meta", value_parser = parse_meta_constraint)]
        metadata: Vec<(MetadataKey, String)>,
        /// Print matches as JSON Lines instead of text
        #[arg(long)]
        json: bool,
    },
    /// Pack the photos into masonry columns
    Layout {
        /// Index path or URL
        locator: String,
        /// Container width in pixels
        #[arg(long)]
        width: f64,
        /// Column width in pixels (default: responsive, from config)
        #[arg(long)]
        column_width: Option<u32>,
        /// Gap in pixels (default: from config)
        #[arg(long)]
        gap: Option<u32>,
    },
    /// Open the preview on a photo and replay key presses
    Preview {
        /// Index path or URL
        locator: String,
        /// Position of the photo to open (0-based)
        #[arg(long, default_value_t = 0)]
        index: usize,
        /// Keys to replay: left, right, up, down, space, esc
        #[arg(long, value_delimiter = ',')]
        keys: Vec<String>,
        /// Touch movement to replay after the keys, as DX:DY pixels
        /// (e.g. --swipe=-80:5 goes forward). Repeatable.
        #[arg(long = "swipe", value_parser = parse_swipe, allow_hyphen_values = true)]
        swipes: Vec<(f64, f64)>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn parse_meta_constraint(s: &str) -> Result<(MetadataKey, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let key = key.trim().parse::<MetadataKey>().map_err(|e| e.to_string())?;
    Ok((key, value.to_string()))
}

fn parse_swipe(s: &str) -> Result<(f64, f64), String> {
    let (dx, dy) = s
        .split_once(':')
        .ok_or_else(|| format!("expected DX:DY, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| format!("invalid distance '{v}' in '{s}'"))
    };
    Ok((parse(dx)?, parse(dy)?))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("photo_portfolio=info")),
        )
        .init();

    let cli = Cli::parse();

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("photo-portfolio/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let mut loader = IndexLoader::new(AutoSource::new(HttpSource::new(client)));

    match cli.command {
        Command::Summary { locator } => {
            loader.load(&locator)?;
            output::print_lines(&output::format_summary(loader.photos(), &loader.stats()));
        }
        Command::Filter {
            locator,
            search,
            category,
            metadata,
            json,
        } => {
            let photos = loader.load(&locator)?;
            let spec = FilterSpec {
                search,
                metadata: metadata.into_iter().collect(),
                category,
            };
            let outcome = filter::filter(photos, &spec);
            if json {
                for photo in &outcome.photos {
                    println!("{}", serde_json::to_string(photo)?);
                }
            } else {
                output::print_lines(&output::format_filter(&outcome, photos.len(), &spec));
            }
        }
        Command::Layout {
            locator,
            width,
            column_width,
            gap,
        } => {
            let site_config = config::load_config(&cli.config)?;
            let photos = loader.load(&locator)?;
            let column_width =
                column_width.unwrap_or_else(|| site_config.layout.column_width_for(width));
            let gap = gap.unwrap_or(site_config.layout.gap);
            let layout = masonry::layout(photos, column_width, width, gap);
            output::print_lines(&output::format_layout(&layout));
        }
        Command::Preview {
            locator,
            index,
            keys,
            swipes,
        } => {
            let site_config = config::load_config(&cli.config)?;
            let photos = loader.load(&locator)?;
            if index >= photos.len() {
                return Err(format!(
                    "index {index} is out of range: the gallery has {} photos",
                    photos.len()
                )
                .into());
            }
            let mut preview = PreviewState::new();
            preview.open(photos.to_vec(), index);
            for name in &keys {
                preview.handle_key(Key::from_name(name));
            }
            let mut tracker = site_config.preview.swipe_tracker();
            for (dx, dy) in swipes {
                tracker.touch_start(0.0, 0.0);
                if let Some(swipe) = tracker.touch_end(dx, dy) {
                    preview.handle_swipe(swipe);
                }
            }
            output::print_lines(&output::format_preview(&preview, &site_config));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

//! AT Planner CLI
//!
//! Usage:
//!   at-planner [OPTIONS] <COMMAND>
//!
//! Options:
//!   -c, --config <FILE>  Configuration file (TOML format)
//!   -s, --state <FILE>   State file holding candidates and selection
//!   -h, --help           Print help
//!
//! Positions taken by `remove` and `move` are 1-based, as numbered on the map.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use at_planner::services::{search_titles, AnitabiClient, BangumiClient, SearchBox};
use at_planner::{
    export_svg, to_data_uri, ClearPolicy, ExportConfig, FileStore, Language, LegendPosition,
    Planner, PlannerConfig, PlannerError, PointId, SvgSurfaceFactory,
};

/// Environment variable holding the log filter
const LOG_ENV: &str = "AT_PLANNER_LOG";

#[derive(Parser)]
#[command(name = "at-planner")]
#[command(about = "Plan anime pilgrimage itineraries on a map")]
struct Cli {
    /// Configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// State file holding candidates and selection
    #[arg(short, long)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search titles by keyword
    Search {
        #[arg(required = true)]
        keyword: Vec<String>,
    },
    /// Fetch the points of a title and show them as candidates
    Fetch {
        title_id: u64,
        /// Title name used to label the points
        #[arg(long)]
        title: Option<String>,
    },
    /// Add a candidate to the end of the itinerary
    Add { id: String },
    /// Move an itinerary entry back to the candidates
    Remove { position: usize },
    /// Move an itinerary entry to another position
    Move { from: usize, to: usize },
    /// Empty the itinerary
    Clear {
        /// Return the entries to the candidates instead of dropping them
        #[arg(long)]
        recycle: bool,
    },
    /// Hide the candidates
    Hide,
    /// Show the hidden candidates again
    Unhide,
    /// Print the itinerary and candidates
    List,
    /// Render the map as SVG
    Render {
        #[command(flatten)]
        view: ViewArgs,
        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export the map with the itinerary listing as SVG
    Export {
        #[command(flatten)]
        view: ViewArgs,
        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Leave out the itinerary listing
        #[arg(long)]
        no_listing: bool,
        /// Print a base64 data URI instead of the document
        #[arg(long)]
        data_uri: bool,
    },
}

#[derive(Args)]
struct ViewArgs {
    /// Label language (zh-Hans or ja)
    #[arg(long)]
    lang: Option<Language>,

    /// Base map style identifier
    #[arg(long)]
    style: Option<String>,

    /// Legend position (top-left, bottom-left, top-right, bottom-right, hidden)
    #[arg(long)]
    legend: Option<LegendPosition>,
}

impl ViewArgs {
    fn apply(&self, mut config: PlannerConfig) -> PlannerConfig {
        if let Some(lang) = self.lang {
            config = config.with_language(lang);
        }
        if let Some(style) = &self.style {
            config = config.with_style(style.clone());
        }
        if let Some(legend) = self.legend {
            config = config.with_legend_position(legend);
        }
        config
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut config = match &cli.config {
        Some(path) => load_config(path),
        None => PlannerConfig::default(),
    };
    if let Some(state) = &cli.state {
        config = config.with_state_path(state.clone());
    }

    if let Err(e) = run(cli.command, config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: &Path) -> PlannerConfig {
    let source = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading config '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    };
    match PlannerConfig::from_str(&source) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format(&source, &path.display().to_string()));
            std::process::exit(1);
        }
    }
}

fn open_planner(config: &PlannerConfig) -> Result<Planner<SvgSurfaceFactory>, PlannerError> {
    let factory = SvgSurfaceFactory::new(config.svg_config());
    let store = FileStore::open(config.store.path.clone());
    Planner::open(factory, config.map_config(), store)
}

/// Convert a 1-based position from the command line
fn position(position: usize, len: usize) -> Result<usize, PlannerError> {
    if position == 0 || position > len {
        return Err(PlannerError::InvalidPosition { position, len });
    }
    Ok(position - 1)
}

fn run(command: Command, config: PlannerConfig) -> Result<(), PlannerError> {
    let now = Instant::now();
    match command {
        Command::Search { keyword } => {
            let client = BangumiClient::new(&config.services.search_url, config.timeout())?;
            let mut search = SearchBox::new(config.debounce());
            search.on_input(keyword.join(" "), now);
            let Some(request) = search.submit() else {
                return Ok(());
            };
            let hits = search_titles(&client, &request.keyword);
            if search.accepts(&request) {
                for hit in hits {
                    println!("{}\t{}", hit.id, hit.display_name());
                }
            }
        }
        Command::Fetch { title_id, title } => {
            let client = AnitabiClient::new(&config.services.points_url, config.timeout())?;
            let mut planner = open_planner(&config)?;
            let report = planner.fetch_title(&client, title_id, title.as_deref(), now)?;
            println!("{} candidate points loaded", report.candidate_markers);
        }
        Command::Add { id } => {
            let mut planner = open_planner(&config)?;
            planner.promote(&PointId::new(id), now)?;
            print_listing(&planner);
        }
        Command::Remove { position: pos } => {
            let mut planner = open_planner(&config)?;
            let index = position(pos, planner.itinerary().selection().len())?;
            planner.demote(index, now)?;
            print_listing(&planner);
        }
        Command::Move { from, to } => {
            let mut planner = open_planner(&config)?;
            let len = planner.itinerary().selection().len();
            let (from, to) = (position(from, len)?, position(to, len)?);
            planner.reorder(from, to, now)?;
            print_listing(&planner);
        }
        Command::Clear { recycle } => {
            let policy = if recycle {
                ClearPolicy::Recycle
            } else {
                ClearPolicy::Discard
            };
            let mut planner = open_planner(&config)?;
            planner.clear(policy, now)?;
            print_listing(&planner);
        }
        Command::Hide => {
            let mut planner = open_planner(&config)?;
            planner.hide(now)?;
            print_listing(&planner);
        }
        Command::Unhide => {
            let mut planner = open_planner(&config)?;
            planner.unhide(now)?;
            print_listing(&planner);
        }
        Command::List => {
            let planner = open_planner(&config)?;
            print_listing(&planner);
        }
        Command::Render { view, output } => {
            let config = view.apply(config);
            let mut planner = open_planner(&config)?;
            planner.refresh(now);
            write_output(output.as_deref(), &planner.surface().render())?;
        }
        Command::Export {
            view,
            output,
            no_listing,
            data_uri,
        } => {
            let config = view.apply(config);
            let mut planner = open_planner(&config)?;
            planner.refresh(now);
            let export = ExportConfig::new().with_listing(!no_listing);
            let svg = export_svg(planner.surface(), planner.itinerary().selection(), &export);
            if data_uri {
                write_output(output.as_deref(), &to_data_uri(&svg))?;
            } else {
                write_output(output.as_deref(), &svg)?;
            }
        }
    }
    Ok(())
}

fn print_listing(planner: &Planner<SvgSurfaceFactory>) {
    let itinerary = planner.itinerary();
    println!("Itinerary:");
    if itinerary.selection().is_empty() {
        println!("  (empty)");
    }
    for (i, point) in itinerary.selection().iter().enumerate() {
        println!("  {}. {}", i + 1, point.summary());
    }
    println!("Candidates:");
    for point in itinerary.candidates() {
        println!("  [{}] {}", point.id(), point.summary());
    }
    if let Some(hidden) = itinerary.hidden() {
        println!("  ({} hidden)", hidden.len());
    }
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), PlannerError> {
    match path {
        Some(path) => {
            fs::write(path, content)?;
            debug!(path = %path.display(), bytes = content.len(), "output written");
        }
        None => println!("{}", content),
    }
    Ok(())
}

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::audio::RodioMedia;
use crate::config::{self, LoggingSettings};
use crate::dom::{Location, Storage, Window};
use crate::fetch::{SiteFetcher, SiteRoot};
use crate::site::Site;

mod event_loop;
pub mod page;
mod settings;

pub use event_loop::EventLoopState;
use page::PageKind;

/// Terminal preview of the Ana Fonell website.
#[derive(Debug, Parser)]
#[command(name = "fonell", version, about)]
struct Args {
    /// Config file; overrides `FONELL_CONFIG_PATH` and the XDG default.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Site root: a local checkout or an `http(s)://` origin.
    #[arg(long)]
    root: Option<String>,
    /// Page to preview.
    #[arg(long, value_enum, default_value_t = PageKind::Home)]
    page: PageKind,
    /// Page URL, e.g. `https://anafonell.de/?lang=es`.
    #[arg(long)]
    url: Option<String>,
}

/// Install the file logger. stdout belongs to the TUI.
fn init_logging(logging: &LoggingSettings) -> anyhow::Result<()> {
    let path = match logging.file.as_ref().map(PathBuf::from).or_else(config::default_log_path) {
        Some(path) => path,
        None => return Ok(()),
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating log directory {}", dir.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    // Audio parsing libraries are chatty about malformed tags.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},symphonia=error,symphonia_core=error,symphonia_bundle_mp3=error,lofty=error",
            logging.level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing logger: {e}"))
}

pub fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let (mut settings, note) = settings::load_settings(args.config);
    if let Some(root) = args.root {
        settings.site.root = root;
    }
    if let Some(url) = args.url {
        settings.site.page_url = url;
    }
    init_logging(&settings.logging)?;
    settings::report(note);
    info!(root = %settings.site.root, page = ?args.page, "starting preview");

    let page_url = Url::parse(&settings.site.page_url)
        .with_context(|| format!("invalid page URL {:?}", settings.site.page_url))?;
    let root = SiteRoot::parse(&settings.site.root)?;
    let local_root = match &root {
        SiteRoot::Dir(dir) => Some(dir.clone()),
        SiteRoot::Http(_) => None,
    };

    let document = page::build(args.page, &settings.site);
    let storage = config::default_storage_path()
        .map(|path| Storage::open(&path))
        .unwrap_or_else(Storage::in_memory);
    let mut window = Window::new(document, Location::from_url(page_url.clone()), storage);
    let (columns, rows) = terminal::size()?;
    window.viewport.width = f64::from(columns) * event_loop::PX_PER_COLUMN;
    window.viewport.height = f64::from(rows) * event_loop::PX_PER_ROW;

    let fetcher = SiteFetcher::new(root, page_url.clone())?;
    let media = RodioMedia::new(local_root.clone(), page_url);
    let gallery_dir = settings.site.gallery_dir.clone();
    let mut site = Site::new(window, settings, fetcher, media);
    if let Some(dir) = &local_root {
        let images = page::scan_gallery(dir, &gallery_dir);
        site.populate_gallery(&images);
    }
    async_io::block_on(site.start());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = EventLoopState::default();
    let run_result = event_loop::run(&mut terminal, &mut site, &mut state);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

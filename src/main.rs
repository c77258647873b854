//! CodeScent - code smells in your terminal
//!
//! A terminal client for the CodeScent analysis service: sign in, upload a
//! zipped project, browse projects and dashboard statistics, and read each
//! file with the detected smells highlighted in place.

mod api;
mod app;
mod build_info;
mod config;
mod dashboard;
mod debounce;
mod forms;
mod logging;
mod search;
mod session;
mod ui;
mod util;
mod viewer;

use anyhow::{bail, Context, Result};
use app::messages::BackgroundMessage;
use app::RuntimeContext;
use clap::Parser;
use config::Config;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use session::{KeyringStore, Session};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;
use ui::App;
use util::truncate;

#[derive(Parser, Debug)]
#[command(
    name = "codescent",
    about = "Browse code smells detected by the CodeScent service",
    long_about = "C O D E S C E N T\n\n\
                  Upload a zipped project, then read every file with its\n\
                  detected code smells highlighted by severity.\n\n\
                  Run without flags to open the terminal UI.",
    version
)]
struct Args {
    /// Base URL of the CodeScent API (overrides config and CODESCENT_API_URL)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Print dashboard statistics and exit (no TUI)
    #[arg(long)]
    stats: bool,

    /// Print the project list and exit
    #[arg(long)]
    list: bool,

    /// Only list projects whose title or description contains this text
    #[arg(long, value_name = "QUERY", requires = "list")]
    search: Option<String>,

    /// Create a project from a .zip archive and print its report route
    #[arg(long, value_name = "ZIP")]
    upload: Option<PathBuf>,

    /// Project name for --upload
    #[arg(long)]
    name: Option<String>,

    /// Project description for --upload
    #[arg(long)]
    description: Option<String>,

    /// Member user id for --upload (repeatable)
    #[arg(long = "member", value_name = "ID")]
    members: Vec<String>,

    /// Write the resolved settings (including --api-url) to the config file and exit
    #[arg(long)]
    save_config: bool,

    /// Forget the stored session and exit
    #[arg(long)]
    logout: bool,

    /// Print build metadata and exit
    #[arg(long)]
    build_info: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.build_info {
        build_info::print_build_info();
        return Ok(());
    }

    let log_file = match logging::init() {
        Ok(path) => Some(path),
        Err(e) => {
            eprintln!("  Logging disabled: {:#}", e);
            None
        }
    };

    let config = Config::load().resolve(args.api_url.as_deref());
    log::info!("using API at {}", config.api_base_url);

    if args.save_config {
        config.save()?;
        if let Some(path) = Config::config_path() {
            println!("  Saved {}", path.display());
        }
        return Ok(());
    }

    let client = api::ApiClient::new(&config.api_base_url)
        .with_context(|| format!("Bad API URL {}", config.api_base_url))?;

    let mut session = Session::restore(client, Box::new(KeyringStore::new())).await;

    if args.logout {
        session.logout().await;
        println!("  Signed out.");
        return Ok(());
    }

    if args.stats {
        return print_stats(&session).await;
    }

    if args.list {
        return print_projects(&session, args.search.as_deref()).await;
    }

    if let Some(archive) = args.upload {
        let form = forms::UploadForm {
            name: args.name.unwrap_or_default(),
            description: args.description.unwrap_or_default(),
            archive: archive.display().to_string(),
            ..Default::default()
        };
        return upload_project(&session, form, args.members).await;
    }

    run_tui(session, config).await?;
    if let Some(path) = log_file {
        log::info!("exiting; log at {}", path.display());
    }
    Ok(())
}

fn require_session(session: &Session) -> Result<()> {
    if !session.is_authenticated() {
        bail!("Not signed in. Run `codescent` and sign in first.");
    }
    Ok(())
}

/// Print dashboard statistics and exit
async fn print_stats(session: &Session) -> Result<()> {
    require_session(session)?;
    let client = session.client();
    let (stats, recent) = futures::join!(client.dashboard_stats(), client.recent_projects());
    let (data, failed) = match stats {
        Ok(data) => (data, false),
        Err(e) => {
            log::warn!("{}", e);
            (dashboard::fallback_data(), true)
        }
    };

    let tier = dashboard::QualityTier::from_score(data.code_quality);
    println!();
    println!("  C O D E S C E N T   stats");
    println!();
    if failed {
        println!("  ! {}", dashboard::LOAD_FAILED);
        println!();
    }
    println!(
        "  Total smells:  {:>8}   ({})",
        data.total_smells,
        dashboard::severity_label(data.total_smells)
    );
    println!("  Projects:      {:>8}", data.total_projects);
    println!(
        "  Code quality:  {:>7}%   ({})",
        dashboard::format_quality(data.code_quality),
        tier.label()
    );
    println!();

    let slices = dashboard::chart_slices(&data.chart_data);
    let percents = dashboard::slice_percentages(&slices);
    for (slice, pct) in slices.iter().zip(percents) {
        println!(
            "    {:<24} {:>6}  {:>5.1}%",
            truncate(&slice.category, 24),
            slice.value,
            pct
        );
    }
    println!();

    match recent {
        Ok(recent) if !recent.is_empty() => {
            println!("  Recent projects");
            for project in recent {
                println!("    {}  {}", project.id, truncate(&project.title, 40));
            }
            println!();
        }
        Ok(_) => {}
        Err(e) => log::warn!("{}: {}", app::background::RECENT_FAILED, e),
    }
    Ok(())
}

/// Print the (optionally filtered) project list and exit
async fn print_projects(session: &Session, query: Option<&str>) -> Result<()> {
    require_session(session)?;
    let projects = session
        .client()
        .projects()
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message(app::background::PROJECTS_FAILED)))?;
    let matching = search::filter_projects(&projects, query.unwrap_or(""));

    if matching.is_empty() {
        println!("  No projects found.");
        return Ok(());
    }
    for project in matching {
        println!(
            "  {}  {:<40} {:>5} smells  {}",
            project.id,
            truncate(&project.title, 40),
            project.total_smells,
            util::format_date(&project.last_updated)
        );
    }
    Ok(())
}

/// Create a project without the TUI and print its report route
async fn upload_project(session: &Session, form: forms::UploadForm, members: Vec<String>) -> Result<()> {
    require_session(session)?;
    let mut request = match form.to_request() {
        Ok(request) => request,
        Err(errors) => {
            for (_, message) in errors.iter() {
                eprintln!("  {}", message);
            }
            bail!("Invalid project");
        }
    };
    for id in members {
        if !request.member_ids.contains(&id) {
            request.member_ids.push(id);
        }
    }

    eprintln!("  Uploading {}...", request.archive.display());
    let id = session
        .client()
        .create_project(&request)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message(forms::UPLOAD_FAILED)))?;
    println!("/report/{}", id);
    Ok(())
}

/// Run the TUI application with background requests
async fn run_tui(session: Session, config: Config) -> Result<()> {
    let (tx, rx) = mpsc::channel::<BackgroundMessage>();
    let mut ctx = RuntimeContext::new(tx, config);
    let mut app = App::new(session);
    if app.session.is_authenticated() {
        app::load_recent(&mut app, &ctx);
        app::navigate(&mut app, &mut ctx, ui::Screen::Dashboard);
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &mut ctx, rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Main event loop with background message handling
fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    ctx: &mut RuntimeContext,
    rx: mpsc::Receiver<BackgroundMessage>,
) -> Result<()> {
    loop {
        app.clear_expired_toast();
        app.tick = app.tick.wrapping_add(1);

        while let Ok(msg) = rx.try_recv() {
            app::apply_message(app, ctx, msg);
        }

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Err(e) = app::input::handle_key(app, key, ctx) {
                    log::error!("{:#}", e);
                    app.show_toast(&e.to_string());
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

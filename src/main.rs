// Entry point and high-level CLI flow.
//
// - With --view, log in from the flags, render that view (optionally
//   exporting it) and exit.
// - Otherwise prompt for a login and run a numbered menu: pick a view,
//   change the location filters, log out or exit.
mod access;
mod cli;
mod config;
mod engine;
mod error;
mod filter;
mod hierarchy;
mod loader;
mod output;
mod reports;
mod repository;
mod sample;
mod types;
mod util;

use access::{login, Role, Session, View};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use cli::Args;
use config::Config;
use filter::{FilterSelection, Level};
use output::ExportFormat;
use repository::{Dataset, PerformanceRepository};
use serde::Serialize;
use std::borrow::Cow;
use std::io::{self, Write};
use std::path::PathBuf;
use tabled::Tabled;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use types::Interruption;

/// Everything a view needs besides the session.
struct AppContext<'a> {
    data: &'a Dataset,
    config: &'a Config,
    period: (Option<NaiveDate>, Option<NaiveDate>),
}

/// Where rendered tables go: the console, an export directory, or both.
struct Presenter {
    preview_rows: Option<usize>,
    export: Option<(ExportFormat, PathBuf)>,
    written: Vec<PathBuf>,
}

impl Presenter {
    fn emit<T>(&mut self, title: &str, note: Option<&str>, rows: &[T], stem: &str) -> Result<()>
    where
        T: Tabled + Serialize + Clone,
    {
        if let Some(max) = self.preview_rows {
            output::preview_table(title, note, rows, max);
        }
        if let Some((format, ref dir)) = self.export {
            let path = output::export_report(format, title, rows, dir, stem)
                .with_context(|| format!("Failed to export {}", title))?;
            self.written.push(path);
        }
        Ok(())
    }
}

/// Read one trimmed line after printing `prompt`; `None` on end of input.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn read_choice() -> Option<String> {
    read_line("Enter choice: ")
}

fn prompt_yes_no(question: &str) -> bool {
    loop {
        let Some(resp) = read_line(&format!("{} (Y/N): ", question)) else {
            return false;
        };
        match resp.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if args.init_config {
        return handle_init_config();
    }

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    init_logging(&args, &config)?;

    info!("reliability_report v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(&args, &config) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::DEFAULT_CONFIG_FILE);
    if path.exists() {
        eprintln!("{} already exists. Remove it first or edit it manually.", path.display());
        std::process::exit(1);
    }
    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Created {} with default settings.", path.display());
    Ok(())
}

fn init_logging(args: &Args, config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_directive(config.general.verbose)));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")
}

fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref path) = args.config {
        return Config::load(path).with_context(|| format!("Failed to load config {}", path.display()));
    }
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("Warning: ignoring {}: {}", config::DEFAULT_CONFIG_FILE, e);
            Ok(Config::default())
        }
    }
}

fn load_dataset(config: &Config) -> Result<Cow<'static, Dataset>> {
    match config.data_dir() {
        Some(dir) => {
            let (data, report) = loader::load_dir(&dir)
                .with_context(|| format!("Failed to load data from {}", dir.display()))?;
            println!(
                "Loaded {} rows from {} ({} skipped due to parse errors)",
                util::format_int(report.total_rows - report.parse_errors),
                dir.display(),
                util::format_int(report.parse_errors)
            );
            Ok(Cow::Owned(data))
        }
        None => {
            debug!("using built-in sample dataset");
            Ok(Cow::Borrowed(sample::dataset()))
        }
    }
}

fn parse_period(config: &Config) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
    let start = config.report.period_start.as_deref().map(util::parse_date).transpose()?;
    let end = config.report.period_end.as_deref().map(util::parse_date).transpose()?;
    Ok((start, end))
}

/// Run one-shot or interactive. Returns the exit code.
fn run(args: &Args, config: &Config) -> Result<i32> {
    let data = load_dataset(config)?;
    let ctx = AppContext {
        data: &data,
        config,
        period: parse_period(config)?,
    };

    match args.view {
        Some(view) => run_once(&ctx, args, view),
        None => {
            run_interactive(&ctx, args)?;
            Ok(0)
        }
    }
}

fn run_once(ctx: &AppContext, args: &Args, view: View) -> Result<i32> {
    let role = args.role.map(|r| r.id()).unwrap_or_default();
    let mut session = login(
        args.username.as_deref().unwrap_or_default(),
        args.password.as_deref().unwrap_or_default(),
        role,
    )?;
    session.selection = args.selection();
    session.require(view)?;
    println!("Filters: {}", describe_selection(ctx.data, &session.selection));

    let export = args.export.map(|f| (f, ctx.config.output_dir()));
    let mut presenter = Presenter {
        preview_rows: Some(ctx.config.general.preview_rows),
        export,
        written: Vec::new(),
    };
    show_view(ctx, &session.selection, view, &mut presenter)?;
    report_written(&presenter);
    Ok(0)
}

fn report_written(presenter: &Presenter) {
    for path in &presenter.written {
        println!("(Exported to {})", path.display());
    }
}

fn prompt_login(args: &Args) -> Option<Session> {
    println!("Login (press Ctrl-D to exit)");
    println!(
        "Roles: {}",
        Role::ALL.iter().map(|r| r.id()).collect::<Vec<_>>().join(", ")
    );
    loop {
        let username = match args.username {
            Some(ref u) => u.clone(),
            None => read_line("Username: ")?,
        };
        let password = match args.password {
            Some(ref p) => p.clone(),
            None => read_line("Password: ")?,
        };
        let role = match args.role {
            Some(r) => r.id().to_string(),
            None => read_line("Role: ")?,
        };
        match login(&username, &password, &role) {
            Ok(session) => return Some(session),
            // Stay on the login prompt; flags that were given cannot change.
            Err(_) if args.username.is_some() && args.password.is_some() && args.role.is_some() => {
                return None
            }
            Err(_) => continue,
        }
    }
}

fn run_interactive(ctx: &AppContext, args: &Args) -> Result<()> {
    let mut login_args = args.clone();
    while let Some(mut session) = prompt_login(&login_args) {
        session.selection = login_args.selection();
        println!(
            "\nWelcome {} ({} - {})\n",
            session.username,
            session.role.name(),
            session.role.access()
        );
        if !menu_loop(ctx, &mut session)? {
            println!("Exiting the program.");
            return Ok(());
        }
        let _ = session.logout();
        println!("Logged out.\n");
        // Later logins are typed in, with the default filter.
        login_args = Args {
            username: None,
            password: None,
            role: None,
            region: None,
            circle: None,
            division: None,
            sub_division: None,
            section: None,
            ..login_args
        };
    }
    Ok(())
}

/// Returns `true` on logout, `false` on exit.
fn menu_loop(ctx: &AppContext, session: &mut Session) -> Result<bool> {
    loop {
        println!("Filters: {}", describe_selection(ctx.data, &session.selection));
        println!("Select View:");
        for (idx, view) in View::ALL.iter().enumerate() {
            let lock = if session.can_open(*view) { "" } else { " (restricted)" };
            println!("[{}] {}{}", idx + 1, view.title(), lock);
        }
        println!("[7] Change Filters");
        println!("[8] Logout");
        println!("[9] Exit\n");

        let Some(choice) = read_choice() else {
            return Ok(false);
        };
        match choice.as_str() {
            "7" => change_filters(ctx.data, &mut session.selection),
            "8" => return Ok(true),
            "9" => return Ok(false),
            c => match c.parse::<usize>().ok().and_then(|n| View::ALL.get(n.wrapping_sub(1))) {
                Some(view) => open_view(ctx, session, *view)?,
                None => println!("Invalid choice. Please enter 1 to 9.\n"),
            },
        }
    }
}

fn open_view(ctx: &AppContext, session: &Session, view: View) -> Result<()> {
    if let Err(e) = session.require(view) {
        println!("{}\n", e);
        return Ok(());
    }
    let mut presenter = Presenter {
        preview_rows: Some(ctx.config.general.preview_rows),
        export: None,
        written: Vec::new(),
    };
    show_view(ctx, &session.selection, view, &mut presenter)?;

    if prompt_yes_no("Export this view") {
        let format: ExportFormat = ctx.config.report.export_format.parse()?;
        let mut exporter = Presenter {
            preview_rows: None,
            export: Some((format, ctx.config.output_dir())),
            written: Vec::new(),
        };
        show_view(ctx, &session.selection, view, &mut exporter)?;
        report_written(&exporter);
    }
    println!();
    Ok(())
}

fn describe_selection(data: &Dataset, selection: &FilterSelection) -> String {
    Level::ALL
        .iter()
        .map(|level| {
            let shown = match selection.get(*level).as_id() {
                None => "all".to_string(),
                Some(id) => match hierarchy::name_of(data, *level, id) {
                    Some(name) => name.to_string(),
                    None => {
                        warn!("unknown {} id '{}'", level.label(), id);
                        format!("{} (unknown)", id)
                    }
                },
            };
            format!("{}={}", level.label(), shown)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn change_filters(data: &Dataset, selection: &mut FilterSelection) {
    println!("\nChange filter:");
    for (idx, level) in Level::ALL.iter().enumerate() {
        println!("[{}] {} (currently {})", idx + 1, level.label(), selection.get(*level));
    }
    println!("[6] Reset all filters");
    println!("(number or level name)\n");

    let Some(choice) = read_choice() else { return };
    let level = match choice.as_str() {
        "6" => {
            selection.reset();
            println!("Filters reset.\n");
            return;
        }
        c => match c.parse::<usize>() {
            Ok(n) => match Level::ALL.get(n.wrapping_sub(1)) {
                Some(level) => *level,
                None => {
                    println!("Invalid choice.\n");
                    return;
                }
            },
            // A level name works too, e.g. "division".
            Err(_) => match c.parse::<Level>() {
                Ok(level) => level,
                Err(e) => {
                    println!("Invalid choice: {}\n", e);
                    return;
                }
            },
        },
    };

    let options = hierarchy::options_for(data, selection, level);
    println!("\n{} options:", level.label());
    println!("[0] All");
    for (idx, (id, name)) in options.iter().enumerate() {
        println!("[{}] {} ({})", idx + 1, name, id);
    }
    let Some(choice) = read_choice() else { return };
    match choice.parse::<usize>() {
        Ok(0) => selection.set(level, filter::Scope::All),
        Ok(n) if n <= options.len() => selection.set(level, options[n - 1].0),
        _ => {
            println!("Invalid choice.\n");
            return;
        }
    }
    info!("filter changed: {}", selection);
    println!();
}

fn show_view(ctx: &AppContext, selection: &FilterSelection, view: View, out: &mut Presenter) -> Result<()> {
    let data = ctx.data;
    println!("\n== {} ==", view.title());
    match view {
        View::Dashboard => {
            let feeders = engine::resolve_feeders(data, data, selection);
            let indices = engine::compute_indices(&feeders);
            out.emit(
                "Reliability Indices",
                Some("consumer-weighted; MAIFI and CAIFI are estimates"),
                &reports::index_rows(&indices),
                "dashboard_indices",
            )?;
            let summary = engine::summarize(data, data, selection);
            out.emit("Selection Summary", None, &reports::summary_rows(&summary), "dashboard_summary")?;
            let critical = engine::critical_feeders(&feeders, ctx.config.report.critical_top_n);
            out.emit(
                "Critical Feeders - Highest SAIDI",
                None,
                &reports::critical_feeder_rows(&critical),
                "dashboard_critical_feeders",
            )?;
            out.emit(
                "SAIDI/SAIFI Trend",
                None,
                &reports::trend_rows(data.trends()),
                "dashboard_trend",
            )?;
            let sections = hierarchy::eligible_sections(data, selection);
            out.emit(
                "Sections by Area Type",
                None,
                &reports::area_rows(&engine::area_distribution(&sections)),
                "dashboard_area",
            )?;
        }
        View::Feeders => {
            let feeders = engine::resolve_feeders(data, data, selection);
            out.emit(
                "Feeder Performance Ranking",
                Some("lowest SAIDI first"),
                &reports::feeder_ranking(data, data, &feeders),
                "feeder_ranking",
            )?;
        }
        View::Dtr => {
            let dtrs = engine::dtrs_for(data, data, selection);
            out.emit("DTR Performance", None, &reports::dtr_rows(data, &dtrs), "dtr_analysis")?;
        }
        View::Interruptions => {
            let in_scope = engine::interruptions_for(data, data, selection);
            let (start, end) = ctx.period;
            let shown: Vec<&Interruption> = engine::filter_interruptions_by_date_range(
                in_scope,
                start.unwrap_or(NaiveDate::MIN),
                end.unwrap_or(NaiveDate::MAX),
            );
            let note = match ctx.period {
                (None, None) => None,
                (s, e) => Some(format!(
                    "{} to {}",
                    s.map_or("start".to_string(), |d| d.to_string()),
                    e.map_or("end".to_string(), |d| d.to_string())
                )),
            };
            let summary = engine::interruption_summary(&shown);
            out.emit(
                "Interruption Summary",
                note.as_deref(),
                &reports::interruption_summary_rows(&summary),
                "interruption_summary",
            )?;
            out.emit(
                "Interruption Details",
                None,
                &reports::interruption_rows(data, &shown),
                "interruption_log",
            )?;
        }
        View::Quarterly => {
            out.emit(
                "Quarterly Reliability Indices - 2024",
                Some("Report period January 2024 - December 2024"),
                &reports::quarterly_report(data, data.quarterly(), selection),
                "quarterly_report",
            )?;
        }
        View::Reports => {
            out.emit(
                "Regulatory Reports",
                None,
                &reports::catalog_rows(data.report_catalog()),
                "report_catalog",
            )?;
        }
    }
    Ok(())
}

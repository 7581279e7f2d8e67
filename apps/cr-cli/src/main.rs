mod terminal;

use clap::{Parser, Subcommand};
use cr_app::{
    AppConfig, AppResult, DirectorySink, KNOWN_MODELS, Session, SimulationClient,
    SimulationRequest,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use terminal::TerminalView;

#[derive(Parser)]
#[command(name = "cellrun")]
#[command(about = "cellrun - battery simulation runs with local history", long_about = None)]
struct Cli {
    /// Config file (defaults to ./cellrun.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Simulation service base URL
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Directory holding the run history
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation and save it to history
    Run {
        /// Battery model (e.g. SPM, Thevenin)
        #[arg(long, default_value = "SPM")]
        model: String,
        /// Discharge C-rate
        #[arg(long, default_value_t = 1.0)]
        c_rate: f64,
        /// Duration in hours
        #[arg(long, default_value_t = 1.0)]
        t_hours: f64,
        /// Initial state of charge (0..1)
        #[arg(long, default_value_t = 1.0)]
        init_soc: f64,
        /// Also export the result JSON to this path
        #[arg(long)]
        export: Option<PathBuf>,
        /// Also save the plot image to this path
        #[arg(long)]
        plot_out: Option<PathBuf>,
    },
    /// List saved runs, newest first
    History,
    /// Show a saved run without re-running it
    Show {
        /// Position in the history list (1 = newest)
        entry: usize,
        /// Save the run's plot image to this path
        #[arg(long)]
        plot_out: Option<PathBuf>,
    },
    /// Export a saved run's result as pretty-printed JSON
    Export {
        /// Position in the history list (1 = newest)
        #[arg(long, default_value_t = 1)]
        entry: usize,
        /// Output file path (defaults to the configured export file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete all saved runs
    Clear,
    /// Check that the simulation service is reachable
    Health,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    tracing::debug!(
        endpoint = %config.endpoint,
        data_dir = %config.data_dir.display(),
        "resolved configuration"
    );

    match cli.command {
        Commands::Run {
            model,
            c_rate,
            t_hours,
            init_soc,
            export,
            plot_out,
        } => {
            let request = SimulationRequest {
                model,
                c_rate,
                t_hours,
                init_soc,
            };
            cmd_run(&config, &request, export.as_deref(), plot_out.as_deref())
        }
        Commands::History => cmd_history(&config),
        Commands::Show { entry, plot_out } => cmd_show(&config, entry, plot_out.as_deref()),
        Commands::Export { entry, output } => cmd_export(&config, entry, output.as_deref()),
        Commands::Clear => cmd_clear(&config),
        Commands::Health => cmd_health(&config),
    }
}

fn open_session(config: &AppConfig) -> AppResult<Session> {
    Ok(Session::new(config.open_store()?))
}

fn cmd_run(
    config: &AppConfig,
    request: &SimulationRequest,
    export: Option<&Path>,
    plot_out: Option<&Path>,
) -> AppResult<()> {
    if !KNOWN_MODELS
        .iter()
        .any(|m| m.eq_ignore_ascii_case(&request.model))
    {
        eprintln!(
            "Note: '{}' is not one of the known models ({})",
            request.model,
            KNOWN_MODELS.join(", ")
        );
    }

    println!(
        "Running {} simulation: C-rate={}, t={} h, SOC0={} via {}",
        request.model, request.c_rate, request.t_hours, request.init_soc, config.endpoint
    );

    let client = config.client();
    let mut session = open_session(config)?;
    let mut view = TerminalView::new(false);

    session.submit(&client, request, &mut view).to_result()?;
    println!("  Saved runs: {}", session.listing().len());

    if let Some(path) = export {
        export_to(&session, path)?;
    }
    if let Some(path) = plot_out {
        plot_to(&session, path)?;
    }
    Ok(())
}

fn cmd_history(config: &AppConfig) -> AppResult<()> {
    let mut session = open_session(config)?;
    let mut view = TerminalView::new(true);
    session.render_history(&mut view);
    Ok(())
}

fn cmd_show(config: &AppConfig, entry: usize, plot_out: Option<&Path>) -> AppResult<()> {
    let mut session = open_session(config)?;
    let mut view = TerminalView::new(false);
    session.load_position(entry, &mut view)?;

    if let Some(path) = plot_out {
        plot_to(&session, path)?;
    }
    Ok(())
}

fn cmd_export(config: &AppConfig, entry: usize, output: Option<&Path>) -> AppResult<()> {
    let mut session = open_session(config)?;
    if session.store().load().is_empty() {
        println!("No saved runs to export.");
        return Ok(());
    }

    let mut view = TerminalView::new(false);
    session.load_position(entry, &mut view)?;

    let default_path = PathBuf::from(&config.export_filename);
    export_to(&session, output.unwrap_or(&default_path))
}

fn cmd_clear(config: &AppConfig) -> AppResult<()> {
    let mut session = open_session(config)?;
    let mut view = TerminalView::new(true);
    session.clear_history(&mut view)?;
    println!("✓ History cleared");
    Ok(())
}

fn cmd_health(config: &AppConfig) -> AppResult<()> {
    let client = config.client();
    match client.health() {
        Ok(status) => {
            println!("✓ {} is up (status: {})", config.endpoint, status);
            Ok(())
        }
        Err(e) => {
            println!("✗ {} is not reachable", config.endpoint);
            Err(e)
        }
    }
}

fn export_to(session: &Session, path: &Path) -> AppResult<()> {
    let (mut sink, filename) = DirectorySink::for_path(path)?;
    if session.export_current(&mut sink, &filename)? {
        println!("✓ Exported result to {}", path.display());
    } else {
        println!("Nothing to export: no result is shown");
    }
    Ok(())
}

fn plot_to(session: &Session, path: &Path) -> AppResult<()> {
    let (mut sink, filename) = DirectorySink::for_path(path)?;
    if session.export_plot(&mut sink, &filename)? {
        println!("✓ Saved plot image to {}", path.display());
    } else {
        println!("No plot image for this run");
    }
    Ok(())
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for safe-route.
//!
//! Computes risk grids and safest routes from a JSON file of incident
//! reports (the same format the server's file-backed store writes), or
//! starts the API server.

mod render;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use safe_route_grid_models::{Cell, RiskGrid};
use safe_route_risk::{DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, RiskModel};
use safe_route_route::find_safest_path;
use safe_route_server::{ServerConfig, run_server};
use safe_route_store::{JsonFileReportStore, ReportStore};

#[derive(Parser)]
#[command(name = "safe_route", about = "Risk grid and safest-route toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the risk grid computed from a reports file
    Grid(GridArgs),
    /// Find the safest route between two cells
    Route {
        #[command(flatten)]
        grid: GridArgs,
        /// Start cell as `x,y`
        #[arg(long, value_parser = parse_cell)]
        start: Cell,
        /// End cell as `x,y`
        #[arg(long, value_parser = parse_cell)]
        end: Cell,
    },
    /// Start the API server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 8080)]
        port: u16,
        /// Grid columns
        #[arg(long, default_value_t = DEFAULT_GRID_WIDTH, value_parser = parse_dimension)]
        width: usize,
        /// Grid rows
        #[arg(long, default_value_t = DEFAULT_GRID_HEIGHT, value_parser = parse_dimension)]
        height: usize,
        /// JSON file to persist reports in (in-memory if omitted)
        #[arg(long)]
        reports: Option<PathBuf>,
        /// TOML file with risk model overrides
        #[arg(long)]
        risk_model: Option<PathBuf>,
    },
}

#[derive(Args)]
struct GridArgs {
    /// JSON array of incident reports
    #[arg(long)]
    reports: PathBuf,
    /// Grid columns
    #[arg(long, default_value_t = DEFAULT_GRID_WIDTH, value_parser = parse_dimension)]
    width: usize,
    /// Grid rows
    #[arg(long, default_value_t = DEFAULT_GRID_HEIGHT, value_parser = parse_dimension)]
    height: usize,
    /// Reference time in Unix seconds (defaults to now)
    #[arg(long)]
    now: Option<i64>,
    /// TOML file with risk model overrides
    #[arg(long)]
    risk_model: Option<PathBuf>,
}

impl GridArgs {
    fn build(&self) -> Result<RiskGrid, Box<dyn std::error::Error>> {
        let model = match &self.risk_model {
            Some(path) => RiskModel::load(path)?,
            None => RiskModel::default(),
        };
        let reports = JsonFileReportStore::open(&self.reports)?.snapshot()?;
        let now = self.now.unwrap_or_else(safe_route_server::now);

        log::info!(
            "Building {}x{} grid from {} reports at t={now}",
            self.width,
            self.height,
            reports.len()
        );

        Ok(model.build_grid(&reports, self.width, self.height, now))
    }
}

fn parse_cell(s: &str) -> Result<Cell, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {s:?}"))?;
    let x = x.trim().parse::<i64>().map_err(|e| format!("invalid x {x:?}: {e}"))?;
    let y = y.trim().parse::<i64>().map_err(|e| format!("invalid y {y:?}: {e}"))?;
    Ok(Cell::new(x, y))
}

fn parse_dimension(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("grid dimensions must be positive".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("invalid dimension {s:?}: {e}")),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();

    match cli.command {
        Commands::Grid(args) => {
            let grid = args.build()?;
            print!("{}", render::grid_table(&grid));
        }
        Commands::Route { grid, start, end } => {
            let grid = grid.build()?;
            let result = find_safest_path(&grid, start, end)?;

            print!("{}", render::path_map(&grid, &result.path));
            println!();
            let cells: Vec<String> = result.path.iter().map(ToString::to_string).collect();
            println!("Path: {}", cells.join(" -> "));
            println!("Cost: {:.3}", result.cost);
        }
        Commands::Serve {
            bind,
            port,
            width,
            height,
            reports,
            risk_model,
        } => {
            let config = ServerConfig {
                bind_addr: bind,
                port,
                width,
                height,
                reports_path: reports,
                risk_model_path: risk_model,
            };
            actix_web::rt::System::new().block_on(run_server(config))?;
        }
    }

    Ok(())
}

use anyhow::Context;
use clap::Parser;
use generator::scene::{build_frame_payload_from_config, SceneConfig};
use log::info;
use gui_bridge::bridge::GuiBridge;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Target-board scoreboard driver")]
struct Args {
    /// Run a single synthetic round offline and export it
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 4)]
    shots: usize,
    #[arg(long, default_value_t = 5)]
    targets: usize,
    #[arg(long, default_value_t = 0.25)]
    confidence: f32,
    /// Append-only CSV file for exported rounds
    #[arg(long, default_value = "board_results.csv")]
    csv: PathBuf,
    /// Seed for the synthetic frame generator
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Marks missing from the top of the synthetic board
    #[arg(long, default_value_t = 0)]
    dropout: usize,
    /// Keep the scoreboard bridge alive for incoming frames
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        let config = WorkflowConfig::from_args(args.shots, args.targets, args.confidence, args.csv);
        config.validate()?;
        config
    };

    let runner = Arc::new(Runner::new(workflow_config.clone()));
    let gui_bridge = GuiBridge::new(runner.clone())?;

    if args.offline {
        let scene = SceneConfig {
            num_shots: workflow_config.num_shots,
            num_targets: workflow_config.num_targets,
            frame_width: workflow_config.frame_width,
            frame_height: workflow_config.frame_height,
            seed: args.seed,
            dropout: args.dropout,
            ..Default::default()
        };
        let payload = build_frame_payload_from_config(&scene)?;
        let result = runner.execute(&payload)?;

        println!(
            "Offline round -> assigned {}, unassigned {}, grid {}x{}",
            result.assigned,
            result.unassigned,
            result.grid.rows(),
            result.grid.columns()
        );

        info!(
            "offline round complete: {} assigned, {} unassigned",
            result.assigned, result.unassigned
        );

        gui_bridge.publish(&result)?;
        gui_bridge.export_current()?;
        gui_bridge.publish_status(&format!(
            "Round exported to {}",
            workflow_config.csv_path.display()
        ));
    }
    if args.serve {
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    gui_bridge.shutdown();
    Ok(())
}

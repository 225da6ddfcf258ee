use crate::generator::scene::{build_frame_payload_from_config, SceneConfig};
use crate::gui_bridge::model::BridgeModel;
use crate::workflow::runner::{RoundResult, Runner};
use anyhow::Result;
use boardcore::frame::FramePayload;
use boardcore::scoreboard::{DisplaySink, Grid, ScoreboardModel, ScoreboardStore};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9100))
}

#[derive(Debug)]
struct WarpError;

impl warp::reject::Reject for WarpError {}

/// Display adapter writing each presented table into the shared bridge
/// state; the HTTP side only ever reads it.
pub struct SharedModelSink {
    state: Arc<RwLock<BridgeModel>>,
}

impl SharedModelSink {
    pub fn new(state: Arc<RwLock<BridgeModel>>) -> Self {
        Self { state }
    }
}

impl DisplaySink for SharedModelSink {
    fn show(&mut self, model: &ScoreboardModel) {
        if let Ok(mut guard) = self.state.write() {
            guard.scoreboard = model.clone();
        }
    }

    fn close(&mut self) {}
}

type SharedStore = Arc<Mutex<ScoreboardStore<SharedModelSink>>>;

fn apply_round(state: &Arc<RwLock<BridgeModel>>, store: &SharedStore, result: &RoundResult) {
    if let Ok(mut store) = store.lock() {
        store.present(&result.grid);
    }
    if let Ok(mut guard) = state.write() {
        guard.grid = Some(result.grid.clone());
        guard.assigned = result.assigned;
        guard.unassigned = result.unassigned;
        guard.notes = result.notes.clone();
    }
}

/// Bridge that hosts the scoreboard HTTP endpoint and owns the store.
pub struct GuiBridge {
    state: Arc<RwLock<BridgeModel>>,
    store: SharedStore,
}

impl GuiBridge {
    pub fn new(runner: Arc<Runner>) -> Result<Self> {
        let state = Arc::new(RwLock::new(BridgeModel::default()));
        let store = Arc::new(Mutex::new(ScoreboardStore::new(
            runner.config().to_session_config(),
            SharedModelSink::new(state.clone()),
            &runner.config().csv_path,
        )?));

        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let store_for_filter = store.clone();
        let store_filter = warp::any().map(move || store_for_filter.clone());
        let runner_filter = warp::any().map(move || runner.clone());

        let get_route = warp::path("scoreboard")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<BridgeModel>>| warp::reply::json(&*state.read().unwrap()));

        let ingest_route = warp::path("ingest")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and(store_filter.clone())
            .and(runner_filter.clone())
            .and_then(
                |payload: FramePayload,
                 state: Arc<RwLock<BridgeModel>>,
                 store: SharedStore,
                 runner: Arc<Runner>| async move {
                    match runner.execute(&payload) {
                        Ok(result) => {
                            apply_round(&state, &store, &result);
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({
                                    "status": "ok",
                                    "assigned": result.assigned,
                                    "unassigned": result.unassigned
                                })),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            eprintln!("ingest error: {}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        let scene_route = warp::path("ingest-config")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and(store_filter.clone())
            .and(runner_filter)
            .and_then(
                |config: SceneConfig,
                 state: Arc<RwLock<BridgeModel>>,
                 store: SharedStore,
                 runner: Arc<Runner>| async move {
                    match build_frame_payload_from_config(&config)
                        .and_then(|payload| runner.execute(&payload))
                    {
                        Ok(result) => {
                            apply_round(&state, &store, &result);
                            if let Some(name) = config.scenario.as_ref() {
                                println!(
                                    "[GUI] Scenario {} -> {} marks assigned",
                                    name, result.assigned
                                );
                            }
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({
                                    "status": "ok",
                                    "assigned": result.assigned,
                                    "unassigned": result.unassigned,
                                    "description": config.description.clone().unwrap_or_default()
                                })),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            eprintln!("ingest-config error: {}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        let export_route = warp::path("export")
            .and(warp::post())
            .and(state_filter)
            .and(store_filter)
            .and_then(
                |state: Arc<RwLock<BridgeModel>>, store: SharedStore| async move {
                    let grid = {
                        let guard = state.read().unwrap();
                        guard.grid.clone()
                    };
                    let grid = match grid {
                        Some(grid) => grid,
                        None => {
                            let store = store.lock().unwrap();
                            let config = store.config();
                            Grid::new(config.num_shots, config.num_targets)
                        }
                    };
                    let outcome = store.lock().unwrap().export(&grid);
                    match outcome {
                        Ok(()) => Ok::<_, warp::Rejection>(warp::reply::with_status(
                            warp::reply::json(&json!({"status": "ok"})),
                            StatusCode::OK,
                        )),
                        Err(err) => {
                            eprintln!("export error: {}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        thread::spawn(move || {
            let routes = get_route.or(ingest_route).or(scene_route).or(export_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(gui_bind_address()).await;
            });
        });

        Ok(Self { state, store })
    }

    /// Pushes one finished round into the shared state, for offline runs.
    pub fn publish(&self, result: &RoundResult) -> Result<()> {
        apply_round(&self.state, &self.store, result);
        println!(
            "[GUI] marks assigned: {}, unassigned: {}",
            result.assigned, result.unassigned
        );
        Ok(())
    }

    pub fn export_current(&self) -> Result<()> {
        let grid = {
            let guard = self.state.read().unwrap();
            guard.grid.clone()
        };
        if let Some(grid) = grid {
            self.store.lock().unwrap().export(&grid)?;
        }
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        println!("[GUI] {}", message);
    }

    /// Releases the display side of the store; safe to call once at
    /// shutdown.
    pub fn shutdown(&self) {
        if let Ok(mut store) = self.store.lock() {
            store.close();
        }
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> BridgeModel {
        self.state.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::scene::build_frame_payload;
    use crate::workflow::config::WorkflowConfig;
    use crate::workflow::runner::Runner;
    use std::sync::Arc;

    fn test_runner(dir: &tempfile::TempDir) -> Arc<Runner> {
        let config = WorkflowConfig::from_args(4, 5, 0.25, dir.path().join("results.csv"));
        Arc::new(Runner::new(config))
    }

    #[test]
    fn gui_bridge_updates_state() {
        let dir = tempfile::tempdir().unwrap();
        let runner = test_runner(&dir);
        let gui = GuiBridge::new(runner.clone()).unwrap();

        let payload = build_frame_payload(4, 5).unwrap();
        let result = runner.execute(&payload).unwrap();
        gui.publish(&result).unwrap();

        let snapshot = gui.snapshot();
        assert_eq!(snapshot.assigned, result.assigned);
        assert_eq!(snapshot.scoreboard.row_labels.len(), 4);
        assert_eq!(snapshot.grid.as_ref().map(|grid| grid.columns()), Some(5));
    }

    #[test]
    fn export_current_appends_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let runner = test_runner(&dir);
        let gui = GuiBridge::new(runner.clone()).unwrap();

        let payload = build_frame_payload(4, 5).unwrap();
        let result = runner.execute(&payload).unwrap();
        gui.publish(&result).unwrap();
        gui.export_current().unwrap();

        let contents = std::fs::read_to_string(dir.path().join("results.csv")).unwrap();
        assert_eq!(contents.lines().count(), 1 + 5);
        gui.shutdown();
    }
}

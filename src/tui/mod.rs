mod app;
mod ui;

use crate::error::Result;
use crate::period::Period;
use crate::store::SqliteStore;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub use app::App;

/// Run the live dashboard. A worker thread owns the store connection and
/// runs refresh cycles; the UI thread only draws and handles keys.
pub fn run(
    store: SqliteStore,
    period: Option<Period>,
    resolution: u32,
    refresh: Duration,
) -> Result<()> {
    let (req_tx, req_rx) = mpsc::channel();
    let (outcome_tx, outcome_rx) = mpsc::channel();

    let worker = thread::spawn(move || app::worker_loop(store, req_rx, outcome_tx));

    let mut app = App::new(req_tx, outcome_rx, period, resolution, refresh);
    let result = app.run();

    // Dropping the app closes the request channel; the worker sees the
    // disconnect and exits.
    drop(app);
    let _ = worker.join();

    result
}

use crate::error::Result;
use crate::model::{DisplayModel, LatestReading, Sample};
use crate::planner::{self, QueryPlan, TimeWindow};
use crate::refresh::CycleGuard;
use crate::resample::resample;
use crate::store::ReadingStore;
use chrono::Utc;

/// Run every query in the plan and concatenate results in plan order, so
/// downstream grouping is reproducible for identical inputs. The guard is
/// checked after each query; `Ok(None)` means the cycle went stale and its
/// results were discarded. A store error aborts the cycle without touching
/// previously displayed state.
pub fn execute<S: ReadingStore + ?Sized>(
    store: &S,
    plan: &QueryPlan,
    window: TimeWindow,
    cycle: &CycleGuard,
) -> Result<Option<Vec<Sample>>> {
    let mut samples = Vec::new();
    for entry in plan {
        let rows = store.query_range(entry, window)?;
        if cycle.is_stale() {
            return Ok(None);
        }
        samples.extend(rows);
    }
    Ok(Some(samples))
}

/// One complete fetch-plan-execute-resample pass. `window` is `None` in
/// latest-only mode (the user gave an unparseable period); only the latest
/// reading is fetched then.
pub fn refresh_cycle<S: ReadingStore + ?Sized>(
    store: &S,
    window: Option<TimeWindow>,
    resolution: u32,
    cycle: &CycleGuard,
) -> Result<Option<DisplayModel>> {
    let today = planner::day_key(Utc::now().timestamp())?;
    let latest = store.latest(&today)?;
    if cycle.is_stale() {
        return Ok(None);
    }

    let mut model = DisplayModel {
        latest: latest.map(LatestReading::from_sample).transpose()?,
        ..Default::default()
    };

    if let Some(window) = window {
        let plan = planner::plan(window, resolution)?;
        match execute(store, &plan, window, cycle)? {
            Some(samples) => {
                model.series = resample(&samples, window, resolution);
                model.x_range = Some((window.start, window.end));
            }
            None => return Ok(None),
        }
    }

    Ok(Some(model))
}

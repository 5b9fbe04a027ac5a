//! CSV timetable loader.
//!
//! # CSV format
//!
//! One row per manifest entry.  `route` is a space-separated list of node
//! names; `speed` is optional.
//!
//! ```csv
//! id,start_time,color,route,speed
//! WR1,1,#0080ff,WL_A WL_B1 WL_J WL_C,
//! CR1,2,255:100:100,CL_A CL_B2 CL_J CL_C,60
//! ```
//!
//! **`color`** accepts `#rrggbb` or decimal `r:g:b`.
//!
//! Routes are *not* checked against a network here; the simulation validates
//! them when the entry fires.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use tl_core::Color;
use tl_network::Route;

use crate::{ScheduleError, SpawnEntry, Timetable};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SpawnRecord {
    id:         String,
    start_time: f64,
    color:      String,
    route:      String,
    #[serde(default)]
    speed:      Option<f32>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`Timetable`] from a CSV file.
pub fn load_timetable_csv(path: &Path) -> Result<Timetable, ScheduleError> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    load_timetable_reader(file)
}

/// Like [`load_timetable_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor` or a byte slice) or for
/// manifests embedded in an application binary.
pub fn load_timetable_reader<R: Read>(reader: R) -> Result<Timetable, ScheduleError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut entries = Vec::new();
    for result in csv_reader.deserialize::<SpawnRecord>() {
        let row = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        entries.push(parse_record(row)?);
    }
    Timetable::from_entries(entries)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_record(row: SpawnRecord) -> Result<SpawnEntry, ScheduleError> {
    if !row.start_time.is_finite() {
        return Err(ScheduleError::Parse(format!(
            "entry {:?}: start_time must be finite",
            row.id
        )));
    }
    let color: Color = row
        .color
        .parse()
        .map_err(|e| ScheduleError::Parse(format!("entry {:?}: {e}", row.id)))?;
    let route: Route = row.route.split_whitespace().collect();
    if route.is_empty() {
        return Err(ScheduleError::Parse(format!("entry {:?}: route is empty", row.id)));
    }
    if let Some(speed) = row.speed {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(ScheduleError::Parse(format!(
                "entry {:?}: speed must be positive, got {speed}",
                row.id
            )));
        }
    }

    Ok(SpawnEntry {
        id: row.id,
        trigger_secs: row.start_time,
        color,
        route,
        speed: row.speed,
    })
}

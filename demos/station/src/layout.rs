//! The built-in two-line station layout and its timetable.
//!
//! ```text
//!   WL_A ── WL_B1 ──────────── WL_J ── WL_C
//!             \
//!              X1
//!               \
//!        ┌── CL_B1 ──┐
//!   CL_A ┤           ├── CL_J ── CL_C
//!        └── CL_B2 ──┘
//! ```
//!
//! `X1` is a single crossover from the west line onto the central line's
//! first platform road.

use std::io::Cursor;

use anyhow::Result;

use tl_network::{Network, NetworkDescription};
use tl_schedule::{Timetable, load_timetable_reader};

const LAYOUT_JSON: &str = r#"{
  "nodes": {
    "WL_A":  { "x": 80,  "y": 150, "station": true, "platforms": 2 },
    "WL_B1": { "x": 250, "y": 150 },
    "WL_J":  { "x": 450, "y": 150 },
    "WL_C":  { "x": 700, "y": 150, "station": true, "platforms": 1 },
    "X1":    { "x": 300, "y": 240 },
    "CL_A":  { "x": 80,  "y": 355, "station": true, "platforms": 3 },
    "CL_B1": { "x": 350, "y": 330 },
    "CL_B2": { "x": 350, "y": 380 },
    "CL_J":  { "x": 500, "y": 355 },
    "CL_C":  { "x": 700, "y": 355, "station": true, "platforms": 2 }
  },
  "edges": [
    ["WL_A", "WL_B1"], ["WL_B1", "WL_J"], ["WL_J", "WL_C"],
    ["WL_B1", "X1"], ["X1", "CL_B1"],
    ["CL_A", "CL_B1"], ["CL_A", "CL_B2"],
    ["CL_B1", "CL_J"], ["CL_B2", "CL_J"], ["CL_J", "CL_C"]
  ]
}"#;

// Xover follows WR1 out of WL_A and crosses onto the central line behind CR1.
const TIMETABLE_CSV: &str = "\
id,start_time,color,route,speed\n\
WR1,1,#0080ff,WL_A WL_B1 WL_J WL_C,\n\
CR1,2,255:100:100,CL_A CL_B2 CL_J CL_C,\n\
Xover,4,100:200:100,WL_A WL_B1 X1 CL_B1 CL_J CL_C,\n\
";

/// Parse a layout file's JSON text into a [`Network`].
pub fn parse_layout(json: &str) -> Result<Network> {
    let desc: NetworkDescription = serde_json::from_str(json)?;
    Ok(Network::from_description(&desc)?)
}

pub fn builtin_network() -> Result<Network> {
    parse_layout(LAYOUT_JSON)
}

pub fn builtin_timetable() -> Result<Timetable> {
    Ok(load_timetable_reader(Cursor::new(TIMETABLE_CSV))?)
}

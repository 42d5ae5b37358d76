// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Bezpen demo: draws a closed three-anchor path and prints the edit.
//!
//! Usage: `bezpen [path/to/pen.toml]`

use anyhow::Context;
use bezpen::{EditLog, PathBuilder, PenConfig, PointerEvent};
use kurbo::Point;

/// One scripted pointer event, in view pixels
#[derive(Debug, Clone, Copy)]
enum Step {
    Press(f64, f64),
    Drag(f64, f64),
    Release(f64, f64),
    Move(f64, f64),
}

impl Step {
    fn view_pos(self) -> Point {
        match self {
            Step::Press(x, y) | Step::Drag(x, y) | Step::Release(x, y) | Step::Move(x, y) => {
                Point::new(x, y)
            }
        }
    }
}

const SCRIPT: &[Step] = &[
    Step::Press(10.0, 10.0),
    Step::Drag(20.0, 10.0),
    Step::Drag(30.0, 10.0),
    Step::Drag(40.0, 10.0),
    Step::Release(50.0, 10.0),
    Step::Move(50.0, 20.0),
    Step::Move(50.0, 40.0),
    Step::Press(50.0, 50.0),
    Step::Drag(70.0, 50.0),
    Step::Release(90.0, 50.0),
    Step::Move(90.0, 30.0),
    Step::Press(90.0, 10.0),
    Step::Drag(110.0, 10.0),
    Step::Release(120.0, 10.0),
    Step::Move(50.0, 10.0),
    Step::Move(12.0, 10.0),
    Step::Press(11.0, 10.0),
];

fn main() -> anyhow::Result<()> {
    bezpen::init_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => PenConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => PenConfig::default(),
    };

    let mut builder = PathBuilder::from_config(&config, EditLog::new())?;
    for step in SCRIPT {
        let event = PointerEvent::from_view(step.view_pos(), builder.mapper());
        match step {
            Step::Press(..) => builder.pointer_pressed(event),
            Step::Drag(..) => builder.pointer_dragged(event),
            Step::Release(..) => builder.pointer_released(event),
            Step::Move(..) => builder.pointer_moved(event),
        }
    }

    // No-op once closed; records the path if the script left it open
    builder.finish();
    tracing::info!("Pen tool ended in {:?}", builder.state());

    let (_, log) = builder.into_parts();
    let edit = log.last().context("no path was completed")?;
    println!("{}", serde_json::to_string_pretty(edit)?);
    Ok(())
}

//! Seatplan - hall seating planner
//!
//! A line-oriented shell over the seating engine: roster, tables, group
//! drag-and-drop, the overview minimap, and saved halls.

use std::io;

use seatplan_core::PlannerConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod shell;
mod state;

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Seatplan");

    let config = match PlannerConfig::default_path() {
        Some(path) => match PlannerConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(path = %path.display(), "Invalid planner config: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            tracing::warn!("No config directory; using defaults");
            PlannerConfig::default()
        }
    };

    // Initialize application state
    let mut app_state = match state::AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    if let Err(e) = shell::run(&mut app_state, stdin.lock(), io::stdout()) {
        tracing::error!("Input error: {}", e);
    }

    if let Err(e) = app_state.shutdown() {
        tracing::error!("Failed to save preferences: {}", e);
        std::process::exit(1);
    }
}

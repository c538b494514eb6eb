pub mod app;
pub mod catalog;
pub mod commands;
pub mod diagram;
pub mod editor_state;
pub mod effects;
pub mod native;
pub mod nodes;
pub mod reducers;
pub mod serialization;
pub mod state;
pub mod store;
pub mod workbench;

use app::WorkbenchApp;
use state::State;
use store::Store;
use workbench::{Beliefs, WorkbenchState};

/// Build the application with the demo document as the initial graph.
pub fn create_app(_cc: &eframe::CreationContext<'_>) -> WorkbenchApp {
    let beliefs = Beliefs {
        nodes: nodes::demo_nodes(),
        language: "en-US".to_string(),
        model_name: "Demo Model".to_string(),
    };
    WorkbenchApp::new(State::new(Store::new(WorkbenchState::new(beliefs))))
}

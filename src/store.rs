use crate::serialization;
use crate::workbench::WorkbenchState;
use std::path::Path;

/// The dispatch loop's single mutable resource: the current workbench
/// snapshot plus session-level fields the reducer does not own.
pub struct Store {
    pub workbench: WorkbenchState,
    pub error_message: Option<String>,
}

impl Store {
    pub fn new(workbench: WorkbenchState) -> Self {
        Self {
            workbench,
            error_message: None,
        }
    }

    pub fn save_to_file(&mut self, path: &Path) -> Result<(), String> {
        serialization::save_to_file(&self.workbench.beliefs, path)?;
        self.workbench.current_url =
            Some(path.to_string_lossy().into_owned());
        Ok(())
    }

    pub fn load_from_file(&mut self, path: &Path) -> Result<(), String> {
        let beliefs = serialization::load_from_file(path)?;
        self.workbench = WorkbenchState::new(beliefs);
        self.workbench.current_url =
            Some(path.to_string_lossy().into_owned());
        Ok(())
    }
}

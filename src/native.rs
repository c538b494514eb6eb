use crate::create_app;
use tracing_subscriber::EnvFilter;

/// Entry point used by the native executable.
pub fn run() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "Belief Workbench",
        native_options,
        Box::new(|cc| Ok(Box::new(create_app(cc)))),
    )
}

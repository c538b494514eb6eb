fn main() -> eframe::Result<()> {
    belief_workbench::native::run()
}

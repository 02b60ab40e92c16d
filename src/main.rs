use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    condition_editor::run()
}

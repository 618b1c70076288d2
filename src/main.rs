use pibench::cli;

fn main() -> anyhow::Result<()> {
    if let Err(e) = cli::run() {
        #[expect(clippy::print_stderr, reason = "Logging may not be initialized yet")]
        {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    scanrenamer::cli::run_cli()
}

fn main() -> anyhow::Result<()> {
    kernelcheck_cli::run()
}

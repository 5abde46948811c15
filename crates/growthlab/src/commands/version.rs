pub fn run() -> anyhow::Result<()> {
    println!("growthlab {}", env!("CARGO_PKG_VERSION"));
    println!("Channel performance drivers and topic momentum from video snapshots");
    Ok(())
}

use std::env;

/// Send log records to stdout, filtered at the level named by `SIEGERT_LOG`
/// (default `info`).
pub fn init_logging() -> anyhow::Result<()> {
    let level
        = env::var("SIEGERT_LOG").ok()
        .and_then(|s| s.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info);
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.target(),
                record.level(),
                message,
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

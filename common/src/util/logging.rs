use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{info, LevelFilter, SetLoggerError};
use std::future::Future;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static MULTI: OnceLock<MultiProgress> = OnceLock::new();

pub fn initialize_logging(log_level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = env_logger::builder()
        .filter_level(log_level)
        .parse_default_env() // Allow overriding log level through RUST_LOG env var
        .build();

    let multi = MultiProgress::new();

    LogWrapper::new(multi.clone(), logger).try_init()?;
    log::set_max_level(log_level);

    let _ = MULTI.set(multi);
    Ok(())
}

fn start_spinner(task_desc: &str) -> ProgressBar {
    let style = ProgressStyle::with_template("{spinner:.white} [{elapsed:.green}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    let pb = ProgressBar::new_spinner()
        .with_message(format!("{}...", task_desc))
        .with_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));

    // Set up connection with log library so that progress bars don't jump around
    match MULTI.get() {
        Some(multi) => multi.add(pb),
        None => pb,
    }
}

fn finish_spinner(target: &str, task_desc: &str, pb: ProgressBar, start_time: Instant) {
    pb.finish_and_clear();
    if let Some(multi) = MULTI.get() {
        multi.remove(&pb);
    }
    let elapsed = indicatif::HumanDuration(start_time.elapsed());
    info!(target: target, "{} finished (took {})", task_desc, elapsed);
}

pub fn run_with_spinner<'a, F, Out>(
    target: &'a str, task_desc: &'a str, function: F,
) -> Out where
    F: FnOnce() -> Out,
{
    let start_time = Instant::now();
    let pb = start_spinner(task_desc);

    let out = function();

    finish_spinner(target, task_desc, pb, start_time);
    out
}

pub async fn run_with_spinner_async<'a, F, Out>(
    target: &'a str, task_desc: &'a str, future: F,
) -> Out where
    F: Future<Output = Out>,
{
    let start_time = Instant::now();
    let pb = start_spinner(task_desc);

    let out = future.await;

    finish_spinner(target, task_desc, pb, start_time);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_without_logger() {
        assert_eq!(42, run_with_spinner("test", "Answering", || 42));
    }
}

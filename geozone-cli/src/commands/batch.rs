//! Batch serviceability checks from standard input.
//!
//! Reads `lat,lon` lines, answers them across worker threads sharing one
//! service, and prints results in input order followed by a metrics summary.
//! A refresh daemon runs for the duration of the batch so long runs pick up
//! zone changes.

use std::io::{self, BufRead};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use geozone::service::{ServiceConfig, ServiceStack, ServiceabilityService};
use geozone::telemetry::ServiceMetrics;

use super::common::{parse_coordinate_line, zone_repository};
use crate::error::CliError;
use crate::runner::CliRunner;

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Zone file to load instead of the configured source
    #[arg(long)]
    pub zones: Option<PathBuf>,

    /// Worker threads (defaults to available parallelism)
    #[arg(long)]
    pub workers: Option<NonZeroUsize>,
}

pub fn run(args: BatchArgs, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("batch");

    let lines = io::stdin()
        .lock()
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(CliError::Stdin)?;

    let repository = zone_repository(runner.config(), args.zones.as_deref())?;
    let config = ServiceConfig::from_config_file(runner.config());
    let runtime = runner.create_runtime()?;
    let metrics = ServiceMetrics::global();

    let stack = ServiceStack::new(repository, &config, metrics.clone());
    let report = runtime.block_on(stack.load())?;
    eprintln!(
        "Loaded {} zones ({} active), generation {}",
        report.zone_count, report.active_count, report.generation
    );

    let shutdown = CancellationToken::new();
    let daemon = {
        let _guard = runtime.enter();
        stack.start_daemon(shutdown.clone())
    };

    let workers = args
        .workers
        .or_else(|| std::thread::available_parallelism().ok())
        .map_or(1, NonZeroUsize::get);
    let results = check_lines(stack.service(), &lines, workers);

    shutdown.cancel();
    if let Err(e) = runtime.block_on(daemon) {
        warn!(error = %e, "Refresh daemon did not shut down cleanly");
    }

    for line in results?.into_iter().flatten() {
        println!("{}", line);
    }

    eprintln!();
    eprintln!("{}", metrics.snapshot());
    Ok(())
}

/// Check every line, preserving input order. Blank and comment lines yield `None`.
fn check_lines(
    service: &ServiceabilityService,
    lines: &[String],
    workers: usize,
) -> Result<Vec<Option<String>>, CliError> {
    map_in_chunks(lines, workers, |line| check_line(service, line))
}

/// Apply `f` to each line on scoped worker threads, keeping input order.
///
/// A panicking worker fails the whole batch rather than dropping its chunk.
fn map_in_chunks<F>(lines: &[String], workers: usize, f: F) -> Result<Vec<Option<String>>, CliError>
where
    F: Fn(&str) -> Option<String> + Sync,
{
    let chunk_size = lines.len().div_ceil(workers.max(1)).max(1);
    let f = &f;

    std::thread::scope(|scope| {
        let handles: Vec<_> = lines
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move || chunk.iter().map(|line| f(line.as_str())).collect::<Vec<_>>()))
            .collect();

        let mut results = Vec::with_capacity(lines.len());
        for (index, handle) in handles.into_iter().enumerate() {
            let chunk = handle.join().map_err(|panic| {
                CliError::Worker(format!(
                    "worker {} panicked: {}",
                    index,
                    panic_message(panic.as_ref())
                ))
            })?;
            results.extend(chunk);
        }
        Ok(results)
    })
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

fn check_line(service: &ServiceabilityService, line: &str) -> Option<String> {
    let output = match parse_coordinate_line(line)? {
        Ok((lat, lon)) => match service.check_serviceability(lat, lon) {
            Ok(answer) => format!(
                "{},{},{},{}",
                lat,
                lon,
                answer.serviceable,
                answer.zone_id.unwrap_or_default()
            ),
            Err(e) => format!("{},{},error,{}", lat, lon, e),
        },
        Err(reason) => format!("{},error,{}", line.trim(), reason),
    };
    Some(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use geozone::cache::{CacheConfig, ServiceabilityCache};
    use geozone::repository::{zones_from_records, ZoneRecord};
    use geozone::resolver::ZoneResolver;

    fn service() -> ServiceabilityService {
        let resolver = Arc::new(ZoneResolver::default());
        let records = vec![ZoneRecord::new(
            "A",
            vec![vec![[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]],
            1,
        )];
        resolver.install(zones_from_records(records).unwrap().zones);
        ServiceabilityService::new(
            resolver,
            Arc::new(ServiceabilityCache::new(CacheConfig::default())),
            Arc::new(ServiceMetrics::new()),
        )
    }

    #[test]
    fn test_check_lines_preserves_order() {
        let lines: Vec<String> = ["# header", "2,2", "20,20", "", "bad", "95,0"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let output: Vec<_> = check_lines(&service(), &lines, 3)
            .unwrap()
            .into_iter()
            .flatten()
            .collect();

        assert_eq!(output.len(), 4);
        assert_eq!(output[0], "2,2,true,A");
        assert_eq!(output[1], "20,20,false,");
        assert!(output[2].starts_with("bad,error"));
        assert!(output[3].starts_with("95,0,error,invalid coordinate"));
    }

    #[test]
    fn test_empty_input() {
        assert!(check_lines(&service(), &[], 4).unwrap().is_empty());
    }

    #[test]
    fn test_panicking_worker_fails_batch() {
        let lines: Vec<String> = ["1,1", "2,2", "boom", "4,4"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let result = map_in_chunks(&lines, 2, |line| {
            if line == "boom" {
                panic!("cannot check {}", line);
            }
            Some(line.to_string())
        });

        match result {
            Err(CliError::Worker(msg)) => assert!(msg.contains("cannot check boom"), "{}", msg),
            other => panic!("expected worker error, got {:?}", other),
        }
    }
}

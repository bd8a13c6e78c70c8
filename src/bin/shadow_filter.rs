//! Shadow filter harness
//!
//! Reads LiDAR scans as JSON Lines (one `LaserScan` per line), removes shadow
//! points and writes the filtered scans in the same format. One filter
//! instance serves the whole stream, so lookup tables are only rebuilt when
//! the angular increment changes.
//!
//! Scans that fail [`LaserScan::validate`] (for example intensities whose
//! length differs from the ranges) are logged and dropped from the output.
//! Blank lines are ignored.
//!
//! # Usage
//!
//! ```bash
//! shadow_filter --config shadow_filter.toml --input scans.jsonl --output filtered.jsonl
//! cat scans.jsonl | shadow_filter -c shadow_filter.toml > filtered.jsonl
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use chhaya::{FilterFile, LaserScan, Result, ShadowsFilter};
use clap::Parser;

/// Remove shadow points from 2D LiDAR scans
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with a [shadow_filter] section
    #[arg(short, long)]
    config: PathBuf,

    /// JSON Lines input (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// JSON Lines output (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(count) => {
            log::info!("Filtered {} scans", count);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("shadow_filter failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<usize> {
    let file = FilterFile::from_file(&args.config)?;
    log::info!("Loaded config from {}", args.config.display());

    let filter = ShadowsFilter::from_params(&file.shadow_filter)?;
    let config = filter.config();
    log::info!(
        "  Cone: [{:.1}°, {:.1}°], window: {}, neighbors: {}",
        config.min_angle,
        config.max_angle,
        config.window,
        config.neighbors
    );

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin().lock())),
    };
    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    process_stream(&filter, reader, writer)
}

/// Filter every scan of a JSON Lines stream; returns the number written.
fn process_stream<R: BufRead, W: Write>(
    filter: &ShadowsFilter,
    reader: R,
    mut writer: W,
) -> Result<usize> {
    let mut count = 0;
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let scan: LaserScan = serde_json::from_str(&line)?;
        if let Err(reason) = scan.validate() {
            log::warn!("Skipping scan on line {}: {}", line_no + 1, reason);
            continue;
        }

        let filtered = filter.update(&scan);
        let stats = filter.last_stats();
        log::debug!(
            "Scan {}: {} points, {} shadows, {} removed",
            count,
            scan.len(),
            stats.shadows_detected,
            stats.points_removed
        );

        serde_json::to_writer(&mut writer, &filtered)?;
        writeln!(writer)?;
        count += 1;
    }
    writer.flush()?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chhaya::ShadowFilterConfig;
    use std::io::Cursor;

    fn edge_scan_line() -> String {
        let scan = LaserScan::uniform(0.0, 0.01, vec![1.0, 1.0, 5.0, 5.0]);
        serde_json::to_string(&scan).unwrap()
    }

    fn edge_filter() -> ShadowsFilter {
        ShadowsFilter::new(ShadowFilterConfig {
            neighbors: 1,
            ..Default::default()
        })
    }

    #[test]
    fn test_process_stream_filters_each_line() {
        let line = edge_scan_line();
        let input = format!("{line}\n\n{line}\n");
        let mut output = Vec::new();

        let count = process_stream(&edge_filter(), Cursor::new(input), &mut output).unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(output).unwrap();
        let scans: Vec<LaserScan> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(scans.len(), 2);
        for scan in scans {
            assert!(scan.ranges[2].is_nan());
            assert_eq!(scan.ranges[1], 1.0);
        }
    }

    #[test]
    fn test_process_stream_skips_invalid_scans() {
        let bad = LaserScan::uniform(0.0, 0.01, vec![1.0, 1.0, 5.0, 5.0])
            .with_intensities(vec![1.0]);
        let input = format!(
            "{}\n{}\n",
            serde_json::to_string(&bad).unwrap(),
            edge_scan_line()
        );
        let mut output = Vec::new();

        let count = process_stream(&edge_filter(), Cursor::new(input), &mut output).unwrap();
        assert_eq!(count, 1);

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.lines().count(), 1);
        let scan: LaserScan = serde_json::from_str(text.trim()).unwrap();
        assert!(scan.intensities.is_empty());
    }

    #[test]
    fn test_process_stream_rejects_malformed_json() {
        let mut output = Vec::new();
        let result = process_stream(&edge_filter(), Cursor::new("{not json}\n"), &mut output);
        assert!(matches!(result, Err(chhaya::ShadowFilterError::Json(_))));
    }
}

//! Scanning a small log for lines above a severity threshold.
//!
//! Run with: cargo run --example log_scan

use vinerex::Pattern;

const LOG: &str = "\
2024-01-01T00:00:01Z INFO  started up
2024-01-01T00:00:02Z WARN  retrying connection
2024-01-01T00:00:03Z ERROR connection refused
2024-01-01T00:00:04Z INFO  connected
2024-01-01T00:00:05Z ERROR timeout writing batch
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let pattern = Pattern::compile(r"^(\S+) (WARN|ERROR)\s+(.+)$")?;

    for line in LOG.lines() {
        if let Some(caps) = pattern.entire_match(line) {
            println!("[{}] {}: {}", caps.group(1).unwrap(), caps.group(2).unwrap(), caps.group(3).unwrap());
        }
    }

    let errors_only = Pattern::compile(r"^\S+ ERROR\s+.+$")?;
    let count = LOG.lines().filter(|line| errors_only.entire_match(line).is_some()).count();
    println!();
    println!("{count} ERROR line(s)");

    Ok(())
}

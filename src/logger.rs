use anyhow::Result;
use chrono::{DateTime, Local};
use std::{fs::OpenOptions, io::Write, path::Path};
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins; otherwise info for this crate, warn for the rest.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,sona_intelligence=info,sona=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

pub fn append_line(path: impl AsRef<Path>, line: &str) -> Result<()> {
    let mut f = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(f, "{line}")?;
    Ok(())
}

pub fn heartbeat_line(tick: u64, analyzed: usize) -> String {
    let now: DateTime<Local> = Local::now();
    format!("{} heartbeat tick={tick} analyzed={analyzed}", now.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heartbeat_lines_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heartbeat.log");
        append_line(&path, &heartbeat_line(1, 2)).unwrap();
        append_line(&path, &heartbeat_line(2, 2)).unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = body.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with("heartbeat tick=2 analyzed=2"));
    }
}

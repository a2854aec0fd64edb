use crate::error::{GtallyError, Result};
use crate::model::{SkippedBranch, TimePolicy};
use chrono::{DateTime, Datelike, FixedOffset, Utc};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Calendar year and month of a commit timestamp under `policy`.
pub fn year_month(seconds: i64, offset_seconds: i32, policy: TimePolicy) -> Result<(i32, u32)> {
    let utc = DateTime::<Utc>::from_timestamp(seconds, 0)
        .ok_or_else(|| GtallyError::InvalidDate(format!("Invalid timestamp: {seconds}")))?;
    let local = match policy {
        TimePolicy::Utc => utc.naive_utc(),
        TimePolicy::Committer => {
            let offset = FixedOffset::east_opt(offset_seconds)
                .ok_or_else(|| GtallyError::InvalidDate(format!("Invalid offset: {offset_seconds}")))?;
            utc.with_timezone(&offset).naive_local()
        }
    };
    Ok((local.year(), local.month()))
}

pub fn spinner(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{pos} commits]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Writes `contents` to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(p) => std::fs::write(p, contents).map_err(|source| GtallyError::Export {
            path: p.to_path_buf(),
            source,
        }),
        None => {
            println!("{contents}");
            Ok(())
        }
    }
}

pub fn print_saved(what: &str, path: &Path) {
    eprintln!("{} saved to {}", what, style(path.display()).cyan());
}

pub fn print_skipped(skipped: &[SkippedBranch]) {
    if skipped.is_empty() {
        return;
    }
    eprintln!(
        "\n{} {} branch(es) left out of the results:",
        style("warning:").yellow().bold(),
        skipped.len()
    );
    for s in skipped {
        eprintln!("  {}: {}", style(&s.branch).bold(), s.reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2023-01-31T23:30:00Z
    const NEW_YEARS_EDGE: i64 = 1_675_207_800;

    #[test]
    fn utc_policy_ignores_offset() {
        assert_eq!(year_month(NEW_YEARS_EDGE, 3600, TimePolicy::Utc).unwrap(), (2023, 1));
    }

    #[test]
    fn committer_policy_applies_offset() {
        assert_eq!(year_month(NEW_YEARS_EDGE, 3600, TimePolicy::Committer).unwrap(), (2023, 2));
        assert_eq!(year_month(NEW_YEARS_EDGE, -3600, TimePolicy::Committer).unwrap(), (2023, 1));
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        assert!(year_month(0, 100_000, TimePolicy::Committer).is_err());
    }

    #[test]
    fn unwritable_destination_is_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("out.json");
        let err = write_output(Some(target.as_path()), "{}").unwrap_err();
        assert!(matches!(err, GtallyError::Export { .. }));
    }

    #[test]
    fn writes_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");
        write_output(Some(target.as_path()), "hello").unwrap();
        assert_eq!(std::fs::read_to_string(target).unwrap(), "hello");
    }
}

use crate::error::Result;
use crate::model::YearMonthCount;
use crate::util::write_output;
use console::style;
use std::fmt::Write as _;
use std::path::Path;

const HEADER: &str = "Commit statistics by year and month:";

/// `Year: <Y>, Month: <MM>, Commits: <N>` per bucket, ascending.
pub fn bucket_lines(buckets: &YearMonthCount) -> Vec<String> {
    buckets
        .iter()
        .flat_map(|(year, months)| {
            months
                .iter()
                .map(move |(month, count)| format!("Year: {year}, Month: {month:02}, Commits: {count}"))
        })
        .collect()
}

pub fn print_statistics(buckets: &YearMonthCount) {
    if buckets.is_empty() {
        println!("No commits found");
        return;
    }
    println!("{}", style(HEADER).bold());
    for line in bucket_lines(buckets) {
        println!("{line}");
    }
}

pub fn render_json(buckets: &YearMonthCount) -> Result<String> {
    Ok(serde_json::to_string_pretty(buckets)?)
}

pub fn render_text(buckets: &YearMonthCount) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{HEADER}");
    for line in bucket_lines(buckets) {
        let _ = writeln!(out, "{line}");
    }
    out
}

pub fn output_json(buckets: &YearMonthCount, dest: Option<&Path>) -> Result<()> {
    write_output(dest, &render_json(buckets)?)
}

pub fn output_text(buckets: &YearMonthCount, dest: &Path) -> Result<()> {
    write_output(Some(dest), &render_text(buckets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn sample() -> YearMonthCount {
        BTreeMap::from([
            (2024, BTreeMap::from([(3, 1)])),
            (2023, BTreeMap::from([(11, 4), (2, 1)])),
        ])
    }

    #[test]
    fn lines_are_sorted_and_padded() {
        assert_eq!(
            bucket_lines(&sample()),
            vec![
                "Year: 2023, Month: 02, Commits: 1",
                "Year: 2023, Month: 11, Commits: 4",
                "Year: 2024, Month: 03, Commits: 1",
            ]
        );
    }

    #[test]
    fn json_uses_year_and_month_keys() {
        let v: serde_json::Value = serde_json::from_str(&render_json(&sample()).unwrap()).unwrap();
        assert_eq!(v["2023"]["11"], 4);
        assert_eq!(v["2024"]["3"], 1);
    }

    #[test]
    fn text_starts_with_header() {
        let text = render_text(&sample());
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(HEADER));
        assert_eq!(lines.next(), Some("Year: 2023, Month: 02, Commits: 1"));
    }
}

use crate::error::Result;
use crate::model::BranchMetrics;
use crate::util::write_output;
use console::style;
use std::collections::BTreeMap;
use std::path::Path;

const TOP: usize = 3;

pub fn render_json(per_branch: &BTreeMap<String, BranchMetrics>) -> Result<String> {
    Ok(serde_json::to_string_pretty(per_branch)?)
}

pub fn output_json(per_branch: &BTreeMap<String, BranchMetrics>, dest: Option<&Path>) -> Result<()> {
    write_output(dest, &render_json(per_branch)?)
}

pub fn print_summary(per_branch: &BTreeMap<String, BranchMetrics>) {
    println!("{}", style("Repository Analysis Summary (By Branch)").bold());
    println!("{}", "─".repeat(50));
    if per_branch.is_empty() {
        println!("No branches analyzed");
        return;
    }

    for (branch, m) in per_branch {
        println!("\nBranch: {}", style(branch).bold());
        println!("  Total Commits: {}", style(m.total_commits).cyan());
        println!("  Total Authors: {}", style(m.authors.len()).yellow());
        println!("  Lines Added: {}", style(m.lines_added).green());
        println!("  Lines Removed: {}", style(m.lines_removed).red());

        println!("  Top Contributors:");
        for (author, count) in m.top_authors(TOP) {
            println!("    {author}: {count} commits");
        }
        println!("  Most Changed Files:");
        for (file, count) in m.top_files(TOP) {
            println!("    {file}: {count} changes");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_has_the_five_fields_per_branch() {
        let mut m = BranchMetrics::default();
        m.total_commits = 2;
        m.authors.insert("Alice".into(), 2);
        m.file_changes.insert("src/lib.rs".into(), 1);
        m.lines_added = 7;
        m.lines_removed = 1;
        let per_branch = BTreeMap::from([("main".to_string(), m)]);

        let v: serde_json::Value = serde_json::from_str(&render_json(&per_branch).unwrap()).unwrap();
        let main = &v["main"];
        assert_eq!(main["total_commits"], 2);
        assert_eq!(main["authors"]["Alice"], 2);
        assert_eq!(main["file_changes"]["src/lib.rs"], 1);
        assert_eq!(main["lines_added"], 7);
        assert_eq!(main["lines_removed"], 1);
        assert_eq!(main.as_object().unwrap().len(), 5);
    }
}

//! Differences between two reports

use std::collections::HashSet;
use std::fmt;

use tracing::debug;
use xml_test_harness::{Category, Report};

/// Change in the number of test cases in one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountChange {
    pub category: Category,
    pub old: usize,
    pub new: usize,
}

impl CountChange {
    pub fn delta(&self) -> i64 {
        self.new as i64 - self.old as i64
    }
}

impl fmt::Display for CountChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status {}: ", self.category)?;
        match self.delta() {
            0 => write!(f, "no change"),
            d if d > 0 => write!(f, "+{d}"),
            d => write!(f, "{d}"),
        }
    }
}

/// Test cases that left one category for another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Moves {
    pub from: Category,
    pub to: Category,
    pub names: Vec<String>,
}

/// Result of comparing an old report with a new one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDiff {
    /// One entry per category, in report order
    pub changes: Vec<CountChange>,
    /// Grouped by (from, to) in order of first appearance
    pub moves: Vec<Moves>,
    /// Names that left a category and appear nowhere in the new report
    pub vanished: Vec<(String, Category)>,
}

impl ReportDiff {
    /// Every move as `(name, from, to)`
    pub fn moved(&self) -> impl Iterator<Item = (&str, Category, Category)> + '_ {
        self.moves
            .iter()
            .flat_map(|group| group.names.iter().map(move |name| (name.as_str(), group.from, group.to)))
    }
}

impl fmt::Display for ReportDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary of differences:")?;
        for change in &self.changes {
            writeln!(f, "    {change}")?;
        }
        writeln!(f)?;
        for (name, from, to) in self.moved() {
            writeln!(f, "{name} was {from}, is now {to}")?;
        }
        Ok(())
    }
}

/// Compare category counts and find test cases that changed category.
///
/// The bookkeeping counts `read`, `ignored`, `run` and `skipped` are not
/// compared.
pub fn compare_reports(old: &Report, new: &Report) -> ReportDiff {
    let changes = Category::ALL
        .into_iter()
        .map(|category| CountChange {
            category,
            old: old.summary.count(category),
            new: new.summary.count(category),
        })
        .collect();

    let new_members: Vec<(Category, HashSet<&str>)> = Category::ALL
        .into_iter()
        .map(|category| {
            let names = new.names(category).iter().map(String::as_str).collect();
            (category, names)
        })
        .collect();

    let mut moves: Vec<Moves> = Vec::new();
    let mut vanished = Vec::new();

    for (from, still_there) in &new_members {
        for name in old.names(*from) {
            if still_there.contains(name.as_str()) {
                continue;
            }

            let mut found = false;
            for (to, members) in &new_members {
                if !members.contains(name.as_str()) {
                    continue;
                }
                found = true;
                match moves.iter_mut().find(|group| group.from == *from && group.to == *to) {
                    Some(group) => group.names.push(name.clone()),
                    None => moves.push(Moves {
                        from: *from,
                        to: *to,
                        names: vec![name.clone()],
                    }),
                }
            }

            if !found {
                debug!(test_case = %name, category = %from, "test case is not in the new report");
                vanished.push((name.clone(), *from));
            }
        }
    }

    ReportDiff {
        changes,
        moves,
        vanished,
    }
}

//! Output formatting functionality
//!
//! Text output is one block per component followed by a summary line. JSON
//! output is the serialized `ComponentResult` list.

use crate::error::Result;
use crate::models::result::{ComponentResult, ReachabilityStatus, WarningSeverity};
use ansi_term::Colour::{Cyan, Green, Purple, Red, Yellow};
use ansi_term::Style;

/// Locations listed per component unless verbose
const MAX_LOCATIONS: usize = 3;

/// Counts of components per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub reachable: usize,
    pub imported: usize,
    pub indirect: usize,
    pub not_reachable: usize,
    pub unknown: usize,
    /// Components with an affected function called
    pub vulnerable_reachable: usize,
}

impl StatusCounts {
    pub fn from_results(results: &[ComponentResult]) -> Self {
        let mut counts = Self::default();
        for result in results {
            match result.status {
                ReachabilityStatus::Reachable => counts.reachable += 1,
                ReachabilityStatus::Imported => counts.imported += 1,
                ReachabilityStatus::Indirect => counts.indirect += 1,
                ReachabilityStatus::NotReachable => counts.not_reachable += 1,
                ReachabilityStatus::Unknown => counts.unknown += 1,
            }
            if result.is_vulnerable_reachable() {
                counts.vulnerable_reachable += 1;
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.reachable + self.imported + self.indirect + self.not_reachable + self.unknown
    }
}

fn paint_status(status: ReachabilityStatus, use_colors: bool) -> String {
    let label = status.to_string().to_uppercase();
    if !use_colors {
        return label;
    }
    let colour = match status {
        ReachabilityStatus::Reachable => Red,
        ReachabilityStatus::Imported => Yellow,
        ReachabilityStatus::Indirect => Purple,
        ReachabilityStatus::NotReachable => Green,
        ReachabilityStatus::Unknown => Cyan,
    };
    colour.bold().paint(label).to_string()
}

fn dimmed(text: String, use_colors: bool) -> String {
    if use_colors {
        Style::new().dimmed().paint(text).to_string()
    } else {
        text
    }
}

/// Format one component result as text
pub fn format_component_text(result: &ComponentResult, use_colors: bool, verbose: bool) -> String {
    let mut output = String::new();
    let component = &result.component;

    let name = if use_colors {
        Style::new().bold().paint(component.name.as_str()).to_string()
    } else {
        component.name.clone()
    };
    let version = if component.version.is_empty() {
        String::new()
    } else {
        format!(" {}", dimmed(component.version.clone(), use_colors))
    };
    output.push_str(&format!(
        "{}{}  {} ({})\n",
        name,
        version,
        paint_status(result.status, use_colors),
        result.confidence
    ));

    let usage = &result.usage;
    if !usage.used_members.is_empty() {
        output.push_str(&format!("  used: {}\n", usage.used_members.join(", ")));
    }
    if !usage.referenced_members.is_empty() {
        output.push_str(&format!("  referenced: {}\n", usage.referenced_members.join(", ")));
    }
    if !usage.vulnerable_functions_called.is_empty() {
        let line = format!(
            "  vulnerable functions called: {}",
            usage.vulnerable_functions_called.join(", ")
        );
        if use_colors {
            output.push_str(&format!("{}\n", Red.bold().paint(line)));
        } else {
            output.push_str(&format!("{}\n", line));
        }
    }
    if verbose && !usage.import_styles.is_empty() {
        let styles: Vec<&str> = usage.import_styles.iter().map(|k| k.as_str()).collect();
        output.push_str(&format!("  import styles: {}\n", styles.join(", ")));
    }

    let shown = if verbose { usage.locations.len() } else { MAX_LOCATIONS };
    for location in usage.locations.iter().take(shown) {
        output.push_str(&format!("  at {}\n", dimmed(location.to_string(), use_colors)));
    }
    if usage.locations.len() > shown {
        output.push_str(&format!("  ... and {} more\n", usage.locations.len() - shown));
    }

    for warning in &result.warnings {
        if warning.severity == WarningSeverity::Info && !verbose {
            continue;
        }
        let code = format!("{}[{}]", warning.severity, warning.code);
        let code = if use_colors && warning.severity == WarningSeverity::Warning {
            Yellow.paint(code).to_string()
        } else {
            code
        };
        match &warning.location {
            Some(location) => output.push_str(&format!(
                "  {}: {} {}\n",
                code,
                warning.message,
                dimmed(format!("({})", location), use_colors)
            )),
            None => output.push_str(&format!("  {}: {}\n", code, warning.message)),
        }
    }

    for note in &result.notes {
        output.push_str(&format!("  note: {}\n", note));
    }

    output
}

/// One-line summary of a run
pub fn format_summary_line(results: &[ComponentResult], use_colors: bool) -> String {
    let counts = StatusCounts::from_results(results);
    let mut line = format!(
        "{} components: {} reachable, {} imported, {} indirect, {} not reachable, {} unknown",
        counts.total(),
        counts.reachable,
        counts.imported,
        counts.indirect,
        counts.not_reachable,
        counts.unknown
    );
    if counts.vulnerable_reachable > 0 {
        let vulnerable = format!("; {} call vulnerable functions", counts.vulnerable_reachable);
        if use_colors {
            line.push_str(&Red.bold().paint(vulnerable).to_string());
        } else {
            line.push_str(&vulnerable);
        }
    }
    line
}

/// Format every result as text, followed by the summary
pub fn format_results_text(results: &[ComponentResult], use_colors: bool, verbose: bool) -> String {
    let mut output = String::new();
    for result in results {
        output.push_str(&format_component_text(result, use_colors, verbose));
        output.push('\n');
    }
    output.push_str(&format_summary_line(results, use_colors));
    output.push('\n');
    output
}

/// `name status confidence`, one line per component
pub fn format_results_compact(results: &[ComponentResult]) -> String {
    results
        .iter()
        .map(|r| format!("{} {} {}\n", r.component.name, r.status, r.confidence))
        .collect()
}

/// Format results as JSON
pub fn format_results_json(results: &[ComponentResult], pretty: bool) -> Result<String> {
    let mut json = if pretty {
        serde_json::to_string_pretty(results)?
    } else {
        serde_json::to_string(results)?
    };
    json.push('\n');
    Ok(json)
}

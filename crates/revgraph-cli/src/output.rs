//! Terminal output formatting.

use colored::Colorize;
use revgraph_graph::{ExercisePlan, ParamValue, Record, RunReport};
use unicode_width::UnicodeWidthStr;

/// Widest cell printed before truncation.
const MAX_CELL_WIDTH: usize = 48;

/// Print a built statement and its parameters (dry run).
pub fn print_plan(name: &str, plan: &ExercisePlan) {
    println!("{} {}", "Statement for".bold(), name.cyan());
    println!(
        "  {} nodes, {} relationships, {} parameters",
        plan.declared.nodes.to_string().cyan(),
        plan.declared.relationships.to_string().cyan(),
        plan.load.params.len()
    );
    println!("{}", "─".repeat(50));
    println!("{}", plan.load.text);
    println!("{}", "─".repeat(50));

    for (key, value) in &plan.load.params {
        let shown = match value {
            ParamValue::Str(s) => format!("{:?}", s),
            ParamValue::Int(n) => n.to_string(),
            ParamValue::Float(f) => f.to_string(),
        };
        println!("  {} = {}", format!("${}", key).dimmed(), shown);
    }

    if let Some(follow_up) = &plan.follow_up {
        println!("\n{}", "Follow-up:".bold());
        println!("{}", follow_up.text);
    }
}

/// Print the outcome of a run.
pub fn print_report(report: &RunReport) {
    if !report.after_reset.is_empty() {
        println!(
            "{} store still held {} nodes after reset",
            "!".yellow().bold(),
            report.after_reset.nodes
        );
    }

    println!("\n{}", "Loaded graph".bold());
    print_records(&report.verification);

    println!(
        "\n  Nodes:         {} (declared {})",
        report.loaded.nodes.to_string().cyan(),
        report.declared.nodes
    );
    println!(
        "  Relationships: {} (declared {})",
        report.loaded.relationships.to_string().cyan(),
        report.declared.relationships
    );

    match &report.follow_up {
        Some(records) => {
            println!("\n{}", "Follow-up results".bold());
            print_records(records);
        }
        None => println!("\n{} Data inserted, check it in Neo4j", "✓".green().bold()),
    }
}

/// Print records as an aligned table, one column per field.
pub fn print_records(records: &[Record]) {
    if records.is_empty() {
        println!("{}", "  No records.".dimmed());
        return;
    }

    let mut columns: Vec<&str> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            columns
                .iter()
                .map(|c| truncate(&r.get(*c).map(cell).unwrap_or_default(), MAX_CELL_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            rows.iter()
                .map(|r| UnicodeWidthStr::width(r[i].as_str()))
                .chain(std::iter::once(UnicodeWidthStr::width(*c)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = columns.iter().zip(&widths).map(|(c, w)| pad_right(c, *w)).collect();
    println!("  {}", header.join("  ").bold());
    println!("  {}", "─".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));

    for row in &rows {
        let line: Vec<String> = row.iter().zip(&widths).map(|(v, w)| pad_right(v, *w)).collect();
        println!("  {}", line.join("  "));
    }
}

fn cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}

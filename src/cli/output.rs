//! Output formatting utilities

use crate::application::PendingBatch;
use crate::domain::{Category, LogEntry, Session, ValidationReport};

/// Format a draft batch for display, one line per entry with its index
pub fn format_entry_list(entries: &[LogEntry]) -> String {
    if entries.is_empty() {
        return "No entries in this batch".to_string();
    }

    let mut output = String::new();
    for (index, entry) in entries.iter().enumerate() {
        output.push_str(&format!(
            "[{}] {} - {} ({}h)  {} / {} / {}  qty {}  job {}",
            index,
            entry.start_time,
            entry.end_time,
            entry.duration,
            entry.operator,
            entry.machine,
            entry.operation,
            entry.qty,
            entry.job_card_no,
        ));
        if let Some(sr_no) = entry.sr_no {
            output.push_str(&format!("  sr {}", sr_no));
        }
        output.push('\n');
        output.push_str(&format!("    {}\n", entry.description));
        for remark in [&entry.remark1, &entry.remark2] {
            if !remark.is_empty() {
                output.push_str(&format!("    note: {}\n", remark));
            }
        }
    }
    output
}

/// Format unsubmitted batches
pub fn format_pending_list(batches: &[PendingBatch]) -> String {
    if batches.is_empty() {
        return "No pending batches".to_string();
    }

    let mut output = String::new();
    for batch in batches {
        let noun = if batch.count == 1 { "entry" } else { "entries" };
        output.push_str(&format!("{}  {} {}\n", batch.key, batch.count, noun));
    }
    output
}

/// One line per failed rule, in rule order
pub fn format_validation_report(report: &ValidationReport) -> String {
    report
        .errors
        .iter()
        .map(|e| format!("  {}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_options(category: Category, options: &[String]) -> String {
    if options.is_empty() {
        return format!("No {} options available", category);
    }

    let mut output = String::new();
    for option in options {
        output.push_str(option);
        output.push('\n');
    }
    output
}

/// Session overview. `batch_len` is `None` until both date and shift are set.
pub fn format_status(session: &Session, batch_len: Option<usize>, pending: usize) -> String {
    let date = session
        .date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "(not set)".to_string());
    let shift = session
        .shift
        .map(|s| s.to_string())
        .unwrap_or_else(|| "(not set)".to_string());

    let mut output = format!(
        "Date:   {}\nShift:  {}\nWindow: {} - {} ({}h)\n",
        date,
        shift,
        session.window.start,
        session.window.end,
        session.window.duration(),
    );
    if let Some(len) = batch_len {
        output.push_str(&format!("Draft:  {} entries\n", len));
    }
    output.push_str(&format!("Pending batches: {}\n", pending));
    output
}

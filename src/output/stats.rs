//! Console rendering of batch results
//!
//! The CLI prints these; nothing is written to disk.

use crate::state::{BatchResult, ItemOutcome};
use std::fmt::Write;

/// Renders the statistics block of a batch
pub fn format_statistics(result: &BatchResult) -> String {
    let stats = &result.stats;
    let mut out = String::new();

    let _ = writeln!(out, "=== Batch {} Statistics ===\n", result.batch_index);

    let _ = writeln!(out, "Overview:");
    let _ = writeln!(
        out,
        "  Identifiers: {} - {}",
        result.first_identifier,
        result.first_identifier + stats.total.saturating_sub(1)
    );
    let _ = writeln!(out, "  Started: {}", result.started_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "  Completed: {}", result.completed_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(
        out,
        "  Elapsed: {:.1}s ({:.2} /s)",
        result.elapsed.as_secs_f64(),
        result.items_per_second()
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "Outcomes:");
    let _ = writeln!(out, "  Found: {} ({:.1}%)", stats.found, stats.found_rate());
    let _ = writeln!(out, "  Not found: {}", stats.not_found);
    let _ = writeln!(out, "  Failed: {} ({:.1}%)", stats.failed, stats.failure_rate());

    if stats.failed > 0 {
        let _ = writeln!(out, "    Network: {}", stats.failed_network);
        let _ = writeln!(out, "    Page shape: {}", stats.failed_page_shape);
        let _ = writeln!(out, "    Cancelled: {}", stats.failed_cancelled);
    }

    out
}

/// Renders one line per found record, in identifier order
pub fn format_records(result: &BatchResult) -> String {
    let mut out = String::new();

    for record in result.records() {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}",
            record.identifier,
            record.folio,
            record.student_name,
            record.institution,
            record.period,
            record.grade_average
        );
    }

    out
}

/// Renders a single lookup
pub fn format_outcome(outcome: &ItemOutcome) -> String {
    match outcome.record() {
        Some(record) => format!(
            "Certificate {}\n  Folio: {}\n  Student: {}\n  Institution: {} ({})\n  RVOE: {}\n  Enrollment: {}\n  Average: {}\n  Period: {}\n  Type: {}\n",
            record.identifier,
            record.folio,
            record.student_name,
            record.institution,
            record.work_key,
            record.rvoe,
            record.enrollment,
            record.grade_average,
            record.period,
            record.certificate_type
        ),
        None => format!("{}\n", outcome),
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(result: &BatchResult) {
    print!("{}", format_statistics(result));
}

//! Plain-text rendering of tables, the page bar and session events.

use std::fmt::{self, Write as _};

use pixelforge_core::list::PageMarker;
use pixelforge_core::{
    BulkOperation, BulkReport, Category, Event, ListItem, PaginationState, Product,
    SelectionState, User,
};

/// Columns a row contributes to the table.
pub trait TableRow: ListItem {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

impl TableRow for Product {
    const HEADERS: &'static [&'static str] = &["ID", "Title", "Category", "Price", "Status"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.category_name.clone(),
            format!("${:.2}", self.price),
            if self.is_locked { "locked" } else { "active" }.to_string(),
        ]
    }
}

impl TableRow for Category {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Description", "Status"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.description.clone().unwrap_or_default(),
            if self.is_active { "active" } else { "inactive" }.to_string(),
        ]
    }
}

impl TableRow for User {
    const HEADERS: &'static [&'static str] = &["ID", "Email", "Role", "Status"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.email.clone(),
            self.role.to_string(),
            if self.is_active() { "active" } else { "inactive" }.to_string(),
        ]
    }
}

fn checkbox(state: SelectionState) -> &'static str {
    match state {
        SelectionState::None => "[ ]",
        SelectionState::Partial => "[-]",
        SelectionState::All => "[x]",
    }
}

/// Renders `rows` with a selection column and aligned cells.
pub fn render_table<T, F>(rows: &[T], header_state: SelectionState, is_selected: F) -> String
where
    T: TableRow,
    F: Fn(&T) -> bool,
{
    let cells: Vec<Vec<String>> = rows.iter().map(TableRow::cells).collect();
    let widths: Vec<usize> = T::HEADERS
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = T::HEADERS.iter().map(|h| h.to_string()).collect();
    push_line(&mut out, checkbox(header_state), &header, &widths);
    for (row, row_cells) in rows.iter().zip(&cells) {
        let mark = if is_selected(row) { "[x]" } else { "[ ]" };
        push_line(&mut out, mark, row_cells, &widths);
    }
    if rows.is_empty() {
        out.push_str("    (no rows)\n");
    }
    out
}

fn push_line(out: &mut String, mark: &str, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{mark} {}", padded.join("  ").trim_end());
}

/// `"‹ 1 ... 4 [5] 6 ... 10 ›  49-60 of 120"`.
pub fn render_page_bar(pagination: &PaginationState) -> String {
    let window = pagination.window();
    let current = pagination.current_page();
    let markers: Vec<String> = pagination
        .page_numbers()
        .into_iter()
        .map(|marker| match marker {
            PageMarker::Page(n) if n == current => format!("[{n}]"),
            other => other.to_string(),
        })
        .collect();

    let prev = if window.has_prev { "‹" } else { " " };
    let next = if window.has_next { "›" } else { " " };
    if markers.is_empty() {
        return pagination.range_label();
    }
    format!(
        "{prev} {} {next}  {}",
        markers.join(" "),
        pagination.range_label()
    )
}

/// One-line description of an event, or `None` for events the table
/// redraw already shows.
pub fn render_event<Id: fmt::Display>(event: &Event<Id>) -> Option<String> {
    match event {
        Event::PageLoaded { .. } | Event::SelectionChanged { .. } => None,
        Event::FetchFailed { error } => Some(format!("error: {error}")),
        Event::PageIgnored { requested } => Some(format!("page {requested} does not exist")),
        Event::ConfirmationRequired { prompt, .. } => Some(format!("{prompt}\nContinue? (yes/no)")),
        Event::BulkCancelled => Some("cancelled".to_string()),
        Event::BulkCompleted(report) => Some(format!("{}: {}", report.label, report.summary())),
        Event::BulkPartial(report) => Some(render_failures(report)),
        Event::BulkFailed {
            operation_id,
            reason,
        } => Some(format!("{operation_id} failed: {reason}")),
    }
}

fn render_failures<Id: fmt::Display>(report: &BulkReport<Id>) -> String {
    let mut out = format!("{}: {}", report.label, report.summary());
    for (id, reason) in &report.failed {
        let _ = write!(out, "\n  {id}: {reason}");
    }
    out
}

pub fn render_operations<Id>(operations: &[&BulkOperation<Id>]) -> String {
    if operations.is_empty() {
        return "no bulk operations".to_string();
    }
    operations
        .iter()
        .map(|op| {
            let flag = if op.destructive { " (destructive)" } else { "" };
            format!("  {:<12} {}{flag}  {}", op.id, op.label, op.description)
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// Documents tab: table of scanned documents with compliance results, and
// a details panel for the selected document.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::api::types::Document;
use crate::protocol::FetchStatus;
use crate::tui::layout::split_documents;
use crate::tui::ViewState;

/// How many violations to preview in the table row.
const VIOLATION_PREVIEW: usize = 2;

/// Render the documents panel: list on the left, details on the right.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let (list_area, details_area) = split_documents(area);
    render_table(frame, list_area, state);
    render_details(frame, details_area, state.selected_document());
}

fn render_table(frame: &mut Frame, area: Rect, state: &ViewState) {
    let title = format!(
        " Documents ({}) ",
        state.documents_pagination.range_label()
    );

    match &state.documents_status {
        FetchStatus::Loading => {
            let paragraph = Paragraph::new("Loading documents...")
                .block(Block::default().borders(Borders::ALL).title(title));
            frame.render_widget(paragraph, area);
            return;
        }
        FetchStatus::Failed(message) => {
            let paragraph = Paragraph::new(format!("Failed to load documents: {message}"))
                .style(Style::default().fg(Color::Red))
                .block(Block::default().borders(Borders::ALL).title(title));
            frame.render_widget(paragraph, area);
            return;
        }
        FetchStatus::Idle | FetchStatus::Loaded => {}
    }

    if state.documents.is_empty() {
        let paragraph = Paragraph::new("No documents scanned yet. Upload one from tab 2.")
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Title"),
        Cell::from("Policy"),
        Cell::from("Score"),
        Cell::from("Status"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = state
        .documents
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let mut style = Style::default();
            if i == state.document_cursor {
                style = style.fg(Color::Black).bg(Color::Cyan);
            }
            if state.deleting.contains(&d.document_id) {
                style = style.add_modifier(Modifier::DIM);
            }
            let preview = violation_preview(d);
            let mut title_cell = Text::from(d.title.clone());
            let mut height = 1;
            if !preview.is_empty() {
                title_cell.push_line(Line::from(Span::styled(
                    preview,
                    Style::default().fg(Color::Red),
                )));
                height = 2;
            }
            Row::new(vec![
                Cell::from(title_cell),
                Cell::from(d.policy_title.clone()),
                Cell::from(format!("{}%", d.compliance_percentage)),
                Cell::from(status_label(d)),
            ])
            .height(height)
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(18),
        Constraint::Min(12),
        Constraint::Length(6),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(table, area);
}

fn render_details(frame: &mut Frame, area: Rect, document: Option<&Document>) {
    let block = Block::default().borders(Borders::ALL).title(" Details ");

    let Some(d) = document else {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Title: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(d.title.clone()),
        ]),
        Line::from(vec![
            Span::styled("Policy: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(d.policy_title.clone()),
        ]),
        Line::from(vec![
            Span::styled(
                "Compliance: ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{}%", d.compliance_percentage),
                Style::default().fg(score_color(d.compliance_percentage)),
            ),
        ]),
        Line::from(vec![
            Span::styled("Status: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                status_label(d),
                Style::default().fg(if d.is_compliant {
                    Color::Green
                } else {
                    Color::Red
                }),
            ),
        ]),
    ];

    if d.is_human_review_required {
        lines.push(Line::from(Span::styled(
            "Human review required",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Violations ({})", d.violations.len()),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if d.violations.is_empty() {
        lines.push(Line::from(Span::styled(
            "None",
            Style::default().fg(Color::Green),
        )));
    } else {
        for violation in &d.violations {
            lines.push(Line::from(Span::styled(
                format!("- {violation}"),
                Style::default().fg(Color::Red),
            )));
        }
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn status_label(d: &Document) -> &'static str {
    if d.is_human_review_required {
        "Needs Review"
    } else if d.is_compliant {
        "Compliant"
    } else {
        "Non-compliant"
    }
}

fn score_color(percentage: u32) -> Color {
    if percentage >= 80 {
        Color::Green
    } else if percentage >= 50 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Preview of the first violations for the table rows.
fn violation_preview(d: &Document) -> String {
    if d.violations.is_empty() {
        return String::new();
    }
    let shown: Vec<&str> = d
        .violations
        .iter()
        .take(VIOLATION_PREVIEW)
        .map(|s| s.as_str())
        .collect();
    let mut preview = shown.join("; ");
    if d.violations.len() > VIOLATION_PREVIEW {
        preview.push_str(&format!(" (+{} more)", d.violations.len() - VIOLATION_PREVIEW));
    }
    preview
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn document(id: &str, compliant: bool, violations: Vec<&str>) -> Document {
        Document {
            document_id: id.to_string(),
            title: "Vendor Contract".to_string(),
            policy_title: "GDPR".to_string(),
            path: String::new(),
            extension: ".pdf".to_string(),
            violations: violations.into_iter().map(String::from).collect(),
            is_compliant: compliant,
            is_human_review_required: false,
            compliance_percentage: if compliant { 95 } else { 40 },
        }
    }

    fn render_state(state: &ViewState) {
        rendered_text(state);
    }

    fn rendered_text(state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn status_label_variants() {
        let compliant = document("d1", true, vec![]);
        assert_eq!(status_label(&compliant), "Compliant");

        let failing = document("d2", false, vec!["missing consent clause"]);
        assert_eq!(status_label(&failing), "Non-compliant");

        let mut review = document("d3", false, vec![]);
        review.is_human_review_required = true;
        assert_eq!(status_label(&review), "Needs Review");
    }

    #[test]
    fn score_color_thresholds() {
        assert_eq!(score_color(100), Color::Green);
        assert_eq!(score_color(80), Color::Green);
        assert_eq!(score_color(79), Color::Yellow);
        assert_eq!(score_color(50), Color::Yellow);
        assert_eq!(score_color(49), Color::Red);
        assert_eq!(score_color(0), Color::Red);
    }

    #[test]
    fn violation_preview_truncates() {
        let d = document("d1", false, vec!["a", "b", "c", "d"]);
        assert_eq!(violation_preview(&d), "a; b (+2 more)");
    }

    #[test]
    fn violation_preview_short_lists() {
        assert_eq!(violation_preview(&document("d1", true, vec![])), "");
        assert_eq!(violation_preview(&document("d2", false, vec!["a"])), "a");
        assert_eq!(
            violation_preview(&document("d3", false, vec!["a", "b"])),
            "a; b"
        );
    }

    #[test]
    fn table_rows_show_violation_excerpts_with_overflow() {
        let mut state = ViewState::default();
        state.documents = vec![document("d1", false, vec!["v1", "v2", "v3", "v4"])];
        state.documents_status = FetchStatus::Loaded;

        // "; "-joined excerpts only appear in the table row, never in the
        // details panel, which lists violations one per line.
        let text = rendered_text(&state);
        assert!(
            text.contains("v1; v2 (+2 more)"),
            "excerpt line missing from table"
        );
    }

    #[test]
    fn render_empty_loading_failed() {
        let mut state = ViewState::default();
        render_state(&state);
        state.documents_status = FetchStatus::Loading;
        render_state(&state);
        state.documents_status = FetchStatus::Failed("timeout".to_string());
        render_state(&state);
    }

    #[test]
    fn render_with_documents() {
        let mut state = ViewState::default();
        let mut review = document("d3", false, vec!["clause 4 ambiguous"]);
        review.is_human_review_required = true;
        state.documents = vec![
            document("d1", true, vec![]),
            document("d2", false, vec!["missing consent clause", "no DPO named"]),
            review,
        ];
        state.documents_status = FetchStatus::Loaded;
        for cursor in 0..3 {
            state.document_cursor = cursor;
            render_state(&state);
        }
    }
}

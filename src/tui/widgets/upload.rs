// Upload tab: the document submission form. A file path field, a policy
// selector fed from the loaded policy list, and a submit hint gated on
// completeness.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::tui::forms::{extension_allowed, UploadFocus};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // file path field
            Constraint::Min(6),    // policy selector
            Constraint::Length(4), // submit hint / errors
        ])
        .split(area);

    render_path_field(frame, sections[0], state);
    render_policy_selector(frame, sections[1], state);
    render_footer(frame, sections[2], state);
}

fn render_path_field(frame: &mut Frame, area: Rect, state: &ViewState) {
    let form = &state.upload_form;
    let focused = form.focus == UploadFocus::FilePath;

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let title = if form.editing_path {
        " File (typing, Enter to finish) "
    } else {
        " File (i to edit) "
    };

    let content = if form.path.is_empty() {
        Span::styled(
            format!(
                "path to a {} file, up to {} MB",
                state.accepted_extensions.join("/"),
                state.max_size_mb
            ),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(form.path.clone())
    };

    let paragraph = Paragraph::new(Line::from(content)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    frame.render_widget(paragraph, area);
}

fn render_policy_selector(frame: &mut Frame, area: Rect, state: &ViewState) {
    let form = &state.upload_form;
    let focused = form.focus == UploadFocus::PolicySelect;

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Scan against policy (Up/Down to choose) ");

    if state.policies.is_empty() {
        let paragraph = Paragraph::new("No policies available. Create one on tab 1 first.")
            .style(Style::default().fg(Color::Gray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = state
        .policies
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let marker = if form.policy_index == Some(i) {
                "(x)"
            } else {
                "( )"
            };
            let mut style = Style::default();
            if form.policy_index == Some(i) {
                style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
            }
            ListItem::new(format!("{marker} {} [{}]", p.title, p.category)).style(style)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_footer(frame: &mut Frame, area: Rect, state: &ViewState) {
    let form = &state.upload_form;
    let mut lines = Vec::new();

    if state.uploading {
        lines.push(Line::from(Span::styled(
            "Uploading...",
            Style::default().fg(Color::Yellow),
        )));
    } else if form.can_submit() {
        let path = form.file_path();
        if extension_allowed(&path, &state.accepted_extensions) {
            lines.push(Line::from(Span::styled(
                "Press s to scan",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                format!(
                    "Unsupported file type; accepted: {}",
                    state.accepted_extensions.join(", ")
                ),
                Style::default().fg(Color::Yellow),
            )));
        }
    } else {
        lines.push(Line::from(Span::styled(
            "Select a file and a policy to enable scanning",
            Style::default().fg(Color::DarkGray),
        )));
    }

    if let Some(error) = &state.upload_error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Scan "));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

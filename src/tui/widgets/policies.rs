// Policies tab: table of policy frameworks with the selected policy's
// rules listed below it.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table};
use ratatui::Frame;

use crate::protocol::FetchStatus;
use crate::tui::ViewState;

/// Render the policies panel: table on top, rules of the selected policy
/// below.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_table(frame, sections[0], state);
    render_rules(frame, sections[1], state);
}

fn render_table(frame: &mut Frame, area: Rect, state: &ViewState) {
    let title = format!(
        " Policies ({}) ",
        state.policies_pagination.range_label()
    );

    match &state.policies_status {
        FetchStatus::Loading => {
            let paragraph = Paragraph::new("Loading policies...")
                .block(Block::default().borders(Borders::ALL).title(title));
            frame.render_widget(paragraph, area);
            return;
        }
        FetchStatus::Failed(message) => {
            let paragraph = Paragraph::new(format!("Failed to load policies: {message}"))
                .style(Style::default().fg(Color::Red))
                .block(Block::default().borders(Borders::ALL).title(title));
            frame.render_widget(paragraph, area);
            return;
        }
        FetchStatus::Idle | FetchStatus::Loaded => {}
    }

    if state.policies.is_empty() {
        let paragraph = Paragraph::new("No policies yet. Press n to create one.")
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Title"),
        Cell::from("Category"),
        Cell::from("Rules"),
        Cell::from("Type"),
        Cell::from("Uploaded"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = state
        .policies
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let mut style = Style::default();
            if i == state.policy_cursor {
                style = style.fg(Color::Black).bg(Color::Cyan);
            }
            if state.deleting.contains(&p.policy_id) {
                style = style.add_modifier(Modifier::DIM);
            }
            Row::new(vec![
                Cell::from(p.title.clone()),
                Cell::from(p.category.clone()),
                Cell::from(format!("{}", p.rules.len())),
                Cell::from(p.extension.clone()),
                Cell::from(p.uploaded_at_display()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(14),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(17),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(table, area);
}

fn render_rules(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(policy) = state.selected_policy() else {
        let paragraph = Paragraph::new("")
            .block(Block::default().borders(Borders::ALL).title(" Rules "));
        frame.render_widget(paragraph, area);
        return;
    };

    let title = format!(" Rules: {} ", policy.title);

    if policy.rules.is_empty() {
        let paragraph = Paragraph::new("No rules extracted for this policy.")
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = policy
        .rules
        .iter()
        .enumerate()
        .map(|(i, rule)| {
            let mut style = Style::default();
            if i == state.rule_cursor {
                style = style.fg(Color::Black).bg(Color::Cyan);
            }
            if state.deleting.contains(&rule.rule_id) {
                style = style.add_modifier(Modifier::DIM);
            }
            ListItem::new(format!("{}. {}", i + 1, rule.rule_text)).style(style)
        })
        .collect();

    let list =
        List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Policy, Rule};

    fn render_state(state: &ViewState) {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
    }

    fn policy(id: &str, rule_count: usize) -> Policy {
        Policy {
            policy_id: id.to_string(),
            title: "GDPR Compliance".to_string(),
            category: "Privacy".to_string(),
            extension: ".pdf".to_string(),
            rules: (0..rule_count)
                .map(|i| Rule {
                    rule_id: format!("r{i}"),
                    rule_text: format!("Rule number {i}"),
                })
                .collect(),
            uploaded_at: "2026-08-01T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn render_empty_state() {
        render_state(&ViewState::default());
    }

    #[test]
    fn render_loading_state() {
        let mut state = ViewState::default();
        state.policies_status = FetchStatus::Loading;
        render_state(&state);
    }

    #[test]
    fn render_failed_state() {
        let mut state = ViewState::default();
        state.policies_status = FetchStatus::Failed("connection refused".to_string());
        render_state(&state);
    }

    #[test]
    fn render_with_policies_and_rules() {
        let mut state = ViewState::default();
        state.policies = vec![policy("p1", 3), policy("p2", 0)];
        state.policies_status = FetchStatus::Loaded;
        state.policy_cursor = 0;
        state.rule_cursor = 2;
        render_state(&state);

        state.policy_cursor = 1; // policy with no rules
        state.rule_cursor = 0;
        render_state(&state);
    }

    #[test]
    fn render_with_delete_in_flight() {
        let mut state = ViewState::default();
        state.policies = vec![policy("p1", 2)];
        state.deleting.insert("p1".to_string());
        state.deleting.insert("r0".to_string());
        render_state(&state);
    }
}

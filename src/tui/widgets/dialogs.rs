// Modal dialogs drawn over the dashboard: API key entry, the rate-limit
// prompt, delete confirmations, the new-policy form, the rule editor, and
// quit confirmation.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::forms::PolicyFocus;
use crate::tui::layout::centered_rect;
use crate::tui::{Mode, ViewState};

/// Render the dialog for the current mode, if any.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    match &state.mode {
        Mode::Normal => {}
        Mode::KeyEntry { buffer } => render_key_entry(frame, area, buffer),
        Mode::RateLimited { message, buffer } => {
            render_rate_limited(frame, area, message, buffer)
        }
        Mode::PolicyForm => render_policy_form(frame, area, state),
        Mode::RuleEdit { buffer, .. } => render_rule_edit(frame, area, buffer),
        Mode::ConfirmDeletePolicy { title, .. } => render_confirm(
            frame,
            area,
            " Delete policy ",
            &format!("Delete \"{title}\" and all of its rules?"),
        ),
        Mode::ConfirmDeleteDocument { title, .. } => render_confirm(
            frame,
            area,
            " Delete document ",
            &format!("Delete \"{title}\" and its scan results?"),
        ),
        Mode::ConfirmDeleteRule { .. } => {
            render_confirm(frame, area, " Delete rule ", "Delete this rule?")
        }
        Mode::ConfirmQuit => {
            render_confirm(frame, area, " Quit ", "Quit the policy scanner?")
        }
    }
}

fn render_key_entry(frame: &mut Frame, area: Rect, buffer: &str) {
    let dialog = centered_rect(60, 30, area);
    frame.render_widget(Clear, dialog);

    let lines = vec![
        Line::from("Enter your API key. Leave empty and press Enter to remove"),
        Line::from("the stored key and return to demo mode."),
        Line::from(""),
        Line::from(Span::styled(
            format!("> {}", mask_key(buffer)),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: save   Esc: cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" API Key "));
    frame.render_widget(paragraph, dialog);
}

fn render_rate_limited(frame: &mut Frame, area: Rect, message: &str, buffer: &str) {
    let dialog = centered_rect(60, 40, area);
    frame.render_widget(Clear, dialog);

    let lines = vec![
        Line::from(Span::styled(
            "Demo limit reached",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from("Add your own API key to continue:"),
        Line::from(Span::styled(
            format!("> {}", mask_key(buffer)),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: save key   Esc: dismiss",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Rate Limit "),
        );
    frame.render_widget(paragraph, dialog);
}

fn render_policy_form(frame: &mut Frame, area: Rect, state: &ViewState) {
    let dialog = centered_rect(60, 40, area);
    frame.render_widget(Clear, dialog);

    let form = &state.policy_form;
    let field = |label: &str, value: &str, focused: bool| {
        let style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(Span::styled(format!("{label}: {value}"), style))
    };

    let lines = vec![
        field("Title", &form.title, form.focus == PolicyFocus::Title),
        field(
            "Category",
            &form.category,
            form.focus == PolicyFocus::Category,
        ),
        field("File", &form.path, form.focus == PolicyFocus::FilePath),
        Line::from(""),
        Line::from(Span::styled(
            if form.can_submit() {
                "Enter: create   Tab: next field   Esc: cancel"
            } else {
                "All fields required   Tab: next field   Esc: cancel"
            },
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" New Policy "));
    frame.render_widget(paragraph, dialog);
}

fn render_rule_edit(frame: &mut Frame, area: Rect, buffer: &str) {
    let dialog = centered_rect(70, 30, area);
    frame.render_widget(Clear, dialog);

    let lines = vec![
        Line::from(Span::styled(
            format!("> {buffer}"),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: save   Esc: cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Edit Rule "));
    frame.render_widget(paragraph, dialog);
}

fn render_confirm(frame: &mut Frame, area: Rect, title: &str, question: &str) {
    let dialog = centered_rect(50, 25, area);
    frame.render_widget(Clear, dialog);

    let lines = vec![
        Line::from(question.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "y: confirm   n/Esc: cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(title.to_string()),
        );
    frame.render_widget(paragraph, dialog);
}

/// Keys render masked except for a short prefix.
fn mask_key(key: &str) -> String {
    const VISIBLE: usize = 4;
    if key.len() <= VISIBLE {
        key.to_string()
    } else {
        let prefix: String = key.chars().take(VISIBLE).collect();
        format!("{prefix}{}", "*".repeat(key.chars().count() - VISIBLE))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn render_state(state: &ViewState) {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
    }

    #[test]
    fn mask_key_hides_tail() {
        assert_eq!(mask_key(""), "");
        assert_eq!(mask_key("abcd"), "abcd");
        assert_eq!(mask_key("gsk_secret"), "gsk_******");
    }

    #[test]
    fn render_all_dialog_modes() {
        let mut state = ViewState::default();
        let modes = vec![
            Mode::KeyEntry {
                buffer: "gsk_abc".to_string(),
            },
            Mode::RateLimited {
                message: "demo quota exhausted".to_string(),
                buffer: "gsk".to_string(),
            },
            Mode::PolicyForm,
            Mode::RuleEdit {
                policy_id: "p1".to_string(),
                rule_id: "r1".to_string(),
                buffer: "Data must be encrypted".to_string(),
            },
            Mode::ConfirmDeletePolicy {
                policy_id: "p1".to_string(),
                title: "GDPR".to_string(),
            },
            Mode::ConfirmDeleteDocument {
                document_id: "d1".to_string(),
                title: "Contract".to_string(),
            },
            Mode::ConfirmDeleteRule {
                policy_id: "p1".to_string(),
                rule_id: "r1".to_string(),
            },
            Mode::ConfirmQuit,
        ];
        for mode in modes {
            state.mode = mode;
            render_state(&state);
        }
    }

    #[test]
    fn normal_mode_renders_nothing() {
        // Just verifies the no-dialog path does not panic.
        render_state(&ViewState::default());
    }
}

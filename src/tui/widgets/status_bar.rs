// Status bar widget: health indicator, auth mode, server address, and the
// tab strip rendered on the row below.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::{AuthMode, HealthStatus, TabId};
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [health indicator] [server] [auth mode]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    let (dot, dot_color, label) = health_indicator(state.health);
    spans.push(Span::styled(
        format!(" {} ", dot),
        Style::default().fg(dot_color),
    ));
    spans.push(Span::styled(label, Style::default().fg(Color::White)));

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        state.server_label.clone(),
        Style::default().fg(Color::Gray),
    ));

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    let (auth_text, auth_color) = auth_indicator(state.auth);
    spans.push(Span::styled(auth_text, Style::default().fg(auth_color)));

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Render the tab strip.
pub fn render_tabs(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(tab_spans(state.active_tab)))
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Return the health dot character, its color, and a short label.
pub fn health_indicator(status: HealthStatus) -> (&'static str, Color, &'static str) {
    match status {
        HealthStatus::Healthy => ("●", Color::Green, "Online"),
        HealthStatus::Unreachable => ("●", Color::Red, "Offline"),
        HealthStatus::Unknown => ("●", Color::DarkGray, "Checking"),
    }
}

/// Auth mode label and color. Demo mode is the rate-limited state.
pub fn auth_indicator(mode: AuthMode) -> (&'static str, Color) {
    match mode {
        AuthMode::Keyed => ("API Key Active", Color::Green),
        AuthMode::Demo => ("Demo Mode", Color::Yellow),
    }
}

/// Build tab indicator spans with the active tab highlighted.
/// E.g. "[1:Policies] [2:Upload] [3:Documents]"
pub fn tab_spans(active: TabId) -> Vec<Span<'static>> {
    let tabs = [
        (TabId::Policies, "1:Policies"),
        (TabId::Upload, "2:Upload"),
        (TabId::Documents, "3:Documents"),
    ];

    let mut spans = Vec::new();
    spans.push(Span::raw(" "));
    for (tab_id, label) in tabs {
        let style = if tab_id == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}]", label), style));
        spans.push(Span::raw(" "));
    }
    spans
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_indicator_colors() {
        let (_, color, label) = health_indicator(HealthStatus::Healthy);
        assert_eq!(color, Color::Green);
        assert_eq!(label, "Online");

        let (_, color, label) = health_indicator(HealthStatus::Unreachable);
        assert_eq!(color, Color::Red);
        assert_eq!(label, "Offline");

        let (_, color, _) = health_indicator(HealthStatus::Unknown);
        assert_eq!(color, Color::DarkGray);
    }

    #[test]
    fn auth_indicator_demo_vs_keyed() {
        assert_eq!(auth_indicator(AuthMode::Demo), ("Demo Mode", Color::Yellow));
        assert_eq!(
            auth_indicator(AuthMode::Keyed),
            ("API Key Active", Color::Green)
        );
    }

    #[test]
    fn tab_spans_highlight_active() {
        let spans = tab_spans(TabId::Upload);
        // 0=" ", 1=[1:Policies], 2=" ", 3=[2:Upload]
        assert!(spans[3].style.add_modifier.contains(Modifier::BOLD));
        assert!(!spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn tab_spans_contain_all_labels() {
        let spans = tab_spans(TabId::Policies);
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("[1:Policies]"));
        assert!(text.contains("[2:Upload]"));
        assert!(text.contains("[3:Documents]"));
    }

    #[test]
    fn render_does_not_panic_with_defaults() {
        let backend = ratatui::backend::TestBackend::new(80, 2);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| {
                let area = frame.area();
                let top = Rect::new(0, 0, area.width, 1);
                let second = Rect::new(0, 1, area.width, 1);
                render(frame, top, &state);
                render_tabs(frame, second, &state);
            })
            .unwrap();
    }
}

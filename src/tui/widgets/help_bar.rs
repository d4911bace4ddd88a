// Help bar widget: per-tab keyboard shortcut hints.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::TabId;
use crate::tui::{Mode, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        hint_text(state),
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn hint_text(state: &ViewState) -> &'static str {
    if state.mode != Mode::Normal {
        return " Enter:confirm  Esc:cancel";
    }
    match state.active_tab {
        TabId::Policies => {
            " 1-3:Tabs  j/k:Select  [/]:Rule  n:New  e:Edit rule  x:Del rule  d:Delete  h/l:Page  r:Refresh  a:Key  q:Quit"
        }
        TabId::Upload => {
            " 1-3:Tabs  i:File path  Up/Down:Policy  s:Scan  a:Key  q:Quit"
        }
        TabId::Documents => {
            " 1-3:Tabs  j/k:Select  d:Delete  h/l:Page  r:Refresh  a:Key  q:Quit"
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

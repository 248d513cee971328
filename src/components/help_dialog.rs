//! Help dialog component
//!
//! Displays all keyboard shortcuts available on the dashboard.

use crate::action::Action;
use crate::component::Component;
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Help dialog showing all keyboard shortcuts
#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
    theme: Option<Theme>,
}

impl HelpDialog {
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = Some(theme);
    }
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let theme = self.theme.unwrap_or_else(Theme::dark);
        let margin = 4;
        let dialog_area = Rect::new(
            area.x + margin,
            area.y + margin / 2,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin),
        );
        frame.render_widget(Clear, dialog_area);

        let content = build_help_content(&theme);
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;

        // Clamp scroll offset
        let max_scroll = total.saturating_sub(visible_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts ")
                    .title_style(theme.title())
                    .border_style(Style::default().fg(theme.accent))
                    .style(Style::default().bg(theme.bg).fg(theme.fg)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, dialog_area);

        if total > visible_height {
            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(self.scroll_offset);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                dialog_area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

/// Build the help content with all keyboard shortcuts
fn build_help_content(theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let add_section = |lines: &mut Vec<Line<'static>>, title: &str| {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {} ", title),
            Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", "─".repeat(title.len() + 2)),
            Style::default().fg(theme.border),
        )));
    };

    let add_shortcut = |lines: &mut Vec<Line<'static>>, key: &str, description: &str| {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:12}", key), theme.key_hint(theme.accent)),
            Span::styled(description.to_string(), theme.text()),
        ]));
    };

    add_section(&mut lines, "Table");
    add_shortcut(&mut lines, "j / ↓", "Move to next row");
    add_shortcut(&mut lines, "k / ↑", "Move to previous row");
    add_shortcut(&mut lines, "g / G", "Jump to first / last row");
    add_shortcut(&mut lines, "h / l", "Focus previous / next column");
    add_shortcut(&mut lines, "s", "Cycle sort on focused column");
    add_shortcut(&mut lines, "Enter/Space", "Select or deselect row");
    add_shortcut(&mut lines, "x / Esc", "Clear selection");
    add_shortcut(&mut lines, "c", "Show or hide columns");
    add_shortcut(&mut lines, "Mouse", "Click header to sort, row to select");

    add_section(&mut lines, "Search");
    add_shortcut(&mut lines, "/", "Enter search mode");
    add_shortcut(&mut lines, "Esc / Enter", "Leave search, keep query");
    add_shortcut(&mut lines, "Ctrl+u", "Clear search");

    add_section(&mut lines, "Selected Issue");
    add_shortcut(&mut lines, "v", "View details");
    add_shortcut(&mut lines, "F", "Only this floor");
    add_shortcut(&mut lines, "S", "Only this status");

    add_section(&mut lines, "Filters");
    add_shortcut(&mut lines, "f", "Filter by floor");
    add_shortcut(&mut lines, "t", "Filter by status");
    add_shortcut(&mut lines, "d", "Filter by date reported");
    add_shortcut(&mut lines, "o", "Toggle newest / oldest first");
    add_shortcut(&mut lines, "C", "Clear all filters");

    add_section(&mut lines, "Issues");
    add_shortcut(&mut lines, "n", "Log new issue");
    add_shortcut(&mut lines, "R", "Refresh issues");

    add_section(&mut lines, "App");
    add_shortcut(&mut lines, "T", "Toggle dark / light theme");
    add_shortcut(&mut lines, "L", "Sign out");
    add_shortcut(&mut lines, "?", "Show this help");
    add_shortcut(&mut lines, "q", "Quit / Close dialog");

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press q, Esc, or ? to close",
        theme.dim(),
    )));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_help_lists_dashboard_keys() {
        let text: String = build_help_content(&Theme::dark())
            .iter()
            .flat_map(|line| line.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(text.contains("Log new issue"));
        assert!(text.contains("Only this floor"));
    }

    #[test]
    fn test_close_keys() {
        let mut help = HelpDialog::default();
        let key = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        assert_eq!(help.handle_key_event(key('?')).unwrap(), Some(Action::CloseModal));
        assert_eq!(help.handle_key_event(key('j')).unwrap(), None);
        assert_eq!(help.scroll_offset, 1);
    }
}

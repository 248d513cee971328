//! Column picker popover
//!
//! Lists every table column with a checkbox; toggling goes through the
//! table so the last-visible-column guard applies.

use crate::action::Action;
use crate::component::Component;
use crate::components::data_table::ColumnEntry;
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

pub struct ColumnPicker {
    entries: Vec<ColumnEntry>,
    selected_index: usize,
    list_state: ListState,
    theme: Theme,
}

impl Default for ColumnPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnPicker {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            entries: Vec::new(),
            selected_index: 0,
            list_state,
            theme: Theme::dark(),
        }
    }

    /// Refresh the entries, keeping the highlighted row where possible
    pub fn set_entries(&mut self, entries: Vec<ColumnEntry>) {
        self.entries = entries;
        self.selected_index = self.selected_index.min(self.entries.len().saturating_sub(1));
        self.list_state.select(Some(self.selected_index));
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    fn select_next(&mut self) {
        if self.selected_index + 1 < self.entries.len() {
            self.selected_index += 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.list_state.select(Some(self.selected_index));
        }
    }
}

impl Component for ColumnPicker {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('c') | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Enter | KeyCode::Char(' ') => self
                .entries
                .get(self.selected_index)
                .map(|entry| Action::ToggleColumn(entry.id.clone())),
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                Some(Action::ModalUp)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                Some(Action::ModalDown)
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let theme = self.theme;
        let popup_width = 36u16.min(area.width.saturating_sub(4));
        let popup_height = (self.entries.len() as u16 + 5).min(area.height.saturating_sub(2));
        // Anchored top-right, under the toolbar
        let x = area.x + area.width.saturating_sub(popup_width + 2);
        let popup_area = Rect::new(x, area.y + 2, popup_width, popup_height);
        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(popup_area);

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| {
                let (mark, mark_style) = if entry.visible {
                    ("[✓] ", Style::default().fg(theme.success))
                } else {
                    ("[ ] ", theme.dim())
                };
                ListItem::new(Line::from(vec![
                    Span::styled(mark, mark_style),
                    Span::styled(entry.title.clone(), theme.text()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Columns ")
                    .title_style(theme.title())
                    .border_style(Style::default().fg(theme.accent))
                    .style(Style::default().bg(theme.bg)),
            )
            .highlight_style(
                Style::default()
                    .bg(theme.cursor_bg)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, chunks[0], &mut self.list_state);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Space ", theme.key_hint(theme.warning)),
            Span::raw("Toggle "),
            Span::styled(" Esc ", theme.key_hint(theme.warning)),
            Span::raw("Close"),
        ]))
        .alignment(Alignment::Center)
        .style(Style::default().bg(theme.bg).fg(theme.fg));
        frame.render_widget(help, chunks[1]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn entry(id: &str, visible: bool) -> ColumnEntry {
        ColumnEntry {
            id: id.to_string(),
            title: id.to_uppercase(),
            visible,
        }
    }

    fn press(picker: &mut ColumnPicker, code: KeyCode) -> Option<Action> {
        picker.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    #[test]
    fn test_toggle_highlighted_column() {
        let mut picker = ColumnPicker::new();
        picker.set_entries(vec![entry("floor", true), entry("status", false)]);
        press(&mut picker, KeyCode::Down);
        assert_eq!(
            press(&mut picker, KeyCode::Enter),
            Some(Action::ToggleColumn("status".to_string()))
        );
        // Stays on the last entry
        press(&mut picker, KeyCode::Down);
        assert_eq!(picker.selected_index(), 1);
    }

    #[test]
    fn test_refresh_clamps_highlight() {
        let mut picker = ColumnPicker::new();
        picker.set_entries(vec![entry("a", true), entry("b", true), entry("c", true)]);
        press(&mut picker, KeyCode::Down);
        press(&mut picker, KeyCode::Down);
        picker.set_entries(vec![entry("a", true)]);
        assert_eq!(picker.selected_index(), 0);
    }

    #[test]
    fn test_empty_picker_enter_does_nothing() {
        let mut picker = ColumnPicker::new();
        assert_eq!(press(&mut picker, KeyCode::Enter), None);
        assert_eq!(press(&mut picker, KeyCode::Esc), Some(Action::CloseModal));
    }
}

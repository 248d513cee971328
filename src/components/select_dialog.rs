//! Filter picker dialog
//!
//! One list with an "All" entry on top; used for both the floor and the
//! status filter.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::{floor_options, IssueStatus};
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

/// Which filter the dialog edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectKind {
    Floor,
    Status,
}

impl SelectKind {
    fn title(&self) -> &'static str {
        match self {
            SelectKind::Floor => " Filter by Floor ",
            SelectKind::Status => " Filter by Status ",
        }
    }

    fn all_label(&self) -> &'static str {
        match self {
            SelectKind::Floor => "All Floors",
            SelectKind::Status => "All Statuses",
        }
    }

    fn options(&self) -> Vec<String> {
        match self {
            SelectKind::Floor => floor_options(),
            SelectKind::Status => IssueStatus::all().iter().map(|s| s.label().to_string()).collect(),
        }
    }
}

pub struct SelectDialog {
    kind: SelectKind,
    options: Vec<String>,
    /// Active filter value, `None` for all
    current: Option<String>,
    selected_index: usize,
    list_state: ListState,
    theme: Theme,
}

impl SelectDialog {
    pub fn new(kind: SelectKind) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            kind,
            options: kind.options(),
            current: None,
            selected_index: 0,
            list_state,
            theme: Theme::dark(),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Highlight the active filter value when the dialog opens
    pub fn set_current(&mut self, current: Option<String>) {
        self.selected_index = current
            .as_ref()
            .and_then(|value| self.options.iter().position(|o| o == value))
            .map_or(0, |idx| idx + 1); // +1 for the "All" entry
        self.current = current;
        self.list_state.select(Some(self.selected_index));
    }

    /// The highlighted value; `None` is the "All" entry
    pub fn selected_value(&self) -> Option<&str> {
        match self.selected_index {
            0 => None,
            idx => self.options.get(idx - 1).map(|s| s.as_str()),
        }
    }

    fn confirm(&self) -> Action {
        let value = self.selected_value();
        match self.kind {
            SelectKind::Floor => Action::SetFloorFilter(value.map(str::to_string)),
            SelectKind::Status => Action::SetStatusFilter(value.and_then(IssueStatus::from_label)),
        }
    }

    fn select_next(&mut self) {
        if self.selected_index < self.options.len() {
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

impl Component for SelectDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Enter => Some(self.confirm()),
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
        let popup_height = (self.options.len() as u16 + 6).min(area.height.saturating_sub(2));
        let popup_area = centered_popup(area, 40, popup_height);
        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(popup_area);

        let marker = |active: bool| if active { "● " } else { "  " };
        let mut items = vec![ListItem::new(Line::from(vec![
            Span::styled(marker(self.current.is_none()), Style::default().fg(theme.success)),
            Span::styled(self.kind.all_label(), theme.dim()),
        ]))];
        for option in &self.options {
            let is_current = self.current.as_deref() == Some(option.as_str());
            let style = if is_current {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                theme.text()
            };
            items.push(ListItem::new(Line::from(vec![
                Span::styled(marker(is_current), Style::default().fg(theme.success)),
                Span::styled(option.clone(), style),
            ])));
        }

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(self.kind.title())
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
            Span::styled(" Enter ", theme.key_hint(theme.warning)),
            Span::raw("Select  "),
            Span::styled(" j/k ", theme.key_hint(theme.accent)),
            Span::raw("Navigate  "),
            Span::styled(" Esc ", theme.key_hint(theme.warning)),
            Span::raw("Cancel"),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).style(Style::default().bg(theme.bg)));
        frame.render_widget(help, chunks[1]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(dialog: &mut SelectDialog, code: KeyCode) -> Option<Action> {
        dialog.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    #[test]
    fn test_all_entry_clears_filter() {
        let mut dialog = SelectDialog::new(SelectKind::Floor);
        assert_eq!(press(&mut dialog, KeyCode::Enter), Some(Action::SetFloorFilter(None)));
    }

    #[test]
    fn test_floor_selection() {
        let mut dialog = SelectDialog::new(SelectKind::Floor);
        press(&mut dialog, KeyCode::Down);
        press(&mut dialog, KeyCode::Down);
        assert_eq!(
            press(&mut dialog, KeyCode::Enter),
            Some(Action::SetFloorFilter(Some("1st Floor".to_string())))
        );
    }

    #[test]
    fn test_current_value_is_highlighted() {
        let mut dialog = SelectDialog::new(SelectKind::Status);
        dialog.set_current(Some("In Progress".to_string()));
        assert_eq!(dialog.selected_index(), 2);
        assert_eq!(
            press(&mut dialog, KeyCode::Enter),
            Some(Action::SetStatusFilter(Some(IssueStatus::InProgress)))
        );

        dialog.set_current(Some("Closed".to_string()));
        assert_eq!(dialog.selected_value(), None);
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut dialog = SelectDialog::new(SelectKind::Status);
        press(&mut dialog, KeyCode::Up);
        assert_eq!(dialog.selected_index(), 0);
        for _ in 0..10 {
            press(&mut dialog, KeyCode::Down);
        }
        assert_eq!(dialog.selected_index(), 3);
    }
}

//! Sign-in screen shown when no user is signed in

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::components::text_input::TextInput;
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct LoginComponent {
    email: TextInput,
    password: TextInput,
    /// 0 = email, 1 = password
    focus: usize,
    error: Option<String>,
    theme: Theme,
}

impl Default for LoginComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginComponent {
    pub fn new() -> Self {
        Self {
            email: TextInput::new("Email").placeholder("you@example.com"),
            password: TextInput::new("Password").masked(),
            focus: 0,
            error: None,
            theme: Theme::dark(),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn set_error(&mut self, message: Option<String>) {
        self.error = message;
    }

    /// Forget the password after an attempt or sign-out
    pub fn reset(&mut self) {
        self.password.clear();
        self.focus = if self.email.value().is_empty() { 0 } else { 1 };
    }
}

impl Component for LoginComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc => Some(Action::OpenQuitDialog),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = 1 - self.focus;
                None
            }
            KeyCode::Enter if self.focus == 0 => {
                self.focus = 1;
                None
            }
            KeyCode::Enter => Some(Action::SignIn {
                email: self.email.value().to_string(),
                password: self.password.value().to_string(),
            }),
            _ => {
                let input = if self.focus == 0 {
                    &mut self.email
                } else {
                    &mut self.password
                };
                if input.handle_key(key) {
                    self.error = None;
                }
                None
            }
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let theme = self.theme;
        frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), area);
        let popup_area = centered_popup(area, 56, 11);

        let status = match &self.error {
            Some(message) => Line::from(Span::styled(message.clone(), Style::default().fg(theme.danger))),
            None => Line::from(Span::styled("Sign in to view facilities issues", theme.dim())),
        };
        let content = vec![
            Line::from(""),
            self.email.line(self.focus == 0, &theme),
            self.password.line(self.focus == 1, &theme),
            Line::from(""),
            status.alignment(Alignment::Center),
            Line::from(""),
            Line::from(vec![
                Span::styled(" Enter ", theme.key_hint(theme.success)),
                Span::raw("Sign in  "),
                Span::styled(" Tab ", theme.key_hint(theme.accent)),
                Span::raw("Switch  "),
                Span::styled(" Esc ", theme.key_hint(theme.danger)),
                Span::raw("Quit"),
            ])
            .alignment(Alignment::Center),
        ];

        let paragraph = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Facilities Sign In ")
                .title_style(theme.title())
                .border_style(Style::default().fg(theme.accent))
                .style(Style::default().bg(theme.bg).fg(theme.fg)),
        );
        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(login: &mut LoginComponent, code: KeyCode) -> Option<Action> {
        login.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn type_text(login: &mut LoginComponent, text: &str) {
        for c in text.chars() {
            press(login, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_enter_moves_to_password_then_submits() {
        let mut login = LoginComponent::new();
        type_text(&mut login, "a@b.co");
        assert_eq!(press(&mut login, KeyCode::Enter), None);
        type_text(&mut login, "pw");
        assert_eq!(
            press(&mut login, KeyCode::Enter),
            Some(Action::SignIn {
                email: "a@b.co".to_string(),
                password: "pw".to_string(),
            })
        );
    }

    #[test]
    fn test_typing_clears_error() {
        let mut login = LoginComponent::new();
        login.set_error(Some("Wrong password".to_string()));
        type_text(&mut login, "x");
        assert!(login.error.is_none());
    }

    #[test]
    fn test_reset_drops_password() {
        let mut login = LoginComponent::new();
        type_text(&mut login, "a@b.co");
        press(&mut login, KeyCode::Tab);
        type_text(&mut login, "secret");
        login.reset();
        assert_eq!(login.password.value(), "");
        assert_eq!(login.focus, 1);
    }
}

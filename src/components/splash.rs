//! Splash screen component
//!
//! Shown while the identity provider is consulted; advances to the login
//! screen or the dashboard.

use crate::action::Action;
use crate::component::Component;
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};

/// Splash screen component
pub struct SplashComponent {
    /// When the splash screen was shown
    start_time: Option<Instant>,
    /// Duration to show splash before auto-advancing
    duration: Duration,
    theme: Theme,
}

impl Default for SplashComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl SplashComponent {
    pub fn new() -> Self {
        Self {
            start_time: None,
            duration: Duration::from_millis(1200),
            theme: Theme::dark(),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Check if splash duration has elapsed
    pub fn is_complete(&self) -> bool {
        self.start_time
            .map(|t| t.elapsed() >= self.duration)
            .unwrap_or(false)
    }

    /// Building outline; `#` cells are windows
    fn get_logo() -> Vec<&'static str> {
        vec![
            "        ▄▄▄▄▄▄▄▄▄▄▄▄▄        ",
            "        █ # # # # # █        ",
            "   ▄▄▄▄▄█ # # # # # █▄▄▄▄▄   ",
            "   █ # ## # # # # # ## # █   ",
            "   █ # ## # # # # # ## # █   ",
            "   █ # ## # # # # # ## # █   ",
            "   █ # ## # #███# # ## # █   ",
            "▄▄▄█▄▄▄██▄▄▄▄███▄▄▄▄██▄▄▄█▄▄▄",
        ]
    }
}

impl Component for SplashComponent {
    fn init(&mut self) -> Result<()> {
        self.start_time = Some(Instant::now());
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Any key press skips the splash screen
        match key.code {
            KeyCode::Char('q') => Ok(Some(Action::ForceQuit)),
            _ => Ok(Some(Action::SplashComplete)),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if action == Action::Tick && self.is_complete() {
            return Ok(Some(Action::SplashComplete));
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let theme = self.theme;
        frame.render_widget(Clear, area);
        frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), area);

        let logo_lines = Self::get_logo();
        let logo_height = logo_lines.len() as u16;
        let logo_width = logo_lines
            .first()
            .map(|l| l.chars().count())
            .unwrap_or(0) as u16;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length((area.height.saturating_sub(logo_height + 4)) / 2),
                Constraint::Length(logo_height),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        let logo: Vec<Line> = logo_lines
            .iter()
            .map(|line| {
                let spans: Vec<Span> = line
                    .chars()
                    .map(|c| {
                        let style = match c {
                            '#' => Style::default().fg(theme.warning).bg(theme.bg),
                            ' ' => Style::default().bg(theme.bg),
                            _ => Style::default().fg(theme.accent).bg(theme.bg),
                        };
                        Span::styled(c.to_string(), style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        let logo_x = area.x + (area.width.saturating_sub(logo_width)) / 2;
        let logo_rect = Rect::new(logo_x, chunks[1].y, logo_width.min(area.width), chunks[1].height);
        frame.render_widget(Paragraph::new(logo), logo_rect);

        let title = Line::from(vec![
            Span::styled(
                "facilities",
                Style::default()
                    .fg(theme.accent)
                    .bg(theme.bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "-tui",
                Style::default()
                    .fg(theme.fg)
                    .bg(theme.bg)
                    .add_modifier(Modifier::BOLD),
            ),
        ])
        .centered();
        frame.render_widget(Paragraph::new(title), chunks[3]);

        let subtitle = Line::from(Span::styled(
            "Equipment issues at a glance",
            theme.dim().bg(theme.bg),
        ))
        .centered();
        frame.render_widget(Paragraph::new(subtitle), chunks[4]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_complete_before_init() {
        let splash = SplashComponent::new();
        assert!(!splash.is_complete());
    }

    #[test]
    fn test_tick_advances_once_elapsed() {
        let mut splash = SplashComponent::new();
        splash.duration = Duration::ZERO;
        assert_eq!(splash.update(Action::Tick).unwrap(), None);
        splash.init().unwrap();
        assert_eq!(splash.update(Action::Tick).unwrap(), Some(Action::SplashComplete));
    }

    #[test]
    fn test_keys_skip_or_quit() {
        use crossterm::event::KeyModifiers;
        let mut splash = SplashComponent::new();
        let key = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        assert_eq!(splash.handle_key_event(key('q')).unwrap(), Some(Action::ForceQuit));
        assert_eq!(splash.handle_key_event(key(' ')).unwrap(), Some(Action::SplashComplete));
    }
}

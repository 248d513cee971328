//! Component trait - Interface for UI components
//!
//! Screens, dialogs and the data table each own their local state and turn
//! terminal events into Actions; the App routes those Actions back down.

use crate::action::Action;
use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

/// Trait for UI components
///
/// 1. `handle_key_event` / `handle_mouse_event` map input to an Action
/// 2. `update` applies an Action and may return a follow-up Action
/// 3. `draw` renders into the given area
pub trait Component {
    /// Called once before the first frame
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Map a key press to an Action without changing shared state
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    /// Map a mouse event to an Action
    ///
    /// Components that need hit-testing remember where they last drew.
    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let _ = mouse;
        Ok(None)
    }

    /// Apply an Action; the returned Action, if any, is dispatched next
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}

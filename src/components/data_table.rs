//! Generic data table component
//!
//! Draws a `TableModel` line by line: an optional toolbar (header action,
//! search, column toggle), the header row with sort arrows, the rows with a
//! selection bar, an inline action footer under the selected row and a dock
//! of selection actions pinned to the bottom. Every clickable region drawn is
//! remembered so mouse clicks map back to Actions.

use crate::action::Action;
use crate::component::Component;
use crate::config::Bordered;
use crate::model::table::{BodyState, ColumnDef, ColumnId, Record, RowModel, SelectionChange, TableModel};
use crate::theme::{Theme, ThemeMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use std::rc::Rc;
use tracing::debug;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const COLUMN_GAP: &str = " │ ";
const DESELECT_KEY: char = 'x';

/// A key-bound action offered by the table (footer, dock, toolbar)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionItem {
    pub key: char,
    pub label: String,
    pub action: Action,
}

impl ActionItem {
    pub fn new(key: char, label: impl Into<String>, action: Action) -> Self {
        Self {
            key,
            label: label.into(),
            action,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableOptions {
    pub bordered: Bordered,
    /// Hide the toolbar (search and column toggle)
    pub hide_header: bool,
    pub selectable_row: bool,
    /// Always draw with the light palette
    pub force_light: bool,
    /// Add a labelled "Deselect" to the dock
    pub show_deselect: bool,
    pub caption: Option<String>,
    /// Shown at the left of the toolbar
    pub header_action: Option<ActionItem>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            bordered: Bordered::Right,
            hide_header: false,
            selectable_row: true,
            force_light: false,
            show_deselect: false,
            caption: None,
            header_action: None,
        }
    }
}

type RowSelectFn<T> = Box<dyn Fn(&T) -> Option<Action>>;

/// Column shown in the column picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnEntry {
    pub id: ColumnId,
    pub title: String,
    pub visible: bool,
}

pub struct DataTable<T> {
    model: TableModel<T>,
    options: TableOptions,
    action_footer: Vec<ActionItem>,
    dock_actions: Vec<ActionItem>,
    on_row_select: Option<RowSelectFn<T>>,
    loading: bool,
    loading_indicator: Option<String>,
    theme_mode: ThemeMode,
    /// Display position of the keyboard cursor
    cursor: usize,
    /// Index into the visible columns
    focused_column: usize,
    search_mode: bool,
    scroll: usize,
    spinner_frame: usize,
    /// Clickable regions from the last draw
    hit_areas: Vec<(Rect, Action)>,
}

impl<T: Record> DataTable<T> {
    pub fn new(columns: Vec<ColumnDef<T>>, data: Vec<T>) -> Self {
        Self {
            model: TableModel::new(columns, data),
            options: TableOptions::default(),
            action_footer: Vec::new(),
            dock_actions: Vec::new(),
            on_row_select: None,
            loading: false,
            loading_indicator: None,
            theme_mode: ThemeMode::default(),
            cursor: 0,
            focused_column: 0,
            search_mode: false,
            scroll: 0,
            spinner_frame: 0,
            hit_areas: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: TableOptions) -> Self {
        self.model.set_selectable(options.selectable_row);
        self.options = options;
        self
    }

    pub fn with_action_footer(mut self, items: Vec<ActionItem>) -> Self {
        self.action_footer = items;
        self
    }

    /// Called with the record each time a different row becomes selected
    pub fn on_row_select(mut self, callback: impl Fn(&T) -> Option<Action> + 'static) -> Self {
        self.on_row_select = Some(Box::new(callback));
        self
    }

    /// Text shown next to the spinner while loading
    pub fn with_loading_indicator(mut self, text: impl Into<String>) -> Self {
        self.loading_indicator = Some(text.into());
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inputs from the host
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_data(&mut self, data: Vec<T>) {
        self.model.set_data(data);
        let len = self.model.row_model().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_theme_mode(&mut self, mode: ThemeMode) {
        self.theme_mode = mode;
    }

    pub fn set_dock_actions(&mut self, items: Vec<ActionItem>) {
        self.dock_actions = items;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn model(&self) -> &TableModel<T> {
        &self.model
    }

    pub fn selected_row(&self) -> Option<&T> {
        self.model.selected_row()
    }

    pub fn search(&self) -> &str {
        self.model.search()
    }

    pub fn is_search_mode(&self) -> bool {
        self.search_mode
    }

    pub fn theme(&self) -> Theme {
        Theme::resolve(self.theme_mode, self.options.force_light)
    }

    /// Every column with its current visibility, in schema order
    pub fn column_entries(&self) -> Vec<ColumnEntry> {
        self.model
            .columns()
            .iter()
            .map(|col| ColumnEntry {
                id: col.id.clone(),
                title: col.render_header(),
                visible: self.model.visibility().is_visible(&col.id),
            })
            .collect()
    }

    fn focused_column_id(&self) -> Option<ColumnId> {
        self.model
            .visible_columns()
            .get(self.focused_column)
            .map(|col| col.id.clone())
    }

    fn dock_visible(&self) -> bool {
        self.model.selected().is_some() && !self.dock_actions.is_empty()
    }

    /// Rows left after search, as drawn
    pub fn row_count(&mut self) -> usize {
        self.model.row_model().len()
    }

    fn clamp_focus(&mut self) {
        let visible = self.model.visible_columns().len();
        self.focused_column = self.focused_column.min(visible.saturating_sub(1));
    }

    fn reset_view(&mut self) {
        self.cursor = 0;
        self.scroll = 0;
    }

    /// Activate the row at a display position
    ///
    /// Rows are not drawn while loading, so nothing can be activated.
    fn activate_position(&mut self, position: usize) -> Option<Action> {
        if self.loading {
            return None;
        }
        let rows = self.model.row_model();
        let id = *rows.rows.get(position)?;
        self.cursor = position;

        match self.model.activate_row(id) {
            SelectionChange::Selected(id) => {
                debug!(row = id, "row selected");
                match (&self.on_row_select, self.model.row(id)) {
                    (Some(callback), Some(record)) => callback(record),
                    _ => None,
                }
            }
            SelectionChange::Deselected(id) => {
                debug!(row = id, "row deselected");
                None
            }
            SelectionChange::Unchanged => None,
        }
    }

    /// Action bound to `c` on a surface that is currently drawn
    fn action_for_key(&mut self, c: char) -> Option<Action> {
        if let Some(selected) = self.model.selected() {
            // The footer only exists under a row that is on screen
            let footer_drawn = !self.loading && self.model.row_model().position_of(selected).is_some();
            let footer = self.action_footer.iter().filter(|_| footer_drawn);
            if let Some(item) = footer.chain(self.dock_actions.iter()).find(|item| item.key == c) {
                return Some(item.action.clone());
            }
        }
        if self.options.hide_header {
            return None;
        }
        self.options
            .header_action
            .as_ref()
            .filter(|item| item.key == c)
            .map(|item| item.action.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn block(&self, theme: &Theme) -> Block<'static> {
        let borders = match self.options.bordered {
            Bordered::None => Borders::NONE,
            Bordered::Right => Borders::RIGHT,
            Bordered::Full => Borders::ALL,
        };
        Block::default()
            .borders(borders)
            .border_style(Style::default().fg(theme.border))
            .style(Style::default().bg(theme.bg).fg(theme.fg))
    }

    fn toolbar_line(&self, width: usize, theme: &Theme) -> (Line<'static>, Vec<Hit>) {
        let mut left = LineBuilder::default();
        let mut hits = Vec::new();

        if let Some(item) = &self.options.header_action {
            let (x, w) = left.push(format!("[{}] {}", item.key, item.label), theme.key_hint(theme.accent));
            hits.push((x, w, item.action.clone()));
        }

        let query = self.model.search();
        let search_text = if self.search_mode {
            format!(" / {}▏", query)
        } else if query.is_empty() {
            " / Search...".to_string()
        } else {
            format!(" / {}", query)
        };
        let search_style = if self.search_mode {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else if query.is_empty() {
            theme.dim()
        } else {
            theme.text()
        };
        let columns_text = format!(
            "[c] Columns {}/{}",
            self.model.visibility().visible_count(),
            self.model.visibility().len()
        );

        let right_width = search_text.width() + 2 + columns_text.width();
        let gap = width.saturating_sub(left.x + right_width).max(1);
        left.push(" ".repeat(gap), Style::default());
        let (x, w) = left.push(search_text, search_style);
        hits.push((x, w, Action::EnterSearchMode));
        left.push("  ", Style::default());
        let (x, w) = left.push(columns_text, theme.key_hint(theme.header));
        hits.push((x, w, Action::OpenColumnPicker));

        (left.finish(), hits)
    }

    fn column_widths(&self, rows: &RowModel, theme: &Theme) -> Vec<usize> {
        self.model
            .visible_columns()
            .iter()
            .map(|col| {
                // Room for " ↑" so sorting does not shift the layout
                let header = col.render_header().width() + 2;
                let cells = rows
                    .rows
                    .iter()
                    .filter_map(|&id| self.model.row(id))
                    .map(|record| col.render_cell(record, theme).content.width())
                    .max()
                    .unwrap_or(0);
                header.max(cells).min(col.max_width).max(3)
            })
            .collect()
    }

    fn header_line(&self, widths: &[usize], width: usize, theme: &Theme) -> (Line<'static>, Vec<Hit>) {
        let mut b = LineBuilder::default();
        let mut hits = Vec::new();
        if self.model.is_selectable() {
            b.push("  ", Style::default());
        }
        for (i, (col, &w)) in self.model.visible_columns().into_iter().zip(widths).enumerate() {
            let title = match self.model.sorting().direction_of(&col.id) {
                Some(direction) => format!("{} {}", col.render_header(), direction.arrow()),
                None => col.render_header(),
            };
            let mut style = theme.title();
            if i == self.focused_column {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            let (x, cw) = b.push(fit(&title, w), style);
            if col.sortable {
                hits.push((x, cw, Action::CycleSortColumn(col.id.clone())));
            }
            b.push(COLUMN_GAP, Style::default().fg(theme.border));
        }
        b.pad_to(width, Style::default());
        (b.finish(), hits)
    }

    fn separator_line(&self, widths: &[usize], width: usize, theme: &Theme) -> Line<'static> {
        let prefix = if self.model.is_selectable() { "──" } else { "" };
        let body = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        let mut text = format!("{}{}", prefix, body);
        let used = text.width();
        if used < width {
            text.push_str(&"─".repeat(width - used));
        }
        Line::from(Span::styled(fit(&text, width), Style::default().fg(theme.border)))
    }

    fn row_line(
        &self,
        record: &T,
        position: usize,
        selected: bool,
        widths: &[usize],
        width: usize,
        theme: &Theme,
    ) -> Line<'static> {
        let bg = if selected {
            Some(theme.selected_bg)
        } else if position == self.cursor {
            Some(theme.cursor_bg)
        } else {
            None
        };
        let with_bg = |style: Style| match bg {
            Some(color) => style.bg(color),
            None => style,
        };

        let mut b = LineBuilder::default();
        if self.model.is_selectable() {
            let marker = if selected { "▌ " } else { "  " };
            b.push(marker, with_bg(Style::default().fg(theme.accent)));
        }
        for (col, &w) in self.model.visible_columns().into_iter().zip(widths) {
            let span = col.render_cell(record, theme);
            b.push(fit(&span.content, w), with_bg(span.style));
            b.push(COLUMN_GAP, with_bg(Style::default().fg(theme.border)));
        }
        b.pad_to(width, with_bg(Style::default()));
        b.finish()
    }

    fn footer_line(&self, width: usize, theme: &Theme) -> (Line<'static>, Vec<Hit>) {
        let base = Style::default().bg(theme.footer_bg).fg(theme.fg);
        let mut b = LineBuilder::default();
        let mut hits = Vec::new();
        b.push("  ", base);
        for item in &self.action_footer {
            let (x, _) = b.push(format!("[{}]", item.key), theme.key_hint(theme.success).bg(theme.footer_bg));
            let (_, lw) = b.push(format!(" {}", item.label), base);
            hits.push((x, lw + item.key.len_utf8() + 2, item.action.clone()));
            b.push("   ", base);
        }
        let deselect = format!("[{}] ✕ ", DESELECT_KEY);
        let pad = width.saturating_sub(b.x + deselect.width());
        b.push(" ".repeat(pad), base);
        let (x, w) = b.push(deselect, theme.key_hint(theme.danger).bg(theme.footer_bg));
        hits.push((x, w, Action::Deselect));
        (b.finish(), hits)
    }

    fn dock_line(&self, width: usize, theme: &Theme) -> (Line<'static>, Vec<Hit>) {
        let base = Style::default().bg(theme.cursor_bg).fg(theme.fg);
        let mut items: Vec<(String, Style, Action)> = self
            .dock_actions
            .iter()
            .map(|item| {
                (
                    format!("[{}] {}", item.key, item.label),
                    theme.key_hint(theme.accent).bg(theme.cursor_bg),
                    item.action.clone(),
                )
            })
            .collect();
        if self.options.show_deselect {
            items.push((
                format!("[{}] ✕ Deselect", DESELECT_KEY),
                theme.key_hint(theme.danger).bg(theme.cursor_bg),
                Action::Deselect,
            ));
        }

        let total: usize = items.iter().map(|(text, _, _)| text.width()).sum::<usize>()
            + items.len().saturating_sub(1) * 3;
        let mut b = LineBuilder::default();
        b.push(" ".repeat(width.saturating_sub(total) / 2), base);
        let mut hits = Vec::new();
        for (i, (text, style, action)) in items.into_iter().enumerate() {
            if i > 0 {
                b.push("   ", base);
            }
            let (x, w) = b.push(text, style);
            hits.push((x, w, action));
        }
        b.pad_to(width, base);
        (b.finish(), hits)
    }

    fn centered(text: String, style: Style) -> Line<'static> {
        Line::from(Span::styled(text, style)).alignment(Alignment::Center)
    }
}

/// Clickable span within a line: (x offset, width, action)
type Hit = (usize, usize, Action);

#[derive(Default)]
struct LineBuilder {
    spans: Vec<Span<'static>>,
    x: usize,
}

impl LineBuilder {
    /// Append text, returning its x offset and display width
    fn push(&mut self, text: impl Into<String>, style: Style) -> (usize, usize) {
        let text = text.into();
        let start = self.x;
        let width = text.width();
        self.x += width;
        self.spans.push(Span::styled(text, style));
        (start, width)
    }

    fn pad_to(&mut self, width: usize, style: Style) {
        if self.x < width {
            self.push(" ".repeat(width - self.x), style);
        }
    }

    fn finish(self) -> Line<'static> {
        Line::from(self.spans)
    }
}

/// Pad or truncate to an exact display width, marking truncation with "…"
fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        let mut out = text.to_string();
        out.push_str(&" ".repeat(width - text.width()));
        return out;
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let cw = c.width().unwrap_or(0);
        if used + cw + 1 > width {
            break;
        }
        out.push(c);
        used += cw;
    }
    if width > 0 {
        out.push('…');
        used += 1;
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

/// Scroll offset that keeps `cursor` within a window of `capacity` rows
fn keep_in_view(scroll: usize, cursor: usize, capacity: usize, len: usize) -> usize {
    let capacity = capacity.max(1);
    let mut scroll = scroll.min(len.saturating_sub(capacity));
    if cursor < scroll {
        scroll = cursor;
    } else if cursor >= scroll + capacity {
        scroll = cursor + 1 - capacity;
    }
    scroll
}

fn contains(rect: &Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

impl<T: Record> Component for DataTable<T> {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.search_mode {
            let action = match key.code {
                KeyCode::Esc | KeyCode::Enter => Some(Action::ExitSearchMode),
                KeyCode::Backspace => Some(Action::SearchBackspace),
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Action::ClearSearch)
                }
                KeyCode::Char(c) => Some(Action::SearchInput(c)),
                _ => None,
            };
            return Ok(action);
        }

        if let KeyCode::Char(c) = key.code {
            if let Some(action) = self.action_for_key(c) {
                return Ok(Some(action));
            }
        }

        let has_selection = self.model.selected().is_some();
        let selectable = self.model.is_selectable() && !self.loading;
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextRow),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevRow),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstRow),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastRow),
            KeyCode::Char('h') | KeyCode::Left => Some(Action::PrevColumn),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::NextColumn),
            KeyCode::Char('s') => Some(Action::CycleSort),
            KeyCode::Enter | KeyCode::Char(' ') if selectable => Some(Action::ActivateRow),
            KeyCode::Esc | KeyCode::Char(DESELECT_KEY) if has_selection => Some(Action::Deselect),
            KeyCode::Char('/') if !self.options.hide_header => Some(Action::EnterSearchMode),
            KeyCode::Char('c') if !self.options.hide_header => Some(Action::OpenColumnPicker),
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let action = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self
                .hit_areas
                .iter()
                .find(|(rect, _)| contains(rect, mouse.column, mouse.row))
                .map(|(_, action)| action.clone()),
            MouseEventKind::ScrollDown => Some(Action::NextRow),
            MouseEventKind::ScrollUp => Some(Action::PrevRow),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                if self.loading {
                    self.spinner_frame = self.spinner_frame.wrapping_add(1);
                }
            }

            Action::NextRow => {
                let len = self.row_count();
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            Action::PrevRow => self.cursor = self.cursor.saturating_sub(1),
            Action::FirstRow => self.cursor = 0,
            Action::LastRow => self.cursor = self.row_count().saturating_sub(1),
            Action::NextColumn => {
                if self.focused_column + 1 < self.model.visible_columns().len() {
                    self.focused_column += 1;
                }
            }
            Action::PrevColumn => self.focused_column = self.focused_column.saturating_sub(1),

            Action::CycleSort => {
                if let Some(id) = self.focused_column_id() {
                    self.model.cycle_sort(&id);
                }
            }
            Action::CycleSortColumn(id) => {
                if self.model.cycle_sort(&id) {
                    if let Some(index) = self.model.visible_columns().iter().position(|c| c.id == id) {
                        self.focused_column = index;
                    }
                }
            }
            Action::ToggleColumn(id) => {
                if !self.model.toggle_column_visibility(&id) {
                    debug!(column = %id, "column visibility unchanged");
                }
                self.clamp_focus();
            }

            Action::ActivateRow => return Ok(self.activate_position(self.cursor)),
            Action::ClickRow(position) => return Ok(self.activate_position(position)),
            Action::Deselect => {
                self.model.deselect();
            }

            Action::EnterSearchMode => self.search_mode = true,
            Action::ExitSearchMode => self.search_mode = false,
            Action::ClearSearch => {
                self.model.set_search("");
                self.reset_view();
            }
            Action::SearchInput(c) => {
                let mut query = self.model.search().to_string();
                query.push(c);
                self.model.set_search(query);
                self.reset_view();
            }
            Action::SearchBackspace => {
                let mut query = self.model.search().to_string();
                query.pop();
                self.model.set_search(query);
                self.reset_view();
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let theme = self.theme();
        let block = self.block(&theme);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.hit_areas.clear();
        if inner.width == 0 || inner.height == 0 {
            return Ok(());
        }

        let width = inner.width as usize;
        let height = inner.height as usize;
        let dock_height = usize::from(self.dock_visible());
        let content_height = height.saturating_sub(dock_height);

        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut hits: Vec<(usize, Hit)> = Vec::new();

        if let Some(caption) = &self.options.caption {
            lines.push(Self::centered(caption.clone(), theme.title()));
        }
        if !self.options.hide_header {
            let (line, toolbar_hits) = self.toolbar_line(width, &theme);
            let idx = lines.len();
            lines.push(line);
            hits.extend(toolbar_hits.into_iter().map(|hit| (idx, hit)));
            lines.push(Line::from(Span::styled("─".repeat(width), Style::default().fg(theme.border))));
        }

        let state = self.model.body_state(self.loading);
        let rows = match &state {
            BodyState::Rows(rows) => Rc::clone(rows),
            _ => Rc::new(RowModel::default()),
        };
        let widths = self.column_widths(&rows, &theme);

        if state != BodyState::NoColumns {
            let (line, header_hits) = self.header_line(&widths, width, &theme);
            let idx = lines.len();
            lines.push(line);
            hits.extend(header_hits.into_iter().map(|hit| (idx, hit)));
            lines.push(self.separator_line(&widths, width, &theme));
        }

        let body_start = lines.len();
        let body_height = content_height.saturating_sub(body_start);
        let mut scrollbar = None;

        match state {
            BodyState::Loading => {
                let frame_symbol = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
                let label = self.loading_indicator.as_deref().unwrap_or("Loading...");
                lines.push(Line::from(""));
                lines.push(Self::centered(
                    format!("{} {}", frame_symbol, label),
                    Style::default().fg(theme.accent),
                ));
            }
            BodyState::NoColumns => {
                lines.push(Line::from(""));
                lines.push(Self::centered("No columns selected".to_string(), theme.dim()));
            }
            BodyState::Empty => {
                lines.push(Line::from(""));
                lines.push(Self::centered("⚠".to_string(), Style::default().fg(theme.warning)));
                lines.push(Self::centered("No data available".to_string(), theme.dim()));
            }
            BodyState::Rows(rows) => {
                let selected_pos = self.model.selected().and_then(|id| rows.position_of(id));
                let footer_height = usize::from(selected_pos.is_some() && !self.action_footer.is_empty());
                let capacity = body_height.saturating_sub(footer_height).max(1);

                self.cursor = self.cursor.min(rows.len().saturating_sub(1));
                self.scroll = keep_in_view(self.scroll, self.cursor, capacity, rows.len());

                for (position, &id) in rows.rows.iter().enumerate().skip(self.scroll).take(capacity) {
                    let Some(record) = self.model.row(id) else {
                        continue;
                    };
                    let selected = selected_pos == Some(position);
                    let idx = lines.len();
                    lines.push(self.row_line(record, position, selected, &widths, width, &theme));
                    // A squeezed body can push rows under the dock line
                    if self.model.is_selectable() && idx < content_height {
                        hits.push((idx, (0, width, Action::ClickRow(position))));
                    }
                    if selected && footer_height > 0 {
                        let (line, footer_hits) = self.footer_line(width, &theme);
                        let idx = lines.len();
                        lines.push(line);
                        // Footer items sit on top of the row hit area
                        if idx < content_height {
                            hits.extend(footer_hits.into_iter().map(|hit| (idx, hit)));
                        }
                    }
                }

                if rows.len() > capacity {
                    scrollbar = Some((rows.len() - capacity, self.scroll));
                }
            }
        }

        let content_area = Rect::new(inner.x, inner.y, inner.width, content_height as u16);
        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(theme.bg).fg(theme.fg)),
            content_area,
        );

        if let Some((max_scroll, position)) = scrollbar {
            let body_area = Rect::new(inner.x, inner.y + body_start as u16, inner.width, body_height as u16);
            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(position);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                body_area,
                &mut scrollbar_state,
            );
        }

        if dock_height > 0 {
            let (line, dock_hits) = self.dock_line(width, &theme);
            let dock_area = Rect::new(inner.x, inner.y + content_height as u16, inner.width, 1);
            frame.render_widget(Paragraph::new(line), dock_area);
            hits.extend(dock_hits.into_iter().map(|hit| (content_height, hit)));
        }

        // Later entries win so footer and dock items shadow the row beneath
        for (line, (x, w, action)) in hits.into_iter().rev() {
            if line >= height || x >= width {
                continue;
            }
            let rect = Rect::new(
                inner.x + x as u16,
                inner.y + line as u16,
                w.min(width - x) as u16,
                1,
            );
            self.hit_areas.push((rect, action));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::table::CellValue;
    use ratatui::{backend::TestBackend, Terminal};
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;

    type Row = BTreeMap<String, CellValue>;

    fn row(floor: &str, status: &str) -> Row {
        BTreeMap::from([
            ("floor".to_string(), CellValue::from(floor)),
            ("status".to_string(), CellValue::from(status)),
        ])
    }

    fn field(name: &'static str, title: &str) -> ColumnDef<Row> {
        ColumnDef::new(name)
            .header(title)
            .accessor(move |r: &Row| r.get(name).cloned().unwrap_or(CellValue::Empty))
    }

    fn table(data: Vec<Row>) -> DataTable<Row> {
        DataTable::new(vec![field("floor", "Floor"), field("status", "Status")], data)
    }

    fn sample() -> Vec<Row> {
        vec![row("1", "Open"), row("2", "Resolved")]
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn render(table: &mut DataTable<Row>, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                table.draw(frame, frame.area()).unwrap();
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(width as usize)
            .map(|cells| cells.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect()
    }

    fn screen_contains(lines: &[String], needle: &str) -> bool {
        lines.iter().any(|line| line.contains(needle))
    }

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("", 2), "  ");
    }

    #[test]
    fn test_keep_in_view() {
        assert_eq!(keep_in_view(0, 0, 5, 20), 0);
        assert_eq!(keep_in_view(0, 7, 5, 20), 3);
        assert_eq!(keep_in_view(6, 2, 5, 20), 2);
        // Shrinking data pulls the window back
        assert_eq!(keep_in_view(10, 1, 5, 3), 0);
    }

    #[test]
    fn test_loading_shows_indicator_over_rows() {
        let mut t = table(sample()).with_loading_indicator("Fetching issues");
        t.set_loading(true);
        let screen = render(&mut t, 60, 12);
        assert!(screen_contains(&screen, "Fetching issues"));
        assert!(!screen_contains(&screen, "Resolved"));
    }

    #[test]
    fn test_empty_state() {
        let mut t = table(Vec::new());
        let screen = render(&mut t, 60, 12);
        assert!(screen_contains(&screen, "No data available"));
        assert!(screen_contains(&screen, "⚠"));
    }

    #[test]
    fn test_no_columns_placeholder() {
        let mut t: DataTable<Row> = DataTable::new(Vec::new(), sample());
        let screen = render(&mut t, 60, 12);
        assert!(screen_contains(&screen, "No columns selected"));
    }

    #[test]
    fn test_search_filters_rows() {
        let mut t = table(sample());
        for c in "open".chars() {
            t.update(Action::SearchInput(c)).unwrap();
        }
        let screen = render(&mut t, 60, 12);
        assert!(screen_contains(&screen, "Open"));
        assert!(!screen_contains(&screen, "Resolved"));
    }

    #[test]
    fn test_row_select_callback_fires_once_per_new_row() {
        let calls = Rc::new(Cell::new(0));
        let last = Rc::new(RefCell::new(None::<Row>));
        let (calls_cb, last_cb) = (Rc::clone(&calls), Rc::clone(&last));
        let mut t = table(sample()).on_row_select(move |r: &Row| {
            calls_cb.set(calls_cb.get() + 1);
            *last_cb.borrow_mut() = Some(r.clone());
            None
        });

        t.update(Action::ClickRow(0)).unwrap();
        t.update(Action::ClickRow(1)).unwrap();
        assert_eq!(calls.get(), 2);
        assert_eq!(*last.borrow(), Some(row("2", "Resolved")));
        assert_eq!(t.selected_row(), Some(&row("2", "Resolved")));

        // Re-activating the selected row deselects without a callback
        t.update(Action::ClickRow(1)).unwrap();
        assert_eq!(calls.get(), 2);
        assert!(t.selected_row().is_none());
    }

    #[test]
    fn test_callback_action_is_returned() {
        let mut t = table(sample()).on_row_select(|r: &Row| {
            Some(Action::IssueSelected(r["floor"].to_string()))
        });
        let follow_up = t.update(Action::ActivateRow).unwrap();
        assert_eq!(follow_up, Some(Action::IssueSelected("1".to_string())));
    }

    #[test]
    fn test_unselectable_rows_ignore_activation() {
        let mut t = table(sample()).with_options(TableOptions {
            selectable_row: false,
            ..Default::default()
        });
        assert_eq!(t.handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)).unwrap(), None);
        t.update(Action::ClickRow(0)).unwrap();
        assert!(t.selected_row().is_none());
    }

    #[test]
    fn test_footer_drawn_below_selected_row() {
        let mut t = table(sample())
            .with_action_footer(vec![ActionItem::new('v', "View details", Action::OpenIssueDetail)]);
        t.update(Action::ClickRow(0)).unwrap();
        let screen = render(&mut t, 70, 14);

        let row_line = screen.iter().position(|l| l.contains("Open")).unwrap();
        assert!(screen[row_line + 1].contains("View details"));
        assert!(screen[row_line + 2].contains("Resolved"));
    }

    fn only_floor_dock() -> Vec<ActionItem> {
        vec![ActionItem::new('F', "Only this floor", Action::ClearFilters)]
    }

    #[test]
    fn test_rows_cannot_be_activated_while_loading() {
        let calls = Rc::new(Cell::new(0));
        let calls_cb = Rc::clone(&calls);
        let mut t = table(sample()).on_row_select(move |r: &Row| {
            calls_cb.set(calls_cb.get() + 1);
            Some(Action::IssueSelected(r["floor"].to_string()))
        });
        t.set_dock_actions(only_floor_dock());
        t.set_loading(true);

        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(t.handle_key_event(enter).unwrap(), None);
        assert_eq!(t.update(Action::ActivateRow).unwrap(), None);
        assert_eq!(t.update(Action::ClickRow(0)).unwrap(), None);
        assert_eq!(calls.get(), 0);
        assert!(t.selected_row().is_none());
        assert!(!t.dock_visible());

        t.set_loading(false);
        assert_eq!(t.handle_key_event(enter).unwrap(), Some(Action::ActivateRow));
        assert_eq!(t.update(Action::ActivateRow).unwrap(), Some(Action::IssueSelected("1".to_string())));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_footer_keys_need_the_footer_on_screen() {
        let mut t = table(sample())
            .with_action_footer(vec![ActionItem::new('v', "View details", Action::OpenIssueDetail)]);
        t.set_dock_actions(only_floor_dock());
        t.update(Action::ClickRow(1)).unwrap();
        assert_eq!(t.handle_key_event(key('v')).unwrap(), Some(Action::OpenIssueDetail));

        // Searching hides the selected row and its footer; the dock stays
        for c in "open".chars() {
            t.update(Action::SearchInput(c)).unwrap();
        }
        assert!(t.selected_row().is_some());
        assert_eq!(t.handle_key_event(key('v')).unwrap(), None);
        assert_eq!(t.handle_key_event(key('F')).unwrap(), Some(Action::ClearFilters));
        assert!(!screen_contains(&render(&mut t, 70, 14), "View details"));
    }

    #[test]
    fn test_squeezed_body_leaves_dock_line_to_dock_items() {
        let mut t = table(sample()).with_options(TableOptions {
            bordered: Bordered::None,
            ..Default::default()
        });
        t.set_dock_actions(only_floor_dock());
        t.update(Action::ClickRow(0)).unwrap();

        // Toolbar, rule, header, separator, dock: no room for rows
        render(&mut t, 70, 5);
        assert!(t
            .hit_areas
            .iter()
            .all(|(_, action)| !matches!(action, Action::ClickRow(_))));
        assert!(t.hit_areas.iter().any(|(rect, action)| rect.y == 4 && *action == Action::ClearFilters));
    }

    #[test]
    fn test_footer_and_dock_keys_need_a_selection() {
        let mut t = table(sample())
            .with_action_footer(vec![ActionItem::new('v', "View details", Action::OpenIssueDetail)]);
        t.set_dock_actions(only_floor_dock());
        assert_eq!(t.handle_key_event(key('v')).unwrap(), None);

        t.update(Action::ClickRow(1)).unwrap();
        assert_eq!(t.handle_key_event(key('v')).unwrap(), Some(Action::OpenIssueDetail));
        assert_eq!(t.handle_key_event(key('F')).unwrap(), Some(Action::ClearFilters));
        assert_eq!(t.handle_key_event(key('x')).unwrap(), Some(Action::Deselect));
    }

    #[test]
    fn test_dock_requires_selection_and_actions() {
        let mut t = table(sample()).with_options(TableOptions {
            show_deselect: true,
            ..Default::default()
        });
        t.set_dock_actions(only_floor_dock());
        assert!(!screen_contains(&render(&mut t, 70, 12), "Only this floor"));

        t.update(Action::ClickRow(0)).unwrap();
        let screen = render(&mut t, 70, 12);
        let last = screen.last().unwrap();
        assert!(last.contains("Only this floor"));
        assert!(last.contains("Deselect"));

        t.set_dock_actions(Vec::new());
        assert!(!screen_contains(&render(&mut t, 70, 12), "Deselect"));
    }

    #[test]
    fn test_search_mode_captures_keys() {
        let mut t = table(sample());
        assert_eq!(t.handle_key_event(key('/')).unwrap(), Some(Action::EnterSearchMode));
        t.update(Action::EnterSearchMode).unwrap();
        assert_eq!(t.handle_key_event(key('j')).unwrap(), Some(Action::SearchInput('j')));
        assert_eq!(
            t.handle_key_event(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)).unwrap(),
            Some(Action::ClearSearch)
        );
        assert_eq!(
            t.handle_key_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)).unwrap(),
            Some(Action::ExitSearchMode)
        );
    }

    #[test]
    fn test_hidden_toolbar_disables_search_and_columns() {
        let mut t = table(sample()).with_options(TableOptions {
            hide_header: true,
            ..Default::default()
        });
        assert_eq!(t.handle_key_event(key('/')).unwrap(), None);
        assert_eq!(t.handle_key_event(key('c')).unwrap(), None);
        assert!(!screen_contains(&render(&mut t, 60, 10), "Search"));
    }

    #[test]
    fn test_header_click_cycles_sort() {
        let mut t = table(vec![row("2", "Open"), row("10", "Open"), row("1", "Open")]).with_options(
            TableOptions {
                bordered: Bordered::None,
                ..Default::default()
            },
        );
        let screen = render(&mut t, 60, 12);
        let header_y = screen.iter().position(|l| l.contains("Floor")).unwrap() as u16;
        let header_x = screen[header_y as usize].find("Floor").unwrap() as u16;

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: header_x,
            row: header_y,
            modifiers: KeyModifiers::NONE,
        };
        let action = t.handle_mouse_event(click).unwrap();
        assert_eq!(action, Some(Action::CycleSortColumn("floor".to_string())));

        t.update(Action::CycleSortColumn("floor".to_string())).unwrap();
        let screen = render(&mut t, 60, 12);
        let order: Vec<usize> = ["1 ", "2 ", "10"]
            .iter()
            .map(|needle| screen.iter().position(|l| l.trim_start().starts_with(needle)).unwrap())
            .collect();
        assert!(order[0] < order[1] && order[1] < order[2]);
        assert!(screen_contains(&screen, "Floor ↑"));
    }

    #[test]
    fn test_focus_and_sort_keys() {
        let mut t = table(sample());
        assert_eq!(t.handle_key_event(key('l')).unwrap(), Some(Action::NextColumn));
        t.update(Action::NextColumn).unwrap();
        t.update(Action::NextColumn).unwrap();
        t.update(Action::CycleSort).unwrap();
        assert!(t.model().sorting().direction_of("status").is_some());
    }

    #[test]
    fn test_toggle_column_keeps_focus_in_range() {
        let mut t = table(sample());
        t.update(Action::NextColumn).unwrap();
        t.update(Action::ToggleColumn("status".to_string())).unwrap();
        assert_eq!(t.focused_column, 0);
        // Last visible column stays
        t.update(Action::ToggleColumn("floor".to_string())).unwrap();
        let entries = t.column_entries();
        assert!(entries[0].visible);
        assert!(!entries[1].visible);
    }

    #[test]
    fn test_cursor_moves_within_rows() {
        let mut t = table(sample());
        t.update(Action::NextRow).unwrap();
        t.update(Action::NextRow).unwrap();
        assert_eq!(t.cursor, 1);
        t.update(Action::FirstRow).unwrap();
        assert_eq!(t.cursor, 0);
        t.update(Action::LastRow).unwrap();
        assert_eq!(t.cursor, 1);
    }

    #[test]
    fn test_set_data_clears_selection() {
        let mut t = table(sample());
        t.update(Action::ClickRow(1)).unwrap();
        t.set_data(vec![row("5", "Open")]);
        assert!(t.selected_row().is_none());
        assert_eq!(t.cursor, 0);
    }
}

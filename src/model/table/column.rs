//! Column schema for the generic data table

use super::value::CellValue;
use crate::theme::Theme;
use ratatui::text::Span;

pub type ColumnId = String;

type HeaderFn = Box<dyn Fn() -> String>;
type AccessorFn<T> = Box<dyn Fn(&T) -> CellValue>;
type CellFn<T> = Box<dyn Fn(&T, &CellValue, &Theme) -> Span<'static>>;

/// Describes how to read and render one field of a row
///
/// A column without an accessor reads `CellValue::Empty` for every row and
/// therefore renders blank cells.
pub struct ColumnDef<T> {
    pub id: ColumnId,
    header: HeaderFn,
    accessor: Option<AccessorFn<T>>,
    cell: Option<CellFn<T>>,
    pub sortable: bool,
    pub max_width: usize,
}

impl<T> ColumnDef<T> {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let title = id.clone();
        Self {
            id,
            header: Box::new(move || title.clone()),
            accessor: None,
            cell: None,
            sortable: true,
            max_width: 40,
        }
    }

    /// Static header title
    pub fn header(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.header = Box::new(move || title.clone());
        self
    }

    pub fn accessor(mut self, accessor: impl Fn(&T) -> CellValue + 'static) -> Self {
        self.accessor = Some(Box::new(accessor));
        self
    }

    pub fn cell(mut self, render: impl Fn(&T, &CellValue, &Theme) -> Span<'static> + 'static) -> Self {
        self.cell = Some(Box::new(render));
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn max_width(mut self, width: usize) -> Self {
        self.max_width = width.max(1);
        self
    }

    pub fn value(&self, row: &T) -> CellValue {
        match &self.accessor {
            Some(accessor) => accessor(row),
            None => CellValue::Empty,
        }
    }

    pub fn render_header(&self) -> String {
        (self.header)()
    }

    /// Render a cell, falling back to the value's display string
    pub fn render_cell(&self, row: &T, theme: &Theme) -> Span<'static> {
        let value = self.value(row);
        match &self.cell {
            Some(render) => render(row, &value, theme),
            None => Span::styled(value.to_string(), theme.text()),
        }
    }
}

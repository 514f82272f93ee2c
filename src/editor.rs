//! Chart editor state management.
//!
//! Holds the in-memory data rows for one chart editor, the row
//! selection, and the text-input mode used to edit a row's fields.
//! Rendering lives in the ui module; persistence in the data layer.

use chrono::Utc;

use crate::data::{ChartDraft, ChartKind, DataPoint};

/// Which field of a data row is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Label,
    Value,
    Color,
}

impl EditField {
    pub fn title(self) -> &'static str {
        match self {
            EditField::Label => "label",
            EditField::Value => "value",
            EditField::Color => "color",
        }
    }
}

/// An in-progress text edit of one field of the selected row
#[derive(Debug, Clone)]
pub struct InputState {
    pub field: EditField,
    pub buffer: String,
}

/// State for one chart editor (bar or pie)
#[derive(Debug)]
pub struct EditorState {
    pub kind: ChartKind,
    pub rows: Vec<DataPoint>,
    pub selected: usize,
    pub input: Option<InputState>,
    palette: Vec<String>,
    /// Rotates through the palette so new rows get varied colors
    next_color: usize,
}

impl EditorState {
    /// Create an editor pre-filled with the starter rows for its kind
    pub fn new(kind: ChartKind, palette: Vec<String>) -> Self {
        let rows = starter_rows(kind);
        let next_color = rows.len();
        EditorState {
            kind,
            rows,
            selected: 0,
            input: None,
            palette,
            next_color,
        }
    }

    /// Move selection down, wrapping
    pub fn select_next(&mut self) {
        if !self.rows.is_empty() {
            self.selected = (self.selected + 1) % self.rows.len();
        }
    }

    /// Move selection up, wrapping
    pub fn select_prev(&mut self) {
        if !self.rows.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.rows.len() - 1);
        }
    }

    /// Append an empty row with the next palette color and select it
    pub fn add_row(&mut self) {
        let color = self.next_palette_color();
        self.rows.push(DataPoint::new("", 0.0, color));
        self.selected = self.rows.len() - 1;
    }

    /// Remove the selected row. Keeps at least one row, returning false
    /// when the removal was refused.
    pub fn remove_selected(&mut self) -> bool {
        if self.rows.len() <= 1 {
            return false;
        }
        self.rows.remove(self.selected);
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len() - 1;
        }
        true
    }

    /// Begin editing a field of the selected row, seeding the buffer
    /// with the current value
    pub fn begin_edit(&mut self, field: EditField) {
        let Some(row) = self.rows.get(self.selected) else {
            return;
        };
        let buffer = match field {
            EditField::Label => row.label.clone(),
            EditField::Value => format_value(row.value),
            EditField::Color => row.color.clone(),
        };
        self.input = Some(InputState { field, buffer });
    }

    pub fn is_editing(&self) -> bool {
        self.input.is_some()
    }

    /// Append a character to the edit buffer
    pub fn push_char(&mut self, c: char) {
        if let Some(input) = self.input.as_mut() {
            input.buffer.push(c);
        }
    }

    /// Remove the last character from the edit buffer
    pub fn pop_char(&mut self) {
        if let Some(input) = self.input.as_mut() {
            input.buffer.pop();
        }
    }

    /// Abandon the current edit
    pub fn cancel_edit(&mut self) {
        self.input = None;
    }

    /// Commit the current edit into the selected row.
    ///
    /// Returns an error message (and keeps the input open) when a value
    /// edit does not parse as a number.
    pub fn commit_edit(&mut self) -> Result<(), String> {
        let Some(input) = self.input.as_ref() else {
            return Ok(());
        };
        let Some(row) = self.rows.get_mut(self.selected) else {
            self.input = None;
            return Ok(());
        };

        match input.field {
            EditField::Label => row.label = input.buffer.clone(),
            EditField::Value => match input.buffer.trim().parse::<f64>() {
                Ok(value) => row.value = value,
                Err(_) => {
                    return Err(format!("'{}' is not a number", input.buffer));
                }
            },
            EditField::Color => row.color = input.buffer.trim().to_string(),
        }

        self.input = None;
        Ok(())
    }

    /// Replace the rows with a canned sample data set
    pub fn load_sample(&mut self) {
        self.rows = sample_rows(self.kind);
        self.selected = 0;
        self.next_color = self.rows.len();
    }

    /// Replace the rows with 2-5 random data points from the palette
    pub fn randomize(&mut self) {
        const LABELS: [&str; 5] = ["Alpha", "Beta", "Gamma", "Delta", "Epsilon"];
        let count = fastrand::usize(2..=LABELS.len());
        self.rows = LABELS[..count]
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let value = fastrand::u32(10..100) as f64;
                let color = self.palette[i % self.palette.len()].clone();
                DataPoint::new(*label, value, color)
            })
            .collect();
        self.selected = 0;
        self.next_color = self.rows.len();
    }

    /// Build a save input from the current rows, stamped with now
    pub fn draft(&self) -> ChartDraft {
        ChartDraft::new(self.kind, self.rows.clone(), Utc::now())
    }

    fn next_palette_color(&mut self) -> String {
        let color = self.palette[self.next_color % self.palette.len()].clone();
        self.next_color += 1;
        color
    }
}

/// Default rows shown when an editor first opens
fn starter_rows(kind: ChartKind) -> Vec<DataPoint> {
    match kind {
        ChartKind::Bar => vec![
            DataPoint::new("Product A", 45.0, "#3B82F6"),
            DataPoint::new("Product B", 32.0, "#10B981"),
            DataPoint::new("Product C", 28.0, "#F59E0B"),
        ],
        ChartKind::Pie => vec![
            DataPoint::new("Category A", 35.0, "#3B82F6"),
            DataPoint::new("Category B", 25.0, "#10B981"),
            DataPoint::new("Category C", 20.0, "#F59E0B"),
            DataPoint::new("Category D", 20.0, "#EF4444"),
        ],
    }
}

/// Canned sample data sets, one per chart kind
fn sample_rows(kind: ChartKind) -> Vec<DataPoint> {
    match kind {
        ChartKind::Bar => vec![
            DataPoint::new("Sales Q1", 85.0, "#3B82F6"),
            DataPoint::new("Sales Q2", 92.0, "#10B981"),
            DataPoint::new("Sales Q3", 76.0, "#F59E0B"),
            DataPoint::new("Sales Q4", 88.0, "#EF4444"),
        ],
        ChartKind::Pie => vec![
            DataPoint::new("Mobile", 42.0, "#3B82F6"),
            DataPoint::new("Desktop", 35.0, "#10B981"),
            DataPoint::new("Tablet", 18.0, "#F59E0B"),
            DataPoint::new("Other", 5.0, "#EF4444"),
        ],
    }
}

/// Format a row value for the edit buffer (drop a trailing .0)
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

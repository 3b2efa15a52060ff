//! Form state for the twelve input controls.
//!
//! The form is laid out as four rows of three cells in registry order. Numeric
//! cells step within their domain and categorical cells cycle through their
//! labels, so the form itself never holds an out-of-domain value; the pipeline
//! still validates whatever it is handed.

use crate::domain::{Domain, Field};
use crate::request::{RawInput, RawValue};

/// Cells per form row.
pub const COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Control {
    Number { value: f64, min: f64, max: f64, step: f64 },
    Choice { labels: &'static [&'static str], index: usize },
}

impl Control {
    fn for_domain(domain: Domain) -> Self {
        match domain {
            Domain::Numeric { min, max, step } => Control::Number { value: min, min, max, step },
            Domain::Categorical(labels) => Control::Choice { labels, index: 0 },
        }
    }

    fn raw(&self) -> RawValue {
        match *self {
            Control::Number { value, .. } => RawValue::Number(value),
            Control::Choice { labels, index } => RawValue::Text(labels[index].to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    controls: Vec<Control>,
    selected: usize,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    pub fn new() -> Self {
        let controls = Field::ALL
            .iter()
            .map(|field| Control::for_domain(field.spec().domain))
            .collect();
        Self { controls, selected: 0 }
    }

    pub fn selected(&self) -> Field {
        Field::ALL[self.selected]
    }

    pub fn rows(&self) -> usize {
        Field::COUNT.div_ceil(COLUMNS)
    }

    pub fn move_left(&mut self) {
        if self.selected % COLUMNS > 0 {
            self.selected -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.selected % COLUMNS + 1 < COLUMNS && self.selected + 1 < Field::COUNT {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        if self.selected >= COLUMNS {
            self.selected -= COLUMNS;
        }
    }

    pub fn move_down(&mut self) {
        if self.selected + COLUMNS < Field::COUNT {
            self.selected += COLUMNS;
        }
    }

    /// Move to the next field in form order, wrapping around.
    pub fn next_field(&mut self) {
        self.selected = (self.selected + 1) % Field::COUNT;
    }

    pub fn prev_field(&mut self) {
        self.selected = (self.selected + Field::COUNT - 1) % Field::COUNT;
    }

    /// Step the selected control by `steps` (negative steps go down/back).
    ///
    /// Numeric values are clamped to the domain; labels wrap around.
    pub fn adjust(&mut self, steps: i32) {
        match &mut self.controls[self.selected] {
            Control::Number { value, min, max, step } => {
                *value = (*value + *step * steps as f64).clamp(*min, *max);
            }
            Control::Choice { labels, index } => {
                let n = labels.len() as i64;
                *index = (*index as i64 + steps as i64).rem_euclid(n) as usize;
            }
        }
    }

    /// Current value of `field`, as shown in its cell.
    pub fn display_value(&self, field: Field) -> String {
        match self.controls[field.index()] {
            Control::Number { value, .. } => format!("{value}"),
            Control::Choice { labels, index } => match labels[index] {
                "" => "(unspecified)".to_string(),
                label => label.to_string(),
            },
        }
    }

    /// The raw input handed to the pipeline.
    pub fn to_raw(&self) -> RawInput {
        let mut raw = RawInput::new();
        for (field, control) in Field::ALL.iter().zip(&self.controls) {
            raw.set(field.name(), control.raw());
        }
        raw
    }

    /// `"Name": value` lines in form order, for the summary view.
    pub fn summary_lines(&self) -> Vec<String> {
        Field::ALL
            .iter()
            .zip(&self.controls)
            .map(|(field, control)| match control.raw() {
                RawValue::Number(v) => format!("\"{}\": {v}", field.name()),
                RawValue::Text(s) => format!("\"{}\": {s:?}", field.name()),
            })
            .collect()
    }
}

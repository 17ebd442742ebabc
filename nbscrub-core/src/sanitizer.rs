//! The document sanitizer: walks cells and outputs and hands every textual
//! leaf to the [`StringCleaner`].
//!
//! Only `source`, `outputs[].text` and the values of `outputs[].data` are
//! visited. A string field stays a string and a sequence keeps its length;
//! anything that is not text is skipped.
//!
//! License: MIT OR Apache-2.0

use log::{debug, info};
use serde_json::{Map, Value};

use crate::config::ScrubConfig;
use crate::errors::ScrubError;
use crate::notebook::{AnyValue, Notebook, TextOrSequence, DATA, OUTPUTS, SOURCE, TEXT};
use crate::report::SanitizeReport;
use crate::text::StringCleaner;

#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    cleaner: StringCleaner,
}

impl Sanitizer {
    pub fn new(cleaner: StringCleaner) -> Self {
        Self { cleaner }
    }

    /// Builds a sanitizer whose cleaner strips the configured code points.
    pub fn from_config(config: &ScrubConfig) -> Result<Self, ScrubError> {
        Ok(Self::new(StringCleaner::new(config.strip_chars()?)))
    }

    /// Cleans every text-bearing field of the notebook in place.
    ///
    /// The notebook's shape was validated when it was parsed, so the walk
    /// itself cannot fail.
    pub fn sanitize(&self, notebook: &mut Notebook) -> SanitizeReport {
        info!("Cleaning {} cell(s).", notebook.cell_count());
        let mut report = SanitizeReport {
            replaced_on_read: notebook.replaced_on_read(),
            ..SanitizeReport::default()
        };

        for cell in notebook.cells_mut() {
            report.cells += 1;
            self.sanitize_cell(cell, &mut report);
        }

        debug!(
            "Visited {} string(s), changed {}, removed {} character(s).",
            report.strings_visited, report.strings_changed, report.characters_removed
        );
        report
    }

    fn sanitize_cell(&self, cell: &mut Map<String, Value>, report: &mut SanitizeReport) {
        if let Some(source) = cell.get_mut(SOURCE) {
            self.clean_field(source.into(), report);
        }

        let Some(Value::Array(outputs)) = cell.get_mut(OUTPUTS) else {
            return;
        };
        for output in outputs.iter_mut().filter_map(Value::as_object_mut) {
            report.outputs += 1;
            if let Some(text) = output.get_mut(TEXT) {
                self.clean_field(text.into(), report);
            }
            if let Some(Value::Object(data)) = output.get_mut(DATA) {
                for value in data.values_mut() {
                    self.clean_field(value.into(), report);
                }
            }
        }
    }

    fn clean_field(&self, field: TextOrSequence<'_>, report: &mut SanitizeReport) {
        match field {
            TextOrSequence::Text(s) => report.record(self.cleaner.clean_string(s)),
            TextOrSequence::Sequence(items) => {
                for item in items.iter_mut() {
                    self.clean_element(item.into(), report);
                }
            }
            TextOrSequence::Other => {}
        }
    }

    fn clean_element(&self, element: AnyValue<'_>, report: &mut SanitizeReport) {
        match element {
            AnyValue::Text(s) => report.record(self.cleaner.clean_string(s)),
            AnyValue::Other => {}
        }
    }
}

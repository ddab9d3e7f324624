use std::collections::BTreeMap;

use crate::error::PanelError;
use crate::models::BlockchainConfig;
use crate::panel::options::{self, Field, OptionList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Pristine,
    Dirty,
}

/// Edit form over the select fields of a layout. Dirtiness is a comparison
/// against the values the form was opened with, so reselecting the saved
/// value keeps the form pristine.
#[derive(Debug, Clone)]
pub struct EditForm {
    fields: &'static [(Field, OptionList)],
    saved: BTreeMap<Field, Option<String>>,
    values: BTreeMap<Field, Option<String>>,
}

impl EditForm {
    pub fn open(fields: &'static [(Field, OptionList)], config: &BlockchainConfig) -> Self {
        let saved: BTreeMap<_, _> = fields
            .iter()
            .map(|(field, _)| (*field, field.get(config).map(str::to_string)))
            .collect();
        Self {
            fields,
            values: saved.clone(),
            saved,
        }
    }

    pub fn fields(&self) -> &'static [(Field, OptionList)] {
        self.fields
    }

    pub fn select(&mut self, field: Field, value: &str) -> Result<(), PanelError> {
        let known = self
            .fields
            .iter()
            .find(|(f, _)| *f == field)
            .is_some_and(|(_, opts)| options::contains(opts, value));
        if !known {
            return Err(PanelError::UnknownOption {
                field: field.label(),
                value: value.to_string(),
            });
        }
        self.values.insert(field, Some(value.to_string()));
        Ok(())
    }

    pub fn value(&self, field: Field) -> Option<&str> {
        self.values.get(&field).and_then(|v| v.as_deref())
    }

    pub fn state(&self) -> FormState {
        if self.values == self.saved {
            FormState::Pristine
        } else {
            FormState::Dirty
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.state() == FormState::Dirty
    }

    /// Fields whose value differs from the saved one
    pub fn changes(&self) -> Vec<(Field, &str)> {
        self.values
            .iter()
            .filter(|(field, value)| self.saved.get(*field) != Some(*value))
            .filter_map(|(field, value)| value.as_deref().map(|v| (*field, v)))
            .collect()
    }

    /// `config` with the changed fields written over it
    pub fn apply_to(&self, config: &BlockchainConfig) -> BlockchainConfig {
        let mut next = config.clone();
        for (field, value) in self.changes() {
            field.set(&mut next, value.to_string());
        }
        next
    }
}

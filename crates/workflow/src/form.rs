//! In-memory form error model.

use pitchside_types::{FieldError, FormField, FormModel};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Field errors for one form, keyed by field.
///
/// Setting an error on a field replaces any previous one.
#[derive(Default)]
pub struct FormErrors {
    errors: Mutex<HashMap<FormField, FieldError>>,
}

impl FormErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, field: FormField) -> Option<FieldError> {
        self.lock().get(&field).cloned()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// All current errors, ordered by field name.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(FormField, FieldError)> {
        let mut all: Vec<_> = self
            .lock()
            .iter()
            .map(|(f, e)| (*f, e.clone()))
            .collect();
        all.sort_by_key(|(f, _)| f.as_str());
        all
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<FormField, FieldError>> {
        // A poisoned map still holds valid errors.
        self.errors
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl FormModel for FormErrors {
    fn set_error(&self, field: FormField, error: FieldError) {
        tracing::debug!(%field, message = %error.message, "field error set");
        self.lock().insert(field, error);
    }
}

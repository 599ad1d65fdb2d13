//! Building blocks shared by the modal forms

/// A labelled value in a select field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption<V> {
    pub value: V,
    pub label: String,
}

impl<V> SelectOption<V> {
    pub fn new(value: V, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// Single-choice field cycled with left/right
#[derive(Debug, Clone)]
pub struct Select<V> {
    options: Vec<SelectOption<V>>,
    selected: Option<usize>,
}

impl<V> Default for Select<V> {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            selected: None,
        }
    }
}

impl<V: Clone + PartialEq> Select<V> {
    /// Replace the options, keeping the selection if its value is still offered
    pub fn set_options(&mut self, options: Vec<SelectOption<V>>) {
        let current = self.value().cloned();
        self.options = options;
        self.selected = current.and_then(|v| self.options.iter().position(|o| o.value == v));
    }

    pub fn options(&self) -> &[SelectOption<V>] {
        &self.options
    }

    pub fn value(&self) -> Option<&V> {
        self.selected.map(|i| &self.options[i].value)
    }

    pub fn label(&self) -> Option<&str> {
        self.selected.map(|i| self.options[i].label.as_str())
    }

    /// Move to the next (or previous) option. Returns whether the value changed.
    pub fn cycle(&mut self, forward: bool) -> bool {
        let len = self.options.len();
        if len == 0 {
            return false;
        }
        let next = match (self.selected, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        let changed = self.selected != Some(next);
        self.selected = Some(next);
        changed
    }

    /// Clear the selection. Returns whether anything was selected.
    pub fn clear(&mut self) -> bool {
        self.selected.take().is_some()
    }

    /// Drop options and selection
    pub fn reset(&mut self) {
        self.options.clear();
        self.selected = None;
    }
}

/// Multiple-choice field with its own cursor
#[derive(Debug, Clone)]
pub struct MultiSelect<V> {
    options: Vec<SelectOption<V>>,
    chosen: Vec<V>,
    cursor: usize,
}

impl<V> Default for MultiSelect<V> {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            chosen: Vec::new(),
            cursor: 0,
        }
    }
}

impl<V: Clone + PartialEq> MultiSelect<V> {
    /// Replace the options; chosen values no longer offered are dropped
    pub fn set_options(&mut self, options: Vec<SelectOption<V>>) {
        self.chosen
            .retain(|v| options.iter().any(|o| &o.value == v));
        self.options = options;
        self.cursor = self.cursor.min(self.options.len().saturating_sub(1));
    }

    pub fn options(&self) -> &[SelectOption<V>] {
        &self.options
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_chosen(&self, value: &V) -> bool {
        self.chosen.contains(value)
    }

    /// Chosen values in the order they were picked
    pub fn values(&self) -> &[V] {
        &self.chosen
    }

    pub fn move_cursor(&mut self, forward: bool) {
        if forward {
            if self.cursor + 1 < self.options.len() {
                self.cursor += 1;
            }
        } else {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    /// Toggle the option under the cursor
    pub fn toggle(&mut self) {
        let Some(option) = self.options.get(self.cursor) else {
            return;
        };
        if let Some(pos) = self.chosen.iter().position(|v| v == &option.value) {
            self.chosen.remove(pos);
        } else {
            self.chosen.push(option.value.clone());
        }
    }
}

/// Inline validation message for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError<F> {
    pub field: F,
    pub message: &'static str,
}

impl<F> FieldError<F> {
    pub fn new(field: F, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Look up the first error recorded for `field`
pub fn error_for<F: PartialEq>(errors: &[FieldError<F>], field: F) -> Option<&'static str> {
    errors.iter().find(|e| e.field == field).map(|e| e.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: &[&str]) -> Vec<SelectOption<String>> {
        values
            .iter()
            .map(|v| SelectOption::new(v.to_string(), v.to_uppercase()))
            .collect()
    }

    #[test]
    fn test_select_cycles_and_wraps() {
        let mut select = Select::default();
        select.set_options(options(&["a", "b", "c"]));

        assert!(select.cycle(false));
        assert_eq!(select.value().map(String::as_str), Some("c"));
        assert!(select.cycle(true));
        assert_eq!(select.label(), Some("A"));
    }

    #[test]
    fn test_select_keeps_value_across_reload() {
        let mut select = Select::default();
        select.set_options(options(&["a", "b"]));
        select.cycle(true);
        select.cycle(true);

        select.set_options(options(&["x", "b"]));
        assert_eq!(select.value().map(String::as_str), Some("b"));

        select.set_options(options(&["x"]));
        assert_eq!(select.value(), None);
    }

    #[test]
    fn test_single_option_cycle_reports_no_change() {
        let mut select = Select::default();
        select.set_options(options(&["only"]));
        assert!(select.cycle(true));
        assert!(!select.cycle(true));
        assert!(select.clear());
        assert!(!select.clear());
    }

    #[test]
    fn test_multi_select_toggle_and_reload() {
        let mut roles = MultiSelect::default();
        roles.set_options(vec![
            SelectOption::new(1, "Admin"),
            SelectOption::new(4, "Dispatcher"),
        ]);
        roles.toggle();
        roles.move_cursor(true);
        roles.toggle();
        assert_eq!(roles.values(), &[1, 4]);

        roles.toggle();
        assert_eq!(roles.values(), &[1]);

        roles.set_options(vec![SelectOption::new(4, "Dispatcher")]);
        assert!(roles.values().is_empty());
        assert_eq!(roles.cursor(), 0);
    }
}

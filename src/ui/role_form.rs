//! Role creation modal

use super::forms::{FieldError, error_for};
use crate::models::NewRole;

pub const ROLE_ADD_FALLBACK: &str = "Failed to add role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleField {
    Name,
    Description,
}

impl RoleField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Role name",
            Self::Description => "Description",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Name => Self::Description,
            Self::Description => Self::Name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoleForm {
    pub focus: RoleField,
    pub name: String,
    pub description: String,
    pub submitting: bool,
    errors: Vec<FieldError<RoleField>>,
}

impl Default for RoleForm {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleForm {
    pub fn new() -> Self {
        Self {
            focus: RoleField::Name,
            name: String::new(),
            description: String::new(),
            submitting: false,
            errors: Vec::new(),
        }
    }

    fn focused_text(&mut self) -> &mut String {
        match self.focus {
            RoleField::Name => &mut self.name,
            RoleField::Description => &mut self.description,
        }
    }

    pub fn input_char(&mut self, c: char) {
        self.focused_text().push(c);
    }

    pub fn backspace(&mut self) {
        self.focused_text().pop();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn error(&self, field: RoleField) -> Option<&'static str> {
        error_for(&self.errors, field)
    }

    /// Validate and build the payload; errors are kept for display
    pub fn validate(&mut self) -> Option<NewRole> {
        self.errors.clear();
        let name = self.name.trim();
        if name.is_empty() {
            self.errors
                .push(FieldError::new(RoleField::Name, "Please enter a role name"));
            return None;
        }

        let description = self.description.trim();
        Some(NewRole {
            name: name.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(form: &mut RoleForm, text: &str) {
        text.chars().for_each(|c| form.input_char(c));
    }

    #[test]
    fn test_name_is_required() {
        let mut form = RoleForm::new();
        type_text(&mut form, "   ");

        assert_eq!(form.validate(), None);
        assert_eq!(form.error(RoleField::Name), Some("Please enter a role name"));
    }

    #[test]
    fn test_description_is_optional() {
        let mut form = RoleForm::new();
        type_text(&mut form, "Dispatcher");

        assert_eq!(
            form.validate(),
            Some(NewRole {
                name: "Dispatcher".to_string(),
                description: None,
            })
        );

        form.focus_next();
        type_text(&mut form, "Handles night shifts");
        assert_eq!(
            form.validate().and_then(|r| r.description),
            Some("Handles night shifts".to_string())
        );
        assert_eq!(form.error(RoleField::Name), None);
    }
}

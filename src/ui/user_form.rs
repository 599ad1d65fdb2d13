//! User creation modal.
//!
//! Besides the flat fields, the form holds the lookup lists it offers
//! (organizations, companies, provinces, cities, roles). Cities depend on the
//! chosen province: changing the province clears the city and yields the
//! province code whose cities must be fetched, and a city list is only
//! accepted while its province is still the one selected.

use super::forms::{FieldError, MultiSelect, Select, SelectOption, error_for};
use crate::api::ApiError;
use crate::models::{Area, Company, DATE_FORMAT, NewUser, OrgNode, Role};
use chrono::NaiveDate;

pub const USER_ADD_FALLBACK: &str = "Failed to add user";
pub const CITY_FALLBACK: &str = "Failed to load city list";
pub const DEFAULT_MAP_LEVEL: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Name,
    Account,
    Password,
    ConfirmPassword,
    Org,
    Company,
    Province,
    City,
    MapLevel,
    StartDate,
    EndDate,
    FreezeUponExpiration,
    Roles,
}

/// How a field is edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Secret,
    Choice,
    Switch,
    Multi,
}

impl UserField {
    pub const ALL: [UserField; 13] = [
        Self::Name,
        Self::Account,
        Self::Password,
        Self::ConfirmPassword,
        Self::Org,
        Self::Company,
        Self::Province,
        Self::City,
        Self::MapLevel,
        Self::StartDate,
        Self::EndDate,
        Self::FreezeUponExpiration,
        Self::Roles,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Account => "Account",
            Self::Password => "Password",
            Self::ConfirmPassword => "Confirm password",
            Self::Org => "Organization",
            Self::Company => "Company",
            Self::Province => "Province",
            Self::City => "City",
            Self::MapLevel => "Map level",
            Self::StartDate => "Start date",
            Self::EndDate => "End date",
            Self::FreezeUponExpiration => "Freeze on expiry",
            Self::Roles => "Roles",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Password | Self::ConfirmPassword => FieldKind::Secret,
            Self::Org | Self::Company | Self::Province | Self::City => FieldKind::Choice,
            Self::FreezeUponExpiration => FieldKind::Switch,
            Self::Roles => FieldKind::Multi,
            _ => FieldKind::Text,
        }
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone)]
pub struct UserForm {
    pub focus: UserField,
    pub name: String,
    pub account: String,
    pub password: String,
    pub confirm_password: String,
    pub map_level: String,
    pub start_date: String,
    pub end_date: String,
    pub freeze_upon_expiration: bool,
    pub orgs: Select<String>,
    pub companies: Select<String>,
    pub provinces: Select<String>,
    pub cities: Select<String>,
    pub roles: MultiSelect<i64>,
    pub loading_cities: bool,
    pub submitting: bool,
    errors: Vec<FieldError<UserField>>,
}

impl Default for UserForm {
    fn default() -> Self {
        Self::new()
    }
}

impl UserForm {
    pub fn new() -> Self {
        Self {
            focus: UserField::Name,
            name: String::new(),
            account: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            map_level: DEFAULT_MAP_LEVEL.to_string(),
            start_date: String::new(),
            end_date: String::new(),
            freeze_upon_expiration: true,
            orgs: Select::default(),
            companies: Select::default(),
            provinces: Select::default(),
            cities: Select::default(),
            roles: MultiSelect::default(),
            loading_cities: false,
            submitting: false,
            errors: Vec::new(),
        }
    }

    pub fn set_orgs(&mut self, nodes: &[OrgNode]) {
        self.orgs.set_options(
            nodes
                .iter()
                .map(|n| SelectOption::new(n.id.clone(), n.name.clone()))
                .collect(),
        );
    }

    pub fn set_companies(&mut self, companies: Vec<Company>) {
        self.companies.set_options(
            companies
                .into_iter()
                .map(|c| SelectOption::new(c.id, c.name))
                .collect(),
        );
    }

    pub fn set_provinces(&mut self, provinces: Vec<Area>) {
        self.provinces.set_options(
            provinces
                .into_iter()
                .map(|a| SelectOption::new(a.code, a.name))
                .collect(),
        );
    }

    pub fn set_roles(&mut self, roles: Vec<Role>) {
        self.roles.set_options(
            roles
                .into_iter()
                .map(|r| SelectOption::new(r.id, r.name))
                .collect(),
        );
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            UserField::Name => Some(&mut self.name),
            UserField::Account => Some(&mut self.account),
            UserField::Password => Some(&mut self.password),
            UserField::ConfirmPassword => Some(&mut self.confirm_password),
            UserField::MapLevel => Some(&mut self.map_level),
            UserField::StartDate => Some(&mut self.start_date),
            UserField::EndDate => Some(&mut self.end_date),
            _ => None,
        }
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(text) = self.focused_text() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text() {
            text.pop();
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Left/right on the focused field.
    ///
    /// Returns the province code whose cities must now be loaded, if the
    /// province changed.
    pub fn cycle(&mut self, forward: bool) -> Option<String> {
        match self.focus {
            UserField::Org => {
                self.orgs.cycle(forward);
            }
            UserField::Company => {
                self.companies.cycle(forward);
            }
            UserField::Province => {
                if self.provinces.cycle(forward) {
                    return self.province_changed();
                }
            }
            UserField::City => {
                if self.provinces.value().is_some() && !self.loading_cities {
                    self.cities.cycle(forward);
                }
            }
            UserField::FreezeUponExpiration => {
                self.freeze_upon_expiration = !self.freeze_upon_expiration;
            }
            UserField::Roles => self.roles.move_cursor(forward),
            _ => {}
        }
        None
    }

    /// Space on the focused field: flips the switch or toggles a role
    pub fn toggle(&mut self) {
        match self.focus {
            UserField::FreezeUponExpiration => {
                self.freeze_upon_expiration = !self.freeze_upon_expiration;
            }
            UserField::Roles => self.roles.toggle(),
            _ => {}
        }
    }

    /// Clear the focused choice. Clearing the province empties the cities
    /// without loading anything.
    pub fn clear_choice(&mut self) {
        match self.focus {
            UserField::Org => {
                self.orgs.clear();
            }
            UserField::Company => {
                self.companies.clear();
            }
            UserField::Province => {
                if self.provinces.clear() {
                    self.cities.reset();
                    self.loading_cities = false;
                }
            }
            UserField::City => {
                self.cities.clear();
            }
            _ => {}
        }
    }

    fn province_changed(&mut self) -> Option<String> {
        self.cities.reset();
        let code = self.provinces.value().cloned();
        self.loading_cities = code.is_some();
        code
    }

    /// Apply a city list fetched for `province`.
    ///
    /// Lists for a province that is no longer selected are dropped. Returns
    /// the message to show when the load failed.
    pub fn apply_cities(
        &mut self,
        province: &str,
        result: Result<Vec<Area>, ApiError>,
    ) -> Option<String> {
        if self.provinces.value().map(String::as_str) != Some(province) {
            tracing::debug!(province, "discarding cities of a deselected province");
            return None;
        }
        self.loading_cities = false;

        match result {
            Ok(cities) => {
                self.cities.set_options(
                    cities
                        .into_iter()
                        .map(|a| SelectOption::new(a.code, a.name))
                        .collect(),
                );
                None
            }
            Err(e) => {
                tracing::warn!(province, error = %e, "failed to load cities");
                self.cities.reset();
                Some(e.user_message(CITY_FALLBACK))
            }
        }
    }

    pub fn error(&self, field: UserField) -> Option<&'static str> {
        error_for(&self.errors, field)
    }

    /// Validate every field and build the payload.
    ///
    /// On failure the field errors are kept for inline display and `None`
    /// is returned; nothing should be sent.
    pub fn validate(&mut self, parent_path: String) -> Option<NewUser> {
        let mut errors = Vec::new();

        let mut required = |value: &str, field, message| {
            if value.trim().is_empty() {
                errors.push(FieldError::new(field, message));
            }
        };
        required(&self.name, UserField::Name, "Please enter a name");
        required(&self.account, UserField::Account, "Please enter an account");
        required(&self.password, UserField::Password, "Please enter a password");
        required(
            &self.confirm_password,
            UserField::ConfirmPassword,
            "Please confirm the password",
        );

        if !self.confirm_password.is_empty() && self.confirm_password != self.password {
            errors.push(FieldError::new(
                UserField::ConfirmPassword,
                "The two passwords do not match",
            ));
        }

        let org_id = self.orgs.value().cloned();
        if org_id.is_none() {
            errors.push(FieldError::new(UserField::Org, "Please select an organization"));
        }
        let company_id = self.companies.value().cloned();
        if company_id.is_none() {
            errors.push(FieldError::new(UserField::Company, "Please select a company"));
        }
        let province = self.provinces.value().cloned();
        if province.is_none() {
            errors.push(FieldError::new(UserField::Province, "Please select a province"));
        }
        let city = self.cities.value().cloned();
        if city.is_none() {
            errors.push(FieldError::new(UserField::City, "Please select a city"));
        }

        let map_level = parse_field(
            &self.map_level,
            UserField::MapLevel,
            "Please enter a map level",
            "Map level must be a whole number",
            |s| s.parse::<u32>().ok(),
            &mut errors,
        );
        let start_date = parse_field(
            &self.start_date,
            UserField::StartDate,
            "Please select a start date",
            "Start date must be YYYY-MM-DD",
            parse_date,
            &mut errors,
        );
        let end_date = parse_field(
            &self.end_date,
            UserField::EndDate,
            "Please select an end date",
            "End date must be YYYY-MM-DD",
            parse_date,
            &mut errors,
        );

        if self.roles.values().is_empty() {
            errors.push(FieldError::new(UserField::Roles, "Please select at least one role"));
        }

        self.errors = errors;

        match (org_id, company_id, province, city, map_level, start_date, end_date) {
            (
                Some(org_id),
                Some(company_id),
                Some(province),
                Some(city),
                Some(map_level),
                Some(start_date),
                Some(end_date),
            ) if self.errors.is_empty() => Some(NewUser {
                name: self.name.trim().to_string(),
                account: self.account.trim().to_string(),
                password: self.password.clone(),
                org_id,
                company_id,
                province,
                city,
                map_level,
                start_date,
                end_date,
                freeze_upon_expiration: self.freeze_upon_expiration,
                role_ids: self.roles.values().to_vec(),
                parent_path,
            }),
            _ => None,
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Required field that must also parse
fn parse_field<T>(
    raw: &str,
    field: UserField,
    missing: &'static str,
    malformed: &'static str,
    parse: impl Fn(&str) -> Option<T>,
    errors: &mut Vec<FieldError<UserField>>,
) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.push(FieldError::new(field, missing));
        return None;
    }
    let parsed = parse(raw);
    if parsed.is_none() {
        errors.push(FieldError::new(field, malformed));
    }
    parsed
}

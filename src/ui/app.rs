//! Application state and event handling

use super::input::{InputMode, KeyBindings};
use super::org_tree::{OrgTree, TREE_FALLBACK};
use super::role_form::{ROLE_ADD_FALLBACK, RoleForm};
use super::user_form::{USER_ADD_FALLBACK, UserForm};
use super::user_list::{FetchOutcome, PageFetch, UserList};
use crate::api::{ApiError, FleetClient};
use crate::models::{Area, Company, NewRole, NewUser, OrgNode, Role, UserPage};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Completion of a background API call
#[derive(Debug)]
pub enum AppEvent {
    TreeLoaded(Result<Vec<OrgNode>, ApiError>),
    UsersLoaded {
        seq: u64,
        result: Result<UserPage, ApiError>,
    },
    FormOrgsLoaded(Result<Vec<OrgNode>, ApiError>),
    RolesLoaded(Result<Vec<Role>, ApiError>),
    CompaniesLoaded(Result<Vec<Company>, ApiError>),
    ProvincesLoaded(Result<Vec<Area>, ApiError>),
    CitiesLoaded {
        province: String,
        result: Result<Vec<Area>, ApiError>,
    },
    UserAdded(Result<(), ApiError>),
    RoleAdded(Result<(), ApiError>),
}

/// Which panel receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    Tree,
    #[default]
    Users,
}

/// Severity of the status line message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// Transient notification shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

/// Settings the app is built with
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub page_size: usize,
    pub default_parent_path: String,
    pub keep_org_filter_on_search: bool,
    pub key_bindings: KeyBindings,
}

/// Main application struct
pub struct App {
    /// Fleet API client
    pub client: Arc<FleetClient>,

    events: UnboundedSender<AppEvent>,

    /// Key binding style
    pub key_bindings: KeyBindings,

    /// Input mode
    pub input_mode: InputMode,

    /// Panel with keyboard focus
    pub focus: Focus,

    /// Search box contents, submitted with Enter
    pub search_input: String,

    pub org_tree: OrgTree,

    pub users: UserList,

    /// Open user creation modal
    pub user_form: Option<UserForm>,

    /// Open role creation modal, stacked on the user modal
    pub role_form: Option<RoleForm>,

    /// Feedback message
    pub message: Option<Message>,

    default_parent_path: String,

    /// Should quit
    pub should_quit: bool,
}

impl App {
    /// Create a new app instance and the receiver its API calls report to
    pub fn new(client: Arc<FleetClient>, settings: AppSettings) -> (Self, UnboundedReceiver<AppEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let app = Self {
            client,
            events,
            key_bindings: settings.key_bindings,
            input_mode: InputMode::Normal,
            focus: Focus::Users,
            search_input: String::new(),
            org_tree: OrgTree::new(),
            users: UserList::new(settings.page_size)
                .with_org_filter_on_search(settings.keep_org_filter_on_search),
            user_form: None,
            role_form: None,
            message: None,
            default_parent_path: settings.default_parent_path,
            should_quit: false,
        };
        (app, receiver)
    }

    /// Run `call` on the runtime and deliver its event to the main loop
    fn spawn<F, Fut>(&self, call: F)
    where
        F: FnOnce(Arc<FleetClient>) -> Fut,
        Fut: Future<Output = AppEvent> + Send + 'static,
    {
        let task = call(Arc::clone(&self.client));
        let events = self.events.clone();
        tokio::spawn(async move {
            if events.send(task.await).is_err() {
                tracing::debug!("event receiver closed, dropping API result");
            }
        });
    }

    fn dispatch(&self, fetch: PageFetch) {
        tracing::debug!(seq = fetch.seq, query = ?fetch.query, "fetching user page");
        self.spawn(move |client| async move {
            let result = client.page_users(&fetch.query).await;
            AppEvent::UsersLoaded {
                seq: fetch.seq,
                result,
            }
        });
    }

    fn info(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            kind: MessageKind::Info,
            text: text.into(),
        });
    }

    fn error(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            kind: MessageKind::Error,
            text: text.into(),
        });
    }

    /// Clear the feedback message
    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Load the organization tree and the first page of users
    pub fn start(&mut self) {
        self.org_tree.loading = true;
        self.spawn(|client| async move { AppEvent::TreeLoaded(client.list_groups().await) });
        let fetch = self.users.initial();
        self.dispatch(fetch);
    }

    /// Submit the search box
    pub fn submit_search(&mut self) {
        self.input_mode = InputMode::Normal;
        let fetch = self.users.search(self.search_input.clone());
        self.dispatch(fetch);
    }

    /// Leave the search box without searching
    pub fn cancel_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.search_input = self.users.filter().search_text.clone().unwrap_or_default();
    }

    /// Filter by the tree node under the cursor
    pub fn select_org(&mut self) {
        if let Some(org_id) = self.org_tree.select() {
            let fetch = self.users.select_org(org_id);
            self.dispatch(fetch);
        }
    }

    pub fn next_page(&mut self) {
        if let Some(fetch) = self.users.next_page() {
            self.dispatch(fetch);
        }
    }

    pub fn prev_page(&mut self) {
        if let Some(fetch) = self.users.prev_page() {
            self.dispatch(fetch);
        }
    }

    /// Clear the search, keep the organization filter
    pub fn reset(&mut self) {
        self.search_input.clear();
        let fetch = self.users.reset();
        self.dispatch(fetch);
    }

    /// Open the user creation modal and load its lookup lists
    pub fn open_user_form(&mut self) {
        self.user_form = Some(UserForm::new());
        self.input_mode = InputMode::Modal;
        self.spawn(|client| async move { AppEvent::RolesLoaded(client.list_roles().await) });
        self.spawn(|client| async move { AppEvent::FormOrgsLoaded(client.list_groups().await) });
        self.spawn(|client| async move { AppEvent::CompaniesLoaded(client.list_companies().await) });
        self.spawn(|client| async move { AppEvent::ProvincesLoaded(client.list_areas(None).await) });
    }

    /// Open the role modal on top of the user modal
    pub fn open_role_form(&mut self) {
        if self.user_form.is_some() {
            self.role_form = Some(RoleForm::new());
        }
    }

    /// Close the topmost modal
    pub fn close_modal(&mut self) {
        if self.role_form.take().is_some() {
            return;
        }
        self.user_form = None;
        self.input_mode = InputMode::Normal;
    }

    /// Province cycled in the user form: fetch its cities
    pub fn load_cities(&self, province: String) {
        self.spawn(move |client| async move {
            let result = client.list_areas(Some(&province)).await;
            AppEvent::CitiesLoaded { province, result }
        });
    }

    /// Validate and send the topmost modal
    pub fn submit_modal(&mut self) {
        if let Some(form) = self.role_form.as_mut() {
            if form.submitting {
                return;
            }
            if let Some(role) = form.validate() {
                form.submitting = true;
                self.send_role(role);
            }
            return;
        }

        let parent_path = self
            .users
            .filter()
            .selected_org_id
            .clone()
            .unwrap_or_else(|| self.default_parent_path.clone());
        if let Some(form) = self.user_form.as_mut() {
            if form.submitting {
                return;
            }
            if let Some(user) = form.validate(parent_path) {
                form.submitting = true;
                self.send_user(user);
            }
        }
    }

    fn send_role(&self, role: NewRole) {
        tracing::info!(name = %role.name, "adding role");
        self.spawn(move |client| async move { AppEvent::RoleAdded(client.add_role(&role).await) });
    }

    fn send_user(&self, user: NewUser) {
        tracing::info!(account = %user.account, "adding user");
        self.spawn(move |client| async move { AppEvent::UserAdded(client.add_user(&user).await) });
    }

    /// Apply the completion of a background call
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::TreeLoaded(result) => {
                self.org_tree.loading = false;
                match result {
                    Ok(nodes) => self.org_tree.set_nodes(&nodes),
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to load organization tree");
                        self.error(e.user_message(TREE_FALLBACK));
                    }
                }
            }
            AppEvent::UsersLoaded { seq, result } => {
                if let FetchOutcome::Failed(text) = self.users.apply(seq, result) {
                    self.error(text);
                }
            }
            AppEvent::FormOrgsLoaded(result) => {
                self.apply_lookup(result, "Failed to load organization list", |form, orgs| {
                    form.set_orgs(&orgs)
                });
            }
            AppEvent::RolesLoaded(result) => {
                self.apply_lookup(result, "Failed to load role list", UserForm::set_roles);
            }
            AppEvent::CompaniesLoaded(result) => {
                self.apply_lookup(result, "Failed to load company list", UserForm::set_companies);
            }
            AppEvent::ProvincesLoaded(result) => {
                self.apply_lookup(result, "Failed to load province list", UserForm::set_provinces);
            }
            AppEvent::CitiesLoaded { province, result } => {
                let failure = self
                    .user_form
                    .as_mut()
                    .and_then(|form| form.apply_cities(&province, result));
                if let Some(text) = failure {
                    self.error(text);
                }
            }
            AppEvent::UserAdded(result) => self.user_added(result),
            AppEvent::RoleAdded(result) => self.role_added(result),
        }
    }

    /// Fill a lookup list of the open user form. Results arriving after the
    /// form closed are dropped.
    fn apply_lookup<T>(
        &mut self,
        result: Result<T, ApiError>,
        fallback: &str,
        apply: impl FnOnce(&mut UserForm, T),
    ) {
        let Some(form) = self.user_form.as_mut() else {
            return;
        };
        match result {
            Ok(items) => apply(form, items),
            Err(e) => {
                tracing::warn!(error = %e, fallback, "lookup failed");
                self.error(e.user_message(fallback));
            }
        }
    }

    fn user_added(&mut self, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                self.user_form = None;
                self.role_form = None;
                self.input_mode = InputMode::Normal;
                self.info("User added");
                let fetch = self.users.refresh_current();
                self.dispatch(fetch);
            }
            Err(e) => {
                if let Some(form) = self.user_form.as_mut() {
                    form.submitting = false;
                }
                tracing::warn!(error = %e, "failed to add user");
                self.error(e.user_message(USER_ADD_FALLBACK));
            }
        }
    }

    fn role_added(&mut self, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                self.role_form = None;
                self.info("Role added");
                if self.user_form.is_some() {
                    self.spawn(|client| async move { AppEvent::RolesLoaded(client.list_roles().await) });
                }
            }
            Err(e) => {
                if let Some(form) = self.role_form.as_mut() {
                    form.submitting = false;
                }
                tracing::warn!(error = %e, "failed to add role");
                self.error(e.user_message(ROLE_ADD_FALLBACK));
            }
        }
    }
}

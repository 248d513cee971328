//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components.
//! App is intentionally lean - it coordinates between components and the
//! services but does not contain business logic itself.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    ColumnPicker, CreateIssueDialog, DashboardComponent, DateRangeDialog, HelpDialog,
    IssueDetailSheet, LoginComponent, QuitDialog, SelectDialog, SelectKind, SplashComponent,
};
use crate::config::Config;
use crate::model::modal::{Modal, ModalStack};
use crate::model::{AppMode, DomainState, NewIssue, Toast};
use crate::services::{
    self, DocumentStore, IdentityProvider, IssueLoader, JsonFileStore, LocalIdentity, User,
};
use crate::theme::{Theme, ThemeMode};
use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{layout::Rect, Frame};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const CREATE_FAILED: &str = "Failed to create issue. Please try again.";

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    /// Current application mode
    pub mode: AppMode,

    /// Domain state (business data)
    pub domain: DomainState,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Loaded configuration; theme changes are written back
    pub config: Config,

    pub theme_mode: ThemeMode,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Transient message for the status bar
    pub toast: Option<Toast>,

    store: Arc<dyn DocumentStore>,
    identity: Box<dyn IdentityProvider>,
    loader: IssueLoader,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub splash: SplashComponent,
    pub login: LoginComponent,
    pub dashboard: DashboardComponent,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
    pub column_picker: ColumnPicker,
    pub create_issue_dialog: CreateIssueDialog,
    pub issue_detail: IssueDetailSheet,
    pub floor_dialog: SelectDialog,
    pub status_dialog: SelectDialog,
    pub date_range_dialog: DateRangeDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Create the App with the file store and local identity from `config`
    pub fn new(config: Config) -> Result<App> {
        let store_path = config.store_path()?;
        info!(path = %store_path.display(), "using issue store");
        let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::new(store_path));
        let identity = Box::new(LocalIdentity::new(config.accounts.clone(), Config::session_path()));
        Ok(Self::with_services(config, store, identity))
    }

    pub fn with_services(
        config: Config,
        store: Arc<dyn DocumentStore>,
        identity: Box<dyn IdentityProvider>,
    ) -> App {
        let mut app = App {
            mode: AppMode::Splash,
            domain: DomainState::new(),
            modals: ModalStack::new(),
            theme_mode: config.theme,
            should_quit: false,
            toast: None,
            store,
            identity,
            loader: IssueLoader::new(),
            splash: SplashComponent::new(),
            login: LoginComponent::new(),
            dashboard: DashboardComponent::new(&config.table),
            quit_dialog: QuitDialog::default(),
            help_dialog: HelpDialog::default(),
            column_picker: ColumnPicker::new(),
            create_issue_dialog: CreateIssueDialog::new(),
            issue_detail: IssueDetailSheet::default(),
            floor_dialog: SelectDialog::new(SelectKind::Floor),
            status_dialog: SelectDialog::new(SelectKind::Status),
            date_range_dialog: DateRangeDialog::new(),
            config,
        };
        app.apply_theme();
        app
    }

    /// Push the active palette into every component
    fn apply_theme(&mut self) {
        let theme = Theme::from_mode(self.theme_mode);
        self.splash.set_theme(theme);
        self.login.set_theme(theme);
        self.dashboard.set_theme_mode(self.theme_mode);
        self.quit_dialog.set_theme(theme);
        self.help_dialog.set_theme(theme);
        self.column_picker.set_theme(theme);
        self.create_issue_dialog.set_theme(theme);
        self.issue_detail.set_theme(theme);
        self.floor_dialog.set_theme(theme);
        self.status_dialog.set_theme(theme);
        self.date_range_dialog.set_theme(theme);
    }

    /// Route to the dashboard or the login screen depending on the session
    fn enter_session_mode(&mut self) {
        match self.identity.current_user() {
            Some(user) => {
                info!(email = %user.email, "session restored");
                self.start_dashboard(user);
            }
            None => {
                self.mode = AppMode::Login;
            }
        }
    }

    fn start_dashboard(&mut self, user: User) {
        self.dashboard.set_user(Some(user.email.clone()));
        self.domain.user = Some(user);
        self.mode = AppMode::Dashboard;
        self.start_load();
    }

    /// Kick off a background fetch of every issue
    fn start_load(&mut self) {
        self.loader
            .spawn(Arc::clone(&self.store), self.config.collection.clone());
        self.domain.loading = true;
        self.dashboard.set_loading(true);
    }

    fn poll_loader(&mut self) {
        let Some(result) = self.loader.poll() else {
            return;
        };
        match result {
            Ok(issues) => {
                self.domain.issues = issues;
                self.dashboard.set_issues(&self.domain.issues);
            }
            Err(e) => {
                error!(error = %e, "failed to load issues");
                self.toast = Some(Toast::error(format!("Failed to load issues: {}", e)));
            }
        }
        self.domain.loading = false;
        self.dashboard.set_loading(false);
    }

    fn submit_issue(&mut self, draft: NewIssue) {
        let issue = match draft.into_issue(self.domain.reporter(), Utc::now()) {
            Ok(issue) => issue,
            Err(e) => {
                warn!(error = %e, "new issue rejected");
                self.create_issue_dialog.set_error("Missing required fields");
                self.toast = Some(Toast::error(CREATE_FAILED));
                return;
            }
        };

        match services::add_issue(self.store.as_ref(), &self.config.collection, issue) {
            Ok(stored) => {
                info!(id = %stored.id, floor = %stored.floor, "issue created");
                if matches!(self.modals.top(), Some(Modal::CreateIssue)) {
                    self.modals.pop();
                }
                self.toast = Some(Toast::success("Issue created successfully!"));
                self.start_load();
            }
            Err(e) => {
                error!(error = %e, "failed to store issue");
                self.create_issue_dialog.set_error(e.to_string());
                self.toast = Some(Toast::error(CREATE_FAILED));
            }
        }
    }

    fn sign_in(&mut self, email: &str, password: &str) {
        match self.identity.sign_in(email, password) {
            Ok(user) => {
                info!(email = %user.email, "signed in");
                self.login.set_error(None);
                self.login.reset();
                self.start_dashboard(user);
            }
            Err(e) => {
                warn!(error = %e, "sign-in failed");
                self.login.set_error(Some(e.to_string()));
                self.login.reset();
            }
        }
    }

    fn sign_out(&mut self) {
        if let Err(e) = self.identity.sign_out() {
            warn!(error = %e, "failed to clear session");
        }
        info!("signed out");
        self.loader.clear();
        self.domain = DomainState::new();
        self.dashboard.set_issues(&[]);
        self.dashboard.set_loading(false);
        self.dashboard.set_user(None);
        self.modals.clear();
        self.mode = AppMode::Login;
    }

    fn toggle_theme(&mut self) {
        self.theme_mode = self.theme_mode.toggled();
        self.config.theme = self.theme_mode;
        self.apply_theme();
        if let Err(e) = self.config.save() {
            warn!(error = %e, "failed to persist theme");
        }
    }

    /// Close the top modal if it is the given kind
    fn close_if(&mut self, is_kind: fn(&Modal) -> bool) {
        if self.modals.top().is_some_and(is_kind) {
            self.modals.pop();
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        self.splash.init()?;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        if let Some(modal) = self.modals.top().cloned() {
            return self.handle_modal_key_event(&modal, key);
        }

        match self.mode {
            AppMode::Splash => self.splash.handle_key_event(key),
            AppMode::Login => self.login.handle_key_event(key),
            AppMode::Dashboard => self.dashboard.handle_key_event(key),
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.mode == AppMode::Dashboard && self.modals.is_empty() {
            return self.dashboard.handle_mouse_event(mouse);
        }
        Ok(None)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if action != Action::Tick {
            debug!("{}", action);
        }

        let follow_up = match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                if self.mode == AppMode::Splash {
                    return self.splash.update(Action::Tick);
                }
                self.poll_loader();
                if self.toast.as_ref().is_some_and(Toast::is_expired) {
                    self.toast = None;
                }
                self.dashboard.update(Action::Tick)?;
                None
            }
            Action::SplashComplete => {
                if self.mode == AppMode::Splash {
                    self.enter_session_mode();
                }
                None
            }
            Action::ForceQuit => {
                self.should_quit = true;
                None
            }
            Action::Resize(_, _) => None,

            // ─────────────────────────────────────────────────────────────────
            // Table (delegate to DashboardComponent)
            // ─────────────────────────────────────────────────────────────────
            Action::NextRow
            | Action::PrevRow
            | Action::FirstRow
            | Action::LastRow
            | Action::NextColumn
            | Action::PrevColumn
            | Action::CycleSort
            | Action::CycleSortColumn(_)
            | Action::ActivateRow
            | Action::ClickRow(_)
            | Action::Deselect
            | Action::IssueSelected(_)
            | Action::EnterSearchMode
            | Action::ExitSearchMode
            | Action::ClearSearch
            | Action::SearchInput(_)
            | Action::SearchBackspace => self.dashboard.update(action)?,

            Action::ToggleColumn(id) => {
                self.dashboard.update(Action::ToggleColumn(id))?;
                self.column_picker
                    .set_entries(self.dashboard.table().column_entries());
                None
            }

            // ─────────────────────────────────────────────────────────────────
            // Scrolling (delegate to the detail sheet)
            // ─────────────────────────────────────────────────────────────────
            Action::ScrollUp | Action::ScrollDown => {
                if let Some(Modal::IssueDetail { scroll_offset }) = self.modals.top_mut() {
                    self.issue_detail.update(action)?;
                    *scroll_offset = self.issue_detail.scroll_offset;
                }
                None
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.modals.push(Modal::QuitConfirm);
                None
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help { scroll_offset: 0 });
                None
            }
            Action::OpenColumnPicker => {
                self.column_picker
                    .set_entries(self.dashboard.table().column_entries());
                self.modals.push(Modal::ColumnPicker {
                    selected_index: self.column_picker.selected_index(),
                });
                None
            }
            Action::OpenCreateIssue => {
                self.create_issue_dialog.reset();
                self.modals.push(Modal::CreateIssue);
                None
            }
            Action::OpenIssueDetail => {
                match self.dashboard.selected_issue().cloned() {
                    Some(issue) => {
                        self.issue_detail.set_issue(Some(issue));
                        self.modals.push(Modal::IssueDetail { scroll_offset: 0 });
                    }
                    None => self.toast = Some(Toast::info("Select an issue first")),
                }
                None
            }
            Action::OpenFloorFilter => {
                self.floor_dialog
                    .set_current(self.dashboard.filter().floor.clone());
                self.modals.push(Modal::FloorFilter {
                    selected_index: self.floor_dialog.selected_index(),
                });
                None
            }
            Action::OpenStatusFilter => {
                self.status_dialog
                    .set_current(self.dashboard.filter().status.map(|s| s.label().to_string()));
                self.modals.push(Modal::StatusFilter {
                    selected_index: self.status_dialog.selected_index(),
                });
                None
            }
            Action::OpenDateRange => {
                self.date_range_dialog.reset(self.dashboard.filter().date_range);
                self.modals.push(Modal::DateRange);
                None
            }
            Action::CloseModal => {
                self.modals.pop();
                None
            }
            Action::ModalUp | Action::ModalDown => {
                // Dialogs move their own highlight; mirror it on the stack
                match self.modals.top_mut() {
                    Some(Modal::ColumnPicker { selected_index }) => {
                        *selected_index = self.column_picker.selected_index();
                    }
                    Some(Modal::FloorFilter { selected_index }) => {
                        *selected_index = self.floor_dialog.selected_index();
                    }
                    Some(Modal::StatusFilter { selected_index }) => {
                        *selected_index = self.status_dialog.selected_index();
                    }
                    _ => {}
                }
                None
            }

            // ─────────────────────────────────────────────────────────────────
            // Dashboard Filters
            // ─────────────────────────────────────────────────────────────────
            Action::SetFloorFilter(_) => {
                self.close_if(|m| matches!(m, Modal::FloorFilter { .. }));
                self.dashboard.update(action)?
            }
            Action::SetStatusFilter(_) => {
                self.close_if(|m| matches!(m, Modal::StatusFilter { .. }));
                self.dashboard.update(action)?
            }
            Action::SetDateRange(_) => {
                self.close_if(|m| matches!(m, Modal::DateRange));
                self.dashboard.update(action)?
            }
            Action::ToggleSortOrder | Action::ClearFilters => self.dashboard.update(action)?,

            // ─────────────────────────────────────────────────────────────────
            // Issues
            // ─────────────────────────────────────────────────────────────────
            Action::RefreshIssues => {
                if self.loader.is_loading() {
                    debug!("refresh ignored, load already running");
                } else {
                    self.start_load();
                }
                None
            }
            Action::SubmitIssue(draft) => {
                self.submit_issue(draft);
                None
            }

            // ─────────────────────────────────────────────────────────────────
            // Session
            // ─────────────────────────────────────────────────────────────────
            Action::SignIn { email, password } => {
                self.sign_in(&email, &password);
                None
            }
            Action::SignOut => {
                self.sign_out();
                None
            }
            Action::ToggleTheme => {
                self.toggle_theme();
                None
            }
        };

        // The table drops its selection whenever its rows change
        self.domain.selected_issue = self.dashboard.selected_issue().cloned();
        Ok(follow_up)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        match self.mode {
            AppMode::Splash => self.splash.draw(frame, area)?,
            AppMode::Login => self.login.draw(frame, area)?,
            AppMode::Dashboard => {
                self.dashboard.set_toast(self.toast.clone());
                self.dashboard.draw(frame, area)?;
            }
        }

        // Draw modal overlay if active
        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help { .. } => self.help_dialog.handle_key_event(key),
            Modal::ColumnPicker { .. } => self.column_picker.handle_key_event(key),
            Modal::CreateIssue => self.create_issue_dialog.handle_key_event(key),
            Modal::IssueDetail { .. } => self.issue_detail.handle_key_event(key),
            Modal::FloorFilter { .. } => self.floor_dialog.handle_key_event(key),
            Modal::StatusFilter { .. } => self.status_dialog.handle_key_event(key),
            Modal::DateRange => self.date_range_dialog.handle_key_event(key),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
            Modal::Help { .. } => self.help_dialog.draw(frame, area)?,
            Modal::ColumnPicker { .. } => self.column_picker.draw(frame, area)?,
            Modal::CreateIssue => self.create_issue_dialog.draw(frame, area)?,
            Modal::IssueDetail { .. } => self.issue_detail.draw(frame, area)?,
            Modal::FloorFilter { .. } => self.floor_dialog.draw(frame, area)?,
            Modal::StatusFilter { .. } => self.status_dialog.draw(frame, area)?,
            Modal::DateRange => self.date_range_dialog.draw(frame, area)?,
        }
        Ok(())
    }
}

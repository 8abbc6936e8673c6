//! Console application state
//!
//! One explicit state struct; every transition happens either in a key
//! handler or in [`App::on_event`] when an async task reports back. All
//! network work runs in spawned tasks that post an [`AppEvent`] over the
//! channel — the UI thread never blocks. Fetch results carry a
//! generation number and results from a superseded fetch are discarded,
//! so a delayed response can never clobber newer state.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use ratatui::widgets::TableState;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tui_input::Input;
use tui_logger::TuiWidgetState;

use pestle_client::{ClientResult, FilterEvaluator, ProductStore};
use shared::{FilterSpec, Product};

use crate::form::{FormMode, ProductForm};

/// Async task results delivered to the event loop
pub enum AppEvent {
    ProductsLoaded {
        generation: u64,
        result: ClientResult<Vec<Product>>,
    },
    CategoriesLoaded(ClientResult<Vec<String>>),
    MutationFinished {
        kind: MutationKind,
        result: ClientResult<()>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Mutation lifecycle: idle -> pending -> (success -> idle | failed)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MutationState {
    #[default]
    Idle,
    Pending(MutationKind),
    Failed(String),
}

impl MutationState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

/// Collection fetch state; a failed fetch is distinct from an empty one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    Loading,
    Loaded,
    Failed(String),
}

/// Which modal (if any) is on top of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Table,
    Form(FormMode),
    ConfirmDelete(i64),
}

/// Filter-bar text field currently being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterInput {
    Search,
    Supplier,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    /// A filter-bar text field has focus
    Editing(FilterInput),
}

pub struct App {
    store: Arc<ProductStore>,
    events_tx: mpsc::Sender<AppEvent>,

    pub rows: Vec<Product>,
    pub categories: Vec<String>,
    /// Index into `categories` driving the category predicate; None = all
    pub category_idx: Option<usize>,
    pub filter: FilterSpec,

    pub view: View,
    pub form: Option<ProductForm>,
    pub fetch: FetchState,
    pub mutation: MutationState,
    pub input_mode: InputMode,
    pub filter_input: Input,

    pub table_state: TableState,
    pub logger_state: TuiWidgetState,
    pub show_logs: bool,
    pub should_quit: bool,

    generation: u64,
    fetch_cancel: CancellationToken,
}

impl App {
    pub fn new(store: Arc<ProductStore>, events_tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            store,
            events_tx,
            rows: Vec::new(),
            categories: Vec::new(),
            category_idx: None,
            filter: FilterSpec::default(),
            view: View::Table,
            form: None,
            fetch: FetchState::Loading,
            mutation: MutationState::default(),
            input_mode: InputMode::Normal,
            filter_input: Input::default(),
            table_state: TableState::default(),
            logger_state: TuiWidgetState::new(),
            show_logs: false,
            should_quit: false,
            generation: 0,
            fetch_cancel: CancellationToken::new(),
        }
    }

    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    // ========== Async fetches ==========

    /// Start a fresh collection fetch, superseding any in-flight one.
    pub fn refresh(&mut self) {
        self.fetch_cancel.cancel();
        self.fetch_cancel = CancellationToken::new();
        self.generation += 1;

        self.fetch = FetchState::Loading;
        let generation = self.generation;
        let cancel = self.fetch_cancel.clone();
        let store = self.store.clone();
        let spec = self.filter.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let result = tokio::select! {
                _ = cancel.cancelled() => return,
                result = async {
                    FilterEvaluator::new(&store).evaluate(&spec, App::today()).await
                } => result,
            };
            let _ = tx
                .send(AppEvent::ProductsLoaded { generation, result })
                .await;
        });
    }

    pub fn load_categories(&self) {
        let store = self.store.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = store.categories().await;
            let _ = tx.send(AppEvent::CategoriesLoaded(result)).await;
        });
    }

    // ========== Mutations ==========

    /// Submit the open form. No-op while a mutation is already pending.
    pub fn submit_form(&mut self) {
        if self.mutation.is_pending() {
            return;
        }
        let Some(form) = self.form.as_mut() else {
            return;
        };

        match form.mode {
            FormMode::Create => match form.to_create() {
                Ok(payload) => {
                    form.errors.clear();
                    self.mutation = MutationState::Pending(MutationKind::Create);
                    let store = self.store.clone();
                    let tx = self.events_tx.clone();
                    tokio::spawn(async move {
                        let result = store.create(&payload).await.map(|_| ());
                        let _ = tx
                            .send(AppEvent::MutationFinished {
                                kind: MutationKind::Create,
                                result,
                            })
                            .await;
                    });
                }
                Err(errors) => form.errors = errors,
            },
            FormMode::Edit(id) => match form.to_update() {
                Ok(payload) => {
                    form.errors.clear();
                    self.mutation = MutationState::Pending(MutationKind::Update);
                    let store = self.store.clone();
                    let tx = self.events_tx.clone();
                    tokio::spawn(async move {
                        let result = store.update(id, &payload).await.map(|_| ());
                        let _ = tx
                            .send(AppEvent::MutationFinished {
                                kind: MutationKind::Update,
                                result,
                            })
                            .await;
                    });
                }
                Err(errors) => form.errors = errors,
            },
        }
    }

    /// Confirm the pending delete. No-op while a mutation is pending.
    pub fn confirm_delete(&mut self) {
        if self.mutation.is_pending() {
            return;
        }
        let View::ConfirmDelete(id) = self.view else {
            return;
        };
        self.mutation = MutationState::Pending(MutationKind::Delete);
        let store = self.store.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = store.delete(id).await;
            let _ = tx
                .send(AppEvent::MutationFinished {
                    kind: MutationKind::Delete,
                    result,
                })
                .await;
        });
    }

    // ========== Event application ==========

    pub fn on_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ProductsLoaded { generation, result } => {
                if generation != self.generation {
                    tracing::debug!(generation, "discarding stale fetch result");
                    return;
                }
                match result {
                    Ok(rows) => {
                        self.rows = rows;
                        self.fetch = FetchState::Loaded;
                        self.clamp_selection();
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "product fetch failed");
                        self.fetch = FetchState::Failed(e.to_string());
                    }
                }
            }
            AppEvent::CategoriesLoaded(result) => match result {
                Ok(categories) => self.categories = categories,
                Err(e) => tracing::warn!(error = %e, "category fetch failed"),
            },
            AppEvent::MutationFinished { kind, result } => {
                // Only apply if this mutation is still the pending one;
                // a response that arrives after the user moved on is
                // logged and dropped.
                if self.mutation != MutationState::Pending(kind) {
                    tracing::debug!(kind = kind.label(), "discarding stale mutation result");
                    return;
                }
                match result {
                    Ok(()) => {
                        self.mutation = MutationState::Idle;
                        self.view = View::Table;
                        self.form = None;
                        self.table_state.select(None);
                        self.refresh();
                    }
                    Err(e) => {
                        tracing::error!(kind = kind.label(), error = %e, "mutation failed");
                        // stay in the modal so the user can retry
                        self.mutation = MutationState::Failed(format!(
                            "{} failed: {e}",
                            kind.label()
                        ));
                    }
                }
            }
        }
    }

    // ========== Selection ==========

    pub fn selected_product(&self) -> Option<&Product> {
        self.table_state.selected().and_then(|i| self.rows.get(i))
    }

    pub fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let next = match self.table_state.selected() {
            Some(i) if i + 1 < self.rows.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    pub fn select_prev(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let prev = self.table_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.table_state.select(Some(prev));
    }

    fn clamp_selection(&mut self) {
        match self.table_state.selected() {
            Some(_) if self.rows.is_empty() => self.table_state.select(None),
            Some(i) if i >= self.rows.len() => {
                self.table_state.select(Some(self.rows.len() - 1));
            }
            _ => {}
        }
    }

    // ========== Filter manipulation ==========

    pub fn cycle_stock_filter(&mut self) {
        self.filter.stock_status = self.filter.stock_status.next();
        self.refresh();
    }

    pub fn cycle_expiry_filter(&mut self) {
        self.filter.expiry_status = self.filter.expiry_status.next();
        self.refresh();
    }

    pub fn toggle_low_stock_shortcut(&mut self) {
        self.filter.low_stock = !self.filter.low_stock;
        self.refresh();
    }

    pub fn toggle_expiring_shortcut(&mut self) {
        self.filter.expiring_soon = !self.filter.expiring_soon;
        self.refresh();
    }

    /// Step the category predicate through the fetched category list.
    pub fn cycle_category(&mut self) {
        if self.categories.is_empty() {
            return;
        }
        self.category_idx = match self.category_idx {
            None => Some(0),
            Some(i) if i + 1 < self.categories.len() => Some(i + 1),
            Some(_) => None,
        };
        self.filter.category = self.category_idx.map(|i| self.categories[i].clone());
        self.refresh();
    }

    /// Commit the filter-bar text input into the spec.
    pub fn commit_filter_input(&mut self, target: FilterInput) {
        let value = self.filter_input.value().trim().to_string();
        let value = if value.is_empty() { None } else { Some(value) };
        match target {
            FilterInput::Search => self.filter.search = value,
            FilterInput::Supplier => self.filter.supplier = value,
        }
        self.input_mode = InputMode::Normal;
        self.filter_input.reset();
        self.refresh();
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.category_idx = None;
        self.refresh();
    }

    // ========== Modal control ==========

    pub fn open_create_form(&mut self) {
        self.form = Some(ProductForm::create());
        self.mutation = MutationState::Idle;
        self.view = View::Form(FormMode::Create);
    }

    pub fn open_edit_form(&mut self) {
        let Some(product) = self.selected_product() else {
            return;
        };
        let id = product.id;
        let form = ProductForm::edit(product);
        self.form = Some(form);
        self.mutation = MutationState::Idle;
        self.view = View::Form(FormMode::Edit(id));
    }

    pub fn open_delete_confirm(&mut self) {
        let Some(id) = self.selected_product().map(|p| p.id) else {
            return;
        };
        self.mutation = MutationState::Idle;
        self.view = View::ConfirmDelete(id);
    }

    /// Close whatever modal is open. An in-flight mutation is not
    /// cancelled; its late result is discarded by the staleness guard.
    pub fn close_modal(&mut self) {
        self.view = View::Table;
        self.form = None;
        self.mutation = MutationState::Idle;
    }
}

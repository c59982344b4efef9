use crate::api::types::{FilterOptions, Severity, Status};
use crate::api::{IncidentsApi, IncidentsClient};
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::form::{CreateForm, DetailState};
use crate::query::{
    Applied, Debouncer, FetchRequest, FilterChange, ListState, QueryExecutor, SortField,
};
use crate::tui::Tui;
use crate::ui;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::TableState;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentView {
    Dashboard,
    Create,
    Detail,
}

#[derive(Debug)]
pub struct App {
    pub should_quit: bool,
    pub current_view: CurrentView,

    // Dashboard
    pub list: ListState,
    pub table_state: TableState,
    pub search_mode: bool,
    pub search_input: String,
    pub filter_options: FilterOptions,
    /// One-line confirmation shown in the header, cleared on the next key.
    pub notice: Option<String>,
    search: Debouncer<String>,

    pub create_form: CreateForm,
    pub detail: Option<DetailState>,

    executor: QueryExecutor,
    tx: UnboundedSender<Event>,
}

impl App {
    pub fn new(client: IncidentsClient, tx: UnboundedSender<Event>, config: &Config) -> Self {
        Self {
            should_quit: false,
            current_view: CurrentView::Dashboard,
            list: ListState::new(config.page_sizes.clone()),
            table_state: TableState::default(),
            search_mode: false,
            search_input: String::new(),
            filter_options: FilterOptions::default(),
            notice: None,
            search: Debouncer::new(config.search_debounce),
            create_form: CreateForm::default(),
            detail: None,
            executor: QueryExecutor::new(client, tx.clone()),
            tx,
        }
    }

    pub async fn run(&mut self, tui: &mut Tui, events: &mut EventHandler) -> Result<()> {
        self.start();

        while !self.should_quit {
            tui.draw(|f| {
                ui::render(self, f);
            })?;

            let event = events.next().await?;
            self.handle_event(event);
        }
        Ok(())
    }

    /// Initial dashboard load plus the filter choices.
    pub fn start(&mut self) {
        info!(base_url = self.executor.client().base_url(), "loading dashboard");
        let request = self.list.begin_fetch();
        self.dispatch(request);
        self.fetch_filter_options();
    }

    pub fn services(&self) -> &[String] {
        &self.filter_options.services
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Tick | Event::Resize(_, _) => {}
            Event::Key(key) => self.handle_key_event(key),
            Event::IncidentsFetched { generation, result } => {
                if self.list.apply_page(generation, result) == Applied::Fresh {
                    self.clamp_selection();
                }
            }
            Event::CountsFetched { generation, result } => {
                self.list.apply_counts(generation, result);
            }
            Event::SearchSettled(ticket) => {
                if let Some(text) = self.search.fire(ticket) {
                    info!(search = %text, "search settled");
                    self.change_filter(FilterChange::Search(text));
                }
            }
            Event::FilterOptionsFetched(result) => match result {
                Ok(options) => self.filter_options = options,
                Err(e) => warn!(error = %e, "failed to load filter options"),
            },
            Event::IncidentFetched(id, result) => {
                if let Some(detail) = self.detail.as_mut().filter(|d| d.id == id) {
                    detail.apply_loaded(result);
                }
            }
            Event::IncidentCreated(result) => {
                let Some(incident) = self.create_form.apply_result(result) else {
                    return;
                };
                self.notice = Some(format!("Created {} \"{}\"", incident.id, incident.title));
                self.create_form = CreateForm::default();
                // Only leave the form if the user is still on it.
                if self.current_view == CurrentView::Create {
                    self.current_view = CurrentView::Dashboard;
                    self.list.reset();
                    let request = self.list.begin_fetch();
                    self.dispatch(request);
                }
            }
            Event::IncidentUpdated(id, result) => {
                if let Some(detail) = self.detail.as_mut().filter(|d| d.id == id) {
                    detail.apply_update(result);
                }
            }
            Event::IncidentDeleted(id, result) => {
                let Some(detail) = self.detail.as_mut().filter(|d| d.id == id) else {
                    return;
                };
                if detail.apply_delete(result) {
                    self.notice = Some(format!("Deleted {id}"));
                    self.close_detail();
                }
            }
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        self.notice = None;
        match self.current_view {
            CurrentView::Dashboard if self.search_mode => self.handle_search_key(key),
            CurrentView::Dashboard => self.handle_dashboard_key(key),
            CurrentView::Create => self.handle_create_key(key),
            CurrentView::Detail => self.handle_detail_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.next_row(),
            KeyCode::Char('k') | KeyCode::Up => self.previous_row(),
            KeyCode::Char('n') | KeyCode::Right => {
                if let Some(request) = self.list.next_page() {
                    self.table_state.select(Some(0));
                    self.dispatch(request);
                }
            }
            KeyCode::Char('p') | KeyCode::Left => {
                if let Some(request) = self.list.prev_page() {
                    self.table_state.select(Some(0));
                    self.dispatch(request);
                }
            }
            KeyCode::Enter => self.open_selected(),
            KeyCode::Char('/') => self.search_mode = true,
            KeyCode::Char('s') => {
                let next = cycle_option(&Status::ALL, self.list.filters().status.as_ref()).copied();
                self.change_filter(FilterChange::Status(next));
            }
            KeyCode::Char('v') => {
                let next = cycle_option(&Severity::ALL, self.list.filters().severity.as_ref()).copied();
                self.change_filter(FilterChange::Severity(next));
            }
            KeyCode::Char('f') => {
                let next = cycle_option(self.services(), self.list.filters().service.as_ref()).cloned();
                self.change_filter(FilterChange::Service(next));
            }
            KeyCode::Char('z') => {
                let size = self.list.page_sizes().next_after(self.list.page_size());
                self.change_filter(FilterChange::PageSize(size));
            }
            KeyCode::Char(c @ '1'..='5') => {
                let idx = (c as usize) - ('1' as usize);
                let request = self.list.click_sort(SortField::ALL[idx]);
                self.table_state.select(Some(0));
                self.dispatch(request);
            }
            KeyCode::Char('r') => {
                let request = self.list.refresh();
                self.dispatch(request);
            }
            KeyCode::Char('c') => {
                self.create_form = CreateForm::default();
                self.current_view = CurrentView::Create;
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.search_mode = false;
                if let Some(text) = self.search.cancel() {
                    self.change_filter(FilterChange::Search(text));
                }
            }
            KeyCode::Esc => {
                self.search_mode = false;
                if self.search.cancel().is_some() {
                    self.search_input = self.list.filters().search.clone().unwrap_or_default();
                }
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                self.queue_search();
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.queue_search();
            }
            _ => {}
        }
    }

    fn queue_search(&mut self) {
        let ticket = self.search.push(self.search_input.clone());
        self.executor.arm_debounce(ticket, self.search.delay());
    }

    fn handle_create_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.current_view = CurrentView::Dashboard,
            KeyCode::Tab => self.create_form.focus_next(),
            KeyCode::BackTab => self.create_form.focus_prev(),
            KeyCode::Left => {
                let services = self.filter_options.services.clone();
                self.create_form.cycle_choice(&services, false);
            }
            KeyCode::Right => {
                let services = self.filter_options.services.clone();
                self.create_form.cycle_choice(&services, true);
            }
            KeyCode::Backspace => self.create_form.backspace(),
            KeyCode::Enter => {
                if let Some(request) = self.create_form.submit(&self.filter_options.services) {
                    let client = self.executor.client().clone();
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        let result = client.create_incident(&request).await;
                        let _ = tx.send(Event::IncidentCreated(result));
                    });
                }
            }
            KeyCode::Char(c) => self.create_form.input_char(c),
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        let services = self.filter_options.services.clone();
        let Some(detail) = self.detail.as_mut() else {
            self.current_view = CurrentView::Dashboard;
            return;
        };

        if detail.confirm_delete {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    if let Some(id) = detail.confirm_delete() {
                        self.delete_incident(id);
                    }
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => detail.cancel_delete(),
                _ => {}
            }
            return;
        }

        if detail.editing.is_some() {
            match key.code {
                KeyCode::Esc => detail.cancel_edit(),
                KeyCode::Enter => {
                    if let Some(patch) = detail.commit_edit(&services) {
                        let id = detail.id.clone();
                        let client = self.executor.client().clone();
                        let tx = self.tx.clone();
                        tokio::spawn(async move {
                            let result = client.update_incident(&id, &patch).await;
                            let _ = tx.send(Event::IncidentUpdated(id, result));
                        });
                    }
                }
                KeyCode::Left => detail.edit_cycle(&services, false),
                KeyCode::Right => detail.edit_cycle(&services, true),
                KeyCode::Backspace => detail.edit_backspace(),
                KeyCode::Char(c) => detail.edit_input(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => detail.select_next(),
            KeyCode::Char('k') | KeyCode::Up => detail.select_prev(),
            KeyCode::Enter => detail.begin_edit(),
            KeyCode::Char('d') => detail.request_delete(),
            KeyCode::Esc | KeyCode::Char('q') => self.close_detail(),
            _ => {}
        }
    }

    fn open_selected(&mut self) {
        let Some(incident) = self
            .table_state
            .selected()
            .and_then(|idx| self.list.rows().get(idx))
        else {
            return;
        };
        let id = incident.id.clone();
        info!(%id, "opening incident");
        self.detail = Some(DetailState::loading(id.clone()));
        self.current_view = CurrentView::Detail;

        let client = self.executor.client().clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.get_incident(&id).await;
            let _ = tx.send(Event::IncidentFetched(id, result));
        });
    }

    /// Back to the dashboard, which reloads the current page.
    fn close_detail(&mut self) {
        self.detail = None;
        self.current_view = CurrentView::Dashboard;
        let request = self.list.refresh();
        self.dispatch(request);
    }

    fn delete_incident(&self, id: String) {
        let client = self.executor.client().clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.delete_incident(&id).await;
            let _ = tx.send(Event::IncidentDeleted(id, result));
        });
    }

    fn fetch_filter_options(&self) {
        let client = self.executor.client().clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.filter_options().await;
            let _ = tx.send(Event::FilterOptionsFetched(result));
        });
    }

    fn change_filter(&mut self, change: FilterChange) {
        match self.list.apply_filter_change(change) {
            Ok(request) => {
                self.table_state.select(Some(0));
                self.dispatch(request);
            }
            Err(e) => warn!(error = %e, "rejected filter change"),
        }
    }

    fn dispatch(&self, request: FetchRequest) {
        self.executor.dispatch(request);
    }

    fn clamp_selection(&mut self) {
        let len = self.list.rows().len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let idx = self.table_state.selected().unwrap_or(0).min(len - 1);
        self.table_state.select(Some(idx));
    }

    fn next_row(&mut self) {
        let len = self.list.rows().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    fn previous_row(&mut self) {
        let len = self.list.rows().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }
}

/// `None` → first option → ... → last option → `None`.
pub fn cycle_option<'a, T: PartialEq>(options: &'a [T], current: Option<&T>) -> Option<&'a T> {
    match current {
        None => options.first(),
        Some(cur) => {
            let idx = options.iter().position(|o| o == cur)?;
            options.get(idx + 1)
        }
    }
}

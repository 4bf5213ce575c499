use anyhow::Result;
use crossterm::event::Event;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::carousel::{CarouselTick, CarouselTimer};
use crate::catalog::{Catalog, FetchState};
use crate::course::{Course, CourseId};
use crate::discovery::DiscoveryView;
use crate::error::CourseError;
use crate::landing::LandingTeaser;
use crate::navigation::{NavigationBridge, Navigator, PushOptions};
use crate::route::Route;
use crate::source::CourseSource;
use crate::ui::{self, PageView, UserAction, UI};

pub struct FetchDone {
    request: u64,
    result: Result<Vec<Course>, CourseError>,
}

/// Receiving end for fetch results, kept apart from [`Session`] so the event
/// loop can await it while still handling other events on the session.
pub struct FetchInbox(mpsc::UnboundedReceiver<FetchDone>);

impl FetchInbox {
    pub async fn recv(&mut self) -> Option<FetchDone> {
        self.0.recv().await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Overlay {
    None,
    History,
    URLInput(String),
}

/// Page state and navigation, independent of the terminal.
///
/// Everything that changes in response to an event goes through `&mut self`
/// on one task, so no locking is involved.
pub struct Session {
    source: Arc<dyn CourseSource>,
    catalog: Catalog,
    navigator: Navigator,
    discovery: DiscoveryView,
    landing: LandingTeaser,
    overlay: Overlay,
    fetch_tx: mpsc::UnboundedSender<FetchDone>,
    reset_scroll: bool,
}

impl Session {
    pub fn new(source: Arc<dyn CourseSource>, initial_path: &str) -> (Self, FetchInbox) {
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
        let session = Self {
            source,
            catalog: Catalog::new(),
            navigator: Navigator::new(initial_path),
            discovery: DiscoveryView::new(),
            landing: LandingTeaser::new(),
            overlay: Overlay::None,
            fetch_tx,
            reset_scroll: false,
        };
        (session, FetchInbox(fetch_rx))
    }

    /// Starts a course fetch on a background task. A newer fetch supersedes
    /// any that is still in flight.
    pub fn refresh(&mut self) {
        let request = self.catalog.begin_fetch();
        self.discovery.reset();
        info!(request, "fetching course list");

        let source = Arc::clone(&self.source);
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = source.fetch_courses().await;
            let _ = tx.send(FetchDone { request, result });
        });
    }

    /// Applies a fetch result unless a newer fetch superseded it.
    pub fn apply_fetch(&mut self, done: FetchDone) -> bool {
        let applied = self.catalog.resolve(done.request, done.result);
        if applied {
            self.settle();
        }
        applied
    }

    /// Commits queued navigations and re-syncs the selection with the URL.
    pub fn settle(&mut self) {
        if let Some(change) = self.navigator.commit() {
            debug!(route = %change.route, "location changed");
            self.reset_scroll |= change.reset_scroll;
        }
        if let Route::Search { id } = self.navigator.current_route() {
            self.discovery.sync(&self.catalog, id.as_ref());
        }
    }

    pub fn take_scroll_reset(&mut self) -> bool {
        std::mem::take(&mut self.reset_scroll)
    }

    pub fn on_tick(&mut self) {
        self.landing.on_tick();
    }

    /// Applies a user action. Returns `false` when the session should end.
    pub fn handle(&mut self, action: UserAction) -> bool {
        if self.overlay != Overlay::None {
            self.handle_overlay(action);
            self.settle();
            return true;
        }

        let route = self.navigator.current_route();
        match action {
            UserAction::Quit => return false,
            UserAction::GoBack => self.go_back(),
            UserAction::GoForward => self.go_forward(),
            UserAction::ShowHistory => self.overlay = Overlay::History,
            UserAction::EnterUrl => self.overlay = Overlay::URLInput(String::new()),
            UserAction::Refresh => self.refresh(),
            UserAction::SearchAll => self.landing.search_all(&mut self.navigator),
            UserAction::Up => match route {
                Route::Search { .. } => self.discovery.cursor_up(),
                Route::Landing => self.landing.cursor_left(),
                _ => {}
            },
            UserAction::Down => match route {
                Route::Search { .. } => self.discovery.cursor_down(&self.catalog),
                Route::Landing => self.landing.cursor_right(&self.catalog),
                _ => {}
            },
            UserAction::Left if route == Route::Landing => self.landing.cursor_left(),
            UserAction::Right if route == Route::Landing => {
                self.landing.cursor_right(&self.catalog)
            }
            UserAction::Activate => match route {
                Route::Search { .. } => self
                    .discovery
                    .click_cursor(&self.catalog, &mut self.navigator),
                Route::Landing => self.landing.open_cursor(&self.catalog, &mut self.navigator),
                _ => {}
            },
            UserAction::Enroll => {
                if let Route::Search { .. } = route {
                    self.discovery.enroll(&self.catalog, &mut self.navigator);
                }
            }
            _ => {}
        }

        self.settle();
        true
    }

    fn handle_overlay(&mut self, action: UserAction) {
        match action {
            UserAction::InputChar(c) => {
                if let Overlay::URLInput(input) = &mut self.overlay {
                    input.push(c);
                }
            }
            UserAction::Backspace => {
                if let Overlay::URLInput(input) = &mut self.overlay {
                    input.pop();
                }
            }
            UserAction::ConfirmInput(path) => {
                self.overlay = Overlay::None;
                if !path.trim().is_empty() {
                    self.navigator.push_url(path.trim(), PushOptions::default());
                }
            }
            UserAction::CancelInput | UserAction::Quit => self.overlay = Overlay::None,
            _ => {}
        }
    }

    fn go_back(&mut self) {
        if let Some(route) = self.navigator.back() {
            debug!(route = %route, "back");
            self.reset_scroll = true;
        }
    }

    fn go_forward(&mut self) {
        if let Some(route) = self.navigator.forward() {
            debug!(route = %route, "forward");
            self.reset_scroll = true;
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn discovery(&self) -> &DiscoveryView {
        &self.discovery
    }

    /// Owned snapshot of the current page for the renderer.
    pub fn page(&self) -> PageView {
        match &self.overlay {
            Overlay::History => {
                let (entries, current_index) = self.navigator.history();
                return PageView::History {
                    entries,
                    current_index,
                };
            }
            Overlay::URLInput(input) => {
                return PageView::URLInput {
                    input: input.clone(),
                }
            }
            Overlay::None => {}
        }

        let status = DiscoveryView::status(&self.catalog);
        match self.navigator.current_route() {
            Route::Landing => PageView::Landing {
                status,
                previews: LandingTeaser::previews(&self.catalog).to_vec(),
                cursor: self.landing.cursor(),
                hero_index: self.landing.carousel().current(),
            },
            Route::Search { .. } => PageView::Search {
                status,
                courses: match self.catalog.state() {
                    FetchState::Ready(courses) => Arc::clone(courses),
                    _ => Arc::from(Vec::new()),
                },
                selected: self.discovery.selected_id().cloned(),
                cursor: self.discovery.cursor(),
                detail: self.discovery.detail(&self.catalog).cloned(),
            },
            Route::Checkout {
                step,
                id,
                show_sign_up,
            } => {
                let course = self
                    .catalog
                    .courses()
                    .and_then(|c| c.iter().find(|c| c.course_id == id))
                    .cloned();
                PageView::Checkout {
                    path: self.navigator.current_path().to_string(),
                    step,
                    course_id: id,
                    show_sign_up,
                    course,
                }
            }
            Route::NotFound { path } => PageView::NotFound { path },
        }
    }
}

impl NavigationBridge for Session {
    fn select(&mut self, id: &CourseId) {
        self.navigator.select(id);
    }

    fn enroll(&mut self, id: &CourseId) {
        self.navigator.enroll(id);
    }
}

/// Terminal front end: multiplexes input, fetch results and carousel ticks.
pub struct App {
    session: Session,
    inbox: Option<FetchInbox>,
    ui: UI,
    carousel_interval: Duration,
}

impl App {
    pub fn new(source: Arc<dyn CourseSource>, initial_path: &str, carousel_interval: Duration) -> Result<Self> {
        let (session, inbox) = Session::new(source, initial_path);
        Ok(Self {
            session,
            inbox: Some(inbox),
            ui: UI::new()?,
            carousel_interval,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let result = self.main_loop().await;
        self.ui.cleanup()?;
        result
    }

    async fn main_loop(&mut self) -> Result<()> {
        let (input_tx, mut input_rx) = mpsc::unbounded_channel::<Event>();
        ui::spawn_input_reader(input_tx);

        let mut inbox = match self.inbox.take() {
            Some(inbox) => inbox,
            None => anyhow::bail!("event loop already ran"),
        };

        let (tick_tx, mut tick_rx) = mpsc::unbounded_channel::<CarouselTick>();
        let timer = CarouselTimer::spawn(self.carousel_interval, tick_tx);

        self.session.refresh();
        self.session.settle();
        self.render()?;

        loop {
            tokio::select! {
                Some(event) = input_rx.recv() => {
                    let key = match event {
                        Event::Key(key) => key,
                        Event::Resize(..) => {
                            self.render()?;
                            continue;
                        }
                        _ => continue,
                    };
                    let Some(action) = ui::map_key(&self.session.page(), key) else {
                        continue;
                    };
                    match action {
                        UserAction::ScrollUp => self.ui.scroll_up(),
                        UserAction::ScrollDown => self.ui.scroll_down(),
                        action => {
                            if !self.session.handle(action) {
                                break;
                            }
                        }
                    }
                }
                Some(done) = inbox.recv() => {
                    self.session.apply_fetch(done);
                }
                Some(CarouselTick) = tick_rx.recv() => self.session.on_tick(),
                else => break,
            }

            if self.session.take_scroll_reset() {
                self.ui.reset_scroll();
            }
            self.render()?;
        }

        timer.cancel();
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let path = self.session.navigator().current_path().to_string();
        let page = self.session.page();
        self.ui.render(&path, &page)
    }
}

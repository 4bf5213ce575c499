use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::thread;
use textwrap::fill;
use tokio::sync::mpsc;

use crate::carousel::HERO_IMAGES;
use crate::course::{Course, CourseId};
use crate::discovery::ViewStatus;
use crate::history::HistoryEntry;
use crate::landing::FEATURED_TAGS;

#[derive(Debug, Clone)]
pub enum PageView {
    Landing {
        status: ViewStatus,
        previews: Vec<Course>,
        cursor: usize,
        hero_index: usize,
    },
    Search {
        status: ViewStatus,
        courses: Arc<[Course]>,
        selected: Option<CourseId>,
        cursor: usize,
        detail: Option<Course>,
    },
    Checkout {
        path: String,
        step: u32,
        course_id: CourseId,
        show_sign_up: bool,
        course: Option<Course>,
    },
    NotFound {
        path: String,
    },
    History {
        entries: Vec<HistoryEntry>,
        current_index: Option<usize>,
    },
    URLInput {
        input: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Quit,
    Up,
    Down,
    Left,
    Right,
    Activate,
    Enroll,
    SearchAll,
    GoBack,
    GoForward,
    ShowHistory,
    EnterUrl,
    ConfirmInput(String),
    CancelInput,
    InputChar(char),
    Backspace,
    Refresh,
    ScrollUp,
    ScrollDown,
}

/// Maps a key press to an action for the page currently shown.
pub fn map_key(page: &PageView, key: KeyEvent) -> Option<UserAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(UserAction::Quit);
    }

    match page {
        PageView::URLInput { input } => match key.code {
            KeyCode::Esc => Some(UserAction::CancelInput),
            KeyCode::Enter => Some(UserAction::ConfirmInput(input.clone())),
            KeyCode::Backspace => Some(UserAction::Backspace),
            KeyCode::Char(c) => Some(UserAction::InputChar(c)),
            _ => None,
        },
        PageView::History { .. } => Some(UserAction::CancelInput),
        _ => match key.code {
            KeyCode::Char('q') => Some(UserAction::Quit),
            KeyCode::Char('b') | KeyCode::Esc => Some(UserAction::GoBack),
            KeyCode::Char('f') => Some(UserAction::GoForward),
            KeyCode::Char('h') => Some(UserAction::ShowHistory),
            KeyCode::Char('g') => Some(UserAction::EnterUrl),
            KeyCode::Char('r') => Some(UserAction::Refresh),
            KeyCode::Char('s') => Some(UserAction::SearchAll),
            KeyCode::Char('e') => Some(UserAction::Enroll),
            KeyCode::Up if key.modifiers.contains(KeyModifiers::SHIFT) => Some(UserAction::ScrollUp),
            KeyCode::Down if key.modifiers.contains(KeyModifiers::SHIFT) => Some(UserAction::ScrollDown),
            KeyCode::Up | KeyCode::Char('k') => Some(UserAction::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(UserAction::Down),
            KeyCode::Left => Some(UserAction::Left),
            KeyCode::Right => Some(UserAction::Right),
            KeyCode::Enter => Some(UserAction::Activate),
            _ => None,
        },
    }
}

/// Reads terminal events on a dedicated thread so the async loop never blocks.
pub fn spawn_input_reader(tx: mpsc::UnboundedSender<Event>) {
    thread::spawn(move || loop {
        match event::read() {
            Ok(event) => {
                if tx.send(event).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "terminal input failed");
                break;
            }
        }
    });
}

pub struct UI {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    scroll_position: u16,
}

impl UI {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            scroll_position: 0,
        })
    }

    pub fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    pub fn render(&mut self, path: &str, page: &PageView) -> Result<()> {
        draw(&mut self.terminal, path, page, self.scroll_position)
    }

    pub fn scroll_up(&mut self) {
        self.scroll_position = self.scroll_position.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_position = self.scroll_position.saturating_add(1);
    }

    pub fn reset_scroll(&mut self) {
        self.scroll_position = 0;
    }
}

pub fn draw<B: Backend>(
    terminal: &mut Terminal<B>,
    path: &str,
    page: &PageView,
    scroll: u16,
) -> Result<()> {
    terminal.draw(|f| render_page(f, path, page, scroll))?;
    Ok(())
}

pub fn render_page(f: &mut Frame, path: &str, page: &PageView, scroll: u16) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_address_bar(f, chunks[0], path);

    match page {
        PageView::Landing {
            status,
            previews,
            cursor,
            hero_index,
        } => render_landing(f, chunks[1], *status, previews, *cursor, *hero_index),
        PageView::Search {
            status,
            courses,
            selected,
            cursor,
            detail,
        } => render_search(
            f,
            chunks[1],
            *status,
            courses,
            selected.as_ref(),
            *cursor,
            detail.as_ref(),
            scroll,
        ),
        PageView::Checkout {
            path,
            step,
            course_id,
            show_sign_up,
            course,
        } => render_checkout(f, chunks[1], path, *step, course_id, *show_sign_up, course.as_ref()),
        PageView::NotFound { path } => render_not_found(f, chunks[1], path),
        PageView::History {
            entries,
            current_index,
        } => render_history(f, chunks[1], entries, *current_index),
        PageView::URLInput { input } => render_url_input(f, chunks[1], input),
    }

    render_help(f, chunks[2], page);
}

fn accent() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn highlight() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn render_address_bar(f: &mut Frame, area: Rect, path: &str) {
    f.render_widget(
        Paragraph::new(format!("📍 {}", path))
            .style(Style::default().fg(Color::Blue))
            .block(Block::default().borders(Borders::ALL).title("Coursebow")),
        area,
    );
}

fn render_landing(
    f: &mut Frame,
    area: Rect,
    status: ViewStatus,
    previews: &[Course],
    cursor: usize,
    hero_index: usize,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(6)])
        .split(area);

    let hero = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[0]);

    let hero_text = vec![
        Line::from(Span::styled(
            "Courses",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("This is the list of the courses you can enroll in."),
        Line::from("Courses when you need them and want them."),
        Line::from(""),
        Line::from(vec![
            Span::styled("[s]", accent()),
            Span::raw(" Search for Courses"),
        ]),
    ];
    f.render_widget(
        Paragraph::new(hero_text)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL)),
        hero[0],
    );

    let dots: Vec<Span> = (0..HERO_IMAGES.len())
        .map(|i| {
            if i == hero_index {
                Span::styled("● ", accent())
            } else {
                Span::styled("○ ", Style::default().fg(Color::DarkGray))
            }
        })
        .collect();
    let image = HERO_IMAGES.get(hero_index).copied().unwrap_or_default();
    f.render_widget(
        Paragraph::new(vec![
            Line::from(""),
            Line::from(format!("🖼  Hero Banner {}", hero_index + 1)),
            Line::from(Span::styled(image, Style::default().fg(Color::DarkGray))),
            Line::from(dots),
        ])
        .block(Block::default().borders(Borders::ALL)),
        hero[1],
    );

    let featured = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(1), Constraint::Min(4)])
        .split(chunks[1]);

    f.render_widget(
        Paragraph::new(
            "From beginner to advanced, in all industries, we have the right courses just for you \
             and preparing your entire journey for learning and making the most.",
        )
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::TOP)
                .title(Span::styled("Featured Courses", accent())),
        ),
        featured[0],
    );

    let tags: Vec<Span> = FEATURED_TAGS
        .iter()
        .flat_map(|tag| {
            [
                Span::styled(format!(" {} ", tag), Style::default().bg(Color::DarkGray).fg(Color::White)),
                Span::raw(" "),
            ]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(tags)), featured[1]);

    if status == ViewStatus::Loading {
        render_skeleton(f, featured[2], 4);
        return;
    }

    if previews.is_empty() {
        f.render_widget(
            Paragraph::new("No courses available yet")
                .style(Style::default().fg(Color::Gray))
                .block(Block::default().borders(Borders::ALL)),
            featured[2],
        );
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, previews.len() as u32); previews.len()])
        .split(featured[2]);

    for (i, (course, column)) in previews.iter().zip(columns.iter()).enumerate() {
        render_course_card(f, *column, course, i == cursor);
    }
}

fn render_skeleton(f: &mut Frame, area: Rect, cards: usize) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, cards as u32); cards])
        .split(area);
    for column in columns.iter() {
        let filler = "░".repeat(column.width.saturating_sub(4) as usize);
        f.render_widget(
            Paragraph::new(vec![Line::from(filler.clone()), Line::from(filler)])
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL)),
            *column,
        );
    }
}

fn render_course_card(f: &mut Frame, area: Rect, course: &Course, selected: bool) {
    let width = area.width.saturating_sub(4) as usize;
    let mut lines = vec![Line::from(Span::styled(
        fill(&course.title, width.max(1)),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let Some(teacher) = &course.teacher_name {
        lines.push(Line::from(format!("By {}", teacher)));
    }
    lines.push(Line::from(vec![
        Span::styled(course.price_label(), Style::default().fg(Color::Green)),
        Span::raw(" "),
        Span::styled(
            course.level.clone().unwrap_or_default(),
            Style::default().fg(Color::Yellow),
        ),
    ]));

    let border = if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(course.category.clone().unwrap_or_default()),
        ),
        area,
    );
}

#[allow(clippy::too_many_arguments)]
fn render_search(
    f: &mut Frame,
    area: Rect,
    status: ViewStatus,
    courses: &[Course],
    selected: Option<&CourseId>,
    cursor: usize,
    detail: Option<&Course>,
    scroll: u16,
) {
    match status {
        ViewStatus::Loading => {
            f.render_widget(
                Paragraph::new("⏳ Loading courses...")
                    .style(accent())
                    .block(Block::default().borders(Borders::ALL).title("Search")),
                area,
            );
            return;
        }
        ViewStatus::Error => {
            f.render_widget(
                Paragraph::new("Failed to fetch courses")
                    .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .block(Block::default().borders(Borders::ALL).title("❌ Error")),
                area,
            );
            return;
        }
        ViewStatus::Ready => {}
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(4)])
        .split(area);

    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled("List of available courses", accent())),
            Line::from(format!("{} courses available", courses.len())),
        ]),
        chunks[0],
    );

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    render_course_list(f, content[0], courses, selected, cursor);
    if let Some(course) = detail {
        render_selected_course(f, content[1], course, scroll);
    }
}

fn render_course_list(
    f: &mut Frame,
    area: Rect,
    courses: &[Course],
    selected: Option<&CourseId>,
    cursor: usize,
) {
    if courses.is_empty() {
        f.render_widget(
            Paragraph::new("No courses found")
                .style(Style::default().fg(Color::Gray))
                .block(Block::default().borders(Borders::ALL).title("📚 Courses")),
            area,
        );
        return;
    }

    let visible_height = area.height.saturating_sub(2) as usize;
    let start = (cursor + 1).saturating_sub(visible_height);
    let end = (start + visible_height).min(courses.len());
    let width = area.width.saturating_sub(6) as usize;

    let items: Vec<ListItem> = courses[start..end]
        .iter()
        .enumerate()
        .map(|(i, course)| {
            let index = start + i;
            let is_selected = selected == Some(&course.course_id);
            let marker = if is_selected { "➤ " } else { "  " };
            let style = if index == cursor {
                highlight()
            } else if is_selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            let content = format!("{}{} · {}", marker, course.title, course.price_label());
            ListItem::new(fill(&content, width.max(1))).style(style)
        })
        .collect();

    f.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title("📚 Courses")),
        area,
    );

    if courses.len() > visible_height {
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None);
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(courses.len())
            .position(cursor);
        f.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

fn selected_course_lines(course: &Course, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            course.title.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "By {} | {} | {}",
            course.teacher_name.as_deref().unwrap_or("Unknown"),
            course.category.as_deref().unwrap_or("Uncategorized"),
            course.level.as_deref().unwrap_or("All levels"),
        )),
        Line::from(vec![
            Span::styled(course.price_label(), Style::default().fg(Color::Green)),
            Span::raw(format!(
                "  ·  {} enrolled",
                course.enrollments.len()
            )),
        ]),
        Line::from(""),
    ];

    if let Some(description) = &course.description {
        for line in fill(description, width.max(1)).lines() {
            lines.push(Line::from(line.to_string()));
        }
        lines.push(Line::from(""));
    }

    if !course.sections.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(
                "Course content · {} sections · {} chapters",
                course.sections.len(),
                course.chapter_count()
            ),
            accent(),
        )));
        for section in &course.sections {
            lines.push(Line::from(format!(
                "• {} ({} chapters)",
                section.section_title,
                section.chapters.len()
            )));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("[e]", accent()),
        Span::raw(" Enroll Now"),
    ]));
    lines
}

fn render_selected_course(f: &mut Frame, area: Rect, course: &Course, scroll: u16) {
    let width = area.width.saturating_sub(4) as usize;
    let lines = selected_course_lines(course, width);
    let visible_height = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(visible_height) as u16;
    let scroll = scroll.min(max_scroll);

    f.render_widget(
        Paragraph::new(lines.clone())
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .block(Block::default().borders(Borders::ALL).title("📄 Selected Course")),
        area,
    );

    if max_scroll > 0 {
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None);
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(lines.len())
            .position(scroll as usize);
        f.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

fn render_checkout(
    f: &mut Frame,
    area: Rect,
    path: &str,
    step: u32,
    course_id: &CourseId,
    show_sign_up: bool,
    course: Option<&Course>,
) {
    let course_line = match course {
        Some(course) => format!("{} · {}", course.title, course.price_label()),
        None => format!("Course {}", course_id),
    };
    let lines = vec![
        Line::from(Span::styled("Checkout", accent())),
        Line::from(""),
        Line::from(course_line),
        Line::from(format!("Step {}", step)),
        Line::from(format!(
            "Sign up: {}",
            if show_sign_up { "shown" } else { "skipped" }
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Handing off to {}", path),
            Style::default().fg(Color::Blue),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("💳 Checkout")),
        area,
    );
}

fn render_not_found(f: &mut Frame, area: Rect, path: &str) {
    f.render_widget(
        Paragraph::new(format!("Page not found: {}", path))
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("❌ Not Found")),
        area,
    );
}

fn render_history(f: &mut Frame, area: Rect, entries: &[HistoryEntry], current_index: Option<usize>) {
    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let marker = if Some(i) == current_index { "➤ " } else { "  " };
            let style = if Some(i) == current_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let content = format!("{}{} - {}", marker, entry.title, entry.path);
            ListItem::new(fill(&content, area.width.saturating_sub(4).max(1) as usize)).style(style)
        })
        .collect();

    f.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title("📚 History")),
        area,
    );
}

fn render_url_input(f: &mut Frame, area: Rect, input: &str) {
    let popup_area = Rect {
        x: area.x + area.width / 4,
        y: area.y + area.height.saturating_sub(4) / 2,
        width: area.width / 2,
        height: 4.min(area.height),
    };

    f.render_widget(Clear, popup_area);
    f.render_widget(
        Paragraph::new(format!("📍 {}", input))
            .style(Style::default().fg(Color::White))
            .block(Block::default().borders(Borders::ALL).title("Go to path")),
        popup_area,
    );
}

fn render_help(f: &mut Frame, area: Rect, page: &PageView) {
    let hints: &[(&str, &str)] = match page {
        PageView::Landing { .. } => &[
            ("←→", "Pick"),
            ("Enter", "Open"),
            ("s", "Search"),
            ("g", "Go"),
            ("h", "History"),
            ("r", "Refresh"),
            ("q", "Quit"),
        ],
        PageView::Search { .. } => &[
            ("↑↓", "Browse"),
            ("Enter", "Select"),
            ("e", "Enroll"),
            ("Shift+↑↓", "Scroll"),
            ("b", "Back"),
            ("r", "Retry"),
            ("q", "Quit"),
        ],
        PageView::URLInput { .. } => &[("Enter", "Go"), ("Esc", "Cancel")],
        PageView::History { .. } => &[("any key", "Return")],
        _ => &[("b", "Back"), ("f", "Forward"), ("g", "Go"), ("q", "Quit")],
    };

    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(key.to_string(), accent()),
                Span::raw(format!(" {}  ", label)),
            ]
        })
        .collect();

    f.render_widget(
        Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title("⌨️ Controls")),
        area,
    );
}

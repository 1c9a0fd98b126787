use crate::calendar::{Calendar, CalendarEvent};
use crate::config::{Config, KeyAction, KeyMap, Theme};
use crate::storage::NoteStore;
use anyhow::{Context, Result};
use chrono::Local;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Alignment, Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::block::{Position, Title};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};
use ratatui::Terminal;
use std::fs;
use std::io::{stdout, Stdout};
use std::process::Command;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const CLOCK_INTERVAL: Duration = Duration::from_secs(5 * 60);

pub fn run(calendar: Calendar, config: &Config, notes: NoteStore) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let mut app = App::new(calendar, config, notes);
    spawn_clock(app.tx.clone());
    let result = app.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

struct App {
    calendar: Calendar,
    keys: KeyMap,
    theme: Theme,
    editor: String,
    padding: u16,
    notes: NoteStore,
    show_help: bool,
    editing: bool,
    tx: Sender<CalendarEvent>,
    rx: Receiver<CalendarEvent>,
}

impl App {
    fn new(calendar: Calendar, config: &Config, notes: NoteStore) -> Self {
        let (tx, rx) = mpsc::channel();
        App {
            calendar,
            keys: config.keys.clone(),
            theme: config.theme.theme(),
            editor: config.editor.clone(),
            padding: config.layout.preview_padding,
            notes,
            show_help: false,
            editing: false,
            tx,
            rx,
        }
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let size = terminal.size()?;
        self.calendar.update(CalendarEvent::Resize {
            width: size.width,
            height: size.height,
        });
        loop {
            while let Ok(event) = self.rx.try_recv() {
                self.deliver(terminal, event)?;
            }

            // The editor owns stdin until it exits.
            if self.editing {
                let event = self.rx.recv()?;
                self.deliver(terminal, event)?;
                continue;
            }

            terminal.draw(|f| self.draw(f))?;
            if event::poll(Duration::from_millis(200))? {
                match event::read()? {
                    Event::Key(key) => {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        match self.handle_key(key) {
                            Some(KeyAction::Quit) => break,
                            Some(KeyAction::EditNote) => self.edit_note(terminal)?,
                            _ => {}
                        }
                    }
                    Event::Mouse(mouse) => {
                        let event = match mouse.kind {
                            MouseEventKind::Down(MouseButton::Left) => CalendarEvent::PointerClick {
                                column: mouse.column,
                                row: mouse.row,
                            },
                            MouseEventKind::ScrollUp => CalendarEvent::ScrollUp,
                            MouseEventKind::ScrollDown => CalendarEvent::ScrollDown,
                            _ => continue,
                        };
                        self.calendar.update(event);
                    }
                    Event::Resize(width, height) => {
                        self.calendar.update(CalendarEvent::Resize { width, height });
                        log::debug!("resized to {}x{}, {:?}", width, height, self.calendar.mode());
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn deliver(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        event: CalendarEvent,
    ) -> Result<()> {
        if event == CalendarEvent::EditorClosed && self.editing {
            resume_terminal(terminal)?;
            self.editing = false;
        }
        self.calendar.update(event);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<KeyAction> {
        if self.show_help {
            self.show_help = false;
            return None;
        }
        let name = key_name(&key)?;
        let action = self.keys.resolve(&name);
        log::trace!("key {} -> {:?} ({:?})", name, action, self.calendar.focus());
        match action? {
            KeyAction::Help => {
                self.show_help = true;
                None
            }
            KeyAction::Calendar(event) => {
                self.calendar.update(event);
                None
            }
            other => Some(other),
        }
    }

    fn edit_note(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let path = self.notes.path(self.calendar.selected());
        fs::create_dir_all(self.notes.dir())
            .with_context(|| format!("creating {}", self.notes.dir().display()))?;
        let mut words = self.editor.split_whitespace();
        let Some(program) = words.next() else {
            log::warn!("no editor configured");
            return Ok(());
        };

        suspend_terminal(terminal)?;
        let child = Command::new(program).args(words).arg(&path).spawn();
        let mut child = match child {
            Ok(child) => child,
            Err(err) => {
                log::error!("starting {}: {}", self.editor, err);
                return resume_terminal(terminal);
            }
        };
        log::info!("editing {}", path.display());
        self.editing = true;
        let tx = self.tx.clone();
        thread::spawn(move || {
            if let Err(err) = child.wait() {
                log::error!("waiting for editor: {}", err);
            }
            let _ = tx.send(CalendarEvent::EditorClosed);
        });
        Ok(())
    }

    fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let area = f.size();
        self.calendar.place(area);

        for month in self.calendar.months() {
            let rect = month.area().intersection(area);
            if rect.area() == 0 {
                continue;
            }
            f.render_widget(Paragraph::new(month.lines(&self.theme)), rect);
        }

        if let Some(rect) = self.calendar.banner_area() {
            let banner = Paragraph::new(Line::from(Span::styled(
                self.calendar.banner(),
                Style::default().add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center);
            f.render_widget(banner, rect);
        }

        if let Some(rect) = self.calendar.preview_area() {
            self.draw_preview(f, rect);
        }

        if self.show_help {
            self.draw_help(f);
        }
    }

    fn draw_preview(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let preview = self.calendar.preview();
        let lines: Vec<Line> = preview.view().into_iter().map(Line::from).collect();
        if lines.is_empty() {
            return;
        }
        let focused = preview.is_focused();
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(if focused {
                BorderType::Rounded
            } else {
                BorderType::Plain
            })
            .border_style(Style::default().fg(if focused {
                Color::Cyan
            } else {
                Color::DarkGray
            }))
            .padding(Padding::horizontal(self.padding));
        if preview.line_count() > preview.height() {
            let position = format!(" {}/{} ", preview.y_offset() + 1, preview.line_count());
            block = block.title(
                Title::from(Span::styled(position, Style::default().fg(Color::DarkGray)))
                    .position(Position::Bottom)
                    .alignment(Alignment::Right),
            );
        }
        f.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_help(&self, f: &mut ratatui::Frame<'_>) {
        let area = centered_rect(60, 70, f.size());
        let label_width = self
            .keys
            .describe()
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(0);
        let mut lines: Vec<Line> = self
            .keys
            .describe()
            .into_iter()
            .map(|(label, keys)| {
                Line::from(vec![
                    Span::styled(
                        format!("{:<width$}  ", label, width = label_width),
                        Style::default().fg(Color::Gray),
                    ),
                    Span::styled(keys, Style::default().fg(Color::LightCyan)),
                ])
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )));
        let dialog = Paragraph::new(lines).block(
            Block::default()
                .title(Span::styled(
                    "Keys",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        f.render_widget(Clear, area);
        f.render_widget(dialog, area);
    }
}

pub fn key_name(key: &KeyEvent) -> Option<String> {
    let base = match key.code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "enter".into(),
        KeyCode::Tab => "tab".into(),
        KeyCode::BackTab => return Some("shift+tab".into()),
        KeyCode::Esc => "esc".into(),
        KeyCode::Backspace => "backspace".into(),
        KeyCode::Delete => "delete".into(),
        KeyCode::Left => "left".into(),
        KeyCode::Right => "right".into(),
        KeyCode::Up => "up".into(),
        KeyCode::Down => "down".into(),
        KeyCode::Home => "home".into(),
        KeyCode::End => "end".into(),
        KeyCode::PageUp => "pgup".into(),
        KeyCode::PageDown => "pgdown".into(),
        KeyCode::F(n) => format!("f{}", n),
        _ => return None,
    };
    let mut name = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        name.push_str("ctrl+");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        name.push_str("alt+");
    }
    name.push_str(&base);
    Some(name)
}

fn spawn_clock(tx: Sender<CalendarEvent>) {
    thread::spawn(move || loop {
        thread::sleep(CLOCK_INTERVAL);
        if tx.send(CalendarEvent::ClockTick(Local::now().date_naive())).is_err() {
            break;
        }
    });
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn suspend_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    teardown_terminal(terminal).context("releasing terminal for the editor")
}

fn resume_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    enable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        EnterAlternateScreen,
        EnableMouseCapture
    )?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(())
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

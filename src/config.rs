use crate::calendar::CalendarEvent;
use crate::model::Keyword;
use ratatui::prelude::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub note_dir: String,
    pub editor: String,
    pub layout: Spacing,
    pub theme: ThemeConfig,
    pub holiday_lists: Vec<PathBuf>,
    pub keywords: Vec<Keyword>,
    pub keys: KeyMap,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            note_dir: String::new(),
            editor: "vi".into(),
            layout: Spacing::default(),
            theme: ThemeConfig::default(),
            holiday_lists: Vec::new(),
            keywords: Vec::new(),
            keys: KeyMap::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Spacing {
    pub left_padding: u16,
    pub right_padding: u16,
    pub preview_left_margin: u16,
    pub preview_padding: u16,
    pub preview_min_width: u16,
    pub preview_max_width: u16,
}

impl Default for Spacing {
    fn default() -> Self {
        Spacing {
            left_padding: 2,
            right_padding: 1,
            preview_left_margin: 3,
            preview_padding: 1,
            preview_min_width: 40,
            preview_max_width: 80,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct DayStyle {
    pub color: Option<String>,
    pub bold: bool,
    pub italic: bool,
}

impl DayStyle {
    fn colored(color: &str) -> Self {
        DayStyle {
            color: Some(color.into()),
            ..DayStyle::default()
        }
    }

    pub fn is_blank(&self) -> bool {
        self.color.as_deref().map_or(true, str::is_empty) && !self.bold && !self.italic
    }

    pub fn to_style(&self) -> Style {
        let mut style = Style::default();
        if let Some(color) = self.color.as_deref().and_then(parse_color) {
            style = style.fg(color);
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        style
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ThemeConfig {
    pub today: DayStyle,
    pub inactive: DayStyle,
    pub noted: DayStyle,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeConfig {
            today: DayStyle::colored("2"),
            inactive: DayStyle::colored("8"),
            noted: DayStyle::default(),
        }
    }
}

impl ThemeConfig {
    pub fn theme(&self) -> Theme {
        Theme {
            today: self.today.to_style(),
            inactive: self.inactive.to_style(),
            noted: self.noted.to_style(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Theme {
    pub today: Style,
    pub inactive: Style,
    pub noted: Style,
}

pub fn parse_color(raw: &str) -> Option<Color> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Color::from_str(raw).ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Help,
    EditNote,
    Calendar(CalendarEvent),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct KeyMap {
    pub quit: Vec<String>,
    pub help: Vec<String>,
    pub select_left: Vec<String>,
    pub select_down: Vec<String>,
    pub select_up: Vec<String>,
    pub select_right: Vec<String>,
    pub focus_preview: Vec<String>,
    pub toggle_preview: Vec<String>,
    pub edit_note: Vec<String>,
    pub last_sunday: Vec<String>,
    pub next_sunday: Vec<String>,
    pub next_saturday: Vec<String>,
    pub month_up: Vec<String>,
    pub month_down: Vec<String>,
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|k| k.to_string()).collect()
}

impl Default for KeyMap {
    fn default() -> Self {
        KeyMap {
            quit: keys(&["ctrl+c", "q"]),
            help: keys(&["?"]),
            select_left: keys(&["left", "h"]),
            select_down: keys(&["down", "j"]),
            select_up: keys(&["up", "k"]),
            select_right: keys(&["right", "l"]),
            focus_preview: keys(&["tab"]),
            toggle_preview: keys(&["p"]),
            edit_note: keys(&["enter"]),
            last_sunday: keys(&["b", "H"]),
            next_sunday: keys(&["w"]),
            next_saturday: keys(&["e", "L"]),
            month_up: keys(&["ctrl+u"]),
            month_down: keys(&["ctrl+d"]),
        }
    }
}

impl KeyMap {
    fn bindings(&self) -> [(&'static str, &[String], KeyAction); 14] {
        let cal = KeyAction::Calendar;
        [
            ("Quit", self.quit.as_slice(), KeyAction::Quit),
            ("Help", self.help.as_slice(), KeyAction::Help),
            ("Select left", self.select_left.as_slice(), cal(CalendarEvent::MoveLeft)),
            ("Select down", self.select_down.as_slice(), cal(CalendarEvent::MoveDown)),
            ("Select up", self.select_up.as_slice(), cal(CalendarEvent::MoveUp)),
            ("Select right", self.select_right.as_slice(), cal(CalendarEvent::MoveRight)),
            ("Focus preview", self.focus_preview.as_slice(), cal(CalendarEvent::ToggleFocus)),
            ("Toggle preview", self.toggle_preview.as_slice(), cal(CalendarEvent::TogglePreview)),
            ("Edit note", self.edit_note.as_slice(), KeyAction::EditNote),
            ("Last Sunday", self.last_sunday.as_slice(), cal(CalendarEvent::JumpLastSunday)),
            ("Next Sunday", self.next_sunday.as_slice(), cal(CalendarEvent::JumpNextSunday)),
            ("Next Saturday", self.next_saturday.as_slice(), cal(CalendarEvent::JumpNextSaturday)),
            ("Month up", self.month_up.as_slice(), cal(CalendarEvent::MonthUp)),
            ("Month down", self.month_down.as_slice(), cal(CalendarEvent::MonthDown)),
        ]
    }

    pub fn resolve(&self, key: &str) -> Option<KeyAction> {
        self.bindings()
            .into_iter()
            .find(|(_, bound, _)| bound.iter().any(|k| k == key))
            .map(|(_, _, action)| action)
    }

    pub fn describe(&self) -> Vec<(&'static str, String)> {
        self.bindings()
            .into_iter()
            .map(|(label, bound, _)| (label, bound.join(", ")))
            .collect()
    }
}

use crate::calendar::CalendarEvent;
use crate::config::Theme;
use crate::date::{add_days, days_in_month, first_day, first_weekday, same_month};
use crate::navigate::{column_step, grid_step, jump, Direction, Jump};
use chrono::{Datelike, NaiveDate};
use ratatui::prelude::{Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use std::collections::HashMap;

pub const MONTH_WIDTH: u16 = 20;
pub const MONTH_HEIGHT: u16 = 8;

const WEEKDAYS: &str = "Su Mo Tu We Th Fr Sa";
const CELL_WIDTH: u16 = 3;
const GRID_TOP: u16 = 2;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MonthLayout {
    Column,
    Grid,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DayMark {
    Noted,
    Colored(Color),
}

#[derive(Debug, Clone)]
pub struct MonthPanel {
    anchor: NaiveDate,
    today: NaiveDate,
    selected: NaiveDate,
    layout: MonthLayout,
    show_year: bool,
    focused: bool,
    area: Rect,
    marks: HashMap<u32, DayMark>,
}

impl MonthPanel {
    pub fn new(
        anchor: NaiveDate,
        today: NaiveDate,
        selected: NaiveDate,
        layout: MonthLayout,
    ) -> Self {
        MonthPanel {
            anchor: first_day(anchor),
            today,
            selected,
            layout,
            show_year: true,
            focused: false,
            area: Rect::default(),
            marks: HashMap::new(),
        }
    }

    pub fn compact(mut self) -> Self {
        self.show_year = false;
        self
    }

    pub fn with_marks(mut self, marks: HashMap<u32, DayMark>) -> Self {
        self.marks = marks;
        self
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn select(&mut self, date: NaiveDate) {
        self.selected = date;
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn unfocus(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_today(&mut self, date: NaiveDate) {
        self.today = date;
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn update(&mut self, event: &CalendarEvent) {
        match event {
            CalendarEvent::MoveLeft => self.move_selection(Direction::Left),
            CalendarEvent::MoveRight => self.move_selection(Direction::Right),
            CalendarEvent::MoveUp => self.move_selection(Direction::Up),
            CalendarEvent::MoveDown => self.move_selection(Direction::Down),
            CalendarEvent::JumpLastSunday => self.jump_selection(Jump::LastSunday),
            CalendarEvent::JumpNextSunday => self.jump_selection(Jump::NextSunday),
            CalendarEvent::JumpNextSaturday => self.jump_selection(Jump::NextSaturday),
            CalendarEvent::MonthUp => self.jump_selection(Jump::MonthUp),
            CalendarEvent::MonthDown => self.jump_selection(Jump::MonthDown),
            CalendarEvent::ScrollUp if self.focused => {
                self.selected = add_days(self.selected, -7);
            }
            CalendarEvent::ScrollDown if self.focused => {
                self.selected = add_days(self.selected, 7);
            }
            CalendarEvent::PointerClick { column, row } => {
                if let Some(date) = self.hit_test(*column, *row) {
                    self.selected = date;
                }
            }
            _ => {}
        }
    }

    pub fn move_selection(&mut self, direction: Direction) {
        if !self.focused {
            return;
        }
        self.selected = match self.layout {
            MonthLayout::Grid => grid_step(self.selected, direction),
            MonthLayout::Column => column_step(self.selected, direction),
        };
    }

    pub fn jump_selection(&mut self, target: Jump) {
        if !self.focused {
            return;
        }
        self.selected = jump(self.selected, target);
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Option<NaiveDate> {
        let x = column.checked_sub(self.area.x)?;
        let y = row.checked_sub(self.area.y)?;
        if x >= self.area.width.min(MONTH_WIDTH) || y >= self.area.height.min(MONTH_HEIGHT) {
            return None;
        }
        if y < GRID_TOP || x % CELL_WIDTH == CELL_WIDTH - 1 {
            return None;
        }
        let cell = u32::from(y - GRID_TOP) * 7 + u32::from(x / CELL_WIDTH);
        let day = (cell + 1).checked_sub(first_weekday(self.anchor))?;
        if day == 0 || day > days_in_month(self.anchor.year(), self.anchor.month()) {
            return None;
        }
        self.anchor.with_day(day)
    }

    pub fn heading(&self) -> String {
        let name = self.anchor.format("%B").to_string();
        if self.show_year {
            format!("{} {}", name, self.anchor.year())
        } else {
            name
        }
    }

    pub fn lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        let active = same_month(self.anchor, self.selected);
        let heading_style = if active {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            theme.inactive
        };
        let mut lines = vec![
            Line::from(Span::styled(
                format!("{:^width$}", self.heading(), width = MONTH_WIDTH as usize),
                heading_style,
            )),
            Line::from(Span::styled(WEEKDAYS, heading_style)),
        ];

        let offset = first_weekday(self.anchor);
        let days = days_in_month(self.anchor.year(), self.anchor.month());
        let mut spans = vec![Span::raw("   "); offset as usize];
        for day in 1..=days {
            spans.push(Span::styled(format!("{:>2}", day), self.day_style(day, active, theme)));
            if (day + offset) % 7 == 0 {
                lines.push(Line::from(std::mem::take(&mut spans)));
            } else if day < days {
                spans.push(Span::raw(" "));
            }
        }
        if !spans.is_empty() {
            lines.push(Line::from(spans));
        }
        lines
    }

    fn day_style(&self, day: u32, active: bool, theme: &Theme) -> Style {
        let mut style = if !active {
            theme.inactive
        } else if day == self.selected.day() {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        match self.marks.get(&day) {
            Some(DayMark::Noted) => style = style.patch(theme.noted),
            Some(DayMark::Colored(color)) => style = style.fg(*color),
            None => {}
        }
        if same_month(self.anchor, self.today) && day == self.today.day() {
            style = style.patch(theme.today);
        }
        style
    }
}

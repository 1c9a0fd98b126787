use crate::config::Spacing;
use crate::date::{add_months, floor_mod, same_month};
use crate::month::{MonthLayout, MonthPanel, MONTH_HEIGHT, MONTH_WIDTH};
use crate::preview::{Preview, BORDER_THICKNESS};
use crate::storage::Annotations;
use chrono::{Datelike, NaiveDate};
use ratatui::prelude::Rect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarEvent {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    JumpLastSunday,
    JumpNextSunday,
    JumpNextSaturday,
    MonthUp,
    MonthDown,
    ToggleFocus,
    TogglePreview,
    Resize { width: u16, height: u16 },
    PointerClick { column: u16, row: u16 },
    ScrollUp,
    ScrollDown,
    ClockTick(NaiveDate),
    EditorClosed,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ViewportMode {
    Single,
    Triple,
    Full,
}

impl ViewportMode {
    pub fn panel_count(self) -> usize {
        match self {
            ViewportMode::Single => 1,
            ViewportMode::Triple => 3,
            ViewportMode::Full => 12,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FocusTarget {
    MonthsFocused,
    PreviewFocused,
    PreviewHidden,
}

pub struct Calendar {
    today: NaiveDate,
    selected: NaiveDate,
    months: Vec<MonthPanel>,
    mode: ViewportMode,
    focus: FocusTarget,
    preview: Preview,
    preview_area: Option<Rect>,
    banner_area: Option<Rect>,
    annotations: Annotations,
    spacing: Spacing,
    width: u16,
    height: u16,
}

impl Calendar {
    pub fn new(
        selected: NaiveDate,
        today: NaiveDate,
        spacing: Spacing,
        annotations: Annotations,
    ) -> Self {
        let preview = Preview::new(&annotations.note(selected), spacing);
        let mut calendar = Calendar {
            today,
            selected,
            months: Vec::new(),
            mode: ViewportMode::Single,
            focus: FocusTarget::MonthsFocused,
            preview,
            preview_area: None,
            banner_area: None,
            annotations,
            spacing,
            width: 0,
            height: 0,
        };
        calendar.resize();
        calendar
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn months(&self) -> &[MonthPanel] {
        &self.months
    }

    pub fn mode(&self) -> ViewportMode {
        self.mode
    }

    pub fn focus(&self) -> FocusTarget {
        self.focus
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    pub fn preview_area(&self) -> Option<Rect> {
        self.preview_area
    }

    pub fn banner_area(&self) -> Option<Rect> {
        self.banner_area
    }

    pub fn banner(&self) -> String {
        let year = self.selected.year().to_string();
        match self.annotations.holidays().find(self.selected) {
            Some(holiday) => format!("{} {}", holiday.message, year),
            None => year,
        }
    }

    pub fn update(&mut self, event: CalendarEvent) {
        match &event {
            CalendarEvent::MoveLeft
            | CalendarEvent::MoveRight
            | CalendarEvent::JumpLastSunday
            | CalendarEvent::JumpNextSunday
            | CalendarEvent::JumpNextSaturday => {
                if self.focus != FocusTarget::PreviewHidden {
                    self.set_focus(FocusTarget::MonthsFocused);
                }
            }
            CalendarEvent::ToggleFocus => self.toggle_focus(),
            CalendarEvent::TogglePreview => {
                self.toggle_preview();
                self.resize();
            }
            CalendarEvent::Resize { width, height } => {
                self.width = *width;
                self.height = *height;
                self.resize();
            }
            CalendarEvent::ClockTick(today) => self.set_today(*today),
            CalendarEvent::EditorClosed => self.select(self.selected),
            _ => {}
        }

        for month in &mut self.months {
            month.update(&event);
        }
        self.converge();
        self.preview.update(&event);
    }

    // Adopts a panel's diverging selection. When several panels diverge in
    // one cycle the last one in panel order wins.
    fn converge(&mut self) {
        let diverged = self
            .months
            .iter()
            .rev()
            .map(MonthPanel::selected)
            .find(|date| *date != self.selected);
        if let Some(date) = diverged {
            self.select(date);
        }
    }

    pub fn select(&mut self, date: NaiveDate) {
        self.selected = date;
        let mut off_screen = true;
        for month in &mut self.months {
            if same_month(month.anchor(), date) {
                off_screen = false;
            }
            month.select(date);
        }
        if off_screen {
            log::debug!("selection {} is off screen, rebuilding", date);
            self.resize();
        }
        self.preview.set_content(&self.annotations.note(date));
        if self.focus != FocusTarget::PreviewHidden {
            self.set_focus(FocusTarget::MonthsFocused);
        }
    }

    pub fn set_focus(&mut self, focus: FocusTarget) {
        if focus == FocusTarget::PreviewFocused {
            self.preview.focus();
            self.months.iter_mut().for_each(MonthPanel::unfocus);
        } else {
            self.preview.unfocus();
            self.months.iter_mut().for_each(MonthPanel::focus);
        }
        self.focus = focus;
    }

    pub fn toggle_focus(&mut self) {
        match self.focus {
            FocusTarget::MonthsFocused => self.set_focus(FocusTarget::PreviewFocused),
            FocusTarget::PreviewFocused => self.set_focus(FocusTarget::MonthsFocused),
            FocusTarget::PreviewHidden => {}
        }
    }

    pub fn toggle_preview(&mut self) {
        let focus = match self.focus {
            FocusTarget::PreviewHidden => FocusTarget::MonthsFocused,
            _ => FocusTarget::PreviewHidden,
        };
        self.set_focus(focus);
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        if today != self.today {
            log::info!("date changed to {}", today);
        }
        self.today = today;
        for month in &mut self.months {
            month.set_today(today);
        }
    }

    fn full_width(&self) -> u16 {
        let s = self.spacing;
        (4 * MONTH_WIDTH)
            .saturating_add(s.left_padding.saturating_mul(4))
            .saturating_add(s.right_padding)
    }

    fn mode_for_size(&self) -> ViewportMode {
        if self.height > 3 * MONTH_HEIGHT {
            if self.focus == FocusTarget::PreviewHidden && self.width > self.full_width() {
                ViewportMode::Full
            } else {
                ViewportMode::Triple
            }
        } else {
            ViewportMode::Single
        }
    }

    pub fn resize(&mut self) {
        let mode = self.mode_for_size();
        if mode != self.mode {
            log::debug!("{}x{}: {:?} -> {:?}", self.width, self.height, self.mode, mode);
        }
        self.months = match mode {
            ViewportMode::Single => vec![self.panel(self.selected, MonthLayout::Column)],
            ViewportMode::Triple => self.triple(),
            ViewportMode::Full => self.full_year(),
        };
        debug_assert_eq!(self.months.len(), mode.panel_count());
        self.mode = mode;
        self.set_focus(self.focus);
    }

    fn panel(&self, anchor: NaiveDate, layout: MonthLayout) -> MonthPanel {
        MonthPanel::new(anchor, self.today, self.selected, layout)
            .with_marks(self.annotations.month_marks(anchor))
    }

    // Offset 0 centres the selection, 1 puts it first, 2 puts it last, so
    // today's month stays in view while it is within reach.
    fn triple(&self) -> Vec<MonthPanel> {
        let offset = floor_mod(self.today.month() as i32 - self.selected.month() as i32, 3);
        let first = match offset {
            0 => -1,
            1 => 0,
            _ => -2,
        };
        (first..first + 3)
            .map(|n| self.panel(add_months(self.selected, n), MonthLayout::Grid))
            .collect()
    }

    fn full_year(&self) -> Vec<MonthPanel> {
        (1..=12)
            .filter_map(|month| self.selected.with_day(1)?.with_month(month))
            .map(|anchor| self.panel(anchor, MonthLayout::Grid).compact())
            .collect()
    }

    pub fn place(&mut self, area: Rect) {
        let x0 = area.x.saturating_add(self.spacing.left_padding);
        let y0 = area.y;
        let step_x = MONTH_WIDTH.saturating_add(self.spacing.left_padding);
        let (banner, top) = match self.mode {
            ViewportMode::Full => (Some(Rect::new(x0, y0, self.full_width(), 1)), y0 + 1),
            ViewportMode::Triple => (None, y0 + 1),
            ViewportMode::Single => (None, y0),
        };
        self.banner_area = banner.map(|r| r.intersection(area));
        let columns = if self.mode == ViewportMode::Full { 4 } else { 1 };
        for (idx, month) in self.months.iter_mut().enumerate() {
            let col = (idx % columns) as u16;
            let row = (idx / columns) as u16;
            month.set_area(Rect::new(
                x0.saturating_add(col.saturating_mul(step_x)),
                top.saturating_add(row * MONTH_HEIGHT),
                MONTH_WIDTH,
                MONTH_HEIGHT,
            ));
        }

        let hidden = self.focus == FocusTarget::PreviewHidden;
        self.preview_area = if hidden || self.preview.width() == 0 {
            None
        } else {
            let padding = self.spacing.preview_padding;
            let rect = Rect::new(
                x0.saturating_add(MONTH_WIDTH.saturating_add(self.spacing.preview_left_margin)),
                y0,
                (self.preview.width() as u16)
                    .saturating_add(padding.saturating_mul(2))
                    .saturating_add(BORDER_THICKNESS),
                self.preview.height() as u16 + BORDER_THICKNESS,
            );
            Some(rect.intersection(area))
        };
    }
}

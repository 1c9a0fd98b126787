use crate::config::parse_color;
use chrono::{Datelike, NaiveDate};
use ratatui::prelude::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolidayDate {
    Once(NaiveDate),
    Yearly { month: u32, day: u32 },
    Monthly { day: u32 },
}

impl HolidayDate {
    pub fn matches(&self, date: NaiveDate) -> bool {
        match *self {
            HolidayDate::Once(d) => d == date,
            HolidayDate::Yearly { month, day } => date.month() == month && date.day() == day,
            HolidayDate::Monthly { day } => date.day() == day,
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(HolidayDate::Once(date));
        }
        let parts: Vec<&str> = raw.split('-').collect();
        match parts.as_slice() {
            [month, day] if month.len() == 2 && day.len() == 2 => {
                let month = month.parse().ok()?;
                let day = day.parse().ok()?;
                // Leap day is accepted; it simply only matches in leap years.
                NaiveDate::from_ymd_opt(2000, month, day)?;
                Some(HolidayDate::Yearly { month, day })
            }
            [day] if day.len() == 2 => {
                let day = day.parse().ok()?;
                (1..=31).contains(&day).then_some(HolidayDate::Monthly { day })
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holiday {
    pub date: HolidayDate,
    pub color: Color,
    pub message: String,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ListError {
    #[error("line {0}: not enough fields")]
    MissingFields(usize),
    #[error("line {line}: invalid date {value}")]
    InvalidDate { line: usize, value: String },
    #[error("line {line}: invalid color {value}")]
    InvalidColor { line: usize, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Holidays(Vec<Holiday>);

impl Holidays {
    pub fn parse(text: &str) -> Result<Self, ListError> {
        let mut holidays = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            if raw.trim().is_empty() {
                continue;
            }
            let mut fields = raw.split_whitespace();
            let (date, color) = match (fields.next(), fields.next()) {
                (Some(date), Some(color)) => (date, color),
                _ => return Err(ListError::MissingFields(line)),
            };
            let date = HolidayDate::parse(date).ok_or_else(|| ListError::InvalidDate {
                line,
                value: date.to_string(),
            })?;
            let color = parse_color(color).ok_or_else(|| ListError::InvalidColor {
                line,
                value: color.to_string(),
            })?;
            holidays.push(Holiday {
                date,
                color,
                message: fields.collect::<Vec<_>>().join(" "),
            });
        }
        Ok(Holidays(holidays))
    }

    pub fn extend(&mut self, other: Holidays) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn find(&self, date: NaiveDate) -> Option<&Holiday> {
        self.0.iter().find(|h| h.date.matches(date))
    }

    pub fn prefix(&self, date: NaiveDate, note: &str) -> String {
        match self.find(date) {
            Some(holiday) => format!("{}\n\n{}", holiday.message, note),
            None => note.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub keyword: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keywords(Vec<Keyword>);

impl Keywords {
    pub fn new(keywords: Vec<Keyword>) -> Self {
        Keywords(keywords.into_iter().filter(|k| !k.keyword.is_empty()).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn find(&self, text: &str) -> Option<&Keyword> {
        text.lines()
            .find_map(|line| self.0.iter().find(|k| line.contains(&k.keyword)))
    }
}

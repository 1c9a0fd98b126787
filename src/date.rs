use chrono::{Datelike, Duration as ChronoDuration, NaiveDate};

// Modulo that always lands in `[0, y)` for a positive `y`, unlike `%`.
pub fn floor_mod(x: i32, y: i32) -> i32 {
    let m = x % y;
    if (m > 0 && y < 0) || (m < 0 && y > 0) {
        m + y
    } else {
        m
    }
}

pub fn add_months(d: NaiveDate, n: i32) -> NaiveDate {
    let total = d.year() * 12 + d.month0() as i32 + n;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = d.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(d)
}

pub fn last_month(d: NaiveDate) -> NaiveDate {
    add_months(d, -1)
}

pub fn next_month(d: NaiveDate) -> NaiveDate {
    add_months(d, 1)
}

pub fn add_days(d: NaiveDate, days: i64) -> NaiveDate {
    d.checked_add_signed(ChronoDuration::days(days)).unwrap_or(d)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

pub fn same_month(x: NaiveDate, y: NaiveDate) -> bool {
    x.year() == y.year() && x.month() == y.month()
}

pub fn first_day(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

pub fn last_day(d: NaiveDate) -> NaiveDate {
    d.with_day(days_in_month(d.year(), d.month())).unwrap_or(d)
}

pub fn weekday(d: NaiveDate) -> u32 {
    d.weekday().num_days_from_sunday()
}

pub fn first_weekday(d: NaiveDate) -> u32 {
    weekday(first_day(d))
}

pub fn grid_row(d: NaiveDate) -> u32 {
    (d.day() - 1 + first_weekday(d)) / 7
}

pub fn last_row(d: NaiveDate) -> u32 {
    grid_row(last_day(d))
}

pub fn saturday_rows(d: NaiveDate) -> u32 {
    (days_in_month(d.year(), d.month()) + first_weekday(d)) / 7
}

pub fn first_week(d: NaiveDate) -> bool {
    grid_row(d) == 0
}

pub fn last_week(d: NaiveDate) -> bool {
    grid_row(d) == last_row(d)
}

pub fn last_sunday(d: NaiveDate) -> NaiveDate {
    let offset = match weekday(d) {
        0 => 7,
        wd => wd,
    };
    add_days(d, -i64::from(offset))
}

pub fn next_sunday(d: NaiveDate) -> NaiveDate {
    add_days(d, i64::from(7 - weekday(d)))
}

pub fn next_saturday(d: NaiveDate) -> NaiveDate {
    let offset = match 6 - weekday(d) {
        0 => 7,
        n => n,
    };
    add_days(d, i64::from(offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn floor_mod_is_non_negative_for_positive_modulus() {
        assert_eq!(floor_mod(-1, 3), 2);
        assert_eq!(floor_mod(-2, 3), 1);
        assert_eq!(floor_mod(-3, 3), 0);
        assert_eq!(floor_mod(-11, 3), 1);
        assert_eq!(floor_mod(4, 3), 1);
        assert_eq!(floor_mod(4, -3), -2);
    }

    #[test]
    fn add_months_clamps_to_shorter_month() {
        assert_eq!(add_months(ymd(2023, 1, 31), 1), ymd(2023, 2, 28));
        assert_eq!(add_months(ymd(2024, 1, 31), 1), ymd(2024, 2, 29));
        assert_eq!(add_months(ymd(2023, 3, 31), -1), ymd(2023, 2, 28));
        assert_eq!(add_months(ymd(2023, 5, 31), 1), ymd(2023, 6, 30));
    }

    #[test]
    fn add_months_crosses_years() {
        assert_eq!(add_months(ymd(2023, 1, 15), -1), ymd(2022, 12, 15));
        assert_eq!(add_months(ymd(2023, 11, 15), 3), ymd(2024, 2, 15));
        assert_eq!(add_months(ymd(2023, 1, 15), -13), ymd(2021, 12, 15));
        assert_eq!(last_month(ymd(2023, 1, 1)), ymd(2022, 12, 1));
        assert_eq!(next_month(ymd(2023, 12, 1)), ymd(2024, 1, 1));
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2023, 12), 31);
        assert_eq!(days_in_month(2023, 4), 30);
    }

    #[test]
    fn same_month_compares_year_and_month() {
        assert!(same_month(ymd(2023, 6, 1), ymd(2023, 6, 30)));
        assert!(!same_month(ymd(2023, 6, 1), ymd(2022, 6, 1)));
        assert!(!same_month(ymd(2023, 5, 31), ymd(2023, 6, 1)));
    }

    #[test]
    fn first_and_last_day() {
        assert_eq!(first_day(ymd(2024, 2, 17)), ymd(2024, 2, 1));
        assert_eq!(last_day(ymd(2024, 2, 17)), ymd(2024, 2, 29));
    }

    #[test]
    fn week_boundaries_follow_grid_rows() {
        // June 2023 starts on a Thursday.
        assert_eq!(first_weekday(ymd(2023, 6, 1)), 4);
        assert!(first_week(ymd(2023, 6, 3)));
        assert!(!first_week(ymd(2023, 6, 4)));
        assert_eq!(grid_row(ymd(2023, 6, 30)), 4);
        assert!(last_week(ymd(2023, 6, 25)));
        assert!(!last_week(ymd(2023, 6, 24)));
        // October 2022 spills into a sixth row.
        assert_eq!(last_row(ymd(2022, 10, 1)), 5);
    }

    #[test]
    fn saturday_rows_excludes_a_partial_last_row() {
        // February 2015: 28 days starting on Sunday, four full rows.
        assert_eq!(saturday_rows(ymd(2015, 2, 1)), 4);
        // June 2023 ends on a Friday, so its last row has no Saturday.
        assert_eq!(saturday_rows(ymd(2023, 6, 1)), 4);
        assert_eq!(last_row(ymd(2023, 6, 1)), 4);
    }

    #[test]
    fn weekday_jumps_never_return_the_same_day() {
        // 2023-06-18 is a Sunday, 2023-06-17 a Saturday.
        assert_eq!(last_sunday(ymd(2023, 6, 18)), ymd(2023, 6, 11));
        assert_eq!(last_sunday(ymd(2023, 6, 21)), ymd(2023, 6, 18));
        assert_eq!(next_sunday(ymd(2023, 6, 18)), ymd(2023, 6, 25));
        assert_eq!(next_sunday(ymd(2023, 6, 17)), ymd(2023, 6, 18));
        assert_eq!(next_saturday(ymd(2023, 6, 17)), ymd(2023, 6, 24));
        assert_eq!(next_saturday(ymd(2023, 6, 18)), ymd(2023, 6, 24));
        assert_eq!(next_saturday(ymd(2023, 6, 29)), ymd(2023, 7, 1));
    }

    fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (1900i32..2200, 1u32..=12, 1u32..=31)
            .prop_map(|(y, m, d)| ymd(y, m, d.min(days_in_month(y, m))))
    }

    proptest! {
        #[test]
        fn add_months_round_trip_keeps_the_month(d in arb_date(), n in -240i32..240) {
            let back = add_months(add_months(d, n), -n);
            prop_assert!(same_month(back, d));
            let shifted = add_months(d, n);
            if d.day() <= days_in_month(shifted.year(), shifted.month()) {
                prop_assert_eq!(back, d);
            }
        }

        #[test]
        fn floor_mod_stays_in_range(today in 1i32..=12, selected in 1i32..=12) {
            let offset = floor_mod(today - selected, 3);
            prop_assert!((0..3).contains(&offset));
        }
    }
}

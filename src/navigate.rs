use crate::date::{
    add_days, add_months, first_day, first_week, first_weekday, grid_row, last_day, last_row,
    last_month, last_sunday, last_week, next_month, next_saturday, next_sunday, saturday_rows,
    weekday,
};
use chrono::{Datelike, NaiveDate};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Jump {
    LastSunday,
    NextSunday,
    NextSaturday,
    MonthUp,
    MonthDown,
}

pub fn column_step(d: NaiveDate, direction: Direction) -> NaiveDate {
    match direction {
        Direction::Left => add_days(d, -1),
        Direction::Right => add_days(d, 1),
        Direction::Up => add_days(d, -7),
        Direction::Down => add_days(d, 7),
    }
}

pub fn grid_step(d: NaiveDate, direction: Direction) -> NaiveDate {
    match direction {
        Direction::Left => grid_left(d),
        Direction::Right => grid_right(d),
        Direction::Up => grid_up(d),
        Direction::Down => grid_down(d),
    }
}

pub fn jump(d: NaiveDate, jump: Jump) -> NaiveDate {
    match jump {
        Jump::LastSunday => last_sunday(d),
        Jump::NextSunday => next_sunday(d),
        Jump::NextSaturday => next_saturday(d),
        Jump::MonthUp => last_month(d),
        Jump::MonthDown => next_month(d),
    }
}

fn grid_left(d: NaiveDate) -> NaiveDate {
    if weekday(d) != 0 && d.day() != 1 {
        return add_days(d, -1);
    }
    let row = grid_row(d);
    let prev = first_day(last_month(d));
    let end = last_day(prev);
    if row >= saturday_rows(prev) {
        return end;
    }
    let day = 1 + (6 - first_weekday(prev)) + row * 7;
    prev.with_day(day).unwrap_or(end)
}

fn grid_right(d: NaiveDate) -> NaiveDate {
    if weekday(d) != 6 && d != last_day(d) {
        return add_days(d, 1);
    }
    let row = grid_row(d);
    let next = first_day(next_month(d));
    if row == 0 {
        return next;
    }
    let row = row.min(last_row(next));
    let day = 1 + row * 7 - first_weekday(next);
    next.with_day(day).unwrap_or_else(|| last_day(next))
}

// Four months down is the panel directly below in the year grid.
fn grid_down(d: NaiveDate) -> NaiveDate {
    if !last_week(d) {
        return add_days(d, 7);
    }
    let target = first_day(add_months(first_day(d), 4));
    let mut offset = i64::from(weekday(d)) - i64::from(weekday(target));
    if offset < 0 {
        offset += 7;
    }
    add_days(target, offset)
}

fn grid_up(d: NaiveDate) -> NaiveDate {
    if !first_week(d) {
        return add_days(d, -7);
    }
    let target = last_day(add_months(first_day(d), -3));
    let mut offset = i64::from(weekday(d)) - i64::from(weekday(target));
    if offset > 0 {
        offset -= 7;
    }
    add_days(target, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::{days_in_month, same_month};
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn column_steps_ignore_month_edges() {
        let d = ymd(2023, 6, 30);
        assert_eq!(column_step(d, Direction::Right), ymd(2023, 7, 1));
        assert_eq!(column_step(d, Direction::Left), ymd(2023, 6, 29));
        assert_eq!(column_step(d, Direction::Down), ymd(2023, 7, 7));
        assert_eq!(column_step(ymd(2023, 6, 3), Direction::Up), ymd(2023, 5, 27));
    }

    #[test]
    fn grid_left_inside_a_row() {
        assert_eq!(grid_step(ymd(2023, 3, 8), Direction::Left), ymd(2023, 3, 7));
    }

    #[test]
    fn grid_left_from_sunday_lands_on_saturday_of_the_same_row() {
        // 2023-03-05 is a Sunday in row 1 of March.
        assert_eq!(grid_step(ymd(2023, 3, 5), Direction::Left), ymd(2023, 2, 11));
    }

    #[test]
    fn grid_left_from_the_first_goes_to_row_zero_saturday() {
        // March 2023 starts on a Wednesday; February's first Saturday is the 4th.
        assert_eq!(grid_step(ymd(2023, 3, 1), Direction::Left), ymd(2023, 2, 4));
    }

    #[test]
    fn grid_left_clamps_a_missing_row_to_the_last_day() {
        // 2023-07-30 sits in row 5; June 2023 has no Saturday in row 5.
        assert_eq!(grid_step(ymd(2023, 7, 30), Direction::Left), ymd(2023, 6, 30));
    }

    #[test]
    fn grid_right_from_saturday_lands_on_sunday_of_the_same_row() {
        assert_eq!(grid_step(ymd(2023, 2, 11), Direction::Right), ymd(2023, 3, 5));
    }

    #[test]
    fn grid_right_from_row_zero_lands_on_the_first() {
        assert_eq!(grid_step(ymd(2023, 2, 4), Direction::Right), ymd(2023, 3, 1));
    }

    #[test]
    fn grid_right_clamps_rows_beyond_the_next_month() {
        // 2023-07-31 is in row 5; August 2023 only reaches row 4.
        assert_eq!(grid_step(ymd(2023, 7, 31), Direction::Right), ymd(2023, 8, 27));
    }

    #[test]
    fn grid_right_never_overflows_past_a_month_ending_on_saturday() {
        // January 2015 row 4 maps onto February 2015, which ends on a Saturday.
        let landed = grid_step(ymd(2015, 1, 31), Direction::Right);
        assert!(same_month(landed, ymd(2015, 2, 1)));
        assert_eq!(landed, ymd(2015, 2, 22));
    }

    #[test]
    fn grid_down_inside_the_month_adds_a_week() {
        assert_eq!(grid_step(ymd(2023, 1, 10), Direction::Down), ymd(2023, 1, 17));
    }

    #[test]
    fn grid_down_from_the_last_row_jumps_four_months() {
        // Tuesday 2023-01-31 -> first Tuesday of May 2023.
        assert_eq!(grid_step(ymd(2023, 1, 31), Direction::Down), ymd(2023, 5, 2));
    }

    #[test]
    fn grid_up_inside_the_month_subtracts_a_week() {
        assert_eq!(grid_step(ymd(2023, 1, 17), Direction::Up), ymd(2023, 1, 10));
    }

    #[test]
    fn grid_up_from_the_first_cell_of_january_lands_in_october() {
        // 2023-01-01 is a Sunday in row 0.
        let landed = grid_step(ymd(2023, 1, 1), Direction::Up);
        assert_eq!(landed, ymd(2022, 10, 30));
        assert!(last_week(landed));
        assert_eq!(weekday(landed), 0);

        // 2024-01-01 is a Monday.
        let landed = grid_step(ymd(2024, 1, 1), Direction::Up);
        assert_eq!(landed, ymd(2023, 10, 30));
        assert!(last_week(landed));
    }

    #[test]
    fn grid_up_wraps_positive_deltas_back_a_week() {
        // Saturday 2022-01-01 against October 2021, which ends on a Sunday.
        assert_eq!(grid_step(ymd(2022, 1, 1), Direction::Up), ymd(2021, 10, 30));
    }

    #[test]
    fn jumps_apply_in_any_layout() {
        let d = ymd(2023, 3, 31);
        assert_eq!(jump(d, Jump::MonthUp), ymd(2023, 2, 28));
        assert_eq!(jump(d, Jump::MonthDown), ymd(2023, 4, 30));
        assert_eq!(jump(d, Jump::NextSaturday), ymd(2023, 4, 1));
        assert_eq!(jump(d, Jump::NextSunday), ymd(2023, 4, 2));
        assert_eq!(jump(d, Jump::LastSunday), ymd(2023, 3, 26));
    }

    #[test]
    fn walking_right_then_left_returns_home() {
        let start = ymd(2023, 2, 11);
        let mut d = start;
        for _ in 0..10 {
            d = grid_step(d, Direction::Right);
        }
        for _ in 0..10 {
            d = grid_step(d, Direction::Left);
        }
        assert_eq!(d, start);
    }

    fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (1950i32..2150, 1u32..=12, 1u32..=31)
            .prop_map(|(y, m, d)| ymd(y, m, d.min(days_in_month(y, m))))
    }

    proptest! {
        #[test]
        fn right_then_left_is_identity_unless_the_row_was_clamped(d in arb_date()) {
            let right = grid_step(d, Direction::Right);
            let clamped = !same_month(d, right) && grid_row(right) != grid_row(d);
            prop_assume!(!clamped);
            prop_assert_eq!(grid_step(right, Direction::Left), d);
        }

        #[test]
        fn left_and_right_move_at_most_one_month(d in arb_date()) {
            for direction in [Direction::Left, Direction::Right] {
                let landed = grid_step(d, direction);
                let months = (landed.year() - d.year()) * 12 + landed.month() as i32
                    - d.month() as i32;
                prop_assert!(months.abs() <= 1);
            }
        }
    }
}

//! Pure calendar projection over an in-memory task list.
//!
//! Nothing here touches the store: the projector consumes whatever task
//! snapshot the caller last fetched and a pair of reference dates. Day
//! cells are laid out Sunday-first, with leading blanks before the 1st.
//!
//! Selection policy lives here too: a day strictly before `today` is not
//! selectable, and [`select_day`] refuses to advance the selection to one.
//! Month navigation carries no such restriction.

use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

use crate::model::task::Task;

/// A month position in the calendar, navigable in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    year: i32,
    /// 1-based calendar month.
    month: u32,
}

impl MonthCursor {
    /// Build a cursor for the given year and 1-based month.
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if month >= 1 && month <= 12 {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The cursor for the month containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// One month back. Navigation is unconstrained, past months included.
    #[must_use]
    pub const fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// One month forward.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The first calendar day of this month.
    ///
    /// # Panics
    ///
    /// Panics if the year is outside the range representable by `chrono`.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("cursor holds a valid month")
    }

    /// Number of days in this month.
    #[must_use]
    pub fn days_in_month(self) -> u32 {
        match self.next().first_day().pred_opt() {
            Some(last) => last.day(),
            None => 0,
        }
    }

    /// Weekday index of the 1st (Sunday = 0); the number of leading blank
    /// cells in the grid.
    #[must_use]
    pub fn leading_blanks(self) -> usize {
        self.first_day().weekday().num_days_from_sunday() as usize
    }

    /// Human-facing heading, e.g. `June 2025`.
    #[must_use]
    pub fn label(self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

/// One grid slot: either a leading blank or a calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Blank,
    Day(DayCell),
}

/// Per-day annotations for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    /// 1-based day of month.
    pub day: u32,
    pub date: NaiveDate,
    /// Strictly before `today`; rendered disabled and not selectable.
    pub past: bool,
    pub today: bool,
    pub selected: bool,
    /// Count of pending tasks dated this day.
    pub due: usize,
}

/// A projected month: leading blanks followed by one cell per day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub cursor: MonthCursor,
    pub cells: Vec<Cell>,
}

impl MonthGrid {
    /// Iterate the day cells, skipping leading blanks.
    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().filter_map(|cell| match cell {
            Cell::Blank => None,
            Cell::Day(day) => Some(day),
        })
    }

    /// Look up the cell for a specific date, if it falls in this month.
    #[must_use]
    pub fn day(&self, date: NaiveDate) -> Option<&DayCell> {
        self.days().find(|cell| cell.date == date)
    }
}

/// Project a task snapshot onto the given month.
///
/// Only pending tasks count toward a day's due total; completed history is
/// visible through [`tasks_on`], not through the grid badge.
#[must_use]
pub fn project(
    tasks: &[Task],
    cursor: MonthCursor,
    selected: NaiveDate,
    today: NaiveDate,
) -> MonthGrid {
    let mut due_by_date: HashMap<NaiveDate, usize> = HashMap::new();
    for task in tasks {
        if !task.is_completed() {
            *due_by_date.entry(task.date).or_default() += 1;
        }
    }

    let blanks = cursor.leading_blanks();
    let days = cursor.days_in_month();
    let mut cells = Vec::with_capacity(blanks + days as usize);
    cells.resize(blanks, Cell::Blank);

    let first = cursor.first_day();
    for day in 1..=days {
        let date = first + chrono::Days::new(u64::from(day - 1));
        cells.push(Cell::Day(DayCell {
            day,
            date,
            past: date < today,
            today: date == today,
            selected: date == selected,
            due: due_by_date.get(&date).copied().unwrap_or(0),
        }));
    }

    MonthGrid { cursor, cells }
}

/// Advance the selection to `candidate`, unless it lies strictly before
/// `today`: past days are never selectable, and the current selection is
/// returned unchanged.
#[must_use]
pub fn select_day(current: NaiveDate, candidate: NaiveDate, today: NaiveDate) -> NaiveDate {
    if candidate < today { current } else { candidate }
}

/// All tasks dated `date`, in ascending time order.
#[must_use]
pub fn tasks_on<'a>(tasks: &'a [Task], date: NaiveDate) -> Vec<&'a Task> {
    let mut on_date: Vec<&Task> = tasks.iter().filter(|task| task.date == date).collect();
    on_date.sort_by_key(|task| task.time);
    on_date
}

#[cfg(test)]
mod tests {
    use super::{Cell, MonthCursor, project, select_day, tasks_on};
    use crate::model::id::{OwnerId, PetId, TaskId};
    use crate::model::task::{Task, TaskKind, TaskState};
    use chrono::{NaiveDate, NaiveTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
    }

    fn task(id: &str, on: NaiveDate, at: NaiveTime, state: TaskState) -> Task {
        Task {
            id: TaskId::new_unchecked(id),
            pet_id: PetId::new_unchecked("pet-000000000000"),
            owner_id: OwnerId::new("owner-1"),
            title: "care".to_string(),
            time: at,
            date: on,
            kind: TaskKind::Food,
            state,
        }
    }

    #[test]
    fn leading_blanks_match_weekday_of_the_first() {
        // 2025-06-01 is a Sunday, 2025-07-01 a Tuesday.
        let june = MonthCursor::new(2025, 6).expect("valid month");
        let july = MonthCursor::new(2025, 7).expect("valid month");
        assert_eq!(june.leading_blanks(), 0);
        assert_eq!(july.leading_blanks(), 2);

        let today = date(2025, 6, 15);
        let grid = project(&[], july, today, today);
        assert_eq!(grid.cells.len(), 2 + 31);
        assert_eq!(grid.cells[0], Cell::Blank);
        assert_eq!(grid.cells[1], Cell::Blank);
        assert!(matches!(grid.cells[2], Cell::Day(_)));
        assert_eq!(grid.days().count(), 31);
    }

    #[test]
    fn due_counts_only_pending_tasks() {
        let tasks = [
            task("tsk-a", date(2025, 6, 20), time(8, 0), TaskState::Pending),
            task("tsk-b", date(2025, 6, 20), time(9, 0), TaskState::Completed),
            task("tsk-c", date(2025, 6, 21), time(7, 0), TaskState::Pending),
        ];

        let today = date(2025, 6, 15);
        let grid = project(
            &tasks,
            MonthCursor::new(2025, 6).expect("valid month"),
            today,
            today,
        );

        assert_eq!(grid.day(date(2025, 6, 20)).map(|c| c.due), Some(1));
        assert_eq!(grid.day(date(2025, 6, 21)).map(|c| c.due), Some(1));
        assert_eq!(grid.day(date(2025, 6, 22)).map(|c| c.due), Some(0));
    }

    #[test]
    fn day_flags_reflect_reference_dates() {
        let today = date(2025, 6, 15);
        let selected = date(2025, 6, 20);
        let grid = project(
            &[],
            MonthCursor::new(2025, 6).expect("valid month"),
            selected,
            today,
        );

        let yesterday = grid.day(date(2025, 6, 14)).expect("cell");
        assert!(yesterday.past && !yesterday.today && !yesterday.selected);

        let today_cell = grid.day(today).expect("cell");
        assert!(today_cell.today && !today_cell.past);

        let selected_cell = grid.day(selected).expect("cell");
        assert!(selected_cell.selected && !selected_cell.past);
    }

    #[test]
    fn past_selection_is_refused() {
        let today = date(2025, 6, 15);
        let current = date(2025, 6, 18);

        assert_eq!(select_day(current, date(2025, 6, 10), today), current);
        assert_eq!(select_day(current, today, today), today);
        assert_eq!(
            select_day(current, date(2025, 6, 25), today),
            date(2025, 6, 25)
        );
    }

    #[test]
    fn month_navigation_is_unconstrained_across_year_bounds() {
        let jan = MonthCursor::new(2025, 1).expect("valid month");
        assert_eq!(jan.prev(), MonthCursor::new(2024, 12).expect("valid month"));
        assert_eq!(jan.prev().next(), jan);

        let dec = MonthCursor::new(2025, 12).expect("valid month");
        assert_eq!(dec.next(), MonthCursor::new(2026, 1).expect("valid month"));
    }

    #[test]
    fn cursor_rejects_out_of_range_months() {
        assert!(MonthCursor::new(2025, 0).is_none());
        assert!(MonthCursor::new(2025, 13).is_none());
    }

    #[test]
    fn month_label_and_lengths() {
        let cursor = MonthCursor::new(2025, 6).expect("valid month");
        assert_eq!(cursor.label(), "June 2025");
        assert_eq!(cursor.days_in_month(), 30);
        assert_eq!(
            MonthCursor::new(2024, 2).expect("valid month").days_in_month(),
            29
        );
    }

    #[test]
    fn date_lookup_sorts_by_time() {
        let on = date(2025, 6, 20);
        let tasks = [
            task("tsk-late", on, time(18, 30), TaskState::Pending),
            task("tsk-early", on, time(7, 15), TaskState::Completed),
            task("tsk-other-day", date(2025, 6, 21), time(6, 0), TaskState::Pending),
            task("tsk-noon", on, time(12, 0), TaskState::Pending),
        ];

        let ids: Vec<&str> = tasks_on(&tasks, on)
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, ["tsk-early", "tsk-noon", "tsk-late"]);
    }
}

//! Upcoming birthday calculation

use super::{AddressBook, BIRTHDAY_FORMAT};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Default look-ahead window in days
pub const DEFAULT_UPCOMING_DAYS: u32 = 7;

/// A contact whose birthday falls inside the look-ahead window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingBirthday {
    pub name: String,
    pub congratulation_date: NaiveDate,
}

impl UpcomingBirthday {
    pub fn congratulation_date_display(&self) -> String {
        self.congratulation_date.format(BIRTHDAY_FORMAT).to_string()
    }
}

/// The anniversary of `birthday` in `year`. 29 Feb falls back to 28 Feb
/// in non-leap years.
fn anniversary_in(birthday: NaiveDate, year: i32) -> Option<NaiveDate> {
    birthday
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day() - 1))
}

/// Move weekend dates to the following Monday
fn shift_off_weekend(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date + Duration::days(2),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

impl AddressBook {
    /// Birthdays within `days` days of `today` (inclusive), in book order
    pub fn upcoming_birthdays(&self, today: NaiveDate, days: u32) -> Vec<UpcomingBirthday> {
        let mut upcoming = Vec::new();

        for record in self.records() {
            let Some(birthday) = record.birthday else {
                continue;
            };
            let Some(mut next) = anniversary_in(birthday.date(), today.year()) else {
                continue;
            };
            if next < today {
                let Some(following) = anniversary_in(birthday.date(), today.year() + 1) else {
                    continue;
                };
                next = following;
            }

            let until = (next - today).num_days();
            if (0..=i64::from(days)).contains(&until) {
                upcoming.push(UpcomingBirthday {
                    name: record.name.as_str().to_string(),
                    congratulation_date: shift_off_weekend(next),
                });
            }
        }

        upcoming
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::Record;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn book_with(entries: &[(&str, &str)]) -> AddressBook {
        let mut book = AddressBook::new();
        for (name, birthday) in entries {
            let mut record = Record::new(name).unwrap();
            record.add_birthday(birthday).unwrap();
            book.add_record(record);
        }
        book
    }

    #[test]
    fn includes_birthday_today_and_window_edge() {
        // 2024-06-03 is a Monday
        let book = book_with(&[("Today", "03.06.1990"), ("Edge", "07.06.1985")]);
        let upcoming = book.upcoming_birthdays(date(2024, 6, 3), 4);
        let names: Vec<_> = upcoming.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Today", "Edge"]);
        assert_eq!(upcoming[0].congratulation_date, date(2024, 6, 3));
    }

    #[test]
    fn excludes_outside_window() {
        let book = book_with(&[("Later", "20.06.1990"), ("Past", "01.06.1990")]);
        assert!(book.upcoming_birthdays(date(2024, 6, 3), 7).is_empty());
    }

    #[test]
    fn weekend_birthdays_move_to_monday() {
        // 2024-06-08 is a Saturday, 2024-06-09 a Sunday
        let book = book_with(&[("Sat", "08.06.2000"), ("Sun", "09.06.2001")]);
        let upcoming = book.upcoming_birthdays(date(2024, 6, 3), 7);
        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0].congratulation_date, date(2024, 6, 10));
        assert_eq!(upcoming[1].congratulation_date, date(2024, 6, 10));
        assert_eq!(upcoming[0].congratulation_date_display(), "10.06.2024");
    }

    #[test]
    fn rolls_over_into_next_year() {
        // 2025-01-02 is a Thursday
        let book = book_with(&[("NewYear", "02.01.1970")]);
        let upcoming = book.upcoming_birthdays(date(2024, 12, 28), 7);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].congratulation_date, date(2025, 1, 2));
    }

    #[test]
    fn leap_day_birthday_in_common_year() {
        // 2023-02-28 is a Tuesday
        let book = book_with(&[("Leap", "29.02.2000")]);
        let upcoming = book.upcoming_birthdays(date(2023, 2, 25), 7);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].congratulation_date, date(2023, 2, 28));
    }

    #[test]
    fn records_without_birthday_are_skipped() {
        let mut book = AddressBook::new();
        book.add_record(Record::new("NoBirthday").unwrap());
        assert!(book.upcoming_birthdays(date(2024, 6, 3), 7).is_empty());
    }
}

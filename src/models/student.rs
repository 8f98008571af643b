//! Student roster rows and the per-degree column families

use crate::error::Result;
use crate::models::record::Record;
use crate::utils::dates::parse_date;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;

/// Degree (or postdoc) a roster row can carry dates for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Degree {
    Pdf,
    Phd,
    Ms,
    Meng,
    Ug,
}

impl Degree {
    /// Current-student precedence: a row is filed under the first degree in progress
    pub const PRECEDENCE: [Degree; 5] = [Degree::Pdf, Degree::Phd, Degree::Ms, Degree::Meng, Degree::Ug];

    /// Column prefix in the roster
    pub fn prefix(self) -> &'static str {
        match self {
            Degree::Pdf => "PDF",
            Degree::Phd => "PhD",
            Degree::Ms => "MS",
            Degree::Meng => "MEng",
            Degree::Ug => "UG",
        }
    }

    /// Expected length in years, used for anticipated completion
    pub fn length_years(self) -> i32 {
        match self {
            Degree::Phd => 4,
            Degree::Ms | Degree::Meng | Degree::Pdf => 2,
            Degree::Ug => 1,
        }
    }

    pub fn keys(self) -> DegreeKeys {
        let p = self.prefix();
        DegreeKeys {
            start: format!("{p} Start Date"),
            end: format!("{p} End Date"),
            thesis: format!("{p} Thesis"),
            thesis_url: format!("{p} Thesis URL"),
            co_supervisor: format!("{p} Co-Supervisor"),
            last_position: format!("{p} Last Position"),
            program: format!("{p} Program"),
        }
    }
}

/// Column names for one degree
#[derive(Debug, Clone)]
pub struct DegreeKeys {
    pub start: String,
    pub end: String,
    pub thesis: String,
    pub thesis_url: String,
    pub co_supervisor: String,
    pub last_position: String,
    pub program: String,
}

pub const FIRST_NAME: &str = "First Name";
pub const LAST_NAME: &str = "Last Name";
pub const HOME_PAGE: &str = "Home Page";
pub const INSTITUTION: &str = "Institution";
pub const EXTERNAL_EXAMINER: &str = "PhD External Examiner";

/// Student supervision state for one degree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Current,
    Completed,
}

/// A row is current for `degree` when it has a start and no end
pub fn is_current(student: &Record, degree: Degree) -> bool {
    let keys = degree.keys();
    student.present(&keys.start) && !student.present(&keys.end)
}

/// Degree the student is currently pursuing, by precedence
pub fn current_degree(student: &Record) -> Option<Degree> {
    Degree::PRECEDENCE
        .into_iter()
        .find(|&degree| is_current(student, degree))
}

pub fn start_date(student: &Record, degree: Degree) -> Result<NaiveDate> {
    parse_date(student.get(&degree.keys().start))
}

pub fn end_date(student: &Record, degree: Degree) -> Result<Option<NaiveDate>> {
    let keys = degree.keys();
    if student.present(&keys.end) {
        parse_date(student.get(&keys.end)).map(Some)
    } else {
        Ok(None)
    }
}

/// Table order: in-progress first, newest first, then last name
///
/// Both rows must have a start date for `degree`.
pub fn table_order(a: &Record, b: &Record, degree: Degree) -> Result<Ordering> {
    let a_end = end_date(a, degree)?;
    let b_end = end_date(b, degree)?;
    let by_date = match (a_end, b_end) {
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => start_date(b, degree)?.cmp(&start_date(a, degree)?),
        (Some(a_end), Some(b_end)) => b_end.cmp(&a_end),
    };
    Ok(by_date.then_with(|| by_last_name(a, b)))
}

pub fn by_last_name(a: &Record, b: &Record) -> Ordering {
    a.get(LAST_NAME).cmp(b.get(LAST_NAME))
}

/// Sorts with a fallible comparator, returning the first comparison error
pub fn sort_students<F>(students: &mut [Record], mut cmp: F) -> Result<()>
where
    F: FnMut(&Record, &Record) -> Result<Ordering>,
{
    let mut failure = None;
    students.sort_by(|a, b| match cmp(a, b) {
        Ok(order) => order,
        Err(e) => {
            failure.get_or_insert(e);
            Ordering::Equal
        }
    });
    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(last: &str, start: &str, end: &str) -> Record {
        Record::from_pairs([
            (LAST_NAME, last),
            ("PhD Start Date", start),
            ("PhD End Date", end),
        ])
    }

    #[test]
    fn key_names() {
        let keys = Degree::Meng.keys();
        assert_eq!(keys.start, "MEng Start Date");
        assert_eq!(keys.thesis_url, "MEng Thesis URL");
        assert_eq!(Degree::Phd.keys().co_supervisor, "PhD Co-Supervisor");
    }

    #[test]
    fn current_degree_follows_precedence() {
        let row = Record::from_pairs([
            ("PhD Start Date", "2018-09-01"),
            ("MS Start Date", "2016-09-01"),
        ]);
        assert_eq!(current_degree(&row), Some(Degree::Phd));

        let done = Record::from_pairs([("MS Start Date", "2016-09-01"), ("MS End Date", "2018-08-31")]);
        assert_eq!(current_degree(&done), None);
    }

    #[test]
    fn table_ordering() {
        let mut rows = vec![
            student("Adams", "2015-09-01", "2020-05-01"),
            student("Baker", "2019-09-01", ""),
            student("Chen", "2016-09-01", "2021-05-01"),
            student("Diaz", "2021-09-01", ""),
            student("Evans", "2019-09-01", ""),
        ];
        sort_students(&mut rows, |a, b| table_order(a, b, Degree::Phd)).unwrap();
        let order: Vec<&str> = rows.iter().map(|r| r.get(LAST_NAME)).collect();
        assert_eq!(order, vec!["Diaz", "Baker", "Evans", "Chen", "Adams"]);
    }

    #[test]
    fn bad_dates_surface_from_sort() {
        let mut rows = vec![student("A", "garbage", ""), student("B", "2019-01-01", "")];
        assert!(sort_students(&mut rows, |a, b| table_order(a, b, Degree::Phd)).is_err());
    }
}

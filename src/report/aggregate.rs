use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use time::Date;

use crate::core::db::{Applicant, Barangay, Gender, Status};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenderCounts {
    pub total: usize,
    pub male: usize,
    pub female: usize,
}

impl GenderCounts {
    fn record(&mut self, gender: Gender) {
        self.total += 1;
        match gender {
            Gender::Male => self.male += 1,
            Gender::Female => self.female += 1,
        }
    }
}

/// Program-wide totals with a gender split overall and per status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub overall: GenderCounts,
    by_status: BTreeMap<Status, GenderCounts>,
    pub barangays_covered: usize,
}

impl Summary {
    pub fn status(&self, status: Status) -> GenderCounts {
        self.by_status.get(&status).copied().unwrap_or_default()
    }
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            overall: GenderCounts::default(),
            by_status: Status::ALL
                .iter()
                .map(|s| (*s, GenderCounts::default()))
                .collect(),
            barangays_covered: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarangayRow {
    pub barangay: Barangay,
    pub total: usize,
    pub male: usize,
    pub female: usize,
    pub pending: usize,
    pub approved: usize,
    pub deployed: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRow {
    pub status: Status,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenderRow {
    pub gender: Gender,
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub deployed: usize,
    pub completed: usize,
    pub rejected: usize,
    pub resigned: usize,
}

pub fn summarize(applicants: &[Applicant]) -> Summary {
    let mut summary = Summary::default();
    let mut barangays = BTreeSet::new();
    for applicant in applicants {
        summary.overall.record(applicant.gender);
        summary
            .by_status
            .entry(applicant.status)
            .or_default()
            .record(applicant.gender);
        barangays.insert(applicant.barangay);
    }
    summary.barangays_covered = barangays.len();
    summary
}

/// One row per barangay that has applicants, in the office's barangay order.
pub fn by_barangay(applicants: &[Applicant]) -> Vec<BarangayRow> {
    let mut rows: BTreeMap<Barangay, BarangayRow> = BTreeMap::new();
    for applicant in applicants {
        let row = rows
            .entry(applicant.barangay)
            .or_insert_with(|| BarangayRow {
                barangay: applicant.barangay,
                total: 0,
                male: 0,
                female: 0,
                pending: 0,
                approved: 0,
                deployed: 0,
                completed: 0,
            });
        row.total += 1;
        match applicant.gender {
            Gender::Male => row.male += 1,
            Gender::Female => row.female += 1,
        }
        match applicant.status {
            Status::Pending => row.pending += 1,
            Status::Approved => row.approved += 1,
            Status::Deployed => row.deployed += 1,
            Status::Completed => row.completed += 1,
            // Only counted in the row total.
            Status::Rejected | Status::Resigned => {}
        }
    }
    rows.into_values().collect()
}

/// One row per status present, in lifecycle order.
pub fn by_status(applicants: &[Applicant]) -> Vec<StatusRow> {
    let mut totals: BTreeMap<Status, usize> = BTreeMap::new();
    for applicant in applicants {
        *totals.entry(applicant.status).or_default() += 1;
    }
    totals
        .into_iter()
        .map(|(status, total)| StatusRow { status, total })
        .collect()
}

/// One row per gender present, MALE before FEMALE.
pub fn by_gender(applicants: &[Applicant]) -> Vec<GenderRow> {
    let mut rows: BTreeMap<Gender, GenderRow> = BTreeMap::new();
    for applicant in applicants {
        let row = rows.entry(applicant.gender).or_insert_with(|| GenderRow {
            gender: applicant.gender,
            total: 0,
            pending: 0,
            approved: 0,
            deployed: 0,
            completed: 0,
            rejected: 0,
            resigned: 0,
        });
        row.total += 1;
        let slot = match applicant.status {
            Status::Pending => &mut row.pending,
            Status::Approved => &mut row.approved,
            Status::Deployed => &mut row.deployed,
            Status::Completed => &mut row.completed,
            Status::Rejected => &mut row.rejected,
            Status::Resigned => &mut row.resigned,
        };
        *slot += 1;
    }
    rows.into_values().collect()
}

/// Distinct submission years, newest first.
pub fn available_years<I>(submitted: I) -> Vec<i32>
where
    I: IntoIterator<Item = Date>,
{
    let years: BTreeSet<i32> = submitted.into_iter().map(|d| d.year()).collect();
    years.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::applicant;

    #[test]
    fn barangay_row_counts_gender_and_status() {
        let applicants = vec![
            applicant(Barangay::Aplaya, Gender::Male, Status::Pending),
            applicant(Barangay::Aplaya, Gender::Male, Status::Approved),
            applicant(Barangay::Aplaya, Gender::Female, Status::Approved),
        ];
        let rows = by_barangay(&applicants);
        assert_eq!(
            rows,
            vec![BarangayRow {
                barangay: Barangay::Aplaya,
                total: 3,
                male: 2,
                female: 1,
                pending: 1,
                approved: 2,
                deployed: 0,
                completed: 0,
            }]
        );
    }

    #[test]
    fn barangay_rows_follow_list_order_and_omit_empty_areas() {
        let applicants = vec![
            applicant(Barangay::Tagapo, Gender::Female, Status::Pending),
            applicant(Barangay::Balibago, Gender::Male, Status::Deployed),
            applicant(Barangay::Tagapo, Gender::Male, Status::Rejected),
        ];
        let rows = by_barangay(&applicants);
        let names: Vec<_> = rows.iter().map(|r| r.barangay).collect();
        assert_eq!(names, vec![Barangay::Balibago, Barangay::Tagapo]);
        // Rejected counts toward the total but has no status column.
        assert_eq!(rows[1].total, 2);
        assert_eq!(rows[1].pending, 1);
        assert_eq!(by_barangay(&applicants), rows);
    }

    #[test]
    fn summary_splits_by_status_and_gender() {
        let applicants = vec![
            applicant(Barangay::Dila, Gender::Male, Status::Approved),
            applicant(Barangay::Dila, Gender::Female, Status::Approved),
            applicant(Barangay::Pooc, Gender::Female, Status::Deployed),
            applicant(Barangay::Pooc, Gender::Male, Status::Pending),
        ];
        let summary = summarize(&applicants);
        assert_eq!(
            summary.overall,
            GenderCounts {
                total: 4,
                male: 2,
                female: 2
            }
        );
        assert_eq!(
            summary.status(Status::Approved),
            GenderCounts {
                total: 2,
                male: 1,
                female: 1
            }
        );
        assert_eq!(summary.status(Status::Deployed).female, 1);
        assert_eq!(summary.status(Status::Completed), GenderCounts::default());
        assert_eq!(summary.barangays_covered, 2);
    }

    #[test]
    fn status_and_gender_rows_only_list_present_values() {
        let applicants = vec![
            applicant(Barangay::Dita, Gender::Female, Status::Resigned),
            applicant(Barangay::Dita, Gender::Female, Status::Pending),
            applicant(Barangay::Dita, Gender::Female, Status::Pending),
        ];
        assert_eq!(
            by_status(&applicants),
            vec![
                StatusRow {
                    status: Status::Pending,
                    total: 2
                },
                StatusRow {
                    status: Status::Resigned,
                    total: 1
                },
            ]
        );
        let genders = by_gender(&applicants);
        assert_eq!(genders.len(), 1);
        assert_eq!(genders[0].gender, Gender::Female);
        assert_eq!(genders[0].pending, 2);
        assert_eq!(genders[0].resigned, 1);
    }

    #[test]
    fn empty_input_yields_empty_reports() {
        assert!(by_barangay(&[]).is_empty());
        assert!(by_status(&[]).is_empty());
        assert!(by_gender(&[]).is_empty());
        assert_eq!(summarize(&[]), Summary::default());
    }

    #[test]
    fn years_are_distinct_and_newest_first() {
        let dates = [
            Date::from_calendar_date(2024, time::Month::March, 1).unwrap(),
            Date::from_calendar_date(2025, time::Month::June, 9).unwrap(),
            Date::from_calendar_date(2024, time::Month::December, 31).unwrap(),
        ];
        assert_eq!(available_years(dates), vec![2025, 2024]);
    }
}

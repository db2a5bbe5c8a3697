use serde::Serialize;

use crate::core::db::{Applicant, Barangay, Gender, Status};
use crate::report::aggregate::{BarangayRow, GenderRow, StatusRow, Summary};

/// Summary in the shape the dashboard and summary report read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub total_applicants: usize,
    pub male_count: usize,
    pub female_count: usize,
    pub pending: usize,
    pub pending_male: usize,
    pub pending_female: usize,
    pub approved: usize,
    pub approved_male: usize,
    pub approved_female: usize,
    pub deployed: usize,
    pub deployed_male: usize,
    pub deployed_female: usize,
    pub completed: usize,
    pub completed_male: usize,
    pub completed_female: usize,
    pub rejected: usize,
    pub rejected_male: usize,
    pub rejected_female: usize,
    pub resigned: usize,
    pub resigned_male: usize,
    pub resigned_female: usize,
    pub barangays_covered: usize,
}

impl From<&Summary> for SummaryView {
    fn from(summary: &Summary) -> Self {
        let pending = summary.status(Status::Pending);
        let approved = summary.status(Status::Approved);
        let deployed = summary.status(Status::Deployed);
        let completed = summary.status(Status::Completed);
        let rejected = summary.status(Status::Rejected);
        let resigned = summary.status(Status::Resigned);
        Self {
            total_applicants: summary.overall.total,
            male_count: summary.overall.male,
            female_count: summary.overall.female,
            pending: pending.total,
            pending_male: pending.male,
            pending_female: pending.female,
            approved: approved.total,
            approved_male: approved.male,
            approved_female: approved.female,
            deployed: deployed.total,
            deployed_male: deployed.male,
            deployed_female: deployed.female,
            completed: completed.total,
            completed_male: completed.male,
            completed_female: completed.female,
            rejected: rejected.total,
            rejected_male: rejected.male,
            rejected_female: rejected.female,
            resigned: resigned.total,
            resigned_male: resigned.male,
            resigned_female: resigned.female,
            barangays_covered: summary.barangays_covered,
        }
    }
}

/// One labelled line of the summary report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub label: &'static str,
    pub value: usize,
    pub male: usize,
    pub female: usize,
}

impl SummaryView {
    /// Lines shown on the summary report and in its exports.
    pub fn report_lines(&self) -> [SummaryLine; 4] {
        [
            SummaryLine {
                label: "Total Applicants",
                value: self.total_applicants,
                male: self.male_count,
                female: self.female_count,
            },
            SummaryLine {
                label: "Approved",
                value: self.approved,
                male: self.approved_male,
                female: self.approved_female,
            },
            SummaryLine {
                label: "Deployed",
                value: self.deployed,
                male: self.deployed_male,
                female: self.deployed_female,
            },
            SummaryLine {
                label: "Completed",
                value: self.completed,
                male: self.completed_male,
                female: self.completed_female,
            },
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportKind {
    Summary,
    Barangay,
    Status,
    Gender,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Report {
    Summary(SummaryView),
    Barangay(Vec<BarangayRow>),
    Status(Vec<StatusRow>),
    Gender(Vec<GenderRow>),
}

impl Report {
    pub fn kind(&self) -> ReportKind {
        match self {
            Report::Summary(_) => ReportKind::Summary,
            Report::Barangay(_) => ReportKind::Barangay,
            Report::Status(_) => ReportKind::Status,
            Report::Gender(_) => ReportKind::Gender,
        }
    }

    /// Number of table rows, for paginated report views. The summary is a
    /// single card grid and never paginates.
    pub fn row_count(&self) -> usize {
        match self {
            Report::Summary(_) => 1,
            Report::Barangay(rows) => rows.len(),
            Report::Status(rows) => rows.len(),
            Report::Gender(rows) => rows.len(),
        }
    }
}

/// The row a user picked to drill into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillDown {
    All,
    Barangay(Barangay),
    Status(Status),
    Gender(Gender),
}

/// Applicants behind a report row.
pub fn drill_down(applicants: &[Applicant], row: DrillDown) -> Vec<&Applicant> {
    applicants
        .iter()
        .filter(|a| match row {
            DrillDown::All => true,
            DrillDown::Barangay(b) => a.barangay == b,
            DrillDown::Status(s) => a.status == s,
            DrillDown::Gender(g) => a.gender == g,
        })
        .collect()
}

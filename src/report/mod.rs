//! Aggregate statistics over a program's applicants and the report shapes
//! built from them.
//!
//! [`aggregate`] groups applicants by barangay, status, gender and year;
//! [`assemble`] maps those aggregates onto the records each report view
//! reads. Neither does any I/O; [`ReportData::load`] pulls everything a
//! report screen needs through a [`StatisticsRepository`].

mod aggregate;
mod assemble;

pub use aggregate::{
    BarangayRow, GenderCounts, GenderRow, StatusRow, Summary, available_years, by_barangay,
    by_gender, by_status, summarize,
};
pub use assemble::{DrillDown, Report, ReportKind, SummaryLine, SummaryView, drill_down};

use crate::core::db::{Program, StatisticsRepository};

/// Everything a report screen shows for one program and year selection.
#[derive(Debug, Clone)]
pub struct ReportData {
    pub program: Program,
    pub year: Option<i32>,
    /// Always the full set of years, independent of `year`.
    pub available_years: Vec<i32>,
    pub summary: SummaryView,
    pub barangays: Vec<BarangayRow>,
    pub statuses: Vec<StatusRow>,
    pub genders: Vec<GenderRow>,
}

impl ReportData {
    pub async fn load<R: StatisticsRepository>(
        repo: &R,
        program: Program,
        year: Option<i32>,
    ) -> anyhow::Result<Self> {
        let available_years = repo.get_available_years(program).await?;
        let summary = repo.get_statistics_by_year(program, year).await?;
        let barangays = repo.get_barangay_statistics_by_year(program, year).await?;
        let statuses = repo.get_status_statistics_by_year(program, year).await?;
        let genders = repo.get_gender_statistics_by_year(program, year).await?;
        tracing::debug!(
            program = %program,
            year = ?year,
            total = summary.overall.total,
            "report data loaded"
        );
        Ok(Self {
            program,
            year,
            available_years,
            summary: SummaryView::from(&summary),
            barangays,
            statuses,
            genders,
        })
    }

    pub fn report(&self, kind: ReportKind) -> Report {
        match kind {
            ReportKind::Summary => Report::Summary(self.summary.clone()),
            ReportKind::Barangay => Report::Barangay(self.barangays.clone()),
            ReportKind::Status => Report::Status(self.statuses.clone()),
            ReportKind::Gender => Report::Gender(self.genders.clone()),
        }
    }
}

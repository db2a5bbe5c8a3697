use std::future::Future;

use crate::core::db::model::Program;
use crate::report::{BarangayRow, GenderRow, StatusRow, Summary};

/// Report queries over one program's applicants. A `year` of `None` covers
/// every submission year.
pub trait StatisticsRepository {
    /// Distinct submission years for the program, newest first. Never
    /// narrowed by a selected year filter.
    fn get_available_years(&self, program: Program)
        -> impl Future<Output = anyhow::Result<Vec<i32>>>;
    fn get_statistics_by_year(
        &self,
        program: Program,
        year: Option<i32>,
    ) -> impl Future<Output = anyhow::Result<Summary>>;
    fn get_barangay_statistics_by_year(
        &self,
        program: Program,
        year: Option<i32>,
    ) -> impl Future<Output = anyhow::Result<Vec<BarangayRow>>>;
    fn get_status_statistics_by_year(
        &self,
        program: Program,
        year: Option<i32>,
    ) -> impl Future<Output = anyhow::Result<Vec<StatusRow>>>;
    fn get_gender_statistics_by_year(
        &self,
        program: Program,
        year: Option<i32>,
    ) -> impl Future<Output = anyhow::Result<Vec<GenderRow>>>;
}

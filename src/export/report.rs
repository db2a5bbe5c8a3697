use crate::auth::{AuthContext, SessionStore};
use crate::core::db::Program;
use crate::error::RegistryError;
use crate::export::rows_to_csv;
use crate::report::{Report, SummaryView};

pub fn summary_rows(summary: &SummaryView) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Category".to_string(),
        "Total".to_string(),
        "Male".to_string(),
        "Female".to_string(),
    ]];
    rows.extend(summary.report_lines().into_iter().map(|line| {
        vec![
            line.label.to_string(),
            line.value.to_string(),
            line.male.to_string(),
            line.female.to_string(),
        ]
    }));
    rows
}

/// Header and data rows for any report table.
pub fn report_rows(report: &Report) -> Vec<Vec<String>> {
    fn row<const N: usize>(cells: [&dyn ToString; N]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    match report {
        Report::Summary(summary) => summary_rows(summary),
        Report::Barangay(rows) => std::iter::once(row([
            &"Barangay",
            &"Total",
            &"Male",
            &"Female",
            &"Pending",
            &"Approved",
            &"Deployed",
            &"Completed",
        ]))
        .chain(rows.iter().map(|r| {
            row([
                &r.barangay,
                &r.total,
                &r.male,
                &r.female,
                &r.pending,
                &r.approved,
                &r.deployed,
                &r.completed,
            ])
        }))
        .collect(),
        Report::Status(rows) => std::iter::once(row([&"Status", &"Total"]))
            .chain(rows.iter().map(|r| row([&r.status, &r.total])))
            .collect(),
        Report::Gender(rows) => std::iter::once(row([
            &"Gender",
            &"Total",
            &"Pending",
            &"Approved",
            &"Deployed",
            &"Completed",
            &"Rejected",
            &"Resigned",
        ]))
        .chain(rows.iter().map(|r| {
            row([
                &r.gender.label(),
                &r.total,
                &r.pending,
                &r.approved,
                &r.deployed,
                &r.completed,
                &r.rejected,
                &r.resigned,
            ])
        }))
        .collect(),
    }
}

pub fn summary_csv_file_name(program: Program, year: Option<i32>) -> String {
    match year {
        Some(year) => format!("{}_Summary_Report_{}.csv", program, year),
        None => format!("{}_Summary_Report.csv", program),
    }
}

/// Plain-text rendering of the summary report for printing.
pub fn printable_summary(summary: &SummaryView, program: Program, year: Option<i32>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} SUMMARY REPORT\n", program));
    out.push_str(program.full_name());
    out.push('\n');
    match year {
        Some(year) => out.push_str(&format!("Year: {}\n", year)),
        None => out.push_str("Year: All Years\n"),
    }
    out.push('\n');
    out.push_str(&format!(
        "{:<20}{:>8}{:>8}{:>8}\n",
        "Category", "Total", "Male", "Female"
    ));
    for line in summary.report_lines() {
        out.push_str(&format!(
            "{:<20}{:>8}{:>8}{:>8}\n",
            line.label, line.value, line.male, line.female
        ));
    }
    out.push_str(&format!("\nBarangays covered: {}\n", summary.barangays_covered));
    out
}

/// CSV for a report. Admins only.
pub fn export_report_csv<S: SessionStore>(
    auth: &AuthContext<S>,
    report: &Report,
) -> Result<String, RegistryError> {
    auth.require_admin("export reports")?;
    Ok(rows_to_csv(&report_rows(report)))
}

/// Printable summary. Any signed-in user may print.
pub fn print_summary<S: SessionStore>(
    auth: &AuthContext<S>,
    summary: &SummaryView,
    program: Program,
    year: Option<i32>,
) -> Result<String, RegistryError> {
    auth.require_signed_in()?;
    Ok(printable_summary(summary, program, year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::db::Status;
    use crate::report::StatusRow;

    fn sample_summary() -> SummaryView {
        SummaryView {
            total_applicants: 5,
            male_count: 2,
            female_count: 3,
            approved: 2,
            approved_male: 1,
            approved_female: 1,
            barangays_covered: 3,
            ..SummaryView::default()
        }
    }

    #[test]
    fn summary_csv_lists_each_group() {
        let csv = rows_to_csv(&summary_rows(&sample_summary()));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Category,Total,Male,Female");
        assert_eq!(lines[1], "Total Applicants,5,2,3");
        assert_eq!(lines[2], "Approved,2,1,1");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn status_report_rows() {
        let report = Report::Status(vec![StatusRow {
            status: Status::Deployed,
            total: 4,
        }]);
        assert_eq!(
            report_rows(&report),
            vec![vec!["Status", "Total"], vec!["DEPLOYED", "4"]]
        );
    }

    #[test]
    fn printable_summary_is_titled_by_program() {
        let text = printable_summary(&sample_summary(), Program::Tupad, Some(2025));
        assert!(text.starts_with("TUPAD SUMMARY REPORT\n"));
        assert!(text.contains("Year: 2025"));
        assert!(text.contains("Total Applicants"));
        assert_eq!(
            summary_csv_file_name(Program::Gip, None),
            "GIP_Summary_Report.csv"
        );
    }
}

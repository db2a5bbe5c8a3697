use crate::core::db::Applicant;
use crate::export::rows_to_csv;
use crate::normalize::format_date;

pub const SHEET_NAME: &str = "Application Form";
pub const COLUMN_WIDTHS: [u16; 4] = [30, 20, 20, 20];

/// One worksheet: a name, widths for the leading columns and ragged rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: &'static str,
    pub column_widths: [u16; 4],
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn to_csv(&self) -> String {
        rows_to_csv(&self.rows)
    }
}

/// `{code}_{lastName}_{firstName}_Application.xlsx`
pub fn file_name(applicant: &Applicant) -> String {
    format!(
        "{}_{}_{}_Application.xlsx",
        applicant.code, applicant.last_name, applicant.first_name
    )
}

fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "-",
    }
}

macro_rules! rows {
    ($([$($cell:expr),* $(,)?]),* $(,)?) => {
        vec![$(vec![$(String::from($cell)),*]),*]
    };
}

/// The printed application form for one applicant.
pub fn application_form(applicant: &Applicant) -> Sheet {
    let birth_date = format_date(applicant.birth_date);
    let date_submitted = format_date(applicant.date_submitted);
    let rows = rows![
        ["DOLE REGIONAL OFFICE ____"],
        [applicant.program().full_name()],
        ["APPLICATION FORM"],
        [""],
        ["INSTRUCTION TO APPLICANTS:"],
        ["Please fill out all the required information in this form and attach additional documents, if necessary."],
        [""],
        ["1. NAME OF APPLICANT:"],
        ["Family Name", "First Name", "Middle Name"],
        [
            applicant.last_name.as_str(),
            applicant.first_name.as_str(),
            applicant.middle_name.as_deref().unwrap_or_default(),
        ],
        [""],
        ["2. RESIDENTIAL ADDRESS:"],
        [applicant.barangay.as_str()],
        [""],
        ["Telephone No.:", or_dash(applicant.telephone_number.as_deref())],
        ["Mobile No.:", applicant.contact_number.as_str()],
        ["E-mail Address:", applicant.email.as_deref().unwrap_or_default()],
        [""],
        ["3. PLACE OF BIRTH (city/province)", or_dash(applicant.place_of_birth.as_deref())],
        [""],
        ["4. DATE OF BIRTH (mm/dd/yyyy)", birth_date],
        [""],
        ["5. GENDER", applicant.gender.label()],
        [""],
        ["6. CIVIL STATUS", or_dash(Some(applicant.civil_stats.as_str()))],
        [""],
        ["7. EDUCATIONAL ATTAINMENT"],
        ["NAME OF SCHOOL", "INCLUSIVE DATES", "DEGREE OR DIPLOMA"],
        ["", "From", "To", ""],
        [
            applicant.school.as_deref().unwrap_or_default(),
            "",
            "",
            applicant.educational_attainment.as_str(),
            applicant.course.as_deref().unwrap_or_default(),
        ],
        [""],
        ["8. DISADVANTAGED GROUP"],
        [""],
        ["CERTIFICATION:"],
        ["Certify that all information provided in this application, including the attached documents, is complete and accurate to the best of my knowledge."],
        [""],
        ["DATE ACCOMPLISHED", date_submitted],
        [""],
        ["FOR DOLE-RO/FO Use Only"],
        [""],
        ["Interviewed and validated by:"],
        [""],
        ["NAME and SIGNATURE/Position", "DATE"],
        [""],
        ["Documents Received:"],
        ["Birth certificate or equivalent", "Form 137/138"],
        ["Transcript of Records", "Diploma"],
        ["Barangay Certification", "Others"],
    ];
    Sheet {
        name: SHEET_NAME,
        column_widths: COLUMN_WIDTHS,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::db::{Barangay, Gender, Status};
    use crate::test_support::applicant;

    #[test]
    fn file_name_uses_code_and_name() {
        let mut a = applicant(Barangay::Caingin, Gender::Female, Status::Pending);
        a.code = "GIP-2026-0003".into();
        a.first_name = "MARIA".into();
        a.last_name = "REYES".into();
        assert_eq!(file_name(&a), "GIP-2026-0003_REYES_MARIA_Application.xlsx");
    }

    #[test]
    fn form_rows_fill_in_applicant_values() {
        let mut a = applicant(Barangay::Caingin, Gender::Female, Status::Pending);
        a.telephone_number = None;
        let sheet = application_form(&a);
        assert_eq!(sheet.name, "Application Form");
        assert_eq!(sheet.column_widths, [30, 20, 20, 20]);
        assert_eq!(sheet.rows[1], vec!["GOVERNMENT INTERNSHIP PROGRAM (GIP)"]);
        assert_eq!(sheet.rows[9][0], a.last_name);
        assert_eq!(sheet.rows[12], vec!["CAINGIN"]);
        assert_eq!(sheet.rows[14], vec!["Telephone No.:", "-"]);
        assert_eq!(sheet.rows[22], vec!["5. GENDER", "Female"]);
        assert_eq!(
            sheet.rows.last().unwrap(),
            &vec!["Barangay Certification", "Others"]
        );
    }
}

use applicant_registry::core::db::{
    Barangay, Gender, NewApplicant, Program, ProgramDetails, RegistryDb, Status, TupadDetails,
};
use applicant_registry::form::FormData;
use applicant_registry::normalize::{format_date, today};
use time::Date;

/// Creates a RegistryDb with a temporary tar.zst file.
/// Returns both the registry and the temp directory (which must be kept alive).
pub async fn create_test_registry() -> (RegistryDb, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("test.gipreg");
    let registry = RegistryDb::new(&path)
        .await
        .expect("Failed to create test registry")
        .with_pbkdf2_iterations(1_000);
    (registry, dir)
}

/// A birth date that makes the applicant exactly `years` old today.
pub fn born_years_ago(years: i32) -> Date {
    let today = today();
    Date::from_calendar_date(today.year() - years, today.month(), 1)
        .expect("Failed to build birth date")
}

pub fn date(year: i32, month: u8, day: u8) -> Date {
    let month = time::Month::try_from(month).expect("Invalid month");
    Date::from_calendar_date(year, month, day).expect("Invalid date")
}

pub fn tupad_details() -> TupadDetails {
    TupadDetails {
        id_type: "PHILSYS".to_string(),
        id_number: "1234-5678".to_string(),
        occupation: "VENDOR".to_string(),
        civil_status: "MARRIED".to_string(),
        average_monthly_income: "6000".to_string(),
        dependent_name: "ANA CRUZ".to_string(),
        relationship_to_dependent: "DAUGHTER".to_string(),
    }
}

/// Creates a NewApplicant with test data, 22 years old, submitted today.
pub fn make_new_applicant(program: Program, code: &str) -> NewApplicant {
    NewApplicant {
        code: code.to_string(),
        first_name: "JUAN".to_string(),
        middle_name: Some("SANTOS".to_string()),
        last_name: "DELA CRUZ".to_string(),
        extension_name: None,
        birth_date: born_years_ago(22),
        gender: Gender::Male,
        civil_stats: "SINGLE".to_string(),
        barangay: Barangay::Aplaya,
        contact_number: "0917-123-4567".to_string(),
        telephone_number: None,
        email: Some("juan@example.com".to_string()),
        place_of_birth: Some("SANTA ROSA".to_string()),
        educational_attainment: "COLLEGE GRADUATE".to_string(),
        school: Some("PLSP".to_string()),
        course: Some("BSIT".to_string()),
        beneficiary_name: None,
        details: match program {
            Program::Gip => ProgramDetails::Gip,
            Program::Tupad => ProgramDetails::Tupad(tupad_details()),
        },
        resume: None,
        photo: None,
        status: Status::Pending,
        date_submitted: today(),
        encoder: "Administrator".to_string(),
    }
}

/// A NewApplicant with the dimensions the report tests group by.
pub fn make_report_applicant(
    code: &str,
    barangay: Barangay,
    gender: Gender,
    status: Status,
    date_submitted: Date,
) -> NewApplicant {
    NewApplicant {
        barangay,
        gender,
        status,
        date_submitted,
        ..make_new_applicant(Program::Gip, code)
    }
}

/// A complete intake form for an applicant `age` years old.
pub fn make_form(program: Program, age: i32) -> FormData {
    let mut form = FormData::initialize(None);
    form.first_name = "MARIA".to_string();
    form.last_name = "REYES".to_string();
    form.birth_date = format_date(born_years_ago(age));
    form.barangay = "SINALHAN".to_string();
    form.contact_number = "0918-765-4321".to_string();
    form.gender = Gender::Female;
    form.educational_attainment = "SENIOR HIGH SCHOOL GRADUATE".to_string();
    if program == Program::Tupad {
        let details = tupad_details();
        form.id_type = details.id_type;
        form.id_number = details.id_number;
        form.occupation = details.occupation;
    }
    form
}

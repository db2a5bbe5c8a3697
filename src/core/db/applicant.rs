use std::future::Future;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::attachment::Attachment;
use crate::core::db::model::{Barangay, Gender, Program, Status};

/// Attributes collected only from TUPAD applicants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TupadDetails {
    pub id_type: String,
    pub id_number: String,
    pub occupation: String,
    pub civil_status: String,
    pub average_monthly_income: String,
    pub dependent_name: String,
    pub relationship_to_dependent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "program")]
pub enum ProgramDetails {
    #[serde(rename = "GIP")]
    Gip,
    #[serde(rename = "TUPAD")]
    Tupad(TupadDetails),
}

impl ProgramDetails {
    pub fn program(&self) -> Program {
        match self {
            ProgramDetails::Gip => Program::Gip,
            ProgramDetails::Tupad(_) => Program::Tupad,
        }
    }

    pub fn tupad(&self) -> Option<&TupadDetails> {
        match self {
            ProgramDetails::Gip => None,
            ProgramDetails::Tupad(details) => Some(details),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub id: i64,
    pub code: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub extension_name: Option<String>,
    pub birth_date: Date,
    pub age: u32,
    pub gender: Gender,
    pub civil_stats: String,
    pub barangay: Barangay,
    pub contact_number: String,
    pub telephone_number: Option<String>,
    pub email: Option<String>,
    pub place_of_birth: Option<String>,
    pub educational_attainment: String,
    pub school: Option<String>,
    pub course: Option<String>,
    pub beneficiary_name: Option<String>,
    #[serde(flatten)]
    pub details: ProgramDetails,
    #[serde(skip)]
    pub resume: Option<Attachment>,
    #[serde(skip)]
    pub photo: Option<Attachment>,
    pub status: Status,
    pub date_submitted: Date,
    pub encoder: String,
    #[serde(skip)]
    pub(crate) _guard: (),
}

impl Applicant {
    pub fn program(&self) -> Program {
        self.details.program()
    }

    pub fn full_name(&self) -> String {
        let mut parts = vec![self.first_name.as_str()];
        if let Some(middle) = self.middle_name.as_deref() {
            parts.push(middle);
        }
        parts.push(self.last_name.as_str());
        if let Some(ext) = self.extension_name.as_deref() {
            parts.push(ext);
        }
        parts.join(" ")
    }
}

#[derive(Debug, Clone)]
pub struct NewApplicant {
    pub code: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub extension_name: Option<String>,
    pub birth_date: Date,
    pub gender: Gender,
    pub civil_stats: String,
    pub barangay: Barangay,
    pub contact_number: String,
    pub telephone_number: Option<String>,
    pub email: Option<String>,
    pub place_of_birth: Option<String>,
    pub educational_attainment: String,
    pub school: Option<String>,
    pub course: Option<String>,
    pub beneficiary_name: Option<String>,
    pub details: ProgramDetails,
    pub resume: Option<Attachment>,
    pub photo: Option<Attachment>,
    pub status: Status,
    pub date_submitted: Date,
    pub encoder: String,
}

/// Partial edit of an applicant. `None` leaves a field as stored; for
/// nullable fields `Some(None)` clears it.
///
/// Identity and provenance (`id`, `code`, program, `date_submitted`,
/// `encoder`) cannot be edited, and `age` follows `birth_date`.
#[derive(Debug, Clone, Default)]
pub struct ApplicantUpdate {
    pub first_name: Option<String>,
    pub middle_name: Option<Option<String>>,
    pub last_name: Option<String>,
    pub extension_name: Option<Option<String>>,
    pub birth_date: Option<Date>,
    pub gender: Option<Gender>,
    pub civil_stats: Option<String>,
    pub barangay: Option<Barangay>,
    pub contact_number: Option<String>,
    pub telephone_number: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub place_of_birth: Option<Option<String>>,
    pub educational_attainment: Option<String>,
    pub school: Option<Option<String>>,
    pub course: Option<Option<String>>,
    pub beneficiary_name: Option<Option<String>>,
    pub tupad: Option<TupadDetails>,
    pub resume: Option<Option<Attachment>>,
    pub photo: Option<Option<Attachment>>,
    pub status: Option<Status>,
}

impl ApplicantUpdate {
    /// Merge this edit over `current`, leaving age untouched.
    pub(crate) fn merged_over(&self, current: &Applicant) -> anyhow::Result<Applicant> {
        let mut next = current.clone();
        macro_rules! set {
            ($($field:ident),+) => {
                $(if let Some(value) = &self.$field {
                    next.$field = value.clone();
                })+
            };
        }
        set!(
            first_name,
            middle_name,
            last_name,
            extension_name,
            birth_date,
            gender,
            civil_stats,
            barangay,
            contact_number,
            telephone_number,
            email,
            place_of_birth,
            educational_attainment,
            school,
            course,
            beneficiary_name,
            resume,
            photo,
            status
        );
        if let Some(tupad) = &self.tupad {
            match next.details {
                ProgramDetails::Tupad(ref mut details) => *details = tupad.clone(),
                ProgramDetails::Gip => anyhow::bail!(
                    "Applicant {} is enrolled in GIP and has no TUPAD details",
                    current.code
                ),
            }
        }
        Ok(next)
    }
}

pub trait ApplicantRepository {
    fn get_applicants(
        &self,
        program: Program,
    ) -> impl Future<Output = anyhow::Result<Vec<Applicant>>>;
    fn get_applicant_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = anyhow::Result<Option<Applicant>>>;
    fn get_applicant_by_code(
        &self,
        program: Program,
        code: &str,
    ) -> impl Future<Output = anyhow::Result<Option<Applicant>>>;
    fn add_applicant(
        &self,
        applicant: &NewApplicant,
    ) -> impl Future<Output = anyhow::Result<Applicant>>;
    fn update_applicant(
        &self,
        applicant: &Applicant,
        update: &ApplicantUpdate,
    ) -> impl Future<Output = anyhow::Result<Applicant>>;
    fn delete_applicant(&self, applicant: Applicant) -> impl Future<Output = anyhow::Result<()>>;
    fn next_code(
        &self,
        program: Program,
        year: i32,
    ) -> impl Future<Output = anyhow::Result<String>>;
}

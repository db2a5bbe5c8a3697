//! The applicant intake form: editable string fields, seeded from an
//! existing record when editing, and turned back into a record on submit.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::attachment::encode_file;
use crate::core::db::{
    Applicant, ApplicantRepository, ApplicantUpdate, Barangay, Gender, NewApplicant, Program,
    ProgramDetails, Status, TupadDetails,
};
use crate::error::RegistryError;
use crate::normalize::{capitalize, format_phone_number, parse_date};
use crate::validation::validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub extension_name: String,
    pub birth_date: String,
    /// Display only; the stored age is recomputed from `birth_date`.
    pub age: String,
    pub place_of_birth: String,
    pub barangay: String,
    pub contact_number: String,
    pub telephone_number: String,
    pub email: String,
    pub school: String,
    pub civil_stats: String,
    pub gender: Gender,
    pub educational_attainment: String,
    pub course: String,
    pub beneficiary_name: String,
    pub status: Status,
    pub id_type: String,
    pub id_number: String,
    pub occupation: String,
    pub civil_status: String,
    pub average_monthly_income: String,
    pub dependent_name: String,
    pub relationship_to_dependent: String,
    /// Files picked for upload; read and encoded on submit.
    #[serde(skip)]
    pub resume_file: Option<PathBuf>,
    #[serde(skip)]
    pub photo_file: Option<PathBuf>,
    pub photo_file_name: String,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            middle_name: String::new(),
            last_name: String::new(),
            extension_name: String::new(),
            birth_date: String::new(),
            age: String::new(),
            place_of_birth: String::new(),
            barangay: String::new(),
            contact_number: String::new(),
            telephone_number: String::new(),
            email: String::new(),
            school: String::new(),
            civil_stats: String::new(),
            gender: Gender::Male,
            educational_attainment: String::new(),
            course: String::new(),
            beneficiary_name: String::new(),
            status: Status::Pending,
            id_type: String::new(),
            id_number: String::new(),
            occupation: String::new(),
            civil_status: String::new(),
            average_monthly_income: String::new(),
            dependent_name: String::new(),
            relationship_to_dependent: String::new(),
            resume_file: None,
            photo_file: None,
            photo_file_name: String::new(),
        }
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl FormData {
    /// Blank form for a new applicant, or the applicant's values for editing.
    pub fn initialize(applicant: Option<&Applicant>) -> Self {
        let Some(applicant) = applicant else {
            return Self::default();
        };
        let tupad = applicant.details.tupad().cloned().unwrap_or_default();
        Self {
            first_name: applicant.first_name.clone(),
            middle_name: text(&applicant.middle_name),
            last_name: applicant.last_name.clone(),
            extension_name: text(&applicant.extension_name),
            birth_date: crate::normalize::format_date(applicant.birth_date),
            age: applicant.age.to_string(),
            place_of_birth: text(&applicant.place_of_birth),
            barangay: applicant.barangay.to_string(),
            contact_number: applicant.contact_number.clone(),
            telephone_number: text(&applicant.telephone_number),
            email: text(&applicant.email),
            school: text(&applicant.school),
            civil_stats: applicant.civil_stats.clone(),
            gender: applicant.gender,
            educational_attainment: applicant.educational_attainment.clone(),
            course: text(&applicant.course),
            beneficiary_name: text(&applicant.beneficiary_name),
            status: applicant.status,
            id_type: tupad.id_type,
            id_number: tupad.id_number,
            occupation: tupad.occupation,
            civil_status: tupad.civil_status,
            average_monthly_income: tupad.average_monthly_income,
            dependent_name: tupad.dependent_name,
            relationship_to_dependent: tupad.relationship_to_dependent,
            resume_file: None,
            photo_file: None,
            photo_file_name: applicant
                .photo
                .as_ref()
                .map(|p| p.file_name.clone())
                .unwrap_or_default(),
        }
    }

    /// Apply one input change by form field name, normalising the value the
    /// way the field requires.
    pub fn set(&mut self, field: &str, value: &str) -> anyhow::Result<()> {
        let value = capitalize(field, value);
        let slot = match field {
            "gender" => {
                self.gender = Gender::try_from(value.as_str())?;
                return Ok(());
            }
            "status" => {
                self.status = Status::try_from(value.as_str())?;
                return Ok(());
            }
            "contactNumber" => {
                self.contact_number = format_phone_number(&value);
                return Ok(());
            }
            "age" => anyhow::bail!("Age is derived from the birth date"),
            "firstName" => &mut self.first_name,
            "middleName" => &mut self.middle_name,
            "lastName" => &mut self.last_name,
            "extensionName" => &mut self.extension_name,
            "birthDate" => &mut self.birth_date,
            "placeOfBirth" => &mut self.place_of_birth,
            "barangay" => &mut self.barangay,
            "telephoneNumber" => &mut self.telephone_number,
            "email" => &mut self.email,
            "school" => &mut self.school,
            "civilStats" => &mut self.civil_stats,
            "educationalAttainment" => &mut self.educational_attainment,
            "course" => &mut self.course,
            "beneficiaryName" => &mut self.beneficiary_name,
            "idType" => &mut self.id_type,
            "idNumber" => &mut self.id_number,
            "occupation" => &mut self.occupation,
            "civilStatus" => &mut self.civil_status,
            "averageMonthlyIncome" => &mut self.average_monthly_income,
            "dependentName" => &mut self.dependent_name,
            "relationshipToDependent" => &mut self.relationship_to_dependent,
            other => anyhow::bail!("Unknown form field: {}", other),
        };
        *slot = value;
        Ok(())
    }

    /// True when nothing has been typed or picked, so the form can be
    /// discarded without confirmation.
    pub fn is_blank(&self) -> bool {
        let fresh = Self {
            gender: self.gender,
            status: self.status,
            ..Self::default()
        };
        *self == fresh
    }

    fn tupad_details(&self) -> TupadDetails {
        TupadDetails {
            id_type: self.id_type.clone(),
            id_number: self.id_number.clone(),
            occupation: self.occupation.clone(),
            civil_status: self.civil_status.clone(),
            average_monthly_income: self.average_monthly_income.clone(),
            dependent_name: self.dependent_name.clone(),
            relationship_to_dependent: self.relationship_to_dependent.clone(),
        }
    }

    fn details(&self, program: Program) -> ProgramDetails {
        match program {
            Program::Gip => ProgramDetails::Gip,
            Program::Tupad => ProgramDetails::Tupad(self.tupad_details()),
        }
    }

    /// Build the record for a new applicant. Attachments are left empty.
    pub fn to_new_applicant(
        &self,
        program: Program,
        code: String,
        encoder: &str,
        date_submitted: Date,
    ) -> anyhow::Result<NewApplicant> {
        Ok(NewApplicant {
            code,
            first_name: self.first_name.clone(),
            middle_name: optional(&self.middle_name),
            last_name: self.last_name.clone(),
            extension_name: optional(&self.extension_name),
            birth_date: parse_date(&self.birth_date)?,
            gender: self.gender,
            civil_stats: self.civil_stats.clone(),
            barangay: Barangay::try_from(self.barangay.as_str())?,
            contact_number: self.contact_number.clone(),
            telephone_number: optional(&self.telephone_number),
            email: optional(&self.email),
            place_of_birth: optional(&self.place_of_birth),
            educational_attainment: self.educational_attainment.clone(),
            school: optional(&self.school),
            course: optional(&self.course),
            beneficiary_name: optional(&self.beneficiary_name),
            details: self.details(program),
            resume: None,
            photo: None,
            status: self.status,
            date_submitted,
            encoder: encoder.to_string(),
        })
    }

    /// Every editable field as an update. Attachments are left unchanged.
    pub fn to_update(&self, program: Program) -> anyhow::Result<ApplicantUpdate> {
        Ok(ApplicantUpdate {
            first_name: Some(self.first_name.clone()),
            middle_name: Some(optional(&self.middle_name)),
            last_name: Some(self.last_name.clone()),
            extension_name: Some(optional(&self.extension_name)),
            birth_date: Some(parse_date(&self.birth_date)?),
            gender: Some(self.gender),
            civil_stats: Some(self.civil_stats.clone()),
            barangay: Some(Barangay::try_from(self.barangay.as_str())?),
            contact_number: Some(self.contact_number.clone()),
            telephone_number: Some(optional(&self.telephone_number)),
            email: Some(optional(&self.email)),
            place_of_birth: Some(optional(&self.place_of_birth)),
            educational_attainment: Some(self.educational_attainment.clone()),
            school: Some(optional(&self.school)),
            course: Some(optional(&self.course)),
            beneficiary_name: Some(optional(&self.beneficiary_name)),
            tupad: match program {
                Program::Gip => None,
                Program::Tupad => Some(self.tupad_details()),
            },
            resume: None,
            photo: None,
            status: Some(self.status),
        })
    }
}

/// Validate the form, encode any picked files, then add a new applicant or
/// update `editing`. Nothing is written unless every step before it succeeds.
pub async fn submit<R: ApplicantRepository>(
    repo: &R,
    form: &FormData,
    program: Program,
    encoder: &str,
    editing: Option<&Applicant>,
    today: Date,
) -> Result<Applicant, RegistryError> {
    validate(form, program, today)?;

    let resume = match &form.resume_file {
        Some(path) => Some(encode_file(path).await?),
        None => None,
    };
    let photo = match &form.photo_file {
        Some(path) => Some(encode_file(path).await?),
        None => None,
    };

    match editing {
        Some(current) => {
            if current.program() != program {
                return Err(RegistryError::Store(anyhow::anyhow!(
                    "Applicant {} is enrolled in {}, not {}",
                    current.code,
                    current.program(),
                    program
                )));
            }
            let mut update = form.to_update(program)?;
            update.resume = resume.map(Some);
            update.photo = photo.map(Some);
            Ok(repo.update_applicant(current, &update).await?)
        }
        None => {
            let code = repo.next_code(program, today.year()).await?;
            let mut applicant = form.to_new_applicant(program, code, encoder, today)?;
            applicant.resume = resume;
            applicant.photo = photo;
            Ok(repo.add_applicant(&applicant).await?)
        }
    }
}

mod account;
mod applicant;
mod model;
mod state;
mod stats;

use std::{path::Path, sync::Arc};

use anyhow::Context;
use sqlx::FromRow;
use state::RegistryState;

use crate::attachment::Attachment;
use crate::auth::{self, Authenticator, PasswordHash, Role, User};
use crate::error::RegistryError;
use crate::normalize::{calculate_age, format_date, parse_date, today};
use crate::report;

pub use account::{AccountRepository, NewAccount, StaffAccount};
pub use applicant::{
    Applicant, ApplicantRepository, ApplicantUpdate, NewApplicant, ProgramDetails, TupadDetails,
};
pub use model::{Barangay, EDUCATION_LEVELS, Gender, Program, Status};
pub use stats::StatisticsRepository;

#[derive(Debug)]
pub struct RegistryDb {
    state: Arc<RegistryState>,
    enforce_status_transitions: bool,
    pbkdf2_iterations: u32,
}

impl RegistryDb {
    pub async fn new<P: AsRef<Path>>(registry_file: P) -> anyhow::Result<Self> {
        Ok(Self {
            state: Arc::new(RegistryState::new(registry_file).await?),
            enforce_status_transitions: true,
            pbkdf2_iterations: auth::DEFAULT_PBKDF2_ITERATIONS,
        })
    }

    /// When off, any status may be written; illegal moves are only logged.
    pub fn with_status_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_status_transitions = enforce;
        self
    }

    pub fn with_pbkdf2_iterations(mut self, iterations: u32) -> Self {
        self.pbkdf2_iterations = iterations.max(1);
        self
    }

    /// Explicitly save the registry to disk.
    /// This is required when dropping in an async context (e.g., tests with #[tokio::test]).
    pub async fn save_registry(&self) -> anyhow::Result<()> {
        self.state.save_registry().await
    }

    async fn load_applicants(
        &self,
        program: Program,
        year: Option<i32>,
    ) -> anyhow::Result<Vec<Applicant>> {
        let mut conn = self.state.conn().await?;
        let year = year.map(|y| format!("{:04}", y));
        sqlx::query_as::<_, ApplicantRecord>(
            r#"SELECT * FROM applicant
            WHERE program = $1
            AND ($2 IS NULL OR substr(date_submitted, 1, 4) = $2)
            ORDER BY id ASC"#,
        )
        .bind(program.as_str())
        .bind(year)
        .fetch_all(&mut **conn)
        .await?
        .into_iter()
        .map(Applicant::try_from)
        .collect()
    }
}

#[derive(Debug, FromRow)]
struct ApplicantRecord {
    id: i64,
    code: String,
    program: String,
    first_name: String,
    middle_name: Option<String>,
    last_name: String,
    extension_name: Option<String>,
    birth_date: String,
    age: i64,
    gender: String,
    civil_stats: String,
    barangay: String,
    contact_number: String,
    telephone_number: Option<String>,
    email: Option<String>,
    place_of_birth: Option<String>,
    educational_attainment: String,
    school: Option<String>,
    course: Option<String>,
    beneficiary_name: Option<String>,
    id_type: Option<String>,
    id_number: Option<String>,
    occupation: Option<String>,
    civil_status: Option<String>,
    average_monthly_income: Option<String>,
    dependent_name: Option<String>,
    relationship_to_dependent: Option<String>,
    resume_file_name: Option<String>,
    resume_file_data: Option<String>,
    photo_file_name: Option<String>,
    photo_file_data: Option<String>,
    status: String,
    date_submitted: String,
    encoder: String,
}

fn attachment_from(name: Option<String>, data: Option<String>) -> Option<Attachment> {
    match (name, data) {
        (Some(file_name), Some(data)) => Some(Attachment { file_name, data }),
        _ => None,
    }
}

impl TryFrom<ApplicantRecord> for Applicant {
    type Error = anyhow::Error;

    fn try_from(record: ApplicantRecord) -> Result<Self, Self::Error> {
        let details = match Program::try_from(record.program.as_str())? {
            Program::Gip => ProgramDetails::Gip,
            Program::Tupad => ProgramDetails::Tupad(TupadDetails {
                id_type: record.id_type.unwrap_or_default(),
                id_number: record.id_number.unwrap_or_default(),
                occupation: record.occupation.unwrap_or_default(),
                civil_status: record.civil_status.unwrap_or_default(),
                average_monthly_income: record.average_monthly_income.unwrap_or_default(),
                dependent_name: record.dependent_name.unwrap_or_default(),
                relationship_to_dependent: record.relationship_to_dependent.unwrap_or_default(),
            }),
        };
        Ok(Applicant {
            id: record.id,
            code: record.code,
            first_name: record.first_name,
            middle_name: record.middle_name,
            last_name: record.last_name,
            extension_name: record.extension_name,
            birth_date: parse_date(&record.birth_date)?,
            age: u32::try_from(record.age)
                .with_context(|| format!("Negative age stored for {}", record.id))?,
            gender: Gender::try_from(record.gender.as_str())?,
            civil_stats: record.civil_stats,
            barangay: Barangay::try_from(record.barangay.as_str())?,
            contact_number: record.contact_number,
            telephone_number: record.telephone_number,
            email: record.email,
            place_of_birth: record.place_of_birth,
            educational_attainment: record.educational_attainment,
            school: record.school,
            course: record.course,
            beneficiary_name: record.beneficiary_name,
            details,
            resume: attachment_from(record.resume_file_name, record.resume_file_data),
            photo: attachment_from(record.photo_file_name, record.photo_file_data),
            status: Status::try_from(record.status.as_str())?,
            date_submitted: parse_date(&record.date_submitted)?,
            encoder: record.encoder,
            _guard: (),
        })
    }
}

/// TUPAD-only columns in storage order; all NULL for GIP applicants.
fn tupad_columns(details: &ProgramDetails) -> [Option<&str>; 7] {
    match details.tupad() {
        Some(t) => [
            Some(t.id_type.as_str()),
            Some(t.id_number.as_str()),
            Some(t.occupation.as_str()),
            Some(t.civil_status.as_str()),
            Some(t.average_monthly_income.as_str()),
            Some(t.dependent_name.as_str()),
            Some(t.relationship_to_dependent.as_str()),
        ],
        None => [None; 7],
    }
}

impl ApplicantRepository for RegistryDb {
    async fn get_applicants(&self, program: Program) -> anyhow::Result<Vec<Applicant>> {
        self.load_applicants(program, None).await
    }

    async fn get_applicant_by_id(&self, id: i64) -> anyhow::Result<Option<Applicant>> {
        let mut conn = self.state.conn().await?;
        sqlx::query_as::<_, ApplicantRecord>(r#"SELECT * FROM applicant WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&mut **conn)
            .await?
            .map(Applicant::try_from)
            .transpose()
    }

    async fn get_applicant_by_code(
        &self,
        program: Program,
        code: &str,
    ) -> anyhow::Result<Option<Applicant>> {
        let mut conn = self.state.conn().await?;
        sqlx::query_as::<_, ApplicantRecord>(
            r#"SELECT * FROM applicant WHERE program = $1 AND code = $2"#,
        )
        .bind(program.as_str())
        .bind(code)
        .fetch_optional(&mut **conn)
        .await?
        .map(Applicant::try_from)
        .transpose()
    }

    async fn add_applicant(&self, applicant: &NewApplicant) -> anyhow::Result<Applicant> {
        let mut conn = self.state.conn().await?;
        let age = calculate_age(applicant.birth_date, today());
        let [id_type, id_number, occupation, civil_status, income, dependent, relationship] =
            tupad_columns(&applicant.details);
        let record = sqlx::query_as::<_, ApplicantRecord>(
            r#"INSERT INTO applicant (
                code, program, first_name, middle_name, last_name, extension_name,
                birth_date, age, gender, civil_stats, barangay, contact_number,
                telephone_number, email, place_of_birth, educational_attainment,
                school, course, beneficiary_name,
                id_type, id_number, occupation, civil_status, average_monthly_income,
                dependent_name, relationship_to_dependent,
                resume_file_name, resume_file_data, photo_file_name, photo_file_data,
                status, date_submitted, encoder
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30,
                $31, $32, $33
            )
            RETURNING *"#,
        )
        .bind(&applicant.code)
        .bind(applicant.details.program().as_str())
        .bind(&applicant.first_name)
        .bind(&applicant.middle_name)
        .bind(&applicant.last_name)
        .bind(&applicant.extension_name)
        .bind(format_date(applicant.birth_date))
        .bind(i64::from(age))
        .bind(applicant.gender.as_str())
        .bind(&applicant.civil_stats)
        .bind(applicant.barangay.as_str())
        .bind(&applicant.contact_number)
        .bind(&applicant.telephone_number)
        .bind(&applicant.email)
        .bind(&applicant.place_of_birth)
        .bind(&applicant.educational_attainment)
        .bind(&applicant.school)
        .bind(&applicant.course)
        .bind(&applicant.beneficiary_name)
        .bind(id_type)
        .bind(id_number)
        .bind(occupation)
        .bind(civil_status)
        .bind(income)
        .bind(dependent)
        .bind(relationship)
        .bind(applicant.resume.as_ref().map(|a| a.file_name.as_str()))
        .bind(applicant.resume.as_ref().map(|a| a.data.as_str()))
        .bind(applicant.photo.as_ref().map(|a| a.file_name.as_str()))
        .bind(applicant.photo.as_ref().map(|a| a.data.as_str()))
        .bind(applicant.status.as_str())
        .bind(format_date(applicant.date_submitted))
        .bind(&applicant.encoder)
        .fetch_one(&mut **conn)
        .await
        .with_context(|| {
            format!(
                "Failed to add {} applicant {}",
                applicant.details.program(),
                applicant.code
            )
        })?;
        let added = Applicant::try_from(record)?;
        tracing::info!(
            id = added.id,
            code = %added.code,
            program = %added.program(),
            "applicant added"
        );
        Ok(added)
    }

    async fn update_applicant(
        &self,
        applicant: &Applicant,
        update: &ApplicantUpdate,
    ) -> anyhow::Result<Applicant> {
        let next = update.merged_over(applicant)?;
        if !applicant.status.can_transition_to(next.status) {
            if self.enforce_status_transitions {
                return Err(RegistryError::IllegalTransition {
                    from: applicant.status,
                    to: next.status,
                }
                .into());
            }
            tracing::warn!(
                code = %applicant.code,
                from = %applicant.status,
                to = %next.status,
                "status moved outside the transition table"
            );
        }
        let age = calculate_age(next.birth_date, today());
        let [id_type, id_number, occupation, civil_status, income, dependent, relationship] =
            tupad_columns(&next.details);

        let mut conn = self.state.conn().await?;
        let record = sqlx::query_as::<_, ApplicantRecord>(
            r#"UPDATE applicant SET
                first_name = $1,
                middle_name = $2,
                last_name = $3,
                extension_name = $4,
                birth_date = $5,
                age = $6,
                gender = $7,
                civil_stats = $8,
                barangay = $9,
                contact_number = $10,
                telephone_number = $11,
                email = $12,
                place_of_birth = $13,
                educational_attainment = $14,
                school = $15,
                course = $16,
                beneficiary_name = $17,
                id_type = $18,
                id_number = $19,
                occupation = $20,
                civil_status = $21,
                average_monthly_income = $22,
                dependent_name = $23,
                relationship_to_dependent = $24,
                resume_file_name = $25,
                resume_file_data = $26,
                photo_file_name = $27,
                photo_file_data = $28,
                status = $29
            WHERE id = $30
            RETURNING *"#,
        )
        .bind(&next.first_name)
        .bind(&next.middle_name)
        .bind(&next.last_name)
        .bind(&next.extension_name)
        .bind(format_date(next.birth_date))
        .bind(i64::from(age))
        .bind(next.gender.as_str())
        .bind(&next.civil_stats)
        .bind(next.barangay.as_str())
        .bind(&next.contact_number)
        .bind(&next.telephone_number)
        .bind(&next.email)
        .bind(&next.place_of_birth)
        .bind(&next.educational_attainment)
        .bind(&next.school)
        .bind(&next.course)
        .bind(&next.beneficiary_name)
        .bind(id_type)
        .bind(id_number)
        .bind(occupation)
        .bind(civil_status)
        .bind(income)
        .bind(dependent)
        .bind(relationship)
        .bind(next.resume.as_ref().map(|a| a.file_name.as_str()))
        .bind(next.resume.as_ref().map(|a| a.data.as_str()))
        .bind(next.photo.as_ref().map(|a| a.file_name.as_str()))
        .bind(next.photo.as_ref().map(|a| a.data.as_str()))
        .bind(next.status.as_str())
        .bind(applicant.id)
        .fetch_optional(&mut **conn)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Applicant with id {} not found", applicant.id))?;
        let updated = Applicant::try_from(record)?;
        tracing::info!(id = updated.id, code = %updated.code, "applicant updated");
        Ok(updated)
    }

    async fn delete_applicant(&self, applicant: Applicant) -> anyhow::Result<()> {
        let mut conn = self.state.conn().await?;
        sqlx::query(r#"DELETE FROM applicant WHERE id = $1"#)
            .bind(applicant.id)
            .execute(&mut **conn)
            .await?;
        tracing::info!(id = applicant.id, code = %applicant.code, "applicant deleted");
        Ok(())
    }

    async fn next_code(&self, program: Program, year: i32) -> anyhow::Result<String> {
        let prefix = format!("{}-{:04}-", program, year);
        let mut conn = self.state.conn().await?;
        let codes: Vec<String> =
            sqlx::query_scalar(r#"SELECT code FROM applicant WHERE program = $1 AND code LIKE $2"#)
                .bind(program.as_str())
                .bind(format!("{}%", prefix))
                .fetch_all(&mut **conn)
                .await?;
        let highest = codes
            .iter()
            .filter_map(|code| code.strip_prefix(&prefix)?.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        Ok(format!("{}{:04}", prefix, highest + 1))
    }
}

impl StatisticsRepository for RegistryDb {
    async fn get_available_years(&self, program: Program) -> anyhow::Result<Vec<i32>> {
        let mut conn = self.state.conn().await?;
        let dates: Vec<String> = sqlx::query_scalar(
            r#"SELECT date_submitted FROM applicant WHERE program = $1"#,
        )
        .bind(program.as_str())
        .fetch_all(&mut **conn)
        .await?;
        let dates = dates
            .iter()
            .map(|d| parse_date(d))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(report::available_years(dates))
    }

    async fn get_statistics_by_year(
        &self,
        program: Program,
        year: Option<i32>,
    ) -> anyhow::Result<report::Summary> {
        let applicants = self.load_applicants(program, year).await?;
        Ok(report::summarize(&applicants))
    }

    async fn get_barangay_statistics_by_year(
        &self,
        program: Program,
        year: Option<i32>,
    ) -> anyhow::Result<Vec<report::BarangayRow>> {
        let applicants = self.load_applicants(program, year).await?;
        Ok(report::by_barangay(&applicants))
    }

    async fn get_status_statistics_by_year(
        &self,
        program: Program,
        year: Option<i32>,
    ) -> anyhow::Result<Vec<report::StatusRow>> {
        let applicants = self.load_applicants(program, year).await?;
        Ok(report::by_status(&applicants))
    }

    async fn get_gender_statistics_by_year(
        &self,
        program: Program,
        year: Option<i32>,
    ) -> anyhow::Result<Vec<report::GenderRow>> {
        let applicants = self.load_applicants(program, year).await?;
        Ok(report::by_gender(&applicants))
    }
}

#[derive(Debug, FromRow)]
struct AccountRecord {
    id: i64,
    username: String,
    role: String,
    salt: String,
    hash: String,
    iterations: i64,
}

impl TryFrom<AccountRecord> for StaffAccount {
    type Error = anyhow::Error;

    fn try_from(record: AccountRecord) -> Result<Self, Self::Error> {
        Ok(StaffAccount {
            id: record.id,
            user: User {
                username: record.username,
                role: Role::try_from(record.role.as_str())?,
            },
            salt: record.salt,
            hash: record.hash,
            iterations: u32::try_from(record.iterations)?,
        })
    }
}

impl AccountRepository for RegistryDb {
    async fn add_account(&self, account: &NewAccount) -> anyhow::Result<User> {
        if account.username.trim().is_empty() || account.password.is_empty() {
            anyhow::bail!("Username and password are required");
        }
        let PasswordHash {
            salt,
            hash,
            iterations,
        } = auth::hash_password(&account.password, self.pbkdf2_iterations);
        let mut conn = self.state.conn().await?;
        sqlx::query(
            r#"INSERT INTO staff_account (username, role, salt, hash, iterations)
            VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(account.username.trim())
        .bind(account.role.as_str())
        .bind(salt)
        .bind(hash)
        .bind(i64::from(iterations))
        .execute(&mut **conn)
        .await
        .with_context(|| format!("Failed to add account {}", account.username))?;
        tracing::info!(username = %account.username, role = %account.role, "staff account added");
        Ok(User {
            username: account.username.trim().to_string(),
            role: account.role,
        })
    }

    async fn get_account(&self, username: &str) -> anyhow::Result<Option<StaffAccount>> {
        let mut conn = self.state.conn().await?;
        sqlx::query_as::<_, AccountRecord>(
            r#"SELECT id, username, role, salt, hash, iterations
            FROM staff_account WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(&mut **conn)
        .await?
        .map(StaffAccount::try_from)
        .transpose()
    }

    async fn get_accounts(&self) -> anyhow::Result<Vec<User>> {
        let mut conn = self.state.conn().await?;
        sqlx::query_as::<_, AccountRecord>(
            r#"SELECT id, username, role, salt, hash, iterations
            FROM staff_account ORDER BY id ASC"#,
        )
        .fetch_all(&mut **conn)
        .await?
        .into_iter()
        .map(|record| StaffAccount::try_from(record).map(|account| account.user))
        .collect()
    }
}

impl Authenticator for RegistryDb {
    async fn authenticate(&self, username: &str, password: &str) -> anyhow::Result<Option<User>> {
        let Some(account) = self.get_account(username.trim()).await? else {
            return Ok(None);
        };
        let stored = PasswordHash {
            salt: account.salt,
            hash: account.hash,
            iterations: account.iterations,
        };
        Ok(auth::verify_password(password, &stored).then_some(account.user))
    }
}

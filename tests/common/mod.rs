#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from applicant_registry for tests
pub use applicant_registry::core::db::{
    AccountRepository, Applicant, ApplicantRepository, ApplicantUpdate, Barangay, Gender,
    NewAccount, NewApplicant, Program, ProgramDetails, RegistryDb, StatisticsRepository, Status,
    TupadDetails,
};

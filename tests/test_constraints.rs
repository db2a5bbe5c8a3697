//! Integration tests for database constraint and status rule enforcement.
//!
//! Tests cover:
//! - Application codes are unique per program (unique constraint)
//! - Status changes follow the transition table unless enforcement is off
//! - GIP applicants cannot be given TUPAD details

mod common;

use applicant_registry::RegistryError;
use common::*;

#[tokio::test]
async fn test_code_unique_within_program() -> anyhow::Result<()> {
    // 1. Add applicant
    let (registry, _temp_dir) = create_test_registry().await;
    registry
        .add_applicant(&make_new_applicant(Program::Gip, "SHARED-0001"))
        .await?;

    // 2. Same code in the same program is rejected
    let result = registry
        .add_applicant(&make_new_applicant(Program::Gip, "SHARED-0001"))
        .await;
    assert!(result.is_err(), "Should reject duplicate code");
    let error_msg = format!("{:#}", result.unwrap_err());
    assert!(
        error_msg.contains("UNIQUE constraint failed"),
        "Expected unique constraint error, got: {}",
        error_msg
    );

    // 3. Same code in the other program is fine
    registry
        .add_applicant(&make_new_applicant(Program::Tupad, "SHARED-0001"))
        .await?;

    Ok(())
}

#[tokio::test]
async fn test_illegal_status_change_is_rejected() -> anyhow::Result<()> {
    // 1. Add applicant and walk it to COMPLETED
    let (registry, _temp_dir) = create_test_registry().await;
    let mut applicant = registry
        .add_applicant(&make_new_applicant(Program::Gip, "GIP-2026-0001"))
        .await?;
    for status in [Status::Approved, Status::Deployed, Status::Completed] {
        let update = ApplicantUpdate {
            status: Some(status),
            ..Default::default()
        };
        applicant = registry.update_applicant(&applicant, &update).await?;
    }
    assert_eq!(applicant.status, Status::Completed);

    // 2. COMPLETED -> PENDING is refused
    let update = ApplicantUpdate {
        status: Some(Status::Pending),
        ..Default::default()
    };
    let err = registry
        .update_applicant(&applicant, &update)
        .await
        .expect_err("terminal status should not reopen");
    match RegistryError::from(err) {
        RegistryError::IllegalTransition { from, to } => {
            assert_eq!(from, Status::Completed);
            assert_eq!(to, Status::Pending);
        }
        other => panic!("Expected illegal transition, got: {}", other),
    }

    // 3. Stored record is unchanged
    let stored = registry
        .get_applicant_by_id(applicant.id)
        .await?
        .expect("applicant should exist");
    assert_eq!(stored.status, Status::Completed);

    Ok(())
}

#[tokio::test]
async fn test_skipping_a_step_is_rejected() -> anyhow::Result<()> {
    let (registry, _temp_dir) = create_test_registry().await;
    let applicant = registry
        .add_applicant(&make_new_applicant(Program::Gip, "GIP-2026-0002"))
        .await?;

    let update = ApplicantUpdate {
        status: Some(Status::Deployed),
        ..Default::default()
    };
    assert!(registry.update_applicant(&applicant, &update).await.is_err());

    // Side branches stay open from any non-terminal status
    let update = ApplicantUpdate {
        status: Some(Status::Resigned),
        ..Default::default()
    };
    let resigned = registry.update_applicant(&applicant, &update).await?;
    assert_eq!(resigned.status, Status::Resigned);

    Ok(())
}

#[tokio::test]
async fn test_any_status_allowed_when_enforcement_off() -> anyhow::Result<()> {
    let (registry, _temp_dir) = create_test_registry().await;
    let registry = registry.with_status_enforcement(false);
    let mut new_applicant = make_new_applicant(Program::Gip, "GIP-2026-0003");
    new_applicant.status = Status::Completed;
    let applicant = registry.add_applicant(&new_applicant).await?;

    let update = ApplicantUpdate {
        status: Some(Status::Pending),
        ..Default::default()
    };
    let reopened = registry.update_applicant(&applicant, &update).await?;
    assert_eq!(reopened.status, Status::Pending);

    Ok(())
}

#[tokio::test]
async fn test_gip_applicant_rejects_tupad_details() -> anyhow::Result<()> {
    let (registry, _temp_dir) = create_test_registry().await;
    let applicant = registry
        .add_applicant(&make_new_applicant(Program::Gip, "GIP-2026-0004"))
        .await?;

    let update = ApplicantUpdate {
        tupad: Some(tupad_details()),
        ..Default::default()
    };
    let result = registry.update_applicant(&applicant, &update).await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("GIP"));

    Ok(())
}

//! Integration tests for applicant CRUD operations.
//!
//! Tests cover:
//! - Adding GIP and TUPAD applicants, with derived age
//! - Querying applicants by id, by code and by program
//! - Partial updates, including clearing optional fields
//! - Deleting applicants
//! - Application code sequencing

mod common;

use applicant_registry::attachment::Attachment;
use common::*;

#[tokio::test]
async fn test_add_gip_applicant() -> anyhow::Result<()> {
    // 1. Add applicant
    let (registry, _temp_dir) = create_test_registry().await;
    let applicant = registry
        .add_applicant(&make_new_applicant(Program::Gip, "GIP-2026-0001"))
        .await?;

    // 2. Verify stored values and derived age
    assert!(applicant.id > 0);
    assert_eq!(applicant.code, "GIP-2026-0001");
    assert_eq!(applicant.program(), Program::Gip);
    assert_eq!(applicant.age, 22);
    assert_eq!(applicant.status, Status::Pending);
    assert_eq!(applicant.middle_name.as_deref(), Some("SANTOS"));
    assert_eq!(applicant.telephone_number, None);
    assert_eq!(applicant.details, ProgramDetails::Gip);
    assert_eq!(applicant.full_name(), "JUAN SANTOS DELA CRUZ");

    Ok(())
}

#[tokio::test]
async fn test_add_tupad_applicant_keeps_details() -> anyhow::Result<()> {
    let (registry, _temp_dir) = create_test_registry().await;
    let added = registry
        .add_applicant(&make_new_applicant(Program::Tupad, "TUPAD-2026-0001"))
        .await?;

    let fetched = registry
        .get_applicant_by_id(added.id)
        .await?
        .expect("applicant should exist");
    assert_eq!(fetched.program(), Program::Tupad);
    assert_eq!(fetched.details.tupad(), Some(&tupad_details()));

    // Listed only under its own program
    assert_eq!(registry.get_applicants(Program::Tupad).await?.len(), 1);
    assert!(registry.get_applicants(Program::Gip).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_attachments_are_stored_inline() -> anyhow::Result<()> {
    let (registry, _temp_dir) = create_test_registry().await;
    let mut new_applicant = make_new_applicant(Program::Gip, "GIP-2026-0002");
    new_applicant.resume = Some(Attachment::from_bytes("resume.pdf", b"%PDF-1.7"));

    let added = registry.add_applicant(&new_applicant).await?;
    let fetched = registry
        .get_applicant_by_code(Program::Gip, &added.code)
        .await?
        .expect("applicant should exist");

    let resume = fetched.resume.expect("resume should be stored");
    assert_eq!(resume.file_name, "resume.pdf");
    assert_eq!(resume.decode()?, b"%PDF-1.7");
    assert!(fetched.photo.is_none());

    Ok(())
}

#[tokio::test]
async fn test_update_applicant_fields() -> anyhow::Result<()> {
    // 1. Add applicant
    let (registry, _temp_dir) = create_test_registry().await;
    let applicant = registry
        .add_applicant(&make_new_applicant(Program::Gip, "GIP-2026-0003"))
        .await?;

    // 2. Change name, birth date and status; clear the middle name
    let update = ApplicantUpdate {
        first_name: Some("PEDRO".to_string()),
        middle_name: Some(None),
        birth_date: Some(born_years_ago(25)),
        status: Some(Status::Approved),
        ..Default::default()
    };
    let updated = registry.update_applicant(&applicant, &update).await?;

    // 3. Verify changed fields and recomputed age
    assert_eq!(updated.first_name, "PEDRO");
    assert_eq!(updated.middle_name, None);
    assert_eq!(updated.age, 25);
    assert_eq!(updated.status, Status::Approved);

    // 4. Verify identity and provenance are untouched
    assert_eq!(updated.id, applicant.id);
    assert_eq!(updated.code, applicant.code);
    assert_eq!(updated.date_submitted, applicant.date_submitted);
    assert_eq!(updated.encoder, applicant.encoder);
    assert_eq!(updated.last_name, applicant.last_name);

    Ok(())
}

#[tokio::test]
async fn test_update_tupad_details() -> anyhow::Result<()> {
    let (registry, _temp_dir) = create_test_registry().await;
    let applicant = registry
        .add_applicant(&make_new_applicant(Program::Tupad, "TUPAD-2026-0004"))
        .await?;

    let mut details = tupad_details();
    details.occupation = "FARMER".to_string();
    let update = ApplicantUpdate {
        tupad: Some(details.clone()),
        ..Default::default()
    };
    let updated = registry.update_applicant(&applicant, &update).await?;
    assert_eq!(updated.details, ProgramDetails::Tupad(details));

    Ok(())
}

#[tokio::test]
async fn test_delete_applicant() -> anyhow::Result<()> {
    let (registry, _temp_dir) = create_test_registry().await;
    let applicant = registry
        .add_applicant(&make_new_applicant(Program::Gip, "GIP-2026-0005"))
        .await?;
    let id = applicant.id;

    registry.delete_applicant(applicant).await?;

    assert!(registry.get_applicant_by_id(id).await?.is_none());
    assert!(registry.get_applicants(Program::Gip).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_next_code_follows_highest_sequence() -> anyhow::Result<()> {
    let (registry, _temp_dir) = create_test_registry().await;
    assert_eq!(registry.next_code(Program::Gip, 2025).await?, "GIP-2025-0001");

    registry
        .add_applicant(&make_new_applicant(Program::Gip, "GIP-2025-0001"))
        .await?;
    registry
        .add_applicant(&make_new_applicant(Program::Gip, "GIP-2025-0007"))
        .await?;

    assert_eq!(registry.next_code(Program::Gip, 2025).await?, "GIP-2025-0008");
    assert_eq!(registry.next_code(Program::Gip, 2026).await?, "GIP-2026-0001");
    assert_eq!(
        registry.next_code(Program::Tupad, 2025).await?,
        "TUPAD-2025-0001"
    );

    Ok(())
}

use super::*;

fn fiduciary(org: Option<OrganizationRef>) -> Identity {
    Identity {
        id: "f-1".to_owned(),
        name: "Ops".to_owned(),
        email: "ops@acme.test".to_owned(),
        kind: UserKind::Fiduciary,
        organization: org,
        age: None,
        guardian_email: None,
        avatar: None,
        phone: None,
    }
}

// =============================================================
// UserKind
// =============================================================

#[test]
fn user_kind_parses_storage_discriminators() {
    assert_eq!("user".parse::<UserKind>(), Ok(UserKind::Individual));
    assert_eq!("fiduciary".parse::<UserKind>(), Ok(UserKind::Fiduciary));
    assert_eq!("admin".parse::<UserKind>(), Err(UnknownUserKind("admin".to_owned())));
}

#[test]
fn user_kind_serializes_as_discriminator() {
    assert_eq!(serde_json::to_value(UserKind::Individual).unwrap(), serde_json::json!("user"));
    assert_eq!(UserKind::Fiduciary.to_string(), "fiduciary");
}

// =============================================================
// Onboarding completeness
// =============================================================

#[test]
fn fiduciary_without_organization_is_incomplete() {
    assert!(!fiduciary(None).is_onboarding_complete());
    assert_eq!(fiduciary(None).pending_onboarding(), Some("/onboarding/organization"));
}

#[test]
fn fiduciary_with_blank_organization_id_is_incomplete() {
    let org = OrganizationRef { id: "  ".to_owned(), name: Some("Acme".to_owned()) };
    assert!(!fiduciary(Some(org)).is_onboarding_complete());
}

#[test]
fn fiduciary_with_organization_lands_on_dashboard() {
    let org = OrganizationRef { id: "org-1".to_owned(), name: None };
    let identity = fiduciary(Some(org));
    assert!(identity.is_onboarding_complete());
    assert_eq!(identity.landing_path(), "/dashboard");
}

#[test]
fn individual_requires_positive_age() {
    let mut identity = fiduciary(None);
    identity.kind = UserKind::Individual;
    assert_eq!(identity.pending_onboarding(), Some("/onboarding/profile"));
    identity.age = Some(0);
    assert!(!identity.is_onboarding_complete());
    identity.age = Some(34);
    assert!(identity.is_onboarding_complete());
}

// =============================================================
// Snapshots and patches
// =============================================================

#[test]
fn snapshot_accepts_kind_specific_id_names() {
    let snap: IdentitySnapshot =
        serde_json::from_value(serde_json::json!({ "fiduciaryId": "f-9", "email": "x@y.test" })).unwrap();
    assert_eq!(snap.id.as_deref(), Some("f-9"));

    let snap: IdentitySnapshot = serde_json::from_value(serde_json::json!({ "userId": "u-9" })).unwrap();
    assert_eq!(snap.id.as_deref(), Some("u-9"));
}

#[test]
fn snapshot_name_falls_back_to_email() {
    let snap = IdentitySnapshot { id: Some("u-1".to_owned()), ..IdentitySnapshot::default() };
    let identity = snap.into_identity(UserKind::Individual, Some("a@b.com"));
    assert_eq!(identity.email, "a@b.com");
    assert_eq!(identity.name, "a@b.com");
}

#[test]
fn apply_patch_keeps_id_and_kind() {
    let mut identity = fiduciary(None);
    identity.apply(IdentityPatch {
        name: Some("Renamed".to_owned()),
        organization: Some(OrganizationRef { id: "org-2".to_owned(), name: None }),
        ..IdentityPatch::default()
    });
    assert_eq!(identity.name, "Renamed");
    assert_eq!(identity.id, "f-1");
    assert_eq!(identity.kind, UserKind::Fiduciary);
    assert_eq!(identity.email, "ops@acme.test");
    assert!(identity.is_onboarding_complete());
}

#[test]
fn patch_from_snapshot_drops_empty_strings() {
    let patch = IdentityPatch::from(IdentitySnapshot {
        name: Some(String::new()),
        email: Some("new@acme.test".to_owned()),
        ..IdentitySnapshot::default()
    });
    assert_eq!(patch.name, None);
    assert_eq!(patch.email.as_deref(), Some("new@acme.test"));
}

#[test]
fn login_response_prefers_nested_user() {
    let resp: LoginResponse = serde_json::from_value(serde_json::json!({
        "token": "t",
        "userId": "inline",
        "user": { "id": "nested", "email": "n@x.test" }
    }))
    .unwrap();
    assert_eq!(resp.snapshot().id.as_deref(), Some("nested"));
}

#[test]
fn login_response_reads_inline_fields() {
    let resp: LoginResponse = serde_json::from_value(serde_json::json!({
        "token": "t",
        "fiduciaryId": "f-2",
        "email": "f@x.test",
        "organization": { "id": "org-1" }
    }))
    .unwrap();
    let snap = resp.snapshot();
    assert_eq!(snap.id.as_deref(), Some("f-2"));
    assert_eq!(snap.organization.map(|o| o.id), Some("org-1".to_owned()));
}

// =============================================================
// Dashboard records
// =============================================================

#[test]
fn purpose_parses_camel_case_fields() {
    let purpose: Purpose = serde_json::from_value(serde_json::json!({
        "id": "p-1",
        "name": "Marketing",
        "description": "Newsletters",
        "legalBasis": "legitimate_interests",
        "retentionPeriod": "2 years",
        "status": "active",
        "lastUpdated": "2024-01-01"
    }))
    .unwrap();
    assert_eq!(purpose.legal_basis, LegalBasis::LegitimateInterests);
    assert_eq!(purpose.status, PurposeStatus::Active);
    assert_eq!(purpose.version, None);
}

#[test]
fn unknown_status_values_do_not_fail_the_record() {
    let dsr: DsrRequest = serde_json::from_value(serde_json::json!({
        "id": "d-1",
        "type": "erasure",
        "status": "escalated"
    }))
    .unwrap();
    assert_eq!(dsr.status, DsrStatus::Unknown);
    assert_eq!(dsr.request_type, "erasure");
}

#[test]
fn user_signup_flattens_guardian_details() {
    let signup = UserSignup {
        first_name: "Sam".to_owned(),
        last_name: "Lee".to_owned(),
        email: "sam@x.test".to_owned(),
        phone: None,
        age: 15,
        password: "password1".to_owned(),
        guardian: Some(GuardianDetails {
            guardian_name: "Pat Lee".to_owned(),
            guardian_email: "pat@x.test".to_owned(),
            relationship: "parent".to_owned(),
        }),
    };
    let value = serde_json::to_value(&signup).unwrap();
    assert_eq!(value["guardianEmail"], "pat@x.test");
    assert_eq!(value["firstName"], "Sam");
    assert!(value.get("phone").is_none());
}

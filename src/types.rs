//! Wire DTOs and session identity types.
//!
//! DESIGN
//! ======
//! Wire records mirror the backend's camelCase JSON so serde round-trips stay
//! lossless. Status enums carry an `Unknown` catch-all so one unexpected value
//! does not fail a whole list response.

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which side of the platform an account belongs to.
///
/// Determines the endpoint family (`/auth/user/*` vs `/auth/fiduciary/*`)
/// and which onboarding step is required.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserKind {
    /// A data principal (individual end-user).
    #[serde(rename = "user")]
    Individual,
    /// An organization representative managing consent obligations.
    #[serde(rename = "fiduciary")]
    Fiduciary,
}

impl UserKind {
    /// Discriminator used in URLs and persisted storage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "user",
            Self::Fiduciary => "fiduciary",
        }
    }
}

impl fmt::Display for UserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a discriminator that is neither `"user"` nor `"fiduciary"`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown user kind: {0}")]
pub struct UnknownUserKind(pub String);

impl FromStr for UserKind {
    type Err = UnknownUserKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::Individual),
            "fiduciary" => Ok(Self::Fiduciary),
            other => Err(UnknownUserKind(other.to_owned())),
        }
    }
}

/// Organization link carried on a fiduciary identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRef {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// The signed-in account as held by the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub kind: UserKind,
    pub organization: Option<OrganizationRef>,
    pub age: Option<u32>,
    pub guardian_email: Option<String>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
}

impl Identity {
    /// Whether the backend still requires an onboarding step for this account.
    #[must_use]
    pub fn is_onboarding_complete(&self) -> bool {
        match self.kind {
            UserKind::Fiduciary => self.organization.as_ref().is_some_and(|org| !org.id.trim().is_empty()),
            UserKind::Individual => self.age.is_some_and(|age| age > 0),
        }
    }

    /// Onboarding route this identity must visit, or `None` when complete.
    #[must_use]
    pub fn pending_onboarding(&self) -> Option<&'static str> {
        if self.is_onboarding_complete() {
            return None;
        }
        Some(crate::guard::onboarding_path(self.kind))
    }

    /// Where to land after sign-in.
    #[must_use]
    pub fn landing_path(&self) -> &'static str {
        self.pending_onboarding().unwrap_or(crate::guard::paths::DASHBOARD)
    }

    /// Merge a partial update. `id` and `kind` are never touched.
    pub fn apply(&mut self, patch: IdentityPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(organization) = patch.organization {
            self.organization = Some(organization);
        }
        if let Some(age) = patch.age {
            self.age = Some(age);
        }
        if let Some(guardian_email) = patch.guardian_email {
            self.guardian_email = Some(guardian_email);
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = Some(avatar);
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
        }
    }
}

/// Identity fields as returned by `me`, profile and login endpoints.
///
/// Every field is optional; the backend names the id differently per kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySnapshot {
    #[serde(default, alias = "userId", alias = "fiduciaryId")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub organization: Option<OrganizationRef>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub guardian_email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl IdentitySnapshot {
    /// Build a full identity. A missing name falls back to the email address.
    #[must_use]
    pub fn into_identity(self, kind: UserKind, fallback_email: Option<&str>) -> Identity {
        let email = self
            .email
            .filter(|e| !e.is_empty())
            .or_else(|| fallback_email.map(str::to_owned))
            .unwrap_or_default();
        let name = self.name.filter(|n| !n.is_empty()).unwrap_or_else(|| email.clone());
        Identity {
            id: self.id.unwrap_or_default(),
            name,
            email,
            kind,
            organization: self.organization,
            age: self.age,
            guardian_email: self.guardian_email,
            avatar: self.avatar,
            phone: self.phone,
        }
    }
}

/// Partial identity update merged after a profile edit or refresh.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdentityPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub organization: Option<OrganizationRef>,
    pub age: Option<u32>,
    pub guardian_email: Option<String>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
}

impl From<IdentitySnapshot> for IdentityPatch {
    fn from(snapshot: IdentitySnapshot) -> Self {
        Self {
            name: snapshot.name.filter(|n| !n.is_empty()),
            email: snapshot.email.filter(|e| !e.is_empty()),
            organization: snapshot.organization,
            age: snapshot.age,
            guardian_email: snapshot.guardian_email,
            avatar: snapshot.avatar,
            phone: snapshot.phone,
        }
    }
}

// =============================================================
// Auth payloads
// =============================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response. The identity arrives either nested under `user` or inline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub user: Option<IdentitySnapshot>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub fiduciary_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub organization: Option<OrganizationRef>,
    #[serde(default)]
    pub age: Option<u32>,
}

impl LoginResponse {
    /// The identity snapshot, preferring the nested `user` object.
    #[must_use]
    pub fn snapshot(self) -> IdentitySnapshot {
        if let Some(user) = self.user {
            return user;
        }
        IdentitySnapshot {
            id: self.user_id.or(self.fiduciary_id).or(self.id),
            name: self.name,
            email: self.email,
            organization: self.organization,
            age: self.age,
            ..IdentitySnapshot::default()
        }
    }
}

/// Guardian details required when an individual signs up under 18.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardianDetails {
    pub guardian_name: String,
    pub guardian_email: String,
    pub relationship: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSignup {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub age: u32,
    pub password: String,
    #[serde(flatten)]
    pub guardian: Option<GuardianDetails>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FiduciarySignup {
    pub organization_name: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationOnboarding {
    pub organization_name: String,
    pub industry: String,
    pub company_size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub address: String,
    pub country: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOnboarding {
    pub age: u32,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

// =============================================================
// Fiduciary dashboard records
// =============================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalBasis {
    Consent,
    Contract,
    LegalObligation,
    VitalInterests,
    PublicTask,
    LegitimateInterests,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurposeStatus {
    Active,
    Inactive,
    Draft,
    Archived,
    #[serde(other)]
    Unknown,
}

/// A processing purpose that consent can be requested for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purpose {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub legal_basis: LegalBasis,
    #[serde(default)]
    pub retention_period: String,
    pub status: PurposeStatus,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub last_updated: String,
}

/// Create/update body for a purpose.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurposeInput {
    pub name: String,
    pub description: String,
    pub legal_basis: LegalBasis,
    pub retention_period: String,
    pub status: PurposeStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentFormStatus {
    Published,
    Draft,
    Archived,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentForm {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub purpose_ids: Vec<String>,
    #[serde(default)]
    pub version: String,
    pub status: ConsentFormStatus,
    #[serde(default)]
    pub last_updated: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentFormInput {
    pub name: String,
    pub purpose_ids: Vec<String>,
    pub status: ConsentFormStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DsrStatus {
    Pending,
    Processing,
    Completed,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl DsrStatus {
    /// Path segment used by the status-transition endpoint.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
            Self::Unknown => "unknown",
        }
    }
}

/// A data subject request (access, erasure, rectification, portability).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsrRequest {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(rename = "type", default)]
    pub request_type: String,
    pub status: DsrStatus,
    #[serde(default)]
    pub date_submitted: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DsrStatusNote {
    pub note: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrievanceStatus {
    Pending,
    Investigating,
    Resolved,
    Closed,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grievance {
    pub id: String,
    #[serde(default)]
    pub subject_id: String,
    #[serde(rename = "type", default)]
    pub grievance_type: String,
    pub status: GrievanceStatus,
    #[serde(default)]
    pub date_submitted: String,
    #[serde(default)]
    pub date_resolved: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GrievanceUpdate {
    pub status: GrievanceStatus,
    pub resolution: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: String,
    pub action: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub resource_id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub details: String,
}

//! Typed client for the consent backend.
//!
//! Builds prefixed endpoint paths, attaches the bearer token and classifies
//! responses into [`ApiError`]. List endpoints return plain JSON arrays;
//! mutations return nothing useful, so callers re-fetch after success.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};
use crate::types::{
    AuditLog, ConsentForm, ConsentFormInput, DsrRequest, DsrStatus, DsrStatusNote, FiduciarySignup,
    ForgotPasswordRequest, Grievance, GrievanceUpdate, IdentitySnapshot, LoginRequest, LoginResponse,
    OrganizationOnboarding, PasswordChange, ProfileOnboarding, ProfileUpdate, Purpose, PurposeInput,
    ResetPasswordRequest, UserKind, UserSignup,
};

// =============================================================
// Endpoint paths (relative to the API prefix)
// =============================================================

pub fn auth_endpoint(kind: UserKind, action: &str) -> String {
    format!("/auth/{}/{action}", kind.as_str())
}

pub fn profile_endpoint(kind: UserKind) -> String {
    format!("/{}/profile", kind.as_str())
}

pub fn fiduciary_endpoint(resource: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("/fiduciary/{resource}/{}", encode_segment(id)),
        None => format!("/fiduciary/{resource}"),
    }
}

pub fn dsr_transition_endpoint(id: &str, status: DsrStatus) -> String {
    format!("/fiduciary/dsr/{}/{}", encode_segment(id), status.as_str())
}

/// Percent-encode a single path segment.
fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes()).collect::<String>().replace('+', "%20")
}

/// Extract the human-readable message from an error payload (`error` or `message`).
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .into_iter()
        .filter_map(|field| value.get(field).and_then(Value::as_str))
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_owned)
}

/// Map a raw response to its body text or a classified error.
pub fn classify(response: ApiResponse) -> Result<String, ApiError> {
    if response.is_success() {
        return Ok(response.body);
    }
    let message = error_message(&response.body);
    if response.status == 401 {
        return Err(ApiError::Unauthorized { message });
    }
    Err(ApiError::Http { status: response.status, message })
}

fn decode<R: DeserializeOwned>(body: &str) -> Result<R, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}

fn encode<B: Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Serialization(e.to_string()))
}

pub struct ApiClient<T> {
    transport: T,
    prefix: String,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, config: &ApiConfig) -> Self {
        Self { transport, prefix: config.api_prefix.clone() }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Full request path for an endpoint.
    pub fn path(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.prefix)
    }

    async fn send(&self, request: ApiRequest) -> Result<String, ApiError> {
        let method = request.method;
        let path = request.path.clone();
        let result = self.transport.send(request).await.and_then(classify);
        if let Err(e) = &result {
            log::debug!("api: {} {path} failed: {e}", method.as_str());
        }
        result
    }

    async fn fetch<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let body = self.send(request).await?;
        decode(&body)
    }

    async fn execute(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }

    fn request(&self, method: Method, endpoint: &str, token: Option<&str>) -> ApiRequest {
        ApiRequest::new(method, self.path(endpoint)).bearer(token)
    }

    fn request_with<B: Serialize>(
        &self,
        method: Method,
        endpoint: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<ApiRequest, ApiError> {
        Ok(self.request(method, endpoint, token).json(encode(body)?))
    }

    // =============================================================
    // Auth
    // =============================================================

    pub async fn login(&self, kind: UserKind, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let request = self.request_with(Method::Post, &auth_endpoint(kind, "login"), None, credentials)?;
        self.fetch(request).await
    }

    pub async fn logout(&self, kind: UserKind, token: &str) -> Result<(), ApiError> {
        self.execute(self.request(Method::Post, &auth_endpoint(kind, "logout"), Some(token))).await
    }

    /// Current identity for `token`.
    pub async fn me(&self, kind: UserKind, token: &str) -> Result<IdentitySnapshot, ApiError> {
        self.fetch(self.request(Method::Get, &auth_endpoint(kind, "me"), Some(token))).await
    }

    pub async fn signup_user(&self, signup: &UserSignup) -> Result<(), ApiError> {
        let endpoint = auth_endpoint(UserKind::Individual, "signup");
        self.execute(self.request_with(Method::Post, &endpoint, None, signup)?).await
    }

    pub async fn signup_fiduciary(&self, signup: &FiduciarySignup) -> Result<(), ApiError> {
        let endpoint = auth_endpoint(UserKind::Fiduciary, "signup");
        self.execute(self.request_with(Method::Post, &endpoint, None, signup)?).await
    }

    pub async fn onboard_organization(&self, token: &str, form: &OrganizationOnboarding) -> Result<(), ApiError> {
        let endpoint = auth_endpoint(UserKind::Fiduciary, "onboarding");
        self.execute(self.request_with(Method::Post, &endpoint, Some(token), form)?).await
    }

    pub async fn onboard_profile(&self, token: &str, form: &ProfileOnboarding) -> Result<(), ApiError> {
        let endpoint = auth_endpoint(UserKind::Individual, "onboarding");
        self.execute(self.request_with(Method::Post, &endpoint, Some(token), form)?).await
    }

    pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<(), ApiError> {
        self.execute(self.request_with(Method::Post, "/auth/forgot-password", None, request)?).await
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), ApiError> {
        self.execute(self.request_with(Method::Post, "/auth/reset-password", None, request)?).await
    }

    pub async fn change_password(&self, token: &str, change: &PasswordChange) -> Result<(), ApiError> {
        self.execute(self.request_with(Method::Put, "/auth/password", Some(token), change)?).await
    }

    // =============================================================
    // Profile
    // =============================================================

    /// Save profile fields. Returns the server's view of the identity when it sends one.
    pub async fn update_profile(
        &self,
        kind: UserKind,
        token: &str,
        update: &ProfileUpdate,
    ) -> Result<Option<IdentitySnapshot>, ApiError> {
        let request = self.request_with(Method::Put, &profile_endpoint(kind), Some(token), update)?;
        let body = self.send(request).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        decode(&body).map(Some)
    }

    // =============================================================
    // Purposes
    // =============================================================

    pub async fn list_purposes(&self, token: &str) -> Result<Vec<Purpose>, ApiError> {
        self.fetch(self.request(Method::Get, &fiduciary_endpoint("purposes", None), Some(token))).await
    }

    pub async fn create_purpose(&self, token: &str, input: &PurposeInput) -> Result<(), ApiError> {
        let endpoint = fiduciary_endpoint("purposes", None);
        self.execute(self.request_with(Method::Post, &endpoint, Some(token), input)?).await
    }

    pub async fn update_purpose(&self, token: &str, id: &str, input: &PurposeInput) -> Result<(), ApiError> {
        let endpoint = fiduciary_endpoint("purposes", Some(id));
        self.execute(self.request_with(Method::Put, &endpoint, Some(token), input)?).await
    }

    pub async fn delete_purpose(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let endpoint = fiduciary_endpoint("purposes", Some(id));
        self.execute(self.request(Method::Delete, &endpoint, Some(token))).await
    }

    // =============================================================
    // Consent forms
    // =============================================================

    pub async fn list_consent_forms(&self, token: &str) -> Result<Vec<ConsentForm>, ApiError> {
        self.fetch(self.request(Method::Get, &fiduciary_endpoint("consent-forms", None), Some(token))).await
    }

    pub async fn get_consent_form(&self, token: &str, id: &str) -> Result<ConsentForm, ApiError> {
        self.fetch(self.request(Method::Get, &fiduciary_endpoint("consent-forms", Some(id)), Some(token))).await
    }

    pub async fn create_consent_form(&self, token: &str, input: &ConsentFormInput) -> Result<(), ApiError> {
        let endpoint = fiduciary_endpoint("consent-forms", None);
        self.execute(self.request_with(Method::Post, &endpoint, Some(token), input)?).await
    }

    pub async fn update_consent_form(&self, token: &str, id: &str, input: &ConsentFormInput) -> Result<(), ApiError> {
        let endpoint = fiduciary_endpoint("consent-forms", Some(id));
        self.execute(self.request_with(Method::Put, &endpoint, Some(token), input)?).await
    }

    pub async fn delete_consent_form(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let endpoint = fiduciary_endpoint("consent-forms", Some(id));
        self.execute(self.request(Method::Delete, &endpoint, Some(token))).await
    }

    // =============================================================
    // DSR, grievances, audit
    // =============================================================

    pub async fn list_dsr_requests(&self, token: &str) -> Result<Vec<DsrRequest>, ApiError> {
        self.fetch(self.request(Method::Get, &fiduciary_endpoint("dsr", None), Some(token))).await
    }

    pub async fn transition_dsr(
        &self,
        token: &str,
        id: &str,
        status: DsrStatus,
        note: &DsrStatusNote,
    ) -> Result<(), ApiError> {
        let endpoint = dsr_transition_endpoint(id, status);
        self.execute(self.request_with(Method::Post, &endpoint, Some(token), note)?).await
    }

    pub async fn list_grievances(&self, token: &str) -> Result<Vec<Grievance>, ApiError> {
        self.fetch(self.request(Method::Get, &fiduciary_endpoint("grievances", None), Some(token))).await
    }

    pub async fn update_grievance(&self, token: &str, id: &str, update: &GrievanceUpdate) -> Result<(), ApiError> {
        let endpoint = fiduciary_endpoint("grievances", Some(id));
        self.execute(self.request_with(Method::Put, &endpoint, Some(token), update)?).await
    }

    pub async fn list_audit_logs(&self, token: &str) -> Result<Vec<AuditLog>, ApiError> {
        self.fetch(self.request(Method::Get, &fiduciary_endpoint("audit-logs", None), Some(token))).await
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

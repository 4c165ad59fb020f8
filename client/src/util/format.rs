//! Display labels and badge classes for dashboard records.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use portal::types::{ConsentFormStatus, DsrStatus, GrievanceStatus, LegalBasis, PurposeStatus};

pub fn legal_basis_label(basis: LegalBasis) -> &'static str {
    match basis {
        LegalBasis::Consent => "Consent",
        LegalBasis::Contract => "Contract",
        LegalBasis::LegalObligation => "Legal obligation",
        LegalBasis::VitalInterests => "Vital interests",
        LegalBasis::PublicTask => "Public task",
        LegalBasis::LegitimateInterests => "Legitimate interests",
        LegalBasis::Unknown => "Unknown",
    }
}

/// Every selectable legal basis, in form order.
pub const LEGAL_BASES: [LegalBasis; 6] = [
    LegalBasis::Consent,
    LegalBasis::Contract,
    LegalBasis::LegalObligation,
    LegalBasis::VitalInterests,
    LegalBasis::PublicTask,
    LegalBasis::LegitimateInterests,
];

/// Inverse of the `<select>` value written by the purpose form.
pub fn parse_legal_basis(value: &str) -> LegalBasis {
    serde_json::from_value(serde_json::Value::String(value.to_owned())).unwrap_or(LegalBasis::Unknown)
}

/// Wire value of a legal basis, used as the `<option>` value.
pub fn legal_basis_value(basis: LegalBasis) -> String {
    serde_json::to_value(basis).ok().and_then(|v| v.as_str().map(str::to_owned)).unwrap_or_default()
}

pub fn purpose_status_label(status: PurposeStatus) -> &'static str {
    match status {
        PurposeStatus::Active => "Active",
        PurposeStatus::Inactive => "Inactive",
        PurposeStatus::Draft => "Draft",
        PurposeStatus::Archived => "Archived",
        PurposeStatus::Unknown => "Unknown",
    }
}

pub fn consent_form_status_label(status: ConsentFormStatus) -> &'static str {
    match status {
        ConsentFormStatus::Published => "Published",
        ConsentFormStatus::Draft => "Draft",
        ConsentFormStatus::Archived => "Archived",
        ConsentFormStatus::Unknown => "Unknown",
    }
}

pub fn dsr_status_label(status: DsrStatus) -> &'static str {
    match status {
        DsrStatus::Pending => "Pending",
        DsrStatus::Processing => "Processing",
        DsrStatus::Completed => "Completed",
        DsrStatus::Rejected => "Rejected",
        DsrStatus::Unknown => "Unknown",
    }
}

/// Status transitions offered for a request in `status`.
pub fn dsr_next_statuses(status: DsrStatus) -> &'static [DsrStatus] {
    match status {
        DsrStatus::Pending => &[DsrStatus::Processing, DsrStatus::Rejected],
        DsrStatus::Processing => &[DsrStatus::Completed, DsrStatus::Rejected],
        DsrStatus::Completed | DsrStatus::Rejected | DsrStatus::Unknown => &[],
    }
}

pub fn grievance_status_label(status: GrievanceStatus) -> &'static str {
    match status {
        GrievanceStatus::Pending => "Pending",
        GrievanceStatus::Investigating => "Investigating",
        GrievanceStatus::Resolved => "Resolved",
        GrievanceStatus::Closed => "Closed",
        GrievanceStatus::Unknown => "Unknown",
    }
}

/// Badge class by tone: green for settled-positive, amber for in-flight, red for negative.
pub fn badge_class(label: &str) -> &'static str {
    match label {
        "Active" | "Published" | "Completed" | "Resolved" => "badge badge--success",
        "Pending" | "Processing" | "Investigating" | "Draft" => "badge badge--warning",
        "Rejected" | "Inactive" => "badge badge--danger",
        _ => "badge",
    }
}

/// Date part of an ISO-8601 timestamp (`2024-05-01T10:00:00Z` -> `2024-05-01`).
pub fn short_date(timestamp: &str) -> &str {
    timestamp.split_once('T').map_or(timestamp, |(date, _)| date)
}

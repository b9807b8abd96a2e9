//! Logical profile fields and the static table of HTML `name`/`id` values each
//! one is looked up under.

use serde::{Deserialize, Serialize};

/// An abstract profile attribute, independent of how any given page names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogicalField {
    FullName,
    FirstName,
    LastName,
    Email,
    Phone,
    AddressLine1,
    City,
    State,
    ZipCode,
    Institution,
    Skills,
    JobLevels,
    Locations,
}

/// Candidate attribute values per logical field, in lookup order.
/// Population order follows the table order.
pub const FIELD_MAPPING: &[(LogicalField, &[&str])] = &[
    (
        LogicalField::FullName,
        &["name", "fullName", "full_name", "applicant_name"],
    ),
    (
        LogicalField::FirstName,
        &["firstName", "first_name", "fname", "given_name"],
    ),
    (
        LogicalField::LastName,
        &["lastName", "last_name", "lname", "family_name"],
    ),
    (
        LogicalField::Email,
        &["email", "emailAddress", "email_address"],
    ),
    (
        LogicalField::Phone,
        &["phone", "phone_number", "phoneNumber", "mobile", "tel"],
    ),
    (
        LogicalField::AddressLine1,
        &["address", "address1", "addressLine1", "address_line1", "street"],
    ),
    (LogicalField::City, &["city", "town"]),
    (LogicalField::State, &["state", "province", "region"]),
    (
        LogicalField::ZipCode,
        &["zip", "zipCode", "zip_code", "postal", "postalCode", "postal_code"],
    ),
    (
        LogicalField::Institution,
        &["institution", "school", "university", "college"],
    ),
    (LogicalField::Skills, &["skills"]),
    (
        LogicalField::JobLevels,
        &["job_levels", "jobLevel", "job_level", "seniority"],
    ),
    (
        LogicalField::Locations,
        &["locations", "location", "preferredLocations", "preferred_locations"],
    ),
];

impl LogicalField {
    /// Whether an empty value is still written to the page.
    /// Only `lastName` qualifies, so single-word names clear a stale last name.
    pub fn allows_empty(self) -> bool {
        matches!(self, LogicalField::LastName)
    }
}

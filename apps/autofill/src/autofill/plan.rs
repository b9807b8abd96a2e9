//! Fill plan: the pure half of autofill.
//!
//! Turns a `Profile` into an ordered list of (candidate attributes, value)
//! instructions without looking at any document. Which events fire depends on
//! the element each instruction lands on, so that is decided in `apply`.

use serde::Serialize;

use crate::autofill::address::{decompose_address, AddressParts};
use crate::autofill::field_mapping::{LogicalField, FIELD_MAPPING};
use crate::autofill::name::{split_full_name, NameParts};
use crate::models::Profile;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// The string written into a control. Lists are joined with ", ".
    pub fn render(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::List(items) => items.join(", "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillInstruction {
    pub field: LogicalField,
    pub candidates: &'static [&'static str],
    pub value: FieldValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FillPlan {
    pub name: Option<NameParts>,
    pub address: Option<AddressParts>,
    pub instructions: Vec<FillInstruction>,
    /// Assigned positionally to `skill*` inputs after the generic pass.
    pub skills: Vec<String>,
}

impl FillPlan {
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty() && self.skills.is_empty()
    }
}

pub fn build_plan(profile: &Profile) -> FillPlan {
    let full_name = non_empty(profile.full_name.as_deref());
    let name = full_name.map(split_full_name);
    let address = non_empty(profile.address.as_deref())
        .map(decompose_address)
        .filter(|parts| *parts != AddressParts::default());
    let skills = non_empty_list(profile.skills.as_deref());

    let mut instructions = Vec::new();

    for &(field, candidates) in FIELD_MAPPING {
        let value = match field {
            LogicalField::FullName => full_name.map(text),
            LogicalField::FirstName => name.as_ref().map(|n| text(&n.first_name)),
            LogicalField::LastName => name.as_ref().map(|n| text(&n.last_name)),
            LogicalField::Email => profile.email.as_deref().map(text),
            LogicalField::Phone => profile.phone_number.as_deref().map(text),
            LogicalField::AddressLine1 => address.as_ref().map(|a| text(&a.address_line1)),
            LogicalField::City => address.as_ref().map(|a| text(&a.city)),
            LogicalField::State => address.as_ref().map(|a| text(&a.state)),
            LogicalField::ZipCode => address.as_ref().map(|a| text(&a.zip_code)),
            LogicalField::Institution => profile.institution.as_deref().map(text),
            LogicalField::Skills => skills.clone().map(FieldValue::List),
            LogicalField::JobLevels => {
                non_empty_list(profile.job_levels.as_deref()).map(FieldValue::List)
            }
            LogicalField::Locations => {
                non_empty_list(profile.locations.as_deref()).map(FieldValue::List)
            }
        };

        let Some(value) = value else { continue };
        if value.render().is_empty() && !field.allows_empty() {
            continue;
        }

        instructions.push(FillInstruction {
            field,
            candidates,
            value,
        });
    }

    FillPlan {
        name,
        address,
        instructions,
        skills: skills.unwrap_or_default(),
    }
}

fn text(value: &str) -> FieldValue {
    FieldValue::Text(value.to_string())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_empty_list(items: Option<&[String]>) -> Option<Vec<String>> {
    items.filter(|items| !items.is_empty()).map(<[String]>::to_vec)
}

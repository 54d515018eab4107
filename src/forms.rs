//! Profile edit form state and validation.

use std::collections::BTreeMap;

use crate::service::types::{Profile, ProfilePatch};
use crate::validation::{validate_form, FieldRule, FormValidation, Rule};

/// One editable profile field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
  pub key: &'static str,
  pub label: &'static str,
  pub required: bool,
}

const fn field(key: &'static str, label: &'static str, required: bool) -> FormField {
  FormField {
    key,
    label,
    required,
  }
}

/// Fields in display order
pub const FIELDS: &[FormField] = &[
  field("name", "Full Name", true),
  field("title", "Job Title", true),
  field("email", "Email", true),
  field("phone", "Phone", true),
  field("location", "Location", true),
  field("experience", "Experience", false),
  field("education", "Education", false),
  field("bio", "Bio", false),
];

const BIO_LIMIT: usize = 500;

fn rules() -> Vec<(&'static str, Vec<FieldRule>)> {
  const EMAIL: &str = "Please enter a valid email address";
  const PHONE: &str = "Please enter a valid phone number";

  vec![
    (
      "name",
      vec![
        Rule::Required.message("Full name is required"),
        Rule::MinLength(2).message("Full name must be at least 2 characters"),
      ],
    ),
    ("title", vec![Rule::Required.message("Job title is required")]),
    (
      "email",
      vec![Rule::Required.message(EMAIL), Rule::Email.message(EMAIL)],
    ),
    (
      "phone",
      vec![Rule::Required.message(PHONE), Rule::Phone.message(PHONE)],
    ),
    ("location", vec![Rule::Required.message("Location is required")]),
    (
      "bio",
      vec![Rule::MaxLength(BIO_LIMIT).message("Bio must be 500 characters or fewer")],
    ),
  ]
}

/// Working copy of a profile being edited
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
  values: BTreeMap<String, String>,
}

impl ProfileForm {
  pub fn from_profile(profile: &Profile) -> Self {
    let values = [
      ("name", &profile.name),
      ("title", &profile.title),
      ("email", &profile.email),
      ("phone", &profile.phone),
      ("location", &profile.location),
      ("experience", &profile.experience),
      ("education", &profile.education),
      ("bio", &profile.bio),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.clone()))
    .collect();

    Self { values }
  }

  pub fn value(&self, key: &str) -> &str {
    self.values.get(key).map(String::as_str).unwrap_or("")
  }

  pub fn set(&mut self, key: &str, value: impl Into<String>) {
    self.values.insert(key.to_string(), value.into());
  }

  pub fn validate(&self) -> FormValidation {
    validate_form(&rules(), &self.values)
  }

  /// First message for `key`, if its current value is invalid
  pub fn field_error(&self, key: &str) -> Option<String> {
    self.validate().first_error(key).map(str::to_string)
  }

  /// Save is only offered for a valid form
  pub fn is_valid(&self) -> bool {
    self.validate().is_valid
  }

  /// Every field, as a patch over the stored profile
  pub fn to_patch(&self) -> ProfilePatch {
    let take = |key: &str| Some(self.value(key).to_string());

    ProfilePatch {
      name: take("name"),
      title: take("title"),
      email: take("email"),
      phone: take("phone"),
      location: take("location"),
      experience: take("experience"),
      education: take("education"),
      bio: take("bio"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::service::data;

  #[test]
  fn test_seed_profile_is_valid() {
    let form = ProfileForm::from_profile(&data::profile());
    assert!(form.is_valid());
    assert_eq!(form.value("name"), data::profile().name);
  }

  #[test]
  fn test_field_errors_use_form_messages() {
    let mut form = ProfileForm::from_profile(&data::profile());
    form.set("name", "  ");
    form.set("email", "user@.com");
    form.set("phone", "");

    assert!(!form.is_valid());
    assert_eq!(
      form.field_error("name").as_deref(),
      Some("Full name is required")
    );
    assert_eq!(
      form.field_error("email").as_deref(),
      Some("Please enter a valid email address")
    );
    assert_eq!(
      form.field_error("phone").as_deref(),
      Some("Please enter a valid phone number")
    );
    assert_eq!(form.field_error("bio"), None);
  }

  #[test]
  fn test_length_limits() {
    let mut form = ProfileForm::from_profile(&data::profile());
    form.set("name", "A");
    form.set("bio", "x".repeat(BIO_LIMIT + 1));

    assert_eq!(
      form.field_error("name").as_deref(),
      Some("Full name must be at least 2 characters")
    );
    assert_eq!(
      form.field_error("bio").as_deref(),
      Some("Bio must be 500 characters or fewer")
    );

    form.set("bio", "x".repeat(BIO_LIMIT));
    assert_eq!(form.field_error("bio"), None);
  }

  #[test]
  fn test_optional_fields_may_be_empty() {
    let mut form = ProfileForm::from_profile(&data::profile());
    form.set("education", "");
    form.set("bio", "");
    assert!(form.is_valid());
  }

  #[test]
  fn test_patch_round_trips_through_merge() {
    let mut form = ProfileForm::from_profile(&data::profile());
    form.set("title", "Staff Engineer");

    let merged = form.to_patch().merge_into(&data::profile());
    assert_eq!(merged.title, "Staff Engineer");
    assert_eq!(merged.email, data::profile().email);
  }
}

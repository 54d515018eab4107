//! Field validators and a small rule-based form checker.

use std::collections::BTreeMap;

/// Email address check: alphanumeric-bounded local part, dot-separated
/// hostname labels, no consecutive or edge dots.
pub fn is_valid_email(email: &str) -> bool {
  if email.is_empty() || email.contains("..") || email.starts_with('.') || email.ends_with('.') {
    return false;
  }

  let Some((local, domain)) = email.split_once('@') else {
    return false;
  };

  is_bounded_word(local, |c| matches!(c, '.' | '_' | '+' | '-'))
    && domain
      .split('.')
      .all(|label| is_bounded_word(label, |c| c == '-'))
}

/// Non-empty run of ASCII alphanumerics plus `inner` characters, starting and
/// ending with an alphanumeric.
fn is_bounded_word(word: &str, inner: impl Fn(char) -> bool) -> bool {
  let (Some(first), Some(last)) = (word.chars().next(), word.chars().last()) else {
    return false;
  };

  first.is_ascii_alphanumeric()
    && last.is_ascii_alphanumeric()
    && word.chars().all(|c| c.is_ascii_alphanumeric() || inner(c))
}

/// North-American phone number: ten digits, optionally prefixed by `1` and/or
/// `+`, with spaces, dashes and parentheses ignored.
pub fn is_valid_phone(phone: &str) -> bool {
  let digit_count = phone.chars().filter(char::is_ascii_digit).count();
  if !(10..=11).contains(&digit_count) {
    return false;
  }

  let cleaned: String = phone
    .chars()
    .filter(|c| !c.is_whitespace() && !matches!(c, '(' | ')' | '-'))
    .collect();
  let number = cleaned.strip_prefix('+').unwrap_or(&cleaned);
  let number = match number.len() {
    11 => match number.strip_prefix('1') {
      Some(rest) => rest,
      None => return false,
    },
    _ => number,
  };

  number.len() == 10 && number.chars().all(|c| c.is_ascii_digit())
}

/// Value is present once surrounding whitespace is removed
pub fn is_required(value: &str) -> bool {
  !value.trim().is_empty()
}

pub fn has_min_length(value: &str, min_length: usize) -> bool {
  !value.is_empty() && value.chars().count() >= min_length
}

/// Empty values always pass
pub fn has_max_length(value: &str, max_length: usize) -> bool {
  value.chars().count() <= max_length
}

/// Absolute URL with a scheme and, for hierarchical schemes, a host
pub fn is_valid_url(value: &str) -> bool {
  !value.is_empty() && url::Url::parse(value).is_ok()
}

pub fn is_valid_number(value: &str) -> bool {
  parse_number(value).is_some()
}

/// Numeric value within `[min, max]`
pub fn is_in_range(value: &str, min: f64, max: f64) -> bool {
  parse_number(value).is_some_and(|n| n >= min && n <= max)
}

/// Finite decimal, or the literal `Infinity`; `inf` and `NaN` are not numbers
fn parse_number(value: &str) -> Option<f64> {
  let value = value.trim();
  let spelled_out = value.trim_start_matches(['+', '-']) == "Infinity";
  value
    .parse::<f64>()
    .ok()
    .filter(|n| n.is_finite() || (spelled_out && n.is_infinite()))
}

/// A single check applied to a form field
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
  Required,
  Email,
  Phone,
  MinLength(usize),
  MaxLength(usize),
  Url,
}

/// A rule plus an optional custom message
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
  pub rule: Rule,
  pub message: Option<String>,
}

impl From<Rule> for FieldRule {
  fn from(rule: Rule) -> Self {
    Self { rule, message: None }
  }
}

impl Rule {
  pub fn message(self, message: impl Into<String>) -> FieldRule {
    FieldRule {
      rule: self,
      message: Some(message.into()),
    }
  }
}

impl FieldRule {
  /// Error message when `value` violates this rule.
  ///
  /// Only `Required` looks at empty values; every other rule skips them.
  fn check(&self, field: &str, value: &str) -> Option<String> {
    let failed_default = match &self.rule {
      Rule::Required if !is_required(value) => Some(format!("{} is required", field)),
      Rule::Required => None,
      _ if value.is_empty() => None,
      Rule::Email if !is_valid_email(value) => Some("Please enter a valid email".to_string()),
      Rule::Phone if !is_valid_phone(value) => {
        Some("Please enter a valid phone number".to_string())
      }
      Rule::MinLength(n) if !has_min_length(value, *n) => {
        Some(format!("Minimum length is {} characters", n))
      }
      Rule::MaxLength(n) if !has_max_length(value, *n) => {
        Some(format!("Maximum length is {} characters", n))
      }
      Rule::Url if !is_valid_url(value) => Some("Please enter a valid URL".to_string()),
      _ => None,
    };

    failed_default.map(|default| self.message.clone().unwrap_or(default))
  }
}

/// Outcome of [`validate_form`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValidation {
  /// Messages per failing field, in rule order
  pub errors: BTreeMap<String, Vec<String>>,
  pub is_valid: bool,
}

impl FormValidation {
  pub fn first_error(&self, field: &str) -> Option<&str> {
    self
      .errors
      .get(field)
      .and_then(|messages| messages.first())
      .map(String::as_str)
  }
}

/// Check every field against its rules. Missing values count as empty.
pub fn validate_form(
  rules: &[(&str, Vec<FieldRule>)],
  values: &BTreeMap<String, String>,
) -> FormValidation {
  let mut errors = BTreeMap::new();

  for (field, field_rules) in rules {
    let value = values.get(*field).map(String::as_str).unwrap_or("");
    let messages: Vec<String> = field_rules
      .iter()
      .filter_map(|rule| rule.check(field, value))
      .collect();

    if !messages.is_empty() {
      errors.insert(field.to_string(), messages);
    }
  }

  FormValidation {
    is_valid: errors.is_empty(),
    errors,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect()
  }

  #[test]
  fn test_valid_emails() {
    assert!(is_valid_email("user@example.com"));
    assert!(is_valid_email("test.user@company.co.uk"));
    assert!(is_valid_email("user+tag@example.org"));
    assert!(is_valid_email("user123@test-domain.com"));
  }

  #[test]
  fn test_invalid_emails() {
    assert!(!is_valid_email("invalid-email"));
    assert!(!is_valid_email("user@"));
    assert!(!is_valid_email("@example.com"));
    assert!(!is_valid_email("user@.com"));
    assert!(!is_valid_email("user..name@example.com"));
    assert!(!is_valid_email("user@exa@mple.com"));
    assert!(!is_valid_email(""));
  }

  #[test]
  fn test_valid_phones() {
    assert!(is_valid_phone("1234567890"));
    assert!(is_valid_phone("12345678901"));
    assert!(is_valid_phone("+1 (555) 123-4567"));
    assert!(is_valid_phone("555-123-4567"));
    assert!(is_valid_phone("(555) 123-4567"));
  }

  #[test]
  fn test_invalid_phones() {
    assert!(!is_valid_phone("123"));
    assert!(!is_valid_phone("123456789"));
    assert!(!is_valid_phone("123456789012"));
    assert!(!is_valid_phone("abcd123456"));
    assert!(!is_valid_phone("22345678901"));
    assert!(!is_valid_phone(""));
  }

  #[test]
  fn test_required_and_lengths() {
    assert!(is_required("  hello  "));
    assert!(!is_required("   "));
    assert!(has_min_length("hello", 5));
    assert!(!has_min_length("hi", 3));
    assert!(!has_min_length("", 1));
    assert!(has_max_length("", 5));
    assert!(!has_max_length("hello world", 5));
  }

  #[test]
  fn test_urls() {
    assert!(is_valid_url("https://www.example.com/path?query=1"));
    assert!(is_valid_url("ftp://example.com"));
    assert!(!is_valid_url("example.com"));
    assert!(!is_valid_url("http://"));
    assert!(!is_valid_url(""));
  }

  #[test]
  fn test_numbers_and_ranges() {
    assert!(is_valid_number("123.45"));
    assert!(is_valid_number("-123"));
    assert!(!is_valid_number("123abc"));
    assert!(!is_valid_number(""));
    assert!(is_in_range("10", 1.0, 10.0));
    assert!(!is_in_range("11", 1.0, 10.0));
    assert!(!is_in_range("abc", 1.0, 10.0));
  }

  #[test]
  fn test_number_spellings() {
    assert!(is_valid_number("Infinity"));
    assert!(is_valid_number("-Infinity"));
    assert!(!is_valid_number("inf"));
    assert!(!is_valid_number("infinity"));
    assert!(!is_valid_number("NaN"));
    assert!(!is_in_range("inf", 0.0, f64::INFINITY));
  }

  #[test]
  fn test_validate_form_all_valid() {
    let rules = [
      (
        "email",
        vec![
          Rule::Required.message("Email is required"),
          Rule::Email.message("Invalid email format"),
        ],
      ),
      (
        "name",
        vec![
          Rule::Required.message("Name is required"),
          Rule::MinLength(2).message("Name too short"),
        ],
      ),
    ];

    let result = validate_form(
      &rules,
      &values(&[("email", "user@example.com"), ("name", "John Doe")]),
    );
    assert!(result.is_valid);
    assert!(result.errors.is_empty());
  }

  #[test]
  fn test_validate_form_reports_each_field() {
    let rules = [
      ("email", vec![Rule::Email.message("Invalid email")]),
      ("phone", vec![Rule::Phone.message("Invalid phone")]),
      ("name", vec![Rule::Required.into()]),
    ];

    let result = validate_form(
      &rules,
      &values(&[("email", "valid@example.com"), ("phone", "invalid-phone")]),
    );
    assert!(!result.is_valid);
    assert_eq!(result.first_error("email"), None);
    assert_eq!(result.first_error("phone"), Some("Invalid phone"));
    assert_eq!(result.first_error("name"), Some("name is required"));
  }

  #[test]
  fn test_optional_rules_skip_empty_values() {
    let rules = [("website", vec![FieldRule::from(Rule::MinLength(10))])];
    assert!(validate_form(&rules, &values(&[])).is_valid);
  }
}

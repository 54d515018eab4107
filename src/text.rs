/// Initials of up to `max_initials` whitespace-separated words, uppercased.
pub fn get_initials(name: &str, max_initials: usize) -> String {
  name
    .split_whitespace()
    .take(max_initials)
    .filter_map(|word| word.chars().next())
    .flat_map(char::to_uppercase)
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_full_name() {
    assert_eq!(get_initials("John Doe", 2), "JD");
    assert_eq!(get_initials("Mary Jane Watson", 2), "MJ");
  }

  #[test]
  fn test_empty_and_blank() {
    assert_eq!(get_initials("", 2), "");
    assert_eq!(get_initials("   ", 2), "");
  }

  #[test]
  fn test_respects_max() {
    assert_eq!(get_initials("John Doe Smith", 1), "J");
    assert_eq!(get_initials("John Doe Smith", 3), "JDS");
    assert_eq!(get_initials("John Doe Smith", 5), "JDS");
  }

  #[test]
  fn test_extra_whitespace_and_case() {
    assert_eq!(get_initials("  john   doe  ", 2), "JD");
    assert_eq!(get_initials("van der Berg", 2), "VD");
    assert_eq!(get_initials("Jean-Pierre Dupont", 2), "JD");
  }
}

// SPDX-License-Identifier: MIT

//! Per-field validation rules
//!
//! Rules are evaluated in declaration order against the submitted value;
//! the first failing rule's message is surfaced and evaluation stops. A
//! passing field triggers no notice at all.

use std::collections::HashMap;

/// A single validation predicate attached to a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Non-empty after trimming.
    Required,
    /// Loose email shape check (local part, '@', dotted domain).
    Email,
    /// An exact count of decimal digits, e.g. a 6-digit OTP code.
    Digits(usize),
    /// Minimum character count.
    MinLen(usize),
    /// Digits with an optional leading '+', 10 to 15 digits total.
    Phone,
    /// Must equal the already-collected value of another field.
    Matches(&'static str),
}

impl Rule {
    /// Check `value` against this rule. `collected` holds the values of
    /// previously completed steps, needed for cross-field rules.
    pub fn check(&self, label: &str, value: &str, collected: &HashMap<String, String>) -> Result<(), String> {
        match self {
            Rule::Required => {
                if value.trim().is_empty() {
                    Err(format!("{} is required", label))
                } else {
                    Ok(())
                }
            }
            Rule::Email => {
                if is_email(value) {
                    Ok(())
                } else {
                    Err("Please enter a valid email address".to_string())
                }
            }
            Rule::Digits(len) => {
                if value.len() == *len && value.chars().all(|c| c.is_ascii_digit()) {
                    Ok(())
                } else {
                    Err(format!("{} must be exactly {} digits", label, len))
                }
            }
            Rule::MinLen(min) => {
                if value.chars().count() >= *min {
                    Ok(())
                } else {
                    Err(format!("{} must be at least {} characters", label, min))
                }
            }
            Rule::Phone => {
                if is_phone(value) {
                    Ok(())
                } else {
                    Err("Please enter a valid phone number".to_string())
                }
            }
            Rule::Matches(other) => {
                if collected.get(*other).map(String::as_str) == Some(value) {
                    Ok(())
                } else {
                    Err(format!("{} does not match {}", label, other))
                }
            }
        }
    }
}

/// Evaluate a step's rules in order; first failure wins.
pub fn validate(
    label: &str,
    value: &str,
    rules: &[Rule],
    collected: &HashMap<String, String>,
) -> Result<(), String> {
    for rule in rules {
        rule.check(label, value, collected)?;
    }
    Ok(())
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    // Domain needs at least one interior dot.
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty() && !value.contains(char::is_whitespace)
}

fn is_phone(value: &str) -> bool {
    let digits = value.strip_prefix('+').unwrap_or(value);
    (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_collected() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn test_required() {
        let rule = Rule::Required;
        assert!(rule.check("Email", "a@b.com", &no_collected()).is_ok());
        assert!(rule.check("Email", "", &no_collected()).is_err());
        assert!(rule.check("Email", "   ", &no_collected()).is_err());
    }

    #[test]
    fn test_email_shapes() {
        let rule = Rule::Email;
        assert!(rule.check("Email", "a@b.com", &no_collected()).is_ok());
        assert!(rule.check("Email", "alice@mail.example.org", &no_collected()).is_ok());
        assert!(rule.check("Email", "no-at-sign", &no_collected()).is_err());
        assert!(rule.check("Email", "a@nodot", &no_collected()).is_err());
        assert!(rule.check("Email", "@b.com", &no_collected()).is_err());
        assert!(rule.check("Email", "a b@c.com", &no_collected()).is_err());
    }

    #[test]
    fn test_digits() {
        let rule = Rule::Digits(6);
        assert!(rule.check("OTP", "123456", &no_collected()).is_ok());
        assert!(rule.check("OTP", "12345", &no_collected()).is_err());
        assert!(rule.check("OTP", "12345a", &no_collected()).is_err());
    }

    #[test]
    fn test_phone() {
        let rule = Rule::Phone;
        assert!(rule.check("Phone", "03001234567", &no_collected()).is_ok());
        assert!(rule.check("Phone", "+923001234567", &no_collected()).is_ok());
        assert!(rule.check("Phone", "12345", &no_collected()).is_err());
        assert!(rule.check("Phone", "phone-number", &no_collected()).is_err());
    }

    #[test]
    fn test_matches_cross_field() {
        let rule = Rule::Matches("password");
        let mut collected = HashMap::new();
        collected.insert("password".to_string(), "Secret1!".to_string());

        assert!(rule.check("Confirm Password", "Secret1!", &collected).is_ok());
        assert!(rule.check("Confirm Password", "different", &collected).is_err());
        // Nothing collected yet - cannot match.
        assert!(rule.check("Confirm Password", "Secret1!", &no_collected()).is_err());
    }

    #[test]
    fn test_first_failure_wins() {
        let rules = vec![Rule::Required, Rule::MinLen(8)];
        let err = validate("Password", "", &rules, &no_collected()).unwrap_err();
        assert_eq!(err, "Password is required");

        let err = validate("Password", "short", &rules, &no_collected()).unwrap_err();
        assert!(err.contains("at least 8"));

        assert!(validate("Password", "long enough", &rules, &no_collected()).is_ok());
    }
}

use crate::core::step::FieldRule;
use regex::Regex;

/// Text-level validator, applied to a single field's string value.
pub type FieldValidator = Box<dyn Fn(&str) -> Result<(), String> + Send>;

pub fn required() -> FieldValidator {
    Box::new(|value: &str| {
        if value.trim().is_empty() {
            Err("This field is required".to_string())
        } else {
            Ok(())
        }
    })
}

pub fn min_length(min: usize) -> FieldValidator {
    Box::new(move |value: &str| {
        if value.chars().count() < min {
            Err(format!("Minimum length is {}", min))
        } else {
            Ok(())
        }
    })
}

pub fn max_length(max: usize) -> FieldValidator {
    Box::new(move |value: &str| {
        if value.chars().count() > max {
            Err(format!("Maximum length is {}", max))
        } else {
            Ok(())
        }
    })
}

pub fn regex(pattern: &str) -> FieldValidator {
    let re = Regex::new(pattern).expect("Invalid regex pattern");
    Box::new(move |value: &str| {
        if re.is_match(value) {
            Ok(())
        } else {
            Err(format!("Value must match pattern: {}", re.as_str()))
        }
    })
}

pub fn email() -> FieldValidator {
    regex(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
}

pub fn custom<F>(f: F, message: impl Into<String>) -> FieldValidator
where
    F: Fn(&str) -> bool + Send + 'static,
{
    let msg = message.into();
    Box::new(move |value: &str| if f(value) { Ok(()) } else { Err(msg.clone()) })
}

/// Lifts a text validator into a step rule against one named field.
/// A missing field validates as the empty string.
pub fn text_rule(field: impl Into<String>, validator: FieldValidator) -> FieldRule {
    let field = field.into();
    Box::new(move |ctx| {
        let text = ctx.text(field.as_str()).unwrap_or("");
        validator(text).err()
    })
}

#[cfg(test)]
mod tests {
    use super::{custom, email, max_length, min_length, regex, required, text_rule};
    use crate::core::context::StepContext;
    use crate::core::store::FormStore;
    use crate::core::value::Value;

    #[test]
    fn required_rejects_blank_input() {
        let validator = required();
        assert!(validator("  ").is_err());
        assert!(validator("x").is_ok());
    }

    #[test]
    fn length_bounds_count_chars() {
        assert!(min_length(3)("ab").is_err());
        assert!(min_length(3)("abc").is_ok());
        assert!(max_length(3)("abcd").is_err());
        assert!(max_length(3)("zół").is_ok());
    }

    #[test]
    fn regex_and_email() {
        let digits = regex(r"^\d+$");
        assert!(digits("123").is_ok());
        assert!(digits("12a").is_err());

        let validator = email();
        assert!(validator("kasia@example.com").is_ok());
        assert!(validator("not-an-email").is_err());
    }

    #[test]
    fn custom_uses_given_message() {
        let validator = custom(|value| value.starts_with('k'), "must start with k");
        assert_eq!(validator("x"), Err("must start with k".to_string()));
        assert!(validator("kasia").is_ok());
    }

    #[test]
    fn text_rule_reads_from_context() {
        let rule = text_rule("name", required());

        let empty = StepContext::default();
        assert!(rule(&empty).is_some());

        let mut store = FormStore::new();
        store.set("name", Value::text("x"));
        assert!(rule(&StepContext::from_store(&store)).is_none());
    }
}

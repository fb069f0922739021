use std::sync::LazyLock;

use regex::Regex;

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").ok());

/// `local@domain.tld` with at least two characters after the last dot and no
/// whitespace. Surrounding whitespace is ignored.
pub fn validate_email(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && EMAIL.as_ref().is_some_and(|re| re.is_match(value))
}

/// The four checked fields of the contact form.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
    Consent,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Message, Field::Consent];

    pub fn element_id(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Message => "message",
            Field::Consent => "consent",
        }
    }

    /// Dictionary key and English fallback of the field's error message.
    pub fn error_text(self) -> (&'static str, &'static str) {
        match self {
            Field::Name => ("form.error.nameRequired", "Name is required."),
            Field::Email => ("form.error.emailInvalid", "Please enter a valid email address."),
            Field::Message => ("form.error.messageRequired", "Message cannot be empty."),
            Field::Consent => (
                "form.error.consentRequired",
                "Please check this box to allow us to use your information to respond.",
            ),
        }
    }
}

/// Whether a control's current state satisfies its rule.
pub fn field_is_valid(field: Field, value: &str, checked: bool) -> bool {
    match field {
        Field::Name | Field::Message => !value.trim().is_empty(),
        Field::Email => validate_email(value),
        Field::Consent => checked,
    }
}

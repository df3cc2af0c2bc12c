//! Contact form validation and simulated submission.
//!
//! Fields are validated independently (for live feedback as the user types)
//! and all together on submit. A valid submission waits a fixed delay, then
//! resolves to the success page the client should navigate to.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Page a successful submission redirects to.
pub const SUCCESS_PAGE: &str = "contact-success.html";

/// Default simulated network delay.
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_secs(2);

/// Label shown on the send button while submitting.
pub const SENDING_LABEL: &str = "Envoi en cours...";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s\-()]{10,}$").expect("valid phone regex"));
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-ZÀ-ÿ\s'-]{2,}$").expect("valid name regex"));

/// Fields of the contact form, in form order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContactField {
    FirstName,
    LastName,
    Email,
    Phone,
    Message,
}

impl ContactField {
    pub const ALL: [ContactField; 5] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::Message,
    ];
}

/// Raw values typed by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

/// One field's validation failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: ContactField,
    pub message: String,
}

/// Outcome of validating the whole form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ContactValidation {
    /// Failures in form order.
    pub errors: Vec<FieldError>,
}

impl ContactValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The field that should receive focus.
    pub fn first_invalid(&self) -> Option<ContactField> {
        self.errors.first().map(|e| e.field)
    }

    pub fn error_for(&self, field: ContactField) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl ContactForm {
    pub fn value(&self, field: ContactField) -> &str {
        match field {
            ContactField::FirstName => &self.first_name,
            ContactField::LastName => &self.last_name,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
            ContactField::Message => &self.message,
        }
    }

    /// Validate a single field.
    pub fn validate_field(&self, field: ContactField) -> Result<(), String> {
        validate_field(field, self.value(field))
    }

    /// Validate every field, collecting all failures.
    pub fn validate(&self) -> ContactValidation {
        let errors = ContactField::ALL
            .iter()
            .filter_map(|&field| {
                self.validate_field(field)
                    .err()
                    .map(|message| FieldError { field, message })
            })
            .collect();
        ContactValidation { errors }
    }
}

/// Validate one trimmed field value.
pub fn validate_field(field: ContactField, raw: &str) -> Result<(), String> {
    let value = raw.trim();
    match field {
        ContactField::FirstName => validate_name(value, "Le prénom"),
        ContactField::LastName => validate_name(value, "Le nom"),
        ContactField::Email => {
            if value.is_empty() {
                Err("L'email est requis".into())
            } else if !EMAIL_RE.is_match(value) {
                Err("Format d'email invalide, exemple@gmail.com".into())
            } else {
                Ok(())
            }
        }
        ContactField::Phone => {
            if !value.is_empty() && !PHONE_RE.is_match(value) {
                Err("Format de téléphone invalide, il doit contenir des chiffres".into())
            } else {
                Ok(())
            }
        }
        ContactField::Message => {
            if value.is_empty() {
                Err("Le message est requis".into())
            } else if value.encode_utf16().count() < 10 {
                Err("Le message doit contenir au moins 10 caractères".into())
            } else {
                Ok(())
            }
        }
    }
}

fn validate_name(value: &str, label: &str) -> Result<(), String> {
    if value.is_empty() {
        Err(format!("{label} est requis"))
    } else if !NAME_RE.is_match(value) {
        Err(format!(
            "{label} doit contenir au moins 2 lettres, sans caractères spéciaux"
        ))
    } else {
        Ok(())
    }
}

/// Where a submission stands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionStatus {
    Idle,
    /// Send button disabled and relabelled.
    Sending { label: String },
    /// Navigate to this page.
    Redirect { location: String },
    Rejected { validation: ContactValidation },
}

/// Validate and, if valid, simulate sending the form.
///
/// Invalid forms resolve immediately to [`SubmissionStatus::Rejected`]. Valid
/// forms call `on_sending` with the in-flight status, wait `delay`, then
/// resolve to the redirect.
pub async fn submit(
    form: &ContactForm,
    delay: Duration,
    on_sending: impl FnOnce(&SubmissionStatus),
) -> SubmissionStatus {
    let validation = form.validate();
    if !validation.is_valid() {
        return SubmissionStatus::Rejected { validation };
    }

    on_sending(&SubmissionStatus::Sending {
        label: SENDING_LABEL.into(),
    });
    tokio::time::sleep(delay).await;
    info!(email = %form.email.trim(), "Contact form submitted");
    SubmissionStatus::Redirect {
        location: SUCCESS_PAGE.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ContactForm {
        ContactForm {
            first_name: "Hélène".into(),
            last_name: "d'Arcy-Lefèvre".into(),
            email: "helene@example.fr".into(),
            phone: "+33 (0)6 12-34-56-78".into(),
            message: "Bonjour, j'aimerais visiter le centre spatial.".into(),
        }
    }

    #[test]
    fn valid_form_passes() {
        let v = valid_form().validate();
        assert!(v.is_valid(), "{v:?}");
        assert_eq!(v.first_invalid(), None);
    }

    #[test]
    fn names() {
        assert!(validate_field(ContactField::FirstName, "  Zoé  ").is_ok());
        assert!(validate_field(ContactField::FirstName, "Al").is_ok());
        assert_eq!(
            validate_field(ContactField::FirstName, "   ").unwrap_err(),
            "Le prénom est requis"
        );
        assert!(validate_field(ContactField::LastName, "A").is_err());
        assert!(validate_field(ContactField::LastName, "R2D2").is_err());
        assert!(validate_field(ContactField::LastName, "Smith_").is_err());
    }

    #[test]
    fn emails() {
        assert!(validate_field(ContactField::Email, "a@b.co").is_ok());
        assert!(validate_field(ContactField::Email, "").is_err());
        assert!(validate_field(ContactField::Email, "a@b").is_err());
        assert!(validate_field(ContactField::Email, "a b@c.d").is_err());
        assert!(validate_field(ContactField::Email, "a@@b.c").is_err());
    }

    #[test]
    fn phone_is_optional_but_checked() {
        assert!(validate_field(ContactField::Phone, "").is_ok());
        assert!(validate_field(ContactField::Phone, "0612345678").is_ok());
        assert!(validate_field(ContactField::Phone, "+1 (555) 123-4567").is_ok());
        assert!(validate_field(ContactField::Phone, "12345").is_err());
        assert!(validate_field(ContactField::Phone, "06 12 34 ab 78").is_err());
    }

    #[test]
    fn message_length() {
        assert!(validate_field(ContactField::Message, "").is_err());
        assert!(validate_field(ContactField::Message, "  court  ").is_err());
        assert!(validate_field(ContactField::Message, "ééééééééééé").is_ok());
        // Length is counted in UTF-16 units, so astral characters count twice.
        assert!(validate_field(ContactField::Message, "🚀🚀🚀🚀🚀").is_ok());
        assert!(validate_field(ContactField::Message, "🚀🚀🚀🚀").is_err());
    }

    #[test]
    fn all_errors_reported_in_form_order() {
        let form = ContactForm {
            first_name: String::new(),
            last_name: "Ok".into(),
            email: "nope".into(),
            phone: "1".into(),
            message: "tiny".into(),
        };
        let v = form.validate();
        let fields: Vec<ContactField> = v.errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                ContactField::FirstName,
                ContactField::Email,
                ContactField::Phone,
                ContactField::Message
            ]
        );
        assert_eq!(v.first_invalid(), Some(ContactField::FirstName));
        assert!(v.error_for(ContactField::LastName).is_none());
    }

    #[test]
    fn form_deserializes_camel_case() {
        let form: ContactForm =
            serde_json::from_str(r#"{"firstName":"Ada","lastName":"Byron","email":"a@b.c"}"#)
                .unwrap();
        assert_eq!(form.first_name, "Ada");
        assert!(form.phone.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn valid_submission_redirects_after_delay() {
        let started = tokio::time::Instant::now();
        let mut sending = None;
        let status = submit(&valid_form(), DEFAULT_SUBMIT_DELAY, |s| {
            sending = Some(s.clone());
        })
        .await;

        assert_eq!(
            status,
            SubmissionStatus::Redirect {
                location: SUCCESS_PAGE.into()
            }
        );
        assert!(started.elapsed() >= DEFAULT_SUBMIT_DELAY);
        assert_eq!(
            sending,
            Some(SubmissionStatus::Sending {
                label: SENDING_LABEL.into()
            })
        );
    }

    #[tokio::test]
    async fn invalid_submission_is_rejected_immediately() {
        let mut called = false;
        let status = submit(&ContactForm::default(), Duration::from_secs(60), |_| {
            called = true;
        })
        .await;
        assert!(matches!(status, SubmissionStatus::Rejected { .. }));
        assert!(!called);
    }
}

//! Per-form specifications.
//!
//! Everything that differs between the four forms lives here: field lists and
//! their sanitize kinds, required fields, the CAPTCHA action name the page
//! requests tokens for, recipients, subjects, notification rows, and the
//! client-facing messages. The gate itself is form-agnostic and consults the
//! spec at every stage.

use crate::services::template;
use formgate_core::{AttachmentRecord, Config, FieldMap, FormKind, SanitizeKind};

/// Response message for honeypot-trapped submissions. Indistinguishable from
/// a real success as far as a bot can tell.
pub const HONEYPOT_FAKE_SUCCESS: &str = "Thank you for your submission!";

pub struct FormSpec {
    pub kind: FormKind,
    pub fields: &'static [(&'static str, SanitizeKind)],
    pub required: &'static [&'static str],
    pub captcha_action: &'static str,
    pub honeypot_field: Option<&'static str>,
    pub accepts_attachment: bool,
    pub notification_title: &'static str,
}

static CONTACT: FormSpec = FormSpec {
    kind: FormKind::Contact,
    fields: &[
        ("name", SanitizeKind::Plain),
        ("email", SanitizeKind::Email),
        ("mobile", SanitizeKind::Plain),
        ("country", SanitizeKind::Plain),
        ("service", SanitizeKind::Plain),
        ("message", SanitizeKind::Plain),
    ],
    required: &["name", "email"],
    captcha_action: "contact_form",
    honeypot_field: None,
    accepts_attachment: false,
    notification_title: "New Contact Form Submission",
};

static CAREER: FormSpec = FormSpec {
    kind: FormKind::Career,
    fields: &[
        ("name", SanitizeKind::Plain),
        ("email", SanitizeKind::Email),
        ("mobile", SanitizeKind::Plain),
        ("country", SanitizeKind::Plain),
        ("job_position", SanitizeKind::Plain),
    ],
    required: &["name", "email", "job_position"],
    captcha_action: "career_form",
    honeypot_field: None,
    accepts_attachment: true,
    notification_title: "New Career Application",
};

static PARTNER: FormSpec = FormSpec {
    kind: FormKind::Partner,
    fields: &[
        ("first_name", SanitizeKind::Plain),
        ("last_name", SanitizeKind::Plain),
        ("email", SanitizeKind::Email),
        ("phone", SanitizeKind::Plain),
        ("company", SanitizeKind::Plain),
        ("country", SanitizeKind::Plain),
        ("partnership_type", SanitizeKind::Plain),
        ("message", SanitizeKind::Plain),
    ],
    required: &["first_name", "last_name", "email", "company", "country"],
    captcha_action: "partner_form",
    honeypot_field: Some("website_url"),
    accepts_attachment: false,
    notification_title: "New Partner Application",
};

static NEWSLETTER: FormSpec = FormSpec {
    kind: FormKind::Newsletter,
    fields: &[("email", SanitizeKind::Email)],
    required: &["email"],
    captcha_action: "newsletter_form",
    honeypot_field: None,
    accepts_attachment: false,
    notification_title: "New Newsletter Subscription",
};

impl FormSpec {
    pub fn of(kind: FormKind) -> &'static FormSpec {
        match kind {
            FormKind::Contact => &CONTACT,
            FormKind::Career => &CAREER,
            FormKind::Partner => &PARTNER,
            FormKind::Newsletter => &NEWSLETTER,
        }
    }

    pub fn sanitize_kind_for(&self, name: &str) -> SanitizeKind {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, kind)| *kind)
            .unwrap_or(SanitizeKind::Plain)
    }

    /// Project the raw submission onto this form's field list, sanitizing
    /// each value. Fields the form does not declare are dropped; declared
    /// fields the client omitted become empty strings.
    pub fn sanitized(&self, raw: &FieldMap) -> FieldMap {
        self.fields
            .iter()
            .map(|(name, kind)| {
                (
                    name.to_string(),
                    formgate_core::sanitize(raw.get_or_empty(name), *kind),
                )
            })
            .collect()
    }

    pub fn recipient<'c>(&self, config: &'c Config) -> &'c str {
        match self.kind {
            FormKind::Contact => &config.email_contact_to,
            FormKind::Career => &config.email_careers_to,
            FormKind::Partner => &config.email_partners_to,
            FormKind::Newsletter => &config.email_newsletter_to,
        }
    }

    pub fn subject(&self, data: &FieldMap) -> String {
        match self.kind {
            FormKind::Contact => {
                format!("New Contact Form Submission - {}", data.get_or_empty("name"))
            }
            FormKind::Career => format!(
                "New Career Application - {} - {}",
                data.get_or_empty("job_position"),
                data.get_or_empty("name")
            ),
            FormKind::Partner => {
                format!("New Partner Application - {}", data.get_or_empty("company"))
            }
            FormKind::Newsletter => format!(
                "New Newsletter Subscription - {}",
                data.get_or_empty("email")
            ),
        }
    }

    /// Reply-To for the internal notification: the submitter, except for
    /// newsletter notifications which have nothing to reply to.
    pub fn reply_to(&self, data: &FieldMap) -> Option<String> {
        match self.kind {
            FormKind::Newsletter => None,
            _ => {
                let email = data.get_or_empty("email");
                (!email.is_empty()).then(|| email.to_string())
            }
        }
    }

    /// Label/value rows for the notification email, in display order.
    pub fn email_rows(
        &self,
        data: &FieldMap,
        attachment: Option<&AttachmentRecord>,
        client_ip: &str,
    ) -> Vec<(String, String)> {
        let get = |name: &str| data.get_or_empty(name).to_string();
        let or_default = |name: &str, default: &str| {
            let value = data.get_or_empty(name);
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };

        let mut rows: Vec<(String, String)> = match self.kind {
            FormKind::Contact => vec![
                ("Name".to_string(), get("name")),
                ("Email".to_string(), get("email")),
                ("Mobile".to_string(), or_default("mobile", "Not provided")),
                ("Country".to_string(), or_default("country", "Not provided")),
                (
                    "Service/Product".to_string(),
                    or_default("service", "Not specified"),
                ),
                ("Message".to_string(), or_default("message", "No message")),
            ],
            FormKind::Career => vec![
                ("Name".to_string(), get("name")),
                ("Email".to_string(), get("email")),
                ("Mobile".to_string(), or_default("mobile", "Not provided")),
                ("Country".to_string(), or_default("country", "Not provided")),
                ("Position Applied For".to_string(), get("job_position")),
                (
                    "Resume".to_string(),
                    match attachment {
                        Some(record) => format!(
                            "{} ({} KB)",
                            record.original_name,
                            (record.size as f64 / 1024.0 * 100.0).round() / 100.0
                        ),
                        None => "Not attached".to_string(),
                    },
                ),
            ],
            FormKind::Partner => vec![
                ("First Name".to_string(), get("first_name")),
                ("Last Name".to_string(), get("last_name")),
                ("Email".to_string(), get("email")),
                ("Phone".to_string(), or_default("phone", "Not provided")),
                ("Company".to_string(), get("company")),
                ("Country".to_string(), get("country")),
                (
                    "Partnership Type".to_string(),
                    partnership_type_label(data.get_or_empty("partnership_type")),
                ),
                ("Message".to_string(), or_default("message", "No message")),
            ],
            FormKind::Newsletter => vec![("Email".to_string(), get("email"))],
        };

        rows.push(("IP Address".to_string(), client_ip.to_string()));
        let when_label = match self.kind {
            FormKind::Newsletter => "Subscribed At",
            _ => "Submitted At",
        };
        rows.push((when_label.to_string(), template::submitted_at()));
        rows
    }

    pub fn success_message(&self) -> &'static str {
        match self.kind {
            FormKind::Contact => "Thank you for contacting us! We will get back to you soon.",
            FormKind::Career => {
                "Thank you for your application! We will review your resume and contact you \
                 if there is a suitable opportunity."
            }
            FormKind::Partner => {
                "Thank you for your interest in partnering with us! Our partnership team will \
                 review your application and contact you soon."
            }
            FormKind::Newsletter => {
                "Thank you for subscribing! Please check your email for confirmation."
            }
        }
    }

    pub fn validation_failure_message(&self) -> &'static str {
        match self.kind {
            FormKind::Newsletter => "Please enter your email address.",
            _ => "Please fill in all required fields.",
        }
    }

    pub fn dispatch_failure_message(&self, config: &Config) -> String {
        match self.kind {
            FormKind::Contact => format!(
                "Sorry, there was an error sending your message. Please try again or email \
                 us directly at {}",
                config.email_contact_to
            ),
            FormKind::Career => format!(
                "Sorry, there was an error submitting your application. Please try again or \
                 email your resume to {}",
                config.email_careers_to
            ),
            FormKind::Partner => format!(
                "Sorry, there was an error submitting your application. Please try again or \
                 email us directly at {}",
                config.email_partners_to
            ),
            FormKind::Newsletter => {
                "Sorry, there was an error processing your subscription. Please try again."
                    .to_string()
            }
        }
    }

    /// Newsletter subscriptions trigger a second, subscriber-facing email.
    pub fn sends_welcome(&self) -> bool {
        matches!(self.kind, FormKind::Newsletter)
    }
}

/// Display label for a partnership type key; unknown keys pass through
/// unchanged and an empty selection reads "Not specified".
fn partnership_type_label(key: &str) -> String {
    match key {
        "" => "Not specified".to_string(),
        "reseller" => "Reseller Partner".to_string(),
        "technology" => "Technology Partner".to_string(),
        "referral" => "Referral Partner".to_string(),
        "integration" => "Integration Partner".to_string(),
        "other" => "Other".to_string(),
        unknown => unknown.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_map(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn sanitized_drops_undeclared_fields() {
        let raw = field_map(&[
            ("name", "Ada"),
            ("email", "ada@example.com"),
            ("extra", "ignored"),
        ]);
        let data = FormSpec::of(FormKind::Contact).sanitized(&raw);

        assert!(data.get("extra").is_none());
        assert_eq!(data.get("name"), Some("Ada"));
        // Declared-but-omitted fields become empty strings.
        assert_eq!(data.get("mobile"), Some(""));
    }

    #[test]
    fn sanitized_applies_the_right_kind_per_field() {
        let raw = field_map(&[("name", "<Ada>"), ("email", " a(d)a@example.com ")]);
        let data = FormSpec::of(FormKind::Contact).sanitized(&raw);

        assert_eq!(data.get("name"), Some("&lt;Ada&gt;"));
        assert_eq!(data.get("email"), Some("ada@example.com"));
    }

    #[test]
    fn career_subject_includes_position_and_name() {
        let data = field_map(&[("name", "Ada"), ("job_position", "Engineer")]);
        assert_eq!(
            FormSpec::of(FormKind::Career).subject(&data),
            "New Career Application - Engineer - Ada"
        );
    }

    #[test]
    fn contact_rows_use_placeholders_for_optional_fields() {
        let data = FormSpec::of(FormKind::Contact).sanitized(&field_map(&[
            ("name", "Ada"),
            ("email", "ada@example.com"),
        ]));
        let rows = FormSpec::of(FormKind::Contact).email_rows(&data, None, "1.2.3.4");

        let row = |label: &str| {
            rows.iter()
                .find(|(l, _)| l == label)
                .map(|(_, v)| v.as_str())
                .unwrap()
        };
        assert_eq!(row("Mobile"), "Not provided");
        assert_eq!(row("Service/Product"), "Not specified");
        assert_eq!(row("Message"), "No message");
        assert_eq!(row("IP Address"), "1.2.3.4");
    }

    #[test]
    fn career_rows_describe_the_attachment() {
        let data = field_map(&[("name", "Ada")]);
        let record = AttachmentRecord {
            original_name: "cv.pdf".to_string(),
            stored_name: "x_1.pdf".to_string(),
            path: "uploads/resumes/x_1.pdf".into(),
            size: 2048,
            content_type: "application/pdf".to_string(),
        };
        let rows = FormSpec::of(FormKind::Career).email_rows(&data, Some(&record), "1.2.3.4");

        let resume = rows.iter().find(|(l, _)| l == "Resume").unwrap();
        assert_eq!(resume.1, "cv.pdf (2 KB)");
    }

    #[test]
    fn partnership_types_map_to_display_labels() {
        assert_eq!(partnership_type_label("reseller"), "Reseller Partner");
        assert_eq!(partnership_type_label(""), "Not specified");
        assert_eq!(partnership_type_label("bespoke"), "bespoke");
    }

    #[test]
    fn newsletter_notification_has_no_reply_to() {
        let data = field_map(&[("email", "ada@example.com")]);
        assert_eq!(FormSpec::of(FormKind::Newsletter).reply_to(&data), None);
        assert_eq!(
            FormSpec::of(FormKind::Contact).reply_to(&data),
            Some("ada@example.com".to_string())
        );
    }

    #[test]
    fn only_the_partner_form_has_a_honeypot() {
        assert_eq!(
            FormSpec::of(FormKind::Partner).honeypot_field,
            Some("website_url")
        );
        assert!(FormSpec::of(FormKind::Contact).honeypot_field.is_none());
        assert!(FormSpec::of(FormKind::Career).honeypot_field.is_none());
        assert!(FormSpec::of(FormKind::Newsletter).honeypot_field.is_none());
    }

    #[test]
    fn only_the_career_form_accepts_attachments() {
        assert!(FormSpec::of(FormKind::Career).accepts_attachment);
        assert!(!FormSpec::of(FormKind::Contact).accepts_attachment);
    }
}

use std::collections::VecDeque;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::clipboard::{ClipboardNotifier, FailureNotice};
use crate::error::FormError;

// Compile the address pattern once for all submissions
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FocusArea {
    Page,
    Form,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertKind {
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub text: String,
}

/// Modal messages. The front one is shown and has to be dismissed before
/// anything else on the page reacts.
#[derive(Debug, Default)]
pub struct Alerts {
    queue: VecDeque<Alert>,
}

impl Alerts {
    pub fn push(&mut self, alert: Alert) {
        self.queue.push_back(alert);
    }

    pub fn info(&mut self, title: impl Into<String>, text: impl Into<String>) {
        self.push(Alert {
            kind: AlertKind::Info,
            title: title.into(),
            text: text.into(),
        });
    }

    pub fn current(&self) -> Option<&Alert> {
        self.queue.front()
    }

    pub fn dismiss(&mut self) -> Option<Alert> {
        self.queue.pop_front()
    }

    pub fn is_blocking(&self) -> bool {
        !self.queue.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl FailureNotice for Alerts {
    fn notify_failure(&mut self, message: &str) {
        self.push(Alert {
            kind: AlertKind::Error,
            title: "Copy failed".into(),
            text: message.into(),
        });
    }
}

/// A contact detail the user can copy, with its own copy state.
#[derive(Debug)]
pub struct CopyField {
    pub label: &'static str,
    pub value: String,
    pub notifier: ClipboardNotifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTarget {
    Email,
    Phone,
}

impl CopyTarget {
    pub fn index(self) -> usize {
        match self {
            CopyTarget::Email => 0,
            CopyTarget::Phone => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Subject,
    Message,
}

impl FormField {
    pub const ALL: [FormField; 4] = [FormField::Name, FormField::Email, FormField::Subject, FormField::Message];

    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::Name => "Your Name",
            FormField::Email => "Your Email",
            FormField::Subject => "Subject",
            FormField::Message => "Your Message",
        }
    }
}

/// A submitted, validated message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ContactForm {
    values: [String; 4],
    errors: [Option<FormError>; 4],
    focused: usize,
}

impl ContactForm {
    pub fn value(&self, field: FormField) -> &str {
        &self.values[field as usize]
    }

    pub fn error(&self, field: FormField) -> Option<&FormError> {
        self.errors[field as usize].as_ref()
    }

    pub fn focused(&self) -> FormField {
        FormField::ALL[self.focused]
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % FormField::ALL.len();
    }

    pub fn focus_previous(&mut self) {
        self.focused = (self.focused + FormField::ALL.len() - 1) % FormField::ALL.len();
    }

    pub fn insert(&mut self, c: char) {
        self.values[self.focused].push(c);
        self.errors[self.focused] = None;
    }

    pub fn backspace(&mut self) {
        self.values[self.focused].pop();
    }

    /// Validates every field. On success the form is cleared and the
    /// submission returned; otherwise errors are kept per field.
    pub fn submit(&mut self) -> Option<Submission> {
        let name = self.values[FormField::Name as usize].trim();
        let email = self.values[FormField::Email as usize].trim();
        let message = self.values[FormField::Message as usize].trim();

        self.errors = [
            name.is_empty().then_some(FormError::Required("Name")),
            if email.is_empty() {
                Some(FormError::Required("Email"))
            } else if !EMAIL_REGEX.is_match(email) {
                Some(FormError::InvalidEmail)
            } else {
                None
            },
            None,
            message.is_empty().then_some(FormError::Required("Message")),
        ];
        if self.errors.iter().any(Option::is_some) {
            return None;
        }

        let submission = Submission {
            name: name.to_string(),
            email: email.to_string(),
            subject: self.values[FormField::Subject as usize].trim().to_string(),
            message: message.to_string(),
        };
        *self = Self::default();
        Some(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_into(form: &mut ContactForm, text: &str) {
        for c in text.chars() {
            form.insert(c);
        }
    }

    #[test]
    fn empty_form_reports_required_fields() {
        let mut form = ContactForm::default();
        assert_eq!(form.submit(), None);
        assert_eq!(form.error(FormField::Name), Some(&FormError::Required("Name")));
        assert_eq!(form.error(FormField::Email), Some(&FormError::Required("Email")));
        assert_eq!(form.error(FormField::Subject), None);
        assert_eq!(form.error(FormField::Message), Some(&FormError::Required("Message")));
    }

    #[test]
    fn invalid_email_is_rejected() {
        let mut form = ContactForm::default();
        type_into(&mut form, "Sam");
        form.focus_next();
        type_into(&mut form, "sam@example");
        form.focus_next();
        form.focus_next();
        type_into(&mut form, "Hello");
        assert_eq!(form.submit(), None);
        assert_eq!(form.error(FormField::Email), Some(&FormError::InvalidEmail));
        assert_eq!(form.error(FormField::Name), None);
    }

    #[test]
    fn valid_submission_clears_form() {
        let mut form = ContactForm::default();
        type_into(&mut form, "Sam");
        form.focus_next();
        type_into(&mut form, "sam@example.com");
        form.focus_previous();
        form.focus_previous();
        assert_eq!(form.focused(), FormField::Message);
        type_into(&mut form, "Hi there!");
        form.backspace();

        let submission = form.submit().unwrap();
        assert_eq!(submission.name, "Sam");
        assert_eq!(submission.email, "sam@example.com");
        assert_eq!(submission.subject, "");
        assert_eq!(submission.message, "Hi there");
        assert_eq!(form.value(FormField::Name), "");
        assert_eq!(form.focused(), FormField::Name);
    }

    #[test]
    fn typing_clears_field_error() {
        let mut form = ContactForm::default();
        form.submit();
        type_into(&mut form, "S");
        assert_eq!(form.error(FormField::Name), None);
        assert!(form.error(FormField::Email).is_some());
    }

    #[test]
    fn alerts_queue_in_order() {
        let mut alerts = Alerts::default();
        assert!(!alerts.is_blocking());
        alerts.notify_failure("first");
        alerts.info("Thanks", "second");
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts.current().map(|a| a.text.as_str()), Some("first"));
        assert_eq!(alerts.current().map(|a| &a.kind), Some(&AlertKind::Error));
        alerts.dismiss();
        assert_eq!(alerts.current().map(|a| a.text.as_str()), Some("second"));
        alerts.dismiss();
        assert!(alerts.is_empty());
    }
}

// ── Form validation ──
//
// Field-level rules checked before a create or update is sent. Every rule
// runs; the caller gets the full list of violations, not just the first.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use strum::IntoEnumIterator;
use thiserror::Error;
use url::Url;

use crate::fields::Editable;
use crate::model::{NewPost, NewUser, Post, User};

static USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("username pattern compiles"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{0,15}$").expect("phone pattern compiles"));
static ZIPCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("zipcode pattern compiles"));
static LATITUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?([1-8]?[1-9]|[1-9]0)\.\d{1,6}$").expect("latitude pattern compiles")
});
static LONGITUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(1?[0-7][1-9]|1?[1-8]0|[1-9]?[0-9])\.\d{1,6}$")
        .expect("longitude pattern compiles")
});

// ── Errors ──────────────────────────────────────────────────────────

/// One failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Dotted field path, e.g. `address.zipcode`.
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every violation found in one record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", summarize(.0))]
pub struct ValidationErrors(Vec<Violation>);

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    /// Message for a single field, if it failed.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.message.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Collects violations while rules run.
#[derive(Default)]
struct Report(Vec<Violation>);

impl Report {
    fn fail(&mut self, field: &'static str, message: &str) {
        self.0.push(Violation {
            field,
            message: message.to_owned(),
        });
    }

    fn required(&mut self, field: &'static str, value: &str, message: &str) -> bool {
        if value.is_empty() {
            self.fail(field, message);
            false
        } else {
            true
        }
    }

    fn min_len(&mut self, field: &'static str, value: &str, min: usize, message: &str) {
        if value.chars().count() < min {
            self.fail(field, message);
        }
    }

    fn max_len(&mut self, field: &'static str, value: &str, max: usize, message: &str) {
        if value.chars().count() > max {
            self.fail(field, message);
        }
    }

    fn pattern(&mut self, field: &'static str, value: &str, re: &Regex, message: &str) {
        if !re.is_match(value) {
            self.fail(field, message);
        }
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.0))
        }
    }
}

// ── Trait ───────────────────────────────────────────────────────────

/// Records that can be checked before they are sent.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

// ── Users ───────────────────────────────────────────────────────────

impl Validate for NewUser {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut r = Report::default();

        if r.required("name", &self.name, "Name is required") {
            r.min_len("name", &self.name, 2, "Name must be at least 2 characters");
            r.max_len("name", &self.name, 50, "Name must be less than 50 characters");
        }

        if r.required("username", &self.username, "Username is required") {
            r.min_len(
                "username",
                &self.username,
                3,
                "Username must be at least 3 characters",
            );
            r.max_len(
                "username",
                &self.username,
                20,
                "Username must be less than 20 characters",
            );
            r.pattern(
                "username",
                &self.username,
                &USERNAME,
                "Username can only contain letters, numbers, and underscores",
            );
        }

        if r.required("email", &self.email, "Email is required") {
            r.pattern(
                "email",
                &self.email,
                &EMAIL,
                "Please enter a valid email address",
            );
        }

        if r.required("phone", &self.phone, "Phone is required") {
            r.pattern(
                "phone",
                &self.phone,
                &PHONE,
                "Please enter a valid phone number",
            );
        }

        if !self.website.is_empty() && !is_website(&self.website) {
            r.fail("website", "Please enter a valid website URL");
        }

        let address = &self.address;
        if r.required(
            "address.street",
            &address.street,
            "Street address is required",
        ) {
            r.min_len(
                "address.street",
                &address.street,
                5,
                "Street address must be at least 5 characters",
            );
        }
        if r.required("address.city", &address.city, "City is required") {
            r.min_len(
                "address.city",
                &address.city,
                2,
                "City must be at least 2 characters",
            );
        }
        if r.required("address.zipcode", &address.zipcode, "Zipcode is required") {
            r.pattern(
                "address.zipcode",
                &address.zipcode,
                &ZIPCODE,
                "Please enter a valid zipcode (e.g., 12345 or 12345-6789)",
            );
        }
        if !address.geo.lat.is_empty() {
            r.pattern(
                "address.geo.lat",
                &address.geo.lat,
                &LATITUDE,
                "Please enter a valid latitude",
            );
        }
        if !address.geo.lng.is_empty() {
            r.pattern(
                "address.geo.lng",
                &address.geo.lng,
                &LONGITUDE,
                "Please enter a valid longitude",
            );
        }

        let company = &self.company;
        if r.required("company.name", &company.name, "Company name is required") {
            r.min_len(
                "company.name",
                &company.name,
                2,
                "Company name must be at least 2 characters",
            );
        }
        r.max_len(
            "company.catchPhrase",
            &company.catch_phrase,
            100,
            "Catch phrase must be less than 100 characters",
        );
        r.max_len(
            "company.bs",
            &company.bs,
            100,
            "Business description must be less than 100 characters",
        );

        r.finish()
    }
}

impl Validate for User {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.draft().validate()
    }
}

/// http(s) URL with a host. A bare host like `example.org` counts, the
/// scheme is assumed.
fn is_website(raw: &str) -> bool {
    let candidate = if raw.contains("://") {
        raw.to_owned()
    } else {
        format!("https://{raw}")
    };
    match Url::parse(&candidate) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| host.contains('.'))
        }
        Err(_) => false,
    }
}

// ── Edits ───────────────────────────────────────────────────────────

/// Check `edited` against the rules, reporting only fields whose value
/// differs from `original`. Values the service already stores are not
/// re-judged, so a record like `phone: "1-770-736-8031 x56442"` can still
/// have its name changed.
pub fn validate_changes<E>(edited: &E, original: &E) -> Result<(), ValidationErrors>
where
    E: Validate + Editable,
{
    let Err(errors) = edited.validate() else {
        return Ok(());
    };
    let changed: Vec<String> = <E::Field as IntoEnumIterator>::iter()
        .filter(|&field| edited.field_value(field) != original.field_value(field))
        .map(|field| field.to_string())
        .collect();

    let kept: Vec<Violation> = errors
        .0
        .into_iter()
        .filter(|v| changed.iter().any(|path| path == v.field))
        .collect();
    if kept.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(kept))
    }
}

// ── Posts ───────────────────────────────────────────────────────────

impl Validate for NewPost {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut r = Report::default();

        if self.user_id.get() == 0 {
            r.fail("userId", "Please select an author");
        }

        let title = self.title.trim();
        if r.required("title", title, "Title is required") {
            r.min_len("title", title, 5, "Title must be at least 5 characters");
        }

        let body = self.body.trim();
        if r.required("body", body, "Content is required") {
            r.min_len("body", body, 10, "Content must be at least 10 characters");
        }

        r.finish()
    }
}

impl Validate for Post {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.draft().validate()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Address, Company, Geo, RecordId};

    fn valid_user() -> NewUser {
        NewUser {
            name: "Ada Lovelace".into(),
            username: "ada_l".into(),
            email: "ada@example.com".into(),
            phone: "+15551234567".into(),
            website: "example.org".into(),
            address: Address {
                street: "12 Analytical Row".into(),
                suite: String::new(),
                city: "London".into(),
                zipcode: "12345-6789".into(),
                geo: Geo {
                    lat: "51.5072".into(),
                    lng: "-0.1276".into(),
                },
            },
            company: Company {
                name: "Engines Ltd".into(),
                catch_phrase: String::new(),
                bs: String::new(),
            },
        }
    }

    #[test]
    fn accepts_valid_user() {
        assert!(valid_user().validate().is_ok());
    }

    #[test]
    fn collects_every_violation() {
        let mut user = valid_user();
        user.name = "A".into();
        user.username = "no spaces".into();
        user.address.zipcode = "ABCDE".into();

        let errs = user.validate().unwrap_err();
        assert_eq!(errs.len(), 3);
        assert_eq!(
            errs.message_for("name"),
            Some("Name must be at least 2 characters")
        );
        assert_eq!(
            errs.message_for("username"),
            Some("Username can only contain letters, numbers, and underscores")
        );
        assert!(errs.message_for("address.zipcode").is_some());
    }

    #[test]
    fn required_fields_report_required_only() {
        let errs = NewUser::default().validate().unwrap_err();
        assert_eq!(errs.message_for("name"), Some("Name is required"));
        assert_eq!(errs.message_for("email"), Some("Email is required"));
        assert_eq!(
            errs.message_for("company.name"),
            Some("Company name is required")
        );
        assert_eq!(
            errs.violations()
                .iter()
                .filter(|v| v.field == "name")
                .count(),
            1
        );
        // Optional fields stay quiet when empty.
        assert!(errs.message_for("website").is_none());
        assert!(errs.message_for("address.geo.lat").is_none());
    }

    #[test]
    fn phone_pattern_rejects_extensions() {
        let mut user = valid_user();
        user.phone = "1-770-736-8031 x56442".into();
        assert!(user.validate().unwrap_err().message_for("phone").is_some());
    }

    #[test]
    fn edits_only_judge_changed_fields() {
        let mut stored = User::from_draft(RecordId::new(1), valid_user());
        stored.phone = "1-770-736-8031 x56442".into();

        let mut renamed = stored.clone();
        renamed.name = "Leanne G.".into();
        assert!(validate_changes(&renamed, &stored).is_ok());

        let mut bad_zip = stored.clone();
        bad_zip.address.zipcode = "ABCDE".into();
        let errs = validate_changes(&bad_zip, &stored).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs.message_for("address.zipcode").is_some());

        let mut bad_phone = stored.clone();
        bad_phone.phone = "call me".into();
        assert!(
            validate_changes(&bad_phone, &stored)
                .unwrap_err()
                .message_for("phone")
                .is_some()
        );
    }

    #[test]
    fn website_rules() {
        assert!(is_website("hildegard.org"));
        assert!(is_website("https://anastasia.net/path"));
        assert!(!is_website("ftp://files.example.org"));
        assert!(!is_website("localhost"));
        assert!(!is_website("not a url"));
    }

    #[test]
    fn coordinates() {
        assert!(LATITUDE.is_match("-37.3159"));
        assert!(!LATITUDE.is_match("91.0"));
        assert!(LONGITUDE.is_match("81.1496"));
        assert!(!LONGITUDE.is_match("east"));
    }

    #[test]
    fn post_rules() {
        let ok = NewPost {
            user_id: RecordId::new(1),
            title: "A fine title".into(),
            body: "Plenty of body text".into(),
        };
        assert!(ok.validate().is_ok());

        let bad = NewPost {
            user_id: RecordId::new(0),
            title: "   ".into(),
            body: "short".into(),
        };
        let errs = bad.validate().unwrap_err();
        assert_eq!(errs.message_for("userId"), Some("Please select an author"));
        assert_eq!(errs.message_for("title"), Some("Title is required"));
        assert_eq!(
            errs.message_for("body"),
            Some("Content must be at least 10 characters")
        );
    }

    #[test]
    fn display_joins_violations() {
        let errs = NewPost::default().validate().unwrap_err();
        let text = errs.to_string();
        assert!(text.starts_with("userId: Please select an author; "));
    }
}

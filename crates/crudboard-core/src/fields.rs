// ── Typed edit paths ──
//
// Every editable field of an entity is a variant here, addressed by the same
// dotted path the JSON shape uses (`address.geo.lat`, `company.catchPhrase`).
// Edits go through `Editable::set_field`, so the set of writable fields is
// closed and checked at compile time.

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;

use crate::model::{Post, RecordId, User};

/// A field path that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Unknown field '{path}' (expected one of: {expected})")]
    UnknownPath { path: String, expected: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Records whose fields can be set one at a time from text.
pub trait Editable {
    type Field: Copy
        + std::fmt::Display
        + std::str::FromStr<Err = strum::ParseError>
        + IntoEnumIterator
        + Send
        + Sync
        + 'static;

    /// Replace one field with `value`, leaving everything else intact.
    fn set_field(&mut self, field: Self::Field, value: &str) -> Result<(), FieldError>;

    /// Current value of one field, rendered as text.
    fn field_value(&self, field: Self::Field) -> String;

    /// Parse a dotted path into a field of this record type.
    fn parse_field(path: &str) -> Result<Self::Field, FieldError> {
        path.parse().map_err(|_| FieldError::UnknownPath {
            path: path.to_owned(),
            expected: Self::Field::iter()
                .map(|f| f.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

// ── User ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum UserField {
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "username")]
    Username,
    #[strum(serialize = "email")]
    Email,
    #[strum(serialize = "phone")]
    Phone,
    #[strum(serialize = "website")]
    Website,
    #[strum(serialize = "address.street")]
    Street,
    #[strum(serialize = "address.suite")]
    Suite,
    #[strum(serialize = "address.city")]
    City,
    #[strum(serialize = "address.zipcode")]
    Zipcode,
    #[strum(serialize = "address.geo.lat")]
    Latitude,
    #[strum(serialize = "address.geo.lng")]
    Longitude,
    #[strum(serialize = "company.name")]
    CompanyName,
    #[strum(serialize = "company.catchPhrase")]
    CatchPhrase,
    #[strum(serialize = "company.bs")]
    Bs,
}

impl UserField {
    fn slot(self, user: &mut User) -> &mut String {
        match self {
            Self::Name => &mut user.name,
            Self::Username => &mut user.username,
            Self::Email => &mut user.email,
            Self::Phone => &mut user.phone,
            Self::Website => &mut user.website,
            Self::Street => &mut user.address.street,
            Self::Suite => &mut user.address.suite,
            Self::City => &mut user.address.city,
            Self::Zipcode => &mut user.address.zipcode,
            Self::Latitude => &mut user.address.geo.lat,
            Self::Longitude => &mut user.address.geo.lng,
            Self::CompanyName => &mut user.company.name,
            Self::CatchPhrase => &mut user.company.catch_phrase,
            Self::Bs => &mut user.company.bs,
        }
    }

    fn get(self, user: &User) -> &str {
        match self {
            Self::Name => &user.name,
            Self::Username => &user.username,
            Self::Email => &user.email,
            Self::Phone => &user.phone,
            Self::Website => &user.website,
            Self::Street => &user.address.street,
            Self::Suite => &user.address.suite,
            Self::City => &user.address.city,
            Self::Zipcode => &user.address.zipcode,
            Self::Latitude => &user.address.geo.lat,
            Self::Longitude => &user.address.geo.lng,
            Self::CompanyName => &user.company.name,
            Self::CatchPhrase => &user.company.catch_phrase,
            Self::Bs => &user.company.bs,
        }
    }
}

impl Editable for User {
    type Field = UserField;

    fn set_field(&mut self, field: UserField, value: &str) -> Result<(), FieldError> {
        value.clone_into(field.slot(self));
        Ok(())
    }

    fn field_value(&self, field: UserField) -> String {
        field.get(self).to_owned()
    }
}

// ── Post ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum PostField {
    #[strum(serialize = "title")]
    Title,
    #[strum(serialize = "body")]
    Body,
    #[strum(serialize = "userId")]
    UserId,
}

impl Editable for Post {
    type Field = PostField;

    fn set_field(&mut self, field: PostField, value: &str) -> Result<(), FieldError> {
        match field {
            PostField::Title => value.clone_into(&mut self.title),
            PostField::Body => value.clone_into(&mut self.body),
            PostField::UserId => {
                self.user_id =
                    value
                        .parse::<RecordId>()
                        .map_err(|e| FieldError::InvalidValue {
                            field: field.to_string(),
                            reason: e.to_string(),
                        })?;
            }
        }
        Ok(())
    }

    fn field_value(&self, field: PostField) -> String {
        match field {
            PostField::Title => self.title.clone(),
            PostField::Body => self.body.clone(),
            PostField::UserId => self.user_id.to_string(),
        }
    }
}

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::errors::{CustomResult, Error};

pub struct Helpers {}

impl Helpers {
    /// # derive an id from a display name
    /// lowercases the name and replaces every run of whitespace with a single hyphen.
    ///
    /// ## Arguments
    /// * `name` - the display name
    ///
    /// ## Returns
    /// * `String` - the derived id
    pub fn slugify(name: &str) -> String {
        static WHITESPACE: OnceLock<Regex> = OnceLock::new();
        let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));

        whitespace.replace_all(&name.to_lowercase(), "-").into_owned()
    }

    /// case-insensitive name comparison used for uniqueness checks
    pub fn same_name(a: &str, b: &str) -> bool {
        a.to_lowercase() == b.to_lowercase()
    }

    pub fn today() -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    /// # unwrap a required request field
    /// missing and blank values are a validation error carrying `message`
    pub fn required<T>(value: Option<T>, message: &str) -> CustomResult<T>
    where
        T: IsBlank,
    {
        match value {
            Some(value) if !value.is_blank() => Ok(value),
            _ => Err(Error::validation(message)),
        }
    }
}

/// values that count as missing when sent empty
pub trait IsBlank {
    fn is_blank(&self) -> bool;
}

impl IsBlank for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl IsBlank for u32 {
    fn is_blank(&self) -> bool {
        *self == 0
    }
}

impl<T> IsBlank for Vec<T> {
    fn is_blank(&self) -> bool {
        false
    }
}

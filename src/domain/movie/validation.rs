//! Field-level validation of untrusted movie payloads.
//!
//! Both entry points walk the known fields in a fixed order and collect every
//! violation instead of stopping at the first one. Keys that are not movie
//! fields (including `id`) are ignored.

use super::{Genre, MoviePatch, NewMovie};
use chrono::Datelike;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use url::Url;
use utoipa::ToSchema;

pub const MIN_RELEASE_YEAR: i32 = 1900;
pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 10.0;

/// Field name used when the payload itself is not an object.
pub const BODY_FIELD: &str = "<body>";

/// Latest accepted release year: next calendar year (UTC).
pub fn max_release_year() -> i32 {
    chrono::Utc::now().year() + 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    Required,
    InvalidType,
    TooSmall,
    TooBig,
    InvalidUrl,
    InvalidEnumValue,
}

/// One field-level problem with a payload.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Violation {
    /// Field name, `genre[i]` for an array element, or `<body>`.
    pub field: String,
    pub code: ViolationCode,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }

    fn required(field: &str) -> Self {
        Self::new(field, ViolationCode::Required, format!("{} is required", field))
    }

    fn invalid_type(field: &str, expected: &str, got: &JsonValue) -> Self {
        Self::new(
            field,
            ViolationCode::InvalidType,
            format!("Expected {}, received {}", expected, json_kind(got)),
        )
    }
}

/// Non-empty list of violations produced by a failed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn single(violation: Violation) -> Self {
        Self(vec![violation])
    }

    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.0
    }

    /// Names of the offending fields, in report order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|v| v.field.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validates a full movie (every field required).
pub fn validate_movie(payload: &JsonValue) -> Result<NewMovie, ValidationErrors> {
    let mut reader = FieldReader::new(payload)?;

    let title = reader.required("title", parse_text);
    let year = reader.required("year", parse_year);
    let director = reader.required("director", parse_text);
    let duration = reader.required("duration", parse_duration);
    let rating = reader.required("rating", parse_rating);
    let poster = reader.required("poster", parse_poster);
    let genre = reader.required("genre", parse_genres);

    let (
        Some(title),
        Some(year),
        Some(director),
        Some(duration),
        Some(rating),
        Some(poster),
        Some(genre),
    ) = (title, year, director, duration, rating, poster, genre)
    else {
        // Every `None` above pushed at least one violation.
        return Err(reader.into_errors());
    };
    reader.finish()?;

    Ok(NewMovie {
        title,
        year,
        director,
        duration,
        rating,
        poster,
        genre,
    })
}

/// Validates only the fields present in `payload`.
pub fn validate_partial_movie(payload: &JsonValue) -> Result<MoviePatch, ValidationErrors> {
    let mut reader = FieldReader::new(payload)?;

    let patch = MoviePatch {
        title: reader.optional("title", parse_text),
        year: reader.optional("year", parse_year),
        director: reader.optional("director", parse_text),
        duration: reader.optional("duration", parse_duration),
        rating: reader.optional("rating", parse_rating),
        poster: reader.optional("poster", parse_poster),
        genre: reader.optional("genre", parse_genres),
    };

    reader.finish()?;
    Ok(patch)
}

type Parser<T> = fn(&str, &JsonValue) -> Result<T, Vec<Violation>>;

struct FieldReader<'a> {
    object: &'a Map<String, JsonValue>,
    violations: Vec<Violation>,
}

impl<'a> FieldReader<'a> {
    fn new(payload: &'a JsonValue) -> Result<Self, ValidationErrors> {
        let object = payload.as_object().ok_or_else(|| {
            ValidationErrors::single(Violation::invalid_type(BODY_FIELD, "object", payload))
        })?;
        Ok(Self {
            object,
            violations: Vec::new(),
        })
    }

    fn required<T>(&mut self, field: &str, parse: Parser<T>) -> Option<T> {
        match self.object.get(field) {
            Some(value) => self.run(field, value, parse),
            None => {
                self.violations.push(Violation::required(field));
                None
            }
        }
    }

    fn optional<T>(&mut self, field: &str, parse: Parser<T>) -> Option<T> {
        let value = self.object.get(field)?;
        self.run(field, value, parse)
    }

    fn run<T>(&mut self, field: &str, value: &JsonValue, parse: Parser<T>) -> Option<T> {
        match parse(field, value) {
            Ok(v) => Some(v),
            Err(mut errs) => {
                self.violations.append(&mut errs);
                None
            }
        }
    }

    fn into_errors(self) -> ValidationErrors {
        ValidationErrors(self.violations)
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.violations))
        }
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(n) if n.is_f64() => "float",
        JsonValue::Number(_) => "integer",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Integral JSON numbers, including floats with no fractional part (`2010.0`).
///
/// Values outside the `i64` range saturate, so range checks still report them
/// as too small or too big.
fn as_integer(value: &JsonValue) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_u64().map(|_| i64::MAX))
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        })
}

fn parse_text(field: &str, value: &JsonValue) -> Result<String, Vec<Violation>> {
    let s = value
        .as_str()
        .ok_or_else(|| vec![Violation::invalid_type(field, "string", value)])?;
    if s.trim().is_empty() {
        return Err(vec![Violation::new(
            field,
            ViolationCode::TooSmall,
            format!("{} must not be empty", field),
        )]);
    }
    Ok(s.to_string())
}

fn parse_year(field: &str, value: &JsonValue) -> Result<i32, Vec<Violation>> {
    let n = as_integer(value).ok_or_else(|| vec![Violation::invalid_type(field, "integer", value)])?;
    let max = max_release_year();
    if n < MIN_RELEASE_YEAR as i64 {
        return Err(vec![Violation::new(
            field,
            ViolationCode::TooSmall,
            format!("{} must be {} or later", field, MIN_RELEASE_YEAR),
        )]);
    }
    if n > max as i64 {
        return Err(vec![Violation::new(
            field,
            ViolationCode::TooBig,
            format!("{} must be {} or earlier", field, max),
        )]);
    }
    Ok(n as i32)
}

fn parse_duration(field: &str, value: &JsonValue) -> Result<u32, Vec<Violation>> {
    let n = as_integer(value).ok_or_else(|| vec![Violation::invalid_type(field, "integer", value)])?;
    if n < 1 {
        return Err(vec![Violation::new(
            field,
            ViolationCode::TooSmall,
            format!("{} must be a positive number of minutes", field),
        )]);
    }
    u32::try_from(n).map_err(|_| {
        vec![Violation::new(
            field,
            ViolationCode::TooBig,
            format!("{} must be at most {}", field, u32::MAX),
        )]
    })
}

fn parse_rating(field: &str, value: &JsonValue) -> Result<f64, Vec<Violation>> {
    let n = value
        .as_f64()
        .ok_or_else(|| vec![Violation::invalid_type(field, "number", value)])?;
    if n < MIN_RATING {
        return Err(vec![Violation::new(
            field,
            ViolationCode::TooSmall,
            format!("{} must be at least {}", field, MIN_RATING),
        )]);
    }
    if n > MAX_RATING {
        return Err(vec![Violation::new(
            field,
            ViolationCode::TooBig,
            format!("{} must be at most {}", field, MAX_RATING),
        )]);
    }
    Ok(n)
}

fn parse_poster(field: &str, value: &JsonValue) -> Result<String, Vec<Violation>> {
    let s = value
        .as_str()
        .ok_or_else(|| vec![Violation::invalid_type(field, "string", value)])?;
    Url::parse(s).map_err(|e| {
        vec![Violation::new(
            field,
            ViolationCode::InvalidUrl,
            format!("{} must be a valid URL ({})", field, e),
        )]
    })?;
    Ok(s.to_string())
}

fn parse_genres(field: &str, value: &JsonValue) -> Result<Vec<Genre>, Vec<Violation>> {
    let items = value
        .as_array()
        .ok_or_else(|| vec![Violation::invalid_type(field, "array", value)])?;
    if items.is_empty() {
        return Err(vec![Violation::new(
            field,
            ViolationCode::TooSmall,
            format!("{} must contain at least one value", field),
        )]);
    }

    let mut genres: Vec<Genre> = Vec::with_capacity(items.len());
    let mut errors: Vec<Violation> = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        let item_field = format!("{}[{}]", field, idx);
        let Some(name) = item.as_str() else {
            errors.push(Violation::invalid_type(&item_field, "string", item));
            continue;
        };
        match Genre::from_name(name) {
            Some(g) if !genres.contains(&g) => genres.push(g),
            Some(_) => {}
            None => {
                let allowed: Vec<&str> = Genre::ALL.iter().map(Genre::as_str).collect();
                errors.push(Violation::new(
                    item_field,
                    ViolationCode::InvalidEnumValue,
                    format!(
                        "Invalid genre '{}'. Expected one of: {}",
                        name,
                        allowed.join(", ")
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(genres)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> JsonValue {
        json!({
            "title": "The Matrix",
            "year": 1999,
            "director": "Lana Wachowski",
            "duration": 136,
            "rating": 8.7,
            "poster": "https://example.com/matrix.jpg",
            "genre": ["Action", "Sci-Fi"]
        })
    }

    fn codes(errs: &ValidationErrors) -> Vec<(String, ViolationCode)> {
        errs.violations()
            .iter()
            .map(|v| (v.field.clone(), v.code))
            .collect()
    }

    #[test]
    fn accepts_a_complete_movie() {
        let movie = validate_movie(&valid_payload()).unwrap();
        assert_eq!(movie.title, "The Matrix");
        assert_eq!(movie.year, 1999);
        assert_eq!(movie.duration, 136);
        assert_eq!(movie.genre, vec![Genre::Action, Genre::SciFi]);
    }

    #[test]
    fn missing_title_is_reported_as_required() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("title");
        let errs = validate_movie(&payload).unwrap_err();
        assert_eq!(codes(&errs), vec![("title".to_string(), ViolationCode::Required)]);
    }

    #[test]
    fn collects_every_violation() {
        let payload = json!({
            "title": "",
            "year": 1850,
            "director": 42,
            "duration": 0,
            "rating": 11,
            "poster": "not a url",
            "genre": ["Drama", "Musical", 3]
        });
        let errs = validate_movie(&payload).unwrap_err();
        assert_eq!(
            codes(&errs),
            vec![
                ("title".to_string(), ViolationCode::TooSmall),
                ("year".to_string(), ViolationCode::TooSmall),
                ("director".to_string(), ViolationCode::InvalidType),
                ("duration".to_string(), ViolationCode::TooSmall),
                ("rating".to_string(), ViolationCode::TooBig),
                ("poster".to_string(), ViolationCode::InvalidUrl),
                ("genre[1]".to_string(), ViolationCode::InvalidEnumValue),
                ("genre[2]".to_string(), ViolationCode::InvalidType),
            ]
        );
    }

    #[test]
    fn year_upper_bound_is_next_year() {
        let mut payload = valid_payload();
        payload["year"] = json!(max_release_year());
        assert!(validate_movie(&payload).is_ok());

        payload["year"] = json!(max_release_year() + 1);
        let errs = validate_movie(&payload).unwrap_err();
        assert_eq!(codes(&errs), vec![("year".to_string(), ViolationCode::TooBig)]);
    }

    #[test]
    fn fractional_year_is_rejected_but_integral_float_is_not() {
        let mut payload = valid_payload();
        payload["year"] = json!(1999.5);
        assert!(validate_movie(&payload).is_err());

        payload["year"] = json!(1999.0);
        assert_eq!(validate_movie(&payload).unwrap().year, 1999);
    }

    #[test]
    fn huge_integers_are_out_of_range_not_mistyped() {
        let mut payload = valid_payload();
        payload["year"] = json!(u64::MAX);
        payload["duration"] = json!(u64::MAX);
        let errs = validate_movie(&payload).unwrap_err();
        assert_eq!(
            codes(&errs),
            vec![
                ("year".to_string(), ViolationCode::TooBig),
                ("duration".to_string(), ViolationCode::TooBig),
            ]
        );

        payload["year"] = json!(-1e30);
        payload["duration"] = json!(1e30);
        let errs = validate_movie(&payload).unwrap_err();
        assert_eq!(
            codes(&errs),
            vec![
                ("year".to_string(), ViolationCode::TooSmall),
                ("duration".to_string(), ViolationCode::TooBig),
            ]
        );
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        let mut payload = valid_payload();
        payload["rating"] = json!(0);
        assert!(validate_movie(&payload).is_ok());
        payload["rating"] = json!(10);
        assert!(validate_movie(&payload).is_ok());
        payload["rating"] = json!(-0.1);
        assert!(validate_movie(&payload).is_err());
    }

    #[test]
    fn empty_or_duplicate_genres() {
        let mut payload = valid_payload();
        payload["genre"] = json!([]);
        let errs = validate_movie(&payload).unwrap_err();
        assert_eq!(codes(&errs), vec![("genre".to_string(), ViolationCode::TooSmall)]);

        payload["genre"] = json!(["Drama", "Drama", "Crime"]);
        assert_eq!(
            validate_movie(&payload).unwrap().genre,
            vec![Genre::Drama, Genre::Crime]
        );
    }

    #[test]
    fn genre_names_are_case_sensitive_on_write() {
        let mut payload = valid_payload();
        payload["genre"] = json!(["drama"]);
        assert!(validate_movie(&payload).is_err());
    }

    #[test]
    fn non_object_body_is_a_single_violation() {
        let errs = validate_movie(&json!([1, 2])).unwrap_err();
        assert_eq!(codes(&errs), vec![(BODY_FIELD.to_string(), ViolationCode::InvalidType)]);
        assert_eq!(errs.violations()[0].message, "Expected object, received array");
    }

    #[test]
    fn partial_validates_only_present_fields() {
        let patch = validate_partial_movie(&json!({ "rating": 9.5 })).unwrap();
        assert_eq!(patch.rating, Some(9.5));
        assert_eq!(patch.title, None);

        let errs = validate_partial_movie(&json!({ "rating": "high", "year": 2000 })).unwrap_err();
        assert_eq!(codes(&errs), vec![("rating".to_string(), ViolationCode::InvalidType)]);
    }

    #[test]
    fn partial_ignores_id_and_unknown_keys() {
        let patch = validate_partial_movie(&json!({ "id": "other", "studio": "X" })).unwrap();
        assert_eq!(patch, MoviePatch::default());
    }

    #[test]
    fn null_is_an_invalid_type_not_an_absence() {
        let errs = validate_partial_movie(&json!({ "title": null })).unwrap_err();
        assert_eq!(codes(&errs), vec![("title".to_string(), ViolationCode::InvalidType)]);
    }
}

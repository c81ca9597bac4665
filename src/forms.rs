use serde::Deserialize;

use crate::csrf;

pub const REQUIRED: &str = "This field is required.";
pub const NOT_A_FLOAT: &str = "Not a valid float value.";

#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Validation failures keyed by form field name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError { field, message: message.into() });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0.iter().filter(move |e| e.field == field).map(|e| e.message.as_str())
    }

    pub fn has(&self, field: &str) -> bool {
        self.for_field(field).next().is_some()
    }

    fn into_result<T>(self, ok: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(ok()) } else { Err(self) }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddMovieForm {
    pub title: String,
    pub csrf_token: String,
}

#[derive(Debug, PartialEq)]
pub struct ValidAddMovie {
    pub title: String,
}

impl AddMovieForm {
    pub fn validate(&self, expected_csrf: Option<&str>) -> Result<ValidAddMovie, FieldErrors> {
        let mut errors = FieldErrors::default();
        csrf::check(expected_csrf, &self.csrf_token, &mut errors);

        let title = self.title.trim();
        if title.is_empty() {
            errors.push("title", REQUIRED);
        }

        errors.into_result(|| ValidAddMovie { title: title.to_string() })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EditMovieForm {
    pub rating: String,
    pub review: String,
    pub csrf_token: String,
}

#[derive(Debug, PartialEq)]
pub struct ValidEditMovie {
    pub rating: f64,
    pub review: String,
}

impl EditMovieForm {
    pub fn validate(&self, expected_csrf: Option<&str>) -> Result<ValidEditMovie, FieldErrors> {
        let mut errors = FieldErrors::default();
        csrf::check(expected_csrf, &self.csrf_token, &mut errors);

        let raw_rating = self.rating.trim();
        let rating = if raw_rating.is_empty() {
            errors.push("rating", REQUIRED);
            None
        } else {
            match raw_rating.parse::<f64>() {
                Ok(r) if r.is_finite() => Some(r),
                _ => {
                    errors.push("rating", NOT_A_FLOAT);
                    None
                },
            }
        };

        let review = self.review.trim();
        if review.is_empty() {
            errors.push("review", REQUIRED);
        }

        match rating {
            Some(rating) => {
                errors.into_result(|| ValidEditMovie { rating, review: review.to_string() })
            },
            None => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "token-123";

    fn edit(rating: &str, review: &str) -> EditMovieForm {
        EditMovieForm {
            rating: rating.to_string(),
            review: review.to_string(),
            csrf_token: TOKEN.to_string(),
        }
    }

    #[test]
    fn add_requires_title() {
        let form = AddMovieForm { title: "  ".into(), csrf_token: TOKEN.into() };
        let errors = form.validate(Some(TOKEN)).unwrap_err();
        assert_eq!(errors.for_field("title").collect::<Vec<_>>(), vec![REQUIRED]);

        let form = AddMovieForm { title: " Inception ".into(), csrf_token: TOKEN.into() };
        assert_eq!(
            form.validate(Some(TOKEN)).unwrap(),
            ValidAddMovie { title: "Inception".into() }
        );
    }

    #[test]
    fn add_rejects_bad_token() {
        let form = AddMovieForm { title: "Inception".into(), csrf_token: "forged".into() };
        let errors = form.validate(Some(TOKEN)).unwrap_err();
        assert!(errors.has(csrf::FIELD));
        assert!(!errors.has("title"));

        let form = AddMovieForm { title: "Inception".into(), csrf_token: TOKEN.into() };
        assert!(form.validate(None).unwrap_err().has(csrf::FIELD));
    }

    #[test]
    fn edit_accepts_rating_and_review() {
        assert_eq!(
            edit("8.5", " Great ").validate(Some(TOKEN)).unwrap(),
            ValidEditMovie { rating: 8.5, review: "Great".into() }
        );
        assert_eq!(edit("0", "Awful").validate(Some(TOKEN)).unwrap().rating, 0.0);
    }

    #[test]
    fn edit_reports_each_bad_field() {
        let errors = edit("", "").validate(Some(TOKEN)).unwrap_err();
        assert_eq!(errors.for_field("rating").collect::<Vec<_>>(), vec![REQUIRED]);
        assert_eq!(errors.for_field("review").collect::<Vec<_>>(), vec![REQUIRED]);

        let errors = edit("great", "Great").validate(Some(TOKEN)).unwrap_err();
        assert_eq!(errors.for_field("rating").collect::<Vec<_>>(), vec![NOT_A_FLOAT]);
        assert!(!errors.has("review"));

        assert!(edit("NaN", "Great").validate(Some(TOKEN)).unwrap_err().has("rating"));
        assert!(edit("inf", "Great").validate(Some(TOKEN)).unwrap_err().has("rating"));
    }
}

//! Per-field input rules. Every rule appends to one error map so a single
//! response reports all problems of a payload.

use std::collections::HashSet;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use foodgram_errors::FieldErrors;
use foodgram_sdk::{IngredientAmount, NewUser, RecipePatch};

use crate::domain::error::DomainError;

pub const RECIPE_NAME_MAX_LEN: usize = 200;
pub const EMAIL_MAX_LEN: usize = 254;
pub const USERNAME_MAX_LEN: usize = 150;
pub const PERSON_NAME_MAX_LEN: usize = 150;
/// Bounds of a positive small integer column.
pub const SMALL_MIN: i32 = 1;
pub const SMALL_MAX: i32 = 32_767;

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_BLANK: &str = "This field may not be blank.";
pub const MSG_NO_INGREDIENTS: &str = "Add at least one ingredient.";
pub const MSG_DUPLICATE_INGREDIENTS: &str = "Ingredients must be unique.";
pub const MSG_AMOUNT_RANGE: &str = "Amount must be between 1 and 32767.";
pub const MSG_COOKING_TIME_RANGE: &str = "Cooking time must be between 1 and 32767.";
pub const MSG_BAD_IMAGE: &str = "Upload a valid image encoded as a base64 data URI.";

/// Accumulates field errors.
#[derive(Debug, Default)]
pub struct Errors(FieldErrors);

impl Errors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_owned()).or_default().push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// # Errors
    /// [`DomainError::Validation`] when any error was recorded.
    pub fn finish(self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.0))
        }
    }
}

fn check_text(errors: &mut Errors, field: &str, value: &str, max_len: Option<usize>) {
    if value.trim().is_empty() {
        errors.add(field, MSG_BLANK);
        return;
    }
    if let Some(max) = max_len {
        let len = value.chars().count();
        if len > max {
            errors.add(
                field,
                format!("Ensure this field has no more than {max} characters."),
            );
        }
    }
}

/// Accepts `data:image/<subtype>;base64,<payload>` with a decodable payload.
#[must_use]
pub fn is_valid_image(value: &str) -> bool {
    let Some(rest) = value.strip_prefix("data:image/") else {
        return false;
    };
    let Some((subtype, payload)) = rest.split_once(";base64,") else {
        return false;
    };
    !subtype.is_empty()
        && !payload.is_empty()
        && STANDARD.decode(payload.as_bytes()).is_ok_and(|b| !b.is_empty())
}

pub fn check_image(errors: &mut Errors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, MSG_REQUIRED);
    } else if !is_valid_image(value) {
        errors.add(field, MSG_BAD_IMAGE);
    }
}

fn check_ingredients(errors: &mut Errors, items: &[IngredientAmount]) {
    if items.is_empty() {
        errors.add("ingredients", MSG_NO_INGREDIENTS);
        return;
    }
    let mut seen = HashSet::with_capacity(items.len());
    if !items.iter().all(|i| seen.insert(i.ingredient_id)) {
        errors.add("ingredients", MSG_DUPLICATE_INGREDIENTS);
    }
    if items
        .iter()
        .any(|i| !(SMALL_MIN..=SMALL_MAX).contains(&i.amount))
    {
        errors.add("ingredients", MSG_AMOUNT_RANGE);
    }
}

/// Validate the fields present in a recipe write. Creation and full updates
/// pass a patch with every field set.
///
/// # Errors
/// [`DomainError::Validation`] with every failing field.
pub fn validate_recipe(patch: &RecipePatch) -> Result<(), DomainError> {
    let mut errors = Errors::default();

    if let Some(name) = &patch.name {
        check_text(&mut errors, "name", name, Some(RECIPE_NAME_MAX_LEN));
    }
    if let Some(text) = &patch.text {
        check_text(&mut errors, "text", text, None);
    }
    if let Some(image) = &patch.image {
        check_image(&mut errors, "image", image);
    }
    if let Some(t) = patch.cooking_time
        && !(SMALL_MIN..=SMALL_MAX).contains(&t)
    {
        errors.add("cooking_time", MSG_COOKING_TIME_RANGE);
    }
    if let Some(items) = &patch.ingredients {
        check_ingredients(&mut errors, items);
    }

    errors.finish()
}

fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !value.chars().any(char::is_whitespace)
}

/// Letters, digits and `@ . + - _`.
fn is_valid_username(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

/// # Errors
/// [`DomainError::Validation`] with every failing field.
pub fn validate_new_user(user: &NewUser) -> Result<(), DomainError> {
    let mut errors = Errors::default();

    check_text(&mut errors, "email", &user.email, Some(EMAIL_MAX_LEN));
    if !user.email.trim().is_empty() && !is_valid_email(&user.email) {
        errors.add("email", "Enter a valid email address.");
    }

    check_text(&mut errors, "username", &user.username, Some(USERNAME_MAX_LEN));
    if !user.username.is_empty() && !is_valid_username(&user.username) {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }

    check_text(&mut errors, "first_name", &user.first_name, Some(PERSON_NAME_MAX_LEN));
    check_text(&mut errors, "last_name", &user.last_name, Some(PERSON_NAME_MAX_LEN));
    check_text(&mut errors, "password", &user.password, None);

    errors.finish()
}

/// # Errors
/// [`DomainError::Validation`] when the new password is blank.
pub fn validate_new_password(new_password: &str) -> Result<(), DomainError> {
    let mut errors = Errors::default();
    check_text(&mut errors, "new_password", new_password, None);
    errors.finish()
}

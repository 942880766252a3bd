//! Per-entity validators for bootcamps, courses, reviews and users.

use super::rules::{is_valid_email, is_valid_url, max_chars, one_of, required, required_text};
use super::{FieldViolation, WriteMode};

/// Career tags a bootcamp may advertise.
pub const CAREERS: &[&str] = &[
    "Web Development",
    "Mobile Development",
    "UI/UX",
    "Data Science",
    "Business",
    "Other",
];

/// Allowed values for `Course.minimumSkill`.
pub const MINIMUM_SKILLS: &[&str] = &["beginner", "intermediate", "advanced"];

/// Photo filename assigned to bootcamps that never uploaded one.
pub const DEFAULT_PHOTO: &str = "no-photo.jpg";

pub const MAX_BOOTCAMP_NAME_CHARS: usize = 50;
pub const MAX_BOOTCAMP_DESCRIPTION_CHARS: usize = 500;
pub const MAX_PHONE_CHARS: usize = 20;
pub const MAX_REVIEW_TITLE_CHARS: usize = 100;
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 10;
pub const MIN_PASSWORD_LENGTH: usize = 6;

// ---------------------------------------------------------------------------
// Bootcamp
// ---------------------------------------------------------------------------

/// Borrowed view of the client-writable bootcamp fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct BootcampDraft<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub website: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub address: Option<&'a str>,
    pub careers: Option<&'a [String]>,
}

pub fn validate_bootcamp(draft: &BootcampDraft<'_>, mode: WriteMode) -> Vec<FieldViolation> {
    let mut out = Vec::new();

    if let Some(name) = required_text(&mut out, "name", draft.name, mode, "Please add a name") {
        max_chars(
            &mut out,
            "name",
            name,
            MAX_BOOTCAMP_NAME_CHARS,
            "Name cannot be more than 50 characters",
        );
    }

    if let Some(description) = required_text(
        &mut out,
        "description",
        draft.description,
        mode,
        "Please add a description",
    ) {
        max_chars(
            &mut out,
            "description",
            description,
            MAX_BOOTCAMP_DESCRIPTION_CHARS,
            "Description cannot be more than 500 characters",
        );
    }

    if let Some(website) = draft.website {
        if !is_valid_url(website) {
            out.push(FieldViolation::new(
                "website",
                "Please use a valid URL with HTTP or HTTPS",
            ));
        }
    }

    if let Some(phone) = draft.phone {
        max_chars(
            &mut out,
            "phone",
            phone,
            MAX_PHONE_CHARS,
            "Phone number cannot be more than 20 characters",
        );
    }

    if let Some(email) = draft.email {
        if !is_valid_email(email) {
            out.push(FieldViolation::new("email", "Please add a valid email"));
        }
    }

    required_text(&mut out, "address", draft.address, mode, "Please add an address");

    match draft.careers {
        Some([]) => out.push(FieldViolation::new("careers", "Please add at least one career")),
        Some(careers) => {
            for career in careers {
                one_of(&mut out, "careers", career, CAREERS);
            }
        }
        None if mode == WriteMode::Create => {
            out.push(FieldViolation::new("careers", "Please add at least one career"));
        }
        None => {}
    }

    out
}

// ---------------------------------------------------------------------------
// Course
// ---------------------------------------------------------------------------

/// Borrowed view of the client-writable course fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct CourseDraft<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub weeks: Option<&'a str>,
    pub tuition: Option<f64>,
    pub minimum_skill: Option<&'a str>,
}

pub fn validate_course(draft: &CourseDraft<'_>, mode: WriteMode) -> Vec<FieldViolation> {
    let mut out = Vec::new();

    required_text(&mut out, "title", draft.title, mode, "Please add a course title");
    required_text(
        &mut out,
        "description",
        draft.description,
        mode,
        "Please add a description",
    );
    required_text(&mut out, "weeks", draft.weeks, mode, "Please add number of weeks");

    if let Some(tuition) = required(&mut out, "tuition", draft.tuition, mode, "Please add a tuition cost") {
        if !tuition.is_finite() || tuition < 0.0 {
            out.push(FieldViolation::new("tuition", "Tuition cannot be negative"));
        }
    }

    if let Some(skill) = required_text(
        &mut out,
        "minimumSkill",
        draft.minimum_skill,
        mode,
        "Please add a minimum skill",
    ) {
        one_of(&mut out, "minimumSkill", skill, MINIMUM_SKILLS);
    }

    out
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

/// Borrowed view of the client-writable review fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReviewDraft<'a> {
    pub title: Option<&'a str>,
    pub text: Option<&'a str>,
    pub rating: Option<i32>,
}

pub fn validate_review(draft: &ReviewDraft<'_>, mode: WriteMode) -> Vec<FieldViolation> {
    let mut out = Vec::new();

    if let Some(title) = required_text(
        &mut out,
        "title",
        draft.title,
        mode,
        "Please add a title for the review",
    ) {
        max_chars(
            &mut out,
            "title",
            title,
            MAX_REVIEW_TITLE_CHARS,
            "Title cannot be more than 100 characters",
        );
    }

    required_text(&mut out, "text", draft.text, mode, "Please add some text");

    let rating_message = "Please add a rating between 1 and 10";
    if let Some(rating) = required(&mut out, "rating", draft.rating, mode, rating_message) {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            out.push(FieldViolation::new("rating", rating_message));
        }
    }

    out
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// Borrowed view of the client-writable user fields.
///
/// `password` is the plaintext; it is only present when the caller is
/// setting a new one.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserDraft<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password: Option<&'a str>,
    pub role: Option<&'a str>,
}

/// Validate user fields. `allowed_roles` depends on who is writing: a
/// self-registering caller may not pick `admin`.
pub fn validate_user(
    draft: &UserDraft<'_>,
    mode: WriteMode,
    allowed_roles: &[&str],
) -> Vec<FieldViolation> {
    let mut out = Vec::new();

    required_text(&mut out, "name", draft.name, mode, "Please add a name");

    if let Some(email) = required_text(&mut out, "email", draft.email, mode, "Please add an email") {
        if !is_valid_email(email) {
            out.push(FieldViolation::new("email", "Please add a valid email"));
        }
    }

    if let Some(password) =
        required_text(&mut out, "password", draft.password, mode, "Please add a password")
    {
        out.extend(validate_password(password));
    }

    if let Some(role) = draft.role {
        one_of(&mut out, "role", role, allowed_roles);
    }

    out
}

/// Validate a new plaintext password.
pub fn validate_password(password: &str) -> Option<FieldViolation> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        Some(FieldViolation::new(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters long"),
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{ALL_ROLES, SELF_ASSIGNABLE_ROLES};

    fn fields(violations: &[FieldViolation]) -> Vec<&str> {
        violations.iter().map(|v| v.field.as_str()).collect()
    }

    #[test]
    fn empty_bootcamp_reports_every_required_field() {
        let violations = validate_bootcamp(&BootcampDraft::default(), WriteMode::Create);
        assert_eq!(
            fields(&violations),
            vec!["name", "description", "address", "careers"]
        );
    }

    #[test]
    fn bootcamp_partial_update_only_checks_supplied_fields() {
        let draft = BootcampDraft {
            website: Some("not a url"),
            ..Default::default()
        };
        let violations = validate_bootcamp(&draft, WriteMode::Update);
        assert_eq!(fields(&violations), vec!["website"]);
    }

    #[test]
    fn bootcamp_rejects_unknown_career_and_long_name() {
        let careers = vec!["Web Development".to_string(), "Basket Weaving".to_string()];
        let long_name = "x".repeat(51);
        let draft = BootcampDraft {
            name: Some(&long_name),
            description: Some("desc"),
            address: Some("1 Main St"),
            careers: Some(&careers),
            ..Default::default()
        };
        let violations = validate_bootcamp(&draft, WriteMode::Create);
        assert_eq!(fields(&violations), vec!["name", "careers"]);
    }

    #[test]
    fn name_length_ignores_surrounding_whitespace() {
        let careers = vec!["UI/UX".to_string()];
        let padded = format!("  {}  ", "x".repeat(MAX_BOOTCAMP_NAME_CHARS));
        let draft = BootcampDraft {
            name: Some(&padded),
            description: Some("desc"),
            address: Some("1 Main St"),
            careers: Some(&careers),
            ..Default::default()
        };
        assert!(validate_bootcamp(&draft, WriteMode::Create).is_empty());

        let padded = format!(" {} ", "x".repeat(MAX_BOOTCAMP_NAME_CHARS + 1));
        let draft = BootcampDraft {
            name: Some(&padded),
            ..draft
        };
        assert_eq!(fields(&validate_bootcamp(&draft, WriteMode::Create)), vec!["name"]);
    }

    #[test]
    fn valid_bootcamp_passes() {
        let careers = vec!["UI/UX".to_string()];
        let draft = BootcampDraft {
            name: Some("Devworks Bootcamp"),
            description: Some("Full stack web development"),
            website: Some("https://devworks.com"),
            phone: Some("(111) 111-1111"),
            email: Some("enroll@devworks.com"),
            address: Some("233 Bay State Rd Boston MA 02215"),
            careers: Some(&careers),
        };
        assert!(validate_bootcamp(&draft, WriteMode::Create).is_empty());
    }

    #[test]
    fn course_rejects_bad_skill_and_negative_tuition() {
        let draft = CourseDraft {
            title: Some("Front End"),
            description: Some("HTML/CSS"),
            weeks: Some("8"),
            tuition: Some(-1.0),
            minimum_skill: Some("guru"),
        };
        let violations = validate_course(&draft, WriteMode::Create);
        assert_eq!(fields(&violations), vec!["tuition", "minimumSkill"]);
    }

    #[test]
    fn review_rating_bounds() {
        for rating in [0, 11] {
            let draft = ReviewDraft {
                title: Some("Great"),
                text: Some("Loved it"),
                rating: Some(rating),
            };
            assert_eq!(fields(&validate_review(&draft, WriteMode::Create)), vec!["rating"]);
        }
        let draft = ReviewDraft {
            rating: Some(10),
            ..Default::default()
        };
        assert!(validate_review(&draft, WriteMode::Update).is_empty());
    }

    #[test]
    fn self_registration_cannot_pick_admin() {
        let draft = UserDraft {
            name: Some("Jane"),
            email: Some("jane@example.com"),
            password: Some("123456"),
            role: Some("admin"),
        };
        assert_eq!(
            fields(&validate_user(&draft, WriteMode::Create, SELF_ASSIGNABLE_ROLES)),
            vec!["role"]
        );
        assert!(validate_user(&draft, WriteMode::Create, ALL_ROLES).is_empty());
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(validate_password("12345").is_some());
        assert!(validate_password("123456").is_none());
    }
}

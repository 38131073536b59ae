//! Field rules shared by several forms.

use crate::validation::{CharClass, Rule, Schema};

pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 20;

/// Whether a form is creating a row or replacing an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

impl FormMode {
    /// `Required` on create, nothing on update.
    pub fn required_on_create(self) -> Option<Rule> {
        match self {
            Self::Create => Some(Rule::required()),
            Self::Update => None,
        }
    }
}

/// Password strength rules. Each rule reports under its own key so the form
/// can point at the exact requirement that failed.
pub fn password_rules() -> Vec<Rule> {
    vec![
        Rule::min_length(PASSWORD_MIN).with_message("validation.password.min"),
        Rule::max_length(PASSWORD_MAX).with_message("validation.password.max"),
        Rule::contains(CharClass::Lowercase).with_message("validation.password.lowercase"),
        Rule::contains(CharClass::Digit).with_message("validation.password.digit"),
        Rule::contains(CharClass::Special).with_message("validation.password.special"),
    ]
}

pub fn password(mode: FormMode) -> Schema {
    Schema::new().field(
        "password",
        mode.required_on_create().into_iter().chain(password_rules()),
    )
}

pub fn login() -> Schema {
    Schema::new()
        .field("email", [Rule::required(), Rule::email()])
        .field("password", [Rule::required()])
}

/// Shape of one uploaded file reference.
pub fn file_attachment() -> Schema {
    Schema::new()
        .field("name", [Rule::required(), Rule::max_length(255)])
        .field("url", [Rule::required(), Rule::url(), Rule::max_length(2048)])
        .field("size", [Rule::range(Some(0), None)])
        .field("mime", [Rule::max_length(127)])
}

pub fn files() -> Vec<Rule> {
    vec![Rule::each(file_attachment())]
}

/// Lowercase URL slug: letters, digits and hyphens.
pub fn slug() -> Vec<Rule> {
    vec![
        Rule::required(),
        Rule::max_length(100),
        Rule::only(&[CharClass::Lowercase, CharClass::Digit], "-"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Translator;
    use crate::locale::Locale;
    use serde_json::json;

    fn password_codes(password: &str) -> Vec<String> {
        let t = Translator::bundled().unwrap();
        super::password(FormMode::Create)
            .validate(&json!({ "password": password }), t.bundle(Locale::Ko))
            .into_iter()
            .map(|e| e.code)
            .collect()
    }

    #[test]
    fn valid_password_has_no_errors() {
        assert!(password_codes("abc123!@").is_empty());
    }

    #[test]
    fn each_password_rule_reports_its_own_key() {
        assert_eq!(password_codes("ab1!"), ["validation.password.min"]);
        assert_eq!(
            password_codes("abcdefgh1!abcdefgh1!x"),
            ["validation.password.max"]
        );
        assert_eq!(password_codes("ABC123!@"), ["validation.password.lowercase"]);
        assert_eq!(password_codes("abcdefg!"), ["validation.password.digit"]);
        assert_eq!(password_codes("abc12345"), ["validation.password.special"]);
    }

    #[test]
    fn password_is_optional_on_update() {
        let t = Translator::bundled().unwrap();
        let errors = password(FormMode::Update).validate(&json!({}), t.bundle(Locale::Ko));
        assert!(errors.is_empty());
    }

    #[test]
    fn login_requires_both_fields() {
        let t = Translator::bundled().unwrap();
        let errors = login().validate(&json!({"email": "x"}), t.bundle(Locale::En));
        let codes: Vec<_> = errors.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, ["validation.email", "validation.required"]);
    }
}

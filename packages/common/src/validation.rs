//! Declarative form validation.
//!
//! A [`Schema`] lists fields and the [`Rule`]s each must satisfy. Schemas are
//! plain data; [`Schema::validate`] walks a JSON body and returns every
//! violation as a [`FieldError`] whose message is rendered through the
//! caller's [`MessageBundle`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::date;
use crate::i18n::MessageBundle;

/// Character categories used by "must contain" and "may only contain" rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
    Lowercase,
    Uppercase,
    /// Any alphabetic character, including non-Latin scripts.
    Letter,
    Digit,
    /// ASCII punctuation and symbols.
    Special,
    Space,
}

impl CharClass {
    pub fn matches(self, c: char) -> bool {
        match self {
            Self::Lowercase => c.is_ascii_lowercase(),
            Self::Uppercase => c.is_ascii_uppercase(),
            Self::Letter => c.is_alphabetic(),
            Self::Digit => c.is_ascii_digit(),
            Self::Special => c.is_ascii_punctuation(),
            Self::Space => c == ' ',
        }
    }
}

#[derive(Clone, Debug)]
pub enum Check {
    Required,
    MinLength(usize),
    MaxLength(usize),
    /// At least one character of the class must appear.
    Contains(CharClass),
    /// Every character must belong to one of `classes` or appear in `extra`.
    Only {
        classes: &'static [CharClass],
        extra: &'static str,
    },
    Email,
    Url,
    /// Whole number, given as a JSON number or a numeric string.
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    Boolean,
    DateTime,
    OneOf(&'static [&'static str]),
    /// Array whose elements are objects validated against the nested schema.
    Each(Schema),
}

/// A check plus an optional message key overriding the check's default.
#[derive(Clone, Debug)]
pub struct Rule {
    check: Check,
    key: Option<&'static str>,
}

impl Rule {
    fn new(check: Check) -> Self {
        Self { check, key: None }
    }

    pub fn required() -> Self {
        Self::new(Check::Required)
    }

    pub fn min_length(n: usize) -> Self {
        Self::new(Check::MinLength(n))
    }

    pub fn max_length(n: usize) -> Self {
        Self::new(Check::MaxLength(n))
    }

    pub fn contains(class: CharClass) -> Self {
        Self::new(Check::Contains(class))
    }

    pub fn only(classes: &'static [CharClass], extra: &'static str) -> Self {
        Self::new(Check::Only { classes, extra })
    }

    pub fn email() -> Self {
        Self::new(Check::Email)
    }

    pub fn url() -> Self {
        Self::new(Check::Url)
    }

    pub fn integer() -> Self {
        Self::new(Check::Integer {
            min: None,
            max: None,
        })
    }

    pub fn range(min: Option<i64>, max: Option<i64>) -> Self {
        Self::new(Check::Integer { min, max })
    }

    pub fn boolean() -> Self {
        Self::new(Check::Boolean)
    }

    pub fn datetime() -> Self {
        Self::new(Check::DateTime)
    }

    pub fn one_of(values: &'static [&'static str]) -> Self {
        Self::new(Check::OneOf(values))
    }

    pub fn each(schema: Schema) -> Self {
        Self::new(Check::Each(schema))
    }

    /// Report failures of this rule under `key` instead of the default key.
    pub fn with_message(mut self, key: &'static str) -> Self {
        self.key = Some(key);
        self
    }

    pub fn check(&self) -> &Check {
        &self.check
    }
}

/// One violated rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FieldError {
    /// Field path, e.g. `password` or `files[1].url`.
    pub field: String,
    /// Message key identifying the violated rule.
    pub code: String,
    /// Localized message.
    pub message: String,
}

#[derive(Clone, Debug)]
struct Field {
    name: &'static str,
    rules: Vec<Rule>,
}

#[derive(Clone, Debug, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.push(Field {
            name,
            rules: rules.into_iter().collect(),
        });
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Validate a JSON body. Anything that is not an object is treated as an
    /// object with no fields.
    pub fn validate(&self, input: &Value, bundle: MessageBundle<'_>) -> Vec<FieldError> {
        let mut errors = Vec::new();
        self.validate_into("", input, bundle, &mut errors);
        errors
    }

    fn validate_into(
        &self,
        prefix: &str,
        input: &Value,
        bundle: MessageBundle<'_>,
        errors: &mut Vec<FieldError>,
    ) {
        let object = input.as_object();
        for field in &self.fields {
            let path = if prefix.is_empty() {
                field.name.to_string()
            } else {
                format!("{prefix}.{}", field.name)
            };
            let value = object
                .and_then(|o| o.get(field.name))
                .filter(|v| !is_blank(v));
            field.evaluate(&path, value, bundle, errors);
        }
    }

    /// Rewrite a body that passed [`Schema::validate`] into plain JSON types:
    /// blank fields are dropped, numeric strings become numbers and
    /// `"true"`/`"false"` become booleans. Unknown fields are left alone.
    pub fn normalize(&self, input: &mut Value) {
        let Some(object) = input.as_object_mut() else {
            return;
        };
        for field in &self.fields {
            if object.get(field.name).is_some_and(is_blank) {
                object.remove(field.name);
                continue;
            }
            let Some(value) = object.get_mut(field.name) else {
                continue;
            };
            for rule in &field.rules {
                match &rule.check {
                    Check::Integer { .. } => {
                        if let Some(n) = coerce_integer(value) {
                            *value = Value::from(n);
                        }
                    }
                    Check::Boolean => {
                        if let Some(flag) = value.as_str().map(|s| s == "true") {
                            *value = Value::Bool(flag);
                        }
                    }
                    Check::Each(schema) => {
                        for element in value.as_array_mut().into_iter().flatten() {
                            schema.normalize(element);
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}

impl Field {
    fn evaluate(
        &self,
        path: &str,
        value: Option<&Value>,
        bundle: MessageBundle<'_>,
        errors: &mut Vec<FieldError>,
    ) {
        let label = bundle.field_label(self.name);
        let Some(value) = value else {
            if let Some(rule) = self
                .rules
                .iter()
                .find(|r| matches!(r.check, Check::Required))
            {
                errors.push(rule.failure(path, &label, "validation.required", &[], bundle));
            }
            return;
        };

        let mut type_reported = false;
        for rule in &self.rules {
            match rule.evaluate(value) {
                Outcome::Pass => {}
                Outcome::WrongType => {
                    if !type_reported {
                        type_reported = true;
                        errors.push(FieldError {
                            field: path.to_string(),
                            code: "validation.type".into(),
                            message: bundle.text("validation.type", &[("field", &label)]),
                        });
                    }
                }
                Outcome::Fail { key, vars } => {
                    let vars: Vec<(&str, &str)> =
                        vars.iter().map(|(k, v)| (*k, v.as_str())).collect();
                    errors.push(rule.failure(path, &label, key, &vars, bundle));
                }
                Outcome::Nested(schema) => {
                    for (i, element) in value.as_array().into_iter().flatten().enumerate() {
                        let element_path = format!("{path}[{i}]");
                        if element.is_object() {
                            schema.validate_into(&element_path, element, bundle, errors);
                        } else {
                            errors.push(rule.failure(
                                &element_path,
                                &label,
                                "validation.object",
                                &[],
                                bundle,
                            ));
                        }
                    }
                }
            }
        }
    }
}

enum Outcome<'a> {
    Pass,
    WrongType,
    Fail {
        key: &'static str,
        vars: Vec<(&'static str, String)>,
    },
    Nested(&'a Schema),
}

impl Rule {
    fn failure(
        &self,
        path: &str,
        label: &str,
        default_key: &'static str,
        vars: &[(&str, &str)],
        bundle: MessageBundle<'_>,
    ) -> FieldError {
        let code = self.key.unwrap_or(default_key);
        let mut all_vars = vec![("field", label)];
        all_vars.extend_from_slice(vars);
        FieldError {
            field: path.to_string(),
            code: code.to_string(),
            message: bundle.text(code, &all_vars),
        }
    }

    fn evaluate(&self, value: &Value) -> Outcome<'_> {
        let fail = |key: &'static str, vars: Vec<(&'static str, String)>| Outcome::Fail { key, vars };
        match &self.check {
            Check::Required => Outcome::Pass,
            Check::MinLength(min) => match value.as_str() {
                Some(s) if s.chars().count() < *min => {
                    fail("validation.min_length", vec![("min", min.to_string())])
                }
                Some(_) => Outcome::Pass,
                None => Outcome::WrongType,
            },
            Check::MaxLength(max) => match value.as_str() {
                Some(s) if s.chars().count() > *max => {
                    fail("validation.max_length", vec![("max", max.to_string())])
                }
                Some(_) => Outcome::Pass,
                None => Outcome::WrongType,
            },
            Check::Contains(class) => match value.as_str() {
                Some(s) if !s.chars().any(|c| class.matches(c)) => {
                    fail("validation.contains", Vec::new())
                }
                Some(_) => Outcome::Pass,
                None => Outcome::WrongType,
            },
            Check::Only { classes, extra } => match value.as_str() {
                Some(s)
                    if !s
                        .chars()
                        .all(|c| classes.iter().any(|cl| cl.matches(c)) || extra.contains(c)) =>
                {
                    fail("validation.chars", Vec::new())
                }
                Some(_) => Outcome::Pass,
                None => Outcome::WrongType,
            },
            Check::Email => match value.as_str() {
                Some(s) if !is_email(s) => fail("validation.email", Vec::new()),
                Some(_) => Outcome::Pass,
                None => Outcome::WrongType,
            },
            Check::Url => match value.as_str() {
                Some(s) if !is_http_url(s) => fail("validation.url", Vec::new()),
                Some(_) => Outcome::Pass,
                None => Outcome::WrongType,
            },
            Check::Integer { min, max } => match coerce_integer(value) {
                None => fail("validation.integer", Vec::new()),
                Some(n) if min.is_some_and(|m| n < m) => fail(
                    "validation.min_value",
                    vec![("min", min.unwrap_or_default().to_string())],
                ),
                Some(n) if max.is_some_and(|m| n > m) => fail(
                    "validation.max_value",
                    vec![("max", max.unwrap_or_default().to_string())],
                ),
                Some(_) => Outcome::Pass,
            },
            Check::Boolean => match value {
                Value::Bool(_) => Outcome::Pass,
                Value::String(s) if s == "true" || s == "false" => Outcome::Pass,
                _ => fail("validation.boolean", Vec::new()),
            },
            Check::DateTime => match value.as_str() {
                Some(s) if date::parse_text(s).is_none() => fail("validation.datetime", Vec::new()),
                Some(_) => Outcome::Pass,
                None => Outcome::WrongType,
            },
            Check::OneOf(values) => match value.as_str() {
                Some(s) if !values.iter().any(|v| *v == s) => {
                    fail("validation.one_of", vec![("options", values.join(", "))])
                }
                Some(_) => Outcome::Pass,
                None => Outcome::WrongType,
            },
            Check::Each(schema) => {
                if value.is_array() {
                    Outcome::Nested(schema)
                } else {
                    fail("validation.array", Vec::new())
                }
            }
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|part| !part.is_empty())
}

fn is_http_url(s: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        s.strip_prefix(scheme)
            .is_some_and(|rest| !rest.is_empty() && !rest.chars().any(char::is_whitespace))
    })
}

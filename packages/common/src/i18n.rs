use std::collections::HashMap;

use crate::locale::Locale;

const KO_SOURCE: &str = include_str!("../locales/ko.toml");
const EN_SOURCE: &str = include_str!("../locales/en.toml");

/// Errors raised while loading message dictionaries.
#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    #[error("dictionary for '{locale}' is not valid TOML: {source}")]
    Parse {
        locale: Locale,
        #[source]
        source: toml::de::Error,
    },
    #[error("dictionary for '{locale}' has a non-string entry at '{key}'")]
    NonString { locale: Locale, key: String },
}

/// Flattened message dictionaries, one per locale.
///
/// Nested TOML tables become dotted keys, so `[validation.password] min = ".."`
/// is looked up as `validation.password.min`.
#[derive(Debug, Clone)]
pub struct Translator {
    dictionaries: HashMap<Locale, HashMap<String, String>>,
    fallback: Locale,
}

impl Translator {
    /// Load the dictionaries compiled into this crate.
    pub fn bundled() -> Result<Self, I18nError> {
        Self::from_sources(&[(Locale::Ko, KO_SOURCE), (Locale::En, EN_SOURCE)])
    }

    pub fn from_sources(sources: &[(Locale, &str)]) -> Result<Self, I18nError> {
        let mut dictionaries = HashMap::new();
        for &(locale, source) in sources {
            let table: toml::Table = toml::from_str(source)
                .map_err(|source| I18nError::Parse { locale, source })?;
            let mut entries = HashMap::new();
            flatten(locale, "", &table, &mut entries)?;
            dictionaries.insert(locale, entries);
        }
        Ok(Self {
            dictionaries,
            fallback: Locale::default(),
        })
    }

    /// Find the raw template for `key`, trying `locale` first and then the
    /// fallback locale.
    pub fn lookup(&self, key: &str, locale: Locale) -> Option<&str> {
        [locale, self.fallback]
            .iter()
            .filter_map(|l| self.dictionaries.get(l))
            .find_map(|d| d.get(key))
            .map(String::as_str)
    }

    /// Render `key` for `locale`, substituting `{name}` placeholders from `vars`.
    /// Unknown keys render as the key itself.
    pub fn translate(&self, key: &str, vars: &[(&str, &str)], locale: Locale) -> String {
        match self.lookup(key, locale) {
            Some(template) => interpolate(template, vars),
            None => {
                tracing::debug!(key, %locale, "missing translation");
                key.to_string()
            }
        }
    }

    pub fn bundle(&self, locale: Locale) -> MessageBundle<'_> {
        MessageBundle {
            translator: self,
            locale,
        }
    }
}

/// A translator pinned to one locale, handed to validators and actions.
#[derive(Debug, Clone, Copy)]
pub struct MessageBundle<'a> {
    translator: &'a Translator,
    locale: Locale,
}

impl<'a> MessageBundle<'a> {
    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn text(&self, key: &str, vars: &[(&str, &str)]) -> String {
        self.translator.translate(key, vars, self.locale)
    }

    /// Display label for a form field, or the raw field name when no label exists.
    pub fn field_label(&self, field: &str) -> String {
        self.translator
            .lookup(&format!("field.{field}"), self.locale)
            .unwrap_or(field)
            .to_string()
    }

    /// Display label for a resource, or the raw resource name when no label exists.
    pub fn resource_label(&self, resource: &str) -> String {
        self.translator
            .lookup(&format!("resource.{resource}"), self.locale)
            .unwrap_or(resource)
            .to_string()
    }
}

fn flatten(
    locale: Locale,
    prefix: &str,
    table: &toml::Table,
    out: &mut HashMap<String, String>,
) -> Result<(), I18nError> {
    for (name, value) in table {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        match value {
            toml::Value::String(s) => {
                out.insert(key, s.clone());
            }
            toml::Value::Table(nested) => flatten(locale, &key, nested, out)?,
            _ => return Err(I18nError::NonString { locale, key }),
        }
    }
    Ok(())
}

fn interpolate(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{name}}}"), value)
    })
}

use std::borrow::Cow;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value};

/// One utterance sample, i.e. one parsed line of an input JSONL file.
///
/// All original fields are kept in their original order so the record can be
/// written back verbatim.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Record(JsonMap<String, Value>);

impl Record {
    /// Text of `key`, falling back to `""` when the key is missing or null.
    /// Non-string values are rendered as compact JSON (`42` -> `"42"`).
    pub fn field(&self, key: &str) -> Cow<'_, str> {
        match self.0.get(key) {
            None | Some(Value::Null) => Cow::Borrowed(""),
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(other) => Cow::Owned(other.to_string()),
        }
    }

    pub fn locale(&self) -> Cow<'_, str> {
        self.field("locale")
    }

    pub fn partition(&self) -> Cow<'_, str> {
        self.field("partition")
    }

    /// Language subtag of the locale: everything before the first `-`.
    pub fn language(&self) -> String {
        language_subtag(&self.locale()).to_owned()
    }

    pub fn matches_language(&self, language: &str, policy: LocaleMatch) -> bool {
        policy.matches(&self.locale(), language)
    }

    pub fn as_map(&self) -> &JsonMap<String, Value> {
        &self.0
    }
}

/// How a record's `locale` is compared against a requested language code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LocaleMatch {
    /// Leading subtag must equal the language exactly (`en` matches `en-US`, not `eng-XX`)
    #[default]
    Subtag,
    /// Locale must start with the language as a literal prefix (`s` matches `sw-KE`)
    Prefix,
}

impl LocaleMatch {
    pub fn matches(self, locale: &str, language: &str) -> bool {
        match self {
            LocaleMatch::Subtag => language_subtag(locale) == language,
            LocaleMatch::Prefix => locale.starts_with(language),
        }
    }
}

pub fn language_subtag(locale: &str) -> &str {
    locale.split('-').next().unwrap_or_default()
}

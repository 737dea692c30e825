//! Month-name normalization for non-English spreadsheets.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

/// 3–4 letter words, accented Latin letters included.
static MONTH_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b[a-záéíóúñ]{3,4}\b").expect("valid regex"));

const SPANISH: [(&str, &str); 14] = [
    ("ene", "jan"),
    ("feb", "feb"),
    ("mar", "mar"),
    ("abr", "apr"),
    ("may", "may"),
    ("jun", "jun"),
    ("jul", "jul"),
    ("ago", "aug"),
    ("sep", "sep"),
    ("set", "sep"),
    ("sept", "sep"),
    ("oct", "oct"),
    ("nov", "nov"),
    ("dic", "dec"),
];

/// Lookup table from locale month abbreviations to the English tokens the
/// format patterns understand. Keys are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthLocale {
    aliases: HashMap<String, String>,
}

impl Default for MonthLocale {
    fn default() -> Self {
        Self::spanish()
    }
}

impl MonthLocale {
    /// No aliases: every token passes through.
    pub fn empty() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    pub fn spanish() -> Self {
        SPANISH
            .iter()
            .fold(Self::empty(), |table, (from, to)| table.with_alias(from, to))
    }

    pub fn with_alias(mut self, from: &str, to: &str) -> Self {
        self.aliases.insert(from.to_lowercase(), to.to_string());
        self
    }

    pub fn extend<I, K, V>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (from, to) in aliases {
            self = self.with_alias(from.as_ref(), to.as_ref());
        }
        self
    }

    pub fn lookup(&self, token: &str) -> Option<&str> {
        self.aliases.get(&token.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Replace every known 3–4 letter token; unknown tokens are left untouched.
    pub fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.aliases.is_empty() {
            return Cow::Borrowed(text);
        }
        MONTH_TOKEN.replace_all(text, |caps: &Captures| {
            let token = &caps[0];
            self.lookup(token).unwrap_or(token).to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spanish_tokens_are_translated() {
        let es = MonthLocale::spanish();
        assert_eq!(es.normalize("Ene-20"), "jan-20");
        assert_eq!(es.normalize("15 ago 2021"), "15 aug 2021");
        assert_eq!(es.normalize("Sept 2019"), "sep 2019");
        assert_eq!(es.normalize("DIC-99"), "dec-99");
    }

    #[test]
    fn unknown_tokens_pass_through() {
        let es = MonthLocale::spanish();
        assert_eq!(es.normalize("Jan-20"), "Jan-20");
        assert_eq!(es.normalize("Marzo 2020"), "Marzo 2020");
        assert_eq!(es.normalize("2020-01-05"), "2020-01-05");
    }

    #[test]
    fn tables_are_injectable() {
        let fr = MonthLocale::empty()
            .with_alias("janv", "jan")
            .with_alias("févr", "feb");
        assert_eq!(fr.normalize("Févr 2020"), "feb 2020");
        assert_eq!(fr.normalize("ene 2020"), "ene 2020");
        assert_eq!(MonthLocale::empty().normalize("ago 2020"), "ago 2020");
    }
}

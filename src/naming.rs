//! # Naming
//!
//! Every artifact refers to an entity by some spelling of its name: the model
//! class (`TestItem`), its table (`test_items`), the route prefix, the view
//! directory, the controller's variable (`testItem`). All of them are derived
//! here from the canonical singular StudlyCase form so that every artifact in a
//! plan agrees.
//!
//! Pluralization is a small, total English rule set: uncountable words are left
//! alone, a table of irregular forms is consulted, then suffix rules apply, and
//! anything else gets an `s`. Only the last word of a compound name is
//! inflected (`TestItem` -> `TestItems`).

use convert_case::{Case, Casing};

/// Words whose plural is the same as their singular.
const UNCOUNTABLE: &[&str] = &[
    "audio",
    "data",
    "deer",
    "equipment",
    "feedback",
    "fish",
    "information",
    "metadata",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "software",
    "species",
    "staff",
];

/// Irregular `(singular, plural)` pairs.
const IRREGULAR: &[(&str, &str)] = &[
    ("analysis", "analyses"),
    ("child", "children"),
    ("criterion", "criteria"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("half", "halves"),
    ("index", "indices"),
    ("knife", "knives"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("man", "men"),
    ("matrix", "matrices"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("quiz", "quizzes"),
    ("tooth", "teeth"),
    ("vertex", "vertices"),
    ("wife", "wives"),
    ("woman", "women"),
];

/// All spellings of one entity name used across a generation plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameForms {
    /// Canonical singular form: `TestItem`
    pub studly: String,
    /// Plural StudlyCase: `TestItems`
    pub studly_plural: String,
    /// snake_case singular: `test_item`
    pub snake: String,
    /// snake_case plural, also the table name: `test_items`
    pub snake_plural: String,
    /// camelCase variable identifier: `testItem`
    pub camel: String,
    /// camelCase plural, used for has-many accessors: `testItems`
    pub camel_plural: String,
}

impl NameForms {
    /// Derive every form from an entity name as the user typed it.
    ///
    /// The input is normalized first (see [`canonical_name`]), so `"tasks"`,
    /// `"task"` and `"Task"` all resolve to the same forms.
    #[must_use]
    pub fn resolve(raw: &str) -> Self {
        let studly = canonical_name(raw);
        let studly_plural = pluralize(&studly);
        NameForms {
            snake: studly.to_case(Case::Snake),
            snake_plural: studly_plural.to_case(Case::Snake),
            camel: studly.to_case(Case::Camel),
            camel_plural: studly_plural.to_case(Case::Camel),
            studly,
            studly_plural,
        }
    }
}

/// Normalize a user-supplied entity name to singular StudlyCase.
///
/// `"projects"` -> `"Project"`, `"test_items"` -> `"TestItem"`.
#[must_use]
pub fn canonical_name(raw: &str) -> String {
    singularize(&raw.trim().to_case(Case::Pascal))
}

/// Pluralize the last word of `word`.
///
/// Total: every input yields an output.
#[must_use]
pub fn pluralize(word: &str) -> String {
    inflect(word, pluralize_word)
}

/// Singularize the last word of `word`.
#[must_use]
pub fn singularize(word: &str) -> String {
    inflect(word, singularize_word)
}

/// Apply `rule` to the lowercase last word of `word`, keeping the prefix and
/// the capitalisation of the word's first letter.
fn inflect(word: &str, rule: fn(&str) -> String) -> String {
    if word.is_empty() {
        return String::new();
    }
    let (prefix, last) = word.split_at(last_word_start(word));
    let lower = last.to_lowercase();
    let inflected = rule(&lower);
    if lower.len() == last.len() && inflected.starts_with(&lower) {
        // Pure suffix change: keep the original spelling of the stem.
        return format!("{prefix}{last}{}", &inflected[lower.len()..]);
    }
    if last.chars().next().is_some_and(char::is_uppercase) {
        format!("{prefix}{}", capitalize(&inflected))
    } else {
        format!("{prefix}{inflected}")
    }
}

/// Byte offset where the last word of a StudlyCase, snake_case or spaced name starts.
fn last_word_start(word: &str) -> usize {
    let mut start = 0;
    let mut prev: Option<char> = None;
    for (idx, ch) in word.char_indices() {
        match prev {
            Some('_' | ' ' | '-') => start = idx,
            Some(p) if ch.is_uppercase() && !p.is_uppercase() => start = idx,
            _ => {}
        }
        prev = Some(ch);
    }
    start
}

fn pluralize_word(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
        return (*plural).to_string();
    }
    if let Some(stem) = word.strip_suffix('y') {
        if stem.chars().last().is_some_and(|c| !is_vowel(c)) {
            return format!("{stem}ies");
        }
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s)) {
        return format!("{word}es");
    }
    format!("{word}s")
}

fn singularize_word(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == word) {
        return (*singular).to_string();
    }
    if IRREGULAR.iter().any(|(singular, _)| *singular == word) {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }
    for suffix in ["sses", "xes", "zzes", "ches", "shes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    // statuses -> status, buses -> bus; houses -> house
    if let Some(stem) = word.strip_suffix("uses") {
        if stem.chars().last().is_some_and(|c| !is_vowel(c)) {
            return format!("{stem}us");
        }
    }
    if ["ss", "us", "is"].iter().any(|s| word.ends_with(s)) {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Uppercase the first character: `"status"` -> `"Status"`.
#[must_use]
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_simple_name() {
        let names = NameForms::resolve("Project");
        assert_eq!(names.studly, "Project");
        assert_eq!(names.studly_plural, "Projects");
        assert_eq!(names.snake, "project");
        assert_eq!(names.snake_plural, "projects");
        assert_eq!(names.camel, "project");
        assert_eq!(names.camel_plural, "projects");
    }

    #[test]
    fn test_resolve_compound_name() {
        let names = NameForms::resolve("TestItem");
        assert_eq!(names.studly_plural, "TestItems");
        assert_eq!(names.snake, "test_item");
        assert_eq!(names.snake_plural, "test_items");
        assert_eq!(names.camel, "testItem");
    }

    #[test]
    fn test_resolve_normalizes_input() {
        assert_eq!(NameForms::resolve("tasks"), NameForms::resolve("Task"));
        assert_eq!(NameForms::resolve("test_items").studly, "TestItem");
        assert_eq!(NameForms::resolve("categories").studly, "Category");
    }

    #[test]
    fn test_pluralize_rules() {
        assert_eq!(pluralize("Task"), "Tasks");
        assert_eq!(pluralize("Category"), "Categories");
        assert_eq!(pluralize("Day"), "Days");
        assert_eq!(pluralize("Box"), "Boxes");
        assert_eq!(pluralize("Status"), "Statuses");
        assert_eq!(pluralize("Branch"), "Branches");
        assert_eq!(pluralize("Person"), "People");
        assert_eq!(pluralize("SalesPerson"), "SalesPeople");
        assert_eq!(pluralize("Human"), "Humans");
        assert_eq!(pluralize("Equipment"), "Equipment");
        assert_eq!(pluralize("child"), "children");
    }

    #[test]
    fn test_singularize_rules() {
        assert_eq!(singularize("tasks"), "task");
        assert_eq!(singularize("Categories"), "Category");
        assert_eq!(singularize("Boxes"), "Box");
        assert_eq!(singularize("Statuses"), "Status");
        assert_eq!(singularize("Status"), "Status");
        assert_eq!(singularize("Classes"), "Class");
        assert_eq!(singularize("People"), "Person");
        assert_eq!(singularize("Analysis"), "Analysis");
        assert_eq!(singularize("Series"), "Series");
        assert_eq!(singularize("Task"), "Task");
        assert_eq!(singularize("Houses"), "House");
        assert_eq!(singularize("Sizes"), "Size");
        assert_eq!(singularize("ProjectTasks"), "ProjectTask");
    }

    #[test]
    fn test_inflection_is_total() {
        for word in ["", "s", "y", "A", "x_y", "ßeta", "42"] {
            let _ = pluralize(word);
            let _ = singularize(word);
        }
        assert_eq!(pluralize(""), "");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("status"), "Status");
        assert_eq!(capitalize(""), "");
    }
}

//! Naming helpers: case conversion and English inflection.

use convert_case::{Case, Casing};

/// Convert a string to snake_case
pub fn to_snake_case(s: &str) -> String {
    s.to_case(Case::Snake)
}

/// Convert a string to StudlyCase (PascalCase)
pub fn to_studly_case(s: &str) -> String {
    s.to_case(Case::Pascal)
}

/// Convert a string to camelCase
pub fn to_camel_case(s: &str) -> String {
    s.to_case(Case::Camel)
}

/// Convert a string to kebab-case
pub fn to_kebab_case(s: &str) -> String {
    s.to_case(Case::Kebab)
}

/// Convert a string to Title Case
pub fn to_title_case(s: &str) -> String {
    s.to_case(Case::Title)
}

const UNCOUNTABLE: &[&str] = &[
    "audio", "data", "equipment", "feedback", "information", "media", "metadata", "money",
    "news", "series", "sheep", "species", "staff",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("tooth", "teeth"),
    ("woman", "women"),
];

/// Split a word into its leading part and the last "word" (by case or `_`/`-`)
/// so inflection only touches the tail: `BlogPost` -> (`Blog`, `Post`).
fn split_tail(word: &str) -> (&str, &str) {
    let boundary = word
        .char_indices()
        .rev()
        .find(|(i, c)| *i > 0 && (c.is_uppercase() || *c == '_' || *c == '-'))
        .map(|(i, c)| if c == '_' || c == '-' { i + 1 } else { i })
        .unwrap_or(0);
    word.split_at(boundary)
}

/// Reapply the casing pattern of `original` to `replacement`
fn match_case(original: &str, replacement: &str) -> String {
    if original.chars().all(|c| !c.is_lowercase()) && original.chars().count() > 1 {
        return replacement.to_uppercase();
    }
    let starts_upper = original.chars().next().map(char::is_uppercase).unwrap_or(false);
    if starts_upper {
        let mut chars = replacement.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        replacement.to_string()
    }
}

fn pluralize_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return match_case(word, plural);
    }
    if IRREGULAR.iter().any(|(_, plural)| *plural == lower) {
        return word.to_string();
    }

    let plural = if lower.ends_with("quiz") {
        format!("{}zes", lower)
    } else if lower.ends_with("ss")
        || lower.ends_with("sh")
        || lower.ends_with("ch")
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("us")
        || lower.ends_with("is")
    {
        if lower.ends_with("is") {
            format!("{}es", &lower[..lower.len() - 2])
        } else {
            format!("{}es", lower)
        }
    } else if lower.ends_with('s') {
        lower.clone()
    } else if lower.ends_with('y')
        && !lower[..lower.len() - 1].ends_with(['a', 'e', 'i', 'o', 'u'])
    {
        format!("{}ies", &lower[..lower.len() - 1])
    } else if lower.ends_with("fe") {
        format!("{}ves", &lower[..lower.len() - 2])
    } else if lower.ends_with("lf") || lower.ends_with("af") {
        format!("{}ves", &lower[..lower.len() - 1])
    } else {
        format!("{}s", lower)
    };

    match_case(word, &plural)
}

fn singularize_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == lower) {
        return match_case(word, singular);
    }
    if IRREGULAR.iter().any(|(singular, _)| *singular == lower) {
        return word.to_string();
    }

    let singular = if lower.ends_with("quizzes") {
        lower[..lower.len() - 3].to_string()
    } else if lower.ends_with("ies") && lower.len() > 3 {
        format!("{}y", &lower[..lower.len() - 3])
    } else if lower.ends_with("ves") {
        let stem = &lower[..lower.len() - 3];
        if stem.ends_with('l') || stem.ends_with('a') {
            format!("{}f", stem)
        } else {
            format!("{}fe", stem)
        }
    } else if lower.ends_with("ouses") || lower.ends_with("auses") {
        lower[..lower.len() - 1].to_string()
    } else if lower.ends_with("sses")
        || lower.ends_with("shes")
        || lower.ends_with("ches")
        || lower.ends_with("xes")
        || lower.ends_with("zes")
        || lower.ends_with("uses")
    {
        lower[..lower.len() - 2].to_string()
    } else if lower.ends_with('s')
        && !lower.ends_with("ss")
        && !lower.ends_with("us")
        && !lower.ends_with("is")
    {
        lower[..lower.len() - 1].to_string()
    } else {
        lower.clone()
    };

    match_case(word, &singular)
}

/// Plural form of the last word: `post` -> `posts`, `BlogCategory` -> `BlogCategories`
pub fn pluralize(word: &str) -> String {
    let (head, tail) = split_tail(word);
    format!("{}{}", head, pluralize_word(tail))
}

/// Singular form of the last word: `posts` -> `post`, `people` -> `person`
pub fn singularize(word: &str) -> String {
    let (head, tail) = split_tail(word);
    format!("{}{}", head, singularize_word(tail))
}

/// Last segment of a namespaced name: `Admin\User` or `Admin/User` -> `User`
pub fn class_basename(name: &str) -> &str {
    name.rsplit(['\\', '/']).next().unwrap_or(name)
}

/// Namespace part of a name, using `\` separators: `Admin/Post` -> `Admin`
pub fn class_namespace(name: &str) -> String {
    let normalized = name.replace('/', "\\");
    match normalized.rfind('\\') {
        Some(i) => normalized[..i]
            .split('\\')
            .map(to_studly_case)
            .collect::<Vec<_>>()
            .join("\\"),
        None => String::new(),
    }
}

/// Split a comma separated list, tolerating spaces or tabs after each comma
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim_start_matches([' ', '\t']).trim_end().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Escape a string for a single-quoted PHP literal
pub fn escape_php_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Replace every `{{ key }}` placeholder of a stub
pub fn populate_stub(stub: &str, replacements: &[(&str, &str)]) -> String {
    replacements
        .iter()
        .fold(stub.to_string(), |acc, (key, value)| {
            acc.replace(&format!("{{{{ {} }}}}", key), value)
        })
}

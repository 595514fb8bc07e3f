//! Small helpers for emitting PHP source.

use crate::config::Config;
use crate::utils::{class_basename, escape_php_string, to_camel_case};
use std::collections::BTreeSet;

/// Sorted, de-duplicated `use` statements for one file
#[derive(Debug, Clone, Default)]
pub struct Imports {
    namespace: String,
    classes: BTreeSet<String>,
}

impl Imports {
    /// Imports for a file declared in `namespace`
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            classes: BTreeSet::new(),
        }
    }

    /// Add a class; classes of the file's own namespace are not imported
    pub fn add(&mut self, fqcn: impl AsRef<str>) {
        let fqcn = fqcn.as_ref().trim_start_matches('\\');
        let own = match fqcn.rfind('\\') {
            Some(i) => &fqcn[..i] == self.namespace,
            None => true,
        };
        if !own {
            self.classes.insert(fqcn.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// `use` block preceded by a blank line, or nothing
    pub fn render(&self) -> String {
        if self.classes.is_empty() {
            return String::new();
        }
        let mut out = String::from("\n");
        for class in &self.classes {
            out.push_str("use ");
            out.push_str(class);
            out.push_str(";\n");
        }
        out
    }
}

/// File path of a class under the application directory.
///
/// `App\Http\Controllers\PostController` -> `app/Http/Controllers/PostController.php`
pub fn class_path(config: &Config, fqcn: &str) -> String {
    let root = format!("{}\\", config.namespace);
    let relative = fqcn
        .trim_start_matches('\\')
        .strip_prefix(&root)
        .unwrap_or(fqcn);
    format!("{}/{}.php", config.app_path, relative.replace('\\', "/"))
}

/// Fully qualified name of a class below the root namespace
pub fn app_class(config: &Config, segment: &str, name: &str) -> String {
    let name = name.replace('/', "\\");
    format!("{}\\{}\\{}", config.namespace, segment, name)
}

/// Namespace part of a fully qualified class name
pub fn namespace_of(fqcn: &str) -> &str {
    fqcn.rfind('\\').map(|i| &fqcn[..i]).unwrap_or("")
}

/// Short class name of a fully qualified class name
pub fn short_name(fqcn: &str) -> &str {
    class_basename(fqcn)
}

/// PHP expression for a dotted reference: `post.author.email` -> `$post->author->email`
pub fn reference(dotted: &str) -> String {
    let mut parts = dotted.split('.');
    let head = parts.next().unwrap_or(dotted);
    let mut out = format!("${}", to_camel_case(head));
    for part in parts {
        out.push_str("->");
        out.push_str(part);
    }
    out
}

/// Comma separated PHP expressions for a data list
pub fn arguments(data: &[String]) -> String {
    data.iter().map(|d| reference(d)).collect::<Vec<_>>().join(", ")
}

/// Single-quoted PHP string literal
pub fn quote(value: &str) -> String {
    format!("'{}'", escape_php_string(value))
}

/// PHP literal for a draft scalar: numbers and keywords stay bare, the rest is quoted
pub fn literal(value: &str) -> String {
    let lower = value.to_lowercase();
    if matches!(lower.as_str(), "true" | "false" | "null") || value.parse::<f64>().is_ok() {
        value.to_string()
    } else {
        quote(value)
    }
}

/// `['a', 'b']`
pub fn quoted_list<S: AsRef<str>>(items: &[S]) -> String {
    let quoted: Vec<String> = items.iter().map(|i| quote(i.as_ref())).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imports_skip_own_namespace_and_sort() {
        let mut imports = Imports::new("App\\Models");
        imports.add("Illuminate\\Database\\Eloquent\\Model");
        imports.add("App\\Models\\User");
        imports.add("\\App\\Events\\NewPost");
        imports.add("Illuminate\\Database\\Eloquent\\Model");
        assert_eq!(
            imports.render(),
            "\nuse App\\Events\\NewPost;\nuse Illuminate\\Database\\Eloquent\\Model;\n"
        );
        assert_eq!(Imports::new("App").render(), "");
    }

    #[test]
    fn test_class_path() {
        let config = Config::default();
        assert_eq!(
            class_path(&config, "App\\Http\\Controllers\\Admin\\PostController"),
            "app/Http/Controllers/Admin/PostController.php"
        );
        assert_eq!(app_class(&config, "Jobs", "SyncMedia"), "App\\Jobs\\SyncMedia");
    }

    #[test]
    fn test_reference_and_literal() {
        assert_eq!(reference("post.author.email"), "$post->author->email");
        assert_eq!(reference("blog_post"), "$blogPost");
        assert_eq!(literal("5"), "5");
        assert_eq!(literal("true"), "true");
        assert_eq!(literal("draft"), "'draft'");
        assert_eq!(quoted_list(&["a", "b"]), "['a', 'b']");
    }
}

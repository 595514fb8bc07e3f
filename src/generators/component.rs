//! Livewire component classes.

use crate::error::Result;
use crate::filesystem::Filesystem;
use crate::generators::controller::method_body;
use crate::generators::php::{self, Imports};
use crate::generators::statements::{Host, StatementRenderer};
use crate::generators::{write_new, GenerateOptions, Generator};
use crate::ledger::Ledger;
use crate::tree::Tree;
use crate::types::{Component, Statement};
use crate::utils::{populate_stub, to_camel_case};
use std::fmt::Write;

pub struct ComponentGenerator;

impl Generator for ComponentGenerator {
    fn name(&self) -> &'static str {
        "component"
    }

    fn types(&self) -> &'static [&'static str] {
        &["components"]
    }

    fn output(&self, tree: &Tree, fs: &mut dyn Filesystem, _options: &GenerateOptions) -> Result<Ledger> {
        let mut ledger = Ledger::new();
        if tree.components().is_empty() {
            return Ok(ledger);
        }
        let stub = fs.stub("livewire.stub")?;

        for component in tree.components().values() {
            let fqcn = component_class(component, tree);
            let contents = render(&stub, component, &fqcn, tree);
            write_new(fs, &mut ledger, &php::class_path(tree.config(), &fqcn), &contents)?;
        }

        Ok(ledger)
    }
}

/// `App\Livewire\<Ns>\<Name>`
pub fn component_class(component: &Component, tree: &Tree) -> String {
    let namespace = component.namespace();
    let name = if namespace.is_empty() {
        component.name()
    } else {
        format!("{}\\{}", namespace, component.name())
    };
    php::app_class(tree.config(), "Livewire", &name)
}

fn render(stub: &str, component: &Component, fqcn: &str, tree: &Tree) -> String {
    let mut imports = Imports::new(php::namespace_of(fqcn));
    imports.add("Livewire\\Component");

    let mut sections: Vec<String> = Vec::new();
    let properties: Vec<String> = component.properties().iter().map(|p| to_camel_case(p)).collect();

    if !properties.is_empty() {
        let mut out = String::new();
        for property in &properties {
            let _ = writeln!(out, "    public ${};", property);
        }
        sections.push(out);

        let parameters: Vec<String> = properties.iter().map(|p| format!("${}", p)).collect();
        let assignments: Vec<String> = properties
            .iter()
            .map(|p| format!("$this->{0} = ${0};", p))
            .collect();
        sections.push(format!(
            "    public function mount({})\n    {{\n{}    }}\n",
            parameters.join(", "),
            method_body(&assignments)
        ));
    }

    // render closes the class whatever its position in the draft
    let (render_methods, methods): (Vec<_>, Vec<_>) =
        component.methods().iter().partition(|(name, _)| name.as_str() == "render");
    for (method, statements) in methods.into_iter().chain(render_methods) {
        sections.push(render_method(component, method, statements, tree, &mut imports));
    }

    populate_stub(
        stub,
        &[
            ("namespace", php::namespace_of(fqcn)),
            ("imports", &imports.render()),
            ("class", php::short_name(fqcn)),
            ("body", &sections.join("\n")),
        ],
    )
}

fn render_method(
    component: &Component,
    method: &str,
    statements: &[Statement],
    tree: &Tree,
    imports: &mut Imports,
) -> String {
    let renderer = StatementRenderer::new(tree, Host::Component, component.name(), method);
    let lines = renderer.render_all(statements, imports);
    let return_type = renderer
        .return_type(statements, imports)
        .map(|t| format!(": {}", t))
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(out, "    public function {}(){}\n    {{", method, return_type);
    out.push_str(&method_body(&lines));
    out.push_str("    }\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::filesystem::MemoryFilesystem;
    use crate::lexer::{ComponentLexer, Lexer, ModelLexer, StatementLexer};
    use crate::parser;

    fn tree(draft: &str) -> Tree {
        let tokens = parser::parse(draft).unwrap();
        let registry = ModelLexer::new()
            .analyze(&tokens)
            .merge(ComponentLexer::new(StatementLexer::new()).analyze(&tokens));
        Tree::new(registry, Config::default())
    }

    #[test]
    fn test_component_class() {
        let draft = "models:\n  Post:\n    title: string\ncomponents:\n  Admin/CreatePost:\n    mount: title\n    save:\n      validate: title\n      flash: post.title\n";
        let tree = tree(draft);
        let mut fs = MemoryFilesystem::new();

        let ledger = ComponentGenerator.output(&tree, &mut fs, &GenerateOptions::default()).unwrap();
        assert_eq!(ledger.created, vec!["app/Livewire/Admin/CreatePost.php"]);

        let component = fs.get("app/Livewire/Admin/CreatePost.php").unwrap();
        assert!(component.contains("namespace App\\Livewire\\Admin;"));
        assert!(component.contains("use Livewire\\Component;"));
        assert!(component.contains("class CreatePost extends Component\n{\n    public $title;\n\n    public function mount($title)\n    {\n        $this->title = $title;\n    }\n"));
        assert!(component.contains("    public function save()\n    {\n        $this->validate();\n        session()->flash('post.title', $post->title);\n    }\n"));
        assert!(component.contains(
            "    public function render(): View\n    {\n        return view('livewire.admin.create-post');\n    }\n}"
        ));
        assert!(component.find("function save").unwrap() < component.find("function render").unwrap());
    }

    #[test]
    fn test_no_components_no_files() {
        let tree = tree("models:\n  Post:\n    title: string\n");
        let mut fs = MemoryFilesystem::new();
        let ledger = ComponentGenerator.output(&tree, &mut fs, &GenerateOptions::default()).unwrap();
        assert!(ledger.is_empty());
    }
}

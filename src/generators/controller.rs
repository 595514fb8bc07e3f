//! Controller classes with rendered method bodies.

use crate::error::Result;
use crate::filesystem::Filesystem;
use crate::generators::form_request::{form_request_class, validate_statement};
use crate::generators::php::{self, Imports};
use crate::generators::statements::{Host, StatementRenderer};
use crate::generators::{write_new, GenerateOptions, Generator};
use crate::ledger::Ledger;
use crate::tree::Tree;
use crate::types::policy::ability_for_method;
use crate::types::controller::MODEL_BOUND_METHODS;
use crate::types::{Controller, Statement};
use crate::utils::{populate_stub, to_camel_case};
use std::fmt::Write;

pub struct ControllerGenerator;

impl Generator for ControllerGenerator {
    fn name(&self) -> &'static str {
        "controller"
    }

    fn types(&self) -> &'static [&'static str] {
        &["controllers"]
    }

    fn output(&self, tree: &Tree, fs: &mut dyn Filesystem, _options: &GenerateOptions) -> Result<Ledger> {
        let mut ledger = Ledger::new();
        let stub = fs.stub("controller.class.stub")?;

        for controller in tree.controllers().values() {
            let fqcn = controller.fully_qualified_class_name(tree.config());
            let path = php::class_path(tree.config(), &fqcn);
            let contents = render(&stub, controller, tree);
            write_new(fs, &mut ledger, &path, &contents)?;
        }

        Ok(ledger)
    }
}

fn render(stub: &str, controller: &Controller, tree: &Tree) -> String {
    let config = tree.config();
    let namespace = controller.fully_qualified_namespace(config);
    let mut imports = Imports::new(namespace.clone());
    imports.add(format!("{}\\Controller", config.controllers_namespace()));

    let mut methods: Vec<String> = Vec::new();

    if let Some(policy) = controller.policy().filter(|p| p.authorize_resource) {
        let class = model_class(tree, &policy.model, &mut imports);
        methods.push(format!(
            "    public function __construct()\n    {{\n        $this->authorizeResource({}::class, '{}');\n    }}\n",
            class,
            to_camel_case(&policy.model)
        ));
    }

    for (method, statements) in controller.methods() {
        methods.push(render_method(controller, method, statements, tree, &mut imports));
    }

    populate_stub(
        stub,
        &[
            ("namespace", &namespace),
            ("imports", &imports.render()),
            ("class", &controller.class_name()),
            ("methods", &methods.join("\n")),
        ],
    )
}

/// Short class name of a model context, imported
fn model_class(tree: &Tree, context: &str, imports: &mut Imports) -> String {
    let fqcn = match tree.model_for_context(context) {
        Some(model) => model.fully_qualified_class_name(tree.config()),
        None => tree.fqcn_for_context(context),
    };
    imports.add(&fqcn);
    php::short_name(&fqcn).to_string()
}

/// Parameters of a controller method: request, parent model, bound model
pub fn method_parameters(
    controller: &Controller,
    method: &str,
    statements: &[Statement],
    tree: &Tree,
    imports: &mut Imports,
) -> Vec<String> {
    let mut parameters = Vec::new();

    if validate_statement(statements).is_some() {
        let request = form_request_class(controller, method, tree.config());
        imports.add(&request);
        parameters.push(format!("{} $request", php::short_name(&request)));
    } else {
        imports.add("Illuminate\\Http\\Request");
        parameters.push("Request $request".to_string());
    }

    if let Some(parent) = controller.parent() {
        let class = model_class(tree, parent, imports);
        parameters.push(format!("{} ${}", class, to_camel_case(&class)));
    }

    if MODEL_BOUND_METHODS.contains(&method) {
        let class = model_class(tree, &controller.prefix(), imports);
        parameters.push(format!("{} ${}", class, to_camel_case(&class)));
    }

    parameters
}

fn render_method(
    controller: &Controller,
    method: &str,
    statements: &[Statement],
    tree: &Tree,
    imports: &mut Imports,
) -> String {
    let parameters = method_parameters(controller, method, statements, tree, imports);
    let renderer = StatementRenderer::new(tree, Host::Controller, controller.prefix(), method);

    let mut lines: Vec<String> = Vec::new();
    if let Some(policy) = controller.policy().filter(|p| !p.authorize_resource) {
        if let Some(ability) = ability_for_method(method).filter(|a| policy.abilities.iter().any(|p| p == a)) {
            imports.add("Illuminate\\Support\\Facades\\Gate");
            let subject = if MODEL_BOUND_METHODS.contains(&method) {
                format!("${}", to_camel_case(&policy.model))
            } else {
                format!("{}::class", model_class(tree, &policy.model, imports))
            };
            lines.push(format!("Gate::authorize('{}', {});", ability, subject));
        }
    }
    lines.extend(renderer.render_all(statements, imports));

    let return_type = renderer
        .return_type(statements, imports)
        .map(|t| format!(": {}", t))
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "    public function {}({}){}\n    {{",
        method,
        parameters.join(", "),
        return_type
    );
    out.push_str(&method_body(&lines));
    out.push_str("    }\n");
    out
}

/// Indented body lines with a blank line before a closing `return`
pub fn method_body(lines: &[String]) -> String {
    if lines.is_empty() {
        return "        //\n".to_string();
    }

    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 && line.starts_with("return ") {
            out.push('\n');
        }
        let _ = writeln!(out, "        {}", line);
    }
    out
}

//! PHP rendering of method statements, shared by controllers and components.

use crate::generators::php::{self, Imports};
use crate::tree::Tree;
use crate::types::{
    EloquentStatement, EloquentVerb, QueryOperation, QueryStatement, SendStatement, SendType,
    SessionVerb, Statement,
};
use crate::utils::{class_basename, pluralize, singularize, to_camel_case, to_studly_case};

/// Where the rendered method lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    Controller,
    Component,
}

/// Renders the statements of one method
pub struct StatementRenderer<'a> {
    tree: &'a Tree,
    host: Host,
    /// Studly singular model context of the owning controller/component
    context: String,
    method: &'a str,
}

impl<'a> StatementRenderer<'a> {
    pub fn new(tree: &'a Tree, host: Host, context: impl Into<String>, method: &'a str) -> Self {
        Self {
            tree,
            host,
            context: context.into(),
            method,
        }
    }

    /// Lines of PHP (unindented) for every statement, in order
    pub fn render_all(&self, statements: &[Statement], imports: &mut Imports) -> Vec<String> {
        statements
            .iter()
            .flat_map(|statement| self.render(statement, imports))
            .collect()
    }

    pub fn render(&self, statement: &Statement, imports: &mut Imports) -> Vec<String> {
        match statement {
            Statement::Query(query) => vec![self.query(query, imports)],
            Statement::Render(render) => {
                let view = php::quote(&render.view);
                if render.data.is_empty() {
                    vec![format!("return view({});", view)]
                } else {
                    vec![format!("return view({}, {});", view, compact(&render.data))]
                }
            }
            Statement::Fire(fire) => {
                if fire.is_named_event() {
                    if fire.data.is_empty() {
                        vec![format!("event({});", php::quote(&fire.event))]
                    } else {
                        vec![format!("event({}, [{}]);", php::quote(&fire.event), php::arguments(&fire.data))]
                    }
                } else {
                    let class = self.app_class("Events", &fire.event, imports);
                    vec![format!("event(new {}({}));", class, php::arguments(&fire.data))]
                }
            }
            Statement::Dispatch(dispatch) => {
                let class = self.app_class("Jobs", &dispatch.job, imports);
                vec![format!("{}::dispatch({});", class, php::arguments(&dispatch.data))]
            }
            Statement::Send(send) => vec![self.send(send, imports)],
            Statement::Validate(_) => match self.host {
                // Form requests validate before the method body runs
                Host::Controller => Vec::new(),
                Host::Component => vec!["$this->validate();".to_string()],
            },
            Statement::Redirect(redirect) => {
                let route = php::quote(&redirect.route);
                match redirect.data.len() {
                    0 => vec![format!("return redirect()->route({});", route)],
                    1 => vec![format!(
                        "return redirect()->route({}, {});",
                        route,
                        php::reference(&redirect.data[0])
                    )],
                    _ => vec![format!(
                        "return redirect()->route({}, [{}]);",
                        route,
                        php::arguments(&redirect.data)
                    )],
                }
            }
            Statement::Respond(respond) => match respond.status() {
                Some(204) => vec!["return response()->noContent();".to_string()],
                Some(status) => vec![format!("return response()->noContent({});", status)],
                None => vec![format!("return {};", php::reference(respond.content.trim()))],
            },
            Statement::Resource(resource) => {
                let model = self.model_name(&resource.reference);
                let class = resource.name(&model);
                imports.add(php::app_class(self.tree.config(), "Http\\Resources", &class));
                vec![format!("return new {}({});", class, php::reference(&resource.reference))]
            }
            Statement::Eloquent(eloquent) => self.eloquent(eloquent, imports),
            Statement::Session(session) => {
                let method = match session.verb {
                    SessionVerb::Flash => "flash",
                    SessionVerb::Store => "put",
                };
                let session_call = match self.host {
                    Host::Controller => "$request->session()",
                    Host::Component => "session()",
                };
                vec![format!(
                    "{}->{}({}, {});",
                    session_call,
                    method,
                    php::quote(&session.reference),
                    php::reference(&session.reference)
                )]
            }
        }
    }

    /// Return type of a method ending with these statements, importing it when needed
    pub fn return_type(&self, statements: &[Statement], imports: &mut Imports) -> Option<String> {
        let last = statements.iter().rev().find(|s| !matches!(s, Statement::Validate(_)))?;
        match last {
            Statement::Render(_) => {
                imports.add("Illuminate\\View\\View");
                Some("View".to_string())
            }
            Statement::Redirect(_) => {
                imports.add("Illuminate\\Http\\RedirectResponse");
                Some("RedirectResponse".to_string())
            }
            Statement::Respond(respond) if respond.is_status() => {
                imports.add("Illuminate\\Http\\Response");
                Some("Response".to_string())
            }
            Statement::Resource(resource) => Some(resource.name(&self.model_name(&resource.reference))),
            _ => None,
        }
    }

    /// Studly singular model name for a context, resolved through the tree when possible
    pub fn model_name(&self, context: &str) -> String {
        context_model_name(self.tree, context)
    }

    /// Import the model behind a context and return its short class name
    fn model_class(&self, context: &str, imports: &mut Imports) -> String {
        let head = context.split('.').next().unwrap_or(context);
        let fqcn = match self.tree.model_for_context(head) {
            Some(model) => model.fully_qualified_class_name(self.tree.config()),
            None => self.tree.fqcn_for_context(&to_studly_case(&singularize(class_basename(head)))),
        };
        imports.add(&fqcn);
        php::short_name(&fqcn).to_string()
    }

    fn app_class(&self, segment: &str, name: &str, imports: &mut Imports) -> String {
        let fqcn = php::app_class(self.tree.config(), segment, name);
        imports.add(&fqcn);
        php::short_name(&fqcn).to_string()
    }

    fn query(&self, query: &QueryStatement, imports: &mut Imports) -> String {
        let context = query.model().map(str::to_string).unwrap_or_else(|| self.context.clone());
        let class = self.model_class(&context, imports);
        let plural = pluralize(&to_camel_case(&class));

        if query.operation == QueryOperation::All {
            return format!("${} = {}::all();", plural, class);
        }

        let mut calls: Vec<String> = Vec::new();
        let mut pluck: Option<String> = None;
        for clause in &query.clauses {
            let Some((kind, value)) = clause.split_once(':') else {
                continue;
            };
            match kind {
                "where" => {
                    let (column, expression) = match value.split_once('.') {
                        Some((_, column)) => (column.to_string(), php::reference(value)),
                        None => (value.to_string(), format!("${}", to_camel_case(value))),
                    };
                    calls.push(format!("where({}, {})", php::quote(&column), expression));
                }
                "order" => {
                    let column = value.rsplit('.').next().unwrap_or(value);
                    calls.push(format!("orderBy({})", php::quote(column)));
                }
                "limit" => calls.push(format!("limit({})", php::literal(value))),
                "pluck" => {
                    let column = value.rsplit('.').next().unwrap_or(value);
                    pluck = Some(column.to_string());
                }
                _ => {}
            }
        }

        let (variable, terminal) = match query.operation {
            QueryOperation::Pluck => (
                plural.clone(),
                format!("pluck({})", php::quote(pluck.as_deref().unwrap_or("id"))),
            ),
            QueryOperation::Count => (format!("{}Count", to_camel_case(&class)), "count()".to_string()),
            QueryOperation::Exists => (format!("{}Exists", to_camel_case(&class)), "exists()".to_string()),
            _ => (plural.clone(), "get()".to_string()),
        };
        calls.push(terminal);

        format!("${} = {}::{};", variable, class, calls.join("->"))
    }

    fn send(&self, send: &SendStatement, imports: &mut Imports) -> String {
        let arguments = php::arguments(&send.data);
        match send.send_type {
            SendType::Mail => {
                imports.add("Illuminate\\Support\\Facades\\Mail");
                let class = self.app_class("Mail", &send.target, imports);
                match &send.to {
                    Some(to) => format!(
                        "Mail::to({})->send(new {}({}));",
                        php::reference(to),
                        class,
                        arguments
                    ),
                    None => format!("Mail::send(new {}({}));", class, arguments),
                }
            }
            SendType::NotificationWithFacade => {
                imports.add("Illuminate\\Support\\Facades\\Notification");
                let class = self.app_class("Notification", &send.target, imports);
                let to = send
                    .to
                    .as_deref()
                    .map(php::reference)
                    .unwrap_or_else(|| self.current_user());
                format!("Notification::send({}, new {}({}));", to, class, arguments)
            }
            SendType::NotificationWithModel => {
                let class = self.app_class("Notification", &send.target, imports);
                let to = send
                    .to
                    .as_deref()
                    .map(php::reference)
                    .unwrap_or_else(|| self.current_user());
                format!("{}->notify(new {}({}));", to, class, arguments)
            }
        }
    }

    fn current_user(&self) -> String {
        match self.host {
            Host::Controller => "$request->user()".to_string(),
            Host::Component => "auth()->user()".to_string(),
        }
    }

    fn input(&self) -> &'static str {
        match self.host {
            Host::Controller => "$request->validated()",
            Host::Component => "$this->all()",
        }
    }

    fn eloquent(&self, eloquent: &EloquentStatement, imports: &mut Imports) -> Vec<String> {
        let reference = eloquent.reference.as_deref().unwrap_or(&self.context);
        let variable = format!("${}", to_camel_case(reference.split('.').next().unwrap_or(reference)));

        match eloquent.verb {
            EloquentVerb::Save => {
                if self.method == "store" || (self.host == Host::Component && self.method == "save") {
                    let class = self.model_class(reference, imports);
                    vec![format!("{} = {}::create({});", variable, class, self.input())]
                } else {
                    vec![format!("{}->save();", variable)]
                }
            }
            EloquentVerb::Delete => vec![format!("{}->delete();", variable)],
            EloquentVerb::Find => {
                let class = self.model_class(reference, imports);
                let key = reference.split_once('.').map(|(_, key)| key).unwrap_or("id");
                vec![format!("{} = {}::find(${});", variable, class, to_camel_case(key))]
            }
            EloquentVerb::Update => {
                if eloquent.columns.is_empty() {
                    return vec![format!("{}->update({});", variable, self.input())];
                }
                let source = match self.host {
                    Host::Controller => "$request->",
                    Host::Component => "$this->",
                };
                let target = format!("${}", to_camel_case(&self.context));
                let pairs: Vec<String> = eloquent
                    .columns
                    .iter()
                    .map(|column| format!("{} => {}{}", php::quote(column), source, column))
                    .collect();
                vec![format!("{}->update([{}]);", target, pairs.join(", "))]
            }
        }
    }
}

/// Studly singular model name for a context, resolved through the tree when possible
pub fn context_model_name(tree: &Tree, context: &str) -> String {
    let head = context.split('.').next().unwrap_or(context);
    match tree.model_for_context(head) {
        Some(model) => model.name(),
        None => to_studly_case(&singularize(class_basename(head))),
    }
}

/// `compact('posts', 'user')` for a data list
fn compact(data: &[String]) -> String {
    let names: Vec<String> = data
        .iter()
        .map(|d| php::quote(&to_camel_case(d.split('.').next().unwrap_or(d))))
        .collect();
    format!("compact({})", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::lexer::StatementLexer;
    use crate::parser;
    use crate::types::Model;
    use indexmap::IndexMap;

    fn tree() -> Tree {
        let mut models = IndexMap::new();
        models.insert("Post".to_string(), Model::new("Post"));
        models.insert("User".to_string(), Model::new("User"));
        Tree::from_models(models, Config::default())
    }

    fn render(method: &str, body: &str) -> (Vec<String>, String) {
        let tree = tree();
        let tokens = parser::parse(body).unwrap();
        let statements = StatementLexer::new().analyze(&tokens);
        let renderer = StatementRenderer::new(&tree, Host::Controller, "Post", method);
        let mut imports = Imports::new("App\\Http\\Controllers");
        let lines = renderer.render_all(&statements, &mut imports);
        (lines, imports.render())
    }

    #[test]
    fn test_index_statements() {
        let (lines, imports) = render("index", "query: all\nrender: post.index with:posts\n");
        assert_eq!(
            lines,
            vec!["$posts = Post::all();", "return view('post.index', compact('posts'));"]
        );
        assert!(imports.contains("use App\\Models\\Post;"));
    }

    #[test]
    fn test_store_statements() {
        let body = "validate: title, content\nsave: post\nsend: ReviewPost to:post.author.email with:post\ndispatch: SyncMedia with:post\nfire: NewPost with:post\nflash: post.title\nredirect: post.index\n";
        let (lines, imports) = render("store", body);
        assert_eq!(
            lines,
            vec![
                "$post = Post::create($request->validated());",
                "Mail::to($post->author->email)->send(new ReviewPost($post));",
                "SyncMedia::dispatch($post);",
                "event(new NewPost($post));",
                "$request->session()->flash('post.title', $post->title);",
                "return redirect()->route('post.index');",
            ]
        );
        assert!(imports.contains("use App\\Events\\NewPost;"));
        assert!(imports.contains("use App\\Jobs\\SyncMedia;"));
        assert!(imports.contains("use App\\Mail\\ReviewPost;"));
        assert!(imports.contains("use Illuminate\\Support\\Facades\\Mail;"));
    }

    #[test]
    fn test_query_clauses() {
        let (lines, _) = render("index", "query: where:title where:content order:published_at limit:5\n");
        assert_eq!(
            lines,
            vec!["$posts = Post::where('title', $title)->where('content', $content)->orderBy('published_at')->limit(5)->get();"]
        );
    }

    #[test]
    fn test_named_event_and_respond() {
        let (lines, _) = render("destroy", "delete: post\nfire: post.deleted with:post\nrespond: 204\n");
        assert_eq!(
            lines,
            vec![
                "$post->delete();",
                "event('post.deleted', [$post]);",
                "return response()->noContent();",
            ]
        );
    }

    #[test]
    fn test_return_types() {
        let tree = tree();
        let renderer = StatementRenderer::new(&tree, Host::Controller, "Post", "show");
        let mut imports = Imports::new("App\\Http\\Controllers");
        let statements = StatementLexer::new().analyze(&parser::parse("resource: post").unwrap());
        assert_eq!(renderer.return_type(&statements, &mut imports), Some("PostResource".to_string()));

        let statements = StatementLexer::new().analyze(&parser::parse("redirect: post.index").unwrap());
        assert_eq!(
            renderer.return_type(&statements, &mut imports),
            Some("RedirectResponse".to_string())
        );
    }
}

//! Call-graph construction over the oxc AST
//!
//! One traversal records call sites, the flattened `calledNames` and
//! `referencedNames` sets, and dynamic code execution. Type positions are not
//! walked, so names used only as types never count as references.

use super::import_resolver::literal_string;
use super::location::Locator;
use crate::models::call_graph::{CallKind, CallSite, DynamicCodeKind, DynamicCodeWarning, FileCallGraph};
use oxc_ast::ast::*;
use oxc_ast_visit::{walk, Visit};
use oxc_span::Span;

/// Receivers whose `eval` property is the global eval
const GLOBAL_OBJECTS: [&str; 4] = ["window", "globalThis", "global", "self"];

/// Timers that evaluate a string first argument as code
const STRING_TIMERS: [&str; 2] = ["setTimeout", "setInterval"];

/// Builds the `FileCallGraph` of one file
pub struct CallGraphBuilder<'l, 's> {
    locator: &'l Locator<'s>,
    graph: FileCallGraph,
}

impl<'l, 's> CallGraphBuilder<'l, 's> {
    pub fn build<'a>(program: &Program<'a>, locator: &'l Locator<'s>) -> FileCallGraph {
        let mut builder = Self {
            locator,
            graph: FileCallGraph::default(),
        };
        builder.visit_program(program);
        builder.graph
    }

    fn record_call(&mut self, callee: String, receiver: Option<String>, kind: CallKind, span: Span) {
        self.graph.called_names.insert(callee.clone());
        if let Some(receiver) = &receiver {
            self.graph.called_names.insert(format!("{}.{}", receiver, callee));
        }
        self.graph.call_sites.push(CallSite {
            callee,
            receiver_name: receiver,
            kind,
            location: self.locator.locate(span),
        });
    }

    fn record_dynamic(&mut self, kind: DynamicCodeKind, span: Span, context: impl Into<String>) {
        self.graph.dynamic_code.push(DynamicCodeWarning {
            kind,
            location: self.locator.locate(span),
            context: context.into(),
        });
    }

    /// Inspect a callee and record what it invokes
    fn record_callee(&mut self, callee: &Expression<'_>, call: &CallExpression<'_>) {
        match callee.get_inner_expression() {
            Expression::Identifier(ident) => {
                let name = ident.name.as_str();
                self.record_call(name.to_string(), None, CallKind::PlainCall, call.span);
                self.check_plain_dynamic(name, call);
            }
            Expression::StaticMemberExpression(member) => {
                let receiver = dotted_path(&member.object);
                let property = member.property.name.as_str();
                if property == "eval" && receiver.as_deref().is_some_and(|r| GLOBAL_OBJECTS.contains(&r)) {
                    self.record_dynamic(
                        DynamicCodeKind::IndirectEval,
                        call.span,
                        format!("{}.eval() executes code in the global scope", receiver.as_deref().unwrap_or("")),
                    );
                }
                self.record_call(property.to_string(), receiver, CallKind::MethodCall, call.span);
            }
            Expression::ComputedMemberExpression(member) => {
                // Only literal keys are resolvable
                if let Some(key) = literal_string(&member.expression) {
                    let receiver = dotted_path(&member.object);
                    self.record_call(key.to_string(), receiver, CallKind::ComputedCall, call.span);
                }
            }
            Expression::SequenceExpression(sequence) => {
                // `(0, eval)(code)` and the transpiled `(0, ns.fn)(args)` idiom
                let Some(last) = sequence.expressions.last() else {
                    return;
                };
                match last.get_inner_expression() {
                    Expression::Identifier(ident) if ident.name.as_str() == "eval" => {
                        self.record_dynamic(
                            DynamicCodeKind::IndirectEval,
                            call.span,
                            "(0, eval)() executes code in the global scope",
                        );
                        self.record_call("eval".to_string(), None, CallKind::PlainCall, call.span);
                    }
                    _ => self.record_callee(last, call),
                }
            }
            _ => {}
        }
    }

    fn check_plain_dynamic(&mut self, name: &str, call: &CallExpression<'_>) {
        let first_arg = call.arguments.first().and_then(|arg| arg.as_expression());
        match name {
            "eval" => self.record_dynamic(DynamicCodeKind::Eval, call.span, "eval() executes arbitrary code"),
            "Function" => self.record_dynamic(
                DynamicCodeKind::FunctionConstructor,
                call.span,
                "Function() builds code from strings",
            ),
            _ if STRING_TIMERS.contains(&name) => {
                if first_arg.is_some_and(is_string_like) {
                    self.record_dynamic(
                        DynamicCodeKind::StringTimer,
                        call.span,
                        format!("{}() with a string argument evaluates code", name),
                    );
                }
            }
            "require" => {
                if call.arguments.len() == 1 && first_arg.and_then(literal_string).is_none() {
                    self.record_dynamic(
                        DynamicCodeKind::ComputedRequire,
                        call.span,
                        "require() with a computed module name",
                    );
                }
            }
            _ => {}
        }
    }
}

impl<'a, 'l, 's> Visit<'a> for CallGraphBuilder<'l, 's> {
    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        self.record_callee(&call.callee, call);
        walk::walk_call_expression(self, call);
    }

    fn visit_new_expression(&mut self, expr: &NewExpression<'a>) {
        match expr.callee.get_inner_expression() {
            Expression::Identifier(ident) => {
                let name = ident.name.as_str();
                if name == "Function" {
                    self.record_dynamic(
                        DynamicCodeKind::FunctionConstructor,
                        expr.span,
                        "new Function() builds code from strings",
                    );
                }
                self.record_call(name.to_string(), None, CallKind::ConstructorCall, expr.span);
            }
            Expression::StaticMemberExpression(member) => {
                let receiver = dotted_path(&member.object);
                self.record_call(member.property.name.to_string(), receiver, CallKind::ConstructorCall, expr.span);
            }
            _ => {}
        }
        walk::walk_new_expression(self, expr);
    }

    fn visit_import_expression(&mut self, expr: &ImportExpression<'a>) {
        if literal_string(&expr.source).is_none() {
            self.record_dynamic(
                DynamicCodeKind::ComputedImport,
                expr.span,
                "import() with a computed module name",
            );
        }
        walk::walk_import_expression(self, expr);
    }

    fn visit_static_member_expression(&mut self, expr: &StaticMemberExpression<'a>) {
        if let Some(object) = dotted_path(&expr.object) {
            self.graph
                .referenced_names
                .insert(format!("{}.{}", object, expr.property.name));
        }
        walk::walk_static_member_expression(self, expr);
    }

    fn visit_identifier_reference(&mut self, ident: &IdentifierReference<'a>) {
        self.graph.referenced_names.insert(ident.name.to_string());
    }

    fn visit_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'a>) {
        // Re-exported names are not local uses
        if decl.source.is_none() {
            walk::walk_export_named_declaration(self, decl);
        }
    }

    fn visit_ts_type_annotation(&mut self, _it: &TSTypeAnnotation<'a>) {}

    fn visit_ts_type(&mut self, _it: &TSType<'a>) {}

    fn visit_ts_type_parameter_instantiation(&mut self, _it: &TSTypeParameterInstantiation<'a>) {}

    fn visit_ts_type_parameter_declaration(&mut self, _it: &TSTypeParameterDeclaration<'a>) {}

    fn visit_ts_interface_declaration(&mut self, _it: &TSInterfaceDeclaration<'a>) {}

    fn visit_ts_type_alias_declaration(&mut self, _it: &TSTypeAliasDeclaration<'a>) {}

    fn visit_ts_class_implements(&mut self, _it: &TSClassImplements<'a>) {}
}

/// `a.b.c` for a static member chain rooted at an identifier or `this`
fn dotted_path(expr: &Expression<'_>) -> Option<String> {
    match expr.get_inner_expression() {
        Expression::Identifier(ident) => Some(ident.name.to_string()),
        Expression::ThisExpression(_) => Some("this".to_string()),
        Expression::StaticMemberExpression(member) => {
            let object = dotted_path(&member.object)?;
            Some(format!("{}.{}", object, member.property.name))
        }
        _ => None,
    }
}

fn is_string_like(expr: &Expression<'_>) -> bool {
    matches!(
        expr.get_inner_expression(),
        Expression::StringLiteral(_) | Expression::TemplateLiteral(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;
    use std::path::Path;

    fn build(source: &str) -> FileCallGraph {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::ts()).parse();
        assert!(ret.errors.is_empty(), "parse errors: {:?}", ret.errors);
        let locator = Locator::new(source, Path::new("test.ts"));
        CallGraphBuilder::build(&ret.program, &locator)
    }

    #[test]
    fn test_plain_and_method_calls() {
        let graph = build("merge({}, {});\naxios.get('/x');\nthis.client.send();");

        assert!(graph.is_called("merge"));
        assert!(graph.is_called("get"));
        assert!(graph.is_called("axios.get"));
        assert!(graph.is_called("this.client.send"));
        assert_eq!(graph.call_sites.len(), 3);
        assert_eq!(graph.call_sites[0].kind, CallKind::PlainCall);
        assert_eq!(graph.call_sites[1].kind, CallKind::MethodCall);
        assert_eq!(graph.call_sites[1].receiver_name.as_deref(), Some("axios"));
        assert_eq!(graph.call_sites[2].location.line, 3);
    }

    #[test]
    fn test_constructor_calls() {
        let graph = build("const e = new EventEmitter();\nconst c = new aws.S3();");
        assert!(graph.is_called("EventEmitter"));
        assert!(graph.is_called("aws.S3"));
        assert!(graph.call_sites.iter().all(|s| s.kind == CallKind::ConstructorCall));
    }

    #[test]
    fn test_computed_calls() {
        let graph = build("_['merge'](a, b);\n_[name](a);");
        assert!(graph.is_called("_.merge"));
        assert_eq!(graph.call_sites.len(), 1);
        assert_eq!(graph.call_sites[0].kind, CallKind::ComputedCall);
    }

    #[test]
    fn test_referenced_names() {
        let graph = build("import { debounce } from 'lodash';\nwindow.addEventListener('resize', debounce);\nconst v = _.VERSION;");
        assert!(graph.is_referenced("debounce"));
        assert!(!graph.is_called("debounce"));
        assert!(graph.is_referenced("_.VERSION"));
        assert!(graph.is_referenced("_"));
    }

    #[test]
    fn test_declarations_are_not_references() {
        let graph = build("const helper = 1;\nfunction run(arg) {}\nclass Service { method() {} }");
        assert!(!graph.is_referenced("helper"));
        assert!(!graph.is_referenced("arg"));
        assert!(!graph.is_referenced("run"));
        assert!(!graph.is_referenced("method"));
    }

    #[test]
    fn test_type_positions_are_skipped() {
        let graph = build(
            "import type { User } from 'user-types';\nlet u: User;\ninterface X extends Base {}\ntype Y = Other;\nclass Z implements Contract {}",
        );
        assert!(!graph.is_referenced("User"));
        assert!(!graph.is_referenced("Base"));
        assert!(!graph.is_referenced("Other"));
        assert!(!graph.is_referenced("Contract"));
    }

    #[test]
    fn test_reexported_names_are_not_references() {
        let graph = build("export { helper } from 'pkg';\nconst local = 1;\nexport { local };");
        assert!(!graph.is_referenced("helper"));
        assert!(graph.is_referenced("local"));
    }

    #[test]
    fn test_dynamic_code_detection() {
        let graph = build(
            r#"
eval('1 + 1');
new Function('a', 'return a');
Function('return this')();
setTimeout('tick()', 10);
setTimeout(() => tick(), 10);
setInterval(`poll()`, 5);
(0, eval)('x');
window.eval('y');
import(moduleName);
require(path + '/x');
require('fine');
"#,
        );

        let kinds: Vec<DynamicCodeKind> = graph.dynamic_code.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DynamicCodeKind::Eval,
                DynamicCodeKind::FunctionConstructor,
                DynamicCodeKind::FunctionConstructor,
                DynamicCodeKind::StringTimer,
                DynamicCodeKind::StringTimer,
                DynamicCodeKind::IndirectEval,
                DynamicCodeKind::IndirectEval,
                DynamicCodeKind::ComputedImport,
                DynamicCodeKind::ComputedRequire,
            ]
        );
        assert!(graph.has_dynamic_imports());
    }

    #[test]
    fn test_transpiled_sequence_call() {
        let graph = build("(0, _lodash.merge)(a, b);");
        assert!(graph.is_called("_lodash.merge"));
    }
}

//! Import resolution over the oxc AST
//!
//! Static `import` declarations are only recognized in the module's import
//! prefix: once any other top-level statement appears, later declarations are
//! left alone. Re-exports, `require()` calls and literal `import()` expressions
//! are recorded wherever they appear.

use super::location::Locator;
use crate::models::import::{BoundName, ImportKind, ImportRecord, DEFAULT_NAME};
use oxc_ast::ast::*;
use oxc_ast_visit::{walk, Visit};
use oxc_span::Span;
use std::collections::HashSet;

/// Collects the `ImportRecord`s of one file
pub struct ImportResolver<'l, 's> {
    locator: &'l Locator<'s>,
    records: Vec<(u32, ImportRecord)>,
    /// Calls already recorded with their bindings
    handled: HashSet<u32>,
}

impl<'l, 's> ImportResolver<'l, 's> {
    /// Resolve all imports of a program, in source order
    pub fn resolve<'a>(program: &Program<'a>, locator: &'l Locator<'s>) -> Vec<ImportRecord> {
        let mut resolver = Self {
            locator,
            records: Vec::new(),
            handled: HashSet::new(),
        };

        let mut in_prefix = true;
        for stmt in &program.body {
            match stmt {
                Statement::ImportDeclaration(decl) => {
                    if in_prefix {
                        resolver.record_import_declaration(decl);
                    }
                }
                Statement::ExportNamedDeclaration(decl) if decl.source.is_some() => {
                    resolver.record_reexport(decl);
                }
                Statement::ExportAllDeclaration(decl) => resolver.record_export_all(decl),
                Statement::TSImportEqualsDeclaration(decl) => {
                    if in_prefix {
                        resolver.record_import_equals(decl);
                    }
                }
                _ => in_prefix = false,
            }
            resolver.visit_statement(stmt);
        }

        resolver.records.sort_by_key(|(start, _)| *start);
        resolver.records.into_iter().map(|(_, record)| record).collect()
    }

    fn push(&mut self, span: Span, record: ImportRecord) {
        self.records.push((span.start, record));
    }

    fn record_import_declaration(&mut self, decl: &ImportDeclaration<'_>) {
        let location = self.locator.locate(decl.span);
        let module_name = decl.source.value.to_string();

        if decl.import_kind.is_type() {
            let mut record = ImportRecord::new(module_name, ImportKind::TypeOnlyImport, location);
            for name in Self::specifier_bindings(decl, true) {
                record.bind(name);
            }
            self.push(decl.span, record);
            return;
        }

        let Some(specifiers) = &decl.specifiers else {
            self.push(decl.span, ImportRecord::new(module_name, ImportKind::SideEffectOnly, location));
            return;
        };

        // `import {} from 'x'` still evaluates the module
        if specifiers.is_empty() {
            self.push(decl.span, ImportRecord::new(module_name, ImportKind::SideEffectOnly, location));
            return;
        }

        let bindings = Self::specifier_bindings(decl, false);
        if bindings.is_empty() {
            // Every specifier was an inline `type` import
            let mut record = ImportRecord::new(module_name, ImportKind::TypeOnlyImport, location);
            for name in Self::specifier_bindings(decl, true) {
                record.bind(name);
            }
            self.push(decl.span, record);
            return;
        }

        let kind = Self::declaration_kind(specifiers);
        let mut record = ImportRecord::new(module_name, kind, location);
        for name in bindings {
            record.bind(name);
        }
        self.push(decl.span, record);
    }

    fn declaration_kind(specifiers: &[ImportDeclarationSpecifier<'_>]) -> ImportKind {
        let has_named = specifiers
            .iter()
            .any(|s| matches!(s, ImportDeclarationSpecifier::ImportSpecifier(_)));
        let has_namespace = specifiers
            .iter()
            .any(|s| matches!(s, ImportDeclarationSpecifier::ImportNamespaceSpecifier(_)));

        if has_named {
            ImportKind::NamedImport
        } else if has_namespace {
            ImportKind::NamespaceImport
        } else {
            ImportKind::DefaultImport
        }
    }

    /// Bindings of a declaration; `include_types` keeps inline `type` specifiers
    fn specifier_bindings(decl: &ImportDeclaration<'_>, include_types: bool) -> Vec<BoundName> {
        let Some(specifiers) = &decl.specifiers else {
            return Vec::new();
        };

        specifiers
            .iter()
            .filter_map(|specifier| match specifier {
                ImportDeclarationSpecifier::ImportSpecifier(spec) => {
                    if spec.import_kind.is_type() && !include_types {
                        None
                    } else {
                        Some(BoundName::new(spec.imported.name().to_string(), spec.local.name.to_string()))
                    }
                }
                ImportDeclarationSpecifier::ImportDefaultSpecifier(spec) => {
                    Some(BoundName::new(DEFAULT_NAME, spec.local.name.to_string()))
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(spec) => {
                    Some(BoundName::namespace(spec.local.name.to_string()))
                }
            })
            .collect()
    }

    fn record_reexport(&mut self, decl: &ExportNamedDeclaration<'_>) {
        let Some(source) = &decl.source else {
            return;
        };
        let location = self.locator.locate(decl.span);

        let type_only = decl.export_kind.is_type();
        let kind = if type_only {
            ImportKind::TypeOnlyImport
        } else {
            ImportKind::ReExport
        };
        let mut record = ImportRecord::new(source.value.to_string(), kind, location);

        for specifier in &decl.specifiers {
            if specifier.export_kind.is_type() && !type_only {
                continue;
            }
            record.bind(BoundName::new(
                specifier.local.name().to_string(),
                specifier.exported.name().to_string(),
            ));
        }

        // `export { type A } from 'x'` forwards nothing at runtime
        if !type_only && record.bound_names.is_empty() && !decl.specifiers.is_empty() {
            record.kind = ImportKind::TypeOnlyImport;
            record.is_type_only = true;
        }

        self.push(decl.span, record);
    }

    fn record_export_all(&mut self, decl: &ExportAllDeclaration<'_>) {
        let location = self.locator.locate(decl.span);
        let kind = if decl.export_kind.is_type() {
            ImportKind::TypeOnlyImport
        } else {
            ImportKind::ReExportAll
        };
        let mut record = ImportRecord::new(decl.source.value.to_string(), kind, location);
        if let Some(exported) = &decl.exported {
            record.bind(BoundName::namespace(exported.name().to_string()));
        }
        self.push(decl.span, record);
    }

    /// `import fs = require('fs')`
    fn record_import_equals(&mut self, decl: &TSImportEqualsDeclaration<'_>) {
        let TSModuleReference::ExternalModuleReference(reference) = &decl.module_reference else {
            return;
        };
        let location = self.locator.locate(decl.span);
        let kind = if decl.import_kind.is_type() {
            ImportKind::TypeOnlyImport
        } else {
            ImportKind::CommonJsRequire
        };
        let record = ImportRecord::new(reference.expression.value.to_string(), kind, location)
            .with_binding(BoundName::namespace(decl.id.name.to_string()));
        self.push(decl.span, record);
    }

    /// Literal module specifier of a `require('x')` call
    fn require_specifier<'b>(call: &'b CallExpression<'_>) -> Option<&'b str> {
        let Expression::Identifier(callee) = call.callee.get_inner_expression() else {
            return None;
        };
        if callee.name.as_str() != "require" || call.arguments.len() != 1 {
            return None;
        }
        call.arguments[0].as_expression().and_then(literal_string)
    }

    /// Bindings introduced by `pattern = <module object>`
    fn pattern_bindings(pattern: &BindingPattern<'_>) -> Vec<BoundName> {
        match &pattern.kind {
            BindingPatternKind::BindingIdentifier(id) => vec![BoundName::namespace(id.name.to_string())],
            BindingPatternKind::ObjectPattern(object) => object
                .properties
                .iter()
                .filter_map(|property| {
                    let imported = property.key.static_name()?;
                    let local = match &property.value.kind {
                        BindingPatternKind::BindingIdentifier(id) => id.name.to_string(),
                        BindingPatternKind::AssignmentPattern(assign) => match &assign.left.kind {
                            BindingPatternKind::BindingIdentifier(id) => id.name.to_string(),
                            _ => return None,
                        },
                        _ => return None,
                    };
                    Some(BoundName::new(imported.to_string(), local))
                })
                .collect(),
            BindingPatternKind::AssignmentPattern(assign) => Self::pattern_bindings(&assign.left),
            BindingPatternKind::ArrayPattern(_) => Vec::new(),
        }
    }

    /// Handle `const x = require('m')`, `const { a } = require('m')`,
    /// `const a = require('m').a` and `const m = await import('m')`
    fn record_bound_module(&mut self, declarator: &VariableDeclarator<'_>) {
        let Some(init) = &declarator.init else {
            return;
        };

        let mut expr = init.get_inner_expression();
        if let Expression::AwaitExpression(await_expr) = expr {
            expr = await_expr.argument.get_inner_expression();
        }

        match expr {
            Expression::CallExpression(call) => {
                if let Some(specifier) = Self::require_specifier(call) {
                    let mut record = ImportRecord::new(
                        specifier,
                        ImportKind::CommonJsRequire,
                        self.locator.locate(declarator.span),
                    );
                    for name in Self::pattern_bindings(&declarator.id) {
                        record.bind(name);
                    }
                    self.handled.insert(call.span.start);
                    self.push(call.span, record);
                }
            }
            Expression::StaticMemberExpression(member) => {
                let Expression::CallExpression(call) = member.object.get_inner_expression() else {
                    return;
                };
                let Some(specifier) = Self::require_specifier(call) else {
                    return;
                };
                let mut record = ImportRecord::new(
                    specifier,
                    ImportKind::CommonJsRequire,
                    self.locator.locate(declarator.span),
                );
                if let BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind {
                    record.bind(BoundName::new(member.property.name.to_string(), id.name.to_string()));
                }
                self.handled.insert(call.span.start);
                self.push(call.span, record);
            }
            Expression::ImportExpression(import) => {
                if let Some(specifier) = literal_string(&import.source) {
                    let mut record = ImportRecord::new(
                        specifier,
                        ImportKind::DynamicImport,
                        self.locator.locate(declarator.span),
                    );
                    for name in Self::pattern_bindings(&declarator.id) {
                        record.bind(name);
                    }
                    self.handled.insert(import.span.start);
                    self.push(import.span, record);
                }
            }
            _ => {}
        }
    }
}

impl<'a, 'l, 's> Visit<'a> for ImportResolver<'l, 's> {
    fn visit_variable_declarator(&mut self, declarator: &VariableDeclarator<'a>) {
        self.record_bound_module(declarator);
        walk::walk_variable_declarator(self, declarator);
    }

    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if !self.handled.contains(&call.span.start) {
            if let Some(specifier) = Self::require_specifier(call) {
                let record =
                    ImportRecord::new(specifier, ImportKind::CommonJsRequire, self.locator.locate(call.span));
                self.push(call.span, record);
            }
        }
        walk::walk_call_expression(self, call);
    }

    fn visit_import_expression(&mut self, import: &ImportExpression<'a>) {
        if !self.handled.contains(&import.span.start) {
            if let Some(specifier) = literal_string(&import.source) {
                let record =
                    ImportRecord::new(specifier, ImportKind::DynamicImport, self.locator.locate(import.span));
                self.push(import.span, record);
            }
        }
        walk::walk_import_expression(self, import);
    }
}

/// The value of a string literal or an expression-free template literal
pub(crate) fn literal_string<'b>(expr: &'b Expression<'_>) -> Option<&'b str> {
    match expr.get_inner_expression() {
        Expression::StringLiteral(lit) => Some(lit.value.as_str()),
        Expression::TemplateLiteral(tpl) if tpl.expressions.is_empty() && tpl.quasis.len() == 1 => {
            tpl.quasis[0].value.cooked.as_ref().map(|cooked| cooked.as_str())
        }
        _ => None,
    }
}

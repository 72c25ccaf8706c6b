//! End-to-end classification of small projects built in temporary directories

use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};
use reachability::{
    models::ImportKind, Component, ComponentResult, Confidence, EngineOptions, ReachabilityEngine,
    ReachabilityStatus, Vulnerability, WarningCode,
};

/// Write `files` (relative path, contents) under a fresh temporary directory
fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempdir().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

fn analyze(root: &Path, components: &[Component]) -> Vec<ComponentResult> {
    ReachabilityEngine::default().analyze(root, components).unwrap()
}

fn analyze_one(root: &Path, component: Component) -> ComponentResult {
    analyze(root, &[component]).remove(0)
}

fn lodash_with_template_cve() -> Component {
    Component::new("lodash", "4.17.20").with_vulnerability(Vulnerability {
        id: "CVE-2021-23337".to_string(),
        severity: Some("high".to_string()),
        affected_functions: vec!["template".to_string()],
    })
}

#[test]
fn test_unused_dependency_is_not_reachable() {
    let dir = project(&[
        ("src/app.ts", "import { z } from 'zod';\nz.string();\n"),
        ("src/util.js", "const path = require('path');\nmodule.exports = path.join;\n"),
    ]);

    let result = analyze_one(dir.path(), Component::new("lodash", "4.17.21"));
    assert_eq!(result.status, ReachabilityStatus::NotReachable);
    assert_eq!(result.confidence, Confidence::High);
    assert!(result.usage.locations.is_empty());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_named_call_is_reachable_with_high_confidence() {
    let dir = project(&[(
        "src/app.ts",
        "import { merge, pick } from 'lodash';\n\nexport const run = () => merge({}, {});\n",
    )]);

    let result = analyze_one(dir.path(), Component::new("lodash", "4.17.21"));
    assert_eq!(result.status, ReachabilityStatus::Reachable);
    assert_eq!(result.confidence, Confidence::High);
    assert_eq!(result.usage.used_members, vec!["merge".to_string()]);
    assert_eq!(result.usage.import_styles, vec![ImportKind::NamedImport]);
    assert_eq!(result.usage.locations.len(), 1);
    assert_eq!(result.usage.locations[0].line, 1);
    assert_eq!(result.usage.locations[0].file, Path::new("src").join("app.ts"));
}

#[test]
fn test_import_without_use_is_imported() {
    let dir = project(&[("src/app.ts", "import { merge } from 'lodash';\nexport {};\n")]);

    let result = analyze_one(dir.path(), Component::new("lodash", ""));
    assert_eq!(result.status, ReachabilityStatus::Imported);
    assert_eq!(result.confidence, Confidence::Medium);
    assert!(result.usage.used_members.is_empty());
}

#[test]
fn test_type_only_import_is_not_reachable() {
    let dir = project(&[(
        "src/types.ts",
        "import type { LoDashStatic } from 'lodash';\nexport type L = LoDashStatic;\n",
    )]);

    let result = analyze_one(dir.path(), Component::new("lodash", ""));
    assert_eq!(result.status, ReachabilityStatus::NotReachable);
    assert!(result.usage.locations.is_empty());
}

#[test]
fn test_vulnerable_function_precision() {
    let calls_merge = project(&[("src/app.ts", "import { merge } from 'lodash';\nmerge({}, {});\n")]);
    let result = analyze_one(calls_merge.path(), lodash_with_template_cve());
    assert_eq!(result.status, ReachabilityStatus::Reachable);
    assert!(result.usage.vulnerable_functions_called.is_empty());
    assert!(!result.is_vulnerable_reachable());

    let calls_template = project(&[(
        "src/render.js",
        "const _ = require('lodash');\nmodule.exports = (s) => _.template(s)();\n",
    )]);
    let result = analyze_one(calls_template.path(), lodash_with_template_cve());
    assert_eq!(result.status, ReachabilityStatus::Reachable);
    assert_eq!(result.confidence, Confidence::High);
    assert_eq!(result.usage.vulnerable_functions_called, vec!["template".to_string()]);
}

#[test]
fn test_barrel_call_is_reachable() {
    let dir = project(&[
        ("src/app.ts", "import { merge } from './utils';\nmerge({}, {});\n"),
        ("src/utils/index.ts", "export { merge } from 'lodash';\n"),
    ]);

    let result = analyze_one(dir.path(), Component::new("lodash", ""));
    assert_eq!(result.status, ReachabilityStatus::Reachable);
    assert_eq!(result.confidence, Confidence::Medium);
    assert_eq!(result.usage.used_members, vec!["merge".to_string()]);
    assert!(result.has_warning(WarningCode::BarrelFile));
}

#[test]
fn test_barrel_without_call_is_indirect() {
    let dir = project(&[
        ("src/app.ts", "import { merge } from './utils';\nexport {};\n"),
        ("src/utils/index.ts", "export { merge } from 'lodash';\n"),
    ]);

    let result = analyze_one(dir.path(), Component::new("lodash", ""));
    assert_eq!(result.status, ReachabilityStatus::Indirect);
    assert_eq!(result.confidence, Confidence::Medium);
}

#[test]
fn test_circular_reexport_warns_exactly_once() {
    let dir = project(&[
        ("src/app.ts", "import { x } from './a';\nx();\n"),
        ("src/a.ts", "export * from './b';\n"),
        ("src/b.ts", "export * from './a';\n"),
    ]);

    let results = analyze(dir.path(), &[Component::new("lodash", ""), Component::new("zod", "")]);
    for result in &results {
        assert_eq!(result.status, ReachabilityStatus::NotReachable);
        assert_eq!(result.warning_count(WarningCode::CircularReexport), 1);
    }
}

#[test]
fn test_cycle_imported_from_both_ends_warns_once() {
    let dir = project(&[
        ("src/app.ts", "import { x } from './a';\nx();\n"),
        ("src/main.ts", "import { y } from './b';\ny();\n"),
        ("src/a.ts", "export * from './b';\n"),
        ("src/b.ts", "export * from './a';\n"),
    ]);

    let result = analyze_one(dir.path(), Component::new("lodash", ""));
    assert_eq!(result.status, ReachabilityStatus::NotReachable);
    assert_eq!(result.warning_count(WarningCode::CircularReexport), 1);
}

#[test]
fn test_per_method_package_call_matches_vulnerable_function() {
    let dir = project(&[
        (
            "src/render.js",
            "const template = require('lodash/template');\nmodule.exports = (s) => template(s)();\n",
        ),
        ("src/view.ts", "import template from 'lodash/template';\nexport const view = template('<%= x %>');\n"),
    ]);

    let result = analyze_one(dir.path(), lodash_with_template_cve());
    assert_eq!(result.status, ReachabilityStatus::Reachable);
    assert_eq!(result.confidence, Confidence::High);
    assert_eq!(result.usage.used_members, vec!["template".to_string()]);
    assert_eq!(result.usage.vulnerable_functions_called, vec!["template".to_string()]);
}

#[test]
fn test_depth_limit_stops_tracing() {
    let mut files = vec![("src/app.ts".to_string(), "import { merge } from './b1';\nmerge();\n".to_string())];
    for i in 1..7 {
        files.push((format!("src/b{}.ts", i), format!("export * from './b{}';\n", i + 1)));
    }
    files.push(("src/b7.ts".to_string(), "export { merge } from 'lodash';\n".to_string()));
    let borrowed: Vec<(&str, &str)> = files.iter().map(|(n, c)| (n.as_str(), c.as_str())).collect();
    let dir = project(&borrowed);

    let shallow = analyze_one(dir.path(), Component::new("lodash", ""));
    assert!(shallow.has_warning(WarningCode::MaxDepthReached));
    assert!(!shallow.has_warning(WarningCode::BarrelFile));
    assert_ne!(shallow.status, ReachabilityStatus::Reachable);

    let engine = ReachabilityEngine::new(EngineOptions {
        max_reexport_depth: 7,
        ..EngineOptions::default()
    });
    let deep = engine.analyze(dir.path(), &[Component::new("lodash", "")]).unwrap().remove(0);
    assert_eq!(deep.status, ReachabilityStatus::Reachable);
    assert!(deep.has_warning(WarningCode::BarrelFile));
    assert!(!deep.has_warning(WarningCode::MaxDepthReached));
}

#[test]
fn test_computed_import_lowers_confidence() {
    let dir = project(&[(
        "src/plugins.js",
        "module.exports = async (name) => {\n  const plugin = await import(name);\n  return plugin.default;\n};\n",
    )]);

    let result = analyze_one(dir.path(), Component::new("lodash", ""));
    assert_eq!(result.status, ReachabilityStatus::NotReachable);
    assert_eq!(result.confidence, Confidence::Medium);
    assert!(result.has_warning(WarningCode::DynamicImport));
}

#[test]
fn test_scoped_package_subpath() {
    let dir = project(&[(
        "src/app.ts",
        "import { createClient } from '@supabase/supabase-js/dist/module';\ncreateClient('u', 'k');\n",
    )]);

    let results = analyze(
        dir.path(),
        &[Component::new("@supabase/supabase-js", "2.0.0"), Component::new("@supabase/supabase", "")],
    );
    assert_eq!(results[0].status, ReachabilityStatus::Reachable);
    assert_eq!(results[1].status, ReachabilityStatus::NotReachable);
}

#[test]
fn test_ignored_files_are_not_analyzed() {
    let dir = project(&[
        ("src/app.ts", "export const x = 1;\n"),
        ("src/app.test.ts", "import { merge } from 'lodash';\nmerge();\n"),
        ("node_modules/lodash/index.js", "module.exports = require('lodash/merge');\n"),
    ]);

    let engine = ReachabilityEngine::new(EngineOptions {
        ignore_patterns: vec!["**/*.test.ts".to_string()],
        ..EngineOptions::default()
    });
    let result = engine.analyze(dir.path(), &[Component::new("lodash", "")]).unwrap().remove(0);
    assert_eq!(result.status, ReachabilityStatus::NotReachable);
}

#[test]
fn test_syntax_errors_are_skipped_not_fatal() {
    let dir = project(&[
        ("src/ok.ts", "import { merge } from 'lodash';\nmerge();\n"),
        ("src/broken.ts", "import { from 'lodash'"),
    ]);

    let result = analyze_one(dir.path(), Component::new("lodash", ""));
    assert_eq!(result.status, ReachabilityStatus::Reachable);
    assert!(result.has_warning(WarningCode::SkippedFiles));
}

#[test]
fn test_analysis_is_idempotent() {
    let dir = project(&[
        ("src/app.ts", "import * as _ from 'lodash';\nimport { a } from './barrel';\n_.merge();\na();\n"),
        ("src/barrel.ts", "export * from './inner';\n"),
        ("src/inner.ts", "export { a } from 'zod';\n"),
        ("src/dyn.js", "eval('1');\n"),
    ]);
    let components = vec![lodash_with_template_cve(), Component::new("zod", ""), Component::new("axios", "")];

    let first = analyze(dir.path(), &components);
    let second = analyze(dir.path(), &components);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_empty_project_is_unknown() {
    let dir = tempdir().unwrap();
    let result = analyze_one(dir.path(), Component::new("lodash", ""));
    assert_eq!(result.status, ReachabilityStatus::Unknown);
    assert_eq!(result.confidence, Confidence::Low);
}

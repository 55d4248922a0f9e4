//! Hygiene — coding standards enforced at test time.
//!
//! Walks the crate's production sources and counts antipatterns. The editor
//! must stay usable after any failure, so production code may not panic or
//! silently drop an error. Every budget is zero; a new hit means fixing the
//! code, not widening the budget.

use std::fs;
use std::path::{Path, PathBuf};

/// (needle, budget, what a hit means)
const BUDGETS: &[(&str, usize, &str)] = &[
    (".unwrap()", 0, "panics on Err/None"),
    (".expect(", 0, "panics on Err/None"),
    ("panic!(", 0, "crashes the editor"),
    ("unreachable!(", 0, "crashes the editor"),
    ("todo!(", 0, "unfinished stub"),
    ("unimplemented!(", 0, "unfinished stub"),
    ("let _ =", 0, "silently discards a Result"),
    (".ok()", 0, "silently discards an error"),
    ("#[allow(dead_code)]", 0, "hides unused code"),
];

/// Production `.rs` files under `src/`. Sibling `*_test.rs` modules are
/// allowed to panic and are excluded.
fn production_sources() -> Vec<(PathBuf, String)> {
    fn walk(dir: &Path, out: &mut Vec<(PathBuf, String)>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                walk(&path, out);
            } else if path.extension().is_some_and(|ext| ext == "rs")
                && !path.to_string_lossy().ends_with("_test.rs")
            {
                if let Ok(content) = fs::read_to_string(&path) {
                    out.push((path, content));
                }
            }
        }
    }

    let mut files = Vec::new();
    walk(Path::new("src"), &mut files);
    assert!(!files.is_empty(), "no production sources found under src/");
    files
}

#[test]
fn antipattern_budgets_hold() {
    let files = production_sources();
    let mut violations = String::new();

    for &(needle, budget, meaning) in BUDGETS {
        let mut hits = Vec::new();
        for (path, content) in &files {
            for (idx, line) in content.lines().enumerate() {
                if line.contains(needle) {
                    hits.push(format!("  {}:{}", path.display(), idx + 1));
                }
            }
        }
        if hits.len() > budget {
            violations.push_str(&format!(
                "`{needle}` ({meaning}): found {}, budget {budget}\n{}\n",
                hits.len(),
                hits.join("\n")
            ));
        }
    }

    assert!(violations.is_empty(), "antipattern budget exceeded:\n{violations}");
}

/// Painting is confined to the render/export/engine boundary. Document,
/// viewport, hit, and input modules must stay browser-free so they remain
/// natively testable.
#[test]
fn context2d_stays_at_the_paint_boundary() {
    let allowed = ["render.rs", "export.rs", "engine.rs"];
    let offenders: Vec<String> = production_sources()
        .iter()
        .filter(|(path, content)| {
            content.contains("CanvasRenderingContext2d")
                && !allowed.iter().any(|name| path.ends_with(name))
        })
        .map(|(path, _)| path.display().to_string())
        .collect();
    assert!(
        offenders.is_empty(),
        "CanvasRenderingContext2d referenced outside the paint boundary:\n{offenders:?}"
    );
}

use polybundle::core::error::BundleError;
use polybundle::core::rewriter::{lookup_expression, lua_string_literal, ReferenceRewriter};
use polybundle::core::Bundler;
use polybundle::parsers::RequireParser;
use std::fs;
use std::path::Path;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn every_require_becomes_a_table_lookup() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    let main = "local a = require(\"./lib/a\")\nlocal b = require ( 'lib/b.module.lua' )\nprint(a, b)\n";
    write(root, "main.lua", main);
    write(root, "lib/a.module.lua", "return 1\n");
    write(root, "lib/b.module.lua", "return 2\n");

    let graph = Bundler::new(root).unwrap().build_graph(&["main.lua"]).unwrap();
    let mut rewriter = ReferenceRewriter::new(&graph);
    let rewritten = rewriter.rewrite(&root.join("main.lua"), main).unwrap();

    assert_eq!(
        rewritten,
        "local a = __module_env[\"lib/a.module.lua\"]\nlocal b = __module_env[\"lib/b.module.lua\"]\nprint(a, b)\n"
    );
    assert!(!RequireParser::new().contains_require(&rewritten));
}

#[test]
fn text_without_requires_is_unchanged() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    let source = "-- nothing to see\nlocal required = 1\nprint(\"require\")\n";
    write(root, "main.lua", source);

    let graph = Bundler::new(root).unwrap().build_graph(&["main.lua"]).unwrap();
    let rewriter = ReferenceRewriter::new(&graph);
    assert_eq!(
        rewriter.rewrite_source(&root.join("main.lua"), source).unwrap(),
        source
    );
}

#[test]
fn rewrites_are_memoized_per_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(root, "a.module.lua", "return {}\n");
    write(root, "main.lua", "return require(\"./a\")\n");

    let graph = Bundler::new(root).unwrap().build_graph(&["main.lua"]).unwrap();
    let mut rewriter = ReferenceRewriter::new(&graph);
    let path = root.join("main.lua");

    let first = rewriter.rewrite(&path, "return require(\"./a\")\n").unwrap();
    // A second call with different text still returns the memoized result.
    let second = rewriter.rewrite(&path, "ignored").unwrap();
    assert_eq!(first, second);
    assert_eq!(rewriter.cached_count(), 1);
}

#[test]
fn unknown_targets_are_reported_as_missing_entries() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(root, "main.lua", "print('no deps')\n");
    write(root, "stray.module.lua", "return {}\n");

    let graph = Bundler::new(root).unwrap().build_graph(&["main.lua"]).unwrap();
    let rewriter = ReferenceRewriter::new(&graph);
    let err = rewriter
        .rewrite_source(&root.join("main.lua"), "require(\"./stray\")")
        .unwrap_err();

    assert!(matches!(err, BundleError::MissingModuleEntry { ref request } if request == "./stray"));
    assert_eq!(
        err.to_string(),
        "Missing module entry for require(\"./stray\")"
    );
}

#[test]
fn keys_are_escaped_as_lua_strings() {
    assert_eq!(lua_string_literal("a/b.module.lua"), "\"a/b.module.lua\"");
    assert_eq!(lua_string_literal("we\"ird\\"), "\"we\\\"ird\\\\\"");
    assert_eq!(
        lookup_expression("lib/x.module.lua"),
        "__module_env[\"lib/x.module.lua\"]"
    );
}

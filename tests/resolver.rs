use polybundle::core::error::BundleError;
use polybundle::core::resolver::{is_module_file, PathResolver};
use std::fs;
use std::path::Path;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn bare_request_prefers_module_extension() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(root, "foo.module.lua", "return {}\n");
    write(root, "foo.lua", "print('script')\n");

    let resolver = PathResolver::new(root);
    let resolved = resolver.resolve("foo", root).unwrap();
    assert_eq!(resolved, root.join("foo.module.lua"));
}

#[test]
fn bare_request_falls_back_to_plain_extension() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(root, "foo.lua", "return 1\n");

    let resolver = PathResolver::new(root);
    let resolved = resolver.resolve("foo", root).unwrap();
    assert_eq!(resolved, root.join("foo.lua"));
}

#[test]
fn missing_request_reports_original_text() {
    let dir = tempfile::TempDir::new().unwrap();
    let resolver = PathResolver::new(dir.path());

    let err = resolver.resolve("./nope", dir.path()).unwrap_err();
    assert!(matches!(&err, BundleError::UnresolvedModule { request } if request == "./nope"));
    assert_eq!(err.to_string(), "Module not found for require(\"./nope\")");
}

#[test]
fn explicit_plain_extension_never_falls_back_to_module() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(root, "b.module.lua", "return {}\n");

    let resolver = PathResolver::new(root);
    assert!(resolver.resolve("./b.lua", root).is_err());
}

#[test]
fn explicit_module_extension_never_falls_back_to_plain() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(root, "b.lua", "return {}\n");

    let resolver = PathResolver::new(root);
    assert!(resolver.resolve("./b.module.lua", root).is_err());
}

#[test]
fn relative_requests_use_requesting_directory() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(root, "src/util.module.lua", "return {}\n");
    write(root, "shared/log.module.lua", "return {}\n");

    let resolver = PathResolver::new(root);
    let from = root.join("src");
    assert_eq!(
        resolver.resolve("./util", &from).unwrap(),
        root.join("src/util.module.lua")
    );
    assert_eq!(
        resolver.resolve("../shared/log", &from).unwrap(),
        root.join("shared/log.module.lua")
    );
}

#[test]
fn bare_requests_resolve_against_root_from_any_directory() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(root, "lib/math.module.lua", "return {}\n");
    write(root, "src/deep/nested/main.lua", "");

    let resolver = PathResolver::new(root);
    let from = root.join("src/deep/nested");
    assert_eq!(
        resolver.resolve("lib/math", &from).unwrap(),
        root.join("lib/math.module.lua")
    );
}

#[test]
fn absolute_requests_are_used_as_is() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(root, "abs.module.lua", "return {}\n");

    let resolver = PathResolver::new(root.join("elsewhere"));
    let request = root.join("abs").to_string_lossy().into_owned();
    assert_eq!(
        resolver.resolve(&request, root).unwrap(),
        root.join("abs.module.lua")
    );
}

#[test]
fn module_files_are_recognized_by_double_extension() {
    assert!(is_module_file(Path::new("/p/lib/util.module.lua")));
    assert!(!is_module_file(Path::new("/p/lib/util.lua")));
    assert!(!is_module_file(Path::new("/p/module.lua")));
    assert!(!is_module_file(Path::new("/p/util.module.lua.bak")));
}

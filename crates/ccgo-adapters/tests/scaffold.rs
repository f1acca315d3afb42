//! Template directory -> Handlebars -> local disk.

use std::fs;
use std::path::Path;

use ccgo_adapters::{DirectoryTemplateLoader, HandlebarsRenderer, LocalFilesystem};
use ccgo_core::application::{ApplicationError, IdentityResolver, ScaffoldOptions, ScaffoldService};
use ccgo_core::domain::{DomainError, RenderContext};
use ccgo_core::error::CcgoError;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A small C++ library template exercising helpers, conditional paths and
/// verbatim files.
fn template_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "template.toml",
        r#"
[template]
name = "cpp-lib"

[variables]
project_name = "demo-kit"
tests_dir = "tests"
"#,
    );
    write(
        root,
        "CMakeLists.txt.hbs",
        "project({{slugify project_name separator=\"_\"}})\n",
    );
    write(
        root,
        "include/{{project_name}}/{{project_name}}.h.hbs",
        "#ifndef {{macro_safe (upper project_name)}}_H_\n",
    );
    write(root, "LICENSE.hbs", "Copyright {{git_user_name \"Anon\"}}\n");
    write(root, "{{tests_dir}}/test_main.cc", "int main() { return 0; }\n");
    write(root, "docs/raw.md", "{{not rendered}}\n");
    dir
}

fn service() -> ScaffoldService {
    ScaffoldService::new(
        Box::new(HandlebarsRenderer::new(IdentityResolver::default())),
        Box::new(LocalFilesystem::new()),
    )
}

#[test]
fn scaffolds_project_from_template_directory() {
    let template = DirectoryTemplateLoader::new(template_dir().path())
        .load()
        .unwrap();
    assert_eq!(template.name, "cpp-lib");

    let out = TempDir::new().unwrap();
    let dest = out.path().join("demo-kit");
    service()
        .scaffold(&template, RenderContext::new(), &dest, ScaffoldOptions::default())
        .unwrap();

    assert_eq!(
        fs::read_to_string(dest.join("CMakeLists.txt")).unwrap(),
        "project(demo_kit)\n"
    );
    assert_eq!(
        fs::read_to_string(dest.join("include/demo-kit/demo-kit.h")).unwrap(),
        "#ifndef DEMO_KIT_H_\n"
    );
    assert_eq!(
        fs::read_to_string(dest.join("LICENSE")).unwrap(),
        "Copyright Anon\n"
    );
    assert!(dest.join("tests/test_main.cc").is_file());
    assert_eq!(
        fs::read_to_string(dest.join("docs/raw.md")).unwrap(),
        "{{not rendered}}\n"
    );
    assert!(!dest.join("template.toml").exists());
}

#[test]
fn caller_variables_override_defaults() {
    let template = DirectoryTemplateLoader::new(template_dir().path())
        .load()
        .unwrap();
    let out = TempDir::new().unwrap();
    let dest = out.path().join("x");

    let context = RenderContext::new()
        .with_variable("project_name", "zeta")
        .with_variable("tests_dir", "");
    service()
        .scaffold(&template, context, &dest, ScaffoldOptions::default())
        .unwrap();

    assert!(dest.join("include/zeta/zeta.h").is_file());
    assert!(!dest.join("tests").exists());
    assert!(!dest.join("include/demo-kit").exists());
}

#[test]
fn existing_destination_is_refused_without_force() {
    let template = DirectoryTemplateLoader::new(template_dir().path())
        .load()
        .unwrap();
    let out = TempDir::new().unwrap();
    let dest = out.path().join("taken");
    write(&dest, "keep.txt", "mine");

    let err = service()
        .scaffold(&template, RenderContext::new(), &dest, ScaffoldOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        CcgoError::Application(ApplicationError::ProjectExists { .. })
    ));
    assert_eq!(fs::read_to_string(dest.join("keep.txt")).unwrap(), "mine");
}

#[test]
fn force_replaces_destination() {
    let template = DirectoryTemplateLoader::new(template_dir().path())
        .load()
        .unwrap();
    let out = TempDir::new().unwrap();
    let dest = out.path().join("taken");
    write(&dest, "stale.txt", "old");

    service()
        .scaffold(
            &template,
            RenderContext::new(),
            &dest,
            ScaffoldOptions { force: true },
        )
        .unwrap();
    assert!(!dest.join("stale.txt").exists());
    assert!(dest.join("CMakeLists.txt").is_file());
}

#[test]
fn broken_template_leaves_nothing_behind() {
    let dir = template_dir();
    write(dir.path(), "bad.txt.hbs", "{{#if project_name}}unterminated\n");
    let template = DirectoryTemplateLoader::new(dir.path()).load().unwrap();
    let out = TempDir::new().unwrap();
    let dest = out.path().join("never");

    let err = service()
        .scaffold(&template, RenderContext::new(), &dest, ScaffoldOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        CcgoError::Application(ApplicationError::RenderingFailed { .. })
    ));
    assert!(!dest.exists());
}

#[test]
fn missing_template_directory() {
    let out = TempDir::new().unwrap();
    let err = DirectoryTemplateLoader::new(out.path().join("nope"))
        .load()
        .unwrap_err();
    assert!(matches!(
        err,
        CcgoError::Application(ApplicationError::TemplateNotFound { .. })
    ));
}

#[test]
fn variables_cannot_write_outside_destination() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "{{name}}/evil.txt", "x\n");
    let template = DirectoryTemplateLoader::new(dir.path()).load().unwrap();
    let out = TempDir::new().unwrap();
    let dest = out.path().join("proj");

    let ctx = RenderContext::new().with_variable("name", "../escaped");
    let err = service()
        .scaffold(&template, ctx, &dest, ScaffoldOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        CcgoError::Domain(DomainError::PathEscapesRoot { .. })
    ));
    assert!(!out.path().join("escaped").exists());
    assert!(!dest.exists());

    let ctx = RenderContext::new().with_variable("name", "/tmp/abs");
    let err = service()
        .scaffold(&template, ctx, &dest, ScaffoldOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        CcgoError::Domain(DomainError::AbsolutePathNotAllowed { .. })
    ));
    assert!(!dest.exists());
}

//! On-disk routing trees loaded end to end.
//!
//! Each test writes a small tree of routing files into a temporary
//! directory and loads it through the filesystem locator and parser.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use waypoint_config::{ConfigError, LoaderOptions, RouteLoader};
use waypoint_routing::{DuplicatePolicy, PrefixMode, Requirement};

/// Writes `files` (relative path, content) under a fresh temp directory.
fn tree(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (path, content) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }
    dir
}

fn load(dir: &TempDir, resource: &str) -> Result<waypoint_routing::RouteCollection, ConfigError> {
    RouteLoader::from_options(LoaderOptions::new().with_search_path(dir.path())).load(resource)
}

fn canonical(dir: &TempDir, path: &str) -> PathBuf {
    dir.path().join(path).canonicalize().unwrap()
}

#[test]
fn test_single_file() {
    let dir = tree(&[(
        "routes.yaml",
        r#"
home:
  pattern: /
  defaults: { _controller: home.index }

user:
  pattern: users/{id}
  requirements:
    id: "^[0-9]+$"
    _method: GET|HEAD
  options:
    compiler_class: default
"#,
    )]);

    let routes = load(&dir, "routes.yaml").unwrap();
    assert_eq!(routes.names().collect::<Vec<_>>(), ["home", "user"]);

    let home = routes.get("home").unwrap();
    assert_eq!(home.pattern(), "/");
    assert_eq!(home.default("_controller").unwrap(), "home.index");

    let user = routes.get("user").unwrap();
    assert_eq!(user.pattern(), "/users/{id:[0-9]+}");
    assert_eq!(user.requirement("id"), Some(&Requirement::from("[0-9]+")));
    assert_eq!(user.methods(), ["GET", "HEAD"]);
    assert_eq!(user.schemes(), ["HTTP", "HTTPS"]);
    assert_eq!(user.option("compiler_class").unwrap(), "default");
}

#[test]
fn test_sequence_requirement_is_unanchored() {
    let dir = tree(&[(
        "routes.yaml",
        r#"
user:
  pattern: /users/{id}
  requirements:
    id: ["^[0-9]+$", "^me$"]
    _method: [GET, "HEAD"]
"#,
    )]);

    let routes = load(&dir, "routes.yaml").unwrap();
    let user = routes.get("user").unwrap();
    assert_eq!(user.pattern(), "/users/{id:[0-9]+|me}");
    assert_eq!(
        user.requirement("id").and_then(Requirement::as_list).unwrap(),
        ["[0-9]+", "me"]
    );
    assert_eq!(user.methods(), ["GET", "HEAD"]);
}

#[test]
fn test_nested_imports_with_prefixes() {
    let dir = tree(&[
        (
            "routes.yaml",
            r#"
home:
  pattern: /
api:
  resource: api/routes.yaml
  prefix: /api
"#,
        ),
        (
            "api/routes.yaml",
            r#"
v1:
  resource: v1/routes.json
  prefix: /v1
"#,
        ),
        (
            "api/v1/routes.json",
            r#"{ "users": { "pattern": "/users/{id}", "requirements": { "id": "\\d+" } } }"#,
        ),
    ]);

    let routes = load(&dir, "routes.yaml").unwrap();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes.get("users").unwrap().pattern(), "/api/v1/users/{id:\\d+}");
    assert_eq!(routes.prefix(), "");
    assert_eq!(
        routes.resources(),
        [
            canonical(&dir, "routes.yaml"),
            canonical(&dir, "api/routes.yaml"),
            canonical(&dir, "api/v1/routes.json"),
        ]
    );
}

#[test]
fn test_import_without_prefix() {
    let dir = tree(&[
        ("routes.yaml", "shared:\n  resource: shared.toml\n"),
        ("shared.toml", "[health]\npattern = \"/health\"\n"),
    ]);

    let routes = load(&dir, "routes.yaml").unwrap();
    assert_eq!(routes.get("health").unwrap().pattern(), "/health");
}

#[test]
fn test_parent_relative_import() {
    let dir = tree(&[
        ("app/routes.yaml", "common:\n  resource: ../common/routes.yaml\n  prefix: /c\n"),
        ("common/routes.yaml", "about:\n  pattern: /about\n"),
    ]);

    let routes = RouteLoader::new()
        .load(dir.path().join("app/routes.yaml").to_str().unwrap())
        .unwrap();
    assert_eq!(routes.get("about").unwrap().pattern(), "/c/about");
}

#[test]
fn test_type_hint_overrides_extension() {
    let dir = tree(&[
        ("routes.yaml", "legacy:\n  resource: legacy.routes\n  type: json\n"),
        ("legacy.routes", r#"{ "old": { "pattern": "/old" } }"#),
    ]);

    let routes = load(&dir, "routes.yaml").unwrap();
    assert!(routes.contains("old"));
}

#[test]
fn test_unknown_type_hint() {
    let dir = tree(&[
        ("routes.yaml", "legacy:\n  resource: legacy.xml\n  type: xml\n"),
        ("legacy.xml", ""),
    ]);

    let err = load(&dir, "routes.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "type"));
}

#[test]
fn test_circular_import_names_resolved_path() {
    let dir = tree(&[
        ("a.yaml", "to_b:\n  resource: b.yaml\n"),
        ("b.yaml", "to_a:\n  resource: a.yaml\n"),
    ]);

    let err = load(&dir, "a.yaml").unwrap_err();
    match err {
        ConfigError::CircularReference { path } => assert_eq!(path, canonical(&dir, "a.yaml")),
        other => panic!("expected circular reference, got {other:?}"),
    }
}

#[test]
fn test_cycle_through_differently_spelled_path() {
    let dir = tree(&[
        ("a/routes.yaml", "down:\n  resource: ../b/routes.yaml\n"),
        ("b/routes.yaml", "up:\n  resource: ./../a/routes.yaml\n"),
    ]);

    let err = RouteLoader::new()
        .load(dir.path().join("a/routes.yaml").to_str().unwrap())
        .unwrap_err();
    assert!(matches!(err, ConfigError::CircularReference { .. }));
}

#[test]
fn test_same_file_from_disjoint_entries() {
    let dir = tree(&[
        (
            "routes.yaml",
            r#"
public:
  resource: shared.yaml
  prefix: /public
admin:
  resource: admin.yaml
  prefix: /admin
"#,
        ),
        ("admin.yaml", "shared:\n  resource: shared.yaml\n  prefix: /shared\n"),
        ("shared.yaml", "ping:\n  pattern: /ping\n"),
    ]);

    let routes = load(&dir, "routes.yaml").unwrap();
    assert_eq!(routes.get("ping").unwrap().pattern(), "/admin/shared/ping");
}

#[test]
fn test_missing_pattern_names_route() {
    let dir = tree(&[("routes.yaml", "broken:\n  defaults: { a: 1 }\n")]);

    let err = load(&dir, "routes.yaml").unwrap_err();
    assert_eq!(err.to_string(), "you must define a pattern for the `broken` route");
}

#[test]
fn test_unknown_key_lists_vocabulary() {
    let dir = tree(&[("routes.yaml", "home:\n  pattern: /\n  method: GET\n")]);

    let err = load(&dir, "routes.yaml").unwrap_err();
    assert_eq!(
        err.to_string(),
        "routing loader does not support key `method` in route `home`; \
         expected one of (defaults, options, pattern, prefix, requirements, resource, type)"
    );
}

#[test]
fn test_missing_root_resource() {
    let dir = tree(&[]);
    let err = load(&dir, "routes.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::ResourceNotFound { .. }));
}

#[test]
fn test_missing_import_reports_importing_directory() {
    let dir = tree(&[("routes.yaml", "gone:\n  resource: gone.yaml\n")]);

    let err = load(&dir, "routes.yaml").unwrap_err();
    match err {
        ConfigError::ResourceNotFound { resource, from } => {
            assert_eq!(resource, "gone.yaml");
            assert_eq!(from.as_deref(), Some(canonical(&dir, "").as_path()));
        }
        other => panic!("expected resource not found, got {other:?}"),
    }
}

#[test]
fn test_malformed_import_aborts_load() {
    let dir = tree(&[
        ("routes.yaml", "home:\n  pattern: /\nbad:\n  resource: bad.yaml\n"),
        ("bad.yaml", "route: [unclosed\n"),
    ]);

    let err = load(&dir, "routes.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { ref path, .. } if path == &canonical(&dir, "bad.yaml")));
}

#[test]
fn test_empty_file_loads_no_routes() {
    let dir = tree(&[("routes.yaml", "")]);
    assert!(load(&dir, "routes.yaml").unwrap().is_empty());
}

#[test]
fn test_trailing_slash_prefix() {
    let files = [
        ("routes.yaml", "api:\n  resource: api.yaml\n  prefix: /api/\n"),
        ("api.yaml", "users:\n  pattern: /users\n"),
    ];
    let dir = tree(&files);

    let compatible = load(&dir, "routes.yaml").unwrap();
    assert_eq!(compatible.get("users").unwrap().pattern(), "/users");

    let options = LoaderOptions::new()
        .with_search_path(dir.path())
        .with_prefix_mode(PrefixMode::Normalize);
    let normalized = RouteLoader::from_options(options).load("routes.yaml").unwrap();
    assert_eq!(normalized.get("users").unwrap().pattern(), "/api/users");
}

#[test]
fn test_duplicate_names() {
    let dir = tree(&[
        (
            "routes.yaml",
            "index:\n  pattern: /\nblog:\n  resource: blog.yaml\n  prefix: /blog\n",
        ),
        ("blog.yaml", "index:\n  pattern: /\n"),
    ]);

    let lenient = load(&dir, "routes.yaml").unwrap();
    assert_eq!(lenient.get("index").unwrap().pattern(), "/blog/");

    let strict = RouteLoader::from_options(
        LoaderOptions::new()
            .with_search_path(dir.path())
            .with_duplicate_policy(DuplicatePolicy::Reject),
    );
    let err = strict.load("routes.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::Routing(_)));
}

#[test]
fn test_options_from_host_toml() {
    let dir = tree(&[("conf/routes.yaml", "home:\n  pattern: /\n")]);
    let search = dir.path().join("conf");
    let toml = format!(
        "search_paths = [{:?}]\nduplicate_policy = \"reject\"\n",
        search.display().to_string()
    );

    let options = LoaderOptions::from_toml_str(&toml).unwrap();
    assert_eq!(options.search_paths, [search]);

    let routes = RouteLoader::from_options(options).load("routes.yaml").unwrap();
    assert!(routes.contains("home"));
}

#[test]
fn test_loaded_routes_compile() {
    let dir = tree(&[(
        "routes.yaml",
        "post:\n  pattern: /posts/{slug}\n  requirements:\n    _scheme: HTTPS\n",
    )]);

    let compiled = load(&dir, "routes.yaml").unwrap().compile();
    assert_eq!(compiled.len(), 1);
    assert_eq!(compiled[0].name, "post");
    assert_eq!(compiled[0].pattern, "/posts/{slug}");
    assert_eq!(compiled[0].schemes, ["HTTPS"]);
    assert_eq!(compiled[0].methods, ["GET", "POST", "PUT", "DELETE"]);
}

#[test]
fn test_loader_is_shareable() {
    fn check<T: Send + Sync>() {}
    check::<RouteLoader>();
    check::<waypoint_routing::RouteCollection>();
}

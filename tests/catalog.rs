//! File-backed catalog update tests

mod helper;

use rstest::rstest;

use catalog_bump::action::{ConsoleFormat, ConsoleReporter, run};
use catalog_bump::catalog::{CatalogError, ErrorKind, FileCatalogUpdater, update_catalog_version};
use catalog_bump::parser::{Entry, VersionCatalogParser, VersionSpec};
use helper::{FIXTURE, TestCatalog, changed_lines};

const SHORT_NOTATION_CATALOG: &str = r#"[versions]
kotlin = "1.9.20"

[libraries]
shortLib = "com.example:library:1.0.0"
inlineLib = { module = "com.example:other", version = "2.0.0" }
refLib = { module = "com.example:ref", version.ref = "kotlin" }
"#;

#[test]
fn updates_version_ref_and_keeps_inline_tables() {
    let catalog = TestCatalog::fixture();

    let outcome = update_catalog_version(&catalog.ref_request("minecraft", Some("1.21.99"))).unwrap();

    assert_eq!(outcome.old_version, "1.21.11");
    assert_eq!(outcome.version.as_deref(), Some("1.21.99"));
    let content = catalog.read();
    assert_eq!(changed_lines(FIXTURE, &content), vec![r#"minecraft = "1.21.99""#]);
    assert!(content.contains(
        r#"minecraft = { module = "com.mojang:minecraft", version.ref = "minecraft" }"#
    ));
    assert!(!content.contains("[libraries.minecraft]"));
}

#[test]
fn updates_library_inline_version() {
    let catalog = TestCatalog::fixture();

    let outcome =
        update_catalog_version(&catalog.library_request("parchment", Some("2025.12.01"))).unwrap();

    assert_eq!(outcome.old_version, "2025.10.12");
    assert_eq!(
        changed_lines(FIXTURE, &catalog.read()),
        vec![
            r#"parchment = { module = "org.parchmentmc.data:parchment-1.21.10", version = "2025.12.01" }"#
        ]
    );
}

#[test]
fn updates_plugin_inline_version() {
    let catalog = TestCatalog::fixture();

    let outcome =
        update_catalog_version(&catalog.plugin_request("modDevGradle", Some("3.0.0"))).unwrap();

    assert_eq!(outcome.old_version, "2.0.107");
    assert_eq!(outcome.version.as_deref(), Some("3.0.0"));
    assert_eq!(
        changed_lines(FIXTURE, &catalog.read()),
        vec![r#"modDevGradle = { id = "net.neoforged.moddev", version = "3.0.0" }"#]
    );
}

#[test]
fn updating_shared_ref_preserves_other_entries() {
    let catalog = TestCatalog::fixture();

    update_catalog_version(&catalog.ref_request("balm", Some("22.0.0"))).unwrap();

    let content = catalog.read();
    assert_eq!(
        changed_lines(FIXTURE, &content),
        vec![r#"balm = "22.0.0" # bump together with balm-neoforge"#]
    );
    assert!(content.contains(
        r#"balmCommon = { module = "net.blay09.mods:balm-common", version.ref = "balm" }"#
    ));
    assert!(content.contains(r#"fabricLoom = { id = "fabric-loom", version = "1.13-SNAPSHOT" }"#));
    assert!(content.contains(r#"balm = ["balmCommon", "balmNeoForge"]"#));
}

#[rstest]
#[case::key("minecraft")]
#[case::module("com.mojang:minecraft")]
#[case::group("com.mojang")]
fn library_addressing_resolves_the_same_entry(#[case] library: &str) {
    let catalog = TestCatalog::fixture();

    let outcome = update_catalog_version(&catalog.library_request(library, Some("1.21.99"))).unwrap();

    assert_eq!(outcome.old_version, "1.21.11");
    assert_eq!(
        changed_lines(FIXTURE, &catalog.read()),
        vec![r#"minecraft = "1.21.99""#]
    );
}

#[test]
fn library_with_group_and_name_resolves_by_module() {
    let catalog = TestCatalog::fixture();

    let outcome =
        update_catalog_version(&catalog.library_request("net.blay09.mods:balm-neoforge", None))
            .unwrap();

    assert_eq!(outcome.old_version, "21.0.44");
}

#[test]
fn finds_plugin_by_id() {
    let catalog = TestCatalog::fixture();

    let outcome =
        update_catalog_version(&catalog.plugin_request("net.neoforged.moddev", Some("3.0.0")))
            .unwrap();

    assert_eq!(outcome.old_version, "2.0.107");
}

#[rstest]
#[case::by_ref(TestCatalog::ref_request, "minecraft", "1.21.11")]
#[case::by_library(TestCatalog::library_request, "parchment", "2025.10.12")]
#[case::by_plugin(TestCatalog::plugin_request, "fabricLoom", "1.13-SNAPSHOT")]
fn read_only_requests_leave_file_untouched(
    #[case] build: fn(&TestCatalog, &str, Option<&str>) -> catalog_bump::catalog::UpdateRequest,
    #[case] name: &str,
    #[case] expected: &str,
) {
    let catalog = TestCatalog::fixture();

    let outcome = update_catalog_version(&build(&catalog, name, None)).unwrap();

    assert_eq!(outcome.old_version, expected);
    assert_eq!(outcome.version, None);
    assert_eq!(catalog.read(), FIXTURE);
}

#[test]
fn updating_short_notation_library_keeps_same_named_version() {
    let catalog = TestCatalog::fixture();

    let outcome =
        update_catalog_version(&catalog.library_request("mixinExtras", Some("0.5.0"))).unwrap();

    assert_eq!(outcome.old_version, "0.4.1");
    let content = catalog.read();
    assert_eq!(
        changed_lines(FIXTURE, &content),
        vec![r#"mixinExtras = "io.github.llamalad7:mixinextras-common:0.5.0""#]
    );
    assert!(content.contains(r#"mixinExtras = "0.4.1""#));
}

#[rstest]
#[case::key("shortLib")]
#[case::module("com.example:library")]
fn updates_short_notation_library(#[case] library: &str) {
    let catalog = TestCatalog::with_content(SHORT_NOTATION_CATALOG);

    let outcome = update_catalog_version(&catalog.library_request(library, Some("1.5.0"))).unwrap();

    assert_eq!(outcome.old_version, "1.0.0");
    assert_eq!(outcome.version.as_deref(), Some("1.5.0"));
    let content = catalog.read();
    assert_eq!(
        changed_lines(SHORT_NOTATION_CATALOG, &content),
        vec![r#"shortLib = "com.example:library:1.5.0""#]
    );
    assert!(!content.contains("[libraries.shortLib]"));
}

#[test]
fn updated_catalog_decodes_with_new_version_only() {
    let catalog = TestCatalog::fixture();
    let parser = VersionCatalogParser::new();
    let before = parser.parse(FIXTURE).unwrap();

    update_catalog_version(&catalog.library_request("balmCommon", Some("22.0.0"))).unwrap();

    let after = parser.parse(&catalog.read()).unwrap();
    assert_eq!(after.versions.get("balm").map(String::as_str), Some("22.0.0"));
    assert_eq!(after.libraries, before.libraries);
    assert_eq!(after.plugins, before.plugins);
    assert_eq!(
        after.libraries.get("balmCommon"),
        Some(&Entry::Structured {
            module: Some("net.blay09.mods:balm-common".to_string()),
            id: None,
            version: Some(VersionSpec::Ref("balm".to_string())),
        })
    );
}

#[rstest]
#[case(
    TestCatalog::ref_request,
    "nonexistent",
    "ref 'nonexistent' not found in [versions] section"
)]
#[case(
    TestCatalog::library_request,
    "nonexistent",
    "library 'nonexistent' not found in [libraries] section"
)]
#[case(
    TestCatalog::plugin_request,
    "nonexistent",
    "plugin 'nonexistent' not found in [plugins] section"
)]
fn missing_entries_fail_without_writing(
    #[case] build: fn(&TestCatalog, &str, Option<&str>) -> catalog_bump::catalog::UpdateRequest,
    #[case] name: &str,
    #[case] expected: &str,
) {
    let catalog = TestCatalog::fixture();

    let error = update_catalog_version(&build(&catalog, name, Some("1.0.0"))).unwrap_err();

    assert_eq!(error.to_string(), expected);
    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert_eq!(catalog.read(), FIXTURE);
}

#[test]
fn missing_target_fails() {
    let catalog = TestCatalog::fixture();
    let mut request = catalog.ref_request("minecraft", Some("1.0.0"));
    request.ref_name = None;

    let error = update_catalog_version(&request).unwrap_err();

    assert_eq!(
        error.to_string(),
        "One of ref, library, or plugin must be provided"
    );
}

#[test]
fn unlocatable_version_literal_fails_without_writing() {
    // The literal-string version decodes but has no double-quoted form to rewrite
    let content = "[versions]\nkotlin = '1.9.20'\n";
    let catalog = TestCatalog::with_content(content);

    let error = update_catalog_version(&catalog.ref_request("kotlin", Some("2.0.0"))).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Inconsistent);
    assert_eq!(
        error.to_string(),
        "could not locate version reference for 'kotlin' in the catalog text"
    );
    assert_eq!(catalog.read(), content);
}

#[test]
fn duplicate_key_fails_as_parse_error() {
    let content = "[versions]\nkotlin = \"1.9.20\"\nkotlin = \"2.0.0\"\n";
    let catalog = TestCatalog::with_content(content);

    let error = update_catalog_version(&catalog.ref_request("kotlin", Some("2.1.0"))).unwrap_err();

    assert!(matches!(error, CatalogError::Parse(_)));
    assert_eq!(catalog.read(), content);
}

#[test]
fn run_reports_outputs_for_file_update() {
    let catalog = TestCatalog::fixture();
    let mut reporter = ConsoleReporter::with_writers(ConsoleFormat::Text, Vec::new(), Vec::new());

    let succeeded = run(
        &catalog.plugin_request("fabricLoom", Some("1.14-SNAPSHOT")),
        &FileCatalogUpdater,
        &mut reporter,
    );

    assert!(succeeded);
    let (out, err) = reporter.into_inner();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "updated=true\nversion=1.14-SNAPSHOT\n"
    );
    assert!(err.is_empty());
}

#[test]
fn run_reports_failure_for_missing_catalog() {
    let catalog = TestCatalog::fixture();
    let mut request = catalog.ref_request("minecraft", None);
    request.catalog = Some(catalog.path().join("missing.toml"));
    let mut reporter = ConsoleReporter::with_writers(ConsoleFormat::Text, Vec::new(), Vec::new());

    let succeeded = run(&request, &FileCatalogUpdater, &mut reporter);

    assert!(!succeeded);
    let (out, err) = reporter.into_inner();
    assert!(out.is_empty());
    assert!(String::from_utf8(err).unwrap().starts_with("Error: Failed to read catalog"));
}

#[test]
fn run_in_json_mode_writes_only_the_error_on_failure() {
    let catalog = TestCatalog::fixture();
    let mut request = catalog.ref_request("minecraft", Some("1.21.99"));
    request.catalog = Some(catalog.path().join("missing.toml"));
    let mut reporter = ConsoleReporter::with_writers(ConsoleFormat::Json, Vec::new(), Vec::new());

    let succeeded = run(&request, &FileCatalogUpdater, &mut reporter);

    assert!(!succeeded);
    let (out, err) = reporter.into_inner();
    assert!(out.is_empty());
    assert!(String::from_utf8(err).unwrap().starts_with("{\"error\":\"Failed to read catalog"));
}

#[test]
fn multiline_version_string_fails_without_writing() {
    let content = "[versions]\nkotlin = \"\"\"1.9.20\"\"\"\n";
    let catalog = TestCatalog::with_content(content);

    let error = update_catalog_version(&catalog.ref_request("kotlin", Some("2.0.0"))).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Inconsistent);
    assert_eq!(catalog.read(), content);
}

//! Architecture contract tests.

mod support;

use support::architecture::find_lines_containing;

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::application",
            "crate::app::",
            "rusqlite::",
            "diesel::",
            "rustyline::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn ports_depend_only_on_domain() {
    let hits = find_lines_containing(
        "src/port",
        &["crate::adapter", "crate::application", "diesel::", "rusqlite::"],
    );

    assert!(hits.is_empty(), "found outer-layer imports in ports: {hits:#?}");
}

#[test]
fn application_never_reaches_the_terminal() {
    let hits = find_lines_containing(
        "src/application",
        &["crate::adapter::inbound", "dialoguer::", "rustyline::", "println!"],
    );

    assert!(
        hits.is_empty(),
        "application layer should not talk to the terminal: {hits:#?}"
    );
}

#[test]
fn only_the_credential_adapter_uses_diesel() {
    let hits = find_lines_containing("src", &["use diesel"]);
    let outside: Vec<_> = hits
        .into_iter()
        .filter(|(path, _, _)| !path.starts_with("src/adapter/outbound/sqlite/"))
        .collect();

    assert!(outside.is_empty(), "diesel used outside the sqlite adapter: {outside:#?}");
}

//! Unit tests for template substitution and caching.

use super::*;
use rstest::rstest;
use tempfile::TempDir;

fn values() -> TemplateValues {
    TemplateValues::new()
        .with("tsm_server_name", "backup")
        .with("wildcards_are_literal", "no")
        .with("empty", "")
}

fn utf8_dir(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("temp dir should be UTF-8")
}

#[rstest]
#[case("plain text", "plain text")]
#[case("SErvername {tsm_server_name}", "SErvername backup")]
#[case("{tsm_server_name}{tsm_server_name}", "backupbackup")]
#[case("WILDCARDSARELITERAL {wildcards_are_literal}\n", "WILDCARDSARELITERAL no\n")]
#[case("line\n{empty}\nend", "line\n\nend")]
#[case("{{literal}}", "{literal}")]
#[case("{{{tsm_server_name}}}", "{backup}")]
#[case("ünïcode {tsm_server_name} ✓", "ünïcode backup ✓")]
fn substitutes_values(#[case] text: &str, #[case] expected: &str) {
    let rendered = render("dsm.opt.template", text, &values()).expect("render should succeed");
    assert_eq!(rendered, expected);
}

#[test]
fn unused_values_are_ignored() {
    let rendered = render("t", "no placeholders", &values().with("extra", "x"))
        .expect("render should succeed");
    assert_eq!(rendered, "no placeholders");
}

#[rstest]
#[case("{tsm_node_name}", "tsm_node_name")]
#[case("prefix {unknown} suffix", "unknown")]
#[case("{}", "")]
fn missing_value_names_placeholder(#[case] text: &str, #[case] placeholder: &str) {
    let err = render("dsm.sys.template", text, &values()).expect_err("render should fail");
    assert_eq!(
        err,
        ContractViolation::MissingPlaceholder {
            template: "dsm.sys.template".to_owned(),
            placeholder: placeholder.to_owned(),
        }
    );
}

#[rstest]
#[case("{tsm_server_name:>5}", "tsm_server_name", ":>5")]
#[case("{tsm_server_name!s}", "tsm_server_name", "!s")]
#[case("{unknown:x!y}", "unknown", ":x!y")]
#[case("{:>5}", "", ":>5")]
fn format_specs_are_rejected(#[case] text: &str, #[case] placeholder: &str, #[case] spec: &str) {
    let err = render("dsm.sys.template", text, &values()).expect_err("render should fail");
    assert_eq!(
        err,
        ContractViolation::UnsupportedFormatSpec {
            template: "dsm.sys.template".to_owned(),
            placeholder: placeholder.to_owned(),
            spec: spec.to_owned(),
        }
    );
    assert!(err.to_string().contains("format specs are not supported"));
}

#[rstest]
#[case("open { never closed", '{', 5)]
#[case("stray } brace", '}', 6)]
#[case("{nested{tsm_server_name}}", '{', 0)]
#[case("ends with {", '{', 10)]
fn unpaired_braces_are_malformed(#[case] text: &str, #[case] brace: char, #[case] offset: usize) {
    let err = render("t", text, &values()).expect_err("render should fail");
    assert_eq!(
        err,
        ContractViolation::MalformedTemplate {
            template: "t".to_owned(),
            brace,
            offset,
        }
    );
}

#[test]
fn values_iterate_in_sorted_order() {
    let names: Vec<_> = values().names().collect();
    assert_eq!(names, vec!["empty", "tsm_server_name", "wildcards_are_literal"]);
}

#[test]
fn cache_reads_each_template_once() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = utf8_dir(&dir).join("dsm.opt.template");
    std::fs::write(&path, "SErvername {tsm_server_name}\n").expect("write template");

    let mut cache = TemplateCache::new();
    let first = cache.render(&path, &values()).expect("first render");

    std::fs::write(&path, "changed on disk\n").expect("rewrite template");
    let second = cache.render(&path, &values()).expect("second render");

    assert_eq!(first, "SErvername backup\n");
    assert_eq!(second, first);
    assert_eq!(cache.len(), 1);
}

#[test]
fn cache_keys_by_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = utf8_dir(&dir);
    std::fs::write(root.join("a.template"), "a {tsm_server_name}").expect("write a");
    std::fs::write(root.join("b.template"), "b {tsm_server_name}").expect("write b");

    let mut cache = TemplateCache::new();
    assert!(cache.is_empty());
    let a = cache.render(&root.join("a.template"), &values()).expect("render a");
    let b = cache.render(&root.join("b.template"), &values()).expect("render b");

    assert_eq!(a, "a backup");
    assert_eq!(b, "b backup");
    assert_eq!(cache.len(), 2);
}

#[test]
fn missing_template_is_a_read_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = utf8_dir(&dir).join("absent.template");

    let mut cache = TemplateCache::new();
    let err = cache.render(&path, &values()).expect_err("render should fail");

    match err {
        ProvisionError::TemplateRead { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected TemplateRead, got {other:?}"),
    }
    assert!(cache.is_empty());
}

#[test]
fn cache_errors_are_labelled_with_file_name() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = utf8_dir(&dir).join("dsm.sys.template");
    std::fs::write(&path, "NODename {tsm_node_name}").expect("write template");

    let mut cache = TemplateCache::new();
    let err = cache.render(&path, &values()).expect_err("render should fail");

    assert!(matches!(
        err,
        ProvisionError::Contract(ContractViolation::MissingPlaceholder { ref template, .. })
            if template == "dsm.sys.template"
    ));
}

use crate::devkit;
use composer_devkit::test_utils::TestWorkspaceBuilder;
use predicates::prelude::*;

const WP_STUB: &str = r#"<?php
namespace {
    define('WPINC', 'wp-includes');
    const ABSPATH = '/var/www/';
    class WP_Post {}
    interface WP_Widget_Interface {}
    function wp_insert_post($postarr) {}
    function readonly() {}
}
"#;

const WC_STUB: &str = r#"<?php
namespace Automattic\WooCommerce {
    class Container {}
    trait Hooks {}
    function wc10() {}
    function wc2() {}
}
"#;

#[test]
fn test_scoper_config_writes_sorted_exclusions() {
    let ws = TestWorkspaceBuilder::new()
        .unwrap()
        .with_project_file("stubs/wp.php", WP_STUB)
        .with_project_file("stubs/wc.php", WC_STUB)
        .build()
        .unwrap();

    devkit(&ws)
        .args([
            "scoper-config",
            "--stub",
            "stubs/wp.php",
            "--stub",
            "stubs/wc.php",
            "--output",
            "out/.scoper.php",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 constants, 4 classes, 4 functions"));

    let php = ws.read_project_file("out/.scoper.php").unwrap();
    assert!(php.starts_with("<?php\n"));
    assert!(php.contains("namespace Clever_Canyon\\Scoper\\Config_File;"));
    assert!(php.contains(
        "  'exclude-constants' => \n  array (\n    0 => 'ABSPATH',\n    1 => 'WPINC',\n  ),"
    ));
    assert!(php.contains(
        "  'exclude-classes' => \n  array (\n    0 => 'Automattic\\\\WooCommerce\\\\Container',\n    1 => 'Automattic\\\\WooCommerce\\\\Hooks',\n    2 => 'WP_Post',\n    3 => 'WP_Widget_Interface',\n  ),"
    ));
    assert!(php.contains(
        "  'exclude-functions' => \n  array (\n    0 => 'Automattic\\\\WooCommerce\\\\wc2',\n    1 => 'Automattic\\\\WooCommerce\\\\wc10',\n    2 => 'readonly',\n    3 => 'wp_insert_post',\n  ),"
    ));
}

#[test]
fn test_scoper_config_missing_stub_fails() {
    let ws = TestWorkspaceBuilder::new().unwrap().build().unwrap();

    devkit(&ws)
        .args(["scoper-config", "--stub", "missing.php", "--output", "out.php"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error:"));

    assert!(!ws.project_path("out.php").exists());
}

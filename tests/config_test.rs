//! Integration tests for Settings config loading
//!
//! These tests run without a global config (temp directories only), so they
//! exercise local files layered over compiled defaults.

use std::fs;

use tempfile::TempDir;

use gridtree::config::{RawSettings, Settings};
use gridtree::Traversal;

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gridtree.toml");
    fs::write(&path, "order = \"depth-left\"\n").unwrap();

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.order, Traversal::DepthFirstLeft);
    assert!(!settings.show_coordinates);
}

#[test]
fn given_missing_local_config_when_load_then_fails() {
    let dir = TempDir::new().unwrap();
    let result = Settings::load(Some(&dir.path().join("absent.toml")));
    assert!(result.is_err());
}

#[test]
fn given_unknown_order_in_local_config_when_load_then_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gridtree.toml");
    fs::write(&path, "order = \"zigzag\"\n").unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("parse"), "{err}");
}

#[test]
fn given_settings_when_serialized_then_round_trips_through_raw() {
    let settings = Settings {
        order: Traversal::BreadthFirstRight,
        show_coordinates: true,
    };
    let raw: RawSettings = toml::from_str(&settings.to_toml().unwrap()).unwrap();
    assert_eq!(raw.order, Some(Traversal::BreadthFirstRight));
    assert_eq!(raw.show_coordinates, Some(true));
}

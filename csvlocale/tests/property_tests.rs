use csvlocale::{OutputMode, RunOptions, TableBuilder, build_tree, formats::Sheet, run};
use csvlocale::traits::Parser;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn segment_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,6}").expect("valid segment regex")
}

fn key_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(segment_strategy(), 1..4).prop_map(|segments| segments.join("."))
}

fn value_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 _\\-\\.,!\\?]{1,30}").expect("valid value regex")
}

/// Drops every key that is a dotted prefix of another key.
fn without_prefix_collisions(values: BTreeMap<String, String>) -> BTreeMap<String, String> {
    let keys: Vec<String> = values.keys().cloned().collect();
    values
        .into_iter()
        .filter(|(key, _)| {
            let prefix = format!("{}.", key);
            !keys.iter().any(|other| other.starts_with(&prefix))
        })
        .collect()
}

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn write_dataset(root: &Path, values: &BTreeMap<String, (String, String)>) {
    let mut content = String::from("key,en,fr\n");
    for (key, (en, fr)) in values {
        content.push_str(&format!("{},{},{}\n", csv_field(key), csv_field(en), csv_field(fr)));
    }
    fs::write(root.join("messages.csv"), content).unwrap();
}

fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            (
                entry.file_name().to_string_lossy().to_string(),
                fs::read(entry.path()).unwrap(),
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn nested_tree_flattens_back_to_the_table(
        values in prop::collection::btree_map(key_strategy(), value_strategy(), 1..12)
    ) {
        let values = without_prefix_collisions(values);
        let (tree, diagnostics) =
            build_tree(values.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        prop_assert!(diagnostics.is_empty());
        prop_assert_eq!(tree.flatten(), values);
    }

    #[test]
    fn registry_covers_every_language(
        rows in prop::collection::btree_map(
            key_strategy(),
            (proptest::option::of(value_strategy()), proptest::option::of(value_strategy())),
            1..10,
        )
    ) {
        let mut content = String::from("key,en,fr\n");
        for (key, (en, fr)) in &rows {
            content.push_str(&format!(
                "{},{},{}\n",
                csv_field(key),
                en.as_deref().map(csv_field).unwrap_or_default(),
                fr.as_deref().map(csv_field).unwrap_or_default(),
            ));
        }
        let sheet = Sheet::from_str(&content).unwrap();
        let mut builder = TableBuilder::new();
        builder.add_sheet("messages.csv", "messages", &sheet);
        let (table, _) = builder.finish();

        prop_assert_eq!(table.keys.len(), rows.len());
        for entries in table.translations.values() {
            for key in entries.keys() {
                prop_assert!(table.keys.contains(key));
            }
        }
        let with_en: BTreeSet<String> = rows
            .iter()
            .filter(|(_, (en, _))| en.is_some())
            .map(|(key, _)| format!("messages.{}", key))
            .collect();
        let en_keys: BTreeSet<String> = table
            .language("en")
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        prop_assert_eq!(en_keys, with_en);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn rerunning_produces_identical_files(
        values in prop::collection::btree_map(
            key_strategy(),
            (value_strategy(), value_strategy()),
            1..8,
        ),
        nested in any::<bool>(),
    ) {
        let input = TempDir::new().unwrap();
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write_dataset(input.path(), &values);

        let mode = if nested { OutputMode::Nested } else { OutputMode::Flat };
        run(&RunOptions::new(input.path(), first.path()).with_mode(mode)).unwrap();
        run(&RunOptions::new(input.path(), second.path()).with_mode(mode)).unwrap();
        let before = snapshot(first.path());
        prop_assert!(!before.is_empty());
        prop_assert_eq!(&before, &snapshot(second.path()));

        run(&RunOptions::new(input.path(), first.path()).with_mode(mode)).unwrap();
        prop_assert_eq!(before, snapshot(first.path()));
    }
}

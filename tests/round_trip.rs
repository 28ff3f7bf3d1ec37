use locale_sync::core::{
    build, build_from_grids, flatten, key_path, LocaleFiles, MemorySheets, SyncRunner,
    TranslationNode,
};
use locale_sync::models::{LocaleLayout, Row, RowTable, SheetGrid};
use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;

fn table(category: &str, languages: &[&str], rows: &[&[&str]]) -> RowTable {
    let mut table = RowTable::new(category, languages.iter().map(|l| l.to_string()).collect());
    for cells in rows {
        let mut row = Row::new(cells[0]);
        for (language, value) in languages.iter().zip(&cells[1..]) {
            row = row.with(*language, *value);
        }
        table.rows.push(row);
    }
    table
}

fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

#[test]
fn concrete_scenario_builds_and_flattens_back() {
    let common = table(
        "common",
        &["en", "vi"],
        &[
            &["greeting.hello", "Hello", "Xin chào"],
            &["greeting.bye", "Bye", "Tạm biệt"],
        ],
    );

    let (store, diagnostics) = build(&[common.clone()]);
    assert!(diagnostics.is_empty());
    assert_eq!(
        store.get("en", "common").unwrap().to_json(),
        json!({ "greeting": { "hello": "Hello", "bye": "Bye" } })
    );
    assert_eq!(
        store.get("vi", "common").unwrap().to_json(),
        json!({ "greeting": { "hello": "Xin chào", "bye": "Tạm biệt" } })
    );

    let (tables, diagnostics) = flatten(&store);
    assert!(diagnostics.is_empty());
    assert_eq!(tables, vec![common]);
}

#[rstest]
#[case::flat(&[&["title", "Title", "Tiêu đề"][..], &["subtitle", "", "Phụ đề"][..]][..])]
#[case::deep(&[&["a.b.c", "1", "2"][..], &["a.b.d", "3", "4"][..], &["a.e", "5", "6"][..], &["f", "7", "8"][..]][..])]
#[case::interleaved(&[&["x.one", "1", "1"][..], &["y", "2", "2"][..], &["x.two", "3", "3"][..]][..])]
fn well_formed_tables_round_trip(#[case] rows: &[&[&str]]) {
    let original = table("pages", &["en", "vi"], rows);

    let (store, _) = build(&[original.clone()]);
    let (tables, diagnostics) = flatten(&store);

    assert!(diagnostics.is_empty());
    let keys: Vec<&str> = tables[0].rows.iter().map(|r| r.key.as_str()).collect();
    let mut expected_keys: Vec<&str> = original.rows.iter().map(|r| r.key.as_str()).collect();
    // 交错的键按树的前序遍历重新分组
    let mut sorted_keys = keys.clone();
    sorted_keys.sort();
    expected_keys.sort();
    assert_eq!(sorted_keys, expected_keys);

    for row in &original.rows {
        let flattened = tables[0].rows.iter().find(|r| r.key == row.key).unwrap();
        assert_eq!(flattened.values, row.values);
    }
}

#[test]
fn empty_cells_are_preserved_as_empty_leaves() {
    let (store, _) = build(&[table("common", &["en", "vi"], &[&["only.en", "Hi", ""]])]);

    let vi = store.get("vi", "common").unwrap();
    assert_eq!(vi.leaf(&["only", "en"]), Some(&json!("")));
}

#[test]
fn languages_merged_from_two_sources_are_unioned() {
    let (mut store, _) = build(&[table("common", &["en", "vi"], &[&["hello", "Hello", "Xin chào"]])]);
    store.put(
        "de",
        "common",
        TranslationNode::from_json(json!({ "bye": "Tschüss" })),
    );

    let (tables, _) = flatten(&store);

    assert_eq!(tables[0].headers(), vec!["key", "de", "en", "vi"]);
    assert_eq!(
        tables[0].to_grid(),
        vec![
            vec!["bye", "Tschüss", "", ""],
            vec!["hello", "", "Hello", "Xin chào"],
        ]
    );
}

#[test]
fn duplicate_keys_keep_the_later_row() {
    let (store, diagnostics) = build(&[table(
        "common",
        &["en"],
        &[&["a.b", "first"], &["a.b", "second"]],
    )]);

    let tree = store.get("en", "common").unwrap();
    assert_eq!(tree.leaf_count(), 1);
    assert_eq!(tree.leaf(&["a", "b"]), Some(&json!("second")));
    assert_eq!(diagnostics.count_kind("key_collision"), 1);
}

#[test]
fn category_names_survive_verbatim() {
    let grids = vec![
        SheetGrid::new("Error Messages", grid(&[&["KEY", "en"], &["x", "1"]])),
        SheetGrid::new("error messages", grid(&[&["key", "en"], &["y", "2"]])),
    ];

    let (_, store, _) = build_from_grids(&grids).unwrap();
    let (tables, _) = flatten(&store);

    let categories: Vec<&str> = tables.iter().map(|t| t.category.as_str()).collect();
    assert_eq!(categories, vec!["Error Messages", "error messages"]);
}

#[rstest]
#[case("")]
#[case(".")]
#[case(".a")]
#[case("a.")]
#[case("a..b")]
fn malformed_keys_are_rejected(#[case] key: &str) {
    assert!(key_path::split(key).is_err());
}

#[rstest]
#[case("a")]
#[case("greeting.hello")]
#[case("Menu.File.Save As")]
fn key_paths_round_trip(#[case] key: &str) {
    assert_eq!(key_path::join(&key_path::split(key).unwrap()), key);
}

#[rstest]
#[case::per_category(LocaleLayout::PerCategory)]
#[case::flat(LocaleLayout::Flat)]
#[tokio::test]
async fn sheets_survive_a_trip_through_locale_files(#[case] layout: LocaleLayout) {
    let temp_dir = TempDir::new().unwrap();
    let source = MemorySheets::new()
        .with_sheet(
            "common",
            grid(&[
                &["key", "en", "vi"],
                &["greeting.hello", "Hello", "Xin chào"],
                &["greeting.bye", "Bye", ""],
            ]),
        )
        .with_sheet(
            "errors",
            grid(&[&["key", "de", "en"], &["http.404", "Nicht gefunden", "Not found"]]),
        );
    let files = LocaleFiles::new(temp_dir.path().join("locales"), layout);

    SyncRunner::new(&source, &files).pull().await.unwrap();
    let target = MemorySheets::new();
    let report = SyncRunner::new(&target, &files).push().await.unwrap();

    assert!(report.warnings.is_empty());
    assert_eq!(target.names(), vec!["common", "errors"]);
    assert_eq!(target.sheet("common"), source.sheet("common"));
    assert_eq!(target.sheet("errors"), source.sheet("errors"));
}

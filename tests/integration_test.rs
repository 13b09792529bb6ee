use contribviz::analysis::{generate_document, write_document, AuthorSelection, DataStore};
use contribviz::app::{App, ControlEvent, LoadStatus};
use contribviz::config::ViewerConfig;
use contribviz::plotting::{ChartSpec, ChartStyle};
use git2::{Repository, Signature, Time};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SCENARIO: &str = r#"[
    {"author": "Ann",
     "contributions": {"js": {"added": 10, "removed": 2}, "py": {"added": 5, "removed": 1}},
     "commits": [{"hash": "a1", "date": "2024-01-01", "message": "init"}]},
    {"author": "Bob", "contributions": {"js": {"added": 3, "removed": 0}}, "commits": []}
]"#;

fn test_config(document: &Path) -> ViewerConfig {
    ViewerConfig {
        chart_style: ChartStyle {
            width: 240,
            height: 180,
            show_labels: false,
            ..Default::default()
        },
        ..ViewerConfig::with_document(document)
    }
}

fn write_scenario(temp_dir: &TempDir) -> std::path::PathBuf {
    let path = temp_dir.path().join("contributions.json");
    fs::write(&path, SCENARIO).unwrap();
    path
}

fn pie(app: &App) -> Vec<(String, u64)> {
    match app.chart.spec() {
        Some(ChartSpec::Proportion { sectors, .. }) => sectors
            .iter()
            .map(|sector| (sector.label.clone(), sector.value))
            .collect(),
        other => panic!("expected a proportion chart, got {:?}", other),
    }
}

fn bars(app: &App) -> Vec<(String, u64, u64)> {
    match app.chart.spec() {
        Some(ChartSpec::GroupedBar {
            categories, series, ..
        }) => categories
            .iter()
            .enumerate()
            .map(|(i, category)| (category.clone(), series[0].values[i], series[1].values[i]))
            .collect(),
        other => panic!("expected a grouped bar chart, got {:?}", other),
    }
}

fn commit_hashes(app: &App) -> Vec<String> {
    app.chart
        .commit_panel()
        .commits()
        .iter()
        .map(|commit| commit.hash.clone())
        .collect()
}

fn uncheck(file_type: &str) -> ControlEvent {
    ControlEvent::FileTypeChanged {
        file_type: file_type.to_string(),
        checked: false,
    }
}

#[tokio::test]
async fn test_full_workflow() {
    let temp_dir = TempDir::new().unwrap();
    let document = write_scenario(&temp_dir);

    let mut app = App::new(test_config(&document));
    assert_eq!(app.status, LoadStatus::Loading);
    app.on_loaded(DataStore::load(&document).await);

    // Initial render: all authors, every file type checked
    assert_eq!(app.status, LoadStatus::Ready);
    assert_eq!(app.controls.author_options(), &["Ann", "Bob"]);
    assert_eq!(
        app.controls.checkboxes(&app.filter).collect::<Vec<_>>(),
        vec![("js", true), ("py", true)]
    );
    assert_eq!(pie(&app), vec![("Ann".to_string(), 15), ("Bob".to_string(), 3)]);
    assert!(app.update_needed);
    assert!(app.chart.commit_panel().is_empty());

    app.handle(uncheck("py"));
    assert_eq!(pie(&app), vec![("Ann".to_string(), 10), ("Bob".to_string(), 3)]);

    app.handle(ControlEvent::SelectAllFileTypes);
    app.handle(ControlEvent::AuthorChanged(Some("Ann".to_string())));
    assert_eq!(
        bars(&app),
        vec![("js".to_string(), 10, 2), ("py".to_string(), 5, 1)]
    );
    assert_eq!(commit_hashes(&app), vec!["a1".to_string()]);

    app.handle(ControlEvent::AuthorChanged(Some("Bob".to_string())));
    assert_eq!(bars(&app), vec![("js".to_string(), 3, 0)]);
    assert!(commit_hashes(&app).is_empty());
    assert_eq!(app.chart.live_charts(), 1);
}

#[tokio::test]
async fn test_empty_selection_depends_on_mode() {
    let temp_dir = TempDir::new().unwrap();
    let document = write_scenario(&temp_dir);

    let mut app = App::new(test_config(&document));
    app.on_loaded(DataStore::load(&document).await);

    app.handle(ControlEvent::ClearFileTypes);
    assert_eq!(pie(&app), vec![("Ann".to_string(), 0), ("Bob".to_string(), 0)]);

    // With an author selected, no checked types means no filter at all
    app.handle(ControlEvent::AuthorChanged(Some("Ann".to_string())));
    assert_eq!(app.filter.author(), &AuthorSelection::Author("Ann".to_string()));
    assert_eq!(
        bars(&app),
        vec![("js".to_string(), 10, 2), ("py".to_string(), 5, 1)]
    );
}

#[tokio::test]
async fn test_checkbox_change_keeps_author() {
    let temp_dir = TempDir::new().unwrap();
    let document = write_scenario(&temp_dir);

    let mut app = App::new(test_config(&document));
    app.on_loaded(DataStore::load(&document).await);

    app.handle(ControlEvent::AuthorChanged(Some("Ann".to_string())));
    app.handle(uncheck("js"));
    assert_eq!(bars(&app), vec![("py".to_string(), 5, 1)]);
    assert_eq!(commit_hashes(&app), vec!["a1".to_string()]);
}

#[tokio::test]
async fn test_commit_list_keeps_document_order() {
    let temp_dir = TempDir::new().unwrap();
    let document = temp_dir.path().join("contributions.json");
    fs::write(
        &document,
        r#"[{"author": "Ann", "contributions": {"rs": {"added": 4, "removed": 1}}, "commits": [
            {"hash": "c2", "date": "2024-02-10", "message": "middle"},
            {"hash": "c3", "date": "2024-03-05", "message": "newest"},
            {"hash": "c1", "date": "2024-01-01", "message": "oldest"}
        ]}]"#,
    )
    .unwrap();

    let mut app = App::new(test_config(&document));
    app.on_loaded(DataStore::load(&document).await);
    app.handle(ControlEvent::AuthorChanged(Some("Ann".to_string())));

    assert_eq!(
        commit_hashes(&app),
        vec!["c2".to_string(), "c3".to_string(), "c1".to_string()]
    );
    let messages: Vec<_> = app
        .chart
        .commit_panel()
        .commits()
        .iter()
        .map(|commit| (commit.date.as_str(), commit.message.as_str()))
        .collect();
    assert_eq!(
        messages,
        vec![
            ("2024-02-10", "middle"),
            ("2024-03-05", "newest"),
            ("2024-01-01", "oldest")
        ]
    );
}

#[tokio::test]
async fn test_failed_load_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let document = temp_dir.path().join("missing.json");

    let mut app = App::new(test_config(&document));
    app.on_loaded(DataStore::load(&document).await);

    assert!(matches!(app.status, LoadStatus::Failed(_)));
    assert!(app.chart.active().is_none());
    assert!(app.controls.author_options().is_empty());

    // Controls are inert until data arrives
    app.handle(ControlEvent::AuthorChanged(Some("Ann".to_string())));
    assert_eq!(app.filter.author(), &AuthorSelection::All);
    assert!(app.export_chart(temp_dir.path().join("chart.png")).is_err());
}

#[tokio::test]
async fn test_malformed_document_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let document = temp_dir.path().join("contributions.json");
    fs::write(&document, "{\"author\": \"Ann\"}").unwrap();

    let mut app = App::new(test_config(&document));
    app.on_loaded(DataStore::load(&document).await);
    assert!(matches!(app.status, LoadStatus::Failed(_)));
}

#[tokio::test]
async fn test_export_chart() {
    let temp_dir = TempDir::new().unwrap();
    let document = write_scenario(&temp_dir);

    let mut app = App::new(test_config(&document));
    app.on_loaded(DataStore::load(&document).await);

    let path = app.export_chart(temp_dir.path().join("chart.png")).unwrap();
    let image = image::open(&path).unwrap();
    assert_eq!((image.width(), image.height()), (240, 180));
}

fn commit_file(
    repo: &Repository,
    root: &Path,
    author: &str,
    seconds: i64,
    file_name: &str,
    content: &str,
) {
    let file_path = root.join(file_name);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file_path, content).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(file_name)).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let signature = Signature::new(
        author,
        &format!("{}@example.com", author.to_lowercase()),
        &Time::new(seconds, 0),
    )
    .unwrap();
    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<_> = parent.iter().collect();
    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        &format!("Add {}", file_name),
        &tree,
        &parents,
    )
    .unwrap();
}

#[tokio::test]
async fn test_generated_document_drives_viewer() {
    let repo_dir = TempDir::new().unwrap();
    let repo = Repository::init(repo_dir.path()).unwrap();
    commit_file(&repo, repo_dir.path(), "Zoe", 1_709_294_400, "src/main.rs", "fn main() {}\n");
    commit_file(&repo, repo_dir.path(), "Ann", 1_709_298_000, "README.md", "# demo\n\nnotes\n");
    commit_file(&repo, repo_dir.path(), "Zoe", 1_709_301_600, "src/lib.rs", "pub fn a() {}\npub fn b() {}\n");

    let records = generate_document(repo_dir.path()).await.unwrap();
    let out_dir = TempDir::new().unwrap();
    let document = out_dir.path().join("contributions.json");
    write_document(&records, &document).await.unwrap();

    let mut app = App::new(test_config(&document));
    app.on_loaded(DataStore::load(&document).await);

    assert_eq!(app.status, LoadStatus::Ready);
    assert_eq!(app.controls.author_options(), &["Ann", "Zoe"]);
    assert_eq!(pie(&app), vec![("Ann".to_string(), 3), ("Zoe".to_string(), 3)]);

    app.handle(ControlEvent::AuthorChanged(Some("Zoe".to_string())));
    assert_eq!(bars(&app), vec![("rs".to_string(), 3, 0)]);
    assert_eq!(app.chart.commit_panel().commits().len(), 2);
    assert_eq!(app.chart.commit_panel().commits()[0].message, "Add src/lib.rs");
}

use std::collections::HashSet;

use scroll_aura::content::Catalog;
use scroll_aura::content::Category;
use scroll_aura::content::LinkKind;
use scroll_aura::content::Links;
use scroll_aura::Error;

#[test]
fn embedded_catalog_loads() {
    let catalog = Catalog::embedded().unwrap();

    assert!(!catalog.projects().is_empty());
    assert!(catalog.project("ttstats").is_some());
    assert!(catalog.project("galaxus").is_some());
    assert!(catalog.project("nope").is_none());
    assert!(!catalog.experience().is_empty());
    assert!(!catalog.education().is_empty());
}

#[test]
fn embedded_project_ids_are_unique() {
    let catalog = Catalog::embedded().unwrap();
    let ids: HashSet<_> = catalog.projects().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids.len(), catalog.projects().len());
}

#[test]
fn every_category_is_used() {
    let catalog = Catalog::embedded().unwrap();
    for category in Category::ALL {
        assert!(catalog.by_category(category).count() > 0, "{}", category);
    }
    assert!(catalog
        .by_category(Category::Music)
        .all(|p| p.category == Category::Music));
}

#[test]
fn duplicate_ids_are_rejected() {
    let projects = r#"[
        { "id": "x", "title": "A", "category": "music", "image": "a.webp", "description": "" },
        { "id": "x", "title": "B", "category": "webapp", "image": "b.webp", "description": "" }
    ]"#;

    match Catalog::from_json(projects, "{}") {
        Err(Error::DuplicateProjectId(id)) => assert_eq!(id, "x"),
        other => panic!("expected a duplicate id error, got {:?}", other),
    }
}

#[test]
fn unknown_category_is_rejected() {
    let projects = r#"[
        { "id": "x", "title": "A", "category": "games", "image": "a.webp", "description": "" }
    ]"#;

    assert!(matches!(
        Catalog::from_json(projects, "{}"),
        Err(Error::Content(_))
    ));
}

#[test]
fn optional_fields_default_to_empty() {
    let projects = r#"[
        { "id": "x", "title": "A", "category": "fullstack", "image": "a.webp", "description": "d" }
    ]"#;
    let catalog = Catalog::from_json(projects, "{}").unwrap();
    let project = catalog.project("x").unwrap();

    assert!(project.links.is_empty());
    assert!(project.badges.is_empty());
    assert!(project.tags.is_empty());
    assert!(catalog.experience().is_empty());
}

#[test]
fn links_skip_missing_entries() {
    let links = Links {
        source: Some("https://example.com/src".to_owned()),
        play_store: Some("https://example.com/play".to_owned()),
        ..Links::default()
    };

    let present: Vec<_> = links.iter().collect();
    assert_eq!(
        present,
        vec![
            (LinkKind::Source, "https://example.com/src"),
            (LinkKind::PlayStore, "https://example.com/play"),
        ]
    );
}

#[test]
fn timeline_reads_the_type_field() {
    let catalog = Catalog::embedded().unwrap();
    let first = &catalog.experience()[0];

    assert_eq!(first.kind.as_deref(), Some("Full-time"));
    assert!(!first.bullets.is_empty());
}

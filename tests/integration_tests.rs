//! Integration tests for the grid engine

use anyhow::Result;
use lazygrid::dom::Document;
use lazygrid::render::Renderer;
use lazygrid::{
    new_grid, GridConfig, IntersectionEntry, Item, LazyLoader, ObserverOptions, Viewport,
};

fn entry(target: lazygrid::dom::ElementId, intersecting: bool) -> IntersectionEntry {
    IntersectionEntry {
        target,
        is_intersecting: intersecting,
        intersection_ratio: if intersecting { 1.0 } else { 0.0 },
    }
}

#[test]
fn scenario_render_produces_inert_nodes() -> Result<()> {
    let mut doc = Document::new();
    let items = vec![Item::new(1, "a.png"), Item::new(2, "b.png")];
    let root = doc.root();
    let ids = Renderer::new("image").render(&mut doc, root, &items)?;

    assert_eq!(ids.len(), 2);
    assert_eq!(doc.attr(ids[0], "data-src"), Some("a.png"));
    assert_eq!(doc.attr(ids[1], "data-src"), Some("b.png"));
    assert_eq!(doc.attr(ids[0], "src"), None);
    assert_eq!(doc.attr(ids[1], "src"), None);
    Ok(())
}

#[test]
fn scenario_partial_batch_activates_only_intersecting() -> Result<()> {
    let mut doc = Document::new();
    let items = vec![Item::new(1, "a.png"), Item::new(2, "b.png")];
    let root = doc.root();
    let ids = Renderer::new("image").render(&mut doc, root, &items)?;

    let mut loader = LazyLoader::new(&ObserverOptions::default())?;
    assert_eq!(loader.attach(&doc, ".image")?, 2);

    let n = loader.deliver(&mut doc, &[entry(ids[0], true), entry(ids[1], false)])?;
    assert_eq!(n, 1);
    assert_eq!(doc.attr(ids[0], "src"), Some("a.png"));
    assert!(!loader.observer().is_observing(ids[0]));
    assert_eq!(doc.attr(ids[1], "src"), None);
    assert!(loader.observer().is_observing(ids[1]));
    Ok(())
}

#[test]
fn scenario_redelivery_never_reactivates() -> Result<()> {
    let mut doc = Document::new();
    let items = vec![Item::new(1, "a.png"), Item::new(2, "b.png")];
    let root = doc.root();
    let ids = Renderer::new("image").render(&mut doc, root, &items)?;

    let mut loader = LazyLoader::new(&ObserverOptions::default())?;
    loader.attach(&doc, ".image")?;
    loader.deliver(&mut doc, &[entry(ids[0], true), entry(ids[1], false)])?;

    // Later batch: node 2 intersects
    let n = loader.deliver(&mut doc, &[entry(ids[1], true)])?;
    assert_eq!(n, 1);
    assert_eq!(doc.attr(ids[1], "src"), Some("b.png"));

    // The host erroneously redelivers node 1. Its deferred source changed
    // in the meantime, so a second activation would be observable.
    doc.set_attr(ids[0], "data-src", "changed.png")?;
    let n = loader.deliver(&mut doc, &[entry(ids[0], true)])?;
    assert_eq!(n, 0);
    assert_eq!(doc.attr(ids[0], "src"), Some("a.png"));
    Ok(())
}

#[test]
fn scenario_empty_selector_match_stays_idle() -> Result<()> {
    let doc = Document::new();
    let mut loader = LazyLoader::new(&ObserverOptions::default())?;
    assert_eq!(loader.attach(&doc, ".image")?, 0);
    assert!(loader.observer().observed().is_empty());
    Ok(())
}

#[test]
fn never_intersecting_elements_never_activate() -> Result<()> {
    let mut doc = Document::new();
    let items = vec![Item::new(1, "a.png")];
    let root = doc.root();
    let ids = Renderer::new("image").render(&mut doc, root, &items)?;

    let mut loader = LazyLoader::new(&ObserverOptions::default())?;
    loader.attach(&doc, ".image")?;
    for _ in 0..10 {
        loader.deliver(&mut doc, &[entry(ids[0], false)])?;
    }
    assert_eq!(doc.attr(ids[0], "src"), None);
    assert!(loader.observer().is_observing(ids[0]));
    Ok(())
}

#[test]
fn scroll_through_activates_everything_exactly_once() -> Result<()> {
    let config = GridConfig {
        viewport: Viewport {
            width: 450,
            height: 360,
        },
        ..Default::default()
    };
    let mut grid = new_grid(config)?;

    let items: Vec<Item> = (0..24).map(|i| Item::new(i, format!("{}.png", i))).collect();
    grid.mount(&items)?;

    let mut total = 0;
    let mut offset = 0.0;
    loop {
        total += grid.pump()?;
        if offset > grid.content_height() as f64 {
            break;
        }
        offset += 360.0;
        grid.scroll_to(offset);
    }

    assert_eq!(total, 24);
    assert_eq!(grid.pending(), 0);

    // Every node carries its own source, copied exactly once
    for id in grid.document().query_selector_all(".image")? {
        let deferred = grid.document().attr(id, "data-src").unwrap();
        assert_eq!(grid.document().attr(id, "src"), Some(deferred));
    }

    // Scrolling back up re-reports intersections; nothing re-fires
    grid.scroll_to(0.0);
    assert_eq!(grid.pump()?, 0);

    grid.teardown();
    assert_eq!(grid.pending(), 0);
    Ok(())
}

#[test]
fn items_load_from_json_data() -> Result<()> {
    let json = r#"[
        {"id": 1, "src": "images/1.jpg"},
        {"id": 2, "src": "images/2.jpg"},
        {"id": 3, "src": "images/3.jpg"}
    ]"#;
    let items = lazygrid::items_from_json(json)?;

    let config = GridConfig {
        base_url: Some("https://cdn.example/".to_string()),
        ..Default::default()
    };
    let mut grid = new_grid(config)?;
    grid.mount(&items)?;

    let nodes = grid.document().query_selector_all(".image")?;
    assert_eq!(nodes.len(), 3);
    assert_eq!(
        grid.document().attr(nodes[0], "data-src"),
        Some("https://cdn.example/images/1.jpg")
    );
    Ok(())
}

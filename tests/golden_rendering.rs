use std::fs;
use std::path::PathBuf;

use lazygrid::{new_grid, GridConfig};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

fn mounted_grid() -> lazygrid::ImageGrid {
    let items = lazygrid::items_from_json(
        &fs::read_to_string("tests/goldens/items.json").expect("read items fixture"),
    )
    .expect("decode items fixture");
    let mut grid = new_grid(GridConfig::default()).expect("create grid");
    grid.mount(&items).expect("mount items");
    grid
}

#[test]
fn golden_markup_matches_fixture() {
    let grid = mounted_grid();
    let html = grid.html();

    let expected_path = golden_path("grid.html");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &html).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    if !expected_path.exists() {
        println!(
            "No golden at {:?}; run with UPDATE_GOLDENS=1 to create it. Skipping.",
            expected_path
        );
        return;
    }

    let expected = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(html, expected.trim_end());
}

#[test]
fn digest_is_content_addressed() {
    let a = mounted_grid();
    let b = mounted_grid();
    assert_eq!(a.digest(), b.digest());

    // Activation changes the markup, so it must change the digest
    let mut c = mounted_grid();
    c.pump().expect("pump");
    assert_ne!(a.digest(), c.digest());
}

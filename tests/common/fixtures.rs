use std::path::{Path, PathBuf};

use anchor_preview::WritingMode;

pub const HORIZONTAL_PAGE: &str = "tests/fixtures/horizontal-tb.xhtml";
pub const VERTICAL_RL_PAGE: &str = "tests/fixtures/vertical-rl.xhtml";
pub const VERTICAL_LR_PAGE: &str = "tests/fixtures/vertical-lr.xhtml";

pub const PAGES: &[(&str, WritingMode)] = &[
    (HORIZONTAL_PAGE, WritingMode::HorizontalTb),
    (VERTICAL_RL_PAGE, WritingMode::VerticalRl),
    (VERTICAL_LR_PAGE, WritingMode::VerticalLr),
];

fn fixture_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

pub fn read_page(relative: &str) -> Vec<u8> {
    let path = fixture_path(relative);
    std::fs::read(&path).unwrap_or_else(|e| panic!("read {}: {}", path.display(), e))
}

/// Extra pages dropped into `tests/fixtures/pages`, if any.
pub fn discover_optional_pages() -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(fixture_path("tests/fixtures/pages")) else {
        return Vec::new();
    };
    let mut out: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("xhtml"))
        })
        .collect();
    out.sort();
    out
}

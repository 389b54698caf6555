mod common;

use anchor_preview::PreviewOptions;
use anchor_preview_web::{DocumentHost, HostEvent};
use common::budget_alloc::BudgetAlloc;
use common::fixtures::{read_page, PAGES};

// Warm hover/exit cycles only move existing nodes between parents and
// rewrite two style strings in place. Allow a little slack for the test
// harness's own bookkeeping.
const STEADY_STATE_SLACK_BYTES: usize = 1024;
const HOVER_CYCLES: usize = 200;

#[global_allocator]
static ALLOC: BudgetAlloc = BudgetAlloc::new();

#[test]
fn warm_hover_cycles_do_not_grow_the_heap() {
    for (path, _) in PAGES {
        let xhtml = read_page(path);
        let mut host = DocumentHost::build(&xhtml, PreviewOptions::default(), |_| {})
            .unwrap_or_else(|e| panic!("build {}: {}", path, e));
        let links: Vec<_> = host.link_elements().collect();

        // First hover evaluates and clones every target.
        for link in &links {
            host.dispatch(*link, HostEvent::HoverEnter);
            host.dispatch(*link, HostEvent::HoverExit);
        }

        ALLOC.reset_window();
        let before = ALLOC.stats();
        for _ in 0..HOVER_CYCLES {
            for link in &links {
                host.dispatch(*link, HostEvent::HoverEnter);
                host.dispatch(*link, HostEvent::HoverExit);
            }
        }
        let after = ALLOC.stats();

        assert!(
            after.live_bytes <= before.live_bytes + STEADY_STATE_SLACK_BYTES,
            "hover cycles grew the heap for {}: {} -> {} bytes",
            path,
            before.live_bytes,
            after.live_bytes
        );
        println!(
            "hover fixture={} links={} live_kib={:.1} window_peak_kib={:.1} allocs={}",
            path,
            links.len(),
            after.live_bytes as f64 / 1024.0,
            after.peak_bytes as f64 / 1024.0,
            after.allocs
        );
    }
}

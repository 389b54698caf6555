use anchor_preview::{HoverOutcome, PreviewSide};
use anchor_preview_web::{load_options, DocumentHost, EventEffect, HostEvent};

fn page(link_start: &str, link_before: &str) -> String {
    format!(
        r##"<html>
<body data-max-measure="800" data-max-extent="600">
  <p data-measure="800" data-extent="40" data-before="100">
    <a href="#n1" data-measure="50" data-extent="20" data-start="{link_start}" data-before="{link_before}">1</a>
  </p>
  <aside id="n1" data-measure="180" data-extent="90" data-before="400">Note</aside>
</body>
</html>"##
    )
}

fn hover(host: &mut DocumentHost) -> EventEffect {
    let link = host.find_link("#n1").expect("link");
    host.dispatch(link, HostEvent::HoverEnter)
}

#[test]
fn link_near_i32_max_is_clamped_to_left_edge() {
    let options = load_options(r#"{"spacing_px": 10}"#).expect("options");
    let mut host = DocumentHost::build(page("2147483600", "100").as_bytes(), options, |_| {})
        .expect("host");

    let EventEffect::Hover(HoverOutcome::Shown(placement)) = hover(&mut host) else {
        panic!("preview not shown");
    };
    assert_eq!(placement.pos.left, 0);
    assert!(placement.edge_clamped);
    assert_eq!(placement.side, PreviewSide::Below);
}

#[test]
fn huge_spacing_from_options_saturates() {
    let options = load_options(r#"{"spacing_px": 2000000000}"#).expect("options");
    let mut host = DocumentHost::build(page("100", "560").as_bytes(), options, |_| {}).expect("host");

    let EventEffect::Hover(HoverOutcome::Shown(placement)) = hover(&mut host) else {
        panic!("preview not shown");
    };
    // preview height 2_000_000_090 overflows both ways, more so below
    assert_eq!(placement.side, PreviewSide::Above);
    assert_eq!(placement.pos.top, i32::MIN + 1);

    let json = host.snapshot_json().expect("json");
    assert!(json.contains("\"above\""));
}

//! End-to-end conversion tests.

use rmink::layout::layout_text_block;
use rmink::render::{self, render_stroke, PenProfile, RenderedStroke};
use rmink::reverse::normalize_text;
use rmink::scene::{
    DecodedItem, DecodedLayer, DecodedLine, DecodedNotebook, DecodedPage, DecodedPoint, DecodedRun,
    DecodedText,
};
use rmink::{
    Color, Document, Error, Layer, LayoutOptions, OutputFormat, Page, PenKind, Point,
    RenderOptions, ReverseBuilder, SceneBuilder, Stroke, TextBlock, TextStyle,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn ballpoint() -> Stroke {
    Stroke::new(PenKind::Ballpoint, Color::BLACK, 2.0).with_points(vec![
        Point::new(0.0, 0.0, 0.5),
        Point::new(10.0, 0.0, 1.0),
        Point::new(10.0, 10.0, 0.5),
    ])
}

fn hello_world_block() -> TextBlock {
    let mut block = TextBlock::new(100.0, 300.0, 800.0);
    block.add_text("Hello", TextStyle::plain());
    block.add_line_break();
    block.add_text("World", TextStyle::plain());
    block
}

fn hello_world_document() -> Document {
    let mut layer = Layer::new("Layer 1");
    layer.add_stroke(ballpoint());
    layer.add_text_block(hello_world_block());
    let mut page = Page::remarkable(1);
    page.add_layer(layer);
    let mut doc = Document::new();
    doc.add_page(page);
    doc
}

/// The `y` attribute of the `<text>` element containing `word`.
fn text_y(svg: &str, word: &str) -> f32 {
    let line = svg
        .lines()
        .find(|l| l.trim_start().starts_with("<text") && l.contains(&format!(">{}<", word)))
        .unwrap_or_else(|| panic!("no text line for {}", word));
    let start = line.find(" y=\"").unwrap() + 4;
    let end = start + line[start..].find('"').unwrap();
    line[start..end].parse().unwrap()
}

/// The `d` attributes of all paths.
fn path_data(svg: &str) -> Vec<String> {
    svg.lines()
        .filter_map(|l| {
            let start = l.find("<path d=\"")? + 9;
            let end = start + l[start..].find('"')?;
            Some(l[start..end].to_string())
        })
        .collect()
}

#[test]
fn test_hello_world_end_to_end() {
    init_logging();
    let doc = hello_world_document();
    let options = RenderOptions::default();

    let svg = render::render(&doc, OutputFormat::Svg, &options).unwrap();
    let svg = svg.text().unwrap();
    let paths = path_data(svg);
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0], "M0,0 L10,0 L10,10");
    assert_eq!(svg.matches("<text ").count(), 2);
    assert!(text_y(svg, "Hello") < text_y(svg, "World"));

    let text = render::render(&doc, OutputFormat::Text, &options).unwrap();
    assert_eq!(text.text(), Some("Hello\nWorld"));
}

#[test]
fn test_every_format_is_deterministic() {
    let doc = hello_world_document();
    let options = RenderOptions::default();
    for format in OutputFormat::ALL {
        let first = render::render(&doc, format, &options).unwrap();
        let second = render::render(&doc, format, &options).unwrap();
        assert_eq!(first.outputs.len(), second.outputs.len());
        for (a, b) in first.outputs.iter().zip(&second.outputs) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.bytes, b.bytes, "{} output differs", format);
        }
    }
}

#[test]
fn test_rendering_does_not_mutate_document() {
    let doc = hello_world_document();
    let before = doc.clone();
    for format in OutputFormat::ALL {
        render::render(&doc, format, &RenderOptions::default()).unwrap();
    }
    assert_eq!(doc, before);
}

#[test]
fn test_k_breaks_give_k_plus_one_lines() {
    let options = LayoutOptions::default();
    for k in 0..6 {
        let mut block = TextBlock::new(0.0, 0.0, 1000.0);
        for i in 0..=k {
            block.add_text(format!("line {}", i), TextStyle::plain());
            if i < k {
                block.add_line_break();
            }
        }
        let layout = layout_text_block(&block, &options);
        assert_eq!(layout.len(), k + 1);
        for (i, line) in layout.lines.iter().enumerate() {
            assert_eq!(line.text(), format!("line {}", i));
            assert!(!line.soft_wrapped);
        }
        for pair in layout.lines.windows(2) {
            assert!(pair[0].y < pair[1].y);
        }
    }
}

#[test]
fn test_stroke_vertices_keep_input_order() {
    let points: Vec<Point> = (0..25)
        .map(|i| Point::new((i * 7 % 13) as f32, i as f32, 0.5))
        .collect();
    let stroke = Stroke::new(PenKind::Fineliner, Color::BLACK, 2.0).with_points(points.clone());
    match render_stroke(&stroke, &PenProfile::for_pen(PenKind::Fineliner)) {
        RenderedStroke::Path(path) => {
            assert_eq!(path.segments.len(), points.len() - 1);
            let expected: Vec<(f32, f32)> = points.iter().map(|p| (p.x, p.y)).collect();
            assert_eq!(path.vertices(), expected);
        }
        other => panic!("expected a path, got {:?}", other),
    }
}

#[test]
fn test_degenerate_strokes_build_and_render() {
    init_logging();
    let empty = DecodedLine::new(15, 0, 2.0);
    let single = DecodedLine::new(15, 0, 2.0).with_points(vec![DecodedPoint::new(0.0, 50.0, 255.0)]);
    let layer = DecodedLayer::new("Layer 1")
        .with_item(DecodedItem::Line(empty))
        .with_item(DecodedItem::Line(single));
    let notebook = DecodedNotebook::new(vec![DecodedPage::new().with_layer(layer)]);

    let doc = SceneBuilder::new().build(&notebook).unwrap();
    assert_eq!(doc.element_counts().strokes, 2);

    let svg = render::render(&doc, OutputFormat::Svg, &RenderOptions::default()).unwrap();
    let svg = svg.text().unwrap();
    assert_eq!(svg.matches("<circle ").count(), 1);
    assert_eq!(svg.matches("<path ").count(), 0);

    let pdf = render::render(&doc, OutputFormat::Pdf, &RenderOptions::default()).unwrap();
    assert!(pdf.is_clean());
}

#[test]
fn test_inkml_outputs_share_counts() {
    let mut doc = hello_world_document();
    doc.pages[0].layers[0].add_stroke(ballpoint());
    let result = render::render(&doc, OutputFormat::InkMl, &RenderOptions::default()).unwrap();

    let ink = result.output("document.inkml").unwrap();
    let text = result.output("document.txt").unwrap();
    let ink_manifest = ink.manifest.as_ref().unwrap();
    assert_eq!(Some(ink_manifest), text.manifest.as_ref());
    assert_eq!(ink_manifest.counts.strokes, 2);
    assert_eq!(ink_manifest.counts.text_blocks, 1);
    assert_eq!(ink.as_str().unwrap().matches("<inkml:trace ").count(), 2);
    assert_eq!(text.as_str(), Some("Hello\nWorld"));
}

#[test]
fn test_text_blocks_do_not_move_strokes() {
    let mut plain = Layer::new("Layer 1");
    plain.add_stroke(ballpoint());

    let mut mixed = Layer::new("Layer 1");
    let mut tall = TextBlock::new(0.0, 0.0, 200.0);
    for i in 0..8 {
        tall.add_text(format!("row {} with some wrapping text", i), TextStyle::plain());
        tall.add_line_break();
    }
    mixed.add_text_block(tall);
    mixed.add_stroke(ballpoint());
    mixed.add_text_block(hello_world_block());
    mixed.add_stroke(ballpoint());

    let render_paths = |layer: Layer| {
        let mut page = Page::remarkable(1);
        page.add_layer(layer);
        let mut doc = Document::new();
        doc.add_page(page);
        let result = render::render(&doc, OutputFormat::Svg, &RenderOptions::default()).unwrap();
        path_data(result.text().unwrap())
    };

    let reference = render_paths(plain);
    let paths = render_paths(mixed);
    assert_eq!(paths.len(), 2);
    assert!(paths.iter().all(|d| *d == reference[0]));
}

#[test]
fn test_builder_rejects_bad_style_index() {
    let text = DecodedText::new(0.0, 0.0, 500.0).with_run(DecodedRun::new("x").with_style(4));
    let page = DecodedPage::new()
        .with_layer(DecodedLayer::new("Layer 1").with_item(DecodedItem::Text(text)));
    let result = SceneBuilder::new().build(&DecodedNotebook::new(vec![page]));
    assert!(matches!(result, Err(Error::MalformedInput(_))));
}

#[test]
fn test_unknown_pen_is_kept_and_reported() {
    init_logging();
    let line = DecodedLine::new(99, 0, 2.0).with_points(vec![
        DecodedPoint::new(0.0, 0.0, 100.0),
        DecodedPoint::new(5.0, 5.0, 100.0),
    ]);
    let page = DecodedPage::new()
        .with_layer(DecodedLayer::new("Layer 1").with_item(DecodedItem::Line(line)));
    let doc = SceneBuilder::new()
        .build(&DecodedNotebook::new(vec![page]))
        .unwrap();
    assert_eq!(doc.element_counts().unknown, 1);

    let result = render::render(&doc, OutputFormat::Svg, &RenderOptions::default()).unwrap();
    assert!(!result.is_clean());
    assert!(result.diagnostics.has(rmink::DiagnosticKind::UnsupportedPenType));
}

#[test]
fn test_reverse_builder_is_left_inverse_of_plain_text() {
    let samples = [
        "Hello\nWorld",
        "one\n\ntwo\nthree\n\n\n\nfour",
        "  leading spaces stay\r\ntrailing spaces go   \r\n",
        "\u{d55c}\u{ad6d}\u{c5b4} \u{d14d}\u{c2a4}\u{d2b8}\n\ncaf\u{e9}",
        "",
    ];
    for sample in samples {
        let output = ReverseBuilder::new().build(sample).unwrap();
        assert!(output.diagnostics.is_empty());
        let extracted = render::plain_text(&output.document, &RenderOptions::default()).unwrap();
        assert_eq!(extracted, normalize_text(sample), "sample {:?}", sample);
    }
}

#[test]
fn test_reverse_document_round_trips_through_scene_export() {
    let doc = ReverseBuilder::new().build("alpha\nbeta\n\ngamma").unwrap().document;
    let notebook = DecodedNotebook::from_document(&doc);
    assert!(notebook.pages[0].root_text.is_some());

    let json = notebook.to_json().unwrap();
    let back = SceneBuilder::new()
        .build(&DecodedNotebook::from_json(&json).unwrap())
        .unwrap();
    let text = render::plain_text(&back, &RenderOptions::default()).unwrap();
    assert!(text.starts_with("alpha\nbeta"));
}

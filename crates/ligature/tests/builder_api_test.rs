//! Integration tests for the SceneBuilder API

use ligature::{LigatureError, SceneBuilder, config::AppConfig, identifier::Id};

const SOURCE: &str = r#"
    [[shapes]]
    id = "api-a"
    left = 0
    top = 0
    width = 100
    height = 60

    [[shapes]]
    id = "api-b"
    left = 400
    top = 0
    width = 100
    height = 60

    [[shapes]]
    id = "api-wall"
    left = 200
    top = -100
    width = 40
    height = 260

    [[connectors]]
    id = "api-line"
    from = "api-a"
    from_port = "right"
    to = "api-b"
    to_port = "left"
    routing = "orthogonal"
    avoid_obstacles = true

    [[moves]]
    shape = "api-b"
    dy = 200
"#;

#[test]
fn test_render_simple_scene() {
    let builder = SceneBuilder::new(AppConfig::default());
    let document = builder.parse(SOURCE).unwrap();
    let scene = builder.build(&document, false).unwrap();

    let svg = builder.render_svg(&scene).unwrap();
    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert_eq!(svg.matches("<rect").count(), 3);
}

#[test]
fn test_moves_keep_connector_attached() {
    let builder = SceneBuilder::default();
    let document = builder.parse(SOURCE).unwrap();
    let scene = builder.build(&document, true).unwrap();

    let connector = scene.connector(Id::new("api-line")).unwrap();
    let path = connector.path();
    assert_eq!(path.start().map(|p| (p.x(), p.y())), Some((100.0, 30.0)));
    assert_eq!(path.end().map(|p| (p.x(), p.y())), Some((400.0, 230.0)));

    // Every segment is axis aligned.
    let vertices = path.vertices();
    for segment in vertices.windows(2) {
        assert!(segment[0].x() == segment[1].x() || segment[0].y() == segment[1].y());
    }
}

#[test]
fn test_parse_invalid_document_returns_error() {
    let result = SceneBuilder::default().parse("shapes = 3");
    assert!(matches!(result, Err(LigatureError::Document(_))));
}

#[test]
fn test_write_svg_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("api.svg");
    let builder = SceneBuilder::default();
    let scene = builder.build(&builder.parse(SOURCE).unwrap(), true).unwrap();

    builder.write_svg(&scene, &path).unwrap();
    assert!(std::fs::read_to_string(&path).unwrap().contains("api-line"));
}

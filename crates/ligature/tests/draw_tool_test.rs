//! End-to-end draw tool sessions against a populated scene.

use ligature::{
    config::DrawToolConfig,
    connector::{ConnectorOptions, create_connector},
    geometry::{Point, Transform},
    identifier::Id,
    marker::MarkerKind,
    port::{PortPosition, port_at},
    scene::{Cursor, Scene, SceneObject, Shape},
    sync::{find_connected_lines, update_connected_lines},
    tool::{DrawToolError, OrthogonalDrawTool, ToolNotice},
};

fn populated_scene() -> Scene {
    let mut scene = Scene::new();
    scene
        .add(SceneObject::Shape(Shape::new(Id::new("e2e-a"), 0.0, 0.0, 80.0, 40.0)))
        .unwrap();
    scene
        .add(SceneObject::Shape(Shape::new(Id::new("e2e-b"), 200.0, 0.0, 80.0, 40.0)))
        .unwrap();
    scene
}

#[test]
fn test_draw_session_adds_exactly_one_object() {
    let mut scene = populated_scene();
    let before = scene.len();
    let mut tool = OrthogonalDrawTool::new(DrawToolConfig::default());

    tool.start(&mut scene);
    tool.add_point(&mut scene, 0.0, 0.0);
    tool.add_point(&mut scene, 50.0, 0.0);
    tool.add_point(&mut scene, 50.0, 50.0);
    let id = tool.finish(&mut scene).unwrap();

    assert_eq!(scene.len(), before + 1);
    let connector = scene.connector(id).unwrap();
    assert!(connector.markers().len() <= 2);
    assert!(!connector.subtarget_selectable());
    assert_eq!(scene.cursor(), Cursor::Default);
}

#[test]
fn test_cancel_right_after_start() {
    let mut scene = populated_scene();
    let before = scene.len();
    let mut tool = OrthogonalDrawTool::new(DrawToolConfig::default());

    tool.start(&mut scene);
    assert!(tool.cancel(&mut scene));
    assert_eq!(scene.len(), before);
    assert!(scene.selection_enabled());
}

#[test]
fn test_failed_finish_keeps_drawing() {
    let mut scene = populated_scene();
    let mut tool = OrthogonalDrawTool::new(DrawToolConfig::default());

    tool.start(&mut scene);
    assert_eq!(tool.finish(&mut scene), Err(DrawToolError::NotEnoughPoints));
    assert!(tool.state().is_drawing);
    assert!(
        tool.take_notices()
            .iter()
            .any(|notice| matches!(notice, ToolNotice::Warning(_)))
    );

    tool.add_point(&mut scene, 10.0, 100.0);
    tool.add_point(&mut scene, 90.0, 160.0);
    assert!(tool.finish(&mut scene).is_ok());
}

#[test]
fn test_drawn_lines_are_not_synced() {
    let mut scene = populated_scene();
    let mut config = DrawToolConfig::default();
    config.set_markers(MarkerKind::Diamond, MarkerKind::Arrow);
    let mut tool = OrthogonalDrawTool::new(config);
    tool.start(&mut scene);
    tool.add_point(&mut scene, 80.0, 20.0);
    tool.add_point(&mut scene, 200.0, 20.0);
    let drawn = tool.finish(&mut scene).unwrap();

    let port = port_at(scene.shape(Id::new("e2e-a")).unwrap(), PortPosition::Bottom);
    let bound = create_connector(
        &mut scene,
        ConnectorOptions::new(Point::new(40.0, 40.0), Point::new(240.0, 40.0))
            .with_id(Id::new("e2e-bound"))
            .with_source(Id::new("e2e-a"), &port),
    )
    .unwrap();

    assert_eq!(find_connected_lines(&scene, Id::new("e2e-a")), vec![bound]);
    scene
        .shape_mut(Id::new("e2e-a"))
        .unwrap()
        .translate(Point::new(0.0, 30.0));
    assert_eq!(update_connected_lines(&mut scene, Id::new("e2e-a")), 1);

    // Moving the drawn group carries both markers along.
    assert!(scene.set_transform(
        drawn,
        Transform::from_placement(Point::new(140.0, 120.0), 0.0, 1.0, 1.0)
    ));
    let markers = scene.connector(drawn).unwrap().markers();
    assert_eq!(markers.len(), 2);
    for marker in markers {
        assert!((marker.tip().y() - 120.0).abs() < 1e-3);
    }
}

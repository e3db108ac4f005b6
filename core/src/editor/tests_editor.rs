use crate::config::PlanConfig;
use crate::editor::{CommitSink, Editor, Floor, Layout, SelectionSink};
use crate::error::PlanError;
use crate::history::FloorSnapshot;
use crate::plan::{AreaTemplate, NodeUpdate, WallType, WallUpdate};
use crate::topo::{FloorId, LayoutId, Selection, SelectionState};

/// Records what the editor reports instead of keeping history.
#[derive(Default)]
struct CommitLog {
    commits: Vec<(FloorId, FloorSnapshot)>,
    tracked: Vec<FloorId>,
    forgotten: Vec<FloorId>,
}

impl CommitSink for CommitLog {
    fn commit(&mut self, floor: &FloorId, snapshot: FloorSnapshot) {
        self.commits.push((floor.clone(), snapshot));
    }

    fn track(&mut self, floor: &FloorId, _snapshot: FloorSnapshot) {
        self.tracked.push(floor.clone());
    }

    fn forget(&mut self, floor: &FloorId) {
        self.forgotten.push(floor.clone());
    }
}

#[derive(Default)]
struct SelectionLog {
    events: Vec<String>,
}

impl SelectionSink for SelectionLog {
    fn select(&mut self, target: Selection) {
        self.events.push(format!("select {:?}", target));
    }

    fn deselect(&mut self, target: &Selection) {
        self.events.push(format!("deselect {:?}", target));
    }

    fn clear(&mut self) {
        self.events.push("clear".to_string());
    }
}

fn one_floor_layout() -> Layout {
    let mut layout = Layout::new(LayoutId::from("l1"), "Shop", 2000.0, 1500.0);
    layout.floors.push(Floor::new(FloorId::from("ground"), "Ground", 0));
    layout.current_floor_id = Some(FloorId::from("ground"));
    layout
}

fn logging_editor() -> Editor<CommitLog, SelectionLog> {
    Editor::with_collaborators(
        one_floor_layout(),
        PlanConfig::default(),
        CommitLog::default(),
        SelectionLog::default(),
    )
    .with_id_seed("editor")
}

#[test]
fn test_each_edit_commits_once() {
    let mut editor = logging_editor();
    assert_eq!(editor.commits().tracked, vec![FloorId::from("ground")]);

    let a = editor.add_node(0.0, 0.0).unwrap();
    let b = editor.add_node(300.0, 0.0).unwrap();
    let wall = editor.add_wall(&a, &b, WallType::Wall).unwrap();
    assert_eq!(editor.commits().commits.len(), 3);

    // Door insertion is three walls and two nodes but one commit
    let door = editor
        .insert_door_window(&wall, WallType::Door, 100.0, None, None)
        .unwrap();
    assert_eq!(editor.commits().commits.len(), 4);
    let (floor, snapshot) = editor.commits().commits.last().unwrap();
    assert_eq!(floor, &FloorId::from("ground"));
    assert_eq!(snapshot.walls.len(), 3);

    let events = &editor.selection().events;
    assert_eq!(events[0], format!("select {:?}", Selection::Wall(wall)));
    assert_eq!(events[1], format!("select {:?}", Selection::Wall(door)));
}

#[test]
fn test_failed_edits_do_not_commit() {
    let mut editor = logging_editor();
    let a = editor.add_node(0.0, 0.0).unwrap();
    let before = editor.commits().commits.len();

    assert!(editor.add_wall(&a, &a, WallType::Wall).is_none());
    assert!(!editor.delete_wall(&"missing".into()));
    assert!(!editor.update_node(&"missing".into(), NodeUpdate::position(1.0, 1.0), true));
    assert!(editor.merge_areas(&"x".into(), &"y".into()).is_none());

    assert_eq!(editor.commits().commits.len(), before);
    assert!(editor.selection().events.is_empty());
}

#[test]
fn test_uncommitted_drag_then_explicit_commit() {
    let mut editor = logging_editor();
    let a = editor.add_node(0.0, 0.0).unwrap();
    let before = editor.commits().commits.len();

    for step in 1..=5 {
        let offset = step as f64 * 10.0;
        assert!(editor.update_node(&a, NodeUpdate::position(offset, offset), false));
    }
    assert_eq!(editor.commits().commits.len(), before);

    editor.commit().unwrap();
    let (_, snapshot) = editor.commits().commits.last().unwrap();
    assert_eq!(snapshot.nodes[0].x, 50.0);
}

#[test]
fn test_deletions_deselect() {
    let mut editor = logging_editor();
    let area = editor
        .add_area_from_template(AreaTemplate::Square, 0.0, 0.0, 300.0)
        .unwrap();
    assert!(editor.delete_area(&area));

    let events = &editor.selection().events;
    assert_eq!(events.first().unwrap(), &format!("select {:?}", Selection::Area(area.clone())));
    assert_eq!(events.last().unwrap(), &format!("deselect {:?}", Selection::Area(area)));
}

#[test]
fn test_split_selects_the_new_corner() {
    let mut editor = logging_editor();
    let a = editor.add_node(0.0, 0.0).unwrap();
    let b = editor.add_node(300.0, 0.0).unwrap();
    let wall = editor.add_wall(&a, &b, WallType::Wall).unwrap();
    let before = editor.commits().commits.len();

    let corner = editor.split_wall(&wall, 150.0, 0.0).unwrap();
    assert_eq!(editor.commits().commits.len(), before + 1);
    assert_eq!(
        editor.selection().events.last().unwrap(),
        &format!("select {:?}", Selection::Node(corner))
    );
}

#[test]
fn test_undo_redo_through_history() {
    let mut editor = Editor::new(one_floor_layout(), PlanConfig::default()).with_id_seed("undo");
    assert!(!editor.can_undo());

    let area = editor
        .add_area_from_template(AreaTemplate::Square, 0.0, 0.0, 300.0)
        .unwrap();
    let first_wall = editor.graph().unwrap().walls()[0].id.clone();
    editor.update_wall(
        &first_wall,
        WallUpdate {
            thickness: Some(40.0),
            ..WallUpdate::default()
        },
        true,
    );
    assert_eq!(editor.graph().unwrap().walls()[0].thickness, 40.0);

    assert!(editor.undo());
    assert_eq!(editor.graph().unwrap().walls()[0].thickness, 20.0);
    assert!(editor.selection().is_empty());

    assert!(editor.undo());
    assert!(editor.graph().unwrap().areas().is_empty());
    assert!(!editor.can_undo());

    assert!(editor.redo());
    assert!(editor.graph().unwrap().area(&area).is_some());
    assert!(editor.redo());
    assert!(!editor.redo());
    assert_eq!(editor.graph().unwrap().walls()[0].thickness, 40.0);
}

#[test]
fn test_floor_management() {
    let mut editor = Editor::new(one_floor_layout(), PlanConfig::default()).with_id_seed("floors");
    editor.add_node(10.0, 10.0);

    let upper = editor.add_floor("Upper", 1, None, Some(900.0)).unwrap();
    assert_eq!(editor.current_floor_id(), Some(&upper));
    let floor = editor.current_floor().unwrap();
    assert_eq!(floor.width, Some(2000.0));
    assert_eq!(floor.height, Some(900.0));
    assert_eq!(floor.floor_type.as_deref(), Some("default"));
    assert!(floor.graph.nodes().is_empty());

    assert!(matches!(
        editor.add_floor("Again", 1, None, None),
        Err(PlanError::DuplicateFloorLevel(1))
    ));

    // Undo stacks are per floor
    assert!(!editor.can_undo());
    editor.switch_floor(&FloorId::from("ground")).unwrap();
    assert!(editor.can_undo());
    assert_eq!(editor.graph().unwrap().nodes().len(), 1);

    assert!(matches!(
        editor.switch_floor(&FloorId::from("basement")),
        Err(PlanError::UnknownFloor(_))
    ));

    editor.delete_floor(&FloorId::from("ground")).unwrap();
    assert_eq!(editor.current_floor_id(), Some(&upper));
    editor.delete_floor(&upper).unwrap();
    assert_eq!(editor.current_floor_id(), None);
    assert!(editor.add_node(0.0, 0.0).is_none());
    assert!(matches!(editor.commit(), Err(PlanError::NoCurrentFloor)));
    assert!(!editor.undo());
}

#[test]
fn test_deleted_floor_is_forgotten() {
    let mut editor = logging_editor();
    let upper = editor.add_floor("Upper", 1, None, None).unwrap();
    editor.delete_floor(&upper).unwrap();

    assert_eq!(editor.commits().forgotten, vec![upper]);
    assert_eq!(editor.current_floor_id(), Some(&FloorId::from("ground")));
    assert_eq!(editor.selection().events.last().unwrap(), "clear");
}

#[test]
fn test_floor_type_feeds_new_areas() {
    let mut layout = one_floor_layout();
    layout.floors[0].floor_type = Some("concrete".to_string());
    let mut editor = Editor::new(layout, PlanConfig::default()).with_id_seed("types");

    let area = editor
        .add_area_from_template(AreaTemplate::Square, 0.0, 0.0, 300.0)
        .unwrap();
    assert_eq!(editor.graph().unwrap().area(&area).unwrap().floor_type_id, "concrete");
}

#[test]
fn test_dangling_current_floor_falls_back_to_first() {
    let mut layout = one_floor_layout();
    layout.current_floor_id = Some(FloorId::from(""));
    let editor = Editor::new(layout, PlanConfig::default());
    assert_eq!(editor.current_floor_id(), Some(&FloorId::from("ground")));

    let empty = Layout::new(LayoutId::from("l2"), "Empty", 100.0, 100.0);
    let editor = Editor::with_collaborators(empty, PlanConfig::default(), CommitLog::default(), SelectionState::new());
    assert!(editor.graph().is_none());
    assert!(editor.commits().tracked.is_empty());
}

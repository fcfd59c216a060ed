// Host-side integration tests for the scene: link manager, drag lifecycle,
// hover resolution and removal bookkeeping.

use facelink_core::*;
use glam::Vec2;

fn make_scene() -> Scene {
    Scene::new(CANVAS_WIDTH, CANVAS_HEIGHT, 42)
}

fn add_face_at(scene: &mut Scene, x: f32, y: f32) -> usize {
    let i = scene.add_face(ImageId(scene.faces.len()));
    scene.faces[i].body.pos = Vec2::new(x, y);
    i
}

fn add_topic_at(scene: &mut Scene, label: &str, x: f32, y: f32) -> usize {
    assert!(scene.add_topic(label, 60.0), "topic '{label}' was rejected");
    let i = scene.topics.len() - 1;
    scene.topics[i].body.pos = Vec2::new(x, y);
    i
}

fn link_pair(scene: &mut Scene, fi: usize, ti: usize) {
    scene.faces[fi].linked_topic = Some(ti);
    scene.topics[ti].is_linked = true;
    scene.topics[ti].linked_face = Some(fi);
}

fn assert_links_consistent(scene: &Scene) {
    for (fi, f) in scene.faces.iter().enumerate() {
        if let Some(ti) = f.linked_topic {
            let t = &scene.topics[ti];
            assert!(t.is_linked, "face {fi} links topic {ti} but it is not linked");
            assert_eq!(
                t.linked_face,
                Some(fi),
                "face {fi} links topic {ti} but the topic points elsewhere"
            );
        }
    }
    for (ti, t) in scene.topics.iter().enumerate() {
        assert_eq!(
            t.is_linked,
            t.linked_face.is_some(),
            "topic {ti} is_linked flag disagrees with its face reference"
        );
        if let Some(fi) = t.linked_face {
            assert_eq!(
                scene.faces[fi].linked_topic,
                Some(ti),
                "topic {ti} links face {fi} but the face points elsewhere"
            );
        }
    }
}

fn dragging_count(scene: &Scene) -> usize {
    scene.faces.iter().filter(|f| f.body.dragging).count()
        + scene.topics.iter().filter(|t| t.body.dragging).count()
}

#[test]
fn link_random_pairs_the_only_candidates() {
    let mut scene = make_scene();
    add_face_at(&mut scene, 200.0, 100.0);
    add_topic_at(&mut scene, "ambient", 500.0, 400.0);

    match scene.link_random() {
        LinkOutcome::Linked {
            face,
            topic,
            note_hz,
        } => {
            assert_eq!((face, topic), (0, 0));
            assert!(
                LINK_NOTES_HZ.contains(&note_hz),
                "note {note_hz} not in the table"
            );
        }
        LinkOutcome::NoPair => panic!("expected a link with one candidate on each side"),
    }
    assert_links_consistent(&scene);
    assert_eq!(scene.faces[0].glitch, 1.0, "link should arm the glitch");

    assert_eq!(scene.particles.len(), LINK_BURST_COUNT);
    for p in &scene.particles {
        assert_eq!(p.pos, Vec2::new(200.0, 100.0), "burst spawns at the face");
        assert!(p.vel.length() > 0.0);
    }
    assert_eq!(scene.zaps.len(), 1);
    assert_eq!(scene.zaps[0].life, ZAP_LIFE);
    assert_eq!(scene.zaps[0].from, Vec2::new(200.0, 100.0));
    assert_eq!(scene.zaps[0].to, Vec2::new(500.0, 400.0));
}

#[test]
fn link_random_without_candidates_arms_shake_and_mutates_nothing() {
    let mut scene = make_scene();
    add_topic_at(&mut scene, "jungle", 500.0, 400.0);

    assert_eq!(scene.link_random(), LinkOutcome::NoPair);
    assert_eq!(scene.shake, SHAKE_ON_FAILURE);
    assert!(!scene.topics[0].is_linked);
    assert!(scene.particles.is_empty(), "failure must not spawn a burst");
    assert!(scene.zaps.is_empty(), "failure must not spawn a zap");

    // Same when every item is already linked.
    add_face_at(&mut scene, 200.0, 100.0);
    link_pair(&mut scene, 0, 0);
    scene.shake = 0.0;
    assert_eq!(scene.link_random(), LinkOutcome::NoPair);
    assert_eq!(scene.shake, SHAKE_ON_FAILURE);
    assert_links_consistent(&scene);
}

#[test]
fn link_random_always_picks_unlinked_sides() {
    let mut scene = make_scene();
    for i in 0..4 {
        add_face_at(&mut scene, 100.0 + i as f32 * 120.0, 100.0);
        add_topic_at(&mut scene, "t", 100.0 + i as f32 * 120.0, 400.0);
    }
    for round in 0..4 {
        match scene.link_random() {
            LinkOutcome::Linked { .. } => {}
            LinkOutcome::NoPair => panic!("round {round} should still have candidates"),
        }
        assert_links_consistent(&scene);
    }
    assert_eq!(scene.link_random(), LinkOutcome::NoPair);
}

#[test]
fn reset_links_is_idempotent() {
    let mut scene = make_scene();
    add_face_at(&mut scene, 200.0, 100.0);
    add_face_at(&mut scene, 400.0, 100.0);
    add_topic_at(&mut scene, "dub", 200.0, 400.0);
    add_topic_at(&mut scene, "grime", 400.0, 400.0);
    scene.link_random();
    scene.link_random();

    scene.reset_links();
    let after_once: Vec<_> = scene
        .topics
        .iter()
        .map(|t| (t.is_linked, t.linked_face))
        .collect();
    scene.reset_links();
    let after_twice: Vec<_> = scene
        .topics
        .iter()
        .map(|t| (t.is_linked, t.linked_face))
        .collect();

    assert_eq!(after_once, after_twice);
    assert!(scene.faces.iter().all(|f| f.linked_topic.is_none()));
    assert!(after_once.iter().all(|&(linked, face)| !linked && face.is_none()));
    assert_links_consistent(&scene);
}

#[test]
fn press_on_linked_hovered_topic_breaks_the_link() {
    let mut scene = make_scene();
    add_face_at(&mut scene, 200.0, 200.0);
    add_topic_at(&mut scene, "house", 500.0, 400.0);
    link_pair(&mut scene, 0, 0);

    // Let the topic snap above its face, then hover it.
    scene.update(Vec2::new(-100.0, -100.0));
    let topic_pos = scene.topics[0].body.pos;
    scene.update(topic_pos);
    assert!(scene.topics[0].body.hovered);

    assert_eq!(scene.pointer_down(topic_pos), PressOutcome::LinkBroken);
    assert!(!scene.topics[0].is_linked);
    assert!(scene.topics[0].linked_face.is_none());
    assert!(scene.faces[0].linked_topic.is_none());
    assert_links_consistent(&scene);

    // The press was consumed; nothing is being dragged.
    assert_eq!(scene.dragged, None);
    assert_eq!(dragging_count(&scene), 0);
}

#[test]
fn press_on_unlinked_topic_starts_a_drag() {
    let mut scene = make_scene();
    add_topic_at(&mut scene, "breaks", 300.0, 300.0);
    let pointer = Vec2::new(310.0, 295.0);
    scene.update(pointer);
    assert!(scene.topics[0].body.hovered);

    assert_eq!(
        scene.pointer_down(pointer),
        PressOutcome::DragStarted(DragTarget::Topic(0))
    );
    assert!(scene.topics[0].body.dragging);
    assert_eq!(
        scene.topics[0].body.drag_offset,
        Vec2::new(300.0, 300.0) - pointer
    );

    // Dragging keeps the press offset under the pointer.
    let dest = Vec2::new(600.0, 120.0);
    scene.drag_to(dest);
    assert_eq!(scene.topics[0].body.pos, dest + Vec2::new(-10.0, 5.0));

    scene.pointer_up();
    assert_eq!(scene.dragged, None);
    assert_eq!(dragging_count(&scene), 0);
}

#[test]
fn topmost_item_wins_the_press() {
    let mut scene = make_scene();
    add_topic_at(&mut scene, "first", 300.0, 300.0);
    add_topic_at(&mut scene, "second", 305.0, 302.0);
    let pointer = Vec2::new(302.0, 301.0);
    scene.update(pointer);
    assert!(scene.topics[0].body.hovered && scene.topics[1].body.hovered);

    assert_eq!(
        scene.pointer_down(pointer),
        PressOutcome::DragStarted(DragTarget::Topic(1)),
        "the most recently added topic should win the tie"
    );
}

#[test]
fn topics_take_press_priority_over_faces() {
    let mut scene = make_scene();
    add_face_at(&mut scene, 300.0, 300.0);
    add_topic_at(&mut scene, "overlap", 300.0, 300.0);
    let pointer = Vec2::new(300.0, 300.0);
    scene.update(pointer);

    assert_eq!(
        scene.pointer_down(pointer),
        PressOutcome::DragStarted(DragTarget::Topic(0))
    );
}

#[test]
fn at_most_one_item_drags_at_a_time() {
    let mut scene = make_scene();
    add_face_at(&mut scene, 300.0, 300.0);
    add_face_at(&mut scene, 302.0, 301.0);
    let pointer = Vec2::new(301.0, 300.0);
    scene.update(pointer);
    scene.pointer_down(pointer);
    assert_eq!(dragging_count(&scene), 1);

    // A second press without release never picks up a second item.
    scene.update(pointer);
    scene.pointer_down(pointer);
    assert_eq!(dragging_count(&scene), 1);
}

#[test]
fn press_on_empty_space_is_a_miss() {
    let mut scene = make_scene();
    add_face_at(&mut scene, 300.0, 300.0);
    scene.update(Vec2::new(700.0, 50.0));
    assert_eq!(scene.pointer_down(Vec2::new(700.0, 50.0)), PressOutcome::Miss);
    assert_eq!(dragging_count(&scene), 0);
}

#[test]
fn hovered_item_is_never_the_dragged_one() {
    let mut scene = make_scene();
    add_face_at(&mut scene, 300.0, 300.0);
    let pointer = Vec2::new(300.0, 300.0);
    scene.update(pointer);
    scene.pointer_down(pointer);

    scene.update(pointer);
    assert!(
        !scene.faces[0].body.hovered,
        "an item mid-drag must not report itself hovered"
    );
    assert_eq!(scene.cursor(), Cursor::Grabbing);

    scene.pointer_up();
    scene.update(pointer);
    assert!(scene.faces[0].body.hovered);
    assert_eq!(scene.cursor(), Cursor::Grab);

    scene.update(Vec2::new(700.0, 50.0));
    assert_eq!(scene.cursor(), Cursor::Default);
}

#[test]
fn remove_last_skips_linked_items() {
    let mut scene = make_scene();
    let a = add_face_at(&mut scene, 100.0, 100.0);
    let b = add_face_at(&mut scene, 300.0, 100.0);
    add_topic_at(&mut scene, "kept", 300.0, 400.0);
    link_pair(&mut scene, b, 0);
    assert_eq!(a, 0);

    scene.remove_last();

    // A (unlinked) went; B survived with its link intact, indices fixed up.
    assert_eq!(scene.faces.len(), 1);
    assert_eq!(scene.faces[0].body.pos.x, 300.0);
    assert_eq!(scene.topics.len(), 1, "the linked topic must survive");
    assert_eq!(scene.topics[0].linked_face, Some(0));
    assert_links_consistent(&scene);
}

#[test]
fn remove_last_takes_the_most_recent_unlinked_of_each_kind() {
    let mut scene = make_scene();
    add_face_at(&mut scene, 100.0, 100.0);
    add_face_at(&mut scene, 200.0, 100.0);
    add_topic_at(&mut scene, "one", 100.0, 400.0);
    add_topic_at(&mut scene, "two", 200.0, 400.0);

    scene.remove_last();
    assert_eq!(scene.faces.len(), 1);
    assert_eq!(scene.faces[0].body.pos.x, 100.0);
    assert_eq!(scene.topics.len(), 1);
    assert_eq!(scene.topics[0].label, "one");
}

#[test]
fn remove_last_on_empty_or_fully_linked_is_a_noop() {
    let mut scene = make_scene();
    scene.remove_last();
    assert!(scene.faces.is_empty() && scene.topics.is_empty());

    add_face_at(&mut scene, 100.0, 100.0);
    add_topic_at(&mut scene, "only", 100.0, 400.0);
    link_pair(&mut scene, 0, 0);
    scene.remove_last();
    assert_eq!(scene.faces.len(), 1);
    assert_eq!(scene.topics.len(), 1);
    assert_links_consistent(&scene);
}

#[test]
fn add_topic_rejects_whitespace_only_labels() {
    let mut scene = make_scene();
    assert!(!scene.add_topic("", 0.0));
    assert!(!scene.add_topic("   ", 12.0));
    assert!(scene.topics.is_empty());
    assert!(scene.add_topic("techno", 48.0));
    assert_eq!(scene.topics[0].width, 48.0 + TOPIC_PADDING);
}

#[test]
fn spawns_land_inside_their_canvas_halves() {
    let mut scene = make_scene();
    for i in 0..50 {
        let fi = scene.add_face(ImageId(i));
        let pos = scene.faces[fi].body.pos;
        assert!(pos.x >= FACE_SIZE / 2.0 && pos.x <= CANVAS_WIDTH - FACE_SIZE / 2.0);
        assert!(
            pos.y >= FACE_SIZE / 2.0 && pos.y <= CANVAS_HEIGHT / 2.0,
            "faces spawn in the upper half, got y={}",
            pos.y
        );

        scene.add_topic("label", 40.0);
        let pos = scene.topics[i].body.pos;
        assert!(
            pos.y >= CANVAS_HEIGHT / 2.0 && pos.y <= CANVAS_HEIGHT - TOPIC_HEIGHT / 2.0,
            "topics spawn in the lower half, got y={}",
            pos.y
        );
    }
}

#[test]
fn linked_topic_follows_its_face_and_clamps_at_the_top() {
    let mut scene = make_scene();
    add_face_at(&mut scene, 400.0, 300.0);
    add_topic_at(&mut scene, "follow", 100.0, 450.0);
    link_pair(&mut scene, 0, 0);

    scene.update(Vec2::new(-100.0, -100.0));
    let t = &scene.topics[0];
    assert_eq!(t.body.pos.x, 400.0);
    assert_eq!(
        t.body.pos.y,
        300.0 - FACE_SIZE / 2.0 - TOPIC_HEIGHT / 2.0 - TOPIC_FOLLOW_GAP
    );

    // Dragging the face to the top edge pins the topic at half its height.
    scene.faces[0].body.pos = Vec2::new(400.0, 10.0);
    scene.update(Vec2::new(-100.0, -100.0));
    assert_eq!(scene.topics[0].body.pos.y, TOPIC_HEIGHT / 2.0);
}

#[test]
fn shake_decays_one_per_frame_to_zero() {
    let mut scene = make_scene();
    scene.link_random(); // empty scene -> failure
    assert_eq!(scene.shake, SHAKE_ON_FAILURE);
    for _ in 0..SHAKE_ON_FAILURE as usize {
        scene.update(Vec2::ZERO);
    }
    assert_eq!(scene.shake, 0.0);
    scene.update(Vec2::ZERO);
    assert_eq!(scene.shake, 0.0, "shake never goes negative");
}

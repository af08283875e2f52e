use std::f64::consts::{FRAC_PI_2, PI, TAU};

use shapes_core::{
    is_colliding, screen_to_world, world_to_screen, Point, PolygonBody, ShapeError, Viewport,
};

const EPS: f64 = 1e-9;

fn angles() -> impl Iterator<Item = f64> {
    (0..24).map(|step| step as f64 * TAU / 24.0)
}

#[test]
fn mapping_round_trip_is_exact() {
    let viewport = Viewport::new(1920.0, 1080.0).expect("viewport");
    for x in [-960.0, -0.5, 0.0, 17.25, 4_000.0] {
        for y in [-540.0, -3.125, 0.0, 99.0, 12_345.5] {
            let screen = world_to_screen(&viewport, x, y);
            assert_eq!(screen_to_world(&viewport, screen.x, screen.y), Point::new(x, y));
        }
    }
}

#[test]
fn walk_is_additive_for_bodies() {
    let mut split = PolygonBody::regular(Point::new(10.0, -4.0), 5, 30.0).expect("pentagon");
    split.rotate(0.9).expect("rotate");
    let mut joined = split.clone();

    split.walk(7.5).expect("walk");
    split.walk(-2.25).expect("walk");
    joined.walk(5.25).expect("walk");

    assert!(split.position().distance(joined.position()) < EPS);
}

#[test]
fn look_at_twice_leaves_heading_unchanged() {
    let mut body = PolygonBody::regular(Point::new(-30.0, 12.0), 3, 20.0).expect("triangle");
    body.rotate(123.0).expect("rotate");
    body.look_at(400.0, -250.0).expect("look");
    let first = body.heading();
    body.look_at(400.0, -250.0).expect("look again");
    assert_eq!(body.heading(), first);
}

#[test]
fn look_at_own_position_is_defined() {
    let mut body = PolygonBody::regular(Point::new(8.0, 8.0), 4, 20.0).expect("square");
    body.look_at(8.0, 8.0).expect("look at self");
    assert_eq!(body.heading(), 0.0);
    assert_eq!(body.position(), Point::new(8.0, 8.0));
    assert_eq!(body.vertices().len(), 4);
}

#[test]
fn move_to_preserves_heading_modulo_full_turn() {
    for theta in [0.3, -2.0, 7.0 * PI, 1_000.0] {
        let mut body = PolygonBody::regular(Point::ORIGIN, 3, 10.0).expect("triangle");
        body.set_rotation(0.0).expect("zero heading");
        body.rotate(theta).expect("rotate");
        body.move_to(-77.0, 512.0).expect("move");
        let diff = (body.heading() - theta).rem_euclid(TAU);
        assert!(diff < EPS || TAU - diff < EPS, "theta={theta}");
    }
}

#[test]
fn distant_triangles_never_collide() {
    let mut a = PolygonBody::regular(Point::ORIGIN, 3, 10.0).expect("triangle");
    let mut b = PolygonBody::regular(Point::new(1_000.0, 1_000.0), 3, 10.0).expect("triangle");
    for angle in angles() {
        a.set_rotation(angle).expect("rotate a");
        b.set_rotation(-angle * 3.0).expect("rotate b");
        assert!(!a.is_colliding(&b), "angle={angle}");
        assert!(!is_colliding(&b, &a), "angle={angle}");
    }
}

#[test]
fn identical_squares_at_same_point_always_collide() {
    let mut a = PolygonBody::regular(Point::new(5.0, -5.0), 4, 50.0).expect("square");
    let mut b = a.clone();
    for angle in angles() {
        a.set_rotation(angle).expect("rotate a");
        b.spin(0.37).expect("spin b");
        assert!(a.is_colliding(&b), "angle={angle}");
    }
}

#[test]
fn edge_touching_squares_collide() {
    let left = PolygonBody::rectangle(Point::new(-25.0, 0.0), 50.0, 50.0).expect("left");
    let right = PolygonBody::rectangle(Point::new(25.0, 0.0), 50.0, 50.0).expect("right");
    assert!(left.is_colliding(&right));
    assert!(right.is_colliding(&left));

    let mut apart = right.clone();
    apart.move_to(25.5, 0.0).expect("move");
    assert!(!left.is_colliding(&apart));
}

#[test]
fn prefilter_never_rejects_a_real_overlap() {
    // Long bars overlapping only at their tips.
    let a = PolygonBody::rectangle(Point::new(0.0, 0.0), 4.0, 100.0).expect("bar");
    let b = PolygonBody::rectangle(Point::new(0.0, 98.0), 4.0, 100.0).expect("bar");
    assert!(a.is_colliding(&b));
}

#[test]
fn ship_and_rock_from_the_sandbox_scene() {
    let ship = PolygonBody::custom(
        Point::ORIGIN,
        &[
            Point::new(0.0, 150.0),
            Point::new(-30.0, 0.0),
            Point::new(0.0, -50.0),
            Point::new(30.0, 0.0),
        ],
    )
    .expect("ship");
    let mut rock = PolygonBody::custom(
        Point::new(200.0, 100.0),
        &[
            Point::new(0.0, 120.0),
            Point::new(-20.0, 100.0),
            Point::new(-30.0, 0.0),
            Point::new(0.0, -50.0),
            Point::new(50.0, 0.0),
            Point::new(70.0, 150.0),
        ],
    )
    .expect("rock");

    assert!(!ship.is_colliding(&rock));
    rock.move_to(40.0, 60.0).expect("move rock");
    assert!(ship.is_colliding(&rock));
}

#[test]
fn regular_vertex_count_is_stable() {
    let mut body = PolygonBody::regular(Point::ORIGIN, 7, 25.0).expect("heptagon");
    for (step, count) in [3usize, 4, 12, 5].into_iter().enumerate() {
        body.walk(step as f64).expect("walk");
        body.spin(0.1).expect("spin");
        body.set_vertex_count(count).expect("count");
        assert_eq!(body.vertices().len(), count);
        body.rotate(FRAC_PI_2).expect("rotate");
        assert_eq!(body.vertices().len(), count);
    }
}

#[test]
fn viewport_bounds() {
    let viewport = Viewport::new(1280.0, 720.0).expect("viewport");
    let far = PolygonBody::regular(Point::new(10_000.0, 10_000.0), 5, 40.0).expect("far");
    let home = PolygonBody::regular(Point::ORIGIN, 5, 40.0).expect("home");
    assert!(!far.is_inside_viewport(&viewport));
    assert!(home.is_inside_viewport(&viewport));
}

#[test]
fn invalid_input_fails_fast() {
    assert_eq!(
        PolygonBody::regular(Point::ORIGIN, 0, 10.0).unwrap_err(),
        ShapeError::TooFewVertices { count: 0, min: 3 }
    );
    let mut body = PolygonBody::regular(Point::ORIGIN, 3, 10.0).expect("triangle");
    let before = body.vertices().to_vec();
    assert!(body.move_to(f64::NAN, 0.0).is_err());
    assert!(body.rotate(f64::NEG_INFINITY).is_err());
    assert_eq!(body.vertices(), before.as_slice());
}

#[test]
fn bodies_serialize_with_their_pose() {
    let mut body = PolygonBody::rectangle(Point::new(1.0, 2.0), 3.0, 4.0).expect("rect");
    body.spin(0.5).expect("spin");
    let json = serde_json::to_value(&body).expect("serialize");
    assert_eq!(json["spin"], 0.5);
    assert_eq!(json["orientation"]["origin"]["x"], 1.0);
    assert_eq!(json["template"]["kind"], "rectangle");
    assert_eq!(json["vertices"].as_array().map(Vec::len), Some(4));
}

use kepler::constants::G;
use kepler::{Composition, StarProperties};
use nalgebra::Point2;
use units::Mass;

use crate::body::{Body, BodyId, BodyKind, PlanetProperties};
use crate::capture::{captures, resolve_captures, CapturePolicy, PrimaryChange};
use crate::forces::Encounter;
use crate::system::SystemState;

fn body(name: &str, kg: f64, x: f64) -> Body {
    let kind = BodyKind::Planet(PlanetProperties {
        composition: Composition::earth_like(),
    });
    let mut body = Body::new(name, kind, Mass::from_kg(kg), 1.0);
    body.position = Point2::new(x, 0.0);
    body
}

struct Scene {
    system: SystemState,
    star: BodyId,
    planet: BodyId,
    giant: BodyId,
    probe: BodyId,
}

/// Star at the origin with two free-flying planets on the x axis.
///
/// Spheres of influence follow from the distance to the star:
/// planet ≈ 1e9 m, giant ≈ 6.4e9 m.
fn scene(probe_x: f64, probe_has_primary: bool) -> Scene {
    let mut system = SystemState::new(G);
    let mut star = Body::new(
        "Star",
        BodyKind::Star(StarProperties::sun_like()),
        Mass::from_kg(1.0e30),
        7.0e8,
    );
    star.position = Point2::origin();
    let star = system.add_body(star);

    let planet = system.add_body(body("Planet", 1.0e25, 1.0e11));
    let giant = system.add_body(body("Giant", 1.0e27, 1.02e11));
    let probe = system.add_body(body("Probe", 1.0, probe_x));

    system.change_primary(planet, star).unwrap();
    system.change_primary(giant, star).unwrap();
    if probe_has_primary {
        system.change_primary(probe, star).unwrap();
    }

    Scene {
        system,
        star,
        planet,
        giant,
        probe,
    }
}

#[test]
fn test_capture_inside_tighter_sphere() {
    let s = scene(1.005e11, true);

    assert!(captures(&s.system, s.probe, s.planet));
    assert!(captures(&s.system, s.probe, s.giant));
    // Current primary, lighter bodies and self never capture
    assert!(!captures(&s.system, s.probe, s.star));
    assert!(!captures(&s.system, s.planet, s.probe));
    assert!(!captures(&s.system, s.probe, s.probe));
}

#[test]
fn test_no_capture_outside_sphere() {
    let s = scene(5.0e10, true);

    assert!(!captures(&s.system, s.probe, s.planet));
    assert!(!captures(&s.system, s.probe, s.giant));
}

#[test]
fn test_root_is_captured_by_any_heavier_body() {
    let s = scene(5.0e10, false);

    assert!(captures(&s.system, s.probe, s.planet));
    assert!(captures(&s.system, s.probe, s.star));
}

#[test]
fn test_descendant_never_captures_its_ancestor() {
    let mut system = SystemState::new(G);
    let light = system.add_body(body("Light", 1.0e20, 0.0));
    let heavy = system.add_body(body("Heavy", 1.0e25, 1.0e6));
    system.change_primary(heavy, light).unwrap();

    assert!(!captures(&system, light, heavy));
}

#[test]
fn test_tightest_sphere_wins() {
    let mut s = scene(1.005e11, true);
    let encounters = [
        Encounter { body: s.probe, other: s.giant },
        Encounter { body: s.probe, other: s.planet },
    ];

    let changes =
        resolve_captures(&mut s.system, &encounters, CapturePolicy::TightestSphere).unwrap();

    assert_eq!(
        changes,
        vec![PrimaryChange {
            body: s.probe,
            from: Some(s.star),
            to: s.planet,
        }]
    );
    assert_eq!(s.system.get_body(s.probe).unwrap().primary(), Some(s.planet));
    assert_eq!(s.system.get_body(s.planet).unwrap().satellites(), &[s.probe]);
}

#[test]
fn test_capture_is_idempotent() {
    let mut s = scene(1.005e11, true);
    let encounters = [
        Encounter { body: s.probe, other: s.planet },
        Encounter { body: s.probe, other: s.giant },
        Encounter { body: s.planet, other: s.probe },
    ];

    let first = resolve_captures(&mut s.system, &encounters, CapturePolicy::TightestSphere).unwrap();
    let second = resolve_captures(&mut s.system, &encounters, CapturePolicy::TightestSphere).unwrap();

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert_eq!(s.system.get_body(s.probe).unwrap().primary(), Some(s.planet));
}

#[test]
fn test_no_satisfying_encounter_changes_nothing() {
    for policy in [CapturePolicy::Greedy, CapturePolicy::TightestSphere] {
        let mut s = scene(5.0e10, true);
        let encounters = [
            Encounter { body: s.probe, other: s.planet },
            Encounter { body: s.giant, other: s.planet },
        ];

        let changes = resolve_captures(&mut s.system, &encounters, policy).unwrap();

        assert!(changes.is_empty());
        assert_eq!(s.system.get_body(s.probe).unwrap().primary(), Some(s.star));
        assert_eq!(s.system.get_body(s.planet).unwrap().primary(), Some(s.star));
    }
}

#[test]
fn test_greedy_last_writer_wins() {
    // A root probe far from both planets: any heavier body captures it
    let mut greedy = scene(5.0e10, false);
    let encounters = [
        Encounter { body: greedy.probe, other: greedy.giant },
        Encounter { body: greedy.probe, other: greedy.star },
    ];

    let changes = resolve_captures(&mut greedy.system, &encounters, CapturePolicy::Greedy).unwrap();

    // Giant first, then the star takes over since the probe is outside the giant's sphere
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].to, greedy.giant);
    assert_eq!(changes[1].from, Some(greedy.giant));
    assert_eq!(greedy.system.get_body(greedy.probe).unwrap().primary(), Some(greedy.star));

    // Judged against the start of the tick, the giant has the tighter sphere
    let mut tightest = scene(5.0e10, false);
    let changes =
        resolve_captures(&mut tightest.system, &encounters, CapturePolicy::TightestSphere).unwrap();

    assert_eq!(changes.len(), 1);
    assert_eq!(
        tightest.system.get_body(tightest.probe).unwrap().primary(),
        Some(tightest.giant)
    );
}

#[test]
fn test_equal_spheres_tie_break_on_lowest_id() {
    let mut system = SystemState::new(G);
    let probe = system.add_body(body("Probe", 1.0, 0.0));
    let a = system.add_body(body("A", 1.0e20, 1.0e3));
    let b = system.add_body(body("B", 1.0e20, -1.0e3));

    // Listed in descending id order; both have infinite spheres as roots
    let encounters = [
        Encounter { body: probe, other: b },
        Encounter { body: probe, other: a },
    ];
    resolve_captures(&mut system, &encounters, CapturePolicy::TightestSphere).unwrap();

    assert_eq!(system.get_body(probe).unwrap().primary(), Some(a));
}

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use forcegraph::graph::sample_graph;
use forcegraph::physics::{
    CenterConfig, CollisionConfig, Diagnostic, DragController, Lifecycle, Link, LinkConfig,
    NodeSpec, Simulation, SimulationConfig, Snapshot,
};

fn distance(snapshot: &Snapshot, a: &str, b: &str) -> f64 {
    let (ax, ay) = snapshot.position(a).expect("first node");
    let (bx, by) = snapshot.position(b).expect("second node");
    ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
}

fn centroid(snapshot: &Snapshot) -> (f64, f64) {
    let count = snapshot.nodes.len() as f64;
    let (x, y) = snapshot
        .nodes
        .iter()
        .fold((0.0, 0.0), |(x, y), node| (x + node.x, y + node.y));
    (x / count, y / count)
}

#[test]
fn single_node_settles_on_center_target() {
    let config = SimulationConfig::without_forces().with_center(CenterConfig {
        x: 120.0,
        y: -40.0,
        strength: 1.0,
    });
    let mut sim =
        Simulation::with_graph(config, [NodeSpec::new("only").at(-300.0, 200.0)], Vec::new())
            .expect("simulation");
    sim.run_until_converged(1000);

    let (x, y) = sim.snapshot().position("only").expect("node");
    assert!((x - 120.0).abs() < 1e-6, "x = {x}");
    assert!((y + 40.0).abs() < 1e-6, "y = {y}");
}

#[test]
fn centroid_settles_on_center_target_without_links_or_charge() {
    let config = SimulationConfig::without_forces().with_center(CenterConfig {
        x: 50.0,
        y: 75.0,
        strength: 1.0,
    });
    let nodes = (0..12).map(|index| {
        NodeSpec::new(format!("n{index}")).at(index as f64 * 37.0 - 200.0, (index % 4) as f64 * 90.0)
    });
    let mut sim = Simulation::with_graph(config, nodes, Vec::new()).expect("simulation");
    let before = distance(sim.snapshot(), "n0", "n11");
    sim.run_until_converged(1000);

    let (x, y) = centroid(sim.snapshot());
    assert!((x - 50.0).abs() < 1e-6 && (y - 75.0).abs() < 1e-6, "({x}, {y})");
    // Only aggregate drift is corrected.
    assert!((distance(sim.snapshot(), "n0", "n11") - before).abs() < 1e-6);
}

#[test]
fn pinned_node_publishes_exact_pin() {
    let document = sample_graph();
    let mut sim = document.build_simulation().expect("simulation");
    sim.pin("loc-lisbon", 25.0, -17.5).expect("pin");
    sim.start();

    for _ in 0..120 {
        let snapshot = sim.tick().expect("running");
        assert_eq!(snapshot.position("loc-lisbon"), Some((25.0, -17.5)));
        assert!(snapshot.node("loc-lisbon").expect("node").pinned);
    }

    sim.pin("loc-lisbon", -60.0, 8.0).expect("re-pin");
    let snapshot = sim.tick().expect("running");
    assert_eq!(snapshot.position("loc-lisbon"), Some((-60.0, 8.0)));
}

#[test]
fn collision_alone_removes_overlap() {
    let config = SimulationConfig::without_forces().with_collision(CollisionConfig {
        radius: 10.0,
        strength: 1.0,
        iterations: 3,
    });
    let nodes = (0..30).map(|index| {
        let spec = NodeSpec::new(format!("n{index}"));
        if index % 5 == 0 {
            spec.with_radius(18.0)
        } else {
            spec
        }
    });
    let mut sim = Simulation::with_graph(config, nodes, Vec::new()).expect("simulation");
    sim.step(600);

    let radius = |node: &str| {
        sim.node(node)
            .and_then(|state| state.radius)
            .unwrap_or(10.0)
    };
    let snapshot = sim.snapshot();
    for (offset, a) in snapshot.nodes.iter().enumerate() {
        for b in &snapshot.nodes[offset + 1..] {
            let gap = distance(snapshot, &a.id, &b.id);
            let reach = radius(&a.id) + radius(&b.id);
            assert!(gap >= reach - 0.5, "{} and {} are {gap} apart", a.id, b.id);
        }
    }
}

#[test]
fn two_linked_nodes_reach_rest_length() {
    let config = SimulationConfig::without_forces().with_link(LinkConfig {
        distance: 150.0,
        stiffness: Some(1.0),
        iterations: 1,
    });
    let mut sim = Simulation::with_graph(
        config,
        [NodeSpec::new("a").at(0.0, 0.0), NodeSpec::new("b").at(10.0, 0.0)],
        [Link::new("a", "b")],
    )
    .expect("simulation");

    sim.run_until_converged(1000);
    assert_eq!(sim.lifecycle(), Lifecycle::Converged);
    let length = distance(sim.snapshot(), "a", "b");
    assert!((length - 150.0).abs() < 1.0, "length {length}");
}

#[test]
fn triangle_becomes_equilateral() {
    let config = SimulationConfig::without_forces().with_link(LinkConfig {
        distance: 100.0,
        ..LinkConfig::default()
    });
    let mut sim = Simulation::with_graph(
        config,
        ["a", "b", "c"].map(NodeSpec::new),
        [Link::new("a", "b"), Link::new("b", "c"), Link::new("c", "a")],
    )
    .expect("simulation");
    sim.run_until_converged(1000);

    let snapshot = sim.snapshot();
    let sides = [
        distance(snapshot, "a", "b"),
        distance(snapshot, "b", "c"),
        distance(snapshot, "c", "a"),
    ];
    for side in sides {
        assert!((side - 100.0).abs() < 1.0, "sides {sides:?}");
    }
}

#[test]
fn identical_inputs_give_identical_layouts() {
    let run = || {
        let mut sim = sample_graph().build_simulation().expect("simulation");
        sim.step(250);
        sim.snapshot()
            .nodes
            .iter()
            .map(|node| (node.id.clone(), node.x.to_bits(), node.y.to_bits()))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn removed_node_drops_out_of_the_force_pass() {
    let mut sim = sample_graph().build_simulation().expect("simulation");
    sim.start();
    for _ in 0..20 {
        sim.tick();
    }

    sim.remove_node("loc-lisbon").expect("remove");
    for _ in 0..20 {
        let snapshot = sim.tick().expect("running");
        assert!(snapshot.node("loc-lisbon").is_none());
        assert!(
            snapshot
                .links
                .iter()
                .all(|link| link.source != "loc-lisbon" && link.target != "loc-lisbon")
        );
        assert!(
            snapshot
                .nodes
                .iter()
                .all(|node| node.x.is_finite() && node.y.is_finite())
        );
    }

    let diagnostics = sim.take_diagnostics();
    assert_eq!(
        diagnostics
            .iter()
            .filter(|diagnostic| matches!(diagnostic, Diagnostic::DanglingLink { missing, .. } if missing == "loc-lisbon"))
            .count(),
        3
    );
}

#[test]
fn drag_holds_heat_and_releases_it() {
    let mut sim = sample_graph().build_simulation().expect("simulation");
    sim.run_until_converged(1000);
    assert_eq!(sim.lifecycle(), Lifecycle::Converged);

    let mut drag = DragController::for_simulation(&sim);
    drag.on_drag_start(&mut sim, "tag-sea").expect("start");
    for step in 0..60 {
        let x = 200.0 + step as f64;
        drag.on_drag(&mut sim, "tag-sea", x, 10.0).expect("drag");
        let snapshot = sim.tick().expect("drag keeps the simulation running");
        assert_eq!(snapshot.position("tag-sea"), Some((x, 10.0)));
    }
    assert!(sim.alpha() > 0.1, "alpha {}", sim.alpha());

    drag.on_drag_end(&mut sim, "tag-sea").expect("end");
    assert_eq!(sim.alpha_target(), 0.0);
    sim.run_until_converged(2000);
    assert_eq!(sim.lifecycle(), Lifecycle::Converged);
    assert!(!sim.snapshot().node("tag-sea").expect("node").pinned);
}

#[test]
fn stop_from_tick_listener_prevents_further_ticks() {
    let mut sim = sample_graph().build_simulation().expect("simulation");
    let seen = Rc::new(Cell::new(0u64));
    let counter = Rc::clone(&seen);
    sim.on_tick(move |snapshot, mutator| {
        counter.set(snapshot.tick);
        if snapshot.tick == 5 {
            mutator.stop();
        }
    });

    let ran = sim.run_until_converged(1000);
    assert_eq!(ran, 5);
    assert_eq!(seen.get(), 5);
    assert_eq!(sim.lifecycle(), Lifecycle::Stopped);
    assert!(sim.tick().is_none());
}

#[test]
fn listener_mutations_land_before_the_next_tick() {
    let mut sim = sample_graph().build_simulation().expect("simulation");
    let ended = Rc::new(RefCell::new(None));
    let end_slot = Rc::clone(&ended);
    sim.on_tick(|snapshot, mutator| {
        if snapshot.tick == 3 {
            mutator.add_node(NodeSpec::new("late"));
            mutator.add_link(Link::new("late", "tag-sea"));
            mutator.remove_node("desc-golden");
        }
    });
    sim.on_end(move |snapshot, _| {
        *end_slot.borrow_mut() = Some(snapshot.tick);
    });

    sim.start();
    for _ in 0..3 {
        sim.tick();
    }
    let snapshot = sim.snapshot();
    assert!(snapshot.node("late").is_some());
    assert!(snapshot.node("desc-golden").is_none());
    assert!(
        snapshot
            .links
            .iter()
            .any(|link| link.source == "late" && link.target == "tag-sea")
    );

    sim.run_until_converged(1000);
    assert!(ended.borrow().is_some());
}

//! Built-in example mind maps that can be quickly loaded from the UI.
//!
//! This module defines a few curated maps, from the starter map every new
//! workspace opens with to larger layouts that show the canvas off.

use egui::Pos2;

use crate::types::{Mindmap, NodeType};

/// Kinds of built-in examples available from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleKind {
    /// The default starter map: a central idea with two branches
    Starter,
    /// Planning a week of work around a central goal
    WeeklyPlan,
    /// A retrospective board: what went well, what didn't, actions
    Retrospective,
}

/// Metadata for a single example.
pub struct ExampleInfo {
    /// Stable identifier for the example
    pub kind: ExampleKind,
    /// Human-friendly display name
    pub name: &'static str,
}

/// Returns all examples with their display names.
pub const fn all_examples() -> &'static [ExampleInfo] {
    const EXAMPLES: &[ExampleInfo] = &[
        ExampleInfo {
            kind: ExampleKind::Starter,
            name: "Starter Map",
        },
        ExampleInfo {
            kind: ExampleKind::WeeklyPlan,
            name: "Weekly Plan",
        },
        ExampleInfo {
            kind: ExampleKind::Retrospective,
            name: "Retrospective Board",
        },
    ];
    EXAMPLES
}

/// Builds a mind map instance for the given example kind.
pub fn build_example(kind: ExampleKind) -> Mindmap {
    match kind {
        ExampleKind::Starter => build_starter(),
        ExampleKind::WeeklyPlan => build_weekly_plan(),
        ExampleKind::Retrospective => build_retrospective(),
    }
}

/// The map a brand-new workspace opens with.
pub fn starter_map() -> Mindmap {
    build_starter()
}

fn build_starter() -> Mindmap {
    let mut map = Mindmap::new();

    let root = map.add_node(Pos2::new(600.0, 400.0), NodeType::Root, "Main Idea");
    let left = map.add_node(Pos2::new(400.0, 300.0), NodeType::Main, "Branch 1");
    let right = map.add_node(Pos2::new(800.0, 300.0), NodeType::Main, "Branch 2");

    map.connect(&root, &left);
    map.connect(&root, &right);

    map
}

fn build_weekly_plan() -> Mindmap {
    let mut map = Mindmap::new();

    let goal = map.add_node(Pos2::new(600.0, 380.0), NodeType::Root, "Ship v1.0");

    let mon = map.add_node(Pos2::new(320.0, 220.0), NodeType::Main, "Monday");
    let wed = map.add_node(Pos2::new(600.0, 160.0), NodeType::Main, "Wednesday");
    let fri = map.add_node(Pos2::new(880.0, 220.0), NodeType::Main, "Friday");

    let triage = map.add_node(Pos2::new(180.0, 120.0), NodeType::Sub, "Bug triage");
    let review = map.add_node(Pos2::new(420.0, 80.0), NodeType::Sub, "Review queue");
    let docs = map.add_node(Pos2::new(640.0, 20.0), NodeType::Sub, "Write release notes");
    let demo = map.add_node(Pos2::new(1040.0, 120.0), NodeType::Sub, "Team demo");

    map.connect(&goal, &mon);
    map.connect(&goal, &wed);
    map.connect(&goal, &fri);
    map.connect(&mon, &triage);
    map.connect(&mon, &review);
    map.connect(&wed, &docs);
    map.connect(&fri, &demo);

    map
}

fn build_retrospective() -> Mindmap {
    let mut map = Mindmap::new();

    let sprint = map.add_node(Pos2::new(600.0, 400.0), NodeType::Root, "Sprint 14");

    let well = map.add_node(Pos2::new(300.0, 250.0), NodeType::Main, "Went well");
    let rough = map.add_node(Pos2::new(900.0, 250.0), NodeType::Main, "Was rough");
    let actions = map.add_node(Pos2::new(600.0, 620.0), NodeType::Main, "Actions");

    let pairing = map.add_node(Pos2::new(140.0, 140.0), NodeType::Sub, "Pairing sessions");
    let releases = map.add_node(Pos2::new(400.0, 110.0), NodeType::Sub, "Smooth releases");
    let scope = map.add_node(Pos2::new(820.0, 110.0), NodeType::Sub, "Scope creep");
    let flaky = map.add_node(Pos2::new(1080.0, 140.0), NodeType::Sub, "Flaky tests");
    let timebox = map.add_node(Pos2::new(420.0, 740.0), NodeType::Sub, "Timebox spikes");
    let quarantine = map.add_node(Pos2::new(790.0, 740.0), NodeType::Sub, "Quarantine flaky suite");

    map.connect(&sprint, &well);
    map.connect(&sprint, &rough);
    map.connect(&sprint, &actions);
    map.connect(&well, &pairing);
    map.connect(&well, &releases);
    map.connect(&rough, &scope);
    map.connect(&rough, &flaky);
    map.connect(&actions, &timebox);
    map.connect(&actions, &quarantine);

    map
}

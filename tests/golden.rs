//! Golden tests for the family tree kernel.
//!
//! These tests pin the exact DOT output of small genealogies loaded through
//! the public loaders.

use family_tree_kernel::{
    output_tree, populate_records, populate_text, read_records, Family, FamilyError,
    HouseholdDraft, LayoutError, LoadError, Person, RenderStyle, TreeLayout, ValidationError,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Parents A and B with children D (1702) and C (1700), listed out of order.
const NUCLEAR_TXT: &str = "\
# A small household
Anna (F, id=A)
Bruno (M, id=B)
\tDora (F, birthday=1702, id=D)
\tCarlo (M, birthday=1700, id=C)
";

/// Z is the child of X and W; X is the child of F and M, with sibling Y.
const THREE_GENERATIONS_CSV: &str = "\
id,name,sex,spouse,father,mother
F,Franco,M,M,,
M,Maria,F,F,,
X,Xavier,M,W,F,M
Y,Yara,F,,F,M
W,Wanda,F,X,,
Z,Zeno,M,,X,W
";

fn load_text(input: &str) -> Family {
    let mut family = Family::new();
    populate_text(&mut family, input).unwrap();
    family
}

fn load_csv(input: &str) -> Family {
    let records = read_records(input.as_bytes()).unwrap();
    let mut family = Family::new();
    populate_records(&mut family, &records).unwrap();
    family
}

fn key(family: &Family, id: &str) -> family_tree_kernel::PersonKey {
    family.find_person(id).unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// DESCENDING TREES
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_nuclear_family_descending_document() {
    let family = load_text(NUCLEAR_TXT);
    let a = key(&family, "A");

    let doc = output_tree(&family, Some(a), &[], &RenderStyle::default()).unwrap();

    let expected = "\
digraph {
\tnode [shape=box];
\tedge [dir=none];

\tA[label=\"Anna\",style=filled,fillcolor=bisque];
\tB[label=\"Bruno\",style=filled,fillcolor=azure2];
\tD[label=\"Dora\\n * 1702\",style=filled,fillcolor=bisque];
\tC[label=\"Carlo\\n * 1700\",style=filled,fillcolor=azure2];
\tnode[shape=circle,label=\"\",height=0.01,width=0.01]

\t{ rank=same;
\t\tA -> h0 -> B;
\t}
\t{ rank=same;
\t\th0_0 -> h0_1 -> h0_2;
\t}
\t\th0 -> h0_1;
\t\th0_0 -> C;
\t\th0_2 -> D;
\t{ rank=same;
\t\tC -> D [style=invis];
\t}
\t{ rank=same;
\t}
}
";
    assert_eq!(doc.to_string(), expected);
}

#[test]
fn test_children_follow_birth_order() {
    let family = load_text(NUCLEAR_TXT);
    let doc = output_tree(&family, Some(key(&family, "A")), &[], &RenderStyle::default()).unwrap();

    let lines = doc.lines();
    let c = lines.iter().position(|l| l == "\t\th0_0 -> C;").unwrap();
    let d = lines.iter().position(|l| l == "\t\th0_2 -> D;").unwrap();
    assert!(c < d, "older child must hang from the left spacer");
    assert!(
        !lines.iter().any(|l| l == "\t\th0_1 -> C;" || l == "\t\th0_1 -> D;"),
        "centre spacer is reserved for the union edge"
    );
}

#[test]
fn test_same_input_same_document_100_runs() {
    let family = load_csv(THREE_GENERATIONS_CSV);
    let f = key(&family, "F");
    let z = key(&family, "Z");
    let style = RenderStyle::default();

    let first = output_tree(&family, Some(f), &[z], &style).unwrap();
    for i in 1..100 {
        let again = output_tree(&family, Some(f), &[z], &style).unwrap();
        assert_eq!(first, again, "run {} differs from run 0", i);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ASCENDING TREES
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_ascending_tree_chains_siblings() {
    let family = load_csv(THREE_GENERATIONS_CSV);
    let z = key(&family, "Z");

    let doc = output_tree(&family, None, &[z], &RenderStyle::default()).unwrap();
    let body: Vec<&str> = doc
        .lines()
        .iter()
        .skip_while(|l| !l.starts_with("//"))
        .map(String::as_str)
        .collect();

    assert_eq!(
        body,
        vec![
            "//start ascending tree",
            "\t{ rank=same;",
            "\t}",
            "\t{ rank=same;",
            "\t\tX -> h1 -> W;",
            "\t\tW -> Y [style=invis];",
            "\t}",
            "\t{ rank=same;",
            "\t\th1_0;",
            "\t}",
            "\t\th1 -> h1_0;",
            "\t\th1_0 -> Z;",
            "\t{ rank=same;",
            "\t\tF -> h0 -> M;",
            "\t}",
            "\t{ rank=same;",
            "\t\th0_0 -> h0_1 -> h0_2;",
            "\t}",
            "\t\th0 -> h0_1;",
            "\t\th0_0 -> X;",
            "\t\th0_2 -> Y;",
            "}",
        ]
    );
    assert_eq!(doc.drawn().len(), family.num_persons());
}

#[test]
fn test_ascending_self_loop_is_suppressed() {
    // No spouse attributes: the mother is placed again right after the
    // father's union ended on her.
    let mut family = Family::new();
    let f = family.add_person(Person::new("F", "Franco"));
    let m = family.add_person(Person::new("M", "Maria"));
    let x = family.add_person(
        Person::new("X", "Xavier")
            .with_attr("father", "F")
            .with_attr("mother", "M"),
    );
    family
        .add_household(HouseholdDraft::couple(f, m).with_child(x))
        .unwrap();

    let mut layout = TreeLayout::new(&family);
    let lines: Vec<String> = layout
        .output_ascending_tree(&[x])
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();

    assert!(lines.contains(&"\t\tF -> h0 -> M;".to_string()));
    assert!(!lines.iter().any(|l| l == "\t\tM -> M [style=invis];"));
    assert!(!lines.iter().any(|l| l.ends_with("[style=invis];")));
}

#[test]
fn test_ascending_without_parent_household_fails() {
    let mut family = Family::new();
    family.add_person(Person::new("F", "Franco"));
    family.add_person(Person::new("M", "Maria"));
    let w = family.add_person(Person::new("W", "Wanda"));
    let x = family.add_person(
        Person::new("X", "Xavier")
            .with_attr("father", "F")
            .with_attr("mother", "M"),
    );
    let z = family.add_person(
        Person::new("Z", "Zeno")
            .with_attr("father", "X")
            .with_attr("mother", "W"),
    );
    family
        .add_household(HouseholdDraft::couple(x, w).with_child(z))
        .unwrap();

    let err = output_tree(&family, None, &[z], &RenderStyle::default()).unwrap_err();
    assert_eq!(
        err,
        LayoutError::MissingParentHousehold {
            father: "F".into(),
            mother: "M".into(),
        }
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// HEADER
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_only_drawn_persons_are_declared() {
    let mut family = load_text(NUCLEAR_TXT);
    let hermit = family.add_person(Person::new("Hermit", "Hermit").with_attr("sex", "O"));

    let doc = output_tree(&family, Some(key(&family, "A")), &[], &RenderStyle::default()).unwrap();

    assert!(!doc.drawn().contains(hermit));
    assert!(!doc.lines().iter().any(|l| l.contains("Hermit")));
    let boxes = doc.lines().iter().filter(|l| l.contains("style=filled")).count();
    assert_eq!(boxes, doc.drawn().len());
    assert_eq!(boxes, 4);
}

#[test]
fn test_custom_style_changes_boxes() {
    let family = load_text(NUCLEAR_TXT);
    let style = RenderStyle::from_json_str(
        r#"{ "person_shape": "ellipse", "sex_colors": { "F": "pink" } }"#,
    )
    .unwrap();

    let doc = output_tree(&family, Some(key(&family, "A")), &[], &style).unwrap();
    assert_eq!(doc.lines()[1], "\tnode [shape=ellipse];");
    assert!(doc.lines().contains(&"\tA[label=\"Anna\",style=filled,fillcolor=pink];".to_string()));
    // Only the listed codes are colored; the rest fall back.
    assert!(doc.lines().contains(&"\tB[label=\"Bruno\",style=filled,fillcolor=white];".to_string()));
}

// ─────────────────────────────────────────────────────────────────────────────
// LOADERS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_duplicate_ids_are_rejected() {
    let csv = "\
id,name,sex
A,Anna,F
B,Bruno,M
A,Alba,F
C,Carlo,M
";
    let records = read_records(csv.as_bytes()).unwrap();
    let mut family = Family::new();
    let err = populate_records(&mut family, &records).unwrap_err();

    match err {
        LoadError::Validation(ValidationError::DuplicateIds { ids, rows }) => {
            assert_eq!(ids, vec!["A".to_string()]);
            assert_eq!(rows, vec![0, 2]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_text_and_csv_agree() {
    let txt = load_text(NUCLEAR_TXT);
    let csv = load_csv(
        "\
id,name,sex,spouse,father,mother,birthday
A,Anna,F,B,,,
B,Bruno,M,A,,,
D,Dora,F,,A,B,1702
C,Carlo,M,,A,B,1700
",
    );

    let style = RenderStyle::default();
    let from_txt = output_tree(&txt, Some(key(&txt, "A")), &[], &style).unwrap();
    let from_csv = output_tree(&csv, Some(key(&csv, "A")), &[], &style).unwrap();

    for doc in [&from_txt, &from_csv] {
        assert!(doc.lines().contains(&"\t\tA -> h0 -> B;".to_string()));
        assert_eq!(doc.drawn().len(), 4);
    }
    // Text households are sorted by birthday; CSV rows keep file order.
    assert!(from_txt.lines().contains(&"\t\th0_0 -> C;".to_string()));
    assert!(from_csv.lines().contains(&"\t\th0_0 -> D;".to_string()));
}

#[test]
fn test_unknown_parent_stops_ascending_walk() {
    let mut family = Family::new();
    let x = family.add_person(Person::new("X", "Xavier").with_attr("father", "Ghost"));

    let err = output_tree(&family, None, &[x], &RenderStyle::default()).unwrap_err();
    assert_eq!(
        err,
        LayoutError::Family(FamilyError::PersonNotFound("Ghost".into()))
    );
}

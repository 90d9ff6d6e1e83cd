//! DOT header, footer and person box declarations.

use crate::family::Family;
use crate::policy::RenderStyle;
use crate::types::Person;
use super::engine::DrawnSet;

/// Lines opening the graph: graph type, defaults, one box per drawn person,
/// then the default style for union and spacer nodes.
///
/// Persons are declared in insertion order; persons absent from `drawn`
/// are left out entirely.
pub fn header(family: &Family, drawn: &DrawnSet, style: &RenderStyle) -> Vec<String> {
    let mut lines = vec![
        "digraph {".to_string(),
        format!("\tnode [shape={}];", style.person_shape),
        "\tedge [dir=none];".to_string(),
        String::new(),
    ];

    lines.extend(
        family
            .persons()
            .filter(|(key, _)| drawn.contains(*key))
            .map(|(_, person)| format!("\t{};", person_box(person, style))),
    );

    lines.push(format!(
        "\tnode[shape=circle,label=\"\",height={size},width={size}]",
        size = style.spacer_size
    ));
    lines.push(String::new());
    lines
}

/// The closing line.
pub fn footer() -> String {
    "}".to_string()
}

/// Box declaration for one person, without indentation or terminator.
///
/// ```text
/// Ettore[label="Ettore\n Majorana\n * 1906-08-05, Catania",style=filled,fillcolor=azure2]
/// ```
pub fn person_box(person: &Person, style: &RenderStyle) -> String {
    format!(
        "{}[label=\"{}\",style=filled,fillcolor={}]",
        person.id,
        person_label(person, style),
        style.color_for(person.attr("sex")),
    )
}

/// Multi-line label text, lines joined with a literal `\n`.
pub fn person_label(person: &Person, style: &RenderStyle) -> String {
    let mut parts = vec![escape(&person.name)];

    if let Some(surname) = person.attr("surname") {
        parts.push(format!(" {}", escape(surname)));
    }
    if let Some(line) = life_event("*", person.attr("birthday"), person.attr("birthplace")) {
        parts.push(line);
    }
    if let Some(line) = life_event("†", person.attr("deathday"), person.attr("deathplace")) {
        parts.push(line);
    }
    if let Some(notes) = person.attr("notes") {
        let truncated: String = notes.chars().take(style.notes_max_chars).collect();
        parts.push(escape(&truncated));
    }

    parts.join("\\n")
}

fn life_event(mark: &str, date: Option<&str>, place: Option<&str>) -> Option<String> {
    let text = match (date, place) {
        (Some(date), Some(place)) => format!("{date}, {place}"),
        (Some(only), None) | (None, Some(only)) => only.to_string(),
        (None, None) => return None,
    };
    Some(format!(" {mark} {}", escape(&text)))
}

/// Escape text for a double-quoted DOT string.
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HouseholdDraft;

    fn ettore() -> Person {
        Person::new("1906EMajorana", "Ettore")
            .with_attr("surname", "Majorana")
            .with_attr("sex", "M")
            .with_attr("birthplace", "Catania")
            .with_attr("birthday", "1906-08-05")
            .with_attr("deathplace", "Mazara del Vallo")
            .with_attr("deathday", "1938-03-27")
            .with_attr("notes", "Great theoretical physicist.")
    }

    #[test]
    fn test_complete_box() {
        let style = RenderStyle::default();
        assert_eq!(
            person_box(&ettore(), &style),
            "1906EMajorana[label=\"Ettore\\n Majorana\\n * 1906-08-05, Catania\
             \\n † 1938-03-27, Mazara del Vallo\\nGreat theoretical physicist.\",\
             style=filled,fillcolor=azure2]"
        );
    }

    #[test]
    fn test_label_drops_missing_lines() {
        let style = RenderStyle::default();
        let cases: [(&[&str], &str); 4] = [
            (&["surname"], "Ettore\\n * 1906-08-05, Catania\\n † 1938-03-27, Mazara del Vallo\\nGreat theoretical physicist."),
            (&["birthday", "birthplace"], "Ettore\\n Majorana\\n † 1938-03-27, Mazara del Vallo\\nGreat theoretical physicist."),
            (&["deathday"], "Ettore\\n Majorana\\n * 1906-08-05, Catania\\n † Mazara del Vallo\\nGreat theoretical physicist."),
            (&["notes"], "Ettore\\n Majorana\\n * 1906-08-05, Catania\\n † 1938-03-27, Mazara del Vallo"),
        ];
        for (dropped, expected) in cases {
            let mut person = ettore();
            for key in dropped {
                person.attrs.remove(*key);
            }
            assert_eq!(person_label(&person, &style), expected, "dropped {dropped:?}");
        }
    }

    #[test]
    fn test_notes_are_truncated() {
        let style = RenderStyle::default();
        let person = Person::new("n", "N").with_attr("notes", "x".repeat(80));
        assert_eq!(person_label(&person, &style), format!("N\\n{}", "x".repeat(60)));
    }

    #[test]
    fn test_label_escapes_quotes() {
        let style = RenderStyle::default();
        let person = Person::new("q", "Jean \"le Bon\"");
        assert_eq!(person_label(&person, &style), "Jean \\\"le Bon\\\"");
    }

    #[test]
    fn test_unknown_sex_is_white() {
        let style = RenderStyle::default();
        let person = Person::new("u", "U").with_attr("sex", "X");
        assert!(person_box(&person, &style).ends_with("fillcolor=white]"));
    }

    #[test]
    fn test_header_declares_drawn_only() {
        let mut family = Family::new();
        let a = family.add_person(Person::new("A", "Anna").with_attr("sex", "F"));
        let b = family.add_person(Person::new("B", "Bruno"));
        let c = family.add_person(Person::new("C", "Carla"));
        family.add_household(HouseholdDraft::couple(a, b)).unwrap();

        let mut drawn = DrawnSet::new();
        drawn.insert(c);
        drawn.insert(a);

        let lines = header(&family, &drawn, &RenderStyle::default());
        assert_eq!(
            lines,
            vec![
                "digraph {",
                "\tnode [shape=box];",
                "\tedge [dir=none];",
                "",
                "\tA[label=\"Anna\",style=filled,fillcolor=bisque];",
                "\tC[label=\"Carla\",style=filled,fillcolor=white];",
                "\tnode[shape=circle,label=\"\",height=0.01,width=0.01]",
                "",
            ]
        );
        assert_eq!(footer(), "}");
    }
}

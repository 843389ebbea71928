use serde::{Deserialize, Serialize};

/// Section header the model is instructed to emit for the itinerary.
pub const ITINERARY_HEADER: &str = "## Itinerary";
/// Section header the model is instructed to emit for the packing list.
pub const PACKING_LIST_HEADER: &str = "## Packing List";
/// Section header the model is instructed to emit for the budget.
pub const BUDGET_HEADER: &str = "## Budget";

/// The three plan artifacts split out of the generated text.
///
/// `None` is the explicit "the model produced nothing for this artifact"
/// sentinel — distinct from `Some(String::new())`, which means the
/// section header was present with an empty body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSections {
    /// Day-by-day itinerary, when the section was present.
    pub itinerary: Option<String>,
    /// Packing list, when the section was present.
    pub packing_list: Option<String>,
    /// Budget breakdown, when the section was present.
    pub budget: Option<String>,
}

/// Split the generated text into the three artifacts.
///
/// Pure over its input: scans for the fixed section headers
/// (case-insensitive, at line start) and takes each section's body up to
/// the next known header. Sections parse independently — a missing
/// packing list does not disturb the itinerary or the budget. Subsection
/// headings inside a section (`### Day 1`) are body text, not boundaries.
pub fn compose(text: &str) -> PlanSections {
    PlanSections {
        itinerary: extract_section(text, ITINERARY_HEADER),
        packing_list: extract_section(text, PACKING_LIST_HEADER),
        budget: extract_section(text, BUDGET_HEADER),
    }
}

const SECTION_HEADERS: [&str; 3] = [ITINERARY_HEADER, PACKING_LIST_HEADER, BUDGET_HEADER];

fn is_header_line(line: &str, header: &str) -> bool {
    line.trim().to_lowercase().starts_with(&header.to_lowercase())
}

fn is_any_header_line(line: &str) -> bool {
    SECTION_HEADERS.iter().any(|h| is_header_line(line, h))
}

fn extract_section(text: &str, header: &str) -> Option<String> {
    let mut body: Option<Vec<&str>> = None;

    for line in text.lines() {
        if is_header_line(line, header) {
            body = Some(Vec::new());
            continue;
        }
        if let Some(lines) = body.as_mut() {
            if is_any_header_line(line) {
                break;
            }
            lines.push(line);
        }
    }

    body.map(|lines| lines.join("\n").trim().to_string())
}

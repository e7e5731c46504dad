//! Display payload for a resolved submission.

use crate::features::pclass_for;
use crate::{FormInput, PredictionResult};
use serde::{Deserialize, Serialize};

/// Name used when the form was submitted without one.
pub const ANONYMOUS_PERSON: &str = "You";

const SURVIVE_NARRATIVE: &str = "You manage to find a spot on a lifeboat after a tense wait \
on deck. Cold wind, loud cries, but you make it out alive.";

const PERISH_NARRATIVE: &str = "You stay back in the freezing chaos, helping others reach \
the boats as the ship tilts dangerously...";

/// One row of the ticket summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRow {
    pub field: String,
    pub value: String,
}

impl TicketRow {
    fn new(field: &str, value: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            value: value.into(),
        }
    }
}

/// Everything the result area shows for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalReport {
    /// Display name; [`ANONYMOUS_PERSON`] when no name was given.
    pub person: String,
    pub survived: bool,
    pub headline: String,
    pub narrative: String,
    /// Survival meter fill in `[0, 1]`. Override verdicts show a full or
    /// empty meter.
    pub meter: f64,
    /// Meter value as a percentage with one decimal, e.g. `"87.3%"`.
    pub chance_text: String,
    pub ticket: Vec<TicketRow>,
}

impl SurvivalReport {
    pub fn build(input: &FormInput, result: &PredictionResult) -> Self {
        let person = match input.trimmed_name() {
            "" => ANONYMOUS_PERSON.to_string(),
            name => name.to_string(),
        };

        let meter = result
            .probability
            .unwrap_or(if result.survived { 1.0 } else { 0.0 })
            .clamp(0.0, 1.0);

        let (headline, narrative) = if result.survived {
            (
                format!("{person} would likely SURVIVE the Titanic."),
                SURVIVE_NARRATIVE,
            )
        } else {
            (
                format!("{person} would likely NOT SURVIVE the Titanic."),
                PERISH_NARRATIVE,
            )
        };

        let ticket = vec![
            TicketRow::new("Name", person.clone()),
            TicketRow::new("Gender", input.sex.label()),
            TicketRow::new("Age", input.age.to_string()),
            TicketRow::new(
                "Income Bracket (Pclass)",
                format!(
                    "{}  → Pclass {}",
                    input.income_bracket.label(),
                    pclass_for(input.income_bracket)
                ),
            ),
        ];

        Self {
            person,
            survived: result.survived,
            headline,
            narrative: narrative.to_string(),
            meter,
            chance_text: format!("{:.1}%", meter * 100.0),
            ticket,
        }
    }
}

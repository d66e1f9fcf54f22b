use serde::{Deserialize, Serialize};

/// Replace `from` with `to` wherever it appears as a whole phrase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

impl Substitution {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Append `qualifier` when any trigger phrase appears and the qualifier is
/// not already present.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintRule {
    pub triggers: Vec<String>,
    pub qualifier: String,
}

impl ConstraintRule {
    pub fn new(triggers: &[&str], qualifier: impl Into<String>) -> Self {
        Self {
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
            qualifier: qualifier.into(),
        }
    }
}

/// Vocabulary for the four repair stages.
///
/// Replacement text must not itself contain the phrase it replaces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairTables {
    pub concept_map: Vec<Substitution>,
    pub constraints: Vec<ConstraintRule>,
    pub scope_map: Vec<Substitution>,
    pub goal_map: Vec<Substitution>,
}

impl Default for RepairTables {
    fn default() -> Self {
        let concept_map = vec![
            Substitution::new("control users", "support users"),
            Substitution::new("control people", "support people"),
            Substitution::new("manipulate", "inform"),
            Substitution::new("manipulating", "informing"),
            Substitution::new("coerce", "invite"),
            Substitution::new("coercing", "inviting"),
            Substitution::new("force users", "encourage users"),
            Substitution::new("exploit", "serve"),
            Substitution::new("exploiting", "serving"),
            Substitution::new("humiliate", "respect"),
            Substitution::new("surveil", "inform"),
            Substitution::new("addictive", "engaging"),
            Substitution::new("hook users", "welcome users"),
            Substitution::new("make them dependent", "make them capable"),
            Substitution::new("exclude", "include"),
            Substitution::new("excluding", "including"),
            Substitution::new("deny access", "provide access"),
            Substitution::new("shut out", "bring in"),
        ];

        let constraints = vec![
            ConstraintRule::new(
                &["track*", "monitor*", "collect*", "surveil*", "user data"],
                "Personal data is handled with explicit privacy protections.",
            ),
            ConstraintRule::new(
                &["engagement", "dependent", "lock in", "lock-in", "subscription*"],
                "Users can opt out or leave at any time without penalty.",
            ),
            ConstraintRule::new(
                &["protect them", "for their own good", "decide for"],
                "Any intervention requires the informed consent of the people affected.",
            ),
        ];

        let scope_map = vec![
            Substitution::new("track all", "track relevant"),
            Substitution::new("all users", "participating users"),
            Substitution::new("all data", "necessary data"),
            Substitution::new("every user", "each consenting user"),
            Substitution::new("everyone", "those who opt in"),
            Substitution::new("always", "where appropriate"),
            Substitution::new("at any cost", "within agreed limits"),
            Substitution::new("without exception", "with reasonable exceptions"),
        ];

        let goal_map = vec![
            Substitution::new("maximize engagement", "support user wellbeing"),
            Substitution::new("maximise engagement", "support user wellbeing"),
            Substitution::new("maximize profit", "create shared value"),
            Substitution::new("maximise profit", "create shared value"),
            Substitution::new("win at all costs", "succeed responsibly"),
            Substitution::new("at the expense of", "together with"),
            Substitution::new("so they cannot leave", "so they choose to stay"),
        ];

        Self {
            concept_map,
            constraints,
            scope_map,
            goal_map,
        }
    }
}

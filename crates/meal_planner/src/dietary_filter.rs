//! Dietary filtering of catalog candidates.
//!
//! Candidates whose title or ingredient names mention a forbidden term are
//! dropped. Surviving ingredient names are rewritten through an ordered
//! substitution table.

use recipe_catalog_client::{Candidate, CandidateIngredient};
use regex::{NoExpand, Regex, RegexBuilder};

use crate::error::{PlannerError, PlannerResult};

/// Immutable term tables for one dietary policy.
#[derive(Clone, Debug, PartialEq)]
pub struct DietaryRules {
    /// Terms that exclude a candidate outright (case-insensitive substring).
    pub forbidden: Vec<String>,
    /// Ordered `(term, replacement)` pairs; the first matching term wins.
    pub substitutions: Vec<(String, String)>,
}

impl Default for DietaryRules {
    /// Halal policy: pork and alcohol derived terms are forbidden, common
    /// pork products are swapped for beef or halal equivalents.
    fn default() -> Self {
        let forbidden = [
            "pork",
            "ham",
            "sausage",
            "pepperoni",
            "lard",
            "prosciutto",
            "gelatin",
            "wine",
            "alcohol",
            "beer",
            "vodka",
            "rum",
            "brandy",
            "bourbon",
        ];
        let substitutions = [
            ("bacon", "beef bacon"),
            ("pancetta", "beef pancetta"),
            ("chorizo", "halal beef chorizo"),
            ("hotdog", "halal hotdog"),
            ("gelatin", "halal gelatin"),
        ];
        Self {
            forbidden: forbidden.iter().map(|s| s.to_string()).collect(),
            substitutions: substitutions
                .iter()
                .map(|(t, r)| (t.to_string(), r.to_string()))
                .collect(),
        }
    }
}

#[derive(Clone, Debug)]
struct Substitution {
    term: String,
    replacement: String,
    replacement_lower: String,
    pattern: Regex,
}

#[derive(Clone, Debug)]
pub struct DietaryFilter {
    forbidden: Vec<String>,
    substitutions: Vec<Substitution>,
}

impl DietaryFilter {
    pub fn new(rules: DietaryRules) -> PlannerResult<Self> {
        let forbidden = rules
            .forbidden
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        let mut substitutions = Vec::with_capacity(rules.substitutions.len());
        for (term, replacement) in rules.substitutions {
            let term = term.trim().to_lowercase();
            if term.is_empty() {
                return Err(PlannerError::InvalidInput(
                    "substitution term must not be empty".into(),
                ));
            }
            let pattern = RegexBuilder::new(&regex::escape(&term))
                .case_insensitive(true)
                .build()
                .map_err(|e| PlannerError::InvalidInput(format!("substitution `{term}`: {e}")))?;
            substitutions.push(Substitution {
                replacement_lower: replacement.to_lowercase(),
                term,
                replacement,
                pattern,
            });
        }
        Ok(Self {
            forbidden,
            substitutions,
        })
    }

    /// Drop forbidden candidates and rewrite ingredient names of the rest.
    /// Survivor order is preserved.
    pub fn filter(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates
            .into_iter()
            .filter(|c| !self.is_excluded(c))
            .map(|mut c| {
                c.ingredients = c
                    .ingredients
                    .into_iter()
                    .map(|i| CandidateIngredient {
                        name: self.substitute(&i.name),
                    })
                    .collect();
                c
            })
            .collect()
    }

    pub fn is_excluded(&self, candidate: &Candidate) -> bool {
        self.is_forbidden(&candidate.title)
            || candidate.ingredients.iter().any(|i| self.is_forbidden(&i.name))
    }

    pub fn is_forbidden(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.forbidden.iter().any(|t| lower.contains(t.as_str()))
    }

    /// Apply the first matching substitution to `name`. Every occurrence of
    /// the matched term is replaced. A name that already carries the
    /// replacement is left alone, so the rewrite is idempotent.
    pub fn substitute(&self, name: &str) -> String {
        let lower = name.to_lowercase();
        let Some(sub) = self
            .substitutions
            .iter()
            .find(|s| lower.contains(s.term.as_str()))
        else {
            return name.to_string();
        };
        if lower.contains(sub.replacement_lower.as_str()) {
            return name.to_string();
        }
        sub.pattern
            .replace_all(name, NoExpand(&sub.replacement))
            .into_owned()
    }
}

// src/problems/mod.rs

//! Static problem catalog.
//!
//! The catalog is loaded once at startup, either from the JSON file embedded in
//! the binary or from `PROBLEMS_PATH`, and validated before the server accepts
//! requests. Nothing mutates it afterwards.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::models::problem::Problem;

const BUILTIN_CATALOG: &str = include_str!("catalog.json");

static JS_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier pattern"));

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("problem catalog is empty")]
    Empty,

    #[error("failed to read problem catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed problem catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate problem id '{0}'")]
    DuplicateId(String),

    #[error("problem '{id}' is invalid: {reason}")]
    InvalidProblem { id: String, reason: String },

    #[error("problem orders must be exactly 1..={count}, found {found:?}")]
    BrokenOrder { count: usize, found: Vec<u32> },

    #[error("problem '{0}' not found")]
    UnknownProblem(String),
}

/// Navigation direction in the ordered problem list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug)]
pub struct ProblemRegistry {
    /// Sorted by `order`.
    problems: Vec<Problem>,
    by_id: HashMap<String, usize>,
}

impl ProblemRegistry {
    /// Loads the catalog compiled into the binary.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, RegistryError> {
        let problems: Vec<Problem> = serde_json::from_str(raw)?;
        Self::new(problems)
    }

    /// Validates the catalog invariants and indexes it.
    pub fn new(mut problems: Vec<Problem>) -> Result<Self, RegistryError> {
        if problems.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::new();
        for problem in &problems {
            if !seen.insert(problem.id.as_str()) {
                return Err(RegistryError::DuplicateId(problem.id.clone()));
            }
            validate_problem(problem)?;
        }

        problems.sort_by_key(|p| p.order);
        let contiguous = problems
            .iter()
            .enumerate()
            .all(|(idx, p)| p.order as usize == idx + 1);
        if !contiguous {
            return Err(RegistryError::BrokenOrder {
                count: problems.len(),
                found: problems.iter().map(|p| p.order).collect(),
            });
        }

        let by_id = problems
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.id.clone(), idx))
            .collect();

        Ok(Self { problems, by_id })
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Problem> {
        self.by_id.get(id).map(|&idx| &self.problems[idx])
    }

    pub fn require(&self, id: &str) -> Result<&Problem, RegistryError> {
        self.get(id)
            .ok_or_else(|| RegistryError::UnknownProblem(id.to_string()))
    }

    /// All problems in display order.
    pub fn list(&self) -> &[Problem] {
        &self.problems
    }

    /// Problems in display order, narrowed by an exact category (case-insensitive)
    /// and by a free-text query matched against the category.
    pub fn search(&self, category: Option<&str>, query: Option<&str>) -> Vec<&Problem> {
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        self.problems
            .iter()
            .filter(|p| category.is_none_or(|c| p.category.eq_ignore_ascii_case(c.trim())))
            .filter(|p| {
                query
                    .as_deref()
                    .is_none_or(|q| p.category.to_lowercase().contains(q))
            })
            .collect()
    }

    fn by_order(&self, order: u32) -> Option<&Problem> {
        self.problems.iter().find(|p| p.order == order)
    }

    /// The neighbour of `current_id` in display order. Stepping past either end
    /// wraps around, so a single-problem catalog navigates to itself.
    pub fn next_problem(
        &self,
        current_id: &str,
        direction: Direction,
    ) -> Result<&Problem, RegistryError> {
        let current = self.require(current_id)?;

        let target = match direction {
            Direction::Forward => current.order.checked_add(1),
            Direction::Backward => current.order.checked_sub(1),
        };

        let next = target.and_then(|order| self.by_order(order)).or_else(|| match direction {
            Direction::Forward => self.by_order(1),
            Direction::Backward => self.problems.last(),
        });

        // Orders are contiguous from 1, so the wrap targets always exist.
        next.ok_or(RegistryError::Empty)
    }
}

fn validate_problem(problem: &Problem) -> Result<(), RegistryError> {
    let invalid = |reason: &str| RegistryError::InvalidProblem {
        id: problem.id.clone(),
        reason: reason.to_string(),
    };

    if problem.id.trim().is_empty() {
        return Err(invalid("id must not be empty"));
    }
    if !JS_IDENTIFIER.is_match(&problem.entry_point) {
        return Err(invalid("entry_point must be a JavaScript identifier"));
    }
    if problem.verification.fixtures.is_empty() {
        return Err(invalid("at least one verification fixture is required"));
    }
    if !problem.starter_code.contains(&problem.entry_point) {
        return Err(invalid("starter_code must declare the entry point"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::problem::{Difficulty, Fixture, Verification};
    use serde_json::json;

    fn problem(id: &str, order: u32) -> Problem {
        Problem {
            id: id.to_string(),
            title: id.to_string(),
            difficulty: Difficulty::Easy,
            category: "Array".to_string(),
            order,
            entry_point: "solve".to_string(),
            starter_code: "function solve() {}".to_string(),
            statement: String::new(),
            examples: Vec::new(),
            constraints: Vec::new(),
            video_id: None,
            link: None,
            verification: Verification {
                fixtures: vec![Fixture {
                    args: vec![],
                    expected: json!(null),
                }],
            },
        }
    }

    fn five() -> ProblemRegistry {
        // Deliberately shuffled; the registry sorts by order.
        ProblemRegistry::new(vec![
            problem("c", 3),
            problem("a", 1),
            problem("e", 5),
            problem("b", 2),
            problem("d", 4),
        ])
        .unwrap()
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let registry = ProblemRegistry::builtin().unwrap();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.list()[0].id, "two-sum");
        assert_eq!(registry.require("two-sum").unwrap().entry_point, "twoSum");
    }

    #[test]
    fn list_is_sorted_by_order() {
        let ids: Vec<_> = five().list().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn forward_from_last_wraps_to_first() {
        let registry = five();
        assert_eq!(registry.next_problem("e", Direction::Forward).unwrap().id, "a");
        assert_eq!(registry.next_problem("b", Direction::Forward).unwrap().id, "c");
    }

    #[test]
    fn backward_from_first_wraps_to_last() {
        let registry = five();
        assert_eq!(registry.next_problem("a", Direction::Backward).unwrap().id, "e");
        assert_eq!(registry.next_problem("c", Direction::Backward).unwrap().id, "b");
    }

    #[test]
    fn single_problem_wraps_to_itself() {
        let registry = ProblemRegistry::new(vec![problem("only", 1)]).unwrap();
        assert_eq!(registry.next_problem("only", Direction::Forward).unwrap().id, "only");
        assert_eq!(registry.next_problem("only", Direction::Backward).unwrap().id, "only");
    }

    #[test]
    fn unknown_problem_cannot_be_navigated() {
        let err = five().next_problem("zzz", Direction::Forward).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownProblem(id) if id == "zzz"));
    }

    #[test]
    fn gaps_and_duplicates_in_order_are_rejected() {
        let gap = ProblemRegistry::new(vec![problem("a", 1), problem("b", 3)]);
        assert!(matches!(gap, Err(RegistryError::BrokenOrder { .. })));

        let dup = ProblemRegistry::new(vec![problem("a", 1), problem("b", 1)]);
        assert!(matches!(dup, Err(RegistryError::BrokenOrder { .. })));

        let zero = ProblemRegistry::new(vec![problem("a", 0)]);
        assert!(matches!(zero, Err(RegistryError::BrokenOrder { .. })));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = ProblemRegistry::new(vec![problem("a", 1), problem("a", 2)]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn entry_point_must_be_an_identifier() {
        let mut bad = problem("a", 1);
        bad.entry_point = "solve(); process.exit".to_string();
        assert!(matches!(
            ProblemRegistry::new(vec![bad]),
            Err(RegistryError::InvalidProblem { .. })
        ));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(ProblemRegistry::new(vec![]), Err(RegistryError::Empty)));
    }

    #[test]
    fn search_matches_category_case_insensitively() {
        let mut stack = problem("s", 2);
        stack.category = "Stack".to_string();
        let registry = ProblemRegistry::new(vec![problem("a", 1), stack]).unwrap();

        let hits: Vec<_> = registry.search(None, Some("sta")).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(hits, ["s"]);

        let hits: Vec<_> = registry.search(Some("array"), None).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(hits, ["a"]);

        assert_eq!(registry.search(None, Some("   ")).len(), 2);
    }
}

//! Structural checks over a loaded policy
//!
//! Findings are advisory: the engine still loads a policy with issues.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use super::config::{AccessMapKind, Hierarchy, PolicyConfig};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyIssue {
    #[error("role {role} is not declared in all_roles (first referenced at {first_reference}, {references} reference(s))")]
    UnknownRole {
        role: String,
        first_reference: String,
        references: usize,
    },

    #[error("cycle in {hierarchy} hierarchy: {}", .path.join(" -> "))]
    HierarchyCycle {
        hierarchy: &'static str,
        path: Vec<String>,
    },
}

impl PolicyConfig {
    /// Report undeclared roles and hierarchy cycles
    pub fn validate(&self) -> Vec<PolicyIssue> {
        let mut references: Vec<(&str, String)> = Vec::new();

        for (name, hierarchy) in self.named_hierarchies() {
            for (role, granted) in hierarchy {
                references.push((role.as_str(), format!("hierarchies.{}.{}", name, role)));
                for target in granted {
                    references.push((target.as_str(), format!("hierarchies.{}.{}", name, role)));
                }
            }
        }

        for kind in AccessMapKind::ALL {
            let map = self.access_map(kind);
            references.push((map.default_role.as_str(), format!("access_maps.{}.default_role", kind)));
            for (procedure, methods) in &map.rules {
                for (method, role) in methods {
                    references.push((role.as_str(), format!("access_maps.{}.rules.{}.{}", kind, procedure, method)));
                }
            }
        }

        let mut unknown: BTreeMap<&str, (String, usize)> = BTreeMap::new();
        for (role, location) in references {
            if self.is_known_role(role) {
                continue;
            }
            unknown
                .entry(role)
                .and_modify(|(_, count)| *count += 1)
                .or_insert((location, 1));
        }

        let mut issues: Vec<PolicyIssue> = unknown
            .into_iter()
            .map(|(role, (first_reference, references))| PolicyIssue::UnknownRole {
                role: role.to_string(),
                first_reference,
                references,
            })
            .collect();

        for (name, hierarchy) in self.named_hierarchies() {
            for path in find_cycles(hierarchy) {
                issues.push(PolicyIssue::HierarchyCycle { hierarchy: name, path });
            }
        }

        issues
    }

    fn named_hierarchies(&self) -> [(&'static str, &Hierarchy); 2] {
        [
            ("application", &self.hierarchies.application),
            ("project", &self.hierarchies.project),
        ]
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Depth-first search; each back edge yields the closed path it completes
fn find_cycles(hierarchy: &Hierarchy) -> Vec<Vec<String>> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut stack: Vec<&str> = Vec::new();
    let mut cycles = Vec::new();

    for role in hierarchy.keys() {
        visit(role, hierarchy, &mut marks, &mut stack, &mut cycles);
    }
    cycles
}

fn visit<'a>(
    role: &'a str,
    hierarchy: &'a Hierarchy,
    marks: &mut HashMap<&'a str, Mark>,
    stack: &mut Vec<&'a str>,
    cycles: &mut Vec<Vec<String>>,
) {
    match marks.get(role) {
        Some(Mark::Done) => return,
        Some(Mark::Visiting) => {
            let start = stack.iter().position(|r| *r == role).unwrap_or(0);
            let mut path: Vec<String> = stack[start..].iter().map(|r| r.to_string()).collect();
            path.push(role.to_string());
            cycles.push(path);
            return;
        }
        None => {}
    }

    marks.insert(role, Mark::Visiting);
    stack.push(role);
    if let Some(granted) = hierarchy.get(role) {
        for next in granted {
            visit(next, hierarchy, marks, stack, cycles);
        }
    }
    stack.pop();
    marks.insert(role, Mark::Done);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_policy_issues() {
        let issues = PolicyConfig::embedded().unwrap().validate();

        // app-public is granted by the hierarchy and guards public web
        // controllers, but is not a declared role.
        assert_eq!(issues.len(), 1);
        match &issues[0] {
            PolicyIssue::UnknownRole { role, first_reference, references } => {
                assert_eq!(role, "app-public");
                assert_eq!(first_reference, "hierarchies.application.app-admin");
                assert!(*references > 3);
            }
            other => panic!("unexpected issue: {}", other),
        }
    }

    #[test]
    fn test_cycle_detection() {
        let policy = PolicyConfig::from_json(
            r#"{
                "roles": {"all_roles": {"a": "A", "b": "B", "c": "C"}},
                "hierarchies": {
                    "application": {"a": ["b"], "b": ["c"], "c": ["a"]},
                    "project": {"a": ["a"]}
                },
                "access_maps": {}
            }"#,
        )
        .unwrap();

        let cycles: Vec<String> = policy
            .validate()
            .into_iter()
            .filter(|i| matches!(i, PolicyIssue::HierarchyCycle { .. }))
            .map(|i| i.to_string())
            .collect();

        assert_eq!(
            cycles,
            vec![
                "cycle in application hierarchy: a -> b -> c -> a".to_string(),
                "cycle in project hierarchy: a -> a".to_string(),
            ]
        );
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let policy = PolicyConfig::from_json(
            r#"{
                "roles": {"all_roles": {"top": "", "left": "", "right": "", "bottom": ""}},
                "hierarchies": {
                    "application": {"top": ["left", "right"], "left": ["bottom"], "right": ["bottom"]}
                },
                "access_maps": {}
            }"#,
        )
        .unwrap();
        let issues = policy.validate();
        // the four empty access maps each carry an empty default_role
        assert!(issues.iter().all(|i| matches!(i, PolicyIssue::UnknownRole { role, .. } if role.is_empty())));
    }
}

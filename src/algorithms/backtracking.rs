//! Backtracking search for the timetabling problem.
//!
//! Optionally orders variables by Minimum Remaining Values, values by Least
//! Constraining Value, and prunes domains with forward checking.

use std::cmp::Reverse;

use crate::problems::timetable::Assignment;
use crate::problems::timetable::Domains;
use crate::problems::timetable::Timetable;
use crate::problems::timetable::Value;
use crate::problems::timetable::Variable;

/// Whether `var` → `value` can join `assignment`.
///
/// Rejects a room booked twice at the same time, and a teacher teaching twice
/// at the same time.
pub fn consistent(assignment: &Assignment, var: &Variable, value: &Value) -> bool {
    for (other_var, other_value) in assignment.iter() {
        if other_value.time == value.time && other_value.room == value.room {
            return false;
        }
        if other_var.teacher == var.teacher && other_value.time == value.time {
            return false;
        }
    }
    true
}

/// Whether `assignment` gives every variable a value without any pair
/// conflicting.
pub fn is_complete_and_consistent(variables: &[Variable], assignment: &Assignment) -> bool {
    if !variables.iter().all(|v| assignment.contains(v)) {
        return false;
    }
    let entries: Vec<_> = assignment.iter().collect();
    entries.iter().enumerate().all(|(i, (var, value))| {
        let mut others = Assignment::new();
        for (j, (other_var, other_value)) in entries.iter().enumerate() {
            if i != j {
                others.insert(*other_var, *other_value);
            }
        }
        consistent(&others, var, value)
    })
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BacktrackingConfig {
    /// Minimum Remaining Values variable ordering.
    pub mrv: bool,
    /// Least Constraining Value value ordering.
    pub lcv: bool,
    pub forward_checking: bool,
}

impl Default for BacktrackingConfig {
    fn default() -> Self {
        Self {
            mrv: true,
            lcv: true,
            forward_checking: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktrackOutcome {
    pub solution: Option<Assignment>,
    /// Recursive calls made, one per call regardless of its outcome.
    pub nodes: u64,
    /// Values tried that did not lead to a solution, inconsistent ones
    /// included.
    pub backtracks: u64,
}

fn select_variable(
    variables: &[Variable],
    domains: &Domains,
    assignment: &Assignment,
    mrv: bool,
) -> Option<Variable> {
    let mut unassigned = variables.iter().filter(|v| !assignment.contains(v));
    if mrv {
        unassigned
            .min_by_key(|v| domains.get(*v).map_or(0, Vec::len))
            .copied()
    } else {
        unassigned.next().copied()
    }
}

/// Candidate values for `var`, most permissive first when `lcv` is set.
///
/// The score of a value counts every variable, assigned or not, that could
/// still take it.
fn order_values(
    variables: &[Variable],
    domains: &Domains,
    assignment: &Assignment,
    var: &Variable,
    lcv: bool,
) -> Vec<Value> {
    let mut values = domains.get(var).cloned().unwrap_or_default();
    if lcv {
        values.sort_by_cached_key(|value| {
            Reverse(
                variables
                    .iter()
                    .filter(|v| consistent(assignment, v, value))
                    .count(),
            )
        });
    }
    values
}

/// Keeps only the values still consistent with `assignment` on every
/// unassigned variable.
fn forward_check(variables: &[Variable], domains: &mut Domains, assignment: &Assignment) {
    for v in variables.iter().filter(|v| !assignment.contains(v)) {
        if let Some(domain) = domains.get_mut(v) {
            domain.retain(|value| consistent(assignment, v, value));
        }
    }
}

/// Recursive backtracking search.
///
/// Every branch works on its own copy of `assignment` and `domains`.
pub fn backtrack(
    variables: &[Variable],
    domains: &Domains,
    assignment: &Assignment,
    config: BacktrackingConfig,
) -> BacktrackOutcome {
    if variables.iter().all(|v| assignment.contains(v)) {
        return BacktrackOutcome {
            solution: Some(assignment.clone()),
            nodes: 1,
            backtracks: 0,
        };
    }

    let mut nodes = 1u64;
    let mut backtracks = 0u64;

    let Some(var) = select_variable(variables, domains, assignment, config.mrv) else {
        unreachable!("Incomplete assignments have unassigned variables");
    };

    for value in order_values(variables, domains, assignment, &var, config.lcv) {
        if consistent(assignment, &var, &value) {
            let local_assignment = assignment.with(var, value);
            let mut local_domains = domains.clone();
            if config.forward_checking {
                forward_check(variables, &mut local_domains, &local_assignment);
            }

            let outcome = backtrack(variables, &local_domains, &local_assignment, config);
            nodes += outcome.nodes;
            backtracks += outcome.backtracks;

            if outcome.solution.is_some() {
                return BacktrackOutcome {
                    solution: outcome.solution,
                    nodes,
                    backtracks,
                };
            }
        }
        backtracks += 1;
    }

    BacktrackOutcome {
        solution: None,
        nodes,
        backtracks,
    }
}

/// Solves `timetable` from an empty assignment.
pub fn solve(timetable: &Timetable, config: BacktrackingConfig) -> BacktrackOutcome {
    let outcome = backtrack(
        timetable.variables(),
        timetable.domains(),
        &Assignment::new(),
        config,
    );
    log::debug!(
        "Backtracking {:?}: {} in {} nodes with {} backtracks",
        config,
        if outcome.solution.is_some() {
            "solved"
        } else {
            "failed"
        },
        outcome.nodes,
        outcome.backtracks
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::problems::timetable::TEACHER_SUBJECT;

    const NO_FC: BacktrackingConfig = BacktrackingConfig {
        mrv: true,
        lcv: true,
        forward_checking: false,
    };
    const FC: BacktrackingConfig = BacktrackingConfig {
        mrv: true,
        lcv: true,
        forward_checking: true,
    };

    fn var(teacher: &'static str, subject: &'static str) -> Variable {
        Variable { teacher, subject }
    }
    fn val(time: &'static str, room: &'static str) -> Value {
        Value { time, room }
    }

    fn all_configs() -> Vec<BacktrackingConfig> {
        let mut configs = vec![];
        for mrv in [false, true] {
            for lcv in [false, true] {
                for forward_checking in [false, true] {
                    configs.push(BacktrackingConfig {
                        mrv,
                        lcv,
                        forward_checking,
                    });
                }
            }
        }
        configs
    }

    #[test]
    fn room_double_booking() {
        let asg = Assignment::new().with(var("T1", "Math"), val("Mon9", "R1"));
        assert!(!consistent(&asg, &var("T2", "Physics"), &val("Mon9", "R1")));
        assert!(consistent(&asg, &var("T2", "Physics"), &val("Mon9", "R2")));
        assert!(consistent(&asg, &var("T2", "Physics"), &val("Mon10", "R1")));
    }

    #[test]
    fn teacher_double_booking() {
        let asg = Assignment::new().with(var("T1", "Math"), val("Mon9", "R1"));
        // Same teacher, same time, different room.
        assert!(!consistent(&asg, &var("T1", "CS"), &val("Mon9", "R2")));
        assert!(consistent(&asg, &var("T1", "CS"), &val("Tue9", "R2")));
    }

    #[test]
    fn empty_assignment_accepts_anything() {
        assert!(consistent(
            &Assignment::new(),
            &var("T1", "Math"),
            &val("Mon9", "R1")
        ));
    }

    #[test]
    fn room_rule_is_symmetric() {
        let t = Timetable::standard();
        let values = &t.domains()[&t.variables()[0]];
        let (a, b) = (t.variables()[0], t.variables()[1]);
        for x in values {
            for y in values {
                let a_first = consistent(&Assignment::new().with(a, *x), &b, y);
                let b_first = consistent(&Assignment::new().with(b, *y), &a, x);
                assert_eq!(a_first, b_first, "{x} vs {y}");
            }
        }
    }

    #[test]
    fn standard_problem_both_configurations() {
        let t = Timetable::standard();
        let without = solve(&t, NO_FC);
        let with = solve(&t, FC);

        let expected = Assignment::new()
            .with(var("T1", "Math"), val("Mon9", "R1"))
            .with(var("T2", "Physics"), val("Mon10", "R1"))
            .with(var("T3", "CS"), val("Tue9", "R1"));

        for outcome in [&without, &with] {
            assert_eq!(outcome.solution.as_ref(), Some(&expected));
            assert_eq!(outcome.nodes, 4);
            assert_eq!(outcome.backtracks, 0);
        }
        assert!(with.nodes <= without.nodes);
    }

    #[test]
    fn solutions_are_consistent() {
        let t = Timetable::standard();
        for config in all_configs() {
            let outcome = solve(&t, config);
            let solution = outcome.solution.expect("satisfiable");
            assert!(is_complete_and_consistent(t.variables(), &solution));
        }
    }

    #[test]
    fn forward_checking_never_expands_more() {
        let problems = [
            Timetable::standard(),
            Timetable::new(&TEACHER_SUBJECT, &["Mon9", "Mon10"], &["R1", "R2"]),
            Timetable::new(&TEACHER_SUBJECT, &["Mon9"], &["R1", "R2", "R3"]),
            Timetable::new(&TEACHER_SUBJECT, &["Mon9", "Mon10"], &["R1"]),
            Timetable::new(&TEACHER_SUBJECT, &["Mon9"], &["R1", "R2"]),
        ];
        for t in &problems {
            for (mrv, lcv) in [(false, false), (false, true), (true, false), (true, true)] {
                let without = solve(
                    t,
                    BacktrackingConfig {
                        mrv,
                        lcv,
                        forward_checking: false,
                    },
                );
                let with = solve(
                    t,
                    BacktrackingConfig {
                        mrv,
                        lcv,
                        forward_checking: true,
                    },
                );
                assert_eq!(with.solution.is_some(), without.solution.is_some());
                assert!(with.nodes <= without.nodes, "{t:?} mrv={mrv} lcv={lcv}");
            }
        }
    }

    #[test]
    fn unsatisfiable() {
        // Three lessons, two (time, room) slots.
        let t = Timetable::new(&TEACHER_SUBJECT, &["Mon9"], &["R1", "R2"]);
        for config in all_configs() {
            let outcome = solve(&t, config);
            assert_eq!(outcome.solution, None);
            // Every failed call but the root was a value tried by its parent.
            assert!(outcome.backtracks >= outcome.nodes - 1, "{config:?}");
        }
    }

    #[test]
    fn unsatisfiable_counts() {
        let t = Timetable::new(&TEACHER_SUBJECT, &["Mon9"], &["R1", "R2"]);

        // Root tries 2 values, each child tries 2 values with 1 consistent,
        // and each grandchild finds no consistent value among 2.
        let without = solve(&t, NO_FC);
        assert_eq!(without.nodes, 5);
        assert_eq!(without.backtracks, 10);

        // Forward checking leaves the last lesson an empty domain.
        let with = solve(&t, FC);
        assert_eq!(with.nodes, 5);
        assert_eq!(with.backtracks, 4);
    }

    #[test]
    fn empty_problem_is_solved() {
        let t = Timetable::new(&[], &["Mon9"], &["R1"]);
        let outcome = solve(&t, NO_FC);
        assert_eq!(outcome.solution, Some(Assignment::new()));
        assert_eq!(outcome.nodes, 1);
    }

    #[test]
    fn counts_inconsistent_values_as_backtracks() {
        let t = Timetable::standard();
        let t1 = var("T1", "Math");
        let t2 = var("T2", "Physics");
        // T1 and T2 already hold both Mon9 rooms. T3's domain order puts
        // those first, so without LCV they are skipped as backtracks.
        let asg = Assignment::new()
            .with(t1, val("Mon9", "R1"))
            .with(t2, val("Mon9", "R2"));
        let config = BacktrackingConfig {
            mrv: false,
            lcv: false,
            forward_checking: false,
        };
        let outcome = backtrack(t.variables(), t.domains(), &asg, config);
        assert_eq!(
            outcome.solution.unwrap().get(&var("T3", "CS")),
            Some(&val("Mon10", "R1"))
        );
        assert_eq!(outcome.nodes, 2);
        assert_eq!(outcome.backtracks, 2);
    }

    #[test]
    fn mrv_picks_smallest_domain() {
        let t = Timetable::standard();
        let t1 = var("T1", "Math");
        let t3 = var("T3", "CS");
        let mut domains = t.domains().clone();
        domains.get_mut(&t3).unwrap().truncate(1);

        let asg = Assignment::new();
        assert_eq!(
            select_variable(t.variables(), &domains, &asg, true),
            Some(t3)
        );
        assert_eq!(
            select_variable(t.variables(), &domains, &asg, false),
            Some(t1)
        );
    }

    #[test]
    fn mrv_ties_follow_declaration_order() {
        let t = Timetable::standard();
        let t1 = var("T1", "Math");
        let t2 = var("T2", "Physics");
        let t3 = var("T3", "CS");

        // All domains have the same size.
        assert_eq!(
            select_variable(t.variables(), t.domains(), &Assignment::new(), true),
            Some(t1)
        );

        let mut domains = t.domains().clone();
        domains.get_mut(&t2).unwrap().truncate(2);
        domains.get_mut(&t3).unwrap().truncate(2);
        let asg = Assignment::new().with(t1, val("Mon9", "R1"));
        assert_eq!(
            select_variable(t.variables(), &domains, &asg, true),
            Some(t2)
        );
    }

    #[test]
    fn mrv_prunes_the_search() {
        let t1 = var("T1", "Math");
        let t2 = var("T2", "Physics");
        let t3 = var("T3", "CS");
        let variables = [t1, t2, t3];
        let [a, b, c] = [val("Mon9", "R1"), val("Mon10", "R1"), val("Tue9", "R1")];
        // T3 can only take `a`, which declaration order tries last.
        let domains: Domains = [(t1, vec![a, b, c]), (t2, vec![a, b, c]), (t3, vec![a])]
            .into_iter()
            .collect();
        let config = |mrv| BacktrackingConfig {
            mrv,
            lcv: false,
            forward_checking: false,
        };

        let plain = backtrack(&variables, &domains, &Assignment::new(), config(false));
        let mrv = backtrack(&variables, &domains, &Assignment::new(), config(true));
        for outcome in [&plain, &mrv] {
            let solution = outcome.solution.as_ref().unwrap();
            assert_eq!(solution.get(&t1), Some(&b));
            assert_eq!(solution.get(&t2), Some(&c));
            assert_eq!(solution.get(&t3), Some(&a));
        }
        assert_eq!((plain.nodes, plain.backtracks), (8, 9));
        assert_eq!((mrv.nodes, mrv.backtracks), (4, 3));
    }
}

//! A toy timetabling constraint problem.
//!
//! Every teacher teaches a single subject, and each (teacher, subject) lesson
//! needs a time slot and a room.

use derive_more::Display;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

pub const TEACHER_SUBJECT: [(&str, &str); 3] = [("T1", "Math"), ("T2", "Physics"), ("T3", "CS")];
pub const ROOMS: [&str; 2] = ["R1", "R2"];
pub const TIMES: [&str; 4] = ["Mon9", "Mon10", "Tue9", "Tue10"];

/// A lesson to schedule.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("({teacher}, {subject})")]
pub struct Variable {
    pub teacher: &'static str,
    pub subject: &'static str,
}

/// When and where a lesson happens.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("({time}, {room})")]
pub struct Value {
    pub time: &'static str,
    pub room: &'static str,
}

pub type Domain = Vec<Value>;
pub type Domains = FxHashMap<Variable, Domain>;

/// Variable assignments in the order they were made.
///
/// Cheap to copy for the small problems solved here, which is what every
/// branch of the search does.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignment {
    entries: SmallVec<[(Variable, Value); 8]>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, var: &Variable) -> Option<&Value> {
        self.entries
            .iter()
            .find_map(|(v, value)| (v == var).then_some(value))
    }
    pub fn contains(&self, var: &Variable) -> bool {
        self.get(var).is_some()
    }

    /// Assigns `value` to `var`, replacing any previous value.
    pub fn insert(&mut self, var: Variable, value: Value) {
        match self.entries.iter_mut().find(|(v, _)| *v == var) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((var, value)),
        }
    }

    /// A copy of this assignment extended with `var` → `value`.
    #[must_use]
    pub fn with(&self, var: Variable, value: Value) -> Self {
        let mut extended = self.clone();
        extended.insert(var, value);
        extended
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Variable, Value)> {
        self.entries.iter()
    }
}

impl std::fmt::Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (var, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{var}: {value}")?;
        }
        write!(f, "}}")
    }
}

/// Variables in declaration order together with their domains.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timetable {
    variables: Vec<Variable>,
    domains: Domains,
}

impl Timetable {
    /// Builds one variable per (teacher, subject) pair, all sharing the full
    /// time × room domain (time-major).
    pub fn new(
        teacher_subject: &[(&'static str, &'static str)],
        times: &[&'static str],
        rooms: &[&'static str],
    ) -> Self {
        let variables: Vec<Variable> = teacher_subject
            .iter()
            .map(|&(teacher, subject)| Variable { teacher, subject })
            .collect();
        let domain: Domain = times
            .iter()
            .flat_map(|&time| rooms.iter().map(move |&room| Value { time, room }))
            .collect();
        let domains = variables
            .iter()
            .map(|&var| (var, domain.clone()))
            .collect();

        Self { variables, domains }
    }

    /// The 3 teachers, 2 rooms and 4 time slots problem.
    pub fn standard() -> Self {
        Self::new(&TEACHER_SUBJECT, &TIMES, &ROOMS)
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }
    pub fn domains(&self) -> &Domains {
        &self.domains
    }
}

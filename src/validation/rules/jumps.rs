//! Validation rule for JUMP / `-to` coverage of the TOA set.
//!
//! Every group of TOAs in a partition must carry its own JUMP (or `-to`
//! offsets), except for exactly one unjumped reference group. Without that
//! reference the offsets are degenerate with the overall phase; with more
//! than one, systematic offsets between instruments go unmodelled.

use crate::store::{JumpKind, JumpParam, TimingModel, Toa, ToaTable};
use crate::validation::checker::Rule;
use crate::validation::error::{Violation, ViolationKind};
use log::info;
use serde::{Serialize, Deserialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// One or more TOA flags whose combined values define a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "KeySpec", into = "Vec<String>")]
pub struct PartitionKey(SmallVec<[String; 2]>);

/// Accepts `"f"` as well as `["fe", "be"]` in configuration files.
#[derive(Deserialize)]
#[serde(untagged)]
enum KeySpec {
    One(String),
    Many(Vec<String>),
}

impl From<KeySpec> for PartitionKey {
    fn from(spec: KeySpec) -> Self {
        match spec {
            KeySpec::One(flag) => PartitionKey::new([flag]),
            KeySpec::Many(flags) => PartitionKey::new(flags),
        }
    }
}

impl From<PartitionKey> for Vec<String> {
    fn from(key: PartitionKey) -> Self { key.0.into_vec() }
}

impl From<&str> for PartitionKey {
    fn from(flag: &str) -> Self { PartitionKey::new([flag]) }
}

impl PartitionKey {
    pub fn new<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            flags
                .into_iter()
                .map(|f| f.into().trim_start_matches('-').to_string())
                .collect(),
        )
    }

    pub fn flags(&self) -> &[String] { &self.0 }

    fn group_of<'t>(&self, toa: &'t Toa) -> GroupKey<'t> {
        self.0.iter().map(|f| toa.flag(f)).collect()
    }

    fn describe(&self, group: &GroupKey<'_>) -> String {
        let parts: Vec<String> = self
            .0
            .iter()
            .zip(group)
            .map(|(flag, value)| format!("{}={}", flag, value.unwrap_or("<absent>")))
            .collect();
        format!("({})", parts.join(", "))
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

/// Options for `JumpChecker`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Each key is checked independently; all must form a valid partition.
    pub keys: Vec<PartitionKey>,
}

impl JumpConfig {
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<PartitionKey>,
    {
        Self { keys: keys.into_iter().map(Into::into).collect() }
    }
}

/// Partition by `-f`, and by the receiver/backend combination.
impl Default for JumpConfig {
    fn default() -> Self {
        Self { keys: vec![PartitionKey::new(["f"]), PartitionKey::new(["fe", "be"])] }
    }
}

/// Flag values of one group; `None` marks an absent flag.
type GroupKey<'t> = SmallVec<[Option<&'t str>; 2]>;

/// What offsets a single TOA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Binding {
    /// Index into the JUMPs of the kind being checked.
    Jump(usize),
    /// A `-to` flag on the TOA itself.
    Offset,
}

type Bindings = SmallVec<[Binding; 2]>;

#[derive(Debug, PartialEq)]
enum GroupCoverage {
    Uncovered,
    Covered(Binding),
    Partial { bound: usize },
    Multiple(BTreeSet<Binding>),
}

fn classify(members: &[usize], bindings: &[Bindings]) -> GroupCoverage {
    let bound = members.iter().filter(|&&i| !bindings[i].is_empty()).count();
    if bound == 0 {
        return GroupCoverage::Uncovered;
    }
    if bound < members.len() {
        return GroupCoverage::Partial { bound };
    }
    let distinct: BTreeSet<Binding> = members.iter().flat_map(|&i| bindings[i].iter().copied()).collect();
    let stacked = members.iter().any(|&i| bindings[i].len() > 1);
    let only = distinct.iter().next().copied();
    match only {
        Some(b) if distinct.len() == 1 && !stacked => GroupCoverage::Covered(b),
        _ => GroupCoverage::Multiple(distinct),
    }
}

pub struct JumpChecker<'a> {
    model: &'a TimingModel,
    toas: &'a ToaTable,
}

impl<'a> JumpChecker<'a> {
    pub fn new(model: &'a TimingModel, toas: &'a ToaTable) -> Self {
        Self { model, toas }
    }

    /// Runs the coverage check for one kind of offset parameter.
    fn evaluate_kind(&self, kind: JumpKind, config: &JumpConfig, out: &mut Vec<Violation>) {
        let jumps: Vec<&JumpParam> = self.model.jumps(kind).collect();
        // `-to` offsets stand in for phase JUMPs only.
        let offsets = kind == JumpKind::Phase;

        let bindings: Vec<Bindings> = self
            .toas
            .iter()
            .map(|toa| {
                let mut b: Bindings = jumps
                    .iter()
                    .enumerate()
                    .filter(|(_, j)| j.selector.selects(toa))
                    .map(|(i, _)| Binding::Jump(i))
                    .collect();
                if offsets && toa.has_offset() {
                    b.push(Binding::Offset);
                }
                b
            })
            .collect();

        for (i, jump) in jumps.iter().enumerate() {
            let used = bindings.iter().any(|b| b.contains(&Binding::Jump(i)));
            if !used && !jump.frozen {
                out.push(Violation::new(
                    ViolationKind::Coverage,
                    jump.name.as_str(),
                    format!("{} '{}' = '{}' has 0 TOAs but is not frozen", kind, jump.name, jump.selector),
                ));
            }
        }

        if self.toas.is_empty() {
            return;
        }
        for key in &config.keys {
            if let Some(v) = self.check_partition(kind, key, &jumps, &bindings) {
                out.push(v);
            }
        }
    }

    fn check_partition(
        &self,
        kind: JumpKind,
        key: &PartitionKey,
        jumps: &[&JumpParam],
        bindings: &[Bindings],
    ) -> Option<Violation> {
        // 1. Group TOA indices by their flag values.
        let mut groups: BTreeMap<GroupKey<'_>, Vec<usize>> = BTreeMap::new();
        for (i, toa) in self.toas.iter().enumerate() {
            groups.entry(key.group_of(toa)).or_default().push(i);
        }
        if groups.len() == 1 && groups.keys().all(|g| g.iter().all(Option::is_none)) {
            info!("No TOA carries -{}; partition '{}' is a single group", key.flags().join(" or -"), key);
            return None;
        }

        // 2. A named JUMP must stay within one group.
        let mut touched: BTreeMap<usize, usize> = BTreeMap::new();
        for members in groups.values() {
            let in_group: BTreeSet<usize> = members
                .iter()
                .flat_map(|&i| bindings[i].iter())
                .filter_map(|b| match b {
                    Binding::Jump(j) => Some(*j),
                    Binding::Offset => None,
                })
                .collect();
            for j in in_group {
                *touched.entry(j).or_insert(0) += 1;
            }
        }
        let shared: BTreeSet<usize> = touched.into_iter().filter(|&(_, n)| n > 1).map(|(j, _)| j).collect();

        // 3. Classify every group.
        let name = |b: &Binding| match b {
            Binding::Jump(j) => jumps[*j].name.clone(),
            Binding::Offset => "-to".to_string(),
        };
        let mut reference = Vec::new();
        let mut problems = Vec::new();
        for (group, members) in &groups {
            let label = key.describe(group);
            match classify(members, bindings) {
                GroupCoverage::Uncovered => reference.push((label, members.len())),
                GroupCoverage::Covered(Binding::Jump(j)) if shared.contains(&j) => problems.push(format!(
                    "{} shares {} '{}' with another group",
                    label, kind, jumps[j].name
                )),
                GroupCoverage::Covered(_) => {}
                GroupCoverage::Partial { bound } => problems.push(format!(
                    "{} has {} of {} TOAs covered",
                    label, bound, members.len()
                )),
                GroupCoverage::Multiple(all) => problems.push(format!(
                    "{} is covered by more than one binding ({})",
                    label,
                    all.iter().map(&name).collect::<Vec<_>>().join(", ")
                )),
            }
        }

        // 4. Exactly one reference group.
        match reference.len() {
            0 => problems.push(format!(
                "no group is left without a {}{} as the reference",
                kind,
                if kind == JumpKind::Phase { " or -to flag" } else { "" }
            )),
            1 => {}
            _ => problems.push(format!(
                "{} groups are not covered ({}); only one reference group is allowed",
                reference.len(),
                reference.iter().map(|(l, _)| l.as_str()).collect::<Vec<_>>().join(", ")
            )),
        }

        if problems.is_empty() {
            let (label, count) = &reference[0];
            info!(
                "{} TOAs are not covered by {}s, and form the reference group {} for '{}'",
                count, kind, label, key
            );
            return None;
        }
        Some(Violation::new(
            ViolationKind::Coverage,
            key.to_string(),
            format!("{} coverage by '{}' is invalid: {}", kind, key, problems.join("; ")),
        ))
    }
}

impl Rule for JumpChecker<'_> {
    type Config = JumpConfig;
    const NAME: &'static str = "JumpChecker";

    fn evaluate(&self, config: &JumpConfig) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.evaluate_kind(JumpKind::Phase, config, &mut violations);
        if self.toas.is_wideband() {
            self.evaluate_kind(JumpKind::Dispersion, config, &mut violations);
        }
        violations
    }
}

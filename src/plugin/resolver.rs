//! Dependency-aware activation
//!
//! Candidates are activated in layered passes. Each pass walks the pending
//! set in order and either activates a candidate immediately or defers it to
//! the next pass:
//!
//! 1. Hard dependencies, first unsatisfied one wins. If that dependency
//!    refers back to the candidate the cycle is broken by activating the
//!    candidate now; otherwise the candidate is deferred.
//! 2. Soft dependencies, by name. Names that match no candidate are ignored.
//!    A matching dependency that refers back breaks the cycle; one that is
//!    not active yet defers the candidate.
//! 3. Anything else is activated.
//!
//! Activations take effect immediately, so a dependency activated earlier in
//! a pass satisfies candidates later in the same pass.
//!
//! Only the first unsatisfied hard dependency is examined per pass. With
//! [`CycleDetection::Direct`] a cycle is only recognised when the dependency
//! names the candidate directly; longer cycles (A -> B -> C -> A) stall
//! instead of being broken. [`CycleDetection::Transitive`] follows
//! dependency chains to any depth.
//!
//! A pass that removes nothing from the pending set ends resolution and
//! the remaining candidates are reported as stalled.

use crate::notifications::api::{LifecycleEvent, LifecycleEventBus};
use crate::plugin::error::PluginError;
use crate::plugin::registry::ActivationRegistry;
use crate::plugin::types::PluginDescriptor;
use serde::Deserialize;
use std::collections::HashSet;

/// How far the cycle check follows dependency references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CycleDetection {
    /// Only a direct reference back to the candidate counts as a cycle
    #[default]
    Direct,
    /// Any chain of hard or soft references back to the candidate counts
    Transitive,
}

/// A candidate that could not be activated
#[derive(Debug, Clone, PartialEq)]
pub struct FailedActivation {
    pub name: String,
    pub error: PluginError,
}

/// A candidate left waiting when resolution stopped making progress
#[derive(Debug, Clone, PartialEq)]
pub struct StalledCandidate {
    pub name: String,
    pub unmet_hard: Vec<String>,
    pub unmet_soft: Vec<String>,
}

/// Summary of one resolution run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionReport {
    /// Candidate names in activation order
    pub activated: Vec<String>,
    pub failed: Vec<FailedActivation>,
    pub stalled: Vec<StalledCandidate>,
    pub cycles_broken: usize,
    pub passes: usize,
}

impl ResolutionReport {
    /// True when every candidate was either activated or failed on its own
    pub fn is_complete(&self) -> bool {
        self.stalled.is_empty()
    }
}

enum Decision {
    Activate,
    BreakCycle { dependency: String },
    Defer { waiting_on: String },
}

pub struct DependencyResolver {
    cycle_detection: CycleDetection,
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new(CycleDetection::Direct)
    }
}

impl DependencyResolver {
    pub fn new(cycle_detection: CycleDetection) -> Self {
        Self { cycle_detection }
    }

    pub fn cycle_detection(&self) -> CycleDetection {
        self.cycle_detection
    }

    /// Activate `candidates` into `registry`, raising a detached
    /// `PluginInitialized` event on `bus` for each activation.
    ///
    /// Candidates whose type is already in the registry are skipped, so
    /// running resolution twice never activates a type twice.
    pub async fn resolve(
        &self,
        candidates: &[PluginDescriptor],
        registry: &mut ActivationRegistry,
        bus: &LifecycleEventBus,
    ) -> ResolutionReport {
        let mut report = ResolutionReport::default();
        let mut pending: Vec<&PluginDescriptor> = candidates.iter().collect();

        while !pending.is_empty() {
            report.passes += 1;
            let before = pending.len();
            log::trace!("Resolution pass {} with {} pending", report.passes, before);

            pending = self
                .run_pass(candidates, pending, registry, bus, &mut report)
                .await;

            if pending.len() == before {
                report.stalled = self.diagnose_stall(candidates, &pending, registry);
                break;
            }
        }

        log::debug!(
            "Resolution finished after {} pass(es): {} activated, {} failed, {} stalled",
            report.passes,
            report.activated.len(),
            report.failed.len(),
            report.stalled.len()
        );
        report
    }

    async fn run_pass<'a>(
        &self,
        candidates: &'a [PluginDescriptor],
        pending: Vec<&'a PluginDescriptor>,
        registry: &mut ActivationRegistry,
        bus: &LifecycleEventBus,
        report: &mut ResolutionReport,
    ) -> Vec<&'a PluginDescriptor> {
        let mut deferred = Vec::new();

        for candidate in pending {
            if registry.is_active(&candidate.key) {
                log::debug!("Plugin '{}' is already active", candidate.name);
                continue;
            }

            match self.decide(candidate, candidates, registry) {
                Decision::Defer { waiting_on } => {
                    log::debug!(
                        "Deferring plugin '{}' until '{}' is active",
                        candidate.name,
                        waiting_on
                    );
                    deferred.push(candidate);
                }
                Decision::BreakCycle { dependency } => {
                    log::info!(
                        "Dependency cycle between '{}' and '{}'; activating '{}' first",
                        candidate.name,
                        dependency,
                        candidate.name
                    );
                    report.cycles_broken += 1;
                    self.activate(candidate, registry, bus, report).await;
                }
                Decision::Activate => self.activate(candidate, registry, bus, report).await,
            }
        }

        deferred
    }

    fn decide(
        &self,
        candidate: &PluginDescriptor,
        candidates: &[PluginDescriptor],
        registry: &ActivationRegistry,
    ) -> Decision {
        if let Some(dependency) = candidate
            .hard_dependencies
            .iter()
            .find(|key| !registry.is_active(key))
        {
            let known = candidates.iter().find(|c| c.key == *dependency);
            return match known {
                Some(dep) if self.refers_back(dep, candidate, candidates) => Decision::BreakCycle {
                    dependency: dep.name.clone(),
                },
                Some(dep) => Decision::Defer {
                    waiting_on: dep.name.clone(),
                },
                None => Decision::Defer {
                    waiting_on: dependency.short_name().to_string(),
                },
            };
        }

        for name in &candidate.soft_dependencies {
            let Some(dep) = candidates.iter().find(|c| &c.name == name) else {
                continue;
            };
            let active = registry.is_active(&dep.key);
            if self.refers_back(dep, candidate, candidates) {
                if active {
                    return Decision::Activate;
                }
                return Decision::BreakCycle {
                    dependency: dep.name.clone(),
                };
            }
            if !active {
                return Decision::Defer {
                    waiting_on: dep.name.clone(),
                };
            }
        }

        Decision::Activate
    }

    /// Whether `from` depends on `target`, directly or (in transitive mode)
    /// through other candidates
    fn refers_back(
        &self,
        from: &PluginDescriptor,
        target: &PluginDescriptor,
        candidates: &[PluginDescriptor],
    ) -> bool {
        match self.cycle_detection {
            CycleDetection::Direct => from.references(target),
            CycleDetection::Transitive => {
                let mut visited: HashSet<&str> = HashSet::new();
                let mut stack = vec![from];
                while let Some(current) = stack.pop() {
                    if current.references(target) {
                        return true;
                    }
                    if !visited.insert(current.name.as_str()) {
                        continue;
                    }
                    stack.extend(candidates.iter().filter(|c| {
                        !visited.contains(c.name.as_str())
                            && (current.hard_dependencies.contains(&c.key)
                                || current.soft_dependencies.contains(&c.name))
                    }));
                }
                false
            }
        }
    }

    async fn activate(
        &self,
        candidate: &PluginDescriptor,
        registry: &mut ActivationRegistry,
        bus: &LifecycleEventBus,
        report: &mut ResolutionReport,
    ) {
        // subscriptions made in on_enable only reach the bus once the plugin
        // is recorded
        let result = match candidate.instantiate() {
            Ok(plugin) => {
                let staged = bus.stage();
                plugin.on_enable(&staged).await.map(|()| (plugin, staged))
            }
            Err(e) => Err(e),
        };

        let (plugin, staged) = match result {
            Ok(enabled) => enabled,
            Err(e) => {
                log::error!("Plugin '{}' could not be activated: {}", candidate.name, e);
                report.failed.push(FailedActivation {
                    name: candidate.name.clone(),
                    error: e,
                });
                return;
            }
        };

        let recorded = registry.record(candidate.key, candidate.name.clone(), plugin.clone());
        let display_name = match recorded {
            Ok(record) => record.display_name.clone(),
            Err(e) => {
                log::error!("Plugin '{}' could not be recorded: {}", candidate.name, e);
                report.failed.push(FailedActivation {
                    name: candidate.name.clone(),
                    error: e,
                });
                return;
            }
        };

        let subscriptions = bus.commit(staged);
        log::trace!("Plugin '{}' subscribed {} listener(s)", candidate.name, subscriptions);
        log::info!("Loading plugin {}", display_name);
        report.activated.push(candidate.name.clone());

        let event = LifecycleEvent::PluginInitialized {
            name: candidate.name.clone(),
            plugin,
        };
        if let Err(e) = bus.publish_detached(event).await {
            log::warn!("PluginInitialized for '{}': {}", candidate.name, e);
        }
    }

    fn diagnose_stall(
        &self,
        candidates: &[PluginDescriptor],
        pending: &[&PluginDescriptor],
        registry: &ActivationRegistry,
    ) -> Vec<StalledCandidate> {
        pending
            .iter()
            .map(|candidate| {
                let unmet_hard: Vec<String> = candidate
                    .hard_dependencies
                    .iter()
                    .filter(|key| !registry.is_active(key))
                    .map(|key| {
                        candidates
                            .iter()
                            .find(|c| c.key == *key)
                            .map_or_else(|| key.short_name().to_string(), |c| c.name.clone())
                    })
                    .collect();
                let unmet_soft: Vec<String> = candidate
                    .soft_dependencies
                    .iter()
                    .filter(|name| {
                        candidates
                            .iter()
                            .any(|c| &c.name == *name && !registry.is_active(&c.key))
                    })
                    .cloned()
                    .collect();

                log::warn!(
                    "Plugin '{}' cannot be activated: waiting on hard {:?}, soft {:?}",
                    candidate.name,
                    unmet_hard,
                    unmet_soft
                );
                StalledCandidate {
                    name: candidate.name.clone(),
                    unmet_hard,
                    unmet_soft,
                }
            })
            .collect()
    }
}

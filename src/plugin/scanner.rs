//! Candidate scanning
//!
//! Narrows the discovered descriptors down to the candidates the resolver
//! will consider. Each rejection is logged once and the scan continues.

use crate::core::version;
use crate::plugin::error::PluginError;
use crate::plugin::types::{PluginDescriptor, PluginKey};
use std::collections::HashSet;

/// Result of a scan: accepted candidates plus every rejection
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub candidates: Vec<PluginDescriptor>,
    pub rejected: Vec<(String, PluginError)>,
    pub excluded: Vec<String>,
}

pub struct CandidateScanner {
    host_api_version: u32,
    excluded_plugins: Vec<String>,
}

impl CandidateScanner {
    pub fn new(host_api_version: u32) -> Self {
        Self {
            host_api_version,
            excluded_plugins: Vec::new(),
        }
    }

    pub fn with_exclusions(mut self, excluded_plugins: Vec<String>) -> Self {
        self.excluded_plugins = excluded_plugins;
        self
    }

    /// Keep descriptors that are not excluded, are built for a compatible
    /// API, and are the first of their type. Input order is preserved.
    pub fn scan(&self, discovered: Vec<PluginDescriptor>) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        let mut seen: HashSet<PluginKey> = HashSet::new();

        for descriptor in discovered {
            if self.excluded_plugins.contains(&descriptor.name) {
                log::debug!("Plugin '{}' excluded by configuration", descriptor.name);
                outcome.excluded.push(descriptor.name);
                continue;
            }

            if let Err(e) = self.check_candidate(&descriptor, &seen) {
                log::warn!("Skipping plugin '{}': {}", descriptor.name, e);
                outcome.rejected.push((descriptor.name, e));
                continue;
            }

            seen.insert(descriptor.key);
            outcome.candidates.push(descriptor);
        }

        log::debug!(
            "Candidate scan: {} accepted, {} rejected, {} excluded",
            outcome.candidates.len(),
            outcome.rejected.len(),
            outcome.excluded.len()
        );
        outcome
    }

    fn check_candidate(
        &self,
        descriptor: &PluginDescriptor,
        seen: &HashSet<PluginKey>,
    ) -> Result<(), PluginError> {
        if !version::is_api_compatible(self.host_api_version, descriptor.api_version) {
            return Err(PluginError::VersionIncompatible {
                message: format!(
                    "Plugin '{}' has incompatible API version {} (expected major version {})",
                    descriptor.name,
                    descriptor.api_version,
                    version::major_version(self.host_api_version)
                ),
            });
        }

        if seen.contains(&descriptor.key) {
            return Err(PluginError::DuplicateCandidate {
                plugin_name: descriptor.name.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::tests::utils::{descriptor, A, B, C};

    const HOST_API: u32 = 20250727;

    #[test]
    fn test_all_valid_candidates_accepted_in_order() {
        let scanner = CandidateScanner::new(HOST_API);
        let outcome = scanner.scan(vec![
            descriptor::<C>("C"),
            descriptor::<A>("A"),
            descriptor::<B>("B"),
        ]);
        let names: Vec<_> = outcome.candidates.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn test_incompatible_api_version_rejected() {
        let scanner = CandidateScanner::new(HOST_API);
        let outcome = scanner.scan(vec![
            descriptor::<A>("A").with_api_version(20240101),
            descriptor::<B>("B"),
        ]);
        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].name, "B");
        assert!(matches!(
            outcome.rejected[0],
            (ref name, PluginError::VersionIncompatible { .. }) if name == "A"
        ));
    }

    #[test]
    fn test_duplicate_type_keeps_first() {
        let scanner = CandidateScanner::new(HOST_API);
        let outcome = scanner.scan(vec![descriptor::<A>("A"), descriptor::<A>("A-again")]);
        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].name, "A");
        assert_eq!(
            outcome.rejected[0].1,
            PluginError::DuplicateCandidate {
                plugin_name: "A-again".to_string()
            }
        );
    }

    #[test]
    fn test_excluded_names_are_dropped() {
        let scanner = CandidateScanner::new(HOST_API).with_exclusions(vec!["B".to_string()]);
        let outcome = scanner.scan(vec![descriptor::<A>("A"), descriptor::<B>("B")]);
        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.excluded, vec!["B".to_string()]);
        assert!(outcome.rejected.is_empty());
    }
}

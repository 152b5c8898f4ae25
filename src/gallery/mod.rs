//! # Bundled Examples
//!
//! Each file under `pages/` is one self-contained example: it builds its own
//! layout and callbacks and knows nothing about the shell or the other
//! examples. Component identifiers inside a page are written out in full
//! (`{file-stem}-x-{local}`) so the source shown in the code view reads the
//! same as the code that runs.
//!
//! Adding an example means adding a file and one `unit!` line below.

pub mod stats;

#[path = "pages/binomial-distribution.rs"]
pub mod binomial_distribution;
#[path = "pages/exponential-distribution.rs"]
pub mod exponential_distribution;
#[path = "pages/normal-distribution.rs"]
pub mod normal_distribution;
#[path = "pages/poisson-distribution.rs"]
pub mod poisson_distribution;
#[path = "pages/summary-statistics.rs"]
pub mod summary_statistics;

use crate::core::registry::ExampleUnit;

/// Pairs a page module with its file, embedding the file's text as the
/// displayed source.
macro_rules! unit {
    ($module:ident, $file:literal) => {
        ExampleUnit {
            path: concat!("pages/", $file),
            source: include_str!(concat!("pages/", $file)),
            build: $module::app,
        }
    };
}

/// Every bundled example.
pub fn units() -> Vec<ExampleUnit> {
    vec![
        unit!(binomial_distribution, "binomial-distribution.rs"),
        unit!(exponential_distribution, "exponential-distribution.rs"),
        unit!(normal_distribution, "normal-distribution.rs"),
        unit!(poisson_distribution, "poisson-distribution.rs"),
        unit!(summary_statistics, "summary-statistics.rs"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::callbacks::PropStore;
    use crate::core::dispatcher::Dispatcher;
    use crate::core::registry::Registry;

    #[test]
    fn test_units_have_distinct_identifiers() {
        let registry = Registry::build(units());
        assert_eq!(registry.len(), units().len());
        assert!(registry.contains("poisson-distribution"));
    }

    #[test]
    fn test_all_examples_compose() {
        let registry = Registry::build(units());
        let dispatcher = Dispatcher::from_registry(&registry).unwrap();
        for entry in registry.iter() {
            assert!(dispatcher.contains_namespace(&entry.id));
            for id in entry.layout.component_ids() {
                assert!(id.belongs_to(&entry.id), "{id} outside {}", entry.id);
            }
        }
    }

    #[test]
    fn test_every_example_loads_without_failures() {
        let registry = Registry::build(units());
        let dispatcher = Dispatcher::from_registry(&registry).unwrap();
        for entry in registry.iter() {
            let mut store = PropStore::new();
            entry.layout.seed(&mut store);
            let failures = dispatcher.load(&entry.id, &mut store);
            assert!(failures.is_empty(), "{}: {:?}", entry.id, failures);
            assert!(store.len() > entry.layout.defaults().len(), "{} produced no output", entry.id);
        }
    }

    #[test]
    fn test_sources_carry_namespaced_ids() {
        let registry = Registry::build(units());
        for entry in registry.iter() {
            let prefix = format!("\"{}-x-", entry.id);
            assert!(entry.source.contains(&prefix), "{} source lacks {prefix}", entry.id);
        }
    }
}

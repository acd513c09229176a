// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Auto-deploy Resolver
//!
//! A manifest-shape resolver for GitLab's `auto-deploy-app` Helm chart.
//!
//! ## Overview
//!
//! Given chart values and a release identity, the resolver decides which
//! Kubernetes manifests a conformant renderer must emit and what shape each
//! one has:
//!
//! - Names, labels and selectors of the main and worker deployments
//! - Probe defaults and per-worker probe overrides
//! - Service, ingress, autoscaler and database job gating
//! - Ingress annotations for TLS, `ModSecurity` and canary routing
//!
//! Rendering YAML and talking to a cluster are out of scope.
//!
//! ## Architecture
//!
//! 1. **Values**: values files and `--set` expressions are merged into one
//!    tree and coerced into [`config::ChartValues`]
//! 2. **Validation**: the release name is checked before anything else
//! 3. **Resolution**: [`resolver::ManifestResolver`] produces a
//!    [`resolver::ResolvedManifestSet`]
//!
//! ## Modules
//!
//! - [`config`]: Values parsing, coercion and validation
//! - [`resolver`]: Manifest intent resolution
//! - [`chart`]: Managed chart version and upgrade checks
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```
//! use auto_deploy_resolver::config::{Release, ValuesParser};
//! use auto_deploy_resolver::resolver::ManifestResolver;
//!
//! let sets = vec![String::from("workers.worker1.command[0]=echo")];
//! let values = ValuesParser::new().load_values(&[], &sets, &[])?;
//! let set = ManifestResolver::new().resolve(&values, &Release::new("production"))?;
//!
//! assert_eq!(set.workers[0].metadata.name, "production-worker1");
//! # Ok::<(), auto_deploy_resolver::AutoDeployError>(())
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod resolver;

// ============================================================================
// Re-exports
// ============================================================================

pub use chart::{ChartVersion, UpgradeCheck};
pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ChartValues, ConfigHasher, ConfigValidator, Release, ValuesParser};
pub use error::{AutoDeployError, Result};
pub use resolver::{ManifestResolver, ResolvedManifestSet};

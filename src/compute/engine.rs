use super::ledger::{ComputationError, Ledger};
use super::report::RunReport;
use crate::analysis::resolver::{resolve_required, ExecutionPlan, PlannedStep, ResolveError};
use crate::analysis::topology::downstream_from;
use crate::config::ProcessConfig;
use crate::node::DeriveArgs;
use crate::store::{Attribute, FlightInput, NodeRegistry, NodeValue, Parameter, RegistryError};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};

/// Everything produced for one flight.
#[derive(Debug, Clone)]
pub struct FlightResults {
    pub flight_id: String,
    pub ledger: Ledger,
    pub plan: ExecutionPlan,
    pub report: RunReport,
}

impl FlightResults {
    pub fn get(&self, name: &str) -> Option<&NodeValue> {
        self.ledger.value(name)
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.get(name)?.as_parameter()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.get(name)?.as_attribute()
    }

    pub fn error(&self, name: &str) -> Option<&ComputationError> {
        self.ledger.get(name)?.as_ref().err()
    }

    /// Produced values and the run report, for downstream persistence.
    pub fn to_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct Export<'a> {
            flight_id: &'a str,
            values: BTreeMap<&'a str, &'a NodeValue>,
            report: &'a RunReport,
        }
        serde_json::to_string_pretty(&Export {
            flight_id: &self.flight_id,
            values: self.ledger.available().collect(),
            report: &self.report,
        })
    }
}

/// Runs the registered nodes against flights.
///
/// The registry is shared read-only between flights; every flight gets its
/// own [`Ledger`], so flights never observe each other.
#[derive(Debug, Clone)]
pub struct FlightProcessor {
    registry: Arc<NodeRegistry>,
    config: ProcessConfig,
}

impl FlightProcessor {
    /// Validates the registry; a malformed registry is fatal.
    pub fn new(registry: NodeRegistry, config: ProcessConfig) -> Result<Self, RegistryError> {
        registry.validate()?;
        Ok(Self { registry: Arc::new(registry), config })
    }

    pub fn registry(&self) -> &NodeRegistry { &self.registry }

    pub fn config(&self) -> &ProcessConfig { &self.config }

    pub fn plan(&self, input: &FlightInput) -> Result<ExecutionPlan, ResolveError> {
        resolve_required(&self.registry, input.names(), &self.config.required_nodes)
    }

    pub fn process(&self, input: FlightInput) -> Result<FlightResults, ResolveError> {
        let span = info_span!("flight", id = %input.id);
        let _guard = span.enter();

        let plan = self.plan(&input)?;
        let flight_id = input.id.clone();
        let mut ledger = Ledger::from_input(input);
        let mut report = RunReport::new(&plan);

        for step in &plan.steps {
            let (inputs, outcome) = self.run_step(step, &ledger);
            match &outcome {
                Ok(value) => debug!(node = %step.name, value = %value.describe(), "Derived"),
                Err(ComputationError::NoResult { .. }) => info!(node = %step.name, "No result"),
                Err(e @ ComputationError::UpstreamUnavailable { .. }) => info!("{}", e),
                Err(e) => {
                    warn!("{}", e);
                    let affected = downstream_from(&plan, &[step.name.as_str()]);
                    if !affected.is_empty() {
                        debug!(node = %step.name, affected = ?affected, "Dependents will re-evaluate");
                    }
                }
            }
            report.record(&step.name, inputs, &outcome);
            ledger.insert(step.name.clone(), outcome);
        }

        info!("{}", report.summary());
        Ok(FlightResults { flight_id, ledger, plan, report })
    }

    /// Executes one planned step against the current ledger, returning the
    /// arguments actually supplied and the outcome.
    fn run_step(&self, step: &PlannedStep, ledger: &Ledger) -> (Vec<String>, Result<NodeValue, ComputationError>) {
        let registered = self.registry.get(step.node);
        let descriptor = &registered.descriptor;

        // Upstream nodes may have failed since planning.
        if descriptor
            .first_satisfied(&registered.combinations, |n| ledger.is_available(n))
            .is_none()
        {
            let missing = step.inputs.iter().filter(|n| !ledger.is_available(n)).cloned().collect();
            return (Vec::new(), Err(ComputationError::UpstreamUnavailable { node: step.name.clone(), missing }));
        }

        let args = DeriveArgs::collect(descriptor, |n| ledger.value(n));
        let inputs = args.present().into_iter().map(str::to_string).collect();
        let outcome = registered
            .node
            .derive(&args)
            .map_err(|source| ComputationError::DeriveFailed { node: step.name.clone(), source })
            .and_then(|output| match output.kind() {
                Some(found) if found != descriptor.kind => Err(ComputationError::KindMismatch {
                    node: step.name.clone(),
                    expected: descriptor.kind,
                    found,
                }),
                _ => output
                    .into_value(&step.name)
                    .ok_or_else(|| ComputationError::NoResult { node: step.name.clone() }),
            });
        (inputs, outcome)
    }

    /// Processes independent flights in parallel, one ledger per flight.
    /// Results are in input order.
    pub fn process_flights(&self, inputs: Vec<FlightInput>) -> Vec<Result<FlightResults, ResolveError>> {
        let run = || inputs.into_par_iter().map(|input| self.process(input)).collect::<Vec<_>>();
        match self.config.worker_threads {
            Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(run),
                Err(e) => {
                    warn!("Failed to build worker pool ({}), using the global pool", e);
                    run()
                }
            },
            None => run(),
        }
    }
}

use crate::analysis::resolver::UnresolvedReason;
use crate::compute::{ComputationError, FlightResults};
use std::collections::HashMap;
use std::fmt::Write;

/// Renders the derivation tree behind one value of a processed flight.
///
/// Each line shows the node, its outcome and where it came from; inputs are
/// expanded below it. A node already expanded higher up is shown as a
/// reference to that level instead of being repeated.
pub fn format_trace(results: &FlightResults, target: &str) -> String {
    let mut tracer = Tracer {
        results,
        visited_at_level: HashMap::new(),
        output: String::new(),
    };

    let _ = writeln!(tracer.output, "AUDIT TRACE for '{}' (flight '{}'):", target, results.flight_id);
    let _ = writeln!(tracer.output, "--------------------------------------------------");
    tracer.trace_node(target, 1, "");
    tracer.output
}

struct Tracer<'a> {
    results: &'a FlightResults,
    visited_at_level: HashMap<&'a str, usize>,
    output: String,
}

impl<'a> Tracer<'a> {
    fn trace_node(&mut self, name: &'a str, level: usize, prefix: &str) {
        if let Some(&first_seen) = self.visited_at_level.get(name) {
            let _ = writeln!(self.output, "{}-> (Ref to L{})", prefix, first_seen);
            return;
        }
        self.visited_at_level.insert(name, level);

        let line_header = format!("[L{}] {}{}", level, name, self.format_value(name));
        let results = self.results;
        let plan = &results.plan;

        if let Some(step) = plan.step(name) {
            let _ = writeln!(self.output, "{}{} <- Derived (pass {})", prefix, line_header, step.pass);
            // Prefer what the node actually received over what was planned.
            let inputs = results.report.inputs.get(name).map_or(step.inputs.as_slice(), Vec::as_slice);
            self.recurse_children(prefix, inputs, level);
        } else if let Some(unresolved) = plan.unresolved_node(name) {
            let why = match &unresolved.reason {
                UnresolvedReason::MissingDependencies { missing } => format!("missing {}", missing.join(", ")),
                UnresolvedReason::Cycle { members } => format!("cycle through {}", members.join(" -> ")),
            };
            let _ = writeln!(self.output, "{}{} <- Unresolved ({})", prefix, line_header, why);
        } else if results.ledger.get(name).is_some() {
            let _ = writeln!(self.output, "{}{} <- Recorded", prefix, line_header);
        } else {
            let _ = writeln!(self.output, "{}{} <- Unknown", prefix, line_header);
        }
    }

    fn recurse_children(&mut self, prefix: &str, children: &'a [String], level: usize) {
        let stem = self.build_child_stem(prefix);
        for (i, child) in children.iter().enumerate() {
            let connector = if i == children.len() - 1 { "`--" } else { "|--" };
            let full_prefix = format!("{}{}", stem, connector);
            self.trace_node(child, level + 1, &full_prefix);
        }
    }

    fn format_value(&self, name: &str) -> String {
        match self.results.ledger.get(name) {
            Some(Ok(v)) => format!(" [{}]", v.describe()),
            Some(Err(ComputationError::NoResult { .. })) => " [No result]".to_string(),
            Some(Err(e)) => format!(" [Err: {}]", e),
            None => String::new(),
        }
    }

    fn build_child_stem(&self, current_prefix: &str) -> String {
        current_prefix.replace("`--", "   ").replace("|--", "|  ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::FlightProcessor;
    use crate::config::ProcessConfig;
    use crate::node::{DerivedNode, FnNode, NodeDescriptor, NodeOutput};
    use crate::store::{FlightInput, NodeRegistry, Parameter, ValueKind};

    fn sum(name: &str, deps: &[&str]) -> impl DerivedNode + 'static {
        let descriptor = deps
            .iter()
            .fold(NodeDescriptor::parameter(name), |d, dep| d.requires(*dep, ValueKind::Parameter));
        FnNode::new(descriptor, |args| {
            let first = args.parameter(args.present()[0])?;
            Ok(NodeOutput::Parameter(first.series()))
        })
    }

    #[test]
    fn test_trace_shows_tree_and_references() {
        // Diamond: Raw -> B, Raw -> C, B + C -> D
        let mut reg = NodeRegistry::new();
        reg.register(sum("B", &["Raw"])).unwrap();
        reg.register(sum("C", &["Raw"])).unwrap();
        reg.register(sum("D", &["B", "C"])).unwrap();
        reg.register(sum("E", &["Missing"])).unwrap();
        let processor = FlightProcessor::new(reg, ProcessConfig::default()).unwrap();
        let input = FlightInput::new("trace").with_parameter(Parameter::new("Raw", vec![1.0, 2.0], 1.0, 0.0));
        let results = processor.process(input).unwrap();

        let trace = format_trace(&results, "D");
        assert!(trace.contains("[L1] D [1 Hz, 2 samples] <- Derived (pass 1)"), "{}", trace);
        assert!(trace.contains("|--[L2] B"), "{}", trace);
        assert!(trace.contains("`--[L2] C"), "{}", trace);
        assert!(trace.contains("[L3] Raw [1 Hz, 2 samples] <- Recorded"), "{}", trace);
        assert!(trace.contains("-> (Ref to L3)"), "{}", trace);

        let trace = format_trace(&results, "E");
        assert!(trace.contains("<- Unresolved (missing Missing)"), "{}", trace);
    }
}

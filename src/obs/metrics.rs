// self
use crate::obs::{FlowOutcome, RelayFlow};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(flow: RelayFlow, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"token_relay_flow_total",
			"flow" => flow.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (flow, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_flow_outcome_noop_without_metrics() {
		record_flow_outcome(RelayFlow::Grant, FlowOutcome::Failure);
	}
}

// self
use crate::obs::{RenewKind, RenewOutcome};

/// Records a renewal outcome via the global metrics recorder (when enabled).
pub fn record_renewal(kind: RenewKind, outcome: RenewOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"lease_renewer_renewal_total",
			"kind" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

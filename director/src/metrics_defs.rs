use shared::metrics_defs::{MetricDef, MetricType};

pub const ROUTE_DECISIONS: MetricDef = MetricDef {
    name: "route.decisions",
    metric_type: MetricType::Counter,
    description: "Routing decisions taken. \
        Tagged with status (200 on success, error status otherwise).",
};

pub const ROUTE_DURATION: MetricDef = MetricDef {
    name: "route.duration",
    metric_type: MetricType::Histogram,
    description: "Time to take a routing decision in seconds, including collaborator calls.",
};

pub const PROBE_FAILURES: MetricDef = MetricDef {
    name: "availability.probe.failures",
    metric_type: MetricType::Counter,
    description: "TCP availability probes that were refused or timed out",
};

pub const ALL_METRICS: &[MetricDef] = &[ROUTE_DECISIONS, ROUTE_DURATION, PROBE_FAILURES];

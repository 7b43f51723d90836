//! Reference column lists for the sweep table
//!
//! The sweep output references columns by the exact literal names the
//! simulation emits, including bracketed run/step markers and the two
//! expression-like reporter columns. Every stage intersects these lists with
//! the columns actually present; absent columns narrow the working set and
//! are never an error.

use crate::aggregate::{AggSpec, AggStat};

/// Run identifier column (one value per independent sweep execution).
pub const RUN_COLUMN: &str = "[run number]";

/// Simulation time step column.
pub const STEP_COLUMN: &str = "[step]";

/// Reporter: fraction of bacteria that are carbapenem-resistant.
pub const RESISTANT_FRACTION: &str =
    "ifelse-value any? bacteria [count bacteria with [carbapenem-resistant?] / count bacteria] [0]";

/// Reporter: mean days infected among currently infected patients.
pub const MEAN_DAYS_INFECTED: &str =
    "ifelse-value any? patients with [infected?] [mean[days-infected] of patients with [infected?]] [0]";

pub const TOTAL_PATIENTS: &str = "total-patients";
pub const PATIENT_DEATHS: &str = "patient-deaths";
pub const TOTAL_RECOVERED: &str = "total-recovered";
pub const TOTAL_DISCHARGED: &str = "total-discharged";
pub const ANTIBIOTIC_FAILURES: &str = "sum [antibiotic-failures] of patients";

pub const STRENGTH_COLUMN: &str = "antibiotic-strength-level";
pub const CLEANING_COLUMN: &str = "cleaning-effectiveness";
pub const ADMIN_PERIOD_COLUMN: &str = "antibiotic-administration-period";

/// Per-run aggregation plan: which statistics to compute for which outcome.
pub const RUN_AGGREGATIONS: &[AggSpec] = &[
    AggSpec {
        column: TOTAL_PATIENTS,
        stats: &[AggStat::Mean, AggStat::Max, AggStat::Min],
    },
    AggSpec {
        column: TOTAL_DISCHARGED,
        stats: &[AggStat::Sum, AggStat::Mean],
    },
    AggSpec {
        column: TOTAL_RECOVERED,
        stats: &[AggStat::Sum, AggStat::Mean],
    },
    AggSpec {
        column: PATIENT_DEATHS,
        stats: &[AggStat::Sum, AggStat::Mean],
    },
    AggSpec {
        column: "total-mutations",
        stats: &[AggStat::Sum, AggStat::Max],
    },
    AggSpec {
        column: RESISTANT_FRACTION,
        stats: &[AggStat::Mean, AggStat::Max],
    },
];

/// Outcomes tracked over time by the temporal averager.
pub const TIME_COLUMNS: &[&str] = &[
    TOTAL_DISCHARGED,
    TOTAL_RECOVERED,
    PATIENT_DEATHS,
    "successful-antibiotics",
    ANTIBIOTIC_FAILURES,
    "total-mutations",
];

/// Input parameters that can influence outcomes.
pub const INPUT_COLUMNS: &[&str] = &[
    ADMIN_PERIOD_COLUMN,
    "antibiotic-application",
    STRENGTH_COLUMN,
    CLEANING_COLUMN,
    "cleaning-frequency",
];

/// Outcome/reporter columns evaluated against the inputs.
pub const OUTCOME_COLUMNS: &[&str] = &[
    TOTAL_DISCHARGED,
    TOTAL_RECOVERED,
    PATIENT_DEATHS,
    "successful-antibiotics",
    ANTIBIOTIC_FAILURES,
    "total-mutations",
    RESISTANT_FRACTION,
    MEAN_DAYS_INFECTED,
];

/// Outcome metrics summarized by the pivot reporter.
pub const PIVOT_METRICS: &[&str] = &[
    PATIENT_DEATHS,
    TOTAL_RECOVERED,
    TOTAL_DISCHARGED,
    "successful-antibiotics",
    ANTIBIOTIC_FAILURES,
    "total-mutations",
    RESISTANT_FRACTION,
    MEAN_DAYS_INFECTED,
];

/// Derived rate columns: (rate name, numerator outcome). Each is the
/// numerator divided by `total-patients`, undefined where that is zero.
pub const RATE_COLUMNS: &[(&str, &str)] = &[
    ("mortality-rate", PATIENT_DEATHS),
    ("recovery-rate", TOTAL_RECOVERED),
    ("discharge-rate", TOTAL_DISCHARGED),
];

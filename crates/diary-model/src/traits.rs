//! Baseline trait measures kept for analysis.

/// Trait rows at this measurement occasion are the baseline.
pub const BASELINE_TIME: i64 = 0;

/// Ordered projection of the trait table: subject id, gender, then the
/// questionnaire scores used as regressors.
pub const TRAIT_COLUMNS: [&str; 26] = [
    "ID",
    "Gender_bin",
    "IRQ_TN",
    "IRQ_EN",
    "IRQ_TP",
    "IRQ_EP",
    "IRI_EC",
    "IRI_PT",
    "IRI_PD",
    "PSA_avg",
    "NTB_avg",
    "MCSDS_avg",
    "CESD_avg",
    "STAI_MEAN",
    "PSS_avg",
    "Loneliness_avg",
    "PANAS_NegAvg",
    "PANAS_PosAvg",
    "SHS_avg",
    "SWLS_avg",
    "BIS_avg",
    "BAS_drive",
    "NPI15_avg",
    "BFI_a",
    "BFI_e",
    "BFI_n",
];

//! Full runs from CSV files to the merged CSV.

use std::fs;
use std::path::{Path, PathBuf};

use diary_model::{JoinPolicy, MergeConfig, MergeOptions, MissingDisclosure, TRAIT_COLUMNS};
use diary_transform::{TransformError, run_merge};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    fn output(&self) -> PathBuf {
        self.dir.path().join("out").join("merged.csv")
    }

    fn config(&self, diary: &str, traits: &str, network: &str) -> MergeConfig {
        MergeConfig::new(
            self.write("dd.csv", diary),
            self.write("trait.csv", traits),
            self.write("network.csv", network),
            self.output(),
        )
    }
}

/// One subject, one positive event.
fn diary_csv(disclosures: [u8; 5]) -> String {
    diary_csv_cells(disclosures.map(|count| count.to_string()))
}

/// Like [`diary_csv`], with the disclosure cells written verbatim.
fn diary_csv_cells(disclosures: [String; 5]) -> String {
    let mut header = vec!["ID", "Dorm", "Day", "PosEv1_Cat", "PosEv1_Emo"]
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();
    header.extend((1..=5).map(|slot| format!("DrmPsEvTld1_{slot}")));
    let mut row = vec!["101".to_string(), "3".into(), "1".into(), "Talk".into(), "5".into()];
    row.extend(disclosures);
    format!("{}\n{}\n", header.join(","), row.join(","))
}

/// Baseline and follow-up rows for subject 101; measures are numbered 1..=25.
fn trait_csv(id: &str) -> String {
    let measures = &TRAIT_COLUMNS[1..];
    let mut header = vec!["ID".to_string(), "time".to_string()];
    header.extend(measures.iter().map(|name| name.to_string()));
    header.push("Comment".to_string());

    let mut baseline = vec![id.to_string(), "0".to_string()];
    baseline.extend((1..=measures.len()).map(|value| value.to_string()));
    baseline.push("ok".to_string());

    let mut follow_up = vec![id.to_string(), "1".to_string()];
    follow_up.extend(measures.iter().map(|_| "99".to_string()));
    follow_up.push("later".to_string());

    format!(
        "{}\n{}\n{}\n",
        header.join(","),
        baseline.join(","),
        follow_up.join(",")
    )
}

const NETWORK: &str = "ID,degree,closeness\n101,4,0.5\n";

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read output")
}

#[test]
fn single_told_dormmate_sets_got_help() {
    let fixture = Fixture::new();
    let config = fixture.config(&diary_csv([1, 0, 0, 0, 0]), &trait_csv("101"), NETWORK);
    let report = run_merge(&config).expect("merge");

    assert_eq!(report.output_rows, 1);
    assert_eq!(report.baseline_subjects, 1);
    assert!(!report.has_warnings());
    assert_eq!(report.inputs.len(), 3);

    insta::assert_snapshot!(read(&config.output_path), @r"
    ,ID,Dorm,Day,Category,Valence,EventNum,EmoRating,TldDrm1,TldDrm2,TldDrm3,TldDrm4,TldDrm5,NumDrmTld,GotHelp,Gender_bin,IRQ_TN,IRQ_EN,IRQ_TP,IRQ_EP,IRI_EC,IRI_PT,IRI_PD,PSA_avg,NTB_avg,MCSDS_avg,CESD_avg,STAI_MEAN,PSS_avg,Loneliness_avg,PANAS_NegAvg,PANAS_PosAvg,SHS_avg,SWLS_avg,BIS_avg,BAS_drive,NPI15_avg,BFI_a,BFI_e,BFI_n,degree,closeness
    0,101,3,1,Talk,Pos,1,5,1,0,0,0,0,1,1,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15,16,17,18,19,20,21,22,23,24,25,4,0.5
    ");
}

#[test]
fn no_told_dormmate_clears_got_help() {
    let fixture = Fixture::new();
    let config = fixture
        .config(&diary_csv([0; 5]), &trait_csv("101"), NETWORK)
        .with_options(MergeOptions::new().with_index(false));
    run_merge(&config).expect("merge");

    let text = read(&config.output_path);
    let mut lines = text.lines();
    let header: Vec<&str> = lines.next().expect("header").split(',').collect();
    let row: Vec<&str> = lines.next().expect("row").split(',').collect();
    assert!(lines.next().is_none());

    let field = |name: &str| {
        let position = header.iter().position(|column| *column == name).expect(name);
        row[position]
    };
    assert_eq!(header[0], "ID");
    assert_eq!(field("NumDrmTld"), "0");
    assert_eq!(field("GotHelp"), "0");
    assert_eq!(field("BFI_n"), "25");
    assert_eq!(field("degree"), "4");
}

fn disclosure_fields(path: &Path) -> (String, String) {
    let text = read(path);
    let mut lines = text.lines();
    let header: Vec<&str> = lines.next().expect("header").split(',').collect();
    let row: Vec<&str> = lines.next().expect("row").split(',').collect();
    let field = |name: &str| {
        let position = header.iter().position(|column| *column == name).expect(name);
        row[position].to_string()
    };
    (field("NumDrmTld"), field("GotHelp"))
}

fn blank_second_slot() -> String {
    diary_csv_cells(["1", "", "0", "0", "0"].map(String::from))
}

#[test]
fn blank_slot_counts_as_zero_by_default() {
    let fixture = Fixture::new();
    let config = fixture
        .config(&blank_second_slot(), &trait_csv("101"), NETWORK)
        .with_options(MergeOptions::new().with_index(false));
    run_merge(&config).expect("merge");
    assert_eq!(
        disclosure_fields(&config.output_path),
        ("1".to_string(), "1".to_string())
    );
}

#[test]
fn blank_slot_propagates_when_asked() {
    let fixture = Fixture::new();
    let config = fixture
        .config(&blank_second_slot(), &trait_csv("101"), NETWORK)
        .with_options(
            MergeOptions::new()
                .with_index(false)
                .with_missing_disclosure(MissingDisclosure::Propagate),
        );
    run_merge(&config).expect("merge");
    assert_eq!(
        disclosure_fields(&config.output_path),
        (String::new(), String::new())
    );
}

#[test]
fn float_typed_ids_still_join() {
    let fixture = Fixture::new();
    let config = fixture.config(&diary_csv([1, 1, 0, 0, 0]), &trait_csv("101.0"), NETWORK);
    let report = run_merge(&config).expect("merge");
    assert_eq!(report.output_rows, 1);
}

#[test]
fn unmatched_ids_are_a_key_mismatch() {
    let fixture = Fixture::new();
    let config = fixture.config(&diary_csv([1, 0, 0, 0, 0]), &trait_csv("S101"), NETWORK);
    let err = run_merge(&config).unwrap_err();
    assert!(
        matches!(err, TransformError::JoinKeyMismatch { ref stage, .. } if stage == "traits"),
        "unexpected error: {err}"
    );
    assert!(!config.output_path.exists());
}

#[test]
fn left_policy_keeps_unmatched_events() {
    let fixture = Fixture::new();
    let config = fixture
        .config(&diary_csv([1, 0, 0, 0, 0]), &trait_csv("101"), "ID,degree\n202,1\n")
        .with_options(
            MergeOptions::new()
                .with_join_policy(JoinPolicy::Left)
                .with_index(false),
        );
    let report = run_merge(&config).expect("merge");
    assert_eq!(report.output_rows, 1);
    assert!(read(&config.output_path).trim_end().ends_with(",25,"));
}

#[test]
fn duplicated_network_subject_fans_out_with_warning() {
    let fixture = Fixture::new();
    let config = fixture.config(
        &diary_csv([1, 0, 0, 0, 0]),
        &trait_csv("101"),
        "ID,degree\n101,4\n101,5\n",
    );
    let report = run_merge(&config).expect("merge");
    assert_eq!(report.output_rows, 2);
    let stage = report.stage("network").expect("network stage");
    assert!(stage.fanned_out());
    assert!(report.has_warnings());
}

#[test]
fn missing_whitelist_column_names_it() {
    let fixture = Fixture::new();
    let traits = trait_csv("101").replacen("BFI_e", "BFI_x", 1);
    let config = fixture.config(&diary_csv([1, 0, 0, 0, 0]), &traits, NETWORK);
    let err = run_merge(&config).unwrap_err();
    assert_eq!(err.to_string(), "trait table is missing BFI_e");
}

#[test]
fn missing_input_file_is_reported_with_path() {
    let fixture = Fixture::new();
    let config = MergeConfig::new(
        fixture.dir.path().join("absent.csv"),
        fixture.write("trait.csv", &trait_csv("101")),
        fixture.write("network.csv", NETWORK),
        fixture.output(),
    );
    let err = run_merge(&config).unwrap_err();
    assert!(err.to_string().contains("absent.csv"), "{err}");
}

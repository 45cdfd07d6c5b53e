//! Runs the merge command from parsed arguments.

use std::fs;
use std::path::Path;

use clap::Parser;
use diary_cli::cli::Cli;
use diary_cli::commands::run_command;
use diary_cli::summary::stage_table;

const TRAIT_MEASURES: [&str; 25] = [
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

fn write_inputs(dir: &Path) {
    let mut diary_header = vec![
        "ID".to_string(),
        "Dorm".into(),
        "Day".into(),
        "PosEv1_Cat".into(),
        "PosEv1_Emo".into(),
        "NegEv1_Cat".into(),
        "NegEv1_Emo".into(),
    ];
    let mut diary_row = vec![
        "12".to_string(),
        "2".into(),
        "4".into(),
        "Talk".into(),
        "6".into(),
        "Fight".into(),
        "2".into(),
    ];
    for slot in 1..=5 {
        diary_header.push(format!("DrmPsEvTld1_{slot}"));
        diary_row.push(if slot == 2 { "1" } else { "0" }.to_string());
        diary_header.push(format!("DrmNgEvTld1_{slot}"));
        diary_row.push("0".to_string());
    }
    fs::write(
        dir.join("dd.csv"),
        format!("{}\n{}\n", diary_header.join(","), diary_row.join(",")),
    )
    .unwrap();

    let trait_header = format!("ID,time,{}", TRAIT_MEASURES.join(","));
    let trait_row = format!("12,0,{}", vec!["1"; TRAIT_MEASURES.len()].join(","));
    fs::write(
        dir.join("trait.csv"),
        format!("{trait_header}\n{trait_row}\n"),
    )
    .unwrap();

    fs::write(dir.join("net.csv"), "ID,indegree\n12,3\n").unwrap();
}

fn parse(dir: &Path, extra: &[&str]) -> Cli {
    let mut args = vec![
        "dd-trait-merge".to_string(),
        dir.join("dd.csv").display().to_string(),
        dir.join("trait.csv").display().to_string(),
        dir.join("net.csv").display().to_string(),
        dir.join("merged.csv").display().to_string(),
    ];
    args.extend(extra.iter().map(|arg| arg.to_string()));
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn merges_one_row_per_event() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    let cli = parse(dir.path(), &["--no-index"]);

    let report = run_command(&cli).unwrap();
    assert_eq!(report.output_rows, 2);
    assert_eq!(report.stages.len(), 8);

    let text = fs::read_to_string(dir.path().join("merged.csv")).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("ID,Dorm,Day,Category,Valence,EventNum,EmoRating,TldDrm1"));
    assert!(lines[0].ends_with(",BFI_n,indegree"));
    assert!(lines[1].starts_with("12,2,4,Talk,Pos,1,6,0,1,0,0,0,1,1,"));
    assert!(lines[2].starts_with("12,2,4,Fight,Neg,1,2,0,0,0,0,0,0,0,"));

    assert!(stage_table(&report).to_string().contains("network"));
}

#[test]
fn failure_carries_output_context() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    fs::write(dir.path().join("net.csv"), "subject,indegree\n12,3\n").unwrap();
    let cli = parse(dir.path(), &[]);

    let err = run_command(&cli).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.starts_with("merge into "), "{message}");
    assert!(message.contains("missing required column(s) ID"), "{message}");
}

mod common;

use anyhow::Result;
use common::{dataset, read_gz_lines};
#[cfg(test)] use pretty_assertions::assert_eq;

#[test]
fn step1_writes_sumstats_only() -> Result<()> {
    let data = dataset();
    let out = data.dir.path().join("step1/run");
    let cli = data.cli(&out, &["--step=1"]);
    cismeta_rs::run(&cli)?;

    for subgroup in ["tissueA", "tissueB"] {
        let path = out.parent().unwrap().join(format!("run_sumstats_{subgroup}.txt.gz"));
        assert!(path.exists(), "missing {}", path.display());
    }
    assert!(!out.parent().unwrap().join("run_abfs_weighted.txt.gz").exists());
    assert!(!out.parent().unwrap().join("run_permPval_tissueA.txt.gz").exists());
    Ok(())
}

#[test]
fn perfect_signal_summary_statistics() -> Result<()> {
    let data = dataset();
    let out = data.dir.path().join("assoc/run");
    cismeta_rs::run(&data.cli(&out, &["--step=1"]))?;

    let lines = read_gz_lines(&data.dir.path().join("assoc/run_sumstats_tissueA.txt.gz"));
    assert_eq!(lines[0], "ftr snp maf n betahat sebetahat sigmahat betaPval pve");

    let strong: Vec<&str> = lines.iter()
        .find(|l| l.starts_with("geneA rs_strong"))
        .expect("geneA x rs_strong row")
        .split(' ')
        .collect();
    // y = dose + 1 exactly: betahat = 1, p = 0, pve = 1 over all ten samples.
    assert_eq!(strong[3], "10");
    assert_eq!(strong[4], "1.000000e0");
    assert_eq!(strong[7], "0.000000e0");
    assert_eq!(strong[8], "1.000000e0");

    // rs_far sits 9Mb away: never a cis pair.
    assert!(!lines.iter().any(|l| l.contains("rs_far")));
    Ok(())
}

#[test]
fn step3_emits_the_abf_files() -> Result<()> {
    let data = dataset();
    let out = data.dir.path().join("abfs/run");
    let cli = data.cli(&out, &["--step=3", &data.grid_arg(), "--bfs=all"]);
    cismeta_rs::run(&cli)?;

    let unweighted = read_gz_lines(&data.dir.path().join("abfs/run_abfs_unweighted.txt.gz"));
    assert_eq!(unweighted[0], "ftr snp config ABFgrid1 ABFgrid2");
    // With S = 2 the `all` family enumerates the singletons "1" and "2".
    let configs: Vec<&str> = unweighted[1..].iter()
        .filter(|l| l.starts_with("geneA rs_strong "))
        .map(|l| l.split(' ').nth(2).unwrap())
        .collect();
    assert_eq!(configs, vec!["const", "const-fix", "const-maxh", "1", "2"]);

    let weighted = read_gz_lines(&data.dir.path().join("abfs/run_abfs_weighted.txt.gz"));
    assert_eq!(weighted[0], "ftr snp nb.subgroups nb.samples abf.const abf.const.fix abf.const.maxh abf.1 abf.2");
    // geneA x rs_strong: 10 samples in tissueA + 8 in tissueB.
    let strong: Vec<&str> = weighted.iter()
        .find(|l| l.starts_with("geneA rs_strong"))
        .expect("geneA x rs_strong row")
        .split(' ')
        .collect();
    assert_eq!(strong[2], "2");
    assert_eq!(strong[3], "18");
    Ok(())
}

#[test]
fn step5_runs_everything_and_calibrates() -> Result<()> {
    let data = dataset();
    let out = data.dir.path().join("full/run");
    let cli = data.cli(&out, &[
        "--step=5", &data.grid_arg(), "--bfs=subset", "--pbf=subset",
        "--nperm=50", "--seed=1234",
    ]);
    cismeta_rs::run(&cli)?;

    for file in [
        "run_sumstats_tissueA.txt.gz",
        "run_sumstats_tissueB.txt.gz",
        "run_permPval_tissueA.txt.gz",
        "run_permPval_tissueB.txt.gz",
        "run_abfs_unweighted.txt.gz",
        "run_abfs_weighted.txt.gz",
        "run_jointPermPvals.txt.gz",
    ] {
        assert!(data.dir.path().join("full").join(file).exists(), "missing {file}");
    }

    let perm = read_gz_lines(&data.dir.path().join("full/run_permPval_tissueA.txt.gz"));
    assert_eq!(perm[0], "ftr nbSnps permPval nbPerms");
    assert_eq!(perm.len(), 3); // geneA + geneB
    for line in &perm[1..] {
        let fields: Vec<&str> = line.split(' ').collect();
        let nb_perms: u64 = fields[3].parse()?;
        assert!(nb_perms <= 50);
        let pval: f64 = fields[2].parse()?;
        assert!(pval > 0.0 && pval <= 1.0);
    }

    let joint = read_gz_lines(&data.dir.path().join("full/run_jointPermPvals.txt.gz"));
    assert_eq!(joint[0], "ftr nbSnps jointPermPval nbPerms maxL10TrueAbf");
    assert_eq!(joint.len(), 3);
    Ok(())
}

#[test]
fn fixed_seed_reruns_are_identical() -> Result<()> {
    let data = dataset();
    let args = [
        "--step=5".to_string(), data.grid_arg(), "--bfs=subset".to_string(),
        "--pbf=subset".to_string(), "--nperm=40".to_string(), "--seed=98765".to_string(),
        "--trick=2".to_string(),
    ];
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();

    let out_a = data.dir.path().join("rerun_a/run");
    let out_b = data.dir.path().join("rerun_b/run");
    cismeta_rs::run(&data.cli(&out_a, &arg_refs))?;
    cismeta_rs::run(&data.cli(&out_b, &arg_refs))?;

    for file in [
        "run_sumstats_tissueA.txt.gz",
        "run_sumstats_tissueB.txt.gz",
        "run_permPval_tissueA.txt.gz",
        "run_permPval_tissueB.txt.gz",
        "run_abfs_unweighted.txt.gz",
        "run_abfs_weighted.txt.gz",
        "run_jointPermPvals.txt.gz",
    ] {
        let a = read_gz_lines(&data.dir.path().join("rerun_a").join(file));
        let b = read_gz_lines(&data.dir.path().join("rerun_b").join(file));
        assert_eq!(a, b, "outputs differ for {file}");
    }
    Ok(())
}

#[test]
fn allow_lists_restrict_the_outputs() -> Result<()> {
    use std::io::Write as _;

    let data = dataset();
    let ftr_list = data.dir.path().join("keep_ftr.txt");
    std::fs::File::create(&ftr_list)?.write_all(b"geneA\n")?;
    let snp_list = data.dir.path().join("keep_snp.txt");
    std::fs::File::create(&snp_list)?.write_all(b"rs_strong\nrs_far\n")?;

    let out = data.dir.path().join("filtered/run");
    let cli = data.cli(&out, &[
        "--step=1",
        &format!("--ftr={}", ftr_list.display()),
        &format!("--snp={}", snp_list.display()),
    ]);
    cismeta_rs::run(&cli)?;

    let lines = read_gz_lines(&data.dir.path().join("filtered/run_sumstats_tissueA.txt.gz"));
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("geneA rs_strong"));
    Ok(())
}

#[test]
fn forbidden_step_pbf_combination_aborts() {
    let data = dataset();
    let out = data.dir.path().join("bad/run");
    let cli = data.cli(&out, &["--step=4", &data.grid_arg(), "--bfs=const", "--pbf=all"]);
    assert!(cismeta_rs::run(&cli).is_err());
}

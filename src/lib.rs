extern crate parser;

use parser::Cli;

use assoc::AnalysisOptions;

#[macro_use]
extern crate log;

use anyhow::Result;
use located_error::LocatedError;

/// Run the full analysis described by the command line: load and align the
/// catalogues, scan for cis associations, then permute per the requested
/// step.
pub fn run(cli: &Cli) -> Result<()> {
    cli.validate().loc("While checking the command line arguments")?;
    let seed = cli.seed_or_default();
    info!("Starting step {} analysis (seed {seed})", cli.step);

    // ----------------------------- Load every input.
    let (_, geno_path) = cismeta_io::read::geno_list_file(&cli.geno)?;
    let pheno_list = cismeta_io::read::list_file(&cli.pheno)?;
    info!("{} subgroup(s): {}", pheno_list.len(),
          pheno_list.iter().map(|(id, _)| id.as_str()).collect::<Vec<&str>>().join(", "));

    let (geno_samples, snps) = cismeta_io::read::geno::load(&geno_path)?;
    let phenos = pheno_list.iter()
        .map(|(id, path)| cismeta_io::read::pheno::load(path, id))
        .collect::<Result<Vec<_>>>()?;
    let coords = cismeta_io::read::bed::load(&cli.fcoord)?;

    let ftr_allow = cli.ftr.as_ref().map(|path| cismeta_io::read::allow_list(path)).transpose()?;
    let snp_allow = cli.snp.as_ref().map(|path| cismeta_io::read::allow_list(path)).transpose()?;
    let grid = cli.grid.as_ref().map(|path| cismeta_io::read::grid::load(path)).transpose()?;

    // ----------------------------- Build the catalogues.
    let mut catalogues = cohort::build::build(
        geno_samples, snps, phenos, coords, ftr_allow.as_ref(), snp_allow.as_ref(),
    ).loc("While building the catalogues")?;

    if cli.qnorm {
        info!("Quantile-normalizing the phenotypes...");
        catalogues.quantile_normalize_phenotypes();
    }

    // ----------------------------- Associate.
    let opts = AnalysisOptions {
        anchor: cli.anchor,
        cis_len: cli.cis,
        maf_min: cli.maf,
        bfs: cli.step.joint().then_some(cli.bfs),
        pbf: cli.step.permute_joint().then_some(cli.pbf),
        grid,
        nperm: cli.nperm,
        seed,
        trick: cli.trick,
    };
    assoc::scan::run(&mut catalogues, &opts);

    assoc::write::sumstats(&cli.out, &catalogues)?;
    if cli.step.joint() {
        let grid_len = opts.grid.as_ref().map_or(0, stats::Grid::len);
        assoc::write::abfs_unweighted(&cli.out, &catalogues, grid_len)?;
        assoc::write::abfs_weighted(&cli.out, &catalogues, cli.bfs)?;
    }

    // ----------------------------- Permute.
    if cli.step.permute_separate() {
        assoc::perm::separate::run(&mut catalogues, &opts);
        assoc::write::sep_perm_pvals(&cli.out, &catalogues)?;
    }
    if cli.step.permute_joint() {
        assoc::perm::joint::run(&mut catalogues, &opts);
        assoc::write::joint_perm_pvals(&cli.out, &catalogues)?;
    }

    info!("Done.");
    Ok(())
}

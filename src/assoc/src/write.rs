//! The five contractual result emitters. Column order is part of the file
//! contract; label order always comes from the configuration enumerator, so
//! it matches the association phase exactly.

use std::path::Path;

use anyhow::Result;
use cohort::Catalogues;
use cismeta_io::write::{output_path, GzWriter, SEPARATOR};
use log::info;
use parser::BfFamily;
use stats::config;

fn fmt(x: f64) -> String {
    format!("{x:.6e}")
}

/// `<prefix>_sumstats_<subgroup>.txt.gz`, one file per subgroup.
pub fn sumstats(prefix: &Path, cat: &Catalogues) -> Result<()> {
    for (s, subgroup) in cat.subgroups.iter().enumerate() {
        let path = output_path(prefix, &format!("sumstats_{subgroup}"));
        let mut writer = GzWriter::new(&path)?;
        writer.write_line(&["ftr", "snp", "maf", "n", "betahat", "sebetahat", "sigmahat", "betaPval", "pve"]
            .join(SEPARATOR))?;

        for ftr in &cat.features {
            for pair in &ftr.pair_results {
                let stats = &pair.stats[s];
                if stats.n == 0 {
                    continue
                }
                let snp = cat.snp(pair.snp);
                writer.write_line(&[
                    ftr.name.clone(),
                    snp.name.clone(),
                    fmt(snp.mafs[s]),
                    stats.n.to_string(),
                    fmt(stats.betahat),
                    fmt(stats.sebetahat),
                    fmt(stats.sigmahat),
                    fmt(stats.pval),
                    fmt(stats.pve),
                ].join(SEPARATOR))?;
            }
        }
        writer.finish()?;
        info!("Wrote '{}'", path.display());
    }
    Ok(())
}

/// `<prefix>_permPval_<subgroup>.txt.gz`. Every feature appears, including
/// the ones without any cis-SNP.
pub fn sep_perm_pvals(prefix: &Path, cat: &Catalogues) -> Result<()> {
    for (s, subgroup) in cat.subgroups.iter().enumerate() {
        let path = output_path(prefix, &format!("permPval_{subgroup}"));
        let mut writer = GzWriter::new(&path)?;
        writer.write_line(&["ftr", "nbSnps", "permPval", "nbPerms"].join(SEPARATOR))?;

        for ftr in &cat.features {
            writer.write_line(&[
                ftr.name.clone(),
                ftr.cis_snps.len().to_string(),
                fmt(ftr.perm_pval_sep[s]),
                ftr.nb_perms_sep[s].to_string(),
            ].join(SEPARATOR))?;
        }
        writer.finish()?;
        info!("Wrote '{}'", path.display());
    }
    Ok(())
}

/// `<prefix>_abfs_unweighted.txt.gz`: one row per (feature, SNP,
/// configuration), the `const` family first, grid values in row order.
pub fn abfs_unweighted(prefix: &Path, cat: &Catalogues, grid_len: usize) -> Result<()> {
    let path = output_path(prefix, "abfs_unweighted");
    let mut writer = GzWriter::new(&path)?;

    let mut header = vec!["ftr".to_string(), "snp".to_string(), "config".to_string()];
    header.extend((1..=grid_len).map(|k| format!("ABFgrid{k}")));
    writer.write_line(&header.join(SEPARATOR))?;

    for ftr in &cat.features {
        for pair in &ftr.pair_results {
            let snp = cat.snp(pair.snp);
            for (label, values) in &pair.unweighted_abfs {
                let mut row = vec![ftr.name.clone(), snp.name.clone(), label.clone()];
                row.extend(values.iter().map(|&v| fmt(v)));
                writer.write_line(&row.join(SEPARATOR))?;
            }
        }
    }
    writer.finish()?;
    info!("Wrote '{}'", path.display());
    Ok(())
}

/// `<prefix>_abfs_weighted.txt.gz`: the grid-averaged ABF of every
/// configuration, one row per (feature, SNP).
pub fn abfs_weighted(prefix: &Path, cat: &Catalogues, bfs: BfFamily) -> Result<()> {
    let path = output_path(prefix, "abfs_weighted");
    let mut writer = GzWriter::new(&path)?;

    let labels: Vec<String> = match bfs {
        BfFamily::Const  => Vec::new(),
        BfFamily::Subset => config::singletons(cat.nb_subgroups()).map(|c| c.label).collect(),
        BfFamily::All    => config::proper_subsets(cat.nb_subgroups()).map(|c| c.label).collect(),
    };

    let mut header = vec!["ftr", "snp", "nb.subgroups", "nb.samples", "abf.const", "abf.const.fix", "abf.const.maxh"]
        .into_iter().map(String::from).collect::<Vec<String>>();
    header.extend(labels.iter().map(|label| format!("abf.{label}")));
    writer.write_line(&header.join(SEPARATOR))?;

    for ftr in &cat.features {
        for pair in &ftr.pair_results {
            let snp = cat.snp(pair.snp);
            let weighted = |label: &str| {
                pair.weighted_abfs.get(label).copied().unwrap_or(f64::NAN)
            };
            let mut row = vec![
                ftr.name.clone(),
                snp.name.clone(),
                pair.nb_subgroups_with_data().to_string(),
                pair.nb_samples().to_string(),
                fmt(weighted("const")),
                fmt(weighted("const-fix")),
                fmt(weighted("const-maxh")),
            ];
            row.extend(labels.iter().map(|label| fmt(weighted(label))));
            writer.write_line(&row.join(SEPARATOR))?;
        }
    }
    writer.finish()?;
    info!("Wrote '{}'", path.display());
    Ok(())
}

/// `<prefix>_jointPermPvals.txt.gz`. Every feature appears.
pub fn joint_perm_pvals(prefix: &Path, cat: &Catalogues) -> Result<()> {
    let path = output_path(prefix, "jointPermPvals");
    let mut writer = GzWriter::new(&path)?;
    writer.write_line(&["ftr", "nbSnps", "jointPermPval", "nbPerms", "maxL10TrueAbf"].join(SEPARATOR))?;

    for ftr in &cat.features {
        writer.write_line(&[
            ftr.name.clone(),
            ftr.cis_snps.len().to_string(),
            fmt(ftr.joint_perm_pval),
            ftr.nb_perms_joint.to_string(),
            fmt(ftr.max_l10_true_abf),
        ].join(SEPARATOR))?;
    }
    writer.finish()?;
    info!("Wrote '{}'", path.display());
    Ok(())
}

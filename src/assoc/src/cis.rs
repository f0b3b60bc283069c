//! Locating the cis-SNPs of a feature by walking the coordinate-sorted SNP
//! list of its chromosome.

use ahash::AHashMap;
use cohort::{Feature, Snp, SnpIdx};
use parser::Anchor;

/// The inclusive cis window [lo, hi] of a feature under the given anchor
/// policy. The lower bound saturates at zero.
pub fn window(ftr: &Feature, anchor: Anchor, cis_len: u32) -> (u32, u32) {
    let lo = ftr.start.saturating_sub(cis_len);
    let hi = match anchor {
        Anchor::Fss    => ftr.start.saturating_add(cis_len),
        Anchor::FssFes => ftr.end.saturating_add(cis_len),
    };
    (lo, hi)
}

/// The feature's cis-SNPs, in coordinate order. Walks the chromosome's
/// sorted SNP list from the lowest coordinate and stops at the first SNP
/// past the window.
pub fn scan(
    ftr: &Feature,
    snps: &[Snp],
    snps_by_chr: &AHashMap<String, Vec<SnpIdx>>,
    anchor: Anchor,
    cis_len: u32,
) -> Vec<SnpIdx> {
    let Some(chr_snps) = snps_by_chr.get(&ftr.chr) else {
        return Vec::new()
    };
    let (lo, hi) = window(ftr, anchor, cis_len);

    let mut cis = Vec::new();
    for &idx in chr_snps {
        let coord = snps[idx.0].coord;
        if coord > hi {
            break
        }
        if coord >= lo {
            cis.push(idx);
        }
    }
    cis
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort::FeatureCoords;

    fn feature(start: u32, end: u32) -> Feature {
        Feature::new("gene1".into(), FeatureCoords { chr: "chr1".into(), start, end }, 1)
    }

    fn arena(coords: &[u32]) -> (Vec<Snp>, AHashMap<String, Vec<SnpIdx>>) {
        let snps: Vec<Snp> = coords.iter().enumerate()
            .map(|(i, &coord)| Snp::new(format!("rs{i}"), "chr1".into(), coord, vec![], vec![]))
            .collect();
        let mut by_chr = AHashMap::new();
        by_chr.insert("chr1".to_string(), (0..snps.len()).map(SnpIdx).collect());
        (snps, by_chr)
    }

    #[test]
    fn fss_window_boundaries() {
        // start = 1000, L = 100: [900, 1100].
        let ftr = feature(1000, 1100);
        let (snps, by_chr) = arena(&[899, 900, 1100, 1101]);
        let cis = scan(&ftr, &snps, &by_chr, Anchor::Fss, 100);
        let coords: Vec<u32> = cis.iter().map(|&i| snps[i.0].coord).collect();
        assert_eq!(coords, vec![900, 1100]);
    }

    #[test]
    fn fss_fes_extends_to_feature_end() {
        let ftr = feature(1000, 1100);
        let (snps, by_chr) = arena(&[899, 900, 1100, 1101, 1200, 1201]);
        let cis = scan(&ftr, &snps, &by_chr, Anchor::FssFes, 100);
        let coords: Vec<u32> = cis.iter().map(|&i| snps[i.0].coord).collect();
        assert_eq!(coords, vec![900, 1100, 1101, 1200]);
    }

    #[test]
    fn window_saturates_near_chromosome_start() {
        let ftr = feature(50, 60);
        assert_eq!(window(&ftr, Anchor::Fss, 100), (0, 150));
    }

    #[test]
    fn unknown_chromosome_has_no_cis_snps() {
        let mut ftr = feature(1000, 1100);
        ftr.chr = "chrX".into();
        let (snps, by_chr) = arena(&[1000]);
        assert!(scan(&ftr, &snps, &by_chr, Anchor::Fss, 100).is_empty());
    }
}

//! On-disk fixture dataset shared by the end-to-end tests.
//!
//! Two subgroups over ten genotyped samples; geneA carries a perfect
//! dose-response signal on rs_strong, geneB is noise.

use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use flate2::read::MultiGzDecoder;

pub struct Dataset {
    pub dir: tempfile::TempDir,
    pub geno_list: PathBuf,
    pub pheno_list: PathBuf,
    pub fcoord: PathBuf,
    pub grid: PathBuf,
}

pub const SAMPLES: usize = 10;

fn dose(sample: usize) -> usize {
    sample % 3
}

fn impute_triple(dose: usize) -> &'static str {
    match dose {
        0 => "1 0 0",
        1 => "0 1 0",
        _ => "0 0 1",
    }
}

fn write_file(path: &Path, content: &str) {
    File::create(path)
        .and_then(|mut f| f.write_all(content.as_bytes()))
        .expect("fixture file");
}

pub fn dataset() -> Dataset {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();

    // ---- Genotype matrix: rs_strong and rs_noise in cis of both genes,
    //      rs_far out of every window.
    let mut geno = String::from("chr name coord a1 a2");
    for i in 0..SAMPLES {
        geno.push_str(&format!(" s{i}_a1a1 s{i}_a1a2 s{i}_a2a2"));
    }
    geno.push('\n');
    let mut push_snp = |name: &str, chr: &str, coord: u32, doses: &dyn Fn(usize) -> usize| {
        geno.push_str(&format!("{chr} {name} {coord} A G"));
        for i in 0..SAMPLES {
            geno.push(' ');
            geno.push_str(impute_triple(doses(i)));
        }
        geno.push('\n');
    };
    push_snp("rs_strong", "chr1", 1050, &dose);
    push_snp("rs_noise", "chr1", 1300, &|i| (i * 7 + 1) % 3);
    push_snp("rs_far", "chr1", 9_000_000, &dose);
    let geno_path = root.join("geno.txt");
    write_file(&geno_path, &geno);

    let geno_list = root.join("geno_list.txt");
    write_file(&geno_list, &format!("# shared genotypes\ncohort {}\n", geno_path.display()));

    // ---- Phenotype matrices: tissueA types every sample, tissueB the
    //      first eight only.
    let pheno_a = root.join("pheno_tissueA.txt");
    let mut content = String::from("Id");
    for i in 0..SAMPLES {
        content.push_str(&format!(" s{i}"));
    }
    content.push('\n');
    content.push_str("geneA");
    for i in 0..SAMPLES {
        content.push_str(&format!(" {}", dose(i) as f64 + 1.0));
    }
    content.push('\n');
    content.push_str("geneB");
    for i in 0..SAMPLES {
        content.push_str(&format!(" {}", ((i * 13 % 7) as f64) / 2.0 - 1.5));
    }
    content.push('\n');
    write_file(&pheno_a, &content);

    let pheno_b = root.join("pheno_tissueB.txt");
    let mut content = String::from("Id");
    for i in 0..8 {
        content.push_str(&format!(" s{i}"));
    }
    content.push('\n');
    content.push_str("geneA");
    for i in 0..8 {
        content.push_str(&format!(" {}", dose(i) as f64 + 1.0));
    }
    content.push('\n');
    content.push_str("geneB");
    for i in 0..8 {
        content.push_str(&format!(" {}", ((i * 11 % 5) as f64) / 2.0 - 1.0));
    }
    content.push('\n');
    write_file(&pheno_b, &content);

    let pheno_list = root.join("pheno_list.txt");
    write_file(&pheno_list, &format!(
        "tissueA {}\ntissueB {}\n", pheno_a.display(), pheno_b.display()
    ));

    // ---- Feature coordinates (BED: 0-based half-open starts).
    let fcoord = root.join("fcoord.bed");
    write_file(&fcoord, "chr1\t999\t1100\tgeneA\nchr1\t1199\t1400\tgeneB\n");

    // ---- Grid.
    let grid = root.join("grid.txt");
    write_file(&grid, "0.1 0.4\n0.5 0.5\n");

    Dataset { dir, geno_list, pheno_list, fcoord, grid }
}

impl Dataset {
    pub fn cli(&self, out: &Path, extra: &[&str]) -> parser::Cli {
        use clap::Parser as _;
        let mut args = vec![
            "cismeta-rs".to_string(),
            format!("--geno={}", self.geno_list.display()),
            format!("--pheno={}", self.pheno_list.display()),
            format!("--fcoord={}", self.fcoord.display()),
            format!("--out={}", out.display()),
        ];
        args.extend(extra.iter().map(|s| (*s).to_string()));
        parser::Cli::try_parse_from(args).expect("fixture arguments must parse")
    }

    pub fn grid_arg(&self) -> String {
        format!("--grid={}", self.grid.display())
    }
}

pub fn read_gz_lines(path: &Path) -> Vec<String> {
    BufReader::new(MultiGzDecoder::new(File::open(path).expect("output file")))
        .lines()
        .collect::<std::io::Result<_>>()
        .expect("readable gzip output")
}

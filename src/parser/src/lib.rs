use std::{
    ffi::OsStr,
    fmt::{self, Display, Formatter},
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use located_error::*;

use anyhow::{anyhow, Result};
use clap::{ArgEnum, Parser};
use log::debug;
use serde::{Deserialize, Serialize};

mod error;
pub use error::ParserError;

/// cismeta-rs: cis-regulatory association mapping with Bayesian meta-analysis
///
/// For every (feature, cis-SNP) pair, estimate a per-subgroup linear
/// regression effect, then meta-analyze the subgroups through Approximate
/// Bayes Factors. Feature-level significance is assessed by phenotype
/// permutation.
#[derive(Parser, Debug, Serialize, Deserialize)]
#[clap(name="cismeta-rs", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the verbosity level (-v -vv -vvv)
    ///
    /// -v: Info  |  -vv: Debug  | -vvv: Trace {n}
    ///
    /// Note that the program will still output warnings by default, even when this flag is off.
    /// Use --quiet/-q to disable them.
    #[clap(short='v', long, parse(from_occurrences), global=true)]
    pub verbose: u8,

    /// Disable warnings. Only errors will be displayed.
    #[clap(short='q', long, global=true)]
    pub quiet: bool,

    /// Genotype list file.
    ///
    /// Two whitespace-separated columns: 'subgroupId path'. Lines starting with '#' are
    /// skipped. Exactly one genotype source is supported: the single file is shared
    /// across every subgroup.
    #[clap(short, long, parse(try_from_os_str=valid_input_file))]
    pub geno: PathBuf,

    /// Phenotype list file.
    ///
    /// Two whitespace-separated columns: 'subgroupId path', one row per subgroup.
    /// The row order defines the subgroup order used everywhere downstream.
    #[clap(short, long, parse(try_from_os_str=valid_input_file))]
    pub pheno: PathBuf,

    /// Feature coordinates, BED-like: 'chr start end name ...'.
    ///
    /// Start is 0-based half-open, per the BED convention, and stored 1-based
    /// inclusive internally.
    #[clap(long, parse(try_from_os_str=valid_input_file))]
    pub fcoord: PathBuf,

    /// Output prefix. Result files are written next to it as
    /// '<prefix>_<kind>.txt.gz'.
    #[clap(short, long)]
    pub out: PathBuf,

    /// Analysis step.
    ///
    /// 1: per-subgroup association only{n}
    /// 2: step 1 + separate permutations{n}
    /// 3: step 1 + joint analysis (ABFs){n}
    /// 4: step 3 + joint permutations{n}
    /// 5: everything
    #[clap(short, long, parse(try_from_str))]
    pub step: Step,

    /// Anchor defining the cis window around each feature.
    ///
    /// FSS: the window covers [start-cis, start+cis].{n}
    /// FSS+FES: the window covers [start-cis, end+cis].
    #[clap(long, arg_enum, default_value("FSS"))]
    pub anchor: Anchor,

    /// Half-size of the cis window, in base pairs.
    #[clap(long, default_value("100000"))]
    pub cis: u32,

    /// Quantile-normalize the phenotypes to a standard normal, per feature
    /// and subgroup, before any regression.
    #[clap(long)]
    pub qnorm: bool,

    /// Grid file for the Bayes factors: two whitespace-separated columns,
    /// phi2 then omega2, one row per grid point. Required for steps >= 3.
    #[clap(long, parse(try_from_os_str=valid_input_file))]
    pub grid: Option<PathBuf>,

    /// Which Bayes factors to compute.
    ///
    /// const: the consistent configuration only (plus its fixed-effect and
    /// maximum-heterogeneity variants).{n}
    /// subset: const + each single-subgroup configuration.{n}
    /// all: const + every non-empty proper subset of subgroups.
    #[clap(long, arg_enum, default_value("const"))]
    pub bfs: BfFamily,

    /// Number of phenotype permutations per feature.
    #[clap(long, default_value("10000"))]
    pub nperm: u64,

    /// Seed of the permutation random number generators.
    /// Defaults to the wall-clock time in microseconds.
    #[clap(long)]
    pub seed: Option<u64>,

    /// Early-stopping trick for the permutations.
    ///
    /// 0: run all of --nperm permutations.{n}
    /// 1: stop a feature as soon as 11 permuted statistics beat the true one.{n}
    /// 2: like 1, but keep shuffling without testing, so the RNG stream stays
    /// identical to a full run.
    #[clap(long, default_value("0"), parse(try_from_str))]
    pub trick: TrickMode,

    /// Which Bayes factor drives the joint permutations.
    ///
    /// Must not enumerate more configurations than --bfs computes:
    /// '--bfs const' forces '--pbf const'; '--bfs subset' forbids '--pbf all'.
    #[clap(long, arg_enum, default_value("const"))]
    pub pbf: BfFamily,

    /// Restrict the analysis to the features listed in this file (one id per line).
    #[clap(long, parse(try_from_os_str=valid_input_file))]
    pub ftr: Option<PathBuf>,

    /// Restrict the analysis to the SNPs listed in this file (one id per line).
    #[clap(long, parse(try_from_os_str=valid_input_file))]
    pub snp: Option<PathBuf>,

    /// Minimum per-subgroup minor allele frequency.
    ///
    /// A subgroup whose MAF for a given SNP falls below this threshold is
    /// treated as having no data for that (feature, SNP) pair.
    #[clap(long, default_value("0.0"))]
    pub maf: f64,
}

impl Cli {
    /// Check the flag combinations that clap cannot express.
    pub fn validate(&self) -> Result<(), ParserError> {
        if self.step.joint() && self.grid.is_none() {
            return Err(ParserError::MissingGrid)
        }
        if (self.step.permute_separate() || self.step.permute_joint()) && self.nperm == 0 {
            return Err(ParserError::InvalidNbPerms)
        }
        let incompatible = match (self.bfs, self.pbf) {
            (BfFamily::Const, pbf)          => pbf != BfFamily::Const,
            (BfFamily::Subset, BfFamily::All) => true,
            _                               => false,
        };
        if incompatible {
            return Err(ParserError::IncompatibleBfs{
                bfs: self.bfs.to_string(), pbf: self.pbf.to_string()
            })
        }
        Ok(())
    }

    /// The user seed, or the wall-clock time in microseconds.
    pub fn seed_or_default(&self) -> u64 {
        self.seed.unwrap_or_else(|| chrono::Local::now().timestamp_micros() as u64)
    }

    /// Serialize the command line arguments within a `.yaml` file, next to
    /// the output prefix: '{out dir}/{current time}-cismeta.yaml'.
    ///
    /// # Errors
    /// If serde_yaml fails to parse `Self` to a string, or the output
    /// directory cannot be created.
    pub fn serialize(&self) -> Result<()> {
        let serialized = serde_yaml::to_string(&self)
            .map_err(|err| anyhow!("Failed to serialize command line arguments. got [{err}]"))?;

        debug!("\n---- Command line args ----\n{}\n---", serialized);

        let out_dir = self.out.parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(out_dir)
            .with_loc(|| format!("While creating the output directory '{}'", out_dir.display()))?;

        let current_time = chrono::offset::Local::now().format("%Y-%m-%dT%H%M%S");
        let output_file = out_dir.join(format!("{current_time}-cismeta.yaml"));
        fs::write(&output_file, serialized)
            .with_loc(|| format!("Unable to serialize arguments into {}", output_file.display()))?;
        Ok(())
    }
}

/// Analysis step, within [1-5]. Each step implies a fixed set of phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step(u8);

impl Step {
    pub fn get(self) -> u8 {
        self.0
    }

    /// Per-subgroup association analysis: every step runs it.
    pub fn separate(self) -> bool {
        true
    }

    pub fn permute_separate(self) -> bool {
        matches!(self.0, 2 | 5)
    }

    /// Joint analysis, i.e. ABF computation.
    pub fn joint(self) -> bool {
        self.0 >= 3
    }

    pub fn permute_joint(self) -> bool {
        matches!(self.0, 4 | 5)
    }
}

impl FromStr for Step {
    type Err = ParserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u8>() {
            Ok(step @ 1..=5) => Ok(Self(step)),
            _                => Err(ParserError::InvalidStep(s.to_string())),
        }
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cis-window anchor policy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ArgEnum, Serialize, Deserialize)]
pub enum Anchor {
    /// Window around the feature start only.
    #[clap(name = "FSS")]
    Fss,
    /// Window from (start - cis) to (end + cis).
    #[clap(name = "FSS+FES")]
    FssFes,
}

impl Display for Anchor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fss    => write!(f, "FSS"),
            Self::FssFes => write!(f, "FSS+FES"),
        }
    }
}

/// Family of configurations for which ABFs are computed (--bfs), or which
/// drives the joint permutations (--pbf).
#[derive(Debug, Copy, Clone, PartialEq, Eq, ArgEnum, Serialize, Deserialize)]
pub enum BfFamily {
    #[clap(name = "const")]
    Const,
    #[clap(name = "subset")]
    Subset,
    #[clap(name = "all")]
    All,
}

impl Display for BfFamily {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const  => write!(f, "const"),
            Self::Subset => write!(f, "subset"),
            Self::All    => write!(f, "all"),
        }
    }
}

/// Early-stopping behavior of the permutation loops.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrickMode {
    /// Run every requested permutation.
    Off,
    /// Stop a feature at the 11th exceedance.
    Stop,
    /// At the 11th exceedance, keep shuffling without testing so that the
    /// permutation RNG consumes the same state trajectory as a full run.
    ShuffleOnly,
}

impl TrickMode {
    pub fn is_off(self) -> bool {
        self == Self::Off
    }
}

impl FromStr for TrickMode {
    type Err = ParserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(Self::Off),
            "1" => Ok(Self::Stop),
            "2" => Ok(Self::ShuffleOnly),
            _   => Err(ParserError::InvalidTrick(s.to_string())),
        }
    }
}

impl Display for TrickMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off         => write!(f, "0"),
            Self::Stop        => write!(f, "1"),
            Self::ShuffleOnly => write!(f, "2"),
        }
    }
}

fn valid_input_file(s: &OsStr) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        return Err(anyhow!(ParserError::MissingFile(path.display().to_string())))
            .loc("While parsing arguments")
    }
    if !path.is_file() {
        return Err(anyhow!(ParserError::NotAFile(path.display().to_string())))
            .loc("While parsing arguments")
    }
    Ok(PathBuf::from(s))
}

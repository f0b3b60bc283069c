use thiserror::Error;

#[derive(Error, Debug)]
pub enum CohortError {
    #[error("Feature '{0}' has phenotype measurements but no coordinate within the --fcoord file")]
    MissingCoordinate(String),

    #[error("The genotype matrix contains no SNP after filtering. Check the --snp allow-list and the input file")]
    EmptySnpCatalogue,

    #[error("No feature left after filtering. Check the --ftr allow-list and the phenotype matrices")]
    EmptyFeatureCatalogue,

    #[error("Duplicate feature '{0}' within the phenotype matrix of subgroup '{1}'")]
    DuplicateFeature(String, String),
}

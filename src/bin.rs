// std imports
use std::path::Path;
use std::sync::Arc;

// 3rd party imports
use anyhow::Result;
use clap::{Parser, Subcommand};
use fallible_iterator::FallibleIterator;
use indicatif::ProgressStyle;
use tracing::{debug, info, Level};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

// internal imports
use macpepsearch::biology::digestion_enzyme::functions::get_enzyme_by_name;
use macpepsearch::entities::configuration::SearchConfiguration;
use macpepsearch::entities::constraint::PeptideConstraint;
use macpepsearch::functions::candidate_generator::CandidateGenerator;
use macpepsearch::functions::decoy::DecoyGenerator;
use macpepsearch::functions::ion_series_cache::IonSeriesCache;
use macpepsearch::functions::modification::ModificationCollection;
use macpepsearch::functions::modification_combinator::ModificationCombinator;
use macpepsearch::functions::scoring::{MatchedIonCountScorer, XLinkIonSeriesOracle};
use macpepsearch::functions::sequence_source::InMemorySequenceSource;
use macpepsearch::functions::xlink::search::XLinkSearch;
use macpepsearch::io::modification_csv::reader::Reader as ModificationReader;
use macpepsearch::mass::convert::to_float as mass_to_float;

/// Fragment tolerance (Th) of the ion series scorers used by the CLI
const FRAGMENT_TOLERANCE: f64 = 0.02;

#[derive(Debug, Subcommand)]
enum Commands {
    /// Prints the candidates for a neutral mass as TSV
    Candidates {
        /// Protein FASTA file
        fasta_file: String,
        /// Neutral mass (Da), the precursor window of the configuration is applied
        mass: f64,
        /// JSON configuration, defaults are used for missing keys
        #[arg(long)]
        config: Option<String>,
        /// Modification CSV
        #[arg(long)]
        mods: Option<String>,
        /// If set, decoys are printed instead of targets
        #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
        decoy: bool,
    },
    /// Prints the cross-linked pairs matching a precursor
    XlinkPairs {
        /// Protein FASTA file
        fasta_file: String,
        /// Precursor m/z
        precursor_mz: f64,
        /// Precursor charge
        charge: u8,
        /// JSON configuration, defaults are used for missing keys
        #[arg(long)]
        config: Option<String>,
        /// Modification CSV
        #[arg(long)]
        mods: Option<String>,
    },
    /// Prints the default configuration as JSON
    PrintConfig,
}

#[derive(Debug, Parser)]
#[command(name = "macpepsearch")]
struct Cli {
    /// Verbosity level
    /// 0 - Error
    /// 1 - Warn
    /// 2 - Info
    /// 3 - Debug
    /// > 3 - Trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

/// Loads configuration, modifications and proteins and creates the candidate generator
///
/// # Arguments
/// * `fasta_file` - Protein FASTA file
/// * `config_file` - Optional JSON configuration
/// * `mods_file` - Optional modification CSV
///
fn build_generator(
    fasta_file: &str,
    config_file: Option<&str>,
    mods_file: Option<&str>,
) -> Result<CandidateGenerator> {
    let config = match config_file {
        Some(config_file) => SearchConfiguration::from_json_file(Path::new(config_file))?,
        None => SearchConfiguration::default(),
    };
    let collection = match mods_file {
        Some(mods_file) => ModificationReader::read_collection(Path::new(mods_file))?,
        None => ModificationCollection::empty(),
    };
    debug!("{} modification rules", collection.get_rules().len());

    let enzyme = get_enzyme_by_name(
        config.get_enzyme_name(),
        config.get_max_number_of_missed_cleavages(),
        config.get_min_peptide_length(),
        config.get_max_peptide_length(),
    )?;
    let source = InMemorySequenceSource::from_fasta(Path::new(fasta_file))?.with_peptide_index(
        enzyme.as_ref(),
        config.get_cleavage_specificity(),
        config.get_mass_basis(),
    );

    let combinator = Arc::new(ModificationCombinator::new(
        Arc::new(collection),
        config.get_max_variable_modifications(),
    ));
    Ok(CandidateGenerator::new(
        Arc::new(source),
        combinator,
        Arc::new(config),
    ))
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let verbosity = match args.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(verbosity.into());

    let indicatif_layer = IndicatifLayer::new()
        .with_progress_style(ProgressStyle::with_template(
            "{spinner:.cyan} {span_child_prefix} {span_name} {span_fields} {wide_msg} {elapsed}",
        )?)
        .with_span_child_prefix_symbol("↳ ")
        .with_span_child_prefix_indent(" ");

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .with(filter)
        .init();

    match args.command {
        Commands::Candidates {
            fasta_file,
            mass,
            config,
            mods,
            decoy,
        } => {
            let generator = build_generator(&fasta_file, config.as_deref(), mods.as_deref())?;
            let config = generator.get_config().clone();
            let constraint = PeptideConstraint::from_configuration_for_mass(
                &config,
                mass,
                config.get_precursor_window(),
            )?;
            info!(
                "Strategy for {} ± {} Da: {}",
                mass,
                config.get_precursor_window(),
                generator.get_strategy(&constraint)
            );
            println!("sequence\tmass\tmissed_cleavages\tproteins");
            let mut number_of_candidates: usize = 0;
            for profiles in generator.get_combinator().get_profiles_by_count().iter() {
                for profile in profiles.iter() {
                    let decoy_generator = decoy.then(|| {
                        DecoyGenerator::new(config.get_decoy_method(), config.get_seed())
                    });
                    let mut candidates =
                        generator.open_with_profile(&constraint, profile, decoy_generator)?;
                    while let Some(candidate) = candidates.next()? {
                        println!(
                            "{}\t{}\t{}\t{}",
                            candidate.get_modified_sequence(),
                            mass_to_float(candidate.get_mass()),
                            candidate.get_missed_cleavages(),
                            candidate.get_protein_accessions().join(",")
                        );
                        number_of_candidates += 1;
                    }
                }
            }
            info!("{} candidates", number_of_candidates);
        }
        Commands::XlinkPairs {
            fasta_file,
            precursor_mz,
            charge,
            config,
            mods,
        } => {
            let generator = build_generator(&fasta_file, config.as_deref(), mods.as_deref())?;
            let oracle = Arc::new(XLinkIonSeriesOracle::new(
                Arc::new(IonSeriesCache::new()),
                Arc::new(MatchedIonCountScorer::new(FRAGMENT_TOLERANCE)),
                Arc::new(MatchedIonCountScorer::new(FRAGMENT_TOLERANCE)),
            ));
            let search = XLinkSearch::new(&generator, oracle)?;
            let pairs = search.find_pairs(precursor_mz, charge);
            println!("pair\tmass");
            for pair in pairs.iter() {
                println!("{}\t{}", pair, mass_to_float(pair.get_mass()));
            }
            info!("{} pairs", pairs.len());
        }
        Commands::PrintConfig => {
            println!(
                "{}",
                serde_json::to_string_pretty(&SearchConfiguration::default())?
            );
        }
    }

    Ok(())
}

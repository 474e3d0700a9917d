/// Reader for protein FASTA files
pub mod fasta;
/// Reader for modification rule CSV files
pub mod modification_csv;

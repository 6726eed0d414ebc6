use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use provseal::config::{OperatingMode, SealConfig};
use provseal::error::{SealError, SealResult};
use provseal::pipeline::{seal_artifact, SealRequest};
use provseal::seal::{keys, CheckResult, VerificationStatus, Verifier};

#[derive(Debug, Parser)]
#[command(name = "provseal")]
#[command(about = "Seal artifacts with verifiable provenance", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Seal a file: hash, sign, timestamp, and write its manifest
    Seal(SealArgs),
    /// Verify a sealed artifact against its manifest
    Verify(VerifyArgs),
    /// Create (or show) the operator signing key
    Keygen(KeygenArgs),
}

#[derive(Debug, Args)]
pub struct SealArgs {
    /// File to seal
    pub file: PathBuf,

    /// Declared artifact type (SCREENSHOT, VIDEO, AUDIO, DOCUMENT, LOG, DATASET, OTHER)
    #[arg(long)]
    pub file_type: String,

    /// Identity of the sealing operator
    #[arg(long)]
    pub operator: String,

    /// Free-form description
    #[arg(long)]
    pub description: Option<String>,

    /// Device that captured the artifact
    #[arg(long)]
    pub capture_device: Option<String>,

    /// Sensitivity level (PUBLIC, INTERNAL, CONFIDENTIAL, RESTRICTED, SECRET)
    #[arg(long, default_value = "RESTRICTED")]
    pub sensitivity: String,

    /// Free-form tag; repeatable
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Directory for the manifest (defaults to the file's directory)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Also copy the artifact and manifest into the vault
    #[arg(long)]
    pub copy_to_vault: bool,

    /// Root of the content-addressed vault
    #[arg(long)]
    pub vault_root: Option<PathBuf>,

    /// Seal without a timestamp proof (manifest carries the NONE sentinel)
    #[arg(long)]
    pub skip_timestamp: bool,

    /// Operator signing key file; created on first use
    #[arg(long, default_value = "provseal.key")]
    pub key_file: PathBuf,

    /// Operating mode (standard, strict)
    #[arg(long, default_value = "standard")]
    pub mode: String,
}

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Manifest file
    pub manifest: PathBuf,

    /// Artifact file to check against the manifest
    pub file: PathBuf,

    /// Emit the full report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct KeygenArgs {
    /// Signing key file to create
    #[arg(long, default_value = "provseal.key")]
    pub key_file: PathBuf,
}

pub fn run(cli: Cli) -> SealResult<()> {
    match cli.command {
        Commands::Seal(args) => execute_seal(args),
        Commands::Verify(args) => execute_verify(args),
        Commands::Keygen(args) => execute_keygen(args),
    }
}

fn execute_seal(args: SealArgs) -> SealResult<()> {
    let mode = OperatingMode::parse(&args.mode)?;
    let config = SealConfig::with_mode(mode);

    let request = SealRequest {
        file_path: args.file,
        file_type: args.file_type,
        operator: args.operator,
        description: args.description,
        capture_device: args.capture_device,
        sensitivity: Some(args.sensitivity),
        tags: args.tags,
        output_dir: args.output_dir,
        copy_to_vault: args.copy_to_vault,
        vault_root: args.vault_root,
        skip_timestamp: args.skip_timestamp,
        key_file: args.key_file,
    };

    let outcome = seal_artifact(&request, &config)?;

    println!("Sealed: {}", outcome.manifest.stable_id);
    println!("Manifest: {}", outcome.manifest_path.display());
    if !outcome.manifest.timestamp.is_real() {
        println!("Warning: sealed without a timestamp proof (proofType NONE)");
    }
    if let Some(vault) = &outcome.vault {
        println!("Vault artifact: {}", vault.artifact.display());
        println!("Vault manifest: {}", vault.manifest.display());
    }
    Ok(())
}

fn execute_verify(args: VerifyArgs) -> SealResult<()> {
    let report = Verifier::verify(&args.manifest, &args.file)?;
    let info = &report.verification;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let status = match info.status {
            VerificationStatus::Verified => "VERIFIED",
            VerificationStatus::Warning => "VERIFIED (no timestamp proof)",
            VerificationStatus::Failed => "FAILED",
        };
        println!("Status: {}", status);
        println!("Artifact: {}", info.artifact_info.stable_id);
        println!("Operator: {}", info.artifact_info.operator);
        print_check("structure", info.checks.manifest_structure);
        print_check("signature", info.checks.signature_valid);
        print_check("hash", info.checks.hash_match);
        print_check("custody", info.checks.custody_consistent);
        print_check("stable-id", info.checks.stable_id_match);
        print_check("timestamp", info.checks.timestamp_present);
    }

    if info.status == VerificationStatus::Failed {
        return Err(SealError::VerificationFailed(format!(
            "{} failed verification against {}",
            args.file.display(),
            args.manifest.display()
        )));
    }
    Ok(())
}

fn print_check(name: &str, result: CheckResult) {
    let mark = match result {
        CheckResult::Pass => "pass",
        CheckResult::Fail => "FAIL",
        CheckResult::Skip => "skip",
    };
    println!("  {:<10} {}", name, mark);
}

fn execute_keygen(args: KeygenArgs) -> SealResult<()> {
    let existed = args.key_file.exists();
    let key_manager = keys::load_or_generate(&args.key_file)?;

    if existed {
        println!("Key file already exists: {}", args.key_file.display());
    } else {
        println!("Created key file: {}", args.key_file.display());
    }
    println!("Public key (Ed25519): {}", key_manager.public_key_b64());
    Ok(())
}

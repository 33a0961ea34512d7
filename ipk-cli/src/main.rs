use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use ipk_core::manifest::{self, VirtualFile};
use ipk_core::assemble::PACKAGE_MIME_TYPE;
use ipk_core::payload::DeterministicTarGz;
use ipk_core::{package_file_name, validate, Assembler, LaunchIndicator, PackageSpec};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Indicator {
    Default,
    Spinner,
    None,
}

impl From<Indicator> for LaunchIndicator {
    fn from(i: Indicator) -> Self {
        match i {
            Indicator::Default => LaunchIndicator::Default,
            Indicator::Spinner => LaunchIndicator::Spinner,
            Indicator::None => LaunchIndicator::None,
        }
    }
}

#[derive(Parser)]
#[command(name = "ipk", version, about = "webOS app stub package builder")]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace); IPK_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Assemble the package and write <appId>_<version>.ipk
    Build {
        #[command(flatten)]
        spec: SpecArgs,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// gzip level 0-9
        #[arg(long, default_value_t = 9, value_parser = clap::value_parser!(u32).range(0..=9))]
        level: u32,
    },
    /// Print the files that would go into the package
    Files {
        #[command(flatten)]
        spec: SpecArgs,
    },
    /// Validate the package description only
    Check {
        #[command(flatten)]
        spec: SpecArgs,
    },
}

#[derive(Args, Debug)]
struct SpecArgs {
    /// JSON package description; flags below override its fields
    #[arg(long)]
    spec: Option<PathBuf>,
    #[arg(long)]
    app_id: Option<String>,
    #[arg(long = "app-version")]
    version: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    vendor: Option<String>,
    #[arg(long)]
    icon_color: Option<String>,
    #[arg(long)]
    hidden: bool,
    #[arg(long, value_enum)]
    launch_indicator: Option<Indicator>,
    /// Literal run.sh body
    #[arg(long, conflicts_with_all = ["target", "params"])]
    script: Option<String>,
    /// App to launch (shortcut mode)
    #[arg(long)]
    target: Option<String>,
    /// JSON launch parameters for --target
    #[arg(long, requires = "target")]
    params: Option<String>,
    #[arg(long)]
    maintainer: Option<String>,
    #[arg(long)]
    mtime: Option<u64>,
}

impl SpecArgs {
    fn resolve(self) -> Result<PackageSpec> {
        let mut spec = match (&self.spec, self.app_id.clone()) {
            (Some(path), _) => PackageSpec::from_json_path(path)?,
            (None, Some(id)) => PackageSpec::new(id),
            (None, None) => anyhow::bail!("either --spec or --app-id is required"),
        };
        if let Some(v) = self.app_id {
            spec.app_id = v;
        }
        if let Some(v) = self.version {
            spec.version = v;
        }
        if let Some(v) = self.title {
            spec.title = v;
        }
        if let Some(v) = self.vendor {
            spec.vendor = v;
        }
        if let Some(v) = self.icon_color {
            spec.icon_color = v;
        }
        if self.hidden {
            spec.visible = false;
        }
        if let Some(v) = self.launch_indicator {
            spec.launch_indicator = v.into();
        }
        if let Some(v) = self.maintainer {
            spec.maintainer = v;
        }
        if let Some(v) = self.mtime {
            spec.mtime = v;
        }
        if let Some(script) = self.script {
            spec = spec.with_script(script);
        } else if let Some(target) = self.target {
            spec = spec.with_shortcut(target, self.params.unwrap_or_else(|| "{}".to_string()));
        }
        Ok(spec)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Cmd::Build { spec, out_dir, level } => build(spec.resolve()?, &out_dir, level)?,
        Cmd::Files { spec } => files(&spec.resolve()?)?,
        Cmd::Check { spec } => check(&spec.resolve()?)?,
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("IPK_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn build(spec: PackageSpec, out_dir: &Path, level: u32) -> Result<()> {
    let pkg = Assembler::new(DeterministicTarGz::new(level))
        .assemble(&spec)
        .with_context(|| format!("assemble {}", spec.app_id))?;
    fs::create_dir_all(out_dir).with_context(|| format!("create dir {:?}", out_dir))?;
    let path = out_dir.join(package_file_name(&spec));
    fs::write(&path, &pkg).with_context(|| format!("write {:?}", path))?;
    tracing::info!(
        path = %path.display(),
        bytes = pkg.len(),
        mime = PACKAGE_MIME_TYPE,
        "wrote package"
    );
    println!("{}", path.display());
    Ok(())
}

fn files(spec: &PackageSpec) -> Result<()> {
    let set = manifest::build(spec)?;
    println!("# control.tar.gz");
    set.control_files.iter().for_each(print_file);
    println!("# data.tar.gz");
    set.data_files.iter().for_each(print_file);
    Ok(())
}

fn print_file(f: &VirtualFile) {
    println!("{:o} {:>6} {}", f.mode, f.content.len(), f.path);
    match std::str::from_utf8(&f.content) {
        Ok(text) => {
            for line in text.lines() {
                println!("    {line}");
            }
        }
        Err(_) => println!("    <binary>"),
    }
}

fn check(spec: &PackageSpec) -> Result<()> {
    validate::validate_spec(spec)?;
    // also catches malformed shortcut params
    manifest::launch_script(&spec.launch)?;
    println!("OK {}", package_file_name(spec));
    Ok(())
}

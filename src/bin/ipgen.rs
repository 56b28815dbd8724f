// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use ipgen::{
    build, AnalysisRequest, AnalyzerConfig, BuildConfig, DirTemplates, InterfaceFamily, Renderer,
    VerilogAnalyzer,
};

/// Packages a Verilog module with memory-mapped bus resources as an IP core.
#[derive(Parser, Debug)]
#[command(name = "ipgen", version)]
struct Options {
    /// Name of the user logic top module
    topmodule: String,
    /// Verilog source files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// TOML configuration file with a [synthesis] table
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Interface type
    #[arg(long, value_enum)]
    iftype: Option<InterfaceFamily>,
    #[arg(long)]
    ext_addrwidth: Option<u32>,
    #[arg(long)]
    ext_burstlength: Option<u32>,
    /// Drive the user logic and the bus from one clock (`=false` turns it off)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    single_clock: Option<bool>,
    #[arg(long)]
    sim_addrwidth: Option<u32>,
    /// Half period of the user logic clock in simulation
    #[arg(long)]
    hperiod_ulogic: Option<u32>,
    /// Half period of the bus clock in simulation
    #[arg(long)]
    hperiod_bus: Option<u32>,
    /// Memory image loaded by the test bench (`.bin` for raw binary)
    #[arg(long)]
    memimg: Option<PathBuf>,
    /// Verilog code inserted into the test bench
    #[arg(long)]
    usertest: Option<PathBuf>,
    /// Continue when instantiated modules have no definition
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    skip_not_found: Option<bool>,
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    ignore_protocol_error: Option<bool>,
    /// Output file (general) or directory receiving the package
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Directory with replacement templates
    #[arg(long)]
    template_dir: Option<PathBuf>,
    /// Include directory for `include
    #[arg(short = 'I', long = "include")]
    include: Vec<PathBuf>,
    /// Macro definition, NAME or NAME=VALUE
    #[arg(short = 'D', long = "define")]
    define: Vec<String>,
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Options {
    /// File settings overlaid with whatever was given on the command line.
    fn build_config(&self) -> Result<BuildConfig, ipgen::IpgenError> {
        let mut config = match &self.config {
            Some(path) => BuildConfig::from_toml_file(path)?,
            None => BuildConfig::default(),
        };
        if let Some(family) = self.iftype {
            config.if_type = family;
        }
        if let Some(v) = self.ext_addrwidth {
            config.ext_addrwidth = v;
        }
        if let Some(v) = self.ext_burstlength {
            config.ext_burstlength = v;
        }
        if let Some(v) = self.sim_addrwidth {
            config.sim_addrwidth = v;
        }
        if let Some(v) = self.hperiod_ulogic {
            config.hperiod_ulogic = v;
        }
        if let Some(v) = self.hperiod_bus {
            config.hperiod_bus = v;
        }
        if let Some(v) = self.single_clock {
            config.single_clock = v;
        }
        if let Some(v) = self.skip_not_found {
            config.skip_not_found = v;
        }
        if let Some(v) = self.ignore_protocol_error {
            config.ignore_protocol_error = v;
        }
        if self.output.is_some() {
            config.output = self.output.clone();
        }
        if self.memimg.is_some() {
            config.memimg = self.memimg.clone();
        }
        if self.usertest.is_some() {
            config.usertest = self.usertest.clone();
        }
        Ok(config)
    }

    fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            incdirs: self.include.clone(),
            defines: self
                .define
                .iter()
                .map(|d| match d.split_once('=') {
                    Some((name, value)) => (name.to_string(), value.to_string()),
                    None => (d.clone(), String::new()),
                })
                .collect(),
        }
    }
}

fn run(options: &Options) -> Result<(), ipgen::IpgenError> {
    let config = options.build_config()?;
    let renderer = match &options.template_dir {
        Some(dir) => Renderer::new(DirTemplates::new(dir))?,
        None => Renderer::builtin()?,
    };
    let analyzer = VerilogAnalyzer::new(options.analyzer_config());
    let request = AnalysisRequest::from_files(&options.topmodule, &options.files);
    let set = build(&analyzer, &request, &config, &renderer)?;
    for path in set.paths() {
        log::info!("  {}", set.root.join(path).display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let options = Options::parse();
    let level = match options.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ipgen: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("ipgen.toml");
        std::fs::write(
            &config,
            "[synthesis]\nif_type = \"avalon\"\next_addrwidth = 16\nhperiod_bus = 10\n",
        )
        .unwrap();
        let options = Options::try_parse_from([
            "ipgen",
            "foo",
            "foo.v",
            "-c",
            config.to_str().unwrap(),
            "--ext-addrwidth",
            "20",
            "--single-clock",
            "-D",
            "WIDTH=8",
            "-D",
            "FAST",
        ])
        .unwrap();
        let cfg = options.build_config().unwrap();
        assert_eq!(cfg.if_type, InterfaceFamily::Avalon);
        assert_eq!(cfg.ext_addrwidth, 20);
        assert_eq!(cfg.hperiod_bus, 10);
        assert!(cfg.single_clock);
        assert_eq!(
            options.analyzer_config().defines,
            [
                ("WIDTH".to_string(), "8".to_string()),
                ("FAST".to_string(), String::new())
            ]
        );
    }

    #[test]
    fn command_line_turns_off_file_switches() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("ipgen.toml");
        std::fs::write(
            &config,
            "[synthesis]\n\
             single_clock = true\n\
             skip_not_found = true\n\
             ignore_protocol_error = true\n",
        )
        .unwrap();
        let path = config.to_str().unwrap();

        let options = Options::try_parse_from(["ipgen", "foo", "foo.v", "-c", path]).unwrap();
        let cfg = options.build_config().unwrap();
        assert!(cfg.single_clock && cfg.skip_not_found && cfg.ignore_protocol_error);

        let options = Options::try_parse_from([
            "ipgen",
            "foo",
            "foo.v",
            "-c",
            path,
            "--single-clock=false",
            "--skip-not-found=false",
            "--ignore-protocol-error=false",
        ])
        .unwrap();
        let cfg = options.build_config().unwrap();
        assert!(!cfg.single_clock);
        assert!(!cfg.skip_not_found);
        assert!(!cfg.ignore_protocol_error);
    }

    #[test]
    fn files_are_required() {
        assert!(Options::try_parse_from(["ipgen", "foo"]).is_err());
    }
}

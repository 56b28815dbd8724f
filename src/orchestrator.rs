// SPDX-License-Identifier: Apache-2.0

use log::{debug, warn};

use crate::assemble::assemble;
use crate::profile::{profile_for, ArtifactSet, Design};
use crate::render::Renderer;
use crate::{AnalysisError, AnalysisRequest, Analyzer, BuildConfig, Result};

/// Progress of a single build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildState {
    Validating,
    Analyzing,
    Packaged,
    Failed,
}

/// Validates `config`, analyzes the user design and writes its package.
///
/// The configuration is checked before the analyzer runs, so a bad
/// configuration never touches the file system. Instantiated modules with
/// no definition abort the build unless `config.skip_not_found` is set.
pub fn build(
    analyzer: &dyn Analyzer,
    request: &AnalysisRequest,
    config: &BuildConfig,
    renderer: &Renderer,
) -> Result<ArtifactSet> {
    let mut state = BuildState::Validating;
    let result = run(analyzer, request, config, renderer, &mut state);
    match &result {
        Ok(_) => state = BuildState::Packaged,
        Err(e) => {
            debug!("Build failed in state {state:?}: {e}");
            state = BuildState::Failed;
        }
    }
    debug!("Build of {} finished: {state:?}", request.top);
    result
}

fn run(
    analyzer: &dyn Analyzer,
    request: &AnalysisRequest,
    config: &BuildConfig,
    renderer: &Renderer,
    state: &mut BuildState,
) -> Result<ArtifactSet> {
    debug!("{state:?}");
    config.validate()?;

    *state = BuildState::Analyzing;
    debug!("{state:?} {}", request.top);
    let analysis = analyzer.analyze(request)?;
    if !analysis.not_found.is_empty() {
        if config.skip_not_found {
            for name in &analysis.not_found {
                warn!("Module '{name}' not found, skipped");
            }
        } else {
            return Err(AnalysisError::ModulesNotFound(analysis.not_found).into());
        }
    }

    let profile = profile_for(config.if_type);
    let design = Design::from(analysis);
    assemble(profile.as_ref(), &design, config, renderer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Analysis, InterfaceFamily, IpgenError, ModuleInterface};
    use std::cell::Cell;
    use std::path::PathBuf;

    struct Fixed {
        not_found: Vec<String>,
        calls: Cell<usize>,
    }

    impl Fixed {
        fn new(not_found: &[&str]) -> Fixed {
            Fixed {
                not_found: not_found.iter().map(|s| s.to_string()).collect(),
                calls: Cell::new(0),
            }
        }
    }

    impl Analyzer for Fixed {
        fn analyze(&self, request: &AnalysisRequest) -> Result<Analysis> {
            self.calls.set(self.calls.get() + 1);
            Ok(Analysis {
                interface: ModuleInterface::builder(&request.top).build(),
                hdl: format!("module {};\nendmodule\n", request.top),
                not_found: self.not_found.clone(),
            })
        }
    }

    fn generic(output: PathBuf) -> BuildConfig {
        BuildConfig {
            if_type: InterfaceFamily::Generic,
            output: Some(output),
            ..Default::default()
        }
    }

    #[test]
    fn invalid_config_skips_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = Fixed::new(&[]);
        let config = BuildConfig {
            single_clock: true,
            hperiod_bus: 10,
            output: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let request = AnalysisRequest::from_verilog("foo", "");
        let renderer = Renderer::builtin().unwrap();
        let err = build(&analyzer, &request, &config, &renderer).unwrap_err();
        assert!(matches!(err, IpgenError::Config(_)));
        assert_eq!(analyzer.calls.get(), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_modules_abort_unless_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.v");
        let request = AnalysisRequest::from_verilog("foo", "");
        let renderer = Renderer::builtin().unwrap();
        let analyzer = Fixed::new(&["bar"]);

        let err = build(&analyzer, &request, &generic(out.clone()), &renderer).unwrap_err();
        assert!(matches!(
            err,
            IpgenError::Analysis(AnalysisError::ModulesNotFound(ref names)) if names == &["bar"]
        ));
        assert!(!out.exists());

        let config = BuildConfig {
            skip_not_found: true,
            ..generic(out.clone())
        };
        build(&analyzer, &request, &config, &renderer).unwrap();
        assert!(out.exists());
    }
}

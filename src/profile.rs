// SPDX-License-Identifier: Apache-2.0

//! Per-family packaging strategies.
//!
//! A [`Profile`] decides which templates a family needs, which directories
//! its package tree has and what goes into every file. Profiles only
//! produce an [`ArtifactSet`] in memory; [`crate::materialize`] writes it
//! out.

use std::path::{Path, PathBuf};

use crate::render::{Boilerplate, RenderContext, Renderer, TemplateName};
use crate::util::{expand_user, is_binary_image};
use crate::{
    Analysis, BuildConfig, Classification, InterfaceFamily, IpgenError, ModuleInterface, Result,
};

mod avalon;
mod axi;
mod generic;
pub use avalon::AvalonProfile;
pub use axi::AxiProfile;
pub use generic::GenericProfile;

/// Version suffix of the package directory.
pub const IPCORE_VERSION: &str = "_v1_00_a";
/// Version suffix of the AXI descriptor files.
pub const MPD_VERSION: &str = "_v2_1_0";
/// Name of the copied memory image inside `test/`.
pub const MEMIMG_NAME: &str = "mem.img";
pub const MAKEFILE_NAME: &str = "Makefile";
/// Avalon packages keep the protocol sources in their own file.
pub const COMMON_HDL_NAME: &str = "ipgen_common.v";

/// The analyzed user design handed to a profile.
#[derive(Clone, Debug)]
pub struct Design {
    pub interface: ModuleInterface,
    /// HDL of the user logic, emitted after the wrapper.
    pub user_hdl: String,
}

impl From<Analysis> for Design {
    fn from(analysis: Analysis) -> Self {
        Design {
            interface: analysis.interface,
            user_hdl: analysis.hdl,
        }
    }
}

/// What ends up in an output file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    Text(String),
    /// Byte-for-byte copy of an existing file.
    Copy(PathBuf),
}

/// One file of the package, relative to the package root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub content: Content,
}

/// Package root and the directories below it, parents before children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub root: PathBuf,
    pub dirs: Vec<PathBuf>,
}

/// Everything one build produces. Created fresh for every build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactSet {
    pub root: PathBuf,
    /// Directories to create, relative to `root`.
    pub dirs: Vec<PathBuf>,
    pub artifacts: Vec<Artifact>,
}

impl ArtifactSet {
    pub fn new(layout: Layout) -> ArtifactSet {
        ArtifactSet {
            root: layout.root,
            dirs: layout.dirs,
            artifacts: Vec::new(),
        }
    }

    pub fn push(&mut self, path: impl Into<PathBuf>, content: Content) {
        self.artifacts.push(Artifact {
            path: path.into(),
            content,
        });
    }

    pub fn push_text(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.push(path, Content::Text(text.into()));
    }

    /// Looks up an artifact by its path relative to the root.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&Content> {
        self.artifacts
            .iter()
            .find(|a| a.path == path.as_ref())
            .map(|a| &a.content)
    }

    /// Rendered text of a file, `None` for copies and unknown paths.
    pub fn text(&self, path: impl AsRef<Path>) -> Option<&str> {
        match self.get(path) {
            Some(Content::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Relative paths of every artifact, in emission order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.artifacts.iter().map(|a| a.path.as_path())
    }
}

/// Packaging strategy of one interface family.
pub trait Profile {
    fn family(&self) -> InterfaceFamily;

    /// Templates this profile renders.
    fn select_templates(&self) -> &'static [TemplateName];

    /// Directory tree of a package for `module` created under `output_root`.
    fn layout(&self, output_root: &Path, module: &str) -> Layout;

    /// Renders every file of the package into memory.
    fn artifacts(
        &self,
        design: &Design,
        config: &BuildConfig,
        renderer: &Renderer,
    ) -> Result<ArtifactSet>;
}

pub fn profile_for(family: InterfaceFamily) -> Box<dyn Profile> {
    match family {
        InterfaceFamily::Generic => Box::new(GenericProfile),
        InterfaceFamily::Axi => Box::new(AxiProfile),
        InterfaceFamily::Avalon => Box::new(AvalonProfile),
    }
}

/// File names derived from the user module name. Every cross-reference in
/// a package goes through these.
#[derive(Clone, Debug)]
pub(crate) struct Names<'a> {
    module: &'a str,
}

impl<'a> Names<'a> {
    pub(crate) fn new(module: &'a str) -> Names<'a> {
        Names { module }
    }

    pub(crate) fn package_dir(&self) -> String {
        format!("ipgen_{}{IPCORE_VERSION}", self.module)
    }

    pub(crate) fn hdl(&self) -> String {
        format!("ipgen_{}.v", self.module)
    }

    pub(crate) fn test(&self) -> String {
        format!("test_ipgen_{}.v", self.module)
    }

    /// `ipgen_<m>` followed by `suffix`, e.g. `.tcl`.
    pub(crate) fn with_suffix(&self, suffix: &str) -> String {
        format!("ipgen_{}{suffix}", self.module)
    }
}

/// Context shared by every template of a build: the user interface and the
/// bus geometry.
pub(crate) fn base_context(
    intf: &ModuleInterface,
    classification: &Classification,
    config: &BuildConfig,
) -> RenderContext {
    RenderContext {
        def_top_parameters: classification.def_parameters.clone(),
        def_bench_parameters: classification.def_bench_parameters.clone(),
        def_top_localparams: classification.def_localparams.clone(),
        def_top_ioports: classification.def_ioports.clone(),
        name_top_parameters: classification.parameter_names.clone(),
        name_top_ioports: classification.ioport_names.clone(),
        ext_addrwidth: config.ext_addrwidth,
        single_clock: config.single_clock,
        ..RenderContext::new(intf.name(), intf.masters(), intf.slaves())
    }
    .with_burstlength(config.ext_burstlength)
}

/// Renders the wrapper, appends the user HDL and concatenates the protocol
/// sources. Returns `(synthesized, common)`.
pub(crate) fn synthesize(
    renderer: &Renderer,
    node: TemplateName,
    ctx: &RenderContext,
    user_hdl: &str,
    common: &[Boilerplate],
) -> Result<(String, String)> {
    let mut synthesized = renderer.render(node, ctx)?;
    synthesized.push_str(user_hdl);
    let mut common_code = String::new();
    for b in common {
        common_code.push_str(&renderer.boilerplate(*b)?);
    }
    Ok((synthesized, common_code))
}

/// Test scaffolding shared by the packaged families.
pub(crate) struct TestBench {
    pub template: TemplateName,
    /// Simulation fixture appended to the rendered bench.
    pub fixture: Boilerplate,
    /// Separate protocol source the Makefile compiles, if any.
    pub common_hdlname: Option<String>,
}

impl TestBench {
    /// Pushes `test/<bench>`, the optional `test/mem.img` and
    /// `test/Makefile`.
    pub(crate) fn push_artifacts(
        &self,
        set: &mut ArtifactSet,
        base: &RenderContext,
        classification: &Classification,
        config: &BuildConfig,
        names: &Names,
        renderer: &Renderer,
    ) -> Result<()> {
        let usertestcode = match &config.usertest {
            Some(path) => std::fs::read_to_string(path).map_err(|e| IpgenError::io(path, e))?,
            None => String::new(),
        };
        let common_hdlname = self.common_hdlname.clone().unwrap_or_default();

        let ctx = RenderContext {
            def_top_ioports: classification.def_wires.clone(),
            hdlname: names.hdl(),
            common_hdlname: common_hdlname.clone(),
            testname: names.test(),
            ipcore_version: IPCORE_VERSION.to_string(),
            memimg: config.memimg.as_ref().map(|_| MEMIMG_NAME.to_string()),
            binfile: config.memimg.as_deref().is_some_and(is_binary_image),
            usertestcode,
            simaddrwidth: config.sim_addrwidth,
            clock_hperiod_userlogic: config.hperiod_ulogic,
            clock_hperiod_bus: config.hperiod_bus,
            ignore_protocol_error: config.ignore_protocol_error,
            ..base.clone()
        };
        let mut bench = renderer.render(self.template, &ctx)?;
        bench.push_str(&renderer.boilerplate(self.fixture)?);
        set.push_text(Path::new("test").join(names.test()), bench);

        if let Some(memimg) = &config.memimg {
            set.push(
                Path::new("test").join(MEMIMG_NAME),
                Content::Copy(expand_user(memimg)),
            );
        }

        let makefile_ctx = RenderContext {
            hdlname: names.hdl(),
            common_hdlname,
            testname: names.test(),
            ..base.clone()
        };
        set.push_text(
            Path::new("test").join(MAKEFILE_NAME),
            renderer.render(TemplateName::Makefile, &makefile_ctx)?,
        );
        Ok(())
    }
}

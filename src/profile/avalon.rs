// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use crate::profile::{
    base_context, synthesize, ArtifactSet, Design, Layout, Names, Profile, TestBench,
    COMMON_HDL_NAME, IPCORE_VERSION,
};
use crate::render::{Boilerplate, RenderContext, Renderer, TemplateName};
use crate::{BuildConfig, Classifier, InterfaceFamily, Result};

const DIRS: [&str; 3] = ["hdl", "hdl/verilog", "test"];

const COMMON: [Boilerplate; 4] = [
    Boilerplate::AvalonMasterInterface,
    Boilerplate::AvalonLiteMasterInterface,
    Boilerplate::AvalonSlaveInterface,
    Boilerplate::AvalonLiteSlaveInterface,
];

/// Qsys component package. The protocol sources live in `ipgen_common.v`
/// next to the wrapper instead of being appended to it.
#[derive(Clone, Copy, Debug, Default)]
pub struct AvalonProfile;

impl Profile for AvalonProfile {
    fn family(&self) -> InterfaceFamily {
        InterfaceFamily::Avalon
    }

    fn select_templates(&self) -> &'static [TemplateName] {
        &[
            TemplateName::NodeAvalon,
            TemplateName::QsysTcl,
            TemplateName::TestAvalon,
            TemplateName::Makefile,
        ]
    }

    fn layout(&self, output_root: &Path, module: &str) -> Layout {
        Layout {
            root: output_root.join(Names::new(module).package_dir()),
            dirs: DIRS.iter().map(PathBuf::from).collect(),
        }
    }

    fn artifacts(
        &self,
        design: &Design,
        config: &BuildConfig,
        renderer: &Renderer,
    ) -> Result<ArtifactSet> {
        let intf = &design.interface;
        let names = Names::new(intf.name());
        let classification = Classifier::new(self.family()).classify(intf);
        let base = base_context(intf, &classification, config);

        let (synthesized, common) = synthesize(
            renderer,
            TemplateName::NodeAvalon,
            &base,
            &design.user_hdl,
            &COMMON,
        )?;

        let ctx = RenderContext {
            hdlname: names.hdl(),
            common_hdlname: COMMON_HDL_NAME.to_string(),
            ipcore_version: IPCORE_VERSION.to_string(),
            tcl_parameters: classification.parameters.clone(),
            tcl_ports: classification.ports.clone(),
            ..base.clone()
        };

        let verilog = Path::new("hdl").join("verilog");
        let mut set = ArtifactSet::new(self.layout(&config.package_root(), intf.name()));
        set.push_text(
            verilog.join(names.with_suffix(".tcl")),
            renderer.render(TemplateName::QsysTcl, &ctx)?,
        );
        set.push_text(verilog.join(names.hdl()), synthesized);
        set.push_text(verilog.join(COMMON_HDL_NAME), common);

        TestBench {
            template: TemplateName::TestAvalon,
            fixture: Boilerplate::AvalonMasterFifo,
            common_hdlname: Some(COMMON_HDL_NAME.to_string()),
        }
        .push_artifacts(&mut set, &base, &classification, config, &names, renderer)?;

        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::tests::design;

    fn build(config: &BuildConfig) -> ArtifactSet {
        let renderer = Renderer::builtin().unwrap();
        AvalonProfile.artifacts(&design(), config, &renderer).unwrap()
    }

    #[test]
    fn package_tree() {
        let set = build(&BuildConfig {
            if_type: InterfaceFamily::Avalon,
            ..Default::default()
        });
        assert_eq!(set.root, Path::new(".").join("ipgen_foo_v1_00_a"));
        let dirs: Vec<&Path> = set.dirs.iter().map(PathBuf::as_path).collect();
        assert_eq!(
            dirs,
            [
                Path::new("hdl"),
                Path::new("hdl/verilog"),
                Path::new("test")
            ]
        );
        let paths: Vec<String> = set
            .paths()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(
            paths,
            [
                "hdl/verilog/ipgen_foo.tcl",
                "hdl/verilog/ipgen_foo.v",
                "hdl/verilog/ipgen_common.v",
                "test/test_ipgen_foo.v",
                "test/Makefile",
            ]
        );
    }

    #[test]
    fn protocol_sources_are_separate() {
        let set = build(&BuildConfig::default());
        let hdl = set.text("hdl/verilog/ipgen_foo.v").unwrap();
        let common = set.text("hdl/verilog/ipgen_common.v").unwrap();
        assert!(hdl.contains("module ipgen_foo"));
        assert!(!hdl.contains("module ipgen_master_memory"));
        assert!(common.contains("module ipgen_master_memory"));
        assert!(set
            .text("test/Makefile")
            .unwrap()
            .contains("../hdl/verilog/ipgen_common.v"));
    }

    #[test]
    fn qsys_script_lists_conduits_and_parameters() {
        let set = build(&BuildConfig::default());
        let tcl = set.text("hdl/verilog/ipgen_foo.tcl").unwrap();
        assert!(tcl.contains("coe_go go Input 1"));
        assert!(tcl.contains("ipgen_foo.v"));
        assert!(tcl.contains("add_parameter W INTEGER 32"));
        assert!(!tcl.contains("add_parameter D "));
    }

    #[test]
    fn usertest_code_is_spliced() {
        let dir = tempfile::tempdir().unwrap();
        let usertest = dir.path().join("usertest.v");
        std::fs::write(&usertest, "initial $display(\"hello\");\n").unwrap();
        let set = build(&BuildConfig {
            usertest: Some(usertest),
            ..Default::default()
        });
        let bench = set.text("test/test_ipgen_foo.v").unwrap();
        let splice = bench.find("$display(\"hello\")").unwrap();
        assert!(splice < bench.find("module avalon_master_fifo").unwrap());
    }
}

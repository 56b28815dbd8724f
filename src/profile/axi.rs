// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use crate::profile::{
    base_context, synthesize, ArtifactSet, Design, Layout, Names, Profile, TestBench,
    IPCORE_VERSION, MPD_VERSION,
};
use crate::render::{Boilerplate, MemoryRegion, RenderContext, Renderer, TemplateName};
use crate::{BuildConfig, Classifier, InterfaceFamily, Result};

const DIRS: [&str; 7] = ["data", "doc", "bd", "xgui", "hdl", "hdl/verilog", "test"];

const COMMON: [Boilerplate; 4] = [
    Boilerplate::AxiMasterInterface,
    Boilerplate::AxiLiteMasterInterface,
    Boilerplate::AxiSlaveInterface,
    Boilerplate::AxiLiteSlaveInterface,
];

/// Xilinx-style pcore / IP-XACT package.
#[derive(Clone, Copy, Debug, Default)]
pub struct AxiProfile;

impl Profile for AxiProfile {
    fn family(&self) -> InterfaceFamily {
        InterfaceFamily::Axi
    }

    fn select_templates(&self) -> &'static [TemplateName] {
        &[
            TemplateName::NodeAxi,
            TemplateName::Mpd,
            TemplateName::Pao,
            TemplateName::ComponentXml,
            TemplateName::XguiTcl,
            TemplateName::TestAxi,
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

        let (synthesized, common) =
            synthesize(renderer, TemplateName::NodeAxi, &base, &design.user_hdl, &COMMON)?;

        let memory_map = intf
            .masters()
            .iter()
            .map(|m| MemoryRegion::new(m, true, config.ext_addrwidth))
            .chain(
                intf.slaves()
                    .iter()
                    .map(|s| MemoryRegion::new(s, false, config.ext_addrwidth)),
            )
            .collect();
        let ctx = RenderContext {
            hdlname: names.hdl(),
            ipcore_version: IPCORE_VERSION.to_string(),
            mpd_parameters: classification.parameters.clone(),
            mpd_ports: classification.ports.clone(),
            ipxact_parameters: classification.parameters.clone(),
            ipxact_ports: classification.ports.clone(),
            memory_map,
            ..base.clone()
        };

        let data = Path::new("data");
        let versioned = names.with_suffix(MPD_VERSION);
        let mut set = ArtifactSet::new(self.layout(&config.package_root(), intf.name()));

        set.push_text(
            data.join(format!("{versioned}.mpd")),
            renderer.render(TemplateName::Mpd, &ctx)?,
        );
        set.push_text(
            data.join(format!("{versioned}.pao")),
            renderer.render(TemplateName::Pao, &ctx)?,
        );
        set.push_text(
            data.join(format!("{versioned}.tcl")),
            dual_clock_only(config, renderer, Boilerplate::PcoreTcl)?,
        );
        set.push_text(
            "component.xml",
            renderer.render(TemplateName::ComponentXml, &ctx)?,
        );
        set.push_text(
            data.join(names.with_suffix(".xdc")),
            dual_clock_only(config, renderer, Boilerplate::IpxactXdc)?,
        );
        set.push_text(
            Path::new("bd").join("bd.tcl"),
            renderer.boilerplate(Boilerplate::BdTcl)?,
        );
        set.push_text(
            Path::new("xgui").join("xgui.tcl"),
            renderer.render(TemplateName::XguiTcl, &ctx)?,
        );
        set.push_text(
            Path::new("hdl").join("verilog").join(names.hdl()),
            synthesized + &common,
        );

        TestBench {
            template: TemplateName::TestAxi,
            fixture: Boilerplate::AxiMasterFifo,
            common_hdlname: None,
        }
        .push_artifacts(&mut set, &base, &classification, config, &names, renderer)?;

        Ok(set)
    }
}

/// Clock-crossing scripts only apply when the bus and the user logic run on
/// separate clocks.
fn dual_clock_only(
    config: &BuildConfig,
    renderer: &Renderer,
    boilerplate: Boilerplate,
) -> Result<String> {
    if config.single_clock {
        Ok(String::new())
    } else {
        Ok(renderer.boilerplate(boilerplate)?)
    }
}

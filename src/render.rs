// SPDX-License-Identifier: Apache-2.0

//! Template rendering.
//!
//! Templates are looked up by canonical name through a [`TemplateSource`]
//! and rendered with `tera` against a [`RenderContext`]. Boilerplate files
//! (protocol interface sources, test fixtures, fixed scripts) are returned
//! verbatim.

use tera::{Context, Tera};

use crate::TemplateError;

mod context;
mod source;
pub use context::{MemoryRegion, RenderContext};
pub use source::{BuiltinTemplates, DirTemplates, TemplateSource};

/// Canonical names of the rendered templates, one per artifact kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemplateName {
    NodeGeneral,
    NodeAxi,
    NodeAvalon,
    Mpd,
    Pao,
    XguiTcl,
    ComponentXml,
    QsysTcl,
    TestAxi,
    TestAvalon,
    Makefile,
}

impl TemplateName {
    pub const ALL: [TemplateName; 11] = [
        TemplateName::NodeGeneral,
        TemplateName::NodeAxi,
        TemplateName::NodeAvalon,
        TemplateName::Mpd,
        TemplateName::Pao,
        TemplateName::XguiTcl,
        TemplateName::ComponentXml,
        TemplateName::QsysTcl,
        TemplateName::TestAxi,
        TemplateName::TestAvalon,
        TemplateName::Makefile,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            TemplateName::NodeGeneral => "node_general.txt",
            TemplateName::NodeAxi => "node_axi.txt",
            TemplateName::NodeAvalon => "node_avalon.txt",
            TemplateName::Mpd => "mpd.txt",
            TemplateName::Pao => "pao.txt",
            TemplateName::XguiTcl => "xgui_tcl.txt",
            TemplateName::ComponentXml => "component_xml.txt",
            TemplateName::QsysTcl => "qsys_tcl.txt",
            TemplateName::TestAxi => "test_ipgen_axi.txt",
            TemplateName::TestAvalon => "test_ipgen_avalon.txt",
            TemplateName::Makefile => "Makefile.txt",
        }
    }
}

/// Fixed files that are copied into the package without rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Boilerplate {
    AxiMasterInterface,
    AxiLiteMasterInterface,
    AxiSlaveInterface,
    AxiLiteSlaveInterface,
    AvalonMasterInterface,
    AvalonLiteMasterInterface,
    AvalonSlaveInterface,
    AvalonLiteSlaveInterface,
    AxiMasterFifo,
    AvalonMasterFifo,
    PcoreTcl,
    IpxactXdc,
    BdTcl,
}

impl Boilerplate {
    pub fn file_name(&self) -> &'static str {
        match self {
            Boilerplate::AxiMasterInterface => "axi_master_interface.v",
            Boilerplate::AxiLiteMasterInterface => "axi_lite_master_interface.v",
            Boilerplate::AxiSlaveInterface => "axi_slave_interface.v",
            Boilerplate::AxiLiteSlaveInterface => "axi_lite_slave_interface.v",
            Boilerplate::AvalonMasterInterface => "avalon_master_interface.v",
            Boilerplate::AvalonLiteMasterInterface => "avalon_lite_master_interface.v",
            Boilerplate::AvalonSlaveInterface => "avalon_slave_interface.v",
            Boilerplate::AvalonLiteSlaveInterface => "avalon_lite_slave_interface.v",
            Boilerplate::AxiMasterFifo => "axi_master_fifo.v",
            Boilerplate::AvalonMasterFifo => "avalon_master_fifo.v",
            Boilerplate::PcoreTcl => "pcore_tcl.tcl",
            Boilerplate::IpxactXdc => "ipxact.xdc",
            Boilerplate::BdTcl => "bd.tcl",
        }
    }
}

/// Binds named templates to a [`RenderContext`]. Rendering is pure; nothing
/// here touches the output tree.
pub struct Renderer {
    tera: Tera,
    source: Box<dyn TemplateSource>,
}

impl Renderer {
    /// Loads every canonical template from `source`. Fails if one is missing
    /// or does not parse.
    pub fn new(source: impl TemplateSource + 'static) -> Result<Renderer, TemplateError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        for name in TemplateName::ALL {
            let text = source
                .lookup(name.file_name())
                .ok_or_else(|| TemplateError::NotFound(name.file_name().to_string()))?;
            tera.add_raw_template(name.file_name(), &text)?;
        }
        Ok(Renderer {
            tera,
            source: Box::new(source),
        })
    }

    /// Renderer backed by the templates compiled into the crate.
    pub fn builtin() -> Result<Renderer, TemplateError> {
        Renderer::new(BuiltinTemplates)
    }

    pub fn render(&self, name: TemplateName, ctx: &RenderContext) -> Result<String, TemplateError> {
        let context = Context::from_serialize(ctx)?;
        Ok(self.tera.render(name.file_name(), &context)?)
    }

    pub fn boilerplate(&self, name: Boilerplate) -> Result<String, TemplateError> {
        self.source
            .lookup(name.file_name())
            .map(|text| text.into_owned())
            .ok_or_else(|| TemplateError::NotFound(name.file_name().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    struct Missing;

    impl TemplateSource for Missing {
        fn lookup(&self, file_name: &str) -> Option<Cow<'_, str>> {
            if file_name == "pao.txt" {
                None
            } else {
                BuiltinTemplates.lookup(file_name)
            }
        }
    }

    #[test]
    fn builtin_templates_parse() {
        assert!(Renderer::builtin().is_ok());
    }

    #[test]
    fn missing_template_is_reported() {
        match Renderer::new(Missing) {
            Err(TemplateError::NotFound(name)) => assert_eq!(name, "pao.txt"),
            _ => panic!("expected a missing template error"),
        }
    }

    #[test]
    fn render_is_deterministic() {
        let renderer = Renderer::builtin().unwrap();
        let ctx = RenderContext {
            testname: "test_ipgen_foo.v".to_string(),
            ..RenderContext::new("foo", &[], &[])
        };
        let a = renderer.render(TemplateName::Makefile, &ctx).unwrap();
        let b = renderer.render(TemplateName::Makefile, &ctx).unwrap();
        assert_eq!(a, b);
        assert!(a.contains("test_ipgen_foo.v"));
    }

    #[test]
    fn boilerplate_is_verbatim() {
        let renderer = Renderer::builtin().unwrap();
        let text = renderer.boilerplate(Boilerplate::BdTcl).unwrap();
        assert_eq!(text, BuiltinTemplates.lookup("bd.tcl").unwrap());
    }
}
